//! Turn orchestrator
//!
//! A [`Game`] owns the board lineage and both players. It asks the side to move
//! for a move, applies the answer, checks for the end of the game and repeats.
//! Only one request is ever outstanding, and moves are applied strictly in the
//! order they were requested.
//!
//! The orchestrator never blocks unless asked to: [`Game::poll`] returns
//! immediately with the current [`Progress`], leaving the calling thread free for
//! rendering or input, while [`Game::wait`] and [`Game::run`] block until players
//! answer.
//!
//! # Example
//!
//! ```
//! use ataxx_core::Board;
//! use ataxx_engine::{Game, GameOver, RandomBot};
//!
//! let game = Game::new(
//!     Board::standard(),
//!     Box::new(RandomBot::new(1).into_player("one")),
//!     Box::new(RandomBot::new(2).into_player("two")),
//! );
//! let report = game.run().unwrap();
//! assert!(matches!(
//!     report.result,
//!     GameOver::Victory { .. } | GameOver::Draw { .. } | GameOver::Resignation { .. }
//! ));
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use crate::clock::{Overrun, ThinkClock};
use crate::core::{end_reason, Board, EndReason, Score};
use crate::error::EngineError;
use crate::player::{reply_channel, Answer, Control, MoveRequest, PendingMove, Player};
use crate::types::{Move, Side, MAX_THINKING_TIME_MS};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOver {
    /// `side` gave up (or its player went away).
    Resignation { side: Side, score: Score },
    Victory {
        winner: Side,
        reason: EndReason,
        score: Score,
    },
    /// Equal piece counts at the end.
    Draw { reason: EndReason, score: Score },
}

impl GameOver {
    fn decided(reason: EndReason, score: Score) -> Self {
        match score.leader() {
            Some(winner) => GameOver::Victory {
                winner,
                reason,
                score,
            },
            None => GameOver::Draw { reason, score },
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match *self {
            GameOver::Resignation { side, .. } => Some(side.other()),
            GameOver::Victory { winner, .. } => Some(winner),
            GameOver::Draw { .. } => None,
        }
    }

    pub fn score(&self) -> Score {
        match *self {
            GameOver::Resignation { score, .. }
            | GameOver::Victory { score, .. }
            | GameOver::Draw { score, .. } => score,
        }
    }
}

impl fmt::Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let score = self.score();
        match self {
            GameOver::Resignation { side, .. } => write!(f, "{side} resigned"),
            GameOver::Victory { winner, .. } => {
                write!(f, "{winner} wins {} - {}", score.black, score.white)
            }
            GameOver::Draw { .. } => write!(f, "draw {} - {}", score.black, score.white),
        }
    }
}

/// What happened on the last call into the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// An automatic player is thinking.
    Waiting(Side),
    /// The side to move is interactive; call [`Game::submit_move`] or [`Game::resign`].
    NeedsInput(Side),
    /// A move was applied. `turn_passed` is false after a forced pass.
    Moved {
        side: Side,
        mv: Move,
        turn_passed: bool,
    },
    Finished(GameOver),
}

/// One applied move with the score right after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ply {
    pub side: Side,
    pub mv: Move,
    pub score: Score,
    pub think_time: Duration,
}

/// Summary of a finished game.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub result: GameOver,
    pub plies: Vec<Ply>,
    pub final_board: Arc<Board>,
    /// Advisory only: sides that exceeded the think-time budget.
    pub overruns: Vec<Overrun>,
}

enum Phase {
    /// Entered a new position, no request issued yet.
    ToRequest,
    /// An automatic player holds the reply handle.
    Requested(PendingMove),
    /// Waiting for `submit_move` / `resign`.
    Input,
    Over(GameOver),
    Faulted,
}

pub struct Game {
    players: [Box<dyn Player>; 2],
    boards: Vec<Arc<Board>>,
    plies: Vec<Ply>,
    last_move: Option<Move>,
    phase: Phase,
    clock: ThinkClock,
    think_budget: Duration,
}

impl Game {
    /// Start a game on `board`. `black` plays `Side::Black`, which moves first on a
    /// freshly built board.
    pub fn new(board: Board, black: Box<dyn Player>, white: Box<dyn Player>) -> Self {
        let mut game = Self {
            players: [black, white],
            boards: vec![Arc::new(board)],
            plies: Vec::new(),
            last_move: None,
            phase: Phase::ToRequest,
            clock: ThinkClock::new(),
            think_budget: Duration::from_millis(MAX_THINKING_TIME_MS),
        };
        let board = Arc::clone(game.board());
        if let Some(reason) = end_reason(&board) {
            game.finish(GameOver::decided(reason, Score::of_board(&board)));
        }
        game
    }

    /// Change the advisory think-time budget used for [`GameReport::overruns`].
    pub fn with_think_budget(mut self, budget: Duration) -> Self {
        self.think_budget = budget;
        self
    }

    /// Current board.
    pub fn board(&self) -> &Arc<Board> {
        // Never empty: seeded in `new`.
        &self.boards[self.boards.len() - 1]
    }

    /// Every board of the game, oldest first.
    pub fn history(&self) -> &[Arc<Board>] {
        &self.boards
    }

    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    pub fn player(&self, side: Side) -> &dyn Player {
        self.players[side.index()].as_ref()
    }

    pub fn result(&self) -> Option<GameOver> {
        match self.phase {
            Phase::Over(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.result().is_some()
    }

    pub fn clock(&self) -> &ThinkClock {
        &self.clock
    }

    /// Advance without blocking.
    pub fn poll(&mut self) -> Result<Progress, EngineError> {
        if matches!(self.phase, Phase::ToRequest) {
            self.issue_request();
        }

        let side = self.board().current();
        match &mut self.phase {
            Phase::Requested(pending) => match pending.try_take() {
                Some((answer, at)) => {
                    self.phase = Phase::ToRequest;
                    self.resolve(answer, at)
                }
                None => Ok(Progress::Waiting(side)),
            },
            Phase::ToRequest => Ok(Progress::Waiting(side)),
            Phase::Input => Ok(Progress::NeedsInput(side)),
            Phase::Over(result) => Ok(Progress::Finished(*result)),
            Phase::Faulted => Err(EngineError::Faulted),
        }
    }

    /// Advance, blocking until the side to move answers.
    ///
    /// Returns immediately with [`Progress::NeedsInput`] for interactive players.
    pub fn wait(&mut self) -> Result<Progress, EngineError> {
        if matches!(self.phase, Phase::ToRequest) {
            self.issue_request();
        }

        match std::mem::replace(&mut self.phase, Phase::ToRequest) {
            Phase::Requested(pending) => {
                let (answer, at) = pending.wait();
                self.resolve(answer, at)
            }
            other => {
                self.phase = other;
                self.poll()
            }
        }
    }

    /// Drive an all-automatic game to the end.
    pub fn run(mut self) -> Result<GameReport, EngineError> {
        loop {
            match self.wait()? {
                Progress::Finished(_) => break,
                Progress::NeedsInput(side) => return Err(EngineError::InputRequired(side)),
                Progress::Waiting(_) | Progress::Moved { .. } => {}
            }
        }
        self.report().ok_or(EngineError::Faulted)
    }

    /// Summary, available once the game is over.
    pub fn report(&self) -> Option<GameReport> {
        let result = self.result()?;
        Some(GameReport {
            result,
            plies: self.plies.clone(),
            final_board: Arc::clone(self.board()),
            overruns: self.clock.overruns(self.think_budget),
        })
    }

    /// Apply a move typed in by an interactive player.
    ///
    /// Illegal input is rejected without side effects.
    pub fn submit_move(&mut self, mv: Move) -> Result<Progress, EngineError> {
        self.enter_input()?;
        if let Some(reason) = self.board().check_move(mv.from, mv.to) {
            return Err(EngineError::Rejected { mv, reason });
        }
        self.phase = Phase::ToRequest;
        self.apply(mv, Instant::now())
    }

    /// Resign on behalf of the interactive player to move.
    pub fn resign(&mut self) -> Result<Progress, EngineError> {
        self.enter_input()?;
        self.clock.stop();
        let side = self.board().current();
        let result = GameOver::Resignation {
            side,
            score: Score::of_board(self.board()),
        };
        self.finish(result);
        Ok(Progress::Finished(result))
    }

    fn enter_input(&mut self) -> Result<(), EngineError> {
        if matches!(self.phase, Phase::ToRequest) {
            self.issue_request();
        }
        match self.phase {
            Phase::Input => Ok(()),
            Phase::Faulted => Err(EngineError::Faulted),
            _ => Err(EngineError::NotAwaitingInput),
        }
    }

    fn issue_request(&mut self) {
        let board = Arc::clone(self.board());
        let side = board.current();
        let player = &mut self.players[side.index()];
        self.clock.start(side);

        match player.control() {
            Control::Interactive => {
                debug!(%side, player = player.name(), "waiting for input");
                self.phase = Phase::Input;
            }
            Control::Automatic => {
                debug!(%side, player = player.name(), "requesting move");
                let (reply, pending) = reply_channel();
                self.phase = Phase::Requested(pending);
                player.request_move(
                    MoveRequest {
                        board,
                        last_move: self.last_move,
                    },
                    reply,
                );
            }
        }
    }

    fn resolve(&mut self, answer: Answer, at: Instant) -> Result<Progress, EngineError> {
        let side = self.board().current();
        match answer {
            Answer::Move(mv) => self.apply(mv, at),
            Answer::Resign | Answer::Dropped => {
                if answer == Answer::Dropped {
                    warn!(%side, player = self.player(side).name(), "player went away without answering");
                }
                self.clock.stop_at(at);
                let result = GameOver::Resignation {
                    side,
                    score: Score::of_board(self.board()),
                };
                self.finish(result);
                Ok(Progress::Finished(result))
            }
        }
    }

    #[instrument(level = "debug", skip(self, at))]
    fn apply(&mut self, mv: Move, at: Instant) -> Result<Progress, EngineError> {
        let board = Arc::clone(self.board());
        let side = board.current();

        let next = match board.play(mv) {
            Ok(next) => next,
            Err(source) => {
                self.phase = Phase::Faulted;
                return Err(EngineError::InvalidMove {
                    side,
                    player: self.player(side).name().to_string(),
                    mv,
                    source,
                });
            }
        };

        let think_time = self
            .clock
            .stop_at(at)
            .map(|(_, elapsed)| elapsed)
            .unwrap_or_default();
        let turn_passed = next.current() != side;
        let score = Score::of_board(&next);

        info!(
            %side,
            %mv,
            black = score.black,
            white = score.white,
            turn_passed,
            "move applied"
        );

        self.players[side.other().index()].opponent_moved(mv);
        self.plies.push(Ply {
            side,
            mv,
            score,
            think_time,
        });
        self.last_move = if turn_passed { Some(mv) } else { None };
        self.boards.push(Arc::new(next));

        if let Some(reason) = end_reason(self.board()) {
            self.finish(GameOver::decided(reason, score));
        }

        Ok(Progress::Moved {
            side,
            mv,
            turn_passed,
        })
    }

    fn finish(&mut self, result: GameOver) {
        info!(%result, plies = self.plies.len(), "game over");
        self.phase = Phase::Over(result);
        for player in self.players.iter_mut() {
            player.game_finished(&result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{HumanPlayer, MoveReply};
    use crate::types::Position;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    /// Plays a fixed list of moves, then resigns. Records what it was shown.
    struct Scripted {
        moves: VecDeque<Option<Move>>,
        seen: Arc<Mutex<Vec<Option<Move>>>>,
        reported: Arc<Mutex<Vec<Move>>>,
    }

    impl Scripted {
        fn new(moves: &[&str]) -> (Self, Arc<Mutex<Vec<Option<Move>>>>) {
            let seen = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    moves: moves.iter().map(|s| Some(mv(s))).collect(),
                    seen: Arc::clone(&seen),
                    reported: Arc::new(Mutex::new(Vec::new())),
                },
                seen,
            )
        }
    }

    impl Player for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn request_move(&mut self, request: MoveRequest, reply: MoveReply) {
            self.seen.lock().unwrap().push(request.last_move);
            reply.send(self.moves.pop_front().flatten());
        }

        fn opponent_moved(&mut self, mv: Move) {
            self.reported.lock().unwrap().push(mv);
        }
    }

    #[test]
    fn alternates_and_passes_last_move() {
        let (black, black_seen) = Scripted::new(&["a1-a2", "a2-a3"]);
        let (white, white_seen) = Scripted::new(&["a9-a8"]);
        let mut game = Game::new(Board::new(9, []).unwrap(), Box::new(black), Box::new(white));

        assert!(matches!(game.wait().unwrap(), Progress::Moved { side: Side::Black, turn_passed: true, .. }));
        assert!(matches!(game.wait().unwrap(), Progress::Moved { side: Side::White, .. }));
        assert!(matches!(game.wait().unwrap(), Progress::Moved { side: Side::Black, .. }));
        // White's script is exhausted: it resigns.
        let progress = game.wait().unwrap();
        assert!(matches!(
            progress,
            Progress::Finished(GameOver::Resignation { side: Side::White, .. })
        ));

        assert_eq!(*black_seen.lock().unwrap(), vec![None, Some(mv("a9-a8"))]);
        assert_eq!(*white_seen.lock().unwrap(), vec![Some(mv("a1-a2")), Some(mv("a2-a3"))]);
        assert_eq!(game.history().len(), 4);
        assert_eq!(game.result().unwrap().winner(), Some(Side::Black));
    }

    #[test]
    fn forced_pass_keeps_mover_and_clears_last_move() {
        // White's only exit from a1 is c1. Black jumping there shuts it in.
        let board = Board::from_diagram(
            "o#..x\n\
             ###..\n\
             ###..\n\
             .....\n\
             .....",
            Side::Black,
        )
        .unwrap();
        assert!(board.is_move_legal(Position::new(0, 0), Position::new(2, 0)));

        let (black, black_seen) = Scripted::new(&["e1-c1", "c1-d1"]);
        let (white, white_seen) = Scripted::new(&[]);
        let mut game = Game::new(board, Box::new(black), Box::new(white));

        assert!(matches!(
            game.wait().unwrap(),
            Progress::Moved { side: Side::Black, turn_passed: false, .. }
        ));
        assert_eq!(game.board().current(), Side::Black);
        assert!(matches!(
            game.wait().unwrap(),
            Progress::Moved { side: Side::Black, turn_passed: false, .. }
        ));
        assert_eq!(*black_seen.lock().unwrap(), vec![None, None]);
        assert!(white_seen.lock().unwrap().is_empty());
    }

    #[test]
    fn invalid_move_is_fatal() {
        let (black, _) = Scripted::new(&["a1-d1"]);
        let (white, _) = Scripted::new(&[]);
        let mut game = Game::new(Board::new(9, []).unwrap(), Box::new(black), Box::new(white));

        let err = game.wait().unwrap_err();
        assert!(matches!(err, EngineError::InvalidMove { side: Side::Black, .. }));
        assert_eq!(game.poll().unwrap_err(), EngineError::Faulted);
        assert_eq!(game.history().len(), 1);
    }

    struct Dropper;

    impl Player for Dropper {
        fn name(&self) -> &str {
            "dropper"
        }

        fn request_move(&mut self, _request: MoveRequest, reply: MoveReply) {
            drop(reply);
        }
    }

    #[test]
    fn dropped_reply_counts_as_resignation() {
        let mut game = Game::new(
            Board::standard(),
            Box::new(Dropper),
            Box::new(HumanPlayer::default()),
        );
        assert!(matches!(
            game.poll().unwrap(),
            Progress::Finished(GameOver::Resignation { side: Side::Black, .. })
        ));
    }

    #[test]
    fn interactive_input_flow() {
        let (white, _) = Scripted::new(&["a9-b9"]);
        let mut game = Game::new(
            Board::new(9, []).unwrap(),
            Box::new(HumanPlayer::default()),
            Box::new(white),
        );

        assert_eq!(game.poll().unwrap(), Progress::NeedsInput(Side::Black));
        assert_eq!(game.wait().unwrap(), Progress::NeedsInput(Side::Black));

        // Illegal gesture: rejected, nothing changes.
        let err = game.submit_move(mv("a1-a4")).unwrap_err();
        assert!(matches!(err, EngineError::Rejected { .. }));
        assert_eq!(game.history().len(), 1);

        assert!(matches!(game.submit_move(mv("a1-b2")).unwrap(), Progress::Moved { .. }));
        // White is automatic now.
        assert_eq!(game.submit_move(mv("a1-a2")).unwrap_err(), EngineError::NotAwaitingInput);
        assert!(matches!(game.poll().unwrap(), Progress::Moved { side: Side::White, .. }));
        assert_eq!(game.poll().unwrap(), Progress::NeedsInput(Side::Black));

        let done = game.resign().unwrap();
        assert!(matches!(done, Progress::Finished(GameOver::Resignation { side: Side::Black, .. })));
    }

    #[test]
    fn run_refuses_interactive_players() {
        let game = Game::new(
            Board::standard(),
            Box::new(HumanPlayer::default()),
            Box::new(HumanPlayer::default()),
        );
        assert_eq!(game.run().unwrap_err(), EngineError::InputRequired(Side::Black));
    }

    #[test]
    fn last_capture_ends_game() {
        // Filling the last cell also flips White's only piece.
        let board = Board::from_diagram("xo\nx.", Side::Black).unwrap();
        let (black, _) = Scripted::new(&["a2-b2"]);
        let (white, _) = Scripted::new(&[]);
        let mut game = Game::new(board, Box::new(black), Box::new(white));

        assert!(matches!(game.wait().unwrap(), Progress::Moved { .. }));
        let result = game.result().unwrap();
        assert_eq!(
            result,
            GameOver::Victory {
                winner: Side::Black,
                reason: EndReason::Eliminated(Side::White),
                score: Score { black: 4, white: 0 },
            }
        );
        assert_eq!(game.wait().unwrap(), Progress::Finished(result));
    }

    #[test]
    fn game_over_before_first_move() {
        let board = Board::from_diagram("xx\nxx", Side::Black).unwrap();
        let (black, seen) = Scripted::new(&[]);
        let (white, _) = Scripted::new(&[]);
        let game = Game::new(board, Box::new(black), Box::new(white));
        let report = game.run().unwrap();
        assert_eq!(report.plies.len(), 0);
        assert!(matches!(report.result, GameOver::Victory { winner: Side::Black, .. }));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn opponent_is_told_about_each_move() {
        let (black, _) = Scripted::new(&["a1-b1"]);
        let (white, _) = Scripted::new(&[]);
        let reported = Arc::clone(&white.reported);
        let mut game = Game::new(Board::new(9, []).unwrap(), Box::new(black), Box::new(white));
        game.wait().unwrap();
        assert_eq!(*reported.lock().unwrap(), vec![mv("a1-b1")]);
    }
}
