//! Game flow tests - orchestrator driving bots and channel-backed players

use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use ataxx::adapter::{MoveChannel, NetworkPlayer, PeerEvent};
use ataxx::core::{end_reason, Board, EndReason};
use ataxx::engine::{Bot, EngineError, Game, GameOver, Progress, RandomBot};
use ataxx::types::{Move, Side};

fn mv(s: &str) -> Move {
    s.parse().unwrap()
}

#[test]
fn test_random_bots_finish_a_game() {
    let game = Game::new(
        Board::standard(),
        Box::new(RandomBot::new(7).into_player("seven")),
        Box::new(RandomBot::new(8).into_player("eight")),
    );
    let report = game.run().unwrap();

    // Every recorded board transition was legal and the end is real.
    assert!(!report.plies.is_empty());
    match report.result {
        GameOver::Victory { reason, .. } | GameOver::Draw { reason, .. } => {
            assert_eq!(end_reason(&report.final_board), Some(reason));
        }
        GameOver::Resignation { .. } => panic!("random bots never resign"),
    }
    let last = report.plies.last().unwrap();
    assert_eq!(last.score, report.result.score());
}

#[test]
fn test_same_seeds_replay_the_same_game() {
    let play = || {
        Game::new(
            Board::standard(),
            Box::new(RandomBot::new(11).into_player("a")),
            Box::new(RandomBot::new(12).into_player("b")),
        )
        .run()
        .unwrap()
    };
    let a = play();
    let b = play();
    let moves = |r: &ataxx::engine::GameReport| r.plies.iter().map(|p| p.mv).collect::<Vec<_>>();
    assert_eq!(moves(&a), moves(&b));
    assert_eq!(a.result, b.result);
}

#[test]
fn test_remote_moves_flow_through_channel() {
    let channel = MoveChannel::new();
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let remote = NetworkPlayer::new("peer", "g1", channel.clone(), events_tx);

    // Local bot plays black: always the first legal move.
    let local = Bot::new("first", |b: &Board| b.legal_moves().first().copied());
    let mut game = Game::new(Board::new(9, []).unwrap(), Box::new(local), Box::new(remote));

    // Black moves inline.
    let first = match game.poll().unwrap() {
        Progress::Moved { side: Side::Black, mv, .. } => mv,
        other => panic!("expected black to move, got {other:?}"),
    };
    assert_eq!(events.try_recv().unwrap(), PeerEvent::OpponentMoved(first));

    // White is remote: the orchestrator does not block while it waits.
    assert_eq!(game.poll().unwrap(), Progress::Waiting(Side::White));
    assert_eq!(game.poll().unwrap(), Progress::Waiting(Side::White));

    let pusher = {
        let channel = channel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            channel.push(mv("a9-a8"))
        })
    };
    assert!(pusher.join().unwrap());

    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        match game.poll().unwrap() {
            Progress::Moved { side, mv: played, .. } => {
                assert_eq!(side, Side::White);
                assert_eq!(played, mv("a9-a8"));
                break;
            }
            Progress::Waiting(_) => {
                assert!(Instant::now() < deadline, "remote move never arrived");
                thread::sleep(Duration::from_millis(5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(game.history().len(), 3);
}

#[test]
fn test_closing_the_channel_resigns_the_remote() {
    let channel = MoveChannel::new();
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let remote = NetworkPlayer::new("peer", "g2", channel.clone(), events_tx);
    let local = RandomBot::new(3).into_player("bot");

    // Remote plays black and moves first.
    let mut game = Game::new(Board::standard(), Box::new(remote), Box::new(local));
    assert_eq!(game.poll().unwrap(), Progress::Waiting(Side::Black));

    channel.close();
    let result = match game.wait().unwrap() {
        Progress::Finished(result) => result,
        other => panic!("expected the game to end, got {other:?}"),
    };
    assert!(matches!(result, GameOver::Resignation { side: Side::Black, .. }));
    assert_eq!(result.winner(), Some(Side::White));
    assert_eq!(events.try_recv().unwrap(), PeerEvent::Finished(result));
}

#[test]
fn test_illegal_remote_move_does_not_abort() {
    let channel = MoveChannel::new();
    let (events_tx, mut events) = mpsc::unbounded_channel();
    let remote = NetworkPlayer::new("peer", "g3", channel.clone(), events_tx);
    let local = RandomBot::new(5).into_player("bot");
    let mut game = Game::new(Board::standard(), Box::new(remote), Box::new(local));

    channel.push(mv("a9-a8")); // white's piece
    channel.push(mv("a1-a2"));
    assert!(matches!(
        game.wait().unwrap(),
        Progress::Moved { side: Side::Black, .. }
    ));
    assert!(matches!(
        events.try_recv().unwrap(),
        PeerEvent::Rejected { .. }
    ));
}

#[test]
fn test_bot_returning_illegal_move_is_fatal() {
    let cheat = Bot::new("cheat", |_: &Board| Some(mv("a1-e1")));
    let game = Game::new(
        Board::standard(),
        Box::new(cheat),
        Box::new(RandomBot::new(1).into_player("bot")),
    );
    match game.run() {
        Err(EngineError::InvalidMove { side, player, .. }) => {
            assert_eq!(side, Side::Black);
            assert_eq!(player, "cheat");
        }
        other => panic!("expected an invalid move error, got {other:?}"),
    }
}

#[test]
fn test_stalemate_ends_by_points() {
    // Black is walled in by holes on its own turn; White has more pieces.
    let board = Board::from_diagram(
        "x##..\n\
         ##...\n\
         #.#..\n\
         .....\n\
         ...oo",
        Side::Black,
    )
    .unwrap();

    let game = Game::new(
        board,
        Box::new(RandomBot::new(1).into_player("b")),
        Box::new(RandomBot::new(2).into_player("w")),
    );
    assert!(game.is_over());
    let report = game.run().unwrap();
    assert!(report.plies.is_empty());
    assert!(matches!(
        report.result,
        GameOver::Victory {
            winner: Side::White,
            reason: EndReason::Stalemate,
            ..
        }
    ));
}
