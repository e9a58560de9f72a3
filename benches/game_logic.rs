use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ataxx::core::{end_reason, Board};
use ataxx::engine::{Decide, Game, RandomBot};
use ataxx::types::Position;

/// Board after `plies` random moves, for mid-game measurements.
fn midgame(plies: usize) -> Board {
    let mut bot = RandomBot::new(12345);
    let mut board = Board::standard();
    for _ in 0..plies {
        if end_reason(&board).is_some() {
            break;
        }
        let Some(mv) = bot.decide(&board) else { break };
        board = board.play(mv).expect("bot plays legal moves");
    }
    board
}

fn bench_move_piece(c: &mut Criterion) {
    let board = Board::standard();

    c.bench_function("move_piece_clone", |b| {
        b.iter(|| {
            black_box(&board)
                .move_piece(Position::new(0, 0), Position::new(1, 1))
                .unwrap()
        })
    });
}

fn bench_legal_moves(c: &mut Criterion) {
    let board = midgame(30);

    c.bench_function("legal_moves_midgame", |b| {
        b.iter(|| black_box(&board).legal_moves())
    });
}

fn bench_end_check(c: &mut Criterion) {
    let board = midgame(30);

    c.bench_function("end_reason_midgame", |b| {
        b.iter(|| end_reason(black_box(&board)))
    });
}

fn bench_random_game(c: &mut Criterion) {
    c.bench_function("random_game", |b| {
        b.iter(|| {
            Game::new(
                Board::standard(),
                Box::new(RandomBot::new(1).into_player("a")),
                Box::new(RandomBot::new(2).into_player("b")),
            )
            .run()
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_move_piece,
    bench_legal_moves,
    bench_end_check,
    bench_random_game
);
criterion_main!(benches);
