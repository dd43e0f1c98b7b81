use criterion::{criterion_group, criterion_main, Criterion};
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use spooky_pgn::san;
use spooky_pgn::{Game, PgnReader, Position};
use std::hint::black_box;

const GAMES: &str = "\
[Event \"Opera\"]
[White \"Morphy\"]
[Black \"Duke Karl / Count Isouard\"]
[Result \"1-0\"]

1.e4 e5 2.Nf3 d6 3.d4 Bg4 4.dxe5 Bxf3 5.Qxf3 dxe5 6.Bc4 Nf6 7.Qb3 Qe7
8.Nc3 c6 9.Bg5 b5 10.Nxb5 cxb5 11.Bxb5+ Nbd7 12.O-O-O Rd8 13.Rxd7 Rxd7
14.Rd1 Qe6 15.Bxd7+ Nxd7 16.Qb8+ Nxb8 17.Rd8# 1-0

[Event \"Immortal\"]
[White \"Anderssen\"]
[Black \"Kieseritzky\"]
[Result \"1-0\"]

1.e4 e5 2.f4 exf4 3.Bc4 Qh4+ 4.Kf1 b5 5.Bxb5 Nf6 6.Nf3 Qh6 7.d3 Nh5 8.Nh4 Qg5
9.Nf5 c6 10.g4 Nf6 11.Rg1 cxb5 12.h4 Qg6 13.h5 Qg5 14.Qf3 Ng8 15.Bxf4 Qf6
16.Nc3 Bc5 17.Nd5 Qxb2 18.Bd6 Bxg1 19.e5 Qxa1+ 20.Ke2 Na6 21.Nxg7+ Kd8
22.Qf6+ Nxf6 23.Be7# 1-0
";

/// Play ~20 random moves on a fresh game to create a realistic mid-game position.
/// Uses a fixed seed for reproducibility across benchmark runs.
fn setup_midgame() -> Position {
    let mut game = Game::new();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let moves = game.legal_moves();
        let Some(mv) = moves.choose(&mut rng) else {
            break;
        };
        game.advance(*mv).unwrap();
    }
    *game.position()
}

// ---------------------------------------------------------------------------
// Microbenchmarks
// ---------------------------------------------------------------------------

fn bench_legal_moves(c: &mut Criterion) {
    let position = setup_midgame();
    c.bench_function("legal_moves", |b| {
        b.iter(|| black_box(position.legal_moves()))
    });
}

fn bench_play(c: &mut Criterion) {
    let position = setup_midgame();
    let mv = *position.legal_moves().first().unwrap();
    c.bench_function("play", |b| b.iter(|| black_box(position.play(&mv))));
}

fn bench_resolve_san(c: &mut Criterion) {
    let position = Position::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    )
    .unwrap();
    c.bench_function("resolve_san", |b| {
        b.iter(|| black_box(san::resolve(&position, black_box("Nxf7"))))
    });
}

// ---------------------------------------------------------------------------
// Integration benchmarks
// ---------------------------------------------------------------------------

fn bench_read_games(c: &mut Criterion) {
    c.bench_function("read_games", |b| {
        b.iter(|| {
            let games: Vec<_> = PgnReader::from_string(black_box(GAMES)).collect();
            black_box(games)
        })
    });
}

fn bench_random_playout(c: &mut Criterion) {
    c.bench_function("random_playout", |b| {
        b.iter(|| {
            let mut game = Game::new();
            let mut rng = StdRng::seed_from_u64(123);
            while let Some(mv) = game.legal_moves().choose(&mut rng) {
                game.advance(*mv).unwrap();
            }
            black_box(game.status())
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(10_000);
    targets =
        bench_legal_moves,
        bench_play,
        bench_resolve_san,
);
criterion_group!(
    name = playouts;
    config = Criterion::default().sample_size(1_000);
    targets =
        bench_read_games,
        bench_random_playout,
);
criterion_main!(benches, playouts);
