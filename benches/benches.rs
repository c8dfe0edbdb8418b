use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chessquery::{pgn::Games, resolve, Board, Objective, Payload, Runner, San, Splitter};

const GAME: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/aaaaaaaa"]
[White "alice"]
[Black "bob"]
[Result "1-0"]
[WhiteElo "1850"]
[BlackElo "1623"]

1. e4 { [%clk 0:03:00] } 1... e6 { [%clk 0:03:00] } 2. d4 b6 3. a3 Bb7 4. Nc3 Nh6
5. Bxh6 gxh6 6. Be2 Qg5 7. Bg4 h5 8. Nf3 Qg6 9. Nh4 Qg5 10. Bxh5 Qxh4 11. Qf3 Kd8
12. Qxf7 Nc6 13. Qe8# 1-0

"#;

const MOVES: [&str; 24] = [
    "Nf3", "d5", "g3", "c5", "Bg2", "Nc6", "d4", "e6", "O-O", "cxd4", "Nxd4", "Nge7", "c4",
    "Qxd4", "Qd1", "Kg7", "Rb1+", "Kf2", "Rd2+", "Ke5", "Qe8#", "O-O-O", "exf8=Q", "Kxd5",
];

fn archive() -> String {
    GAME.repeat(1000)
}

fn pgn_bench(c: &mut Criterion) {
    let text = archive();

    c.bench_function("split", |b| {
        b.iter(|| Splitter::from_read(black_box(text.as_bytes())).count())
    });
    c.bench_function("parse_games", |b| {
        b.iter(|| {
            Games::from_read(black_box(text.as_bytes()))
                .filter_map(Result::ok)
                .map(|game| game.ply_count())
                .sum::<usize>()
        })
    });
    c.bench_function("run_analyzers", |b| {
        fn elo_diff(p: &Payload) -> i64 {
            (p.record.white_elo as i64 - p.record.black_elo as i64).abs()
        }
        fn move_count(p: &Payload) -> i64 {
            p.record.moves.len() as i64
        }

        b.iter(|| {
            let mut runner = Runner::new();
            runner
                .add("EloDiff", Objective::Maximize, elo_diff)
                .add("MinMoves", Objective::Minimize, move_count);
            runner.run(black_box(text.as_bytes())).unwrap()
        })
    });
}

fn san_bench(c: &mut Criterion) {
    c.bench_function("san_parse", |b| {
        b.iter(|| {
            for token in MOVES {
                let _ = black_box(token).parse::<San>();
            }
        })
    });

    c.bench_function("san_resolve", |b| {
        let board = Board::new_initial();
        b.iter(|| {
            for token in MOVES {
                let _ = black_box(resolve(black_box(&board), token));
            }
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = pgn_bench, san_bench
}
criterion_main!(benches);
