use std::{env, fs::File, time::Instant};

use chessquery::{Objective, Payload, Runner};

fn elo_diff(p: &Payload) -> i64 {
    (p.record.white_elo as i64 - p.record.black_elo as i64).abs()
}

fn move_count(p: &Payload) -> i64 {
    p.record.moves.len() as i64
}

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: standings <archive.pgn>"))?;

    let now = Instant::now();
    let mut runner = Runner::new();
    runner
        .add("EloDiff", Objective::Maximize, elo_diff)
        .add("MaxMoves", Objective::Maximize, move_count)
        .add("MinMoves", Objective::Minimize, move_count);

    let games = runner.run(File::open(path)?)?;
    let results = runner.results();
    println!(
        "Analyzed {} games with {} analyzers in {}us",
        games,
        results.len(),
        now.elapsed().as_micros()
    );
    for standing in results {
        println!(
            "{}... {} ({})",
            standing.name,
            standing.score.unwrap_or_default(),
            standing.site.unwrap_or_default()
        );
    }
    Ok(())
}
