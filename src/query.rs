use std::io::Read;
use tracing::{debug, info, warn};

use crate::{
    pgn::{self, ErrorKind, GameRecord, Games},
    san, Board, Move, ResolveError,
};

/// What an analyzer sees of one game.
#[derive(Clone, Copy, Debug)]
pub struct Payload<'a> {
    pub record: &'a GameRecord,
    /// The game's starting position.
    pub board: &'a Board,
    /// The final move token resolved against `board`, `None` without moves.
    pub last_move: Option<Result<Move, ResolveError>>,
}

/// Scores a game. Higher is better under [`Objective::Maximize`].
pub trait Analyzer {
    fn analyze(&self, payload: &Payload) -> i64;
}

impl<F> Analyzer for F
where
    F: Fn(&Payload) -> i64,
{
    #[inline]
    fn analyze(&self, payload: &Payload) -> i64 {
        self(payload)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Objective {
    #[default]
    Maximize,
    Minimize,
}

/// Best score seen by one analyzer and the `Site` of the game that set it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Standing {
    pub name: String,
    pub score: Option<i64>,
    pub site: Option<String>,
}

struct Entry {
    name: String,
    objective: Objective,
    best: Option<(i64, String)>,
    analyzer: Box<dyn Analyzer>,
}

/// Runs every registered analyzer once per game and keeps the best game for each.
#[derive(Default)]
pub struct Runner {
    entries: Vec<Entry>,
    games: usize,
}

impl Objective {
    #[inline]
    fn improves(self, score: i64, best: i64) -> bool {
        match self {
            Objective::Maximize => score > best,
            Objective::Minimize => score < best,
        }
    }
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        objective: Objective,
        analyzer: impl Analyzer + 'static,
    ) -> &mut Self {
        self.entries.push(Entry {
            name: name.into(),
            objective,
            best: None,
            analyzer: Box::new(analyzer),
        });
        self
    }

    /// Number of games analyzed so far.
    #[inline]
    pub fn games(&self) -> usize {
        self.games
    }

    pub fn analyze(&mut self, record: &GameRecord) {
        let board = record.starting_board().unwrap_or_else(|err| {
            warn!(site = record.site.as_str(), %err, "unreadable FEN tag, using the standard start");
            Board::new_initial()
        });
        let payload = Payload {
            record,
            board: &board,
            last_move: record.moves.last().map(|token| san::resolve(&board, token)),
        };

        for entry in &mut self.entries {
            let score = entry.analyzer.analyze(&payload);
            let improved = match &entry.best {
                Some((best, _)) => entry.objective.improves(score, *best),
                None => true,
            };
            if improved {
                debug!(
                    analyzer = entry.name.as_str(),
                    score,
                    site = record.site.as_str(),
                    "new best game"
                );
                entry.best = Some((score, record.site.clone()));
            }
        }
        self.games += 1;
    }

    /// Splits, parses and analyzes every game of `read`.
    ///
    /// Undecodable lines are logged and skipped; an I/O error stops the run.
    pub fn run<R: Read>(&mut self, read: R) -> Result<usize, pgn::Error> {
        let mut count = 0;
        for game in Games::from_read(read) {
            let record = match game {
                Ok(record) => record,
                Err(err) if matches!(err.kind, ErrorKind::Utf8(_)) => {
                    warn!(%err, "skipping undecodable line");
                    continue;
                }
                Err(err) => return Err(err),
            };
            self.analyze(&record);
            count += 1;
        }
        info!(games = count, analyzers = self.entries.len(), "finished analysis");
        Ok(count)
    }

    pub fn results(&self) -> Vec<Standing> {
        self.entries
            .iter()
            .map(|entry| Standing {
                name: entry.name.clone(),
                score: entry.best.as_ref().map(|(score, _)| *score),
                site: entry.best.as_ref().map(|(_, site)| site.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        pgn::GameRecord,
        query::{Objective, Payload, Runner, Standing},
        san::{Kind, ResolveError},
        File, Move, San,
        Square::*,
    };
    use std::io;

    const GAMES: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/aaaaaaaa"]
[White "alice"]
[Black "bob"]
[WhiteElo "1850"]
[BlackElo "1623"]

1. e4 e6 2. d4 b6 3. a3 Bb7 4. Nc3 Nh6 5. Bxh6 gxh6 6. Be2 Qg5 7. Bg4 h5 8. Nf3 Qg6 9. Nh4 Qg5 10. Bxh5 Qxh4 11. Qf3 Kd8 12. Qxf7 Nc6 13. Qe8# 1-0

[Event "Rated Bullet game"]
[Site "https://lichess.org/bbbbbbbb"]
[White "carol"]
[Black "dave"]
[WhiteElo "1500"]
[BlackElo "2100"]

1. f3 e5 2. g4 Qh4# 0-1

[Event "Study"]
[Site "https://lichess.org/cccccccc"]
[WhiteElo "2000"]
[BlackElo "2000"]
[FEN "4k3/8/8/8/2Q5/8/8/4K3 w - - 0 1"]

1. Qe6+ 1-0
"#;

    fn elo_diff(p: &Payload) -> i64 {
        (p.record.white_elo as i64 - p.record.black_elo as i64).abs()
    }

    fn move_count(p: &Payload) -> i64 {
        p.record.moves.len() as i64
    }

    fn edge_file_moves(p: &Payload) -> i64 {
        p.record
            .moves
            .iter()
            .filter_map(|token| token.parse::<San>().ok())
            .filter(|san| match san.kind {
                Kind::Simple { to, .. } => matches!(to.file(), File::A | File::H),
                Kind::Castling(_) => false,
            })
            .count() as i64
    }

    #[test]
    fn run_analyzers() -> anyhow::Result<()> {
        let mut runner = Runner::new();
        runner
            .add("EloDiff", Objective::Maximize, elo_diff)
            .add("MaxMoves", Objective::Maximize, move_count)
            .add("MinMoves", Objective::Minimize, move_count)
            .add("EdgeFileMoves", Objective::Maximize, edge_file_moves);

        assert_eq!(runner.run(GAMES.as_bytes())?, 3);
        assert_eq!(runner.games(), 3);

        let site = |id: &str| Some(format!("https://lichess.org/{id}"));
        assert_eq!(
            runner.results(),
            vec![
                Standing {
                    name: "EloDiff".into(),
                    score: Some(600),
                    site: site("bbbbbbbb"),
                },
                Standing {
                    name: "MaxMoves".into(),
                    score: Some(25),
                    site: site("aaaaaaaa"),
                },
                Standing {
                    name: "MinMoves".into(),
                    score: Some(1),
                    site: site("cccccccc"),
                },
                Standing {
                    name: "EdgeFileMoves".into(),
                    score: Some(8),
                    site: site("aaaaaaaa"),
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn ties_keep_first_game() {
        let mut runner = Runner::new();
        runner.add("Constant", Objective::default(), |_: &Payload| 7);
        runner.analyze(&GameRecord {
            site: "first".into(),
            ..GameRecord::default()
        });
        runner.analyze(&GameRecord {
            site: "second".into(),
            ..GameRecord::default()
        });
        let standing = &runner.results()[0];
        assert_eq!(standing.score, Some(7));
        assert_eq!(standing.site.as_deref(), Some("first"));
    }

    #[test]
    fn no_games() {
        let mut runner = Runner::new();
        runner.add("EloDiff", Objective::Maximize, elo_diff);
        assert_eq!(runner.run(io::empty()).unwrap(), 0);
        assert_eq!(
            runner.results(),
            vec![Standing {
                name: "EloDiff".into(),
                score: None,
                site: None,
            }]
        );
    }

    #[test]
    fn payload_last_move() -> anyhow::Result<()> {
        use std::{cell::RefCell, rc::Rc};

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut runner = Runner::new();
        runner.add("LastMove", Objective::Maximize, move |p: &Payload| {
            sink.borrow_mut().push(p.last_move);
            0
        });
        runner.run(GAMES.as_bytes())?;
        runner.analyze(&GameRecord::default());

        assert_eq!(
            *seen.borrow(),
            vec![
                Some(Err(ResolveError::ImpossibleMove)),
                Some(Err(ResolveError::ImpossibleMove)),
                Some(Ok(Move::new(C4, E6))),
                None,
            ]
        );
        Ok(())
    }

    #[test]
    fn bad_fen_falls_back_to_start() {
        let record = GameRecord::parse("[FEN \"not a position\"]\n\n1. O-O *\n");
        let mut runner = Runner::new();
        runner.add("Castles", Objective::Maximize, |p: &Payload| {
            match p.last_move {
                Some(Ok(mv)) if mv == Move::new(E1, G1) => 1,
                _ => 0,
            }
        });
        runner.analyze(&record);
        assert_eq!(runner.results()[0].score, Some(1));
    }
}
