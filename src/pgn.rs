use atoi::FromRadix10Checked;
use core::str;
use std::{
    io::{self, BufRead, BufReader, Read},
    mem,
};
use thiserror::Error;
use tracing::debug;

use crate::{Board, FenParseError, Outcome};

/// Splits a PGN stream into one text block per game.
///
/// A game starts at a tag pair line (`[` in the first column) that follows a
/// line which was not a tag pair. Lines inside an open `{...}` comment never
/// start a game, whatever their first column holds. Only the game being collected is held in
/// memory. The text after the last boundary is always yielded, so an input
/// without games yields a single empty block.
#[derive(Debug)]
pub struct Splitter<R> {
    reader: R,
    block: String,
    scratch: Vec<u8>,
    line: u32,
    in_tag_pairs: bool,
    in_comment: bool,
    finished: bool,
}

/// Header fields and main line move tokens of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub white_elo: u32,
    pub black_elo: u32,
    pub outcome: Option<Outcome>,
    pub fen: Option<String>,
    /// Every tag pair in source order, including the ones above.
    pub tags: Vec<(String, String)>,
    /// SAN tokens in ply order, with check and annotation suffixes kept.
    pub moves: Vec<String>,
}

/// Parsed games of a PGN stream, in source order. Blank blocks are skipped.
#[derive(Debug)]
pub struct Games<R> {
    splitter: Splitter<R>,
}

#[derive(Debug, Error)]
#[error("read error at line {line}: {kind}")]
pub struct Error {
    pub line: u32,
    pub kind: ErrorKind,
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("IO error: {0}")]
    Io(io::Error),
    #[error("invalid UTF8 string: {0}")]
    Utf8(str::Utf8Error),
}

impl Splitter<&[u8]> {
    pub fn from_string(s: &str) -> Splitter<&[u8]> {
        Splitter::new(s.as_bytes())
    }
}

impl<R> Splitter<BufReader<R>>
where
    R: Read,
{
    pub fn from_read(read: R) -> Self {
        Splitter::new(BufReader::new(read))
    }
}

impl<R> Splitter<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            block: String::new(),
            scratch: Vec::with_capacity(256),
            line: 0,
            in_tag_pairs: true,
            in_comment: false,
            finished: false,
        }
    }

    /// Number of lines consumed so far.
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    fn read_line(&mut self) -> Result<usize, Error> {
        self.scratch.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.scratch) {
                Ok(read) => return Ok(read),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(Error {
                        line: self.line + 1,
                        kind: ErrorKind::Io(err),
                    })
                }
            }
        }
    }
}

impl<R> Iterator for Splitter<R>
where
    R: BufRead,
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let read = match self.read_line() {
                Ok(read) => read,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            };

            if read == 0 {
                self.finished = true;
                debug!(line = self.line, bytes = self.block.len(), "last game block");
                return Some(Ok(mem::take(&mut self.block)));
            }
            self.line += 1;

            let mut end = self.scratch.len();
            if self.scratch[..end].ends_with(b"\n") {
                end -= 1;
            }
            if self.scratch[..end].ends_with(b"\r") {
                end -= 1;
            }
            let text = match str::from_utf8(&self.scratch[..end]) {
                Ok(text) => text,
                Err(err) => {
                    return Some(Err(Error {
                        line: self.line,
                        kind: ErrorKind::Utf8(err),
                    }))
                }
            };

            let is_tag_pair = !self.in_comment && text.starts_with('[');
            if !is_tag_pair {
                self.in_comment = comment_open_after(text, self.in_comment);
            }
            let finished_block = if is_tag_pair && !self.in_tag_pairs {
                Some(mem::take(&mut self.block))
            } else {
                None
            };
            self.in_tag_pairs = is_tag_pair;
            self.block.push_str(text);
            self.block.push('\n');

            if let Some(block) = finished_block {
                debug!(line = self.line, bytes = block.len(), "game block");
                return Some(Ok(block));
            }
        }
    }
}

impl<R> Games<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        Self {
            splitter: Splitter::new(reader),
        }
    }
}

impl<R> Games<BufReader<R>>
where
    R: Read,
{
    pub fn from_read(read: R) -> Self {
        Self::new(BufReader::new(read))
    }
}

impl<R> Iterator for Games<R>
where
    R: BufRead,
{
    type Item = Result<GameRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.splitter.next()? {
                Ok(block) if block.trim().is_empty() => continue,
                Ok(block) => return Some(Ok(GameRecord::parse(&block))),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl GameRecord {
    /// Reads the tag pairs and main line moves of one game block.
    ///
    /// Never fails: unreadable tag pairs are skipped and unreadable ratings
    /// count as 0. `{...}` and `;` comments and `(...)` variations are removed
    /// before the movetext is split into tokens.
    pub fn parse(block: &str) -> GameRecord {
        let mut record = GameRecord::default();
        let mut movetext = Movetext::default();

        for line in block.lines() {
            if line.trim().is_empty() || line.starts_with('%') {
                continue;
            }
            if line.starts_with('[') && !movetext.in_comment {
                match parse_tag_pair(line) {
                    Some((name, value)) => record.set_tag(name, value),
                    None => debug!(line, "skipping malformed tag pair"),
                }
                continue;
            }
            movetext.push_line(line);
        }

        record.moves = movetext.into_moves();
        record
    }

    fn set_tag(&mut self, name: String, value: String) {
        match name.as_str() {
            "Event" => self.event = value.clone(),
            "Site" => self.site = value.clone(),
            "Date" => self.date = value.clone(),
            "Round" => self.round = value.clone(),
            "White" => self.white = value.clone(),
            "Black" => self.black = value.clone(),
            "WhiteElo" => self.white_elo = parse_elo(&value),
            "BlackElo" => self.black_elo = parse_elo(&value),
            "Result" => {
                self.outcome = Outcome::from_tag(&value).unwrap_or_else(|_| {
                    debug!(value = value.as_str(), "unreadable game result");
                    None
                })
            }
            "FEN" => self.fen = Some(value.clone()),
            _ => {}
        }
        self.tags.push((name, value));
    }

    /// Value of the first tag pair named `name`.
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// A fresh board for this game: the `FEN` tag position, or the standard start.
    pub fn starting_board(&self) -> Result<Board, FenParseError> {
        match &self.fen {
            Some(fen) => Board::from_fen(fen),
            None => Ok(Board::new_initial()),
        }
    }
}

fn parse_tag_pair(line: &str) -> Option<(String, String)> {
    let inner = line.trim_end().strip_prefix('[')?.strip_suffix(']')?;
    let name_len = inner
        .bytes()
        .take_while(|&c| c.is_ascii_alphanumeric() || c == b'_')
        .count();
    if name_len == 0 {
        return None;
    }
    let (name, rest) = inner.split_at(name_len);
    let quoted = rest.trim_start().strip_prefix('"')?;

    let mut value = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    loop {
        match chars.next()? {
            '"' => break,
            '\\' => match chars.next()? {
                c @ ('"' | '\\') => value.push(c),
                _ => return None,
            },
            c => value.push(c),
        }
    }
    if !chars.as_str().trim().is_empty() {
        return None;
    }

    Some((name.to_string(), value))
}

fn parse_elo(value: &str) -> u32 {
    let digits = value.trim().as_bytes();
    match u32::from_radix_10_checked(digits) {
        (Some(elo), used) if used == digits.len() && used > 0 => elo,
        _ => {
            debug!(value, "unreadable rating, using 0");
            0
        }
    }
}

/// Movetext with comments and variations removed, collected across lines.
#[derive(Debug, Default)]
struct Movetext {
    text: String,
    in_comment: bool,
    variation_depth: u32,
}

impl Movetext {
    fn push_line(&mut self, line: &str) {
        for c in line.chars() {
            if self.in_comment {
                if c == '}' {
                    self.in_comment = false;
                }
                continue;
            }
            match c {
                '{' => self.in_comment = true,
                '}' => {}
                ';' => break,
                '(' => self.variation_depth += 1,
                ')' => self.variation_depth = self.variation_depth.saturating_sub(1),
                _ if self.variation_depth == 0 => {
                    self.text.push(c);
                    continue;
                }
                _ => {}
            }
            self.text.push(' ');
        }
        self.text.push(' ');
    }

    fn into_moves(self) -> Vec<String> {
        self.text.split_whitespace().filter_map(move_token).collect()
    }
}

/// Whether a `{` comment is still open at the end of `line`.
fn comment_open_after(line: &str, mut in_comment: bool) -> bool {
    for c in line.chars() {
        match c {
            '}' if in_comment => in_comment = false,
            '{' if !in_comment => in_comment = true,
            ';' if !in_comment => break,
            _ => {}
        }
    }
    in_comment
}

/// Drops move numbers, results, `*` and NAGs; keeps `e4` out of a glued `1.e4`.
fn move_token(token: &str) -> Option<String> {
    let token = if token.starts_with(|c: char| c.is_ascii_digit()) {
        let (_, after) = token.rsplit_once('.')?;
        after
    } else {
        token
    };
    if token.is_empty()
        || token == "*"
        || token.starts_with('$')
        || token.starts_with(|c: char| c.is_ascii_digit())
    {
        return None;
    }
    Some(token.to_string())
}
