//! Splits PGN text into records: the tag pairs plus the movetext tokens that
//! matter for replaying the game. Comments, NAGs, variations and `%` escape
//! lines are dropped here.

use std::io::BufRead;

use crate::pgn::error::ReadError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `12.` for White, `12...` for Black.
    MoveNumber { number: u32, black: bool },
    San(String),
    Result(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub tags: Vec<(String, String)>,
    pub tokens: Vec<Token>,
    /// Line the record starts on, 1-based.
    pub line: usize,
}

/// Reads one record at a time. A record is always consumed in full before
/// any error is reported, so the next call starts at the following game.
pub struct Tokenizer<R> {
    reader: R,
    line: usize,
    pushed_back: Option<String>,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Tokenizer {
            reader,
            line: 0,
            pushed_back: None,
        }
    }

    /// Number of lines read from the underlying source so far.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Returns the next record holding tags or moves. Text made only of
    /// comments between games is consumed without producing a record.
    pub fn next_record(&mut self) -> Result<Option<RawRecord>, ReadError> {
        loop {
            match self.read_record()? {
                Some(record) if record.tags.is_empty() && record.tokens.is_empty() => continue,
                other => return Ok(other),
            }
        }
    }

    fn read_record(&mut self) -> Result<Option<RawRecord>, ReadError> {
        let mut pending = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some(line) if is_skippable(&line) => continue,
                Some(line) => break Some(line),
            }
        };

        let mut record = RawRecord {
            line: self.line,
            ..RawRecord::default()
        };
        let mut tag_error = None;

        while let Some(line) = pending.take() {
            let trimmed = line.trim();
            if trimmed.starts_with('[') {
                let parsed = parse_tag_pairs(trimmed, self.line, &mut record.tags);
                if tag_error.is_none() {
                    tag_error = parsed.err();
                }
            } else if !is_skippable(&line) {
                pending = Some(line);
                break;
            }
            pending = self.next_line()?;
        }

        let mut lexer = Lexer::default();
        while let Some(line) = pending.take() {
            if lexer.is_idle() {
                let trimmed = line.trim();
                if trimmed.is_empty() && !record.tokens.is_empty() {
                    break;
                }
                if trimmed.starts_with('[') {
                    self.pushed_back = Some(line);
                    break;
                }
            }

            if !line.starts_with('%') {
                if let Some(rest) = lexer.feed(&line, self.line, &mut record.tokens) {
                    if !rest.trim().is_empty() {
                        self.pushed_back = Some(rest.to_string());
                    }
                    break;
                }
            }
            pending = self.next_line()?;
        }

        match tag_error.or(lexer.error) {
            Some(err) => Err(err),
            None => Ok(Some(record)),
        }
    }

    fn next_line(&mut self) -> Result<Option<String>, ReadError> {
        if let Some(line) = self.pushed_back.take() {
            return Ok(Some(line));
        }

        let mut buf = String::new();
        if self.reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        if self.line == 1 {
            if let Some(stripped) = buf.strip_prefix('\u{feff}') {
                buf = stripped.to_string();
            }
        }
        let len = buf.trim_end_matches(['\r', '\n']).len();
        buf.truncate(len);

        Ok(Some(buf))
    }
}

fn is_skippable(line: &str) -> bool {
    line.trim().is_empty() || line.starts_with('%')
}

/// Parses one or more `[Key "Value"]` pairs from a single line.
fn parse_tag_pairs(
    text: &str,
    line: usize,
    tags: &mut Vec<(String, String)>,
) -> Result<(), ReadError> {
    let malformed = || ReadError::TagPair {
        line,
        text: text.to_string(),
    };
    let mut chars = text.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => return Ok(()),
            Some('[') => {}
            Some(_) => return Err(malformed()),
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let mut key = String::new();
        while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
            key.push(c);
        }
        if key.is_empty() {
            return Err(malformed());
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some('"') {
            return Err(malformed());
        }

        let mut value = String::new();
        loop {
            match chars.next() {
                Some('"') => break,
                Some('\\') => match chars.next() {
                    Some(c) => value.push(c),
                    None => return Err(malformed()),
                },
                Some(c) => value.push(c),
                None => return Err(malformed()),
            }
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        if chars.next() != Some(']') {
            return Err(malformed());
        }
        tags.push((key, value));
    }
}

#[derive(Debug, Default)]
struct Lexer {
    in_comment: bool,
    variation_depth: u32,
    error: Option<ReadError>,
}

impl Lexer {
    /// Outside any comment or variation.
    fn is_idle(&self) -> bool {
        !self.in_comment && self.variation_depth == 0
    }

    /// Tokenizes one movetext line. Returns the unread remainder once a
    /// result token closes the movetext.
    fn feed<'a>(&mut self, line: &'a str, line_no: usize, tokens: &mut Vec<Token>) -> Option<&'a str> {
        let mut rest = line;

        loop {
            if self.in_comment {
                let end = rest.find('}')?;
                self.in_comment = false;
                rest = &rest[end + 1..];
            }

            rest = rest.trim_start();
            let c = rest.chars().next()?;

            match c {
                '{' => {
                    self.in_comment = true;
                    rest = &rest[1..];
                }
                ';' => return None,
                '(' => {
                    self.variation_depth += 1;
                    rest = &rest[1..];
                }
                ')' => {
                    if self.variation_depth == 0 {
                        self.fail(line_no, "unbalanced ')'");
                    } else {
                        self.variation_depth -= 1;
                    }
                    rest = &rest[1..];
                }
                '}' => {
                    self.fail(line_no, "unbalanced '}'");
                    rest = &rest[1..];
                }
                _ => {
                    let end = rest
                        .find(|c: char| c.is_whitespace() || "{}();".contains(c))
                        .unwrap_or(rest.len());
                    let (word, tail) = rest.split_at(end);
                    rest = tail;

                    if self.variation_depth > 0 || word.starts_with('$') {
                        continue;
                    }
                    if self.push_word(word, line_no, tokens) {
                        return Some(rest);
                    }
                }
            }
        }
    }

    /// Returns true when `word` was a game result.
    fn push_word(&mut self, word: &str, line_no: usize, tokens: &mut Vec<Token>) -> bool {
        if is_result_like(word) {
            tokens.push(Token::Result(word.to_string()));
            return true;
        }

        let digits = word.len() - word.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            if !word.chars().all(|c| c == '.') {
                tokens.push(Token::San(word.to_string()));
            } else if let Some(Token::MoveNumber { black, .. }) = tokens.last_mut() {
                // "3. ... Nf6" marks Black's move just like "3... Nf6".
                *black = true;
            }
            return false;
        }

        let (number, after) = word.split_at(digits);
        let dots = after.len() - after.trim_start_matches('.').len();
        if dots == 0 && !after.is_empty() {
            tokens.push(Token::San(word.to_string()));
            return false;
        }

        match number.parse::<u32>() {
            Ok(number) => tokens.push(Token::MoveNumber {
                number,
                black: dots > 1,
            }),
            Err(_) => {
                self.fail(line_no, format!("move number '{number}' is too large"));
                return false;
            }
        }

        let san = &after[dots..];
        if !san.is_empty() {
            tokens.push(Token::San(san.to_string()));
        }
        false
    }

    fn fail(&mut self, line: usize, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(ReadError::Movetext {
                line,
                message: message.into(),
            });
        }
    }
}

/// Anything shaped like `1-0`, `1/2-1/2` or `*`. Castling written with
/// zeros is excluded.
fn is_result_like(word: &str) -> bool {
    !matches!(word, "0-0" | "0-0-0")
        && word.contains(['-', '*'])
        && word.contains(|c: char| c.is_ascii_digit() || c == '*' || c == '½')
        && word
            .chars()
            .all(|c| matches!(c, '0'..='9' | '/' | '-' | '*' | '½'))
}
