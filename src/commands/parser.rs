//! Command line parser.
//!
//! Turns raw text into an argument vector:
//! - Words are separated by unescaped whitespace outside double quotes
//! - Double-quoted regions may span several lines
//! - Outside quotes, a backslash escapes the next character; an escaped
//!   newline (or a trailing backslash) continues the command on the next line
//! - Inside quotes, C-style escapes are decoded: `\b \t \n \f \r \' \" \\`,
//!   octal `\0`..`\377` and Unicode `\uXXXX` (any number of `u`s)
//!
//! Input that ends inside a quoted region, an escape, or after a trailing
//! backslash is not an error: the parser reports [`ParseOutcome::NeedsMore`]
//! and the caller appends the next line (joined with `\n`) and reparses the
//! whole buffer.

use crate::error::{ConsoleError, Result};

/// Result of parsing a (possibly partial) command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The input forms a complete command line.
    Complete(Vec<String>),
    /// The input is incomplete and needs a continuation line.
    NeedsMore,
}

impl ParseOutcome {
    /// Returns the tokens if the command line is complete.
    pub fn into_tokens(self) -> Option<Vec<String>> {
        match self {
            Self::Complete(tokens) => Some(tokens),
            Self::NeedsMore => None,
        }
    }

    /// Returns true if a continuation line is required.
    pub fn needs_more(&self) -> bool {
        matches!(self, Self::NeedsMore)
    }
}

/// Splits command lines into arguments.
pub trait CommandLineParser: Send + Sync {
    /// Parses the accumulated command text.
    ///
    /// Returns [`ConsoleError::Parse`] for grammar violations, carrying the
    /// character offset of the offending sequence.
    fn parse(&self, line: &str) -> Result<ParseOutcome>;
}

/// The default [`CommandLineParser`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleParser;

impl CommandLineParser for SimpleParser {
    fn parse(&self, line: &str) -> Result<ParseOutcome> {
        parse_command_line(line)
    }
}

/// Parses a command line with the default grammar.
pub fn parse_command_line(line: &str) -> Result<ParseOutcome> {
    Scanner::new(line).run()
}

/// Outcome of scanning a single escape sequence.
enum Step {
    Char(char),
    NeedsMore,
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    fn new(line: &str) -> Self {
        Self {
            chars: line.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn run(mut self) -> Result<ParseOutcome> {
        let mut args = Vec::new();
        // None while searching for the start of the next word
        let mut word: Option<String> = None;
        let mut in_quote = false;

        while let Some(c) = self.next() {
            if in_quote {
                match c {
                    '"' => in_quote = false,
                    '\\' => {
                        let start = self.pos - 1;
                        match self.quoted_escape(start)? {
                            Step::Char(decoded) => word.get_or_insert_with(String::new).push(decoded),
                            Step::NeedsMore => return Ok(ParseOutcome::NeedsMore),
                        }
                    }
                    _ => word.get_or_insert_with(String::new).push(c),
                }
                continue;
            }

            match c {
                '"' => {
                    word.get_or_insert_with(String::new);
                    in_quote = true;
                }
                '\\' => {
                    let Some(escaped) = self.next() else {
                        return Ok(ParseOutcome::NeedsMore);
                    };
                    if escaped == '\n' {
                        // Line continuation separates words like any whitespace
                        if let Some(done) = word.take() {
                            args.push(done);
                        }
                    } else {
                        word.get_or_insert_with(String::new).push(escaped);
                    }
                }
                c if c.is_whitespace() => {
                    if let Some(done) = word.take() {
                        args.push(done);
                    }
                }
                _ => word.get_or_insert_with(String::new).push(c),
            }
        }

        if in_quote {
            return Ok(ParseOutcome::NeedsMore);
        }
        if let Some(done) = word {
            args.push(done);
        }
        Ok(ParseOutcome::Complete(args))
    }

    /// Decodes the escape whose backslash sits at `start`.
    fn quoted_escape(&mut self, start: usize) -> Result<Step> {
        let Some(c) = self.next() else {
            return Ok(Step::NeedsMore);
        };
        let simple = match c {
            'b' => Some('\u{8}'),
            't' => Some('\t'),
            'n' => Some('\n'),
            'f' => Some('\u{c}'),
            'r' => Some('\r'),
            '\'' | '"' | '\\' => Some(c),
            _ => None,
        };
        if let Some(decoded) = simple {
            return Ok(Step::Char(decoded));
        }
        if let Some(first) = c.to_digit(8) {
            return self.octal_escape(start, first);
        }
        if c == 'u' {
            return self.unicode_escape(start);
        }
        Err(ConsoleError::parse(start, "invalid backslash escape"))
    }

    /// Up to three octal digits, the third only when the value stays within one byte.
    fn octal_escape(&mut self, start: usize, first: u32) -> Result<Step> {
        let max_digits = if first <= 3 { 3 } else { 2 };
        let mut value = first;
        for _ in 1..max_digits {
            match self.peek() {
                None => return Ok(Step::NeedsMore),
                Some('"') => return Err(ConsoleError::parse(start, "truncated octal escape")),
                Some(c) => match c.to_digit(8) {
                    Some(digit) => {
                        self.pos += 1;
                        value = (value << 3) | digit;
                    }
                    None => break,
                },
            }
        }
        // value <= 0o377
        Ok(Step::Char(char::from(value as u8)))
    }

    fn unicode_escape(&mut self, start: usize) -> Result<Step> {
        let unit = match self.hex_quad(start)? {
            Some(unit) => unit,
            None => return Ok(Step::NeedsMore),
        };
        if !(0xD800..0xDC00).contains(&unit) {
            return char::from_u32(unit)
                .map(Step::Char)
                .ok_or_else(|| ConsoleError::parse(start, "unpaired surrogate in Unicode escape"));
        }

        // High surrogate: must be followed by an escaped low surrogate
        match (self.next(), self.next()) {
            (Some('\\'), Some('u')) => {}
            (None, _) | (Some('\\'), None) => return Ok(Step::NeedsMore),
            _ => return Err(ConsoleError::parse(start, "unpaired surrogate in Unicode escape")),
        }
        let low_start = self.pos - 2;
        let low = match self.hex_quad(low_start)? {
            Some(low) => low,
            None => return Ok(Step::NeedsMore),
        };
        if !(0xDC00..0xE000).contains(&low) {
            return Err(ConsoleError::parse(start, "unpaired surrogate in Unicode escape"));
        }
        let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
        char::from_u32(combined)
            .map(Step::Char)
            .ok_or_else(|| ConsoleError::parse(start, "invalid Unicode escape"))
    }

    /// Reads `u*XXXX` after the first `u`. `Ok(None)` means input ran out.
    fn hex_quad(&mut self, start: usize) -> Result<Option<u32>> {
        let mut value = 0u32;
        let mut digits = 0;
        while digits < 4 {
            let Some(c) = self.next() else {
                return Ok(None);
            };
            if c == '"' {
                return Err(ConsoleError::parse(start, "truncated Unicode escape"));
            }
            if digits == 0 && c == 'u' {
                continue;
            }
            let hex = c
                .to_digit(16)
                .ok_or_else(|| ConsoleError::parse(start, "invalid Unicode escape"))?;
            value = (value << 4) | hex;
            digits += 1;
        }
        Ok(Some(value))
    }
}
