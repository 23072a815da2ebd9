// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The lexical layer of the reader: skipping whitespace and comments
//! and scanning symbol and string atoms, with one character of
//! lookahead from a [CharSource](crate::source::CharSource). See
//! [read](../read/index.html) for building trees.

use crate::pos::Pos;
use crate::settings::{Overflow, Settings};
use crate::source::CharSource;
use kstring::KString;
use log::warn;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error ({0}) after")]
    IOError(anyhow::Error),
    #[error("unexpected EOF in string starting")]
    UnexpectedEOFInString,
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("token longer than {0} characters starting")]
    TokenTooLong(usize),
    #[error("out of memory while reading token starting")]
    OutOfMemory,
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ParseErrorWithPos {
    pub err: ParseError,
    pub pos: Pos
}

impl ParseError {
    pub(crate) fn at(self, p: Pos) -> ParseErrorWithPos {
        ParseErrorWithPos {
            err: self,
            pos: p
        }
    }
}

/// Characters besides alphanumerics that may appear in symbols.
const SYMBOL_PUNCTUATION: &str = "!$%&*+-./:<=>?@^_~|";

/// Whether `c` can be part of a symbol under the given format.
pub fn is_symbol_char(settings: &Settings, c: char) -> bool {
    if c.is_alphanumeric() || SYMBOL_PUNCTUATION.contains(c) {
        return true
    }
    let format = settings.format;
    (c == ';' && !format.comments)
        || (c == '"' && !format.strings)
        || (c == '\'' && !format.quote)
}

/// A character source with position tracking and a reusable token
/// buffer.
pub struct Scanner<'s, S> {
    source: S,
    settings: Settings<'s>,
    pos: Pos,
    tmp: String,
}

impl<'s, S: CharSource> Scanner<'s, S> {
    pub fn new(source: S, settings: Settings<'s>) -> Self {
        Scanner {
            source,
            settings,
            pos: Pos::default(),
            tmp: String::new(),
        }
    }

    pub fn settings(&self) -> Settings<'s> {
        self.settings
    }

    /// Position of the current character.
    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.source.current()
    }

    /// Step over the current character. Does not touch the source at
    /// end of input.
    pub fn bump(&mut self) {
        if let Some(c) = self.source.current() {
            self.source.advance();
            self.pos = self.pos.after(c);
        }
    }

    pub fn into_source(self) -> S {
        self.source
    }

    // At end of input: turn a failure of the source into an error.
    fn check_end(&mut self) -> Result<(), ParseErrorWithPos> {
        match self.source.take_failure() {
            Some(e) => Err(ParseError::IOError(e).at(self.pos)),
            None => Ok(())
        }
    }

    /// Skip whitespace and comments; returns the next significant
    /// character without consuming it, or `None` at end of input.
    pub fn skip_atmosphere(&mut self) -> Result<Option<char>, ParseErrorWithPos> {
        loop {
            match self.peek() {
                None => {
                    self.check_end()?;
                    return Ok(None)
                }
                Some(';') if self.settings.format.comments => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break
                        }
                        self.bump();
                    }
                }
                Some(c) if c.is_whitespace() => self.bump(),
                Some(c) => return Ok(Some(c))
            }
        }
    }

    fn start_token(&mut self) {
        self.tmp.clear();
    }

    // Returns false if the character had to be dropped.
    fn push_token_char(&mut self, c: char, startpos: Pos, len: &mut usize)
                       -> Result<bool, ParseErrorWithPos> {
        if *len >= self.settings.modes.max_token_len {
            return Ok(false)
        }
        self.tmp.try_reserve(c.len_utf8())
            .map_err(|_| ParseError::OutOfMemory.at(startpos))?;
        self.tmp.push(c);
        *len += 1;
        Ok(true)
    }

    fn finish_token(&mut self, overflowed: bool, startpos: Pos)
                    -> Result<KString, ParseErrorWithPos> {
        if overflowed {
            let max = self.settings.modes.max_token_len;
            match self.settings.modes.overflow {
                Overflow::Reject =>
                    return Err(ParseError::TokenTooLong(max).at(startpos)),
                Overflow::Truncate =>
                    warn!("token truncated to {} characters {}", max, startpos),
            }
        }
        Ok(KString::from_ref(&self.tmp))
    }

    /// Scan a symbol starting at the current character, which must
    /// be a symbol character.
    pub fn symbol(&mut self) -> Result<KString, ParseErrorWithPos> {
        let startpos = self.pos;
        let settings = self.settings;
        let mut len = 0;
        let mut overflowed = false;
        self.start_token();
        while let Some(c) = self.peek() {
            if !is_symbol_char(&settings, c) {
                break
            }
            if !self.push_token_char(c, startpos, &mut len)? {
                overflowed = true;
            }
            self.bump();
        }
        if self.peek().is_none() {
            self.check_end()?;
        }
        self.finish_token(overflowed, startpos)
    }

    /// Scan a string; the current character must be the opening
    /// `"`. `\"` and `\\` are escapes, any other backslash is kept
    /// as is.
    pub fn string(&mut self) -> Result<KString, ParseErrorWithPos> {
        let startpos = self.pos;
        let mut len = 0;
        let mut overflowed = false;
        self.start_token();
        self.bump();
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    self.check_end()?;
                    return Err(ParseError::UnexpectedEOFInString.at(startpos))
                }
            };
            self.bump();
            let c = match c {
                '"' => return self.finish_token(overflowed, startpos),
                '\\' => match self.peek() {
                    Some(e @ ('"' | '\\')) => {
                        self.bump();
                        e
                    }
                    _ => c,
                },
                _ => c,
            };
            if !self.push_token_char(c, startpos, &mut len)? {
                overflowed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{
        Format, Modes, BARE_FORMAT, COMPAT_MODES, DEFAULT_MODES, DEFAULT_SETTINGS, FULL_FORMAT
    };
    use crate::source::StrSource;

    fn scanner<'s>(s: &'s str, settings: Settings<'s>) -> Scanner<'s, StrSource<'s>> {
        Scanner::new(StrSource::new(s), settings)
    }

    #[test]
    fn symbol_chars() {
        let d = DEFAULT_SETTINGS;
        for c in "az09AZ!$%&*+-./:<=>?@^_~|é".chars() {
            assert!(is_symbol_char(&d, c), "{:?}", c);
        }
        for c in "()[]{}; \t\n\"'#,`\\".chars() {
            assert!(!is_symbol_char(&d, c), "{:?}", c);
        }
        let bare = Settings { format: &BARE_FORMAT, modes: &DEFAULT_MODES };
        for c in ";\"'".chars() {
            assert!(is_symbol_char(&bare, c), "{:?}", c);
        }
    }

    #[test]
    fn atmosphere() {
        let mut s = scanner("  ; comment (\n\t x", DEFAULT_SETTINGS);
        assert_eq!(s.skip_atmosphere().unwrap(), Some('x'));
        assert_eq!(s.pos(), Pos { line: 1, col: 2 });
        s.bump();
        assert_eq!(s.skip_atmosphere().unwrap(), None);

        let nocomments = Format { comments: false, ..FULL_FORMAT };
        let settings = Settings { format: &nocomments, modes: &DEFAULT_MODES };
        let mut s = scanner("  ;x", settings);
        assert_eq!(s.skip_atmosphere().unwrap(), Some(';'));
        assert_eq!(s.symbol().unwrap().as_str(), ";x");
    }

    #[test]
    fn symbols_stop_at_delimiters() {
        let mut s = scanner("a1020|x|3a)b", DEFAULT_SETTINGS);
        assert_eq!(s.symbol().unwrap().as_str(), "a1020|x|3a");
        assert_eq!(s.peek(), Some(')'));
    }

    #[test]
    fn strings_and_escapes() {
        let mut s = scanner(r#""a \"b\" \\ \n""#, DEFAULT_SETTINGS);
        assert_eq!(s.string().unwrap().as_str(), r#"a "b" \ \n"#);
        assert_eq!(s.peek(), None);
        let mut s = scanner("\"multi\nline\"x", DEFAULT_SETTINGS);
        assert_eq!(s.string().unwrap().as_str(), "multi\nline");
        assert_eq!(s.peek(), Some('x'));
        assert_eq!(s.pos(), Pos { line: 1, col: 5 });
    }

    #[test]
    fn unterminated_string() {
        let mut s = scanner("\n  \"abc\\\"", DEFAULT_SETTINGS);
        s.skip_atmosphere().unwrap();
        let e = s.string().unwrap_err();
        assert!(matches!(e.err, ParseError::UnexpectedEOFInString));
        assert_eq!(e.pos, Pos { line: 1, col: 2 });
    }

    #[test]
    fn token_limit() {
        let short = Modes { max_token_len: 3, ..DEFAULT_MODES };
        let settings = Settings { format: &FULL_FORMAT, modes: &short };
        let mut s = scanner("abc abcd \"abcde\"", settings);
        assert_eq!(s.symbol().unwrap().as_str(), "abc");
        s.skip_atmosphere().unwrap();
        let e = s.symbol().unwrap_err();
        assert!(matches!(e.err, ParseError::TokenTooLong(3)));
        // The rest of the token was consumed.
        assert_eq!(s.skip_atmosphere().unwrap(), Some('"'));
        assert!(s.string().is_err());
        assert_eq!(s.skip_atmosphere().unwrap(), None);

        let truncating = Modes { max_token_len: 3, ..COMPAT_MODES };
        let settings = Settings { format: &FULL_FORMAT, modes: &truncating };
        let mut s = scanner("abcd \"abcde\"", settings);
        assert_eq!(s.symbol().unwrap().as_str(), "abc");
        s.skip_atmosphere().unwrap();
        assert_eq!(s.string().unwrap().as_str(), "abc");
    }
}
