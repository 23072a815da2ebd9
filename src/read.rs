// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building [Value](crate::value::Value) trees from a character
//! source by recursive descent.

use crate::pos::Pos;
use crate::context::{self, Context};
use crate::parse::{is_symbol_char, ParseError, ParseErrorWithPos, Scanner};
use crate::settings::{Settings, DEFAULT_SETTINGS};
use crate::source::{CharSource, ReadSource, StrSource};
use crate::list::reverse;
use crate::value::{cons, quote, Value};
use crate::write::{write_value, CharSink, IoSink};
use log::{debug, trace};
use std::fmt::{Formatter, Display};
use std::io::{Read, Write};
use std::path::Path;
use std::fs::File;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("{0}")]
    PE(ParseError),
    #[error("nesting too deep")]
    NestingTooDeep,
    #[error("unexpected closing character ')'")]
    UnexpectedClosingParen,
    #[error("premature EOF while expecting closing character ')' for '('")]
    PrematureEofExpectingClosingParen,
    #[error("missing item after quote")]
    MissingItemAfterQuote,
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ReadErrorWithPos {
    pub err: ReadError,
    pub pos: Pos
}

impl ReadError {
    fn at(self, p: Pos) -> ReadErrorWithPos {
        ReadErrorWithPos {
            err: self,
            pos: p
        }
    }
}

impl From<ParseErrorWithPos> for ReadErrorWithPos {
    fn from(ep: ParseErrorWithPos) -> ReadErrorWithPos {
        let ParseErrorWithPos { err, pos } = ep;
        ReadErrorWithPos {
            err: ReadError::PE(err),
            pos
        }
    }
}

#[derive(Error, Debug)]
pub struct ReadErrorWithPosContext {
    err_with_pos: ReadErrorWithPos,
    container: Box<dyn Context>
}

impl ReadErrorWithPosContext {
    pub fn err_with_pos(&self) -> &ReadErrorWithPos {
        &self.err_with_pos
    }
}

impl Display for ReadErrorWithPosContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} ",
                                 self.err_with_pos.err))?;
        self.container.format_with_pos(self.err_with_pos.pos, f)?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ReadErrorWithContext {
    #[error("{}: {0}", .1.to_string_without_pos())]
    IO(std::io::Error, Box<dyn Context>)
}

#[derive(Error, Debug)]
pub enum ReadErrorWithLocation {
    #[error("{0}")]
    PC(Box<ReadErrorWithPosContext>),
    #[error("{0}")]
    IO(Box<ReadErrorWithContext>)
}

impl ReadErrorWithLocation {
    fn io_in_file(e: std::io::Error, path: &Path) -> Self {
        ReadErrorWithLocation::IO(Box::new(
            ReadErrorWithContext::IO(
                e,
                Box::new(context::FileContext { path: path.to_path_buf() }))))
    }

    fn in_file(e: ReadErrorWithPos, path: &Path) -> Self {
        ReadErrorWithLocation::PC(
            Box::new(
                ReadErrorWithPosContext {
                    err_with_pos: e,
                    container: Box::new(context::FileContext { path: path.to_path_buf() })
                }))
    }
}


/// Reads one value after another from a character source.
pub struct Reader<'s, S> {
    scanner: Scanner<'s, S>,
    // A failure seen by `at_eof`, handed out by the next read.
    pending: Option<ReadErrorWithPos>,
}

impl<'s, S: CharSource> Reader<'s, S> {
    pub fn new(source: S, settings: Settings<'s>) -> Self {
        Reader { scanner: Scanner::new(source, settings), pending: None }
    }

    /// Position of the next unread character.
    pub fn pos(&self) -> Pos {
        self.scanner.pos()
    }

    pub fn into_source(self) -> S {
        self.scanner.into_source()
    }

    /// Skip whitespace and comments; true if nothing else is left.
    /// If the source failed, returns false and the next read reports
    /// the failure.
    pub fn at_eof(&mut self) -> bool {
        if self.pending.is_some() {
            return false
        }
        match self.scanner.skip_atmosphere() {
            Ok(Some(_)) => false,
            Ok(None) => true,
            Err(e) => {
                self.pending = Some(e.into());
                false
            }
        }
    }

    /// The next value, `Ok(None)` at end of input.
    pub fn try_read(&mut self) -> Result<Option<Value>, ReadErrorWithPos> {
        let r = if let Some(e) = self.pending.take() {
            Err(e)
        } else {
            match self.scanner.skip_atmosphere() {
                Err(e) => Err(ReadErrorWithPos::from(e)),
                Ok(None) => Ok(None),
                Ok(Some(c)) => {
                    let depth_fuel = self.scanner.settings().modes.max_depth;
                    self.read_datum(c, depth_fuel).map(Some)
                }
            }
        };
        match &r {
            Ok(Some(v)) => trace!("read {}", v),
            Ok(None) => {}
            Err(e) => debug!("read error: {}", e),
        }
        r
    }

    /// The next value, or `Error` on a syntax error and at end of
    /// input (check `at_eof` to tell those apart).
    pub fn read(&mut self) -> Value {
        match self.try_read() {
            Ok(Some(v)) => v,
            Ok(None) | Err(_) => Value::Error,
        }
    }

    // Reads the value starting at `c`, the current character as
    // returned by `skip_atmosphere`.
    fn read_datum(&mut self, c: char, depth_fuel: u32) -> Result<Value, ReadErrorWithPos> {
        let pos = self.scanner.pos();
        let settings = self.scanner.settings();
        match c {
            '(' => {
                if depth_fuel == 0 {
                    return Err(ReadError::NestingTooDeep.at(pos))
                }
                self.scanner.bump();
                self.read_list(pos, depth_fuel - 1)
            }
            ')' => {
                self.scanner.bump();
                Err(ReadError::UnexpectedClosingParen.at(pos))
            }
            '\'' if settings.format.quote => {
                if depth_fuel == 0 {
                    return Err(ReadError::NestingTooDeep.at(pos))
                }
                self.scanner.bump();
                match self.scanner.skip_atmosphere()? {
                    Some(c) => Ok(quote(self.read_datum(c, depth_fuel - 1)?)),
                    None => Err(ReadError::MissingItemAfterQuote.at(pos)),
                }
            }
            '"' if settings.format.strings => {
                Ok(Value::String(self.scanner.string()?))
            }
            c if is_symbol_char(&settings, c) => {
                Ok(Value::Symbol(self.scanner.symbol()?))
            }
            c => {
                self.scanner.bump();
                Err(ParseError::UnexpectedChar(c).at(pos).into())
            }
        }
    }

    // After the opening paren at `startpos`. Elements are prepended
    // and the list is reversed once at the end; on error the
    // accumulated elements are dropped with `acc`.
    fn read_list(&mut self, startpos: Pos, depth_fuel: u32)
                 -> Result<Value, ReadErrorWithPos> {
        let mut acc = Value::Nil;
        loop {
            match self.scanner.skip_atmosphere()? {
                None => return Err(
                    ReadError::PrematureEofExpectingClosingParen.at(startpos)),
                Some(')') => {
                    self.scanner.bump();
                    return Ok(reverse(acc))
                }
                Some(c) => {
                    let item = self.read_datum(c, depth_fuel)?;
                    acc = cons(item, acc);
                }
            }
        }
    }
}

impl<'s, S: CharSource> Iterator for Reader<'s, S> {
    type Item = Result<Value, ReadErrorWithPos>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_read().transpose()
    }
}

/// Read the first value in `s`; `Error` if there is none or it is
/// malformed.
pub fn parse(s: &str) -> Value {
    Reader::new(StrSource::new(s), DEFAULT_SETTINGS).read()
}

/// Read all values in `s`.
pub fn read_str(s: &str) -> Result<Vec<Value>, ReadErrorWithPos> {
    Reader::new(StrSource::new(s), DEFAULT_SETTINGS).collect()
}

pub fn read_all(
    fh: impl Read,
) -> Result<Vec<Value>, ReadErrorWithPos>
{
    Reader::new(ReadSource::new(fh), DEFAULT_SETTINGS).collect()
}

pub fn read_file(path: &Path) -> Result<Vec<Value>, ReadErrorWithLocation> {
    let fh = File::open(path)
        .map_err(|e| ReadErrorWithLocation::io_in_file(e, path))?;
    read_all(fh).map_err(|e| ReadErrorWithLocation::in_file(e, path))
}

/// Write each value on a line of its own.
pub fn write_all<'t>(
    out: impl Write,
    vals: impl IntoIterator<Item = &'t Value>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let mut sink = IoSink::new(out);
    for v in vals.into_iter() {
        write_value(v, &mut sink, settings)?;
        sink.put('\n')?;
    }
    sink.flush()?;
    Ok(())
}

pub fn write_file<'t>(path: &Path, vals: impl IntoIterator<Item = &'t Value>)
                      -> anyhow::Result<()> {
    write_all(File::create(path)?, vals, &DEFAULT_SETTINGS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::list;
    use crate::settings::{Modes, DEFAULT_MODES, FULL_FORMAT};
    use crate::value::{nil, string, symbol};

    fn err_of(s: &str) -> ReadErrorWithPos {
        let mut r = Reader::new(StrSource::new(s), DEFAULT_SETTINGS);
        r.try_read().unwrap_err()
    }

    #[test]
    fn lists() {
        assert_eq!(parse("()"), nil());
        assert_eq!(parse("(a)"), list(vec![symbol("a")]));
        assert_eq!(parse("(a b)"), list(vec![symbol("a"), symbol("b")]));
        assert_eq!(parse(" ( a ( b \"c\" ) ( ) ) "),
                   list(vec![symbol("a"),
                             list(vec![symbol("b"), string("c")]),
                             nil()]));
    }

    #[test]
    fn quote_sugar() {
        assert_eq!(parse("'x"), list(vec![symbol("quote"), symbol("x")]));
        assert_eq!(parse("' ; c\n x"), list(vec![symbol("quote"), symbol("x")]));
        assert_eq!(parse("''x"), quote(quote(symbol("x"))));
        assert_eq!(parse("'()"), quote(nil()));
    }

    #[test]
    fn errors() {
        assert!(parse("(a b").is_error());
        let e = err_of("(a b");
        assert!(matches!(e.err, ReadError::PrematureEofExpectingClosingParen));
        assert_eq!(e.pos, Pos { line: 0, col: 0 });
        assert!(matches!(err_of(")").err, ReadError::UnexpectedClosingParen));
        assert!(matches!(err_of("'").err, ReadError::MissingItemAfterQuote));
        assert!(matches!(err_of("(a ')").err, ReadError::UnexpectedClosingParen));
        assert!(matches!(err_of("(a #)").err,
                         ReadError::PE(ParseError::UnexpectedChar('#'))));
        assert!(matches!(err_of("(\"ab").err,
                         ReadError::PE(ParseError::UnexpectedEOFInString)));
        assert!(parse("").is_error());
        assert!(parse("  ; only a comment").is_error());
    }

    #[test]
    fn resumes_after_errors() {
        let mut r = Reader::new(StrSource::new("# a ) b"), DEFAULT_SETTINGS);
        assert!(r.read().is_error());
        assert_eq!(r.read(), symbol("a"));
        assert!(r.read().is_error());
        assert!(!r.at_eof());
        assert_eq!(r.read(), symbol("b"));
        assert!(r.at_eof());
        assert!(r.read().is_error());
    }

    #[test]
    fn nesting_limit() {
        let shallow = Modes { max_depth: 3, ..DEFAULT_MODES };
        let settings = Settings { format: &FULL_FORMAT, modes: &shallow };
        let read = |s: &str| Reader::new(StrSource::new(s), settings).try_read();
        assert!(read("(((a)))").is_ok());
        assert!(matches!(read("((((a))))").unwrap_err().err,
                         ReadError::NestingTooDeep));
        assert!(matches!(read("(('(a)))").unwrap_err().err,
                         ReadError::NestingTooDeep));
        let deep = format!("{}{}", "(".repeat(2000), ")".repeat(2000));
        assert!(parse(&deep).is_error());
    }

    #[test]
    fn iterate() -> anyhow::Result<()> {
        let vals = read_str("a (b) \"c\" ; end")?;
        assert_eq!(vals, vec![symbol("a"), list(vec![symbol("b")]), string("c")]);
        let vals = read_all("x\ny".as_bytes())?;
        assert_eq!(vals, vec![symbol("x"), symbol("y")]);
        Ok(())
    }

    #[test]
    fn error_positions_in_messages() {
        let e = err_of("\n  (a\n   b");
        assert_eq!(e.to_string(),
                   "premature EOF while expecting closing character ')' for '(' @2.2");
    }
}
