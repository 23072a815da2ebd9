// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Character sources the reader pulls from.

//! A source offers exactly one character of lookahead: `current`
//! returns it (or `None` once the input is exhausted) and `advance`
//! moves on. The reader is generic over [CharSource](CharSource)
//! and knows nothing about files, strings or sockets.

use anyhow::anyhow;
use std::io::{self, Read};
use utf8::BufReadDecoder;

pub trait CharSource {
    /// The character under the cursor; `None` at end of input.
    fn current(&self) -> Option<char>;
    /// Move to the next character. No-op at end of input.
    fn advance(&mut self);
    /// If the input ended because of a failure (I/O, decoding),
    /// hand out that failure. Called by the reader once it sees the
    /// end.
    fn take_failure(&mut self) -> Option<anyhow::Error> {
        None
    }
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn current(&self) -> Option<char> {
        (**self).current()
    }
    fn advance(&mut self) {
        (**self).advance()
    }
    fn take_failure(&mut self) -> Option<anyhow::Error> {
        (**self).take_failure()
    }
}


/// Reads from a borrowed string slice without copying it.
#[derive(Debug, Clone)]
pub struct StrSource<'s> {
    text: &'s str,
    cursor: usize,
}

impl<'s> StrSource<'s> {
    pub fn new(text: &'s str) -> Self {
        StrSource { text, cursor: 0 }
    }

    /// Byte offset of the current character.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    /// The not yet consumed part of the input.
    pub fn remaining(&self) -> &'s str {
        &self.text[self.cursor..]
    }
}

impl<'s> CharSource for StrSource<'s> {
    fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }
    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.cursor += c.len_utf8();
        }
    }
}


/// Adapts an opaque handle plus a function fetching the next
/// character from it. `fetch` is never called again after it
/// returned `None`.
pub struct FnSource<H, F> {
    handle: H,
    fetch: F,
    current: Option<char>,
}

impl<H, F> FnSource<H, F>
    where F: FnMut(&mut H) -> Option<char>
{
    /// Fetches the first character right away.
    pub fn new(mut handle: H, mut fetch: F) -> Self {
        let current = fetch(&mut handle);
        FnSource { handle, fetch, current }
    }

    pub fn into_handle(self) -> H {
        self.handle
    }
}

impl<H, F> CharSource for FnSource<H, F>
    where F: FnMut(&mut H) -> Option<char>
{
    fn current(&self) -> Option<char> {
        self.current
    }
    fn advance(&mut self) {
        if self.current.is_some() {
            self.current = (self.fetch)(&mut self.handle);
        }
    }
}


/// Decodes UTF-8 from anything implementing `Read`, buffered. An
/// I/O error or invalid UTF-8 ends the input; the error is then
/// available through `take_failure`.
pub struct ReadSource<R: Read> {
    decoder: BufReadDecoder<io::BufReader<R>>,
    chunk: String,
    offset: usize,
    current: Option<char>,
    failure: Option<anyhow::Error>,
}

impl<R: Read> ReadSource<R> {
    pub fn new(fh: R) -> Self {
        let mut s = ReadSource {
            decoder: BufReadDecoder::new(io::BufReader::new(fh)),
            chunk: String::new(),
            offset: 0,
            current: None,
            failure: None,
        };
        s.current = s.fetch();
        s
    }

    fn fetch(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.chunk[self.offset..].chars().next() {
                self.offset += c.len_utf8();
                return Some(c)
            }
            match self.decoder.next_strict() {
                None => return None,
                Some(Ok(s)) => {
                    self.chunk.clear();
                    self.chunk.push_str(s);
                    self.offset = 0;
                }
                Some(Err(e)) => {
                    self.failure = Some(anyhow!("read_source: {}", e));
                    return None
                }
            }
        }
    }
}

impl<R: Read> CharSource for ReadSource<R> {
    fn current(&self) -> Option<char> {
        self.current
    }
    fn advance(&mut self) {
        if self.current.is_some() {
            self.current = self.fetch();
        }
    }
    fn take_failure(&mut self) -> Option<anyhow::Error> {
        self.failure.take()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn drain(mut s: impl CharSource) -> String {
        let mut out = String::new();
        while let Some(c) = s.current() {
            out.push(c);
            s.advance();
        }
        // Stays at the end.
        s.advance();
        assert_eq!(s.current(), None);
        out
    }

    #[test]
    fn str_source() {
        let mut s = StrSource::new("aé(");
        assert_eq!(s.current(), Some('a'));
        s.advance();
        assert_eq!(s.current(), Some('é'));
        assert_eq!(s.offset(), 1);
        s.advance();
        assert_eq!(s.remaining(), "(");
        assert_eq!(drain(s), "(");
    }

    #[test]
    fn fn_source_stops_polling_at_end() {
        let calls = std::cell::Cell::new(0);
        let src = FnSource::new("xy".chars(), |cs: &mut std::str::Chars<'_>| {
            calls.set(calls.get() + 1);
            cs.next()
        });
        assert_eq!(drain(src), "xy");
        // 'x', 'y', then the one `None`.
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn read_source() {
        let input: &[u8] = "(λ x)\n".as_bytes();
        assert_eq!(drain(ReadSource::new(input)), "(λ x)\n");
    }

    #[test]
    fn read_source_invalid_utf8() {
        let input: &[u8] = b"ab\xff";
        let mut s = ReadSource::new(input);
        let mut out = String::new();
        while let Some(c) = s.current() {
            out.push(c);
            s.advance();
        }
        assert_eq!(out, "ab");
        assert!(s.take_failure().is_some());
        assert!(s.take_failure().is_none());
    }
}
