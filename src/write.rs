// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Serializing values, one character at a time, into a
//! [CharSink](CharSink).

use crate::settings::Settings;
use crate::value::Value;
use anyhow::anyhow;
use std::fmt::Write as _;
use std::io;
use thiserror::Error;

/// Text written for `Value::Error`.
pub const ERROR_PLACEHOLDER: &str = "<error>";

pub trait CharSink {
    /// Accept one character, or fail (e.g. closed output).
    fn put(&mut self, c: char) -> anyhow::Result<()>;
}

impl<S: CharSink + ?Sized> CharSink for &mut S {
    fn put(&mut self, c: char) -> anyhow::Result<()> {
        (**self).put(c)
    }
}

impl CharSink for String {
    fn put(&mut self, c: char) -> anyhow::Result<()> {
        self.push(c);
        Ok(())
    }
}

/// Adapts an opaque handle plus a function putting one character
/// into it.
pub struct FnSink<H, F> {
    handle: H,
    put: F,
}

impl<H, F> FnSink<H, F>
    where F: FnMut(&mut H, char) -> anyhow::Result<()>
{
    pub fn new(handle: H, put: F) -> Self {
        FnSink { handle, put }
    }

    pub fn into_handle(self) -> H {
        self.handle
    }
}

impl<H, F> CharSink for FnSink<H, F>
    where F: FnMut(&mut H, char) -> anyhow::Result<()>
{
    fn put(&mut self, c: char) -> anyhow::Result<()> {
        (self.put)(&mut self.handle, c)
    }
}

/// UTF-8 encodes into anything implementing `io::Write`. Wrap
/// unbuffered outputs in a `BufWriter`.
pub struct IoSink<W: io::Write> {
    out: W,
}

impl<W: io::Write> IoSink<W> {
    pub fn new(out: W) -> Self {
        IoSink { out }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> CharSink for IoSink<W> {
    fn put(&mut self, c: char) -> anyhow::Result<()> {
        let mut buf = [0; 4];
        self.out.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        Ok(())
    }
}

/// Bridge to `std::fmt`, used by `Display for Value`.
pub(crate) struct FmtSink<'a, 'b>(pub &'a mut std::fmt::Formatter<'b>);

impl<'a, 'b> CharSink for FmtSink<'a, 'b> {
    fn put(&mut self, c: char) -> anyhow::Result<()> {
        self.0.write_char(c).map_err(|_| anyhow!("formatter error"))
    }
}


#[derive(Error, Debug)]
pub enum WriteError {
    #[error("sink failed after {written} characters: {err}")]
    Sink {
        /// Characters accepted before the failure.
        written: usize,
        err: anyhow::Error,
    },
}

impl WriteError {
    pub fn written(&self) -> usize {
        match self {
            WriteError::Sink { written, .. } => *written,
        }
    }
}

// Counts accepted characters and stops at the first failure.
struct Counting<'a, S: ?Sized> {
    sink: &'a mut S,
    written: usize,
    escape_strings: bool,
}

impl<'a, S: CharSink + ?Sized> Counting<'a, S> {
    fn put(&mut self, c: char) -> Result<(), WriteError> {
        match self.sink.put(c) {
            Ok(()) => {
                self.written += 1;
                Ok(())
            }
            Err(err) => Err(WriteError::Sink { written: self.written, err }),
        }
    }

    fn put_str(&mut self, s: &str) -> Result<(), WriteError> {
        for c in s.chars() {
            self.put(c)?;
        }
        Ok(())
    }

    fn string(&mut self, s: &str) -> Result<(), WriteError> {
        self.put('"')?;
        for c in s.chars() {
            if self.escape_strings && (c == '"' || c == '\\') {
                self.put('\\')?;
            }
            self.put(c)?;
        }
        self.put('"')
    }
}

// Stands for the end of a dotted list after its tail.
static CLOSE: Value = Value::Nil;

/// Write `v` to `sink`, returning the number of characters written.
/// Stops at the first character the sink refuses.
pub fn write_value<S: CharSink + ?Sized>(
    v: &Value,
    sink: &mut S,
    settings: &Settings,
) -> Result<usize, WriteError> {
    let mut w = Counting {
        sink,
        written: 0,
        escape_strings: settings.modes.escape_strings,
    };
    // Tails of the lists we are in, innermost last.
    let mut tails: Vec<&Value> = Vec::new();
    let mut next = Some(v);
    loop {
        if let Some(v) = next.take() {
            match v {
                Value::Cons(c) => {
                    w.put('(')?;
                    tails.push(c.cdr());
                    next = Some(c.car());
                    continue;
                }
                Value::Nil => w.put_str("()")?,
                Value::Error => w.put_str(ERROR_PLACEHOLDER)?,
                Value::Symbol(s) => w.put_str(s)?,
                Value::String(s) => w.string(s)?,
            }
        }
        match tails.pop() {
            None => return Ok(w.written),
            Some(Value::Cons(c)) => {
                w.put(' ')?;
                tails.push(c.cdr());
                next = Some(c.car());
            }
            Some(Value::Nil) => w.put(')')?,
            Some(tail) => {
                w.put_str(" . ")?;
                tails.push(&CLOSE);
                next = Some(tail);
            }
        }
    }
}

pub fn write_to_string(v: &Value, settings: &Settings) -> String {
    let mut out = String::new();
    // Can't fail: `String` accepts everything.
    let _ = write_value(v, &mut out, settings);
    out
}
