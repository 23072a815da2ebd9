// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! List operations on [Value](crate::value::Value) pair chains.

pub use crate::value::cons;
use crate::value::Value;

/// The head of a pair, or `Error` for anything else.
pub fn car(v: &Value) -> &Value {
    v.car()
}

/// The tail of a pair, or `Error` for anything else.
pub fn cdr(v: &Value) -> &Value {
    v.cdr()
}

/// Prepend the elements of the proper list `list`, in reverse order,
/// to `tail`, reusing the pairs of `list`. Returns `Error` (and
/// releases everything passed in) if `list` is improper.
pub fn append_reversed(list: Value, tail: Value) -> Value {
    let mut rest = list;
    let mut done = tail;
    loop {
        match rest {
            Value::Nil => return done,
            Value::Cons(mut cell) => {
                rest = cell.set_cdr(done);
                done = Value::Cons(cell);
            }
            _ => return Value::Error,
        }
    }
}

/// Reverse a proper list in place: the existing pairs are relinked,
/// nothing is allocated. `Nil` stays `Nil`; anything that is not a
/// proper list gives `Error`.
pub fn reverse(list: Value) -> Value {
    append_reversed(list, Value::Nil)
}

/// Release a value and everything it owns. Same as dropping it.
pub fn free(v: Value) {
    drop(v)
}

/// Number of elements of a proper list; `None` for improper lists
/// and non-lists.
pub fn length(v: &Value) -> Option<usize> {
    let mut n = 0;
    let mut cur = v;
    loop {
        match cur {
            Value::Nil => return Some(n),
            Value::Cons(c) => {
                n += 1;
                cur = c.cdr();
            }
            _ => return None,
        }
    }
}

/// Iterate over the elements of a list. Stops at the first tail
/// that is not a pair (see [Iter::tail](Iter::tail)).
pub fn iter(v: &Value) -> Iter<'_> {
    Iter { current: v }
}

pub struct Iter<'a> {
    current: &'a Value,
}

impl<'a> Iter<'a> {
    /// What remains: `Nil` after a proper list has been exhausted,
    /// the improper tail otherwise.
    pub fn tail(&self) -> &'a Value {
        self.current
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match self.current {
            Value::Cons(c) => {
                self.current = c.cdr();
                Some(c.car())
            }
            _ => None,
        }
    }
}

impl Value {
    pub fn iter(&self) -> Iter<'_> {
        iter(self)
    }
}

/// Build a proper list by prepending and reversing once.
impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(items: I) -> Value {
        let mut reversed = Value::Nil;
        for item in items {
            reversed = cons(item, reversed);
        }
        reverse(reversed)
    }
}

/// Easily create a proper list
pub fn list(items: Vec<Value>) -> Value {
    items.into_iter().collect()
}
