// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runtime data types representing an S-expression value.

//! A [Value](Value) is either one of the two payload-less sentinels
//! `Nil` and `Error`, an atom (`Symbol` or `String`), or a `Cons`
//! pair. Lists are chains of pairs terminated by `Nil`; every pair
//! exclusively owns its `car` and `cdr`, so there is no sharing and
//! no cycles. Dropping a value releases the whole tree.

use crate::settings::DEFAULT_SETTINGS;
use crate::write::{write_value, FmtSink};
use kstring::KString;
use std::mem::take;

/// The discriminant of a [Value](Value), without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Nil,
    Error,
    Cons,
    Symbol,
    String,
}

#[derive(Debug, Default)]
pub enum Value {
    /// The empty list.
    #[default]
    Nil,
    /// Result of a failed operation (syntax error, misuse).
    Error,
    Cons(Box<Cons>),
    Symbol(KString),
    String(KString),
}

/// A pair; owned by the `Value::Cons` holding it.
#[derive(Debug)]
pub struct Cons {
    pub(crate) car: Value,
    pub(crate) cdr: Value,
}

/// Shared `Error` returned by reference from accessors applied to
/// the wrong kind of value.
pub(crate) static ERROR: Value = Value::Error;

impl Cons {
    pub fn car(&self) -> &Value {
        &self.car
    }

    pub fn cdr(&self) -> &Value {
        &self.cdr
    }

    pub fn car_mut(&mut self) -> &mut Value {
        &mut self.car
    }

    pub fn cdr_mut(&mut self) -> &mut Value {
        &mut self.cdr
    }

    /// Replace the cdr, returning the old one.
    pub fn set_cdr(&mut self, cdr: Value) -> Value {
        std::mem::replace(&mut self.cdr, cdr)
    }
}

// Release nested pairs with an explicit stack instead of the
// recursion the compiler would generate, so that long lists (and
// deeply nested ones) don't overflow the call stack. Every pair
// handed to `drop` at the end of the loop body has `Nil` for both
// fields by then.
impl Drop for Cons {
    fn drop(&mut self) {
        let mut pending: Vec<Box<Cons>> = Vec::new();
        for v in [take(&mut self.car), take(&mut self.cdr)] {
            if let Value::Cons(c) = v {
                pending.push(c);
            }
        }
        while let Some(mut c) = pending.pop() {
            for v in [take(&mut c.car), take(&mut c.cdr)] {
                if let Value::Cons(inner) = v {
                    pending.push(inner);
                }
            }
        }
    }
}

impl Value {
    pub fn tag(&self) -> Tag {
        match self {
            Value::Nil => Tag::Nil,
            Value::Error => Tag::Error,
            Value::Cons(_) => Tag::Cons,
            Value::Symbol(_) => Tag::Symbol,
            Value::String(_) => Tag::String,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error)
    }

    pub fn is_cons(&self) -> bool {
        matches!(self, Value::Cons(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Value::Symbol(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Symbols and strings.
    pub fn is_atom(&self) -> bool {
        matches!(self, Value::Symbol(_) | Value::String(_))
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_cons(&self) -> Option<&Cons> {
        match self {
            Value::Cons(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_cons_mut(&mut self) -> Option<&mut Cons> {
        match self {
            Value::Cons(c) => Some(c),
            _ => None,
        }
    }

    /// The head of a pair, or `Error` for anything else.
    pub fn car(&self) -> &Value {
        match self {
            Value::Cons(c) => &c.car,
            _ => &ERROR,
        }
    }

    /// The tail of a pair, or `Error` for anything else.
    pub fn cdr(&self) -> &Value {
        match self {
            Value::Cons(c) => &c.cdr,
            _ => &ERROR,
        }
    }

    /// Take a pair apart. Gives back `self` unchanged if it is not a
    /// pair.
    pub fn into_pair(self) -> Result<(Value, Value), Value> {
        match self {
            Value::Cons(mut c) => Ok((take(&mut c.car), take(&mut c.cdr))),
            v => Err(v),
        }
    }
}

/// The empty list.
pub fn nil() -> Value {
    Value::Nil
}

/// The error sentinel.
pub fn error() -> Value {
    Value::Error
}

/// Easily create a symbol
pub fn symbol(s: &str) -> Value {
    Value::Symbol(KString::from_ref(s))
}

/// Create a string atom (written with surrounding double quotes).
pub fn string(s: &str) -> Value {
    Value::String(KString::from_ref(s))
}

/// Allocate a pair, taking ownership of both halves.
pub fn cons(car: Value, cdr: Value) -> Value {
    Value::Cons(Box::new(Cons { car, cdr }))
}

/// `(quote v)`, what the reader makes of `'v`.
pub fn quote(v: Value) -> Value {
    cons(symbol("quote"), cons(v, Value::Nil))
}

pub fn tag_of(v: &Value) -> Tag {
    v.tag()
}

// Structural equality. Walks pairs with an explicit stack.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            match (a, b) {
                (Value::Cons(x), Value::Cons(y)) => {
                    pending.push((&x.cdr, &y.cdr));
                    pending.push((&x.car, &y.car));
                }
                (Value::Nil, Value::Nil) => {}
                (Value::Error, Value::Error) => {}
                (Value::Symbol(x), Value::Symbol(y)) => {
                    if x != y {
                        return false
                    }
                }
                (Value::String(x), Value::String(y)) => {
                    if x != y {
                        return false
                    }
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Value {}

// Work items for cloning without recursion.
enum CloneStep<'v> {
    Visit(&'v Value),
    // Pop the cloned cdr, then the car, and pair them.
    Pair,
}

// Deep copy; long and deeply nested trees alike use the heap-allocated
// work stack, not the call stack.
impl Clone for Value {
    fn clone(&self) -> Self {
        let mut todo = vec![CloneStep::Visit(self)];
        let mut done: Vec<Value> = Vec::new();
        while let Some(step) = todo.pop() {
            match step {
                CloneStep::Visit(v) => match v {
                    Value::Nil => done.push(Value::Nil),
                    Value::Error => done.push(Value::Error),
                    Value::Symbol(s) => done.push(Value::Symbol(s.clone())),
                    Value::String(s) => done.push(Value::String(s.clone())),
                    Value::Cons(c) => {
                        todo.push(CloneStep::Pair);
                        todo.push(CloneStep::Visit(&c.cdr));
                        todo.push(CloneStep::Visit(&c.car));
                    }
                },
                CloneStep::Pair => {
                    let cdr = done.pop().unwrap_or_default();
                    let car = done.pop().unwrap_or_default();
                    done.push(cons(car, cdr));
                }
            }
        }
        done.pop().unwrap_or_default()
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        write_value(self, &mut FmtSink(f), &DEFAULT_SETTINGS)
            .map(|_| ())
            .map_err(|_| std::fmt::Error)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        symbol(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::list;

    #[test]
    fn tags_and_predicates() {
        assert_eq!(tag_of(&nil()), Tag::Nil);
        assert_eq!(tag_of(&error()), Tag::Error);
        assert_eq!(tag_of(&symbol("a")), Tag::Symbol);
        assert_eq!(tag_of(&string("a")), Tag::String);
        assert_eq!(tag_of(&cons(nil(), nil())), Tag::Cons);
        assert!(nil().is_nil() && !nil().is_cons() && !nil().is_atom());
        assert!(error().is_error());
        assert!(symbol("x").is_atom() && string("x").is_atom());
        assert_eq!(symbol("abc").as_symbol(), Some("abc"));
        assert_eq!(symbol("abc").as_string(), None);
        assert_eq!(string("abc").as_string(), Some("abc"));
    }

    #[test]
    fn car_cdr_of_non_pairs_are_errors() {
        assert!(nil().car().is_error());
        assert!(nil().cdr().is_error());
        assert!(symbol("a").car().is_error());
        assert!(error().cdr().is_error());
        let p = cons(symbol("a"), symbol("b"));
        assert_eq!(p.car(), &symbol("a"));
        assert_eq!(p.cdr(), &symbol("b"));
    }

    #[test]
    fn into_pair() {
        let (a, d) = cons(symbol("a"), nil()).into_pair().unwrap();
        assert_eq!(a, symbol("a"));
        assert!(d.is_nil());
        assert_eq!(symbol("x").into_pair().unwrap_err(), symbol("x"));
    }

    #[test]
    fn quote_is_a_plain_list() {
        assert_eq!(quote(symbol("x")),
                   list(vec![symbol("quote"), symbol("x")]));
    }

    #[test]
    fn equality_is_structural() {
        assert_eq!(error(), error());
        assert_ne!(symbol("a"), string("a"));
        assert_ne!(list(vec![symbol("a")]), list(vec![symbol("a"), nil()]));
        assert_ne!(cons(symbol("a"), symbol("b")), list(vec![symbol("a"), symbol("b")]));
    }

    #[test]
    fn long_lists_clone_compare_and_drop() {
        let n = 200_000;
        let v: Value = (0..n).map(|_| symbol("x")).collect();
        let w = v.clone();
        assert_eq!(v, w);
        drop(v);
        // Deep nesting in car position.
        let mut deep = nil();
        for _ in 0..n {
            deep = cons(deep, nil());
        }
        let deep2 = deep.clone();
        assert_eq!(deep, deep2);
        assert_eq!(deep2.car().car().car().car().cdr(), &nil());
        drop(deep);
        drop(deep2);
        drop(w);
    }

    #[test]
    fn display() {
        let v = list(vec![symbol("a"), string("b c"), nil(), error()]);
        assert_eq!(format!("{}", v), "(a \"b c\" () <error>)");
    }
}
