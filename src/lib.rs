// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A minimal S-Expression engine:
//!
//! * [value](value): `Nil`, `Error`, `Cons` pairs, `Symbol` and
//!   `String` atoms. Every pair owns its two halves; dropping a value
//!   (or passing it to [list::free](list::free)) releases the whole
//!   tree.
//!
//! * [read](read): a recursive descent reader pulling characters
//!   from any [source::CharSource](source::CharSource) (strings,
//!   `io::Read` implementors, or a handle plus fetch function).
//!   Quoting sugar `'x` reads as `(quote x)`; `;` starts a line
//!   comment.
//!
//! * [write](write): the inverse, pushing characters into any
//!   [write::CharSink](write::CharSink).
//!
//! * [list](list): `car`, `cdr`, in-place `reverse` and friends.
//!
//! There are no numbers, no dotted pair syntax, and no evaluator.
//! Strings are written back without escaping by default (see
//! `settings::Modes::escape_strings`), thus a string containing a
//! double quote does not survive a write/read round trip unless that
//! mode is enabled.
//!
//! ```
//! use anysexp::read::parse;
//! use anysexp::list::reverse;
//!
//! let v = parse("(a 'b \"c\")");
//! assert_eq!(v.to_string(), "(a (quote b) \"c\")");
//! assert_eq!(reverse(v).to_string(), "(\"c\" (quote b) a)");
//! ```

pub mod context;
pub mod list;
pub mod parse;
pub mod pos;
pub mod read;
pub mod settings;
pub mod source;
pub mod value;
pub mod write;
