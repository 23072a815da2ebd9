// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for both reading (parsing) and writing (serializing)
//! data.

/// Which parts of the grammar are enabled. A disabled feature's
/// introducing character (`;`, `"`, `'`) becomes an ordinary symbol
/// character.
#[derive(Debug)]
pub struct Format {
    /// `;` starts a comment running to the end of the line.
    pub comments: bool,
    /// `"` delimits string atoms.
    pub strings: bool,
    /// `'x` reads as `(quote x)`.
    pub quote: bool,
}

pub const FULL_FORMAT : Format = Format {
    comments: true,
    strings: true,
    quote: true,
};

/// Symbols and lists only.
pub const BARE_FORMAT : Format = Format {
    comments: false,
    strings: false,
    quote: false,
};

/// What to do with symbol or string tokens longer than
/// `Modes::max_token_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    /// Report `TokenTooLong`.
    Reject,
    /// Silently drop the characters beyond the limit.
    Truncate,
}

#[derive(Debug)]
pub struct Modes {
    /// Maximum number of characters in a symbol or string.
    pub max_token_len: usize,
    pub overflow: Overflow,
    /// Maximum nesting of lists and quotes while reading.
    pub max_depth: u32,
    /// Escape `"` and `\` inside strings when writing, so that
    /// reading the output gives back the same string. Off by
    /// default: strings are written verbatim between the quotes.
    pub escape_strings: bool,
}

pub const DEFAULT_MODES : Modes = Modes {
    max_token_len: 256,
    overflow: Overflow::Reject,
    max_depth: 500,
    // ^ the limit with default settings on Linux is around 1200
    escape_strings: false,
};

/// Cut over-long tokens instead of failing.
pub const COMPAT_MODES : Modes = Modes {
    overflow: Overflow::Truncate,
    ..DEFAULT_MODES
};

#[derive(Debug, Clone, Copy)]
pub struct Settings<'t> {
    pub format: &'t Format,
    pub modes: &'t Modes,
}

pub const DEFAULT_SETTINGS : Settings<'static> = Settings {
    format: &FULL_FORMAT,
    modes: &DEFAULT_MODES,
};

impl Default for Settings<'static> {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}
