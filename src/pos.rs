// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Location of a character in the input of a reader.

/// Both line and col are zero based; Emacs uses 1-based line
/// numbering, so line is incremented by 1 in Display. `col` counts
/// characters, not bytes.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// The position of the character following `c` if `c` is at
    /// `self`.
    pub fn after(self, c: char) -> Pos {
        if c == '\n' {
            Pos { line: self.line + 1, col: 0 }
        } else {
            Pos { line: self.line, col: self.col + 1 }
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        // Prefixed with a path and a space, this follows
        // the Emacs convention for location information.
        f.write_fmt(format_args!("@{}.{}", self.line + 1, self.col))
    }
}

#[cfg(test)]
mod tests {
    use super::Pos;

    #[test]
    fn after_newline_starts_next_line() {
        let p = Pos { line: 2, col: 7 };
        assert_eq!(p.after('x'), Pos { line: 2, col: 8 });
        assert_eq!(p.after('\n'), Pos { line: 3, col: 0 });
        assert_eq!(format!("{}", p), "@3.7");
    }
}
