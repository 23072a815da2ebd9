// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Where the characters given to a reader came from, for error
//! messages. The position within the input is carried separately.

use crate::pos::Pos;
use std::{path::PathBuf, fmt::{Formatter, Debug, Display}};

pub trait Context : Debug + Send + Sync {
    /// Format location to be put *after* the error reason and a
    /// space, includes "in".
    fn format_with_pos(&self, p: Pos, f: &mut Formatter<'_>)
                       -> Result<(), std::fmt::Error>;
    /// Format location to be put *before* a colon and the error
    /// reason. Does not include the colon.
    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error>;
    /// Same as `format_without_pos` but as a string.
    fn to_string_without_pos(&self) -> String {
        format!("{}", &WithoutPos(self))
    }
}

// Formatter::new is not public, go through Display instead.
struct WithoutPos<'t, T: Context + ?Sized>(&'t T);
impl<'t, T: Context + ?Sized> Display for WithoutPos<'t, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        self.0.format_without_pos(f)
    }
}

/// Input read from a file.
#[derive(Debug)]
pub struct FileContext {
    pub path: PathBuf
}

impl Context for FileContext {
    fn format_with_pos(&self, pos: Pos, f: &mut Formatter<'_>)
                       -> Result<(), std::fmt::Error> {
        write!(f, "in {} {}", self.path.display(), pos)
    }
    fn format_without_pos(&self, f: &mut Formatter<'_>)
                          -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WithPos<'t>(&'t FileContext, Pos);
    impl<'t> Display for WithPos<'t> {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
            self.0.format_with_pos(self.1, f)
        }
    }

    #[test]
    fn file_context() {
        let c = FileContext { path: PathBuf::from("lib/x.scm") };
        assert_eq!(c.to_string_without_pos(), "lib/x.scm");
        assert_eq!(WithPos(&c, Pos { line: 2, col: 7 }).to_string(),
                   "in lib/x.scm @3.7");
    }
}
