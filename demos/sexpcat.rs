// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use anysexp::list::free;
use anysexp::read::Reader;
use anysexp::settings::{Format, Modes, Settings, COMPAT_MODES, DEFAULT_MODES};
use anysexp::source::ReadSource;
use anysexp::write::{write_value, CharSink, IoSink};
use clap::Parser as ClapParser;
use std::io::{stdout, BufWriter};
use std::path::PathBuf;
use anyhow::{Result, bail};

#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Escape '"' and '\' in strings on output
    #[clap(short, long, value_parser)]
    escape: bool,
    /// Cut over-long tokens instead of failing
    #[clap(short, long, value_parser)]
    truncate: bool,
    /// Maximum token length
    #[clap(long, value_parser, default_value_t = 256)]
    max_token_len: usize,
    /// Treat ';' as a symbol character
    #[clap(long, value_parser)]
    no_comments: bool,
    /// Treat '"' as a symbol character
    #[clap(long, value_parser)]
    no_strings: bool,
    /// Treat '\'' as a symbol character
    #[clap(long, value_parser)]
    no_quote: bool,
    /// Path to the input file
    #[clap(value_parser, required(true))]
    input_path: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let format = Format {
        comments: !args.no_comments,
        strings: !args.no_strings,
        quote: !args.no_quote,
    };
    let base = if args.truncate { COMPAT_MODES } else { DEFAULT_MODES };
    let modes = Modes {
        max_token_len: args.max_token_len,
        escape_strings: args.escape,
        ..base
    };
    let settings = Settings { format: &format, modes: &modes };

    let fh = std::fs::File::open(&args.input_path)?;
    let mut reader = Reader::new(ReadSource::new(fh), settings);
    let mut out = IoSink::new(BufWriter::new(stdout()));
    let mut count = 0;
    loop {
        match reader.try_read() {
            Ok(Some(v)) => {
                write_value(&v, &mut out, &settings)?;
                out.put('\n')?;
                free(v);
                count += 1;
            }
            Ok(None) => break,
            Err(e) => {
                out.flush()?;
                bail!("{}: {}", args.input_path.display(), e)
            }
        }
    }
    out.flush()?;
    eprintln!(";; count_toplevel = {count}");
    Ok(())
}
