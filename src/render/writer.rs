// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Indentation-aware buffer of generated source lines.

use std::fmt::Write as _;

/// Width of a single indentation level.
const INDENT: &str = "    ";

/// Buffer of generated source code.
#[derive(Clone, Debug, Default)]
pub(crate) struct Writer {
    /// Code written so far.
    out: String,

    /// Current indentation level.
    depth: usize,
}

impl Writer {
    /// Creates a new empty [`Writer`] at the given indentation `depth`.
    pub(crate) fn new(depth: usize) -> Self {
        Self { out: String::new(), depth }
    }

    /// Writes a single indented `line`.
    pub(crate) fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        let line = line.as_ref();
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
        }
        _ = writeln!(self.out, "{line}");
        self
    }

    /// Writes an empty line, unless the last one is empty already or a block
    /// has just been opened.
    pub(crate) fn blank(&mut self) -> &mut Self {
        if !(self.out.is_empty() || self.out.ends_with("\n\n") || self.out.ends_with("{\n")) {
            self.out.push('\n');
        }
        self
    }

    /// Writes the `header` line of a block and indents the following ones.
    pub(crate) fn open(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.line(header);
        self.depth += 1;
        self
    }

    /// Indents the following lines.
    pub(crate) fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    /// Unindents and writes the `footer` line of a block.
    pub(crate) fn close(&mut self, footer: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(footer)
    }

    /// Returns the code written so far.
    pub(crate) fn finish(self) -> String {
        self.out
    }
}
