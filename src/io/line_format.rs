//! Renders sequence bodies as fixed-width lines, optionally split into
//! blocks and decorated with position numbers and names.
//!
//! Most flat-file formats only differ in the parameters of the layout:
//!
//! ```text
//! EMBL     "     acgtacgtac acgtacgtac ...        60"   (right numbers)
//! GenBank  "        1 acgtacgtac acgtacgtac ..."        (left numbers)
//! GCG      "       1  ACGTACGTAC ACGTACGTAC ..."        (blank line before each)
//! ```

use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Numbering {
    #[default]
    None,
    /// Position of the first residue, before the sequence
    Left,
    /// Position of the last residue, after the sequence
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameColumn {
    #[default]
    None,
    /// Left-aligned name in a column of the given width
    Left(usize),
    /// Name after the sequence, separated by a space
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    #[default]
    AsIs,
    Lower,
    Upper,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    /// Residues per line (0 = everything on one line)
    pub width: usize,
    /// Insert a space every `block` residues (0 = contiguous)
    pub block: usize,
    /// Spaces before the sequence
    pub indent: usize,
    /// Written at the start of every line
    pub prefix: &'static str,
    pub numbers: Numbering,
    pub num_width: usize,
    /// Between a left number and the sequence, or the sequence and a right number
    pub num_sep: &'static str,
    pub name: NameColumn,
    /// Replacement for the gap characters `-`, `.` and `~`
    pub gap: Option<u8>,
    pub case: Case,
    pub blank_before: bool,
    pub blank_after: bool,
    /// Terminator written on its own line after the body
    pub end: &'static str,
    /// Number of the first residue
    pub start: usize,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new(60)
    }
}

impl LineFormat {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            block: 0,
            indent: 0,
            prefix: "",
            numbers: Numbering::None,
            num_width: 0,
            num_sep: "",
            name: NameColumn::None,
            gap: None,
            case: Case::AsIs,
            blank_before: false,
            blank_after: false,
            end: "",
            start: 1,
        }
    }

    pub fn blocks(mut self, block: usize) -> Self {
        self.block = block;
        self
    }

    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn prefix(mut self, prefix: &'static str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn number_left(mut self, width: usize, sep: &'static str) -> Self {
        self.numbers = Numbering::Left;
        self.num_width = width;
        self.num_sep = sep;
        self
    }

    pub fn number_right(mut self, width: usize, sep: &'static str) -> Self {
        self.numbers = Numbering::Right;
        self.num_width = width;
        self.num_sep = sep;
        self
    }

    pub fn name_left(mut self, width: usize) -> Self {
        self.name = NameColumn::Left(width);
        self
    }

    pub fn name_right(mut self) -> Self {
        self.name = NameColumn::Right;
        self
    }

    pub fn gap(mut self, gap: u8) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn case(mut self, case: Case) -> Self {
        self.case = case;
        self
    }

    pub fn blank_before(mut self) -> Self {
        self.blank_before = true;
        self
    }

    pub fn blank_after(mut self) -> Self {
        self.blank_after = true;
        self
    }

    pub fn end(mut self, end: &'static str) -> Self {
        self.end = end;
        self
    }

    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Width of the sequence part of a full line, including block spaces
    pub fn line_len(&self) -> usize {
        if self.block > 0 && self.width > 0 {
            self.width + (self.width - 1) / self.block
        } else {
            self.width
        }
    }

    #[inline]
    fn convert(&self, c: u8) -> u8 {
        let c = match self.gap {
            Some(g) if matches!(c, b'-' | b'.' | b'~') => g,
            _ => c,
        };
        match self.case {
            Case::AsIs => c,
            Case::Lower => c.to_ascii_lowercase(),
            Case::Upper => c.to_ascii_uppercase(),
        }
    }

    /// Writes a single line with `chunk`, whose first residue has the
    /// number `pos`.
    pub fn write_line(
        &self,
        out: &mut dyn io::Write,
        name: &str,
        chunk: &[u8],
        pos: usize,
    ) -> io::Result<()> {
        let mut line = Vec::with_capacity(self.line_len() + self.indent + 32);
        if self.blank_before {
            out.write_all(b"\n")?;
        }
        line.extend_from_slice(self.prefix.as_bytes());
        if let NameColumn::Left(w) = self.name {
            line.extend_from_slice(format!("{:<w$} ", name).as_bytes());
        }
        if self.numbers == Numbering::Left {
            let w = self.num_width;
            line.extend_from_slice(format!("{:>w$}{}", pos, self.num_sep).as_bytes());
        }
        line.extend(std::iter::repeat(b' ').take(self.indent));
        let seq_start = line.len();
        for (i, &c) in chunk.iter().enumerate() {
            if self.block > 0 && i > 0 && i % self.block == 0 {
                line.push(b' ');
            }
            line.push(self.convert(c));
        }
        // short lines are padded if something follows the sequence
        if self.numbers == Numbering::Right || self.name == NameColumn::Right {
            let written = line.len() - seq_start;
            line.extend(std::iter::repeat(b' ').take(self.line_len().saturating_sub(written)));
        }
        if self.numbers == Numbering::Right {
            let w = self.num_width;
            let last = pos + chunk.len().saturating_sub(1);
            line.extend_from_slice(format!("{}{:>w$}", self.num_sep, last).as_bytes());
        }
        if self.name == NameColumn::Right {
            line.push(b' ');
            line.extend_from_slice(name.as_bytes());
        }
        line.push(b'\n');
        out.write_all(&line)?;
        if self.blank_after {
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Writes the whole sequence followed by the terminator.
    /// Returns the number of body lines, which is zero for an empty sequence.
    pub fn write(&self, out: &mut dyn io::Write, name: &str, seq: &[u8]) -> io::Result<usize> {
        let width = if self.width == 0 {
            seq.len().max(1)
        } else {
            self.width
        };
        let mut lines = 0;
        for (i, chunk) in seq.chunks(width).enumerate() {
            self.write_line(out, name, chunk, self.start + i * width)?;
            lines += 1;
        }
        if !self.end.is_empty() {
            out.write_all(self.end.as_bytes())?;
            out.write_all(b"\n")?;
        }
        Ok(lines)
    }
}
