//! Alignment formats. The sequences arrive together (padded to the same
//! length) and are written either interleaved, in blocks of residues
//! across all sequences, or one after the other.

use std::io;

use crate::error::SeqoutResult;
use crate::io::{LineFormat, SeqSnapshot};
use crate::seq::SeqType;

use super::sam::PROGRAM;
use super::{FormatWriter, WriteContext};

const WIDTH: usize = 50;

/// Writes blocks of `layout.width` residues, one line per sequence and
/// block. `name` gives the name column for sequence `i` in block `b`,
/// `between` is written before every block but the first.
fn interleave<F>(
    out: &mut dyn io::Write,
    seqs: &[SeqSnapshot],
    layout: &LineFormat,
    between: &str,
    name: F,
) -> io::Result<()>
where
    F: Fn(usize, usize) -> String,
{
    let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
    let width = layout.width.max(1);
    for (b, start) in (0..len).step_by(width).enumerate() {
        if b > 0 {
            out.write_all(between.as_bytes())?;
        }
        for (i, seq) in seqs.iter().enumerate() {
            let end = (start + width).min(seq.len());
            layout.write_line(out, &name(b, i), &seq.seq[start.min(end)..end], start + 1)?;
        }
    }
    Ok(())
}

fn max_name_len(seqs: &[SeqSnapshot]) -> usize {
    seqs.iter()
        .map(|s| s.name_or_default().len())
        .max()
        .unwrap_or(0)
}

fn truncate(name: &str, len: usize) -> String {
    name.chars().take(len).collect()
}

/// Implements [`FormatWriter::write`] for writers that only handle sets
macro_rules! set_writer {
    ($t:ty) => {
        impl FormatWriter for $t {
            fn write(
                &mut self,
                seq: &SeqSnapshot,
                out: &mut dyn io::Write,
                ctx: &mut WriteContext,
            ) -> SeqoutResult<()> {
                self.write_set(std::slice::from_ref(seq), out, ctx)
            }

            fn write_set(
                &mut self,
                seqs: &[SeqSnapshot],
                out: &mut dyn io::Write,
                _ctx: &mut WriteContext,
            ) -> SeqoutResult<()> {
                self.write_alignment(seqs, out)?;
                Ok(())
            }
        }
    };
}

/// Clustal W `.aln`, with a conservation line below every block
pub struct ClustalWriter;

set_writer!(ClustalWriter);

impl ClustalWriter {
    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "CLUSTAL W (1.83) multiple sequence alignment")?;
        writeln!(out)?;
        writeln!(out)?;
        let layout = LineFormat::new(WIDTH).name_left(15);
        let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
        for start in (0..len).step_by(WIDTH) {
            let end = (start + WIDTH).min(len);
            for seq in seqs {
                let e = end.min(seq.len());
                let name = truncate(seq.name_or_default(), 15);
                layout.write_line(out, &name, &seq.seq[start.min(e)..e], start + 1)?;
            }
            // '*' where all residues are identical
            let marks: String = (start..end)
                .map(|i| {
                    let mut column = seqs.iter().map(|s| s.seq.get(i).map(u8::to_ascii_uppercase));
                    let first = column.next().flatten();
                    if first.is_some_and(|c| c != b'-') && column.all(|o| o == first) {
                        '*'
                    } else {
                        ' '
                    }
                })
                .collect();
            writeln!(out, "{:16}{}", "", marks)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

/// PHYLIP 3 with names truncated to 10 characters, interleaved or
/// sequential
pub struct PhylipWriter {
    interleaved: bool,
}

impl PhylipWriter {
    pub fn new(interleaved: bool) -> Self {
        Self { interleaved }
    }

    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
        writeln!(out, " {} {}", seqs.len(), len)?;
        let layout = LineFormat::new(WIDTH).blocks(10).name_left(10);
        if self.interleaved {
            interleave(out, seqs, &layout, "\n", |b, i| {
                if b == 0 {
                    truncate(seqs[i].name_or_default(), 10)
                } else {
                    String::new()
                }
            })?;
        } else {
            for seq in seqs {
                let name = truncate(seq.name_or_default(), 10);
                for (b, chunk) in seq.seq.chunks(WIDTH).enumerate() {
                    let name = if b == 0 { name.as_str() } else { "" };
                    layout.write_line(out, name, chunk, b * WIDTH + 1)?;
                }
            }
        }
        Ok(())
    }
}

set_writer!(PhylipWriter);

/// NEXUS data block, interleaved or not
pub struct NexusWriter {
    interleaved: bool,
}

impl NexusWriter {
    pub fn new(interleaved: bool) -> Self {
        Self { interleaved }
    }

    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
        let datatype = match seqs.first().map(|s| s.seqtype) {
            Some(SeqType::Protein) => "protein",
            Some(SeqType::Rna) => "RNA",
            _ => "DNA",
        };
        let missing = if datatype == "protein" { 'X' } else { 'N' };
        writeln!(out, "#NEXUS")?;
        writeln!(
            out,
            "[TITLE: Written by {} {}]",
            PROGRAM,
            env!("CARGO_PKG_VERSION")
        )?;
        writeln!(out)?;
        writeln!(out, "begin data;")?;
        writeln!(out, "dimensions ntax={} nchar={};", seqs.len(), len)?;
        let interleave_kw = if self.interleaved { "interleave " } else { "" };
        writeln!(
            out,
            "format {}datatype={} missing={} gap=-;",
            interleave_kw, datatype, missing
        )?;
        writeln!(out)?;
        writeln!(out, "matrix")?;
        let width = max_name_len(seqs) + 1;
        let layout = LineFormat::new(WIDTH).blocks(10).name_left(width);
        if self.interleaved {
            interleave(out, seqs, &layout, "\n", |_, i| {
                seqs[i].name_or_default().to_string()
            })?;
        } else {
            for seq in seqs {
                for (b, chunk) in seq.seq.chunks(WIDTH).enumerate() {
                    let name = if b == 0 { seq.name_or_default() } else { "" };
                    layout.write_line(out, name, chunk, b * WIDTH + 1)?;
                }
            }
        }
        writeln!(out, ";")?;
        writeln!(out)?;
        writeln!(out, "end;")?;
        Ok(())
    }
}

set_writer!(NexusWriter);

/// SELEX alignment: name column and residues with `.` gaps, blocks
/// separated by blank lines
pub struct SelexWriter;

impl SelexWriter {
    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        let layout = LineFormat::new(WIDTH)
            .name_left(max_name_len(seqs))
            .gap(b'.');
        interleave(out, seqs, &layout, "\n", |_, i| {
            seqs[i].name_or_default().to_string()
        })
    }
}

set_writer!(SelexWriter);

/// MEGA alignment with `#name` labels
pub struct MegaWriter {
    interleaved: bool,
}

impl MegaWriter {
    pub fn new(interleaved: bool) -> Self {
        Self { interleaved }
    }

    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "#mega")?;
        writeln!(out, "TITLE: Written by {} {}", PROGRAM, env!("CARGO_PKG_VERSION"))?;
        writeln!(out)?;
        if self.interleaved {
            let layout = LineFormat::new(WIDTH)
                .blocks(10)
                .name_left(max_name_len(seqs) + 1);
            interleave(out, seqs, &layout, "\n", |_, i| {
                format!("#{}", seqs[i].name_or_default())
            })?;
        } else {
            let layout = LineFormat::new(WIDTH).blocks(10);
            for seq in seqs {
                writeln!(out, "#{}", seq.name_or_default())?;
                layout.write(out, "", &seq.seq)?;
            }
        }
        Ok(())
    }
}

set_writer!(MegaWriter);

/// Hennig86 `xread` matrix, nucleotides coded as 0-3
pub struct Hennig86Writer;

fn hennig_code(c: u8) -> u8 {
    match c.to_ascii_uppercase() {
        b'A' => b'0',
        b'C' => b'1',
        b'G' => b'2',
        b'T' | b'U' => b'3',
        b'-' | b'.' | b'~' => b'-',
        _ => b'?',
    }
}

impl Hennig86Writer {
    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
        writeln!(out, "xread")?;
        writeln!(out, "'Written by {} {}'", PROGRAM, env!("CARGO_PKG_VERSION"))?;
        writeln!(out, "{} {}", len, seqs.len())?;
        let layout = LineFormat::new(WIDTH);
        for seq in seqs {
            writeln!(out, "{}", seq.name_or_default())?;
            let coded: Vec<u8> = if seq.is_nucleotide() {
                seq.seq.iter().map(|&c| hennig_code(c)).collect()
            } else {
                seq.seq.clone()
            };
            layout.write(out, "", &coded)?;
        }
        writeln!(out, ";")?;
        Ok(())
    }
}

set_writer!(Hennig86Writer);

/// Jackknifer input: every sequence enclosed in parentheses
pub struct JackknifeWriter {
    interleaved: bool,
}

impl JackknifeWriter {
    pub fn new(interleaved: bool) -> Self {
        Self { interleaved }
    }

    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "' Written by {} {}", PROGRAM, env!("CARGO_PKG_VERSION"))?;
        let width = max_name_len(seqs).max(14) + 1;
        if self.interleaved {
            let layout = LineFormat::new(WIDTH).name_left(width).prefix("(");
            let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
            for start in (0..len).step_by(WIDTH) {
                for seq in seqs {
                    let end = (start + WIDTH).min(seq.len());
                    let mut line = Vec::new();
                    layout.write_line(
                        &mut line,
                        seq.name_or_default(),
                        &seq.seq[start.min(end)..end],
                        start + 1,
                    )?;
                    line.pop();
                    line.extend_from_slice(b")\n");
                    out.write_all(&line)?;
                }
                writeln!(out)?;
            }
        } else {
            let layout = LineFormat::new(WIDTH);
            for seq in seqs {
                writeln!(out, "({}", seq.name_or_default())?;
                layout.write(out, "", &seq.seq)?;
                writeln!(out, ")")?;
            }
        }
        writeln!(out, ";")?;
        Ok(())
    }
}

set_writer!(JackknifeWriter);

/// TreeCon: alignment length, then name and residues on one line each
pub struct TreeconWriter;

impl TreeconWriter {
    fn write_alignment(&self, seqs: &[SeqSnapshot], out: &mut dyn io::Write) -> io::Result<()> {
        let len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
        writeln!(out, "{}", len)?;
        for seq in seqs {
            writeln!(out, "{}", seq.name_or_default())?;
            out.write_all(&seq.seq)?;
            writeln!(out)?;
        }
        Ok(())
    }
}

set_writer!(TreeconWriter);
