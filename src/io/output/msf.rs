//! GCG multiple sequence format

use std::io;

use crate::error::SeqoutResult;
use crate::io::checksum::{gcg_checksum, gcg_checksum_sum};
use crate::io::{LineFormat, SeqSnapshot};
use crate::seq::Date;

use super::{FormatWriter, WriteContext};

const WIDTH: usize = 50;

pub struct MsfWriter;

fn dotted(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&c| if matches!(c, b'-' | b'~' | b' ') { b'.' } else { c })
        .collect()
}

impl FormatWriter for MsfWriter {
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
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let residues: Vec<_> = seqs.iter().map(|s| dotted(&s.seq)).collect();
        let len = residues.iter().map(|r| r.len()).max().unwrap_or(0);
        let nucleotide = seqs.iter().all(|s| s.is_nucleotide());
        let (kind, code) = if nucleotide { ("NA", 'N') } else { ("AA", 'P') };
        let name_width = seqs
            .iter()
            .map(|s| s.name_or_default().len())
            .max()
            .unwrap_or(0)
            .max(10);
        let today = Date::today();

        writeln!(out, "!!{}_MULTIPLE_ALIGNMENT 1.0", kind)?;
        writeln!(out)?;
        writeln!(
            out,
            "  {}  MSF: {}  Type: {}  {:02}/{:02}/{:02}  CompCheck: {:>4} ..",
            ctx.file_name,
            len,
            code,
            today.day,
            today.month,
            today.year % 100,
            gcg_checksum_sum(residues.iter().map(|r| r.as_slice()))
        )?;
        writeln!(out)?;
        for (seq, r) in seqs.iter().zip(&residues) {
            writeln!(
                out,
                "  Name: {:<name_width$}  Len: {:>6}  Check: {:>4}  Weight: 1.00",
                seq.name_or_default(),
                r.len(),
                gcg_checksum(r),
            )?;
        }
        writeln!(out)?;
        writeln!(out, "//")?;

        let layout = LineFormat::new(WIDTH).blocks(10).name_left(name_width + 1);
        let mut start = 0;
        while start < len {
            let end = (start + WIDTH).min(len);
            writeln!(out)?;
            // position ruler
            let n = end - start;
            let cols = n + (n - 1) / 10;
            let (first, last) = ((start + 1).to_string(), end.to_string());
            write!(out, "{:w$}", "", w = name_width + 2)?;
            if cols > first.len() + last.len() {
                writeln!(out, "{}{:>w$}", first, last, w = cols - first.len())?;
            } else {
                writeln!(out, "{}", first)?;
            }
            for (seq, r) in seqs.iter().zip(&residues) {
                let e = end.min(r.len());
                layout.write_line(out, seq.name_or_default(), &r[start.min(e)..e], start + 1)?;
            }
            start = end;
        }
        Ok(())
    }
}
