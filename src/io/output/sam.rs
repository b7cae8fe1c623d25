use std::io;

use crate::error::SeqoutResult;
use crate::io::{QualFormat, SeqSnapshot};

use super::{FormatWriter, WriteContext};

pub const PROGRAM: &str = "seqout";

/// Header lines written once at the start of SAM (and BAM) output
pub fn sam_header() -> String {
    format!(
        "@HD\tVN:1.3\tSO:unsorted\n@PG\tID:{}\tPN:{}\tVN:{}\n",
        PROGRAM,
        PROGRAM,
        env!("CARGO_PKG_VERSION")
    )
}

/// Unaligned reads in SAM format
#[derive(Default)]
pub struct SamWriter {
    header_written: bool,
    qual: Vec<u8>,
}

impl FormatWriter for SamWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        if !self.header_written {
            out.write_all(sam_header().as_bytes())?;
            self.header_written = true;
        }
        out.write_all(seq.name_or_default().as_bytes())?;
        out.write_all(b"\t4\t*\t0\t0\t*\t*\t0\t0\t")?;
        if seq.is_empty() {
            out.write_all(b"*\t*\n")?;
            return Ok(());
        }
        out.write_all(&seq.seq)?;
        out.write_all(b"\t")?;
        self.qual.clear();
        QualFormat::Sanger.encode_all(seq.accuracy.as_deref(), seq.len(), &mut self.qual);
        out.write_all(&self.qual)?;
        writeln!(out)?;
        Ok(())
    }
}
