//! GFF version 2 and 3. The sequences themselves are embedded: as `##`
//! comment blocks in GFF2, in the trailing `##FASTA` section in GFF3.

use std::fs::File;
use std::io::{self, Seek, Write};

use seq_io::fasta;

use crate::error::SeqoutResult;
use crate::io::SeqSnapshot;
use crate::seq::{Date, SeqType};

use super::fasta::FASTA_WIDTH;
use super::sam::PROGRAM;
use super::{FormatWriter, WriteContext};

/// Size of the in-memory `##FASTA` buffer before records are moved to a
/// temporary file
const SPILL_SIZE: usize = 1 << 24;

pub struct GffWriter {
    version: u8,
    header_written: bool,
    // GFF3: records of the ##FASTA section not yet in `spill`
    fasta: Vec<u8>,
    spill: Option<io::BufWriter<File>>,
    spill_size: usize,
}

impl GffWriter {
    pub fn new(version: u8) -> Self {
        Self {
            version,
            header_written: false,
            fasta: Vec::new(),
            spill: None,
            spill_size: SPILL_SIZE,
        }
    }

    fn add_fasta(&mut self, name: &str, seq: &[u8]) -> io::Result<()> {
        fasta::write_head(&mut self.fasta, name.as_bytes())?;
        fasta::write_wrap_seq(&mut self.fasta, seq, FASTA_WIDTH)?;
        if self.fasta.len() > self.spill_size {
            if self.spill.is_none() {
                log::debug!("Moving the GFF3 ##FASTA section to a temporary file");
                self.spill = Some(io::BufWriter::new(tempfile::tempfile()?));
            }
            if let Some(spill) = self.spill.as_mut() {
                spill.write_all(&self.fasta)?;
            }
            self.fasta.clear();
        }
        Ok(())
    }

    fn write_header(&mut self, out: &mut dyn io::Write) -> io::Result<()> {
        let date = Date::today().iso();
        let program = format!("{} {}", PROGRAM, env!("CARGO_PKG_VERSION"));
        if self.version == 3 {
            writeln!(out, "##gff-version 3")?;
            writeln!(out, "#!Date {}", date)?;
            writeln!(out, "#!Source-version {}", program)?;
        } else {
            writeln!(out, "##gff-version 2")?;
            writeln!(out, "##source-version {}", program)?;
            writeln!(out, "##date {}", date)?;
        }
        self.header_written = true;
        Ok(())
    }
}

fn type_name(seqtype: SeqType) -> &'static str {
    match seqtype {
        SeqType::Protein => "Protein",
        SeqType::Rna => "RNA",
        _ => "DNA",
    }
}

impl FormatWriter for GffWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        if !self.header_written {
            self.write_header(out)?;
        }
        let name = seq.name_or_default();
        let seqtype = type_name(seq.seqtype);
        if self.version == 3 {
            writeln!(out, "##sequence-region {} 1 {}", name, seq.len())?;
            writeln!(out, "#!Type {}", seqtype)?;
            ctx.write_features(seq, "gff3", "", out)?;
            self.add_fasta(name, &seq.seq)?;
        } else {
            writeln!(out, "##Type {} {}", seqtype, name)?;
            writeln!(out, "##{} {}", seqtype, name)?;
            for line in seq.seq.chunks(FASTA_WIDTH) {
                out.write_all(b"##")?;
                out.write_all(line)?;
                writeln!(out)?;
            }
            writeln!(out, "##end-{}", seqtype)?;
            ctx.write_features(seq, "gff2", "", out)?;
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn io::Write, _ctx: &mut WriteContext) -> SeqoutResult<()> {
        if self.fasta.is_empty() && self.spill.is_none() {
            return Ok(());
        }
        writeln!(out, "##FASTA")?;
        if let Some(spill) = self.spill.take() {
            let mut f = spill.into_inner().map_err(|e| e.into_error())?;
            f.rewind()?;
            io::copy(&mut f, out)?;
        }
        out.write_all(&self.fasta)?;
        self.fasta.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::Seq;

    fn render(version: u8, seqs: &[Seq]) -> Vec<String> {
        let mut w = GffWriter::new(version);
        let mut out = vec![];
        let mut ctx = WriteContext::default();
        for seq in seqs {
            let snap = SeqSnapshot::new(seq, &SeqFormat::Gff3.info());
            w.write(&snap, &mut out, &mut ctx).unwrap();
        }
        w.finish(&mut out, &mut ctx).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn gff3() {
        let lines = render(3, &[Seq::new("s1", b"ACGT"), Seq::new("s2", b"GGCC")]);
        assert_eq!(lines[0], "##gff-version 3");
        assert!(lines[1].starts_with("#!Date "));
        assert_eq!(
            &lines[3..],
            [
                "##sequence-region s1 1 4",
                "#!Type DNA",
                "##sequence-region s2 1 4",
                "#!Type DNA",
                "##FASTA",
                ">s1",
                "ACGT",
                ">s2",
                "GGCC",
            ]
        );
    }

    #[test]
    fn gff3_spill() {
        let seqs: Vec<_> = (0..5)
            .map(|i| Seq::new(&format!("s{}", i), &vec![b'A'; 100]))
            .collect();
        let mut w = GffWriter::new(3);
        w.spill_size = 150;
        let mut out = vec![];
        let mut ctx = WriteContext::default();
        for seq in &seqs {
            let snap = SeqSnapshot::new(seq, &SeqFormat::Gff3.info());
            w.write(&snap, &mut out, &mut ctx).unwrap();
        }
        assert!(w.spill.is_some());
        // the last record is still in memory
        assert_eq!(w.fasta.len(), 4 + 61 + 41);
        w.finish(&mut out, &mut ctx).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(render(3, &seqs), lines);
    }

    #[test]
    fn gff2() {
        let lines = render(2, &[Seq::new("s1", b"ACGT")]);
        assert_eq!(lines[0], "##gff-version 2");
        assert_eq!(
            &lines[3..],
            ["##Type DNA s1", "##DNA s1", "##ACGT", "##end-DNA"]
        );
    }
}
