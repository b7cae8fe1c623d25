//! Single-entry formats with little or no annotation: a header line or
//! two, followed by the residues.

use std::io;

use crate::error::SeqoutResult;
use crate::io::checksum::gcg_checksum;
use crate::io::{LineFormat, SeqSnapshot};
use crate::seq::SeqType;

use super::sam::PROGRAM;
use super::{FormatWriter, WriteContext};

/// GCG single sequence files with checksum header
pub struct GcgWriter;

impl FormatWriter for GcgWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let body = LineFormat::new(50)
            .blocks(10)
            .number_left(8, "  ")
            .blank_before();
        // gaps are dots, also in the checksum
        let dotted: Vec<u8> = seq
            .seq
            .iter()
            .map(|&c| if matches!(c, b'-' | b'~') { b'.' } else { c })
            .collect();
        let (kind, code) = if seq.is_nucleotide() { ("NA", 'N') } else { ("AA", 'P') };
        writeln!(out, "!!{}_SEQUENCE 1.0", kind)?;
        writeln!(out)?;
        if !seq.desc.is_empty() {
            writeln!(out, "{}", seq.desc)?;
            writeln!(out)?;
        }
        writeln!(
            out,
            "{}  Length: {}  Type: {}  Check: {:>4}  ..",
            seq.name_or_default(),
            seq.len(),
            code,
            gcg_checksum(&dotted)
        )?;
        body.write(out, "", &dotted)?;
        Ok(())
    }
}

/// NBRF / PIR: `>P1;name`, description line, residues terminated by `*`,
/// optionally followed by the feature table
pub struct NbrfWriter;

impl FormatWriter for NbrfWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let code = match (seq.seqtype, seq.circular) {
            (SeqType::Dna, false) => "DL",
            (SeqType::Dna, true) => "DC",
            (SeqType::Rna, false) => "RL",
            (SeqType::Rna, true) => "RC",
            _ => "P1",
        };
        writeln!(out, ">{};{}", code, seq.name_or_default())?;
        writeln!(out, "{}", seq.desc)?;
        LineFormat::new(50)
            .blocks(10)
            .end("*")
            .write(out, "", &seq.seq)?;
        ctx.write_features(seq, "pir", "", out)?;
        Ok(())
    }
}

/// Formats handled by [`SimpleWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Simple {
    Codata,
    Ig,
    Strider,
    Fitch,
    Mase,
    Acedb,
    Staden,
    Text,
    Raw,
    Asn1,
}

pub struct SimpleWriter {
    kind: Simple,
    // entries written to this file (ASN.1 ids, Mase header)
    count: usize,
}

impl SimpleWriter {
    pub fn new(kind: Simple) -> Self {
        Self { kind, count: 0 }
    }
}

impl FormatWriter for SimpleWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let name = seq.name_or_default();
        self.count += 1;
        match self.kind {
            Simple::Codata => {
                writeln!(out, "ENTRY           {}", name)?;
                if !seq.desc.is_empty() {
                    writeln!(out, "TITLE           {}", seq.desc)?;
                }
                writeln!(out, "SEQUENCE")?;
                write!(out, "{:>17}", 5)?;
                for n in (10..=30).step_by(5) {
                    write!(out, "{:>10}", n)?;
                }
                writeln!(out)?;
                LineFormat::new(30)
                    .blocks(1)
                    .number_left(7, " ")
                    .end("///")
                    .write(out, name, &seq.seq)?;
            }
            Simple::Ig => {
                writeln!(out, ";{}", seq.desc)?;
                writeln!(out, "{}", name)?;
                let mut residues = seq.seq.clone();
                residues.push(if seq.circular { b'2' } else { b'1' });
                LineFormat::new(72).write(out, name, &residues)?;
            }
            Simple::Strider => {
                let kind = if seq.seqtype == SeqType::Protein {
                    "protein"
                } else {
                    "DNA"
                };
                writeln!(out, "; ### from DNA Strider ;-)")?;
                writeln!(
                    out,
                    "; {} sequence  {}, {} bases, {:X} checksum.",
                    kind,
                    name,
                    seq.len(),
                    gcg_checksum(&seq.seq)
                )?;
                writeln!(out, ";")?;
                LineFormat::new(60).end("//").write(out, name, &seq.seq)?;
            }
            Simple::Fitch => {
                writeln!(out, "{}, {} bases", name, seq.len())?;
                LineFormat::new(60)
                    .blocks(3)
                    .indent(1)
                    .write(out, name, &seq.seq)?;
            }
            Simple::Mase => {
                if self.count == 1 {
                    writeln!(out, ";;Written by {} {}", PROGRAM, env!("CARGO_PKG_VERSION"))?;
                }
                writeln!(out, ";{}", seq.desc)?;
                writeln!(out, "{}", name)?;
                LineFormat::new(60).write(out, name, &seq.seq)?;
            }
            Simple::Acedb => {
                let kind = if seq.is_nucleotide() { "DNA" } else { "Peptide" };
                writeln!(out, "{} : \"{}\"", kind, name)?;
                LineFormat::new(60).blank_after().write(out, name, &seq.seq)?;
            }
            Simple::Staden => {
                writeln!(out, "<{}---->", name)?;
                LineFormat::new(60).write(out, name, &seq.seq)?;
            }
            Simple::Text => {
                LineFormat::new(60).write(out, name, &seq.seq)?;
            }
            Simple::Raw => {
                out.write_all(&seq.seq)?;
                writeln!(out)?;
            }
            Simple::Asn1 => self.write_asn1(seq, out)?,
        }
        Ok(())
    }
}

impl SimpleWriter {
    /// NCBI ASN.1 `Bioseq` value with the residues as a single quoted block
    fn write_asn1(&self, seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<()> {
        let (mol, code) = match seq.seqtype {
            SeqType::Protein => ("aa", "iupacaa"),
            SeqType::Rna => ("rna", "iupacna"),
            _ => ("dna", "iupacna"),
        };
        let mut title = seq.name_or_default().to_string();
        if !seq.desc.is_empty() {
            title.push(' ');
            title.push_str(&seq.desc);
        }
        writeln!(out, "  seq {{")?;
        writeln!(out, "    id {{ local id {} }},", self.count)?;
        writeln!(out, "    descr {{ title \"{}\" }},", title.replace('"', "\"\""))?;
        writeln!(out, "    inst {{")?;
        writeln!(
            out,
            "      repr raw, mol {}, length {}, topology {},",
            mol,
            seq.len(),
            if seq.circular { "circular" } else { "linear" }
        )?;
        writeln!(out, "      seq-data")?;
        writeln!(out, "        {}", code)?;
        let mut quoted = Vec::with_capacity(seq.len() + 2);
        quoted.push(b'"');
        quoted.extend_from_slice(&seq.seq);
        quoted.push(b'"');
        LineFormat::new(78).write(out, "", &quoted)?;
        writeln!(out, "      }} }} ,")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::Seq;

    fn render<W: FormatWriter>(mut w: W, seqs: &[Seq]) -> String {
        let mut out = vec![];
        let mut ctx = WriteContext::default();
        for seq in seqs {
            let snap = SeqSnapshot::new(seq, &SeqFormat::Text.info());
            w.write(&snap, &mut out, &mut ctx).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn gcg() {
        let seq = Seq::new("seq1", b"ACGTACGTAC");
        assert_eq!(
            render(GcgWriter, &[seq]),
            "!!NA_SEQUENCE 1.0\n\nseq1  Length: 10  Type: N  Check: 3899  ..\n\n       1  ACGTACGTAC\n"
        );
        let seq = Seq::new("p", b"MKV").with_seqtype(SeqType::Protein);
        assert!(render(GcgWriter, &[seq]).starts_with("!!AA_SEQUENCE 1.0\n\np  Length: 3  Type: P  Check:  485  ..\n"));
    }

    #[test]
    fn gcg_gaps() {
        let seq = Seq::new("g", b"AC-G~T");
        assert_eq!(
            render(GcgWriter, &[seq]),
            "!!NA_SEQUENCE 1.0\n\ng  Length: 6  Type: N  Check: 1355  ..\n\n       1  AC.G.T\n"
        );
    }

    #[test]
    fn nbrf() {
        let seq = Seq::new("s", b"ACGTACGTACGT").with_desc("desc");
        assert_eq!(
            render(NbrfWriter, &[seq]),
            ">DL;s\ndesc\nACGTACGTAC GT\n*\n"
        );
        let seq = Seq::new("p", b"MKVL").with_seqtype(SeqType::Protein);
        assert!(render(NbrfWriter, &[seq]).starts_with(">P1;p\n\nMKVL\n"));
    }

    #[test]
    fn codata() {
        let seq = Seq::new("s", b"ACGTAC");
        assert_eq!(
            render(SimpleWriter::new(Simple::Codata), &[seq]),
            "ENTRY           s\nSEQUENCE\n\
             \x20               5        10        15        20        25        30\n\
             \x20     1 A C G T A C\n///\n"
        );
    }

    #[test]
    fn small_formats() {
        let seq = Seq::new("s", b"ACGTACGTAC").with_desc("d");
        assert_eq!(
            render(SimpleWriter::new(Simple::Ig), &[seq.clone()]),
            ";d\ns\nACGTACGTAC1\n"
        );
        assert_eq!(
            render(SimpleWriter::new(Simple::Fitch), &[seq.clone()]),
            "s, 10 bases\n ACG TAC GTA C\n"
        );
        assert_eq!(
            render(SimpleWriter::new(Simple::Acedb), &[seq.clone()]),
            "DNA : \"s\"\nACGTACGTAC\n\n"
        );
        assert_eq!(
            render(SimpleWriter::new(Simple::Staden), &[seq.clone()]),
            "<s---->\nACGTACGTAC\n"
        );
        assert_eq!(
            render(SimpleWriter::new(Simple::Raw), &[seq.clone()]),
            "ACGTACGTAC\n"
        );
        assert!(render(SimpleWriter::new(Simple::Strider), &[seq.clone()])
            .ends_with("; DNA sequence  s, 10 bases, F3B checksum.\n;\nACGTACGTAC\n//\n"));
        let mase = render(SimpleWriter::new(Simple::Mase), &[seq.clone(), seq]);
        assert_eq!(mase.matches(";;Written by").count(), 1);
        assert!(mase.ends_with(";d\ns\nACGTACGTAC\n"));
    }

    #[test]
    fn asn1() {
        let seqs = [Seq::new("a", b"ACGT"), Seq::new("b", b"GG").with_desc("x")];
        let out = render(SimpleWriter::new(Simple::Asn1), &seqs);
        assert!(out.starts_with(
            "  seq {\n    id { local id 1 },\n    descr { title \"a\" },\n    inst {\n      \
             repr raw, mol dna, length 4, topology linear,\n      seq-data\n        iupacna\n\"ACGT\"\n      } } ,\n"
        ));
        assert!(out.contains("id { local id 2 }"));
        assert!(out.contains("title \"b x\""));
    }
}
