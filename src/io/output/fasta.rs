use std::io;

use seq_io::fasta;

use crate::error::SeqoutResult;
use crate::io::SeqSnapshot;

use super::{FormatWriter, WriteContext};

pub const FASTA_WIDTH: usize = 60;

/// FASTA (Pearson) and NCBI-style FASTA
pub struct FastaWriter {
    ncbi: bool,
}

impl FastaWriter {
    pub fn new(ncbi: bool) -> Self {
        Self { ncbi }
    }
}

impl FormatWriter for FastaWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let head = if self.ncbi {
            ncbi_head(seq)
        } else {
            fasta_head(seq)
        };
        fasta::write_head(&mut *out, head.as_bytes())?;
        fasta::write_wrap_seq(&mut *out, &seq.seq, FASTA_WIDTH)?;
        Ok(())
    }
}

/// `name [accession] [description]`, where the accession is the
/// sequence version if known
fn fasta_head(seq: &SeqSnapshot) -> String {
    let mut head = seq.name_or_default().to_string();
    let acc = seq.acc_version();
    if !acc.is_empty() {
        head.push(' ');
        head.push_str(acc);
    }
    if !seq.desc.is_empty() {
        head.push(' ');
        head.push_str(&seq.desc);
    }
    head
}

/// `gi|<gi>|gb|<accession>|<name> <description>` if a GI number is known,
/// else `gnl|<database>|<name> (<accession>) <description>`
fn ncbi_head(seq: &SeqSnapshot) -> String {
    let mut head = if !seq.gi.is_empty() {
        format!(
            "gi|{}|gb|{}|{}",
            seq.gi,
            seq.acc_version(),
            seq.name_or_default()
        )
    } else {
        let db = if seq.db.is_empty() { "unk" } else { &seq.db };
        let mut h = format!("gnl|{}|{}", db, seq.name_or_default());
        if !seq.acc.is_empty() {
            h.push_str(&format!(" ({})", seq.acc_version()));
        }
        h
    };
    if !seq.desc.is_empty() {
        head.push(' ');
        head.push_str(&seq.desc);
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::Seq;

    fn render(w: &mut FastaWriter, seq: &Seq) -> String {
        let snap = SeqSnapshot::new(seq, &SeqFormat::Fasta.info());
        let mut out = vec![];
        w.write(&snap, &mut out, &mut WriteContext::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn heads() {
        let seq = Seq::new("seq1", b"ACGT")
            .with_acc("X56734")
            .with_sv("X56734.1")
            .with_desc("test seq");
        assert_eq!(
            render(&mut FastaWriter::new(false), &seq),
            ">seq1 X56734.1 test seq\nACGT\n"
        );
        let mut seq = seq;
        seq.db = "EM".to_string();
        assert_eq!(
            render(&mut FastaWriter::new(true), &seq),
            ">gnl|EM|seq1 (X56734.1) test seq\nACGT\n"
        );
        seq.gi = "12345".to_string();
        assert_eq!(
            render(&mut FastaWriter::new(true), &seq),
            ">gi|12345|gb|X56734.1|seq1 test seq\nACGT\n"
        );
    }

    #[test]
    fn wrapped() {
        let seq = Seq::new("s", &[b'A'; 130]);
        let out = render(&mut FastaWriter::new(false), &seq);
        let lines: Vec<_> = out.lines().map(|l| l.len()).collect();
        assert_eq!(lines, [2, 60, 60, 10]);
    }
}
