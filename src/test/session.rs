use super::*;
use crate::seq::SeqType;

#[test]
fn fasta() {
    cmp("fasta", &seqs()[..1], ">seq1 test seq\nACGTACGTAC\n");
    cmp(
        "pearson",
        &seqs(),
        ">seq1 test seq\nACGTACGTAC\n>seq2\nTTGGCAGG\n",
    );
    // FASTA is the default
    let out = write(OutputOptions::default().expect_empty(), &seqs()[..1]);
    assert_eq!(out.unwrap(), b">seq1 test seq\nACGTACGTAC\n");
    let long = Seq::new("l", &[b'A'; 70]);
    cmp(
        "fasta",
        &[long],
        &format!(">l\n{}\n{}\n", "A".repeat(60), "A".repeat(10)),
    );
}

#[test]
fn empty_name() {
    let seq = Seq::new("", b"ACGT");
    cmp("fasta", &[seq.clone()], ">EMBOSS\nACGT\n");
    cmp("ncbi", &[seq.clone()], ">gnl|unk|EMBOSS\nACGT\n");
    let mut seq = seq.with_acc("A1").with_sv("A1.2");
    seq.gi = "123".to_string();
    cmp("ncbi", &[seq], ">gi|123|gb|A1.2|EMBOSS\nACGT\n");
}

#[test]
fn range_and_reverse() {
    let seq = Seq::new("s", b"AACCGGTTAA").with_range(3, 6);
    cmp("fasta", &[seq.clone()], ">s\nCCGG\n");
    cmp("fasta", &[seq.reversed()], ">s\nCCGG\n");
    let seq = Seq::new("s", b"AAACCCG").with_range(-3, 0);
    cmp("raw", &[seq.clone()], "CCG\n");
    cmp("raw", &[seq.reversed()], "CGG\n");
}

#[test]
fn unknown_format() {
    let mut sink = io::sink();
    let e = Seqout::with_writer(&mut sink, opts("nonexistent"));
    assert!(matches!(e, Err(SeqoutError::UnknownFormat(ref f)) if f == "nonexistent"));
    let mut out = vec![];
    let mut o = Seqout::with_writer(&mut out, opts("GenBank")).unwrap();
    assert_eq!(o.format_info().name, "genbank");
    o.close().unwrap();
}

#[test]
fn type_mismatch() {
    let prot = Seq::new("p", b"MKVLAAGIW");
    let e = fails("embl", &[prot.clone()], "only accepts nucleotide sequences");
    assert!(matches!(
        e,
        SeqoutError::TypeMismatch {
            format: "embl",
            seqtype: SeqType::Protein,
            ..
        }
    ));
    fails("swiss", &seqs()[..1], "only accepts protein sequences");

    // rejected before anything is written
    let mut out = vec![];
    {
        let mut o = Seqout::with_writer(&mut out, opts("embl")).unwrap();
        assert!(o.write(&prot).is_err());
        assert_eq!(o.count(), 0);
        o.close().unwrap();
    }
    assert!(out.is_empty());

    // explicit type wins over guessing
    let seq = Seq::new("s", b"ACGT").with_seqtype(SeqType::Protein);
    fails("fastq", &[seq], "cannot be written in the 'fastq-sanger' format");
}

#[test]
fn closed() {
    let mut out = vec![];
    {
        let mut o = Seqout::with_writer(&mut out, opts("fasta")).unwrap();
        o.write(&seqs()[0]).unwrap();
        o.close().unwrap();
        assert!(o.is_closed());
        // closing again has no effect
        o.close().unwrap();
        assert!(matches!(o.write(&seqs()[1]), Err(SeqoutError::Closed)));
        assert!(matches!(o.flush(), Err(SeqoutError::Closed)));
        assert_eq!(o.count(), 1);
    }
    assert_eq!(out, b">seq1 test seq\nACGTACGTAC\n");
}

/// Fails the first write, counts flushes
#[derive(Default)]
struct FailingWriter {
    writes: usize,
    flushes: usize,
}

impl io::Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        if self.writes == 1 {
            return Err(io::Error::other("disk full"));
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[test]
fn close_after_error() {
    let mut out = FailingWriter::default();
    {
        let mut o = Seqout::with_writer(&mut out, opts("phylip")).unwrap();
        for seq in seqs() {
            o.write(&seq).unwrap();
        }
        let e = o.close().unwrap_err();
        assert!(matches!(e, SeqoutError::Io(_)));
        assert!(e.to_string().contains("disk full"));
        assert!(o.is_closed());
        o.close().unwrap();
    }
    // the destination is flushed despite the failed write
    assert_eq!(out.flushes, 1);
}

#[test]
fn drop_closes() {
    let mut out = vec![];
    {
        let mut o = Seqout::with_writer(&mut out, opts("phylip")).unwrap();
        for seq in seqs() {
            o.write(&seq).unwrap();
        }
        assert_eq!(o.pending(), 2);
    }
    assert_eq!(
        String::from_utf8(out).unwrap(),
        " 2 10\nseq1       ACGTACGTAC\nseq2       TTGGCAGG--\n"
    );
}

#[test]
fn gaps() {
    let seq = Seq::new("g", b"AC-GT..A");
    cmp("fasta", &[seq.clone()], ">g\nAC-GT..A\n");
    cmp("raw", &[seq.clone()], "ACGTA\n");
    cmp("sam", &[seq], &format!("{}g\t4\t*\t0\t0\t*\t*\t0\t0\tACGTA\t\"\"\"\"\"\n", sam_header()));
}

#[test]
fn annotated() {
    let mut seq = Seq::new("X56734", b"MKVLAAGIW")
        .with_acc("X56734")
        .with_sv("X56734.1")
        .with_desc("Some protein");
    seq.tax = "Homo sapiens".to_string();
    let out = output("swiss", &[seq.clone()]);
    assert!(out.starts_with("ID   X56734 "));
    assert!(out.contains("\nAC   X56734;\n"));
    assert!(out.contains("\nOS   Homo sapiens.\n"));
    assert!(out.ends_with("\n     MKVLAAGIW\n//\n"));

    let short = Seq::new("p", b"MKV");
    assert!(output("swiss", &[short])
        .contains("SQ   SEQUENCE     3 AA;    377 MW;  72C336F000000000 CRC64;\n     MKV\n//\n"));

    let out = output("ncbi", &[seq]);
    assert_eq!(out, ">gnl|unk|X56734 (X56734.1) Some protein\nMKVLAAGIW\n");
}

#[test]
fn format_registry() {
    // every format can be opened and accepts a matching sequence
    use crate::io::SeqFormat;
    use strum::IntoEnumIterator;
    for format in SeqFormat::iter() {
        let info = format.info();
        let seq = if info.nucleotide {
            Seq::new("s", b"ACGTACGT")
        } else {
            Seq::new("s", b"MKVLAAGIW")
        };
        let out = write(opts(info.name), &[seq]).unwrap();
        assert!(!out.is_empty(), "no output for {}", info.name);
    }
}

fn sam_header() -> String {
    format!(
        "@HD\tVN:1.3\tSO:unsorted\n@PG\tID:seqout\tPN:seqout\tVN:{}\n",
        env!("CARGO_PKG_VERSION")
    )
}
