//! DAS 1 XML responses (`DASDNA` and `DASSEQUENCE` documents)

use std::io;

use crate::error::SeqoutResult;
use crate::io::{Case, LineFormat, SeqSnapshot};
use crate::seq::SeqType;

use super::{FormatWriter, WriteContext};

pub struct DasWriter {
    dna: bool,
    started: bool,
}

impl DasWriter {
    pub fn new(dna: bool) -> Self {
        Self { dna, started: false }
    }

    fn root(&self) -> &'static str {
        if self.dna {
            "DASDNA"
        } else {
            "DASSEQUENCE"
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl FormatWriter for DasWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        if !self.started {
            let root = self.root();
            writeln!(out, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
            writeln!(
                out,
                "<!DOCTYPE {} SYSTEM \"http://www.biodas.org/dtd/{}.dtd\">",
                root,
                root.to_ascii_lowercase()
            )?;
            writeln!(out, "<{}>", root)?;
            self.started = true;
        }
        let start = seq.offset + 1;
        let stop = seq.offset + seq.len();
        let id = escape(seq.name_or_default());
        let body = LineFormat::new(50).case(Case::Lower);
        if self.dna {
            writeln!(
                out,
                "  <SEQUENCE id=\"{}\" start=\"{}\" stop=\"{}\" version=\"1.0\">",
                id, start, stop
            )?;
            writeln!(out, "    <DNA length=\"{}\">", seq.len())?;
            body.write(out, "", &seq.seq)?;
            writeln!(out, "    </DNA>")?;
        } else {
            let moltype = match seq.seqtype {
                SeqType::Protein => "Protein",
                SeqType::Rna => "ssRNA",
                _ => "DNA",
            };
            writeln!(
                out,
                "  <SEQUENCE id=\"{}\" start=\"{}\" stop=\"{}\" moltype=\"{}\" version=\"1.0\">",
                id, start, stop, moltype
            )?;
            body.write(out, "", &seq.seq)?;
        }
        writeln!(out, "  </SEQUENCE>")?;
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn io::Write, _ctx: &mut WriteContext) -> SeqoutResult<()> {
        if self.started {
            writeln!(out, "</{}>", self.root())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::Seq;

    fn render(dna: bool, seqs: &[Seq]) -> String {
        let mut w = DasWriter::new(dna);
        let mut out = vec![];
        let mut ctx = WriteContext::default();
        for seq in seqs {
            let snap = SeqSnapshot::new(seq, &SeqFormat::DasSequence.info());
            w.write(&snap, &mut out, &mut ctx).unwrap();
        }
        w.finish(&mut out, &mut ctx).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn dasdna() {
        let seq = Seq::new("s<1>", b"ACGTACGTAC").with_range(3, 6);
        assert_eq!(
            render(true, &[seq]),
            "<?xml version=\"1.0\" standalone=\"no\"?>\n\
             <!DOCTYPE DASDNA SYSTEM \"http://www.biodas.org/dtd/dasdna.dtd\">\n\
             <DASDNA>\n  \
             <SEQUENCE id=\"s&lt;1&gt;\" start=\"3\" stop=\"6\" version=\"1.0\">\n    \
             <DNA length=\"4\">\n\
             gtac\n    \
             </DNA>\n  \
             </SEQUENCE>\n\
             </DASDNA>\n"
        );
    }

    #[test]
    fn dassequence() {
        let seqs = [
            Seq::new("a", b"MKVL").with_seqtype(SeqType::Protein),
            Seq::new("b", b"ACGU"),
        ];
        let out = render(false, &seqs);
        assert_eq!(out.matches("<?xml").count(), 1);
        assert!(out.contains("moltype=\"Protein\""));
        assert!(out.contains("moltype=\"ssRNA\""));
        assert!(out.ends_with("  </SEQUENCE>\n</DASSEQUENCE>\n"));
        assert!(render(false, &[]).is_empty());
    }
}
