//! GenBank flat files and their protein / RefSeq flavours

use std::io;

use crate::error::SeqoutResult;
use crate::io::{Case, LineFormat, SeqSnapshot};
use crate::seq::{Date, SeqRef, SeqType};

use super::embl::or;
use super::text::write_wrapped;
use super::{FormatWriter, WriteContext};

const LINE_WIDTH: usize = 79;
const INDENT: &str = "            ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavour {
    Genbank,
    Genpept,
    Refseq,
    Refseqp,
}

impl Flavour {
    fn protein(self) -> bool {
        matches!(self, Flavour::Genpept | Flavour::Refseqp)
    }

    fn refseq(self) -> bool {
        matches!(self, Flavour::Refseq | Flavour::Refseqp)
    }
}

pub struct GenbankWriter {
    flavour: Flavour,
    body: LineFormat,
}

impl GenbankWriter {
    pub fn new(flavour: Flavour) -> Self {
        Self {
            flavour,
            body: LineFormat::new(60)
                .blocks(10)
                .number_left(9, " ")
                .case(Case::Lower)
                .end("//"),
        }
    }

    /// Fixed-column `LOCUS` line
    fn write_locus(&self, seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<()> {
        let (unit, mol) = if self.flavour.protein() || seq.seqtype == SeqType::Protein {
            ("aa", "")
        } else {
            ("bp", locus_molecule(seq))
        };
        let topology = if seq.circular { "circular" } else { "linear" };
        let default_div = if self.flavour.refseq() { "CON" } else { "UNC" };
        let date = seq
            .date
            .as_ref()
            .and_then(|d| d.latest())
            .unwrap_or_else(Date::today);
        writeln!(
            out,
            "LOCUS       {:<16} {:>11} {}    {:<6}  {:<8} {} {}",
            seq.name_or_default(),
            seq.len(),
            unit,
            mol,
            topology,
            or(&seq.division, default_div),
            date
        )
    }

    fn write_ref(&self, r: &SeqRef, number: usize, out: &mut dyn io::Write) -> io::Result<()> {
        let unit = if self.flavour.protein() { "residues" } else { "bases" };
        match r.position_genbank(unit) {
            Some(pos) => writeln!(out, "REFERENCE   {:<3}{}", number, pos)?,
            None => writeln!(out, "REFERENCE   {}", number)?,
        }
        let fields = [
            ("  AUTHORS   ", r.authors_genbank()),
            ("  CONSRTM   ", r.group.clone()),
            ("  TITLE     ", r.title.clone()),
            ("  JOURNAL   ", r.location_genbank()),
        ];
        for (tag, text) in fields {
            write_wrapped(out, tag, INDENT, &text, LINE_WIDTH)?;
        }
        if let Some(pubmed) = pubmed_id(&r.xref) {
            writeln!(out, "   PUBMED   {}", pubmed)?;
        }
        write_wrapped(out, "  REMARK    ", INDENT, &r.comment, LINE_WIDTH)
    }
}

/// Molecule column of the `LOCUS` line derived from the EMBL molecule type
/// ("genomic DNA" -> "DNA", "mRNA" -> "mRNA")
fn locus_molecule(seq: &SeqSnapshot) -> &str {
    const KNOWN: [&str; 6] = ["DNA", "RNA", "mRNA", "tRNA", "rRNA", "cRNA"];
    seq.molecule
        .split_whitespace()
        .last()
        .and_then(|m| KNOWN.iter().find(|k| **k == m).copied())
        .unwrap_or(if seq.seqtype == SeqType::Rna { "RNA" } else { "DNA" })
}

/// Extracts the identifier from "PUBMED; 7871890."
fn pubmed_id(xref: &str) -> Option<&str> {
    let (db, id) = xref.split_once(';')?;
    if !db.trim().eq_ignore_ascii_case("pubmed") {
        return None;
    }
    Some(id.trim().trim_end_matches('.'))
}

impl FormatWriter for GenbankWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        self.write_locus(seq, out)?;

        let mut definition = seq.desc.trim().to_string();
        if !definition.ends_with('.') {
            definition.push('.');
        }
        write_wrapped(out, "DEFINITION  ", INDENT, &definition, LINE_WIDTH)?;

        let accessions = if seq.acc_list.is_empty() {
            seq.name_or_default().to_string()
        } else {
            seq.acc_list.join(" ")
        };
        write_wrapped(out, "ACCESSION   ", INDENT, &accessions, LINE_WIDTH)?;
        if !seq.acc_version().is_empty() {
            write!(out, "VERSION     {}", seq.acc_version())?;
            if !seq.gi.is_empty() && !self.flavour.refseq() {
                write!(out, "  GI:{}", seq.gi)?;
            }
            writeln!(out)?;
        }
        let keywords = if seq.keywords.is_empty() {
            ".".to_string()
        } else {
            format!("{}.", seq.keywords.join("; "))
        };
        write_wrapped(out, "KEYWORDS    ", INDENT, &keywords, LINE_WIDTH)?;

        if seq.tax.is_empty() {
            writeln!(out, "SOURCE      .")?;
            writeln!(out, "  ORGANISM  .")?;
        } else {
            write_wrapped(out, "SOURCE      ", INDENT, &seq.tax, LINE_WIDTH)?;
            write_wrapped(out, "  ORGANISM  ", INDENT, &seq.tax, LINE_WIDTH)?;
            if !seq.tax_list.is_empty() {
                let lineage = format!("{}.", seq.tax_list.join("; "));
                write_wrapped(out, INDENT, INDENT, &lineage, LINE_WIDTH)?;
            }
        }
        for (i, r) in seq.refs.iter().enumerate() {
            let number = if r.number > 0 { r.number as usize } else { i + 1 };
            self.write_ref(r, number, out)?;
        }
        let mut first = true;
        for c in &seq.comments {
            for line in c.lines() {
                let tag = if first { "COMMENT     " } else { INDENT };
                if line.trim().is_empty() {
                    writeln!(out, "{}", tag.trim_end())?;
                } else {
                    write_wrapped(out, tag, INDENT, line, LINE_WIDTH)?;
                }
                first = false;
            }
        }
        ctx.write_features(
            seq,
            "genbank",
            "FEATURES             Location/Qualifiers\n",
            out,
        )?;
        if seq.is_nucleotide() && !self.flavour.protein() {
            let [a, c, g, t, other] = seq.base_counts();
            write!(out, "BASE COUNT  {:>7} a{:>7} c{:>7} g{:>7} t", a, c, g, t)?;
            if other > 0 {
                write!(out, "{:>7} others", other)?;
            }
            writeln!(out)?;
        }
        writeln!(out, "ORIGIN")?;
        self.body.write(out, "", &seq.seq)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::{Seq, SeqDate};

    fn render(flavour: Flavour, seq: &Seq) -> String {
        let snap = SeqSnapshot::new(seq, &SeqFormat::Genbank.info());
        let mut out = vec![];
        GenbankWriter::new(flavour)
            .write(&snap, &mut out, &mut WriteContext::default())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn genbank_entry() {
        let mut seq = Seq::new("SCU49845", b"GATCCTCCATATACAACGGTATCTCCACCTCAGGTTTAGATCTCAACAACGGAACCATTGCCGACAT")
            .with_acc("U49845")
            .with_sv("U49845.1")
            .with_desc("Saccharomyces cerevisiae TCP1-beta gene, partial cds, and Axl2p (AXL2) and Rev7p (REV7) genes, complete cds");
        seq.gi = "1293613".to_string();
        seq.molecule = "genomic DNA".to_string();
        seq.division = "PLN".to_string();
        seq.tax = "Saccharomyces cerevisiae".to_string();
        seq.tax_list = vec!["Eukaryota".to_string(), "Fungi".to_string()];
        seq.date = Some(SeqDate {
            modified: Some(Date::new(1999, 6, 21)),
            ..Default::default()
        });
        let mut r = SeqRef::new(1);
        r.position = "1-5028".to_string();
        r.authors = "Torpey L.E., Gibbs P.E.".to_string();
        r.title = "Cloning and sequence of REV7".to_string();
        r.location = "Yeast 10(11):1503-1509(1994).".to_string();
        r.xref = "PUBMED; 7871890.".to_string();
        seq.refs.push(r);

        let out = render(Flavour::Genbank, &seq);
        let expected = "\
LOCUS       SCU49845                  67 bp    DNA     linear   PLN 21-JUN-1999
DEFINITION  Saccharomyces cerevisiae TCP1-beta gene, partial cds, and Axl2p
            (AXL2) and Rev7p (REV7) genes, complete cds.
ACCESSION   U49845
VERSION     U49845.1  GI:1293613
KEYWORDS    .
SOURCE      Saccharomyces cerevisiae
  ORGANISM  Saccharomyces cerevisiae
            Eukaryota; Fungi.
REFERENCE   1  (bases 1 to 5028)
  AUTHORS   Torpey,L.E. and Gibbs,P.E.
  TITLE     Cloning and sequence of REV7
  JOURNAL   Yeast 10 (11), 1503-1509 (1994)
   PUBMED   7871890
BASE COUNT       20 a     21 c     10 g     16 t
ORIGIN
        1 gatcctccat atacaacggt atctccacct caggtttaga tctcaacaac ggaaccattg
       61 ccgacat
//
";
        assert_eq!(out, expected);
    }

    #[test]
    fn protein_flavour() {
        let seq = Seq::new("P1", b"MKVLAT").circular();
        let out = render(Flavour::Genpept, &seq);
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("LOCUS       P1                         6 aa            circular UNC "));
        assert!(out.contains("DEFINITION  .\nACCESSION   P1\nKEYWORDS    .\n"));
        assert!(!out.contains("BASE COUNT"));
        assert!(out.ends_with("ORIGIN\n        1 mkvlat\n//\n"));
        let out = render(Flavour::Refseqp, &seq);
        assert!(out.lines().next().unwrap().contains(" CON "));
    }
}
