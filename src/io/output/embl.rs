//! EMBL flat files (current and pre-2006 layout) and Staden experiment files

use std::io;

use crate::error::SeqoutResult;
use crate::io::{Case, LineFormat, QualFormat, SeqSnapshot};
use crate::seq::{Date, SeqRef, SeqType, XrefType};

use super::text::{write_list, write_tagged};
use super::{FormatWriter, WriteContext};

/// Maximum length of wrapped annotation lines (including the tag)
pub const LINE_WIDTH: usize = 80;

const FEATURE_HEADER: &str = "FH   Key             Location/Qualifiers\nFH\n";

pub struct EmblWriter {
    old: bool,
    body: LineFormat,
}

impl EmblWriter {
    pub fn new(old: bool) -> Self {
        Self {
            old,
            body: LineFormat::new(60)
                .blocks(10)
                .indent(5)
                .number_right(10, "")
                .case(Case::Lower)
                .end("//"),
        }
    }

    fn write_id(&self, seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<()> {
        let unit = if seq.is_nucleotide() { "BP" } else { "AA" };
        if self.old {
            let mol = if !seq.molecule.is_empty() {
                seq.molecule.as_str()
            } else if seq.seqtype == SeqType::Rna {
                "RNA"
            } else {
                "DNA"
            };
            let topology = if seq.circular { "circular " } else { "" };
            return writeln!(
                out,
                "ID   {:<9}  standard; {}{}; {}; {} {}.",
                seq.name_or_default(),
                topology,
                mol,
                or(&seq.division, "UNC"),
                seq.len(),
                unit
            );
        }
        let id = if seq.acc.is_empty() {
            seq.name_or_default()
        } else {
            &seq.acc
        };
        let default_mol = if seq.seqtype == SeqType::Rna {
            "unassigned RNA"
        } else {
            "unassigned DNA"
        };
        writeln!(
            out,
            "ID   {}; SV {}; {}; {}; {}; {}; {} {}.",
            id,
            seq.version_number(),
            if seq.circular { "circular" } else { "linear" },
            or(&seq.molecule, default_mol),
            or(&seq.class, "STD"),
            or(&seq.division, "UNC"),
            seq.len(),
            unit
        )
    }
}

impl FormatWriter for EmblWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        self.write_id(seq, out)?;
        writeln!(out, "XX")?;
        if !seq.acc_list.is_empty() {
            write_list(out, "AC   ", &seq.acc_list, "; ", ";", LINE_WIDTH)?;
            writeln!(out, "XX")?;
        }
        if self.old && !seq.sv.is_empty() {
            writeln!(out, "SV   {}", seq.sv)?;
            writeln!(out, "XX")?;
        }
        write_dates(seq, out)?;
        writeln!(out, "XX")?;
        if !seq.desc.is_empty() {
            write_tagged(out, "DE   ", &seq.desc, LINE_WIDTH)?;
            writeln!(out, "XX")?;
        }
        if seq.keywords.is_empty() {
            writeln!(out, "KW   .")?;
        } else {
            write_list(out, "KW   ", &seq.keywords, "; ", ".", LINE_WIDTH)?;
        }
        writeln!(out, "XX")?;
        if !seq.tax.is_empty() {
            write_tagged(out, "OS   ", &seq.tax, LINE_WIDTH)?;
            write_list(out, "OC   ", &seq.tax_list, "; ", ".", LINE_WIDTH)?;
            if !seq.organelle.is_empty() {
                writeln!(out, "OG   {}", seq.organelle)?;
            }
            writeln!(out, "XX")?;
        }
        write_refs(&seq.refs, out, true)?;
        if write_xrefs(seq, out)? {
            writeln!(out, "XX")?;
        }
        if write_comments(&seq.comments, out)? {
            writeln!(out, "XX")?;
        }
        if ctx.write_features(seq, "embl", FEATURE_HEADER, out)? {
            writeln!(out, "XX")?;
        }
        write_sq(seq, out)?;
        self.body.write(out, "", &seq.seq)?;
        Ok(())
    }
}

#[inline]
pub(super) fn or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// `DT` lines, today's date if the entry has no history
fn write_dates(seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<()> {
    let date = seq.date.clone().unwrap_or_default();
    let created = date.created.unwrap_or_else(Date::today);
    let modified = date.latest().unwrap_or(created);
    match date.created_rel.as_deref() {
        Some(rel) => writeln!(out, "DT   {} (Rel. {}, Created)", created, rel)?,
        None => writeln!(out, "DT   {} (Created)", created)?,
    }
    let version = date.modified_ver.as_deref().unwrap_or("1");
    match date.modified_rel.as_deref() {
        Some(rel) => writeln!(
            out,
            "DT   {} (Rel. {}, Last updated, Version {})",
            modified, rel, version
        ),
        None => writeln!(out, "DT   {} (Last updated, Version {})", modified, version),
    }
}

/// Citation blocks (`RN` .. `RL`). EMBL separates them with `XX` lines
/// and lists `RC` before `RP`; Swiss-Prot has no separators.
pub(super) fn write_refs(refs: &[SeqRef], out: &mut dyn io::Write, embl: bool) -> io::Result<()> {
    for (i, r) in refs.iter().enumerate() {
        let number = if r.number > 0 { r.number as usize } else { i + 1 };
        writeln!(out, "RN   [{}]", number)?;
        if embl {
            write_tagged(out, "RC   ", &r.comment, LINE_WIDTH)?;
            write_tagged(out, "RP   ", &r.position, LINE_WIDTH)?;
        } else {
            write_tagged(out, "RP   ", &r.position, LINE_WIDTH)?;
            write_tagged(out, "RC   ", &r.comment, LINE_WIDTH)?;
        }
        write_tagged(out, "RX   ", &r.xref, LINE_WIDTH)?;
        write_tagged(out, "RG   ", &r.group, LINE_WIDTH)?;
        if !r.authors.is_empty() {
            let mut authors = r.authors.trim_end().to_string();
            if !authors.ends_with(';') {
                authors.push(';');
            }
            write_tagged(out, "RA   ", &authors, LINE_WIDTH)?;
        }
        if !r.title.is_empty() {
            write_tagged(out, "RT   ", &format!("\"{}\";", r.title), LINE_WIDTH)?;
        } else if embl {
            writeln!(out, "RT   ;")?;
        }
        write_tagged(out, "RL   ", &r.location, LINE_WIDTH)?;
        if embl {
            writeln!(out, "XX")?;
        }
    }
    Ok(())
}

/// `DR` lines. Returns `true` if anything was written.
pub(super) fn write_xrefs(seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<bool> {
    let mut any = false;
    for x in seq.xrefs.iter().filter(|x| x.xref_type == XrefType::Dr) {
        writeln!(out, "DR   {}", x.dr_line())?;
        any = true;
    }
    Ok(any)
}

/// `CC` blocks, separated by `XX` lines in EMBL
fn write_comments(comments: &[String], out: &mut dyn io::Write) -> io::Result<bool> {
    for (i, c) in comments.iter().enumerate() {
        if i > 0 {
            writeln!(out, "XX")?;
        }
        for line in c.lines() {
            if line.trim().is_empty() {
                writeln!(out, "CC")?;
            } else {
                write_tagged(out, "CC   ", line, LINE_WIDTH)?;
            }
        }
    }
    Ok(!comments.is_empty())
}

fn write_sq(seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<()> {
    if seq.is_nucleotide() {
        let [a, c, g, t, other] = seq.base_counts();
        writeln!(
            out,
            "SQ   Sequence {} BP; {} A; {} C; {} G; {} T; {} other;",
            seq.len(),
            a,
            c,
            g,
            t,
            other
        )
    } else {
        writeln!(out, "SQ   Sequence {} AA;", seq.len())
    }
}

/// Staden experiment file: `ID` / `EN` lines, accuracy values (`AV`) and
/// the sequence in EMBL-like blocks
pub struct ExperimentWriter;

/// Accuracy values per `AV` line
const AV_PER_LINE: usize = 20;

impl FormatWriter for ExperimentWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let name = seq.name_or_default();
        writeln!(out, "ID   {}", name)?;
        writeln!(out, "EN   {}", name)?;
        if seq.accuracy.is_some() {
            let mut qual = Vec::with_capacity(seq.len());
            QualFormat::Phred.encode_all(seq.accuracy.as_deref(), seq.len(), &mut qual);
            for chunk in qual.chunks(AV_PER_LINE) {
                out.write_all(b"AV  ")?;
                for q in chunk {
                    write!(out, " {}", q)?;
                }
                writeln!(out)?;
            }
        }
        writeln!(out, "SQ")?;
        LineFormat::new(60)
            .blocks(10)
            .indent(5)
            .end("//")
            .write(out, name, &seq.seq)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::{Seq, SeqDate, SeqXref};

    fn render(old: bool, seq: &Seq) -> String {
        let snap = SeqSnapshot::new(seq, &SeqFormat::Embl.info());
        let mut out = vec![];
        EmblWriter::new(old)
            .write(&snap, &mut out, &mut WriteContext::default())
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn annotated() -> Seq {
        let mut seq = Seq::new("TRBG361", b"AAACAAACCAAATATGGATT")
            .with_acc("X56734")
            .with_sv("X56734.1")
            .with_desc("Trifolium repens mRNA for non-cyanogenic beta-glucosidase");
        seq.molecule = "mRNA".to_string();
        seq.division = "PLN".to_string();
        seq.keywords = vec!["beta-glucosidase".to_string()];
        seq.tax = "Trifolium repens (white clover)".to_string();
        seq.tax_list = vec!["Eukaryota".to_string(), "Viridiplantae".to_string()];
        seq.date = Some(SeqDate {
            created: Some(Date::new(1991, 9, 12)),
            created_rel: Some("29".to_string()),
            modified: Some(Date::new(2005, 11, 25)),
            modified_rel: Some("85".to_string()),
            modified_ver: Some("11".to_string()),
            ..Default::default()
        });
        let mut r = SeqRef::new(1);
        r.position = "1-1859".to_string();
        r.authors = "Oxtoby E., Dunn M.A.".to_string();
        r.title = "Nucleotide sequence of linamarase".to_string();
        r.location = "Plant Mol. Biol. 17(2):209-219(1991).".to_string();
        seq.refs.push(r);
        seq.xrefs
            .push(SeqXref::new(XrefType::Dr, "MD5", "1e51ca3a5450c43524b9185c236cc5cc"));
        seq.xrefs.push(SeqXref::new(XrefType::DbXref, "taxon", "3899"));
        seq.comments.push("Some comment".to_string());
        seq
    }

    #[test]
    fn embl_entry() {
        let out = render(false, &annotated());
        let expected = format!(
            "ID   X56734; SV 1; linear; mRNA; STD; PLN; 20 BP.\n\
             XX\n\
             AC   X56734;\n\
             XX\n\
             DT   12-SEP-1991 (Rel. 29, Created)\n\
             DT   25-NOV-2005 (Rel. 85, Last updated, Version 11)\n\
             XX\n\
             DE   Trifolium repens mRNA for non-cyanogenic beta-glucosidase\n\
             XX\n\
             KW   beta-glucosidase.\n\
             XX\n\
             OS   Trifolium repens (white clover)\n\
             OC   Eukaryota; Viridiplantae.\n\
             XX\n\
             RN   [1]\n\
             RP   1-1859\n\
             RA   Oxtoby E., Dunn M.A.;\n\
             RT   \"Nucleotide sequence of linamarase\";\n\
             RL   Plant Mol. Biol. 17(2):209-219(1991).\n\
             XX\n\
             DR   MD5; 1e51ca3a5450c43524b9185c236cc5cc.\n\
             XX\n\
             CC   Some comment\n\
             XX\n\
             SQ   Sequence 20 BP; 11 A; 3 C; 2 G; 4 T; 0 other;\n\
             \x20    aaacaaacca aatatggatt{}20\n\
             //\n",
            " ".repeat(52)
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn minimal_and_old() {
        let seq = Seq::new("s1", b"ACGUN").circular();
        let out = render(false, &seq);
        assert!(out.starts_with("ID   s1; SV 1; circular; unassigned RNA; STD; UNC; 5 BP.\n"));
        assert!(out.contains("SQ   Sequence 5 BP; 1 A; 1 C; 1 G; 1 T; 1 other;\n"));
        assert!(out.contains("(Created)\n"));

        let out = render(true, &annotated());
        assert!(out.starts_with("ID   TRBG361    standard; mRNA; PLN; 20 BP.\nXX\nAC   X56734;\nXX\nSV   X56734.1\n"));
    }

    #[test]
    fn experiment() {
        let seq = Seq::new("read", b"ACGTA").with_accuracy(vec![10., 20., 30., 40., 50.]);
        let snap = SeqSnapshot::new(&seq, &SeqFormat::Experiment.info());
        let mut out = vec![];
        ExperimentWriter
            .write(&snap, &mut out, &mut WriteContext::default())
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID   read\nEN   read\nAV   10 20 30 40 50\nSQ\n     ACGTA\n//\n"
        );
    }
}
