//! Dump of every field of the written sequence, for checking what the
//! other writers receive

use std::io;

use crate::error::SeqoutResult;
use crate::io::checksum::{crc64, crc64_hex, gcg_checksum};
use crate::io::{LineFormat, SeqSnapshot};

use super::{FormatWriter, WriteContext};

pub struct DebugWriter;

fn field(out: &mut dyn io::Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {}: '{}'", label, value)
}

fn list<T, F>(out: &mut dyn io::Write, label: &str, items: &[T], fmt: F) -> io::Result<()>
where
    F: Fn(&T) -> String,
{
    writeln!(out, "  {}: {}", label, items.len())?;
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "    {:>3}: {}", i + 1, fmt(item))?;
    }
    Ok(())
}

impl FormatWriter for DebugWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        writeln!(out, "Sequence output trace")?;
        writeln!(out, "=====================")?;
        writeln!(out)?;
        field(out, "Name", &seq.name)?;
        field(out, "Accession", &seq.acc)?;
        list(out, "Accession list", &seq.acc_list, |a| a.clone())?;
        field(out, "SeqVersion", &seq.sv)?;
        field(out, "GI", &seq.gi)?;
        field(out, "Database", &seq.db)?;
        field(out, "Full name", &seq.full_name)?;
        field(out, "Description", &seq.desc)?;
        field(out, "Documentation", &seq.doc)?;
        list(out, "Keywords", &seq.keywords, |k| k.clone())?;
        field(out, "Taxonomy", &seq.tax)?;
        field(out, "Taxid", &seq.tax_id)?;
        list(out, "Taxonomy list", &seq.tax_list, |t| t.clone())?;
        field(out, "Organelle", &seq.organelle)?;
        field(out, "Molecule", &seq.molecule)?;
        field(out, "Class", &seq.class)?;
        field(out, "Division", &seq.division)?;
        match &seq.date {
            Some(d) => {
                let show = |d: Option<crate::seq::Date>| d.map(|d| d.to_string()).unwrap_or_default();
                field(out, "Created", &show(d.created))?;
                field(out, "Modified", &show(d.modified))?;
                field(out, "Sequence modified", &show(d.seq_modified))?;
                field(out, "Created release", d.created_rel.as_deref().unwrap_or(""))?;
                field(out, "Modified release", d.modified_rel.as_deref().unwrap_or(""))?;
                field(out, "Modified version", d.modified_ver.as_deref().unwrap_or(""))?;
                field(out, "Sequence version", d.seq_ver.as_deref().unwrap_or(""))?;
            }
            None => writeln!(out, "  Dates: none")?,
        }
        list(out, "Citations", &seq.refs, |r| {
            format!(
                "[{}] pos='{}' group='{}' authors='{}' title='{}' comment='{}' xref='{}' location='{}' loctype='{}'",
                r.number, r.position, r.group, r.authors, r.title, r.comment, r.xref, r.location, r.loctype
            )
        })?;
        list(out, "Cross-references", &seq.xrefs, |x| {
            let range = x.range.map(|(s, e)| format!(" {}..{}", s, e)).unwrap_or_default();
            format!("{:?} {}{}", x.xref_type, x.dr_line(), range)
        })?;
        list(out, "Genes", &seq.genes, |g| g.gn_text())?;
        list(out, "Comments", &seq.comments, |c| format!("'{}'", c))?;
        field(out, "Type", &seq.seqtype.to_string())?;
        writeln!(out, "  Begin: {}", seq.begin)?;
        writeln!(out, "  End: {}", seq.end)?;
        writeln!(out, "  Offset: {}", seq.offset)?;
        writeln!(out, "  Offend: {}", seq.offend)?;
        writeln!(out, "  Reversed: {}", seq.reversed)?;
        writeln!(out, "  Circular: {}", seq.circular)?;
        writeln!(
            out,
            "  Features: {}",
            if seq.has_features() { "yes" } else { "no" }
        )?;
        match &seq.accuracy {
            Some(a) => {
                let values: Vec<_> = a.iter().map(|q| format!("{:.1}", q)).collect();
                writeln!(out, "  Accuracy: {}", values.join(" "))?;
            }
            None => writeln!(out, "  Accuracy: none")?,
        }
        writeln!(out, "  Length: {}", seq.len())?;
        writeln!(out, "  GCG checksum: {}", gcg_checksum(&seq.seq))?;
        writeln!(out, "  CRC64: {}", crc64_hex(crc64(&seq.seq)))?;
        writeln!(out, "  Sequence:")?;
        LineFormat::new(60)
            .blocks(10)
            .indent(4)
            .number_right(8, " ")
            .write(out, "", &seq.seq)?;
        ctx.write_features(seq, "debug", "  Feature table:\n", out)?;
        writeln!(out)?;
        Ok(())
    }
}
