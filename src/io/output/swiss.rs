//! Swiss-Prot / UniProtKB flat files, current and pre-2008 layout

use std::io;

use itertools::Itertools;

use crate::error::SeqoutResult;
use crate::io::checksum::{crc64, crc64_hex, molecular_weight};
use crate::io::{LineFormat, SeqSnapshot};
use crate::seq::{Date, SeqGene};

use super::embl::{or, write_refs, write_xrefs, LINE_WIDTH};
use super::text::{write_list, write_tagged};
use super::{FormatWriter, WriteContext};

pub struct SwissWriter {
    old: bool,
    body: LineFormat,
}

impl SwissWriter {
    pub fn new(old: bool) -> Self {
        Self {
            old,
            body: LineFormat::new(60).blocks(10).indent(5).end("//"),
        }
    }

    fn reviewed(seq: &SeqSnapshot) -> bool {
        let class = seq.class.to_ascii_lowercase();
        class == "reviewed" || class == "standard"
    }

    fn write_header(&self, seq: &SeqSnapshot, out: &mut dyn io::Write) -> io::Result<()> {
        let name = or(&seq.full_name, seq.name_or_default());
        let reviewed = Self::reviewed(seq);
        if self.old {
            let class = if reviewed { "STANDARD;" } else { "PRELIMINARY;" };
            writeln!(out, "ID   {:<14} {:<14} PRT; {:>5} AA.", name, class, seq.len())?;
        } else {
            let class = if reviewed { "Reviewed;" } else { "Unreviewed;" };
            writeln!(out, "ID   {:<23} {:<11}{:>10} AA.", name, class, seq.len())?;
        }
        write_list(out, "AC   ", &seq.acc_list, "; ", ";", LINE_WIDTH)?;
        self.write_dates(seq, reviewed, out)?;
        self.write_desc(seq, reviewed, out)?;
        self.write_genes(&seq.genes, out)?;
        if !seq.tax.is_empty() {
            let mut tax = seq.tax.clone();
            if !tax.ends_with('.') {
                tax.push('.');
            }
            write_tagged(out, "OS   ", &tax, LINE_WIDTH)?;
        }
        if !seq.organelle.is_empty() {
            writeln!(out, "OG   {}.", seq.organelle.trim_end_matches('.'))?;
        }
        write_list(out, "OC   ", &seq.tax_list, "; ", ".", LINE_WIDTH)?;
        if !self.old && !seq.tax_id.is_empty() {
            writeln!(out, "OX   NCBI_TaxID={};", seq.tax_id)?;
        }
        write_refs(&seq.refs, out, false)?;
        for c in &seq.comments {
            for line in c.lines() {
                write_tagged(out, "CC   ", line, LINE_WIDTH)?;
            }
        }
        write_xrefs(seq, out)?;
        write_list(out, "KW   ", &seq.keywords, "; ", ".", LINE_WIDTH)?;
        Ok(())
    }

    fn write_dates(&self, seq: &SeqSnapshot, reviewed: bool, out: &mut dyn io::Write) -> io::Result<()> {
        let date = seq.date.clone().unwrap_or_default();
        let created = date.created.unwrap_or_else(Date::today);
        let seq_modified = date.seq_modified.unwrap_or(created);
        let modified = date.modified.unwrap_or(seq_modified);
        let seq_ver = date.seq_ver.as_deref().unwrap_or("1");
        let entry_ver = date.modified_ver.as_deref().unwrap_or("1");
        if self.old {
            let rel = |r: &Option<String>| r.clone().unwrap_or_else(|| "01".to_string());
            writeln!(out, "DT   {} (Rel. {}, Created)", created, rel(&date.created_rel))?;
            writeln!(
                out,
                "DT   {} (Rel. {}, Last sequence update)",
                seq_modified,
                rel(&date.modified_rel)
            )?;
            writeln!(
                out,
                "DT   {} (Rel. {}, Last annotation update)",
                modified,
                rel(&date.modified_rel)
            )
        } else {
            let db = if reviewed { "Swiss-Prot" } else { "TrEMBL" };
            writeln!(out, "DT   {}, integrated into UniProtKB/{}.", created, db)?;
            writeln!(out, "DT   {}, sequence version {}.", seq_modified, seq_ver)?;
            writeln!(out, "DT   {}, entry version {}.", modified, entry_ver)
        }
    }

    fn write_desc(&self, seq: &SeqSnapshot, reviewed: bool, out: &mut dyn io::Write) -> io::Result<()> {
        let desc = seq.desc.trim();
        if desc.is_empty() {
            return Ok(());
        }
        let text = if self.old {
            if desc.ends_with('.') {
                desc.to_string()
            } else {
                format!("{}.", desc)
            }
        } else if desc.starts_with("RecName:") || desc.starts_with("SubName:") {
            desc.to_string()
        } else {
            let tag = if reviewed { "RecName" } else { "SubName" };
            format!("{}: Full={};", tag, desc.trim_end_matches(';'))
        };
        write_tagged(out, "DE   ", &text, LINE_WIDTH)
    }

    fn write_genes(&self, genes: &[SeqGene], out: &mut dyn io::Write) -> io::Result<()> {
        if genes.is_empty() {
            return Ok(());
        }
        if self.old {
            let text = genes
                .iter()
                .map(|g| {
                    std::iter::once(&g.name)
                        .chain(&g.synonyms)
                        .chain(&g.ordered_locus)
                        .chain(&g.orf)
                        .filter(|n| !n.is_empty())
                        .join(" OR ")
                })
                .join(" AND ");
            return write_tagged(out, "GN   ", &format!("{}.", text), LINE_WIDTH);
        }
        for (i, g) in genes.iter().enumerate() {
            if i > 0 {
                writeln!(out, "GN   and")?;
            }
            write_tagged(out, "GN   ", &g.gn_text(), LINE_WIDTH)?;
        }
        Ok(())
    }
}

impl FormatWriter for SwissWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        self.write_header(seq, out)?;
        ctx.write_features(seq, "swissprot", "", out)?;
        let residues = seq.ungapped().to_ascii_uppercase();
        writeln!(
            out,
            "SQ   SEQUENCE{:>6} AA;{:>7} MW;  {} CRC64;",
            residues.len(),
            molecular_weight(&residues).round() as u64,
            crc64_hex(crc64(&residues))
        )?;
        self.body.write(out, "", &seq.seq)?;
        Ok(())
    }
}
