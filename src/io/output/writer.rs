use std::io;

use crate::error::SeqoutResult;
use crate::io::{QualFormat, SeqFormat, SeqSnapshot};

use super::{bam, das, debug, embl, fasta, fastq, genbank, gff, interleaved, msf, sam, scf, simple, swiss};

/// Settings and counters shared by all writers of a session
#[derive(Debug, Clone, Default)]
pub struct WriteContext {
    /// Feature tables are requested and the format supports them
    pub features: bool,
    /// Name of the output (shown in MSF headers)
    pub file_name: String,
    pub(crate) feature_warnings: usize,
}

impl WriteContext {
    pub fn new(features: bool, file_name: &str) -> Self {
        Self {
            features,
            file_name: file_name.to_string(),
            feature_warnings: 0,
        }
    }

    /// Writes the feature table of `seq` (if any) preceded by `header`.
    /// Failures of the feature writer are logged and counted, but do not
    /// stop the entry from being written.
    /// Returns `true` if a table was written.
    pub fn write_features(
        &mut self,
        seq: &SeqSnapshot,
        format: &'static str,
        header: &str,
        out: &mut dyn io::Write,
    ) -> SeqoutResult<bool> {
        if !self.features || !seq.has_features() {
            return Ok(false);
        }
        if let Some(table) = seq.features.as_ref() {
            out.write_all(header.as_bytes())?;
            if let Err(e) = table.write(&seq.feature_request(format), out) {
                log::warn!(
                    "Features of '{}' could not be written in {} format: {}",
                    seq.name_or_default(),
                    format,
                    e
                );
                self.feature_warnings += 1;
            }
            return Ok(true);
        }
        Ok(false)
    }
}

pub trait FormatWriter {
    /// Writes a single sequence
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()>;

    /// Writes several sequences together. Alignment formats receive all
    /// buffered sequences here, padded to the same length.
    fn write_set(
        &mut self,
        seqs: &[SeqSnapshot],
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        for seq in seqs {
            self.write(seq, out, ctx)?;
        }
        Ok(())
    }

    /// Called once before the destination is closed
    fn finish(&mut self, _out: &mut dyn io::Write, _ctx: &mut WriteContext) -> SeqoutResult<()> {
        Ok(())
    }
}

impl<W: FormatWriter + ?Sized> FormatWriter for Box<W> {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        (**self).write(seq, out, ctx)
    }

    fn write_set(
        &mut self,
        seqs: &[SeqSnapshot],
        out: &mut dyn io::Write,
        ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        (**self).write_set(seqs, out, ctx)
    }

    fn finish(&mut self, out: &mut dyn io::Write, ctx: &mut WriteContext) -> SeqoutResult<()> {
        (**self).finish(out, ctx)
    }
}

/// Creates a new writer for the format. Writers keep per-file state
/// (headers already written), so every destination file gets its own.
pub fn format_writer(format: SeqFormat) -> Box<dyn FormatWriter> {
    use self::simple::Simple;
    use crate::io::SeqFormat::*;
    match format {
        Fasta => Box::new(fasta::FastaWriter::new(false)),
        Ncbi => Box::new(fasta::FastaWriter::new(true)),
        Gcg => Box::new(simple::GcgWriter),
        Nbrf => Box::new(simple::NbrfWriter),
        Codata => Box::new(simple::SimpleWriter::new(Simple::Codata)),
        Ig => Box::new(simple::SimpleWriter::new(Simple::Ig)),
        Strider => Box::new(simple::SimpleWriter::new(Simple::Strider)),
        Fitch => Box::new(simple::SimpleWriter::new(Simple::Fitch)),
        Mase => Box::new(simple::SimpleWriter::new(Simple::Mase)),
        Acedb => Box::new(simple::SimpleWriter::new(Simple::Acedb)),
        Staden => Box::new(simple::SimpleWriter::new(Simple::Staden)),
        Text => Box::new(simple::SimpleWriter::new(Simple::Text)),
        Raw => Box::new(simple::SimpleWriter::new(Simple::Raw)),
        Asn1 => Box::new(simple::SimpleWriter::new(Simple::Asn1)),
        Experiment => Box::new(embl::ExperimentWriter),
        DasDna => Box::new(das::DasWriter::new(true)),
        DasSequence => Box::new(das::DasWriter::new(false)),
        Embl => Box::new(embl::EmblWriter::new(false)),
        EmblOld => Box::new(embl::EmblWriter::new(true)),
        Swiss => Box::new(swiss::SwissWriter::new(false)),
        SwissOld => Box::new(swiss::SwissWriter::new(true)),
        Genbank => Box::new(genbank::GenbankWriter::new(genbank::Flavour::Genbank)),
        Genpept => Box::new(genbank::GenbankWriter::new(genbank::Flavour::Genpept)),
        Refseq => Box::new(genbank::GenbankWriter::new(genbank::Flavour::Refseq)),
        Refseqp => Box::new(genbank::GenbankWriter::new(genbank::Flavour::Refseqp)),
        Gff3 => Box::new(gff::GffWriter::new(3)),
        Gff2 => Box::new(gff::GffWriter::new(2)),
        Fastq(q) => Box::new(fastq::FastqWriter::new(match q {
            QualFormat::Phred => QualFormat::Sanger,
            q => q,
        })),
        Sam => Box::new(sam::SamWriter::default()),
        Bam => Box::new(bam::BamWriter::default()),
        Scf => Box::new(scf::ScfWriter),
        Msf => Box::new(msf::MsfWriter),
        Clustal => Box::new(interleaved::ClustalWriter),
        Phylip => Box::new(interleaved::PhylipWriter::new(true)),
        PhylipNon => Box::new(interleaved::PhylipWriter::new(false)),
        Nexus => Box::new(interleaved::NexusWriter::new(true)),
        NexusNon => Box::new(interleaved::NexusWriter::new(false)),
        Selex => Box::new(interleaved::SelexWriter),
        Mega => Box::new(interleaved::MegaWriter::new(true)),
        MegaNon => Box::new(interleaved::MegaWriter::new(false)),
        Hennig86 => Box::new(interleaved::Hennig86Writer),
        Jackknifer => Box::new(interleaved::JackknifeWriter::new(true)),
        JackkniferNon => Box::new(interleaved::JackknifeWriter::new(false)),
        Treecon => Box::new(interleaved::TreeconWriter),
        Debug => Box::new(debug::DebugWriter),
    }
}
