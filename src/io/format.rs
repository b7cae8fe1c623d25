use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::error::{SeqoutError, SeqoutResult};

use super::{QualFormat, DEFAULT_IO_WRITER_BUFSIZE};

/// All output formats. Properties are looked up with [`SeqFormat::info`].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, EnumIter)]
pub enum SeqFormat {
    Fasta,
    Ncbi,
    Gcg,
    Nbrf,
    Codata,
    Ig,
    Strider,
    Fitch,
    Mase,
    Acedb,
    Staden,
    Experiment,
    Text,
    Raw,
    Asn1,
    DasDna,
    DasSequence,
    Embl,
    EmblOld,
    Swiss,
    SwissOld,
    Genbank,
    Genpept,
    Refseq,
    Refseqp,
    Gff3,
    Gff2,
    Fastq(QualFormat),
    Sam,
    Bam,
    Scf,
    Msf,
    Clustal,
    Phylip,
    PhylipNon,
    Nexus,
    NexusNon,
    Selex,
    Mega,
    MegaNon,
    Hennig86,
    Jackknifer,
    JackkniferNon,
    Treecon,
    Debug,
}

/// Static properties of an output format
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct FormatInfo {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub nucleotide: bool,
    pub protein: bool,
    /// Feature tables can be embedded
    pub features: bool,
    /// Gap characters are kept (otherwise removed before writing)
    pub gaps: bool,
    /// Only one sequence per file
    pub single_file: bool,
    /// Sequences are collected and written together on flush / close
    pub buffered: bool,
    /// Several sets (datasets) can follow each other in one file
    pub multiset: bool,
    pub binary: bool,
    pub extension: &'static str,
}

impl FormatInfo {
    const fn new(name: &'static str, extension: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            nucleotide: true,
            protein: true,
            features: false,
            gaps: true,
            single_file: false,
            buffered: false,
            multiset: false,
            binary: false,
            extension,
        }
    }

    const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    const fn nuc(mut self) -> Self {
        self.protein = false;
        self
    }

    const fn prot(mut self) -> Self {
        self.nucleotide = false;
        self
    }

    const fn feat(mut self) -> Self {
        self.features = true;
        self
    }

    const fn nogap(mut self) -> Self {
        self.gaps = false;
        self
    }

    const fn single(mut self) -> Self {
        self.single_file = true;
        self
    }

    const fn buffered(mut self) -> Self {
        self.buffered = true;
        self
    }

    const fn multiset(mut self) -> Self {
        self.multiset = true;
        self
    }

    const fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// Human-readable description of the accepted sequence types
    pub fn accepts(&self) -> &'static str {
        match (self.nucleotide, self.protein) {
            (true, false) => "nucleotide",
            (false, true) => "protein",
            _ => "nucleotide or protein",
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl SeqFormat {
    pub fn info(self) -> FormatInfo {
        use self::SeqFormat::*;
        match self {
            Fasta => FormatInfo::new("fasta", "fasta").aliases(&["pearson", "fa"]),
            Ncbi => FormatInfo::new("ncbi", "fasta"),
            Gcg => FormatInfo::new("gcg", "gcg"),
            Nbrf => FormatInfo::new("nbrf", "pir").aliases(&["pir"]).feat(),
            Codata => FormatInfo::new("codata", "codata"),
            Ig => FormatInfo::new("ig", "ig"),
            Strider => FormatInfo::new("strider", "strider").nuc(),
            Fitch => FormatInfo::new("fitch", "fitch"),
            Mase => FormatInfo::new("mase", "mase"),
            Acedb => FormatInfo::new("acedb", "acedb"),
            Staden => FormatInfo::new("staden", "staden").nuc(),
            Experiment => FormatInfo::new("experiment", "exp").nuc().single(),
            Text => FormatInfo::new("text", "txt").aliases(&["plain", "asis"]),
            Raw => FormatInfo::new("raw", "raw").nogap(),
            Asn1 => FormatInfo::new("asn1", "asn1"),
            DasDna => FormatInfo::new("dasdna", "xml").nuc(),
            DasSequence => FormatInfo::new("dassequence", "xml").aliases(&["das"]),
            Embl => FormatInfo::new("embl", "embl").aliases(&["em"]).nuc().feat(),
            EmblOld => FormatInfo::new("emblold", "embl").nuc().feat(),
            Swiss => FormatInfo::new("swiss", "swiss")
                .aliases(&["sw", "swissprot", "uniprot"])
                .prot()
                .feat(),
            SwissOld => FormatInfo::new("swissold", "swiss").prot().feat(),
            Genbank => FormatInfo::new("genbank", "gb")
                .aliases(&["gb", "ddbj"])
                .nuc()
                .feat(),
            Genpept => FormatInfo::new("genpept", "gp").prot().feat(),
            Refseq => FormatInfo::new("refseq", "gb").nuc().feat(),
            Refseqp => FormatInfo::new("refseqp", "gp").prot().feat(),
            Gff3 => FormatInfo::new("gff3", "gff").aliases(&["gff"]).feat(),
            Gff2 => FormatInfo::new("gff2", "gff").feat(),
            Fastq(QualFormat::Illumina) => FormatInfo::new("fastq-illumina", "fastq").nuc().nogap(),
            Fastq(QualFormat::Solexa) => FormatInfo::new("fastq-solexa", "fastq").nuc().nogap(),
            Fastq(_) => FormatInfo::new("fastq-sanger", "fastq")
                .aliases(&["fastq", "fq"])
                .nuc()
                .nogap(),
            Sam => FormatInfo::new("sam", "sam").nuc().nogap(),
            Bam => FormatInfo::new("bam", "bam").nuc().nogap().binary(),
            Scf => FormatInfo::new("scf", "scf").nuc().nogap().single().binary(),
            Msf => FormatInfo::new("msf", "msf").buffered(),
            Clustal => FormatInfo::new("clustal", "aln").aliases(&["aln"]).buffered(),
            Phylip => FormatInfo::new("phylip", "phy").buffered().multiset(),
            PhylipNon => FormatInfo::new("phylipnon", "phy").buffered().multiset(),
            Nexus => FormatInfo::new("nexus", "nex").aliases(&["paup"]).buffered(),
            NexusNon => FormatInfo::new("nexusnon", "nex").aliases(&["paupnon"]).buffered(),
            Selex => FormatInfo::new("selex", "selex").buffered(),
            Mega => FormatInfo::new("mega", "meg").buffered(),
            MegaNon => FormatInfo::new("meganon", "meg").buffered(),
            Hennig86 => FormatInfo::new("hennig86", "hen").buffered(),
            Jackknifer => FormatInfo::new("jackknifer", "jack").buffered(),
            JackkniferNon => FormatInfo::new("jackknifernon", "jack").buffered(),
            Treecon => FormatInfo::new("treecon", "treecon").buffered(),
            Debug => FormatInfo::new("debug", "debug").feat(),
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Looks up a format by name or alias (case-insensitive)
    pub fn resolve(name: &str) -> SeqoutResult<SeqFormat> {
        let name = name.trim();
        SeqFormat::iter()
            .flat_map(|f| match f {
                // expand the quality variants, which `iter()` only yields once
                SeqFormat::Fastq(_) => vec![
                    SeqFormat::Fastq(QualFormat::Sanger),
                    SeqFormat::Fastq(QualFormat::Illumina),
                    SeqFormat::Fastq(QualFormat::Solexa),
                ],
                f => vec![f],
            })
            .find(|f| f.info().matches(name))
            .ok_or_else(|| SeqoutError::UnknownFormat(name.to_string()))
    }

    /// Like `resolve`, but an unknown or missing name falls back to FASTA
    /// with a warning
    pub fn resolve_or_fasta(name: Option<&str>) -> SeqFormat {
        match name {
            None => SeqFormat::Fasta,
            Some(n) => Self::resolve(n).unwrap_or_else(|e| {
                log::warn!("{}, writing FASTA instead", e);
                SeqFormat::Fasta
            }),
        }
    }

    /// Names of all formats, for error messages and listings
    pub fn list() -> String {
        SeqFormat::iter()
            .map(|f| match f {
                SeqFormat::Fastq(_) => "fastq-sanger, fastq-illumina, fastq-solexa",
                f => f.name(),
            })
            .join(", ")
    }
}

impl fmt::Display for SeqFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeqFormat {
    type Err = SeqoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeqFormat::resolve(s)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum CompressionFormat {
    #[cfg(feature = "gz")]
    Gzip,
    #[cfg(feature = "bz2")]
    Bzip2,
    #[cfg(feature = "lz4")]
    Lz4,
    #[cfg(feature = "zstd")]
    Zstd,
}

impl CompressionFormat {
    const FORMAT_MAP: &[(&[&str], CompressionFormat)] = &[
        #[cfg(feature = "gz")]
        (&["gz", "gzip"], CompressionFormat::Gzip),
        #[cfg(feature = "bz2")]
        (&["bz2", "bzip2"], CompressionFormat::Bzip2),
        #[cfg(feature = "lz4")]
        (&["lz4"], CompressionFormat::Lz4),
        #[cfg(feature = "zstd")]
        (&["zst", "zstd", "zstandard"], CompressionFormat::Zstd),
    ];

    pub fn str_match(s: &str) -> Option<CompressionFormat> {
        let s = s.to_ascii_lowercase();
        Self::FORMAT_MAP
            .iter()
            .find(|(names, _)| names.contains(&s.as_str()))
            .map(|(_, format)| *format)
    }

    /// File extension appended to output files in directories
    pub fn extension(self) -> &'static str {
        Self::FORMAT_MAP
            .iter()
            .find(|(_, f)| *f == self)
            .map(|(names, _)| names[0])
            .unwrap_or("")
    }

    pub fn recommended_write_bufsize(self) -> usize {
        match self {
            #[cfg(feature = "zstd")]
            CompressionFormat::Zstd => zstd::Encoder::<io::Sink>::recommended_input_size(),
            _ => DEFAULT_IO_WRITER_BUFSIZE,
        }
    }
}

impl FromStr for CompressionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(format) = CompressionFormat::str_match(s) {
            Ok(format)
        } else {
            let fmt_list = CompressionFormat::FORMAT_MAP
                .iter()
                .map(|(names, _)| names.join("/"))
                .join(", ");
            Err(format!(
                "Unknown compression format: {}. Valid formats are: {}.",
                s, fmt_list
            ))
        }
    }
}

/// Information on the sequence format and compression
/// which can be inferred from the file extensions
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FileInfo {
    pub format: SeqFormat,
    pub compression: Option<CompressionFormat>,
}

impl FileInfo {
    pub fn new(format: SeqFormat, compression: Option<CompressionFormat>) -> Self {
        Self {
            format,
            compression,
        }
    }

    /// Infers format and compression from an extension chain such as
    /// `out.embl.gz`. Unknown extensions are reported and `default_format`
    /// is used instead.
    pub fn from_path<P: AsRef<Path>>(path: P, default_format: SeqFormat) -> Self {
        let mut _path = path.as_ref().to_owned();

        let compression = _path
            .extension()
            .and_then(|ext| CompressionFormat::str_match(&ext.to_string_lossy()));
        if compression.is_some() {
            if let Some(stem) = _path.file_stem() {
                _path = stem.into();
            }
        }

        let format = match _path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy();
                SeqFormat::resolve(&ext)
                    .ok()
                    .or_else(|| {
                        SeqFormat::iter().find(|f| f.info().extension.eq_ignore_ascii_case(&ext))
                    })
                    .unwrap_or_else(|| {
                        log::warn!(
                            "Unknown extension: '{}', assuming {} format",
                            ext,
                            default_format
                        );
                        default_format
                    })
            }
            None => {
                log::debug!(
                    "No extension for file '{}' assuming {} format",
                    path.as_ref().to_string_lossy(),
                    default_format
                );
                default_format
            }
        };

        Self {
            format,
            compression,
        }
    }
}

impl FromStr for FileInfo {
    type Err = SeqoutError;

    /// Parses `format[.compression]`, e.g. "embl.gz"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (format, compression) = match s.split_once('.') {
            Some((f, c)) => (f, Some(CompressionFormat::from_str(c)?)),
            None => (s, None),
        };
        Ok(FileInfo {
            format: SeqFormat::resolve(format)?,
            compression,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve() {
        assert_eq!(SeqFormat::resolve("gb").unwrap(), SeqFormat::Genbank);
        assert_eq!(SeqFormat::resolve("DDBJ").unwrap(), SeqFormat::Genbank);
        assert_eq!(SeqFormat::resolve("paup").unwrap(), SeqFormat::Nexus);
        assert_eq!(SeqFormat::resolve("Swiss").unwrap(), SeqFormat::Swiss);
        assert_eq!(SeqFormat::resolve("uniprot").unwrap(), SeqFormat::Swiss);
        assert_eq!(
            SeqFormat::resolve("fastq").unwrap(),
            SeqFormat::Fastq(QualFormat::Sanger)
        );
        assert_eq!(
            SeqFormat::resolve("fastq-solexa").unwrap(),
            SeqFormat::Fastq(QualFormat::Solexa)
        );
        assert!(matches!(
            SeqFormat::resolve("nonexistent"),
            Err(SeqoutError::UnknownFormat(_))
        ));
        assert_eq!(SeqFormat::resolve_or_fasta(Some("nonexistent")), SeqFormat::Fasta);
        assert_eq!(SeqFormat::resolve_or_fasta(None), SeqFormat::Fasta);
    }

    #[test]
    fn names_unique() {
        let names: Vec<_> = SeqFormat::iter()
            .flat_map(|f| {
                let i = f.info();
                std::iter::once(i.name).chain(i.aliases.iter().copied())
            })
            .collect();
        assert_eq!(names.len(), names.iter().unique().count());
        // every name resolves to its own format
        for f in SeqFormat::iter() {
            assert_eq!(SeqFormat::resolve(f.name()).unwrap(), f);
        }
    }

    #[test]
    fn properties() {
        let phylip = SeqFormat::Phylip.info();
        assert!(phylip.buffered && phylip.multiset);
        let embl = SeqFormat::Embl.info();
        assert!(embl.nucleotide && !embl.protein && embl.features);
        assert_eq!(embl.accepts(), "nucleotide");
        assert!(SeqFormat::Scf.info().single_file);
        assert!(!SeqFormat::Fastq(QualFormat::Illumina).info().gaps);
        assert!(!SeqFormat::Fasta.info().buffered);
    }

    #[test]
    fn file_info() {
        let i = FileInfo::from_path("out.embl", SeqFormat::Fasta);
        assert_eq!(i, FileInfo::new(SeqFormat::Embl, None));
        let i = FileInfo::from_path("out.aln", SeqFormat::Fasta);
        assert_eq!(i.format, SeqFormat::Clustal);
        let i = FileInfo::from_path("out.xyz", SeqFormat::Fasta);
        assert_eq!(i.format, SeqFormat::Fasta);
        #[cfg(feature = "gz")]
        {
            let i = FileInfo::from_path("out.gb.gz", SeqFormat::Fasta);
            assert_eq!(
                i,
                FileInfo::new(SeqFormat::Genbank, Some(CompressionFormat::Gzip))
            );
            let i: FileInfo = "msf.gz".parse().unwrap();
            assert_eq!(i.format, SeqFormat::Msf);
        }
    }
}
