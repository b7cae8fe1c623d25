use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::SeqoutResult;

use super::{CompressionFormat, FileInfo, SeqFormat, DEFAULT_IO_WRITER_BUFSIZE};

pub use self::seqout::*;
pub use self::writer::*;

mod bam;
mod das;
mod debug;
mod embl;
mod fasta;
mod fastq;
mod genbank;
mod gff;
mod interleaved;
mod msf;
mod sam;
mod scf;
mod seqout;
mod simple;
mod swiss;
mod text;
mod writer;

#[derive(Clone, Debug)]
pub struct OutputOptions {
    pub kind: OutputKind,
    /// Format name or alias, `None` for FASTA
    pub format: Option<String>,
    pub compression: Option<CompressionFormat>,
    pub compression_level: Option<u8>,
    /// Write feature tables in formats that support them
    pub features: bool,
    /// No warning if nothing was written
    pub expect_empty: bool,
    /// File name shown in headers (MSF), defaults to the output file name
    pub name: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> OutputOptions {
        OutputOptions {
            kind: OutputKind::Stdout,
            format: None,
            compression: None,
            compression_level: None,
            features: true,
            expect_empty: false,
            name: None,
        }
    }
}

impl OutputOptions {
    pub fn new(kind: OutputKind, format: &str) -> Self {
        Self {
            kind,
            format: Some(format.to_string()),
            ..Default::default()
        }
    }

    /// Output to a file, with format and compression inferred from the
    /// extension(s)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let info = FileInfo::from_path(&path, SeqFormat::Fasta);
        Self {
            kind: OutputKind::File(path.as_ref().to_owned()),
            format: Some(info.format.name().to_string()),
            compression: info.compression,
            ..Default::default()
        }
    }

    pub fn compression(mut self, compression: Option<CompressionFormat>, level: Option<u8>) -> Self {
        self.compression = compression;
        self.compression_level = level;
        self
    }

    pub fn features(mut self, features: bool) -> Self {
        self.features = features;
        self
    }

    pub fn expect_empty(mut self) -> Self {
        self.expect_empty = true;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputKind {
    Stdout,
    File(PathBuf),
    /// One file per sequence (or per set for alignment formats).
    /// The extension defaults to the one of the format.
    Dir {
        path: PathBuf,
        extension: Option<String>,
    },
}

/// Where a session writes to. Owned handles are finished (and closed)
/// by the session, borrowed ones are only flushed.
pub enum Destination<'a> {
    Owned(Box<dyn WriteFinish + 'a>),
    Borrowed(&'a mut dyn io::Write),
}

impl<'a> Destination<'a> {
    pub fn writer(&mut self) -> &mut dyn io::Write {
        match self {
            Destination::Owned(w) => w,
            Destination::Borrowed(w) => &mut **w,
        }
    }

    pub fn finish(self) -> io::Result<()> {
        match self {
            Destination::Owned(w) => w.finish()?.flush(),
            Destination::Borrowed(w) => w.flush(),
        }
    }
}

/// Required by compression format encoders
pub trait WriteFinish: io::Write {
    fn finish<'a>(self: Box<Self>) -> io::Result<Box<dyn io::Write + 'a>>
    where
        Self: 'a;
}

impl<W: io::Write> WriteFinish for io::BufWriter<W> {
    fn finish<'a>(self: Box<Self>) -> io::Result<Box<dyn io::Write + 'a>>
    where
        Self: 'a,
    {
        Ok(self)
    }
}

#[cfg(feature = "lz4")]
impl<W: io::Write> WriteFinish for lz4::Encoder<W> {
    fn finish<'a>(self: Box<Self>) -> io::Result<Box<dyn io::Write + 'a>>
    where
        Self: 'a,
    {
        let (w, res) = (*self).finish();
        res.map(|_| Box::new(w) as Box<dyn io::Write>)
    }
}

#[cfg(feature = "zstd")]
impl<W: io::Write> WriteFinish for zstd::Encoder<'_, W> {
    fn finish<'a>(self: Box<Self>) -> io::Result<Box<dyn io::Write + 'a>>
    where
        Self: 'a,
    {
        (*self).finish().map(|w| Box::new(w) as Box<dyn io::Write>)
    }
}

#[cfg(feature = "gz")]
impl<W: io::Write> WriteFinish for flate2::write::GzEncoder<W> {
    fn finish<'a>(self: Box<Self>) -> io::Result<Box<dyn io::Write + 'a>>
    where
        Self: 'a,
    {
        (*self).finish().map(|w| Box::new(w) as Box<dyn io::Write>)
    }
}

#[cfg(feature = "bz2")]
impl<W: io::Write> WriteFinish for bzip2::write::BzEncoder<W> {
    fn finish<'a>(self: Box<Self>) -> io::Result<Box<dyn io::Write + 'a>>
    where
        Self: 'a,
    {
        (*self).finish().map(|w| Box::new(w) as Box<dyn io::Write>)
    }
}

pub fn io_writer_from_path(path: &Path, bufsize: usize) -> io::Result<Box<dyn WriteFinish>> {
    let f = File::create(path).map_err(|e| {
        io::Error::other(format!(
            "Error creating '{}': {}",
            path.to_string_lossy(),
            e
        ))
    })?;
    Ok(Box::new(io::BufWriter::with_capacity(bufsize, f)))
}

/// Opens the (uncompressed) writer for a stdout or file destination.
/// Directories have no single writer; their files are opened per sequence.
pub fn io_writer_from_kind(
    kind: &OutputKind,
    bufsize: usize,
) -> SeqoutResult<Option<Box<dyn WriteFinish>>> {
    Ok(match kind {
        OutputKind::Stdout => Some(Box::new(io::BufWriter::with_capacity(
            bufsize,
            io::stdout(),
        ))),
        OutputKind::File(p) => Some(io_writer_from_path(p, bufsize)?),
        OutputKind::Dir { path, .. } => {
            std::fs::create_dir_all(path)?;
            None
        }
    })
}

pub fn compr_writer<'a>(
    writer: Box<dyn WriteFinish + 'a>,
    compression: Option<CompressionFormat>,
    level: Option<u8>,
) -> io::Result<Box<dyn WriteFinish + 'a>> {
    let compression = match compression {
        Some(c) => c,
        None => return Ok(writer),
    };
    Ok(match compression {
        #[cfg(feature = "gz")]
        CompressionFormat::Gzip => Box::new(flate2::write::GzEncoder::new(
            writer,
            flate2::Compression::new(level.unwrap_or(6) as u32),
        )),
        #[cfg(feature = "bz2")]
        CompressionFormat::Bzip2 => Box::new(bzip2::write::BzEncoder::new(
            writer,
            bzip2::Compression::new(level.unwrap_or(6) as u32),
        )),
        #[cfg(feature = "lz4")]
        CompressionFormat::Lz4 => Box::new(
            lz4::EncoderBuilder::new()
                .level(level.unwrap_or(0) as u32)
                .build(writer)?,
        ),
        #[cfg(feature = "zstd")]
        CompressionFormat::Zstd => {
            Box::new(zstd::Encoder::new(writer, level.unwrap_or(0) as i32)?)
        }
    })
}

/// Write buffer size suitable for the compression format
pub fn write_bufsize(compression: Option<CompressionFormat>) -> usize {
    compression
        .map(|c| c.recommended_write_bufsize())
        .unwrap_or(DEFAULT_IO_WRITER_BUFSIZE)
}
