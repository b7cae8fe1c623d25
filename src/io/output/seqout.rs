use std::collections::HashMap;
use std::io;
use std::path::Path;

use crate::error::{SeqoutError, SeqoutResult};
use crate::io::{make_names_unique, pad_to_max, FormatInfo, SeqFormat, SeqSnapshot};
use crate::seq::{Seq, SeqSet, SeqType};

use super::{
    compr_writer, format_writer, io_writer_from_kind, io_writer_from_path, write_bufsize,
    Destination, FormatWriter, OutputKind, OutputOptions, WriteContext, WriteFinish,
};

/// An output session: one destination, one format.
///
/// Streaming formats are written as soon as `write` is called, alignment
/// formats collect the sequences until `flush` or `close`. Dropping a
/// session that was not closed closes it, but errors can then only be
/// logged.
pub struct Seqout<'a> {
    opts: OutputOptions,
    format: SeqFormat,
    info: FormatInfo,
    writer: Box<dyn FormatWriter>,
    dest: Option<Destination<'a>>,
    ctx: WriteContext,
    pending: Vec<SeqSnapshot>,
    count: usize,
    // stems of files written to an output directory
    dir_files: HashMap<String, usize>,
    closed: bool,
    warned_single: bool,
    warned_features: bool,
}

impl Seqout<'static> {
    /// Opens the destination described by the options
    pub fn open(opts: OutputOptions) -> SeqoutResult<Self> {
        let format = resolve_format(&opts)?;
        let dest = io_writer_from_kind(&opts.kind, write_bufsize(opts.compression))?
            .map(|w| compress(w, &format.info(), &opts))
            .transpose()?
            .map(Destination::Owned);
        Ok(Self::init(opts, format, dest))
    }
}

impl<'a> Seqout<'a> {
    /// Writes to a handle owned by the caller, which is flushed but not
    /// closed by `close()`. Everything goes to that handle: `opts.kind`
    /// at most supplies the file name shown in headers.
    pub fn with_writer(
        out: &'a mut dyn io::Write,
        mut opts: OutputOptions,
    ) -> SeqoutResult<Self> {
        let format = resolve_format(&opts)?;
        if matches!(opts.kind, OutputKind::Dir { .. }) {
            opts.kind = OutputKind::Stdout;
        }
        if opts.compression.is_some() {
            log::warn!("Compression is not applied to output handles opened by the caller");
        }
        Ok(Self::init(opts, format, Some(Destination::Borrowed(out))))
    }

    fn init(opts: OutputOptions, format: SeqFormat, dest: Option<Destination<'a>>) -> Self {
        let info = format.info();
        let file_name = opts
            .name
            .clone()
            .or_else(|| match &opts.kind {
                OutputKind::File(p) => p.file_name().map(|n| n.to_string_lossy().to_string()),
                _ => None,
            })
            .unwrap_or_else(|| "stdout".to_string());
        let ctx = WriteContext::new(opts.features && info.features, &file_name);
        log::debug!("Opened {} output ({:?})", info.name, opts.kind);
        Self {
            writer: format_writer(format),
            opts,
            format,
            info,
            dest,
            ctx,
            pending: Vec::new(),
            count: 0,
            dir_files: HashMap::new(),
            closed: false,
            warned_single: false,
            warned_features: false,
        }
    }

    pub fn format(&self) -> SeqFormat {
        self.format
    }

    pub fn format_info(&self) -> &FormatInfo {
        &self.info
    }

    /// Number of sequences written so far (not counting pending ones)
    pub fn count(&self) -> usize {
        self.count
    }

    /// Number of sequences waiting for `flush` / `close`
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of feature tables that failed to be written
    pub fn feature_warnings(&self) -> usize {
        self.ctx.feature_warnings
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Writes a sequence, or stores it for alignment formats.
    /// Sequences of a type the format cannot hold are rejected before
    /// anything is written.
    pub fn write(&mut self, seq: &Seq) -> SeqoutResult<()> {
        self.check_open()?;
        let snap = SeqSnapshot::new(seq, &self.info);
        self.check_type(&snap)?;
        self.check_features(&snap);
        if self.info.buffered {
            log::trace!("Buffering '{}' for {} output", snap.name, self.info.name);
            self.pending.push(snap);
            return Ok(());
        }
        self.emit(std::slice::from_ref(&snap), false)
    }

    /// Writes a set of sequences. Formats holding several datasets (PHYLIP)
    /// write each set as one dataset.
    pub fn write_set(&mut self, set: &SeqSet) -> SeqoutResult<()> {
        self.check_open()?;
        let snaps: Vec<_> = set
            .iter()
            .map(|s| SeqSnapshot::new(s, &self.info))
            .collect();
        for s in &snaps {
            self.check_type(s)?;
            self.check_features(s);
        }
        if self.info.multiset {
            self.flush_pending()?;
            self.pending = snaps;
            self.flush_pending()
        } else if self.info.buffered {
            self.pending.extend(snaps);
            Ok(())
        } else {
            self.emit(&snaps, false)
        }
    }

    /// Writes pending sequences and flushes the destination
    pub fn flush(&mut self) -> SeqoutResult<()> {
        self.check_open()?;
        self.flush_pending()?;
        if let Some(dest) = self.dest.as_mut() {
            dest.writer().flush()?;
        }
        Ok(())
    }

    /// Writes pending sequences and any trailer, then closes owned
    /// destinations. Closing twice has no effect.
    pub fn close(&mut self) -> SeqoutResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // trailers are written and the destination closed even if
        // an earlier step failed; the first error is returned
        let mut res = self.flush_pending();
        if let Some(mut dest) = self.dest.take() {
            let finished = self.writer.finish(dest.writer(), &mut self.ctx);
            let closed = dest.finish().map_err(SeqoutError::from);
            res = res.and(finished).and(closed);
        }
        res?;
        if self.count == 0 && !self.opts.expect_empty {
            log::warn!("No sequences written to {} output", self.info.name);
        }
        log::debug!("Closed {} output after {} sequences", self.info.name, self.count);
        Ok(())
    }

    fn check_open(&self) -> SeqoutResult<()> {
        if self.closed {
            return Err(SeqoutError::Closed);
        }
        Ok(())
    }

    fn check_type(&self, seq: &SeqSnapshot) -> SeqoutResult<()> {
        let ok = match seq.seqtype {
            SeqType::Dna | SeqType::Rna => self.info.nucleotide,
            SeqType::Protein => self.info.protein,
            SeqType::Other => true,
        };
        if !ok {
            return Err(SeqoutError::TypeMismatch {
                format: self.info.name,
                name: seq.name.clone(),
                seqtype: seq.seqtype,
                accepts: self.info.accepts(),
            });
        }
        Ok(())
    }

    fn check_features(&mut self, seq: &SeqSnapshot) {
        if self.opts.features && !self.info.features && seq.has_features() && !self.warned_features
        {
            log::warn!(
                "Features of '{}' are not written, the {} format has no feature tables",
                seq.name_or_default(),
                self.info.name
            );
            self.warned_features = true;
        }
    }

    fn flush_pending(&mut self) -> SeqoutResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let mut seqs = std::mem::take(&mut self.pending);
        let len = pad_to_max(&mut seqs);
        make_names_unique(&mut seqs);
        log::debug!(
            "Writing {} buffered sequences of length {} in {} format",
            seqs.len(),
            len,
            self.info.name
        );
        self.emit(&seqs, true)
    }

    /// Passes sequences to the format writer. With `as_set`, they are
    /// written together (alignment formats).
    fn emit(&mut self, seqs: &[SeqSnapshot], as_set: bool) -> SeqoutResult<()> {
        if let OutputKind::Dir { path, extension } = &self.opts.kind {
            let (path, extension) = (path.clone(), extension.clone());
            if as_set {
                self.emit_file(&path, extension.as_deref(), seqs, true)?;
            } else {
                for seq in seqs {
                    self.emit_file(&path, extension.as_deref(), std::slice::from_ref(seq), false)?;
                }
            }
            return Ok(());
        }

        if self.info.single_file && !self.warned_single && self.count + seqs.len() > 1 {
            log::warn!(
                "The {} format holds a single sequence, but several are written to the same output",
                self.info.name
            );
            self.warned_single = true;
        }
        let dest = self
            .dest
            .as_mut()
            .ok_or_else(|| SeqoutError::NoDestination(seqs[0].name_or_default().to_string()))?;
        if as_set {
            self.writer.write_set(seqs, dest.writer(), &mut self.ctx)?;
        } else {
            for seq in seqs {
                log::trace!("Writing '{}' in {} format", seq.name, self.info.name);
                self.writer.write(seq, dest.writer(), &mut self.ctx)?;
            }
        }
        self.count += seqs.len();
        Ok(())
    }

    /// Writes to a new file in the output directory, named after the
    /// first sequence
    fn emit_file(
        &mut self,
        dir: &Path,
        extension: Option<&str>,
        seqs: &[SeqSnapshot],
        as_set: bool,
    ) -> SeqoutResult<()> {
        let stem = seqs
            .first()
            .map(|s| s.name_or_default().to_string())
            .unwrap_or_default();
        let n = self.dir_files.entry(stem.clone()).or_insert(0);
        *n += 1;
        let stem = if *n > 1 { format!("{}_{}", stem, n) } else { stem };
        let mut file_name = format!("{}.{}", stem, extension.unwrap_or(self.info.extension));
        if let Some(c) = self.opts.compression.filter(|_| !self.info.binary) {
            file_name.push('.');
            file_name.push_str(c.extension());
        }
        let path = dir.join(&file_name);
        log::debug!("Writing to '{}'", path.to_string_lossy());

        let w = io_writer_from_path(&path, write_bufsize(self.opts.compression))?;
        let mut dest = Destination::Owned(compress(w, &self.info, &self.opts)?);
        let mut writer = format_writer(self.format);
        self.ctx.file_name = file_name;
        if as_set {
            writer.write_set(seqs, dest.writer(), &mut self.ctx)?;
        } else {
            for seq in seqs {
                writer.write(seq, dest.writer(), &mut self.ctx)?;
            }
        }
        writer.finish(dest.writer(), &mut self.ctx)?;
        dest.finish()?;
        self.count += seqs.len();
        Ok(())
    }
}

impl Drop for Seqout<'_> {
    fn drop(&mut self) {
        if !self.closed {
            if !self.pending.is_empty() {
                log::debug!(
                    "Output dropped without closing, writing {} pending sequences",
                    self.pending.len()
                );
            }
            if let Err(e) = self.close() {
                log::warn!("Error closing {} output: {}", self.info.name, e);
            }
        }
    }
}

fn resolve_format(opts: &OutputOptions) -> SeqoutResult<SeqFormat> {
    match opts.format.as_deref() {
        Some(name) => SeqFormat::resolve(name),
        None => Ok(SeqFormat::Fasta),
    }
}

fn compress<'a>(
    writer: Box<dyn WriteFinish + 'a>,
    info: &FormatInfo,
    opts: &OutputOptions,
) -> SeqoutResult<Box<dyn WriteFinish + 'a>> {
    if info.binary && opts.compression.is_some() {
        log::warn!("The binary {} format is written without compression", info.name);
        return Ok(writer);
    }
    Ok(compr_writer(writer, opts.compression, opts.compression_level)?)
}
