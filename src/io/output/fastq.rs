use std::io;

use seq_io::fastq;

use crate::error::SeqoutResult;
use crate::io::{QualFormat, SeqSnapshot};

use super::{FormatWriter, WriteContext};

/// FASTQ with Sanger, Illumina 1.3 or Solexa quality encoding
pub struct FastqWriter {
    format: QualFormat,
    qual: Vec<u8>,
}

impl FastqWriter {
    pub fn new(format: QualFormat) -> Self {
        Self {
            format,
            qual: Vec::new(),
        }
    }
}

impl FormatWriter for FastqWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        self.qual.clear();
        self.format
            .encode_all(seq.accuracy.as_deref(), seq.len(), &mut self.qual);
        let desc = if seq.desc.is_empty() {
            None
        } else {
            Some(seq.desc.as_bytes())
        };
        fastq::write_parts(
            &mut *out,
            seq.name_or_default().as_bytes(),
            desc,
            &seq.seq,
            &self.qual,
        )?;
        Ok(())
    }
}
