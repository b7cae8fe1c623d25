//! SCF version 3.00 trace files without trace samples: base calls,
//! per-base probabilities and a comment block.

use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};

use crate::error::SeqoutResult;
use crate::io::{QualFormat, SeqSnapshot};

use super::{FormatWriter, WriteContext};

const HEADER_SIZE: u32 = 128;

pub struct ScfWriter;

impl FormatWriter for ScfWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        let n = seq.len();
        let mut comments = format!("NAME={}\n", seq.name_or_default());
        if !seq.desc.is_empty() {
            comments.push_str(&format!("DESC={}\n", seq.desc));
        }
        let Offsets {
            bases: n_bases,
            comments_size,
            comments: comments_offset,
            private: private_offset,
        } = offsets(n, comments.len() + 1).ok_or_else(|| {
            format!(
                "Sequence '{}' is too long for the SCF format",
                seq.name_or_default()
            )
        })?;
        let bases_offset = HEADER_SIZE;

        let mut buf = Vec::with_capacity(HEADER_SIZE as usize + 12 * n + comments.len() + 1);
        buf.write_all(b".scf")?;
        buf.write_u32::<BigEndian>(0)?; // samples
        buf.write_u32::<BigEndian>(HEADER_SIZE)?; // samples offset
        buf.write_u32::<BigEndian>(n_bases)?;
        buf.write_u32::<BigEndian>(0)?; // left clip
        buf.write_u32::<BigEndian>(0)?; // right clip
        buf.write_u32::<BigEndian>(bases_offset)?;
        buf.write_u32::<BigEndian>(comments_size)?;
        buf.write_u32::<BigEndian>(comments_offset)?;
        buf.write_all(b"3.00")?;
        buf.write_u32::<BigEndian>(2)?; // sample size
        buf.write_u32::<BigEndian>(0)?; // code set
        buf.write_u32::<BigEndian>(0)?; // private size
        buf.write_u32::<BigEndian>(private_offset)?;
        buf.extend_from_slice(&[0; 72]);

        // peak positions
        for i in 0..n {
            buf.write_u32::<BigEndian>(i as u32)?;
        }
        // probabilities of A, C, G and T, the called base gets the quality
        let mut qual = Vec::with_capacity(n);
        QualFormat::Phred.encode_all(seq.accuracy.as_deref(), n, &mut qual);
        for base in b"ACGT" {
            buf.extend(seq.seq.iter().zip(&qual).map(|(&c, &q)| {
                let c = if c.eq_ignore_ascii_case(&b'U') { b'T' } else { c };
                if c.eq_ignore_ascii_case(base) {
                    q.min(100)
                } else {
                    0
                }
            }));
        }
        buf.extend_from_slice(&seq.seq);
        buf.extend(std::iter::repeat(0).take(3 * n));
        buf.extend_from_slice(comments.as_bytes());
        buf.push(0);
        out.write_all(&buf)?;
        Ok(())
    }
}

/// Header fields locating the sections of the file
#[derive(Debug, PartialEq)]
struct Offsets {
    bases: u32,
    comments_size: u32,
    comments: u32,
    private: u32,
}

/// `None` if the file would be too large for the 32-bit header fields
fn offsets(n: usize, comments_size: usize) -> Option<Offsets> {
    let bases = u32::try_from(n).ok()?;
    let comments_size = u32::try_from(comments_size).ok()?;
    let comments = bases.checked_mul(12)?.checked_add(HEADER_SIZE)?;
    let private = comments.checked_add(comments_size)?;
    Some(Offsets {
        bases,
        comments_size,
        comments,
        private,
    })
}
