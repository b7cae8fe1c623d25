//! BAM output: unaligned records in BGZF-compressed blocks

use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use noodles_bgzf as bgzf;

use crate::error::SeqoutResult;
use crate::io::{QualFormat, SeqSnapshot};

use super::sam::sam_header;
use super::{FormatWriter, WriteContext};

/// Residue codes in BAM records, indexed by their 4-bit value
const SEQ_CODES: &[u8; 16] = b"=ACMGRSVTWYHKDBN";

/// `reg2bin(-1, 0)`, the bin of unmapped reads
const UNMAPPED_BIN: u16 = 4680;

/// BGZF blocks are compressed into memory and handed to the destination
/// as soon as they are complete.
#[derive(Default)]
pub struct BamWriter {
    bgzf: Option<bgzf::io::Writer<Vec<u8>>>,
    record: Vec<u8>,
    qual: Vec<u8>,
}

impl BamWriter {
    /// Returns the block writer, starting it with the BAM header
    fn bgzf(&mut self) -> io::Result<&mut bgzf::io::Writer<Vec<u8>>> {
        let w = match self.bgzf.take() {
            Some(w) => w,
            None => start_bam()?,
        };
        Ok(self.bgzf.insert(w))
    }

    fn encode_record(&mut self, seq: &SeqSnapshot) -> io::Result<()> {
        let mut name = seq.name_or_default().as_bytes();
        if name.len() > 254 {
            name = &name[..254];
        }
        let l_seq = seq.len();
        self.qual.clear();
        match seq.accuracy.as_deref() {
            Some(a) => QualFormat::Phred.encode_all(Some(a), l_seq, &mut self.qual),
            // missing qualities are all 0xff
            None => self.qual.resize(l_seq, 0xff),
        }
        let block_size = 32 + name.len() + 1 + l_seq.div_ceil(2) + l_seq;
        let block_size = i32::try_from(block_size).map_err(|_| {
            io::Error::other(format!("BAM record '{}' is too long", seq.name_or_default()))
        })?;

        let b = &mut self.record;
        b.clear();
        b.write_i32::<LittleEndian>(block_size)?;
        b.write_i32::<LittleEndian>(-1)?; // refID
        b.write_i32::<LittleEndian>(-1)?; // pos
        b.write_u8(name.len() as u8 + 1)?;
        b.write_u8(0)?; // mapq
        b.write_u16::<LittleEndian>(UNMAPPED_BIN)?;
        b.write_u16::<LittleEndian>(0)?; // n_cigar_op
        b.write_u16::<LittleEndian>(4)?; // flag: unmapped
        b.write_i32::<LittleEndian>(l_seq as i32)?;
        b.write_i32::<LittleEndian>(-1)?; // next refID
        b.write_i32::<LittleEndian>(-1)?; // next pos
        b.write_i32::<LittleEndian>(0)?; // tlen
        b.write_all(name)?;
        b.write_u8(0)?;
        pack_seq(&seq.seq, b);
        b.write_all(&self.qual)?;
        Ok(())
    }
}

impl FormatWriter for BamWriter {
    fn write(
        &mut self,
        seq: &SeqSnapshot,
        out: &mut dyn io::Write,
        _ctx: &mut WriteContext,
    ) -> SeqoutResult<()> {
        self.encode_record(seq)?;
        let record = std::mem::take(&mut self.record);
        let w = self.bgzf()?;
        w.write_all(&record)?;
        // pass on completed blocks
        out.write_all(w.get_ref())?;
        w.get_mut().clear();
        self.record = record;
        Ok(())
    }

    fn finish(&mut self, out: &mut dyn io::Write, _ctx: &mut WriteContext) -> SeqoutResult<()> {
        self.bgzf()?;
        if let Some(w) = self.bgzf.take() {
            out.write_all(&w.finish()?)?;
        }
        Ok(())
    }
}

fn start_bam() -> io::Result<bgzf::io::Writer<Vec<u8>>> {
    let text = sam_header();
    let mut w = bgzf::io::Writer::new(Vec::new());
    w.write_all(b"BAM\x01")?;
    w.write_i32::<LittleEndian>(text.len() as i32)?;
    w.write_all(text.as_bytes())?;
    // no reference sequences
    w.write_i32::<LittleEndian>(0)?;
    Ok(w)
}

/// Packs residues into 4-bit codes, two per byte (first residue in the
/// high nibble). Unknown residues become N.
pub fn pack_seq(seq: &[u8], out: &mut Vec<u8>) {
    for pair in seq.chunks(2) {
        let hi = seq_code(pair[0]);
        let lo = pair.get(1).map(|&c| seq_code(c)).unwrap_or(0);
        out.push(hi << 4 | lo);
    }
}

#[inline]
fn seq_code(c: u8) -> u8 {
    let c = match c.to_ascii_uppercase() {
        b'U' => b'T',
        c => c,
    };
    SEQ_CODES.iter().position(|&s| s == c).unwrap_or(15) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;
    use crate::seq::Seq;
    use byteorder::ReadBytesExt;
    use std::io::{Cursor, Read};

    fn decode(out: &[u8]) -> Vec<u8> {
        let mut data = vec![];
        bgzf::io::Reader::new(out).read_to_end(&mut data).unwrap();
        data
    }

    #[test]
    fn packed() {
        let mut out = vec![];
        pack_seq(b"ACGTN", &mut out);
        assert_eq!(out, [0x12, 0x48, 0xf0]);
        out.clear();
        pack_seq(b"acgu=X", &mut out);
        assert_eq!(out, [0x12, 0x48, 0x0f]);
    }

    #[test]
    fn bam() {
        let seq = Seq::new("r1", b"ACGTA").with_accuracy(vec![30., 31., 32., 33., 34.]);
        let snap = SeqSnapshot::new(&seq, &SeqFormat::Bam.info());
        let mut w = BamWriter::default();
        let mut out = vec![];
        let mut ctx = WriteContext::default();
        w.write(&snap, &mut out, &mut ctx).unwrap();
        w.finish(&mut out, &mut ctx).unwrap();

        // empty EOF block at the end
        assert_eq!(out.len() - out.windows(2).rposition(|w| w == [0x1f, 0x8b]).unwrap(), 28);
        assert!(decode(&out[out.len() - 28..]).is_empty());
        assert_eq!(&out[12..14], b"BC");

        let data = decode(&out);
        assert_eq!(&data[..4], b"BAM\x01");
        let mut r = Cursor::new(&data[4..]);
        let l_text = r.read_i32::<LittleEndian>().unwrap() as usize;
        let mut text = vec![0; l_text];
        r.read_exact(&mut text).unwrap();
        assert!(text.starts_with(b"@HD\tVN:1.3\tSO:unsorted\n"));
        assert_eq!(r.read_i32::<LittleEndian>().unwrap(), 0);
        let block_size = r.read_i32::<LittleEndian>().unwrap();
        assert_eq!(block_size, 32 + 3 + 3 + 5);
        assert_eq!(r.read_i32::<LittleEndian>().unwrap(), -1);
        assert_eq!(r.read_i32::<LittleEndian>().unwrap(), -1);
        assert_eq!(r.read_u8().unwrap(), 3);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_u16::<LittleEndian>().unwrap(), 4680);
        assert_eq!(r.read_u16::<LittleEndian>().unwrap(), 0);
        assert_eq!(r.read_u16::<LittleEndian>().unwrap(), 4);
        assert_eq!(r.read_i32::<LittleEndian>().unwrap(), 5);
        let mut rest = vec![];
        r.read_to_end(&mut rest).unwrap();
        assert_eq!(&rest[12..], b"r1\x00\x12\x48\x10\x1e\x1f\x20\x21\x22");
    }

    #[test]
    fn large_blocks() {
        let seq = Seq::new("long", &vec![b'A'; 100_000]);
        let snap = SeqSnapshot::new(&seq, &SeqFormat::Bam.info());
        let mut w = BamWriter::default();
        let mut out = vec![];
        let mut ctx = WriteContext::default();
        w.write(&snap, &mut out, &mut ctx).unwrap();
        // full blocks are passed on before finishing
        let written = out.len();
        assert!(written > 0);
        w.finish(&mut out, &mut ctx).unwrap();
        assert!(out.len() > written);
        let data = decode(&out);
        let header_len = 4 + 4 + sam_header().len() + 4;
        assert_eq!(data.len(), header_len + 4 + 32 + 5 + 50_000 + 100_000);
    }

    #[test]
    fn no_records() {
        let mut w = BamWriter::default();
        let mut out = vec![];
        w.finish(&mut out, &mut WriteContext::default()).unwrap();
        let data = decode(&out);
        assert_eq!(data.len(), 4 + 4 + sam_header().len() + 4);
        assert_eq!(&data[..4], b"BAM\x01");
    }
}
