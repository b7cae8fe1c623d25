//! Per-write copy of a sequence, trimmed and ready for a format writer

use std::collections::HashMap;
use std::sync::Arc;

use bio::alphabets::dna;

use crate::feature::{FeatureRequest, FeatureTable};
use crate::seq::{Seq, SeqDate, SeqGene, SeqRef, SeqType, SeqXref};

use super::FormatInfo;

/// Name given to sequences without a name
pub const DEFAULT_NAME: &str = "EMBOSS";

/// Snapshot of a [`Seq`] taken when it is written.
///
/// The residues are already trimmed to the requested range (and
/// reverse-complemented if requested); the accuracy values are sliced
/// accordingly. The feature table is shared, not copied.
#[derive(Debug, Clone)]
pub struct SeqSnapshot {
    pub name: String,
    pub acc: String,
    pub acc_list: Vec<String>,
    pub sv: String,
    pub gi: String,
    pub db: String,
    pub full_name: String,
    pub desc: String,
    pub doc: String,
    pub keywords: Vec<String>,
    pub tax: String,
    pub tax_id: String,
    pub tax_list: Vec<String>,
    pub organelle: String,
    pub molecule: String,
    pub class: String,
    pub division: String,
    pub date: Option<SeqDate>,
    pub refs: Vec<SeqRef>,
    pub xrefs: Vec<SeqXref>,
    pub genes: Vec<SeqGene>,
    pub comments: Vec<String>,
    pub seqtype: SeqType,
    pub seq: Vec<u8>,
    pub accuracy: Option<Vec<f32>>,
    pub features: Option<Arc<dyn FeatureTable>>,
    /// 1-based inclusive range of the source sequence that was taken
    pub begin: usize,
    pub end: usize,
    /// Residues removed from the start / end relative to the original sequence
    pub offset: usize,
    pub offend: usize,
    pub reversed: bool,
    pub circular: bool,
}

impl SeqSnapshot {
    pub fn new(seq: &Seq, info: &FormatInfo) -> Self {
        let (start, end) = seq.trim_range();
        let seqtype = seq.seqtype();
        let mut residues = seq.seq[start..end].to_vec();
        let mut accuracy = seq.accuracy.as_ref().map(|a| {
            let e = end.min(a.len());
            a[start.min(e)..e].to_vec()
        });
        let reversed = seq.reversed && seqtype != SeqType::Protein;
        if reversed {
            let rna = seqtype == SeqType::Rna;
            if rna {
                swap_residue(&mut residues, b'U', b'T');
            }
            residues = dna::revcomp(&residues);
            if rna {
                swap_residue(&mut residues, b'T', b'U');
            }
            if let Some(a) = accuracy.as_mut() {
                a.reverse();
            }
        }
        if !info.gaps {
            remove_gaps(&mut residues, accuracy.as_mut());
        }
        Self {
            name: seq.name.clone(),
            acc: seq.acc.clone(),
            acc_list: seq.acc_list.clone(),
            sv: seq.sv.clone(),
            gi: seq.gi.clone(),
            db: seq.db.clone(),
            full_name: seq.full_name.clone(),
            desc: seq.desc.clone(),
            doc: seq.doc.clone(),
            keywords: seq.keywords.clone(),
            tax: seq.tax.clone(),
            tax_id: seq.tax_id.clone(),
            tax_list: seq.tax_list.clone(),
            organelle: seq.organelle.clone(),
            molecule: seq.molecule.clone(),
            class: seq.class.clone(),
            division: seq.division.clone(),
            date: seq.date.clone(),
            refs: seq.refs.clone(),
            xrefs: seq.xrefs.clone(),
            genes: seq.genes.clone(),
            comments: seq.comments.clone(),
            seqtype,
            seq: residues,
            accuracy,
            features: seq.features.clone(),
            begin: start + 1,
            end,
            offset: seq.offset + start,
            offend: seq.offend + (seq.seq.len() - end),
            reversed,
            circular: seq.circular,
        }
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    pub fn is_nucleotide(&self) -> bool {
        self.seqtype.is_nucleotide()
    }

    /// The name, or a placeholder if empty
    pub fn name_or_default(&self) -> &str {
        if self.name.is_empty() {
            DEFAULT_NAME
        } else {
            &self.name
        }
    }

    /// Accession with version if known ("X56734.1")
    pub fn acc_version(&self) -> &str {
        if !self.sv.is_empty() {
            &self.sv
        } else {
            &self.acc
        }
    }

    /// Numeric part of the sequence version, 1 if unknown
    pub fn version_number(&self) -> u32 {
        self.sv
            .rsplit_once('.')
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1)
    }

    pub fn has_features(&self) -> bool {
        self.features.as_ref().is_some_and(|f| !f.is_empty())
    }

    /// Describes this entry to the feature table writer
    pub fn feature_request(&self, format: &'static str) -> FeatureRequest<'_> {
        FeatureRequest {
            format,
            seq_name: self.name_or_default(),
            seqtype: self.seqtype,
            begin: self.begin,
            end: self.end,
            reversed: self.reversed,
        }
    }

    /// Counts of A, C, G, T (incl. U) and other residues
    pub fn base_counts(&self) -> [usize; 5] {
        let a = bytecount::count(&self.seq, b'A') + bytecount::count(&self.seq, b'a');
        let c = bytecount::count(&self.seq, b'C') + bytecount::count(&self.seq, b'c');
        let g = bytecount::count(&self.seq, b'G') + bytecount::count(&self.seq, b'g');
        let t = bytecount::count(&self.seq, b'T')
            + bytecount::count(&self.seq, b't')
            + bytecount::count(&self.seq, b'U')
            + bytecount::count(&self.seq, b'u');
        [a, c, g, t, self.seq.len() - a - c - g - t]
    }

    /// Residues without gap characters
    pub fn ungapped(&self) -> Vec<u8> {
        self.seq
            .iter()
            .copied()
            .filter(|c| !is_gap(*c))
            .collect()
    }
}

#[inline]
pub fn is_gap(c: u8) -> bool {
    matches!(c, b'-' | b'.' | b'~' | b' ')
}

fn swap_residue(seq: &mut [u8], from: u8, to: u8) {
    for c in seq {
        if *c == from {
            *c = to;
        } else if *c == from.to_ascii_lowercase() {
            *c = to.to_ascii_lowercase();
        }
    }
}

fn remove_gaps(seq: &mut Vec<u8>, accuracy: Option<&mut Vec<f32>>) {
    if memchr::memchr3(b'-', b'.', b'~', seq).is_none() && memchr::memchr(b' ', seq).is_none() {
        return;
    }
    if let Some(acc) = accuracy {
        let mut i = 0;
        acc.retain(|_| {
            let keep = seq.get(i).map_or(true, |c| !is_gap(*c));
            i += 1;
            keep
        });
    }
    seq.retain(|c| !is_gap(*c));
}

/// Pads all sequences with `-` to the length of the longest one.
/// Returns that length.
pub fn pad_to_max(seqs: &mut [SeqSnapshot]) -> usize {
    let max_len = seqs.iter().map(|s| s.len()).max().unwrap_or(0);
    for s in seqs.iter_mut() {
        s.seq.resize(max_len, b'-');
    }
    max_len
}

/// Replaces empty names by a placeholder and makes duplicated names unique
/// by appending `_2`, `_3`, ...
pub fn make_names_unique(seqs: &mut [SeqSnapshot]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for s in seqs.iter_mut() {
        if s.name.is_empty() {
            s.name = DEFAULT_NAME.to_string();
        }
        let n = seen.entry(s.name.clone()).or_insert(0);
        *n += 1;
        if *n > 1 {
            let mut i = *n;
            let mut name = format!("{}_{}", s.name, i);
            while seen.contains_key(&name) {
                i += 1;
                name = format!("{}_{}", s.name, i);
            }
            seen.insert(name.clone(), 1);
            s.name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::SeqFormat;

    fn snap(seq: &Seq) -> SeqSnapshot {
        SeqSnapshot::new(seq, &SeqFormat::Fasta.info())
    }

    #[test]
    fn trimmed() {
        let seq = Seq::new("s", b"ACGTTGCA")
            .with_accuracy(vec![1., 2., 3., 4., 5., 6., 7., 8.])
            .with_range(2, 5);
        let s = snap(&seq);
        assert_eq!(&s.seq, b"CGTT");
        assert_eq!(s.accuracy.as_deref(), Some(&[2., 3., 4., 5.][..]));
        assert_eq!((s.begin, s.end, s.offset, s.offend), (2, 5, 1, 3));
    }

    #[test]
    fn reversed() {
        let seq = Seq::new("s", b"AACGN")
            .with_accuracy(vec![1., 2., 3., 4., 5.])
            .reversed();
        let s = snap(&seq);
        assert_eq!(&s.seq, b"NCGTT");
        assert_eq!(s.accuracy.as_deref(), Some(&[5., 4., 3., 2., 1.][..]));
        let rna = Seq::new("r", b"AACGU").reversed();
        assert_eq!(&snap(&rna).seq, b"ACGUU");
        // proteins are not reversed
        let prot = Seq::new("p", b"MKV").reversed();
        assert_eq!(&snap(&prot).seq, b"MKV");
    }

    #[test]
    fn gaps_removed() {
        let seq = Seq::new("s", b"AC-G.T").with_accuracy(vec![1., 2., 3., 4., 5., 6.]);
        let s = SeqSnapshot::new(&seq, &SeqFormat::Sam.info());
        assert_eq!(&s.seq, b"ACGT");
        assert_eq!(s.accuracy.as_deref(), Some(&[1., 2., 4., 6.][..]));
        assert_eq!(&snap(&seq).seq, b"AC-G.T");
    }

    #[test]
    fn padding() {
        let mut seqs: Vec<_> = [&b"ACG"[..], b"ACGTACG", b"ACGTA"]
            .iter()
            .map(|s| snap(&Seq::new("s", s)))
            .collect();
        assert_eq!(pad_to_max(&mut seqs), 7);
        assert!(seqs.iter().all(|s| s.len() == 7));
        assert_eq!(&seqs[0].seq, b"ACG----");
    }

    #[test]
    fn unique_names() {
        let mut seqs: Vec<_> = ["a", "", "a", "a_2", ""]
            .iter()
            .map(|n| snap(&Seq::new(n, b"A")))
            .collect();
        make_names_unique(&mut seqs);
        let names: Vec<_> = seqs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["a", "EMBOSS", "a_2", "a_2_2", "EMBOSS_2"]);
    }

    #[test]
    fn counts() {
        let s = snap(&Seq::new("s", b"AACGTUNn-"));
        assert_eq!(s.base_counts(), [2, 1, 1, 2, 3]);
    }
}
