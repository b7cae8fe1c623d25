//! Sequence data model consumed by the writers

use std::sync::Arc;

use crate::feature::FeatureTable;

pub use self::meta::*;
pub use self::seqtype::*;

mod meta;
mod seqtype;

/// A biological sequence with its annotation.
///
/// Fields are public so that readers (not part of this crate) can fill them
/// directly; the `with_*` methods are shortcuts for building sequences by hand.
#[derive(Debug, Clone, Default)]
pub struct Seq {
    pub name: String,
    /// Primary accession
    pub acc: String,
    /// All accessions, primary first
    pub acc_list: Vec<String>,
    /// Sequence version ("X56734.1")
    pub sv: String,
    pub gi: String,
    pub db: String,
    /// Full (long) name, e.g. Swiss-Prot entry names
    pub full_name: String,
    pub desc: String,
    /// Free text documentation
    pub doc: String,
    pub keywords: Vec<String>,
    /// Species name
    pub tax: String,
    /// NCBI taxonomy id
    pub tax_id: String,
    /// Taxonomic classification, highest level first
    pub tax_list: Vec<String>,
    pub organelle: String,
    /// Molecule type as in EMBL ID lines ("genomic DNA", "mRNA")
    pub molecule: String,
    /// Data class ("STD", "Reviewed")
    pub class: String,
    pub division: String,
    pub date: Option<SeqDate>,
    pub refs: Vec<SeqRef>,
    pub xrefs: Vec<SeqXref>,
    pub genes: Vec<SeqGene>,
    pub comments: Vec<String>,
    /// Explicit sequence type. Guessed from the residues if not set.
    pub seqtype: Option<SeqType>,
    pub seq: Vec<u8>,
    /// Phred-scaled per-base accuracy values
    pub accuracy: Option<Vec<f32>>,
    pub features: Option<Arc<dyn FeatureTable>>,
    /// 1-based start of the range to write; 0 = first residue,
    /// negative values count from the end
    pub begin: i64,
    /// 1-based end of the range to write (inclusive); 0 = last residue,
    /// negative values count from the end
    pub end: i64,
    /// Residues already trimmed from the start / end of the original sequence
    pub offset: usize,
    pub offend: usize,
    pub reversed: bool,
    pub circular: bool,
}

impl Seq {
    pub fn new(name: &str, seq: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            seq: seq.to_vec(),
            ..Default::default()
        }
    }

    pub fn with_desc(mut self, desc: &str) -> Self {
        self.desc = desc.to_string();
        self
    }

    /// Sets the primary accession (and prepends it to the accession list)
    pub fn with_acc(mut self, acc: &str) -> Self {
        self.acc = acc.to_string();
        if !self.acc_list.iter().any(|a| a == acc) {
            self.acc_list.insert(0, acc.to_string());
        }
        self
    }

    pub fn with_sv(mut self, sv: &str) -> Self {
        self.sv = sv.to_string();
        self
    }

    pub fn with_seqtype(mut self, seqtype: SeqType) -> Self {
        self.seqtype = Some(seqtype);
        self
    }

    pub fn with_accuracy(mut self, accuracy: Vec<f32>) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn with_features(mut self, features: Arc<dyn FeatureTable>) -> Self {
        self.features = Some(features);
        self
    }

    pub fn with_range(mut self, begin: i64, end: i64) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn circular(mut self) -> Self {
        self.circular = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accession(&self) -> &str {
        &self.acc
    }

    pub fn accession_list(&self) -> &[String] {
        &self.acc_list
    }

    pub fn version(&self) -> &str {
        &self.sv
    }

    pub fn gi(&self) -> &str {
        &self.gi
    }

    pub fn description(&self) -> &str {
        &self.desc
    }

    pub fn taxonomy(&self) -> &str {
        &self.tax
    }

    pub fn taxonomy_list(&self) -> &[String] {
        &self.tax_list
    }

    pub fn molecule_type(&self) -> &str {
        &self.molecule
    }

    pub fn division(&self) -> &str {
        &self.division
    }

    pub fn citation_list(&self) -> &[SeqRef] {
        &self.refs
    }

    pub fn xref_list(&self) -> &[SeqXref] {
        &self.xrefs
    }

    pub fn comment_list(&self) -> &[String] {
        &self.comments
    }

    pub fn date_record(&self) -> Option<&SeqDate> {
        self.date.as_ref()
    }

    pub fn quality_array(&self) -> Option<&[f32]> {
        self.accuracy.as_deref()
    }

    pub fn raw_bytes(&self) -> &[u8] {
        &self.seq
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    pub fn feature_table_handle(&self) -> Option<&Arc<dyn FeatureTable>> {
        self.features.as_ref()
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// The explicit type, or a guess based on the residues
    pub fn seqtype(&self) -> SeqType {
        self.seqtype.unwrap_or_else(|| guess_seqtype(&self.seq))
    }

    /// Resolves `begin` / `end` to a 0-based half-open range,
    /// clamped to the sequence.
    pub fn trim_range(&self) -> (usize, usize) {
        let len = self.seq.len() as i64;
        let resolve = |pos: i64, default: i64| match pos {
            0 => default,
            p if p < 0 => len + p + 1,
            p => p,
        };
        let begin = resolve(self.begin, 1).clamp(1, len.max(1));
        let end = resolve(self.end, len).clamp(0, len);
        if end < begin {
            return (begin as usize - 1, begin as usize - 1);
        }
        (begin as usize - 1, end as usize)
    }
}

/// A set of sequences written together, e.g. an alignment
#[derive(Debug, Clone, Default)]
pub struct SeqSet {
    pub name: String,
    pub seqs: Vec<Seq>,
}

impl SeqSet {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seqs: Vec::new(),
        }
    }

    pub fn push(&mut self, seq: Seq) {
        self.seqs.push(seq);
    }

    pub fn len(&self) -> usize {
        self.seqs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seqs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Seq> {
        self.seqs.iter()
    }
}

impl FromIterator<Seq> for SeqSet {
    fn from_iter<I: IntoIterator<Item = Seq>>(iter: I) -> Self {
        Self {
            name: String::new(),
            seqs: iter.into_iter().collect(),
        }
    }
}
