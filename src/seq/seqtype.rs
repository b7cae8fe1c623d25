use std::fmt;

use bio::alphabets::{dna, rna};

use self::SeqType::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SeqType {
    Dna,
    Rna,
    Protein,
    Other,
}

impl SeqType {
    pub fn is_nucleotide(self) -> bool {
        matches!(self, Dna | Rna)
    }

    pub fn is_protein(self) -> bool {
        self == Protein
    }
}

impl fmt::Display for SeqType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Dna => "DNA",
            Rna => "RNA",
            Protein => "protein",
            Other => "other",
        };
        f.write_str(s)
    }
}

// For excluding gaps and other non-residue characters when running recognition
fn filter_iter(text: &[u8]) -> impl Iterator<Item = &u8> {
    text.iter()
        .filter(|&s| !matches!(s, b'-' | b'.' | b'~' | b'?' | b'*' | b' '))
}

/// Guesses the sequence type from its residues.
///
/// Plain ACGT(N) / ACGU(N) text is nucleotide. Text made of IUPAC
/// ambiguity codes only is treated as nucleotide if at least 90% of the
/// residues are A, C, G, T, U or N (short peptides such as "MKV" consist of
/// IUPAC letters too). Anything else with letters is protein, and sequences
/// without residues are `Other`.
pub fn guess_seqtype(text: &[u8]) -> SeqType {
    if filter_iter(text).next().is_none() {
        return Other;
    }
    if dna::n_alphabet().is_word(filter_iter(text)) {
        return Dna;
    }
    if rna::n_alphabet().is_word(filter_iter(text)) {
        return Rna;
    }
    if dna::iupac_alphabet().is_word(filter_iter(text))
        || rna::iupac_alphabet().is_word(filter_iter(text))
    {
        let (mut total, mut acgt, mut has_u) = (0usize, 0usize, false);
        for &b in filter_iter(text) {
            total += 1;
            match b.to_ascii_uppercase() {
                b'A' | b'C' | b'G' | b'T' | b'N' => acgt += 1,
                b'U' => {
                    acgt += 1;
                    has_u = true;
                }
                _ => {}
            }
        }
        if acgt * 10 >= total * 9 {
            return if has_u { Rna } else { Dna };
        }
    }
    if filter_iter(text).any(|&b| b.is_ascii_alphabetic()) {
        Protein
    } else {
        Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess() {
        assert_eq!(guess_seqtype(b"ACGTACGTAC"), Dna);
        assert_eq!(guess_seqtype(b"acgt-nnac"), Dna);
        assert_eq!(guess_seqtype(b"ACGUACGU"), Rna);
        assert_eq!(guess_seqtype(b"ACGTACGTACGTACGTACGR"), Dna);
        assert_eq!(guess_seqtype(b"MKV"), Protein);
        assert_eq!(guess_seqtype(b"MAFSAEDVLKEYDRRRRMEA"), Protein);
        assert_eq!(guess_seqtype(b"---"), Other);
        assert_eq!(guess_seqtype(b""), Other);
    }
}
