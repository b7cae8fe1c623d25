//! Quality score encodings for FASTQ, SAM and BAM output.
//!
//! Qualities are stored as Phred-scaled accuracy values (`f32`) on the
//! sequence and encoded on output.
//! See also https://www.ncbi.nlm.nih.gov/pmc/articles/PMC2847217/pdf/gkp1137.pdf

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum QualFormat {
    /// Sanger, Illumina 1.8+, SRA: Offset 33 (0 to 93)
    #[default]
    Sanger,
    /// Illumina 1.3 - 1.7: Offset 64 (-5 to 62)
    Illumina,
    /// Solexa: Offset 64 (-5 to 62), log-odds scale
    Solexa,
    /// Raw Phred scores as stored in BAM records (no offset)
    Phred,
}

use self::QualFormat::*;

/// Phred-scaled equivalent of each Solexa score boundary: entry `i` is the
/// Phred value at which the Solexa score `i - 5` rounds up to `i - 4`,
/// i.e. `10 * log10(10^((i - 4.5) / 10) + 1)`.
#[allow(clippy::excessive_precision)]
static SOLEXA_BOUNDS: [f64; 68] = [
    1.318795, 1.603736, 1.937759, 2.324741, 2.767492, 3.267492, 3.824741, 4.437759,
    5.103736, 5.818795, 6.578332, 7.377360, 8.210819, 9.073822, 9.961836, 10.870778,
    11.797062, 12.737602, 13.689784, 14.651423, 15.620708, 16.596154, 17.576551,
    18.560916, 19.548457, 20.538535, 21.530637, 22.524354, 23.519356, 24.515382,
    25.512223, 26.509712, 27.507716, 28.506130, 29.504870, 30.503869, 31.503073,
    32.502442, 33.501939, 34.501541, 35.501224, 36.500972, 37.500772, 38.500613,
    39.500487, 40.500387, 41.500307, 42.500244, 43.500194, 44.500154, 45.500122,
    46.500097, 47.500077, 48.500061, 49.500049, 50.500039, 51.500031, 52.500024,
    53.500019, 54.500015, 55.500012, 56.500010, 57.500008, 58.500006, 59.500005,
    60.500004, 61.500003, 62.500002,
];

/// Start index into `SOLEXA_BOUNDS` for each integer Phred score
/// (the smallest index whose bound exceeds the score)
static PHRED_TO_INDEX: [u8; 64] = [
    0, 0, 3, 5, 7, 8, 10, 11, 12, 13, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
    27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47,
    48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 60, 61, 62, 63, 64, 65, 66, 67, 67,
];

impl QualFormat {
    /// Character used for every position if a sequence has no qualities
    pub fn default_char(self) -> u8 {
        match self {
            // Phred 1
            Sanger => b'"',
            // Phred 1
            Illumina => b'A',
            // Solexa -5
            Solexa => b';',
            Phred => 0xff,
        }
    }

    /// Encodes a single Phred-scaled accuracy value
    #[inline]
    pub fn encode(self, score: f32) -> u8 {
        let q = score.round() as i32;
        match self {
            Sanger => (q.clamp(0, 93) + 33) as u8,
            Illumina => (q.clamp(-5, 93) + 64).clamp(33, 126) as u8,
            Solexa => (phred_to_solexa(score as f64) + 64) as u8,
            Phred => q.clamp(0, 254) as u8,
        }
    }

    /// Encodes the quality line of a record of length `len`,
    /// using the default character if there are no qualities.
    pub fn encode_all(self, scores: Option<&[f32]>, len: usize, out: &mut Vec<u8>) {
        match scores {
            Some(s) => {
                out.extend(s.iter().take(len).map(|&q| self.encode(q)));
                // accuracy arrays shorter than the sequence are padded
                if s.len() < len {
                    out.extend(std::iter::repeat(self.default_char()).take(len - s.len()));
                }
            }
            None => out.extend(std::iter::repeat(self.default_char()).take(len)),
        }
    }
}

/// Converts a Phred score to the nearest Solexa score (-5 to 62)
/// by climbing the boundary table from the start index of the score.
#[inline]
pub fn phred_to_solexa(q: f64) -> i32 {
    let q = q.max(0.);
    let start = PHRED_TO_INDEX[(q as usize).min(PHRED_TO_INDEX.len() - 1)] as usize;
    let mut i = start;
    while i < SOLEXA_BOUNDS.len() - 1 && SOLEXA_BOUNDS[i] <= q {
        i += 1;
    }
    i as i32 - 5
}
