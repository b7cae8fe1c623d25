//! Integrity fields of sequence headers: GCG checksums (GCG, MSF),
//! CRC64 and molecular weights (Swiss-Prot `SQ` lines).

const CRC64_POLY: u64 = 0xd800_0000_0000_0000;

static CRC64_TABLE: [u64; 256] = crc64_table();

const fn crc64_table() -> [u64; 256] {
    let mut table = [0u64; 256];
    let mut i = 0;
    while i < 256 {
        let mut part = i as u64;
        let mut j = 0;
        while j < 8 {
            part = if part & 1 == 1 {
                (part >> 1) ^ CRC64_POLY
            } else {
                part >> 1
            };
            j += 1;
        }
        table[i] = part;
        i += 1;
    }
    table
}

/// SWISS-PROT CRC64 (ISO 3309 polynomial, reflected, initial value 0)
/// over the bytes as they are stored.
pub fn crc64(seq: &[u8]) -> u64 {
    seq.iter().fold(0u64, |crc, &b| {
        CRC64_TABLE[((crc ^ b as u64) & 0xff) as usize] ^ (crc >> 8)
    })
}

/// Formats a CRC64 as two 8 digit hex halves (high, low)
pub fn crc64_hex(crc: u64) -> String {
    format!("{:08X}{:08X}", crc >> 32, crc & 0xffff_ffff)
}

/// GCG checksum: each uppercased character weighted by its position
/// in a repeating 1..57 cycle, modulo 10000.
pub fn gcg_checksum(seq: &[u8]) -> u32 {
    let sum = seq
        .iter()
        .zip((1..=57u64).cycle())
        .map(|(&c, i)| i * c.to_ascii_uppercase() as u64)
        .sum::<u64>();
    (sum % 10000) as u32
}

/// Sum of GCG checksums of several sequences, as on the MSF header line
pub fn gcg_checksum_sum<'a, I>(seqs: I) -> u32
where
    I: IntoIterator<Item = &'a [u8]>,
{
    seqs.into_iter().map(gcg_checksum).sum::<u32>() % 10000
}

const WATER: f64 = 18.015;

/// Average residue masses (amino acid minus water), indexed by letter - 'A'.
/// B, Z and J are the averages of D/N, E/Q and I/L.
static RESIDUE_MASS: [f64; 26] = [
    71.0788,  // A
    114.5962, // B
    103.1388, // C
    115.0886, // D
    129.1155, // E
    147.1766, // F
    57.0519,  // G
    137.1411, // H
    113.1594, // I
    113.1594, // J
    128.1741, // K
    113.1594, // L
    131.1926, // M
    114.1038, // N
    237.3018, // O pyrrolysine
    97.1167,  // P
    128.1307, // Q
    156.1875, // R
    87.0782,  // S
    101.1051, // T
    150.0388, // U selenocysteine
    99.1326,  // V
    186.2132, // W
    110.0,    // X
    163.1760, // Y
    128.6231, // Z
];

/// Average molecular weight of a protein sequence.
/// Characters other than letters (gaps, stops) do not contribute.
pub fn molecular_weight(seq: &[u8]) -> f64 {
    let residues: f64 = seq
        .iter()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| RESIDUE_MASS[(c.to_ascii_uppercase() - b'A') as usize])
        .sum();
    residues + WATER
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gcg() {
        assert_eq!(gcg_checksum(b""), 0);
        assert_eq!(gcg_checksum(b"A"), 65);
        assert_eq!(gcg_checksum(b"a"), 65);
        assert_eq!(gcg_checksum(b"ACGTACGTAC"), 3899);
        assert_eq!(gcg_checksum(b"MKV"), 485);
        // counter restarts after 57 residues
        assert_eq!(gcg_checksum(&[b'A'; 100]), 8935);
        assert_eq!(gcg_checksum_sum([&b"ACG"[..], b"ACGTA"]), 412 + 1073);
    }

    #[test]
    fn crc() {
        assert_eq!(crc64(b""), 0);
        assert_eq!(crc64_hex(crc64(b"MKV")), "72C336F000000000");
        assert_eq!(crc64_hex(crc64(b"ACGT")), "71A87EBDB0000000");
        assert_eq!(
            crc64_hex(crc64(
                b"MAFSAEDVLKEYDRRRRMEALLLSLYYPNDRKLLDYKEWSPPRVQVECPKAPVEWNNPPS"
            )),
            "C70430DAD4FFB864"
        );
        assert_eq!(crc64(b"MKV"), crc64(b"MKV"));
    }

    #[test]
    fn mol_weight() {
        assert_relative_eq!(molecular_weight(b""), 18.015);
        assert_relative_eq!(molecular_weight(b"MKV"), 376.5143, epsilon = 1e-6);
        assert_relative_eq!(molecular_weight(b"mk-v*"), 376.5143, epsilon = 1e-6);
    }
}
