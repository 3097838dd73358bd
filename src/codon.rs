//! Standard genetic code lookup used for ORF translation.

/// Amino-acid symbol for codons with a symbol outside {A,C,G,T}.
pub const UNKNOWN_RESIDUE: u8 = b'X';

/// Amino-acid symbol for stop codons.
pub const STOP: u8 = b'*';

/// Lookup table for translating codons to amino acids.
///
/// Indexed by 6-bit codon encoding: A=0, C=1, G=2, T=3.
/// Index = first*16 + second*4 + third.
pub struct CodonTable {
    table: [u8; 64],
}

fn base_to_index(b: u8) -> Option<usize> {
    match b {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

fn codon_index(codon: &[u8]) -> Option<usize> {
    match codon {
        [a, b, c] => Some(base_to_index(*a)? * 16 + base_to_index(*b)? * 4 + base_to_index(*c)?),
        _ => None,
    }
}

/// ATG
const START_INDEX: usize = 14;

impl CodonTable {
    /// Standard genetic code (NCBI translation table 1).
    #[must_use]
    pub fn standard() -> Self {
        #[rustfmt::skip]
        let table: [u8; 64] = [
            b'K', b'N', b'K', b'N',  // AA*
            b'T', b'T', b'T', b'T',  // AC*
            b'R', b'S', b'R', b'S',  // AG*
            b'I', b'I', b'M', b'I',  // AT*
            b'Q', b'H', b'Q', b'H',  // CA*
            b'P', b'P', b'P', b'P',  // CC*
            b'R', b'R', b'R', b'R',  // CG*
            b'L', b'L', b'L', b'L',  // CT*
            b'E', b'D', b'E', b'D',  // GA*
            b'A', b'A', b'A', b'A',  // GC*
            b'G', b'G', b'G', b'G',  // GG*
            b'V', b'V', b'V', b'V',  // GT*
            b'*', b'Y', b'*', b'Y',  // TA*: TAA, TAG stop
            b'S', b'S', b'S', b'S',  // TC*
            b'*', b'C', b'W', b'C',  // TG*: TGA stop
            b'L', b'F', b'L', b'F',  // TT*
        ];
        Self { table }
    }

    /// Translate one uppercase codon. Anything that is not three bases from
    /// {A,C,G,T} yields [`UNKNOWN_RESIDUE`].
    #[must_use]
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        codon_index(codon).map_or(UNKNOWN_RESIDUE, |i| self.table[i])
    }

    #[must_use]
    pub fn is_start(&self, codon: &[u8]) -> bool {
        codon_index(codon) == Some(START_INDEX)
    }

    #[must_use]
    pub fn is_stop(&self, codon: &[u8]) -> bool {
        codon_index(codon).is_some_and(|i| self.table[i] == STOP)
    }
}

impl Default for CodonTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_codon() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"ATG"), b'M');
        assert!(table.is_start(b"ATG"));
        assert!(!table.is_start(b"ATA"));
    }

    #[test]
    fn stop_codons() {
        let table = CodonTable::standard();
        for codon in [b"TAA", b"TAG", b"TGA"] {
            assert_eq!(table.translate_codon(codon), STOP);
            assert!(table.is_stop(codon));
        }
        assert!(!table.is_stop(b"TGG"));
    }

    #[test]
    fn assorted_codons() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"TGG"), b'W');
        assert_eq!(table.translate_codon(b"AGC"), b'S');
        assert_eq!(table.translate_codon(b"GAT"), b'D');
        assert_eq!(table.translate_codon(b"TTC"), b'F');
    }

    #[test]
    fn ambiguous_codons() {
        let table = CodonTable::standard();
        assert_eq!(table.translate_codon(b"NNN"), UNKNOWN_RESIDUE);
        assert_eq!(table.translate_codon(b"ATN"), UNKNOWN_RESIDUE);
        assert_eq!(table.translate_codon(b"AT"), UNKNOWN_RESIDUE);
        assert!(!table.is_start(b"ATN"));
        assert!(!table.is_stop(b"TAN"));
    }
}
