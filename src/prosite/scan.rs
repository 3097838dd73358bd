//! Scanning peptides against a motif catalog.

use super::catalog::MotifCatalog;

/// Motif id → ascending 1-based start positions, in discovery order.
///
/// An id is only present with at least one position. Entries can be added
/// but never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotifMatches {
    entries: Vec<(String, Vec<usize>)>,
}

impl MotifMatches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record hits for a motif. Empty position lists are ignored; hits for an
    /// id already present are merged, keeping positions ascending and unique.
    pub fn insert(&mut self, id: impl Into<String>, positions: Vec<usize>) {
        if positions.is_empty() {
            return;
        }
        let id = id.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => {
                existing.extend(positions);
                existing.sort_unstable();
                existing.dedup();
            }
            None => {
                let mut positions = positions;
                positions.sort_unstable();
                positions.dedup();
                self.entries.push((id, positions));
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&[usize]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, positions)| positions.as_slice())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries
            .iter()
            .map(|(id, positions)| (id.as_str(), positions.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan a peptide against every catalog motif.
#[must_use]
pub fn scan(peptide: &[u8], catalog: &MotifCatalog) -> MotifMatches {
    let mut matches = MotifMatches::new();
    if peptide.is_empty() {
        return matches;
    }
    for motif in catalog.iter() {
        matches.insert(motif.id.as_str(), motif.pattern.find_all(peptide));
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MotifCatalog {
        MotifCatalog::from_patterns([
            ("PS00001", "N-{P}-[ST]-{P}."),
            ("PS00004", "[RK](2)-x-[ST]."),
            ("PS00008", "G-{EDRKHPFYW}-x(2)-[STAGCN]-{P}."),
        ])
        .unwrap()
    }

    #[test]
    fn scan_records_positions_per_motif() {
        let m = scan(b"MNKSARRASNGPA", &catalog());
        assert_eq!(m.get("PS00001"), Some(&[2][..]));
        assert_eq!(m.get("PS00004"), Some(&[6][..]));
        assert!(!m.contains("PS00008"));
        let ids: Vec<&str> = m.ids().collect();
        assert_eq!(ids, vec!["PS00001", "PS00004"]);
    }

    #[test]
    fn empty_peptide_has_no_matches() {
        assert!(scan(b"", &catalog()).is_empty());
    }

    #[test]
    fn no_hits_is_empty() {
        let m = scan(b"AAAAAAAA", &catalog());
        assert!(m.is_empty());
        assert_eq!(m.len(), 0);
    }

    #[test]
    fn rescanning_is_idempotent() {
        let catalog = catalog();
        let peptide = b"MNKSARRASNGSAGNKSTNKTA";
        let first = scan(peptide, &catalog);
        let second = scan(peptide, &catalog);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn insert_merges_and_ignores_empty() {
        let mut m = MotifMatches::new();
        m.insert("A", vec![]);
        assert!(m.is_empty());
        m.insert("A", vec![5, 1]);
        m.insert("B", vec![3]);
        m.insert("A", vec![3, 5]);
        assert_eq!(m.get("A"), Some(&[1, 3, 5][..]));
        let collected: Vec<(&str, &[usize])> = m.iter().collect();
        assert_eq!(collected[1], ("B", &[3][..]));
    }
}
