use bit_set::BitSet;

/// Set of source transactions that contributed to a node or pattern, by
/// position in the database.
///
/// Merging is set union, so it is commutative and idempotent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    sources: BitSet,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(source: usize) -> Self {
        let mut provenance = Self::new();
        provenance.insert(source);
        provenance
    }

    pub fn insert(&mut self, source: usize) -> bool {
        self.sources.insert(source)
    }

    pub fn merge(&mut self, other: &Provenance) {
        self.sources.union_with(&other.sources);
    }

    /// Source ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.sources.iter()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

impl FromIterator<usize> for Provenance {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            sources: iter.into_iter().collect(),
        }
    }
}
