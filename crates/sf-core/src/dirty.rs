use std::collections::BTreeSet;

use sf_nbt::{Bounds, SectionPos};

/// Sections whose compiled blocks may be stale.
///
/// Every level mutation returns one; callers merge them and hand the result
/// to the next incremental recompile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet {
    sections: BTreeSet<SectionPos>,
}

impl DirtySet {
    /// Nothing dirty.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every section a box touches.
    pub fn of_bounds(bounds: &Bounds) -> Self {
        Self {
            sections: bounds.sections(),
        }
    }

    /// Mark every section a box touches.
    pub fn add_bounds(&mut self, bounds: &Bounds) {
        self.sections.extend(bounds.sections());
    }

    /// Mark one section.
    pub fn insert(&mut self, section: SectionPos) {
        self.sections.insert(section);
    }

    /// Absorb another set.
    pub fn merge(&mut self, other: DirtySet) {
        self.sections.extend(other.sections);
    }

    /// Whether a section is marked.
    pub fn contains(&self, section: SectionPos) -> bool {
        self.sections.contains(&section)
    }

    /// Whether any section of a box is marked.
    pub fn touches(&self, bounds: &Bounds) -> bool {
        self.sections.iter().any(|s| bounds.touches_section(*s))
    }

    /// Marked sections in order.
    pub fn iter(&self) -> impl Iterator<Item = SectionPos> + '_ {
        self.sections.iter().copied()
    }

    /// Number of marked sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Unmark everything.
    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

impl FromIterator<SectionPos> for DirtySet {
    fn from_iter<I: IntoIterator<Item = SectionPos>>(iter: I) -> Self {
        Self {
            sections: iter.into_iter().collect(),
        }
    }
}

impl Extend<SectionPos> for DirtySet {
    fn extend<I: IntoIterator<Item = SectionPos>>(&mut self, iter: I) {
        self.sections.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_nbt::BlockPos;

    #[test]
    fn bounds_spanning_a_section_edge() {
        let b = Bounds::new(BlockPos::new(14, 0, 0), BlockPos::new(18, 1, 1));
        let d = DirtySet::of_bounds(&b);
        assert_eq!(d.len(), 2);
        assert!(d.contains(SectionPos::new(0, 0, 0)));
        assert!(d.contains(SectionPos::new(1, 0, 0)));
    }

    #[test]
    fn merge_and_touch() {
        let mut a = DirtySet::new();
        a.insert(SectionPos::new(0, 0, 0));
        let b: DirtySet = [SectionPos::new(5, 0, 5)].into_iter().collect();
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert!(a.touches(&Bounds::of_block(BlockPos::new(81, 3, 82))));
        assert!(!a.touches(&Bounds::of_block(BlockPos::new(40, 3, 40))));
        a.clear();
        assert!(a.is_empty());
    }
}
