/// A deduplicated list of values addressed by `u16` indices.
///
/// Index 0 is reserved for "no value" and never holds an entry, so a zeroed
/// cell array means "empty". Inserting a value that is already present returns
/// the existing index; the palette never holds two equal entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette<T> {
    entries: Vec<Option<T>>,
}

impl<T: PartialEq> Palette<T> {
    /// The reserved "no value" index.
    pub const EMPTY: u16 = 0;

    /// A palette holding only the reserved slot.
    pub fn new() -> Self {
        Self {
            entries: vec![None],
        }
    }

    /// Index of an existing entry.
    pub fn index_of(&self, value: &T) -> Option<u16> {
        self.entries
            .iter()
            .position(|e| e.as_ref() == Some(value))
            .map(|i| i as u16)
    }

    /// Index of `value`, appending it if absent.
    pub fn insert(&mut self, value: T) -> u16 {
        if let Some(index) = self.index_of(&value) {
            return index;
        }
        self.entries.push(Some(value));
        (self.entries.len() - 1) as u16
    }

    /// Entry at `index`; `None` for the reserved slot or out-of-range indices.
    pub fn get(&self, index: u16) -> Option<&T> {
        self.entries.get(usize::from(index)).and_then(Option::as_ref)
    }

    /// Number of slots, including the reserved one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the palette holds no values.
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Occupied slots with their indices.
    pub fn values(&self) -> impl Iterator<Item = (u16, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|v| (i as u16, v)))
    }
}

impl<T: PartialEq> Default for Palette<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_slot_is_empty() {
        let p: Palette<String> = Palette::new();
        assert_eq!(p.len(), 1);
        assert!(p.is_empty());
        assert_eq!(p.get(Palette::<String>::EMPTY), None);
    }

    #[test]
    fn insert_deduplicates() {
        let mut p = Palette::new();
        let a = p.insert("stone");
        let b = p.insert("dirt");
        let c = p.insert("stone");
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(a, c);
        assert_eq!(p.len(), 3);
    }
}
