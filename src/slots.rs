//! Fixed-capacity slot tables: each slot holds zero or one live entity.

#[derive(Clone, Debug)]
pub struct SlotTable<T, const N: usize> {
    slots: [Option<T>; N],
}

impl<T, const N: usize> Default for SlotTable<T, N> {
    fn default() -> Self {
        SlotTable::new()
    }
}

impl<T, const N: usize> SlotTable<T, N> {
    pub fn new() -> Self {
        SlotTable {
            slots: std::array::from_fn(|_| None),
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Occupy the first free slot. Returns `None` when the table is full.
    pub fn insert(&mut self, value: T) -> Option<usize> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(value);
        Some(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Live entries with their slot numbers.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    /// Slot number of the first live entry matching `pred`.
    pub fn find(&self, mut pred: impl FnMut(&T) -> bool) -> Option<usize> {
        self.iter().find(|(_, v)| pred(v)).map(|(i, _)| i)
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_fills_first_free_slot() {
        let mut table: SlotTable<u8, 3> = SlotTable::new();
        assert_eq!(table.insert(10), Some(0));
        assert_eq!(table.insert(11), Some(1));
        assert_eq!(table.remove(0), Some(10));
        assert_eq!(table.insert(12), Some(0));
        assert_eq!(table.insert(13), Some(2));
        assert!(table.is_full());
        assert_eq!(table.insert(14), None);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn find_and_remove() {
        let mut table: SlotTable<u8, 4> = SlotTable::new();
        table.insert(1);
        table.insert(2);
        assert_eq!(table.find(|v| *v == 2), Some(1));
        assert_eq!(table.find(|v| *v == 9), None);
        assert_eq!(table.remove(1), Some(2));
        assert_eq!(table.find(|v| *v == 2), None);
        assert_eq!(table.remove(0), Some(1));
        assert!(table.is_empty());
        assert_eq!(table.remove(7), None);
    }
}
