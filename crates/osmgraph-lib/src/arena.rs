//! Generational slot storage backing the graph's vertices and edges.
//!
//! Every slot carries a generation counter that is bumped when its value is
//! removed. A [`SlotKey`] only resolves while its generation matches the
//! slot's, so keys issued before a removal can never alias a value inserted
//! later into the recycled slot.

/// Position plus generation of a value stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SlotKey {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

#[derive(Debug, Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Arena<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn insert(&mut self, value: T) -> SlotKey {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.value = Some(value);
            return SlotKey {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        SlotKey {
            index,
            generation: 0,
        }
    }

    pub(crate) fn remove(&mut self, key: SlotKey) -> Option<T> {
        let slot = self.slots.get_mut(key.index)?;
        if slot.generation != key.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.index);
        self.len -= 1;
        Some(value)
    }

    pub(crate) fn get(&self, key: SlotKey) -> Option<&T> {
        self.slots
            .get(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, key: SlotKey) -> Option<&mut T> {
        self.slots
            .get_mut(key.index)
            .filter(|slot| slot.generation == key.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    pub(crate) fn contains(&self, key: SlotKey) -> bool {
        self.get(key).is_some()
    }

    /// Live values in slot order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (SlotKey, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotKey {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_key_does_not_resolve_after_slot_reuse() {
        let mut arena = Arena::default();
        let first = arena.insert("first");
        assert_eq!(arena.remove(first), Some("first"));

        let second = arena.insert("second");
        assert_eq!(second.index, first.index, "slot is recycled");
        assert_ne!(second.generation, first.generation);
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.get(second), Some(&"second"));
    }

    #[test]
    fn removal_leaves_other_keys_untouched() {
        let mut arena = Arena::default();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);

        arena.remove(a);

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b), Some(&2));
        assert_eq!(arena.get(c), Some(&3));
    }

    #[test]
    fn double_remove_is_a_no_op() {
        let mut arena = Arena::default();
        let key = arena.insert(7);
        assert_eq!(arena.remove(key), Some(7));
        assert_eq!(arena.remove(key), None);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn iteration_skips_vacant_slots_in_slot_order() {
        let mut arena = Arena::default();
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.insert('c');
        arena.remove(b);
        if let Some(value) = arena.get_mut(a) {
            *value = 'A';
        }

        let values: Vec<char> = arena.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, vec!['A', 'c']);
        assert!(arena.contains(a));
        assert!(!arena.contains(b));
    }
}
