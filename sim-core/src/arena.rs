/// Slot storage addressed by stable `usize` ids.
///
/// Every inserted value gets the next index. Removing a value leaves a
/// tombstone (`None`) behind instead of shifting the later entries, so:
///
/// - ids stay valid for every other entry after a removal,
/// - iteration order is always insertion order.
///
/// Slots are never reused.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    live: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            live: 0,
        }
    }

    /// Stores `value` and returns its id.
    pub fn insert(&mut self, value: T) -> usize {
        let id = self.slots.len();
        self.slots.push(Some(value));
        self.live += 1;
        id
    }

    #[inline]
    pub fn get(&self, id: usize) -> Option<&T> {
        self.slots.get(id).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: usize) -> Option<&mut T> {
        self.slots.get_mut(id).and_then(Option::as_mut)
    }

    /// Borrows two distinct live entries mutably at once.
    ///
    /// Returns `None` if `a == b` or either id is not live.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut T, &mut T)> {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return None;
        }
        let (lo, hi, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut()?;
        let second = tail[0].as_mut()?;
        if swapped {
            Some((second, first))
        } else {
            Some((first, second))
        }
    }

    /// Removes the entry, leaving a tombstone. Removing a dead id is a no-op.
    pub fn remove(&mut self, id: usize) -> Option<T> {
        let taken = self.slots.get_mut(id).and_then(Option::take);
        if taken.is_some() {
            self.live -= 1;
        }
        taken
    }

    #[inline]
    pub fn contains(&self, id: usize) -> bool {
        self.get(id).is_some()
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|v| (id, v)))
    }

    /// Live ids in insertion order, collected so the caller may mutate
    /// the arena while walking them.
    pub fn ids(&self) -> Vec<usize> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }
}
