use alloc::vec::Vec;

use super::handle::Handle;

/// Slot arena that owns every node in the tree.
///
/// Freed slots are recycled through a free list, so a long-lived tree with
/// churn does not grow its backing storage. Handles are only ever produced by
/// `alloc()` and retired by `take()`; the tree never fabricates one.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        match self.free.pop() {
            // Recycle a retired slot.
            Some(handle) => {
                self.slots[handle.to_index()] = Some(element);
                handle
            }
            None => {
                // Strict less-than: the new slot's index must itself be a
                // representable handle.
                assert!(
                    self.slots.len() < Handle::MAX,
                    "`Arena::alloc()` - arena is at maximum capacity ({})",
                    Handle::MAX
                );
                self.slots.push(Some(element));
                Handle::from_index(self.slots.len() - 1)
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Removes the element behind `handle` and retires the slot for reuse.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn with_capacity_preallocates() {
        let arena: Arena<i32> = Arena::with_capacity(32);
        assert!(arena.capacity() >= 32);
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn take_recycles_slots() {
        let mut arena: Arena<i32> = Arena::new();
        let a = arena.alloc(1);
        let b = arena.alloc(2);
        assert_eq!(arena.take(a), 1);
        // The freed slot is handed back out before the arena grows.
        let c = arena.alloc(3);
        assert_eq!(c, a);
        assert_eq!(*arena.get(b), 2);
        assert_eq!(*arena.get(c), 3);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    #[should_panic(expected = "`Arena::take()` - `handle` is invalid!")]
    fn take_twice_panics() {
        let mut arena: Arena<i32> = Arena::new();
        let handle = arena.alloc(7);
        let _ = arena.take(handle);
        let _ = arena.take(handle);
    }

    proptest! {
        /// Drives a random alloc/take/overwrite sequence against a shadow list
        /// of live (handle, value) pairs.
        #[test]
        fn arena_tracks_live_elements(ops in prop::collection::vec(op_strategy(), 0..512)) {
            let mut live: Vec<(Handle, u32)> = Vec::new();
            let mut arena: Arena<u32> = Arena::new();

            for op in ops {
                match op {
                    Op::Alloc(value) => {
                        let handle = arena.alloc(value);
                        live.push((handle, value));
                    }
                    Op::Overwrite(pick, value) => {
                        if let Some(index) = pick_index(pick, live.len()) {
                            *arena.get_mut(live[index].0) = value;
                            live[index].1 = value;
                        }
                    }
                    Op::Take(pick) => {
                        if let Some(index) = pick_index(pick, live.len()) {
                            let (handle, expected) = live.swap_remove(index);
                            prop_assert_eq!(arena.take(handle), expected);
                        }
                    }
                    Op::Clear => {
                        arena.clear();
                        live.clear();
                    }
                }

                prop_assert_eq!(arena.len(), live.len());
                for &(handle, value) in &live {
                    prop_assert_eq!(*arena.get(handle), value);
                }
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Alloc(u32),
        Overwrite(usize, u32),
        Take(usize),
        Clear,
    }

    fn pick_index(pick: usize, len: usize) -> Option<usize> {
        (len > 0).then(|| pick % len)
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            8 => any::<u32>().prop_map(Op::Alloc),
            3 => (any::<usize>(), any::<u32>()).prop_map(|(pick, value)| Op::Overwrite(pick, value)),
            4 => any::<usize>().prop_map(Op::Take),
            1 => Just(Op::Clear),
        ]
    }
}
