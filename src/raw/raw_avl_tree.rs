use core::borrow::Borrow;
use core::cmp::Ordering;

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{AvlNode, Dir, NIL_HEIGHT};

/// The AVL tree core backing `AvlTreeSet`.
///
/// Structure is expressed entirely through arena handles: the root link plus
/// each node's two child links. Every mutation descends iteratively from the
/// root, recording the handles it passes through, then unwinds that path
/// bottom-up, recomputing cached heights and rotating wherever the AVL
/// invariant broke. Rotations reassign handles; they never allocate or free.
pub(crate) struct RawAvlTree<T> {
    /// Arena storing all tree nodes.
    nodes: Arena<AvlNode<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of elements in the tree.
    len: usize,
}

impl<T: Clone> Clone for RawAvlTree<T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
        }
    }
}

/// One descent step: the node passed through and the side taken.
///
/// The inline capacity covers trees of up to ~2^22 elements (the AVL bound
/// keeps depth under 1.44 log2 n); only larger trees spill to the heap.
type Path = SmallVec<[(Handle, Dir); 32]>;

impl<T> RawAvlTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` elements.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    /// Returns the number of elements in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the arena can hold without reallocating.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Removes all elements from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Returns the height of the tree: -1 when empty, 0 for a single element.
    pub(crate) fn height(&self) -> i32 {
        i32::from(self.link_height(self.root))
    }

    /// Returns the root handle, if the tree is non-empty.
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &AvlNode<T> {
        self.nodes.get(handle)
    }

    /// Height of an optional subtree link (-1 for an absent subtree).
    fn link_height(&self, link: Option<Handle>) -> i8 {
        link.map_or(NIL_HEIGHT, |handle| self.nodes.get(handle).height())
    }

    /// Recomputes a node's cached height from its two child links.
    fn update_height(&mut self, handle: Handle) {
        let (left, right) = {
            let node = self.nodes.get(handle);
            (node.left(), node.right())
        };
        let height = 1 + self.link_height(left).max(self.link_height(right));
        self.nodes.get_mut(handle).set_height(height);
    }

    /// Height of the left subtree minus the height of the right subtree.
    fn balance_factor(&self, handle: Handle) -> i8 {
        let node = self.nodes.get(handle);
        self.link_height(node.left()) - self.link_height(node.right())
    }

    /// Promotes the right child over `handle`; returns the subtree's new root.
    ///
    /// The pivot's original left subtree holds exactly the keys that are
    /// greater than `handle`'s element but less than the pivot's, so it moves
    /// across to become `handle`'s right subtree. Heights are refreshed
    /// demoted-node-first: after the reassignment `handle` sits below the
    /// pivot, so its height must be current before the pivot's is computed.
    fn rotate_left(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).right().expect("`RawAvlTree::rotate_left()` - no right child!");
        let transfer = self.nodes.get(pivot).left();

        self.nodes.get_mut(handle).set_right(transfer);
        self.nodes.get_mut(pivot).set_left(Some(handle));

        self.update_height(handle);
        self.update_height(pivot);

        pivot
    }

    /// Mirror of [`rotate_left`](Self::rotate_left): promotes the left child.
    fn rotate_right(&mut self, handle: Handle) -> Handle {
        let pivot = self.nodes.get(handle).left().expect("`RawAvlTree::rotate_right()` - no left child!");
        let transfer = self.nodes.get(pivot).right();

        self.nodes.get_mut(handle).set_left(transfer);
        self.nodes.get_mut(pivot).set_right(Some(handle));

        self.update_height(handle);
        self.update_height(pivot);

        pivot
    }

    /// Restores the AVL invariant at `handle` after a height change below it.
    ///
    /// Precondition: the invariant held before the single mutation that
    /// preceded this call, so the balance factor here is within {-2..2}. When
    /// the taller child leans the opposite way, a single rotation would just
    /// move the imbalance across, so that child is rotated first (the
    /// right-left / left-right double-rotation cases).
    ///
    /// Returns the handle now occupying this subtree's root position.
    fn rebalance(&mut self, handle: Handle) -> Handle {
        match self.balance_factor(handle) {
            -2 => {
                let right = self.nodes.get(handle).right().expect("`RawAvlTree::rebalance()` - no right child!");
                if self.balance_factor(right) > 0 {
                    let new_right = self.rotate_right(right);
                    self.nodes.get_mut(handle).set_right(Some(new_right));
                }
                self.rotate_left(handle)
            }
            2 => {
                let left = self.nodes.get(handle).left().expect("`RawAvlTree::rebalance()` - no left child!");
                if self.balance_factor(left) < 0 {
                    let new_left = self.rotate_left(left);
                    self.nodes.get_mut(handle).set_left(Some(new_left));
                }
                self.rotate_right(handle)
            }
            _ => handle,
        }
    }

    /// Unwinds a recorded descent path after a structural change at its foot.
    ///
    /// `subtree` is the link that now belongs in the deepest recorded node's
    /// taken child slot (the freshly inserted leaf, a spliced-up child, or
    /// `None` for an excised leaf). Each level reattaches the subtree below
    /// it, refreshes its height, and rebalances; rotation may hand back a
    /// different root for that level, which the level above then adopts.
    fn rebalance_path(&mut self, path: &mut Path, mut subtree: Option<Handle>) {
        while let Some((parent, dir)) = path.pop() {
            self.nodes.get_mut(parent).set_child(dir, subtree);
            self.update_height(parent);
            subtree = Some(self.rebalance(parent));
        }
        self.root = subtree;
    }
}

impl<T: Ord> RawAvlTree<T> {
    /// Returns a reference to the stored element equal to `value`, if any.
    pub(crate) fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match value.cmp(node.data().borrow()) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => current = node.right(),
                Ordering::Equal => return Some(node.data()),
            }
        }
        None
    }

    /// Returns true if the tree contains an element equal to `value`.
    pub(crate) fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(value).is_some()
    }

    /// Returns the minimum element, if any.
    pub(crate) fn first(&self) -> Option<&T> {
        let mut handle = self.root?;
        while let Some(left) = self.nodes.get(handle).left() {
            handle = left;
        }
        Some(self.nodes.get(handle).data())
    }

    /// Returns the maximum element, if any.
    pub(crate) fn last(&self) -> Option<&T> {
        let mut handle = self.root?;
        while let Some(right) = self.nodes.get(handle).right() {
            handle = right;
        }
        Some(self.nodes.get(handle).data())
    }

    /// Inserts `value` into the tree.
    ///
    /// Returns false without touching the tree if an equal element is already
    /// present: duplicates are never stored. Otherwise the new leaf lands at
    /// the first absent position consistent with the ordering and the recorded
    /// path is unwound to restore heights and balance.
    pub(crate) fn insert(&mut self, value: T) -> bool {
        let mut path = Path::new();
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            match value.cmp(node.data()) {
                Ordering::Less => {
                    path.push((handle, Dir::Left));
                    current = node.left();
                }
                Ordering::Greater => {
                    path.push((handle, Dir::Right));
                    current = node.right();
                }
                Ordering::Equal => return false,
            }
        }

        let leaf = self.nodes.alloc(AvlNode::new(value));
        self.len += 1;
        self.rebalance_path(&mut path, Some(leaf));
        true
    }

    /// Removes the element equal to `value`, returning it.
    ///
    /// Returns `None` (a no-op) if no equal element is present.
    pub(crate) fn remove<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut path = Path::new();
        let mut current = self.root;

        let target = loop {
            let handle = current?;
            let node = self.nodes.get(handle);
            match value.cmp(node.data().borrow()) {
                Ordering::Less => {
                    path.push((handle, Dir::Left));
                    current = node.left();
                }
                Ordering::Greater => {
                    path.push((handle, Dir::Right));
                    current = node.right();
                }
                Ordering::Equal => break handle,
            }
        };

        Some(self.remove_at(target, path))
    }

    /// Removes and returns the minimum element.
    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let mut path = Path::new();
        let mut handle = self.root?;
        while let Some(left) = self.nodes.get(handle).left() {
            path.push((handle, Dir::Left));
            handle = left;
        }
        Some(self.remove_at(handle, path))
    }

    /// Removes and returns the maximum element.
    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let mut path = Path::new();
        let mut handle = self.root?;
        while let Some(right) = self.nodes.get(handle).right() {
            path.push((handle, Dir::Right));
            handle = right;
        }
        Some(self.remove_at(handle, path))
    }

    /// Excises the node at `target`, whose ancestry is recorded in `path`,
    /// and rebalances every ancestor. Returns the removed element.
    ///
    /// A node with at most one child is spliced out directly: its parent link
    /// takes whichever subtree it had. A node with two children instead has
    /// its element overwritten with its in-order predecessor (the maximum of
    /// the left subtree, reached by walking right and found with no right
    /// child), and that predecessor node is the one physically excised. The
    /// replacement element still orders correctly against both subtrees, and
    /// the physically removed node never re-enters the two-child case.
    fn remove_at(&mut self, target: Handle, mut path: Path) -> T {
        let (left, right) = {
            let node = self.nodes.get(target);
            (node.left(), node.right())
        };

        let removed = if let (Some(left), Some(_)) = (left, right) {
            path.push((target, Dir::Left));
            let mut pred = left;
            while let Some(next) = self.nodes.get(pred).right() {
                path.push((pred, Dir::Right));
                pred = next;
            }

            let orphan = self.nodes.get(pred).left();
            let pred_node = self.nodes.take(pred);
            let removed = core::mem::replace(self.nodes.get_mut(target).data_mut(), pred_node.into_data());
            self.rebalance_path(&mut path, orphan);
            removed
        } else {
            let node = self.nodes.take(target);
            self.rebalance_path(&mut path, left.or(right));
            node.into_data()
        };

        self.len -= 1;
        removed
    }
}

impl<T> RawAvlTree<T> {
    /// Moves every element into an in-order `Vec`, leaving the tree empty.
    ///
    /// O(n) by direct in-order walk; no rebalancing, unlike repeated
    /// `pop_first`.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<T> {
        let mut elements = Vec::with_capacity(self.len);
        let mut spine: SmallVec<[Handle; 32]> = SmallVec::new();
        let mut current = self.root;

        loop {
            while let Some(handle) = current {
                spine.push(handle);
                current = self.nodes.get(handle).left();
            }
            let Some(handle) = spine.pop() else { break };
            let node = self.nodes.take(handle);
            current = node.right();
            elements.push(node.into_data());
        }

        self.nodes.clear();
        self.root = None;
        self.len = 0;

        elements
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    impl<T: Ord> RawAvlTree<T> {
        /// Walks the whole tree asserting every structural invariant: strict
        /// BST ordering, cached-height correctness, AVL balance, and that
        /// `len` matches the reachable node count.
        fn assert_invariants(&self) {
            let count = self.root.map_or(0, |root| self.assert_subtree(root, None, None));
            assert_eq!(count, self.len, "len does not match reachable node count");
        }

        fn assert_subtree(&self, handle: Handle, min: Option<&T>, max: Option<&T>) -> usize {
            let node = self.nodes.get(handle);
            if let Some(min) = min {
                assert!(node.data() > min, "BST ordering violated");
            }
            if let Some(max) = max {
                assert!(node.data() < max, "BST ordering violated");
            }

            let left_height = self.link_height(node.left());
            let right_height = self.link_height(node.right());
            assert_eq!(node.height(), 1 + left_height.max(right_height), "cached height is stale");
            assert!((left_height - right_height).abs() <= 1, "AVL balance violated");

            let left_count = node.left().map_or(0, |left| self.assert_subtree(left, min, Some(node.data())));
            let right_count = node.right().map_or(0, |right| self.assert_subtree(right, Some(node.data()), max));
            left_count + right_count + 1
        }
    }

    #[test]
    fn empty_tree() {
        let tree: RawAvlTree<i32> = RawAvlTree::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
        assert!(!tree.contains(&0));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut tree = RawAvlTree::new();
        assert!(tree.insert(5));
        assert!(!tree.insert(5));
        assert_eq!(tree.len(), 1);
        assert!(tree.contains(&5));
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut tree = RawAvlTree::new();
        tree.insert(1);
        assert_eq!(tree.remove(&2), None);
        assert_eq!(tree.len(), 1);
        tree.assert_invariants();
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut tree = RawAvlTree::new();
        for i in 0..10 {
            assert!(tree.insert(i));
            tree.assert_invariants();
        }
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn descending_inserts_stay_balanced() {
        let mut tree = RawAvlTree::new();
        for i in (0..10).rev() {
            assert!(tree.insert(i));
            tree.assert_invariants();
        }
        assert_eq!(tree.len(), 10);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn two_child_removal_uses_predecessor() {
        let mut tree = RawAvlTree::new();
        // Balanced seven-node tree rooted at 3; no rotations occur.
        for value in [3, 1, 5, 0, 2, 4, 6] {
            tree.insert(value);
        }
        // The root has two children; its element must be replaced by 2, the
        // maximum of its left subtree.
        assert_eq!(tree.remove(&3), Some(3));
        tree.assert_invariants();
        assert_eq!(tree.nodes.get(tree.root.unwrap()).data(), &2);
        assert_eq!(tree.drain_to_vec(), [0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn drain_yields_sorted_and_empties() {
        let mut tree = RawAvlTree::new();
        for value in [5, 3, 8, 1, 4, 7, 9, 2, 6, 0] {
            tree.insert(value);
        }
        assert_eq!(tree.drain_to_vec(), [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
    }

    proptest! {
        /// Replays a random op sequence against `BTreeSet`, auditing the
        /// structural invariants after every mutation.
        #[test]
        fn tree_matches_btreeset(ops in prop::collection::vec(op_strategy(), 0..512)) {
            let mut tree: RawAvlTree<i16> = RawAvlTree::new();
            let mut model: BTreeSet<i16> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(value) => {
                        prop_assert_eq!(tree.insert(value), model.insert(value));
                    }
                    Op::Remove(value) => {
                        prop_assert_eq!(tree.remove(&value), model.take(&value));
                    }
                    Op::PopFirst => {
                        prop_assert_eq!(tree.pop_first(), model.pop_first());
                    }
                    Op::PopLast => {
                        prop_assert_eq!(tree.pop_last(), model.pop_last());
                    }
                }
                tree.assert_invariants();
                prop_assert_eq!(tree.len(), model.len());
                prop_assert_eq!(tree.first(), model.first());
                prop_assert_eq!(tree.last(), model.last());
            }

            let drained: Vec<i16> = tree.drain_to_vec();
            let expected: Vec<i16> = model.into_iter().collect();
            prop_assert_eq!(drained, expected);
        }

        /// The AVL height bound: height <= 1.44 * log2(n + 2) for all n >= 1.
        #[test]
        fn height_is_logarithmically_bounded(values in prop::collection::btree_set(any::<i32>(), 1..512)) {
            let mut tree = RawAvlTree::new();
            for value in values {
                tree.insert(value);
                #[allow(clippy::cast_precision_loss)]
                let bound = 1.44 * ((tree.len() + 2) as f64).log2();
                prop_assert!(f64::from(tree.height()) <= bound);
            }
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i16),
        Remove(i16),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        // A narrow key range forces duplicate inserts and absent removes.
        prop_oneof![
            5 => (-64i16..64).prop_map(Op::Insert),
            3 => (-64i16..64).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }
}
