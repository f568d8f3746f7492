use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::raw::{Handle, RawAvlTree};

mod traverse;

pub use traverse::{Postorder, Preorder};

/// An ordered set based on an [AVL tree].
///
/// Given an element type with a [total order], an ordered set stores its elements
/// in sorted order. That means that elements must be of a type that implements
/// the [`Ord`] trait, such that two elements can always be compared to determine
/// their [`Ordering`]. Examples of elements with a total order are strings with
/// lexicographical order, and numbers with their natural order.
///
/// The tree rebalances itself after every insertion and removal, so its height
/// never exceeds ~1.44 log2(n) regardless of the order elements arrive in.
/// [`insert`], [`remove`], and [`contains`] are therefore O(log n) even for
/// adversarial (e.g. fully sorted) input sequences, and [`height`] and [`len`]
/// are O(1). Iterators obtained from [`AvlTreeSet::iter`] produce elements in
/// ascending order and take amortized constant time per element returned.
///
/// It is a logic error for an element to be modified in such a way that the
/// element's ordering relative to any other element, as determined by the
/// [`Ord`] trait, changes while it is in the set. This is normally only possible
/// through [`Cell`], [`RefCell`], global state, I/O, or unsafe code. The
/// behavior resulting from such a logic error is not specified (the BST ordering
/// the tree relies on may silently break), but will be encapsulated to the
/// `AvlTreeSet` that observed the logic error and not result in undefined
/// behavior. This could include panics, incorrect results, and memory leaks.
///
/// [AVL tree]: https://en.wikipedia.org/wiki/AVL_tree
/// [total order]: https://en.wikipedia.org/wiki/Total_order
/// [`insert`]: AvlTreeSet::insert
/// [`remove`]: AvlTreeSet::remove
/// [`contains`]: AvlTreeSet::contains
/// [`height`]: AvlTreeSet::height
/// [`len`]: AvlTreeSet::len
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
///
/// # Examples
///
/// ```
/// use avl_tree::AvlTreeSet;
///
/// // Type inference lets us omit an explicit type signature (which
/// // would be `AvlTreeSet<&str>` in this example).
/// let mut books = AvlTreeSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains("The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove("The Odyssey");
///
/// // Iterate over everything in sorted order.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
///
/// An `AvlTreeSet` with a known list of elements can be initialized from an array:
///
/// ```
/// use avl_tree::AvlTreeSet;
///
/// let set = AvlTreeSet::from([1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct AvlTreeSet<T> {
    raw: RawAvlTree<T>,
}

/// An iterator over the elements of an `AvlTreeSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`AvlTreeSet`].
/// See its documentation for more.
///
/// # Examples
///
/// ```
/// use avl_tree::AvlTreeSet;
///
/// let set = AvlTreeSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: AvlTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    tree: &'a RawAvlTree<T>,
    /// Left spine down to the next front element; the next element is on top.
    front: SmallVec<[Handle; 32]>,
    /// Right spine down to the next back element.
    back: SmallVec<[Handle; 32]>,
    /// Elements not yet yielded from either end. The two spines sweep toward
    /// each other independently; this counter is what stops them at the
    /// crossover point.
    remaining: usize,
}

/// An owning iterator over the elements of an `AvlTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`AvlTreeSet`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use avl_tree::AvlTreeSet;
///
/// let set = AvlTreeSet::from([1, 2, 3]);
/// let mut iter = set.into_iter();
/// assert_eq!(iter.next(), Some(1));
/// assert_eq!(iter.next_back(), Some(3));
/// assert_eq!(iter.next(), Some(2));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: AvlTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> AvlTreeSet<T> {
    /// Makes a new, empty `AvlTreeSet`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set: AvlTreeSet<i32> = AvlTreeSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawAvlTree::new(),
        }
    }

    /// Makes a new, empty `AvlTreeSet` with at least the specified capacity.
    ///
    /// The node arena will be able to hold at least `capacity` elements
    /// without reallocating.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let set: AvlTreeSet<i32> = AvlTreeSet::with_capacity(100);
    /// assert!(set.capacity() >= 100);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            raw: RawAvlTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the set can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    /// assert_eq!(set.len(), 0);
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    /// assert!(set.is_empty());
    /// set.insert(1);
    /// assert!(!set.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the height of the tree: the length of the longest path from the
    /// root down to a missing child.
    ///
    /// An empty set has height -1 and a single element has height 0, so a
    /// leaf's height is `1 + max(-1, -1) = 0`. The value is cached in the root
    /// node (it is the same bookkeeping rebalancing runs on), so this is O(1).
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    /// assert_eq!(set.height(), -1);
    ///
    /// set.insert(2);
    /// assert_eq!(set.height(), 0);
    ///
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.height(), 1);
    /// ```
    #[must_use]
    pub fn height(&self) -> i32 {
        self.raw.height()
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::from([1, 2, 3]);
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.height(), -1);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Gets an iterator that visits the elements in the `AvlTreeSet` in
    /// ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([3, 1, 2]);
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), Some(&3));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.raw)
    }

    /// Gets an iterator that visits the elements in pre-order: each node
    /// before either of its subtrees.
    ///
    /// The first element is always the tree's root, which makes pre-order the
    /// traversal that exposes the tree's actual shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// // 1, 2, 3 inserted ascending: the tree rotates, leaving 2 at the root.
    /// let set = AvlTreeSet::from([1, 2, 3]);
    /// let order: Vec<_> = set.preorder().copied().collect();
    /// assert_eq!(order, [2, 1, 3]);
    /// ```
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder::new(&self.raw)
    }

    /// Gets an iterator that visits the elements in post-order: each node
    /// after both of its subtrees. The tree's root comes last.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([1, 2, 3]);
    /// let order: Vec<_> = set.postorder().copied().collect();
    /// assert_eq!(order, [1, 3, 2]);
    /// ```
    pub fn postorder(&self) -> Postorder<'_, T> {
        Postorder::new(&self.raw)
    }
}

impl<T: Ord> AvlTreeSet<T> {
    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// The value may be any borrowed form of the set's element type, but the
    /// ordering on the borrowed form *must* match the ordering on the element
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to
    /// the value.
    ///
    /// The value may be any borrowed form of the set's element type, but the
    /// ordering on the borrowed form *must* match the ordering on the element
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let set = AvlTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.get(value)
    }

    /// Returns a reference to the first (minimum) element in the set, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(2);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns a reference to the last (maximum) element in the set, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    /// assert_eq!(set.last(), None);
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal value, `true` is
    ///   returned.
    /// - If the set already contained an equal value, `false` is returned, and
    ///   the set is left entirely unchanged: duplicates are never stored and
    ///   [`len`](AvlTreeSet::len) does not move.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        self.raw.insert(value)
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present; removing
    /// an absent value is a no-op.
    ///
    /// The value may be any borrowed form of the set's element type, but the
    /// ordering on the borrowed form *must* match the ordering on the element
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to
    /// the value.
    ///
    /// The value may be any borrowed form of the set's element type, but the
    /// ordering on the borrowed form *must* match the ordering on the element
    /// type.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value)
    }

    /// Removes the first (minimum) element from the set and returns it, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::from([1, 2]);
    ///
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_first(), Some(2));
    /// assert_eq!(set.pop_first(), None);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.pop_first()
    }

    /// Removes the last (maximum) element from the set and returns it, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let mut set = AvlTreeSet::from([1, 2]);
    ///
    /// assert_eq!(set.pop_last(), Some(2));
    /// assert_eq!(set.pop_last(), Some(1));
    /// assert_eq!(set.pop_last(), None);
    /// ```
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.pop_last()
    }
}

impl<T> Default for AvlTreeSet<T> {
    /// Creates an empty `AvlTreeSet`.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for AvlTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for AvlTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for AvlTreeSet<T> {}

impl<T: PartialOrd> PartialOrd for AvlTreeSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for AvlTreeSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for AvlTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTreeSet<T> {
    /// Converts a `[T; N]` into an `AvlTreeSet<T>`. Duplicates collapse.
    ///
    /// ```
    /// use avl_tree::AvlTreeSet;
    ///
    /// let set1 = AvlTreeSet::from([1, 2, 3, 4]);
    /// let set2: AvlTreeSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<T: Ord> Extend<T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for AvlTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a AvlTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for AvlTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an owning iterator over the elements of the set, in ascending
    /// order.
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T> Iter<'a, T> {
    fn new(tree: &'a RawAvlTree<T>) -> Self {
        let mut iter = Self {
            tree,
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: tree.len(),
        };
        let mut current = tree.root();
        while let Some(handle) = current {
            iter.front.push(handle);
            current = tree.node(handle).left();
        }
        let mut current = tree.root();
        while let Some(handle) = current {
            iter.back.push(handle);
            current = tree.node(handle).right();
        }
        iter
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        let node = self.tree.node(handle);
        // The in-order successor is the leftmost node of the right subtree.
        let mut current = node.right();
        while let Some(child) = current {
            self.front.push(child);
            current = self.tree.node(child).left();
        }
        self.remaining -= 1;
        Some(node.data())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        let node = self.tree.node(handle);
        let mut current = node.left();
        while let Some(child) = current {
            self.back.push(child);
            current = self.tree.node(child).right();
        }
        self.remaining -= 1;
        Some(node.data())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}
