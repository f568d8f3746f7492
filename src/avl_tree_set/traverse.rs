//! Depth-first traversals other than in-order.
//!
//! In-order iteration (the sorted order) lives on [`Iter`](super::Iter); the
//! pre- and post-order walks here visit the same read-only child links in the
//! other two depth-first orders. Display layers build on these: pre-order
//! exposes the tree's shape, post-order visits every node after its subtrees.

use core::fmt;
use core::iter::FusedIterator;

use smallvec::SmallVec;

use crate::raw::{Handle, RawAvlTree};

/// An iterator over the elements of an `AvlTreeSet` in pre-order
/// (node, then left subtree, then right subtree).
///
/// This `struct` is created by the [`preorder`] method on
/// [`AvlTreeSet`](super::AvlTreeSet). See its documentation for more.
///
/// [`preorder`]: super::AvlTreeSet::preorder
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Preorder<'a, T> {
    tree: &'a RawAvlTree<T>,
    /// Nodes whose subtrees are still entirely unvisited.
    stack: SmallVec<[Handle; 32]>,
    remaining: usize,
}

/// An iterator over the elements of an `AvlTreeSet` in post-order
/// (left subtree, then right subtree, then node).
///
/// This `struct` is created by the [`postorder`] method on
/// [`AvlTreeSet`](super::AvlTreeSet). See its documentation for more.
///
/// [`postorder`]: super::AvlTreeSet::postorder
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Postorder<'a, T> {
    tree: &'a RawAvlTree<T>,
    stack: SmallVec<[Step; 32]>,
    remaining: usize,
}

/// Work item for the post-order walk: a node is first expanded (children
/// scheduled ahead of it), then emitted when it resurfaces.
#[derive(Clone, Copy)]
enum Step {
    Expand(Handle),
    Emit(Handle),
}

impl<'a, T> Preorder<'a, T> {
    pub(crate) fn new(tree: &'a RawAvlTree<T>) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self {
            tree,
            stack,
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let handle = self.stack.pop()?;
        let node = self.tree.node(handle);
        // Right below left, so the left subtree is exhausted first.
        if let Some(right) = node.right() {
            self.stack.push(right);
        }
        if let Some(left) = node.left() {
            self.stack.push(left);
        }
        self.remaining -= 1;
        Some(node.data())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Preorder<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Preorder<'_, T> {}

impl<T> Clone for Preorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Preorder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Postorder<'a, T> {
    pub(crate) fn new(tree: &'a RawAvlTree<T>) -> Self {
        let mut stack = SmallVec::new();
        if let Some(root) = tree.root() {
            stack.push(Step::Expand(root));
        }
        Self {
            tree,
            stack,
            remaining: tree.len(),
        }
    }
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        loop {
            match self.stack.pop()? {
                Step::Expand(handle) => {
                    let node = self.tree.node(handle);
                    // The node re-emerges only after both subtrees drain.
                    self.stack.push(Step::Emit(handle));
                    if let Some(right) = node.right() {
                        self.stack.push(Step::Expand(right));
                    }
                    if let Some(left) = node.left() {
                        self.stack.push(Step::Expand(left));
                    }
                }
                Step::Emit(handle) => {
                    self.remaining -= 1;
                    return Some(self.tree.node(handle).data());
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Postorder<'_, T> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<T> FusedIterator for Postorder<'_, T> {}

impl<T> Clone for Postorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Postorder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
