use super::handle::Handle;

/// Which child slot of a node a descent step went through.
///
/// Mutations record one of these per level so the unwind knows which link to
/// reattach after rebalancing below it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left,
    Right,
}

/// A single tree node: one element, two optional child links, and the cached
/// height of the subtree rooted here.
///
/// Heights follow the AVL convention: an absent subtree has height -1, so a
/// freshly created leaf records `1 + max(-1, -1) = 0`. The cache is what makes
/// balance-factor checks O(1); `RawAvlTree` recomputes it for every node on the
/// unwind path of a mutation.
#[derive(Clone)]
pub(crate) struct AvlNode<T> {
    data: T,
    left: Option<Handle>,
    right: Option<Handle>,
    height: i8,
}

/// Height recorded for an absent subtree.
pub(crate) const NIL_HEIGHT: i8 = -1;

impl<T> AvlNode<T> {
    /// Creates a leaf node holding `data`.
    pub(crate) const fn new(data: T) -> Self {
        Self {
            data,
            left: None,
            right: None,
            height: 0,
        }
    }

    #[inline]
    pub(crate) const fn data(&self) -> &T {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    #[inline]
    pub(crate) fn into_data(self) -> T {
        self.data
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn height(&self) -> i8 {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: i8) {
        self.height = height;
    }

    /// Returns the child link on the given side.
    #[inline]
    pub(crate) const fn child(&self, dir: Dir) -> Option<Handle> {
        match dir {
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    /// Replaces the child link on the given side.
    pub(crate) fn set_child(&mut self, dir: Dir, link: Option<Handle>) {
        match dir {
            Dir::Left => self.left = link,
            Dir::Right => self.right = link,
        }
    }

    pub(crate) fn set_left(&mut self, link: Option<Handle>) {
        self.left = link;
    }

    pub(crate) fn set_right(&mut self, link: Option<Handle>) {
        self.right = link;
    }
}
