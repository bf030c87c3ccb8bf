use crate::bst_node::{entry_ref, Node, NodeRef};
use crate::TreeMap;
use std::cell::RefCell;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

/// Non-owning stack slot. The map owns every node; an iterator that is
/// leaked must not keep nodes alive past a later `remove` or `clear`.
type Pending<K, V> = Weak<RefCell<Node<K, V>>>;

/// Order in which a traversal visits the entries of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Traversal {
    /// Left subtree, node, right subtree. Ascending key order.
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// A resumable in-order cursor over a [`TreeMap`].
///
/// The cursor keeps the ancestors that still owe a visit to their right
/// subtree on a stack, so it never touches parent links and never mutates the
/// tree. The stack grows as needed; there is no depth limit. It holds only
/// weak links, so even a cursor leaked with [`std::mem::forget`] does not stop
/// the map from releasing its entries.
///
/// The cursor borrows the map for its whole life, so the map cannot be
/// modified until the cursor is dropped. To start over, create a new cursor.
pub struct Cursor<'a, K, V> {
    stack: Vec<Pending<K, V>>,
    remaining: usize,
    marker: PhantomData<&'a (K, V)>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    /// Creates a cursor positioned before the smallest key of `map`.
    ///
    /// Returns `None` if the map is empty. Use [`TreeMap::iter`] for an
    /// iterator that is simply exhausted on an empty map.
    pub fn new<C>(map: &'a TreeMap<K, V, C>) -> Option<Self> {
        if map.is_empty() {
            return None;
        }
        Some(map.iter())
    }

    pub(crate) fn from_root(root: Option<NodeRef<K, V>>, len: usize) -> Self {
        let mut cursor = Cursor {
            stack: Vec::new(),
            remaining: len,
            marker: PhantomData,
        };
        cursor.push_left_spine(root);
        cursor
    }

    fn push_left_spine(&mut self, mut node: Option<NodeRef<K, V>>) {
        while let Some(current) = node {
            node = current.borrow().left.clone();
            self.stack.push(Rc::downgrade(&current));
        }
    }

    /// Yields the next entry in ascending key order, or `None` once every
    /// entry has been produced.
    pub fn advance(&mut self) -> Option<(&'a K, &'a V)> {
        let node = self.stack.pop()?.upgrade()?;
        let right = node.borrow().right.clone();
        self.push_left_spine(right);
        self.remaining = self.remaining.saturating_sub(1);
        // SAFETY: the cursor was created from a map borrowed for 'a, and the
        // map keeps the node alive.
        Some(unsafe { entry_ref(&node) })
    }

    /// Returns the entry the next call to [`advance`](Self::advance) will
    /// yield, without moving.
    pub fn peek(&self) -> Option<(&'a K, &'a V)> {
        let node = self.stack.last()?.upgrade()?;
        // SAFETY: as in `advance`.
        Some(unsafe { entry_ref(&node) })
    }

    /// Number of ancestors currently waiting on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl<'a, K, V> Iterator for Cursor<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Cursor<'_, K, V> {}

impl<K, V> FusedIterator for Cursor<'_, K, V> {}

/// Pre-order iterator over a [`TreeMap`]: node, left, right.
pub struct PreOrder<'a, K, V> {
    stack: Vec<Pending<K, V>>,
    remaining: usize,
    marker: PhantomData<&'a (K, V)>,
}

impl<K, V> PreOrder<'_, K, V> {
    pub(crate) fn from_root(root: Option<NodeRef<K, V>>, len: usize) -> Self {
        PreOrder {
            stack: root.iter().map(Rc::downgrade).collect(),
            remaining: len,
            marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?.upgrade()?;
        {
            let inner = node.borrow();
            self.stack.extend(inner.right.as_ref().map(Rc::downgrade));
            self.stack.extend(inner.left.as_ref().map(Rc::downgrade));
        }
        self.remaining = self.remaining.saturating_sub(1);
        // SAFETY: created from a map borrowed for 'a.
        Some(unsafe { entry_ref(&node) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PreOrder<'_, K, V> {}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

/// Post-order iterator over a [`TreeMap`]: left, right, node.
pub struct PostOrder<'a, K, V> {
    // The flag records whether the node's children are already on the stack.
    stack: Vec<(Pending<K, V>, bool)>,
    remaining: usize,
    marker: PhantomData<&'a (K, V)>,
}

impl<K, V> PostOrder<'_, K, V> {
    pub(crate) fn from_root(root: Option<NodeRef<K, V>>, len: usize) -> Self {
        PostOrder {
            stack: root.iter().map(|node| (Rc::downgrade(node), false)).collect(),
            remaining: len,
            marker: PhantomData,
        }
    }
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (link, expanded) = self.stack.pop()?;
            let node = link.upgrade()?;
            if expanded {
                self.remaining = self.remaining.saturating_sub(1);
                // SAFETY: created from a map borrowed for 'a.
                return Some(unsafe { entry_ref(&node) });
            }
            {
                let inner = node.borrow();
                self.stack.push((link, true));
                self.stack.extend(inner.right.as_ref().map(|n| (Rc::downgrade(n), false)));
                self.stack.extend(inner.left.as_ref().map(|n| (Rc::downgrade(n), false)));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for PostOrder<'_, K, V> {}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}
