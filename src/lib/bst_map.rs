//! An ordered map backed by an unbalanced binary search tree.
//!
//! Keys are placed by a caller-supplied [`KeyOrder`]; the map can hand
//! discarded keys and values to caller-supplied [`Release`] hooks. Nodes keep
//! a weak link to their parent, which the successor/predecessor walks and the
//! deletion splice use for upward navigation.
//!
//! The tree never rebalances. Inserting keys in sorted order produces a
//! list-shaped tree of height `n - 1`; every operation that walks the whole
//! tree uses an explicit stack, so such trees are slow but never overflow the
//! call stack.
//!
//! ```
//! use bst_map::{Insertion, TreeMap};
//!
//! let mut map = TreeMap::new();
//! assert_eq!(map.insert("delta", 4), Insertion::Inserted);
//! map.insert("alpha", 1);
//! map.insert("charlie", 3);
//! assert_eq!(map.insert("alpha", 10), Insertion::Updated);
//!
//! assert_eq!(map.get("alpha"), Some(&10));
//! assert_eq!(map.floor_key("bravo"), Some(&"alpha"));
//! assert_eq!(map.ceiling_key("bravo"), Some(&"charlie"));
//! ```
#![warn(missing_docs)]

use std::borrow::Borrow;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::rc::Rc;

mod bst_config;
mod bst_iter;
mod bst_node;
mod bst_order;
pub mod error;

pub use bst_config::TreeMapBuilder;
pub use bst_iter::{Cursor, PostOrder, PreOrder, Traversal};
pub use bst_order::{KeyOrder, NaturalOrder, Release, ReverseOrder, Visitor};
pub use error::{Error, Result};

use bst_config::Releaser;
use bst_node::{
    drain_subtree, entry_ref, predecessor_of, subtree_max, subtree_min, successor_of, value_mut,
    Node, NodeRef,
};

/// In-order iterator over a [`TreeMap`]; the same type as [`Cursor`].
pub type Iter<'a, K, V> = Cursor<'a, K, V>;

/// Outcome of [`TreeMap::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// The key was new; a node was added.
    Inserted,
    /// The key was already present; its value was replaced.
    Updated,
}

/// Outcome of [`TreeMap::successor`] and [`TreeMap::predecessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighbor<T> {
    /// The neighbouring key.
    Key(T),
    /// The probe is stored but is the last (or first) key.
    Boundary,
    /// The probe is not stored in the map.
    Absent,
}

impl<T> Neighbor<T> {
    /// Returns the neighbouring key, collapsing both "no answer" cases.
    pub fn key(self) -> Option<T> {
        match self {
            Neighbor::Key(key) => Some(key),
            Neighbor::Boundary | Neighbor::Absent => None,
        }
    }

    /// Returns true if the probe key was found in the map.
    pub fn probe_found(&self) -> bool {
        !matches!(self, Neighbor::Absent)
    }
}

/// An ordered map over an unbalanced binary search tree.
///
/// `C` decides the key order (see [`KeyOrder`]); it defaults to the keys'
/// own [`Ord`]. Maps with custom orders or release hooks are made with
/// [`TreeMap::builder`].
///
/// The map is single-threaded: it is neither `Send` nor `Sync`.
pub struct TreeMap<K, V, C = NaturalOrder> {
    root: Option<NodeRef<K, V>>,
    length: usize,
    order: C,
    release_key: Option<Releaser<K>>,
    release_value: Option<Releaser<V>>,
}

impl<K, V> TreeMap<K, V> {
    /// Creates an empty map ordered by the keys' [`Ord`].
    pub fn new() -> Self {
        Self::with_order(NaturalOrder)
    }

    /// Starts configuring a map. See [`TreeMapBuilder`].
    pub fn builder() -> TreeMapBuilder<K, V> {
        TreeMapBuilder::new()
    }
}

impl<K, V> Default for TreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    /// Creates an empty map using `order` and no release hooks.
    pub fn with_order(order: C) -> Self {
        Self::from_parts(order, None, None)
    }

    pub(crate) fn from_parts(
        order: C,
        release_key: Option<Releaser<K>>,
        release_value: Option<Releaser<V>>,
    ) -> Self {
        TreeMap {
            root: None,
            length: 0,
            order,
            release_key,
            release_value,
        }
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns the number of entries in the map. Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.length
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the key ordering in use.
    pub fn order(&self) -> &C {
        &self.order
    }

    /// Returns the number of edges on the longest root-to-leaf path.
    ///
    /// An empty map has height -1 and a single entry has height 0. This walks
    /// the whole tree.
    pub fn height(&self) -> isize {
        let mut height = -1;
        let mut pending: Vec<(NodeRef<K, V>, isize)> =
            self.root.clone().map(|root| (root, 0)).into_iter().collect();
        while let Some((node, depth)) = pending.pop() {
            height = height.max(depth);
            let inner = RefCell::borrow(&node);
            pending.extend(inner.left.clone().map(|child| (child, depth + 1)));
            pending.extend(inner.right.clone().map(|child| (child, depth + 1)));
        }
        height
    }

    /// Returns the smallest key, or `None` if the map is empty.
    pub fn min_key(&self) -> Option<&K> {
        self.first_key_value().map(|(key, _)| key)
    }

    /// Returns the largest key, or `None` if the map is empty.
    pub fn max_key(&self) -> Option<&K> {
        self.last_key_value().map(|(key, _)| key)
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = subtree_min(self.root.clone()?);
        Some(self.entry_of(&node))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = subtree_max(self.root.clone()?);
        Some(self.entry_of(&node))
    }

    /// Returns an in-order (ascending) iterator over the entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Cursor::from_root(self.root.clone(), self.length)
    }

    /// Returns a pre-order iterator: node, left subtree, right subtree.
    pub fn iter_preorder(&self) -> PreOrder<'_, K, V> {
        PreOrder::from_root(self.root.clone(), self.length)
    }

    /// Returns a post-order iterator: left subtree, right subtree, node.
    pub fn iter_postorder(&self) -> PostOrder<'_, K, V> {
        PostOrder::from_root(self.root.clone(), self.length)
    }

    /// Feeds every entry to `visitor` in the given order.
    pub fn traverse<W>(&self, order: Traversal, visitor: &mut W)
    where
        W: Visitor<K, V> + ?Sized,
    {
        match order {
            Traversal::InOrder => self.iter().for_each(|(k, v)| visitor.visit(k, v)),
            Traversal::PreOrder => self.iter_preorder().for_each(|(k, v)| visitor.visit(k, v)),
            Traversal::PostOrder => self.iter_postorder().for_each(|(k, v)| visitor.visit(k, v)),
        }
    }

    /// Calls `visit` on every entry in ascending key order.
    pub fn traverse_inorder<F: FnMut(&K, &V)>(&self, mut visit: F) {
        self.traverse(Traversal::InOrder, &mut visit);
    }

    /// Calls `visit` on every entry in pre-order.
    pub fn traverse_preorder<F: FnMut(&K, &V)>(&self, mut visit: F) {
        self.traverse(Traversal::PreOrder, &mut visit);
    }

    /// Calls `visit` on every entry in post-order.
    pub fn traverse_postorder<F: FnMut(&K, &V)>(&self, mut visit: F) {
        self.traverse(Traversal::PostOrder, &mut visit);
    }

    /// Removes every entry, handing keys and values to the release hooks.
    pub fn clear(&mut self) {
        let root = self.root.take();
        if root.is_some() {
            log::debug!("clearing tree map with {} entries", self.length);
        }
        self.length = 0;
        drain_subtree(root, |key, value| self.discard_entry(key, value));
    }

    fn entry_of(&self, node: &NodeRef<K, V>) -> (&K, &V) {
        // SAFETY: `node` is reachable from this map, which stays borrowed for
        // the lifetime of the returned references.
        unsafe { entry_ref(node) }
    }

    fn discard_key(&mut self, key: K) {
        match self.release_key.as_mut() {
            Some(releaser) => releaser.release(key),
            None => drop(key),
        }
    }

    fn discard_value(&mut self, value: V) {
        match self.release_value.as_mut() {
            Some(releaser) => releaser.release(value),
            None => drop(value),
        }
    }

    fn discard_entry(&mut self, key: K, value: V) {
        self.discard_key(key);
        self.discard_value(value);
    }

    /// Replaces the subtree rooted at `old` with `new` in `old`'s parent (or
    /// at the root), and points `new` back at that parent.
    fn transplant(&mut self, old: &NodeRef<K, V>, new: Option<NodeRef<K, V>>) {
        let parent = RefCell::borrow(old).parent.upgrade();
        if let Some(new) = &new {
            new.borrow_mut().parent = parent.as_ref().map(Rc::downgrade).unwrap_or_default();
        }
        match parent {
            None => self.root = new,
            Some(parent) => {
                if Node::is_left_child_of(old, &parent) {
                    parent.borrow_mut().left = new;
                } else {
                    parent.borrow_mut().right = new;
                }
            }
        }
    }
}

impl<K, V, C> TreeMap<K, V, C>
where
    C: KeyOrder<K>,
{
    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced: the old value
    /// and the incoming duplicate key go to the release hooks, the stored key
    /// stays, and [`Insertion::Updated`] is returned.
    pub fn insert(&mut self, key: K, value: V) -> Insertion {
        let mut parent: Option<NodeRef<K, V>> = None;
        let mut goes_left = false;
        let mut current = self.root.clone();

        while let Some(node_ref) = current {
            let ordering = self.order.compare(&key, &RefCell::borrow(&node_ref).key);
            match ordering {
                Ordering::Equal => {
                    let old = mem::replace(&mut node_ref.borrow_mut().value, value);
                    self.discard_value(old);
                    self.discard_key(key);
                    return Insertion::Updated;
                }
                Ordering::Less => current = RefCell::borrow(&node_ref).left.clone(),
                Ordering::Greater => current = RefCell::borrow(&node_ref).right.clone(),
            }
            goes_left = ordering == Ordering::Less;
            parent = Some(node_ref);
        }

        let link = parent.as_ref().map(Rc::downgrade).unwrap_or_default();
        let node = Node::new(key, value, link);
        match parent {
            None => self.root = Some(node),
            Some(parent) if goes_left => parent.borrow_mut().left = Some(node),
            Some(parent) => parent.borrow_mut().right = Some(node),
        }
        self.length += 1;
        Insertion::Inserted
    }
}

impl<K, V, C> TreeMap<K, V, C> {
    fn find_node<Q: ?Sized>(&self, key: &Q) -> Option<NodeRef<K, V>>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let mut current = self.root.clone();
        while let Some(node_ref) = current {
            let next = {
                let node = RefCell::borrow(&node_ref);
                match self.order.compare(key, node.key.borrow()) {
                    Ordering::Equal => None,
                    Ordering::Less => Some(node.left.clone()),
                    Ordering::Greater => Some(node.right.clone()),
                }
            };
            match next {
                None => return Some(node_ref),
                Some(child) => current = child,
            }
        }
        None
    }

    /// Returns a reference to the value stored under `key`.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        self.get_key_value(key).map(|(_, value)| value)
    }

    /// Returns the stored key and value matching `key`.
    pub fn get_key_value<Q: ?Sized>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let node = self.find_node(key)?;
        Some(self.entry_of(&node))
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let node = self.find_node(key)?;
        // SAFETY: the map is exclusively borrowed for the returned lifetime
        // and nothing else references this node's value.
        Some(unsafe { value_mut(&node) })
    }

    /// Returns true if `key` is stored in the map.
    pub fn contains<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        self.find_node(key).is_some()
    }

    /// Removes `key`, handing its key and value to the release hooks.
    ///
    /// Returns false, without touching anything, if the key is absent.
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let Some(node) = self.detach(key) else {
            return false;
        };
        if let Some((key, value)) = Node::into_entry(node) {
            self.discard_entry(key, value);
        }
        true
    }

    /// Removes `key` and returns the stored entry to the caller.
    ///
    /// The release hooks are not called: ownership moves to the caller.
    pub fn remove_entry<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        self.detach(key).and_then(Node::into_entry)
    }

    /// Unlinks the node holding `key` and returns it with no children.
    fn detach<Q: ?Sized>(&mut self, key: &Q) -> Option<NodeRef<K, V>>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let target = self.find_node(key)?;
        let (left, right) = {
            let mut node = target.borrow_mut();
            (node.left.take(), node.right.take())
        };

        match (left, right) {
            (None, right) => {
                log::trace!("removing node with no left child");
                self.transplant(&target, right);
            }
            (Some(left), None) => {
                log::trace!("removing node with only a left child");
                self.transplant(&target, Some(left));
            }
            (Some(left), Some(right)) => {
                let successor = subtree_min(right.clone());
                if Rc::ptr_eq(&successor, &right) {
                    log::trace!("removing node with two children, successor is its right child");
                } else {
                    log::trace!("removing node with two children, successor deeper on the right");
                    let successor_right = successor.borrow_mut().right.take();
                    self.transplant(&successor, successor_right);
                    right.borrow_mut().parent = Rc::downgrade(&successor);
                    successor.borrow_mut().right = Some(right);
                }
                self.transplant(&target, Some(successor.clone()));
                left.borrow_mut().parent = Rc::downgrade(&successor);
                successor.borrow_mut().left = Some(left);
            }
        }

        self.length -= 1;
        Some(target)
    }

    /// Returns the largest stored key less than or equal to `key`.
    pub fn floor_key<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let mut floor = None;
        let mut current = self.root.clone();
        while let Some(node_ref) = current {
            let node = RefCell::borrow(&node_ref);
            match self.order.compare(key, node.key.borrow()) {
                Ordering::Equal => return Some(self.entry_of(&node_ref).0),
                Ordering::Less => current = node.left.clone(),
                Ordering::Greater => {
                    current = node.right.clone();
                    floor = Some(node_ref.clone());
                }
            }
        }
        floor.map(|node| self.entry_of(&node).0)
    }

    /// Returns the smallest stored key greater than or equal to `key`.
    pub fn ceiling_key<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let mut ceiling = None;
        let mut current = self.root.clone();
        while let Some(node_ref) = current {
            let node = RefCell::borrow(&node_ref);
            match self.order.compare(key, node.key.borrow()) {
                Ordering::Equal => return Some(self.entry_of(&node_ref).0),
                Ordering::Less => {
                    current = node.left.clone();
                    ceiling = Some(node_ref.clone());
                }
                Ordering::Greater => current = node.right.clone(),
            }
        }
        ceiling.map(|node| self.entry_of(&node).0)
    }

    /// Returns the next larger key after `key`.
    ///
    /// `None` both when `key` is not stored and when it is the largest key;
    /// use [`successor`](Self::successor) to tell the two apart.
    pub fn successor_key<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        self.successor(key).key()
    }

    /// Returns the next smaller key before `key`.
    ///
    /// `None` both when `key` is not stored and when it is the smallest key;
    /// use [`predecessor`](Self::predecessor) to tell the two apart.
    pub fn predecessor_key<Q: ?Sized>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        self.predecessor(key).key()
    }

    /// Looks up the next larger key after `key`.
    pub fn successor<Q: ?Sized>(&self, key: &Q) -> Neighbor<&K>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let Some(node) = self.find_node(key) else {
            return Neighbor::Absent;
        };
        match successor_of(node) {
            Some(next) => Neighbor::Key(self.entry_of(&next).0),
            None => Neighbor::Boundary,
        }
    }

    /// Looks up the next smaller key before `key`.
    pub fn predecessor<Q: ?Sized>(&self, key: &Q) -> Neighbor<&K>
    where
        K: Borrow<Q>,
        C: KeyOrder<Q>,
    {
        let Some(node) = self.find_node(key) else {
            return Neighbor::Absent;
        };
        match predecessor_of(node) {
            Some(prev) => Neighbor::Key(self.entry_of(&prev).0),
            None => Neighbor::Boundary,
        }
    }
}

impl<K, V, C> Drop for TreeMap<K, V, C> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: KeyOrder<K>> Extend<(K, V)> for TreeMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for TreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TreeMap::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
