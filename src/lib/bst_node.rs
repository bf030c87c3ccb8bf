use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Owning link from a parent to a child (or from the map to the root).
pub(crate) type NodeRef<K, V> = Rc<RefCell<Node<K, V>>>;

/// Navigational link from a child back to its parent. Never owns.
pub(crate) type ParentRef<K, V> = Weak<RefCell<Node<K, V>>>;

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeRef<K, V>>,
    pub(crate) right: Option<NodeRef<K, V>>,
    pub(crate) parent: ParentRef<K, V>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn new(key: K, value: V, parent: ParentRef<K, V>) -> NodeRef<K, V> {
        Rc::new(RefCell::new(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
        }))
    }

    /// Unwraps a detached node into its entry.
    ///
    /// Only the map holds strong links (iterators keep weak ones), so a
    /// detached node is uniquely owned and this returns `Some`.
    pub(crate) fn into_entry(node: NodeRef<K, V>) -> Option<(K, V)> {
        let node = Rc::try_unwrap(node).ok()?.into_inner();
        debug_assert!(node.left.is_none() && node.right.is_none());
        Some((node.key, node.value))
    }

    pub(crate) fn is_left_child_of(node: &NodeRef<K, V>, parent: &NodeRef<K, V>) -> bool {
        parent
            .borrow()
            .left
            .as_ref()
            .is_some_and(|left| Rc::ptr_eq(left, node))
    }

    pub(crate) fn is_right_child_of(node: &NodeRef<K, V>, parent: &NodeRef<K, V>) -> bool {
        parent
            .borrow()
            .right
            .as_ref()
            .is_some_and(|right| Rc::ptr_eq(right, node))
    }
}

/// Leftmost node of the subtree rooted at `node`.
pub(crate) fn subtree_min<K, V>(mut node: NodeRef<K, V>) -> NodeRef<K, V> {
    loop {
        let next = node.borrow().left.clone();
        match next {
            Some(left) => node = left,
            None => return node,
        }
    }
}

/// Rightmost node of the subtree rooted at `node`.
pub(crate) fn subtree_max<K, V>(mut node: NodeRef<K, V>) -> NodeRef<K, V> {
    loop {
        let next = node.borrow().right.clone();
        match next {
            Some(right) => node = right,
            None => return node,
        }
    }
}

/// In-order successor of `node`: the leftmost node of its right subtree, or
/// else the first ancestor reached from a left child.
pub(crate) fn successor_of<K, V>(node: NodeRef<K, V>) -> Option<NodeRef<K, V>> {
    let right = node.borrow().right.clone();
    match right {
        Some(right) => Some(subtree_min(right)),
        None => climb_while(node, Node::is_right_child_of),
    }
}

/// In-order predecessor of `node`, mirroring [`successor_of`].
pub(crate) fn predecessor_of<K, V>(node: NodeRef<K, V>) -> Option<NodeRef<K, V>> {
    let left = node.borrow().left.clone();
    match left {
        Some(left) => Some(subtree_max(left)),
        None => climb_while(node, Node::is_left_child_of),
    }
}

/// Follows parent links up from `node` while `node` is the `side` child of
/// its parent, and returns the first parent reached the other way.
fn climb_while<K, V>(
    mut node: NodeRef<K, V>,
    side: fn(&NodeRef<K, V>, &NodeRef<K, V>) -> bool,
) -> Option<NodeRef<K, V>> {
    let mut parent = node.borrow().parent.upgrade();
    while let Some(current) = parent {
        if !side(&node, &current) {
            return Some(current);
        }
        parent = current.borrow().parent.upgrade();
        node = current;
    }
    None
}

/// Borrows the entry stored in `node` for a caller-chosen lifetime.
///
/// # Safety
///
/// `node` must be reachable from a map that stays shared-borrowed for all of
/// `'a`. Every mutation of a node goes through `&mut` on its map, so no
/// `borrow_mut` of this node can happen while the returned references live,
/// and the map keeps the allocation alive.
pub(crate) unsafe fn entry_ref<'a, K, V>(node: &NodeRef<K, V>) -> (&'a K, &'a V) {
    let raw = node.as_ptr();
    (&(*raw).key, &(*raw).value)
}

/// Mutably borrows the value stored in `node` for a caller-chosen lifetime.
///
/// # Safety
///
/// `node` must be reachable from a map that stays exclusively borrowed for
/// all of `'a`, and no other reference into this node may be created while
/// the returned one lives.
pub(crate) unsafe fn value_mut<'a, K, V>(node: &NodeRef<K, V>) -> &'a mut V {
    &mut (*node.as_ptr()).value
}

/// Releases every node of the subtree rooted at `root`, handing each entry
/// to `sink`.
///
/// Only owning child links are followed, and iteratively, so degenerate
/// (list-shaped) trees of any depth are torn down without recursion. Nodes
/// are visited exactly once, parents before children.
pub(crate) fn drain_subtree<K, V>(root: Option<NodeRef<K, V>>, mut sink: impl FnMut(K, V)) {
    let mut pending: Vec<NodeRef<K, V>> = root.into_iter().collect();
    while let Some(node) = pending.pop() {
        {
            let mut inner = node.borrow_mut();
            pending.extend(inner.right.take());
            pending.extend(inner.left.take());
        }
        if let Some((key, value)) = Node::into_entry(node) {
            sink(key, value);
        }
    }
}
