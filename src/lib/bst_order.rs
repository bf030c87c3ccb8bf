//! Caller-supplied behaviour: key ordering, release of discarded entries and
//! traversal visitors.
//!
//! Each capability is a small trait with a blanket implementation for the
//! matching closure shape, so callers can pass either a closure or a type of
//! their own.

use std::cmp::Ordering;

/// A three-way comparison over keys.
///
/// Implementations must describe a strict total order, and must keep
/// answering the same way for as long as the keys live in a map. Changing the
/// order after insertion leaves the map in an unspecified (but memory safe)
/// state.
pub trait KeyOrder<Q: ?Sized> {
    /// Compares `a` against `b`.
    fn compare(&self, a: &Q, b: &Q) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NaturalOrder;

impl<Q: Ord + ?Sized> KeyOrder<Q> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another ordering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReverseOrder<O>(pub O);

impl<Q: ?Sized, O: KeyOrder<Q>> KeyOrder<Q> for ReverseOrder<O> {
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<Q: ?Sized, F> KeyOrder<Q> for F
where
    F: Fn(&Q, &Q) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &Q, b: &Q) -> Ordering {
        self(a, b)
    }
}

/// Takes ownership of a key or value the map is discarding.
///
/// Called when a value is overwritten, when an entry is removed, and for
/// every remaining entry on [`clear`](crate::TreeMap::clear) or drop. A map
/// without a releaser simply drops what it discards.
pub trait Release<T> {
    /// Consumes `item`.
    fn release(&mut self, item: T);
}

impl<T, F> Release<T> for F
where
    F: FnMut(T),
{
    #[inline]
    fn release(&mut self, item: T) {
        self(item)
    }
}

/// Receives the entries of a traversal.
///
/// Any context the visit needs lives in the visitor itself. The visitor only
/// ever sees shared references, so it cannot disturb the tree it is walking.
pub trait Visitor<K, V> {
    /// Called once per entry, in traversal order.
    fn visit(&mut self, key: &K, value: &V);
}

impl<K, V, F> Visitor<K, V> for F
where
    F: FnMut(&K, &V),
{
    #[inline]
    fn visit(&mut self, key: &K, value: &V) {
        self(key, value)
    }
}
