use crate::bst_order::{KeyOrder, NaturalOrder, Release};
use crate::error::{Error, Result};
use crate::TreeMap;
use std::cmp::Ordering;
use std::fmt;

pub(crate) type Releaser<T> = Box<dyn Release<T>>;

/// Step-by-step configuration of a [`TreeMap`].
///
/// The key ordering is mandatory; the key and value releasers are optional.
///
/// ```
/// use bst_map::TreeMap;
///
/// let map = TreeMap::<String, u32>::builder()
///     .order_by(|a: &String, b: &String| a.len().cmp(&b.len()).then(a.cmp(b)))
///     .release_values(|v: u32| log::trace!("dropping {v}"))
///     .build()
///     .unwrap();
/// assert!(map.is_empty());
/// ```
pub struct TreeMapBuilder<K, V, C = NaturalOrder> {
    order: Option<C>,
    release_key: Option<Releaser<K>>,
    release_value: Option<Releaser<V>>,
}

impl<K, V> TreeMapBuilder<K, V> {
    /// Starts a builder with nothing configured.
    pub fn new() -> Self {
        TreeMapBuilder {
            order: None,
            release_key: None,
            release_value: None,
        }
    }
}

impl<K, V> Default for TreeMapBuilder<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> TreeMapBuilder<K, V, C> {
    /// Orders keys with any [`KeyOrder`] implementation.
    pub fn ordered_by<O: KeyOrder<K>>(self, order: O) -> TreeMapBuilder<K, V, O> {
        TreeMapBuilder {
            order: Some(order),
            release_key: self.release_key,
            release_value: self.release_value,
        }
    }

    /// Orders keys with a comparison closure.
    pub fn order_by<F>(self, compare: F) -> TreeMapBuilder<K, V, F>
    where
        F: Fn(&K, &K) -> Ordering,
    {
        self.ordered_by(compare)
    }

    /// Orders keys by their [`Ord`] implementation.
    pub fn natural_order(self) -> TreeMapBuilder<K, V, NaturalOrder>
    where
        K: Ord,
    {
        self.ordered_by(NaturalOrder)
    }

    /// Hands every key the map discards to `releaser`.
    pub fn release_keys(mut self, releaser: impl Release<K> + 'static) -> Self {
        self.release_key = Some(Box::new(releaser));
        self
    }

    /// Hands every value the map discards to `releaser`.
    pub fn release_values(mut self, releaser: impl Release<V> + 'static) -> Self {
        self.release_value = Some(Box::new(releaser));
        self
    }

    /// Finishes the configuration.
    ///
    /// Fails with [`Error::MissingOrder`] if no ordering was chosen.
    pub fn build(self) -> Result<TreeMap<K, V, C>> {
        let order = self.order.ok_or(Error::MissingOrder)?;
        log::trace!(
            "building tree map (key releaser: {}, value releaser: {})",
            self.release_key.is_some(),
            self.release_value.is_some()
        );
        Ok(TreeMap::from_parts(order, self.release_key, self.release_value))
    }
}

impl<K, V, C: fmt::Debug> fmt::Debug for TreeMapBuilder<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeMapBuilder")
            .field("order", &self.order)
            .field("release_key", &self.release_key.is_some())
            .field("release_value", &self.release_value.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bst_order::ReverseOrder;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_build_without_order_fails() {
        let result = TreeMapBuilder::<u32, u32>::new().build();
        assert_eq!(result.err(), Some(Error::MissingOrder));

        let result = TreeMap::<u32, u32>::builder()
            .release_values(|_v: u32| {})
            .build();
        assert!(matches!(result, Err(Error::MissingOrder)));
    }

    #[test]
    fn test_build_with_natural_order() {
        let mut map = TreeMap::<u32, &str>::builder()
            .natural_order()
            .build()
            .unwrap();
        map.insert(2, "two");
        map.insert(1, "one");
        assert_eq!(map.min_key(), Some(&1));
    }

    #[test]
    fn test_build_with_reverse_order() {
        let mut map = TreeMap::<u32, ()>::builder()
            .ordered_by(ReverseOrder(NaturalOrder))
            .build()
            .unwrap();
        for k in [1, 3, 2] {
            map.insert(k, ());
        }
        let keys: Vec<_> = map.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![3, 2, 1]);
    }

    #[test]
    fn test_releasers_are_wired() {
        let keys = Rc::new(RefCell::new(Vec::new()));
        let values = Rc::new(RefCell::new(Vec::new()));
        let (k_sink, v_sink) = (keys.clone(), values.clone());
        let mut map = TreeMap::<u32, u32>::builder()
            .order_by(|a: &u32, b: &u32| a.cmp(b))
            .release_keys(move |k: u32| k_sink.borrow_mut().push(k))
            .release_values(move |v: u32| v_sink.borrow_mut().push(v))
            .build()
            .unwrap();
        map.insert(1, 10);
        assert!(map.remove(&1));
        assert_eq!(*keys.borrow(), vec![1]);
        assert_eq!(*values.borrow(), vec![10]);
    }

    #[test]
    fn test_debug_shows_configuration() {
        let builder = TreeMapBuilder::<u32, u32>::new()
            .natural_order()
            .release_keys(|_k: u32| {});
        let text = format!("{builder:?}");
        assert!(text.contains("release_key: true"));
        assert!(text.contains("release_value: false"));
    }
}
