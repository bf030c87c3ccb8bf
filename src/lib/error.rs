//! Error types for the tree map.
//!
//! Only construction can fail. Lookups and removals of absent keys are not
//! errors: they report `None`, `false` or [`Neighbor::Absent`] instead.
//!
//! [`Neighbor::Absent`]: crate::Neighbor::Absent

use thiserror::Error;

/// Errors reported while building a [`TreeMap`](crate::TreeMap).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The builder was finished without a key ordering.
    #[error("no key ordering configured for the tree map")]
    MissingOrder,
}

/// A `Result` alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
