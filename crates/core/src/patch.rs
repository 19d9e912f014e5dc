//! Tri-state field wrapper for partial updates.
//!
//! A JSON object field can be missing, explicitly `null`, or carry a value.
//! `Option<T>` folds the first two together; [`Patch`] keeps them apart so
//! the merge policy is decided where the update is applied.

use serde::{Deserialize, Deserializer};

/// One updatable field of a partial-update request.
///
/// Use with `#[serde(default)]` on the containing struct field so a missing
/// key deserializes to [`Patch::Absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The key was not present in the request.
    Absent,
    /// The key was present with a `null` value.
    Null,
    /// The key was present with a value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    /// The supplied value, if any. `Absent` and `Null` both yield `None`.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        })
    }
}
