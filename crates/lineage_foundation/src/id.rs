//! Typed identifiers for groups and entities.
//!
//! Callers hand in raw signed integers; only strictly positive values are
//! valid ids. Validation happens once, at construction, so every `GroupId`
//! or `EntityId` in the system is known to be positive.

use std::fmt;
use std::num::NonZeroU64;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidInput, Result};

fn positive(raw: i64) -> Result<NonZeroU64> {
    u64::try_from(raw)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or_else(|| Error::invalid_input(InvalidInput::NonPositiveId { raw }))
}

/// Identifier of a group (e.g. a genre).
///
/// Group ids are never reused: once created, a group stays addressable even
/// after it has been absorbed into a newer group.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupId(NonZeroU64);

impl GroupId {
    /// Validates a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::NonPositiveId`] if `raw <= 0`.
    pub fn new(raw: i64) -> Result<Self> {
        positive(raw).map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group({})", self.0)
    }
}

/// Identifier of a tracked entity (e.g. a song).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(NonZeroU64);

impl EntityId {
    /// Validates a raw id.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidInput::NonPositiveId`] if `raw <= 0`.
    pub fn new(raw: i64) -> Result<Self> {
        positive(raw).map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Checks that three group ids are pairwise distinct.
///
/// # Errors
///
/// Returns [`InvalidInput::DuplicateIds`] naming all three ids if any two coincide.
pub fn distinct(a: GroupId, b: GroupId, c: GroupId) -> Result<()> {
    if a == b || a == c || b == c {
        return Err(Error::invalid_input(InvalidInput::DuplicateIds {
            ids: [a.get(), b.get(), c.get()],
        }));
    }
    Ok(())
}
