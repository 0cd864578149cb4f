//! Group and entity records.

use lineage_foundation::{EntityId, GroupId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metadata for one group identity.
///
/// A group is never removed. Once absorbed by a merge its count drops to
/// zero and it stops accepting entities, but it stays addressable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupRecord {
    id: GroupId,
    entity_count: usize,
    absorbed_into: Option<GroupId>,
    formed_from: Option<(GroupId, GroupId)>,
}

impl GroupRecord {
    pub(crate) fn created(id: GroupId) -> Self {
        Self {
            id,
            entity_count: 0,
            absorbed_into: None,
            formed_from: None,
        }
    }

    pub(crate) fn merged(id: GroupId, from: (GroupId, GroupId), entity_count: usize) -> Self {
        Self {
            id,
            entity_count,
            absorbed_into: None,
            formed_from: Some(from),
        }
    }

    pub(crate) fn absorb_into(&mut self, successor: GroupId) -> usize {
        self.absorbed_into = Some(successor);
        std::mem::take(&mut self.entity_count)
    }

    pub(crate) fn add_entity(&mut self) {
        self.entity_count += 1;
    }

    /// Returns the group id.
    #[must_use]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Returns the number of entities currently in this group.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Returns the group that absorbed this one, if any.
    #[must_use]
    pub fn absorbed_into(&self) -> Option<GroupId> {
        self.absorbed_into
    }

    /// Returns the two groups this one was merged from, if it was created by a merge.
    #[must_use]
    pub fn formed_from(&self) -> Option<(GroupId, GroupId)> {
        self.formed_from
    }

    /// Returns true if the group has not been absorbed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.absorbed_into.is_none()
    }
}

/// Metadata for one tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRecord {
    id: EntityId,
    origin: GroupId,
    snapshot: u64,
}

impl EntityRecord {
    pub(crate) fn new(id: EntityId, origin: GroupId, snapshot: u64) -> Self {
        Self {
            id,
            origin,
            snapshot,
        }
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the group the entity was added to.
    #[must_use]
    pub fn origin(&self) -> GroupId {
        self.origin
    }

    /// Returns the live rank of the origin's lineage when the entity was added.
    #[must_use]
    pub fn snapshot(&self) -> u64 {
        self.snapshot
    }
}
