//! The registry facade.
//!
//! A [`Registry`] owns the group and entity records plus the forest that
//! tracks group lineage. Callers talk to it in raw `i64` ids; every id is
//! validated before any state is consulted, and every mutation either
//! completes or leaves the registry exactly as it was.

use lineage_forest::Forest;
use lineage_foundation::{
    AllocationFailure, Conflict, EntityId, Error, ErrorContext, GroupId, IdMap, Result, Store,
    distinct,
};
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::records::{EntityRecord, GroupRecord};

/// Tracks which group every entity belongs to as groups merge.
///
/// Groups merge pairwise into a brand-new group id; the two source groups
/// become inert. Each entity remembers the group it was added to and how
/// many merge events that group's lineage had seen at the time, which is
/// enough to answer where it lives now, how many merges it has been
/// through since, and which group it was added to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    groups: IdMap<GroupId, GroupRecord>,
    entities: IdMap<EntityId, EntityRecord>,
    forest: Forest<GroupId>,
    config: RegistryConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn in_operation(operation: &'static str, err: Error) -> Error {
    let context = err
        .context
        .clone()
        .unwrap_or_default()
        .with_operation(operation);
    err.with_context(context)
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        let forest =
            Forest::with_capacity(config.initial_capacity).with_node_limit(config.node_limit);
        Self {
            groups: IdMap::new(),
            entities: IdMap::new(),
            forest,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the underlying lineage forest for inspection.
    #[must_use]
    pub fn forest(&self) -> &Forest<GroupId> {
        &self.forest
    }

    /// Returns the number of groups ever created, absorbed ones included.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the groups that have not been absorbed.
    pub fn live_groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups.values().filter(|record| record.is_live())
    }

    /// Returns the sum of entity counts over live groups.
    ///
    /// Always equal to [`Registry::entity_count`].
    #[must_use]
    pub fn total_live_entities(&self) -> usize {
        self.live_groups().map(GroupRecord::entity_count).sum()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Creates an empty group.
    ///
    /// # Errors
    ///
    /// - Invalid input if `group <= 0`.
    /// - [`Conflict::GroupExists`] if the id was ever used, even by a group
    ///   that has since been absorbed.
    /// - An allocation failure if the group ceiling is reached.
    pub fn create_group(&mut self, group: i64) -> Result<()> {
        self.try_create_group(group)
            .inspect_err(|err| warn!(group, error = %err, "create_group rejected"))
            .map_err(|err| in_operation("create_group", err))
    }

    fn try_create_group(&mut self, group: i64) -> Result<()> {
        let id = GroupId::new(group)?;
        if self.groups.contains(&id) {
            return Err(Error::conflict(Conflict::GroupExists(id)));
        }

        self.forest.make_set(id)?;
        self.groups.insert_if_absent(id, GroupRecord::created(id));

        debug!(group = %id, "created group");
        self.verify_if_configured()
    }

    /// Adds a new entity to a live group.
    ///
    /// # Errors
    ///
    /// - Invalid input if either id is `<= 0`.
    /// - [`Conflict::EntityExists`] if the entity id is taken.
    /// - [`Conflict::GroupNotFound`] or [`Conflict::GroupAbsorbed`] if the
    ///   group cannot accept entities.
    /// - An allocation failure if the entity ceiling is reached.
    pub fn add_entity(&mut self, entity: i64, group: i64) -> Result<()> {
        self.try_add_entity(entity, group)
            .inspect_err(|err| warn!(entity, group, error = %err, "add_entity rejected"))
            .map_err(|err| in_operation("add_entity", err))
    }

    fn try_add_entity(&mut self, entity: i64, group: i64) -> Result<()> {
        let entity = EntityId::new(entity)?;
        let group = GroupId::new(group)?;
        if self.entities.contains(&entity) {
            return Err(Error::conflict(Conflict::EntityExists(entity)));
        }
        self.live_group(group)?;
        if let Some(limit) = self.config.entity_limit {
            if self.entities.len() >= limit {
                return Err(Error::allocation(AllocationFailure::EntityLimit { limit }));
            }
        }

        // A live group is a root, so this reads its base weight without
        // touching any parent links.
        let snapshot = self.forest.live_rank(group)?;
        self.entities
            .insert_if_absent(entity, EntityRecord::new(entity, group, snapshot));
        if let Some(record) = self.groups.get_mut(&group) {
            record.add_entity();
        }

        debug!(entity = %entity, group = %group, snapshot, "added entity");
        self.verify_if_configured()
    }

    /// Merges two live groups into a brand-new group.
    ///
    /// Every entity of `first` and `second` moves to `merged`; both sources
    /// become inert and keep their ids reserved.
    ///
    /// # Errors
    ///
    /// - Invalid input if any id is `<= 0` or the three ids are not pairwise
    ///   distinct.
    /// - [`Conflict::GroupNotFound`] or [`Conflict::GroupAbsorbed`] if a
    ///   source is not a live group.
    /// - [`Conflict::GroupExists`] if `merged` was ever used.
    /// - An allocation failure if the group ceiling is reached.
    pub fn merge_groups(&mut self, first: i64, second: i64, merged: i64) -> Result<()> {
        self.try_merge_groups(first, second, merged)
            .inspect_err(|err| warn!(first, second, merged, error = %err, "merge rejected"))
            .map_err(|err| in_operation("merge_groups", err))
    }

    fn try_merge_groups(&mut self, first: i64, second: i64, merged: i64) -> Result<()> {
        let first = GroupId::new(first)?;
        let second = GroupId::new(second)?;
        let merged = GroupId::new(merged)?;
        distinct(first, second, merged)?;

        self.live_group(first)?;
        self.live_group(second)?;
        if self.groups.contains(&merged) {
            return Err(Error::conflict(Conflict::GroupExists(merged)));
        }

        self.forest.merge_fresh(first, second, merged)?;

        let mut moved = 0;
        for source in [first, second] {
            if let Some(record) = self.groups.get_mut(&source) {
                moved += record.absorb_into(merged);
            }
        }
        self.groups.insert_if_absent(
            merged,
            GroupRecord::merged(merged, (first, second), moved),
        );

        debug!(
            first = %first,
            second = %second,
            merged = %merged,
            entities = moved,
            "merged groups"
        );
        self.verify_if_configured()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the live group that currently contains `entity`.
    ///
    /// May compress lineage paths; answers are unaffected.
    ///
    /// # Errors
    ///
    /// Invalid input if `entity <= 0`, [`Conflict::EntityNotFound`] if unknown.
    pub fn current_group_of(&mut self, entity: i64) -> Result<GroupId> {
        let origin = self
            .entity_record(entity)
            .map_err(|err| in_operation("current_group_of", err))?
            .origin();
        self.forest
            .find(origin)
            .map_err(|err| in_operation("current_group_of", err))
    }

    /// Returns the number of entities currently in `group`.
    ///
    /// Zero for an absorbed group.
    ///
    /// # Errors
    ///
    /// Invalid input if `group <= 0`, [`Conflict::GroupNotFound`] if unknown.
    pub fn live_entity_count_of(&self, group: i64) -> Result<usize> {
        self.group(group)
            .map(GroupRecord::entity_count)
            .map_err(|err| in_operation("live_entity_count_of", err))
    }

    /// Returns how many merges the group containing `entity` has been
    /// through since the entity was added.
    ///
    /// # Errors
    ///
    /// Invalid input if `entity <= 0`, [`Conflict::EntityNotFound`] if unknown.
    pub fn merge_events_since(&mut self, entity: i64) -> Result<u64> {
        self.try_merge_events_since(entity)
            .map_err(|err| in_operation("merge_events_since", err))
    }

    fn try_merge_events_since(&mut self, entity: i64) -> Result<u64> {
        let record = *self.entity_record(entity)?;
        let now = self.forest.live_rank(record.origin())?;
        now.checked_sub(record.snapshot()).ok_or_else(|| {
            Error::internal(format!(
                "{} rank {now} is below its snapshot {}",
                record.id(),
                record.snapshot()
            ))
        })
    }

    /// Returns the group `entity` was added to.
    ///
    /// Answered from the lineage forest rather than the stored record, so it
    /// cross-checks the weight bookkeeping. Never mutates.
    ///
    /// # Errors
    ///
    /// Invalid input if `entity <= 0`, [`Conflict::EntityNotFound`] if unknown.
    pub fn group_at_insertion(&self, entity: i64) -> Result<GroupId> {
        self.entity_record(entity)
            .and_then(|record| self.forest.as_of(record.origin(), record.snapshot()))
            .map_err(|err| in_operation("group_at_insertion", err))
    }

    /// Returns the record of `group`.
    ///
    /// # Errors
    ///
    /// Invalid input if `group <= 0`, [`Conflict::GroupNotFound`] if unknown.
    pub fn group(&self, group: i64) -> Result<&GroupRecord> {
        let id = GroupId::new(group)?;
        self.groups
            .get(&id)
            .ok_or_else(|| Error::conflict(Conflict::GroupNotFound(id)))
    }

    /// Returns the record of `entity`.
    ///
    /// # Errors
    ///
    /// Invalid input if `entity <= 0`, [`Conflict::EntityNotFound`] if unknown.
    pub fn entity(&self, entity: i64) -> Result<&EntityRecord> {
        self.entity_record(entity)
    }

    fn entity_record(&self, entity: i64) -> Result<&EntityRecord> {
        let id = EntityId::new(entity)?;
        self.entities
            .get(&id)
            .ok_or_else(|| Error::conflict(Conflict::EntityNotFound(id)))
    }

    fn live_group(&self, id: GroupId) -> Result<&GroupRecord> {
        let record = self
            .groups
            .get(&id)
            .ok_or_else(|| Error::conflict(Conflict::GroupNotFound(id)))?;
        match record.absorbed_into() {
            Some(into) => Err(Error::conflict(Conflict::GroupAbsorbed { group: id, into })),
            None => Ok(record),
        }
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Checks that records and forest agree.
    ///
    /// On top of [`Forest::verify`]: every group has a node, live groups are
    /// exactly the forest roots, absorbed groups hold no entities, live
    /// counts add up to the entity total, and every entity's origin exists.
    ///
    /// # Errors
    ///
    /// Returns an internal error describing the first violation found.
    pub fn verify(&self) -> Result<()> {
        self.forest.verify()?;

        if self.forest.len() != self.groups.len() {
            return Err(Error::internal(format!(
                "{} forest nodes for {} groups",
                self.forest.len(),
                self.groups.len()
            )));
        }
        for record in self.groups.values() {
            if !self.forest.contains(&record.id()) {
                return Err(Error::internal(format!("{} has no forest node", record.id())));
            }
            if !record.is_live() && record.entity_count() != 0 {
                return Err(Error::internal(format!(
                    "absorbed {} still counts {} entities",
                    record.id(),
                    record.entity_count()
                )));
            }
        }
        for root in self.forest.roots() {
            if !self.groups.get(&root).is_some_and(GroupRecord::is_live) {
                return Err(Error::internal(format!("root {root} is not a live group")));
            }
        }
        if self.forest.roots().count() != self.live_groups().count() {
            return Err(Error::internal("live groups and forest roots disagree"));
        }

        let live = self.total_live_entities();
        if live != self.entities.len() {
            return Err(Error::internal(format!(
                "live groups count {live} entities, {} exist",
                self.entities.len()
            )));
        }
        for record in self.entities.values() {
            if !self.groups.contains(&record.origin()) {
                return Err(Error::internal(format!(
                    "{} has unknown origin {}",
                    record.id(),
                    record.origin()
                )));
            }
        }
        Ok(())
    }

    fn verify_if_configured(&self) -> Result<()> {
        if self.config.verify_after_mutation {
            self.verify()
                .map_err(|err| err.with_context(ErrorContext::new().with_frame("verify")))?;
        }
        Ok(())
    }
}
