//! Configuration for a registry.

/// Configuration for a [`Registry`](crate::Registry).
///
/// Controls preallocation, capacity ceilings and self-checking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Forest nodes to preallocate.
    pub initial_capacity: usize,

    /// Maximum number of groups (forest nodes); `None` for unbounded.
    pub node_limit: Option<usize>,

    /// Maximum number of entities; `None` for unbounded.
    pub entity_limit: Option<usize>,

    /// Run [`Registry::verify`](crate::Registry::verify) after every successful mutation.
    pub verify_after_mutation: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 64,
            node_limit: None,
            entity_limit: None,
            verify_after_mutation: false,
        }
    }
}

impl RegistryConfig {
    /// Creates a configuration that verifies every mutation.
    ///
    /// Verification walks the whole forest, so this is meant for tests and
    /// debugging rather than large workloads.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            verify_after_mutation: true,
            ..Self::default()
        }
    }

    /// Builder method to set the preallocated capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Builder method to cap the number of groups.
    #[must_use]
    pub fn with_node_limit(mut self, limit: usize) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Builder method to cap the number of entities.
    #[must_use]
    pub fn with_entity_limit(mut self, limit: usize) -> Self {
        self.entity_limit = Some(limit);
        self
    }

    /// Builder method to enable/disable post-mutation verification.
    #[must_use]
    pub fn with_verify_after_mutation(mut self, verify: bool) -> Self {
        self.verify_after_mutation = verify;
        self
    }
}
