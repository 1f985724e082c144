use crate::store::{BoundAction, Store, StoreOptions};
use thiserror::Error;

/// Raised when a store's declared configuration cannot be applied.
///
/// These are caller-configuration defects: they surface at store creation,
/// are never retried, and are never swallowed. [`StoreHost::create_store`]
/// (crate::StoreHost::create_store) propagates them unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SetupError {
    /// The debounce configuration names an action the store never declared.
    #[error("debounce configuration for store '{store}' names unknown action {action}")]
    UnknownAction {
        /// The store id.
        store: String,
        /// The offending action key, formatted with `Debug`.
        action: String,
    },
}

/// What a plugin receives when a store is created: the store's declared
/// options and the live instance whose bindings may be read and overridden.
pub struct PluginContext<'a, K, S, O = ()> {
    /// The store's declared configuration, including the debounce mapping.
    pub options: &'a StoreOptions<K, O>,
    /// The live store. Bindings read here already carry the state handle.
    pub store: &'a Store<K, S>,
}

/// A store plugin, invoked once per store instance by the [`StoreHost`]
/// (crate::StoreHost).
///
/// Returning `Ok(None)` leaves the store untouched. Returning overrides asks
/// the host to merge them over the store's bindings, replacement wins.
pub trait StorePlugin<K, S, O = ()> {
    /// Inspect a newly created store and optionally override some bindings.
    ///
    /// # Errors
    ///
    /// Returns a [`SetupError`] when the store's configuration is invalid or
    /// misapplied. The host fails store creation in that case.
    fn setup(&self, context: PluginContext<'_, K, S, O>) -> Result<Option<ActionOverrides<K>>, SetupError>;
}

/// Replacement bindings produced by a plugin, in insertion order.
pub struct ActionOverrides<K> {
    entries: Vec<(K, BoundAction)>,
}

impl<K> ActionOverrides<K> {
    /// Create an empty override set.
    pub fn new() -> Self {
        ActionOverrides {
            entries: Vec::new(),
        }
    }

    /// Record a replacement binding for the given action key.
    pub fn insert(&mut self, key: K, action: BoundAction) {
        self.entries.push((key, action));
    }

    /// Returns the number of recorded replacements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no replacements were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K> Default for ActionOverrides<K> {
    fn default() -> Self {
        ActionOverrides::new()
    }
}

impl<K> IntoIterator for ActionOverrides<K> {
    type Item = (K, BoundAction);
    type IntoIter = std::vec::IntoIter<(K, BoundAction)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
