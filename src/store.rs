use crate::debounce::DebounceRules;
use crate::plugin::{ActionOverrides, PluginContext, SetupError, StorePlugin};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

/// Marker for types usable as a store's action key.
///
/// Action names form a closed set, so the natural key type is a small
/// fieldless `Copy` enum. Any type meeting the bounds implements this
/// automatically.
pub trait ActionKey: Copy + Eq + Hash + fmt::Debug + 'static {}

impl<K: Copy + Eq + Hash + fmt::Debug + 'static> ActionKey for K {}

/// A raw action definition: a plain function that mutates store state.
///
/// Actions are declared as fn pointers (no captures) and receive the live
/// state by mutable reference when invoked through the store.
///
/// # Examples
///
/// ```
/// use quiesce::ActionFn;
///
/// fn increment(count: &mut u64) {
///     *count += 1;
/// }
///
/// let action: ActionFn<u64> = increment;
/// ```
pub type ActionFn<S> = fn(&mut S);

/// An action bound to a live store's state handle.
///
/// This is the calling convention plugins see and replace: a zero-argument
/// callable that locks the store's state and runs the underlying action.
/// Debounce wrappers produced by a [`Debouncer`](crate::Debouncer) have the
/// same shape.
pub type BoundAction = Arc<dyn Fn() + Send + Sync>;

/// A store's declared configuration, passed to plugins at creation time.
#[non_exhaustive]
pub struct StoreOptions<K, O = ()> {
    /// Optional per-action debounce configuration.
    pub debounce: Option<DebounceRules<K, O>>,
}

/// Declares a store: an id, initial state, named actions, and options.
///
/// # Examples
///
/// ```
/// use quiesce::StoreDefinition;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Action {
///     Increment,
/// }
///
/// fn increment(count: &mut u64) {
///     *count += 1;
/// }
///
/// let definition: StoreDefinition<Action, u64> =
///     StoreDefinition::new("counter", 0).action(Action::Increment, increment);
/// ```
pub struct StoreDefinition<K, S, O = ()> {
    id: String,
    state: S,
    actions: Vec<(K, ActionFn<S>)>,
    options: StoreOptions<K, O>,
}

impl<K: ActionKey, S, O> StoreDefinition<K, S, O> {
    /// Create a definition with the given id and initial state.
    pub fn new(id: impl Into<String>, state: S) -> Self {
        StoreDefinition {
            id: id.into(),
            state,
            actions: Vec::new(),
            options: StoreOptions { debounce: None },
        }
    }

    /// Declare an action under the given key.
    ///
    /// Declaring the same key twice keeps the last declaration.
    pub fn action(mut self, key: K, action: ActionFn<S>) -> Self {
        self.actions.push((key, action));
        self
    }

    /// Declare the store's debounce configuration.
    pub fn debounce(mut self, rules: DebounceRules<K, O>) -> Self {
        self.options.debounce = Some(rules);
        self
    }
}

/// A live store: state behind a lock plus the current action bindings.
///
/// Stores are created through a [`StoreHost`], never directly — plugin setup
/// happens during creation and bindings are not mutated afterwards.
pub struct Store<K, S> {
    id: String,
    state: Arc<Mutex<S>>,
    actions: HashMap<K, BoundAction>,
}

impl<K, S> fmt::Debug for Store<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("actions", &self.actions.len())
            .finish()
    }
}

impl<K: ActionKey, S> Store<K, S> {
    /// Invoke the current binding for the given action key.
    ///
    /// For an untouched action this locks the state and runs the declared
    /// function synchronously. For a debounced action it runs whatever
    /// wrapper the plugin installed, which may defer the underlying action.
    ///
    /// # Panics
    ///
    /// Panics if no action was declared under `key`, or if a previous action
    /// panicked while holding the state lock.
    pub fn call(&self, key: K) {
        match self.actions.get(&key) {
            Some(action) => action(),
            None => panic!("store '{}' has no action {key:?}", self.id),
        }
    }

    /// Run a closure against the current state and return its result.
    ///
    /// # Panics
    ///
    /// Panics if a previous action panicked while holding the state lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let state = self.state.lock().unwrap();
        f(&state)
    }

    /// Return the current binding for the given action key, if any.
    ///
    /// This is what plugins hand to a wrapper factory: the returned function
    /// already carries the store's state handle.
    pub fn bound_action(&self, key: K) -> Option<BoundAction> {
        self.actions.get(&key).cloned()
    }

    /// Returns the store id.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn apply(&mut self, overrides: ActionOverrides<K>) {
        for (key, action) in overrides {
            log::trace!("store '{}': overriding action {key:?}", self.id);
            self.actions.insert(key, action);
        }
    }
}

/// The plugin registry and store factory.
///
/// Plugins are registered once with the host; the host invokes each of them
/// once per store it creates, in registration order, and merges any returned
/// overrides over the store's bindings (replacement wins, later plugins
/// override earlier ones).
///
/// # Examples
///
/// ```
/// use quiesce::{StoreDefinition, StoreHost};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Action {
///     Increment,
/// }
///
/// fn increment(count: &mut u64) {
///     *count += 1;
/// }
///
/// let host: StoreHost<Action, u64> = StoreHost::new();
/// let store = host
///     .create_store(StoreDefinition::new("counter", 0).action(Action::Increment, increment))
///     .unwrap();
///
/// store.call(Action::Increment);
/// assert_eq!(store.with_state(|count| *count), 1);
/// ```
pub struct StoreHost<K, S, O = ()> {
    plugins: Vec<Box<dyn StorePlugin<K, S, O>>>,
}

impl<K: ActionKey, S: Send + 'static, O> StoreHost<K, S, O> {
    /// Create a host with no plugins registered.
    pub fn new() -> Self {
        StoreHost {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin.
    ///
    /// The plugin will run once for every store this host creates.
    pub fn with_plugin(mut self, plugin: impl StorePlugin<K, S, O> + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Build a live store from a definition and run every registered plugin.
    ///
    /// Binds each declared action to the store's state handle, then invokes
    /// each plugin with the store's options and the live instance. Returned
    /// overrides are merged over the bindings immediately, so a later plugin
    /// observes the bindings left by an earlier one. The whole sequence is
    /// synchronous; bindings are never mutated after this returns.
    ///
    /// # Errors
    ///
    /// Propagates any [`SetupError`] a plugin raises, unchanged. The store is
    /// discarded in that case.
    pub fn create_store(&self, definition: StoreDefinition<K, S, O>) -> Result<Store<K, S>, SetupError> {
        let StoreDefinition {
            id,
            state,
            actions,
            options,
        } = definition;

        let state = Arc::new(Mutex::new(state));
        let mut bound = HashMap::with_capacity(actions.len());
        for (key, action) in actions {
            let handle = Arc::clone(&state);
            let binding: BoundAction = Arc::new(move || {
                let mut state = handle.lock().unwrap();
                action(&mut state);
            });
            bound.insert(key, binding);
        }

        let mut store = Store {
            id,
            state,
            actions: bound,
        };

        for plugin in &self.plugins {
            let overrides = plugin.setup(PluginContext {
                options: &options,
                store: &store,
            })?;
            if let Some(overrides) = overrides {
                store.apply(overrides);
            }
        }

        Ok(store)
    }
}

impl<K: ActionKey, S: Send + 'static, O> Default for StoreHost<K, S, O> {
    fn default() -> Self {
        StoreHost::new()
    }
}
