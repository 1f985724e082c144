use crate::plugin::{ActionOverrides, PluginContext, SetupError, StorePlugin};
use crate::store::{ActionKey, BoundAction};
use std::time::Duration;

/// A pluggable debounce strategy.
///
/// `wrap` receives a bound action and must return a new function with the
/// same calling convention: invoked repeatedly within `wait` of each other,
/// the returned function executes the underlying action at most once per
/// quiescent period. The exact coalescing policy (trailing edge, leading
/// edge, max-wait) is the implementor's responsibility; the plugin only
/// forwards the configured parameters.
///
/// Each `wrap` call must produce an independent wrapper: two wrapped actions
/// share no timers or state.
///
/// The `Options` associated type declares what extra arguments a strategy
/// accepts beyond the wait, so per-action configuration is statically
/// constrained to match. Strategies without extra arguments use `()`.
///
/// # Examples
///
/// ```
/// use quiesce::{BoundAction, Debouncer};
/// use std::time::Duration;
///
/// /// Pass-through strategy: no coalescing at all.
/// struct Immediate;
///
/// impl Debouncer for Immediate {
///     type Options = ();
///
///     fn wrap(&self, action: BoundAction, _wait: Duration, _options: Option<&()>) -> BoundAction {
///         action
///     }
/// }
/// ```
pub trait Debouncer {
    /// Extra arguments the strategy accepts after the action and the wait.
    type Options;

    /// Produce a debounced version of `action`.
    fn wrap(&self, action: BoundAction, wait: Duration, options: Option<&Self::Options>) -> BoundAction;
}

/// Normalized debounce parameters for a single action.
///
/// Built from either a bare wait (`Duration`) or a wait plus the strategy's
/// extra arguments (`(Duration, O)`). The plugin forwards a bare wait as
/// `wrap(action, wait, None)` and a pair as `wrap(action, wait, Some(&opts))`.
#[derive(Debug, Clone)]
pub struct DebounceRule<O = ()> {
    wait: Duration,
    options: Option<O>,
}

impl<O> DebounceRule<O> {
    /// The configured wait.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// The configured extra arguments, if any.
    pub fn options(&self) -> Option<&O> {
        self.options.as_ref()
    }
}

impl<O> From<Duration> for DebounceRule<O> {
    fn from(wait: Duration) -> Self {
        DebounceRule {
            wait,
            options: None,
        }
    }
}

impl<O> From<(Duration, O)> for DebounceRule<O> {
    fn from((wait, options): (Duration, O)) -> Self {
        DebounceRule {
            wait,
            options: Some(options),
        }
    }
}

/// Per-store debounce configuration: an ordered mapping from action key to
/// [`DebounceRule`].
///
/// Keys share the store's action key type, so the configuration cannot name
/// an action outside the store's closed action set. Rules are traversed in
/// insertion order; order is otherwise irrelevant since actions are wrapped
/// independently.
///
/// # Examples
///
/// ```
/// use quiesce::DebounceRules;
/// use std::time::Duration;
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
/// enum Action {
///     Search,
///     Save,
/// }
///
/// let rules: DebounceRules<Action> = DebounceRules::new()
///     .action(Action::Search, Duration::from_millis(300))
///     .action(Action::Save, Duration::from_millis(50));
/// assert_eq!(rules.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DebounceRules<K, O = ()> {
    rules: Vec<(K, DebounceRule<O>)>,
}

impl<K: ActionKey, O> DebounceRules<K, O> {
    /// Create an empty configuration.
    pub fn new() -> Self {
        DebounceRules { rules: Vec::new() }
    }

    /// Add a rule for the given action key.
    ///
    /// Accepts a bare wait or a `(wait, options)` pair.
    pub fn action(mut self, key: K, rule: impl Into<DebounceRule<O>>) -> Self {
        self.rules.push((key, rule.into()));
        self
    }

    /// Iterate over the rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &DebounceRule<O>)> {
        self.rules.iter().map(|(key, rule)| (*key, rule))
    }

    /// Returns the number of configured actions.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no actions are configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<K: ActionKey, O> Default for DebounceRules<K, O> {
    fn default() -> Self {
        DebounceRules::new()
    }
}

/// The action debounce plugin.
///
/// Wraps a [`Debouncer`] strategy. When a store declares a debounce
/// configuration, the plugin replaces each configured action with the wrapper
/// the strategy produces for it; every other binding is left untouched.
/// Stores without a configuration are used as-is.
///
/// The plugin holds no state of its own: one instance can serve any number of
/// stores, and debouncing an action on one store never affects another.
/// Errors from the strategy are not caught here; anything it raises
/// propagates to the store-creation caller.
///
/// # Examples
///
/// ```
/// use quiesce::{BoundAction, DebouncePlugin, DebounceRules, Debouncer, StoreDefinition, StoreHost};
/// use std::time::Duration;
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
/// struct Immediate;
///
/// impl Debouncer for Immediate {
///     type Options = ();
///
///     fn wrap(&self, action: BoundAction, _wait: Duration, _options: Option<&()>) -> BoundAction {
///         action
///     }
/// }
///
/// let host: StoreHost<Action, u64> = StoreHost::new().with_plugin(DebouncePlugin::new(Immediate));
/// let store = host
///     .create_store(
///         StoreDefinition::new("counter", 0)
///             .action(Action::Increment, increment)
///             .debounce(DebounceRules::new().action(Action::Increment, Duration::ZERO)),
///     )
///     .unwrap();
///
/// store.call(Action::Increment);
/// assert_eq!(store.with_state(|count| *count), 1);
/// ```
pub struct DebouncePlugin<D> {
    debouncer: D,
}

impl<D: Debouncer> DebouncePlugin<D> {
    /// Create the plugin around a debounce strategy.
    pub fn new(debouncer: D) -> Self {
        DebouncePlugin { debouncer }
    }
}

impl<K, S, D> StorePlugin<K, S, D::Options> for DebouncePlugin<D>
where
    K: ActionKey,
    D: Debouncer,
{
    fn setup(
        &self,
        context: PluginContext<'_, K, S, D::Options>,
    ) -> Result<Option<ActionOverrides<K>>, SetupError> {
        let Some(rules) = context.options.debounce.as_ref() else {
            return Ok(None);
        };

        let mut overrides = ActionOverrides::new();
        for (key, rule) in rules.iter() {
            let action = context.store.bound_action(key).ok_or_else(|| SetupError::UnknownAction {
                store: context.store.id().to_string(),
                action: format!("{key:?}"),
            })?;
            log::debug!(
                "store '{}': debouncing action {key:?} by {:?}",
                context.store.id(),
                rule.wait()
            );
            overrides.insert(key, self.debouncer.wrap(action, rule.wait(), rule.options()));
        }

        Ok(Some(overrides))
    }
}
