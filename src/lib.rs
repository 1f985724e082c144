mod debounce;
mod plugin;
mod store;

pub use debounce::{DebouncePlugin, DebounceRule, DebounceRules, Debouncer};
pub use plugin::{ActionOverrides, PluginContext, SetupError, StorePlugin};
pub use store::{ActionFn, ActionKey, BoundAction, Store, StoreDefinition, StoreHost, StoreOptions};
