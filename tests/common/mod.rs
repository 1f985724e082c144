#![allow(dead_code)]

use quiesce::{BoundAction, Debouncer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CounterAction {
    One,
    Two,
    Missing,
}

#[derive(Default, Debug)]
pub struct CounterState {
    pub count: u64,
}

pub fn increment(state: &mut CounterState) {
    state.count += 1;
}

/// Debounce wait used by timing tests, with a generous settle margin so the
/// assertions hold on slow CI machines.
pub const WAIT: Duration = Duration::from_millis(30);
pub const SETTLE: Duration = Duration::from_millis(150);

/// Trailing-edge debounce strategy backed by a timer thread.
///
/// Each wrapped call bumps a per-wrapper generation counter and spawns a
/// thread that sleeps for the wait; the thread fires the action only if no
/// newer call superseded it in the meantime. Wrappers are independent: each
/// `wrap` call gets its own counter.
pub struct ThreadDebounce;

impl Debouncer for ThreadDebounce {
    type Options = ();

    fn wrap(&self, action: BoundAction, wait: Duration, _options: Option<&()>) -> BoundAction {
        let generation = Arc::new(AtomicU64::new(0));
        Arc::new(move || {
            let current = generation.fetch_add(1, Ordering::SeqCst) + 1;
            let generation = Arc::clone(&generation);
            let action = Arc::clone(&action);
            thread::spawn(move || {
                thread::sleep(wait);
                if generation.load(Ordering::SeqCst) == current {
                    action();
                }
            });
        })
    }
}

/// Extra arguments for strategies under test that accept them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeOpts {
    pub leading: bool,
}

pub struct RecordedCall<O> {
    pub action: BoundAction,
    pub wait: Duration,
    pub options: Option<O>,
}

impl<O: Clone> Clone for RecordedCall<O> {
    fn clone(&self) -> Self {
        RecordedCall {
            action: Arc::clone(&self.action),
            wait: self.wait,
            options: self.options.clone(),
        }
    }
}

/// Recording test double: logs every `wrap` call and returns the action
/// unchanged, so wrapped actions stay pass-through.
///
/// Clones share the call log, letting a test keep a handle after handing the
/// double to the plugin.
pub struct RecordingDebounce<O = ()> {
    calls: Arc<Mutex<Vec<RecordedCall<O>>>>,
}

impl<O> RecordingDebounce<O> {
    pub fn new() -> Self {
        RecordingDebounce {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl<O: Clone> RecordingDebounce<O> {
    pub fn calls(&self) -> Vec<RecordedCall<O>> {
        self.calls.lock().unwrap().clone()
    }
}

impl<O> Clone for RecordingDebounce<O> {
    fn clone(&self) -> Self {
        RecordingDebounce {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<O> Default for RecordingDebounce<O> {
    fn default() -> Self {
        RecordingDebounce::new()
    }
}

impl<O: Clone> Debouncer for RecordingDebounce<O> {
    type Options = O;

    fn wrap(&self, action: BoundAction, wait: Duration, options: Option<&O>) -> BoundAction {
        self.calls.lock().unwrap().push(RecordedCall {
            action: Arc::clone(&action),
            wait,
            options: options.cloned(),
        });
        action
    }
}
