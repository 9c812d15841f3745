//! Priority-ordered storage for engine hooks.

use std::fmt;
use std::sync::Arc;

use super::{ChangeObserver, ModifyHook, PreChangeHook};

/// Registered hooks for every notification stage.
///
/// Each stage is stored as a shared slice sorted by priority. Dispatch clones
/// the `Arc` first, so hooks may register further hooks or re-enter the
/// engine without invalidating the list being iterated.
#[derive(Clone)]
pub struct HookRegistry {
    pre_change: Arc<[Arc<dyn PreChangeHook>]>,
    modify: Arc<[Arc<dyn ModifyHook>]>,
    observers: Arc<[Arc<dyn ChangeObserver>]>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self {
            pre_change: Arc::from(Vec::new()),
            modify: Arc::from(Vec::new()),
            observers: Arc::from(Vec::new()),
        }
    }

    pub fn register_pre_change(&mut self, hook: Arc<dyn PreChangeHook>) {
        self.pre_change = with_sorted(&self.pre_change, hook, |h| h.priority());
    }

    pub fn register_modify(&mut self, hook: Arc<dyn ModifyHook>) {
        self.modify = with_sorted(&self.modify, hook, |h| h.priority());
    }

    pub fn register_observer(&mut self, observer: Arc<dyn ChangeObserver>) {
        self.observers = with_sorted(&self.observers, observer, |h| h.priority());
    }

    pub fn pre_change(&self) -> Arc<[Arc<dyn PreChangeHook>]> {
        Arc::clone(&self.pre_change)
    }

    pub fn modify(&self) -> Arc<[Arc<dyn ModifyHook>]> {
        Arc::clone(&self.modify)
    }

    pub fn observers(&self) -> Arc<[Arc<dyn ChangeObserver>]> {
        Arc::clone(&self.observers)
    }

    /// Total number of registered hooks across all stages.
    pub fn len(&self) -> usize {
        self.pre_change.len() + self.modify.len() + self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns hook names and priorities per stage (for debugging).
    pub fn names(&self) -> impl Iterator<Item = (&'static str, &'static str, i32)> + '_ {
        let pre = self
            .pre_change
            .iter()
            .map(|h| ("pre_change", h.name(), h.priority()));
        let modify = self
            .modify
            .iter()
            .map(|h| ("modify", h.name(), h.priority()));
        let observers = self
            .observers
            .iter()
            .map(|h| ("observer", h.name(), h.priority()));
        pre.chain(modify).chain(observers)
    }
}

/// Copies `existing` plus `hook` into a new slice, stably sorted by priority.
fn with_sorted<T: ?Sized>(
    existing: &Arc<[Arc<T>]>,
    hook: Arc<T>,
    priority: impl Fn(&T) -> i32,
) -> Arc<[Arc<T>]> {
    let mut hooks: Vec<Arc<T>> = existing.iter().cloned().collect();
    hooks.push(hook);
    hooks.sort_by_key(|h| priority(h.as_ref()));
    hooks.into()
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
