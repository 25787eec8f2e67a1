//! Association lifecycle hooks.
//!
//! Hooks observe association declarations: `before_associate` runs before a
//! declaration is recorded in the registry, `after_associate` after. Both
//! receive the resolved event, including the inferred foreign key.

/// A resolved association declaration, as passed to hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationEvent {
    /// Source (owning) table.
    pub source_table: String,
    /// Target (owned) table.
    pub target_table: String,
    /// Association alias.
    pub alias: String,
    /// Foreign key column on the target.
    pub foreign_key: String,
}

/// A registered hook callback.
pub type AssociationHook = Box<dyn Fn(&AssociationEvent) + Send + Sync>;

/// The hook lists a registry dispatches to.
#[derive(Default)]
pub(crate) struct HookSet {
    before: Vec<AssociationHook>,
    after: Vec<AssociationHook>,
}

impl HookSet {
    pub(crate) fn add_before(&mut self, hook: AssociationHook) {
        self.before.push(hook);
    }

    pub(crate) fn add_after(&mut self, hook: AssociationHook) {
        self.after.push(hook);
    }

    pub(crate) fn fire_before(&self, event: &AssociationEvent) {
        for hook in &self.before {
            hook(event);
        }
    }

    pub(crate) fn fire_after(&self, event: &AssociationEvent) {
        for hook in &self.after {
            hook(event);
        }
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn event() -> AssociationEvent {
        AssociationEvent {
            source_table: String::from("users"),
            target_table: String::from("tasks"),
            alias: String::from("tasks"),
            foreign_key: String::from("user_id"),
        }
    }

    #[test]
    fn hooks_fire_in_registration_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = HookSet::default();

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            hooks.add_before(Box::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            }));
        }

        hooks.fire_before(&event());
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // No after hooks registered; firing is a no-op.
        hooks.fire_after(&event());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
