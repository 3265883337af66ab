//! Transform registration.
//!
//!     Transforms are callbacks run on every dirty leaf after an update. Registering one
//!     returns a [TransformHandle]; the transform stays active for as long as the handle
//!     lives and is removed when the handle drops, whatever path the owner exits through.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::vartok::tree::{Document, DocumentError, NodeKey};

/// Callback invoked with the document and one dirty leaf.
pub type TextTransform = dyn Fn(&mut Document, NodeKey) -> Result<(), DocumentError>;

#[derive(Default)]
pub(crate) struct TransformRegistry {
    next_id: u64,
    entries: Vec<(u64, Rc<TextTransform>)>,
}

impl TransformRegistry {
    pub(crate) fn insert(&mut self, transform: Rc<TextTransform>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, transform));
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() < before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The active transforms in registration order.
    pub(crate) fn snapshot(&self) -> Vec<Rc<TextTransform>> {
        self.entries
            .iter()
            .map(|(_, transform)| Rc::clone(transform))
            .collect()
    }
}

/// Keeps a registered transform alive. Dropping it unregisters the transform.
#[must_use = "dropping the handle unregisters the transform"]
pub struct TransformHandle {
    id: u64,
    registry: Weak<RefCell<TransformRegistry>>,
}

impl TransformHandle {
    pub(crate) fn new(id: u64, registry: &Rc<RefCell<TransformRegistry>>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
        }
    }

    /// Unregister now. Equivalent to dropping the handle.
    pub fn unregister(self) {}
}

impl Drop for TransformHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if registry.borrow_mut().remove(self.id) {
                debug!(transform = self.id, "Unregistered text transform");
            }
        }
    }
}

impl std::fmt::Debug for TransformHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformHandle")
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Rc<TextTransform> {
        Rc::new(|_: &mut Document, _: NodeKey| Ok::<(), DocumentError>(()))
    }

    #[test]
    fn test_drop_unregisters() {
        let registry = Rc::new(RefCell::new(TransformRegistry::default()));
        let id = registry.borrow_mut().insert(noop());
        let handle = TransformHandle::new(id, &registry);
        assert_eq!(registry.borrow().len(), 1);

        drop(handle);
        assert_eq!(registry.borrow().len(), 0);
    }

    #[test]
    fn test_handle_outliving_registry_is_harmless() {
        let registry = Rc::new(RefCell::new(TransformRegistry::default()));
        let id = registry.borrow_mut().insert(noop());
        let handle = TransformHandle::new(id, &registry);

        drop(registry);
        handle.unregister();
    }

    #[test]
    fn test_snapshot_keeps_registration_order() {
        let mut registry = TransformRegistry::default();
        let first = registry.insert(noop());
        registry.insert(noop());
        registry.remove(first);

        assert_eq!(registry.snapshot().len(), 1);
        assert!(!registry.remove(first));
    }
}
