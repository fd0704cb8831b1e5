//! Screen presenters.
//!
//! A presenter owns the logic of one checkout screen and talks to the host
//! UI through a narrow view trait held in a [`ViewHandle`]. Once the view
//! is detached, results that arrive late are dropped.

pub mod additional_step;
pub mod discounts;
pub mod entity_types;
pub mod financial_institutions;

pub use additional_step::{AdditionalStepPresenter, AdditionalStepView};
pub use discounts::{DiscountsPresenter, DiscountsView};
pub use entity_types::{EntityTypesPresenter, EntityTypesView};
pub use financial_institutions::{FinancialInstitutionsPresenter, FinancialInstitutionsView};

use std::sync::{Arc, Mutex};

pub const SCREEN_ADDITIONAL_STEP: &str = "ADDITIONAL_STEP";
pub const SCREEN_ENTITY_TYPE: &str = "ENTITY_TYPE";
pub const SCREEN_FINANCIAL_INSTITUTIONS: &str = "FINANCIAL_INSTITUTIONS";
pub const SCREEN_DISCOUNTS: &str = "DISCOUNTS";

pub const ACTION_BACK_PRESSED: &str = "BACK_PRESSED";
pub const ACTION_ITEM_SELECTED: &str = "ITEM_SELECTED";

/// Shared, detachable slot for a view.
pub struct ViewHandle<V> {
    slot: Arc<Mutex<Option<V>>>,
}

impl<V> Clone for ViewHandle<V> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<V> ViewHandle<V> {
    pub fn new(view: V) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(view))),
        }
    }

    /// Remove the view. Returns it if it was still attached.
    pub fn detach(&self) -> Option<V> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    pub fn is_attached(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Run `f` against the view if it is still attached.
    pub fn with<R>(&self, f: impl FnOnce(&mut V) -> R) -> Option<R> {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_mut().map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detached_view_is_skipped() {
        let handle = ViewHandle::new(Vec::<&str>::new());
        let clone = handle.clone();

        assert_eq!(handle.with(|v| v.push("loading")), Some(()));
        assert!(clone.is_attached());

        let view = clone.detach().unwrap();
        assert_eq!(view, vec!["loading"]);
        assert!(handle.with(|v| v.push("late")).is_none());
        assert!(!handle.is_attached());
        assert!(handle.detach().is_none());
    }
}
