//! Entity type selection.

use pxkit_sdk::objects::{EntityType, PaymentMethod, Site};
use tracing::warn;

use super::{ACTION_BACK_PRESSED, ACTION_ITEM_SELECTED, SCREEN_ENTITY_TYPE, ViewHandle};
use crate::error::CheckoutError;
use crate::flow::{PAYMENT_METHOD_NULL, SITE_NOT_SET};
use crate::providers::{EntityTypesSource, GetEntityTypes};
use crate::tracking::Tracker;

pub const NO_ENTITY_TYPES: &str = "no entity types available";

pub trait EntityTypesView: Send {
    fn on_valid_start(&mut self);
    fn on_invalid_start(&mut self, message: &str);
    fn initialize_entity_types(&mut self, entity_types: &[EntityType]);
    fn show_loading_view(&mut self);
    fn stop_loading_view(&mut self);
    fn show_api_exception_error(&mut self, error: &CheckoutError);
    fn start_error_view(&mut self, message: &str);
    fn finish_with_result(&mut self, entity_type: &EntityType);
    fn finish_with_cancel_result(&mut self);
}

pub struct EntityTypesPresenter<V, E> {
    source: E,
    site: Option<Site>,
    payment_method: Option<PaymentMethod>,
    view: ViewHandle<V>,
    tracker: Option<Tracker>,
}

impl<V, E> EntityTypesPresenter<V, E>
where
    V: EntityTypesView,
    E: EntityTypesSource,
{
    pub fn new(
        source: E,
        site: Option<Site>,
        payment_method: Option<PaymentMethod>,
        view: ViewHandle<V>,
    ) -> Self {
        Self {
            source,
            site,
            payment_method,
            view,
            tracker: None,
        }
    }

    pub fn with_tracker(mut self, tracker: Tracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn validate(&self) -> Result<(Site, &PaymentMethod), CheckoutError> {
        let payment_method = self
            .payment_method
            .as_ref()
            .ok_or_else(|| CheckoutError::validation(PAYMENT_METHOD_NULL))?;
        let site = self
            .site
            .ok_or_else(|| CheckoutError::validation(SITE_NOT_SET))?;
        Ok((site, payment_method))
    }

    pub async fn start(&self) {
        if let Err(e) = self.validate() {
            self.view.with(|v| v.on_invalid_start(&e.message()));
            return;
        }
        if let Some(tracker) = &self.tracker {
            tracker.track_screen(SCREEN_ENTITY_TYPE);
        }
        self.view.with(|v| v.on_valid_start());
        self.load().await;
    }

    pub async fn load(&self) {
        let Ok((site, payment_method)) = self.validate() else {
            return;
        };

        self.view.with(|v| v.show_loading_view());
        let result = self
            .source
            .process(GetEntityTypes {
                site,
                payment_method_id: payment_method.id.clone(),
            })
            .await;
        self.view.with(|v| v.stop_loading_view());

        match result {
            Ok(entity_types) => match entity_types.as_slice() {
                [] => {
                    self.view.with(|v| v.start_error_view(NO_ENTITY_TYPES));
                }
                [only] => {
                    self.view.with(|v| v.finish_with_result(only));
                }
                all => {
                    self.view.with(|v| v.initialize_entity_types(all));
                }
            },
            Err(e) => {
                warn!(site = %site, error = %e, "Failed to fetch entity types");
                let error = CheckoutError::from(e);
                if error.is_recoverable() {
                    self.view.with(|v| v.show_api_exception_error(&error));
                } else {
                    self.view.with(|v| v.start_error_view(&error.message()));
                }
            }
        }
    }

    /// Retry after a failure. Issues the same fetch again.
    pub async fn recover_from_failure(&self) {
        self.load().await;
    }

    pub fn on_item_selected(&self, entity_type: &EntityType) {
        if let Some(tracker) = &self.tracker {
            tracker.track_action(SCREEN_ENTITY_TYPE, ACTION_ITEM_SELECTED);
        }
        self.view.with(|v| v.finish_with_result(entity_type));
    }

    pub fn on_back_pressed(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.track_action(SCREEN_ENTITY_TYPE, ACTION_BACK_PRESSED);
        }
        self.view.with(|v| v.finish_with_cancel_result());
    }
}
