//! Discount screen: direct discount first, coupon code as fallback.

use std::sync::Arc;

use pxkit_sdk::objects::Discount;
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::{ACTION_BACK_PRESSED, SCREEN_DISCOUNTS, ViewHandle};
use crate::error::CheckoutError;
use crate::providers::{CheckoutProvider, Gateway, MerchantServer};
use crate::tracking::Tracker;

pub const CODE_DOESNT_MATCH: &str = "campaign-code-doesnt-match";
pub const CAMPAIGN_DOESNT_MATCH: &str = "campaign-doesnt-match";
pub const CAMPAIGN_EXPIRED: &str = "campaign-expired";
pub const AMOUNT_DOESNT_MATCH: &str = "amount-doesnt-match";
pub const STANDARD_ERROR_MESSAGE: &str = "Something went wrong, please try again";

/// Text shown under the code input for a failed code lookup.
pub fn discount_error_message(error: &CheckoutError) -> &'static str {
    let code = error.api_exception().and_then(|e| e.first_cause_code());
    match code {
        Some(CODE_DOESNT_MATCH) => "The code is not valid",
        Some(CAMPAIGN_DOESNT_MATCH) => "The code does not apply to this purchase",
        Some(CAMPAIGN_EXPIRED) => "The code has expired",
        Some(AMOUNT_DOESNT_MATCH) => "The purchase amount does not qualify for this code",
        _ => STANDARD_ERROR_MESSAGE,
    }
}

pub trait DiscountsView: Send {
    fn draw_summary(&mut self, discount: &Discount, amount_with_discount: Decimal);
    fn request_discount_code(&mut self);
    fn show_code_input_error(&mut self, message: &str);
    fn show_empty_discount_code_error(&mut self);
    fn clear_error_view(&mut self);
    fn show_loading_view(&mut self);
    fn stop_loading_view(&mut self);
    fn finish_with_result(&mut self, discount: Option<&Discount>);
    fn finish_with_cancel_result(&mut self);
}

pub struct DiscountsPresenter<V, G, M> {
    provider: Arc<CheckoutProvider<G, M>>,
    amount: Decimal,
    payer_email: String,
    direct_discount_enabled: bool,
    discount: Option<Discount>,
    view: ViewHandle<V>,
    tracker: Option<Tracker>,
}

impl<V, G, M> DiscountsPresenter<V, G, M>
where
    V: DiscountsView,
    G: Gateway,
    M: MerchantServer,
{
    pub fn new(
        provider: Arc<CheckoutProvider<G, M>>,
        amount: Decimal,
        payer_email: impl Into<String>,
        view: ViewHandle<V>,
    ) -> Self {
        Self {
            provider,
            amount,
            payer_email: payer_email.into(),
            direct_discount_enabled: true,
            discount: None,
            view,
            tracker: None,
        }
    }

    /// Start from a discount resolved earlier, e.g. by a prefetch.
    pub fn with_discount(mut self, discount: Option<Discount>) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_direct_discount_enabled(mut self, enabled: bool) -> Self {
        self.direct_discount_enabled = enabled;
        self
    }

    pub fn with_tracker(mut self, tracker: Tracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    pub async fn initialize(&mut self) {
        if let Some(tracker) = &self.tracker {
            tracker.track_screen(SCREEN_DISCOUNTS);
        }

        if self.discount.is_none() && self.direct_discount_enabled {
            self.view.with(|v| v.show_loading_view());
            let result = self
                .provider
                .resolve_discount(self.amount, &self.payer_email)
                .await;
            self.view.with(|v| v.stop_loading_view());
            match result {
                Ok(discount) => self.discount = Some(discount),
                Err(e) => debug!(error = %e, "No direct discount, asking for a code"),
            }
        }

        match &self.discount {
            Some(discount) => self.draw_summary(discount),
            None => {
                self.view.with(|v| v.request_discount_code());
            }
        }
    }

    pub async fn validate_discount_code_input(&mut self, code: &str) {
        if code.trim().is_empty() {
            self.view.with(|v| v.show_empty_discount_code_error());
            return;
        }
        self.view.with(|v| v.clear_error_view());

        self.view.with(|v| v.show_loading_view());
        let result = self
            .provider
            .resolve_discount_by_code(self.amount, &self.payer_email, code)
            .await;
        self.view.with(|v| v.stop_loading_view());

        match result {
            Ok(discount) => {
                info!(discount_id = discount.id, "Discount code accepted");
                self.draw_summary(&discount);
                self.discount = Some(discount);
            }
            Err(e) => {
                let message = discount_error_message(&e);
                debug!(error = %e, message, "Discount code rejected");
                self.view.with(|v| v.show_code_input_error(message));
            }
        }
    }

    /// Close the screen with the current discount, if any.
    pub fn finish(&self) {
        self.view
            .with(|v| v.finish_with_result(self.discount.as_ref()));
    }

    pub fn on_back_pressed(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.track_action(SCREEN_DISCOUNTS, ACTION_BACK_PRESSED);
        }
        self.view.with(|v| v.finish_with_cancel_result());
    }

    fn draw_summary(&self, discount: &Discount) {
        let amount = discount.amount_with_discount(self.amount);
        self.view.with(|v| v.draw_summary(discount, amount));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{MockGateway, MockMerchant, count, discount, provider};
    use pxkit_sdk::config::ServicePreference;
    use pxkit_sdk::objects::{ApiException, Cause};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<String>,
    }

    impl DiscountsView for RecordingView {
        fn draw_summary(&mut self, discount: &Discount, amount_with_discount: Decimal) {
            self.calls
                .push(format!("summary:{}:{amount_with_discount}", discount.id));
        }

        fn request_discount_code(&mut self) {
            self.calls.push("request_code".to_string());
        }

        fn show_code_input_error(&mut self, message: &str) {
            self.calls.push(format!("code_error:{message}"));
        }

        fn show_empty_discount_code_error(&mut self) {
            self.calls.push("empty_code".to_string());
        }

        fn clear_error_view(&mut self) {
            self.calls.push("clear_error".to_string());
        }

        fn show_loading_view(&mut self) {
            self.calls.push("loading".to_string());
        }

        fn stop_loading_view(&mut self) {
            self.calls.push("stop_loading".to_string());
        }

        fn finish_with_result(&mut self, discount: Option<&Discount>) {
            self.calls
                .push(format!("finish:{:?}", discount.map(|d| d.id)));
        }

        fn finish_with_cancel_result(&mut self) {
            self.calls.push("cancel".to_string());
        }
    }

    type Presenter = DiscountsPresenter<RecordingView, MockGateway, MockMerchant>;

    fn build(gateway: MockGateway) -> (Presenter, ViewHandle<RecordingView>) {
        let view = ViewHandle::new(RecordingView::default());
        let provider = Arc::new(provider(
            gateway,
            MockMerchant::default(),
            ServicePreference::default(),
        ));
        (
            DiscountsPresenter::new(
                provider,
                Decimal::new(100, 0),
                "payer@example.com",
                view.clone(),
            ),
            view,
        )
    }

    fn rejected(code: &str) -> ApiException {
        let mut e = ApiException::new("invalid code", Some(400));
        e.cause = vec![Cause {
            code: code.to_string(),
            description: None,
        }];
        e
    }

    #[tokio::test]
    async fn test_draws_direct_discount() {
        let (mut presenter, view) = build(MockGateway::new());

        presenter.initialize().await;
        presenter.finish();

        assert_eq!(
            view.detach().unwrap().calls,
            vec!["loading", "stop_loading", "summary:1:95.00", "finish:Some(1)"]
        );
    }

    #[tokio::test]
    async fn test_requests_code_without_direct_discount() {
        let gateway = MockGateway {
            discount_error: Some(ApiException::new("not found", Some(404))),
            ..MockGateway::new()
        };
        let (mut presenter, view) = build(gateway);

        presenter.initialize().await;
        presenter.validate_discount_code_input("  ").await;
        presenter.validate_discount_code_input("PROMO").await;

        assert_eq!(presenter.discount().unwrap().id, 2);
        assert_eq!(
            view.detach().unwrap().calls,
            vec![
                "loading",
                "stop_loading",
                "request_code",
                "empty_code",
                "clear_error",
                "loading",
                "stop_loading",
                "summary:2:95.00",
            ]
        );
    }

    #[tokio::test]
    async fn test_preset_discount_skips_lookup() {
        let gateway = MockGateway::new();
        let calls = gateway.calls.clone();
        let (presenter, view) = build(gateway);
        let mut presenter = presenter.with_discount(Some(discount(7)));

        presenter.initialize().await;

        assert_eq!(count(&calls.direct_discount), 0);
        assert_eq!(view.detach().unwrap().calls, vec!["summary:7:95.00"]);

        let (presenter, view) = build(MockGateway::new());
        let mut presenter = presenter.with_direct_discount_enabled(false);
        presenter.initialize().await;
        assert_eq!(view.detach().unwrap().calls, vec!["request_code"]);
    }

    #[tokio::test]
    async fn test_code_error_messages() {
        for (code, message) in [
            (CAMPAIGN_EXPIRED, "The code has expired"),
            (CODE_DOESNT_MATCH, "The code is not valid"),
            ("something-else", STANDARD_ERROR_MESSAGE),
        ] {
            let gateway = MockGateway {
                code_error: Some(rejected(code)),
                ..MockGateway::new()
            };
            let (mut presenter, view) = build(gateway);
            presenter.validate_discount_code_input("PROMO").await;

            assert!(presenter.discount().is_none());
            let calls = view.detach().unwrap().calls;
            assert_eq!(calls.last().unwrap(), &format!("code_error:{message}"));
        }
    }

    #[tokio::test]
    async fn test_late_discount_after_detach_is_dropped() {
        let gate = Arc::new(Notify::new());
        let gateway = MockGateway {
            gate: Some(gate.clone()),
            ..MockGateway::new()
        };
        let (mut presenter, view) = build(gateway);

        let (_, detached) = tokio::join!(presenter.initialize(), async {
            let detached = view.detach();
            gate.notify_one();
            detached
        });

        assert_eq!(detached.unwrap().calls, vec!["loading"]);
        assert_eq!(presenter.discount().unwrap().id, 1);
        presenter.on_back_pressed();
        assert!(!view.is_attached());
    }
}
