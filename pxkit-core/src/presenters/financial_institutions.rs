//! Financial institution selection.

use std::sync::Arc;

use pxkit_sdk::objects::{FinancialInstitution, PaymentMethod};
use tracing::{debug, warn};

use super::{ACTION_BACK_PRESSED, ACTION_ITEM_SELECTED, SCREEN_FINANCIAL_INSTITUTIONS, ViewHandle};
use crate::error::CheckoutError;
use crate::flow::{PAYMENT_METHOD_NULL, PUBLIC_KEY_NOT_SET};
use crate::providers::{CheckoutProvider, Gateway, MerchantServer};
use crate::tracking::Tracker;

pub const NO_FINANCIAL_INSTITUTIONS: &str = "no financial institutions available";

pub trait FinancialInstitutionsView: Send {
    fn on_valid_start(&mut self);
    fn on_invalid_start(&mut self, message: &str);
    fn initialize_financial_institutions(&mut self, institutions: &[FinancialInstitution]);
    fn show_loading_view(&mut self);
    fn stop_loading_view(&mut self);
    /// A recoverable failure; the host may offer a retry that calls
    /// [`FinancialInstitutionsPresenter::recover_from_failure`].
    fn show_api_exception_error(&mut self, error: &CheckoutError);
    fn start_error_view(&mut self, message: &str);
    fn finish_with_result(&mut self, institution: &FinancialInstitution);
    fn finish_with_cancel_result(&mut self);
}

pub struct FinancialInstitutionsPresenter<V, G, M> {
    provider: Arc<CheckoutProvider<G, M>>,
    payment_method: Option<PaymentMethod>,
    view: ViewHandle<V>,
    tracker: Option<Tracker>,
}

impl<V, G, M> FinancialInstitutionsPresenter<V, G, M>
where
    V: FinancialInstitutionsView,
    G: Gateway,
    M: MerchantServer,
{
    pub fn new(
        provider: Arc<CheckoutProvider<G, M>>,
        payment_method: Option<PaymentMethod>,
        view: ViewHandle<V>,
    ) -> Self {
        Self {
            provider,
            payment_method,
            view,
            tracker: None,
        }
    }

    pub fn with_tracker(mut self, tracker: Tracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn validate(&self) -> Result<&PaymentMethod, CheckoutError> {
        if self.provider.public_key().is_empty() {
            return Err(CheckoutError::validation(PUBLIC_KEY_NOT_SET));
        }
        self.payment_method
            .as_ref()
            .ok_or_else(|| CheckoutError::validation(PAYMENT_METHOD_NULL))
    }

    pub async fn start(&self) {
        if let Err(e) = self.validate() {
            self.view.with(|v| v.on_invalid_start(&e.message()));
            return;
        }
        self.track_screen();
        self.view.with(|v| v.on_valid_start());
        self.load().await;
    }

    /// Show the institutions the payment method carries, fetching them when
    /// it has none. A single institution is selected automatically.
    pub async fn load(&self) {
        let Ok(payment_method) = self.validate() else {
            return;
        };
        if !payment_method.financial_institutions.is_empty() {
            self.show(&payment_method.financial_institutions);
            return;
        }

        self.view.with(|v| v.show_loading_view());
        let result = self
            .provider
            .fetch_financial_institutions(&payment_method.id)
            .await;
        self.view.with(|v| v.stop_loading_view());

        match result {
            Ok(institutions) => self.show(&institutions),
            Err(e) => {
                warn!(
                    payment_method_id = %payment_method.id,
                    error = %e,
                    "Failed to fetch financial institutions"
                );
                self.fail(e);
            }
        }
    }

    /// Retry after a failure. Issues the same fetch again.
    pub async fn recover_from_failure(&self) {
        self.load().await;
    }

    pub fn on_item_selected(&self, institution: &FinancialInstitution) {
        debug!(financial_institution = %institution.id, "Financial institution picked");
        self.track_action(ACTION_ITEM_SELECTED);
        self.view.with(|v| v.finish_with_result(institution));
    }

    pub fn on_back_pressed(&self) {
        self.track_action(ACTION_BACK_PRESSED);
        self.view.with(|v| v.finish_with_cancel_result());
    }

    fn show(&self, institutions: &[FinancialInstitution]) {
        match institutions {
            [] => {
                self.view
                    .with(|v| v.start_error_view(NO_FINANCIAL_INSTITUTIONS));
            }
            [only] => {
                self.view.with(|v| v.finish_with_result(only));
            }
            _ => {
                self.view
                    .with(|v| v.initialize_financial_institutions(institutions));
            }
        }
    }

    fn fail(&self, error: CheckoutError) {
        if error.is_recoverable() {
            self.view.with(|v| v.show_api_exception_error(&error));
        } else {
            self.view.with(|v| v.start_error_view(&error.message()));
        }
    }

    fn track_screen(&self) {
        if let Some(tracker) = &self.tracker {
            tracker.track_screen(SCREEN_FINANCIAL_INSTITUTIONS);
        }
    }

    fn track_action(&self, action: &str) {
        if let Some(tracker) = &self.tracker {
            tracker.track_action(SCREEN_FINANCIAL_INSTITUTIONS, action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::mock::{MockGateway, MockMerchant, count, institution, method, provider};
    use crate::tracking::{TrackerConfig, TrackingJob, tracking_channel};
    use pxkit_sdk::config::ServicePreference;
    use pxkit_sdk::objects::{ApiException, AppInformation};
    use tokio::sync::Notify;

    #[derive(Default)]
    struct RecordingView {
        calls: Vec<String>,
    }

    impl FinancialInstitutionsView for RecordingView {
        fn on_valid_start(&mut self) {
            self.calls.push("valid".to_string());
        }

        fn on_invalid_start(&mut self, message: &str) {
            self.calls.push(format!("invalid:{message}"));
        }

        fn initialize_financial_institutions(&mut self, institutions: &[FinancialInstitution]) {
            self.calls.push(format!("initialize:{}", institutions.len()));
        }

        fn show_loading_view(&mut self) {
            self.calls.push("loading".to_string());
        }

        fn stop_loading_view(&mut self) {
            self.calls.push("stop_loading".to_string());
        }

        fn show_api_exception_error(&mut self, error: &CheckoutError) {
            self.calls.push(format!("api_error:{}", error.message()));
        }

        fn start_error_view(&mut self, message: &str) {
            self.calls.push(format!("error:{message}"));
        }

        fn finish_with_result(&mut self, institution: &FinancialInstitution) {
            self.calls.push(format!("finish:{}", institution.id));
        }

        fn finish_with_cancel_result(&mut self) {
            self.calls.push("cancel".to_string());
        }
    }

    type Presenter = FinancialInstitutionsPresenter<RecordingView, MockGateway, MockMerchant>;

    fn build(
        gateway: MockGateway,
        payment_method: Option<PaymentMethod>,
    ) -> (Presenter, ViewHandle<RecordingView>) {
        let view = ViewHandle::new(RecordingView::default());
        let provider = Arc::new(provider(
            gateway,
            MockMerchant::default(),
            ServicePreference::default(),
        ));
        (
            FinancialInstitutionsPresenter::new(provider, payment_method, view.clone()),
            view,
        )
    }

    fn bank_transfer(id: &str, institutions: Vec<FinancialInstitution>) -> PaymentMethod {
        let mut pm = method(id, "bank_transfer");
        pm.financial_institutions = institutions;
        pm
    }

    #[tokio::test]
    async fn test_invalid_without_payment_method() {
        let (presenter, view) = build(MockGateway::new(), None);
        presenter.start().await;
        assert_eq!(
            view.detach().unwrap().calls,
            vec![format!("invalid:{PAYMENT_METHOD_NULL}")]
        );
    }

    #[tokio::test]
    async fn test_single_institution_is_selected() {
        let gateway = MockGateway::new();
        let calls = gateway.calls.clone();
        let (presenter, view) = build(gateway, Some(method("pse", "bank_transfer")));

        presenter.start().await;

        assert_eq!(count(&calls.payment_methods), 0);
        assert_eq!(view.detach().unwrap().calls, vec!["valid", "finish:1007"]);
    }

    #[tokio::test]
    async fn test_several_institutions_are_listed() {
        let pm = bank_transfer(
            "pse",
            vec![institution("1", "Bank A"), institution("2", "Bank B")],
        );
        let (presenter, view) = build(MockGateway::new(), Some(pm));

        presenter.start().await;
        presenter.on_item_selected(&institution("2", "Bank B"));

        assert_eq!(
            view.detach().unwrap().calls,
            vec!["valid", "initialize:2", "finish:2"]
        );
    }

    #[tokio::test]
    async fn test_fetches_when_descriptor_has_none() {
        let gateway = MockGateway {
            methods: vec![bank_transfer(
                "webpay",
                vec![institution("10", "Bank X"), institution("11", "Bank Y")],
            )],
            ..MockGateway::new()
        };
        let calls = gateway.calls.clone();
        let (presenter, view) = build(gateway, Some(bank_transfer("webpay", vec![])));

        presenter.start().await;

        assert_eq!(count(&calls.payment_methods), 1);
        assert_eq!(
            view.detach().unwrap().calls,
            vec!["valid", "loading", "stop_loading", "initialize:2"]
        );
    }

    #[tokio::test]
    async fn test_recover_reissues_fetch() {
        let gateway = MockGateway {
            methods_error: Some(ApiException::new("timeout", Some(504))),
            ..MockGateway::new()
        };
        let calls = gateway.calls.clone();
        let (presenter, view) = build(gateway, Some(bank_transfer("webpay", vec![])));

        presenter.start().await;
        presenter.recover_from_failure().await;

        assert_eq!(count(&calls.payment_methods), 2);
        assert_eq!(
            view.detach().unwrap().calls,
            vec![
                "valid",
                "loading",
                "stop_loading",
                "api_error:timeout",
                "loading",
                "stop_loading",
                "api_error:timeout",
            ]
        );
    }

    #[tokio::test]
    async fn test_late_result_after_detach_is_dropped() {
        let gate = Arc::new(Notify::new());
        let gateway = MockGateway {
            gate: Some(gate.clone()),
            ..MockGateway::new()
        };
        let (presenter, view) = build(gateway, Some(bank_transfer("pse", vec![])));

        let detached = tokio::join!(presenter.load(), async {
            let detached = view.detach();
            gate.notify_one();
            detached
        })
        .1
        .unwrap();

        assert_eq!(detached.calls, vec!["loading"]);
        assert!(!view.is_attached());
    }

    #[tokio::test]
    async fn test_back_pressed_is_tracked() {
        let (tx, mut rx) = tracking_channel();
        let tracker = Tracker::new(tx);
        tracker.init(TrackerConfig {
            public_key: "pk".to_string(),
            site_id: "MCO".to_string(),
            sdk_version: "0.1.0".to_string(),
            app: Some(AppInformation {
                package_name: "com.example.shop".to_string(),
                checkout_version: "1.0.0".to_string(),
                platform: "rust".to_string(),
            }),
        });
        let (presenter, view) = build(MockGateway::new(), Some(method("pse", "bank_transfer")));
        let presenter = presenter.with_tracker(tracker);

        presenter.start().await;
        presenter.on_back_pressed();

        assert!(matches!(rx.try_recv().unwrap(), TrackingJob::Events { .. }));
        match rx.try_recv().unwrap() {
            TrackingJob::Events { intent, .. } => {
                assert_eq!(intent.events[0].screen_name(), SCREEN_FINANCIAL_INSTITUTIONS);
            }
            other => panic!("unexpected job {other:?}"),
        }
        assert_eq!(
            view.detach().unwrap().calls,
            vec!["valid", "finish:1007", "cancel"]
        );
    }
}
