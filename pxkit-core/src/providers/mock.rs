//! In-memory collaborators shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use kanau::processor::Processor;
use pxkit_sdk::config::{MerchantEndpoint, ServicePreference};
use pxkit_sdk::objects::{
    ApiException, Card, CheckoutPreference, Customer, Discount, FinancialInstitution, Payer,
    Payment, PaymentBody, PaymentMethod, PaymentMethodSearch, PaymentPreference, PaymentStatus,
    Site,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio::sync::Notify;
use url::Url;

use super::{
    CheckoutProvider, CreateMerchantPayment, CreatePayment, GetCodeDiscount, GetCustomer,
    GetDirectDiscount, GetMerchantDiscount, GetPaymentMethods, GetPreference,
    SearchPaymentMethods,
};

#[derive(Default)]
pub struct Calls {
    pub preference: AtomicUsize,
    pub search: AtomicUsize,
    pub payment_methods: AtomicUsize,
    pub direct_discount: AtomicUsize,
    pub code_discount: AtomicUsize,
    pub payment: AtomicUsize,
    pub customer: AtomicUsize,
    pub merchant_discount: AtomicUsize,
    pub merchant_payment: AtomicUsize,
}

pub fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

fn hit(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[derive(Default)]
pub struct MockGateway {
    pub calls: Arc<Calls>,
    pub search_query: Arc<Mutex<Option<SearchPaymentMethods>>>,
    pub payment_body: Arc<Mutex<Option<PaymentBody>>>,
    pub methods: Vec<PaymentMethod>,
    pub methods_error: Option<ApiException>,
    pub discount_error: Option<ApiException>,
    pub code_error: Option<ApiException>,
    /// When set, slow calls wait for a notification before answering.
    pub gate: Option<Arc<Notify>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            methods: vec![method("visa", "credit_card"), method("pse", "bank_transfer")],
            ..Default::default()
        }
    }

    async fn wait_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[derive(Default)]
pub struct MockMerchant {
    pub calls: Arc<Calls>,
    pub customer: Option<Customer>,
    pub payment_body: Arc<Mutex<Option<Map<String, Value>>>>,
}

pub fn method(id: &str, payment_type_id: &str) -> PaymentMethod {
    PaymentMethod {
        id: id.to_string(),
        name: id.to_uppercase(),
        payment_type_id: payment_type_id.to_string(),
        status: None,
        secure_thumbnail: None,
        additional_info_needed: vec![],
        financial_institutions: if id == "pse" {
            vec![institution("1007", "Bancolombia")]
        } else {
            vec![]
        },
        min_allowed_amount: None,
        max_allowed_amount: None,
    }
}

pub fn institution(id: &str, description: &str) -> FinancialInstitution {
    FinancialInstitution {
        id: id.to_string(),
        description: description.to_string(),
    }
}

pub fn discount(id: i64) -> Discount {
    Discount {
        id,
        name: None,
        percent_off: None,
        amount_off: None,
        coupon_amount: Decimal::new(500, 2),
        currency_id: None,
        coupon_code: None,
        concept: None,
    }
}

pub fn payment(id: i64) -> Payment {
    Payment {
        id,
        status: PaymentStatus::Approved,
        status_detail: None,
        payment_method_id: None,
        payment_type_id: None,
        transaction_amount: None,
    }
}

pub fn preference(site: Option<Site>) -> CheckoutPreference {
    CheckoutPreference {
        id: "pref-1".to_string(),
        site_id: site,
        payer: Payer {
            id: None,
            email: Some("payer@example.com".to_string()),
            identification: None,
            entity_type: None,
        },
        items: vec![],
        payment_methods: PaymentPreference::default(),
    }
}

pub fn endpoint(uri: &str) -> MerchantEndpoint {
    MerchantEndpoint::new(Url::parse("https://merchant.example.com").unwrap(), uri)
}

pub fn saved_card(id: &str, method_id: &str, payment_type_id: &str) -> Card {
    Card {
        id: id.to_string(),
        last_four_digits: Some("4242".to_string()),
        payment_method: Some(method(method_id, payment_type_id)),
        issuer: None,
    }
}

pub fn provider(
    gateway: MockGateway,
    merchant: MockMerchant,
    service_preference: ServicePreference,
) -> CheckoutProvider<MockGateway, MockMerchant> {
    CheckoutProvider::new(gateway, merchant, service_preference, "APP_USR-public")
}

impl Processor<GetPreference> for MockGateway {
    type Output = CheckoutPreference;
    type Error = ApiException;
    async fn process(&self, query: GetPreference) -> Result<CheckoutPreference, ApiException> {
        hit(&self.calls.preference);
        let mut preference = preference(Some(Site::Colombia));
        preference.id = query.preference_id;
        Ok(preference)
    }
}

impl Processor<SearchPaymentMethods> for MockGateway {
    type Output = PaymentMethodSearch;
    type Error = ApiException;
    async fn process(
        &self,
        query: SearchPaymentMethods,
    ) -> Result<PaymentMethodSearch, ApiException> {
        hit(&self.calls.search);
        *self.search_query.lock().unwrap() = Some(query);
        Ok(PaymentMethodSearch {
            payment_methods: self.methods.clone(),
            ..Default::default()
        })
    }
}

impl Processor<GetPaymentMethods> for MockGateway {
    type Output = Vec<PaymentMethod>;
    type Error = ApiException;
    async fn process(&self, _: GetPaymentMethods) -> Result<Vec<PaymentMethod>, ApiException> {
        hit(&self.calls.payment_methods);
        self.wait_gate().await;
        match &self.methods_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.methods.clone()),
        }
    }
}

impl Processor<GetDirectDiscount> for MockGateway {
    type Output = Discount;
    type Error = ApiException;
    async fn process(&self, _: GetDirectDiscount) -> Result<Discount, ApiException> {
        hit(&self.calls.direct_discount);
        self.wait_gate().await;
        match &self.discount_error {
            Some(e) => Err(e.clone()),
            None => Ok(discount(1)),
        }
    }
}

impl Processor<GetCodeDiscount> for MockGateway {
    type Output = Discount;
    type Error = ApiException;
    async fn process(&self, query: GetCodeDiscount) -> Result<Discount, ApiException> {
        hit(&self.calls.code_discount);
        if let Some(e) = &self.code_error {
            return Err(e.clone());
        }
        let mut discount = discount(2);
        discount.coupon_code = Some(query.coupon_code);
        Ok(discount)
    }
}

impl Processor<CreatePayment> for MockGateway {
    type Output = Payment;
    type Error = ApiException;
    async fn process(&self, query: CreatePayment) -> Result<Payment, ApiException> {
        hit(&self.calls.payment);
        *self.payment_body.lock().unwrap() = Some(query.body);
        Ok(payment(100))
    }
}

impl Processor<GetCustomer> for MockMerchant {
    type Output = Customer;
    type Error = ApiException;
    async fn process(&self, _: GetCustomer) -> Result<Customer, ApiException> {
        hit(&self.calls.customer);
        self.customer
            .clone()
            .ok_or_else(|| ApiException::new("customer not found", Some(404)))
    }
}

impl Processor<GetMerchantDiscount> for MockMerchant {
    type Output = Discount;
    type Error = ApiException;
    async fn process(&self, _: GetMerchantDiscount) -> Result<Discount, ApiException> {
        hit(&self.calls.merchant_discount);
        Ok(discount(3))
    }
}

impl Processor<CreateMerchantPayment> for MockMerchant {
    type Output = Payment;
    type Error = ApiException;
    async fn process(&self, query: CreateMerchantPayment) -> Result<Payment, ApiException> {
        hit(&self.calls.merchant_payment);
        *self.payment_body.lock().unwrap() = Some(query.body);
        Ok(payment(200))
    }
}
