//! Checkout orchestration over the gateway and merchant server.

use itertools::Itertools;
use pxkit_sdk::config::ServicePreference;
use pxkit_sdk::objects::{
    CheckoutPreference, Customer, Discount, FinancialInstitution, Payer, Payment,
    PaymentMethodSearch, PaymentPreference, Site, payment_types,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{
    CreateMerchantPayment, CreatePayment, Gateway, GetCodeDiscount, GetCustomer,
    GetDirectDiscount, GetMerchantDiscount, GetPaymentMethods, GetPreference, MerchantServer,
    SearchPaymentMethods,
};
use crate::error::{CheckoutError, LocalInputError};
use crate::flow::{CheckoutAccumulator, SITE_NOT_SET, assemble, merchant_payment};

/// Label placed before the last four digits of a saved card.
pub const DEFAULT_LAST_DIGITS_LABEL: &str = "Ending in";

pub const TOTAL_AMOUNT_OVERFLOW: &str = "preference total amount overflows";

const OFFLINE_PAYMENT_TYPES: [&str; 3] = [
    payment_types::TICKET,
    payment_types::ATM,
    payment_types::BANK_TRANSFER,
];

/// Payment types the checkout cannot process on a site.
pub fn unsupported_payment_types(site: Site) -> &'static [&'static str] {
    match site {
        Site::Chile | Site::Venezuela | Site::Colombia => &OFFLINE_PAYMENT_TYPES,
        _ => &[],
    }
}

/// Caller exclusions plus whatever the site cannot process, without duplicates.
pub fn excluded_payment_types_for_site(site: Site, excluded: &[String]) -> Vec<String> {
    excluded
        .iter()
        .cloned()
        .chain(
            unsupported_payment_types(site)
                .iter()
                .map(|t| t.to_string()),
        )
        .unique()
        .collect()
}

/// Payment method search with the customer lookup that came with it.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub search: PaymentMethodSearch,
    /// `None` when no customer endpoint is configured.
    pub customer: Option<Result<Customer, CheckoutError>>,
}

/// Outcome of attaching saved cards to a search.
///
/// A failed customer fetch never fails the search: `search` is then the
/// input unchanged and the error is kept in `customer`.
#[derive(Debug, Clone)]
pub struct CardAttachment {
    pub search: PaymentMethodSearch,
    pub customer: Result<Customer, CheckoutError>,
}

/// Results of the concurrent work done before the payer picks a method.
#[derive(Debug, Clone)]
pub struct Prefetch {
    /// `None` when the direct discount was not requested.
    pub discount: Option<Result<Discount, CheckoutError>>,
    pub search: Result<SearchResult, CheckoutError>,
}

pub struct CheckoutProvider<G, M> {
    gateway: G,
    merchant: M,
    service_preference: ServicePreference,
    public_key: String,
    last_digits_label: String,
}

impl<G, M> CheckoutProvider<G, M>
where
    G: Gateway,
    M: MerchantServer,
{
    pub fn new(
        gateway: G,
        merchant: M,
        service_preference: ServicePreference,
        public_key: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            merchant,
            service_preference,
            public_key: public_key.into(),
            last_digits_label: DEFAULT_LAST_DIGITS_LABEL.to_string(),
        }
    }

    pub fn with_last_digits_label(mut self, label: impl Into<String>) -> Self {
        self.last_digits_label = label.into();
        self
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn service_preference(&self) -> &ServicePreference {
        &self.service_preference
    }

    pub async fn get_checkout_preference(
        &self,
        preference_id: &str,
    ) -> Result<CheckoutPreference, CheckoutError> {
        let preference = self
            .gateway
            .process(GetPreference {
                preference_id: preference_id.to_string(),
            })
            .await?;
        debug!(preference_id, items = preference.items.len(), "Loaded preference");
        Ok(preference)
    }

    /// Search payment methods and, when a customer endpoint is configured,
    /// attach the customer's saved cards.
    pub async fn get_payment_method_search(
        &self,
        amount: Decimal,
        payment_preference: &PaymentPreference,
        payer: &Payer,
        site: Site,
    ) -> Result<SearchResult, CheckoutError> {
        let excluded_payment_types =
            excluded_payment_types_for_site(site, &payment_preference.excluded_payment_types);
        let search = self
            .gateway
            .process(SearchPaymentMethods {
                amount,
                excluded_payment_types,
                excluded_payment_methods: payment_preference.excluded_payment_methods.clone(),
                payer: payer.clone(),
                site,
            })
            .await?;

        if !self.service_preference.has_get_customer_url() {
            return Ok(SearchResult {
                search,
                customer: None,
            });
        }

        let CardAttachment { search, customer } =
            self.attach_customer_cards(search, payment_preference).await;
        Ok(SearchResult {
            search,
            customer: Some(customer),
        })
    }

    /// Fetch the merchant's customer and attach the saved cards that pass the
    /// payment preference exclusions.
    pub async fn attach_customer_cards(
        &self,
        mut search: PaymentMethodSearch,
        payment_preference: &PaymentPreference,
    ) -> CardAttachment {
        let Some(endpoint) = self.service_preference.get_customer.clone() else {
            return CardAttachment {
                search,
                customer: Err(CheckoutError::validation("customer endpoint not set")),
            };
        };

        match self.merchant.process(GetCustomer { endpoint }).await {
            Ok(customer) => {
                let cards = payment_preference.valid_cards(customer.cards.clone());
                debug!(
                    customer_id = %customer.id,
                    cards = cards.len(),
                    "Attaching saved cards"
                );
                search.set_cards(cards, &self.last_digits_label);
                CardAttachment {
                    search,
                    customer: Ok(customer),
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch customer, continuing without saved cards");
                CardAttachment {
                    search,
                    customer: Err(e.into()),
                }
            }
        }
    }

    /// Direct discount for the payer. Exactly one source is asked: the
    /// merchant server when it has a discount endpoint, the gateway otherwise.
    pub async fn resolve_discount(
        &self,
        amount: Decimal,
        payer_email: &str,
    ) -> Result<Discount, CheckoutError> {
        let discount = match self.service_preference.get_discount.clone() {
            Some(endpoint) => {
                self.merchant
                    .process(GetMerchantDiscount {
                        endpoint,
                        amount,
                        payer_email: payer_email.to_string(),
                    })
                    .await?
            }
            None => {
                self.gateway
                    .process(GetDirectDiscount {
                        amount,
                        payer_email: payer_email.to_string(),
                    })
                    .await?
            }
        };
        info!(discount_id = discount.id, "Resolved direct discount");
        Ok(discount)
    }

    pub async fn resolve_discount_by_code(
        &self,
        amount: Decimal,
        payer_email: &str,
        code: &str,
    ) -> Result<Discount, CheckoutError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(LocalInputError::EmptyCode.into());
        }
        let discount = self
            .gateway
            .process(GetCodeDiscount {
                amount,
                payer_email: payer_email.to_string(),
                coupon_code: code.to_string(),
            })
            .await?;
        info!(discount_id = discount.id, "Resolved code discount");
        Ok(discount)
    }

    /// Financial institutions offered for a payment method.
    pub async fn fetch_financial_institutions(
        &self,
        payment_method_id: &str,
    ) -> Result<Vec<FinancialInstitution>, CheckoutError> {
        let methods = self.gateway.process(GetPaymentMethods).await?;
        methods
            .into_iter()
            .find(|pm| pm.id == payment_method_id)
            .map(|pm| pm.financial_institutions)
            .ok_or_else(|| {
                CheckoutError::Validation(format!("payment method {payment_method_id} not found"))
            })
    }

    /// Create the payment through the merchant server when it has a payment
    /// endpoint, through the gateway otherwise.
    pub async fn create_payment(
        &self,
        preference: &CheckoutPreference,
        accumulator: &CheckoutAccumulator,
    ) -> Result<Payment, CheckoutError> {
        let payment = match self.service_preference.create_payment.clone() {
            Some(endpoint) => {
                let body = match serde_json::to_value(merchant_payment(accumulator)?) {
                    Ok(Value::Object(body)) => body,
                    Ok(_) => return Err(CheckoutError::validation("payment is not an object")),
                    Err(e) => return Err(CheckoutError::Validation(e.to_string())),
                };
                self.merchant
                    .process(CreateMerchantPayment {
                        endpoint,
                        transaction_id: accumulator.transaction_id.clone(),
                        body,
                    })
                    .await?
            }
            None => {
                let body = assemble(preference, &self.public_key, accumulator)?;
                self.gateway.process(CreatePayment { body }).await?
            }
        };
        info!(
            payment_id = payment.id,
            status = %payment.status,
            transaction_id = %accumulator.transaction_id,
            "Payment created"
        );
        Ok(payment)
    }

    /// Search payment methods and, when `with_discount` is set, resolve the
    /// direct discount concurrently.
    pub async fn prefetch(&self, preference: &CheckoutPreference, with_discount: bool) -> Prefetch {
        let Some(amount) = preference.total_amount() else {
            warn!(preference_id = %preference.id, "Preference total overflows");
            let error = CheckoutError::validation(TOTAL_AMOUNT_OVERFLOW);
            return Prefetch {
                discount: with_discount.then(|| Err(error.clone())),
                search: Err(error),
            };
        };
        let payer_email = preference.payer.email.clone().unwrap_or_default();

        let discount = async {
            if with_discount {
                Some(self.resolve_discount(amount, &payer_email).await)
            } else {
                None
            }
        };
        let search = async {
            let site = preference
                .site_id
                .ok_or_else(|| CheckoutError::validation(SITE_NOT_SET))?;
            self.get_payment_method_search(
                amount,
                &preference.payment_methods,
                &preference.payer,
                site,
            )
            .await
        };
        let (discount, search) = tokio::join!(discount, search);
        Prefetch { discount, search }
    }
}
