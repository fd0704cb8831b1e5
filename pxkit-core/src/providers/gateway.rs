use kanau::processor::Processor;
use pxkit_sdk::client::GatewayClient;
use pxkit_sdk::objects::{
    ApiException, CheckoutPreference, Discount, Payment, PaymentMethod, PaymentMethodSearch,
};

use super::{
    CreatePayment, GetCodeDiscount, GetDirectDiscount, GetPaymentMethods, GetPreference,
    SearchPaymentMethods,
};

impl Processor<GetPreference> for GatewayClient {
    type Output = CheckoutPreference;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Gateway:GetPreference")]
    async fn process(&self, query: GetPreference) -> Result<CheckoutPreference, ApiException> {
        Ok(self.get_preference(&query.preference_id).await?)
    }
}

impl Processor<SearchPaymentMethods> for GatewayClient {
    type Output = PaymentMethodSearch;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Gateway:SearchPaymentMethods")]
    async fn process(
        &self,
        query: SearchPaymentMethods,
    ) -> Result<PaymentMethodSearch, ApiException> {
        let SearchPaymentMethods {
            amount,
            excluded_payment_types,
            excluded_payment_methods,
            payer,
            site,
        } = query;
        Ok(self
            .search_payment_methods(
                amount,
                &excluded_payment_types,
                &excluded_payment_methods,
                &payer,
                site,
            )
            .await?)
    }
}

impl Processor<GetPaymentMethods> for GatewayClient {
    type Output = Vec<PaymentMethod>;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Gateway:GetPaymentMethods")]
    async fn process(&self, _query: GetPaymentMethods) -> Result<Vec<PaymentMethod>, ApiException> {
        Ok(self.get_payment_methods().await?)
    }
}

impl Processor<GetDirectDiscount> for GatewayClient {
    type Output = Discount;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Gateway:GetDirectDiscount")]
    async fn process(&self, query: GetDirectDiscount) -> Result<Discount, ApiException> {
        Ok(self
            .get_direct_discount(query.amount, &query.payer_email)
            .await?)
    }
}

impl Processor<GetCodeDiscount> for GatewayClient {
    type Output = Discount;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Gateway:GetCodeDiscount")]
    async fn process(&self, query: GetCodeDiscount) -> Result<Discount, ApiException> {
        Ok(self
            .get_code_discount(query.amount, &query.payer_email, &query.coupon_code)
            .await?)
    }
}

impl Processor<CreatePayment> for GatewayClient {
    type Output = Payment;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Gateway:CreatePayment")]
    async fn process(&self, query: CreatePayment) -> Result<Payment, ApiException> {
        Ok(self.create_payment(&query.body).await?)
    }
}
