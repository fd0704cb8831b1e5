use kanau::processor::Processor;
use pxkit_sdk::client::MerchantClient;
use pxkit_sdk::objects::{ApiException, Customer, Discount, Payment};

use super::{CreateMerchantPayment, GetCustomer, GetMerchantDiscount};

impl Processor<GetCustomer> for MerchantClient {
    type Output = Customer;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Merchant:GetCustomer")]
    async fn process(&self, query: GetCustomer) -> Result<Customer, ApiException> {
        Ok(self.get_customer(&query.endpoint).await?)
    }
}

impl Processor<GetMerchantDiscount> for MerchantClient {
    type Output = Discount;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Merchant:GetDirectDiscount")]
    async fn process(&self, query: GetMerchantDiscount) -> Result<Discount, ApiException> {
        Ok(self
            .get_direct_discount(&query.endpoint, query.amount, &query.payer_email)
            .await?)
    }
}

impl Processor<CreateMerchantPayment> for MerchantClient {
    type Output = Payment;
    type Error = ApiException;
    #[tracing::instrument(skip_all, err, name = "Merchant:CreatePayment")]
    async fn process(&self, query: CreateMerchantPayment) -> Result<Payment, ApiException> {
        Ok(self
            .create_payment(&query.endpoint, &query.transaction_id, query.body)
            .await?)
    }
}
