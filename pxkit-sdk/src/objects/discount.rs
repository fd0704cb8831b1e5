use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A discount campaign applied to the checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub percent_off: Option<Decimal>,
    #[serde(default)]
    pub amount_off: Option<Decimal>,
    pub coupon_amount: Decimal,
    #[serde(default)]
    pub currency_id: Option<String>,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub concept: Option<String>,
}

impl Discount {
    /// Transaction amount once the coupon has been subtracted.
    pub fn amount_with_discount(&self, amount: Decimal) -> Decimal {
        amount - self.coupon_amount
    }
}
