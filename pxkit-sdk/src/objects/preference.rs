//! Checkout preference and payer types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::customer::Card;
use super::site::Site;

/// A checkout preference created by the merchant backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutPreference {
    pub id: String,
    #[serde(default)]
    pub site_id: Option<Site>,
    #[serde(default)]
    pub payer: Payer,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub payment_methods: PaymentPreference,
}

impl CheckoutPreference {
    /// Sum of `unit_price * quantity` across all items, or `None` when it
    /// does not fit in a `Decimal`.
    pub fn total_amount(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| {
            item.unit_price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| total.checked_add(line))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub currency_id: Option<String>,
}

/// The paying user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    #[serde(rename = "type")]
    pub kind: String,
    pub number: String,
}

/// Merchant-side restrictions on how the preference may be paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPreference {
    #[serde(default)]
    pub excluded_payment_types: Vec<String>,
    #[serde(default)]
    pub excluded_payment_methods: Vec<String>,
    #[serde(default)]
    pub installments: Option<u32>,
    #[serde(default)]
    pub default_installments: Option<u32>,
}

impl PaymentPreference {
    pub fn new(excluded_payment_types: Vec<String>, excluded_payment_methods: Vec<String>) -> Self {
        Self {
            excluded_payment_types,
            excluded_payment_methods,
            ..Default::default()
        }
    }

    /// Saved cards whose payment method and payment type are not excluded.
    pub fn valid_cards(&self, cards: Vec<Card>) -> Vec<Card> {
        cards
            .into_iter()
            .filter(|card| {
                let Some(pm) = card.payment_method.as_ref() else {
                    return false;
                };
                !self.excluded_payment_methods.contains(&pm.id)
                    && !self.excluded_payment_types.contains(&pm.payment_type_id)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::payment_method::PaymentMethod;

    fn card(id: &str, method_id: &str, payment_type_id: &str) -> Card {
        Card {
            id: id.to_string(),
            last_four_digits: Some("4242".to_string()),
            payment_method: Some(PaymentMethod {
                id: method_id.to_string(),
                name: method_id.to_string(),
                payment_type_id: payment_type_id.to_string(),
                status: None,
                secure_thumbnail: None,
                additional_info_needed: vec![],
                financial_institutions: vec![],
                min_allowed_amount: None,
                max_allowed_amount: None,
            }),
            issuer: None,
        }
    }

    #[test]
    fn test_valid_cards_filters_exclusions() {
        let preference = PaymentPreference::new(
            vec!["debit_card".to_string()],
            vec!["amex".to_string()],
        );
        let cards = vec![
            card("1", "visa", "credit_card"),
            card("2", "amex", "credit_card"),
            card("3", "maestro", "debit_card"),
        ];
        let valid = preference.valid_cards(cards);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id, "1");
    }

    #[test]
    fn test_total_amount() {
        let preference: CheckoutPreference = serde_json::from_str(
            r#"{
                "id": "pref-1",
                "site_id": "MCO",
                "items": [
                    {"id": "a", "quantity": 2, "unit_price": 10.5},
                    {"id": "b", "quantity": 1, "unit_price": 4}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(preference.site_id, Some(Site::Colombia));
        assert_eq!(preference.total_amount(), Some(Decimal::new(25, 0)));
    }

    #[test]
    fn test_total_amount_overflow() {
        let preference: CheckoutPreference = serde_json::from_str(
            r#"{
                "id": "pref-2",
                "items": [
                    {"id": "bulk", "quantity": 4000000000, "unit_price": 79228162514264337593543950}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(preference.total_amount(), None);

        let item = |id: &str| Item {
            id: id.to_string(),
            title: None,
            quantity: 1,
            unit_price: Decimal::MAX,
            currency_id: None,
        };
        let mut preference = preference;
        preference.items = vec![item("a"), item("b")];
        assert_eq!(preference.total_amount(), None);
    }
}
