//! Payment method search results.

use serde::{Deserialize, Serialize};

use super::customer::Card;
use super::payment_method::PaymentMethod;

/// Result of the payment-method search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodSearch {
    #[serde(default)]
    pub groups: Vec<PaymentMethodSearchItem>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub custom_options: Vec<CustomSearchItem>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// A node of the payment method selection tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodSearchItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<PaymentMethodSearchItem>,
}

/// A selectable shortcut shown above the groups, e.g. a saved card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSearchItem {
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub payment_method_id: String,
}

impl PaymentMethodSearch {
    pub fn payment_method_by_id(&self, id: &str) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|pm| pm.id == id)
    }

    /// Replace the saved cards and rebuild their custom options.
    ///
    /// Cards whose payment method is not part of this search are dropped.
    pub fn set_cards(&mut self, cards: Vec<Card>, last_digits_label: &str) {
        let cards: Vec<Card> = cards
            .into_iter()
            .filter(|card| {
                card.payment_method
                    .as_ref()
                    .is_some_and(|pm| self.payment_method_by_id(&pm.id).is_some())
            })
            .collect();

        let card_ids: Vec<&str> = self.cards.iter().map(|c| c.id.as_str()).collect();
        self.custom_options
            .retain(|option| !card_ids.contains(&option.id.as_str()));

        for card in &cards {
            let Some(pm) = card.payment_method.as_ref() else {
                continue;
            };
            let digits = card.last_four_digits.as_deref().unwrap_or_default();
            self.custom_options.push(CustomSearchItem {
                id: card.id.clone(),
                description: format!("{last_digits_label} {digits}"),
                kind: pm.payment_type_id.clone(),
                payment_method_id: pm.id.clone(),
            });
        }
        self.cards = cards;
    }
}
