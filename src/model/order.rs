use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Taco;
use crate::validation::{is_credit_card_number, is_cvv, is_expiration, ValidationErrors};

/// A customer order: delivery and payment details plus the tacos collected
/// during the design flow.
///
/// The order lives in the customer's session while tacos are added. `id` and
/// `placed_at` stay `None` until
/// [`OrderRepository::save`](crate::data::OrderRepository::save) succeeds;
/// after that the order is not modified again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TacoOrder {
    pub id: Option<i64>,
    pub placed_at: Option<DateTime<Utc>>,
    pub delivery_name: String,
    pub delivery_street: String,
    pub delivery_city: String,
    pub delivery_state: String,
    pub delivery_zip: String,
    pub cc_number: String,
    pub cc_expiration: String,
    pub cc_cvv: String,
    pub tacos: Vec<Taco>,
}

impl TacoOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a taco. Orders may grow at any point before they are placed.
    pub fn add_taco(&mut self, taco: Taco) {
        self.tacos.push(taco);
    }

    /// Copies the submitted delivery/payment fields onto this order.
    pub fn bind(&mut self, form: OrderForm) {
        self.delivery_name = form.delivery_name;
        self.delivery_street = form.delivery_street;
        self.delivery_city = form.delivery_city;
        self.delivery_state = form.delivery_state;
        self.delivery_zip = form.delivery_zip;
        self.cc_number = form.cc_number;
        self.cc_expiration = form.cc_expiration;
        self.cc_cvv = form.cc_cvv;
    }

    pub fn is_placed(&self) -> bool {
        self.id.is_some()
    }

    /// Checks the delivery and payment fields and that the order has tacos.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(!blank(&self.delivery_name), "delivery_name", "Delivery name is required");
        errors.check(!blank(&self.delivery_street), "delivery_street", "Street is required");
        errors.check(!blank(&self.delivery_city), "delivery_city", "City is required");
        errors.check(!blank(&self.delivery_state), "delivery_state", "State is required");
        errors.check(!blank(&self.delivery_zip), "delivery_zip", "Zip code is required");
        errors.check(
            is_credit_card_number(&self.cc_number),
            "cc_number",
            "Not a valid credit card number",
        );
        errors.check(
            is_expiration(&self.cc_expiration),
            "cc_expiration",
            "Must be formatted MM/YY",
        );
        errors.check(is_cvv(&self.cc_cvv), "cc_cvv", "Invalid CVV");
        errors.check(!self.tacos.is_empty(), "tacos", "Design at least one taco first");
        errors.into_result()
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Delivery and payment fields as submitted from the order form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub delivery_name: String,
    pub delivery_street: String,
    pub delivery_city: String,
    pub delivery_state: String,
    pub delivery_zip: String,
    pub cc_number: String,
    pub cc_expiration: String,
    pub cc_cvv: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IngredientRef;

    fn form() -> OrderForm {
        OrderForm {
            delivery_name: "Craig Walls".into(),
            delivery_street: "1234 Culinary Blvd.".into(),
            delivery_city: "Plano".into(),
            delivery_state: "TX".into(),
            delivery_zip: "75093".into(),
            cc_number: "4111111111111111".into(),
            cc_expiration: "10/29".into(),
            cc_cvv: "123".into(),
        }
    }

    fn order_with_taco() -> TacoOrder {
        let mut taco = Taco::new("Veggie Taco");
        taco.ingredients.push(IngredientRef::new("FLTO"));
        let mut order = TacoOrder::new();
        order.add_taco(taco);
        order
    }

    #[test]
    fn test_complete_order_passes() {
        let mut order = order_with_taco();
        order.bind(form());
        assert!(order.validate().is_ok());
        assert!(!order.is_placed());
    }

    #[test]
    fn test_blank_delivery_name_is_rejected() {
        let mut order = order_with_taco();
        order.bind(OrderForm {
            delivery_name: "   ".into(),
            ..form()
        });

        let errors = order.validate().unwrap_err();
        assert!(errors.has_field("delivery_name"));
        assert_eq!(errors.iter().count(), 1);
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = order_with_taco().validate().unwrap_err();
        for field in [
            "delivery_name",
            "delivery_street",
            "delivery_city",
            "delivery_state",
            "delivery_zip",
            "cc_number",
            "cc_expiration",
            "cc_cvv",
        ] {
            assert!(errors.has_field(field), "missing error for {field}");
        }
        assert!(!errors.has_field("tacos"));
    }

    #[test]
    fn test_order_without_tacos_is_rejected() {
        let mut order = TacoOrder::new();
        order.bind(form());
        assert!(order.validate().unwrap_err().has_field("tacos"));
    }

    #[test]
    fn test_bind_keeps_tacos() {
        let mut order = order_with_taco();
        order.bind(form());
        assert_eq!(order.tacos.len(), 1);
        assert_eq!(order.delivery_city, "Plano");
    }
}
