use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Product identifier; the wire may carry a code string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = ProductId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a product id as a string or number")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<ProductId, E> {
                Ok(ProductId(v.to_string()))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// One configurable option of a product parameter. Options flagged
/// `default` are priced into the base price.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionSpec {
    pub label: String,
    pub price: i64,
    #[serde(default)]
    pub default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub options: HashMap<String, OptionSpec>,
}

/// A menu product as served by the product endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductSpec {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub params: HashMap<String, ParamSpec>,
}

/// Selected options per parameter group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionChoices(BTreeMap<String, BTreeSet<String>>);

impl OptionChoices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, param: &str, option: &str) {
        self.0
            .entry(param.to_string())
            .or_default()
            .insert(option.to_string());
    }

    pub fn deselect(&mut self, param: &str, option: &str) {
        if let Some(options) = self.0.get_mut(param) {
            options.remove(option);
        }
    }

    pub fn is_selected(&self, param: &str, option: &str) -> bool {
        self.0.get(param).is_some_and(|options| options.contains(option))
    }
}

/// Price of one unit with the given choices: base price, plus every selected
/// non-default option, minus every deselected default option.
pub fn unit_price(spec: &ProductSpec, choices: &OptionChoices) -> i64 {
    let mut price = spec.price;
    for (param_id, param) in &spec.params {
        for (option_id, option) in &param.options {
            let chosen = choices.is_selected(param_id, option_id);
            if chosen && !option.default {
                price += option.price;
            } else if !chosen && option.default {
                price -= option.price;
            }
        }
    }
    price
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> ProductSpec {
        serde_json::from_value(serde_json::json!({
            "id": "pizza",
            "name": "Nonna's Pizza",
            "price": 20,
            "params": {
                "sauce": {
                    "label": "Sauce",
                    "type": "radios",
                    "options": {
                        "tomato": { "label": "Tomato", "price": 2, "default": true },
                        "cream": { "label": "Cream", "price": 3 }
                    }
                },
                "toppings": {
                    "label": "Toppings",
                    "type": "checkboxes",
                    "options": {
                        "olives": { "label": "Olives", "price": 2, "default": true },
                        "salami": { "label": "Salami", "price": 3 }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn defaults_selected_cost_the_base_price() {
        let spec = pizza();
        let mut choices = OptionChoices::new();
        choices.select("sauce", "tomato");
        choices.select("toppings", "olives");
        assert_eq!(unit_price(&spec, &choices), 20);
    }

    #[test]
    fn non_default_option_adds_its_price() {
        let spec = pizza();
        let mut choices = OptionChoices::new();
        choices.select("sauce", "tomato");
        choices.select("toppings", "olives");
        choices.select("toppings", "salami");
        assert_eq!(unit_price(&spec, &choices), 23);
    }

    #[test]
    fn deselected_default_subtracts_its_price() {
        let spec = pizza();
        let mut choices = OptionChoices::new();
        choices.select("sauce", "cream");
        choices.select("toppings", "olives");
        // tomato (default, 2) dropped, cream (3) added
        assert_eq!(unit_price(&spec, &choices), 21);
    }

    #[test]
    fn no_choices_strips_all_defaults() {
        let spec = pizza();
        assert_eq!(unit_price(&spec, &OptionChoices::new()), 16);
    }

    #[test]
    fn deselect_reverts_a_choice() {
        let spec = pizza();
        let mut choices = OptionChoices::new();
        choices.select("toppings", "salami");
        choices.deselect("toppings", "salami");
        assert!(!choices.is_selected("toppings", "salami"));
        assert_eq!(unit_price(&spec, &choices), 16);
    }

    #[test]
    fn product_id_from_string_or_number() {
        let from_code: ProductId = serde_json::from_value(serde_json::json!("cake")).unwrap();
        let from_number: ProductId = serde_json::from_value(serde_json::json!(4)).unwrap();
        assert_eq!(from_code, ProductId("cake".into()));
        assert_eq!(from_number, ProductId("4".into()));
    }
}
