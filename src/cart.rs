use serde::Serialize;
use ulid::Ulid;

use crate::config::CartConfig;
use crate::menu::{unit_price, OptionChoices, ProductId, ProductSpec};

/// One configured product line in the cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub amount: u32,
    #[serde(rename = "priceSingle")]
    pub price_single: i64,
    pub price: i64,
    pub params: OptionChoices,
}

impl CartItem {
    pub fn of(spec: &ProductSpec, choices: &OptionChoices, amount: u32) -> Self {
        let price_single = unit_price(spec, choices);
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            amount,
            price_single,
            price: price_single * amount as i64,
            params: choices.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartTotals {
    pub total_number: u32,
    pub subtotal: i64,
    pub delivery_fee: i64,
    pub total: i64,
}

/// The shopping cart: items plus derived totals, recomputed on every
/// mutation. The delivery fee is waived while the cart is empty.
#[derive(Debug)]
pub struct Cart {
    items: Vec<CartItem>,
    cfg: CartConfig,
    totals: CartTotals,
}

impl Cart {
    pub fn new(cfg: CartConfig) -> Self {
        let mut cart = Self {
            items: Vec::new(),
            cfg,
            totals: CartTotals::default(),
        };
        cart.update();
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn totals(&self) -> CartTotals {
        self.totals
    }

    pub fn add(&mut self, item: CartItem) {
        self.items.push(item);
        self.update();
    }

    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        self.update();
        Some(removed)
    }

    fn update(&mut self) {
        let mut delivery_fee = self.cfg.default_delivery_fee;
        let total_number: u32 = self.items.iter().map(|item| item.amount).sum();
        let subtotal: i64 = self.items.iter().map(|item| item.price).sum();

        let mut total = 0;
        if total_number != 0 {
            total = subtotal + delivery_fee;
        } else {
            delivery_fee = 0;
        }

        self.totals = CartTotals {
            total_number,
            subtotal,
            delivery_fee,
            total,
        };
    }

    pub fn order_payload(&self, phone: &str, address: &str) -> OrderPayload {
        OrderPayload {
            id: Ulid::new(),
            address: address.to_string(),
            phone: phone.to_string(),
            total_price: self.totals.total,
            subtotal_price: self.totals.subtotal,
            total_number: self.totals.total_number,
            delivery_fee: self.totals.delivery_fee,
            products: self.items.clone(),
        }
    }
}

/// Order payload in the backend's JSON shape.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPayload {
    pub id: Ulid,
    pub address: String,
    pub phone: String,
    #[serde(rename = "totalPrice")]
    pub total_price: i64,
    #[serde(rename = "subtotalPrice")]
    pub subtotal_price: i64,
    #[serde(rename = "totalNumber")]
    pub total_number: u32,
    #[serde(rename = "deliveryFee")]
    pub delivery_fee: i64,
    pub products: Vec<CartItem>,
}
