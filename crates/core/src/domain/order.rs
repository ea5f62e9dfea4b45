use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for OrderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Processing,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single order as the support desk sees it.
///
/// `eta` is an opaque date string and is never parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub status: OrderStatus,
    pub eta: String,
    pub items: Vec<String>,
    pub customer_id: String,
}

impl OrderRecord {
    pub fn new(
        status: OrderStatus,
        eta: impl Into<String>,
        items: impl IntoIterator<Item = impl Into<String>>,
        customer_id: impl Into<String>,
    ) -> Self {
        Self {
            status,
            eta: eta.into(),
            items: items.into_iter().map(Into::into).collect(),
            customer_id: customer_id.into(),
        }
    }
}

/// Read-only order table keyed by exact, case-sensitive order id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderBook {
    orders: BTreeMap<OrderId, OrderRecord>,
}

impl OrderBook {
    pub fn new(orders: impl IntoIterator<Item = (OrderId, OrderRecord)>) -> Self {
        Self { orders: orders.into_iter().collect() }
    }

    /// The demo store shipped with the bot.
    pub fn seeded() -> Self {
        Self::new([
            (
                OrderId::new("A100"),
                OrderRecord::new(
                    OrderStatus::Shipped,
                    "2025-09-04",
                    ["Blue T-shirt", "Cap"],
                    "12345",
                ),
            ),
            (
                OrderId::new("B201"),
                OrderRecord::new(OrderStatus::Processing, "2025-09-10", ["Coffee Mug"], "67890"),
            ),
            (
                OrderId::new("C303"),
                OrderRecord::new(OrderStatus::Delivered, "2025-08-20", ["Notebook"], "12345"),
            ),
        ])
    }

    pub fn get(&self, order_id: &str) -> Option<&OrderRecord> {
        self.orders.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
