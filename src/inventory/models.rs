//! Wire types of the inventory API.
//!
//! Money columns are fixed-point decimals server side and arrive either as
//! JSON numbers or as decimal strings depending on the serializer; both are
//! read into `f64`, which is all the dashboard needs for display and charts.

use serde::{Deserialize, Deserializer, Serialize};

fn money<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
    Ok(opt_money(de)?.unwrap_or(0.0))
}

fn opt_money<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
    }
    match Option::<Raw>::deserialize(de)? {
        None => Ok(None),
        Some(Raw::Num(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s.trim().parse::<f64>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// A product row with its running totals. The analytics fields are only
/// filled by the enhanced summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub total_added_qty: i64,
    #[serde(default, deserialize_with = "money")]
    pub total_added_amount: f64,
    #[serde(default)]
    pub total_sold_qty: i64,
    #[serde(default, deserialize_with = "money")]
    pub total_sold_amount: f64,
    #[serde(default)]
    pub available_stock: i64,
    #[serde(default, deserialize_with = "opt_money", skip_serializing_if = "Option::is_none")]
    pub avg_purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_money", skip_serializing_if = "Option::is_none")]
    pub avg_selling_price: Option<f64>,
    #[serde(default, deserialize_with = "opt_money", skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<f64>,
}

/// Body of `POST /add` and `POST /sell`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// `YYYY-MM-DD`
    pub date: String,
}

impl StockMovement {
    pub fn total(&self) -> f64 { self.quantity as f64 * self.unit_price }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DateRangeSummary {
    pub products: Vec<Product>,
    #[serde(default)]
    pub total_added_qty_in_range: i64,
    #[serde(default, deserialize_with = "money")]
    pub total_added_amount_in_range: f64,
    #[serde(default)]
    pub total_sold_qty_in_range: i64,
    #[serde(default, deserialize_with = "money")]
    pub total_sold_amount_in_range: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Overall(Vec<Product>),
    Range(DateRangeSummary),
}

impl Summary {
    pub fn products(&self) -> &[Product] {
        match self {
            Summary::Overall(p) => p,
            Summary::Range(r) => &r.products,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Add,
    Sell,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Add => "add",
            TransactionKind::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Some(TransactionKind::Add),
            "sell" => Some(TransactionKind::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: String,
    pub product_name: String,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub quantity: i64,
    #[serde(deserialize_with = "money")]
    pub unit_price: f64,
    #[serde(deserialize_with = "money")]
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    #[serde(default)]
    pub updated_product: Option<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductsEnvelope<T> {
    pub products: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransactionsEnvelope {
    pub transactions: Vec<Transaction>,
}
