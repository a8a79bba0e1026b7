//! Inventory backend client and its wire types.

mod api;
mod models;

pub use api::InventoryApi;
pub use models::{
    DateRangeSummary, DeleteResponse, Product, ProductResponse, StockMovement, Summary, Transaction, TransactionKind,
};
