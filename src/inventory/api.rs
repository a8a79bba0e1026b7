//! Typed calls to the inventory backend, all routed through the session
//! authority so that a rejected session is handled in one place.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::identity::{RequestOptions, SessionAuthority};

use super::models::{
    DateRangeSummary, DeleteResponse, Product, ProductResponse, ProductsEnvelope, StockMovement, Summary,
    Transaction, TransactionKind, TransactionsEnvelope,
};

pub struct InventoryApi {
    authority: Arc<SessionAuthority>,
    base: Url,
}

impl InventoryApi {
    pub fn new(authority: Arc<SessionAuthority>, base_url: &str) -> AppResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| AppError::user("invalid_url".to_string(), format!("{}: {}", base_url, e)))?;
        // keep a trailing slash so relative joins stay under any path prefix
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        Ok(Self { authority, base })
    }

    pub fn authority(&self) -> &SessionAuthority { &self.authority }

    pub fn base_url(&self) -> &Url { &self.base }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Url> {
        let mut url = self.base.join(path.trim_start_matches('/'))
            .map_err(|e| AppError::internal("invalid_url".to_string(), format!("{}: {}", path, e)))?;
        if !query.is_empty() {
            let q = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&q));
        }
        Ok(url)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, url: Url, options: RequestOptions) -> AppResult<T> {
        let resp = self.authority.authenticated_fetch(url.as_str(), options).await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = error_detail(&body).unwrap_or_else(|| format!("HTTP {}", status));
            debug!(target: "stockdash::http", %url, status = status.as_u16(), %detail, "backend returned an error status");
            return Err(AppError::from_status(status.as_u16(), detail));
        }
        Ok(resp.json::<T>().await?)
    }

    pub async fn add_product(&self, movement: &StockMovement) -> AppResult<ProductResponse> {
        if !self.authority.can_add_edit() { return Err(AppError::forbidden("add products")); }
        let url = self.endpoint("/add", &[])?;
        let out: ProductResponse = self.fetch_json(url, RequestOptions::post_json(movement)?).await?;
        info!(target: "stockdash::http", product = %movement.product_name, qty = movement.quantity, success = out.success, "add product");
        Ok(out)
    }

    pub async fn sell_product(&self, movement: &StockMovement) -> AppResult<ProductResponse> {
        if !self.authority.can_add_edit() { return Err(AppError::forbidden("record sales")); }
        let url = self.endpoint("/sell", &[])?;
        let out: ProductResponse = self.fetch_json(url, RequestOptions::post_json(movement)?).await?;
        info!(target: "stockdash::http", product = %movement.product_name, qty = movement.quantity, success = out.success, "sell product");
        Ok(out)
    }

    /// Overall summary, or the date-range variant when both bounds are given.
    pub async fn summary(&self, start: Option<&str>, end: Option<&str>) -> AppResult<Summary> {
        match (start, end) {
            (Some(s), Some(e)) => {
                let url = self.endpoint("/summary", &[("start", s), ("end", e)])?;
                let r: DateRangeSummary = self.fetch_json(url, RequestOptions::get()).await?;
                Ok(Summary::Range(r))
            }
            _ => {
                if start.is_some() || end.is_some() {
                    debug!(target: "stockdash::http", "summary range needs both start and end; fetching overall summary");
                }
                let url = self.endpoint("/summary", &[])?;
                let r: ProductsEnvelope<Product> = self.fetch_json(url, RequestOptions::get()).await?;
                Ok(Summary::Overall(r.products))
            }
        }
    }

    pub async fn enhanced_summary(&self) -> AppResult<Vec<Product>> {
        let url = self.endpoint("/summary/enhanced", &[])?;
        let r: ProductsEnvelope<Product> = self.fetch_json(url, RequestOptions::get()).await?;
        Ok(r.products)
    }

    /// Product names, for pickers.
    pub async fn products(&self) -> AppResult<Vec<String>> {
        let url = self.endpoint("/products", &[])?;
        let r: ProductsEnvelope<String> = self.fetch_json(url, RequestOptions::get()).await?;
        Ok(r.products)
    }

    /// Individual add/sell transactions, most recent first.
    pub async fn daily_history(&self, start: Option<&str>, end: Option<&str>) -> AppResult<Vec<Transaction>> {
        let mut query = Vec::new();
        if let Some(s) = start { query.push(("start", s)); }
        if let Some(e) = end { query.push(("end", e)); }
        let url = self.endpoint("/daily-history", &query)?;
        let r: TransactionsEnvelope = self.fetch_json(url, RequestOptions::get()).await?;
        Ok(r.transactions)
    }

    pub async fn delete_history(&self, kind: TransactionKind, id: i64) -> AppResult<DeleteResponse> {
        if !self.authority.can_delete() { return Err(AppError::forbidden("delete history entries")); }
        let url = self.endpoint(&format!("/history/{}/{}", kind.as_str(), id), &[])?;
        let out: DeleteResponse = self.fetch_json(url, RequestOptions::delete()).await?;
        info!(target: "stockdash::http", kind = kind.as_str(), id, success = out.success, "delete history entry");
        Ok(out)
    }
}

// FastAPI reports failures as {"detail": "..."}; validation errors carry a list.
fn error_detail(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    match v.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
