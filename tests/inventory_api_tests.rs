//! Inventory API calls through the session authority against the fake backend.

mod common;

use stockdash::dashboard::SummaryCharts;
use stockdash::error::AppError;
use stockdash::inventory::{InventoryApi, StockMovement, Summary, TransactionKind};

use common::{authority_with, memory_store, spawn_backend, user_json, ALICE};

fn movement(qty: i64) -> StockMovement {
    StockMovement { product_name: "Widget".into(), quantity: qty, unit_price: 2.5, date: "2025-10-01".into() }
}

#[tokio::test]
async fn overall_and_range_summary() -> anyhow::Result<()> {
    let base = spawn_backend().await;
    let (auth, _) = authority_with(memory_store(Some("t"), Some(ALICE)));
    let api = InventoryApi::new(auth, &base)?;

    let overall = api.summary(None, None).await?;
    assert!(matches!(overall, Summary::Overall(_)));
    assert_eq!(overall.products().len(), 2);
    assert_eq!(overall.products()[0].total_added_amount, 25.0);

    // a lone bound falls back to the overall summary
    assert!(matches!(api.summary(Some("2025-10-01"), None).await?, Summary::Overall(_)));

    let Summary::Range(r) = api.summary(Some("2025-10-01"), Some("2025-10-31")).await? else {
        panic!("expected range summary")
    };
    assert_eq!(r.total_added_qty_in_range, 3);
    assert_eq!(r.total_added_amount_in_range, 7.5);
    assert_eq!(r.total_sold_amount_in_range, 4.5);
    Ok(())
}

#[tokio::test]
async fn products_history_and_enhanced() -> anyhow::Result<()> {
    let base = spawn_backend().await;
    let (auth, _) = authority_with(memory_store(Some("t"), Some(ALICE)));
    let api = InventoryApi::new(auth, &format!("{}/", base))?;

    assert_eq!(api.products().await?, vec!["Bolt".to_string(), "Widget".to_string()]);

    let txs = api.daily_history(Some("2025-10-01"), None).await?;
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].kind, TransactionKind::Sell);
    assert_eq!(txs[1].total_amount, 7.5);

    let enhanced = api.enhanced_summary().await?;
    assert_eq!(enhanced[0].profit_loss, Some(8.0));
    let charts = SummaryCharts::from_products(&enhanced).expect("charts");
    assert_eq!(charts.distribution.datasets[0].data, vec![6.0]);
    Ok(())
}

#[tokio::test]
async fn editor_can_add_and_sell() -> anyhow::Result<()> {
    let base = spawn_backend().await;
    let (auth, _) = authority_with(memory_store(Some("t"), Some(ALICE)));
    let api = InventoryApi::new(auth, &base)?;

    let added = api.add_product(&movement(3)).await?;
    assert!(added.success);
    assert_eq!(added.product.map(|p| p.name), Some("Widget".to_string()));

    let rejected = api.sell_product(&movement(50)).await?;
    assert!(!rejected.success);
    assert_eq!(rejected.message, "Insufficient stock");
    Ok(())
}

#[tokio::test]
async fn delete_requires_delete_capability() -> anyhow::Result<()> {
    let base = spawn_backend().await;

    let (editor, _) = authority_with(memory_store(Some("t"), Some(ALICE)));
    let api = InventoryApi::new(editor, &base)?;
    let err = api.delete_history(TransactionKind::Add, 3).await.unwrap_err();
    assert_eq!(err, AppError::forbidden("delete history entries"));

    let (admin, _) = authority_with(memory_store(Some("t"), Some(&user_json("admin"))));
    let api = InventoryApi::new(admin, &base)?;
    let out = api.delete_history(TransactionKind::Sell, 3).await?;
    assert!(out.success);
    assert!(out.message.contains("sell history record (ID: 3)"));
    let missing = api.delete_history(TransactionKind::Add, 404).await?;
    assert!(!missing.success);
    assert!(missing.updated_product.is_none());
    Ok(())
}

#[tokio::test]
async fn viewer_is_refused_locally() -> anyhow::Result<()> {
    let base = spawn_backend().await;
    let (viewer, nav) = authority_with(memory_store(Some("t"), Some(&user_json("viewer"))));
    let api = InventoryApi::new(viewer, &base)?;
    let err = api.sell_product(&movement(1)).await.unwrap_err();
    assert_eq!(err.http_status(), 403);
    // refusing is not a session failure
    assert!(api.authority().is_authenticated());
    assert_eq!(nav.redirect_count(), 0);
    Ok(())
}

#[tokio::test]
async fn backend_401_ends_session_for_typed_calls() -> anyhow::Result<()> {
    let base = spawn_backend().await;
    // the fake /add answers 401 when no bearer is sent
    let (auth, nav) = authority_with(memory_store(None, Some(ALICE)));
    let api = InventoryApi::new(auth, &base)?;
    let err = api.add_product(&movement(1)).await.unwrap_err();
    assert!(err.is_authentication_required());
    assert_eq!(api.authority().get_user(), None);
    assert_eq!(nav.redirect_count(), 1);
    Ok(())
}

#[tokio::test]
async fn error_statuses_become_app_errors() -> anyhow::Result<()> {
    let base = spawn_backend().await;
    let (auth, nav) = authority_with(memory_store(Some("t"), Some(ALICE)));
    // point the API at a prefix that only has error routes underneath
    let api = InventoryApi::new(auth.clone(), &format!("{}/missing", base))?;
    let err = api.products().await.unwrap_err();
    assert_eq!(err.http_status(), 404);
    assert_eq!(err.message(), "HTTP 404 Not Found");
    assert!(auth.is_authenticated());
    assert_eq!(nav.redirect_count(), 0);
    Ok(())
}
