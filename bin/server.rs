// Mini CRM - Web Server
// Read-only JSON API over the in-memory store

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use tower_http::cors::CorsLayer;

use mini_crm::analysis::{inventory_alerts, summarize_alerts, AlertSummary, AnalysisSummary, InventoryAlert};
use mini_crm::chart::{ChartDataProvider, MockTrendProvider, MonthlySeries};
use mini_crm::logging::init_logging;
use mini_crm::{AppConfig, CrmStore, InventoryRecord, Merchant, Product, VERSION};

/// Shared application state
#[derive(Clone)]
struct AppState {
    store: Arc<RwLock<CrmStore>>,
    provider: MockTrendProvider,
}

impl AppState {
    fn read(&self) -> Result<RwLockReadGuard<'_, CrmStore>, Response> {
        self.store.read().map_err(|_| {
            log::error!("store lock poisoned");
            fail(StatusCode::INTERNAL_SERVER_ERROR, "store unavailable".to_string())
        })
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

fn fail(status: StatusCode, message: String) -> Response {
    log::warn!("{} {}", status.as_u16(), message);
    (
        status,
        Json(ApiResponse {
            success: false,
            data: serde_json::Value::Null,
            error: Some(message),
        }),
    )
        .into_response()
}

#[derive(Deserialize)]
struct SearchQuery {
    search: Option<String>,
}

#[derive(Deserialize)]
struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
}

#[derive(Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

/// Trend response: series plus summary cards
#[derive(Serialize)]
struct TrendResponse {
    merchant: String,
    year: i32,
    series: MonthlySeries,
    summary: Option<AnalysisSummary>,
}

#[derive(Serialize)]
struct AlertResponse {
    alerts: Vec<InventoryAlert>,
    summary: AlertSummary,
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        fail(
            StatusCode::BAD_REQUEST,
            format!("{} must be YYYY-MM-DD, got {}", field, raw),
        )
    })
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/products?search= - Products, optionally filtered
async fn get_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let store = match state.read() {
        Ok(store) => store,
        Err(response) => return response,
    };

    let products: Vec<Product> = store
        .products
        .search(query.search.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(ApiResponse::ok(products))).into_response()
}

/// GET /api/merchants - All merchants
async fn get_merchants(State(state): State<AppState>) -> Response {
    let store = match state.read() {
        Ok(store) => store,
        Err(response) => return response,
    };

    let merchants: Vec<Merchant> = store.merchants.all().to_vec();
    (StatusCode::OK, Json(ApiResponse::ok(merchants))).into_response()
}

/// GET /api/inventory/transactions?start=&end= - Ledger rows, newest first
async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Response {
    let store = match state.read() {
        Ok(store) => store,
        Err(response) => return response,
    };

    let records: Vec<InventoryRecord> = match (&query.start, &query.end) {
        (None, None) => store.ledger.newest_first().into_iter().cloned().collect(),
        (start, end) => {
            let start = match start.as_deref().map(|s| parse_date("start", s)).transpose() {
                Ok(date) => date.unwrap_or(NaiveDate::MIN),
                Err(response) => return response,
            };
            let end = match end.as_deref().map(|s| parse_date("end", s)).transpose() {
                Ok(date) => date.unwrap_or(NaiveDate::MAX),
                Err(response) => return response,
            };

            match store.ledger.query(start, end) {
                Ok(found) => found.into_iter().cloned().collect(),
                Err(e) => return fail(StatusCode::BAD_REQUEST, e.to_string()),
            }
        }
    };

    (StatusCode::OK, Json(ApiResponse::ok(records))).into_response()
}

/// GET /api/sales-analysis/trend/:merchant?year= - Monthly purchase trend
async fn get_trend(
    State(state): State<AppState>,
    Path(merchant): Path<String>,
    Query(query): Query<YearQuery>,
) -> Response {
    let name = {
        let store = match state.read() {
            Ok(store) => store,
            Err(response) => return response,
        };
        match store.merchants.find_by_name(&merchant) {
            Some(found) => found.name.clone(),
            None => return fail(StatusCode::NOT_FOUND, format!("merchant not found: {}", merchant)),
        }
    };

    let year = query.year.unwrap_or(2024);
    match state.provider.monthly_series(&name, year) {
        Ok(series) => {
            let summary = AnalysisSummary::from_series(&series);
            let response = TrendResponse {
                merchant: name,
                year,
                series,
                summary,
            };
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// GET /api/sales-analysis/inventory-alert - Per-product stock alerts
async fn get_inventory_alert(State(state): State<AppState>) -> Response {
    let store = match state.read() {
        Ok(store) => store,
        Err(response) => return response,
    };

    let alerts = inventory_alerts(&store.products, &store.ledger, Local::now().date_naive());
    let summary = summarize_alerts(&alerts);

    (StatusCode::OK, Json(ApiResponse::ok(AlertResponse { alerts, summary }))).into_response()
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/products", get(get_products))
        .route("/merchants", get(get_merchants))
        .route("/inventory/transactions", get(get_transactions))
        .route("/sales-analysis/trend/:merchant", get(get_trend))
        .route("/sales-analysis/inventory-alert", get(get_inventory_alert))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let _logger = init_logging(&config.logging)?;

    println!("🌐 Mini CRM {} - API Server", VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let state = AppState {
        store: Arc::new(RwLock::new(CrmStore::with_mock_data())),
        provider: MockTrendProvider::new(config.chart.jitter),
    };

    let addr = config.server.addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    log::info!("API server listening on {}", addr);
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/products", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state))
        .await
        .context("server stopped unexpectedly")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use mini_crm::entities::NewMerchant;
    use serde_json::Value;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            store: Arc::new(RwLock::new(CrmStore::with_mock_data())),
            provider: MockTrendProvider::new(0),
        }
    }

    async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn assert_failure(body: &Value) {
        assert_eq!(body["success"], Value::Bool(false));
        assert_eq!(body["data"], Value::Null);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn test_unknown_merchant_is_404() {
        let (status, body) = get_json(state(), "/api/sales-analysis/trend/Nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_failure(&body);
    }

    #[tokio::test]
    async fn test_trend_for_known_merchant() {
        let (status, body) = get_json(state(), "/api/sales-analysis/trend/Mall%20E?year=2023").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], Value::Bool(true));
        assert_eq!(body["data"]["merchant"], "Mall E");
        assert_eq!(body["data"]["year"], 2023);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_merchant_name_with_literal_percent() {
        let state = state();
        state.store.write().unwrap().merchants.add(NewMerchant {
            name: "Stall%41".to_string(),
            contact: "Test Contact".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Market St".to_string(),
        });

        let (status, body) = get_json(state, "/api/sales-analysis/trend/Stall%2541").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["merchant"], "Stall%41");
    }

    #[tokio::test]
    async fn test_malformed_date_is_400() {
        let (status, body) = get_json(state(), "/api/inventory/transactions?start=2024-13-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_failure(&body);
    }

    #[tokio::test]
    async fn test_reversed_range_is_400() {
        let (status, body) = get_json(
            state(),
            "/api/inventory/transactions?start=2024-02-01&end=2024-01-01",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_failure(&body);
    }

    #[tokio::test]
    async fn test_open_ended_ranges() {
        let (status, body) = get_json(state(), "/api/inventory/transactions?start=2024-01-13").await;
        assert_eq!(status, StatusCode::OK);
        let products: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["product"].as_str().unwrap())
            .collect();
        assert_eq!(products, vec!["Apple", "Banana", "Orange"]);

        let (status, body) = get_json(state(), "/api/inventory/transactions?end=2024-01-12").await;
        assert_eq!(status, StatusCode::OK);
        let products: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["product"].as_str().unwrap())
            .collect();
        assert_eq!(products, vec!["Grape", "Strawberry"]);
    }

    #[tokio::test]
    async fn test_all_transactions_newest_first() {
        let (status, body) = get_json(state(), "/api/inventory/transactions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["data"][0]["product"], "Apple");
    }
}
