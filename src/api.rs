// 🌐 HTTP API - calculators over JSON
//
// Every response uses the same envelope: { success, data, error }.
// Input problems are 422 with the offending field, malformed JSON 400,
// journal failures 500.

use crate::calculators::TaxRules;
use crate::error::CalcError;
use crate::format::format_number;
use crate::history::{calculations_for, recent_calculations, record_calculation, CalculationRecord};
use crate::report::Report;
use crate::request::{CalculationRequest, CalculationResult, CATALOG};
use crate::validation::parse_amount;
use crate::words::{number_to_words, WordStyle};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub const DEFAULT_HISTORY_LIMIT: usize = 20;
pub const MAX_HISTORY_LIMIT: usize = 500;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Option<Arc<Mutex<Connection>>>,
    pub rules: Arc<TaxRules>,
}

impl AppState {
    pub fn new(rules: TaxRules) -> Self {
        Self {
            db: None,
            rules: Arc::new(rules),
        }
    }

    pub fn with_journal(mut self, conn: Connection) -> Self {
        self.db = Some(Arc::new(Mutex::new(conn)));
        self
    }
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Input field behind a validation error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            field: None,
        }
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message.into()),
        field: None,
    };
    (status, Json(body)).into_response()
}

fn invalid(error: &CalcError) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(error.to_string()),
        field: error.field().map(str::to_string),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

#[derive(Serialize)]
pub struct CalculateResponse {
    pub calculator: String,
    pub result: CalculationResult,
    pub report: Report,
    /// False when history is off or the same calculation was already recorded
    pub recorded: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub calculator: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WordsQuery {
    pub value: String,
    pub style: Option<String>,
}

#[derive(Serialize)]
pub struct WordsResponse {
    pub value: f64,
    pub style: String,
    pub formatted: String,
    pub words: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/calculators - What can be calculated
async fn list_calculators() -> impl IntoResponse {
    Json(ApiResponse::ok(CATALOG.to_vec()))
}

/// POST /api/calculate - Run one calculation and journal it
async fn calculate(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return failure(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let outcome = match request.run_with(&state.rules) {
        Ok(outcome) => outcome,
        Err(e) => return invalid(&e),
    };

    let recorded = match &state.db {
        Some(db) => {
            let conn = match db.lock() {
                Ok(conn) => conn,
                Err(_) => return failure(StatusCode::INTERNAL_SERVER_ERROR, "Journal unavailable"),
            };
            match CalculationRecord::new(&request, &outcome)
                .and_then(|record| record_calculation(&conn, &record))
            {
                Ok(inserted) => inserted,
                Err(e) => {
                    warn!(error = %e, calculator = %outcome.calculator, "failed to record calculation");
                    return failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to record calculation");
                }
            }
        }
        None => false,
    };

    let response = CalculateResponse {
        report: Report::from(&outcome.result),
        calculator: outcome.calculator,
        result: outcome.result,
        recorded,
    };
    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// GET /api/history?limit=&calculator= - Recent calculations, newest first
async fn get_history(State(state): State<AppState>, Query(query): Query<HistoryQuery>) -> Response {
    let Some(db) = &state.db else {
        return failure(StatusCode::NOT_FOUND, "History is disabled");
    };
    let conn = match db.lock() {
        Ok(conn) => conn,
        Err(_) => return failure(StatusCode::INTERNAL_SERVER_ERROR, "Journal unavailable"),
    };

    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let records = match &query.calculator {
        Some(name) => calculations_for(&conn, name).map(|mut records| {
            records.truncate(limit);
            records
        }),
        None => recent_calculations(&conn, limit),
    };

    match records {
        Ok(records) => (StatusCode::OK, Json(ApiResponse::ok(records))).into_response(),
        Err(e) => {
            warn!(error = %e, "failed to read history");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read history")
        }
    }
}

/// GET /api/tax/rules - Slabs and rates in force
async fn get_tax_rules(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.rules.as_ref().clone()))
}

/// GET /api/words?value=&style= - Spell out a number
async fn get_words(Query(query): Query<WordsQuery>) -> Response {
    let value = match parse_amount("value", &query.value) {
        Ok(value) => value,
        Err(e) => return invalid(&e),
    };
    let style: WordStyle = query
        .style
        .as_deref()
        .unwrap_or("currency")
        .parse()
        .unwrap_or(WordStyle::Currency);

    let response = WordsResponse {
        value,
        formatted: format_number(value, 2),
        words: number_to_words(value, &style),
        style: style.to_string(),
    };
    (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    info!(
        journal = state.db.is_some(),
        tax_year = %state.rules.financial_year,
        "building api router"
    );

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/calculators", get(list_calculators))
        .route("/calculate", post(calculate))
        .route("/history", get(get_history))
        .route("/tax/rules", get(get_tax_rules))
        .route("/words", get(get_words))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
