//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use installment_core::{
    BillingPlanDefinition, EngineError, LineItem, PaymentSchedule, PlanQuote, PlanRequest,
    ScheduleKey, ValidationError,
};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct PlansRequest {
    pub vendor: String,
    pub line_items: Vec<LineItem>,
    /// Plan notation strings: "1:3", "4-4", "4,4"
    #[serde(default)]
    pub plans: Vec<String>,
    #[serde(default)]
    pub fee_percent: Option<Decimal>,
    #[serde(default)]
    pub tax_percent: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub quote_id: String,
    pub event_date: NaiveDate,
    pub total_due: Decimal,
    pub schedules: Vec<PaymentSchedule>,
}

#[derive(Debug, Deserialize)]
pub struct SelectPlanRequest {
    #[serde(flatten)]
    pub quote: PlansRequest,
    pub cycles: u32,
    pub interval_weeks: u32,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Quote the installment plans available for a cart
pub async fn quote_plans(
    State(state): State<AppState>,
    Json(payload): Json<PlansRequest>,
) -> Result<Json<PlansResponse>, ApiError> {
    let quote = build_quote(&state, &payload)?;

    Ok(Json(PlansResponse {
        quote_id: uuid::Uuid::new_v4().to_string(),
        event_date: quote.event_date,
        total_due: quote.total_due,
        schedules: quote.schedules,
    }))
}

/// Resolve the shopper's chosen plan into a billing-plan payload.
///
/// Plans are recomputed here so a client cannot submit its own amounts.
pub async fn select_plan(
    State(state): State<AppState>,
    Json(payload): Json<SelectPlanRequest>,
) -> Result<Json<BillingPlanDefinition>, ApiError> {
    let quote = build_quote(&state, &payload.quote)?;
    let wanted = ScheduleKey {
        cycles: payload.cycles,
        interval_weeks: payload.interval_weeks,
    };

    let schedule = quote
        .schedules
        .iter()
        .find(|s| s.key() == wanted)
        .ok_or_else(|| {
            tracing::info!(?wanted, vendor = %payload.quote.vendor, "selected plan not offered");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "This payment plan is not available for your event date.".into(),
                    code: "PLAN_NOT_OFFERED".into(),
                }),
            )
        })?;

    Ok(Json(BillingPlanDefinition::from_schedule(schedule)))
}

fn build_quote(state: &AppState, payload: &PlansRequest) -> Result<PlanQuote, ApiError> {
    for rate in [payload.fee_percent, payload.tax_percent].into_iter().flatten() {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Fee and tax rates must be between 0 and 1.".into(),
                    code: "INVALID_RATE".into(),
                }),
            ));
        }
    }

    let requests = payload
        .plans
        .iter()
        .map(|s| s.parse::<PlanRequest>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(reject)?;

    let today = (state.today)();
    state
        .builder
        .build_plans(
            today,
            &payload.vendor,
            &payload.line_items,
            payload.fee_percent,
            payload.tax_percent,
            &requests,
        )
        .map_err(reject)
}

fn reject(err: ValidationError) -> ApiError {
    tracing::warn!("Rejected checkout request: {}", err);
    let code = match err {
        ValidationError::EmptyOrder => "EMPTY_ORDER",
        ValidationError::InvalidDate { .. } | ValidationError::DateOverflow => "INVALID_DATE",
        ValidationError::NegativePrice { .. }
        | ValidationError::NegativeQuantity { .. }
        | ValidationError::AmountOverflow => "INVALID_LINE_ITEM",
        ValidationError::InvalidPlanRequest { .. } => "INVALID_PLAN",
    };
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: EngineError::from(err).user_message(),
            code: code.into(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header},
    };
    use installment_core::PlanBuilder;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::app;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn test_state() -> AppState {
        AppState {
            today: fixed_today,
            ..AppState::new(PlanBuilder::default())
        }
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app(test_state()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn cart() -> Value {
        json!([{ "date": "2024-06-01", "unit_price": "150.00", "quantity": 2 }])
    }

    #[tokio::test]
    async fn test_quote_plans() {
        let (status, body) = post(
            "/api/plans",
            json!({ "vendor": "box-office", "line_items": cart(), "plans": ["4,4", "4-4"] }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event_date"], "2024-06-01");
        assert_eq!(body["total_due"], "300.00");
        let schedules = body["schedules"].as_array().unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0]["per_cycle_amount"], "75.00");
        assert_eq!(schedules[0]["payment_dates"][0], "2024-01-02");
    }

    #[tokio::test]
    async fn test_bad_plan_notation() {
        let (status, body) = post(
            "/api/plans",
            json!({ "vendor": "box-office", "line_items": cart(), "plans": ["3:1"] }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PLAN");
    }

    #[tokio::test]
    async fn test_bad_date() {
        let (status, body) = post(
            "/api/plans",
            json!({
                "vendor": "box-office",
                "line_items": [{ "date": "someday", "unit_price": "10", "quantity": 1 }],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_oversized_cart_is_rejected() {
        let (status, body) = post(
            "/api/plans",
            json!({
                "vendor": "box-office",
                "line_items": [
                    { "date": "2024-06-01", "unit_price": "79228162514264337593543950335", "quantity": 2 }
                ],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_LINE_ITEM");
    }

    #[tokio::test]
    async fn test_rate_out_of_range() {
        let (status, body) = post(
            "/api/plans",
            json!({ "vendor": "box-office", "line_items": cart(), "fee_percent": "7" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RATE");
    }

    #[tokio::test]
    async fn test_huge_cycle_range_returns() {
        let (status, body) = post(
            "/api/plans",
            json!({ "vendor": "box-office", "line_items": cart(), "plans": ["1:4294967295"] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schedules"][0]["cycles"], 18);
    }

    #[tokio::test]
    async fn test_select_plan() {
        let (status, body) = post(
            "/api/plans/select",
            json!({
                "vendor": "box-office",
                "line_items": cart(),
                "plans": ["4,4"],
                "cycles": 4,
                "interval_weeks": 4,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cycles"], "4");
        assert_eq!(body["amount"], "75.00");
        assert_eq!(body["setup_fee"], "21.00");
        assert_eq!(body["tax"], "6.19");
    }

    #[tokio::test]
    async fn test_select_plan_not_offered() {
        let (status, body) = post(
            "/api/plans/select",
            json!({
                "vendor": "box-office",
                "line_items": cart(),
                "plans": ["4,4"],
                "cycles": 2,
                "interval_weeks": 1,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PLAN_NOT_OFFERED");
    }
}
