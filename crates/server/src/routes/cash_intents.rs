//! Cash-intent and cashier-code verification handlers.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smart_cart_core::{CashierCode, Mobile};

use super::extract::{ApiJson, non_blank};
use crate::error::{AppError, Result};
use crate::models::{CashIntent, CashierCodeRecord};
use crate::services::VerifyOutcome;
use crate::state::AppState;

/// Body of `POST /cash-intent`.
#[derive(Debug, Deserialize)]
pub struct CashIntentRequest {
    pub name: Option<String>,
    pub mobile: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashIntentResponse {
    pub success: bool,
    pub cashier_code: CashierCode,
    pub expires_at: DateTime<Utc>,
}

/// Body of `POST /verify-cashier-code`. The code may be a string or a number.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub mobile: Option<String>,
    pub cashier_code: Option<CashierCode>,
}

#[derive(Debug, Serialize)]
pub struct VerifyCodeResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct IntentsResponse {
    pub success: bool,
    pub intents: Vec<CashIntent>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<CashierCodeRecord>,
}

/// Issue a cashier code for a customer paying cash.
///
/// POST /cash-intent
#[tracing::instrument(skip(state, body))]
pub async fn create_intent(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CashIntentRequest>,
) -> Result<Json<CashIntentResponse>> {
    let (Some(name), Some(mobile)) = (non_blank(body.name), non_blank(body.mobile)) else {
        return Err(AppError::Validation("Name and mobile are required".to_owned()));
    };
    let mobile = Mobile::parse(&mobile).map_err(|e| AppError::Validation(e.to_string()))?;

    let intent = state.verification().request_intent(name, mobile).await?;

    Ok(Json(CashIntentResponse {
        success: true,
        cashier_code: intent.code,
        expires_at: intent.expires_at,
    }))
}

/// List pending intents, newest first.
///
/// GET /cash-intents
#[tracing::instrument(skip(state))]
pub async fn list_intents(State(state): State<AppState>) -> Result<Json<IntentsResponse>> {
    let intents = state.verification().list_intents().await?;
    Ok(Json(IntentsResponse {
        success: true,
        intents,
    }))
}

/// Check a cashier code typed in at the till.
///
/// POST /verify-cashier-code
#[tracing::instrument(skip(state, body))]
pub async fn verify_code(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>> {
    let (Some(mobile), Some(code)) = (non_blank(body.mobile), body.cashier_code) else {
        return Err(AppError::Validation(
            "Mobile and cashier code are required".to_owned(),
        ));
    };
    let mobile = Mobile::parse(&mobile).map_err(|e| AppError::Validation(e.to_string()))?;

    match state.verification().verify_code(&mobile, &code).await? {
        VerifyOutcome::Verified => Ok(Json(VerifyCodeResponse {
            success: true,
            message: "Cashier code verified",
        })),
        VerifyOutcome::Invalid => Err(AppError::InvalidCode),
        VerifyOutcome::Expired => Err(AppError::CodeExpired),
    }
}

/// List every issued code, newest first.
///
/// GET /cashier-code-history
#[tracing::instrument(skip(state))]
pub async fn list_history(State(state): State<AppState>) -> Result<Json<HistoryResponse>> {
    let history = state.verification().list_history().await?;
    Ok(Json(HistoryResponse {
        success: true,
        history,
    }))
}
