//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    services::reports::{LibrarySummary, LoanSummary},
    AppState,
};

/// Library-wide statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Library statistics", body = LibrarySummary)
    )
)]
pub async fn get_stats(State(state): State<AppState>) -> AppResult<Json<LibrarySummary>> {
    let summary = state.services.reports.library_summary().await?;
    Ok(Json(summary))
}

/// Lending ledger statistics
#[utoipa::path(
    get,
    path = "/stats/loans",
    tag = "stats",
    responses(
        (status = 200, description = "Loan statistics", body = LoanSummary)
    )
)]
pub async fn get_loan_stats(State(state): State<AppState>) -> AppResult<Json<LoanSummary>> {
    let summary = state.services.reports.loan_summary().await?;
    Ok(Json(summary))
}
