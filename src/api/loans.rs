//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    ident,
    models::loan::{Loan, LoanClass, LoanQuery, LoanRecord, LoanStatus},
    AppState,
};

/// Create loan request. Identifiers take the display form operators use,
/// "mem007" or raw "7" for members, "0042" or "42" for books.
#[derive(Deserialize, ToSchema)]
pub struct CreateLoanRequest {
    /// Member identifier
    pub member_id: String,
    /// Book identifier
    pub book_id: String,
    /// Loan duration in days; defaults to the configured policy
    pub duration_days: Option<i64>,
}

/// Loan with display identifiers and the fine as a currency amount
#[derive(Serialize, ToSchema)]
pub struct LoanResponse {
    pub id: String,
    pub member_id: String,
    pub book_id: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub fine: Decimal,
    pub status: LoanStatus,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            id: ident::format_loan_id(loan.id),
            member_id: ident::format_member_id(loan.member_id),
            book_id: ident::format_book_id(loan.book_id),
            borrow_date: loan.borrow_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            fine: loan.fine_amount(),
            status: loan.status,
        }
    }
}

/// Loan listing row with member and book details and the derived
/// lifecycle classification
#[derive(Serialize, ToSchema)]
pub struct LoanRecordResponse {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub book_id: String,
    pub book_title: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub fine: Decimal,
    pub classification: LoanClass,
}

impl LoanRecordResponse {
    fn from_record(record: LoanRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: ident::format_loan_id(record.id),
            member_id: ident::format_member_id(record.member_id),
            member_name: record.member_name.clone(),
            book_id: ident::format_book_id(record.book_id),
            book_title: record.book_title.clone(),
            borrow_date: record.borrow_date,
            due_date: record.due_date,
            return_date: record.return_date,
            fine: record.fine_amount(),
            classification: record.classify(now),
        }
    }
}

/// List loans with member and book details
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    params(LoanQuery),
    responses(
        (status = 200, description = "Matching loans", body = Vec<LoanRecordResponse>)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    Query(query): Query<LoanQuery>,
) -> AppResult<Json<Vec<LoanRecordResponse>>> {
    let now = Utc::now();
    let loans = state.services.lending.list(&query).await?;
    Ok(Json(
        loans
            .into_iter()
            .map(|record| LoanRecordResponse::from_record(record, now))
            .collect(),
    ))
}

/// Issue a book to a member
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Book issued", body = LoanResponse),
        (status = 400, description = "Malformed identifier or duration"),
        (status = 404, description = "Book or member not found"),
        (status = 409, description = "No copies available")
    )
)]
pub async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> AppResult<(StatusCode, Json<LoanResponse>)> {
    let member_id = ident::parse_id(&request.member_id)?;
    let book_id = ident::parse_id(&request.book_id)?;

    let loan = state
        .services
        .lending
        .issue(member_id, book_id, request.duration_days)
        .await?;

    Ok((StatusCode::CREATED, Json(loan.into())))
}

/// Get a loan by its identifier
#[utoipa::path(
    get,
    path = "/loans/{id}",
    tag = "loans",
    params(("id" = String, Path, description = "Loan identifier, padded or raw")),
    responses(
        (status = 200, description = "Loan found", body = LoanResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Loan not found")
    )
)]
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LoanResponse>> {
    let id = ident::parse_id(&id)?;
    let loan = state.services.lending.get(id).await?;
    Ok(Json(loan.into()))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    params(("id" = String, Path, description = "Loan identifier, padded or raw")),
    responses(
        (status = 200, description = "Book returned, fine settled", body = LoanResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Loan not found"),
        (status = 409, description = "Loan already returned")
    )
)]
pub async fn return_loan(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LoanResponse>> {
    let id = ident::parse_id(&id)?;
    let loan = state.services.lending.return_loan(id).await?;
    Ok(Json(loan.into()))
}
