//! Lending ledger model and classification

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Persisted loan status. A loan is exactly one of these; overdue is a view
/// over `borrowed` loans, not a stored state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LoanStatus {
    Borrowed,
    Returned,
}

/// Loan record.
///
/// `return_date` and a nonzero `fine_cents` are only ever set together with
/// the transition to `Returned`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub member_id: i64,
    pub book_id: i64,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub fine_cents: i64,
    pub status: LoanStatus,
}

/// Derived lifecycle classification of a loan at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LoanClass {
    /// Out, due date not yet passed
    Active,
    /// Out past its due date
    Overdue { days_overdue: i64 },
    /// Returned, with the number of whole days the copy was held
    Returned { days_held: i64 },
}

/// Fine owed for a loan returned `days_late` whole days past its due date.
/// Flat per-day rate, no cap; early or on-time returns owe nothing.
pub fn fine_cents_for(days_late: i64, daily_fine_cents: i64) -> i64 {
    days_late.max(0) * daily_fine_cents
}

fn classify_dates(
    borrow_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    return_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> LoanClass {
    match return_date {
        Some(returned) => LoanClass::Returned {
            days_held: returned.signed_duration_since(borrow_date).num_days(),
        },
        None if now > due_date => LoanClass::Overdue {
            days_overdue: now.signed_duration_since(due_date).num_days(),
        },
        None => LoanClass::Active,
    }
}

impl Loan {
    /// Classify this loan relative to `now`. A loan is overdue the moment
    /// its due date passes; `days_overdue` counts whole elapsed days, so a
    /// partial day reads as zero and accrues no fine yet.
    pub fn classify(&self, now: DateTime<Utc>) -> LoanClass {
        classify_dates(self.borrow_date, self.due_date, self.return_date, now)
    }

    /// Fine as a decimal currency amount
    pub fn fine_amount(&self) -> Decimal {
        Decimal::new(self.fine_cents, 2)
    }
}

/// Issue command resolved to internal keys
#[derive(Debug, Clone, Copy)]
pub struct IssueLoan {
    pub member_id: i64,
    pub book_id: i64,
    pub duration_days: i64,
}

/// Loan row joined with the member name and book title for listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct LoanRecord {
    pub id: i64,
    pub member_id: i64,
    pub member_name: String,
    pub book_id: i64,
    pub book_title: String,
    pub borrow_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub fine_cents: i64,
    pub status: LoanStatus,
}

impl LoanRecord {
    pub fn classify(&self, now: DateTime<Utc>) -> LoanClass {
        classify_dates(self.borrow_date, self.due_date, self.return_date, now)
    }

    pub fn fine_amount(&self) -> Decimal {
        Decimal::new(self.fine_cents, 2)
    }
}

/// Lifecycle filter for loan listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatusFilter {
    All,
    Active,
    Overdue,
    Returned,
}

/// Loan search query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct LoanQuery {
    /// Lifecycle filter
    pub status: Option<LoanStatusFilter>,
    /// Substring match on member name or book title
    pub search: Option<String>,
}
