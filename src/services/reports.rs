//! Reporting service
//!
//! Every figure here is recomputed from the base tables at query time.
//! Nothing is cached and no counter column exists to drift out of sync.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::loan::{fine_cents_for, LoanClass, LoanQuery},
    repository::Repository,
};

/// Library-wide dashboard figures
#[derive(Debug, Serialize, ToSchema)]
pub struct LibrarySummary {
    pub total_titles: i64,
    pub total_copies: i64,
    pub available_copies: i64,
    pub total_members: i64,
    pub active_loans: i64,
    pub overdue_loans: i64,
    pub fines_collected: Decimal,
}

/// Breakdown of the lending ledger by lifecycle state
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanSummary {
    pub active: i64,
    pub overdue: i64,
    pub returned: i64,
    /// Fines settled on returned loans
    pub fines_collected: Decimal,
    /// Fines accruing on loans currently overdue, at today's rate
    pub fines_outstanding: Decimal,
}

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    config: LendingConfig,
}

impl ReportsService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    pub async fn library_summary(&self) -> AppResult<LibrarySummary> {
        let (total_titles, total_copies, available_copies) =
            self.repository.books.totals().await?;
        let total_members = self.repository.members.count().await?;
        let active_loans = self.repository.loans.count_active().await?;
        let overdue_loans = self.repository.loans.count_overdue().await?;
        let fines_collected = self.repository.loans.fines_collected_cents().await?;

        Ok(LibrarySummary {
            total_titles,
            total_copies,
            available_copies,
            total_members,
            active_loans,
            overdue_loans,
            fines_collected: Decimal::new(fines_collected, 2),
        })
    }

    pub async fn loan_summary(&self) -> AppResult<LoanSummary> {
        let loans = self.repository.loans.list(&LoanQuery::default()).await?;
        let now = chrono::Utc::now();

        let mut summary = LoanSummary {
            active: 0,
            overdue: 0,
            returned: 0,
            fines_collected: Decimal::ZERO,
            fines_outstanding: Decimal::ZERO,
        };

        for loan in &loans {
            match loan.classify(now) {
                LoanClass::Active => summary.active += 1,
                LoanClass::Overdue { days_overdue } => {
                    summary.overdue += 1;
                    let accruing = fine_cents_for(days_overdue, self.config.daily_fine_cents);
                    summary.fines_outstanding += Decimal::new(accruing, 2);
                }
                LoanClass::Returned { .. } => {
                    summary.returned += 1;
                    summary.fines_collected += loan.fine_amount();
                }
            }
        }

        Ok(summary)
    }
}
