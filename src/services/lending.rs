//! Lending service for issuing and returning books

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::loan::{IssueLoan, Loan, LoanQuery, LoanRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingService {
    repository: Repository,
    config: LendingConfig,
}

impl LendingService {
    pub fn new(repository: Repository, config: LendingConfig) -> Self {
        Self { repository, config }
    }

    /// Issue a book to a member. A missing duration falls back to the
    /// configured default; the repository validates the rest, keeping the
    /// failure order (book, copies, member, duration) in one place.
    pub async fn issue(
        &self,
        member_id: i64,
        book_id: i64,
        duration_days: Option<i64>,
    ) -> AppResult<Loan> {
        let duration_days = duration_days.unwrap_or(self.config.default_loan_days);

        let loan = self
            .repository
            .loans
            .issue(&IssueLoan {
                member_id,
                book_id,
                duration_days,
            })
            .await?;

        tracing::info!(
            loan_id = loan.id,
            member_id,
            book_id,
            duration_days,
            "book issued"
        );
        Ok(loan)
    }

    /// Return a loan, settling any fine at the configured daily rate
    pub async fn return_loan(&self, loan_id: i64) -> AppResult<Loan> {
        let loan = self
            .repository
            .loans
            .return_loan(loan_id, self.config.daily_fine_cents)
            .await?;

        tracing::info!(
            loan_id,
            fine_cents = loan.fine_cents,
            "book returned"
        );
        Ok(loan)
    }

    pub async fn get(&self, loan_id: i64) -> AppResult<Loan> {
        self.repository.loans.get_by_id(loan_id).await
    }

    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanRecord>> {
        self.repository.loans.list(query).await
    }
}
