//! Lending ledger repository
//!
//! Issue and return each run in a single transaction. The guarded UPDATE on
//! the availability counter (and on the loan status for returns) is the
//! serialization point: whichever transaction lands first wins, the loser
//! sees zero affected rows and the whole transaction rolls back.

use chrono::{Duration, Utc};
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::loan::{
        fine_cents_for, IssueLoan, Loan, LoanQuery, LoanRecord, LoanStatus, LoanStatusFilter,
    },
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// Issue a book to a member.
    ///
    /// Failures keep a fixed order: unknown book, then no copies, then
    /// unknown member, then a bad duration. The guarded decrement is the
    /// first statement so the transaction is a writer from the start;
    /// concurrent callers queue on the busy timeout instead of failing a
    /// read-to-write upgrade under WAL, and two issues of the last copy
    /// cannot both succeed.
    pub async fn issue(&self, cmd: &IssueLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let decremented = sqlx::query(
            r#"
            UPDATE books SET available_copies = available_copies - 1
            WHERE id = ? AND available_copies > 0
            "#,
        )
        .bind(cmd.book_id)
        .execute(&mut *tx)
        .await?;
        if decremented.rows_affected() == 0 {
            let book_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
                    .bind(cmd.book_id)
                    .fetch_one(&mut *tx)
                    .await?;
            return Err(if book_exists {
                AppError::BookUnavailable(cmd.book_id)
            } else {
                AppError::NotFound(format!("Book with id {} not found", cmd.book_id))
            });
        }

        let member_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM members WHERE id = ?)")
                .bind(cmd.member_id)
                .fetch_one(&mut *tx)
                .await?;
        if !member_exists {
            return Err(AppError::NotFound(format!(
                "Member with id {} not found",
                cmd.member_id
            )));
        }

        if cmd.duration_days < 1 {
            return Err(AppError::InvalidInput(format!(
                "Loan duration must be at least one day, got {}",
                cmd.duration_days
            )));
        }

        let now = Utc::now();
        let due_date = now + Duration::days(cmd.duration_days);

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (member_id, book_id, borrow_date, due_date,
                               return_date, fine_cents, status)
            VALUES (?, ?, ?, ?, NULL, 0, ?)
            RETURNING *
            "#,
        )
        .bind(cmd.member_id)
        .bind(cmd.book_id)
        .bind(now)
        .bind(due_date)
        .bind(LoanStatus::Borrowed)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(loan)
    }

    /// Return a loan, settling the fine and putting the copy back on the
    /// shelf. The status-guarded UPDATE makes a second return of the same
    /// loan fail instead of restocking the book twice.
    pub async fn return_loan(&self, loan_id: i64, daily_fine_cents: i64) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        // No-op touch so the transaction is a writer before any read;
        // concurrent returns serialize on the busy timeout rather than
        // failing a snapshot upgrade under WAL.
        let touched = sqlx::query("UPDATE loans SET status = status WHERE id = ?")
            .bind(loan_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Loan with id {} not found", loan_id)));
        }

        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(loan_id)
            .fetch_one(&mut *tx)
            .await?;
        if loan.status == LoanStatus::Returned {
            return Err(AppError::AlreadyReturned(loan_id));
        }

        let now = Utc::now();
        let days_late = now.signed_duration_since(loan.due_date).num_days();
        let fine_cents = fine_cents_for(days_late, daily_fine_cents);

        let updated = sqlx::query(
            r#"
            UPDATE loans SET return_date = ?, fine_cents = ?, status = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(now)
        .bind(fine_cents)
        .bind(LoanStatus::Returned)
        .bind(loan_id)
        .bind(LoanStatus::Borrowed)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(AppError::AlreadyReturned(loan_id));
        }

        sqlx::query("UPDATE books SET available_copies = available_copies + 1 WHERE id = ?")
            .bind(loan.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get_by_id(loan_id).await
    }

    /// List loans joined with member and book details. The overdue and
    /// active filters compare against a `now` bound here, never a stored
    /// flag.
    pub async fn list(&self, query: &LoanQuery) -> AppResult<Vec<LoanRecord>> {
        let mut sql = String::from(
            r#"
            SELECT l.id, l.member_id, m.name AS member_name,
                   l.book_id, COALESCE(b.title, '(removed)') AS book_title,
                   l.borrow_date, l.due_date, l.return_date, l.fine_cents, l.status
            FROM loans l
            JOIN members m ON l.member_id = m.id
            LEFT JOIN books b ON l.book_id = b.id
            WHERE 1=1
            "#,
        );

        let now = Utc::now();
        let mut bind_now = false;
        match query.status {
            Some(LoanStatusFilter::Active) => {
                sql.push_str(" AND l.status = 'borrowed' AND l.due_date >= ?");
                bind_now = true;
            }
            Some(LoanStatusFilter::Overdue) => {
                sql.push_str(" AND l.status = 'borrowed' AND l.due_date < ?");
                bind_now = true;
            }
            Some(LoanStatusFilter::Returned) => {
                sql.push_str(" AND l.status = 'returned'");
            }
            Some(LoanStatusFilter::All) | None => {}
        }

        if query.search.is_some() {
            sql.push_str(" AND (m.name LIKE ? OR b.title LIKE ?)");
        }

        sql.push_str(" ORDER BY l.borrow_date DESC, l.id DESC");

        let mut q = sqlx::query_as::<_, LoanRecord>(&sql);
        if bind_now {
            q = q.bind(now);
        }
        let pattern = query.search.as_deref().map(|s| format!("%{}%", s));
        if let Some(ref pattern) = pattern {
            q = q.bind(pattern).bind(pattern);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Count loans still out
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = 'borrowed'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count loans out past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE status = 'borrowed' AND due_date < ?",
        )
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Sum of fines settled on returned loans, in cents
    pub async fn fines_collected_cents(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(fine_cents), 0) FROM loans WHERE status = 'returned'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }
}
