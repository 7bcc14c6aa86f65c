//! Books repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Availability, Book, BookQuery, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Add a book to the catalog. A new title starts fully available.
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, publisher, publication_year,
                               category, total_copies, available_copies)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(&book.publisher)
        .bind(book.publication_year)
        .bind(&book.category)
        .bind(book.total_copies)
        .bind(book.total_copies)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| duplicate_isbn(err, &book.isbn))?;

        Ok(created)
    }

    /// Update book details.
    ///
    /// Changing `total_copies` keeps the copy-count invariant: the new total
    /// must cover the copies currently out, and `available_copies` is
    /// recomputed as total minus issued.
    pub async fn update(&self, id: i64, changes: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        let issued = current.total_copies - current.available_copies;
        let total = changes.total_copies.unwrap_or(current.total_copies);
        if total < issued {
            return Err(AppError::InvalidInput(format!(
                "Cannot reduce total copies to {}: {} copies are still out on loan",
                total, issued
            )));
        }

        let isbn = changes.isbn.as_deref().unwrap_or(&current.isbn);
        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = ?, author = ?, isbn = ?, publisher = ?,
                publication_year = ?, category = ?,
                total_copies = ?, available_copies = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(changes.title.as_deref().unwrap_or(&current.title))
        .bind(changes.author.as_deref().unwrap_or(&current.author))
        .bind(isbn)
        .bind(changes.publisher.as_ref().or(current.publisher.as_ref()))
        .bind(changes.publication_year.or(current.publication_year))
        .bind(changes.category.as_ref().or(current.category.as_ref()))
        .bind(total)
        .bind(total - issued)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| duplicate_isbn(err, isbn))?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Remove a book. Refused while any copy is still out; returned loans
    /// keep their rows and outlive the catalog entry.
    pub async fn remove(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM loans WHERE book_id = ? AND status = 'borrowed')",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        if referenced {
            return Err(AppError::ReferentialIntegrity(id));
        }

        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Search the catalog. Field names come from the [`SearchField`] allow
    /// list only; every term is a bound parameter.
    ///
    /// [`SearchField`]: crate::models::book::SearchField
    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let mut sql = String::from("SELECT * FROM books WHERE 1=1");
        let mut terms: Vec<String> = Vec::new();

        if let (Some(field), Some(term)) = (query.field, query.term.as_deref()) {
            sql.push_str(&format!(" AND {} LIKE ?", field.column()));
            terms.push(format!("%{}%", term));
        }

        if let Some(search) = query.search.as_deref() {
            sql.push_str(" AND (title LIKE ? OR author LIKE ? OR isbn LIKE ?)");
            let pattern = format!("%{}%", search);
            terms.push(pattern.clone());
            terms.push(pattern.clone());
            terms.push(pattern);
        }

        match query.availability {
            Some(Availability::Available) => sql.push_str(" AND available_copies > 0"),
            Some(Availability::OutOfStock) => sql.push_str(" AND available_copies = 0"),
            Some(Availability::All) | None => {}
        }

        sql.push_str(" ORDER BY title");

        let mut q = sqlx::query_as::<_, Book>(&sql);
        for term in &terms {
            q = q.bind(term);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Count all titles and all copies currently available
    pub async fn totals(&self) -> AppResult<(i64, i64, i64)> {
        let row: (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total_copies), 0),
                   COALESCE(SUM(available_copies), 0)
            FROM books
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}

fn duplicate_isbn(err: sqlx::Error, isbn: &str) -> AppError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => {
            AppError::DuplicateKey(format!("A book with ISBN {} already exists", isbn))
        }
        _ => err.into(),
    }
}
