//! Book catalog model and request types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book record from the catalog.
///
/// Invariant: `0 <= available_copies <= total_copies`, and the difference
/// equals the number of loans on this book still out. Only the lending
/// ledger moves `available_copies`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i64>,
    pub category: Option<String>,
    pub total_copies: i64,
    pub available_copies: i64,
}

fn default_copies() -> i64 {
    1
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "ISBN is required"))]
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i64>,
    pub category: Option<String>,
    #[serde(default = "default_copies")]
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: i64,
}

/// Update book request. Fields left out keep their current value, so
/// optional fields can be replaced but not cleared back to null.
/// `available_copies` is never writable here, it only moves through the
/// lending ledger.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i64>,
    pub category: Option<String>,
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: Option<i64>,
}

/// Allow-list of searchable book fields. Only these column names ever reach
/// the SQL text; search terms are always bound parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Title,
    Author,
    Isbn,
    Category,
}

impl SearchField {
    pub fn column(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Author => "author",
            SearchField::Isbn => "isbn",
            SearchField::Category => "category",
        }
    }
}

/// Availability filter for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    All,
    Available,
    OutOfStock,
}

/// Book search query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Field to search (allow-listed)
    pub field: Option<SearchField>,
    /// Term for the field search
    pub term: Option<String>,
    /// Free search across title, author and ISBN
    pub search: Option<String>,
    /// Availability filter
    pub availability: Option<Availability>,
}
