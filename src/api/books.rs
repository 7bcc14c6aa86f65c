//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    ident,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    AppState,
};

/// Book with its display identifier
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    /// Zero-padded display identifier
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publisher: Option<String>,
    pub publication_year: Option<i64>,
    pub category: Option<String>,
    pub total_copies: i64,
    pub available_copies: i64,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: ident::format_book_id(book.id),
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            publisher: book.publisher,
            publication_year: book.publication_year,
            category: book.category,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
        }
    }
}

/// Search the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<BookResponse>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<Vec<BookResponse>>> {
    let books = state.services.catalog.search(&query).await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 400, description = "Invalid book details"),
        (status = 409, description = "ISBN already in the catalog")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.catalog.add_book(request).await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// Get a book by its identifier
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book identifier, padded or raw")),
    responses(
        (status = 200, description = "Book found", body = BookResponse),
        (status = 400, description = "Malformed identifier"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookResponse>> {
    let id = ident::parse_id(&id)?;
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book.into()))
}

/// Update book details
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book identifier, padded or raw")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid changes"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "ISBN already in the catalog")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBook>,
) -> AppResult<Json<BookResponse>> {
    let id = ident::parse_id(&id)?;
    let book = state.services.catalog.update_book(id, request).await?;
    Ok(Json(book.into()))
}

/// Remove a book from the catalog
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book identifier, padded or raw")),
    responses(
        (status = 204, description = "Book removed"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has copies out on loan")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = ident::parse_id(&id)?;
    state.services.catalog.remove_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
