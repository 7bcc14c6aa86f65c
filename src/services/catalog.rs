//! Catalog service for book management

use validator::Validate;

use crate::{
    error::AppResult,
    models::book::{Book, BookQuery, CreateBook, UpdateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn add_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        self.repository.books.create(&book).await
    }

    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn update_book(&self, id: i64, changes: UpdateBook) -> AppResult<Book> {
        changes.validate()?;
        self.repository.books.update(id, &changes).await
    }

    pub async fn remove_book(&self, id: i64) -> AppResult<()> {
        self.repository.books.remove(id).await
    }

    pub async fn search(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        self.repository.books.search(query).await
    }
}
