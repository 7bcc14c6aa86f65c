//! OpenAPI documentation

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::api::{auth, books, health, loans, members, reports};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ILMS API",
        version = "1.0.0",
        description = "Integrated Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Members
        members::list_members,
        members::create_member,
        members::get_member,
        // Loans
        loans::list_loans,
        loans::create_loan,
        loans::get_loan,
        loans::return_loan,
        // Stats
        reports::get_stats,
        reports::get_loan_stats,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::SearchField,
            crate::models::book::Availability,
            books::BookResponse,
            // Members
            crate::models::member::Member,
            crate::models::member::CreateMember,
            crate::models::member::MemberStatus,
            members::MemberResponse,
            // Auth
            crate::models::librarian::LibrarianProfile,
            crate::models::librarian::RegisterLibrarian,
            crate::models::librarian::LoginRequest,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanClass,
            crate::models::loan::LoanStatusFilter,
            loans::CreateLoanRequest,
            loans::LoanResponse,
            loans::LoanRecordResponse,
            // Stats
            crate::services::reports::LibrarySummary,
            crate::services::reports::LoanSummary,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Librarian accounts"),
        (name = "books", description = "Catalog management"),
        (name = "members", description = "Member registry"),
        (name = "loans", description = "Lending ledger"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
