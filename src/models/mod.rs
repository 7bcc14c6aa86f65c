//! Data models for the ILMS server

pub mod book;
pub mod librarian;
pub mod loan;
pub mod member;

// Re-export commonly used types
pub use book::{Availability, Book, BookQuery, CreateBook, SearchField, UpdateBook};
pub use librarian::{Librarian, LibrarianProfile, RegisterLibrarian};
pub use loan::{IssueLoan, Loan, LoanClass, LoanQuery, LoanRecord, LoanStatus, LoanStatusFilter};
pub use member::{CreateMember, Member, MemberQuery, MemberStatus};
