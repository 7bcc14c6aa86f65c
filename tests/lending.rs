//! Lending ledger integration tests

mod common;

use chrono::{Duration, Utc};
use common::{seed_book, seed_member, test_setup, test_setup_multi_conn};
use ilms_server::{
    error::AppError,
    models::loan::{LoanClass, LoanQuery, LoanStatus, LoanStatusFilter},
};

#[tokio::test]
async fn issuing_a_book_takes_one_copy_off_the_shelf() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 3).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services
        .lending
        .issue(member.id, book.id, None)
        .await
        .unwrap();

    assert_eq!(loan.member_id, member.id);
    assert_eq!(loan.book_id, book.id);
    assert_eq!(loan.status, LoanStatus::Borrowed);
    assert_eq!(loan.fine_cents, 0);
    assert!(loan.return_date.is_none());

    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 2);
    assert_eq!(after.total_copies, 3);
}

#[tokio::test]
async fn default_duration_sets_the_due_date() {
    let (_, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services
        .lending
        .issue(member.id, book.id, None)
        .await
        .unwrap();

    let days = loan
        .due_date
        .signed_duration_since(loan.borrow_date)
        .num_days();
    assert_eq!(days, 14);
}

#[tokio::test]
async fn on_time_return_restores_the_copy_without_a_fine() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services
        .lending
        .issue(member.id, book.id, Some(7))
        .await
        .unwrap();
    let returned = services.lending.return_loan(loan.id).await.unwrap();

    assert_eq!(returned.status, LoanStatus::Returned);
    assert_eq!(returned.fine_cents, 0);
    assert!(returned.return_date.is_some());

    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 1);
}

#[tokio::test]
async fn late_return_accrues_a_flat_daily_fine() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services
        .lending
        .issue(member.id, book.id, Some(14))
        .await
        .unwrap();

    // Push the due date 5 days into the past
    sqlx::query("UPDATE loans SET due_date = ? WHERE id = ?")
        .bind(Utc::now() - Duration::days(5))
        .bind(loan.id)
        .execute(&repo.pool)
        .await
        .unwrap();

    let returned = services.lending.return_loan(loan.id).await.unwrap();
    assert_eq!(returned.fine_cents, 500);
    assert_eq!(returned.fine_amount().to_string(), "5.00");
}

#[tokio::test]
async fn a_loan_can_only_be_returned_once() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 2).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services
        .lending
        .issue(member.id, book.id, None)
        .await
        .unwrap();
    services.lending.return_loan(loan.id).await.unwrap();

    let err = services.lending.return_loan(loan.id).await.unwrap_err();
    assert!(matches!(err, AppError::AlreadyReturned(id) if id == loan.id));

    // The copy went back on the shelf exactly once
    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 2);
}

#[tokio::test]
async fn last_copy_can_only_be_issued_once() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let alice = seed_member(&services, "Alice").await;
    let bob = seed_member(&services, "Bob").await;

    services
        .lending
        .issue(alice.id, book.id, None)
        .await
        .unwrap();
    let err = services.lending.issue(bob.id, book.id, None).await.unwrap_err();
    assert!(matches!(err, AppError::BookUnavailable(id) if id == book.id));

    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 0);
}

#[tokio::test]
async fn every_copy_can_go_out_but_no_more() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 3).await;
    let member = seed_member(&services, "Paul").await;

    for expected_left in [2, 1, 0] {
        services.lending.issue(member.id, book.id, None).await.unwrap();
        let current = repo.books.get_by_id(book.id).await.unwrap();
        assert_eq!(current.available_copies, expected_left);
    }

    let err = services.lending.issue(member.id, book.id, None).await.unwrap_err();
    assert!(matches!(err, AppError::BookUnavailable(_)));
}

#[tokio::test]
async fn concurrent_issues_never_oversell() {
    let (repo, services) = test_setup_multi_conn().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;

    let mut members = Vec::new();
    for i in 0..8 {
        members.push(seed_member(&services, &format!("Member {}", i)).await);
    }

    let mut handles = Vec::new();
    for member in &members {
        let services = services.clone();
        let member_id = member.id;
        let book_id = book.id;
        handles.push(tokio::spawn(async move {
            services.lending.issue(member_id, book_id, None).await
        }));
    }

    // Exactly one caller wins; every loser sees the typed unavailable
    // outcome, never a database error
    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::BookUnavailable(id)) => assert_eq!(id, book.id),
            Err(other) => panic!("expected BookUnavailable, got {:?}", other),
        }
    }
    assert_eq!(successes, 1);

    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 0);
}

#[tokio::test]
async fn concurrent_returns_restock_exactly_once() {
    let (repo, services) = test_setup_multi_conn().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services
        .lending
        .issue(member.id, book.id, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let services = services.clone();
        let loan_id = loan.id;
        handles.push(tokio::spawn(async move {
            services.lending.return_loan(loan_id).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::AlreadyReturned(id)) => assert_eq!(id, loan.id),
            Err(other) => panic!("expected AlreadyReturned, got {:?}", other),
        }
    }
    assert_eq!(successes, 1);

    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 1);
}

#[tokio::test]
async fn unknown_book_is_reported_before_anything_else() {
    let (_, services) = test_setup().await;

    // Neither the book nor the member exists; the book check runs first
    let err = services.lending.issue(99, 42, None).await.unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("Book")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn unknown_member_is_rejected_without_touching_the_shelf() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;

    let err = services.lending.issue(99, book.id, None).await.unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("Member")),
        other => panic!("expected NotFound, got {:?}", other),
    }

    let after = repo.books.get_by_id(book.id).await.unwrap();
    assert_eq!(after.available_copies, 1);
}

#[tokio::test]
async fn missing_book_outranks_a_bad_duration() {
    let (_, services) = test_setup().await;
    let member = seed_member(&services, "Paul").await;

    // Both preconditions fail; the book check comes first
    let err = services
        .lending
        .issue(member.id, 99, Some(0))
        .await
        .unwrap_err();
    match err {
        AppError::NotFound(msg) => assert!(msg.contains("Book")),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn zero_day_duration_is_rejected() {
    let (_, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let member = seed_member(&services, "Paul").await;

    let err = services
        .lending
        .issue(member.id, book.id, Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn copy_count_invariant_holds_across_mixed_operations() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 3).await;
    let alice = seed_member(&services, "Alice").await;
    let bob = seed_member(&services, "Bob").await;

    let l1 = services.lending.issue(alice.id, book.id, None).await.unwrap();
    let _l2 = services.lending.issue(bob.id, book.id, None).await.unwrap();
    services.lending.return_loan(l1.id).await.unwrap();
    services.lending.issue(alice.id, book.id, None).await.unwrap();

    let after = repo.books.get_by_id(book.id).await.unwrap();
    let open: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM loans WHERE book_id = ? AND status = 'borrowed'",
    )
    .bind(book.id)
    .fetch_one(&repo.pool)
    .await
    .unwrap();

    assert_eq!(after.available_copies + open, after.total_copies);
}

#[tokio::test]
async fn book_with_a_copy_out_cannot_be_removed() {
    let (_, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 1).await;
    let member = seed_member(&services, "Paul").await;

    let loan = services.lending.issue(member.id, book.id, None).await.unwrap();

    let err = services.catalog.remove_book(book.id).await.unwrap_err();
    assert!(matches!(err, AppError::ReferentialIntegrity(id) if id == book.id));

    // Once every copy is back, removal goes through and the ledger keeps
    // the returned loan
    services.lending.return_loan(loan.id).await.unwrap();
    services.catalog.remove_book(book.id).await.unwrap();

    let err = services.catalog.get_book(book.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let all = services
        .lending
        .list(&LoanQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].book_title, "(removed)");
}

#[tokio::test]
async fn loan_listing_classifies_by_lifecycle() {
    let (repo, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 3).await;
    let member = seed_member(&services, "Paul").await;

    let active = services.lending.issue(member.id, book.id, Some(14)).await.unwrap();
    let overdue = services.lending.issue(member.id, book.id, Some(14)).await.unwrap();
    let returned = services.lending.issue(member.id, book.id, Some(14)).await.unwrap();

    sqlx::query("UPDATE loans SET due_date = ? WHERE id = ?")
        .bind(Utc::now() - Duration::days(3))
        .bind(overdue.id)
        .execute(&repo.pool)
        .await
        .unwrap();
    services.lending.return_loan(returned.id).await.unwrap();

    let now = Utc::now();
    let all = services.lending.list(&LoanQuery::default()).await.unwrap();
    assert_eq!(all.len(), 3);

    let find = |id: i64| all.iter().find(|l| l.id == id).unwrap();
    assert_eq!(find(active.id).classify(now), LoanClass::Active);
    assert_eq!(
        find(overdue.id).classify(now),
        LoanClass::Overdue { days_overdue: 3 }
    );
    assert!(matches!(
        find(returned.id).classify(now),
        LoanClass::Returned { .. }
    ));

    let only_overdue = services
        .lending
        .list(&LoanQuery {
            status: Some(LoanStatusFilter::Overdue),
            search: None,
        })
        .await
        .unwrap();
    assert_eq!(only_overdue.len(), 1);
    assert_eq!(only_overdue[0].id, overdue.id);

    let by_name = services
        .lending
        .list(&LoanQuery {
            status: None,
            search: Some("Paul".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(by_name.len(), 3);
}

#[tokio::test]
async fn shrinking_total_copies_below_issued_is_rejected() {
    let (_, services) = test_setup().await;
    let book = seed_book(&services, "Dune", "978-0441013593", 3).await;
    let alice = seed_member(&services, "Alice").await;
    let bob = seed_member(&services, "Bob").await;

    services.lending.issue(alice.id, book.id, None).await.unwrap();
    services.lending.issue(bob.id, book.id, None).await.unwrap();

    let err = services
        .catalog
        .update_book(
            book.id,
            ilms_server::models::book::UpdateBook {
                total_copies: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    // Shrinking down to exactly the issued count is allowed
    let updated = services
        .catalog
        .update_book(
            book.id,
            ilms_server::models::book::UpdateBook {
                total_copies: Some(2),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.total_copies, 2);
    assert_eq!(updated.available_copies, 0);
}
