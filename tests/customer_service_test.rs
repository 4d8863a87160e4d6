//! Customer use case tests against the in-memory unit of work.
//!
//! The in-memory store journals every repository call, so these tests can
//! assert what was (and was not) touched.

use std::sync::Arc;

use northwind_sales::domain::{
    sha256_digest, CreateCustomer, CredentialHasher, GetCustomersQuery, HashScheme, Principal,
    Role, UpdateCustomer,
};
use northwind_sales::errors::AppError;
use northwind_sales::infra::{InMemoryDomainLogger, InMemoryPersistence, InMemoryStore};
use northwind_sales::services::{CustomerManager, CustomerService};

struct Harness {
    store: Arc<InMemoryStore>,
    logger: Arc<InMemoryDomainLogger>,
    service: CustomerManager<InMemoryPersistence>,
}

fn harness() -> Harness {
    let store = Arc::new(InMemoryStore::new());
    let logger = Arc::new(InMemoryDomainLogger::new());
    let service = CustomerManager::new(
        Arc::new(InMemoryPersistence::new(store.clone())),
        logger.clone(),
        CredentialHasher::new(HashScheme::Sha256),
        10,
    );
    Harness {
        store,
        logger,
        service,
    }
}

fn admin() -> Principal {
    Principal::new("a-1", "Nancy Davolio", Role::Administrator)
}

fn new_customer(n: u32) -> CreateCustomer {
    CreateCustomer {
        id: Some(format!("C{:04}", n)),
        name: format!("Customer {}", n),
        current_balance_cents: 1_000 + n as i64,
        email: format!("customer{}@demo.com", n),
        cedula: format!("{:010}", n),
        password: "Pass123!".to_string(),
        profile_picture_base64: None,
    }
}

fn update_of(request: &CreateCustomer, password: Option<&str>) -> UpdateCustomer {
    UpdateCustomer {
        customer_id: request.id.clone().unwrap_or_default(),
        name: request.name.clone(),
        current_balance_cents: 42,
        email: request.email.clone(),
        cedula: request.cedula.clone(),
        profile_picture_base64: None,
        password: password.map(str::to_string),
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_created_customer_is_readable() {
    let h = harness();
    let request = new_customer(1);

    let id = h
        .service
        .create_customer(Some(&admin()), request.clone())
        .await
        .unwrap();
    let stored = h
        .service
        .get_customer_by_id(Some(&admin()), &id)
        .await
        .unwrap()
        .expect("customer should exist");

    assert_eq!(id, "C0001");
    assert_eq!(stored.name, request.name);
    assert_eq!(stored.current_balance_cents, request.current_balance_cents);
    assert_eq!(stored.email, request.email);
    assert_eq!(stored.cedula, request.cedula);
    assert_ne!(stored.hashed_password, request.password);
    assert_eq!(stored.hashed_password, sha256_digest("Pass123!"));
    assert_eq!(
        h.logger.messages(),
        vec![
            "Starting creation of customer 'Customer 1'".to_string(),
            "Customer 'C0001' created".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_missing_code_is_generated() {
    let h = harness();
    let mut request = new_customer(2);
    request.id = None;

    let id = h.service.register_customer(request).await.unwrap();

    assert_eq!(id.len(), 10);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    assert_eq!(h.logger.entries()[0].user_name, "anonymous");
}

#[tokio::test]
async fn test_profile_picture_is_decoded_leniently() {
    let h = harness();
    let mut with_picture = new_customer(3);
    with_picture.profile_picture_base64 = Some("data:image/png;base64,AQID".to_string());
    let mut with_garbage = new_customer(4);
    with_garbage.profile_picture_base64 = Some("%%% not base64 %%%".to_string());

    let first = h
        .service
        .create_customer(Some(&admin()), with_picture)
        .await
        .unwrap();
    let second = h
        .service
        .create_customer(Some(&admin()), with_garbage)
        .await
        .unwrap();

    let first = h.service.get_customer_by_id(Some(&admin()), &first).await.unwrap().unwrap();
    let second = h.service.get_customer_by_id(Some(&admin()), &second).await.unwrap().unwrap();
    assert_eq!(first.profile_picture, Some(vec![1, 2, 3]));
    assert_eq!(second.profile_picture, None);
}

#[tokio::test]
async fn test_shared_email_yields_single_error() {
    let h = harness();
    h.service
        .create_customer(Some(&admin()), new_customer(1))
        .await
        .unwrap();

    let mut duplicate = new_customer(2);
    duplicate.email = "customer1@demo.com".to_string();
    let result = h.service.create_customer(Some(&admin()), duplicate).await;

    match result {
        Err(AppError::Invalid(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.iter().next().unwrap().field, "email");
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
    assert_eq!(h.store.customer_count(), 1);
}

// =============================================================================
// Auth gate
// =============================================================================

#[tokio::test]
async fn test_anonymous_calls_touch_nothing() {
    let h = harness();
    let request = new_customer(1);

    let create = h.service.create_customer(None, request.clone()).await;
    let update = h.service.update_customer(None, update_of(&request, None)).await;
    let list = h.service.get_customers(None, GetCustomersQuery::new(1, 10)).await;
    let by_id = h.service.get_customer_by_id(None, "C0001").await;
    let delete = h.service.delete_customer(None, "C0001").await;

    assert!(matches!(create, Err(AppError::Unauthenticated)));
    assert!(matches!(update, Err(AppError::Unauthenticated)));
    assert!(matches!(list, Err(AppError::Unauthenticated)));
    assert!(matches!(by_id, Err(AppError::Unauthenticated)));
    assert!(matches!(delete, Err(AppError::Unauthenticated)));
    assert!(h.store.operations().is_empty());
    assert!(h.logger.entries().is_empty());
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_password_handling() {
    let h = harness();
    let request = new_customer(1);
    h.service
        .create_customer(Some(&admin()), request.clone())
        .await
        .unwrap();

    let kept = h
        .service
        .update_customer(Some(&admin()), update_of(&request, Some("")))
        .await
        .unwrap();
    assert_eq!(kept.hashed_password, sha256_digest("Pass123!"));
    assert_eq!(kept.current_balance_cents, 42);

    let changed = h
        .service
        .update_customer(Some(&admin()), update_of(&request, Some("NewPass456!")))
        .await
        .unwrap();
    assert_eq!(changed.hashed_password, sha256_digest("NewPass456!"));
}

#[tokio::test]
async fn test_update_missing_customer_is_cancelled() {
    let h = harness();

    let result = h
        .service
        .update_customer(Some(&admin()), update_of(&new_customer(9), None))
        .await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert!(h.store.operations().contains(&"rollback".to_string()));
    assert_eq!(
        h.logger.messages().last().map(String::as_str),
        Some("Update of customer 'C0009' cancelled")
    );
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_pagination_contract() {
    let h = harness();

    let empty = h
        .service
        .get_customers(Some(&admin()), GetCustomersQuery::new(1, 10))
        .await
        .unwrap();
    assert!(empty.items.is_empty());
    assert!(!empty.meta.has_next_page);

    for n in 1..=25 {
        h.service
            .create_customer(Some(&admin()), new_customer(n))
            .await
            .unwrap();
    }

    let third = h
        .service
        .get_customers(Some(&admin()), GetCustomersQuery::new(3, 10))
        .await
        .unwrap();
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.meta.total_count, 25);
    assert_eq!(third.meta.total_pages, 3);
    assert!(!third.meta.has_next_page);
    assert_eq!(third.items[0].id, "C0021");

    let beyond = h
        .service
        .get_customers(Some(&admin()), GetCustomersQuery::new(4, 10))
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert!(!beyond.meta.has_next_page);
}

#[tokio::test]
async fn test_invalid_paging_is_rejected() {
    let h = harness();

    let zero_page = h
        .service
        .get_customers(Some(&admin()), GetCustomersQuery::new(0, 10))
        .await;
    let huge_page = h
        .service
        .get_customers(Some(&admin()), GetCustomersQuery::new(1, 101))
        .await;

    assert!(matches!(zero_page, Err(AppError::Invalid(_))));
    assert!(matches!(huge_page, Err(AppError::Invalid(_))));
}

#[tokio::test]
async fn test_overflowing_page_number_is_rejected() {
    let h = harness();
    h.service
        .create_customer(Some(&admin()), new_customer(1))
        .await
        .unwrap();

    let result = h
        .service
        .get_customers(Some(&admin()), GetCustomersQuery::new(u64::MAX, 10))
        .await;

    match result {
        Err(AppError::Invalid(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors.iter().next().unwrap().field, "page_number");
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

// =============================================================================
// Transactions
// =============================================================================

#[tokio::test]
async fn test_failed_commit_leaves_nothing_behind() {
    let h = harness();
    h.store.fail_commits(true);

    let result = h
        .service
        .create_customer(Some(&admin()), new_customer(1))
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
    assert_eq!(h.store.customer_count(), 0);
    let cancelled: Vec<_> = h
        .logger
        .messages()
        .into_iter()
        .filter(|m| m.ends_with("cancelled"))
        .collect();
    assert_eq!(cancelled, vec!["Creation of customer 'Customer 1' cancelled".to_string()]);
}

#[tokio::test]
async fn test_delete_removes_customer() {
    let h = harness();
    let id = h
        .service
        .create_customer(Some(&admin()), new_customer(1))
        .await
        .unwrap();

    h.service.delete_customer(Some(&admin()), &id).await.unwrap();

    assert_eq!(h.store.customer_count(), 0);
    assert!(h
        .service
        .get_customer_by_id(Some(&admin()), &id)
        .await
        .unwrap()
        .is_none());
}
