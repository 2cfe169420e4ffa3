use std::sync::Arc;

use tablebook::config::EngineConfig;
use tablebook::engine::{is_valid_date, BookingRegistry, CancelOutcome, Confirmation, EngineError};
use tablebook::model::Category;

// ── Test infrastructure ──────────────────────────────────────

fn restaurant() -> BookingRegistry {
    BookingRegistry::new(&EngineConfig::default()).unwrap()
}

// ── Scenarios ────────────────────────────────────────────────

#[tokio::test]
async fn book_reject_cancel_rebook() {
    let reg = restaurant();

    let ana = reg.book_table("Ana", "2025-07-10", 13, 6).await.unwrap();
    assert_eq!(ana.folio(), "VX6");
    assert_eq!(ana.table().category, Category::Premium);

    let ben = reg.book_table("Ben", "2025-07-10", 13, 6).await;
    assert!(matches!(ben, Err(EngineError::SlotUnavailable { table_id: 6, hour: 13, .. })));

    let target = reg.find_reservation("2025-07-10", 13, "VX6").await.unwrap();
    assert_eq!(target, ana);

    let outcome = reg
        .cancel_reservation("2025-07-10", 13, "VX6", Confirmation::Confirmed)
        .await
        .unwrap();
    assert!(matches!(outcome, CancelOutcome::Removed(ref r) if r.customer_name() == "Ana"));

    let report = reg.list_availability("2025-07-10").await.unwrap();
    assert_eq!(report.is_free(6, 13), Some(true));
    assert!(reg.list_reservations().await.is_empty());

    let ben = reg.book_table("Ben", "2025-07-10", 13, 6).await.unwrap();
    assert_eq!(ben.folio(), "VX6");
    reg.audit().await.unwrap();
}

#[tokio::test]
async fn folios_repeat_across_slots() {
    let reg = restaurant();
    let a = reg.book_table("Ana", "2025-07-10", 13, 3).await.unwrap();
    let b = reg.book_table("Ben", "2025-07-10", 15, 3).await.unwrap();
    assert_eq!(a.folio(), "GX3");
    assert_eq!(a.folio(), b.folio());

    // the hour picks which one goes
    reg.cancel_reservation("2025-07-10", 15, "GX3", Confirmation::from(true))
        .await
        .unwrap();
    assert_eq!(reg.list_reservations().await, vec![a]);
}

#[tokio::test]
async fn reservations_keep_insertion_order() {
    let reg = restaurant();
    let mut expected = Vec::new();
    for (name, table) in [("Ana", 9), ("Ben", 1), ("Cleo", 5)] {
        expected.push(reg.book_table(name, "2025-07-10", 14, table).await.unwrap());
    }
    assert_eq!(reg.list_reservations().await, expected);
}

#[tokio::test]
async fn shared_registry_across_tasks() {
    let reg = Arc::new(restaurant());
    let mut tasks = Vec::new();
    for table in 1..=10u32 {
        for hour in 13..=16u32 {
            let reg = reg.clone();
            tasks.push(tokio::spawn(async move {
                reg.book_table("Guest", "2025-12-24", hour, table).await
            }));
        }
    }
    for t in tasks {
        t.await.unwrap().unwrap();
    }
    let report = reg.list_availability("2025-12-24").await.unwrap();
    assert!(report.tables.iter().all(|t| t.hours.iter().all(|h| !h.free)));
    assert_eq!(reg.reservation_count().await, 40);
    reg.audit().await.unwrap();
}

#[test]
fn date_predicate() {
    assert!(is_valid_date("2024-02-29"));
    assert!(!is_valid_date("2023-02-29"));
    assert!(!is_valid_date("24-02-29"));
}
