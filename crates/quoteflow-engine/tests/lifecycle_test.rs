//! Status lifecycle, deletion and duplication tests.

mod common;

use common::{actor, create_input, line, seed_product, test_engine};
use chrono::{Datelike, Utc};
use quoteflow_core::types::Quotation;
use quoteflow_core::QuotationStatus;
use quoteflow_engine::{Engine, ErrorCode};

async fn draft_quotation(engine: &Engine) -> Quotation {
    let product = seed_product(engine, "BAS-201", "Orion Counter Basin", 100000).await;
    engine
        .quotations()
        .create(
            &actor(),
            create_input("Sharma Constructions", vec![line(&product.id, 2)]),
        )
        .await
        .unwrap()
}

// ============================================================================
// Transitions
// ============================================================================

#[tokio::test]
async fn test_full_happy_path_draft_to_converted() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    for (to, expected_history) in [
        (QuotationStatus::Sent, 1),
        (QuotationStatus::Approved, 2),
        (QuotationStatus::Converted, 3),
    ] {
        let updated = engine
            .quotations()
            .change_status(&actor(), &quotation.id, to, None)
            .await
            .unwrap();
        assert_eq!(updated.status, to);
        assert_eq!(updated.status_history.len(), expected_history);
        assert_eq!(updated.status_history.last().unwrap().status, to);
    }
}

#[tokio::test]
async fn test_sent_can_revert_to_draft() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Sent, None)
        .await
        .unwrap();
    let reverted = engine
        .quotations()
        .change_status(
            &actor(),
            &quotation.id,
            QuotationStatus::Draft,
            Some("customer asked for revisions".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(reverted.status, QuotationStatus::Draft);
    assert_eq!(reverted.status_history.len(), 2);
    assert_eq!(
        reverted.status_history[1].notes,
        "customer asked for revisions"
    );
}

#[tokio::test]
async fn test_draft_cannot_jump_to_approved() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    let err = engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Approved, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
    assert_eq!(err.message, "Cannot change status from draft to approved");

    // document untouched
    let reloaded = engine.quotations().get(&quotation.id).await.unwrap();
    assert_eq!(reloaded.status, QuotationStatus::Draft);
    assert!(reloaded.status_history.is_empty());
}

#[tokio::test]
async fn test_terminal_states_refuse_all_transitions() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Sent, None)
        .await
        .unwrap();
    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Rejected, None)
        .await
        .unwrap();

    for to in [
        QuotationStatus::Draft,
        QuotationStatus::Sent,
        QuotationStatus::Approved,
        QuotationStatus::Converted,
        QuotationStatus::Expired,
    ] {
        let err = engine
            .quotations()
            .change_status(&actor(), &quotation.id, to, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    let reloaded = engine.quotations().get(&quotation.id).await.unwrap();
    assert_eq!(reloaded.status, QuotationStatus::Rejected);
    assert_eq!(reloaded.status_history.len(), 2);
}

#[tokio::test]
async fn test_expired_is_not_reachable_via_change_status() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    let err = engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Expired, None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTransition);
}

#[tokio::test]
async fn test_default_history_note() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    let updated = engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Sent, None)
        .await
        .unwrap();
    let entry = &updated.status_history[0];
    assert_eq!(entry.notes, "Status changed to sent");
    assert_eq!(entry.changed_by, "user-1");
    assert_eq!(entry.changed_by_name, "Asha Iyer");
}

// ============================================================================
// Deletion
// ============================================================================

#[tokio::test]
async fn test_delete_draft_only() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Sent, None)
        .await
        .unwrap();

    let err = engine.quotations().delete(&quotation.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    assert!(engine.quotations().get(&quotation.id).await.is_ok());

    // back to draft, deletion succeeds
    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Draft, None)
        .await
        .unwrap();
    engine.quotations().delete(&quotation.id).await.unwrap();

    let err = engine.quotations().get(&quotation.id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let engine = test_engine().await;
    let err = engine.quotations().delete("no-such-id").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// ============================================================================
// Duplication
// ============================================================================

#[tokio::test]
async fn test_duplicate_resets_lifecycle_and_keeps_content() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    // take the source all the way to approved
    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Sent, None)
        .await
        .unwrap();
    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Approved, None)
        .await
        .unwrap();

    let copy = engine
        .quotations()
        .duplicate(&actor(), &quotation.id)
        .await
        .unwrap();

    assert_eq!(copy.status, QuotationStatus::Draft);
    assert!(copy.status_history.is_empty());
    assert!(copy.email_history.is_empty());
    assert_ne!(copy.id, quotation.id);
    assert_ne!(copy.quotation_number, quotation.quotation_number);

    let year = Utc::now().year();
    assert!(copy.quotation_number.starts_with(&format!("QT-{year}-")));

    // same content by value, fresh line ids
    assert_eq!(copy.customer, quotation.customer);
    assert_eq!(copy.line_items.len(), quotation.line_items.len());
    assert_eq!(
        copy.line_items[0].product_code,
        quotation.line_items[0].product_code
    );
    assert_ne!(copy.line_items[0].id, quotation.line_items[0].id);
    assert_eq!(copy.grand_total_paise, quotation.grand_total_paise);

    // source untouched
    let source = engine.quotations().get(&quotation.id).await.unwrap();
    assert_eq!(source.status, QuotationStatus::Approved);
    assert_eq!(source.status_history.len(), 2);
}

#[tokio::test]
async fn test_duplicate_missing_is_not_found() {
    let engine = test_engine().await;
    let err = engine
        .quotations()
        .duplicate(&actor(), "no-such-id")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);
}

// ============================================================================
// Email Audit
// ============================================================================

#[tokio::test]
async fn test_record_email_sent_appends_log() {
    let engine = test_engine().await;
    let quotation = draft_quotation(&engine).await;

    let updated = engine
        .quotations()
        .record_email_sent(&actor(), &quotation.id, "Accounts@Sharma.IN")
        .await
        .unwrap();

    assert_eq!(updated.email_history.len(), 1);
    assert_eq!(updated.email_history[0].sent_to, "accounts@sharma.in");
    assert_eq!(updated.email_history[0].sent_by, "user-1");

    let err = engine
        .quotations()
        .record_email_sent(&actor(), &quotation.id, "   ")
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}
