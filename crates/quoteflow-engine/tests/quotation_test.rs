//! Quotation creation, pricing and listing tests.

mod common;

use common::{actor, create_input, customer, line, seed_product, test_engine};
use chrono::{Datelike, Duration, Utc};
use quoteflow_core::types::Discount;
use quoteflow_core::QuotationStatus;
use quoteflow_engine::types::{CreateQuotationInput, LineItemInput, ListQuery, UpdateQuotationInput};
use quoteflow_engine::ErrorCode;

// ============================================================================
// Create + Pricing
// ============================================================================

#[tokio::test]
async fn test_create_computes_all_totals() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    // ₹1,000 × 3 with a 10% line discount, default 18% GST
    let quotation = engine
        .quotations()
        .create(
            &actor(),
            create_input(
                "Sharma Constructions",
                vec![LineItemInput {
                    discount: Some(Discount::Percentage(1000)),
                    ..line(&product.id, 3)
                }],
            ),
        )
        .await
        .unwrap();

    let item = &quotation.line_items[0];
    assert_eq!(item.line_subtotal_paise, 300000);
    assert_eq!(item.line_total_paise, 270000);

    assert_eq!(quotation.subtotal_paise, 270000);
    assert_eq!(quotation.amount_after_discount_paise, 270000);
    assert_eq!(quotation.tax_rate_bps, 1800);
    assert_eq!(quotation.tax_amount_paise, 48600);
    assert_eq!(quotation.grand_total_paise, 318600);

    assert_eq!(quotation.status, QuotationStatus::Draft);
    assert!(quotation.status_history.is_empty());
}

#[tokio::test]
async fn test_overall_fixed_discount_applies_after_line_discounts() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    let quotation = engine
        .quotations()
        .create(
            &actor(),
            CreateQuotationInput {
                overall_discount: Some(Discount::Fixed(20000)),
                ..create_input(
                    "Sharma Constructions",
                    vec![LineItemInput {
                        discount: Some(Discount::Percentage(1000)),
                        ..line(&product.id, 3)
                    }],
                )
            },
        )
        .await
        .unwrap();

    // 2700.00 − 200.00 = 2500.00; 18% = 450.00; total 2950.00
    assert_eq!(quotation.subtotal_paise, 270000);
    assert_eq!(quotation.amount_after_discount_paise, 250000);
    assert_eq!(quotation.tax_amount_paise, 45000);
    assert_eq!(quotation.grand_total_paise, 295000);
}

#[tokio::test]
async fn test_create_snapshots_product_and_defaults() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    let before = Utc::now();
    let quotation = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 1)]))
        .await
        .unwrap();

    // number format: QT-<year>-NNNN, first of the year-scoped sequence
    let year = Utc::now().year();
    assert_eq!(quotation.quotation_number, format!("QT-{year}-0001"));

    // snapshot fields come from the product
    let item = &quotation.line_items[0];
    assert_eq!(item.product_code, "BAS-201");
    assert_eq!(item.product_name, "Orion Counter Basin");
    assert_eq!(item.unit_price_paise, 100000);
    assert_eq!(item.unit, "pcs");

    // 30-day default validity window
    let expected = before + Duration::days(30);
    let delta = quotation.valid_until - expected;
    assert!(delta.num_minutes().abs() < 5);

    // commercial term defaults
    assert_eq!(quotation.currency, "INR");
    assert_eq!(quotation.payment_terms, "100% advance payment");
    assert_eq!(quotation.created_by, "user-1");
}

#[tokio::test]
async fn test_snapshot_survives_product_edits() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    let quotation = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 1)]))
        .await
        .unwrap();

    // Rename + reprice the product after the quotation exists
    engine
        .products()
        .update(
            &product.id,
            quoteflow_engine::types::UpdateProductInput {
                name: Some("Renamed Basin".to_string()),
                selling_price_paise: Some(999900),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let reloaded = engine.quotations().get(&quotation.id).await.unwrap();
    assert_eq!(reloaded.line_items[0].product_name, "Orion Counter Basin");
    assert_eq!(reloaded.line_items[0].unit_price_paise, 100000);
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    // quantity < 1
    let err = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 0)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // negative unit price override
    let err = engine
        .quotations()
        .create(
            &actor(),
            create_input(
                "Sharma Constructions",
                vec![LineItemInput {
                    unit_price_paise: Some(-1),
                    ..line(&product.id, 1)
                }],
            ),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // missing customer name
    let err = engine
        .quotations()
        .create(&actor(), create_input("   ", vec![line(&product.id, 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);

    // nothing was written
    let page = engine.quotations().list(ListQuery::default()).await.unwrap();
    assert_eq!(page.pagination.total_items, 0);
}

#[tokio::test]
async fn test_create_with_unknown_product_is_not_found() {
    let engine = test_engine().await;

    let err = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line("missing-id", 1)]))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::NotFound);

    let page = engine.quotations().list(ListQuery::default()).await.unwrap();
    assert_eq!(page.pagination.total_items, 0);
}

#[tokio::test]
async fn test_color_price_override_used_for_variant_lines() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;
    engine
        .products()
        .update(
            &product.id,
            quoteflow_engine::types::UpdateProductInput {
                price_by_color: Some(vec![quoteflow_core::types::ColorPrice {
                    color: "Ivory".to_string(),
                    price_paise: 110000,
                }]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let quotation = engine
        .quotations()
        .create(
            &actor(),
            create_input(
                "Sharma Constructions",
                vec![LineItemInput {
                    variant: Some(quoteflow_core::types::VariantChoice {
                        color: Some("Ivory".to_string()),
                        ..Default::default()
                    }),
                    ..line(&product.id, 2)
                }],
            ),
        )
        .await
        .unwrap();

    assert_eq!(quotation.line_items[0].unit_price_paise, 110000);
    assert_eq!(quotation.line_items[0].line_subtotal_paise, 220000);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_update_recomputes_totals() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    let quotation = engine
        .quotations()
        .create(
            &actor(),
            create_input(
                "Sharma Constructions",
                vec![LineItemInput {
                    discount: Some(Discount::Percentage(1000)),
                    ..line(&product.id, 3)
                }],
            ),
        )
        .await
        .unwrap();

    let updated = engine
        .quotations()
        .update(
            &quotation.id,
            UpdateQuotationInput {
                overall_discount: Some(Discount::Fixed(20000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.amount_after_discount_paise, 250000);
    assert_eq!(updated.tax_amount_paise, 45000);
    assert_eq!(updated.grand_total_paise, 295000);

    // and the persisted copy agrees
    let reloaded = engine.quotations().get(&quotation.id).await.unwrap();
    assert_eq!(reloaded.grand_total_paise, 295000);
}

#[tokio::test]
async fn test_update_allowed_for_sent_but_not_approved() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;
    let quotation = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 1)]))
        .await
        .unwrap();

    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Sent, None)
        .await
        .unwrap();

    // sent: document-level update still allowed
    let updated = engine
        .quotations()
        .update(
            &quotation.id,
            UpdateQuotationInput {
                customer: Some(customer("Mehta Interiors")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.customer.name, "Mehta Interiors");

    engine
        .quotations()
        .change_status(&actor(), &quotation.id, QuotationStatus::Approved, None)
        .await
        .unwrap();

    // approved: frozen
    let err = engine
        .quotations()
        .update(
            &quotation.id,
            UpdateQuotationInput {
                customer: Some(customer("Someone Else")),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
}

// ============================================================================
// Listing + Stats
// ============================================================================

#[tokio::test]
async fn test_list_filters_by_status_and_customer() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    let first = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 1)]))
        .await
        .unwrap();
    engine
        .quotations()
        .create(&actor(), create_input("Mehta Interiors", vec![line(&product.id, 2)]))
        .await
        .unwrap();
    engine
        .quotations()
        .change_status(&actor(), &first.id, QuotationStatus::Sent, None)
        .await
        .unwrap();

    let page = engine
        .quotations()
        .list(ListQuery {
            status: Some(QuotationStatus::Sent),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total_items, 1);
    assert_eq!(page.items[0].id, first.id);

    let page = engine
        .quotations()
        .list(ListQuery {
            customer: Some("mehta".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total_items, 1);
    assert_eq!(page.items[0].customer.name, "Mehta Interiors");

    // free-text search by quotation number suffix
    let page = engine
        .quotations()
        .list(ListQuery {
            search: Some("0002".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.pagination.total_items, 1);
}

#[tokio::test]
async fn test_list_rejects_unknown_sort_field() {
    let engine = test_engine().await;
    let err = engine
        .quotations()
        .list(ListQuery {
            sort: Some("nope".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

#[tokio::test]
async fn test_stats_rolls_up_by_status() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;

    let first = engine
        .quotations()
        .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 1)]))
        .await
        .unwrap();
    engine
        .quotations()
        .create(&actor(), create_input("Mehta Interiors", vec![line(&product.id, 1)]))
        .await
        .unwrap();
    engine
        .quotations()
        .change_status(&actor(), &first.id, QuotationStatus::Sent, None)
        .await
        .unwrap();

    let stats = engine.quotations().stats().await.unwrap();
    assert_eq!(stats.total_quotations, 2);
    assert_eq!(stats.draft_quotations, 1);
    assert_eq!(stats.sent_quotations, 1);
    assert_eq!(stats.approved_quotations, 0);
    assert_eq!(stats.recent_quotations.len(), 2);

    let draft_value = stats
        .value_by_status
        .iter()
        .find(|v| v.status == QuotationStatus::Draft)
        .unwrap();
    assert_eq!(draft_value.count, 1);
    assert_eq!(draft_value.total_paise, 118000); // 1000.00 + 18% GST
}

// ============================================================================
// Numbering
// ============================================================================

#[tokio::test]
async fn test_numbers_are_sequential_within_a_year() {
    let engine = test_engine().await;
    let product = seed_product(&engine, "BAS-201", "Orion Counter Basin", 100000).await;
    let year = Utc::now().year();

    for expected_seq in 1..=3 {
        let quotation = engine
            .quotations()
            .create(&actor(), create_input("Sharma Constructions", vec![line(&product.id, 1)]))
            .await
            .unwrap();
        assert_eq!(
            quotation.quotation_number,
            format!("QT-{year}-{expected_seq:04}")
        );
    }
}
