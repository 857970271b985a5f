mod common;

use api::gql::build_schema;
use api::gql::domains::reservations::service::{
    self, CreateReservationParams, TimeslotRef,
};
use async_graphql::Variables;
use common::*;
use infra::repos::payments::PaymentMethod;
use infra::repos::{commissions, reservations};
use once_cell::sync::Lazy;
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

// The commission config is a single global row; tests that rewrite it run
// serialized so the snapshots they assert on stay deterministic.
static CONFIG_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const UPDATE_COMMISSION_CONFIG: &str = r#"
    mutation UpdateCommissionConfig($platformFeeBps: Int!, $clubFeeBps: Int!) {
        updateCommissionConfig(platformFeeBps: $platformFeeBps, clubFeeBps: $clubFeeBps) {
            id
            platformFeeBps
            clubFeeBps
            isActive
        }
    }
"#;

async fn book_slot(
    state: &api::AppState,
    user_id: Uuid,
    court_id: Uuid,
    day: chrono::NaiveDate,
    start: chrono::NaiveTime,
) -> infra::models::ReservationRow {
    service::create_reservation(
        &state.db,
        CreateReservationParams {
            user_id,
            slot: TimeslotRef::Virtual {
                court_id,
                date: day,
                start_time: start,
            },
            payment_method: PaymentMethod::Fiat,
        },
    )
    .await
    .unwrap()
    .reservation
}

#[tokio::test]
async fn test_default_split_applies_without_active_config() {
    let Some(state) = try_setup().await else { return };
    let _guard = CONFIG_LOCK.lock().await;

    let (owner_id, _) = create_test_user(&state, "club").await;
    let (player_id, _) = create_test_user(&state, "player").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let odd_court_id = create_test_court(&state, club_id, 33_333).await;
    let day = date(2030, 8, 5);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 60, None).await;
    create_test_schedule(&state, odd_court_id, day, hm(8, 0), hm(10, 0), 60, None).await;

    commissions::deactivate_all(&state.db).await.unwrap();

    // 10% platform / 90% club fallback.
    let reservation = book_slot(&state, player_id, court_id, day, hm(8, 0)).await;
    assert_eq!(reservation.platform_fee_cents, 5_000);
    assert_eq!(reservation.club_fee_cents, 45_000);
    assert!(reservation.commission_id.is_none());

    // Odd totals round half-up on the platform side and the club side
    // absorbs the remainder, so the parts always sum to the price.
    let odd = book_slot(&state, player_id, odd_court_id, day, hm(8, 0)).await;
    assert_eq!(odd.platform_fee_cents, 3_333);
    assert_eq!(odd.club_fee_cents, 30_000);
}

#[tokio::test]
async fn test_active_config_is_frozen_onto_reservations() {
    let Some(state) = try_setup().await else { return };
    let _guard = CONFIG_LOCK.lock().await;
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let (player_id, _) = create_test_user(&state, "player").await;
    let (_, admin_claims) = create_test_user(&state, "admin").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 8, 6);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(12, 0), 60, None).await;

    commissions::deactivate_all(&state.db).await.unwrap();
    let config = commissions::insert_active(&state.db, 2_000, 8_000).await.unwrap();

    let first = book_slot(&state, player_id, court_id, day, hm(8, 0)).await;
    assert_eq!(first.platform_fee_cents, 10_000);
    assert_eq!(first.club_fee_cents, 40_000);
    assert_eq!(first.commission_id, Some(config.id));

    // Swap the split. Only bookings made from now on see it.
    let variables = Variables::from_json(json!({ "platformFeeBps": 3_000, "clubFeeBps": 7_000 }));
    let response = execute_graphql(
        &schema,
        UPDATE_COMMISSION_CONFIG,
        Some(variables),
        Some(admin_claims),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["updateCommissionConfig"]["platformFeeBps"], 3_000);
    assert_eq!(data["updateCommissionConfig"]["isActive"], true);

    let second = book_slot(&state, player_id, court_id, day, hm(9, 0)).await;
    assert_eq!(second.platform_fee_cents, 15_000);
    assert_eq!(second.club_fee_cents, 35_000);

    // The earlier booking keeps the split it was sold under.
    let first_again = reservations::get_by_id(&state.db, first.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first_again.platform_fee_cents, 10_000);
    assert_eq!(first_again.commission_id, Some(config.id));
}

#[tokio::test]
async fn test_update_commission_config_validates_split() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (_, admin_claims) = create_test_user(&state, "admin").await;

    let variables = Variables::from_json(json!({ "platformFeeBps": 3_000, "clubFeeBps": 8_000 }));
    let response = execute_graphql(
        &schema,
        UPDATE_COMMISSION_CONFIG,
        Some(variables),
        Some(admin_claims),
    )
    .await;
    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("sum to 10000"));
}

#[tokio::test]
async fn test_update_commission_config_is_admin_only() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (_, club_claims) = create_test_user(&state, "club").await;

    let variables = Variables::from_json(json!({ "platformFeeBps": 1_000, "clubFeeBps": 9_000 }));
    let response = execute_graphql(
        &schema,
        UPDATE_COMMISSION_CONFIG,
        Some(variables),
        Some(club_claims),
    )
    .await;
    assert!(!response.errors.is_empty());
    assert!(response.errors[0]
        .message
        .contains("Administrator privileges required"));
}

#[tokio::test]
async fn test_active_commission_visible_to_club_role() {
    let Some(state) = try_setup().await else { return };
    let _guard = CONFIG_LOCK.lock().await;
    let schema = build_schema(state.clone());

    let (_, club_claims) = create_test_user(&state, "club").await;

    commissions::deactivate_all(&state.db).await.unwrap();
    commissions::insert_active(&state.db, 1_500, 8_500).await.unwrap();

    let query = r#"
        query {
            activeCommission {
                platformFeeBps
                clubFeeBps
                isActive
            }
        }
    "#;
    let response = execute_graphql(&schema, query, None, Some(club_claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["activeCommission"]["platformFeeBps"], 1_500);
    assert_eq!(data["activeCommission"]["clubFeeBps"], 8_500);

    // Anonymous callers get nothing.
    let anon = execute_graphql(&schema, query, None, None).await;
    assert!(!anon.errors.is_empty());
}

#[tokio::test]
async fn test_club_commission_stats_cover_paid_rows_only() {
    let Some(state) = try_setup().await else { return };
    let _guard = CONFIG_LOCK.lock().await;
    let schema = build_schema(state.clone());

    let (owner_id, owner_claims) = create_test_user(&state, "club").await;
    let (player_id, _) = create_test_user(&state, "player").await;
    let (_, stranger_claims) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 8, 7);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(12, 0), 60, None).await;

    commissions::deactivate_all(&state.db).await.unwrap();

    // Two paid bookings and one pending hold; only the paid ones count.
    for start in [hm(8, 0), hm(9, 0)] {
        let reservation = book_slot(&state, player_id, court_id, day, start).await;
        service::confirm_reservation(&state.db, reservation.id, player_id, false)
            .await
            .unwrap();
    }
    book_slot(&state, player_id, court_id, day, hm(10, 0)).await;

    let query = r#"
        query ClubStats($clubId: ID!) {
            clubCommissionStats(clubId: $clubId) {
                reservationCount
                grossCents
                platformFeeCents
                clubFeeCents
            }
        }
    "#;
    let variables = Variables::from_json(json!({ "clubId": club_id.to_string() }));

    let response =
        execute_graphql(&schema, query, Some(variables.clone()), Some(owner_claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let stats = &data["clubCommissionStats"];
    assert_eq!(stats["reservationCount"], 2);
    assert_eq!(stats["grossCents"], 100_000);
    assert_eq!(stats["platformFeeCents"], 10_000);
    assert_eq!(stats["clubFeeCents"], 90_000);

    // A different club owner cannot read this club's ledger.
    let denied = execute_graphql(&schema, query, Some(variables), Some(stranger_claims)).await;
    assert!(!denied.errors.is_empty());
}

#[tokio::test]
async fn test_platform_wide_stats_are_admin_only() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (_, admin_claims) = create_test_user(&state, "admin").await;
    let (_, player_claims) = create_test_user(&state, "player").await;

    let query = r#"
        query {
            commissionStats {
                reservationCount
                grossCents
            }
        }
    "#;

    let response = execute_graphql(&schema, query, None, Some(admin_claims)).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert!(data["commissionStats"]["reservationCount"].as_i64().unwrap() >= 0);

    let denied = execute_graphql(&schema, query, None, Some(player_claims)).await;
    assert!(!denied.errors.is_empty());
}
