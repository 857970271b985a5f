mod common;

use api::gql::build_schema;
use api::gql::domains::reservations::service::{
    self, CreateReservationParams, TimeslotRef,
};
use async_graphql::Variables;
use common::*;
use infra::repos::payments::PaymentMethod;
use serde_json::json;

const COURT_AVAILABILITY: &str = r#"
    query CourtAvailability($courtId: ID!, $date: NaiveDate!) {
        courtAvailability(courtId: $courtId, date: $date) {
            startTime
            endTime
            priceCents
            currency
            status
            timeslotId
        }
    }
"#;

const MATERIALIZE_TIMESLOTS: &str = r#"
    mutation MaterializeTimeslots($courtId: ID!, $date: NaiveDate!) {
        materializeTimeslots(courtId: $courtId, date: $date) {
            createdCount
            slots {
                startTime
                status
            }
        }
    }
"#;

#[tokio::test]
async fn test_availability_generates_grid_from_schedule() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 1);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 60, None).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-01"
    }));
    let response = execute_graphql(&schema, COURT_AVAILABILITY, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let slots = data["courtAvailability"].as_array().unwrap();
    assert_eq!(slots.len(), 2);

    assert_eq!(slots[0]["startTime"], "08:00:00");
    assert_eq!(slots[0]["endTime"], "09:00:00");
    assert_eq!(slots[1]["startTime"], "09:00:00");
    assert_eq!(slots[1]["endTime"], "10:00:00");

    for slot in slots {
        assert_eq!(slot["status"], "AVAILABLE");
        assert_eq!(slot["priceCents"], 50_000);
        assert_eq!(slot["currency"], "MXN");
        // Nothing has been booked, so no rows exist yet.
        assert!(slot["timeslotId"].is_null());
    }
}

#[tokio::test]
async fn test_availability_applies_schedule_price_override() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 2);
    create_test_schedule(&state, court_id, day, hm(18, 0), hm(20, 0), 60, Some(65_000)).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-02"
    }));
    let response = execute_graphql(&schema, COURT_AVAILABILITY, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    for slot in data["courtAvailability"].as_array().unwrap() {
        assert_eq!(slot["priceCents"], 65_000);
    }
}

#[tokio::test]
async fn test_availability_overlays_pending_hold() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let (player_id, _) = create_test_user(&state, "player").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 3);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(11, 0), 60, None).await;

    let created = service::create_reservation(
        &state.db,
        CreateReservationParams {
            user_id: player_id,
            slot: TimeslotRef::Virtual {
                court_id,
                date: day,
                start_time: hm(9, 0),
            },
            payment_method: PaymentMethod::Fiat,
        },
    )
    .await
    .unwrap();

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-03"
    }));
    let response =
        execute_graphql(&schema, COURT_AVAILABILITY, Some(variables.clone()), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let slots = data["courtAvailability"].as_array().unwrap();
    assert_eq!(slots.len(), 3);

    // The held slot reads PENDING even though its row is still 'available';
    // the hold lives on the reservation, not the slot.
    assert_eq!(slots[0]["status"], "AVAILABLE");
    assert_eq!(slots[1]["status"], "PENDING");
    assert_eq!(
        slots[1]["timeslotId"],
        created.timeslot.id.to_string()
    );
    assert_eq!(slots[2]["status"], "AVAILABLE");

    // Payment flips it to RESERVED for everyone.
    service::confirm_reservation(&state.db, created.reservation.id, player_id, false)
        .await
        .unwrap();

    let response = execute_graphql(&schema, COURT_AVAILABILITY, Some(variables), None).await;
    let data = response.data.into_json().unwrap();
    let slots = data["courtAvailability"].as_array().unwrap();
    assert_eq!(slots[1]["status"], "RESERVED");
}

#[tokio::test]
async fn test_availability_empty_without_schedule() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    // Schedule covers 2030-07-04's weekday only; query the next day.
    let day = date(2030, 7, 4);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 60, None).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-05"
    }));
    let response = execute_graphql(&schema, COURT_AVAILABILITY, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    assert_eq!(data["courtAvailability"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_availability_keeps_rows_orphaned_by_schedule_change() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let (player_id, _) = create_test_user(&state, "player").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 8);
    let schedule_id =
        create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 60, None).await;

    // Book 09:00 on the old grid so a row exists at that start.
    service::create_reservation(
        &state.db,
        CreateReservationParams {
            user_id: player_id,
            slot: TimeslotRef::Virtual {
                court_id,
                date: day,
                start_time: hm(9, 0),
            },
            payment_method: PaymentMethod::Fiat,
        },
    )
    .await
    .unwrap();

    // The club switches the day to a two-hour grid.
    sqlx::query("UPDATE schedules SET is_active = false WHERE id = $1")
        .bind(schedule_id)
        .execute(&state.db)
        .await
        .unwrap();
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 120, None).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-08"
    }));
    let response = execute_graphql(&schema, COURT_AVAILABILITY, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);

    let data = response.data.into_json().unwrap();
    let slots = data["courtAvailability"].as_array().unwrap();

    // 08:00 comes from the new grid; the 09:00 row no longer matches any
    // candidate but is still booked, so it must not vanish.
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["startTime"], "08:00:00");
    assert_eq!(slots[1]["startTime"], "09:00:00");
    assert_eq!(slots[1]["status"], "PENDING");
}

#[tokio::test]
async fn test_materialize_timeslots_is_idempotent() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, owner_claims) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 9);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 60, None).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-09"
    }));

    let response = execute_graphql(
        &schema,
        MATERIALIZE_TIMESLOTS,
        Some(variables.clone()),
        Some(owner_claims.clone()),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["materializeTimeslots"]["createdCount"], 2);
    assert_eq!(
        data["materializeTimeslots"]["slots"].as_array().unwrap().len(),
        2
    );

    // Running it again converges on the same rows.
    let response = execute_graphql(
        &schema,
        MATERIALIZE_TIMESLOTS,
        Some(variables),
        Some(owner_claims),
    )
    .await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["materializeTimeslots"]["createdCount"], 0);
    assert_eq!(
        data["materializeTimeslots"]["slots"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_concurrent_materialization_converges_on_one_row() {
    let Some(state) = try_setup().await else { return };

    let (owner_id, _) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 16);

    let slot = infra::repos::timeslots::NewTimeslot {
        court_id,
        club_id,
        date: day,
        start_time: hm(8, 0),
        end_time: hm(9, 0),
        price_cents: 50_000,
        currency: "MXN".to_string(),
    };

    let (a, b, c) = tokio::join!(
        infra::repos::timeslots::materialize(&state.db, &slot),
        infra::repos::timeslots::materialize(&state.db, &slot),
        infra::repos::timeslots::materialize(&state.db, &slot),
    );
    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

    // Everyone lands on the same persisted row.
    assert_eq!(a.id, b.id);
    assert_eq!(b.id, c.id);

    let rows = infra::repos::timeslots::list_for_court_date(&state.db, court_id, day)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_materialize_requires_owning_the_club() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let (_, other_club_claims) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;
    let day = date(2030, 7, 10);
    create_test_schedule(&state, court_id, day, hm(8, 0), hm(10, 0), 60, None).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-10"
    }));
    let response = execute_graphql(
        &schema,
        MATERIALIZE_TIMESLOTS,
        Some(variables),
        Some(other_club_claims),
    )
    .await;
    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("do not manage this club"));
}

#[tokio::test]
async fn test_materialize_without_schedule_is_an_error() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, owner_claims) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 50_000).await;

    let variables = Variables::from_json(json!({
        "courtId": court_id.to_string(),
        "date": "2030-07-11"
    }));
    let response = execute_graphql(
        &schema,
        MATERIALIZE_TIMESLOTS,
        Some(variables),
        Some(owner_claims),
    )
    .await;
    assert!(!response.errors.is_empty());
    assert!(response.errors[0].message.contains("no active schedule"));
}

#[tokio::test]
async fn test_clubs_and_courts_are_publicly_listed() {
    let Some(state) = try_setup().await else { return };
    let schema = build_schema(state.clone());

    let (owner_id, _) = create_test_user(&state, "club").await;
    let club_id = create_test_club(&state, owner_id).await;
    let court_id = create_test_court(&state, club_id, 35_000).await;

    let query = r#"
        query Club($id: ID!) {
            club(id: $id) {
                id
                name
                city
            }
        }
    "#;
    let variables = Variables::from_json(json!({ "id": club_id.to_string() }));
    let response = execute_graphql(&schema, query, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    assert_eq!(data["club"]["name"], "Test Padel Club");
    assert_eq!(data["club"]["city"], "CDMX");

    let query = r#"
        query Courts($clubId: ID!) {
            courts(clubId: $clubId) {
                id
                basePriceCents
                isActive
                club {
                    id
                }
            }
        }
    "#;
    let variables = Variables::from_json(json!({ "clubId": club_id.to_string() }));
    let response = execute_graphql(&schema, query, Some(variables), None).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.into_json().unwrap();
    let courts = data["courts"].as_array().unwrap();
    assert_eq!(courts.len(), 1);
    assert_eq!(courts[0]["id"], court_id.to_string());
    assert_eq!(courts[0]["basePriceCents"], 35_000);
    // The nested club resolves through the dataloader.
    assert_eq!(courts[0]["club"]["id"], club_id.to_string());
}
