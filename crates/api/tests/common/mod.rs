use std::env;

use api::auth::Claims;
use api::AppState;
use async_graphql::{Request, Variables};
use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

/// Connect to the database named by `TEST_DATABASE_URL`, run migrations and
/// build an `AppState`. Returns `None` when the variable is unset so the
/// integration suite is skipped on machines without a test database.
pub async fn try_setup() -> Option<AppState> {
    let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping integration test");
        return None;
    };

    if env::var("JWT_SECRET").is_err() {
        env::set_var("JWT_SECRET", "integration-test-secret");
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(AppState::new(pool).expect("Failed to create AppState"))
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &async_graphql::Schema<
        api::gql::QueryRoot,
        api::gql::MutationRoot,
        api::gql::SubscriptionRoot,
    >,
    query: &str,
    variables: Option<Variables>,
    auth_claims: Option<api::auth::Claims>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    if let Some(claims) = auth_claims {
        request = request.data(claims);
    }

    schema.execute(request).await
}

/// Insert a user row and mint JWT claims for it. Emails are randomized so
/// the suite can rerun against a persistent database.
#[allow(dead_code)]
pub async fn create_test_user(state: &AppState, role: &str) -> (Uuid, Claims) {
    let email = format!("{}-{}@test.local", role, Uuid::new_v4());

    let (id,): (Uuid,) = sqlx::query_as("INSERT INTO users (email, role) VALUES ($1, $2) RETURNING id")
        .bind(&email)
        .bind(role)
        .fetch_one(&state.db)
        .await
        .expect("Failed to create test user");

    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: id.to_string(),
        email,
        role: role.to_string(),
        iat: now,
        exp: now + 3600,
    };

    (id, claims)
}

#[allow(dead_code)]
pub async fn create_test_club(state: &AppState, owner_id: Uuid) -> Uuid {
    let (id,): (Uuid,) =
        sqlx::query_as("INSERT INTO clubs (owner_id, name, city) VALUES ($1, $2, $3) RETURNING id")
            .bind(owner_id)
            .bind("Test Padel Club")
            .bind("CDMX")
            .fetch_one(&state.db)
            .await
            .expect("Failed to create test club");
    id
}

#[allow(dead_code)]
pub async fn create_test_court(state: &AppState, club_id: Uuid, base_price_cents: i32) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO courts (club_id, name, base_price_cents) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(club_id)
    .bind("Court 1")
    .bind(base_price_cents)
    .fetch_one(&state.db)
    .await
    .expect("Failed to create test court");
    id
}

/// Open the court on `date`'s weekday with slots of `slot_minutes` between
/// `open` and `close`.
#[allow(dead_code)]
pub async fn create_test_schedule(
    state: &AppState,
    court_id: Uuid,
    date: NaiveDate,
    open: NaiveTime,
    close: NaiveTime,
    slot_minutes: i32,
    price_override_cents: Option<i32>,
) -> Uuid {
    let (id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO schedules (court_id, weekday, open_time, close_time, slot_minutes, price_override_cents)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(court_id)
    .bind(infra::slots::weekday_index(date))
    .bind(open)
    .bind(close)
    .bind(slot_minutes)
    .bind(price_override_cents)
    .fetch_one(&state.db)
    .await
    .expect("Failed to create test schedule");
    id
}

#[allow(dead_code)]
pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}
