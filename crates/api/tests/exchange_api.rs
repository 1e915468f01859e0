//! HTTP-level integration tests for exchange negotiation.
//!
//! Covers eligibility, request creation guards, the accept/reject/confirm
//! state machine, the completion handshake, deletion rules and concurrent
//! transitions on the same exchange.

mod common;

use axum::http::StatusCode;
use axum::Router;
use barter_events::{ExchangeCompletedPayload, EXCHANGE_COMPLETED};
use common::{
    create_category, create_donation, create_item, create_user, delete_auth, expect_data,
    expect_error, get_auth, post_json_auth, token_for,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// Owner O lists a bicycle that accepts music or books in exchange;
/// requester R owns a guitar (music) and a ball (sports).
struct Market {
    owner_id: i64,
    owner_token: String,
    requester_id: i64,
    requester_token: String,
    outsider_token: String,
    sports: i64,
    music: i64,
    books: i64,
    bicycle: i64,
    guitar: i64,
    ball: i64,
}

async fn market(pool: &PgPool) -> Market {
    let owner = create_user(pool, "Omar").await;
    let requester = create_user(pool, "Rita").await;
    let outsider = create_user(pool, "Otto").await;

    let sports = create_category(pool, "Sports").await;
    let music = create_category(pool, "Music").await;
    let books = create_category(pool, "Books").await;

    let bicycle = create_item(pool, owner.id, sports, "Bicycle", true, vec![music, books]).await;
    let guitar = create_item(pool, requester.id, music, "Guitar", false, vec![]).await;
    let ball = create_item(pool, requester.id, sports, "Ball", false, vec![]).await;

    Market {
        owner_id: owner.id,
        owner_token: token_for(owner.id),
        requester_id: requester.id,
        requester_token: token_for(requester.id),
        outsider_token: token_for(outsider.id),
        sports,
        music,
        books,
        bicycle,
        guitar,
        ball,
    }
}

async fn request(
    app: &Router,
    token: &str,
    requested_item_id: i64,
    offered_item_id: Option<i64>,
) -> axum::response::Response {
    post_json_auth(
        app.clone(),
        "/api/v1/exchanges/request",
        json!({ "requested_item_id": requested_item_id, "offered_item_id": offered_item_id }),
        token,
    )
    .await
}

async fn decide(app: &Router, action: &str, exchange_id: i64, token: &str) -> axum::response::Response {
    post_json_auth(
        app.clone(),
        &format!("/api/v1/exchanges/{action}"),
        json!({ "exchange_id": exchange_id }),
        token,
    )
    .await
}

async fn confirm(app: &Router, exchange_id: i64, uuid: &str, token: &str) -> axum::response::Response {
    post_json_auth(
        app.clone(),
        "/api/v1/exchanges/check-uuid",
        json!({ "exchange_id": exchange_id, "exchange_uuid": uuid }),
        token,
    )
    .await
}

/// Create a pending bicycle-for-guitar exchange and return its id.
async fn pending_exchange(app: &Router, m: &Market) -> i64 {
    let data = expect_data(
        request(app, &m.requester_token, m.bicycle, Some(m.guitar)).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().unwrap()
}

/// Create and accept an exchange; returns `(exchange_id, token)`.
async fn exchanging(app: &Router, m: &Market) -> (i64, String) {
    let id = pending_exchange(app, m).await;
    let data = expect_data(decide(app, "accept", id, &m.owner_token).await, StatusCode::OK).await;
    (id, data["completion_token"].as_str().unwrap().to_string())
}

// ---------------------------------------------------------------------------
// End-to-end
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn full_exchange_consumes_both_items(pool: PgPool) {
    let m = market(&pool).await;
    let (app, bus) = common::build_test_app_with_bus(pool.clone());
    let mut events = bus.subscribe();

    // Eligibility: the guitar qualifies, the ball does not.
    let eligibility = expect_data(
        post_json_auth(
            app.clone(),
            "/api/v1/exchanges/exchange-request",
            json!({ "requested_item_id": m.bicycle }),
            &m.requester_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(eligibility["can_exchange"], true);
    assert_eq!(eligibility["offered_item_required"], true);
    let matching = eligibility["matching_items"].as_array().unwrap();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0]["id"], m.guitar);
    assert_eq!(matching[0]["category_name"], "Music");

    // Request.
    let created = expect_data(
        request(&app, &m.requester_token, m.bicycle, Some(m.guitar)).await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["status"], "pending");
    assert_eq!(created["requested_item"]["title"], "Bicycle");
    assert_eq!(created["offered_item"]["title"], "Guitar");
    assert!(created["completion_token"].is_null());

    // Accept: the owner sees the token.
    let accepted =
        expect_data(decide(&app, "accept", id, &m.owner_token).await, StatusCode::OK).await;
    assert_eq!(accepted["status"], "exchanging");
    let token = accepted["completion_token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 36);

    // Confirm by the requester.
    let completed =
        expect_data(confirm(&app, id, &token, &m.requester_token).await, StatusCode::OK).await;
    assert_eq!(completed["status"], "completed");
    assert!(completed["completion_token"].is_null());
    assert!(completed["requested_item"]["id"].is_null());
    assert_eq!(completed["requested_item"]["title"], "Bicycle");

    // Both items are gone.
    for item in [m.bicycle, m.guitar] {
        let code = expect_error(
            get_auth(app.clone(), &format!("/api/v1/items/{item}"), &m.owner_token).await,
            StatusCode::NOT_FOUND,
        )
        .await;
        assert_eq!(code, "NOT_FOUND");
    }
    // Unrelated inventory survives.
    let ball = get_auth(app.clone(), &format!("/api/v1/items/{}", m.ball), &m.owner_token).await;
    assert_eq!(ball.status(), StatusCode::OK);

    // Both parties' completed-exchange counters moved.
    for user in [m.owner_id, m.requester_id] {
        let profile = expect_data(
            get_auth(app.clone(), &format!("/api/v1/users/{user}"), &m.owner_token).await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(profile["exchange_complete_count"], 1);
    }

    // One completion event carrying both parties and both titles.
    let event = events.try_recv().expect("completion event should be published");
    assert_eq!(event.event_type, EXCHANGE_COMPLETED);
    let payload: ExchangeCompletedPayload = event.payload_as().unwrap();
    assert_eq!(payload.exchange_id, id);
    assert_eq!(payload.offered_item_title.as_deref(), Some("Guitar"));
    assert_eq!(payload.requester.email, "rita@example.com");
    assert_eq!(payload.owner.name, "Omar");
    assert!(events.try_recv().is_err());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn donation_completes_without_offered_item(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());
    let lamp = create_donation(&pool, m.owner_id, m.sports, "Lamp").await;

    let eligibility = expect_data(
        post_json_auth(
            app.clone(),
            "/api/v1/exchanges/exchange-request",
            json!({ "requested_item_id": lamp }),
            &m.outsider_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(eligibility["can_exchange"], true);
    assert_eq!(eligibility["offered_item_required"], false);

    // A supplied offer is dropped for donations.
    let created = expect_data(
        request(&app, &m.requester_token, lamp, Some(m.guitar)).await,
        StatusCode::CREATED,
    )
    .await;
    assert!(created["offered_item"].is_null());
    let id = created["id"].as_i64().unwrap();

    let accepted =
        expect_data(decide(&app, "accept", id, &m.owner_token).await, StatusCode::OK).await;
    let token = accepted["completion_token"].as_str().unwrap().to_string();

    // The owner may confirm too.
    let completed = expect_data(confirm(&app, id, &token, &m.owner_token).await, StatusCode::OK).await;
    assert_eq!(completed["status"], "completed");

    // The requester's guitar was never part of it.
    let guitar = get_auth(app, &format!("/api/v1/items/{}", m.guitar), &m.requester_token).await;
    assert_eq!(guitar.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn eligibility_without_matching_items(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());
    let skates = create_item(&pool, m.owner_id, m.music, "Skates", true, vec![m.books]).await;

    let result = expect_data(
        post_json_auth(
            app,
            "/api/v1/exchanges/exchange-request",
            json!({ "requested_item_id": skates }),
            &m.requester_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(result["can_exchange"], false);
    assert_eq!(result["matching_items"], json!([]));
    assert_eq!(result["missing_category_ids"], json!([m.books]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn eligibility_for_missing_item_is_404(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);

    let code = expect_error(
        post_json_auth(
            app,
            "/api/v1/exchanges/exchange-request",
            json!({ "requested_item_id": 999_999 }),
            &m.requester_token,
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(code, "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn require_all_categories_needs_full_coverage(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());

    // The piano only goes to someone who can offer both music and books.
    let piano = expect_data(
        post_json_auth(
            app.clone(),
            "/api/v1/items",
            json!({
                "category_id": m.sports,
                "title": "Piano",
                "is_exchangeable": true,
                "require_all_categories": true,
                "preferred_category_ids": [m.music, m.books],
            }),
            &m.owner_token,
        )
        .await,
        StatusCode::CREATED,
    )
    .await["id"]
        .as_i64()
        .unwrap();

    let eligibility = |app: Router| {
        post_json_auth(
            app,
            "/api/v1/exchanges/exchange-request",
            json!({ "requested_item_id": piano }),
            &m.requester_token,
        )
    };

    let partial = expect_data(eligibility(app.clone()).await, StatusCode::OK).await;
    assert_eq!(partial["can_exchange"], false);
    assert_eq!(partial["missing_category_ids"], json!([m.books]));

    // The guitar alone is in a preferred category but does not cover both.
    let code = expect_error(
        request(&app, &m.requester_token, piano, Some(m.guitar)).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(code, "VALIDATION_ERROR");

    create_item(&pool, m.requester_id, m.books, "Atlas", false, vec![]).await;

    let covered = expect_data(eligibility(app.clone()).await, StatusCode::OK).await;
    assert_eq!(covered["can_exchange"], true);
    assert_eq!(covered["missing_category_ids"], json!([]));

    let created = expect_data(
        request(&app, &m.requester_token, piano, Some(m.guitar)).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["status"], "pending");
}

// ---------------------------------------------------------------------------
// Creation guards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn exchangeable_item_requires_an_offer(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);

    let code = expect_error(
        request(&app, &m.requester_token, m.bicycle, None).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(code, "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cannot_request_own_item(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);

    let code = expect_error(
        request(&app, &m.owner_token, m.bicycle, Some(m.guitar)).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(code, "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn offer_must_exist_be_owned_and_qualify(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());
    let owners_book = create_item(&pool, m.owner_id, m.books, "Novel", false, vec![]).await;

    let missing = request(&app, &m.requester_token, m.bicycle, Some(999_999)).await;
    assert_eq!(expect_error(missing, StatusCode::NOT_FOUND).await, "NOT_FOUND");

    let not_owned = request(&app, &m.requester_token, m.bicycle, Some(owners_book)).await;
    assert_eq!(
        expect_error(not_owned, StatusCode::BAD_REQUEST).await,
        "VALIDATION_ERROR"
    );

    let wrong_category = request(&app, &m.requester_token, m.bicycle, Some(m.ball)).await;
    assert_eq!(
        expect_error(wrong_category, StatusCode::BAD_REQUEST).await,
        "VALIDATION_ERROR"
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn second_active_request_for_same_item_conflicts(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let first = pending_exchange(&app, &m).await;

    let code = expect_error(
        request(&app, &m.requester_token, m.bicycle, Some(m.guitar)).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(code, "CONFLICT");

    // After a rejection the requester may try again.
    decide(&app, "reject", first, &m.owner_token).await;
    let retry = request(&app, &m.requester_token, m.bicycle, Some(m.guitar)).await;
    assert_eq!(retry.status(), StatusCode::CREATED);
}

// ---------------------------------------------------------------------------
// Accept / reject
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn accepting_twice_is_invalid_state(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let (id, _) = exchanging(&app, &m).await;

    let code = expect_error(
        decide(&app, "accept", id, &m.owner_token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(code, "INVALID_STATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn only_owner_may_accept_or_reject(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let id = pending_exchange(&app, &m).await;

    for action in ["accept", "reject"] {
        for token in [&m.requester_token, &m.outsider_token] {
            let code = expect_error(decide(&app, action, id, token).await, StatusCode::FORBIDDEN).await;
            assert_eq!(code, "FORBIDDEN");
        }
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn rejected_exchange_cannot_be_accepted(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let id = pending_exchange(&app, &m).await;

    let rejected = expect_data(decide(&app, "reject", id, &m.owner_token).await, StatusCode::OK).await;
    assert_eq!(rejected["status"], "rejected");

    let code = expect_error(
        decide(&app, "accept", id, &m.owner_token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(code, "INVALID_STATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_exchange_is_404(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);

    let code = expect_error(
        decide(&app, "accept", 999_999, &m.owner_token).await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(code, "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_accepts_serialize(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let id = pending_exchange(&app, &m).await;

    let (a, b) = tokio::join!(
        decide(&app, "accept", id, &m.owner_token),
        decide(&app, "accept", id, &m.owner_token),
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);
}

// ---------------------------------------------------------------------------
// Completion handshake
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_token_is_rejected_and_exchange_stays_open(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let (id, token) = exchanging(&app, &m).await;

    let code = expect_error(
        confirm(&app, id, "00000000-0000-4000-8000-000000000000", &m.requester_token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(code, "TOKEN_MISMATCH");

    // The real token still works afterwards.
    let completed = expect_data(confirm(&app, id, &token, &m.requester_token).await, StatusCode::OK).await;
    assert_eq!(completed["status"], "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn token_from_another_exchange_does_not_match(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());
    let (id, _) = exchanging(&app, &m).await;

    let lamp = create_donation(&pool, m.owner_id, m.sports, "Lamp").await;
    let other = expect_data(request(&app, &m.requester_token, lamp, None).await, StatusCode::CREATED).await;
    let other_id = other["id"].as_i64().unwrap();
    let other_token = expect_data(decide(&app, "accept", other_id, &m.owner_token).await, StatusCode::OK)
        .await["completion_token"]
        .as_str()
        .unwrap()
        .to_string();

    let code = expect_error(
        confirm(&app, id, &other_token, &m.requester_token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(code, "TOKEN_MISMATCH");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn confirming_pending_exchange_is_invalid_state(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let id = pending_exchange(&app, &m).await;

    let code = expect_error(
        confirm(&app, id, "anything", &m.requester_token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(code, "INVALID_STATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn spent_token_cannot_be_replayed(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let (id, token) = exchanging(&app, &m).await;

    let first = confirm(&app, id, &token, &m.requester_token).await;
    assert_eq!(first.status(), StatusCode::OK);

    let code = expect_error(
        confirm(&app, id, &token, &m.owner_token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(code, "INVALID_STATE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn outsider_cannot_confirm_even_with_token(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let (id, token) = exchanging(&app, &m).await;

    let code = expect_error(
        confirm(&app, id, &token, &m.outsider_token).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(code, "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completion_rejects_competing_requests(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());

    // A third user also wants the bicycle.
    let rival = create_user(&pool, "Vera").await;
    let rival_token = token_for(rival.id);
    let record = create_item(&pool, rival.id, m.music, "Record", false, vec![]).await;
    let competing = expect_data(
        request(&app, &rival_token, m.bicycle, Some(record)).await,
        StatusCode::CREATED,
    )
    .await["id"]
        .as_i64()
        .unwrap();

    let (id, token) = exchanging(&app, &m).await;
    confirm(&app, id, &token, &m.requester_token).await;

    let outgoing = expect_data(
        get_auth(app.clone(), "/api/v1/exchanges/outgoing", &rival_token).await,
        StatusCode::OK,
    )
    .await;
    let rival_view = outgoing
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["id"] == competing)
        .unwrap();
    assert_eq!(rival_view["status"], "rejected");

    // The rival's offered record was not consumed.
    let record_response = get_auth(app, &format!("/api/v1/items/{record}"), &rival_token).await;
    assert_eq!(record_response.status(), StatusCode::OK);
}

/// Two accepted exchanges competing for the same requested item, each with
/// its own requester; returns `[(exchange_id, completion_token, requester_token)]`.
async fn rival_exchanges(
    app: &Router,
    pool: &PgPool,
    m: &Market,
    round: usize,
) -> [(i64, String, String); 2] {
    let title = format!("Tandem {round}");
    let prize = create_item(pool, m.owner_id, m.sports, &title, true, vec![m.music]).await;

    let mut rivals = Vec::new();
    for name in ["Ada", "Bo"] {
        let user = create_user(pool, &format!("{name}{round}")).await;
        let token = token_for(user.id);
        let offer = create_item(pool, user.id, m.music, "Flute", false, vec![]).await;
        let id = expect_data(request(app, &token, prize, Some(offer)).await, StatusCode::CREATED)
            .await["id"]
            .as_i64()
            .unwrap();
        let accepted =
            expect_data(decide(app, "accept", id, &m.owner_token).await, StatusCode::OK).await;
        let uuid = accepted["completion_token"].as_str().unwrap().to_string();
        rivals.push((id, uuid, token));
    }

    let second = rivals.pop().unwrap();
    let first = rivals.pop().unwrap();
    [first, second]
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_confirms_on_same_item_pick_one_winner(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());

    for round in 0..5 {
        let [(a_id, a_uuid, a_token), (b_id, b_uuid, b_token)] =
            rival_exchanges(&app, &pool, &m, round).await;

        let (a, b) = tokio::join!(
            confirm(&app, a_id, &a_uuid, &a_token),
            confirm(&app, b_id, &b_uuid, &b_token),
        );

        let mut statuses = [a.status(), b.status()];
        statuses.sort();
        assert_eq!(
            statuses,
            [StatusCode::OK, StatusCode::CONFLICT],
            "round {round}"
        );
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn request_racing_completion_never_outlives_the_item(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool.clone());
    let latecomer = create_user(&pool, "Lena").await;
    let latecomer_token = token_for(latecomer.id);
    let record = create_item(&pool, latecomer.id, m.music, "Record", false, vec![]).await;

    let (id, uuid) = exchanging(&app, &m).await;

    let (confirmed, requested) = tokio::join!(
        confirm(&app, id, &uuid, &m.requester_token),
        request(&app, &latecomer_token, m.bicycle, Some(record)),
    );
    assert_eq!(confirmed.status(), StatusCode::OK);
    assert!(
        matches!(requested.status(), StatusCode::CREATED | StatusCode::NOT_FOUND),
        "got {}",
        requested.status()
    );

    // Whichever ran first, nothing is left open on the consumed bicycle.
    let open: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM exchanges WHERE status IN ('pending', 'exchanging')",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(open, 0);
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn token_visible_only_to_owner(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let (id, token) = exchanging(&app, &m).await;

    let incoming = expect_data(
        get_auth(app.clone(), "/api/v1/exchanges/incoming", &m.owner_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(incoming[0]["id"], id);
    assert_eq!(incoming[0]["completion_token"], token.as_str());
    assert_eq!(incoming[0]["requester"]["name"], "Rita");

    let outgoing = expect_data(
        get_auth(app.clone(), "/api/v1/exchanges/outgoing", &m.requester_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(outgoing[0]["id"], id);
    assert!(outgoing[0]["completion_token"].is_null());
    assert_eq!(outgoing[0]["owner"]["name"], "Omar");

    let empty = expect_data(
        get_auth(app, "/api/v1/exchanges/incoming", &m.requester_token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(empty, json!([]));
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn either_party_may_delete_unfinished_exchange(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);

    let id = pending_exchange(&app, &m).await;
    let outsider = delete_auth(app.clone(), &format!("/api/v1/exchanges/{id}"), &m.outsider_token).await;
    assert_eq!(outsider.status(), StatusCode::FORBIDDEN);

    let by_requester =
        delete_auth(app.clone(), &format!("/api/v1/exchanges/{id}"), &m.requester_token).await;
    assert_eq!(by_requester.status(), StatusCode::NO_CONTENT);

    let again = delete_auth(app.clone(), &format!("/api/v1/exchanges/{id}"), &m.requester_token).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);

    // A rejected exchange may be cleaned up by the owner; items are untouched.
    let id = pending_exchange(&app, &m).await;
    decide(&app, "reject", id, &m.owner_token).await;
    let by_owner = delete_auth(app.clone(), &format!("/api/v1/exchanges/{id}"), &m.owner_token).await;
    assert_eq!(by_owner.status(), StatusCode::NO_CONTENT);

    let bicycle = get_auth(app, &format!("/api/v1/items/{}", m.bicycle), &m.owner_token).await;
    assert_eq!(bicycle.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn completed_exchange_cannot_be_deleted(pool: PgPool) {
    let m = market(&pool).await;
    let app = common::build_test_app(pool);
    let (id, token) = exchanging(&app, &m).await;
    confirm(&app, id, &token, &m.requester_token).await;

    let code = expect_error(
        delete_auth(app, &format!("/api/v1/exchanges/{id}"), &m.owner_token).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(code, "INVALID_STATE");
}
