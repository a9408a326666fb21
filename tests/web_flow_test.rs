//! End-to-end tests of the design and order flows over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use serde_json::{json, Value};
use taco_cloud::data::{connect_in_memory, OrderRepository, RepositoryError};
use taco_cloud::lifecycle::TacoCloud;
use taco_cloud::model::TacoOrder;
use taco_cloud::web::{create_router, AppState};
use tower::ServiceExt; // for `oneshot`

async fn start() -> TacoCloud {
    let pool = connect_in_memory().await.unwrap();
    TacoCloud::with_pool(pool, 16, Some(Duration::from_secs(1800))).await.unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// The `name=value` part of the response's `Set-Cookie` header.
fn session_cookie(response: &Response<Body>) -> String {
    let value = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap();
    value.split(';').next().unwrap().to_string()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
}

fn has_error(view: &Value, field: &str) -> bool {
    view["errors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e["field"] == field)
}

fn valid_order_form() -> Value {
    json!({
        "delivery_name": "Ana Torres",
        "delivery_street": "1 Elm St",
        "delivery_city": "Springfield",
        "delivery_state": "IL",
        "delivery_zip": "62701",
        "cc_number": "4111111111111111",
        "cc_expiration": "12/30",
        "cc_cvv": "123"
    })
}

async fn order_count(app: &TacoCloud) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM Taco_Order")
        .fetch_one(app.pool())
        .await
        .unwrap()
}

/// Opens a session and adds one valid taco to it; returns the cookie.
async fn session_with_taco(router: &Router) -> String {
    let response = send(router, get("/design", None)).await;
    let cookie = session_cookie(&response);

    let response = send(
        router,
        post(
            "/design",
            Some(&cookie),
            json!({ "name": "Carnitas Supreme", "ingredients": ["COTO", "CARN", "SLSA"] }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    cookie
}

#[tokio::test]
async fn test_home_and_health() {
    let app = start().await;
    let router = app.router();

    let response = send(&router, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");

    let response = send(&router, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["links"]["design"], "/design");
}

#[tokio::test]
async fn test_design_form_groups_ingredients_and_sets_cookie() {
    let app = start().await;
    let router = app.router();

    let response = send(&router, get("/design", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(session_cookie(&response).starts_with("taco_session="));

    let view = json_body(response).await;
    let groups = &view["ingredients"];
    let ids = |kind: &str| -> Vec<String> {
        groups[kind]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(ids("wrap"), vec!["FLTO", "COTO"]);
    assert_eq!(ids("protein"), vec!["GRBF", "CARN"]);
    assert_eq!(ids("veggies"), vec!["TMTO", "LETC"]);
    assert_eq!(ids("cheese"), vec!["CHED", "JACK"]);
    assert_eq!(ids("sauce"), vec!["SLSA", "SRCR"]);
    assert_eq!(groups["sauce"][0]["type"], "SAUCE");
    assert!(view["taco_order"]["tacos"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_taco_is_rejected_and_design_kept() {
    let app = start().await;
    let router = app.router();
    let cookie = session_cookie(&send(&router, get("/design", None)).await);

    let response = send(
        &router,
        post("/design", Some(&cookie), json!({ "name": "Taco", "ingredients": ["FLTO"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view = json_body(response).await;
    assert!(has_error(&view, "name"));
    assert!(!has_error(&view, "ingredients"));
    assert!(view["taco_order"]["tacos"].as_array().unwrap().is_empty());

    let view = json_body(send(&router, get("/design", Some(&cookie))).await).await;
    assert_eq!(view["taco"]["name"], "Taco");
    assert_eq!(view["taco"]["ingredients"], json!(["FLTO"]));
}

#[tokio::test]
async fn test_unknown_ingredient_ids_are_dropped() {
    let app = start().await;
    let router = app.router();
    let cookie = session_cookie(&send(&router, get("/design", None)).await);

    let response = send(
        &router,
        post("/design", Some(&cookie), json!({ "name": "Mystery Taco", "ingredients": ["XXXX"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let view = json_body(response).await;
    assert!(has_error(&view, "ingredients"));
    assert!(!has_error(&view, "name"));
}

#[tokio::test]
async fn test_taco_name_is_checked_as_submitted() {
    let app = start().await;
    let router = app.router();
    let cookie = session_cookie(&send(&router, get("/design", None)).await);

    for name in ["Tac  ", "  Taco"] {
        let response = send(
            &router,
            post("/design", Some(&cookie), json!({ "name": name, "ingredients": ["FLTO"] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "name {name:?}");
    }

    let view = json_body(send(&router, get("/orders/current", Some(&cookie))).await).await;
    assert_eq!(view["taco_order"]["tacos"][0]["name"], "Tac  ");
    assert_eq!(view["taco_order"]["tacos"][1]["name"], "  Taco");
}

#[tokio::test]
async fn test_valid_taco_redirects_to_current_order() {
    let app = start().await;
    let router = app.router();
    let cookie = session_cookie(&send(&router, get("/design", None)).await);

    let response = send(
        &router,
        post(
            "/design",
            Some(&cookie),
            json!({ "name": "Veggie Taco", "ingredients": ["FLTO", "XXXX", "LETC", "CHED"] }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders/current");

    let view = json_body(send(&router, get("/orders/current", Some(&cookie))).await).await;
    let tacos = view["taco_order"]["tacos"].as_array().unwrap();
    assert_eq!(tacos.len(), 1);
    assert_eq!(tacos[0]["name"], "Veggie Taco");
    assert_eq!(
        tacos[0]["ingredients"],
        json!([
            { "ingredient_id": "FLTO" },
            { "ingredient_id": "LETC" },
            { "ingredient_id": "CHED" }
        ])
    );
    assert!(view["taco_order"]["id"].is_null());
}

#[tokio::test]
async fn test_empty_delivery_name_is_rejected_without_persisting() {
    let app = start().await;
    let router = app.router();
    let cookie = session_with_taco(&router).await;

    let mut form = valid_order_form();
    form["delivery_name"] = json!("");
    let response = send(&router, post("/orders", Some(&cookie), form)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let view = json_body(response).await;
    assert!(has_error(&view, "delivery_name"));
    assert!(!has_error(&view, "cc_number"));
    assert!(view["taco_order"]["id"].is_null());
    assert_eq!(view["taco_order"]["delivery_city"], "Springfield");
    assert_eq!(order_count(&app).await, 0);

    // Still in session and resubmittable.
    let view = json_body(send(&router, get("/orders/current", Some(&cookie))).await).await;
    assert_eq!(view["taco_order"]["tacos"].as_array().unwrap().len(), 1);
    assert_eq!(view["taco_order"]["delivery_street"], "1 Elm St");

    let response = send(&router, post("/orders", Some(&cookie), valid_order_form())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(order_count(&app).await, 1);
}

#[tokio::test]
async fn test_order_without_tacos_is_rejected() {
    let app = start().await;
    let router = app.router();

    let response = send(&router, post("/orders", None, valid_order_form())).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(has_error(&json_body(response).await, "tacos"));
    assert_eq!(order_count(&app).await, 0);
}

#[tokio::test]
async fn test_placed_order_is_persisted_and_session_discarded() {
    let app = start().await;
    let router = app.router();
    let cookie = session_with_taco(&router).await;

    let response = send(
        &router,
        post(
            "/design",
            Some(&cookie),
            json!({ "name": "Veggie Taco", "ingredients": ["FLTO", "LETC", "CHED"] }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(&router, post("/orders", Some(&cookie), valid_order_form())).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let order_id: i64 = sqlx::query_scalar("SELECT id FROM Taco_Order")
        .fetch_one(app.pool())
        .await
        .unwrap();
    let response = send(&router, get(&format!("/orders/{order_id}"), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let order = json_body(response).await;
    assert_eq!(order["id"], order_id);
    assert_eq!(order["delivery_name"], "Ana Torres");
    assert!(!order["placed_at"].is_null());
    let names: Vec<&str> = order["tacos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Carnitas Supreme", "Veggie Taco"]);
    assert_eq!(order["tacos"][0]["ingredients"][1]["ingredient_id"], "CARN");

    // The old cookie now starts a fresh draft.
    let response = send(&router, get("/orders/current", Some(&cookie))).await;
    assert_ne!(session_cookie(&response), cookie);
    let view = json_body(response).await;
    assert!(view["taco_order"]["tacos"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submits_place_one_order() {
    let app = start().await;
    let router = app.router();
    let cookie = session_with_taco(&router).await;

    let (first, second) = tokio::join!(
        send(&router, post("/orders", Some(&cookie), valid_order_form())),
        send(&router, post("/orders", Some(&cookie), valid_order_form())),
    );
    let mut statuses = [first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses[0], 303);
    // The loser either hit the claimed draft or found it already completed.
    assert!(statuses[1] == 409 || statuses[1] == 422, "unexpected status {}", statuses[1]);
    assert_eq!(order_count(&app).await, 1);
}

#[tokio::test]
async fn test_draft_is_locked_while_checkout_runs() {
    let app = start().await;
    let router = app.router();
    let cookie = session_with_taco(&router).await;
    let id = cookie
        .trim_start_matches("taco_session=")
        .parse()
        .unwrap();
    app.state
        .sessions
        .checkout(id, serde_json::from_value(valid_order_form()).unwrap())
        .await
        .unwrap();

    let response = send(&router, post("/orders", Some(&cookie), valid_order_form())).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let response = send(
        &router,
        post("/design", Some(&cookie), json!({ "name": "Late Taco", "ingredients": ["FLTO"] })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(order_count(&app).await, 0);
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let app = start().await;
    let response = send(&app.router(), get("/orders/999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

struct BrokenOrders;

#[async_trait]
impl OrderRepository for BrokenOrders {
    async fn save(&self, _order: &mut TacoOrder) -> Result<(), RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolClosed))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<TacoOrder>, RepositoryError> {
        Err(RepositoryError::Database(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn test_database_failure_is_500_and_draft_survives() {
    let app = start().await;
    let router = create_router(AppState {
        orders: Arc::new(BrokenOrders),
        ..app.state.clone()
    });
    let cookie = session_with_taco(&router).await;

    let response = send(&router, post("/orders", Some(&cookie), valid_order_form())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Internal server error");

    let view = json_body(send(&router, get("/orders/current", Some(&cookie))).await).await;
    assert_eq!(view["taco_order"]["tacos"].as_array().unwrap().len(), 1);

    // The failed save released the draft, so a retry reaches the store again.
    let response = send(&router, post("/orders", Some(&cookie), valid_order_form())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
