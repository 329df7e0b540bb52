//! End-to-end behaviour of the users API against the assembled application.

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test::{self, TestRequest},
    web,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use user_registry::domain::{IdAllocationPolicy, MAX_USERS, UserStore};
use user_registry::inbound::http::build_app;
use user_registry::inbound::http::health::HealthState;
use user_registry::inbound::http::state::HttpState;
use user_registry::outbound::persistence::JsonFileUserSnapshotRepository;

#[fixture]
fn store() -> UserStore {
    UserStore::in_memory()
}

async fn init_app(
    store: UserStore,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(build_app(
        web::Data::new(HttpState::new(Arc::new(store))),
        health,
    ))
    .await
}

async fn send<S>(app: &S, request: TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

fn create(name: &str, email: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/users")
        .set_json(json!({"name": name, "email": email}))
}

#[rstest]
#[actix_web::test]
async fn crud_lifecycle(store: UserStore) {
    let app = init_app(store).await;

    let (status, created) = send(&app, create("Alice", "alice@example.com")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["id"], json!(1));

    let (status, body) = send(&app, create("Imposter", "ALICE@EXAMPLE.COM")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));

    let (status, deleted) =
        send(&app, TestRequest::delete().uri("/api/users/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["data"], created["data"]);

    let (status, body) = send(&app, TestRequest::get().uri("/api/users/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("resource not found"));
}

#[rstest]
#[actix_web::test]
async fn capacity_is_enforced_over_http(store: UserStore) {
    let app = init_app(store).await;
    for n in 0..MAX_USERS {
        let (status, _) = send(&app, create("User", &format!("user{n}@example.com"))).await;
        assert_eq!(status, StatusCode::CREATED, "create #{n}");
    }

    let (status, body) = send(&app, create("Late", "late@example.com")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("capacity exceeded"));

    let (_, health) = send(&app, TestRequest::get().uri("/health")).await;
    assert_eq!(health["data"]["users"], json!(MAX_USERS));

    let (status, list) = send(&app, TestRequest::get().uri("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<u64> = list["data"]
        .as_array()
        .expect("user array")
        .iter()
        .filter_map(|user| user["id"].as_u64())
        .collect();
    assert_eq!(ids.len(), MAX_USERS);
    assert_eq!(ids.first(), Some(&1));
    assert_eq!(ids.last(), Some(&(MAX_USERS as u64)));
}

#[rstest]
#[case("0")]
#[case("1000")]
#[actix_web::test]
async fn out_of_range_ids_are_bad_requests(store: UserStore, #[case] id: &str) {
    let app = init_app(store).await;
    let (status, body) = send(&app, TestRequest::get().uri(&format!("/api/users/{id}"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Validation failed"));
}

#[rstest]
#[actix_web::test]
async fn snapshot_survives_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let open = || {
        let repo = JsonFileUserSnapshotRepository::open(&path).expect("open snapshot");
        UserStore::load(Arc::new(repo), IdAllocationPolicy::Monotonic).expect("load store")
    };

    {
        let app = init_app(open()).await;
        send(&app, create("Ada", "ada@example.com")).await;
        send(&app, create("Bob", "bob@example.com")).await;
        let (status, _) = send(
            &app,
            TestRequest::patch()
                .uri("/api/users/2")
                .set_json(json!({"name": "Robert"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, TestRequest::delete().uri("/api/users/1")).await;
        assert_eq!(status, StatusCode::OK);
    }

    let app = init_app(open()).await;
    let (_, list) = send(&app, TestRequest::get().uri("/api/users")).await;
    assert_eq!(
        list["data"],
        json!([{"id": 2, "name": "Robert", "email": "bob@example.com"}])
    );

    // The id counter resumes after the highest loaded id.
    let (_, created) = send(&app, create("Cleo", "cleo@example.com")).await;
    assert_eq!(created["data"]["id"], json!(3));
}
