use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, DataPool};
use tower::{Service, ServiceExt};

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_pools_empty() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/data-pools"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let pools: Vec<DataPool> = body_json(resp).await;
    assert!(pools.is_empty());
}

// --- create ---

#[tokio::test]
async fn create_pool_returns_201_with_location() {
    let resp = app()
        .oneshot(json_request("POST", "/api/data-pools", r#"{"name":"clients"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()[http::header::LOCATION]
        .to_str()
        .unwrap()
        .to_string();
    let pool: DataPool = body_json(resp).await;
    let id = pool.id.unwrap();
    assert_eq!(location, format!("/api/data-pools/{id}"));
    assert_eq!(pool.name.as_deref(), Some("clients"));
}

#[tokio::test]
async fn create_pool_with_id_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/api/data-pools", r#"{"id":"x","name":"dup"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("already have an id"));
}

// --- generate ---

#[tokio::test]
async fn generate_pool_builds_rows() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/data-pools/generate",
            r#"{"name":"people","records":4,"columns":[
                {"name":"first","dataType":"name.firstName"},
                {"name":"city","dataType":"address.city"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let pool: DataPool = body_json(resp).await;
    assert!(pool.id.is_some());
    assert_eq!(pool.columns, ["first", "city"]);
    assert_eq!(pool.rows.len(), 4);
    assert_eq!(pool.rows[0], ["Ana", "Mexico City"]);
}

#[tokio::test]
async fn generate_unknown_type_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/data-pools/generate",
            r#"{"name":"bad","records":1,"columns":[{"name":"h","dataType":"crypto.sha256"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn generate_too_many_records_returns_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/data-pools/generate",
            r#"{"name":"huge","records":10001,"columns":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- get ---

#[tokio::test]
async fn get_pool_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/data-pools/missing"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn csv_of_missing_pool_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/api/data-pools/missing.csv"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn pool_lifecycle() {
    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/data-pools",
            r#"{"name":"cities","columns":["city"],"rows":[["Puebla"],["Oaxaca"]]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: DataPool = body_json(resp).await;
    let id = created.id.clone().unwrap();

    // list
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/data-pools"))
        .await
        .unwrap();
    let pools: Vec<DataPool> = body_json(resp).await;
    assert_eq!(pools.len(), 1);
    assert_eq!(pools[0].id.as_deref(), Some(id.as_str()));

    // list with a name filter that does not match
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/data-pools?name=people"))
        .await
        .unwrap();
    let pools: Vec<DataPool> = body_json(resp).await;
    assert!(pools.is_empty());

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/data-pools/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: DataPool = body_json(resp).await;
    assert_eq!(fetched, created);

    // csv export
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/data-pools/{id}.csv")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[http::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    let csv = body_bytes(resp).await;
    assert_eq!(&csv[..], b"city\nPuebla\nOaxaca\n");

    // update
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/data-pools/{id}"),
            r#"{"name":"towns","columns":["city"],"rows":[["Puebla"]]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: DataPool = body_json(resp).await;
    assert_eq!(updated.id.as_deref(), Some(id.as_str()));
    assert_eq!(updated.name.as_deref(), Some("towns"));
    assert_eq!(updated.rows.len(), 1);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/data-pools/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/data-pools/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_without_path_id_creates() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/data-pools", r#"{"name":"orphan"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let pool: DataPool = body_json(resp).await;
    assert!(pool.id.is_some());
}
