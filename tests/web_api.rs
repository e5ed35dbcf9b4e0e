use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use skirmish_florist::{florist::JsonRepository, web};
use tempfile::TempDir;
use tower::ServiceExt;

fn setup() -> (Router, TempDir) {
    let temp = tempfile::tempdir().expect("tempdir");
    let repo = JsonRepository::in_dir(temp.path()).expect("repository");
    (web::router(repo), temp)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = router
        .clone()
        .oneshot(builder.body(body).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

async fn create_rose(router: &Router, price: f64) -> Value {
    let (status, body) = send(
        router,
        Method::POST,
        "/flowers",
        Some(json!({
            "species": "Rose",
            "cut_date": "2026-01-01",
            "quality": "A",
            "price": price
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let (router, _temp) = setup();
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn flower_create_list_delete() {
    let (router, _temp) = setup();
    let rose = create_rose(&router, 99.99).await;
    let id = rose["id"].as_str().expect("id").to_string();

    let (status, list) = send(&router, Method::GET, "/flowers", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0]["species"], "Rose");

    let (status, one) = send(&router, Method::GET, &format!("/flowers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["price"], 99.99);

    let (status, _) = send(&router, Method::DELETE, &format!("/flowers/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, Method::GET, &format!("/flowers/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_flower_is_bad_request() {
    let (router, _temp) = setup();
    let (status, body) = send(
        &router,
        Method::POST,
        "/flowers",
        Some(json!({
            "species": "Rose",
            "cut_date": "2026-01-01",
            "quality": "A",
            "price": 100.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains(".99"));
}

#[tokio::test]
async fn price_search_validates_bounds() {
    let (router, _temp) = setup();
    create_rose(&router, 9.99).await;
    create_rose(&router, 19.99).await;

    let (status, found) = send(
        &router,
        Method::GET,
        "/flowers/search/price?min_price=5&max_price=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let (status, _) = send(
        &router,
        Method::GET,
        "/flowers/search/price?min_price=10&max_price=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        Method::GET,
        "/flowers/search/price?min_price=-1&max_price=5",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, by_date) = send(
        &router,
        Method::GET,
        "/flowers/search/cut-date?d=2026-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_date.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn price_search_rejects_non_finite_bounds() {
    let (router, _temp) = setup();
    create_rose(&router, 9.99).await;

    for uri in [
        "/flowers/search/price?min_price=NaN&max_price=10",
        "/flowers/search/price?min_price=0&max_price=NaN",
        "/flowers/search/price?min_price=0&max_price=inf",
    ] {
        let (status, body) = send(&router, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"].as_str().unwrap_or_default().contains("finite"));
    }
}

#[tokio::test]
async fn invoice_flow_and_loyalty() {
    let (router, _temp) = setup();
    let rose = create_rose(&router, 99.99).await;
    let rose_id = rose["id"].as_str().expect("id").to_string();

    let (status, invoice) = send(
        &router,
        Method::POST,
        "/invoices",
        Some(json!({
            "client": "Niko",
            "sale_date": "2026-01-02",
            "bouquet_ids": [rose_id.clone(), rose_id.clone()]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{invoice}");
    assert_eq!(invoice["sale_price"], 239.98);
    assert_eq!(invoice["bouquet"].as_array().map(Vec::len), Some(2));

    let (_, mine) = send(&router, Method::GET, "/invoices?client=Niko", None).await;
    assert_eq!(mine.as_array().map(Vec::len), Some(1));
    let (_, theirs) = send(&router, Method::GET, "/invoices?client=Other", None).await;
    assert_eq!(theirs.as_array().map(Vec::len), Some(0));

    let (status, card) = send(&router, Method::GET, "/clients/Niko/loyalty", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card["tier"], "Silver");
    assert_eq!(card["invoice_count"], 1);

    let id = invoice["id"].as_str().expect("id").to_string();
    let (status, _) = send(&router, Method::DELETE, &format!("/invoices/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&router, Method::GET, &format!("/invoices/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_with_unknown_flower_is_bad_request() {
    let (router, _temp) = setup();
    let (status, body) = send(
        &router,
        Method::POST,
        "/invoices",
        Some(json!({
            "client": "Niko",
            "sale_date": "2026-01-02",
            "bouquet_ids": ["missing"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("missing"));
}

#[tokio::test]
async fn invoice_sold_before_cut_is_bad_request() {
    let (router, _temp) = setup();
    let rose = create_rose(&router, 9.99).await;
    let (status, _) = send(
        &router,
        Method::POST,
        "/invoices",
        Some(json!({
            "client": "Niko",
            "sale_date": "2025-12-31",
            "bouquet_ids": [rose["id"]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
