//! API integration tests
//!
//! Requests go through the full router in process, no server needed.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use locallibrary_server::{api, repository::Repository, AppConfig, AppState};

fn app() -> Router {
    api::router(AppState::new(AppConfig::default(), Repository::in_memory()))
}

struct TestResponse {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app.clone().oneshot(request).await.expect("Failed to send request");
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    TestResponse { status, location, body }
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
    let response = send(app, Method::POST, uri, Some(body)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body
}

/// English language, Tolkien, and two of his books
async fn seed_tolkien(app: &Router) -> (i64, i64, Vec<i64>) {
    let english = create(app, "/api/v1/languages", json!({ "name": "English" })).await;
    let tolkien = create(
        app,
        "/api/v1/authors",
        json!({
            "first_name": "J.R.R.",
            "last_name": "Tolkien",
            "date_of_birth": "1892-01-03",
            "date_of_death": "1973-09-02"
        }),
    )
    .await;
    let mut books = Vec::new();
    for (title, isbn) in [("The Hobbit", "978-0-261-10221-7"), ("The Silmarillion", "9780261102736")] {
        let book = create(
            app,
            "/api/v1/books",
            json!({
                "title": title,
                "author_id": tolkien["id"],
                "summary": "A tale of Middle-earth.",
                "isbn": isbn,
                "language_id": english["id"]
            }),
        )
        .await;
        books.push(book["id"].as_i64().unwrap());
    }
    (english["id"].as_i64().unwrap(), tolkien["id"].as_i64().unwrap(), books)
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let response = send(&app, Method::GET, "/api/v1/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "healthy");

    let response = send(&app, Method::GET, "/api/v1/ready", None).await;
    assert_eq!(response.body["storage"], "memory");
}

#[tokio::test]
async fn test_genre_names_unique_ignoring_case() {
    let app = app();
    let response = send(&app, Method::POST, "/api/v1/genres", Some(json!({ "name": "Fantasy" }))).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_i64().unwrap();
    assert_eq!(response.location, Some(format!("/api/v1/genres/{}", id)));

    let response = send(&app, Method::POST, "/api/v1/genres", Some(json!({ "name": "fantasy" }))).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "Duplicate");
    assert_eq!(response.body["field"], "name");

    let response = send(&app, Method::GET, "/api/v1/genres", None).await;
    assert_eq!(response.body.as_array().unwrap().len(), 1);
    assert_eq!(response.body[0]["name"], "Fantasy");
}

#[tokio::test]
async fn test_genre_rename_to_other_case_of_itself() {
    let app = app();
    let genre = create(&app, "/api/v1/genres", json!({ "name": "science fiction" })).await;
    let uri = format!("/api/v1/genres/{}", genre["id"]);
    let response = send(&app, Method::PUT, &uri, Some(json!({ "name": "Science Fiction" }))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Science Fiction");
}

#[tokio::test]
async fn test_author_delete_restricted_by_books() {
    let app = app();
    let (_, tolkien, books) = seed_tolkien(&app).await;
    let author_uri = format!("/api/v1/authors/{}", tolkien);

    let response = send(&app, Method::DELETE, &author_uri, None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "StillReferenced");

    for id in books {
        let response = send(&app, Method::DELETE, &format!("/api/v1/books/{}", id), None).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }
    let response = send(&app, Method::DELETE, &author_uri, None).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = send(&app, Method::GET, &author_uri, None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_details_and_listing() {
    let app = app();
    let (_, _, books) = seed_tolkien(&app).await;
    let fantasy = create(&app, "/api/v1/genres", json!({ "name": "Fantasy" })).await;
    let uri = format!("/api/v1/books/{}", books[0]);
    let response = send(&app, Method::PUT, &uri, Some(json!({ "genre_ids": [fantasy["id"]] }))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["isbn"], "9780261102217");

    let details = send(&app, Method::GET, &uri, None).await.body;
    assert_eq!(details["author"]["last_name"], "Tolkien");
    assert_eq!(details["language"]["name"], "English");
    assert_eq!(details["genre_summary"], "Fantasy");
    assert_eq!(details["copies"], json!([]));

    let listed = send(&app, Method::GET, "/api/v1/books", None).await.body;
    let titles: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["The Hobbit", "The Silmarillion"]);
    assert_eq!(listed[0]["author"], "Tolkien, J.R.R.");
}

#[tokio::test]
async fn test_book_rejects_bad_isbn_and_unknown_refs() {
    let app = app();
    let (english, _, _) = seed_tolkien(&app).await;
    let book = json!({
        "title": "Duplicate",
        "summary": "Same ISBN as The Hobbit.",
        "isbn": "9780261102217",
        "language_id": english
    });
    let response = send(&app, Method::POST, "/api/v1/books", Some(book.clone())).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["field"], "isbn");

    let mut short = book.clone();
    short["isbn"] = json!("12345");
    let response = send(&app, Method::POST, "/api/v1/books", Some(short)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut orphan = book;
    orphan["isbn"] = json!("9780000000001");
    orphan["language_id"] = json!(999);
    let response = send(&app, Method::POST, "/api/v1/books", Some(orphan)).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["field"], "language_id");
}

#[tokio::test]
async fn test_copy_ids_are_generated() {
    let app = app();
    let (_, _, books) = seed_tolkien(&app).await;
    let response = send(
        &app,
        Method::POST,
        "/api/v1/copies",
        Some(json!({ "book_id": books[0], "imprint": "Allen & Unwin, 1937" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["status"], "maintenance");
    let id = response.body["id"].as_str().unwrap().to_string();
    assert_eq!(response.location, Some(format!("/api/v1/copies/{}", id)));

    let entry = send(&app, Method::GET, &format!("/api/v1/copies/{}", id), None).await.body;
    assert_eq!(entry["display"], format!("{} (The Hobbit)", id));

    // clients may not pick the id
    let response = send(
        &app,
        Method::POST,
        "/api/v1/copies",
        Some(json!({ "id": id, "imprint": "Pirate edition" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, Method::GET, "/api/v1/copies/not-a-uuid", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // the book now has a copy and cannot be deleted
    let response = send(&app, Method::DELETE, &format!("/api/v1/books/{}", books[0]), None).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_copies_listed_by_due_date_and_filtered() {
    let app = app();
    for (due, status) in [
        (Value::Null, "maintenance"),
        (json!("2026-11-20"), "o"),
        (json!("2026-11-02"), "o"),
        (Value::Null, "a"),
    ] {
        let status = match status {
            "o" => json!("on_loan"),
            "a" => json!("available"),
            other => json!(other),
        };
        create(
            &app,
            "/api/v1/copies",
            json!({ "imprint": "Penguin", "due_back": due, "status": status }),
        )
        .await;
    }

    let listed = send(&app, Method::GET, "/api/v1/copies", None).await.body;
    let dates: Vec<Value> = listed.as_array().unwrap().iter().map(|c| c["due_back"].clone()).collect();
    assert_eq!(
        dates,
        vec![json!("2026-11-02"), json!("2026-11-20"), Value::Null, Value::Null]
    );

    let on_loan = send(&app, Method::GET, "/api/v1/copies?status=on_loan", None).await.body;
    assert_eq!(on_loan.as_array().unwrap().len(), 2);

    let due_soon = send(&app, Method::GET, "/api/v1/copies?due_before=2026-11-10", None).await.body;
    assert_eq!(due_soon.as_array().unwrap().len(), 1);

    let response = send(&app, Method::GET, "/api/v1/copies?status=lost", None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_schema() {
    let app = app();
    let all = send(&app, Method::GET, "/api/v1/admin/schema", None).await.body;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let copy = send(&app, Method::GET, "/api/v1/admin/schema/book_copy", None).await.body;
    assert_eq!(copy["list_filter"], json!(["status", "due_back"]));
    assert_eq!(copy["choices"][0]["field"], "status");

    let response = send(&app, Method::GET, "/api/v1/admin/schema/loan", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_records_and_invalid_bodies() {
    let app = app();
    for uri in ["/api/v1/genres/7", "/api/v1/languages/7", "/api/v1/authors/7", "/api/v1/books/7"] {
        let response = send(&app, Method::GET, uri, None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(response.body["error"], "NoSuchRecord");
    }

    let response = send(&app, Method::POST, "/api/v1/genres", Some(json!({ "name": "  " }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(&app, Method::POST, "/api/v1/genres", Some(json!({ "title": "Drama" }))).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        Method::POST,
        "/api/v1/authors",
        Some(json!({
            "first_name": "Mary",
            "last_name": "Shelley",
            "date_of_birth": "1851-02-01",
            "date_of_death": "1797-08-30"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = app();
    let response = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["info"]["title"], "Local Library API");
}
