// Router-level tests against the in-memory backend

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use roster_api::services::AgeService;
use roster_api::storage::StorageBackend;
use roster_api::{build_router, ServerConfig, Services};
use rust_xlsxwriter::Workbook;
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "roster-test-boundary";
const HEADER: [&str; 5] = ["Full name", "Birth date", "Sex", "E-mail", "Phone"];

fn app() -> Router {
    build_router(
        Services::new(StorageBackend::in_memory()),
        &ServerConfig::default(),
    )
}

fn app_on(today: fn() -> NaiveDate) -> Router {
    let services =
        Services::new(StorageBackend::in_memory()).with_age_service(AgeService::with_clock(today));
    build_router(services, &ServerConfig::default())
}

fn workbook(rows: &[[&str; 5]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (row, values) in rows.iter().enumerate() {
        for (col, value) in values.iter().enumerate() {
            if !value.is_empty() {
                sheet
                    .write_string(row as u32 + 1, col as u16, *value)
                    .unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

fn sample_rows() -> Vec<[&'static str; 5]> {
    vec![
        ["Maria Souza", "1990-04-12", "F", "maria@example.com", "11987654321"],
        ["João Lima", "1985-11-30", "M", "joao@example.com", ""],
        ["Carla Dias", "2000-06-15", "F", "carla@example.com", "21955554444"],
    ]
}

fn multipart_request(uri: &str, field: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn import(app: &Router, rows: &[[&str; 5]]) -> (StatusCode, Value) {
    send(
        app,
        multipart_request("/upload-excel/", "file", "participants.xlsx", &workbook(rows)),
    )
    .await
}

#[tokio::test]
async fn test_import_then_list() {
    let app = app();

    let (status, body) = import(&app, &sample_rows()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "data inserted successfully" }));

    let (status, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(
        list[0],
        json!({
            "id": 1,
            "full_name": "Maria Souza",
            "birth_date": "1990-04-12",
            "sex": "F",
            "email": "maria@example.com",
            "phone": "11987654321"
        })
    );
    assert_eq!(list[1]["phone"], "");
    assert_eq!(list[2]["id"], 3);
}

#[tokio::test]
async fn test_list_filters_by_sex() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (_, body) = send(&app, empty_request("GET", "/participantes/?sexo=F")).await;
    let women = body.as_array().unwrap();
    assert_eq!(women.len(), 2);
    assert!(women.iter().all(|p| p["sex"] == "F"));

    let (_, body) = send(&app, empty_request("GET", "/participantes?sex=M")).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = send(&app, empty_request("GET", "/participantes/?sexo=")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (_, body) = send(&app, empty_request("GET", "/participantes/?sexo=X")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_birth_date() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/participantes/2", json!({ "nova_data": "1986-01-02" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "birth date of João Lima updated successfully" })
    );

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert_eq!(body[1]["birth_date"], "1986-01-02");
}

#[tokio::test]
async fn test_update_accepts_new_date_alias() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (_, body) = send(
        &app,
        json_request("PUT", "/participantes/1", json!({ "new_date": "1991-05-13" })),
    )
    .await;
    assert_eq!(
        body["message"],
        "birth date of Maria Souza updated successfully"
    );
}

#[tokio::test]
async fn test_update_missing_participant_mutates_nothing() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/participantes/999", json!({ "nova_data": "2001-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "participant not found" }));

    // Unknown id wins over a bad date
    let (_, body) = send(
        &app,
        json_request("PUT", "/participantes/999", json!({ "nova_data": "not-a-date" })),
    )
    .await;
    assert_eq!(body, json!({ "error": "participant not found" }));

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    let dates: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["birth_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["1990-04-12", "1985-11-30", "2000-06-15"]);
}

#[tokio::test]
async fn test_update_with_bad_date_leaves_date_unchanged() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/participantes/1", json!({ "nova_data": "not-a-date" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "error": "invalid date format, use YYYY-MM-DD" })
    );

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert_eq!(body[0]["birth_date"], "1990-04-12");
}

#[tokio::test]
async fn test_delete_all_twice() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (status, body) = send(&app, empty_request("DELETE", "/participantes/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "3 participant(s) deleted" }));

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = send(&app, empty_request("DELETE", "/participantes")).await;
    assert_eq!(body, json!({ "message": "0 participant(s) deleted" }));
}

#[tokio::test]
async fn test_upload_rejects_wrong_extension() {
    let app = app();

    let (status, body) = send(
        &app,
        multipart_request("/upload-excel/", "file", "participants.csv", b"a,b,c\n"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "please send a .xlsx file" }));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = app();

    let (status, body) = send(
        &app,
        multipart_request(
            "/upload-excel",
            "attachment",
            "participants.xlsx",
            &workbook(&sample_rows()),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn test_upload_with_bad_row_persists_nothing() {
    let app = app();
    let mut rows = sample_rows();
    rows.push(["Pedro Alves", "yesterday", "M", "pedro@example.com", ""]);

    let (status, body) = import(&app, &rows).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("row 5"));

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_with_corrupt_workbook() {
    let app = app();

    let (status, body) = send(
        &app,
        multipart_request("/upload-excel/", "file", "broken.XLSX", b"not a zip archive"),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

fn june_14() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn june_15() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[tokio::test]
async fn test_webhook_age_around_birthday() {
    let (status, body) = send(
        &app_on(june_14),
        json_request("POST", "/webhook/", json!({ "data_nascimento": "2000-06-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "idade": 23, "status": "age calculated successfully" })
    );

    let (_, body) = send(
        &app_on(june_15),
        json_request("POST", "/webhook", json!({ "birth_date": "2000-06-15" })),
    )
    .await;
    assert_eq!(body["idade"], 24);
}

#[tokio::test]
async fn test_webhook_errors() {
    let app = app_on(june_15);

    let (status, body) = send(&app, json_request("POST", "/webhook/", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "birth_date is required" }));

    let (_, body) = send(
        &app,
        json_request("POST", "/webhook/", json!({ "data_nascimento": "" })),
    )
    .await;
    assert_eq!(body, json!({ "error": "birth_date is required" }));

    let (_, body) = send(
        &app,
        json_request("POST", "/webhook/", json!({ "data_nascimento": "soon" })),
    )
    .await;
    assert_eq!(body, json!({ "error": "invalid birth date" }));
}

#[tokio::test]
async fn test_webhook_non_string_birth_date() {
    let app = app_on(june_15);

    for value in [json!(20000615), json!(true), json!(["2000-06-15"])] {
        let (status, body) = send(
            &app,
            json_request("POST", "/webhook/", json!({ "data_nascimento": value })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": "invalid birth date" }));
    }

    let (status, body) = send(
        &app,
        json_request("POST", "/webhook/", json!({ "data_nascimento": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "birth_date is required" }));
}

#[tokio::test]
async fn test_webhook_two_digit_year() {
    let (_, body) = send(
        &app_on(june_15),
        json_request("POST", "/webhook/", json!({ "data_nascimento": "15.06.00" })),
    )
    .await;
    assert_eq!(body, json!({ "error": "invalid birth date" }));
}

#[tokio::test]
async fn test_update_with_two_digit_year_is_rejected() {
    let app = app();
    import(&app, &sample_rows()).await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/participantes/1", json!({ "nova_data": "12-06-15" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "error": "invalid date format, use YYYY-MM-DD" })
    );

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert_eq!(body[0]["birth_date"], "1990-04-12");
}

#[tokio::test]
async fn test_webhook_does_not_touch_storage() {
    let app = app_on(june_15);
    import(&app, &sample_rows()).await;

    send(
        &app,
        json_request("POST", "/webhook/", json!({ "data_nascimento": "2000-06-15" })),
    )
    .await;

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), empty_request("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(&app(), empty_request("GET", "/api-doc/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/participantes/{id}"].is_object());
}

#[tokio::test]
async fn test_routes_under_prefix() {
    let config = ServerConfig {
        api_prefix: "/api".to_string(),
        ..Default::default()
    };
    let app = build_router(Services::new(StorageBackend::in_memory()), &config);

    let (status, body) = send(&app, empty_request("GET", "/api/participantes/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, empty_request("GET", "/participantes/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..Default::default()
    };
    let app = build_router(Services::new(StorageBackend::in_memory()), &config);

    let (status, body) = import(&app, &sample_rows()).await;
    assert_ne!(status, StatusCode::OK);
    assert!(body["error"].is_string());

    let (_, body) = send(&app, empty_request("GET", "/participantes/")).await;
    assert!(body.as_array().unwrap().is_empty());
}
