use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, prelude::BASE64_STANDARD};
use http_body_util::BodyExt;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::util::ServiceExt;

use engine::Engine;
use migration::MigratorTrait;
use server::{ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.new_user("alice", "password").await.unwrap();
    router(ServerState::new(engine))
}

fn basic(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        BASE64_STANDARD.encode(format!("{username}:{password}"))
    )
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(format!("/api/accounting{uri}"))
        .header(header::AUTHORIZATION, basic("alice", "password"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let app = app().await;
    let req = Request::builder()
        .uri("/api/accounting/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["version"], "1.0");
}

#[tokio::test]
async fn missing_or_wrong_credentials_are_rejected() {
    let app = app().await;

    let req = Request::builder()
        .uri("/api/accounting/accounts")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let req = Request::builder()
        .uri("/api/accounting/accounts")
        .header(header::AUTHORIZATION, basic("alice", "wrong"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn accounts_are_created_and_listed() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(json!({"name": "Assets", "code": "1", "type": "asset"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let parent = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(json!({"name": "Bank", "code": "101", "type": "asset", "parent_id": parent})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parent_name"], "Assets");

    let (status, body) = send(&app, request("GET", "/accounts", None)).await;
    assert_eq!(status, StatusCode::OK);
    let accounts = body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0]["child_ids"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_ids_map_to_404() {
    let app = app().await;

    let (status, body) = send(&app, request("GET", "/accounts/999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(&app, request("DELETE", "/taxes/999", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_bodies_map_to_400() {
    let app = app().await;

    let req = Request::builder()
        .method("POST")
        .uri("/api/accounting/accounts")
        .header(header::AUTHORIZATION, basic("alice", "password"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(json!({"name": "X", "code": "9", "type": "bogus"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, request("POST", "/accounts", Some(json!({"code": "9"})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name"));

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(json!({"name": "Orphan", "code": "9", "type": "asset", "parent_id": 999})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("parent_id"));
}

#[tokio::test]
async fn duplicate_tax_code_conflicts() {
    let app = app().await;
    let body = json!({"name": "VAT 10", "code": "VAT10", "rate": 10});

    let (status, _) = send(&app, request("POST", "/taxes", Some(body.clone()))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, request("POST", "/taxes", Some(body))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn tax_compute_reports_net_base() {
    let app = app().await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/taxes",
            Some(json!({"name": "VAT inc", "rate": 10, "calculation_method": "inclusive"})),
        ),
    )
    .await;
    let tax_id = body["data"]["id"].as_i64().unwrap();
    assert!(body["data"]["code"].as_str().unwrap().starts_with("TAX"));

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/taxes/compute",
            Some(json!({"tax_id": tax_id, "base_amount": 11000})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["tax_amount"], 1000.0);
    assert_eq!(data["base_amount"], 10000.0);
    assert_eq!(data["total_amount"], 11000.0);
    assert_eq!(data["calculation_method"], "inclusive");

    let (status, _) = send(
        &app,
        request("POST", "/taxes/compute", Some(json!({"base_amount": 100}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inactive_partner_stays_reachable() {
    let app = app().await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/partners",
            Some(json!({"name": "Dormant", "type": "supplier", "active": false})),
        ),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(&app, request("GET", "/partners", None)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, request("GET", &format!("/partners/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);

    let (status, body) = send(
        &app,
        request(
            "PUT",
            &format!("/partners/{id}"),
            Some(json!({"name": "Awake", "email": "a@example.com"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Awake");
    assert_eq!(body["data"]["type"], "supplier");
    assert_eq!(body["message"], "Partner updated successfully");
}

#[tokio::test]
async fn journal_entry_reports_amount_total() {
    let app = app().await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(json!({"name": "Cash", "code": "100", "type": "asset"})),
        ),
    )
    .await;
    let cash = body["data"]["id"].as_i64().unwrap();
    let (_, body) = send(
        &app,
        request(
            "POST",
            "/accounts",
            Some(json!({"name": "Sales", "code": "700", "type": "income"})),
        ),
    )
    .await;
    let sales = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/journal-entries",
            Some(json!({
                "name": "INV/001",
                "date": "2025-02-01",
                "ref": "INV-1",
                "line_ids": [
                    {"account_id": cash, "debit": 150.5},
                    {"account_id": sales, "credit": 100}
                ]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entry = &body["data"];
    assert_eq!(entry["amount_total"], 50.5);
    assert_eq!(entry["state"], "draft");
    assert_eq!(entry["lines"][0]["account_name"], "Cash");

    let id = entry["id"].as_i64().unwrap();
    let (status, body) = send(&app, request("DELETE", &format!("/journal-entries/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Journal entry deleted successfully");
}

#[tokio::test]
async fn tax_report_lifecycle() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/tax-reports",
            Some(json!({
                "name": "Q1",
                "period_start": "2025-01-01",
                "period_end": "2025-03-31",
                "sale_vat_amount": 1000,
                "purchase_vat_amount": 400,
                "withholding_amount": 100,
                "state": "submitted",
                "vat_payable": 1
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["vat_payable"], 500.0);
    assert_eq!(body["data"]["state"], "draft");
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(
        &app,
        request(
            "PUT",
            &format!("/tax-reports/{id}"),
            Some(json!({"purchase_vat_amount": 1200})),
        ),
    )
    .await;
    assert_eq!(body["data"]["vat_payable"], -300.0);

    let (status, body) = send(&app, request("POST", &format!("/tax-reports/{id}/confirm"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "confirmed");

    let (status, body) = send(&app, request("POST", &format!("/tax-reports/{id}/submit"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "submitted");
    assert!(body["data"]["submitted_at"].is_string());

    let (status, _) = send(&app, request("POST", &format!("/tax-reports/{id}/confirm"), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn future_asset_depreciates_to_a_single_zero_line() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/assets",
            Some(json!({
                "name": "Press",
                "purchase_date": "2999-01-01",
                "purchase_value": 1200,
                "useful_life": 1
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "00001");
    assert_eq!(body["data"]["current_value"], 1200.0);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request("POST", "/assets/depreciate", Some(json!({"asset_ids": [id]}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let lines = body["data"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["depreciation_amount"], 0.0);
    assert!(lines[0]["journal_entry"].is_null());
}

#[tokio::test]
async fn unrepresentable_amounts_map_to_400() {
    let app = app().await;

    let (_, body) = send(
        &app,
        request("POST", "/taxes", Some(json!({"name": "VAT 10", "rate": 10}))),
    )
    .await;
    let tax_id = body["data"]["id"].as_i64().unwrap();

    for base_amount in [json!(1e17), json!(1e300), json!(-1e300)] {
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/taxes/compute",
                Some(json!({"tax_id": tax_id, "base_amount": base_amount})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("base_amount"));
    }

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/assets",
            Some(json!({
                "name": "Press",
                "purchase_date": "2024-01-01",
                "purchase_value": 1200,
                "useful_life": 400_000_000
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("useful_life"));

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/journal-entries",
            Some(json!({"name": "Huge", "lines": [{"account_id": 1, "debit": 1e300}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("debit"));
}

#[tokio::test]
async fn asset_update_and_delete() {
    let app = app().await;

    let (_, body) = send(
        &app,
        request(
            "POST",
            "/assets",
            Some(json!({
                "name": "Lathe",
                "code": "LTH",
                "purchase_date": "2024-01-01",
                "purchase_value": 1200,
                "useful_life": 5
            })),
        ),
    )
    .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        request("PUT", &format!("/assets/{id}"), Some(json!({"useful_life": 3}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Asset updated successfully");
    assert_eq!(body["data"]["useful_life"], 3);
    assert_eq!(body["data"]["name"], "Lathe");
    assert_eq!(body["data"]["code"], "LTH");
    assert_eq!(body["data"]["purchase_value"], 1200.0);

    let (status, _) = send(
        &app,
        request("PUT", &format!("/assets/{id}"), Some(json!({"useful_life": 101}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, request("DELETE", &format!("/assets/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, request("GET", &format!("/assets/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn tax_group_delete_route() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request("POST", "/tax-groups", Some(json!({"name": "VAT", "code": "G-VAT"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, request("DELETE", &format!("/tax-groups/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Tax group deleted successfully");

    let (_, body) = send(&app, request("GET", "/tax-groups", None)).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = send(&app, request("DELETE", &format!("/tax-groups/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn auto_journal_entries_follow_rule_order() {
    let app = app().await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/auto-journal-entries",
            Some(json!({"rules": [
                {"account": "Rent", "amount": 900, "partner": "Landlord", "condition": "monthly"},
                {"account": "Fees", "amount": 10}
            ]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert_eq!(entries[0]["ref"], "AUTO0001");
    assert_eq!(entries[0]["memo"], "monthly");
    assert_eq!(entries[1]["ref"], "AUTO0002");
    assert_eq!(entries[1]["memo"], "auto journal entry");
    assert_eq!(entries[1]["partner_name"], "");
}
