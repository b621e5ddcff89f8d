use std::str::FromStr;
use std::sync::Arc;

use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use stockmaster_api::app::{build_app_with, AppServices};
use stockmaster_infra::DemoCatalog;

struct TestServer {
    base_url: String,
    demo: DemoCatalog,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over seeded in-memory stores, on an ephemeral port.
        let services = AppServices::in_memory(true, 100)
            .await
            .expect("failed to build services");
        let demo = services.demo.clone().expect("demo data was seeded");
        let app = build_app_with(Arc::new(services));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            demo,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn product_barcode(&self, sku: &str) -> String {
        self.demo.product(sku).unwrap().barcode().to_string()
    }

    fn warehouse_barcode(&self, code: &str) -> String {
        self.demo.warehouse(code).unwrap().barcode().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn decimal(v: &Value) -> Decimal {
    Decimal::from_str(v.as_str().expect("decimal is serialized as a string")).unwrap()
}

fn path_segment(raw: &str) -> String {
    raw.bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-_.~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect()
}

#[tokio::test]
async fn health_reports_sessions() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["sessions"], 0);

    let res = client.get(server.url("/")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["backend"], "in_memory");
}

#[tokio::test]
async fn receipt_then_delivery_moves_stock() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let chair = server.product_barcode("CHAIR-OFF-001");
    let main = server.warehouse_barcode("WH-MAIN");

    let res = client
        .post(server.url("/scan/receipt"))
        .json(&json!({
            "product_barcode": chair,
            "warehouse_barcode": main,
            "quantity": "5",
            "symbology": "QRCODE",
            "device_id": "camera-0",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(decimal(&body["detail"]["old_quantity"]), Decimal::from(25));
    assert_eq!(decimal(&body["detail"]["new_quantity"]), Decimal::from(30));
    assert_eq!(body["reason"], "Scanned receipt: Office Chair Executive");

    let res = client
        .post(server.url("/scan/delivery"))
        .json(&json!({
            "product_barcode": chair,
            "warehouse_barcode": main,
            "quantity": "26",
        }))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(decimal(&body["detail"]["new_quantity"]), Decimal::from(4));
    assert_eq!(body["detail"]["below_reorder_threshold"], true);
}

#[tokio::test]
async fn overdrawn_delivery_is_a_failed_outcome() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let laptop = server.product_barcode("LAPTOP-HP-15");
    let rack_a = server.warehouse_barcode("WH-STOR-A");

    let res = client
        .post(server.url("/scan"))
        .json(&json!({
            "barcode": laptop,
            "action": "delivery",
            "warehouse_barcode": rack_a,
            "quantity": "9",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["failure"]["code"], "insufficient_stock");
    assert_eq!(body["reason"], "Insufficient stock. Available: 8, Requested: 9");
}

#[tokio::test]
async fn generic_scan_without_warehouse_fails_cleanly() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/scan"))
        .json(&json!({
            "barcode": server.product_barcode("DESK-WD-120"),
            "action": "receipt",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["failure"]["code"], "missing_warehouse_barcode");

    let res = client
        .post(server.url("/scan"))
        .json(&json!({ "barcode": "X", "action": "teleport" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.url("/scan/delivery"))
        .json(&json!({
            "product_barcode": "",
            "warehouse_barcode": server.warehouse_barcode("WH-MAIN"),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["failure"]["code"], "empty_barcode");

    let res = client.get(server.url("/scan/history")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["entries"][0]["barcode"], "");
    assert_eq!(body["entries"][0]["success"], false);
    assert_eq!(body["entries"][0]["error_message"], "Barcode is empty");
}

#[tokio::test]
async fn lookup_resolves_or_returns_404() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let barcode = server.warehouse_barcode("WH-PROD");
    let res = client
        .get(server.url(&format!("/scan/lookup/{}", path_segment(&barcode))))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["detail"]["entry"]["type"], "warehouse");
    assert_eq!(body["detail"]["entry"]["data"]["code"], "WH-PROD");

    let res = client
        .get(server.url("/scan/lookup/NOPE-123"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["reason"], "Barcode not found: NOPE-123");
}

#[tokio::test]
async fn history_is_newest_first_and_filterable() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let paint = server.demo.product("PAINT-WHT-5L").unwrap().id();

    let _ = client.get(server.url("/scan/lookup/first")).send().await.unwrap();
    let _ = client
        .post(server.url("/scan/receipt"))
        .json(&json!({
            "product_barcode": server.product_barcode("PAINT-WHT-5L"),
            "warehouse_barcode": server.warehouse_barcode("WH-STOR-B"),
            "quantity": "2",
        }))
        .send()
        .await
        .unwrap();

    let res = client.get(server.url("/scan/history")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["entries"][0]["action"], "receipt");
    assert_eq!(body["entries"][1]["barcode"], "first");

    let res = client
        .get(server.url(&format!("/scan/history?limit=10&product_id={}", paint)))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["entries"][0]["success"], true);

    let res = client
        .get(server.url("/scan/history?product_id=not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stock_and_movements_agree() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let steel = server.demo.product("STEEL-ROD-50").unwrap().id();
    let main = server.demo.warehouse("WH-MAIN").unwrap().id();

    let res = client
        .get(server.url(&format!("/stock/{}/{}", steel, main)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(decimal(&body["quantity"]), Decimal::from(100));

    let res = client
        .get(server.url(&format!("/stock/{}/{}/movements", steel, main)))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["consistent"], true);
    assert_eq!(decimal(&body["derived_quantity"]), Decimal::from(100));
    assert_eq!(body["movements"].as_array().unwrap().len(), 1);
    assert_eq!(body["movements"][0]["reason"], "Initial stock");

    let res = client
        .get(server.url(&format!("/stock/nope/{}", main)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn manual_adjustment_enforces_non_negative_stock() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let desk = server.demo.product("DESK-WD-120").unwrap().id();
    let prod = server.demo.warehouse("WH-PROD").unwrap().id();

    let res = client
        .post(server.url("/stock/adjust"))
        .json(&json!({
            "product_id": desk.to_string(),
            "warehouse_id": prod.to_string(),
            "quantity_change": "-3",
            "movement_type": "adjustment",
            "reason": "cycle count",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(decimal(&body["new_quantity"]), Decimal::from(12));

    let res = client
        .post(server.url("/stock/adjust"))
        .json(&json!({
            "product_id": desk.to_string(),
            "warehouse_id": prod.to_string(),
            "quantity_change": "-13",
            "movement_type": "delivery",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_stock");
    assert_eq!(decimal(&body["available"]), Decimal::from(12));

    // 12 + MAX is outside the decimal range.
    let res = client
        .post(server.url("/stock/adjust"))
        .json(&json!({
            "product_id": desk.to_string(),
            "warehouse_id": prod.to_string(),
            "quantity_change": Decimal::MAX.to_string(),
            "movement_type": "receipt",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "quantity_overflow");
    assert_eq!(decimal(&body["available"]), Decimal::from(12));

    // The key still accepts adjustments after the rejected overflow.
    let res = client
        .post(server.url("/stock/adjust"))
        .json(&json!({
            "product_id": desk.to_string(),
            "warehouse_id": prod.to_string(),
            "quantity_change": "-1",
            "movement_type": "delivery",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(server.url("/stock/adjust"))
        .json(&json!({
            "product_id": desk.to_string(),
            "warehouse_id": prod.to_string(),
            "quantity_change": "1",
            "movement_type": "scan_receipt",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.url("/stock/adjust"))
        .json(&json!({
            "product_id": uuid::Uuid::now_v7().to_string(),
            "warehouse_id": prod.to_string(),
            "quantity_change": "1",
            "movement_type": "receipt",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn scanner_session_lifecycle() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/scanner/sessions"))
        .json(&json!({ "camera_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let session: Value = res.json().await.unwrap();
    assert_eq!(session["device_id"], "camera-1");
    let id = session["id"].as_str().unwrap().to_string();

    let res = client
        .post(server.url("/scanner/sessions"))
        .json(&json!({ "camera_id": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = client
        .post(server.url(&format!("/scanner/sessions/{}/captures", id)))
        .json(&json!({
            "passes": [
                [{ "payload": "A", "symbology": "QR_CODE" }, { "payload": "B", "symbology": "CODE128" }],
                [{ "payload": "A", "symbology": "QR_CODE" }],
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);

    let res = client.get(server.url("/scanner/sessions")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 1);
    assert_eq!(body["sessions"][0]["captures"], 1);
    assert_eq!(body["sessions"][0]["observations"], 2);

    let res = client
        .delete(server.url(&format!("/scanner/sessions/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(server.url(&format!("/scanner/sessions/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(server.url("/scanner/sessions/garbage"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn observations_merge_keeps_first_seen() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(server.url("/scan/observations"))
        .json(&json!({
            "passes": [
                [{ "payload": "X", "symbology": "EAN13" }],
                [{ "payload": "X", "symbology": "CODE39" }, { "payload": "Y", "symbology": "QR_CODE" }],
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["count"], 2);
    assert_eq!(body["observations"][0]["payload"], "X");
    assert_eq!(body["observations"][0]["symbology"], "EAN13");
    assert_eq!(body["observations"][1]["payload"], "Y");
}
