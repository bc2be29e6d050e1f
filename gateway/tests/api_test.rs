use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use agrotrust_gateway::ledger::SandboxOptions;
use agrotrust_gateway::{create_router, AppState, RecordStore, SandboxLedger};

const BATCH_ID: &str = "ERD-TUR-2025-001";
// 2025-01-01T00:00:00Z
const HARVEST: u64 = 1_735_689_600;

async fn setup() -> (Router, SandboxLedger) {
    let ledger = SandboxLedger::start(SandboxOptions::default()).await.unwrap();
    let store: Arc<dyn RecordStore> = Arc::new(ledger.clone());
    let app = create_router(
        AppState::new(store, 3001),
        HeaderValue::from_static("http://localhost:3000"),
    );
    (app, ledger)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn upload(app: &Router, file_name: &str, mime: &str, content: &str) -> (StatusCode, Value) {
    let boundary = "agrotrust-test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"csvFile\"; filename=\"{file_name}\"\r\n\
         Content-Type: {mime}\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/batches/upload-csv")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn turmeric_batch() -> Value {
    json!({
        "batchId": BATCH_ID,
        "cropName": "Turmeric",
        "variety": "Erode Manjal",
        "location": "Erode, Tamil Nadu",
        "harvestDate": "2025-01-01",
    })
}

#[tokio::test]
async fn test_add_batch_then_look_it_up() {
    let (app, _ledger) = setup().await;

    let (status, body) = post(&app, "/api/batches/add-batch", turmeric_batch()).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Batch data added successfully to blockchain");
    assert_eq!(body["data"]["harvestDate"], HARVEST);
    assert!(body["data"]["transactionHash"]
        .as_str()
        .unwrap()
        .starts_with("0x"));

    let (status, body) = get(&app, &format!("/api/batches/{BATCH_ID}")).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["batchId"], BATCH_ID);
    assert_eq!(data["batch"]["cropName"], "Turmeric");
    assert_eq!(data["batch"]["exists"], true);
    assert_eq!(data["farmer"]["exists"], false);
    assert_eq!(data["transfers"], json!([]));

    let (_, body) = get(&app, &format!("/api/batches/{BATCH_ID}/exists")).await;
    assert_eq!(body["data"]["exists"], true);

    let (_, body) = get(&app, "/api/batches?limit=5").await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["batches"][0], BATCH_ID);
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let (app, ledger) = setup().await;

    let mut batch = turmeric_batch();
    batch["variety"] = json!("  ");
    let (status, body) = post(&app, "/api/batches/add-batch", batch).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = post(
        &app,
        "/api/batches/add-farmer",
        json!({ "batchId": BATCH_ID, "farmerName": "Dhanasekaran V" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    assert_eq!(ledger.get_batch_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_json_gets_error_envelope() {
    let (app, _ledger) = setup().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/batches/add-batch")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"batchId\":"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_batch_and_route_are_not_found() {
    let (app, _ledger) = setup().await;

    for uri in [
        "/api/batches/NOPE-001",
        "/api/batches/NOPE-001/summary",
        "/api/batches/NOPE-001/transfers",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "Batch not found");
    }

    let (_, body) = get(&app, "/api/batches/NOPE-001/exists").await;
    assert_eq!(body["data"]["exists"], false);

    let (status, body) = get(&app, "/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_contract_rejections_surface_as_server_errors() {
    let (app, _ledger) = setup().await;

    post(&app, "/api/batches/add-batch", turmeric_batch()).await;
    let (status, body) = post(&app, "/api/batches/add-batch", turmeric_batch()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Batch already exists");

    let (status, body) = post(
        &app,
        "/api/batches/add-trace-data",
        json!({ "batchId": "NOPE-001", "notes": "n", "qrCodeHash": "q" }),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Batch does not exist");
}

#[tokio::test]
async fn test_csv_upload_reports_each_row() {
    let (app, ledger) = setup().await;

    let csv = "batchId,cropName,variety,location,harvestDate\n\
               ERD-TUR-2025-010,Turmeric,Erode Manjal,Erode,2025-01-01\n\
               ERD-TUR-2025-011,Turmeric\n";
    let (status, body) = upload(&app, "batches.csv", "text/csv", csv).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(
        body["message"],
        "CSV upload completed. 1 batches added successfully."
    );

    let report = &body["data"];
    assert_eq!(report["totalRows"], 2);
    assert_eq!(report["successful"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["results"][0]["batchId"], "ERD-TUR-2025-010");
    assert_eq!(report["errors"][0]["row"], 3);
    assert_eq!(report["errors"][0]["batchId"], "ERD-TUR-2025-011");

    assert_eq!(ledger.get_batch_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_csv_upload_rejects_bad_files() {
    let (app, _ledger) = setup().await;

    let (status, body) = upload(&app, "batches.json", "application/json", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only CSV files are allowed");

    let (status, body) = upload(&app, "batches.csv", "text/csv", "batchId,cropName\nB1,Rice\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required column: variety");

    let (status, body) = upload(
        &app,
        "batches.csv",
        "text/csv",
        "batchId,cropName,variety,location,harvestDate\n",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "CSV file must contain at least a header and one data row"
    );
}

#[tokio::test]
async fn test_health_and_status() {
    let (app, ledger) = setup().await;

    let (status, body) = get(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["services"]["ledger"]["status"], "connected");

    let (status, body) = get(&app, "/api/health/detailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["services"]["api"]["port"], 3001);

    let (_, body) = get(&app, "/api/test/blockchain").await;
    assert_eq!(body["data"]["connected"], true);

    let (_, body) = get(&app, "/api/ledger/status").await;
    assert_eq!(
        body["data"]["contractAddress"],
        ledger.deployment().address.as_str()
    );
    assert_eq!(body["data"]["signerAuthorized"], true);

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn test_access_management() {
    let (app, ledger) = setup().await;
    let owner = ledger.deployment().owner.clone();
    let other = stellar_strkey::ed25519::PublicKey([7; 32]).to_string();

    let (_, body) = get(&app, &format!("/api/access/{other}")).await;
    assert_eq!(body["data"]["authorized"], false);

    let (status, body) = post(&app, "/api/access/authorize", json!({ "address": other })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["authorized"], true);

    let (_, body) = get(&app, &format!("/api/access/{other}")).await;
    assert_eq!(body["data"]["authorized"], true);

    let (status, _) = post(&app, "/api/access/revoke", json!({ "address": other })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!ledger.is_authorized(&other).await.unwrap());

    let (status, body) = post(&app, "/api/access/revoke", json!({ "address": owner })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Owner cannot be revoked");

    let (status, body) = post(&app, "/api/access/authorize", json!({ "address": "GABC" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid address: GABC");

    let (status, body) = post(&app, "/api/access/authorize", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");
}

#[tokio::test]
async fn test_access_rejects_bad_checksum_address() {
    let (app, ledger) = setup().await;
    let unchecked = format!("G{}", "A".repeat(55));

    let (status, body) = post(&app, "/api/access/authorize", json!({ "address": unchecked })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], format!("Invalid address: {unchecked}"));

    let (status, _) = get(&app, &format!("/api/access/{unchecked}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The ledger keeps serving afterwards.
    let (status, body) = get(&app, "/api/ledger/status").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(ledger.status().await.is_connected());
}

#[tokio::test]
async fn test_full_provenance_trail() {
    let (app, _ledger) = setup().await;

    let steps = [
        ("/api/batches/add-batch", turmeric_batch()),
        (
            "/api/batches/add-farmer",
            json!({
                "batchId": BATCH_ID,
                "farmerName": "Dhanasekaran V",
                "farmLocation": "Perundurai, Erode",
                "contact": "+91-9443000000",
                "farmerId": "FARMER-ERD-014",
            }),
        ),
        (
            "/api/batches/add-cultivation",
            json!({
                "batchId": BATCH_ID,
                "soilType": "Red loam",
                "irrigationType": "Drip",
                "pesticideUsed": "Organic Neem",
                "sowingDate": "2024-09-03",
                "area": 10000,
            }),
        ),
        (
            "/api/batches/add-processing",
            json!({
                "batchId": BATCH_ID,
                "processorName": "Erode Processing Unit",
                "method": "Boiling and sun drying",
                "processingDate": "2025-01-10",
                "processingUnitId": "PU-ERD-03",
            }),
        ),
        (
            "/api/batches/add-lab-result",
            json!({
                "batchId": BATCH_ID,
                "labName": "Spices Board Lab, Kochi",
                "result": "Curcumin 4.2%",
                "testDate": "2025-01-15",
                "reportHash": "ReportHash123",
            }),
        ),
        (
            "/api/batches/add-certificate",
            json!({
                "batchId": BATCH_ID,
                "issuedBy": "GI Registry Chennai",
                "certificateType": "Geographical Indication",
                "issueDate": "2025-01-20",
                "certificateId": "GI-CERT-0420",
            }),
        ),
        (
            "/api/batches/add-transfer",
            json!({
                "batchId": BATCH_ID,
                "from": "Dhanasekaran V",
                "to": "Erode Processing Unit",
                "purpose": "Processing",
                "transferDate": "2025-01-07",
            }),
        ),
        (
            "/api/batches/add-transfer",
            json!({
                "batchId": BATCH_ID,
                "from": "Erode Processing Unit",
                "to": "Chennai Spice Exports",
                "purpose": "Export",
                "transferDate": "2025-01-25",
            }),
        ),
        (
            "/api/batches/add-trace-data",
            json!({
                "batchId": BATCH_ID,
                "notes": "Ready for retail",
                "qrCodeHash": "QrCodeHash123",
            }),
        ),
    ];

    let mut hashes = Vec::new();
    for (uri, body) in steps {
        let (status, response) = post(&app, uri, body).await;
        assert_eq!(status, StatusCode::OK, "{uri}: {response}");
        hashes.push(response["data"]["transactionHash"].as_str().unwrap().to_string());
    }
    let mut unique = hashes.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), hashes.len());

    let (_, body) = get(&app, &format!("/api/batches/{BATCH_ID}")).await;
    let info = &body["data"];
    assert_eq!(info["farmer"]["farmerName"], "Dhanasekaran V");
    assert_eq!(info["cultivation"]["area"], 10000);
    assert_eq!(info["processing"]["processingUnitId"], "PU-ERD-03");
    assert_eq!(info["labResult"]["result"], "Curcumin 4.2%");
    assert_eq!(info["certificate"]["certificateId"], "GI-CERT-0420");
    assert_eq!(info["traceData"]["qrCodeHash"], "QrCodeHash123");
    assert_eq!(info["transfers"][1]["to"], "Chennai Spice Exports");

    let (_, body) = get(&app, &format!("/api/batches/{BATCH_ID}/summary")).await;
    assert_eq!(body["data"]["crop"], "Turmeric - Erode Manjal");
    assert_eq!(body["data"]["farmer"], "Dhanasekaran V");
    assert_eq!(body["data"]["harvestDate"], HARVEST);

    let (_, body) = get(&app, &format!("/api/batches/{BATCH_ID}/transfers")).await;
    assert_eq!(body["data"]["transferCount"], 2);
    assert_eq!(body["data"]["transfers"][0]["index"], 0);
    assert_eq!(body["data"]["transfers"][0]["purpose"], "Processing");
}
