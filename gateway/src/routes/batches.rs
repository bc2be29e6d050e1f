//! Batch lookup, record entry and CSV upload

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, Query, State,
    },
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::{ApiResponse, AppState};
use crate::csv_import;
use crate::error::ApiError;
use crate::forms::{
    BatchForm, CertificateForm, CultivationForm, FarmerForm, LabResultForm, ProcessingForm,
    TraceForm, TransferForm,
};
use crate::records::BatchSummary;

type ApiResult = Result<Json<ApiResponse<Value>>, ApiError>;

const MAX_CSV_BYTES: usize = 5 * 1024 * 1024;
const CSV_MIME_TYPES: [&str; 3] = ["text/csv", "application/csv", "application/vnd.ms-excel"];

fn required_id(batch_id: &str) -> Result<String, ApiError> {
    let batch_id = batch_id.trim();
    if batch_id.is_empty() {
        return Err(ApiError::bad_request("Batch ID is required"));
    }
    Ok(batch_id.to_string())
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/batches?offset&limit
pub async fn list_batches(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let total = state.store.get_batch_count().await?;
    let batches = state.store.list_batches(offset, limit).await?;

    Ok(Json(ApiResponse::ok(json!({
        "batches": batches,
        "total": total,
        "offset": offset,
        "limit": limit,
    }))))
}

/// GET /api/batches/:batch_id
pub async fn get_batch(State(state): State<AppState>, Path(batch_id): Path<String>) -> ApiResult {
    let batch_id = required_id(&batch_id)?;
    let info = state
        .store
        .get_batch_info(&batch_id)
        .await?
        .ok_or_else(ApiError::batch_not_found)?;

    Ok(Json(ApiResponse::ok(json!(info))))
}

/// GET /api/batches/:batch_id/exists
pub async fn batch_exists(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> ApiResult {
    let batch_id = required_id(&batch_id)?;
    let exists = state.store.batch_exists(&batch_id).await?;

    Ok(Json(ApiResponse::ok(json!({
        "batchId": batch_id,
        "exists": exists,
    }))))
}

/// GET /api/batches/:batch_id/summary
pub async fn batch_summary(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> ApiResult {
    let batch_id = required_id(&batch_id)?;
    let batch = state
        .store
        .get_batch(&batch_id)
        .await?
        .ok_or_else(ApiError::batch_not_found)?;
    let farmer = state.store.get_farmer_info(&batch_id).await?;

    Ok(Json(ApiResponse::ok(json!(BatchSummary::new(&batch, &farmer)))))
}

/// GET /api/batches/:batch_id/transfers
pub async fn batch_transfers(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> ApiResult {
    let batch_id = required_id(&batch_id)?;
    if !state.store.batch_exists(&batch_id).await? {
        return Err(ApiError::batch_not_found());
    }
    let transfers = state.store.get_transfer_records(&batch_id).await?;

    Ok(Json(ApiResponse::ok(json!({
        "batchId": batch_id,
        "transferCount": transfers.len(),
        "transfers": transfers,
    }))))
}

/// POST /api/batches/add-batch
pub async fn add_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let batch = form.validate()?;
    let receipt = state.store.create_batch(batch.clone()).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch.batch_id,
            "cropName": batch.crop_name,
            "variety": batch.variety,
            "location": batch.location,
            "harvestDate": batch.harvest_date,
            "transactionHash": receipt.transaction_hash,
        }),
        "Batch data added successfully to blockchain",
    )))
}

/// POST /api/batches/add-farmer
pub async fn add_farmer(
    State(state): State<AppState>,
    payload: Result<Json<FarmerForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, info) = form.validate()?;
    let receipt = state.store.add_farmer_info(&batch_id, info.clone()).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "farmerName": info.farmer_name,
            "farmLocation": info.farm_location,
            "contact": info.contact,
            "farmerId": info.farmer_id,
            "transactionHash": receipt.transaction_hash,
        }),
        "Farmer data added successfully to blockchain",
    )))
}

/// POST /api/batches/add-cultivation
pub async fn add_cultivation(
    State(state): State<AppState>,
    payload: Result<Json<CultivationForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, details) = form.validate()?;
    let receipt = state
        .store
        .add_cultivation_details(&batch_id, details.clone())
        .await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "soilType": details.soil_type,
            "irrigationType": details.irrigation_type,
            "pesticideUsed": details.pesticide_used,
            "sowingDate": details.sowing_date,
            "area": details.area,
            "transactionHash": receipt.transaction_hash,
        }),
        "Cultivation details added successfully to blockchain",
    )))
}

/// POST /api/batches/add-processing
pub async fn add_processing(
    State(state): State<AppState>,
    payload: Result<Json<ProcessingForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, info) = form.validate()?;
    let receipt = state.store.add_processing_info(&batch_id, info.clone()).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "processorName": info.processor_name,
            "method": info.method,
            "processingDate": info.processing_date,
            "processingUnitId": info.processing_unit_id,
            "transactionHash": receipt.transaction_hash,
        }),
        "Processing info added successfully to blockchain",
    )))
}

/// POST /api/batches/add-lab-result
pub async fn add_lab_result(
    State(state): State<AppState>,
    payload: Result<Json<LabResultForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, result) = form.validate()?;
    let receipt = state.store.add_lab_result(&batch_id, result.clone()).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "labName": result.lab_name,
            "result": result.result,
            "testDate": result.test_date,
            "reportHash": result.report_hash,
            "transactionHash": receipt.transaction_hash,
        }),
        "Lab result added successfully to blockchain",
    )))
}

/// POST /api/batches/add-certificate
pub async fn add_certificate(
    State(state): State<AppState>,
    payload: Result<Json<CertificateForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, certificate) = form.validate()?;
    let receipt = state
        .store
        .add_certificate(&batch_id, certificate.clone())
        .await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "issuedBy": certificate.issued_by,
            "certificateType": certificate.certificate_type,
            "issueDate": certificate.issue_date,
            "certificateId": certificate.certificate_id,
            "transactionHash": receipt.transaction_hash,
        }),
        "Certificate added successfully to blockchain",
    )))
}

/// POST /api/batches/add-transfer
pub async fn add_transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, transfer) = form.validate()?;
    let receipt = state
        .store
        .add_transfer_record(&batch_id, transfer.clone())
        .await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "from": transfer.from,
            "to": transfer.to,
            "purpose": transfer.purpose,
            "transferDate": transfer.transfer_date,
            "transactionHash": receipt.transaction_hash,
        }),
        "Transfer record added successfully to blockchain",
    )))
}

/// POST /api/batches/add-trace-data
pub async fn add_trace_data(
    State(state): State<AppState>,
    payload: Result<Json<TraceForm>, JsonRejection>,
) -> ApiResult {
    let Json(form) = payload?;
    let (batch_id, trace) = form.validate()?;
    let receipt = state.store.add_trace_data(&batch_id, trace.clone()).await?;

    Ok(Json(ApiResponse::with_message(
        json!({
            "batchId": batch_id,
            "notes": trace.notes,
            "qrCodeHash": trace.qr_code_hash,
            "transactionHash": receipt.transaction_hash,
        }),
        "Trace data added successfully to blockchain",
    )))
}

/// POST /api/batches/upload-csv (multipart field `csvFile`)
pub async fn upload_csv(
    State(state): State<AppState>,
    payload: Result<Multipart, MultipartRejection>,
) -> ApiResult {
    let mut multipart = payload?;
    let mut content = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("csvFile") {
            continue;
        }
        if let Some(mime) = field.content_type() {
            let essence = mime.split(';').next().unwrap_or_default().trim();
            if !CSV_MIME_TYPES.iter().any(|csv| csv.eq_ignore_ascii_case(essence)) {
                return Err(ApiError::bad_request("Only CSV files are allowed"));
            }
        }
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        if bytes.len() > MAX_CSV_BYTES {
            return Err(ApiError::bad_request("CSV file exceeds the 5 MB limit"));
        }
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| ApiError::bad_request("CSV file must be UTF-8 encoded"))?;
        info!(file = ?file_name, bytes = bytes.len(), "CSV upload received");
        content = Some(text);
    }

    let content = content.ok_or_else(|| ApiError::bad_request("No CSV file uploaded"))?;
    let report = csv_import::import(state.store.as_ref(), &content)
        .await
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let message = format!(
        "CSV upload completed. {} batches added successfully.",
        report.successful
    );
    Ok(Json(ApiResponse::with_message(json!(report), message)))
}
