use acctcore::{
    account::{
        Account,
        BatchDeleteReport,
        DeleteOutcome,
    },
    listing::{
        ListingParams,
        Page,
    },
};
use acctctrl::{
    input::{
        AccountInput,
        BatchId,
    },
    platform::Platform,
};
use axum::{
    extract::{
        rejection::JsonRejection,
        Extension,
        Path,
        Query,
    },
    Json,
};
use http::status::StatusCode;
use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::AppError;

#[derive(Debug, Deserialize, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BatchDeleteRequest {
    #[serde(default)]
    pub ids: Option<Value>,
}

fn parse_id(id: &str) -> Result<i64, AppError> {
    id.parse().map_err(|_| AppError::NotFound(id.to_string()))
}

pub async fn list_users(
    platform: Extension<Platform>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<Json<Page<Account>>, AppError> {
    let params = ListingParams::from_query(&query);
    Ok(Json(platform.list_accounts(&params).await?))
}

pub async fn show_user(
    platform: Extension<Platform>,
    Path(id): Path<String>,
) -> Result<Json<Account>, AppError> {
    Ok(Json(platform.get_account(parse_id(&id)?).await?))
}

pub async fn create_user(
    platform: Extension<Platform>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let Json(input) = payload?;
    let account = platform.create_account(input).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update_user(
    platform: Extension<Platform>,
    Path(id): Path<String>,
    payload: Result<Json<AccountInput>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    Ok(Json(platform.update_account(id, input).await?))
}

pub async fn delete_user(
    platform: Extension<Platform>,
    Path(id): Path<String>,
) -> Result<Json<Outcome>, AppError> {
    let id = parse_id(&id)?;
    match platform.delete_account(id).await? {
        DeleteOutcome::Deleted => Ok(Json(Outcome {
            success: true,
            message: "User deleted successfully".to_string(),
        })),
        DeleteOutcome::NotFound => Err(AppError::NotFound(id.to_string())),
    }
}

pub async fn batch_delete_users(
    platform: Extension<Platform>,
    payload: Result<Json<BatchDeleteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchDeleteReport>), AppError> {
    let Json(request) = payload?;
    let ids = match request.ids {
        Some(Value::Array(ids)) if !ids.is_empty() => ids,
        _ => return Err(AppError::BadRequest(
            "Invalid request: ids array is required".to_string()
        )),
    };
    let ids = ids.into_iter()
        .map(|id| serde_json::from_value(id.clone())
            .unwrap_or(BatchId::Other(id)))
        .collect::<Vec<BatchId>>();

    let report = platform.batch_delete(&ids).await;
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    Ok((status, Json(report)))
}
