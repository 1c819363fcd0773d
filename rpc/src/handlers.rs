//! RPC request handlers and their wire types.
//!
//! Registry calls touch the store synchronously, so every handler hops onto
//! the blocking pool before calling into it.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use idlink_verification::{SessionRegistry, VerificationError, VerifyRequest};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RpcError;

pub type SharedRegistry = Arc<SessionRegistry>;

/// Body returned by the click-through confirmation page.
pub const CONFIRMED_TEXT: &str = "Verification confirmed. You can close this page.";

// ── Wire types ───────────────────────────────────────────────────────────

/// Account ids arrive as strings or as bare JSON numbers depending on the
/// client; both are carried as their decimal text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeRequest {
    #[serde(default, alias = "identity", deserialize_with = "scalar_string")]
    pub discord_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateCodeResponse {
    pub code: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmParams {
    #[serde(default, alias = "identity")]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPayload {
    #[serde(default, alias = "identity", deserialize_with = "scalar_string")]
    pub discord_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, alias = "externalUsername", deserialize_with = "scalar_string")]
    pub roblox_id: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    #[serde(default, alias = "identity")]
    pub discord_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub confirmed: bool,
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// Run a registry call on the blocking pool.
async fn blocking<T, F>(registry: SharedRegistry, f: F) -> Result<T, RpcError>
where
    T: Send + 'static,
    F: FnOnce(&SessionRegistry) -> Result<T, VerificationError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(&registry)).await?;
    result.map_err(RpcError::from)
}

pub async fn health() -> &'static str {
    "Backend is running"
}

pub async fn generate_code(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<GenerateCodeRequest>, JsonRejection>,
) -> Result<Json<GenerateCodeResponse>, RpcError> {
    let Json(body) = payload?;
    let identity = body.discord_id.unwrap_or_default();
    let code = blocking(registry, move |r| r.issue_code(&identity)).await?;
    Ok(Json(GenerateCodeResponse {
        code: code.as_str().to_string(),
    }))
}

pub async fn confirm(
    State(registry): State<SharedRegistry>,
    params: Result<Query<ConfirmParams>, QueryRejection>,
) -> Result<&'static str, RpcError> {
    let Query(params) = params?;
    let identity = params.discord_id.unwrap_or_default();
    let code = params.code.unwrap_or_default();
    blocking(registry, move |r| r.confirm_by_click(&identity, &code)).await?;
    Ok(CONFIRMED_TEXT)
}

pub async fn verify(
    State(registry): State<SharedRegistry>,
    payload: Result<Json<VerifyPayload>, JsonRejection>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let Json(body) = payload?;
    blocking(registry, move |r| {
        r.verify_with_payload(&VerifyRequest {
            identity: body.discord_id.as_deref().unwrap_or_default(),
            code: body.code.as_deref().unwrap_or_default(),
            external_username: body.roblox_id.as_deref().unwrap_or_default(),
            fingerprint: body.fingerprint.as_deref().unwrap_or_default(),
            ip: body.ip.as_deref().unwrap_or_default(),
        })
    })
    .await?;
    Ok(Json(VerifyResponse { success: true }))
}

pub async fn status(
    State(registry): State<SharedRegistry>,
    params: Result<Query<StatusParams>, QueryRejection>,
) -> Result<Json<StatusResponse>, RpcError> {
    let Query(params) = params?;
    let identity = params.discord_id.unwrap_or_default();
    let confirmed = blocking(registry, move |r| r.query_status(&identity)).await?;
    Ok(Json(StatusResponse { confirmed }))
}
