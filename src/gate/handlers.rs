//! HTTP request handlers for the gateway

use crate::{CredentialResolver, Dispatcher, Error, GenerationResponse, ProviderId};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Gateway state shared across handlers
#[derive(Clone)]
pub struct GatewayState {
    pub dispatcher: Arc<Dispatcher>,
    pub credentials: CredentialResolver,
}

/// Flat query-parameter form of a generation request.
///
/// Missing fields decode as empty strings so that the dispatcher, not the
/// extractor, reports what is wrong.
#[derive(Debug, Deserialize)]
pub struct GenerateParams {
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default, alias = "model")]
    pub ai_model: String,
}

/// Classified error rendered as `{"classification", "detail"}`
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(json!({
            "classification": self.0.classification(),
            "detail": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Handle `GET /ai/generate?input=..&provider=..&ai_model=..`
pub async fn generate_handler(
    State(state): State<GatewayState>,
    params: Result<Query<GenerateParams>, QueryRejection>,
) -> Result<Json<GenerationResponse>, ApiError> {
    // Duplicate or malformed keys still answer with a classified error
    let Query(params) = params.map_err(|rejection| Error::InvalidRequest(rejection.body_text()))?;
    let response = state
        .dispatcher
        .generate(&params.input, &params.provider, &params.ai_model)
        .await?;
    Ok(Json(response))
}

/// Handle provider list request
pub async fn list_providers(State(state): State<GatewayState>) -> Json<Value> {
    let registry = state.dispatcher.registry();
    let data: Vec<Value> = ProviderId::ALL
        .iter()
        .map(|&provider| {
            let adapter = registry.resolve(provider).ok();
            let credential_configured = CredentialResolver::api_key_names(provider).is_empty()
                || state.credentials.api_key(provider).is_some();
            json!({
                "id": provider,
                "name": provider.display_name(),
                "aliases": provider.aliases(),
                "registered": adapter.is_some(),
                "timeout_secs": adapter.map(|a| a.timeout().as_secs()),
                "credential_configured": credential_configured,
                "api_base": state.credentials.public_base_url(provider),
            })
        })
        .collect();

    Json(json!({
        "object": "list",
        "data": data
    }))
}
