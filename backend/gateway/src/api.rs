//! Settings API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ccswitch_config::{load_environment, switch_provider, SwitchRequest};
use ccswitch_core::{providers, EnvMap, ProviderDefinition};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::server::GatewayState;
use crate::views::StateView;

type Shared = State<Arc<GatewayState>>;

/// `GET /`: service banner.
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "cc-switch",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/health",
            "/api/providers",
            "/api/state",
            "/api/switch",
            "/api/processes",
            "/api/export-env",
        ],
    }))
}

/// `GET /api/health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "cc-switch",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/providers`
pub async fn list_providers() -> Json<Value> {
    let items: &[ProviderDefinition] = providers::all();
    Json(json!({ "providers": items }))
}

/// `GET /api/state`
pub async fn get_state(State(state): Shared) -> Result<Json<StateView>, ApiError> {
    let current = state.store.load().await?;
    Ok(Json(StateView::from_state(&current)?))
}

/// `POST /api/switch`
pub async fn switch(
    State(state): Shared,
    body: Result<Json<SwitchRequest>, JsonRejection>,
) -> Result<Json<StateView>, ApiError> {
    let Json(request) = body?;
    let next = switch_provider(&state.store, &request).await?;
    info!(provider = %next.provider, "Switched via API");
    Ok(Json(StateView::from_state(&next)?))
}

/// `GET /api/processes`
pub async fn list_processes(State(state): Shared) -> Result<Json<Value>, ApiError> {
    let processes = state.processes.list_alive().await?;
    Ok(Json(json!({ "processes": processes })))
}

/// `GET /api/export-env`: unmasked values.
pub async fn export_env(State(state): Shared) -> Result<Json<EnvMap>, ApiError> {
    let (_, env) = load_environment(&state.store).await?;
    Ok(Json(env))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request, StatusCode};
    use axum::response::IntoResponse;

    fn shared(dir: &std::path::Path) -> Shared {
        State(Arc::new(GatewayState::for_dir(dir)))
    }

    fn request(value: Value) -> Result<Json<SwitchRequest>, JsonRejection> {
        Ok(Json(serde_json::from_value(value).unwrap()))
    }

    async fn raw_body(content_type: &str, body: &'static str) -> Result<Json<SwitchRequest>, JsonRejection> {
        let req = Request::builder()
            .method("POST")
            .uri("/api/switch")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        Json::<SwitchRequest>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn providers_lists_registry() {
        let Json(body) = list_providers().await;
        let ids: Vec<_> = body["providers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["claude", "azure", "glm", "ollama", "kimi", "custom"]);
    }

    #[tokio::test]
    async fn state_defaults_to_passthrough() {
        let tmp = tempfile::tempdir().unwrap();
        let Json(view) = get_state(shared(tmp.path())).await.unwrap();
        assert_eq!(view.provider, "claude");
        assert!(view.env_preview.is_empty());
        assert!(!view.has_auth_token);
    }

    #[tokio::test]
    async fn switch_then_export() {
        let tmp = tempfile::tempdir().unwrap();
        let body = json!({
            "provider": "azure",
            "base_url": "https://x.example/api",
            "auth_token": "secret1"
        });
        let Json(view) = switch(shared(tmp.path()), request(body)).await.unwrap();
        assert_eq!(view.provider, "azure");
        assert_eq!(view.env_preview["ANTHROPIC_FOUNDRY_API_KEY"], "<set>");

        let Json(env) = export_env(shared(tmp.path())).await.unwrap();
        assert_eq!(env["CLAUDE_CODE_USE_FOUNDRY"], "1");
        assert_eq!(env["ANTHROPIC_FOUNDRY_API_KEY"], "secret1");
        assert_eq!(env["ANTHROPIC_BASE_URL"], "");
    }

    #[tokio::test]
    async fn switch_rejects_bad_input() {
        let tmp = tempfile::tempdir().unwrap();
        for body in [
            json!({}),
            json!({ "provider": "openai" }),
            json!({ "provider": "glm", "base_url": "api.z.ai" }),
            json!({ "provider": "glm", "default_tier": "mega" }),
        ] {
            let err = switch(shared(tmp.path()), request(body)).await.unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn processes_empty_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        let Json(body) = list_processes(shared(tmp.path())).await.unwrap();
        assert_eq!(body["processes"], json!([]));
    }

    #[tokio::test]
    async fn malformed_bodies_get_detail_400() {
        let tmp = tempfile::tempdir().unwrap();
        for body in [
            raw_body("application/json", r#"{"provider": "glm", "auth_token": 5}"#).await,
            raw_body("application/json", "{not json").await,
            raw_body("text/plain", r#"{"provider": "glm"}"#).await,
        ] {
            let err = switch(shared(tmp.path()), body).await.unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert!(!err.detail.is_empty());

            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: Value = serde_json::from_slice(&bytes).unwrap();
            assert!(json["detail"].is_string());
        }

        let Json(view) = get_state(shared(tmp.path())).await.unwrap();
        assert_eq!(view.provider, "claude");
    }
}
