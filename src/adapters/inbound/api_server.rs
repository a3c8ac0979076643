//! Resolution API Server
//!
//! HTTP front for the resolution pipeline. Clients post free text and get
//! back the resolved entities and a GeoJSON FeatureCollection of the
//! countries mentioned.

use crate::application::{PipelineError, ResolutionOutcome, ResolutionService};
use crate::domain::geometry::FeatureCollection;
use crate::infrastructure::{shutdown_signal, ShutdownController};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// `?text=` query form of a request.
#[derive(Debug, Default, Deserialize)]
pub struct TextQuery {
    pub text: Option<String>,
}

/// JSON body form of a request.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(alias = "inputText")]
    pub text: String,
}

/// One resolved entity as the map front end reads it:
/// `[["Found entities:", name], ["Latitude:", lat], ["Longitude:", lon]]`.
pub type EntityTriple = ((&'static str, String), (&'static str, f64), (&'static str, f64));

/// Response to `POST /newText`.
#[derive(Debug, Serialize)]
pub struct NewTextResponse {
    pub entities: Vec<EntityTriple>,
    pub selected_countries_geojson_path: FeatureCollection,
}

impl From<ResolutionOutcome> for NewTextResponse {
    fn from(outcome: ResolutionOutcome) -> Self {
        let entities = outcome
            .entities
            .into_iter()
            .map(|e| {
                (
                    ("Found entities:", e.name),
                    ("Latitude:", e.latitude),
                    ("Longitude:", e.longitude),
                )
            })
            .collect();
        Self {
            entities,
            selected_countries_geojson_path: outcome.feature_collection,
        }
    }
}

/// Health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cache_entries: usize,
    pub lookups_in_flight: usize,
    pub lookup_slots_available: usize,
    pub geocoders: Vec<String>,
}

/// API Server state.
#[derive(Clone)]
pub struct ApiState {
    pub service: Arc<ResolutionService>,
    pub shutdown: ShutdownController,
}

impl ApiState {
    pub fn new(service: Arc<ResolutionService>, shutdown: ShutdownController) -> Self {
        Self { service, shutdown }
    }
}

/// Build the router. Exposed for in-process tests.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/newText", post(new_text_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API Server.
pub struct ApiServer {
    listen_addr: String,
    state: ApiState,
}

impl ApiServer {
    pub fn new(listen_addr: String, state: ApiState) -> Self {
        Self { listen_addr, state }
    }

    /// Serve until a shutdown signal arrives, then let in-flight requests
    /// finish.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run(self) -> anyhow::Result<()> {
        let shutdown = self.state.shutdown.clone();
        let app = router(self.state);

        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("resolution API listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_handler(State(state): State<ApiState>) -> impl IntoResponse {
    let status = if state.shutdown.is_shutdown() {
        "shutting_down"
    } else {
        "ok"
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache_entries: state.service.context().cache().len(),
        lookups_in_flight: state.service.context().limiter().in_flight(),
        lookup_slots_available: state.service.context().limiter().available(),
        geocoders: state
            .service
            .geocoder_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

async fn new_text_handler(
    State(state): State<ApiState>,
    Query(query): Query<TextQuery>,
    body: Bytes,
) -> Response {
    if state.shutdown.is_shutdown() {
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "server is shutting down");
    }

    let text = match request_text(query, &body) {
        Ok(text) => text,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, &message),
    };

    tracing::debug!("resolving text of {} bytes", text.len());

    let _run = state.shutdown.run_guard();
    match state.service.run(&text).await {
        Ok(outcome) => (StatusCode::OK, Json(NewTextResponse::from(outcome))).into_response(),
        Err(PipelineError::Extraction(e)) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// The query parameter wins over the body.
fn request_text(query: TextQuery, body: &[u8]) -> Result<String, String> {
    if let Some(text) = query.text.filter(|t| !t.trim().is_empty()) {
        return Ok(text);
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err("missing text: send ?text= or a JSON body {\"text\": ...}".to_string());
    }

    let request: TextRequest =
        serde_json::from_slice(body).map_err(|e| format!("invalid request body: {}", e))?;
    Ok(request.text)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{ScriptedGeocoder, StaticBoundarySource, StaticRecognizer};
    use crate::application::{PipelineSettings, ResolutionContext};
    use crate::domain::ports::GeocodingBackend;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn state_with(recognizer: StaticRecognizer) -> ApiState {
        let geo = ScriptedGeocoder::new()
            .hit("France", 46.6, 2.2, "France")
            .hit("Paris", 48.85, 2.35, "Paris, Île-de-France, France");
        let service = ResolutionService::new(
            ResolutionContext::default(),
            Arc::new(recognizer),
            vec![Arc::new(geo) as Arc<dyn GeocodingBackend>],
            Arc::new(StaticBoundarySource::new().square("FRA", 2.0)),
            PipelineSettings::default(),
        );
        ApiState::new(Arc::new(service), ShutdownController::new())
    }

    fn test_state() -> ApiState {
        state_with(StaticRecognizer::new(&[("Paris", "GPE")]))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // ===== Request Parsing Tests =====

    #[test]
    fn test_request_text_prefers_query() {
        let query = TextQuery {
            text: Some("from query".to_string()),
        };
        assert_eq!(
            request_text(query, br#"{"text": "from body"}"#).unwrap(),
            "from query"
        );
    }

    #[test]
    fn test_request_text_body_and_alias() {
        assert_eq!(
            request_text(TextQuery::default(), br#"{"text": "a"}"#).unwrap(),
            "a"
        );
        assert_eq!(
            request_text(TextQuery::default(), br#"{"inputText": "b"}"#).unwrap(),
            "b"
        );
    }

    #[test]
    fn test_request_text_missing() {
        assert!(request_text(TextQuery::default(), b"").is_err());
        assert!(request_text(TextQuery { text: Some("  ".into()) }, b" \n").is_err());
        assert!(request_text(TextQuery::default(), b"{not json").is_err());
    }

    #[test]
    fn test_response_entity_shape() {
        let outcome = ResolutionOutcome {
            entities: vec![crate::domain::entities::EntityRecord {
                name: "Paris".to_string(),
                iso3: None,
                latitude: 48.85,
                longitude: 2.35,
            }],
            feature_collection: FeatureCollection::default(),
        };

        let json = serde_json::to_value(NewTextResponse::from(outcome)).unwrap();

        assert_eq!(
            json["entities"][0],
            serde_json::json!([["Found entities:", "Paris"], ["Latitude:", 48.85], ["Longitude:", 2.35]])
        );
        assert_eq!(json["selected_countries_geojson_path"]["type"], "FeatureCollection");
    }

    // ===== Handler Tests =====

    #[tokio::test]
    async fn test_health_handler() {
        let app = router(test_state());

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["geocoders"], serde_json::json!(["scripted"]));
        assert_eq!(json["lookups_in_flight"], 0);
        assert_eq!(json["lookup_slots_available"], 5);
    }

    #[tokio::test]
    async fn test_new_text_json_body() {
        let app = router(test_state());

        let response = app
            .oneshot(post_json("/newText", serde_json::json!({"text": "I love Paris and France"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["entities"].as_array().unwrap().len(), 2);
        assert_eq!(json["entities"][0][0][1], "France");
        assert_eq!(json["entities"][1][0][1], "Paris");
        let features = json["selected_countries_geojson_path"]["features"]
            .as_array()
            .unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["iso_code"], "FRA");
        assert_eq!(features[0]["properties"]["style"]["fillOpacity"], 0.5);
    }

    #[tokio::test]
    async fn test_new_text_query_param() {
        let app = router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/newText?text=I%20love%20Paris")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["entities"][0][0][1], "Paris");
        assert_eq!(json["entities"][0][1][1], 48.85);
    }

    #[tokio::test]
    async fn test_new_text_missing_text() {
        let app = router(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/newText")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("missing text"));
    }

    #[tokio::test]
    async fn test_new_text_extraction_failure() {
        let app = router(state_with(StaticRecognizer::failing()));

        let response = app
            .oneshot(post_json("/newText", serde_json::json!({"text": "Paris"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("unreachable"));
    }

    #[tokio::test]
    async fn test_new_text_rejected_during_shutdown() {
        let state = test_state();
        state.shutdown.shutdown();
        let app = router(state);

        let response = app
            .oneshot(post_json("/newText", serde_json::json!({"text": "Paris"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let app = router(test_state());

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/newText")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_api_server_run_and_graceful_shutdown() {
        use std::time::Duration;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let state = test_state();
        let shutdown = state.shutdown.clone();
        let server = ApiServer::new(addr.to_string(), state);
        let server_handle = tokio::spawn(server.run());

        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = reqwest::Client::new();
        let response = client
            .get(format!("http://{}/health", addr))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        shutdown.shutdown();
        let finished = tokio::time::timeout(Duration::from_secs(2), server_handle).await;
        assert!(finished.is_ok());
    }
}
