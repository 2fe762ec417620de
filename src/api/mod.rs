pub mod models;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::error::QueryError;
use crate::rag::{schema, QueryRecord};
use crate::state::AppState;

use models::{ErrorResponse, ExampleQuery, HealthResponse, QueryRequest};

/// All routes. CORS is wide open, same as the UI expects.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/query", post(query))
        .route("/examples", get(examples))
        .route("/database/schema", get(database_schema))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": state.settings.api_title,
        "version": state.settings.api_version,
        "health": "/health",
    }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.service.health();
    Json(HealthResponse {
        status: status.status,
        timestamp: Utc::now(),
        database_connected: status.database_connected,
        model_configured: status.model_configured,
    })
}

async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryRecord>, QueryError> {
    let record = state
        .service
        .query(&req.query, req.similarity_threshold)
        .await?;
    Ok(Json(record))
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            QueryError::Validation(_) => (StatusCode::BAD_REQUEST, None),
            QueryError::Execution(cause) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(format!("{:#}", cause)))
            }
        };
        if status.is_server_error() {
            error!(error = %self, "query failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            detail,
            timestamp: Utc::now(),
        };
        (status, Json(body)).into_response()
    }
}

const EXAMPLE_QUERIES: [ExampleQuery; 4] = [
    ExampleQuery {
        query: "Qual foi o tempo total de uso do motor (em horas) por chassi?",
        description: "Consulta sobre tempo de uso do motor por equipamento",
    },
    ExampleQuery {
        query: "Qual a categoria de telemetria mais utilizada?",
        description: "Análise de categorias de dados de telemetria",
    },
    ExampleQuery {
        query: "Qual cliente apresenta maior proporção de tempo improdutivo (marcha lenta) ou em baixo uso (carga baixa) em relação ao tempo total do motor?",
        description: "Análise de eficiência por cliente",
    },
    ExampleQuery {
        query: "É possível identificar equipamentos com manutenção preventiva necessária com base nos padrões de uso?",
        description: "Análise preditiva de manutenção",
    },
];

async fn examples() -> Json<serde_json::Value> {
    Json(json!({
        "examples": EXAMPLE_QUERIES,
        "total": EXAMPLE_QUERIES.len(),
        "note": "Estas são consultas de exemplo. Você pode fazer qualquer pergunta relacionada aos dados de telemetria.",
    }))
}

async fn database_schema(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "database_path": state.settings.database_path.display().to_string(),
        "tables": schema::tables(),
        "categories": schema::categories(),
        "note": "Este esquema representa dados de telemetria de uma empresa locadora de maquinário agrícola.",
    }))
}
