pub mod extract;
pub mod prompt;
pub mod schema;
pub mod shots;
pub mod similarity;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::agent::AgentInvoker;
use crate::config::Settings;
use crate::error::QueryError;

use prompt::PromptBuilder;
use shots::ShotStore;

/// One answered query, as returned to the caller. Not retained here.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRecord {
    pub query: String,
    pub sql_query: String,
    pub result: String,
    pub justification: String,
    /// Wall-clock seconds around the whole invoke-then-parse sequence.
    pub execution_time: f64,
    pub timestamp: DateTime<Utc>,
}

/// Structural health summary: presence checks only, no live round-trips.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database_connected: bool,
    pub model_configured: bool,
    pub database_path: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Composes retrieval, prompt assembly, agent invocation and extraction
/// into a single query operation. Every collaborator is injected at
/// construction and never reassigned; tests substitute a fake invoker.
pub struct QueryService {
    agent: Arc<dyn AgentInvoker>,
    prompt: PromptBuilder,
    database_path: PathBuf,
    model_configured: bool,
}

impl QueryService {
    pub fn new(agent: Arc<dyn AgentInvoker>, store: Arc<ShotStore>, settings: &Settings) -> Self {
        Self {
            agent,
            prompt: PromptBuilder::new(store, settings.similarity_threshold),
            database_path: settings.database_path.clone(),
            model_configured: settings.agent_api_key.is_some(),
        }
    }

    /// Answer one natural-language question. `threshold` overrides the
    /// configured few-shot similarity cutoff for this request only.
    pub async fn query(
        &self,
        text: &str,
        threshold: Option<f64>,
    ) -> Result<QueryRecord, QueryError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(QueryError::Validation(
                "o campo 'query' não pode ser vazio".to_string(),
            ));
        }

        let started = Instant::now();
        let system_prompt = self.prompt.build(text, threshold);
        let input = format!("{}\n\nPergunta: {}", system_prompt, text);

        info!(query = text, prompt_len = input.len(), "agent invocation started");
        let raw = self
            .agent
            .invoke(&input, "")
            .await
            .map_err(QueryError::Execution)?;

        let fields = extract::extract(&raw.output);
        if fields.result == fields.justification {
            // extraction defect per the response contract, never a valid answer
            warn!(query = text, "result and justification are identical");
        }

        let execution_time = started.elapsed().as_secs_f64();
        info!(
            execution_time,
            output_len = raw.output.len(),
            sql_len = fields.sql_query.len(),
            "agent invocation complete"
        );

        Ok(QueryRecord {
            query: text.to_string(),
            sql_query: fields.sql_query,
            result: fields.result,
            justification: fields.justification,
            execution_time,
            timestamp: Utc::now(),
        })
    }

    /// Cheap structural check: the database file exists on disk and a model
    /// API key is configured.
    pub fn health(&self) -> HealthStatus {
        let database_connected = self.database_path.exists();
        let status = if database_connected && self.model_configured {
            "healthy"
        } else {
            "unhealthy"
        };
        HealthStatus {
            status,
            database_connected,
            model_configured: self.model_configured,
            database_path: self.database_path.display().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentOutput;
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned invoker that records the input it was handed.
    struct FakeInvoker {
        output: String,
        last_input: Mutex<Option<String>>,
    }

    impl FakeInvoker {
        fn returning(output: &str) -> Self {
            Self {
                output: output.to_string(),
                last_input: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl AgentInvoker for FakeInvoker {
        async fn invoke(&self, input: &str, _scratchpad: &str) -> Result<AgentOutput> {
            *self.last_input.lock().unwrap() = Some(input.to_string());
            Ok(AgentOutput {
                output: self.output.clone(),
            })
        }
    }

    struct FailingInvoker;

    #[async_trait]
    impl AgentInvoker for FailingInvoker {
        async fn invoke(&self, _input: &str, _scratchpad: &str) -> Result<AgentOutput> {
            anyhow::bail!("connection refused")
        }
    }

    fn service_with(agent: Arc<dyn AgentInvoker>) -> QueryService {
        QueryService::new(agent, Arc::new(ShotStore::new(Vec::new())), &Settings::for_tests())
    }

    #[tokio::test]
    async fn test_blank_query_rejected_before_invocation() {
        let service = service_with(Arc::new(FakeInvoker::returning("unused")));
        let err = service.query("   ", None).await.unwrap_err();
        assert!(matches!(err, QueryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_query_returns_extracted_fields() {
        let output = "Thought: somando horas\nFinal Answer:\n\n### Consulta:\n```sql\nSELECT SUM(Valor) FROM Telemetria\n```\n\n### Resposta:\n42.0\n\n### Justificativa:\nsoma da coluna Valor\n---";
        let service = service_with(Arc::new(FakeInvoker::returning(output)));

        let record = service.query("qual o total de horas?", None).await.unwrap();
        assert_eq!(record.query, "qual o total de horas?");
        assert_eq!(record.sql_query, "SELECT SUM(Valor) FROM Telemetria");
        assert_eq!(record.result, "42.0");
        assert!(record.justification.contains("soma da coluna Valor"));
        assert!(record.execution_time >= 0.0);
    }

    #[tokio::test]
    async fn test_prompt_and_question_are_sent_to_agent() {
        let fake = Arc::new(FakeInvoker::returning("Final Answer: ok"));
        let service = service_with(fake.clone());
        service.query("quantos chassis temos?", None).await.unwrap();

        let input = fake.last_input.lock().unwrap().clone().unwrap();
        assert!(input.contains("CREATE TABLE Chassis"));
        assert!(input.ends_with("Pergunta: quantos chassis temos?"));
    }

    #[tokio::test]
    async fn test_agent_failure_surfaces_as_execution_error() {
        let service = service_with(Arc::new(FailingInvoker));
        let err = service.query("qualquer pergunta", None).await.unwrap_err();
        match err {
            QueryError::Execution(cause) => {
                assert!(format!("{:#}", cause).contains("connection refused"))
            }
            other => panic!("expected execution error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_degraded_output_still_produces_full_record() {
        let service = service_with(Arc::new(FakeInvoker::returning("resposta solta do agente")));
        let record = service.query("pergunta", None).await.unwrap();
        assert_eq!(record.sql_query, extract::SQL_NOT_FOUND);
        assert!(!record.result.is_empty());
        assert!(!record.justification.is_empty());
    }

    #[test]
    fn test_health_unhealthy_without_database_file() {
        let mut settings = Settings::for_tests();
        settings.database_path = std::path::PathBuf::from("does/not/exist.db");
        let service = QueryService::new(
            Arc::new(FailingInvoker),
            Arc::new(ShotStore::new(Vec::new())),
            &settings,
        );

        let health = service.health();
        assert!(!health.is_healthy());
        assert!(!health.database_connected);
        assert!(health.model_configured);
    }

    #[test]
    fn test_health_reports_missing_model_key() {
        let mut settings = Settings::for_tests();
        settings.agent_api_key = None;
        let service = QueryService::new(
            Arc::new(FailingInvoker),
            Arc::new(ShotStore::new(Vec::new())),
            &settings,
        );

        assert!(!service.health().model_configured);
        assert_eq!(service.health().status, "unhealthy");
    }
}
