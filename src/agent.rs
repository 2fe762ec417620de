use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// One opaque blob of reasoning-loop output.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentOutput {
    pub output: String,
}

/// The external tool-using reasoning loop. Implementations run the whole
/// Thought/Action/Observation cycle against the database and return its
/// raw textual transcript; this crate never looks inside the loop.
#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, input: &str, scratchpad: &str) -> Result<AgentOutput>;
}

#[derive(Debug, Serialize)]
struct InvokeRequest<'a> {
    input: &'a str,
    scratchpad: &'a str,
    model: &'a str,
    temperature: f64,
}

/// Production invoker: one blocking JSON POST to the agent-runner service.
pub struct HttpAgentInvoker {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    api_key: Option<String>,
}

impl HttpAgentInvoker {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.agent_base_url.clone(),
            model: settings.model_name.clone(),
            temperature: settings.temperature,
            api_key: settings.agent_api_key.clone(),
        })
    }

    /// Resolve the invoke endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/invoke") {
            base.to_string()
        } else {
            format!("{}/invoke", base)
        }
    }
}

#[async_trait]
impl AgentInvoker for HttpAgentInvoker {
    async fn invoke(&self, input: &str, scratchpad: &str) -> Result<AgentOutput> {
        let body = InvokeRequest {
            input,
            scratchpad,
            model: &self.model,
            temperature: self.temperature,
        };

        let mut req = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req.send().await.context("agent request failed")?;
        let status = resp.status();
        let text = resp.text().await.context("failed to read agent response")?;

        if !status.is_success() {
            anyhow::bail!("agent returned {}: {}", status, text);
        }

        serde_json::from_str(&text).context("failed to parse agent JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoker_with_base(base_url: &str) -> HttpAgentInvoker {
        let settings = Settings {
            agent_base_url: base_url.to_string(),
            ..Settings::for_tests()
        };
        HttpAgentInvoker::new(&settings).unwrap()
    }

    #[test]
    fn test_endpoint_appends_invoke() {
        assert_eq!(
            invoker_with_base("http://localhost:8001").endpoint(),
            "http://localhost:8001/invoke"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        assert_eq!(
            invoker_with_base("http://localhost:8001/").endpoint(),
            "http://localhost:8001/invoke"
        );
    }

    #[test]
    fn test_endpoint_accepts_full_path() {
        assert_eq!(
            invoker_with_base("http://runner:9000/invoke").endpoint(),
            "http://runner:9000/invoke"
        );
    }
}
