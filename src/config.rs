use std::path::PathBuf;

/// Runtime configuration, loaded once from `.env` / environment variables.
/// Every field has a default so a bare environment still boots.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_title: String,
    pub api_version: String,
    pub bind_addr: String,
    /// SQLite file the agent runner queries. This service only checks its
    /// presence for the health report; it never opens it.
    pub database_path: PathBuf,
    /// JSON file of validated `{request, sql}` pairs for few-shot retrieval.
    pub shots_path: PathBuf,
    pub agent_base_url: String,
    pub agent_api_key: Option<String>,
    pub model_name: String,
    pub temperature: f64,
    pub similarity_threshold: f64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            api_title: var_or("API_TITLE", "Telemetria RAG API"),
            api_version: var_or("API_VERSION", env!("CARGO_PKG_VERSION")),
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:8000"),
            database_path: PathBuf::from(var_or("DATABASE_PATH", "data/telemetria.db")),
            shots_path: PathBuf::from(var_or("SHOTS_PATH", "data/consultas_validadas.json")),
            agent_base_url: var_or("AGENT_BASE_URL", "http://localhost:8001"),
            agent_api_key: dotenv::var("AGENT_API_KEY").ok().filter(|k| !k.is_empty()),
            model_name: var_or("MODEL_NAME", "gemini-2.5-flash"),
            temperature: var_f64("TEMPERATURE", 0.0),
            similarity_threshold: var_f64("SIMILARITY_THRESHOLD", 0.7),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| default.to_string())
}

fn var_f64(key: &str, default: f64) -> f64 {
    dotenv::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
impl Settings {
    /// Fixed settings for unit tests, nothing read from the environment.
    pub fn for_tests() -> Self {
        Self {
            api_title: "Telemetria RAG API".to_string(),
            api_version: "0.0.0-test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            database_path: PathBuf::from("data/telemetria.db"),
            shots_path: PathBuf::from("data/consultas_validadas.json"),
            agent_base_url: "http://localhost:8001".to_string(),
            agent_api_key: Some("test-key".to_string()),
            model_name: "gemini-2.5-flash".to_string(),
            temperature: 0.0,
            similarity_threshold: 0.7,
        }
    }
}
