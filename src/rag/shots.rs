use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::similarity;

/// Fixed sentence that opens a non-empty few-shot block.
const SHOTS_INTRO: &str =
    "Eis alguns exemplos de conversões de pedidos para consultas SQLite bem-sucedidas:\n---\n";

/// A previously validated natural-language request and the SQL it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub request: String,
    pub sql: String,
}

/// Read-only store of validated shots. Loaded once at startup; insertion
/// order is preserved in everything it renders.
pub struct ShotStore {
    shots: Vec<Shot>,
}

impl ShotStore {
    pub fn new(shots: Vec<Shot>) -> Self {
        Self { shots }
    }

    /// Load the store from a JSON file of `[{request, sql}, ...]` entries.
    /// A missing file is an empty store, not an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "validated-query file not found, starting empty");
            return Ok(Self::new(Vec::new()));
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let shots: Vec<Shot> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        debug!(count = shots.len(), path = %path.display(), "validated queries loaded");
        Ok(Self::new(shots))
    }

    pub fn len(&self) -> usize {
        self.shots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shots.is_empty()
    }

    /// Render the few-shot block for a query: every stored shot whose
    /// request scores strictly above `threshold` against the query, in
    /// store order. Returns an empty string when nothing qualifies; the
    /// caller omits the section, it is not an error.
    pub fn retrieve(&self, query: &str, threshold: f64) -> String {
        if query.trim().is_empty() {
            return String::new();
        }

        let mut block = String::new();
        for shot in &self.shots {
            if similarity::score(&shot.request, query) > threshold {
                block.push_str(&format!(
                    "\n---\n**PEDIDO DO USUÁRIO:** {}\n\n**CONSULTA GERADA:**\n```sql\n{}\n```\n",
                    shot.request, shot.sql
                ));
            }
        }

        if block.is_empty() {
            block
        } else {
            format!("{}{}", SHOTS_INTRO, block)
        }
    }
}
