use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Constantes réglables de l'algorithme de prédiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub frequency_weight: f64,
    pub recency_weight: f64,
    /// Un numéro vu dans les `recent_window` derniers tirages reçoit `recent_boost`.
    pub recent_window: usize,
    pub recent_boost: f64,
    /// La pénalité d'ancienneté ne s'applique qu'au-delà de ce nombre de tirages.
    pub stale_min_draws: usize,
    pub stale_penalty: f64,
    pub error_penalty_factor: f64,
    pub error_boost_factor: f64,
    pub min_draws_for_basic_prediction: usize,
    pub min_draws_for_error_analysis: usize,
    pub prediction_count: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            frequency_weight: 0.6,
            recency_weight: 0.4,
            recent_window: 5,
            recent_boost: 1.05,
            stale_min_draws: 10,
            stale_penalty: 0.95,
            error_penalty_factor: 0.05,
            error_boost_factor: 0.03,
            min_draws_for_basic_prediction: 10,
            min_draws_for_error_analysis: 11,
            prediction_count: 5,
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Impossible de lire {:?}", path))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Configuration invalide dans {:?}", path))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Impossible d'écrire {:?}", path))?;
        log::info!("Configuration enregistrée dans {}", path.display());
        Ok(())
    }
}
