pub mod analysis;
pub mod config;
pub mod predictor;
pub mod retrospective;
pub mod scoring;

pub use config::ScoringConfig;
pub use predictor::{predict, predict_with_config, AlgorithmOutput, Prediction};

/// Historique déterministe en ordre chronologique, numéros toujours distincts.
#[cfg(test)]
pub(crate) fn make_test_history(n: usize) -> Vec<kinglotto_db::models::HistoricalDataPoint> {
    (0..n)
        .map(|i| {
            let base = (i * 7 % 18) as u8;
            kinglotto_db::models::HistoricalDataPoint {
                date: format!("2024-{:02}-{:02}", (i / 28) % 12 + 1, (i % 28) + 1),
                numbers: [
                    base * 5 + 1,
                    base * 5 + 2,
                    base * 5 + 3,
                    base * 5 + 4,
                    base * 5 + 5,
                ],
            }
        })
        .collect()
}
