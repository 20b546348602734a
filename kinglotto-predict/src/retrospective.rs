use kinglotto_db::models::HistoricalDataPoint;

use crate::config::ScoringConfig;
use crate::scoring::{base_scores, ScoreTable};

/// Résultat de l'analyse d'erreur sur le dernier tirage connu.
#[derive(Debug, Clone)]
pub struct RetrospectiveAdjustment {
    pub scores: ScoreTable,
    /// Ce qu'on aurait prédit sans le dernier tirage.
    pub predicted: Vec<u8>,
    /// Numéros prédits effectivement sortis.
    pub hits: usize,
}

/// Rejoue le score sur tous les tirages sauf le dernier, compare au dernier
/// tirage réel et corrige `current` en conséquence.
///
/// Renvoie `None` s'il n'y a pas assez de tirages pour l'analyse.
pub fn adjust_for_last_draw(
    current: &ScoreTable,
    data: &[HistoricalDataPoint],
    config: &ScoringConfig,
) -> Option<RetrospectiveAdjustment> {
    if data.len() < config.min_draws_for_error_analysis {
        return None;
    }
    let (most_recent, previous) = data.split_last()?;

    let predicted = base_scores(previous, config).top(config.prediction_count);
    let appeared = |number: u8| most_recent.numbers.contains(&number);

    let scores = current.map(|number, score| {
        let was_predicted = predicted.contains(&number);
        let adjusted = match (was_predicted, appeared(number)) {
            (true, false) => score * (1.0 - config.error_penalty_factor),
            (false, true) => score * (1.0 + config.error_boost_factor),
            _ => score,
        };
        adjusted.max(0.0)
    });

    let hits = predicted.iter().filter(|&&n| appeared(n)).count();

    Some(RetrospectiveAdjustment {
        scores,
        predicted,
        hits,
    })
}
