use serde::{Deserialize, Serialize};

use kinglotto_db::models::{Category, HistoricalDataPoint};

use crate::config::ScoringConfig;
use crate::retrospective::adjust_for_last_draw;
use crate::scoring::{base_scores, ScoreTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub number: u8,
    /// Score normalisé dans [0, 1], pas une probabilité.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmOutput {
    pub predictions: Vec<Prediction>,
    pub analysis_performed: bool,
}

impl AlgorithmOutput {
    fn insufficient() -> Self {
        Self {
            predictions: Vec::new(),
            analysis_performed: false,
        }
    }
}

/// Prédit les 5 numéros du prochain tirage avec les constantes par défaut.
///
/// `historical_data` doit être trié du plus ancien au plus récent ; l'ordre
/// n'est pas vérifié. Un résultat sans prédiction signifie qu'il n'y a pas
/// assez de tirages.
pub fn predict(category: Category, historical_data: &[HistoricalDataPoint]) -> AlgorithmOutput {
    predict_with_config(category, historical_data, &ScoringConfig::default())
}

pub fn predict_with_config(
    category: Category,
    historical_data: &[HistoricalDataPoint],
    config: &ScoringConfig,
) -> AlgorithmOutput {
    let total_draws = historical_data.len();
    if total_draws < config.min_draws_for_basic_prediction {
        log::warn!(
            "Données insuffisantes pour {}: {} tirages requis, {} disponibles",
            category,
            config.min_draws_for_basic_prediction,
            total_draws
        );
        return AlgorithmOutput::insufficient();
    }

    let current = base_scores(historical_data, config);

    let (scores, analysis_performed) = match adjust_for_last_draw(&current, historical_data, config) {
        Some(adjustment) => {
            log::debug!(
                "{}: analyse rétrospective {:?}, {} numéro(s) sorti(s)",
                category,
                adjustment.predicted,
                adjustment.hits
            );
            (adjustment.scores, true)
        }
        None => (current, false),
    };

    AlgorithmOutput {
        predictions: select_predictions(&scores, config.prediction_count),
        analysis_performed,
    }
}

/// Retient les `count` meilleurs numéros distincts, confiance = score / score max.
pub fn select_predictions(scores: &ScoreTable, count: usize) -> Vec<Prediction> {
    let max_score = scores.max_score();
    let confidence = |score: f64| {
        if max_score > 0.0 {
            (score / max_score).min(1.0)
        } else {
            0.0
        }
    };
    let ranked = scores.ranked();

    let mut predictions: Vec<Prediction> = Vec::with_capacity(count);
    for &(number, score) in ranked.iter().take(count) {
        if !predictions.iter().any(|p| p.number == number) {
            predictions.push(Prediction {
                number,
                confidence: confidence(score),
            });
        }
    }

    // Complète avec les suivants si des doublons ont été écartés ; s'arrête
    // quand les 90 candidats sont épuisés.
    while predictions.len() < count {
        let next = ranked
            .iter()
            .find(|(number, _)| !predictions.iter().any(|p| p.number == *number));
        let Some(&(number, score)) = next else {
            break;
        };
        predictions.push(Prediction {
            number,
            confidence: confidence(score),
        });
    }

    predictions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    predictions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::make_test_history;

    fn point(numbers: [u8; 5]) -> HistoricalDataPoint {
        HistoricalDataPoint {
            date: "2024-01-01".to_string(),
            numbers,
        }
    }

    fn assert_valid(output: &AlgorithmOutput) {
        assert_eq!(output.predictions.len(), 5);
        for (i, p) in output.predictions.iter().enumerate() {
            assert!((1..=90).contains(&p.number), "numéro {}", p.number);
            assert!((0.0..=1.0).contains(&p.confidence), "confiance {}", p.confidence);
            assert!(
                output.predictions[i + 1..].iter().all(|q| q.number != p.number),
                "doublon {}",
                p.number
            );
        }
        for pair in output.predictions.windows(2) {
            assert!(pair[0].confidence >= pair[1].confidence);
        }
    }

    #[test]
    fn test_empty_history() {
        let output = predict(Category::Gh18, &[]);
        assert!(output.predictions.is_empty());
        assert!(!output.analysis_performed);
    }

    #[test]
    fn test_nine_draws_insufficient() {
        let output = predict(Category::Civ10, &make_test_history(9));
        assert_eq!(output, AlgorithmOutput { predictions: vec![], analysis_performed: false });
    }

    #[test]
    fn test_ten_draws_without_analysis() {
        let output = predict(Category::Civ13, &make_test_history(10));
        assert_valid(&output);
        assert!(!output.analysis_performed);
    }

    #[test]
    fn test_eleven_draws_with_analysis() {
        let output = predict(Category::Civ16, &make_test_history(11));
        assert_valid(&output);
        assert!(output.analysis_performed);
    }

    #[test]
    fn test_valid_output_for_many_sizes() {
        for n in 10..60 {
            let output = predict(Category::Gh18, &make_test_history(n));
            assert_valid(&output);
            assert_eq!(output.analysis_performed, n >= 11);
        }
    }

    #[test]
    fn test_idempotent() {
        let data = make_test_history(40);
        assert_eq!(predict(Category::Gh18, &data), predict(Category::Gh18, &data));
    }

    #[test]
    fn test_number_in_every_draw_predicted_first() {
        let data: Vec<_> = (0..10u8).map(|i| point([7, 10 + i, 30 + i, 50 + i, 70 + i])).collect();
        let output = predict(Category::Gh18, &data);
        assert_valid(&output);
        assert_eq!(output.predictions[0].number, 7);
        assert!((output.predictions[0].confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_top_confidence_is_one() {
        let output = predict(Category::Civ10, &make_test_history(33));
        assert!((output.predictions[0].confidence - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ties_resolved_by_ascending_number() {
        // Tous les tirages identiques : 5 numéros à égalité parfaite
        let data: Vec<_> = (0..10).map(|_| point([88, 44, 22, 66, 11])).collect();
        let output = predict(Category::Gh18, &data);
        let numbers: Vec<u8> = output.predictions.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![11, 22, 44, 66, 88]);
        assert!(output.predictions.iter().all(|p| (p.confidence - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_all_zero_scores_give_zero_confidence() {
        let table = base_scores(&[], &ScoringConfig::default());
        let predictions = select_predictions(&table, 5);
        assert_eq!(predictions.len(), 5);
        assert!(predictions.iter().all(|p| p.confidence == 0.0));
        let numbers: Vec<u8> = predictions.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_selection_capped_by_domain() {
        let table = base_scores(&make_test_history(20), &ScoringConfig::default());
        let predictions = select_predictions(&table, 120);
        assert_eq!(predictions.len(), 90);
    }

    #[test]
    fn test_custom_prediction_count() {
        let config = ScoringConfig {
            prediction_count: 8,
            ..ScoringConfig::default()
        };
        let output = predict_with_config(Category::Gh18, &make_test_history(15), &config);
        assert_eq!(output.predictions.len(), 8);
    }

    #[test]
    fn test_output_json_field_names() {
        let output = predict(Category::Gh18, &make_test_history(12));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["analysisPerformed"], serde_json::Value::Bool(true));
        assert_eq!(json["predictions"].as_array().unwrap().len(), 5);
        assert!(json["predictions"][0]["confidence"].is_number());
    }
}
