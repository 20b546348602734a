use kinglotto_db::models::{HistoricalDataPoint, MAX_NUMBER};

use crate::config::ScoringConfig;

const DOMAIN: usize = MAX_NUMBER as usize;

/// Score de chaque numéro 1..=90. Toujours complet ; chaque transformation
/// produit une nouvelle table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    scores: [f64; DOMAIN],
}

impl ScoreTable {
    fn from_fn(f: impl Fn(u8) -> f64) -> Self {
        let mut scores = [0.0f64; DOMAIN];
        for (idx, score) in scores.iter_mut().enumerate() {
            *score = f(idx as u8 + 1);
        }
        Self { scores }
    }

    /// Score de `number` (0 hors domaine).
    pub fn get(&self, number: u8) -> f64 {
        domain_index(number).map_or(0.0, |idx| self.scores[idx])
    }

    /// Paires (numéro, score) par numéro croissant.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.scores
            .iter()
            .enumerate()
            .map(|(idx, &score)| (idx as u8 + 1, score))
    }

    pub fn max_score(&self) -> f64 {
        self.scores.iter().copied().fold(0.0, f64::max)
    }

    /// Tous les numéros par score décroissant ; à score égal, le plus petit numéro d'abord.
    pub fn ranked(&self) -> Vec<(u8, f64)> {
        let mut ranked: Vec<(u8, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    pub fn top(&self, count: usize) -> Vec<u8> {
        self.ranked()
            .into_iter()
            .take(count)
            .map(|(number, _)| number)
            .collect()
    }

    pub fn map(&self, f: impl Fn(u8, f64) -> f64) -> Self {
        Self::from_fn(|number| f(number, self.scores[(number - 1) as usize]))
    }
}

fn domain_index(number: u8) -> Option<usize> {
    (number as usize).checked_sub(1).filter(|&idx| idx < DOMAIN)
}

/// Score fréquence/récence de chaque numéro.
///
/// `data` est en ordre chronologique (le plus ancien d'abord). La récence est
/// comptée depuis la fin : 0 = tirage le plus récent, `data.len()` = jamais vu.
pub fn base_scores(data: &[HistoricalDataPoint], config: &ScoringConfig) -> ScoreTable {
    let total_draws = data.len();
    let mut frequency = [0u32; DOMAIN];
    let mut last_seen = [total_draws; DOMAIN];

    for (from_end, draw) in data.iter().rev().enumerate() {
        for &n in &draw.numbers {
            let Some(idx) = domain_index(n) else {
                continue;
            };
            frequency[idx] += 1;
            if last_seen[idx] == total_draws {
                last_seen[idx] = from_end;
            }
        }
    }

    let max_frequency = frequency.iter().copied().max().unwrap_or(0);

    ScoreTable::from_fn(|number| {
        let idx = (number - 1) as usize;
        let normalized_frequency = if max_frequency > 0 {
            frequency[idx] as f64 / max_frequency as f64
        } else {
            0.0
        };
        let normalized_recency = if last_seen[idx] < total_draws {
            1.0 - last_seen[idx] as f64 / total_draws as f64
        } else {
            0.0
        };

        let score = normalized_frequency * config.frequency_weight
            + normalized_recency * config.recency_weight;

        if last_seen[idx] < config.recent_window {
            score * config.recent_boost
        } else if last_seen[idx] as f64 > total_draws as f64 / 2.0
            && total_draws > config.stale_min_draws
        {
            score * config.stale_penalty
        } else {
            score
        }
    })
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

    #[test]
    fn test_empty_data_scores_zero() {
        let table = base_scores(&[], &ScoringConfig::default());
        assert_eq!(table.iter().count(), 90);
        assert!(table.iter().all(|(_, s)| s == 0.0));
        assert_eq!(table.max_score(), 0.0);
    }

    #[test]
    fn test_full_domain_covered() {
        let data = make_test_history(12);
        let table = base_scores(&data, &ScoringConfig::default());
        let numbers: Vec<u8> = table.iter().map(|(n, _)| n).collect();
        assert_eq!(numbers, (1..=90).collect::<Vec<u8>>());
        assert!(table.iter().all(|(_, s)| s >= 0.0));
    }

    #[test]
    fn test_number_in_every_draw() {
        let data: Vec<_> = (0..10u8).map(|i| point([7, 10 + i, 30 + i, 50 + i, 70 + i])).collect();
        let table = base_scores(&data, &ScoringConfig::default());
        // fréquence 1, récence 1, bonus récent
        assert!((table.get(7) - 1.05).abs() < 1e-12);
        assert_eq!(table.top(1), vec![7]);
    }

    #[test]
    fn test_exact_blend() {
        // 4 tirages : 1 dans les deux derniers, 2 uniquement dans le plus ancien
        let data = vec![
            point([2, 20, 30, 40, 50]),
            point([3, 21, 31, 41, 51]),
            point([1, 22, 32, 42, 52]),
            point([1, 23, 33, 43, 53]),
        ];
        let table = base_scores(&data, &ScoringConfig::default());
        // freq 2/2, récence 1 - 0/4
        assert!((table.get(1) - (0.6 + 0.4) * 1.05).abs() < 1e-12);
        // freq 1/2, récence 1 - 3/4
        assert!((table.get(2) - (0.5 * 0.6 + 0.25 * 0.4) * 1.05).abs() < 1e-12);
        assert_eq!(table.get(90), 0.0);
    }

    #[test]
    fn test_stale_penalty_needs_enough_draws() {
        let config = ScoringConfig::default();

        // 11 tirages : le numéro 2 n'apparaît que dans le plus ancien
        let mut data = vec![point([2, 20, 30, 40, 50])];
        data.extend((0..10u8).map(|i| point([60 + i, 21, 31, 41, 51])));
        let table = base_scores(&data, &config);
        let expected = (0.1 * 0.6 + (1.0 - 10.0 / 11.0) * 0.4) * 0.95;
        assert!((table.get(2) - expected).abs() < 1e-12);

        // 10 tirages : pas de pénalité
        let table = base_scores(&data[..10], &config);
        let expected = (1.0 / 9.0) * 0.6 + (1.0 - 9.0 / 10.0) * 0.4;
        assert!((table.get(2) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_higher_frequency_scores_higher() {
        // 1 et 2 vus en dernier au même tirage, 1 plus fréquent
        let mut data: Vec<_> = (0..8u8).map(|i| point([10 + i, 30 + i, 50 + i, 70 + i, 80])).collect();
        data[2].numbers[0] = 1;
        data.push(point([1, 2, 3, 4, 5]));
        let table = base_scores(&data, &ScoringConfig::default());
        assert!(table.get(1) > table.get(2));
    }

    #[test]
    fn test_recent_number_scores_higher() {
        let mut data = vec![point([2, 20, 30, 40, 50])];
        data.extend((0..8u8).map(|i| point([60 + i, 21, 31, 41, 51])));
        data.push(point([1, 22, 32, 42, 52]));
        let table = base_scores(&data, &ScoringConfig::default());
        assert!(table.get(1) > table.get(2));
    }

    #[test]
    fn test_ranked_tie_break_ascending() {
        let data = vec![point([50, 40, 30, 20, 10])];
        let table = base_scores(&data, &ScoringConfig::default());
        assert_eq!(table.top(5), vec![10, 20, 30, 40, 50]);
        let ranked = table.ranked();
        assert_eq!(ranked[5].0, 1);
        assert_eq!(ranked[89].0, 90);
    }

    #[test]
    fn test_map_returns_new_table() {
        let data = make_test_history(15);
        let table = base_scores(&data, &ScoringConfig::default());
        let doubled = table.map(|_, s| s * 2.0);
        for (n, s) in table.iter() {
            assert!((doubled.get(n) - 2.0 * s).abs() < 1e-12);
        }
        assert_ne!(table, doubled);
    }

    #[test]
    fn test_out_of_domain_numbers_ignored() {
        let data = vec![point([0, 91, 3, 4, 5])];
        let table = base_scores(&data, &ScoringConfig::default());
        assert_eq!(table.get(0), 0.0);
        assert_eq!(table.get(91), 0.0);
        assert!(table.get(3) > 0.0);
    }
}
