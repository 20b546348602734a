use anyhow::{bail, Result};
use chrono::{Months, NaiveDate};

use kinglotto_db::models::{HistoricalDataPoint, MAX_NUMBER};

#[derive(Debug, Clone, PartialEq)]
pub struct NumberFrequency {
    pub number: u8,
    pub frequency: u32,
    /// Part des tirages contenant le numéro, en pourcentage.
    pub percentage: f64,
}

/// Fréquence de chaque numéro 1..=90, par numéro croissant.
pub fn number_frequencies(draws: &[HistoricalDataPoint]) -> Vec<NumberFrequency> {
    let mut counts = vec![0u32; MAX_NUMBER as usize];
    for draw in draws {
        for &n in &draw.numbers {
            let idx = (n as usize).wrapping_sub(1);
            if idx < counts.len() {
                counts[idx] += 1;
            }
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, frequency)| NumberFrequency {
            number: idx as u8 + 1,
            frequency,
            percentage: if draws.is_empty() {
                0.0
            } else {
                frequency as f64 / draws.len() as f64 * 100.0
            },
        })
        .collect()
}

fn by_frequency_desc(freqs: &[NumberFrequency]) -> Vec<NumberFrequency> {
    let mut sorted = freqs.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    sorted
}

pub fn most_frequent(freqs: &[NumberFrequency], n: usize) -> Vec<NumberFrequency> {
    by_frequency_desc(freqs).into_iter().take(n).collect()
}

/// Les `n` moins fréquents, le moins fréquent en premier.
pub fn least_frequent(freqs: &[NumberFrequency], n: usize) -> Vec<NumberFrequency> {
    let sorted = by_frequency_desc(freqs);
    let start = sorted.len().saturating_sub(n);
    sorted[start..].iter().rev().cloned().collect()
}

/// Numéros sortis au moins une fois, les plus fréquents d'abord.
pub fn top_appeared(freqs: &[NumberFrequency], n: usize) -> Vec<NumberFrequency> {
    by_frequency_desc(freqs)
        .into_iter()
        .filter(|f| f.frequency > 0)
        .take(n)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    LastMonth,
    LastQuarter,
    LastYear,
}

impl Period {
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let months = match self {
            Period::All => return None,
            Period::LastMonth => 1,
            Period::LastQuarter => 3,
            Period::LastYear => 12,
        };
        today.checked_sub_months(Months::new(months))
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::All => write!(f, "Toute la période"),
            Period::LastMonth => write!(f, "Dernier mois"),
            Period::LastQuarter => write!(f, "Dernier trimestre"),
            Period::LastYear => write!(f, "Dernière année"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "all" => Ok(Period::All),
            "last-month" => Ok(Period::LastMonth),
            "last-quarter" => Ok(Period::LastQuarter),
            "last-year" => Ok(Period::LastYear),
            other => bail!("Période inconnue '{}' (all, last-month, last-quarter, last-year)", other),
        }
    }
}

/// Garde les tirages datés à partir du début de la période. Hors `All`, les
/// dates illisibles sont écartées.
pub fn filter_by_period(
    draws: &[HistoricalDataPoint],
    period: Period,
    today: NaiveDate,
) -> Vec<HistoricalDataPoint> {
    let Some(start) = period.start_date(today) else {
        return draws.to_vec();
    };
    draws
        .iter()
        .filter(|d| {
            NaiveDate::parse_from_str(&d.date, "%Y-%m-%d")
                .map(|date| date >= start)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Regularity {
    pub number: u8,
    pub total_occurrences: u32,
    /// Nombre de fois où le numéro ressort au tirage suivant.
    pub next_draw_count: u32,
    pub next_draw_frequency: f64,
    /// Numéros tirés en même temps, (numéro, nombre de fois), les plus fréquents d'abord.
    pub companions: Vec<(u8, u32)>,
}

/// Régularité d'un numéro sur des tirages en ordre chronologique croissant.
pub fn number_regularity(draws: &[HistoricalDataPoint], number: u8) -> Regularity {
    let mut total_occurrences = 0u32;
    let mut next_draw_count = 0u32;
    let mut companion_counts = vec![0u32; MAX_NUMBER as usize];

    for (i, draw) in draws.iter().enumerate() {
        if !draw.numbers.contains(&number) {
            continue;
        }
        total_occurrences += 1;

        for &other in &draw.numbers {
            let idx = (other as usize).wrapping_sub(1);
            if other != number && idx < companion_counts.len() {
                companion_counts[idx] += 1;
            }
        }

        if let Some(next) = draws.get(i + 1) {
            if next.numbers.contains(&number) {
                next_draw_count += 1;
            }
        }
    }

    let mut companions: Vec<(u8, u32)> = companion_counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(idx, count)| (idx as u8 + 1, count))
        .collect();
    companions.sort_by(|a, b| b.1.cmp(&a.1));

    let next_draw_frequency = if total_occurrences > 0 {
        next_draw_count as f64 / total_occurrences as f64 * 100.0
    } else {
        0.0
    };

    Regularity {
        number,
        total_occurrences,
        next_draw_count,
        next_draw_frequency,
        companions,
    }
}
