use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Plus grand numéro tirable.
pub const MAX_NUMBER: u8 = 90;

/// Nombre de boules par tirage.
pub const NUMBERS_PER_DRAW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "GH18")]
    Gh18,
    #[serde(rename = "CIV10")]
    Civ10,
    #[serde(rename = "CIV13")]
    Civ13,
    #[serde(rename = "CIV16")]
    Civ16,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Gh18, Category::Civ10, Category::Civ13, Category::Civ16];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Gh18 => "GH18",
            Category::Civ10 => "CIV10",
            Category::Civ13 => "CIV13",
            Category::Civ16 => "CIV16",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .with_context(|| format!("Catégorie inconnue '{}' (GH18, CIV10, CIV13, CIV16)", wanted))
    }
}

/// Tirage prêt à être enregistré (l'identifiant est attribué par la base).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDraw {
    pub category: Category,
    pub date: String,
    pub numbers: [u8; NUMBERS_PER_DRAW],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draw {
    pub id: i64,
    pub category: Category,
    pub date: String,
    pub numbers: [u8; NUMBERS_PER_DRAW],
}

/// Entrée de l'algorithme de prédiction : une date et les 5 numéros tirés.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDataPoint {
    pub date: String,
    pub numbers: [u8; NUMBERS_PER_DRAW],
}

impl From<&Draw> for HistoricalDataPoint {
    fn from(draw: &Draw) -> Self {
        Self {
            date: draw.date.clone(),
            numbers: draw.numbers,
        }
    }
}

pub fn validate_numbers(numbers: &[u8; NUMBERS_PER_DRAW]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > MAX_NUMBER {
            bail!("Numéro {} hors limites (1-{})", n, MAX_NUMBER);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Accepte `AAAA-MM-JJ` ou `JJ/MM/AAAA` et renvoie la forme ISO.
pub fn normalize_date(raw: &str) -> Result<String> {
    let raw = raw.trim();
    let date = if raw.contains('/') {
        NaiveDate::parse_from_str(raw, "%d/%m/%Y")
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    }
    .with_context(|| format!("Format de date invalide: '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}
