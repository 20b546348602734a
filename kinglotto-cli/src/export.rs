use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use kinglotto_db::models::Draw;

#[derive(Debug, Serialize)]
struct ExportedDraw<'a> {
    id: String,
    date: &'a str,
    numbers: &'a [u8],
}

/// Tableau JSON `[{id, date, numbers}]`, du plus ancien au plus récent.
pub fn draws_to_json(draws: &[Draw]) -> Result<String> {
    let exported: Vec<ExportedDraw> = draws
        .iter()
        .map(|d| ExportedDraw {
            id: d.id.to_string(),
            date: &d.date,
            numbers: &d.numbers,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&exported)?)
}

pub fn export_json(draws: &[Draw], output: Option<&Path>) -> Result<()> {
    let json = draws_to_json(draws)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Impossible d'écrire {:?}", path))?;
            log::info!("{} tirages exportés vers {}", draws.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinglotto_db::models::Category;

    #[test]
    fn test_draws_to_json() {
        let draws = vec![Draw {
            id: 12,
            category: Category::Gh18,
            date: "2024-07-28".to_string(),
            numbers: [5, 17, 42, 63, 90],
        }];
        let json = draws_to_json(&draws).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["id"], "12");
        assert_eq!(value[0]["date"], "2024-07-28");
        assert_eq!(value[0]["numbers"], serde_json::json!([5, 17, 42, 63, 90]));
        assert!(value[0].get("category").is_none());
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gh18.json");
        export_json(&[], Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
