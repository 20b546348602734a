use anyhow::{Context, Result};
use kinglotto_db::rusqlite::Connection;
use std::path::Path;

use kinglotto_db::db::insert_draw;
use kinglotto_db::models::{normalize_date, validate_numbers, Category, NewDraw};

/// Ligne attendue : `date;n1;n2;n3;n4;n5` (date en JJ/MM/AAAA ou AAAA-MM-JJ).
fn parse_record(record: &csv::StringRecord, category: Category) -> Result<NewDraw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let date = normalize_date(&get(0)?)?;
    let numbers = [get_u8(1)?, get_u8(2)?, get_u8(3)?, get_u8(4)?, get_u8(5)?];
    validate_numbers(&numbers)?;

    Ok(NewDraw {
        category,
        date,
        numbers,
    })
}

#[derive(Debug, Default)]
pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path, category: Category) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn.unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult::default();

    for record_result in reader.records() {
        result.total_records += 1;
        let line = result.total_records;
        let draw = match record_result
            .context("Erreur de lecture")
            .and_then(|record| parse_record(&record, category))
        {
            Ok(draw) => draw,
            Err(e) => {
                log::warn!("Ligne {} ignorée : {:#}", line, e);
                result.errors += 1;
                continue;
            }
        };
        match insert_draw(&tx, &draw) {
            Ok(true) => result.inserted += 1,
            Ok(false) => result.skipped += 1,
            Err(e) => {
                log::warn!("Erreur insertion ligne {} : {:#}", line, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    log::info!(
        "Import {} depuis {:?} : {} insérés, {} doublons, {} erreurs",
        category,
        path,
        result.inserted,
        result.skipped,
        result.errors
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinglotto_db::db::{count_draws, fetch_history, migrate};

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_record() {
        let draw = parse_record(&record(&["28/07/2024", "5", "17", " 42", "63", "90"]), Category::Gh18).unwrap();
        assert_eq!(draw.date, "2024-07-28");
        assert_eq!(draw.numbers, [5, 17, 42, 63, 90]);
        assert_eq!(draw.category, Category::Gh18);
    }

    #[test]
    fn test_parse_record_rejects_invalid() {
        assert!(parse_record(&record(&["2024-07-28", "5", "17", "42", "63"]), Category::Gh18).is_err());
        assert!(parse_record(&record(&["2024-07-28", "5", "17", "42", "63", "91"]), Category::Gh18).is_err());
        assert!(parse_record(&record(&["2024-07-28", "5", "5", "42", "63", "90"]), Category::Gh18).is_err());
        assert!(parse_record(&record(&["32/07/2024", "1", "2", "3", "4", "5"]), Category::Gh18).is_err());
        assert!(parse_record(&record(&["2024-07-28", "a", "2", "3", "4", "5"]), Category::Gh18).is_err());
    }

    #[test]
    fn test_import_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tirages.csv");
        std::fs::write(
            &path,
            "date;n1;n2;n3;n4;n5\n\
             01/07/2024;1;2;3;4;5\n\
             2024-07-02;10;20;30;40;50\n\
             2024-07-02;10;20;30;40;50\n\
             2024-07-03;10;20;30;40;99\n",
        )
        .unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let result = import_csv(&conn, &path, Category::Civ10).unwrap();
        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1);

        assert_eq!(count_draws(&conn, Category::Civ10).unwrap(), 2);
        let history = fetch_history(&conn, Category::Civ10).unwrap();
        assert_eq!(history[0].date, "2024-07-01");
    }

    #[test]
    fn test_import_missing_file() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert!(import_csv(&conn, Path::new("/nonexistent/tirages.csv"), Category::Gh18).is_err());
    }
}
