use anyhow::{Context, Result};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, Row};
use std::path::Path;

use crate::models::{Category, Draw, HistoricalDataPoint, NewDraw};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    category  TEXT NOT NULL,
    date      TEXT NOT NULL,
    ball_1    INTEGER NOT NULL,
    ball_2    INTEGER NOT NULL,
    ball_3    INTEGER NOT NULL,
    ball_4    INTEGER NOT NULL,
    ball_5    INTEGER NOT NULL,
    UNIQUE (category, date, ball_1, ball_2, ball_3, ball_4, ball_5)
);
CREATE INDEX IF NOT EXISTS idx_draws_category_date ON draws (category, date);
";

const DRAW_COLUMNS: &str = "id, category, date, ball_1, ball_2, ball_3, ball_4, ball_5";

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: anyhow::Error| FromSqlError::Other(e.into()))
    }
}

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("kinglotto.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

fn numbers_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<[u8; 5]> {
    Ok([
        row.get::<_, u8>(first)?,
        row.get::<_, u8>(first + 1)?,
        row.get::<_, u8>(first + 2)?,
        row.get::<_, u8>(first + 3)?,
        row.get::<_, u8>(first + 4)?,
    ])
}

fn draw_from_row(row: &Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        id: row.get(0)?,
        category: row.get(1)?,
        date: row.get(2)?,
        numbers: numbers_from_row(row, 3)?,
    })
}

/// Retourne `false` si un tirage identique existe déjà pour la catégorie.
pub fn insert_draw(conn: &Connection, draw: &NewDraw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (category, date, ball_1, ball_2, ball_3, ball_4, ball_5)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            draw.category,
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

/// Derniers tirages d'une catégorie, du plus récent au plus ancien.
pub fn fetch_last_draws(conn: &Connection, category: Category, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws WHERE category = ?1
         ORDER BY date DESC, id DESC LIMIT ?2"
    ))?;
    let draws = stmt
        .query_map(rusqlite::params![category, limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Tous les tirages d'une catégorie en ordre chronologique (le plus ancien d'abord).
pub fn fetch_all_draws(conn: &Connection, category: Category) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DRAW_COLUMNS} FROM draws WHERE category = ?1
         ORDER BY date ASC, id ASC"
    ))?;
    let draws = stmt
        .query_map([category], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Historique au format attendu par la prédiction : ordre chronologique croissant.
pub fn fetch_history(conn: &Connection, category: Category) -> Result<Vec<HistoricalDataPoint>> {
    let mut stmt = conn.prepare(
        "SELECT date, ball_1, ball_2, ball_3, ball_4, ball_5
         FROM draws WHERE category = ?1 ORDER BY date ASC, id ASC"
    )?;
    let rows = stmt
        .query_map([category], |row| {
            Ok(HistoricalDataPoint {
                date: row.get(0)?,
                numbers: numbers_from_row(row, 1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn count_draws(conn: &Connection, category: Category) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM draws WHERE category = ?1",
        [category],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn delete_draw(conn: &Connection, category: Category, id: i64) -> Result<bool> {
    let changed = conn
        .execute(
            "DELETE FROM draws WHERE category = ?1 AND id = ?2",
            rusqlite::params![category, id],
        )
        .with_context(|| format!("Échec de la suppression du tirage {}", id))?;
    Ok(changed > 0)
}

/// Supprime tous les tirages de la catégorie et renvoie le nombre de lignes effacées.
pub fn reset_category(conn: &Connection, category: Category) -> Result<usize> {
    let removed = conn
        .execute("DELETE FROM draws WHERE category = ?1", [category])
        .with_context(|| format!("Échec de la réinitialisation de {}", category))?;
    Ok(removed)
}
