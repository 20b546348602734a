mod display;
mod export;
mod import;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use kinglotto_db::db::{
    count_draws, db_path, delete_draw, fetch_all_draws, fetch_history, fetch_last_draws,
    insert_draw, migrate, open_db, reset_category,
};
use kinglotto_db::models::{normalize_date, validate_numbers, Category, NewDraw};
use kinglotto_db::rusqlite::Connection;
use kinglotto_predict::analysis::{
    filter_by_period, least_frequent, most_frequent, number_frequencies, number_regularity,
    top_appeared, Period,
};
use kinglotto_predict::{predict_with_config, ScoringConfig};
use crate::display::{
    display_draws, display_import_summary, display_prediction, display_regularity, display_stats,
};

const COMPANIONS_SHOWN: usize = 15;

#[derive(Parser)]
#[command(name = "kinglotto", about = "Saisie, statistiques et prédiction des tirages KingLotto")]
struct Cli {
    /// Chemin de la base SQLite (défaut : ./data/kinglotto.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Enregistrer un tirage (demande ce qui manque)
    Add {
        /// Catégorie (GH18, CIV10, CIV13, CIV16)
        #[arg(short, long)]
        category: Category,

        /// Date du tirage (JJ/MM/AAAA ou AAAA-MM-JJ)
        #[arg(short, long)]
        date: Option<String>,

        /// Les 5 numéros tirés (1-90)
        numbers: Vec<u8>,
    },

    /// Lister les derniers tirages
    List {
        #[arg(short, long)]
        category: Category,

        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Supprimer un tirage
    Delete {
        #[arg(short, long)]
        category: Category,

        /// Identifiant affiché par `list`
        #[arg(long)]
        id: i64,
    },

    /// Supprimer tous les tirages d'une catégorie
    Reset {
        #[arg(short, long)]
        category: Category,

        /// Ne pas demander de confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Afficher les fréquences des numéros
    Stats {
        #[arg(short, long)]
        category: Category,
    },

    /// Analyser la régularité d'un numéro
    Consult {
        #[arg(short, long)]
        category: Category,

        /// Numéro à analyser
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=90))]
        number: u8,

        /// Période : all, last-month, last-quarter, last-year
        #[arg(short, long, default_value = "all")]
        period: Period,
    },

    /// Prédire le prochain tirage
    Predict {
        #[arg(short, long)]
        category: Category,

        /// Fichier JSON de configuration du score
        #[arg(long)]
        config: Option<PathBuf>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Importer des tirages depuis un CSV (date;n1;n2;n3;n4;n5)
    Import {
        #[arg(short, long)]
        category: Category,

        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Exporter les tirages en JSON
    Export {
        #[arg(short, long)]
        category: Category,

        /// Fichier de sortie (stdout par défaut)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Afficher ou enregistrer la configuration du score par défaut
    Config {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Afficher le chemin de la base de données
    DbPath,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = cli.db.unwrap_or_else(db_path);

    if let Command::DbPath = cli.command {
        println!("{}", path.display());
        return Ok(());
    }
    if let Command::Config { output } = &cli.command {
        return cmd_config(output.as_deref());
    }

    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Add { category, date, numbers } => cmd_add(&conn, category, date, numbers),
        Command::List { category, last } => cmd_list(&conn, category, last),
        Command::Delete { category, id } => cmd_delete(&conn, category, id),
        Command::Reset { category, yes } => cmd_reset(&conn, category, yes),
        Command::Stats { category } => cmd_stats(&conn, category),
        Command::Consult { category, number, period } => cmd_consult(&conn, category, number, period),
        Command::Predict { category, config, json } => {
            cmd_predict(&conn, category, config.as_deref(), json)
        }
        Command::Import { category, file } => cmd_import(&conn, category, &file),
        Command::Export { category, output } => cmd_export(&conn, category, output.as_deref()),
        Command::Config { .. } | Command::DbPath => Ok(()),
    }
}

fn cmd_add(conn: &Connection, category: Category, date: Option<String>, numbers: Vec<u8>) -> Result<()> {
    let interactive = date.is_none() || numbers.is_empty();

    let date = match date {
        Some(d) => normalize_date(&d)?,
        None => prompt_date()?,
    };

    let numbers = if numbers.is_empty() {
        prompt_numbers()?
    } else {
        let Ok(arr) = <[u8; 5]>::try_from(numbers.as_slice()) else {
            bail!("Entrez exactement 5 numéros ({} reçus)", numbers.len());
        };
        arr
    };
    validate_numbers(&numbers)?;

    let draw = NewDraw { category, date, numbers };

    if interactive {
        let numbers_str = draw.numbers.map(|n| n.to_string()).join(" - ");
        println!("\nTirage à insérer : {} {} [{}]", draw.category, draw.date, numbers_str);
        let confirm = prompt("Confirmer l'insertion ? (o/n) : ")?;
        if confirm.trim().to_lowercase() != "o" {
            println!("Insertion annulée.");
            return Ok(());
        }
    }

    if insert_draw(conn, &draw)? {
        println!("Tirage enregistré avec succès.");
    } else {
        println!("Ce tirage existe déjà (doublon ignoré).");
    }
    Ok(())
}

fn cmd_list(conn: &Connection, category: Category, last: u32) -> Result<()> {
    if count_draws(conn, category)? == 0 {
        println!("Aucun tirage enregistré pour {}.", category);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, category, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_delete(conn: &Connection, category: Category, id: i64) -> Result<()> {
    if delete_draw(conn, category, id)? {
        println!("Tirage {} supprimé.", id);
    } else {
        println!("Aucun tirage {} dans la catégorie {}.", id, category);
    }
    Ok(())
}

fn cmd_reset(conn: &Connection, category: Category, yes: bool) -> Result<()> {
    if !yes {
        let confirm = prompt(&format!(
            "Supprimer définitivement tous les tirages {} ? (o/n) : ",
            category
        ))?;
        if confirm.trim().to_lowercase() != "o" {
            println!("Réinitialisation annulée.");
            return Ok(());
        }
    }
    let removed = reset_category(conn, category)?;
    println!("{} tirage(s) supprimé(s) pour {}.", removed, category);
    Ok(())
}

fn cmd_stats(conn: &Connection, category: Category) -> Result<()> {
    let history = fetch_history(conn, category)?;
    if history.is_empty() {
        println!(
            "Aucune donnée de tirage n'est disponible pour la catégorie {}. Enregistrez d'abord des tirages avec : kinglotto add",
            category
        );
        return Ok(());
    }

    let freqs = number_frequencies(&history);
    display_stats(
        category,
        &freqs,
        &most_frequent(&freqs, 10),
        &least_frequent(&freqs, 10),
        &top_appeared(&freqs, 20),
        history.len(),
    );
    Ok(())
}

fn cmd_consult(conn: &Connection, category: Category, number: u8, period: Period) -> Result<()> {
    let history = fetch_history(conn, category)?;
    let today = chrono::Local::now().date_naive();
    let filtered = filter_by_period(&history, period, today);

    let regularity = number_regularity(&filtered, number);
    display_regularity(category, &regularity, period, COMPANIONS_SHOWN);
    Ok(())
}

fn cmd_predict(conn: &Connection, category: Category, config: Option<&Path>, json: bool) -> Result<()> {
    let config = match config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let history = fetch_history(conn, category)?;
    let output = predict_with_config(category, &history, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if output.predictions.is_empty() {
        println!(
            "Données insuffisantes : il faut au moins {} tirages enregistrés pour générer une prédiction. Actuellement : {}.",
            config.min_draws_for_basic_prediction,
            history.len()
        );
        return Ok(());
    }

    display_prediction(category, &output, history.len());
    Ok(())
}

fn cmd_import(conn: &Connection, category: Category, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file, category)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(conn: &Connection, category: Category, output: Option<&Path>) -> Result<()> {
    let draws = fetch_all_draws(conn, category)?;
    export::export_json(&draws, output)
}

fn cmd_config(output: Option<&Path>) -> Result<()> {
    let config = ScoringConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            println!("Configuration enregistrée dans {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    Ok(input.trim().to_string())
}

fn prompt_date() -> Result<String> {
    loop {
        let input = prompt("Date (JJ/MM/AAAA) : ")?;
        match normalize_date(&input) {
            Ok(date) => return Ok(date),
            Err(e) => println!("{}. Réessayez.", e),
        }
    }
}

fn prompt_numbers() -> Result<[u8; 5]> {
    loop {
        let input = prompt("5 numéros (séparés par des espaces, 1-90) : ")?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) if v.len() == 5 => {
                let arr = [v[0], v[1], v[2], v[3], v[4]];
                match validate_numbers(&arr) {
                    Ok(()) => return Ok(arr),
                    Err(e) => println!("{}. Réessayez.", e),
                }
            }
            _ => println!("Entrez exactement 5 numéros. Réessayez."),
        }
    }
}
