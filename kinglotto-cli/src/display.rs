use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use kinglotto_db::models::{Category, Draw};
use kinglotto_predict::analysis::{NumberFrequency, Period, Regularity};
use kinglotto_predict::AlgorithmOutput;

/// Couleur d'une boule selon sa dizaine.
pub fn ball_color(number: u8) -> Color {
    match number {
        1..=10 => Color::Red,
        11..=20 => Color::Blue,
        21..=30 => Color::Green,
        31..=40 => Color::Yellow,
        41..=50 => Color::Magenta,
        51..=60 => Color::DarkYellow,
        61..=70 => Color::Cyan,
        71..=80 => Color::DarkMagenta,
        81..=90 => Color::Grey,
        _ => Color::DarkGrey,
    }
}

fn ball_cell(number: u8) -> Cell {
    Cell::new(format!("{:2}", number)).fg(ball_color(number))
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Id", "Date", "Catégorie", "Numéros"]);

    for draw in draws {
        let numbers_str = draw
            .numbers
            .iter()
            .map(|n| format!("{:2}", n))
            .collect::<Vec<_>>()
            .join(" - ");

        table.add_row(vec![
            draw.id.to_string(),
            draw.date.clone(),
            draw.category.to_string(),
            numbers_str,
        ]);
    }

    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

fn frequency_table(freqs: &[NumberFrequency]) -> Table {
    let mut table = new_table(vec!["Numéro", "Fréquence", "Pourcentage"]);
    for f in freqs {
        table.add_row(vec![
            ball_cell(f.number),
            Cell::new(f.frequency),
            Cell::new(format!("{:.1}%", f.percentage)),
        ]);
    }
    table
}

pub fn display_stats(
    category: Category,
    all: &[NumberFrequency],
    most: &[NumberFrequency],
    least: &[NumberFrequency],
    top: &[NumberFrequency],
    n_draws: usize,
) {
    println!("\n📊 Statistiques {} sur {} tirages\n", category, n_draws);

    println!("── Fréquence des numéros (Top {}) ──", top.len());
    let max = top.iter().map(|f| f.frequency).max().unwrap_or(0).max(1);
    for f in top {
        let bar = "█".repeat((f.frequency as f64 / max as f64 * 40.0).round() as usize);
        println!("  {:2} │ {} {}", f.number, bar, f.frequency);
    }

    println!("\n── Top {} les plus fréquents ──", most.len());
    println!("{}", frequency_table(most));

    println!("\n── Top {} les moins fréquents ──", least.len());
    println!("{}", frequency_table(least));

    println!("\n── Fréquence de tous les numéros ──");
    println!("{}", frequency_table(all));
}

pub fn display_regularity(category: Category, regularity: &Regularity, period: Period, companions_shown: usize) {
    println!(
        "\n🔎 Analyse du numéro {} ({}), période : {}",
        regularity.number, category, period
    );
    println!("  Nombre total d'apparitions : {}", regularity.total_occurrences);

    if regularity.total_occurrences == 0 {
        println!("\nLe numéro {} n'a pas été tiré pendant la période sélectionnée.", regularity.number);
        return;
    }

    println!("\n── Régularité ──");
    println!("  Apparu dans le tirage suivant : {} fois", regularity.next_draw_count);
    println!(
        "  Fréquence d'apparition dans le tirage suivant : {:.1}%",
        regularity.next_draw_frequency
    );

    println!("\n── Numéros fréquemment tirés ensemble ──");
    if regularity.companions.is_empty() {
        println!(
            "Aucun autre numéro n'a été tiré en même temps que {} pendant cette période.",
            regularity.number
        );
        return;
    }

    let mut table = new_table(vec!["Numéro", "Fois"]);
    for &(number, count) in regularity.companions.iter().take(companions_shown) {
        table.add_row(vec![ball_cell(number), Cell::new(count)]);
    }
    println!("{table}");
}

pub fn display_prediction(category: Category, output: &AlgorithmOutput, n_draws: usize) {
    println!("\n🎯 Numéros probables pour {} ({} tirages analysés)\n", category, n_draws);

    let mut table = new_table(vec!["Numéro", "Confiance"]);
    for p in &output.predictions {
        table.add_row(vec![
            ball_cell(p.number),
            Cell::new(format!("{:.0}%", p.confidence * 100.0)),
        ]);
    }
    println!("{table}");

    let analysis = if output.analysis_performed { "oui" } else { "non" };
    println!("Analyse rétrospective du dernier tirage : {}", analysis);
    println!(
        "\nNote : ces prédictions reposent sur les fréquences passées et ne garantissent pas les résultats réels. Jouez de manière responsable."
    );
}
