//! Reporting adapters that read a finished trajectory: a plain-text summary
//! of the network and CSV export of the sampled history. Nothing here feeds
//! back into the engine.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::info;

use crate::simulation::history::History;
use crate::simulation::reaction_network::pool::Name;
use crate::simulation::reaction_network::ReactionNetwork;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Renders a table of every reaction with its rate constant and the
/// concentrations its reactants started from, followed by the frozen
/// species. The first stored sample of a series is exactly the
/// post-initialization concentration, so the table reads it from the
/// history rather than the live pool.
pub fn summary(network: &ReactionNetwork) -> String {
    let history = network.get_history();

    let headers = ["Reaction", "Rate Constant", "Initial Concentrations"];
    let mut rows: Vec<[String; 3]> = Vec::new();
    for reaction in network.get_reactions() {
        let reaction_cell = reaction
            .get_label()
            .map(str::to_string)
            .unwrap_or_else(|| reaction.to_string());

        let mut initial = Vec::new();
        for term in reaction.get_reactants() {
            let series = history
                .get_series(term.get_species_name())
                .expect("reactant missing from the history");
            initial.push(format!("{}: {:.4}", term.get_species_name().0, series[0]));
        }

        rows.push([
            reaction_cell,
            reaction.get_rate_constant().to_string(),
            initial.join(", "),
        ]);
    }

    let mut widths = headers.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::from("Reaction System Summary:\n");
    out.push_str(&format_row(&headers.map(str::to_string), &widths));
    out.push_str(&format!(
        "{}\n",
        "-".repeat(widths.iter().sum::<usize>() + 3 * widths.len() + 1)
    ));
    for row in &rows {
        out.push_str(&format_row(row, &widths));
    }

    let mut frozen: Vec<&Name> = network.get_frozen().iter().collect();
    frozen.sort();
    if !frozen.is_empty() {
        let names: Vec<&str> = frozen.iter().map(|name| name.0.as_str()).collect();
        out.push_str(&format!("Frozen species: {}\n", names.join(", ")));
    }

    out
}

fn format_row(cells: &[String; 3], widths: &[usize; 3]) -> String {
    format!(
        "| {:<w0$} | {:<w1$} | {:<w2$} |\n",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    )
}

/// Writes the history as CSV: a `time` column followed by one column per
/// species, sorted by name, one row per sample.
pub fn write_history_csv<W: Write>(history: &History, writer: W) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    let species = history.sorted_species();

    let mut header = vec!["time".to_string()];
    header.extend(species.iter().map(|name| name.0.clone()));
    writer.write_record(&header)?;

    for (index, time) in history.get_time().iter().enumerate() {
        let mut row = vec![time.to_string()];
        for name in &species {
            let series = history
                .get_series(name)
                .expect("species listed but missing a series");
            row.push(series[index].to_string());
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Exports the history to `<dir>/<prefix>_<timestamp>.csv` and returns the
/// path that was written.
pub fn export_history(history: &History, dir: &Path, prefix: &str) -> Result<PathBuf, ReportError> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("{prefix}_{stamp}.csv"));

    let file = std::fs::File::create(&path)?;
    write_history_csv(history, file)?;

    info!(path = %path.display(), "history exported");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::parse;
    use crate::simulation::reaction_network::ReactionNetwork;

    fn bromine_network() -> ReactionNetwork {
        let reactions = vec![
            parse::reaction("Br2 === 2Br", 0.01).unwrap(),
            parse::reaction("2Br === Br2", 1.0).unwrap(),
        ];
        let mut network = ReactionNetwork::new(reactions).unwrap();
        network
            .initialize(&HashMap::from([(Name("Br2".to_string()), 1.0)]))
            .unwrap();
        network
    }

    #[test]
    fn summary_lists_reactions_rates_and_initial_concentrations() {
        let mut network = bromine_network();
        network.freeze(&[Name("Br2".to_string())]).unwrap();

        let text = summary(&network);

        assert!(text.starts_with("Reaction System Summary:"));
        assert!(text.contains("Br2 === 2Br"));
        assert!(text.contains("0.01"));
        assert!(text.contains("Br2: 1.0000"));
        assert!(text.contains("Br: 0.0000"));
        assert!(text.contains("Frozen species: Br2"));
    }

    #[test]
    fn export_history_writes_a_timestamped_csv() {
        let mut network = bromine_network();
        network.simulate(0.01, 0.0, 3);

        let dir = std::env::temp_dir();
        let path = export_history(network.get_history(), &dir, "dyma_export_test").unwrap();

        let file_name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file_name.starts_with("dyma_export_test_"));
        assert!(file_name.ends_with(".csv"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("time,"));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn history_csv_has_time_then_sorted_species_columns() {
        let mut network = bromine_network();
        network.simulate(0.01, 0.0, 5);

        let mut buffer = Vec::new();
        write_history_csv(network.get_history(), &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("time,Br,Br2"));
        // header plus the initial sample and one row per step
        assert_eq!(text.lines().count(), 1 + network.get_history().len());
        for line in lines {
            assert_eq!(line.split(',').count(), 3);
        }
    }
}
