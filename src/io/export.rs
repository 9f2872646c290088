//! CSV export of the microgrid logs.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::logs::{CostChannel, EnergyChannel, Logs};

/// Exports the logs to a CSV file at the given path.
///
/// Writes a header row followed by one row per logged step: the step
/// index, the five energy channels and the four cost channels (the latter
/// prefixed with `cost_`). Produces deterministic output for identical logs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(logs: &Logs, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(logs, buf)
}

/// Writes the logs as CSV to any writer.
///
/// A channel shorter than the others (possible when energies and costs
/// were appended separately) leaves its cells empty.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(logs: &Logs, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = vec!["step".to_string()];
    header.extend(EnergyChannel::ALL.iter().map(|c| c.name().to_string()));
    header.extend(CostChannel::ALL.iter().map(|c| format!("cost_{}", c.name())));
    wtr.write_record(&header)?;

    let cell = |values: &[f32], i: usize| {
        values
            .get(i)
            .map(|v| format!("{v:.4}"))
            .unwrap_or_default()
    };

    for i in 0..logs.len() {
        let mut row = vec![(i + 1).to_string()];
        row.extend(
            EnergyChannel::ALL
                .iter()
                .map(|&c| cell(logs.energies.channel(c), i)),
        );
        row.extend(CostChannel::ALL.iter().map(|&c| cell(logs.costs.channel(c), i)));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
