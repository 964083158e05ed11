//! Parameter sweep tables as CSV.
//!
//! Columns are `tau,kappa_max,nu_max,phiRb`. Extra columns (such as a
//! leading index) are ignored on read.

use crate::ProjectResult;
use crate::validate::ValidationError;
use fp_sweeps::ParameterSweepRow;
use std::io::{Read, Write};
use std::path::Path;

const HEADER: [&str; 4] = ["tau", "kappa_max", "nu_max", "phiRb"];

pub fn read_sweep_table<R: Read>(reader: R) -> ProjectResult<Vec<ParameterSweepRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();
    for (line, record) in rdr.deserialize::<ParameterSweepRow>().enumerate() {
        let row = record?;
        let values = [row.tau, row.kappa_max, row.nu_max, row.phi_rb];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::InvalidValue {
                field: format!("row {}", line + 1),
                reason: "non-finite entry".to_string(),
            }
            .into());
        }
        rows.push(row);
    }
    Ok(rows)
}

pub fn write_sweep_table<W: Write>(writer: W, rows: &[ParameterSweepRow]) -> ProjectResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record(&[
            row.tau.to_string(),
            row.kappa_max.to_string(),
            row.nu_max.to_string(),
            row.phi_rb.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn load_sweep_table(path: &Path) -> ProjectResult<Vec<ParameterSweepRow>> {
    let file = std::fs::File::open(path)?;
    read_sweep_table(std::io::BufReader::new(file))
}

pub fn save_sweep_table(path: &Path, rows: &[ParameterSweepRow]) -> ProjectResult<()> {
    let file = std::fs::File::create(path)?;
    write_sweep_table(std::io::BufWriter::new(file), rows)
}
