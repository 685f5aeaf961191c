use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::core::ExpenseCategory;
use crate::error::PlannerError;

use super::{Projection, ProjectionRenderer};

/// Writes the yearly table to `retirement_plan_<timestamp>.csv`.
#[derive(Debug, Clone)]
pub struct CsvReport {
    output_dir: PathBuf,
    written: Option<PathBuf>,
}

impl CsvReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            written: None,
        }
    }

    /// Path of the last file written, if any.
    pub fn written(&self) -> Option<&PathBuf> {
        self.written.as_ref()
    }
}

impl ProjectionRenderer for CsvReport {
    fn render(&mut self, projection: &Projection) -> Result<(), PlannerError> {
        fs::create_dir_all(&self.output_dir)?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = self.output_dir.join(format!("retirement_plan_{stamp}.csv"));

        write_csv(File::create(&path)?, projection)?;
        log::info!("wrote {} rows to {}", projection.records.len(), path.display());
        self.written = Some(path);
        Ok(())
    }
}

fn expense_columns(child_count: usize) -> Vec<ExpenseCategory> {
    let mut columns = vec![ExpenseCategory::Living];
    for child in 1..=child_count {
        columns.push(ExpenseCategory::SchoolFees { child });
        columns.push(ExpenseCategory::Graduation { child });
        columns.push(ExpenseCategory::Marriage { child });
    }
    columns
}

/// One row per projected year with a fixed column per expense line; lines that
/// do not apply in a year are written as 0.00.
pub fn write_csv<W: Write>(writer: W, projection: &Projection) -> Result<(), PlannerError> {
    let columns = expense_columns(projection.child_count());
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![
        "year_index".to_string(),
        "age".to_string(),
        "phase".to_string(),
        "corpus_start".to_string(),
        "corpus_growth".to_string(),
    ];
    header.extend(columns.iter().map(ToString::to_string));
    header.extend(
        ["total_expenses", "corpus_end", "depleted"]
            .iter()
            .map(|s| s.to_string()),
    );
    csv.write_record(&header)?;

    for record in &projection.records {
        let mut row = vec![
            record.year_index.to_string(),
            record.person_age.to_string(),
            if record.is_retired { "retired" } else { "working" }.to_string(),
            format!("{:.2}", record.corpus_start),
            format!("{:.2}", record.corpus_growth),
        ];
        row.extend(
            columns
                .iter()
                .map(|c| format!("{:.2}", record.expense(*c).unwrap_or(0.0))),
        );
        row.push(format!("{:.2}", record.total_expenses));
        row.push(format!("{:.2}", record.corpus_end));
        row.push(record.is_depleted().to_string());
        csv.write_record(&row)?;
    }

    csv.flush()?;
    Ok(())
}
