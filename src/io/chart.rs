use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use crate::core::ExpenseCategory;
use crate::error::PlannerError;

use super::{Projection, ProjectionRenderer};

const CHART_HEIGHT: usize = 16;
const MAX_AXIS_LABELS: usize = 10;

/// Writes `retirement_projection.txt` and `expense_breakdown.txt`.
#[derive(Debug, Clone)]
pub struct TextChartReport {
    output_dir: PathBuf,
}

impl TextChartReport {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ProjectionRenderer for TextChartReport {
    fn render(&mut self, projection: &Projection) -> Result<(), PlannerError> {
        fs::create_dir_all(&self.output_dir)?;
        for (name, chart) in [
            ("retirement_projection.txt", projection_chart(projection)),
            ("expense_breakdown.txt", expense_chart(projection)),
        ] {
            let path = self.output_dir.join(name);
            fs::write(&path, chart)?;
            log::info!("wrote chart {}", path.display());
        }
        Ok(())
    }
}

/// Vertical bar chart, one column per value. Every value gets at least one
/// block so the lowest year stays visible.
pub fn text_chart(ages: &[u32], values: &[f64], height: usize) -> String {
    if ages.is_empty() || values.is_empty() {
        return "No data to display\n".to_string();
    }

    let height = height.max(2);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };
    let bar_heights: Vec<usize> = values
        .iter()
        .map(|v| ((v - min) / range * (height - 1) as f64).round() as usize + 1)
        .collect();

    let mut chart = String::new();
    for row in (1..=height).rev() {
        let line: String = bar_heights
            .iter()
            .map(|&h| if h >= row { '█' } else { ' ' })
            .collect();
        chart.push_str(line.trim_end());
        chart.push('\n');
    }
    chart.push_str(&"-".repeat(values.len()));
    chart.push('\n');

    let step = ages.len().div_ceil(MAX_AXIS_LABELS).max(1);
    let labels: Vec<String> = ages.iter().step_by(step).map(ToString::to_string).collect();
    let _ = writeln!(chart, "Ages: {}", labels.join(" "));

    let marks: Vec<String> = (0..4)
        .map(|i| format_amount(min + range * i as f64 / 3.0))
        .collect();
    let _ = writeln!(chart, "Scale: {}", marks.join(" | "));
    chart
}

pub fn projection_chart(projection: &Projection) -> String {
    let ages = ages(projection);
    let corpus: Vec<f64> = projection.records.iter().map(|r| r.corpus_start).collect();
    let expenses: Vec<f64> = projection.records.iter().map(|r| r.total_expenses).collect();

    let mut chart = String::from("=== Retirement Projection ===\n\nCorpus over time:\n");
    chart.push_str(&text_chart(&ages, &corpus, CHART_HEIGHT));
    chart.push_str("\nExpenses over time:\n");
    chart.push_str(&text_chart(&ages, &expenses, CHART_HEIGHT));

    let _ = writeln!(
        chart,
        "\nRetirement age: {}",
        projection.plan.person.retirement_age
    );
    if let Some(last) = projection.records.last() {
        let _ = writeln!(chart, "Final year (age {}):", last.person_age);
        let _ = writeln!(chart, "- Closing corpus: {}", format_amount(last.corpus_end));
        let _ = writeln!(chart, "- Annual expenses: {}", format_amount(last.total_expenses));
    }
    chart
}

/// One chart per expense kind that occurs at all, summed across children,
/// then a total.
pub fn expense_chart(projection: &Projection) -> String {
    let ages = ages(projection);
    let mut chart = String::from("=== Expense Breakdown by Category ===\n");

    let series: [(&str, fn(&ExpenseCategory) -> bool); 4] = [
        ("Living expenses", |c| matches!(c, ExpenseCategory::Living)),
        ("School fees", |c| matches!(c, ExpenseCategory::SchoolFees { .. })),
        ("Graduation fees", |c| matches!(c, ExpenseCategory::Graduation { .. })),
        ("Marriage expenses", |c| matches!(c, ExpenseCategory::Marriage { .. })),
    ];
    for (title, selects) in series {
        let values: Vec<f64> = projection
            .records
            .iter()
            .map(|r| {
                r.expense_breakdown
                    .iter()
                    .filter(|(c, _)| selects(c))
                    .map(|(_, amount)| amount)
                    .sum()
            })
            .collect();
        if values.iter().all(|v| *v == 0.0) {
            continue;
        }
        let _ = write!(chart, "\n{title}:\n{}", text_chart(&ages, &values, CHART_HEIGHT));
    }

    let totals: Vec<f64> = projection.records.iter().map(|r| r.total_expenses).collect();
    let _ = write!(
        chart,
        "\nTotal annual expenses:\n{}",
        text_chart(&ages, &totals, CHART_HEIGHT)
    );
    chart
}

fn ages(projection: &Projection) -> Vec<u32> {
    projection.records.iter().map(|r| r.person_age).collect()
}

/// Two decimals with thousands separators; negative amounts keep their sign.
pub(crate) fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
