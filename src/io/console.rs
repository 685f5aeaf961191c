use std::io::Write;

use crate::error::PlannerError;

use super::chart::format_amount;
use super::{Projection, ProjectionRenderer};

/// Prints the yearly table and headline metrics.
pub struct ConsoleSummary<W> {
    out: W,
}

impl<W: Write> ConsoleSummary<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ProjectionRenderer for ConsoleSummary<W> {
    fn render(&mut self, projection: &Projection) -> Result<(), PlannerError> {
        let out = &mut self.out;
        let person = &projection.plan.person;
        let summary = &projection.summary;

        writeln!(
            out,
            "{:>4} {:>4} {:>8} {:>18} {:>16} {:>16} {:>18}",
            "Year", "Age", "Phase", "Corpus start", "Growth", "Expenses", "Corpus end"
        )?;
        writeln!(out, "{}", "-".repeat(90))?;
        for r in &projection.records {
            writeln!(
                out,
                "{:>4} {:>4} {:>8} {:>18} {:>16} {:>16} {:>18}",
                r.year_index,
                r.person_age,
                if r.is_retired { "retired" } else { "working" },
                format_amount(r.corpus_start),
                format_amount(r.corpus_growth),
                format_amount(r.total_expenses),
                format_amount(r.corpus_end),
            )?;
        }

        writeln!(out, "\nSummary:")?;
        writeln!(out, "  Years projected: {}", summary.years_projected)?;
        writeln!(out, "  Years in retirement: {}", summary.years_in_retirement)?;
        if let Some(corpus) = summary.corpus_at_retirement {
            writeln!(
                out,
                "  Corpus at retirement (age {}): {}",
                person.retirement_age,
                format_amount(corpus)
            )?;
        }
        if let Some(expenses) = summary.annual_expenses_at_retirement {
            writeln!(
                out,
                "  Annual expenses at retirement: {}",
                format_amount(expenses)
            )?;
        }
        if let Some(peak) = summary.peak_corpus {
            writeln!(
                out,
                "  Peak corpus: {} (age {})",
                format_amount(peak.amount),
                peak.age
            )?;
        }
        writeln!(
            out,
            "  Total lifetime expenses: {}",
            format_amount(summary.total_lifetime_expenses)
        )?;
        if let Some(final_corpus) = summary.final_corpus {
            writeln!(
                out,
                "  Corpus at age {}: {}",
                person.life_expectancy,
                format_amount(final_corpus)
            )?;
        }

        match summary.first_depletion {
            Some(depletion) => writeln!(
                out,
                "\nWARNING: corpus is depleted at age {} (year {}), before life expectancy {}.",
                depletion.age, depletion.year_index, person.life_expectancy
            )?,
            None => writeln!(
                out,
                "\nCorpus lasts through life expectancy ({}).",
                person.life_expectancy
            )?,
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::sample_projection;

    fn render_to_string(projection: &Projection) -> String {
        let mut buffer = Vec::new();
        ConsoleSummary::new(&mut buffer)
            .render(projection)
            .expect("render should succeed");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn prints_table_and_summary() {
        let projection = sample_projection();
        let text = render_to_string(&projection);

        assert!(text.contains("5,000,000.00"));
        assert!(text.contains("Corpus at retirement (age 60)"));
        assert!(text.contains("Years in retirement: 30"));
        assert_eq!(
            text.lines().filter(|l| l.contains("working") || l.contains("retired")).count(),
            projection.records.len()
        );
    }

    #[test]
    fn warns_on_depletion() {
        let mut raw = crate::core::sample_raw_profile();
        raw.current_corpus = Some(0.0);
        let projection = crate::io::project(&raw).expect("valid profile");
        let text = render_to_string(&projection);

        assert!(text.contains("WARNING: corpus is depleted at age 35 (year 0)"));
    }
}
