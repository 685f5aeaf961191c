//! Everything outside the projection engine: where a profile comes from and
//! where a finished projection goes. The engine depends on none of this.

mod chart;
mod config;
mod console;
mod csv_report;
mod prompt;

pub use chart::{TextChartReport, expense_chart, projection_chart, text_chart};
pub use config::{ConfigFile, parse_config};
pub use console::ConsoleSummary;
pub use csv_report::{CsvReport, write_csv};
pub use prompt::InteractivePrompt;

use crate::core::{
    ProjectionSummary, RawProfile, RetirementPlan, YearRecord, run_projection, summarize,
    validate_profile, verify_records,
};
use crate::error::PlannerError;

/// Anything that can produce an unvalidated profile: a config file, terminal
/// prompts, a web form.
pub trait ProfileSource {
    fn read_profile(&mut self) -> Result<RawProfile, PlannerError>;
}

/// Anything that can present a finished projection.
pub trait ProjectionRenderer {
    fn render(&mut self, projection: &Projection) -> Result<(), PlannerError>;
}

/// A validated plan with its verified table and headline metrics.
#[derive(Debug, Clone)]
pub struct Projection {
    pub plan: RetirementPlan,
    pub records: Vec<YearRecord>,
    pub summary: ProjectionSummary,
}

impl Projection {
    /// Child count, used by renderers to lay out per-child columns.
    pub fn child_count(&self) -> usize {
        self.plan.children.len()
    }
}

pub fn project(raw: &RawProfile) -> Result<Projection, PlannerError> {
    let plan = validate_profile(raw)?;
    let records = run_projection(&plan);
    verify_records(&plan, &records)?;
    let summary = summarize(&plan, &records);

    if let Some(depletion) = summary.first_depletion {
        log::warn!(
            "corpus depletes at age {} ({} years before life expectancy {})",
            depletion.age,
            plan.person.life_expectancy - depletion.age,
            plan.person.life_expectancy
        );
    }

    Ok(Projection {
        plan,
        records,
        summary,
    })
}

pub fn run_plan(
    source: &mut dyn ProfileSource,
    renderers: &mut [Box<dyn ProjectionRenderer>],
) -> Result<Projection, PlannerError> {
    let raw = source.read_profile()?;
    let projection = project(&raw)?;
    for renderer in renderers.iter_mut() {
        renderer.render(&projection)?;
    }
    Ok(projection)
}

#[cfg(test)]
pub(crate) fn sample_projection() -> Projection {
    let mut raw = crate::core::sample_raw_profile();
    raw.children.push(crate::core::RawChild {
        current_age: Some(5),
        school_fee: Some(100_000.0),
        school_fee_increase: Some(10.0),
        fee_increase_frequency: Some(2),
        graduation_fee: Some(1_000_000.0),
        marriage_cost: Some(2_000_000.0),
        marriage_age: Some(28),
    });
    match project(&raw) {
        Ok(projection) => projection,
        Err(e) => panic!("sample profile must project: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValidationError;
    use std::cell::Cell;
    use std::rc::Rc;

    struct FixedSource(RawProfile);

    impl ProfileSource for FixedSource {
        fn read_profile(&mut self) -> Result<RawProfile, PlannerError> {
            Ok(self.0.clone())
        }
    }

    struct CountingRenderer {
        rows_seen: Rc<Cell<usize>>,
    }

    impl ProjectionRenderer for CountingRenderer {
        fn render(&mut self, projection: &Projection) -> Result<(), PlannerError> {
            self.rows_seen
                .set(self.rows_seen.get() + projection.records.len());
            Ok(())
        }
    }

    #[test]
    fn run_plan_feeds_every_renderer() {
        let mut source = FixedSource(crate::core::sample_raw_profile());
        let rows_seen = Rc::new(Cell::new(0));
        let mut renderers: Vec<Box<dyn ProjectionRenderer>> = vec![
            Box::new(CountingRenderer {
                rows_seen: Rc::clone(&rows_seen),
            }),
            Box::new(CountingRenderer {
                rows_seen: Rc::clone(&rows_seen),
            }),
        ];

        let projection = run_plan(&mut source, &mut renderers).expect("valid plan");
        assert_eq!(projection.records.len(), 56);
        assert_eq!(projection.summary.years_projected, 56);
        assert_eq!(rows_seen.get(), 112);
    }

    #[test]
    fn run_plan_surfaces_validation_errors_before_rendering() {
        let mut raw = crate::core::sample_raw_profile();
        raw.retirement_age = Some(30);
        let mut source = FixedSource(raw);
        let mut renderers: Vec<Box<dyn ProjectionRenderer>> = Vec::new();

        let err = run_plan(&mut source, &mut renderers).expect_err("must reject");
        match err {
            PlannerError::Validation(ValidationError { field, .. }) => {
                assert_eq!(field, "retirement_age");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sample_projection_has_one_marriage_year() {
        let projection = sample_projection();
        let marriages = projection
            .records
            .iter()
            .filter(|r| {
                r.expense(crate::core::ExpenseCategory::Marriage { child: 1 })
                    .is_some()
            })
            .count();
        assert_eq!(marriages, 1);
        assert_eq!(projection.child_count(), 1);
    }
}
