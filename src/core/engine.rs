use std::collections::BTreeMap;

use super::types::{
    ChildProfile, ExpenseCategory, ProjectionSettings, RetirementPlan, YearRecord,
};

/// Projects the plan year by year from the current age to life expectancy.
///
/// Growth is applied to the opening corpus with the rate of the year's phase,
/// then the year's expenses are withdrawn. Expenses are drawn from the corpus
/// before retirement as well, and the balance is never clamped: a negative
/// `corpus_end` marks depletion and carries into the next year.
pub fn run_projection(plan: &RetirementPlan) -> Vec<YearRecord> {
    let person = &plan.person;
    let horizon = person.horizon_years();
    let mut records = Vec::with_capacity(horizon);
    let mut corpus = person.current_corpus;
    let mut depleted = false;

    log::debug!(
        "projecting {horizon} years for ages {}..={} with {} children",
        person.current_age,
        person.life_expectancy,
        plan.children.len()
    );

    for year_index in 0..horizon as u32 {
        let age = person.current_age + year_index;
        let is_retired = person.is_retired_at(age);
        let corpus_growth = corpus * person.return_rate_at(age) / 100.0;

        let expense_breakdown = year_breakdown(plan, year_index);
        let total_expenses = expense_breakdown.values().sum::<f64>();
        let corpus_end = corpus + corpus_growth - total_expenses;

        if corpus_end < 0.0 && !depleted {
            depleted = true;
            log::debug!("corpus depleted at age {age} (year {year_index}): {corpus_end:.2}");
        }

        records.push(YearRecord {
            year_index,
            person_age: age,
            corpus_start: corpus,
            corpus_growth,
            total_expenses,
            expense_breakdown,
            corpus_end,
            is_retired,
        });
        corpus = corpus_end;
    }

    records
}

fn year_breakdown(plan: &RetirementPlan, year_index: u32) -> BTreeMap<ExpenseCategory, f64> {
    let inflation = plan.person.inflation;
    let mut breakdown = BTreeMap::new();
    breakdown.insert(
        ExpenseCategory::Living,
        inflated(plan.person.monthly_expenses * 12.0, inflation, year_index),
    );

    for (idx, child) in plan.children.iter().enumerate() {
        let number = idx + 1;
        let child_age = child.current_age + year_index;

        if let Some(fee) = school_fee(child, &plan.settings, child_age, year_index, inflation) {
            breakdown.insert(ExpenseCategory::SchoolFees { child: number }, fee);
        }
        if child_age == plan.settings.graduation_age {
            breakdown.insert(
                ExpenseCategory::Graduation { child: number },
                inflated(child.graduation_fee, inflation, year_index),
            );
        }
        if child_age == child.marriage_age {
            breakdown.insert(
                ExpenseCategory::Marriage { child: number },
                inflated(child.marriage_cost, inflation, year_index),
            );
        }
    }

    breakdown
}

/// School fee for one year, `None` outside the school window. The fee steps
/// up every `fee_increase_frequency` projected years and is inflated on top,
/// so the two escalators compound.
fn school_fee(
    child: &ChildProfile,
    settings: &ProjectionSettings,
    child_age: u32,
    year_index: u32,
    inflation: f64,
) -> Option<f64> {
    if !settings.in_school(child_age) {
        return None;
    }

    let step_ups = year_index / child.fee_increase_frequency.max(1);
    let stepped_fee = child.school_fee * growth_factor(child.school_fee_increase, step_ups);
    Some(inflated(stepped_fee, inflation, year_index))
}

fn inflated(amount: f64, inflation: f64, years: u32) -> f64 {
    amount * growth_factor(inflation, years)
}

fn growth_factor(rate_percent: f64, periods: u32) -> f64 {
    (1.0 + rate_percent / 100.0).powi(periods as i32)
}
