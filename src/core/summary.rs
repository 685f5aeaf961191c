use super::error::ComputationError;
use super::types::{AgePoint, PeakCorpus, ProjectionSummary, RetirementPlan, YearRecord};

const BREAKDOWN_TOLERANCE: f64 = 1e-9;

/// Headline metrics for a projection table.
pub fn summarize(plan: &RetirementPlan, records: &[YearRecord]) -> ProjectionSummary {
    let first_retired = records.iter().find(|r| r.is_retired);
    let first_depletion = records
        .iter()
        .find(|r| r.is_depleted())
        .map(|r| AgePoint {
            year_index: r.year_index,
            age: r.person_age,
        });

    ProjectionSummary {
        years_projected: records.len(),
        years_in_retirement: plan
            .person
            .life_expectancy
            .saturating_sub(plan.person.retirement_age),
        corpus_at_retirement: first_retired.map(|r| r.corpus_start),
        annual_expenses_at_retirement: first_retired.map(|r| r.total_expenses),
        first_depletion,
        total_lifetime_expenses: records.iter().map(|r| r.total_expenses).sum(),
        peak_corpus: peak_corpus(records),
        final_corpus: records.last().map(|r| r.corpus_end),
    }
}

/// The opening balance competes with every year-end balance; ties keep the
/// earliest age.
fn peak_corpus(records: &[YearRecord]) -> Option<PeakCorpus> {
    let first = records.first()?;
    let opening = PeakCorpus {
        age: first.person_age,
        amount: first.corpus_start,
    };

    Some(records.iter().fold(opening, |peak, r| {
        if r.corpus_end > peak.amount {
            PeakCorpus {
                age: r.person_age,
                amount: r.corpus_end,
            }
        } else {
            peak
        }
    }))
}

/// Checks the table-level invariants before a table is handed to a renderer.
pub fn verify_records(
    plan: &RetirementPlan,
    records: &[YearRecord],
) -> Result<(), ComputationError> {
    let expected = plan.person.horizon_years();
    if records.len() != expected {
        return Err(ComputationError::HorizonMismatch {
            expected,
            actual: records.len(),
        });
    }

    for (index, record) in records.iter().enumerate() {
        let expected_age = plan.person.current_age + index as u32;
        if record.year_index as usize != index || record.person_age != expected_age {
            return Err(ComputationError::YearGap {
                index,
                age: record.person_age,
                expected_age,
            });
        }

        let breakdown = record.expense_breakdown.values().sum::<f64>();
        let tolerance = BREAKDOWN_TOLERANCE * record.total_expenses.abs().max(1.0);
        if (breakdown - record.total_expenses).abs() > tolerance {
            return Err(ComputationError::BreakdownMismatch {
                index,
                breakdown,
                total: record.total_expenses,
            });
        }
    }

    for (index, pair) in records.windows(2).enumerate() {
        if pair[0].corpus_end != pair[1].corpus_start {
            return Err(ComputationError::CorpusDiscontinuity {
                index,
                next: index + 1,
                end: pair[0].corpus_end,
                start: pair[1].corpus_start,
            });
        }
    }

    Ok(())
}
