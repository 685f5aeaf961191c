use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

pub const DEFAULT_SCHOOL_START_AGE: u32 = 5;
pub const DEFAULT_SCHOOL_END_AGE: u32 = 17;
pub const DEFAULT_GRADUATION_AGE: u32 = 18;

/// Rates are annual percentages (10.0 means 10%).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub current_age: u32,
    pub retirement_age: u32,
    pub life_expectancy: u32,
    pub current_corpus: f64,
    pub pre_retirement_return: f64,
    pub post_retirement_return: f64,
    pub inflation: f64,
    pub monthly_expenses: f64,
}

impl PersonProfile {
    /// Number of projected years, current age to life expectancy inclusive.
    pub fn horizon_years(&self) -> usize {
        self.life_expectancy
            .checked_sub(self.current_age)
            .map_or(0, |span| span as usize + 1)
    }

    pub fn is_retired_at(&self, age: u32) -> bool {
        age >= self.retirement_age
    }

    pub fn return_rate_at(&self, age: u32) -> f64 {
        if self.is_retired_at(age) {
            self.post_retirement_return
        } else {
            self.pre_retirement_return
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub current_age: u32,
    pub school_fee: f64,
    pub school_fee_increase: f64,
    pub fee_increase_frequency: u32,
    pub graduation_fee: f64,
    pub marriage_cost: f64,
    pub marriage_age: u32,
}

/// Ages that trigger child expenses. The school window is inclusive on both
/// ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSettings {
    pub school_start_age: u32,
    pub school_end_age: u32,
    pub graduation_age: u32,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            school_start_age: DEFAULT_SCHOOL_START_AGE,
            school_end_age: DEFAULT_SCHOOL_END_AGE,
            graduation_age: DEFAULT_GRADUATION_AGE,
        }
    }
}

impl ProjectionSettings {
    pub fn in_school(&self, child_age: u32) -> bool {
        (self.school_start_age..=self.school_end_age).contains(&child_age)
    }
}

/// A validated plan. Only [`crate::core::validate_profile`] builds one from
/// raw input; the engine takes it by reference and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementPlan {
    pub person: PersonProfile,
    pub children: Vec<ChildProfile>,
    pub settings: ProjectionSettings,
}

/// Expense line in a year's breakdown. Child numbers are 1-based in the order
/// the children were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExpenseCategory {
    Living,
    SchoolFees { child: usize },
    Graduation { child: usize },
    Marriage { child: usize },
}

impl ExpenseCategory {
    pub fn child(self) -> Option<usize> {
        match self {
            ExpenseCategory::Living => None,
            ExpenseCategory::SchoolFees { child }
            | ExpenseCategory::Graduation { child }
            | ExpenseCategory::Marriage { child } => Some(child),
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseCategory::Living => f.write_str("living"),
            ExpenseCategory::SchoolFees { child } => write!(f, "school_fees_child_{child}"),
            ExpenseCategory::Graduation { child } => write!(f, "graduation_child_{child}"),
            ExpenseCategory::Marriage { child } => write!(f, "marriage_child_{child}"),
        }
    }
}

impl Serialize for ExpenseCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year_index: u32,
    pub person_age: u32,
    pub corpus_start: f64,
    pub corpus_growth: f64,
    pub total_expenses: f64,
    pub expense_breakdown: BTreeMap<ExpenseCategory, f64>,
    pub corpus_end: f64,
    pub is_retired: bool,
}

impl YearRecord {
    pub fn expense(&self, category: ExpenseCategory) -> Option<f64> {
        self.expense_breakdown.get(&category).copied()
    }

    pub fn living_expense(&self) -> f64 {
        self.expense(ExpenseCategory::Living).unwrap_or(0.0)
    }

    pub fn is_depleted(&self) -> bool {
        self.corpus_end < 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgePoint {
    pub year_index: u32,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakCorpus {
    pub age: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub years_projected: usize,
    pub years_in_retirement: u32,
    pub corpus_at_retirement: Option<f64>,
    pub annual_expenses_at_retirement: Option<f64>,
    pub first_depletion: Option<AgePoint>,
    pub total_lifetime_expenses: f64,
    pub peak_corpus: Option<PeakCorpus>,
    pub final_corpus: Option<f64>,
}
