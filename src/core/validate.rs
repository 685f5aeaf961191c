use serde::Deserialize;

use super::error::ValidationError;
use super::types::{
    ChildProfile, DEFAULT_GRADUATION_AGE, DEFAULT_SCHOOL_END_AGE, DEFAULT_SCHOOL_START_AGE,
    PersonProfile, ProjectionSettings, RetirementPlan,
};

pub const MAX_AGE: i64 = 150;
pub const DEFAULT_FEE_INCREASE_FREQUENCY: i64 = 1;
pub const DEFAULT_MARRIAGE_AGE: i64 = 25;
/// Percent per year.
pub const MAX_RATE: f64 = 100.0;
/// Keeps every compounded value finite over a `MAX_AGE` horizon at `MAX_RATE`.
pub const MAX_AMOUNT: f64 = 1e15;

/// Unvalidated profile as it arrives from a config file, prompts or a form.
/// Ages are signed and every person field is optional so that bad or missing
/// values surface as a [`ValidationError`] naming the field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub current_age: Option<i64>,
    pub retirement_age: Option<i64>,
    pub life_expectancy: Option<i64>,
    pub current_corpus: Option<f64>,
    pub pre_retirement_return: Option<f64>,
    pub post_retirement_return: Option<f64>,
    pub inflation: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub children: Vec<RawChild>,
    pub school_start_age: Option<i64>,
    pub school_end_age: Option<i64>,
    pub graduation_age: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawChild {
    pub current_age: Option<i64>,
    pub school_fee: Option<f64>,
    pub school_fee_increase: Option<f64>,
    pub fee_increase_frequency: Option<i64>,
    pub graduation_fee: Option<f64>,
    pub marriage_cost: Option<f64>,
    pub marriage_age: Option<i64>,
}

pub fn validate_profile(raw: &RawProfile) -> Result<RetirementPlan, ValidationError> {
    let current_age = required_age("current_age", raw.current_age)?;
    let retirement_age = required_age("retirement_age", raw.retirement_age)?;
    let life_expectancy = required_age("life_expectancy", raw.life_expectancy)?;

    if retirement_age <= current_age {
        return Err(ValidationError::new(
            "retirement_age",
            "must exceed current_age",
        ));
    }
    if life_expectancy <= retirement_age {
        return Err(ValidationError::new(
            "life_expectancy",
            "must exceed retirement_age",
        ));
    }

    let person = PersonProfile {
        current_age,
        retirement_age,
        life_expectancy,
        current_corpus: required_amount("current_corpus", raw.current_corpus)?,
        pre_retirement_return: required_rate("pre_retirement_return", raw.pre_retirement_return)?,
        post_retirement_return: required_rate(
            "post_retirement_return",
            raw.post_retirement_return,
        )?,
        inflation: required_rate("inflation", raw.inflation)?,
        monthly_expenses: required_amount("monthly_expenses", raw.monthly_expenses)?,
    };

    let settings = validate_settings(raw)?;

    let children = raw
        .children
        .iter()
        .enumerate()
        .map(|(idx, child)| validate_child(idx, child))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RetirementPlan {
        person,
        children,
        settings,
    })
}

fn validate_settings(raw: &RawProfile) -> Result<ProjectionSettings, ValidationError> {
    let school_start_age = optional_age(
        "school_start_age",
        raw.school_start_age,
        i64::from(DEFAULT_SCHOOL_START_AGE),
    )?;
    let school_end_age = optional_age(
        "school_end_age",
        raw.school_end_age,
        i64::from(DEFAULT_SCHOOL_END_AGE),
    )?;
    let graduation_age = optional_age(
        "graduation_age",
        raw.graduation_age,
        i64::from(DEFAULT_GRADUATION_AGE),
    )?;

    if school_end_age < school_start_age {
        return Err(ValidationError::new(
            "school_end_age",
            "must be >= school_start_age",
        ));
    }

    Ok(ProjectionSettings {
        school_start_age,
        school_end_age,
        graduation_age,
    })
}

fn validate_child(idx: usize, raw: &RawChild) -> Result<ChildProfile, ValidationError> {
    let field = |name: &str| format!("children[{idx}].{name}");

    let current_age = required_age(&field("current_age"), raw.current_age)?;
    let marriage_age = optional_age(
        &field("marriage_age"),
        raw.marriage_age,
        DEFAULT_MARRIAGE_AGE,
    )?;
    if marriage_age <= current_age {
        let reason = if raw.marriage_age.is_some() {
            "must exceed the child's current_age".to_string()
        } else {
            format!(
                "defaults to {DEFAULT_MARRIAGE_AGE}, which does not exceed the child's \
                 current_age; set it explicitly"
            )
        };
        return Err(ValidationError::new(field("marriage_age"), reason));
    }

    let fee_increase_frequency = raw
        .fee_increase_frequency
        .unwrap_or(DEFAULT_FEE_INCREASE_FREQUENCY);
    if !(1..=MAX_AGE).contains(&fee_increase_frequency) {
        return Err(ValidationError::new(
            field("fee_increase_frequency"),
            format!("must be between 1 and {MAX_AGE} years"),
        ));
    }

    Ok(ChildProfile {
        current_age,
        school_fee: optional_amount(&field("school_fee"), raw.school_fee)?,
        school_fee_increase: check_rate(
            &field("school_fee_increase"),
            raw.school_fee_increase.unwrap_or(0.0),
        )?,
        fee_increase_frequency: fee_increase_frequency as u32,
        graduation_fee: optional_amount(&field("graduation_fee"), raw.graduation_fee)?,
        marriage_cost: optional_amount(&field("marriage_cost"), raw.marriage_cost)?,
        marriage_age,
    })
}

fn required_age(field: &str, value: Option<i64>) -> Result<u32, ValidationError> {
    let Some(age) = value else {
        return Err(ValidationError::new(field, "is required"));
    };
    check_age(field, age)
}

fn optional_age(field: &str, value: Option<i64>, default: i64) -> Result<u32, ValidationError> {
    check_age(field, value.unwrap_or(default))
}

fn check_age(field: &str, age: i64) -> Result<u32, ValidationError> {
    if age < 0 {
        return Err(ValidationError::new(field, "must be non-negative"));
    }
    if age > MAX_AGE {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_AGE}"),
        ));
    }
    Ok(age as u32)
}

fn required_amount(field: &str, value: Option<f64>) -> Result<f64, ValidationError> {
    let Some(amount) = value else {
        return Err(ValidationError::new(field, "is required"));
    };
    check_non_negative(field, amount)
}

fn optional_amount(field: &str, value: Option<f64>) -> Result<f64, ValidationError> {
    check_non_negative(field, value.unwrap_or(0.0))
}

fn required_rate(field: &str, value: Option<f64>) -> Result<f64, ValidationError> {
    let Some(rate) = value else {
        return Err(ValidationError::new(field, "is required"));
    };
    check_rate(field, rate)
}

fn check_rate(field: &str, rate: f64) -> Result<f64, ValidationError> {
    if !rate.is_finite() {
        return Err(ValidationError::new(field, "rate must be a finite number"));
    }
    if rate < 0.0 {
        return Err(ValidationError::new(field, "rate must be non-negative"));
    }
    if rate > MAX_RATE {
        return Err(ValidationError::new(
            field,
            format!("rate must be at most {MAX_RATE}"),
        ));
    }
    Ok(rate)
}

fn check_non_negative(field: &str, amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if amount < 0.0 {
        return Err(ValidationError::new(field, "must be non-negative"));
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_AMOUNT:e}"),
        ));
    }
    Ok(amount)
}

#[cfg(test)]
pub(crate) fn sample_raw_profile() -> RawProfile {
    RawProfile {
        current_age: Some(35),
        retirement_age: Some(60),
        life_expectancy: Some(90),
        current_corpus: Some(5_000_000.0),
        pre_retirement_return: Some(10.0),
        post_retirement_return: Some(7.0),
        inflation: Some(6.0),
        monthly_expenses: Some(50_000.0),
        ..RawProfile::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_child() -> RawChild {
        RawChild {
            current_age: Some(5),
            school_fee: Some(100_000.0),
            school_fee_increase: Some(10.0),
            fee_increase_frequency: Some(2),
            graduation_fee: Some(1_000_000.0),
            marriage_cost: Some(2_000_000.0),
            marriage_age: Some(28),
        }
    }

    #[test]
    fn accepts_sample_profile_and_applies_defaults() {
        let plan = validate_profile(&sample_raw_profile()).expect("valid profile");
        assert_eq!(plan.person.current_age, 35);
        assert_eq!(plan.person.retirement_age, 60);
        assert_eq!(plan.person.life_expectancy, 90);
        assert_eq!(plan.person.pre_retirement_return, 10.0);
        assert!(plan.children.is_empty());
        assert_eq!(plan.settings, ProjectionSettings::default());
    }

    #[test]
    fn child_defaults_follow_config_documentation() {
        let mut raw = sample_raw_profile();
        raw.children.push(RawChild {
            current_age: Some(3),
            ..RawChild::default()
        });

        let plan = validate_profile(&raw).expect("valid profile");
        let child = &plan.children[0];
        assert_eq!(child.school_fee, 0.0);
        assert_eq!(child.school_fee_increase, 0.0);
        assert_eq!(child.fee_increase_frequency, 1);
        assert_eq!(child.graduation_fee, 0.0);
        assert_eq!(child.marriage_cost, 0.0);
        assert_eq!(child.marriage_age, 25);
    }

    #[test]
    fn rejects_retirement_not_after_current_age() {
        let mut raw = sample_raw_profile();
        raw.retirement_age = Some(35);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "retirement_age");
        assert_eq!(err.to_string(), "retirement_age must exceed current_age");
    }

    #[test]
    fn rejects_life_expectancy_not_after_retirement() {
        let mut raw = sample_raw_profile();
        raw.life_expectancy = Some(60);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "life_expectancy");
    }

    #[test]
    fn rejects_negative_rate() {
        let mut raw = sample_raw_profile();
        raw.inflation = Some(-1.0);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.to_string(), "inflation rate must be non-negative");
    }

    #[test]
    fn rejects_rates_above_one_hundred_percent() {
        let mut raw = sample_raw_profile();
        raw.pre_retirement_return = Some(1e300);
        raw.inflation = Some(1e300);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.to_string(), "pre_retirement_return rate must be at most 100");

        let mut raw = sample_raw_profile();
        raw.inflation = Some(100.5);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "inflation");

        let mut raw = sample_raw_profile();
        raw.post_retirement_return = Some(MAX_RATE);
        assert!(validate_profile(&raw).is_ok());
    }

    #[test]
    fn rejects_child_fee_increase_above_one_hundred_percent() {
        let mut raw = sample_raw_profile();
        let mut child = sample_child();
        child.school_fee_increase = Some(250.0);
        raw.children.push(child);

        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(
            err.to_string(),
            "children[0].school_fee_increase rate must be at most 100"
        );
    }

    #[test]
    fn rejects_amounts_beyond_the_finite_range() {
        let mut raw = sample_raw_profile();
        raw.monthly_expenses = Some(1e307);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "monthly_expenses");
    }

    #[test]
    fn extreme_but_valid_profile_projects_finite_records() {
        let mut raw = sample_raw_profile();
        raw.current_age = Some(0);
        raw.retirement_age = Some(75);
        raw.life_expectancy = Some(MAX_AGE);
        raw.current_corpus = Some(MAX_AMOUNT);
        raw.pre_retirement_return = Some(MAX_RATE);
        raw.post_retirement_return = Some(MAX_RATE);
        raw.inflation = Some(MAX_RATE);
        raw.monthly_expenses = Some(MAX_AMOUNT);

        let plan = validate_profile(&raw).expect("valid profile");
        let records = crate::core::run_projection(&plan);
        assert!(records.iter().all(|r| r.corpus_end.is_finite()));
        assert!(crate::core::verify_records(&plan, &records).is_ok());
    }

    #[test]
    fn defaulted_marriage_age_error_says_it_was_defaulted() {
        let mut raw = sample_raw_profile();
        raw.children.push(RawChild {
            current_age: Some(30),
            ..RawChild::default()
        });
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "children[0].marriage_age");
        assert!(err.reason.starts_with("defaults to 25"));

        let mut raw = sample_raw_profile();
        let mut child = sample_child();
        child.current_age = Some(30);
        child.marriage_age = Some(29);
        raw.children.push(child);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.reason, "must exceed the child's current_age");
    }

    #[test]
    fn rejects_non_finite_amount() {
        let mut raw = sample_raw_profile();
        raw.current_corpus = Some(f64::NAN);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "current_corpus");
    }

    #[test]
    fn rejects_missing_required_field() {
        let mut raw = sample_raw_profile();
        raw.monthly_expenses = None;
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.to_string(), "monthly_expenses is required");
    }

    #[test]
    fn rejects_negative_and_absurd_ages() {
        let mut raw = sample_raw_profile();
        raw.current_age = Some(-1);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "current_age");

        let mut raw = sample_raw_profile();
        raw.life_expectancy = Some(MAX_AGE + 1);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "life_expectancy");
    }

    #[test]
    fn child_errors_name_the_child_index() {
        let mut raw = sample_raw_profile();
        raw.children.push(sample_child());
        let mut bad = sample_child();
        bad.marriage_age = Some(4);
        raw.children.push(bad);

        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "children[1].marriage_age");
    }

    #[test]
    fn rejects_zero_fee_increase_frequency() {
        let mut raw = sample_raw_profile();
        let mut child = sample_child();
        child.fee_increase_frequency = Some(0);
        raw.children.push(child);

        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "children[0].fee_increase_frequency");
    }

    #[test]
    fn rejects_negative_child_cost() {
        let mut raw = sample_raw_profile();
        let mut child = sample_child();
        child.graduation_fee = Some(-10.0);
        raw.children.push(child);

        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.to_string(), "children[0].graduation_fee must be non-negative");
    }

    #[test]
    fn rejects_inverted_school_window() {
        let mut raw = sample_raw_profile();
        raw.school_start_age = Some(12);
        raw.school_end_age = Some(6);
        let err = validate_profile(&raw).expect_err("must reject");
        assert_eq!(err.field, "school_end_age");
    }

    #[test]
    fn parses_config_shaped_json() {
        let json = r#"{
          "current_age": 40,
          "retirement_age": 58,
          "life_expectancy": 85,
          "current_corpus": 1200000,
          "pre_retirement_return": 9,
          "post_retirement_return": 6.5,
          "inflation": 5,
          "monthly_expenses": 40000,
          "graduation_age": 21,
          "children": [{ "current_age": 8, "school_fee": 90000 }]
        }"#;
        let raw: RawProfile = serde_json::from_str(json).expect("json should parse");
        let plan = validate_profile(&raw).expect("valid profile");

        assert_eq!(plan.person.life_expectancy, 85);
        assert_eq!(plan.settings.graduation_age, 21);
        assert_eq!(plan.children.len(), 1);
        assert_eq!(plan.children[0].school_fee, 90_000.0);
        assert_eq!(plan.children[0].marriage_age, 25);
    }
}
