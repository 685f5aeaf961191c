//! Systematic investment plan (SIP) arithmetic: a monthly instalment invested
//! at the start of each month, optionally stepped up once a year.

use serde::{Deserialize, Serialize};

use super::error::ValidationError;

pub const MAX_SIP_YEARS: u32 = 100;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepUpMode {
    /// Each step-up applies to the previous year's instalment.
    #[default]
    Compounded,
    /// Each step-up adds a fixed share of the first instalment.
    Fixed,
}

/// Rates are annual percentages.
#[derive(Debug, Clone, PartialEq)]
pub struct SipParams {
    pub monthly_investment: f64,
    pub years: u32,
    pub extra_months: u32,
    pub annual_return: f64,
    pub yearly_step_up: f64,
    pub step_up_mode: StepUpMode,
    pub initial_investment: f64,
}

impl SipParams {
    /// Saturates rather than overflowing; [`validate_sip`] keeps real tenures
    /// far below the limit.
    pub fn total_months(&self) -> u32 {
        self.years.saturating_mul(12).saturating_add(self.extra_months)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipYear {
    pub year: u32,
    pub monthly_investment: f64,
    pub total_invested: f64,
    pub corpus: f64,
    pub returns: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SipProjection {
    pub final_amount: f64,
    pub total_invested: f64,
    pub total_returns: f64,
    pub years: Vec<SipYear>,
}

pub fn validate_sip(params: &SipParams) -> Result<(), ValidationError> {
    if params.years > MAX_SIP_YEARS {
        return Err(ValidationError::new(
            "years",
            format!("must be at most {MAX_SIP_YEARS}"),
        ));
    }
    if params.extra_months >= 12 {
        return Err(ValidationError::new("extra_months", "must be between 0 and 11"));
    }
    if params.total_months() == 0 {
        return Err(ValidationError::new("years", "tenure must be at least one month"));
    }
    for (field, value) in [
        ("monthly_investment", params.monthly_investment),
        ("annual_return", params.annual_return),
        ("yearly_step_up", params.yearly_step_up),
        ("initial_investment", params.initial_investment),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::new(field, "must be a non-negative number"));
        }
    }
    Ok(())
}

/// Month-by-month SIP growth with one row per completed year, plus a row for
/// a trailing partial year. An initial lump sum is reported as year 0.
pub fn project_sip(params: &SipParams) -> SipProjection {
    let monthly_rate = params.annual_return / 100.0 / 12.0;
    let step_up = params.yearly_step_up / 100.0;
    let total_months = params.total_months();

    let mut corpus = params.initial_investment;
    let mut total_invested = params.initial_investment;
    let mut instalment = params.monthly_investment;
    let mut years = Vec::with_capacity(total_months.div_ceil(12) as usize + 1);

    if params.initial_investment > 0.0 {
        years.push(SipYear {
            year: 0,
            monthly_investment: params.monthly_investment,
            total_invested,
            corpus,
            returns: 0.0,
        });
    }

    for month in 1..=total_months {
        corpus += instalment;
        total_invested += instalment;
        corpus *= 1.0 + monthly_rate;

        let year_end = month % 12 == 0;
        if year_end || month == total_months {
            years.push(SipYear {
                year: month.div_ceil(12),
                monthly_investment: instalment,
                total_invested,
                corpus,
                returns: corpus - total_invested,
            });
        }

        if year_end && month < total_months {
            let completed_years = month / 12;
            instalment = match params.step_up_mode {
                StepUpMode::Compounded => instalment * (1.0 + step_up),
                StepUpMode::Fixed => {
                    params.monthly_investment * (1.0 + step_up * completed_years as f64)
                }
            };
        }
    }

    SipProjection {
        final_amount: corpus,
        total_invested,
        total_returns: corpus - total_invested,
        years,
    }
}

pub fn validate_sip_target(target: f64) -> Result<f64, ValidationError> {
    if !target.is_finite() || target <= 0.0 {
        return Err(ValidationError::new("target_amount", "must be > 0"));
    }
    Ok(target)
}

/// Starting instalment that reaches `target` by the end of the tenure, using
/// `params.monthly_investment` only as a placeholder. The final corpus is
/// linear in the starting instalment, so this is a closed form rather than a
/// search. Zero when the initial lump sum alone reaches the target.
pub fn required_monthly_sip(target: f64, params: &SipParams) -> f64 {
    let lump_sum_only = project_sip(&SipParams {
        monthly_investment: 0.0,
        ..params.clone()
    });
    let unit_instalment = project_sip(&SipParams {
        monthly_investment: 1.0,
        initial_investment: 0.0,
        ..params.clone()
    });

    if unit_instalment.final_amount <= 0.0 {
        return 0.0;
    }
    ((target - lump_sum_only.final_amount) / unit_instalment.final_amount).max(0.0)
}
