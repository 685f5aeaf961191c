mod engine;
mod error;
mod sip;
mod summary;
mod types;
mod validate;

pub use engine::run_projection;
pub use error::{ComputationError, ValidationError};
pub use sip::{
    MAX_SIP_YEARS, SipParams, SipProjection, SipYear, StepUpMode, project_sip,
    required_monthly_sip, validate_sip, validate_sip_target,
};
pub use summary::{summarize, verify_records};
pub use types::{
    AgePoint, ChildProfile, ExpenseCategory, PeakCorpus, PersonProfile, ProjectionSettings,
    ProjectionSummary, RetirementPlan, YearRecord,
};
pub use validate::{MAX_AGE, MAX_AMOUNT, MAX_RATE, RawChild, RawProfile, validate_profile};

#[cfg(test)]
pub(crate) use validate::sample_raw_profile;
