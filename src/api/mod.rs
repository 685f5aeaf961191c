use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    ProjectionSummary, RawChild, RawProfile, RetirementPlan, SipParams, SipProjection,
    StepUpMode, ValidationError, YearRecord, project_sip, required_monthly_sip, validate_sip,
    validate_sip_target,
};
use crate::error::PlannerError;
use crate::io::{Projection, project};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectPayload {
    current_age: Option<i64>,
    retirement_age: Option<i64>,
    life_expectancy: Option<i64>,
    current_corpus: Option<f64>,
    pre_ret_return: Option<f64>,
    post_ret_return: Option<f64>,
    inflation: Option<f64>,
    monthly_expenses: Option<f64>,
    children: Option<Vec<ChildPayload>>,
    school_start_age: Option<i64>,
    school_end_age: Option<i64>,
    graduation_age: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChildPayload {
    age: Option<i64>,
    school_fee: Option<f64>,
    school_fee_increase: Option<f64>,
    fee_increase_freq: Option<i64>,
    graduation_fee: Option<f64>,
    marriage_cost: Option<f64>,
    marriage_age: Option<i64>,
}

impl From<ChildPayload> for RawChild {
    fn from(value: ChildPayload) -> Self {
        RawChild {
            current_age: value.age,
            school_fee: value.school_fee,
            school_fee_increase: value.school_fee_increase,
            fee_increase_frequency: value.fee_increase_freq,
            graduation_fee: value.graduation_fee,
            marriage_cost: value.marriage_cost,
            marriage_age: value.marriage_age,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SipPayload {
    target_amount: Option<f64>,
    monthly_investment: Option<f64>,
    years: Option<u32>,
    extra_months: Option<u32>,
    annual_return: Option<f64>,
    yearly_step_up: Option<f64>,
    #[serde(alias = "stepUpType")]
    step_up_mode: Option<StepUpMode>,
    initial_investment: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResponse {
    plan: RetirementPlan,
    summary: ProjectionSummary,
    records: Vec<YearRecord>,
}

impl From<Projection> for ProjectResponse {
    fn from(value: Projection) -> Self {
        ProjectResponse {
            plan: value.plan,
            summary: value.summary,
            records: value.records,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SipResponse {
    target_amount: Option<f64>,
    required_monthly_sip: Option<f64>,
    projection: SipProjection,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/project",
            get(project_get_handler).post(project_post_handler),
        )
        .route("/api/sip", get(sip_get_handler).post(sip_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    log::info!("retirement planner HTTP API listening on http://{addr}");
    log::info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn project_get_handler(Query(payload): Query<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn project_post_handler(Json(payload): Json<ProjectPayload>) -> Response {
    project_handler_impl(payload)
}

async fn sip_get_handler(Query(payload): Query<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

async fn sip_post_handler(Json(payload): Json<SipPayload>) -> Response {
    sip_handler_impl(payload)
}

fn project_handler_impl(payload: ProjectPayload) -> Response {
    let raw = raw_profile_from_payload(payload);
    match project(&raw) {
        Ok(projection) => {
            log::debug!(
                "projected {} years via API",
                projection.summary.years_projected
            );
            json_response(StatusCode::OK, ProjectResponse::from(projection))
        }
        Err(err) => planner_error_response(&err),
    }
}

fn sip_handler_impl(payload: SipPayload) -> Response {
    match sip_response_from_payload(payload) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

fn planner_error_response(err: &PlannerError) -> Response {
    let status = match err {
        PlannerError::Computation(_) => {
            log::error!("projection failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    };
    error_response(status, &err.to_string())
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn raw_profile_from_json(json: &str) -> Result<RawProfile, String> {
    let payload = serde_json::from_str::<ProjectPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(raw_profile_from_payload(payload))
}

/// Form fields override the sample profile; children replace the sample's
/// (empty) list only when supplied.
fn raw_profile_from_payload(payload: ProjectPayload) -> RawProfile {
    let mut raw = default_profile_for_api();

    if let Some(v) = payload.current_age {
        raw.current_age = Some(v);
    }
    if let Some(v) = payload.retirement_age {
        raw.retirement_age = Some(v);
    }
    if let Some(v) = payload.life_expectancy {
        raw.life_expectancy = Some(v);
    }
    if let Some(v) = payload.current_corpus {
        raw.current_corpus = Some(v);
    }
    if let Some(v) = payload.pre_ret_return {
        raw.pre_retirement_return = Some(v);
    }
    if let Some(v) = payload.post_ret_return {
        raw.post_retirement_return = Some(v);
    }
    if let Some(v) = payload.inflation {
        raw.inflation = Some(v);
    }
    if let Some(v) = payload.monthly_expenses {
        raw.monthly_expenses = Some(v);
    }
    if let Some(children) = payload.children {
        raw.children = children.into_iter().map(RawChild::from).collect();
    }
    if payload.school_start_age.is_some() {
        raw.school_start_age = payload.school_start_age;
    }
    if payload.school_end_age.is_some() {
        raw.school_end_age = payload.school_end_age;
    }
    if payload.graduation_age.is_some() {
        raw.graduation_age = payload.graduation_age;
    }

    raw
}

fn default_profile_for_api() -> RawProfile {
    RawProfile {
        current_age: Some(35),
        retirement_age: Some(60),
        life_expectancy: Some(85),
        current_corpus: Some(1_000_000.0),
        pre_retirement_return: Some(10.0),
        post_retirement_return: Some(8.0),
        inflation: Some(6.0),
        monthly_expenses: Some(50_000.0),
        ..RawProfile::default()
    }
}

fn sip_response_from_payload(payload: SipPayload) -> Result<SipResponse, ValidationError> {
    let mut params = SipParams {
        monthly_investment: payload.monthly_investment.unwrap_or(10_000.0),
        years: payload.years.unwrap_or(10),
        extra_months: payload.extra_months.unwrap_or(0),
        annual_return: payload.annual_return.unwrap_or(12.0),
        yearly_step_up: payload.yearly_step_up.unwrap_or(0.0),
        step_up_mode: payload.step_up_mode.unwrap_or_default(),
        initial_investment: payload.initial_investment.unwrap_or(0.0),
    };
    validate_sip(&params)?;

    let required = match payload.target_amount {
        Some(target) => Some(required_monthly_sip(validate_sip_target(target)?, &params)),
        None => None,
    };
    if let Some(monthly) = required {
        params.monthly_investment = monthly;
    }

    Ok(SipResponse {
        target_amount: payload.target_amount,
        required_monthly_sip: required,
        projection: project_sip(&params),
    })
}
