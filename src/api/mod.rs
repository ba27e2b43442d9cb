use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Parser, ValueEnum, error::ErrorKind};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ffi::OsString;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::reference::CATCH_UP_ALLOWANCE_2025;
use crate::core::{
    FilingStatus, PayFrequency, PlanConfiguration, ProjectionInputs, ProjectionResult,
    RateSummary, YearInputs, YearResult, compute_year, rate_summary, run_projection,
};

const MAX_PROJECTION_YEARS: u32 = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliFilingStatus {
    Single,
    MarriedFilingJointly,
}

impl From<CliFilingStatus> for FilingStatus {
    fn from(value: CliFilingStatus) -> Self {
        match value {
            CliFilingStatus::Single => FilingStatus::Single,
            CliFilingStatus::MarriedFilingJointly => FilingStatus::MarriedFilingJointly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPayFrequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    Annual,
}

impl From<CliPayFrequency> for PayFrequency {
    fn from(value: CliPayFrequency) -> Self {
        match value {
            CliPayFrequency::Weekly => PayFrequency::Weekly,
            CliPayFrequency::Biweekly => PayFrequency::Biweekly,
            CliPayFrequency::SemiMonthly => PayFrequency::SemiMonthly,
            CliPayFrequency::Monthly => PayFrequency::Monthly,
            CliPayFrequency::Annual => PayFrequency::Annual,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiFilingStatus {
    Single,
    #[serde(
        alias = "mfj",
        alias = "married",
        alias = "marriedFilingJointly",
        alias = "married_filing_jointly"
    )]
    MarriedFilingJointly,
}

impl From<ApiFilingStatus> for CliFilingStatus {
    fn from(value: ApiFilingStatus) -> Self {
        match value {
            ApiFilingStatus::Single => CliFilingStatus::Single,
            ApiFilingStatus::MarriedFilingJointly => CliFilingStatus::MarriedFilingJointly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiPayFrequency {
    Weekly,
    #[serde(alias = "bi-weekly")]
    Biweekly,
    #[serde(alias = "semiMonthly", alias = "semi_monthly")]
    SemiMonthly,
    Monthly,
    #[serde(alias = "yearly")]
    Annual,
}

impl From<ApiPayFrequency> for CliPayFrequency {
    fn from(value: ApiPayFrequency) -> Self {
        match value {
            ApiPayFrequency::Weekly => CliPayFrequency::Weekly,
            ApiPayFrequency::Biweekly => CliPayFrequency::Biweekly,
            ApiPayFrequency::SemiMonthly => CliPayFrequency::SemiMonthly,
            ApiPayFrequency::Monthly => CliPayFrequency::Monthly,
            ApiPayFrequency::Annual => CliPayFrequency::Annual,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    salary: Option<f64>,
    filing_status: Option<ApiFilingStatus>,
    deferral_pct: Option<f64>,
    match_pct: Option<f64>,
    match_up_to_pct: Option<f64>,
    catch_up: Option<bool>,
    pay_frequency: Option<ApiPayFrequency>,

    years: Option<u32>,
    raise_pct: Option<f64>,
    invest_return_pct: Option<f64>,
    discount_pct: Option<f64>,
}

#[derive(Parser, Debug)]
#[command(
    name = "paycheck",
    about = "Take-home pay estimator with pretax deferral and retirement contribution projection"
)]
struct Cli {
    #[arg(long, default_value_t = 100_000.0, help = "Gross annual salary")]
    salary: f64,
    #[arg(long, value_enum, default_value_t = CliFilingStatus::Single)]
    filing_status: CliFilingStatus,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Employee pretax deferral in percent of salary"
    )]
    deferral_pct: f64,
    #[arg(
        long,
        default_value_t = 50.0,
        help = "Employer match per dollar deferred, in percent"
    )]
    match_pct: f64,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Deferral rate in percent above which the employer stops matching"
    )]
    match_up_to_pct: f64,
    #[arg(long, help = "Add the age 50+ catch-up allowance to the deferral limit")]
    catch_up: bool,
    #[arg(long, value_enum, default_value_t = CliPayFrequency::Biweekly)]
    pay_frequency: CliPayFrequency,
    #[arg(
        long,
        default_value_t = 0,
        help = "Years to project contributions over; 0 skips the projection"
    )]
    years: u32,
    #[arg(long, default_value_t = 3.0, help = "Annual salary raise in percent")]
    raise_pct: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        help = "Annual investment return in percent"
    )]
    invest_return_pct: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Discount rate for present value in percent"
    )]
    discount_pct: f64,
    #[arg(
        long,
        help = "Plan configuration JSON file; defaults to the reference-year figures"
    )]
    config: Option<PathBuf>,
}

#[derive(Debug)]
struct CalculateRequest {
    year: YearInputs,
    projection: ProjectionInputs,
    pay_frequency: PayFrequency,
    catch_up: bool,
}

#[derive(Clone)]
struct AppState {
    plan: Arc<PlanConfiguration>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaycheckResponse {
    filing_status: FilingStatus,
    pay_frequency: PayFrequency,
    year: YearResult,
    per_period: YearResult,
    rates: RateSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionResponse {
    filing_status: FilingStatus,
    projection: ProjectionResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CliResponse {
    paycheck: PaycheckResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    projection: Option<ProjectionResult>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn build_request(cli: &Cli) -> Result<CalculateRequest, String> {
    if !cli.salary.is_finite() || cli.salary < 0.0 {
        return Err("--salary must be >= 0".to_string());
    }

    for (name, pct) in [
        ("--deferral-pct", cli.deferral_pct),
        ("--match-pct", cli.match_pct),
    ] {
        if !pct.is_finite() || pct < 0.0 {
            return Err(format!("{name} must be >= 0"));
        }
    }

    if !(0.0..=100.0).contains(&cli.match_up_to_pct) {
        return Err("--match-up-to-pct must be between 0 and 100".to_string());
    }

    if cli.years > MAX_PROJECTION_YEARS {
        return Err(format!("--years must be <= {MAX_PROJECTION_YEARS}"));
    }

    for (name, pct) in [
        ("--raise-pct", cli.raise_pct),
        ("--invest-return-pct", cli.invest_return_pct),
        ("--discount-pct", cli.discount_pct),
    ] {
        if !pct.is_finite() || pct <= -100.0 {
            return Err(format!("{name} must be > -100"));
        }
    }

    let filing_status: FilingStatus = cli.filing_status.into();
    let employee_deferral_rate = cli.deferral_pct / 100.0;
    let employer_match_rate_per_dollar = cli.match_pct / 100.0;
    let employer_match_ceiling_rate = cli.match_up_to_pct / 100.0;

    Ok(CalculateRequest {
        year: YearInputs {
            salary: cli.salary,
            filing_status,
            employee_deferral_rate,
            employer_match_rate_per_dollar,
            employer_match_ceiling_rate,
        },
        projection: ProjectionInputs {
            filing_status,
            employee_deferral_rate,
            employer_match_rate_per_dollar,
            employer_match_ceiling_rate,
            start_salary: cli.salary,
            number_of_years: cli.years,
            annual_raise_rate: cli.raise_pct / 100.0,
            investment_return_rate: cli.invest_return_pct / 100.0,
            discount_rate: cli.discount_pct / 100.0,
        },
        pay_frequency: cli.pay_frequency.into(),
        catch_up: cli.catch_up,
    })
}

/// The plan to calculate with. `catch_up` fills in the published allowance
/// only when the configured plan carries none of its own.
fn effective_plan(plan: &PlanConfiguration, catch_up: bool) -> Cow<'_, PlanConfiguration> {
    if catch_up && plan.catch_up_allowance <= 0.0 {
        Cow::Owned(plan.clone().with_catch_up_allowance(CATCH_UP_ALLOWANCE_2025))
    } else {
        Cow::Borrowed(plan)
    }
}

fn build_paycheck_response(
    request: &CalculateRequest,
    plan: &PlanConfiguration,
) -> PaycheckResponse {
    let plan = effective_plan(plan, request.catch_up);
    let year = compute_year(&request.year, &plan);
    PaycheckResponse {
        filing_status: request.year.filing_status,
        pay_frequency: request.pay_frequency,
        year,
        per_period: year.per_period(request.pay_frequency),
        rates: rate_summary(&request.year, &year, &plan),
    }
}

fn build_projection_response(
    request: &CalculateRequest,
    plan: &PlanConfiguration,
) -> ProjectionResponse {
    let plan = effective_plan(plan, request.catch_up);
    ProjectionResponse {
        filing_status: request.projection.filing_status,
        projection: run_projection(&request.projection, &plan),
    }
}

/// One-shot command line: computes the paycheck (and the projection when
/// `--years` is set) and returns the pretty-printed JSON response.
pub fn run_cli<I, T>(args: I) -> Result<String, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Ok(e.to_string());
        }
        Err(e) => return Err(e.to_string()),
    };
    let plan = match &cli.config {
        Some(path) => PlanConfiguration::from_path(path).map_err(|e| e.to_string())?,
        None => PlanConfiguration::reference(),
    };
    let request = build_request(&cli)?;

    let paycheck = build_paycheck_response(&request, &plan);
    let projection = (request.projection.number_of_years > 0)
        .then(|| build_projection_response(&request, &plan).projection);
    let response = CliResponse {
        paycheck,
        projection,
    };
    serde_json::to_string_pretty(&response).map_err(|e| format!("Failed to encode response: {e}"))
}

pub async fn run_http_server(port: u16, plan: PlanConfiguration) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(plan);

    let listener = TcpListener::bind(addr).await?;
    log::info!("paycheck HTTP API listening on http://{addr}");
    log::info!("Local access: http://127.0.0.1:{port}/api/paycheck");

    axum::serve(listener, app).await
}

fn build_router(plan: PlanConfiguration) -> Router {
    let state = AppState {
        plan: Arc::new(plan),
    };
    Router::new()
        .route(
            "/api/paycheck",
            get(paycheck_get_handler).post(paycheck_post_handler),
        )
        .route(
            "/api/projection",
            get(projection_get_handler).post(projection_post_handler),
        )
        .route("/api/config", get(config_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn config_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, state.plan.as_ref())
}

async fn paycheck_get_handler(
    State(state): State<AppState>,
    payload: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => paycheck_handler_impl(&state, payload),
        Err(rejection) => payload_rejected(&rejection.body_text()),
    }
}

async fn paycheck_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => paycheck_handler_impl(&state, payload),
        Err(rejection) => payload_rejected(&rejection.body_text()),
    }
}

async fn projection_get_handler(
    State(state): State<AppState>,
    payload: Result<Query<CalculatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => projection_handler_impl(&state, payload),
        Err(rejection) => payload_rejected(&rejection.body_text()),
    }
}

async fn projection_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => projection_handler_impl(&state, payload),
        Err(rejection) => payload_rejected(&rejection.body_text()),
    }
}

fn payload_rejected(detail: &str) -> Response {
    log::debug!("rejected API payload: {detail}");
    error_response(
        StatusCode::BAD_REQUEST,
        &format!("Invalid API payload: {detail}"),
    )
}

fn paycheck_handler_impl(state: &AppState, payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            log::debug!("rejected paycheck request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };
    log::debug!(
        "paycheck request: salary={} status={:?}",
        request.year.salary,
        request.year.filing_status
    );
    json_response(StatusCode::OK, build_paycheck_response(&request, &state.plan))
}

fn projection_handler_impl(state: &AppState, payload: CalculatePayload) -> Response {
    let request = match api_request_from_payload(payload) {
        Ok(request) => request,
        Err(msg) => {
            log::debug!("rejected projection request: {msg}");
            return error_response(StatusCode::BAD_REQUEST, &msg);
        }
    };
    log::debug!(
        "projection request: start_salary={} years={}",
        request.projection.start_salary,
        request.projection.number_of_years
    );
    json_response(StatusCode::OK, build_projection_response(&request, &state.plan))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
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
fn api_request_from_json(json: &str) -> Result<CalculateRequest, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(payload)
}

fn api_request_from_payload(payload: CalculatePayload) -> Result<CalculateRequest, String> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.salary {
        cli.salary = v;
    }
    if let Some(v) = payload.filing_status {
        cli.filing_status = v.into();
    }
    if let Some(v) = payload.deferral_pct {
        cli.deferral_pct = v;
    }
    if let Some(v) = payload.match_pct {
        cli.match_pct = v;
    }
    if let Some(v) = payload.match_up_to_pct {
        cli.match_up_to_pct = v;
    }
    if let Some(v) = payload.catch_up {
        cli.catch_up = v;
    }
    if let Some(v) = payload.pay_frequency {
        cli.pay_frequency = v.into();
    }

    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.raise_pct {
        cli.raise_pct = v;
    }
    if let Some(v) = payload.invest_return_pct {
        cli.invest_return_pct = v;
    }
    if let Some(v) = payload.discount_pct {
        cli.discount_pct = v;
    }

    build_request(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        salary: 100_000.0,
        filing_status: CliFilingStatus::Single,
        deferral_pct: 6.0,
        match_pct: 50.0,
        match_up_to_pct: 6.0,
        catch_up: false,
        pay_frequency: CliPayFrequency::Biweekly,
        years: 10,
        raise_pct: 3.0,
        invest_return_pct: 7.0,
        discount_pct: 4.0,
        config: None,
    }
}
