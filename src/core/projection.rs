use super::config::PlanConfiguration;
use super::engine::compute_year;
use super::types::{ProjectionInputs, ProjectionResult, ProjectionRow};

#[derive(Debug, Clone, Copy)]
struct ProjectionState {
    salary: f64,
    future_value: f64,
    present_value: f64,
    cumulative_employee_deferral: f64,
    cumulative_employer_match: f64,
}

impl ProjectionState {
    fn new(start_salary: f64) -> Self {
        Self {
            salary: start_salary,
            future_value: 0.0,
            present_value: 0.0,
            cumulative_employee_deferral: 0.0,
            cumulative_employer_match: 0.0,
        }
    }
}

/// Runs the single-year computation once per year on a salary that grows by
/// `annual_raise_rate`. Contributions are deposited at the end of each year:
/// the prior balance compounds one period, then the new deposit is added.
pub fn run_projection(inputs: &ProjectionInputs, config: &PlanConfiguration) -> ProjectionResult {
    let mut state = ProjectionState::new(inputs.start_salary);
    let mut rows = Vec::with_capacity(inputs.number_of_years as usize);

    for year_index in 1..=inputs.number_of_years {
        let (row, next) = project_year(inputs, config, year_index, state);
        log::trace!(
            "year {year_index}: salary={:.2} contribution={:.2} balance={:.2}",
            row.year.salary,
            row.total_contribution,
            row.balance
        );
        rows.push(row);
        state = next;
    }

    ProjectionResult {
        rows,
        future_value: state.future_value,
        present_value: state.present_value,
        cumulative_employee_deferral: state.cumulative_employee_deferral,
        cumulative_employer_match: state.cumulative_employer_match,
    }
}

fn project_year(
    inputs: &ProjectionInputs,
    config: &PlanConfiguration,
    year_index: u32,
    state: ProjectionState,
) -> (ProjectionRow, ProjectionState) {
    let year = compute_year(&inputs.year_inputs(state.salary), config);
    let contribution = year.total_contribution();

    let future_value = state.future_value * (1.0 + inputs.investment_return_rate) + contribution;
    let discounted_contribution = contribution / discount_factor(inputs.discount_rate, year_index);
    let cumulative_employee_deferral = state.cumulative_employee_deferral + year.employee_deferral;
    let cumulative_employer_match = state.cumulative_employer_match + year.employer_match;

    let row = ProjectionRow {
        year_index,
        year,
        total_contribution: contribution,
        cumulative_employee_deferral,
        cumulative_employer_match,
        cumulative_total: cumulative_employee_deferral + cumulative_employer_match,
        balance: future_value,
        discounted_contribution,
    };
    let next = ProjectionState {
        salary: state.salary * (1.0 + inputs.annual_raise_rate),
        future_value,
        present_value: state.present_value + discounted_contribution,
        cumulative_employee_deferral,
        cumulative_employer_match,
    };
    (row, next)
}

/// `(1 + rate)^year_index` over the whole `u32` range of year indices.
fn discount_factor(rate: f64, year_index: u32) -> f64 {
    (1.0 + rate).powf(f64::from(year_index))
}
