use super::config::PlanConfiguration;
use super::types::{FilingStatus, RateSummary, YearInputs, YearResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayrollTax {
    pub base: f64,
    pub surtax: f64,
}

impl PayrollTax {
    pub fn total(self) -> f64 {
        self.base + self.surtax
    }
}

/// Base rate on wages up to the wage base, plus an uncapped surtax on wages
/// above the filing-status threshold.
pub fn payroll_tax(
    salary: f64,
    filing_status: FilingStatus,
    config: &PlanConfiguration,
) -> PayrollTax {
    let threshold = *config.payroll_surtax_threshold.get(filing_status);
    PayrollTax {
        base: salary.min(config.payroll_wage_base).max(0.0) * config.payroll_base_rate,
        surtax: (salary - threshold).max(0.0) * config.payroll_surtax_rate,
    }
}

pub fn clamp_deferral(
    desired_rate: f64,
    salary: f64,
    annual_limit: f64,
    catch_up_allowance: f64,
) -> f64 {
    (desired_rate * salary)
        .max(0.0)
        .min(annual_limit + catch_up_allowance)
}

/// Employer contribution from the nominal deferral rate. The dollar cap on
/// the employee's own deferral does not reduce the match.
pub fn employer_match(
    employee_deferral_rate: f64,
    match_per_dollar: f64,
    match_ceiling_rate: f64,
    salary: f64,
) -> f64 {
    let matched_rate = employee_deferral_rate.min(match_ceiling_rate).max(0.0);
    match_per_dollar * matched_rate * salary
}

pub fn compute_year(inputs: &YearInputs, config: &PlanConfiguration) -> YearResult {
    let salary = inputs.salary;
    let status = inputs.filing_status;

    let employee_deferral = clamp_deferral(
        inputs.employee_deferral_rate,
        salary,
        config.elective_deferral_limit,
        config.catch_up_allowance,
    );
    let employer_match = employer_match(
        inputs.employee_deferral_rate,
        inputs.employer_match_rate_per_dollar,
        inputs.employer_match_ceiling_rate,
        salary,
    );

    let payroll = payroll_tax(salary, status, config);

    let federal_taxable = federal_taxable_income(inputs, employee_deferral, config);
    let regional_taxable = regional_taxable_income(inputs, employee_deferral, config);
    let federal_tax = config.federal.brackets_for(status).tax(federal_taxable);
    let regional_tax = config.regional.brackets_for(status).tax(regional_taxable);

    let disability_insurance = salary * config.disability_insurance_rate;

    let take_home = salary
        - employee_deferral
        - payroll.base
        - payroll.surtax
        - federal_tax
        - regional_tax
        - disability_insurance;

    YearResult {
        salary,
        employee_deferral,
        employer_match,
        payroll_base: payroll.base,
        payroll_surtax: payroll.surtax,
        federal_tax,
        regional_tax,
        disability_insurance,
        take_home,
    }
}

pub fn rate_summary(
    inputs: &YearInputs,
    result: &YearResult,
    config: &PlanConfiguration,
) -> RateSummary {
    let status = inputs.filing_status;
    let effective_tax_rate = if result.salary > 0.0 {
        result.total_tax() / result.salary
    } else {
        0.0
    };
    RateSummary {
        effective_tax_rate,
        marginal_federal_rate: config
            .federal
            .brackets_for(status)
            .marginal_rate(federal_taxable_income(inputs, result.employee_deferral, config)),
        marginal_regional_rate: config
            .regional
            .brackets_for(status)
            .marginal_rate(regional_taxable_income(inputs, result.employee_deferral, config)),
    }
}

fn federal_taxable_income(
    inputs: &YearInputs,
    employee_deferral: f64,
    config: &PlanConfiguration,
) -> f64 {
    let deduction = config.federal.standard_deduction_for(inputs.filing_status);
    (inputs.salary - employee_deferral - deduction).max(0.0)
}

fn regional_taxable_income(
    inputs: &YearInputs,
    employee_deferral: f64,
    config: &PlanConfiguration,
) -> f64 {
    let deduction = config.regional.standard_deduction_for(inputs.filing_status);
    (inputs.salary - employee_deferral - deduction).max(0.0)
}
