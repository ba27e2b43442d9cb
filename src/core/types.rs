use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilingStatus {
    Single,
    MarriedFilingJointly,
}

/// A value that differs by filing status.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerStatus<T> {
    pub single: T,
    pub married_filing_jointly: T,
}

impl<T> PerStatus<T> {
    pub fn get(&self, status: FilingStatus) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayFrequency {
    Weekly,
    Biweekly,
    SemiMonthly,
    Monthly,
    Annual,
}

impl PayFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Biweekly => 26,
            PayFrequency::SemiMonthly => 24,
            PayFrequency::Monthly => 12,
            PayFrequency::Annual => 1,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct YearInputs {
    pub salary: f64,
    pub filing_status: FilingStatus,
    pub employee_deferral_rate: f64,
    pub employer_match_rate_per_dollar: f64,
    pub employer_match_ceiling_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub salary: f64,
    pub employee_deferral: f64,
    pub employer_match: f64,
    pub payroll_base: f64,
    pub payroll_surtax: f64,
    pub federal_tax: f64,
    pub regional_tax: f64,
    pub disability_insurance: f64,
    pub take_home: f64,
}

impl YearResult {
    /// Payroll, income and disability taxes withheld from gross salary.
    pub fn total_tax(&self) -> f64 {
        self.payroll_base
            + self.payroll_surtax
            + self.federal_tax
            + self.regional_tax
            + self.disability_insurance
    }

    pub fn total_contribution(&self) -> f64 {
        self.employee_deferral + self.employer_match
    }

    /// The same breakdown spread evenly over each paycheck of the year.
    pub fn per_period(&self, frequency: PayFrequency) -> YearResult {
        let periods = frequency.periods_per_year() as f64;
        YearResult {
            salary: self.salary / periods,
            employee_deferral: self.employee_deferral / periods,
            employer_match: self.employer_match / periods,
            payroll_base: self.payroll_base / periods,
            payroll_surtax: self.payroll_surtax / periods,
            federal_tax: self.federal_tax / periods,
            regional_tax: self.regional_tax / periods,
            disability_insurance: self.disability_insurance / periods,
            take_home: self.take_home / periods,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateSummary {
    pub effective_tax_rate: f64,
    pub marginal_federal_rate: f64,
    pub marginal_regional_rate: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs {
    pub filing_status: FilingStatus,
    pub employee_deferral_rate: f64,
    pub employer_match_rate_per_dollar: f64,
    pub employer_match_ceiling_rate: f64,
    pub start_salary: f64,
    pub number_of_years: u32,
    pub annual_raise_rate: f64,
    pub investment_return_rate: f64,
    pub discount_rate: f64,
}

impl ProjectionInputs {
    pub fn year_inputs(&self, salary: f64) -> YearInputs {
        YearInputs {
            salary,
            filing_status: self.filing_status,
            employee_deferral_rate: self.employee_deferral_rate,
            employer_match_rate_per_dollar: self.employer_match_rate_per_dollar,
            employer_match_ceiling_rate: self.employer_match_ceiling_rate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionRow {
    pub year_index: u32,
    #[serde(flatten)]
    pub year: YearResult,
    pub total_contribution: f64,
    pub cumulative_employee_deferral: f64,
    pub cumulative_employer_match: f64,
    pub cumulative_total: f64,
    pub balance: f64,
    pub discounted_contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub rows: Vec<ProjectionRow>,
    pub future_value: f64,
    pub present_value: f64,
    pub cumulative_employee_deferral: f64,
    pub cumulative_employer_match: f64,
}
