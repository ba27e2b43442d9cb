use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::brackets::BracketTable;
use super::error::ConfigError;
use super::reference::*;
use super::types::{FilingStatus, PerStatus};

/// Income-tax schedule of one taxing authority.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSchedule {
    pub brackets: PerStatus<BracketTable>,
    pub standard_deduction: PerStatus<f64>,
}

impl TaxSchedule {
    pub fn brackets_for(&self, status: FilingStatus) -> &BracketTable {
        self.brackets.get(status)
    }

    pub fn standard_deduction_for(&self, status: FilingStatus) -> f64 {
        *self.standard_deduction.get(status)
    }
}

/// Everything a calculation needs besides the saver's own inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanConfiguration {
    pub federal: TaxSchedule,
    pub regional: TaxSchedule,
    pub payroll_wage_base: f64,
    pub payroll_base_rate: f64,
    pub payroll_surtax_rate: f64,
    pub payroll_surtax_threshold: PerStatus<f64>,
    pub disability_insurance_rate: f64,
    pub elective_deferral_limit: f64,
    pub catch_up_allowance: f64,
}

impl Default for PlanConfiguration {
    fn default() -> Self {
        Self::reference()
    }
}

impl PlanConfiguration {
    /// Reference-year figures with no catch-up allowance.
    pub fn reference() -> Self {
        Self {
            federal: TaxSchedule {
                brackets: PerStatus {
                    single: BracketTable::from_static(FEDERAL_2025_SINGLE),
                    married_filing_jointly: BracketTable::from_static(
                        FEDERAL_2025_MARRIED_FILING_JOINTLY,
                    ),
                },
                standard_deduction: PerStatus {
                    single: FEDERAL_STANDARD_DEDUCTION_SINGLE,
                    married_filing_jointly: FEDERAL_STANDARD_DEDUCTION_MARRIED_FILING_JOINTLY,
                },
            },
            regional: TaxSchedule {
                brackets: PerStatus {
                    single: BracketTable::from_static(REGIONAL_2024_SINGLE),
                    married_filing_jointly: BracketTable::from_static(
                        REGIONAL_2024_MARRIED_FILING_JOINTLY,
                    ),
                },
                standard_deduction: PerStatus {
                    single: REGIONAL_STANDARD_DEDUCTION_SINGLE,
                    married_filing_jointly: REGIONAL_STANDARD_DEDUCTION_MARRIED_FILING_JOINTLY,
                },
            },
            payroll_wage_base: PAYROLL_WAGE_BASE_2025,
            payroll_base_rate: PAYROLL_BASE_RATE,
            payroll_surtax_rate: PAYROLL_SURTAX_RATE,
            payroll_surtax_threshold: PerStatus {
                single: PAYROLL_SURTAX_THRESHOLD_SINGLE,
                married_filing_jointly: PAYROLL_SURTAX_THRESHOLD_MARRIED_FILING_JOINTLY,
            },
            disability_insurance_rate: DISABILITY_INSURANCE_RATE_2024,
            elective_deferral_limit: ELECTIVE_DEFERRAL_LIMIT_2025,
            catch_up_allowance: 0.0,
        }
    }

    pub fn with_catch_up_allowance(mut self, allowance: f64) -> Self {
        self.catch_up_allowance = allowance;
        self
    }

    pub fn deferral_cap(&self) -> f64 {
        self.elective_deferral_limit + self.catch_up_allowance
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlanConfiguration = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        log::info!("loading plan configuration from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for schedule in [&self.federal, &self.regional] {
            schedule.brackets.single.validate()?;
            schedule.brackets.married_filing_jointly.validate()?;
        }

        for (field, value) in [
            ("federal.standardDeduction.single", self.federal.standard_deduction.single),
            (
                "federal.standardDeduction.marriedFilingJointly",
                self.federal.standard_deduction.married_filing_jointly,
            ),
            ("regional.standardDeduction.single", self.regional.standard_deduction.single),
            (
                "regional.standardDeduction.marriedFilingJointly",
                self.regional.standard_deduction.married_filing_jointly,
            ),
            ("payrollWageBase", self.payroll_wage_base),
            ("payrollSurtaxThreshold.single", self.payroll_surtax_threshold.single),
            (
                "payrollSurtaxThreshold.marriedFilingJointly",
                self.payroll_surtax_threshold.married_filing_jointly,
            ),
            ("electiveDeferralLimit", self.elective_deferral_limit),
            ("catchUpAllowance", self.catch_up_allowance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidAmount {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for (field, value) in [
            ("payrollBaseRate", self.payroll_base_rate),
            ("payrollSurtaxRate", self.payroll_surtax_rate),
            ("disabilityInsuranceRate", self.disability_insurance_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidRate {
                    field: field.to_string(),
                    value,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_configuration_validates() {
        PlanConfiguration::reference()
            .validate()
            .expect("reference configuration must validate");
    }

    #[test]
    fn reference_configuration_has_no_catch_up_by_default() {
        let config = PlanConfiguration::default();
        assert_eq!(config.catch_up_allowance, 0.0);
        assert_eq!(config.deferral_cap(), ELECTIVE_DEFERRAL_LIMIT_2025);

        let config = config.with_catch_up_allowance(CATCH_UP_ALLOWANCE_2025);
        assert_eq!(config.deferral_cap(), 31_000.0);
    }

    #[test]
    fn json_round_trip_preserves_configuration() {
        let config = PlanConfiguration::reference();
        let json = serde_json::to_string(&config).expect("config should serialize");
        assert!(json.contains("\"payrollWageBase\""));
        assert!(json.contains("\"marriedFilingJointly\""));
        assert!(json.contains("\"upperBound\":null"));

        let parsed = PlanConfiguration::from_json_str(&json).expect("config should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn from_json_str_rejects_malformed_brackets() {
        let mut value = serde_json::to_value(PlanConfiguration::reference()).expect("serialize");
        value["federal"]["brackets"]["single"] = serde_json::json!([
            { "upperBound": 10000, "rate": 0.1 },
            { "upperBound": 20000, "rate": 0.2 }
        ]);
        let err = PlanConfiguration::from_json_str(&value.to_string()).expect_err("must reject");
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("last tier must be unbounded"));
    }

    #[test]
    fn validate_rejects_out_of_range_rate() {
        let mut config = PlanConfiguration::reference();
        config.payroll_base_rate = 6.2;
        let err = config.validate().expect_err("must reject");
        assert!(matches!(
            err,
            ConfigError::InvalidRate { ref field, .. } if field == "payrollBaseRate"
        ));
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let mut config = PlanConfiguration::reference();
        config.regional.standard_deduction.single = -1.0;
        let err = config.validate().expect_err("must reject");
        assert!(err.to_string().contains("regional.standardDeduction.single"));
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = PlanConfiguration::from_path("/nonexistent/plan.json").expect_err("must fail");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
