use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// One marginal-rate tier. `upper_bound: None` is the open "and above" tier.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateBracket {
    pub upper_bound: Option<f64>,
    pub rate: f64,
}

impl RateBracket {
    pub const fn capped(upper_bound: f64, rate: f64) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub const fn open(rate: f64) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }

    fn upper_or_infinity(&self) -> f64 {
        self.upper_bound.unwrap_or(f64::INFINITY)
    }
}

/// Ordered, contiguous tiers ending in an unbounded tier.
///
/// Tables built through [`BracketTable::new`] or deserialized from JSON are
/// validated; the reference tables are compile-time constants checked by the
/// unit tests below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RateBracket>", into = "Vec<RateBracket>")]
pub struct BracketTable {
    brackets: Cow<'static, [RateBracket]>,
}

impl BracketTable {
    pub fn new(brackets: Vec<RateBracket>) -> Result<Self, ConfigError> {
        validate_brackets(&brackets)?;
        Ok(Self {
            brackets: Cow::Owned(brackets),
        })
    }

    pub(crate) const fn from_static(brackets: &'static [RateBracket]) -> Self {
        Self {
            brackets: Cow::Borrowed(brackets),
        }
    }

    pub fn brackets(&self) -> &[RateBracket] {
        &self.brackets
    }

    pub fn tax(&self, taxable_income: f64) -> f64 {
        progressive_tax(taxable_income, &self.brackets)
    }

    /// Rate of the tier holding `taxable_income`; the first tier's rate at or
    /// below zero.
    pub fn marginal_rate(&self, taxable_income: f64) -> f64 {
        self.brackets
            .iter()
            .find(|bracket| taxable_income <= bracket.upper_or_infinity())
            .or_else(|| self.brackets.last())
            .map_or(0.0, |bracket| bracket.rate)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_brackets(&self.brackets)
    }
}

impl TryFrom<Vec<RateBracket>> for BracketTable {
    type Error = ConfigError;

    fn try_from(value: Vec<RateBracket>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BracketTable> for Vec<RateBracket> {
    fn from(value: BracketTable) -> Self {
        value.brackets.into_owned()
    }
}

/// Marginal-rate tax on `taxable_income`. Non-positive income owes nothing.
pub fn progressive_tax(taxable_income: f64, brackets: &[RateBracket]) -> f64 {
    if taxable_income <= 0.0 {
        return 0.0;
    }

    let mut tax = 0.0;
    let mut lower_bound = 0.0;
    for bracket in brackets {
        let upper_bound = bracket.upper_or_infinity();
        let taxed = taxable_income.min(upper_bound) - lower_bound;
        if taxed > 0.0 {
            tax += taxed * bracket.rate;
        }
        if taxable_income <= upper_bound {
            break;
        }
        lower_bound = upper_bound;
    }
    tax
}

fn validate_brackets(brackets: &[RateBracket]) -> Result<(), ConfigError> {
    let Some(last) = brackets.last() else {
        return Err(ConfigError::EmptyBracketTable);
    };
    if last.upper_bound.is_some() {
        return Err(ConfigError::MissingUnboundedTier);
    }

    let mut previous = 0.0;
    for (index, bracket) in brackets.iter().enumerate() {
        if !(0.0..=1.0).contains(&bracket.rate) {
            return Err(ConfigError::InvalidRate {
                field: format!("tier {index} rate"),
                value: bracket.rate,
            });
        }
        match bracket.upper_bound {
            None if index + 1 != brackets.len() => {
                return Err(ConfigError::UnboundedTierNotLast { index });
            }
            None => {}
            Some(bound) if !bound.is_finite() || bound <= 0.0 => {
                return Err(ConfigError::InvalidBound { index, bound });
            }
            Some(bound) if bound <= previous => {
                return Err(ConfigError::NonAscendingBound {
                    index,
                    bound,
                    previous,
                });
            }
            Some(bound) => previous = bound,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::{
        FEDERAL_2025_MARRIED_FILING_JOINTLY, FEDERAL_2025_SINGLE,
        REGIONAL_2024_MARRIED_FILING_JOINTLY, REGIONAL_2024_SINGLE,
    };
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn simple_table() -> BracketTable {
        BracketTable::new(vec![
            RateBracket::capped(10_000.0, 0.10),
            RateBracket::capped(40_000.0, 0.20),
            RateBracket::open(0.30),
        ])
        .expect("valid table")
    }

    #[test]
    fn non_positive_income_owes_nothing() {
        let table = simple_table();
        assert_eq!(table.tax(0.0), 0.0);
        assert_eq!(table.tax(-25_000.0), 0.0);
    }

    #[test]
    fn tax_applies_each_rate_only_within_its_tier() {
        let table = simple_table();
        assert_approx(table.tax(5_000.0), 500.0);
        assert_approx(table.tax(25_000.0), 1_000.0 + 3_000.0);
        assert_approx(table.tax(100_000.0), 1_000.0 + 6_000.0 + 18_000.0);
    }

    #[test]
    fn tax_at_tier_edge_equals_lower_tiers_taxed_in_full() {
        let table = simple_table();
        assert_approx(table.tax(10_000.0), 1_000.0);
        assert_approx(table.tax(40_000.0), 1_000.0 + 6_000.0);
    }

    #[test]
    fn tax_is_continuous_across_tier_edges() {
        let table = simple_table();
        for edge in [10_000.0, 40_000.0] {
            let below = table.tax(edge - 0.01);
            let above = table.tax(edge + 0.01);
            assert!((above - below).abs() < 0.01, "jump at {edge}");
        }
    }

    #[test]
    fn federal_married_table_matches_published_schedule() {
        let table = BracketTable::from_static(FEDERAL_2025_MARRIED_FILING_JOINTLY);
        // 10% of 23,850 + 12% of 40,150
        assert_approx(table.tax(64_000.0), 7_203.0);
    }

    #[test]
    fn regional_married_table_matches_published_schedule() {
        let table = BracketTable::from_static(REGIONAL_2024_MARRIED_FILING_JOINTLY);
        // 215.12 + 589.72 + 1,179.68 + 145.80
        assert_approx(table.tax(82_920.0), 2_130.32);
    }

    #[test]
    fn marginal_rate_reports_tier_holding_income() {
        let table = simple_table();
        assert_approx(table.marginal_rate(0.0), 0.10);
        assert_approx(table.marginal_rate(10_000.0), 0.10);
        assert_approx(table.marginal_rate(10_000.01), 0.20);
        assert_approx(table.marginal_rate(1e9), 0.30);
    }

    #[test]
    fn reference_tables_are_well_formed() {
        for table in [
            FEDERAL_2025_SINGLE,
            FEDERAL_2025_MARRIED_FILING_JOINTLY,
            REGIONAL_2024_SINGLE,
            REGIONAL_2024_MARRIED_FILING_JOINTLY,
        ] {
            BracketTable::from_static(table)
                .validate()
                .expect("reference table must validate");
        }
    }

    #[test]
    fn new_rejects_empty_table() {
        let err = BracketTable::new(Vec::new()).expect_err("must reject");
        assert!(matches!(err, ConfigError::EmptyBracketTable));
    }

    #[test]
    fn new_rejects_missing_unbounded_tier() {
        let err = BracketTable::new(vec![
            RateBracket::capped(10_000.0, 0.1),
            RateBracket::capped(20_000.0, 0.2),
        ])
        .expect_err("must reject");
        assert!(matches!(err, ConfigError::MissingUnboundedTier));
    }

    #[test]
    fn new_rejects_non_ascending_bounds() {
        let err = BracketTable::new(vec![
            RateBracket::capped(20_000.0, 0.1),
            RateBracket::capped(20_000.0, 0.2),
            RateBracket::open(0.3),
        ])
        .expect_err("must reject");
        assert!(matches!(
            err,
            ConfigError::NonAscendingBound { index: 1, .. }
        ));
    }

    #[test]
    fn new_rejects_unbounded_tier_before_last() {
        let err = BracketTable::new(vec![RateBracket::open(0.1), RateBracket::open(0.2)])
            .expect_err("must reject");
        assert!(matches!(err, ConfigError::UnboundedTierNotLast { index: 0 }));
    }

    #[test]
    fn new_rejects_rate_outside_unit_interval() {
        let err = BracketTable::new(vec![
            RateBracket::capped(10_000.0, 0.1),
            RateBracket::open(1.5),
        ])
        .expect_err("must reject");
        assert!(matches!(err, ConfigError::InvalidRate { .. }));
    }

    #[test]
    fn deserializing_malformed_table_fails() {
        let json = r#"[{"upperBound": 5000, "rate": 0.1}, {"upperBound": 1000, "rate": 0.2}, {"upperBound": null, "rate": 0.3}]"#;
        let err = serde_json::from_str::<BracketTable>(json).expect_err("must reject");
        assert!(err.to_string().contains("does not exceed previous bound"));
    }

    #[test]
    fn deserializing_well_formed_table_keeps_tiers() {
        let json = r#"[{"upperBound": 5000, "rate": 0.1}, {"upperBound": null, "rate": 0.2}]"#;
        let table = serde_json::from_str::<BracketTable>(json).expect("valid table");
        assert_eq!(table.brackets().len(), 2);
        assert_approx(table.tax(6_000.0), 500.0 + 200.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn prop_tax_is_monotonic_and_bounded_by_top_rate(
            income_a in -50_000.0f64..2_000_000.0,
            income_b in -50_000.0f64..2_000_000.0
        ) {
            let table = BracketTable::from_static(FEDERAL_2025_SINGLE);
            let (low, high) = if income_a <= income_b {
                (income_a, income_b)
            } else {
                (income_b, income_a)
            };
            let tax_low = table.tax(low);
            let tax_high = table.tax(high);
            prop_assert!(tax_low >= 0.0);
            prop_assert!(tax_low <= tax_high + EPS);
            prop_assert!(tax_high <= high.max(0.0) * 0.37 + EPS);
        }
    }
}
