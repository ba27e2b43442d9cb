//! Published reference-year figures used when no plan configuration is
//! supplied: 2025 federal income tax, 2024 regional (California) income tax,
//! 2025 payroll tax and elective-deferral limits.

use super::brackets::RateBracket;

pub const FEDERAL_2025_SINGLE: &[RateBracket] = &[
    RateBracket::capped(11_925.0, 0.10),
    RateBracket::capped(48_475.0, 0.12),
    RateBracket::capped(103_350.0, 0.22),
    RateBracket::capped(197_300.0, 0.24),
    RateBracket::capped(250_525.0, 0.32),
    RateBracket::capped(626_350.0, 0.35),
    RateBracket::open(0.37),
];

pub const FEDERAL_2025_MARRIED_FILING_JOINTLY: &[RateBracket] = &[
    RateBracket::capped(23_850.0, 0.10),
    RateBracket::capped(96_950.0, 0.12),
    RateBracket::capped(206_700.0, 0.22),
    RateBracket::capped(394_600.0, 0.24),
    RateBracket::capped(501_050.0, 0.32),
    RateBracket::capped(751_600.0, 0.35),
    RateBracket::open(0.37),
];

pub const REGIONAL_2024_SINGLE: &[RateBracket] = &[
    RateBracket::capped(10_756.0, 0.01),
    RateBracket::capped(25_499.0, 0.02),
    RateBracket::capped(40_245.0, 0.04),
    RateBracket::capped(55_866.0, 0.06),
    RateBracket::capped(70_606.0, 0.08),
    RateBracket::capped(360_659.0, 0.093),
    RateBracket::capped(432_787.0, 0.103),
    RateBracket::capped(721_314.0, 0.113),
    RateBracket::open(0.123),
];

pub const REGIONAL_2024_MARRIED_FILING_JOINTLY: &[RateBracket] = &[
    RateBracket::capped(21_512.0, 0.01),
    RateBracket::capped(50_998.0, 0.02),
    RateBracket::capped(80_490.0, 0.04),
    RateBracket::capped(111_732.0, 0.06),
    RateBracket::capped(141_212.0, 0.08),
    RateBracket::capped(721_318.0, 0.093),
    RateBracket::capped(865_574.0, 0.103),
    RateBracket::capped(1_442_628.0, 0.113),
    RateBracket::open(0.123),
];

pub const FEDERAL_STANDARD_DEDUCTION_SINGLE: f64 = 15_000.0;
pub const FEDERAL_STANDARD_DEDUCTION_MARRIED_FILING_JOINTLY: f64 = 30_000.0;
pub const REGIONAL_STANDARD_DEDUCTION_SINGLE: f64 = 5_540.0;
pub const REGIONAL_STANDARD_DEDUCTION_MARRIED_FILING_JOINTLY: f64 = 11_080.0;

pub const PAYROLL_WAGE_BASE_2025: f64 = 176_100.0;
pub const PAYROLL_BASE_RATE: f64 = 0.062;
pub const PAYROLL_SURTAX_RATE: f64 = 0.009;
pub const PAYROLL_SURTAX_THRESHOLD_SINGLE: f64 = 200_000.0;
pub const PAYROLL_SURTAX_THRESHOLD_MARRIED_FILING_JOINTLY: f64 = 250_000.0;

pub const DISABILITY_INSURANCE_RATE_2024: f64 = 0.011;

pub const ELECTIVE_DEFERRAL_LIMIT_2025: f64 = 23_500.0;
/// Additional deferral room for savers aged 50 and over.
pub const CATCH_UP_ALLOWANCE_2025: f64 = 7_500.0;
