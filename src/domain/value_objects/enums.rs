//! # Domain Enums
//!
//! Enumeration types for pricing concepts.
//!
//! - [`MultiplierTierKind`] - Which policy tier supplied a markup factor
//! - [`RateSource`] - Provenance of a duty or tax percent
//! - [`LevyKind`] - Import duty, VAT-style tax, or nothing
//! - [`DutyMode`] - Whether duty is collected with the shipping price
//! - [`PremiumSource`] - How an insurance premium was derived

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The policy tier a resolved multiplier came from.
///
/// Variants are ordered by precedence: the most specific tier first.
///
/// # Examples
///
/// ```
/// use landed_cost::domain::value_objects::enums::MultiplierTierKind;
///
/// assert!(MultiplierTierKind::User.precedence() < MultiplierTierKind::GlobalDefault.precedence());
/// assert_eq!(MultiplierTierKind::WeightRange.to_string(), "WEIGHT_RANGE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum MultiplierTierKind {
    /// Per-user override.
    User = 0,
    /// Per-destination-country override.
    Country = 1,
    /// Billable-weight band override.
    WeightRange = 2,
    /// Terminal fallback.
    GlobalDefault = 3,
}

impl MultiplierTierKind {
    /// Returns the precedence of this tier (lower wins).
    #[inline]
    #[must_use]
    pub const fn precedence(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for MultiplierTierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Country => write!(f, "COUNTRY"),
            Self::WeightRange => write!(f, "WEIGHT_RANGE"),
            Self::GlobalDefault => write!(f, "GLOBAL_DEFAULT"),
        }
    }
}

/// Where a duty or tax percent came from.
///
/// Callers use this to disclose "estimated" pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum RateSource {
    /// Authoritative official tariff table.
    Official = 0,
    /// Secondary estimation provider.
    Estimated = 1,
    /// Destination-level default percent.
    Default = 2,
}

impl RateSource {
    /// Returns true unless the rate came from the official table.
    #[inline]
    #[must_use]
    pub const fn is_estimate(self) -> bool {
        !matches!(self, Self::Official)
    }
}

impl fmt::Display for RateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Official => write!(f, "OFFICIAL"),
            Self::Estimated => write!(f, "ESTIMATED"),
            Self::Default => write!(f, "DEFAULT"),
        }
    }
}

/// The kind of levy a destination charges on imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LevyKind {
    /// Classification-specific duty plus the standing surcharge.
    ImportDuty,
    /// A single VAT-style tax percent.
    Vat,
    /// Destination is not subject to import levies.
    NotApplicable,
}

impl fmt::Display for LevyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImportDuty => write!(f, "IMPORT_DUTY"),
            Self::Vat => write!(f, "VAT"),
            Self::NotApplicable => write!(f, "NOT_APPLICABLE"),
        }
    }
}

impl FromStr for LevyKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "IMPORT_DUTY" | "DUTY" => Ok(Self::ImportDuty),
            "VAT" | "TAX" => Ok(Self::Vat),
            "NOT_APPLICABLE" | "NONE" => Ok(Self::NotApplicable),
            _ => Err(ParseEnumError::InvalidValue("LevyKind", s.to_string())),
        }
    }
}

/// Who pays duty and when.
///
/// # Examples
///
/// ```
/// use landed_cost::domain::value_objects::enums::DutyMode;
///
/// let mode: DutyMode = "ddp".parse().unwrap();
/// assert!(mode.is_duty_paid());
/// assert_eq!(DutyMode::default(), DutyMode::DeliveredDutyUnpaid);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyMode {
    /// Duty is reported alongside and collected separately on delivery.
    #[default]
    DeliveredDutyUnpaid,
    /// Duty and a handling fee are folded into the presented total.
    DeliveredDutyPaid,
}

impl DutyMode {
    /// Returns true for delivered-duty-paid.
    #[inline]
    #[must_use]
    pub const fn is_duty_paid(self) -> bool {
        matches!(self, Self::DeliveredDutyPaid)
    }
}

impl fmt::Display for DutyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeliveredDutyUnpaid => write!(f, "DDU"),
            Self::DeliveredDutyPaid => write!(f, "DDP"),
        }
    }
}

impl FromStr for DutyMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "DDU" | "DAP" | "DELIVERED_DUTY_UNPAID" => Ok(Self::DeliveredDutyUnpaid),
            "DDP" | "DELIVERED_DUTY_PAID" => Ok(Self::DeliveredDutyPaid),
            _ => Err(ParseEnumError::InvalidValue("DutyMode", s.to_string())),
        }
    }
}

/// How an insurance premium was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PremiumSource {
    /// A configured range contained the declared value.
    Range,
    /// No range matched; the percentage formula with its floor applied.
    Formula,
    /// The customer did not opt in.
    NotRequested,
}

impl fmt::Display for PremiumSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range => write!(f, "RANGE"),
            Self::Formula => write!(f, "FORMULA"),
            Self::NotRequested => write!(f, "NOT_REQUESTED"),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
