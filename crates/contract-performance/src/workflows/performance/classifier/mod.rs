//! Rate classification across the commission policy versions.
//!
//! Each version is an independent [`RatePolicy`] implementation. They share the
//! ordered category rule machinery in [`rules`] but never each other's lists, so
//! a change to one version's carrier list cannot leak into another.

mod inline;
mod lookup;
mod manager;
mod rate_table;
pub(crate) mod rules;

pub use inline::InlineRulePolicy;
pub use lookup::LookupTablePolicy;
pub use manager::ManagerScorePolicy;
pub use rate_table::{RateKey, RatePair, RateTable, RateTableError};

use super::domain::{ContractField, InsurerCategory, RateDimension};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment terms at or above this many years are "long-term" in every version.
pub const LONG_TERM_YEARS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermBucket {
    UnderTen,
    TenOrMore,
}

impl TermBucket {
    pub const fn from_years(years: u32) -> Self {
        if years >= LONG_TERM_YEARS {
            Self::TenOrMore
        } else {
            Self::UnderTen
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderTen => "10년 미만",
            Self::TenOrMore => "10년 이상",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "10년 미만" => Some(Self::UnderTen),
            "10년 이상" => Some(Self::TenOrMore),
            _ => None,
        }
    }

    /// Picks the short-term or long-term value of a pair.
    pub(crate) const fn pick(self, short: u32, long: u32) -> u32 {
        match self {
            Self::UnderTen => short,
            Self::TenOrMore => long,
        }
    }
}

/// Named policy versions, selected by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyVersion {
    /// Convention/summer rates looked up in an external rate table.
    LookupTable,
    /// Convention/summer rates hard-coded per category.
    InlineRule,
    /// Inline rules plus summer-rate zeroing for savings/pension/lump-sum products.
    InlineRuleScreened,
    /// Two-tier life/non-life manager score with exclusions and collector grouping.
    ManagerScore,
}

const CONVENTION_AND_SUMMER: &[RateDimension] = &[RateDimension::Convention, RateDimension::Summer];
const MANAGER_ONLY: &[RateDimension] = &[RateDimension::Manager];

const BASE_FIELDS: &[ContractField] = &[
    ContractField::Insurer,
    ContractField::PaymentTerm,
    ContractField::Premium,
];

const MANAGER_FIELDS: &[ContractField] = &[
    ContractField::Insurer,
    ContractField::PaymentTerm,
    ContractField::Premium,
    ContractField::CollectorName,
    ContractField::ShareRatio,
    ContractField::PaymentMethod,
    ContractField::ProductGroup,
    ContractField::ContractStatus,
];

impl PolicyVersion {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::LookupTable,
            Self::InlineRule,
            Self::InlineRuleScreened,
            Self::ManagerScore,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::LookupTable => "lookup-table",
            Self::InlineRule => "inline-rule",
            Self::InlineRuleScreened => "inline-rule-screened",
            Self::ManagerScore => "manager-score",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LookupTable => "컨벤션·썸머 (환산표)",
            Self::InlineRule => "컨벤션·썸머 (고정 환산율)",
            Self::InlineRuleScreened => "컨벤션·썸머 (저축성 썸머 제외)",
            Self::ManagerScore => "매니저 점수",
        }
    }

    /// Rate dimensions in output order; the first one drives ranking.
    pub const fn dimensions(self) -> &'static [RateDimension] {
        match self {
            Self::LookupTable | Self::InlineRule | Self::InlineRuleScreened => {
                CONVENTION_AND_SUMMER
            }
            Self::ManagerScore => MANAGER_ONLY,
        }
    }

    pub const fn required_fields(self) -> &'static [ContractField] {
        match self {
            Self::LookupTable | Self::InlineRule | Self::InlineRuleScreened => BASE_FIELDS,
            Self::ManagerScore => MANAGER_FIELDS,
        }
    }

    pub const fn requires_share_ratio(self) -> bool {
        matches!(self, Self::ManagerScore)
    }

    pub const fn applies_exclusions(self) -> bool {
        matches!(self, Self::ManagerScore)
    }

    pub const fn groups_by_collector(self) -> bool {
        matches!(self, Self::ManagerScore)
    }
}

impl fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PolicyVersion {
    type Err = PolicySelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "lookup-table" | "v1" => Ok(Self::LookupTable),
            "inline-rule" | "v2" => Ok(Self::InlineRule),
            "inline-rule-screened" | "v2-screened" => Ok(Self::InlineRuleScreened),
            "manager-score" | "v3" => Ok(Self::ManagerScore),
            _ => Err(PolicySelectionError::UnknownPolicy(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicySelectionError {
    #[error("unknown scoring policy '{0}' (expected lookup-table, inline-rule, inline-rule-screened or manager-score)")]
    UnknownPolicy(String),
    #[error("the lookup-table policy needs a rate table")]
    MissingRateTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionRate {
    pub dimension: RateDimension,
    pub rate: u32,
}

/// Category plus the rates one contract earns under a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: InsurerCategory,
    pub rates: Vec<DimensionRate>,
    /// Set when the rates are zero because the rate table had no row.
    pub table_gap: Option<RateKey>,
}

impl Classification {
    pub(crate) fn dual(category: InsurerCategory, convention: u32, summer: u32) -> Self {
        Self {
            category,
            rates: vec![
                DimensionRate {
                    dimension: RateDimension::Convention,
                    rate: convention,
                },
                DimensionRate {
                    dimension: RateDimension::Summer,
                    rate: summer,
                },
            ],
            table_gap: None,
        }
    }

    pub fn rate(&self, dimension: RateDimension) -> Option<u32> {
        self.rates
            .iter()
            .find(|entry| entry.dimension == dimension)
            .map(|entry| entry.rate)
    }
}

/// A commission policy version: maps contract attributes to rates.
pub trait RatePolicy: Send + Sync {
    fn version(&self) -> PolicyVersion;

    fn categorize(&self, insurer: &str) -> InsurerCategory;

    fn classify(
        &self,
        insurer: &str,
        payment_term_years: u32,
        product_name: Option<&str>,
    ) -> Classification;
}

/// Builds the policy implementation for a configured version.
pub fn policy_for(
    version: PolicyVersion,
    rate_table: Option<RateTable>,
) -> Result<Box<dyn RatePolicy>, PolicySelectionError> {
    match version {
        PolicyVersion::LookupTable => {
            let table = rate_table.ok_or(PolicySelectionError::MissingRateTable)?;
            Ok(Box::new(LookupTablePolicy::new(table)))
        }
        PolicyVersion::InlineRule => Ok(Box::new(InlineRulePolicy::new())),
        PolicyVersion::InlineRuleScreened => Ok(Box::new(InlineRulePolicy::screened())),
        PolicyVersion::ManagerScore => Ok(Box::new(ManagerScorePolicy)),
    }
}
