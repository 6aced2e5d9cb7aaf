use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Raw spreadsheet cell as it arrived from the upload, before any coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Number(value) => Cow::Owned(value.to_string()),
            CellValue::Text(value) => Cow::Borrowed(value.as_str()),
        }
    }

    pub(crate) fn is_blank(&self) -> bool {
        match self {
            CellValue::Number(value) => value.is_nan(),
            CellValue::Text(value) => value.trim().is_empty(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Columns the engine understands. Labels double as the canonical sheet headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractField {
    Insurer,
    ProductName,
    PaymentTerm,
    Premium,
    ShareRatio,
    PaymentMethod,
    ProductGroup,
    ContractStatus,
    CollectorName,
    ContractDate,
}

impl ContractField {
    pub const fn ordered() -> [Self; 10] {
        [
            Self::Insurer,
            Self::ProductName,
            Self::PaymentTerm,
            Self::Premium,
            Self::ShareRatio,
            Self::PaymentMethod,
            Self::ProductGroup,
            Self::ContractStatus,
            Self::CollectorName,
            Self::ContractDate,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Insurer => "보험사",
            Self::ProductName => "상품명",
            Self::PaymentTerm => "납입기간",
            Self::Premium => "보험료",
            Self::ShareRatio => "지분율",
            Self::PaymentMethod => "납입방법",
            Self::ProductGroup => "상품군",
            Self::ContractStatus => "계약상태",
            Self::CollectorName => "수금자",
            Self::ContractDate => "계약일",
        }
    }
}

/// One uploaded contract row. Every field is optional here; the engine decides
/// which ones the active policy requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default)]
    pub insurer: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub payment_term: Option<CellValue>,
    #[serde(default)]
    pub premium: Option<CellValue>,
    #[serde(default)]
    pub share_ratio: Option<CellValue>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub product_group: Option<String>,
    #[serde(default)]
    pub contract_status: Option<String>,
    #[serde(default)]
    pub collector_name: Option<String>,
    #[serde(default)]
    pub contract_date: Option<CellValue>,
}

impl Contract {
    pub fn new(
        insurer: impl Into<String>,
        payment_term: impl Into<CellValue>,
        premium: impl Into<CellValue>,
    ) -> Self {
        Self {
            insurer: Some(insurer.into()),
            payment_term: Some(payment_term.into()),
            premium: Some(premium.into()),
            ..Self::default()
        }
    }

    pub fn with_product_name(mut self, value: impl Into<String>) -> Self {
        self.product_name = Some(value.into());
        self
    }

    pub fn with_share_ratio(mut self, value: impl Into<CellValue>) -> Self {
        self.share_ratio = Some(value.into());
        self
    }

    pub fn with_payment_method(mut self, value: impl Into<String>) -> Self {
        self.payment_method = Some(value.into());
        self
    }

    pub fn with_product_group(mut self, value: impl Into<String>) -> Self {
        self.product_group = Some(value.into());
        self
    }

    pub fn with_contract_status(mut self, value: impl Into<String>) -> Self {
        self.contract_status = Some(value.into());
        self
    }

    pub fn with_collector(mut self, value: impl Into<String>) -> Self {
        self.collector_name = Some(value.into());
        self
    }

    pub fn with_contract_date(mut self, value: impl Into<CellValue>) -> Self {
        self.contract_date = Some(value.into());
        self
    }

    /// Assigns a text cell read from a sheet to the matching field.
    pub fn set_field(&mut self, field: ContractField, value: Option<String>) {
        match field {
            ContractField::Insurer => self.insurer = value,
            ContractField::ProductName => self.product_name = value,
            ContractField::PaymentTerm => self.payment_term = value.map(CellValue::Text),
            ContractField::Premium => self.premium = value.map(CellValue::Text),
            ContractField::ShareRatio => self.share_ratio = value.map(CellValue::Text),
            ContractField::PaymentMethod => self.payment_method = value,
            ContractField::ProductGroup => self.product_group = value,
            ContractField::ContractStatus => self.contract_status = value,
            ContractField::CollectorName => self.collector_name = value,
            ContractField::ContractDate => self.contract_date = value.map(CellValue::Text),
        }
    }

    /// True when the field holds a non-blank value.
    pub fn has_field(&self, field: ContractField) -> bool {
        fn text(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }
        fn cell(value: &Option<CellValue>) -> bool {
            value.as_ref().is_some_and(|v| !v.is_blank())
        }

        match field {
            ContractField::Insurer => text(&self.insurer),
            ContractField::ProductName => text(&self.product_name),
            ContractField::PaymentTerm => cell(&self.payment_term),
            ContractField::Premium => cell(&self.premium),
            ContractField::ShareRatio => cell(&self.share_ratio),
            ContractField::PaymentMethod => text(&self.payment_method),
            ContractField::ProductGroup => text(&self.product_group),
            ContractField::ContractStatus => text(&self.contract_status),
            ContractField::CollectorName => text(&self.collector_name),
            ContractField::ContractDate => cell(&self.contract_date),
        }
    }
}

/// Contract after validation and coercion; all numbers are usable as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedContract {
    /// 1-based position in the uploaded sequence.
    pub row: usize,
    pub insurer: String,
    pub product_name: Option<String>,
    pub payment_term_years: u32,
    pub premium: f64,
    /// Percentage, 0-100.
    pub share_ratio: f64,
    pub payment_method: String,
    pub product_group: String,
    pub contract_status: String,
    pub collector_name: Option<String>,
    pub contract_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsuranceLine {
    Life,
    NonLife,
}

impl InsuranceLine {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Life => "생명보험",
            Self::NonLife => "손해보험",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "생명보험" => Some(Self::Life),
            "손해보험" => Some(Self::NonLife),
            _ => None,
        }
    }

    pub const fn other_bucket_label(self) -> &'static str {
        match self {
            Self::Life => "기타생보",
            Self::NonLife => "기타손보",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagshipTier {
    Life,
    NonLife250,
    NonLife200,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsurerCategory {
    /// Carrier named in a fixed list; keeps its own name as the category.
    Flagship {
        insurer: String,
        line: InsuranceLine,
        tier: FlagshipTier,
    },
    /// Generic bucket for carriers outside the fixed lists.
    Other { line: InsuranceLine },
    /// Two-tier split with no flagship treatment.
    Line { line: InsuranceLine },
}

impl InsurerCategory {
    pub fn line(&self) -> InsuranceLine {
        match self {
            Self::Flagship { line, .. } | Self::Other { line } | Self::Line { line } => *line,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Flagship { insurer, .. } => insurer.clone(),
            Self::Other { line } => line.other_bucket_label().to_string(),
            Self::Line { line } => line.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateDimension {
    Convention,
    Summer,
    Manager,
}

impl RateDimension {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Convention => "컨벤션",
            Self::Summer => "썸머",
            Self::Manager => "매니저점수",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AppliedRate {
    pub dimension: RateDimension,
    /// Integer percentage.
    pub rate: u32,
    pub converted_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredContract {
    pub contract: NormalizedContract,
    pub category: InsurerCategory,
    pub performance_premium: f64,
    pub rates: Vec<AppliedRate>,
}

impl ScoredContract {
    pub fn rate(&self, dimension: RateDimension) -> Option<&AppliedRate> {
        self.rates.iter().find(|rate| rate.dimension == dimension)
    }

    pub fn converted_amount(&self, dimension: RateDimension) -> f64 {
        self.rate(dimension)
            .map(|rate| rate.converted_amount)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    LumpSum,
    PensionOrSavings,
    Terminated,
}

impl ExclusionReason {
    pub const fn ordered() -> [Self; 3] {
        [Self::LumpSum, Self::PensionOrSavings, Self::Terminated]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LumpSum => "일시납",
            Self::PensionOrSavings => "연금·저축성",
            Self::Terminated => "철회·취소·실효",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExclusionRecord {
    pub contract: NormalizedContract,
    pub reasons: Vec<ExclusionReason>,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DimensionTotal {
    pub dimension: RateDimension,
    pub amount: f64,
}

pub const TOTAL_GROUP_LABEL: &str = "전체";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// `None` for the synthetic total group.
    pub collector: Option<String>,
    pub contract_count: usize,
    pub performance_premium_sum: f64,
    pub converted_sums: Vec<DimensionTotal>,
    pub amount_rank: Option<u32>,
    pub count_rank: Option<u32>,
}

impl GroupSummary {
    pub(crate) fn empty(collector: Option<String>, dimensions: &[RateDimension]) -> Self {
        Self {
            collector,
            contract_count: 0,
            performance_premium_sum: 0.0,
            converted_sums: dimensions
                .iter()
                .map(|dimension| DimensionTotal {
                    dimension: *dimension,
                    amount: 0.0,
                })
                .collect(),
            amount_rank: None,
            count_rank: None,
        }
    }

    pub fn label(&self) -> &str {
        self.collector.as_deref().unwrap_or(TOTAL_GROUP_LABEL)
    }

    pub fn converted_sum(&self, dimension: RateDimension) -> f64 {
        self.converted_sums
            .iter()
            .find(|total| total.dimension == dimension)
            .map(|total| total.amount)
            .unwrap_or(0.0)
    }

    /// Sum of the first rate dimension of the policy, used for ranking.
    pub fn primary_sum(&self) -> f64 {
        self.converted_sums
            .first()
            .map(|total| total.amount)
            .unwrap_or(0.0)
    }
}

/// Non-fatal irregularity collected alongside a complete result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PerformanceWarning {
    DefaultedPaymentTerm { row: usize, raw: Option<String> },
    UnparseableDate { row: usize, raw: String },
    RateTableGap { row: usize, key: String },
}

impl PerformanceWarning {
    pub fn row(&self) -> usize {
        match self {
            Self::DefaultedPaymentTerm { row, .. }
            | Self::UnparseableDate { row, .. }
            | Self::RateTableGap { row, .. } => *row,
        }
    }

    pub fn summary(&self) -> String {
        match self {
            Self::DefaultedPaymentTerm { row, raw: Some(raw) } => {
                format!("row {row}: payment term '{raw}' is not numeric, treated as 0 years")
            }
            Self::DefaultedPaymentTerm { row, raw: None } => {
                format!("row {row}: payment term missing, treated as 0 years")
            }
            Self::UnparseableDate { row, raw } => {
                format!("row {row}: contract date '{raw}' could not be parsed")
            }
            Self::RateTableGap { row, key } => {
                format!("row {row}: no rate table entry for {key}, rates set to 0")
            }
        }
    }
}
