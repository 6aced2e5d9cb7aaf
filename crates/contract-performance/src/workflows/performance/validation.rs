use super::classifier::PolicyVersion;
use super::coerce::{
    is_fractional_column, parse_amount, parse_contract_date, parse_term_years, read_share_ratio,
};
use super::domain::{CellValue, Contract, ContractField, NormalizedContract, PerformanceWarning};
use tracing::warn;

/// Share applied when a dataset carries no share-ratio column at all.
const FULL_SHARE: f64 = 100.0;

/// Dataset-level failure; nothing is scored when one is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("required column '{}' is missing", .field.label())]
    MissingColumn { field: ContractField },
    #[error("row {row}: required value '{}' is empty", .field.label())]
    MissingValue { row: usize, field: ContractField },
    #[error("row {row}: share ratio '{raw}' is not a number")]
    InvalidShareRatio { row: usize, raw: String },
    #[error("row {row}: share ratio {value} is outside 0-100%")]
    ShareRatioOutOfRange { row: usize, value: f64 },
    #[error("row {row}: premium '{raw}' is not a number")]
    InvalidPremium { row: usize, raw: String },
    #[error("row {row}: premium {value} is negative")]
    NegativePremium { row: usize, value: f64 },
}

/// How the share-ratio column reads across the whole dataset.
#[derive(Debug, Clone, Copy)]
struct ShareColumn {
    present: bool,
    fractional: bool,
}

#[derive(Debug, Default)]
pub(crate) struct ValidatedBatch {
    pub(crate) contracts: Vec<NormalizedContract>,
    pub(crate) warnings: Vec<PerformanceWarning>,
}

/// Checks the column set the policy needs, then coerces every row.
pub(crate) fn validate(
    contracts: &[Contract],
    version: PolicyVersion,
) -> Result<ValidatedBatch, ValidationError> {
    if contracts.is_empty() {
        return Ok(ValidatedBatch::default());
    }

    for field in version.required_fields() {
        if !contracts.iter().any(|contract| contract.has_field(*field)) {
            return Err(ValidationError::MissingColumn { field: *field });
        }
    }

    let share_column_present = version.requires_share_ratio()
        || contracts
            .iter()
            .any(|contract| contract.has_field(ContractField::ShareRatio));
    let share_column = ShareColumn {
        present: share_column_present,
        fractional: is_fractional_column(
            contracts
                .iter()
                .filter_map(|contract| contract.share_ratio.as_ref()),
        ),
    };

    let mut batch = ValidatedBatch {
        contracts: Vec::with_capacity(contracts.len()),
        warnings: Vec::new(),
    };

    for (index, contract) in contracts.iter().enumerate() {
        let row = index + 1;
        let normalized = normalize_row(row, contract, version, share_column, &mut batch.warnings)?;
        batch.contracts.push(normalized);
    }

    Ok(batch)
}

fn normalize_row(
    row: usize,
    contract: &Contract,
    version: PolicyVersion,
    share_column: ShareColumn,
    warnings: &mut Vec<PerformanceWarning>,
) -> Result<NormalizedContract, ValidationError> {
    let insurer = required_text(row, ContractField::Insurer, &contract.insurer)?;

    let premium_cell = required_cell(row, ContractField::Premium, &contract.premium)?;
    let premium = parse_amount(premium_cell).ok_or_else(|| ValidationError::InvalidPremium {
        row,
        raw: premium_cell.to_string(),
    })?;
    if premium < 0.0 {
        return Err(ValidationError::NegativePremium {
            row,
            value: premium,
        });
    }

    let share_ratio = if share_column.present {
        let cell = required_cell(row, ContractField::ShareRatio, &contract.share_ratio)?;
        let value = read_share_ratio(cell)
            .ok_or_else(|| ValidationError::InvalidShareRatio {
                row,
                raw: cell.to_string(),
            })?
            .to_percent(share_column.fractional);
        if !(0.0..=100.0).contains(&value) {
            return Err(ValidationError::ShareRatioOutOfRange { row, value });
        }
        value
    } else {
        FULL_SHARE
    };

    let collector_name = if version.groups_by_collector() {
        Some(required_text(row, ContractField::CollectorName, &contract.collector_name)?)
    } else {
        optional_text(&contract.collector_name)
    };

    let payment_term_years = payment_term(row, contract.payment_term.as_ref(), warnings);
    let contract_date = contract_date(row, contract.contract_date.as_ref(), warnings);

    Ok(NormalizedContract {
        row,
        insurer,
        product_name: optional_text(&contract.product_name),
        payment_term_years,
        premium,
        share_ratio,
        payment_method: exclusion_text(
            row,
            version,
            ContractField::PaymentMethod,
            &contract.payment_method,
        )?,
        product_group: exclusion_text(
            row,
            version,
            ContractField::ProductGroup,
            &contract.product_group,
        )?,
        contract_status: exclusion_text(
            row,
            version,
            ContractField::ContractStatus,
            &contract.contract_status,
        )?,
        collector_name,
        contract_date,
    })
}

/// Exclusion inputs are mandatory where the policy filters on them and
/// default to empty text elsewhere.
fn exclusion_text(
    row: usize,
    version: PolicyVersion,
    field: ContractField,
    value: &Option<String>,
) -> Result<String, ValidationError> {
    if version.required_fields().contains(&field) {
        required_text(row, field, value)
    } else {
        Ok(optional_text(value).unwrap_or_default())
    }
}

fn required_text(
    row: usize,
    field: ContractField,
    value: &Option<String>,
) -> Result<String, ValidationError> {
    optional_text(value).ok_or(ValidationError::MissingValue { row, field })
}

fn required_cell(
    row: usize,
    field: ContractField,
    value: &Option<CellValue>,
) -> Result<&CellValue, ValidationError> {
    value
        .as_ref()
        .filter(|cell| !cell.is_blank())
        .ok_or(ValidationError::MissingValue { row, field })
}

fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn payment_term(
    row: usize,
    cell: Option<&CellValue>,
    warnings: &mut Vec<PerformanceWarning>,
) -> u32 {
    let cell = cell.filter(|cell| !cell.is_blank());
    if let Some(years) = cell.and_then(parse_term_years) {
        return years;
    }

    let raw = cell.map(|cell| cell.to_string());
    warn!(row, raw = ?raw, "payment term is not numeric, defaulting to 0 years");
    warnings.push(PerformanceWarning::DefaultedPaymentTerm { row, raw });
    0
}

/// Absent dates are fine; present but unreadable ones are flagged.
fn contract_date(
    row: usize,
    cell: Option<&CellValue>,
    warnings: &mut Vec<PerformanceWarning>,
) -> Option<chrono::NaiveDate> {
    let cell = cell.filter(|cell| !cell.is_blank())?;
    let parsed = parse_contract_date(cell);
    if parsed.is_none() {
        let raw = cell.to_string();
        warn!(row, %raw, "contract date could not be parsed");
        warnings.push(PerformanceWarning::UnparseableDate { row, raw });
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_contract() -> Contract {
        Contract::new("삼성화재", 12, 1_000_000)
            .with_share_ratio("50%")
            .with_payment_method("월납")
            .with_product_group("보장성")
            .with_contract_status("정상")
            .with_collector("김하나")
    }

    #[test]
    fn empty_dataset_is_valid() {
        let batch = validate(&[], PolicyVersion::ManagerScore).expect("empty batch");
        assert!(batch.contracts.is_empty());
    }

    #[test]
    fn missing_column_rejects_dataset() {
        let mut contract = manager_contract();
        contract.product_group = None;
        let error = validate(&[contract], PolicyVersion::ManagerScore).expect_err("rejected");
        assert_eq!(
            error,
            ValidationError::MissingColumn {
                field: ContractField::ProductGroup
            }
        );
    }

    #[test]
    fn null_share_ratio_rejects_dataset() {
        let mut second = manager_contract();
        second.share_ratio = Some(CellValue::Text("  ".to_string()));
        let error = validate(&[manager_contract(), second], PolicyVersion::ManagerScore)
            .expect_err("rejected");
        assert_eq!(
            error,
            ValidationError::MissingValue {
                row: 2,
                field: ContractField::ShareRatio
            }
        );
    }

    #[test]
    fn unparseable_share_ratio_rejects_dataset() {
        let contract = manager_contract().with_share_ratio("반반");
        let error = validate(&[contract], PolicyVersion::ManagerScore).expect_err("rejected");
        assert!(matches!(error, ValidationError::InvalidShareRatio { row: 1, .. }));
    }

    #[test]
    fn blank_exclusion_fields_reject_manager_batches() {
        let mut second = manager_contract();
        second.contract_status = Some(String::new());
        second.product_group = Some("  ".to_string());
        let error = validate(&[manager_contract(), second], PolicyVersion::ManagerScore)
            .expect_err("rejected");
        assert_eq!(
            error,
            ValidationError::MissingValue {
                row: 2,
                field: ContractField::ProductGroup
            }
        );
    }

    #[test]
    fn blank_exclusion_fields_are_empty_text_for_inline_policies() {
        let contract = Contract::new("한화생명", 10, 100_000).with_contract_status(" ");
        let batch = validate(&[contract], PolicyVersion::InlineRule).expect("valid");
        assert_eq!(batch.contracts[0].contract_status, "");
        assert_eq!(batch.contracts[0].payment_method, "");
    }

    #[test]
    fn bare_one_among_percents_stays_one_percent() {
        let contracts = [
            manager_contract().with_share_ratio(50),
            manager_contract().with_share_ratio(1),
        ];
        let batch = validate(&contracts, PolicyVersion::ManagerScore).expect("valid");
        assert_eq!(batch.contracts[0].share_ratio, 50.0);
        assert_eq!(batch.contracts[1].share_ratio, 1.0);
    }

    #[test]
    fn share_ratio_column_applies_to_every_row_once_present() {
        let with_share = Contract::new("한화생명", 10, 100_000).with_share_ratio(50);
        let without_share = Contract::new("한화생명", 10, 100_000);
        let error = validate(&[with_share, without_share], PolicyVersion::InlineRule)
            .expect_err("rejected");
        assert_eq!(
            error,
            ValidationError::MissingValue {
                row: 2,
                field: ContractField::ShareRatio
            }
        );
    }

    #[test]
    fn share_ratio_defaults_to_full_credit_without_column() {
        let batch = validate(
            &[Contract::new("한화생명", 10, 100_000)],
            PolicyVersion::InlineRule,
        )
        .expect("valid");
        assert_eq!(batch.contracts[0].share_ratio, 100.0);
    }

    #[test]
    fn negative_premium_rejects_dataset() {
        let error = validate(
            &[Contract::new("한화생명", 10, -5)],
            PolicyVersion::InlineRule,
        )
        .expect_err("rejected");
        assert!(matches!(error, ValidationError::NegativePremium { row: 1, .. }));
    }

    #[test]
    fn non_numeric_term_defaults_to_zero_with_warning() {
        let contracts = [
            Contract::new("한화생명", 12, 100_000),
            Contract::new("한화생명", "종신", 100_000),
        ];
        let batch = validate(&contracts, PolicyVersion::InlineRule).expect("valid");
        assert_eq!(batch.contracts[1].payment_term_years, 0);
        assert_eq!(
            batch.warnings,
            vec![PerformanceWarning::DefaultedPaymentTerm {
                row: 2,
                raw: Some("종신".to_string())
            }]
        );
    }

    #[test]
    fn bad_dates_are_flagged_not_fatal() {
        let contracts = [
            manager_contract().with_contract_date("2024-07-01"),
            manager_contract().with_contract_date("칠월"),
            manager_contract(),
        ];
        let batch = validate(&contracts, PolicyVersion::ManagerScore).expect("valid");
        assert_eq!(batch.contracts.len(), 3);
        assert!(batch.contracts[0].contract_date.is_some());
        assert!(batch.contracts[1].contract_date.is_none());
        assert_eq!(batch.warnings.len(), 1);
        assert!(matches!(
            batch.warnings[0],
            PerformanceWarning::UnparseableDate { row: 2, .. }
        ));
    }

    #[test]
    fn text_fields_are_trimmed() {
        let contract = manager_contract().with_collector("  김하나 ");
        let batch = validate(&[contract], PolicyVersion::ManagerScore).expect("valid");
        assert_eq!(batch.contracts[0].collector_name.as_deref(), Some("김하나"));
        assert_eq!(batch.contracts[0].insurer, "삼성화재");
    }
}
