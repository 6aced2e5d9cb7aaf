use super::normalizer::normalize_header;
use crate::workflows::performance::ContractField;
use std::collections::HashMap;
use std::sync::OnceLock;

static CONTRACT_COLUMN_MAP: OnceLock<HashMap<String, ContractField>> = OnceLock::new();

pub(crate) fn field_for_normalized(normalized_header: &str) -> Option<ContractField> {
    contract_column_map().get(normalized_header).copied()
}

fn contract_column_map() -> &'static HashMap<String, ContractField> {
    CONTRACT_COLUMN_MAP.get_or_init(|| {
        const HEADER_TO_FIELD: &[(&str, ContractField)] = &[
            // Carrier
            ("보험사", ContractField::Insurer),
            ("보험회사", ContractField::Insurer),
            ("원수사", ContractField::Insurer),
            ("insurer", ContractField::Insurer),
            // Product
            ("상품명", ContractField::ProductName),
            ("상품", ContractField::ProductName),
            ("product_name", ContractField::ProductName),
            ("상품군", ContractField::ProductGroup),
            ("상품구분", ContractField::ProductGroup),
            ("상품유형", ContractField::ProductGroup),
            ("product_group", ContractField::ProductGroup),
            // Payment
            ("납입기간", ContractField::PaymentTerm),
            ("납기", ContractField::PaymentTerm),
            ("payment_term", ContractField::PaymentTerm),
            ("보험료", ContractField::Premium),
            ("초회보험료", ContractField::Premium),
            ("계속보험료", ContractField::Premium),
            ("월보험료", ContractField::Premium),
            ("premium", ContractField::Premium),
            ("납입방법", ContractField::PaymentMethod),
            ("납입주기", ContractField::PaymentMethod),
            ("payment_method", ContractField::PaymentMethod),
            // Ownership
            ("지분율", ContractField::ShareRatio),
            ("지분", ContractField::ShareRatio),
            ("share_ratio", ContractField::ShareRatio),
            ("수금자", ContractField::CollectorName),
            ("수금자명", ContractField::CollectorName),
            ("모집인", ContractField::CollectorName),
            ("모집인명", ContractField::CollectorName),
            ("설계사", ContractField::CollectorName),
            ("collector", ContractField::CollectorName),
            // Status
            ("계약상태", ContractField::ContractStatus),
            ("상태", ContractField::ContractStatus),
            ("contract_status", ContractField::ContractStatus),
            ("계약일", ContractField::ContractDate),
            ("계약일자", ContractField::ContractDate),
            ("contract_date", ContractField::ContractDate),
        ];

        HEADER_TO_FIELD
            .iter()
            .map(|(header, field)| (normalize_header(header), *field))
            .collect()
    })
}
