use super::mapping::field_for_normalized;
use super::normalizer::{clean_cell, normalize_header};
use crate::workflows::performance::{Contract, ContractField};
use std::io::Read;

#[derive(Debug, Default)]
pub(crate) struct ParsedSheet {
    /// Column index and the field it feeds, in sheet order.
    pub(crate) columns: Vec<(usize, ContractField)>,
    pub(crate) ignored_headers: Vec<String>,
    pub(crate) contracts: Vec<Contract>,
}

pub(crate) fn parse_contracts<R: Read>(reader: R) -> Result<ParsedSheet, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut sheet = ParsedSheet::default();
    for (index, header) in csv_reader.headers()?.iter().enumerate() {
        match field_for_normalized(&normalize_header(header)) {
            Some(field) if !sheet.columns.iter().any(|(_, known)| *known == field) => {
                sheet.columns.push((index, field));
            }
            _ => sheet.ignored_headers.push(header.to_string()),
        }
    }

    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|cell| clean_cell(cell).is_none()) {
            continue;
        }

        let mut contract = Contract::default();
        for (index, field) in &sheet.columns {
            contract.set_field(*field, record.get(*index).and_then(clean_cell));
        }
        sheet.contracts.push(contract);
    }

    Ok(sheet)
}
