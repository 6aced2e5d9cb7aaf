use super::super::domain::{GroupSummary, RateDimension, TOTAL_GROUP_LABEL};
use super::summary::PerformanceReport;
use super::views::round_won;

/// Spreadsheet tools only detect UTF-8 CSV reliably with a BOM.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Caller-owned counter used to give every exported table a unique name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSequence {
    next: u32,
}

impl Default for ExportSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSequence {
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_name(&mut self, prefix: &str) -> String {
        let name = format!("{prefix}_{:02}", self.next);
        self.next += 1;
        name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub name: String,
    /// UTF-8 CSV with BOM.
    pub bytes: Vec<u8>,
}

/// Renders a report into CSV tables; amounts are rounded here and nowhere earlier.
pub struct ReportExporter<'a> {
    report: &'a PerformanceReport,
}

impl<'a> ReportExporter<'a> {
    pub fn new(report: &'a PerformanceReport) -> Self {
        Self { report }
    }

    /// Contracts, exclusions (when the policy filters) and collector/total tables.
    pub fn tables(&self, sequence: &mut ExportSequence) -> Result<Vec<ExportTable>, csv::Error> {
        let mut tables = vec![ExportTable {
            name: sequence.next_name("계약별"),
            bytes: self.contracts_csv()?,
        }];

        if self.report.policy.applies_exclusions() {
            tables.push(ExportTable {
                name: sequence.next_name("제외계약"),
                bytes: self.excluded_csv()?,
            });
        }

        tables.push(ExportTable {
            name: sequence.next_name("수금자별"),
            bytes: self.groups_csv()?,
        });

        Ok(tables)
    }

    fn dimensions(&self) -> &'static [RateDimension] {
        self.report.policy.dimensions()
    }

    pub fn contracts_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = bom_writer();

        let mut header = vec![
            "행".to_string(),
            "보험사".to_string(),
            "분류".to_string(),
            "납입기간".to_string(),
            "보험료".to_string(),
            "지분율".to_string(),
            "실적보험료".to_string(),
        ];
        for dimension in self.dimensions() {
            header.push(format!("{}율", dimension.label()));
            header.push(format!("{}환산금액", dimension.label()));
        }
        header.push("수금자".to_string());
        header.push("계약일".to_string());
        writer.write_record(&header)?;

        for scored in &self.report.scored {
            let contract = &scored.contract;
            let mut record = vec![
                contract.row.to_string(),
                contract.insurer.clone(),
                scored.category.label(),
                contract.payment_term_years.to_string(),
                round_won(contract.premium).to_string(),
                format!("{}%", contract.share_ratio),
                round_won(scored.performance_premium).to_string(),
            ];
            for dimension in self.dimensions() {
                let applied = scored.rate(*dimension);
                record.push(applied.map(|rate| rate.rate).unwrap_or(0).to_string());
                record.push(round_won(scored.converted_amount(*dimension)).to_string());
            }
            record.push(contract.collector_name.clone().unwrap_or_default());
            record.push(
                contract
                    .contract_date
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            );
            writer.write_record(&record)?;
        }

        finish(writer)
    }

    pub fn excluded_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = bom_writer();
        writer.write_record(["행", "보험사", "수금자", "보험료", "제외사유"])?;

        for record in &self.report.excluded {
            let contract = &record.contract;
            writer.write_record([
                contract.row.to_string(),
                contract.insurer.clone(),
                contract.collector_name.clone().unwrap_or_default(),
                round_won(contract.premium).to_string(),
                record.reason.clone(),
            ])?;
        }

        finish(writer)
    }

    /// One row per collector in rank order, then the total row.
    pub fn groups_csv(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = bom_writer();

        let mut header = vec![
            "순위".to_string(),
            "수금자".to_string(),
            "건수".to_string(),
            "건수순위".to_string(),
            "실적보험료".to_string(),
        ];
        for dimension in self.dimensions() {
            header.push(format!("{}환산금액", dimension.label()));
        }
        writer.write_record(&header)?;

        for group in &self.report.groups {
            writer.write_record(self.group_record(group))?;
        }
        writer.write_record(self.group_record(&self.report.total))?;

        finish(writer)
    }

    fn group_record(&self, group: &GroupSummary) -> Vec<String> {
        let rank = |value: Option<u32>| value.map(|rank| rank.to_string()).unwrap_or_default();
        let label = group.collector.as_deref().unwrap_or(TOTAL_GROUP_LABEL);

        let mut record = vec![
            rank(group.amount_rank),
            label.to_string(),
            group.contract_count.to_string(),
            rank(group.count_rank),
            round_won(group.performance_premium_sum).to_string(),
        ];
        for dimension in self.dimensions() {
            record.push(round_won(group.converted_sum(*dimension)).to_string());
        }
        record
    }
}

fn bom_writer() -> csv::Writer<Vec<u8>> {
    csv::Writer::from_writer(UTF8_BOM.to_vec())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, csv::Error> {
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}
