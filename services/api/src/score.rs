use crate::infra::{format_won, load_rate_table, parse_policy};
use clap::Args;
use contract_performance::config::AppConfig;
use contract_performance::error::AppError;
use contract_performance::telemetry;
use contract_performance::workflows::contracts::ContractImporter;
use contract_performance::workflows::performance::report::views::{
    GroupSummaryView, PerformanceSummaryView,
};
use contract_performance::workflows::performance::{
    ExportSequence, PerformanceEngine, PerformanceError, PerformanceReport, PolicyVersion,
    ReportExporter,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Contract CSV to score
    #[arg(long)]
    pub(crate) contracts: PathBuf,
    /// Policy version (lookup-table, inline-rule, inline-rule-screened, manager-score)
    #[arg(long, value_parser = parse_policy)]
    pub(crate) policy: Option<PolicyVersion>,
    /// Rate table CSV for the lookup-table policy
    #[arg(long)]
    pub(crate) rate_table: Option<PathBuf>,
    /// Write the CSV export tables into this directory
    #[arg(long)]
    pub(crate) export_dir: Option<PathBuf>,
    /// Print every scored contract as well as the totals
    #[arg(long)]
    pub(crate) list_contracts: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        contracts,
        policy,
        rate_table,
        export_dir,
        list_contracts,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let policy = policy.unwrap_or(config.scoring.policy);
    let rate_table = rate_table
        .or(config.scoring.rate_table_path)
        .map(|path| load_rate_table(&path))
        .transpose()?;

    let contracts = ContractImporter::from_path(&contracts).map_err(PerformanceError::from)?;
    let engine = PerformanceEngine::for_version(policy, rate_table).map_err(PerformanceError::from)?;
    let report = engine.run(&contracts).map_err(PerformanceError::from)?;

    let stdout = std::io::stdout();
    render_report(&mut stdout.lock(), &report.summary(), list_contracts)?;

    if let Some(dir) = export_dir {
        for path in write_exports(&report, &dir)? {
            println!("Exported {}", path.display());
        }
    }

    Ok(())
}

pub(crate) fn render_report<W: Write>(
    out: &mut W,
    summary: &PerformanceSummaryView,
    list_contracts: bool,
) -> std::io::Result<()> {
    writeln!(out, "Contract performance ({})", summary.policy_label)?;

    if list_contracts {
        writeln!(out, "\nContracts")?;
        for contract in &summary.contracts {
            let rates = contract
                .rates
                .iter()
                .map(|rate| {
                    format!(
                        "{} {}% = {}",
                        rate.dimension_label,
                        rate.rate,
                        format_won(rate.converted_amount)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                out,
                "- row {}: {} [{}] {}y, performance {} | {}",
                contract.row,
                contract.insurer,
                contract.category_label,
                contract.payment_term_years,
                format_won(contract.performance_premium),
                rates
            )?;
        }
    }

    if !summary.excluded.is_empty() {
        writeln!(out, "\nExcluded contracts")?;
        for excluded in &summary.excluded {
            writeln!(
                out,
                "- row {}: {} ({}) premium {}: {}",
                excluded.row,
                excluded.insurer,
                excluded.collector_name.as_deref().unwrap_or("-"),
                format_won(excluded.premium),
                excluded.reason
            )?;
        }
    }

    if !summary.collectors.is_empty() {
        writeln!(out, "\nCollectors")?;
        for group in &summary.collectors {
            writeln!(out, "{}", group_line(group))?;
        }
    }

    writeln!(out, "\nTotal")?;
    writeln!(out, "{}", group_line(&summary.total))?;

    let warnings = summary.warnings;
    if warnings.unparseable_dates + warnings.defaulted_payment_terms + warnings.rate_table_gaps > 0 {
        writeln!(
            out,
            "\nWarnings: {} unparseable dates, {} defaulted payment terms, {} rate table gaps",
            warnings.unparseable_dates, warnings.defaulted_payment_terms, warnings.rate_table_gaps
        )?;
    }

    Ok(())
}

fn group_line(group: &GroupSummaryView) -> String {
    let rank = group
        .amount_rank
        .map(|rank| format!("#{rank} "))
        .unwrap_or_default();
    let converted = group
        .converted
        .iter()
        .map(|total| format!("{} {}", total.dimension_label, format_won(total.amount)))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "- {}{}: {} contracts, performance {} | {}",
        rank,
        group.label,
        group.contract_count,
        format_won(group.performance_premium),
        converted
    )
}

/// Writes each export table as `<dir>/<name>.csv` and returns the paths.
pub(crate) fn write_exports(report: &PerformanceReport, dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir)?;

    let tables = ReportExporter::new(report)
        .tables(&mut ExportSequence::new())
        .map_err(PerformanceError::from)?;

    let mut written = Vec::with_capacity(tables.len());
    for table in tables {
        let path = dir.join(format!("{}.csv", table.name));
        std::fs::write(&path, &table.bytes)?;
        written.push(path);
    }
    Ok(written)
}
