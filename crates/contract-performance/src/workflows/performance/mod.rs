//! Contract performance scoring: validation, exclusion, rate classification,
//! scoring and aggregation over one uploaded batch.

mod aggregation;
pub mod classifier;
mod coerce;
pub mod domain;
pub mod exclusion;
pub mod report;
pub mod router;
pub mod scoring;
mod validation;

#[cfg(test)]
mod tests;

pub use classifier::{
    policy_for, Classification, InlineRulePolicy, LookupTablePolicy, ManagerScorePolicy,
    PolicySelectionError, PolicyVersion, RateKey, RatePair, RatePolicy, RateTable,
    RateTableError, TermBucket, LONG_TERM_YEARS,
};
pub use domain::{
    AppliedRate, CellValue, Contract, ContractField, DimensionTotal, ExclusionReason,
    ExclusionRecord, GroupSummary, InsuranceLine, InsurerCategory, NormalizedContract,
    PerformanceWarning, RateDimension, ScoredContract,
};
pub use report::{ExportSequence, ExportTable, PerformanceReport, ReportExporter};
pub use router::{performance_router, ScoreRequest, ScoringDefaults};
pub use validation::ValidationError;

use crate::workflows::contracts::ContractImportError;
use exclusion::ExclusionSplit;
use tracing::{info, warn};

/// Any failure between an uploaded file and a finished report.
#[derive(Debug, thiserror::Error)]
pub enum PerformanceError {
    #[error(transparent)]
    Import(#[from] ContractImportError),
    #[error(transparent)]
    RateTable(#[from] RateTableError),
    #[error(transparent)]
    Policy(#[from] PolicySelectionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to render export: {0}")]
    Export(#[from] csv::Error),
}

/// Stateless engine running the validate → exclude → score → aggregate pipeline
/// for one policy version.
pub struct PerformanceEngine {
    policy: Box<dyn RatePolicy>,
}

impl PerformanceEngine {
    pub fn new<P: RatePolicy + 'static>(policy: P) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    pub fn for_version(
        version: PolicyVersion,
        rate_table: Option<RateTable>,
    ) -> Result<Self, PolicySelectionError> {
        Ok(Self {
            policy: policy_for(version, rate_table)?,
        })
    }

    pub fn version(&self) -> PolicyVersion {
        self.policy.version()
    }

    pub fn policy(&self) -> &dyn RatePolicy {
        self.policy.as_ref()
    }

    pub fn run(&self, contracts: &[Contract]) -> Result<PerformanceReport, ValidationError> {
        let version = self.policy.version();
        info!(policy = %version, rows = contracts.len(), "scoring contract batch");

        let batch = validation::validate(contracts, version).map_err(|error| {
            warn!(policy = %version, %error, "contract batch rejected");
            error
        })?;
        let mut warnings = batch.warnings;

        let ExclusionSplit { eligible, excluded } = if version.applies_exclusions() {
            exclusion::split(batch.contracts)
        } else {
            ExclusionSplit {
                eligible: batch.contracts,
                excluded: Vec::new(),
            }
        };

        let mut scored = Vec::with_capacity(eligible.len());
        for contract in eligible {
            let row = contract.row;
            let (contract, gap) = scoring::score_contract(self.policy.as_ref(), contract);
            if let Some(key) = gap {
                warn!(row, %key, "no rate table entry, rates set to 0");
                warnings.push(PerformanceWarning::RateTableGap {
                    row,
                    key: key.to_string(),
                });
            }
            scored.push(contract);
        }
        warnings.sort_by_key(PerformanceWarning::row);

        let aggregation::Aggregation { groups, total } = aggregation::aggregate(
            &scored,
            version.dimensions(),
            version.groups_by_collector(),
        );

        info!(
            policy = %version,
            eligible = scored.len(),
            excluded = excluded.len(),
            collectors = groups.len(),
            warnings = warnings.len(),
            "contract batch scored"
        );

        Ok(PerformanceReport {
            policy: version,
            scored,
            excluded,
            groups,
            total,
            warnings,
        })
    }
}
