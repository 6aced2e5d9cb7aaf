//! Insurance contract performance engine: contract sheet import, versioned
//! rate policies, exclusion screening, scoring and collector aggregation.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
