//! Shared types for the reconciliation resolvers: the ungrouped-row
//! policy, per-phase statistics, and the error taxonomy.

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::biclusters::MalformedSpecError;

/// What to do with rows that belong to no bicluster after overlap
/// resolution. Selected once for the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UngroupedPolicy {
    /// Overwrite each ungrouped row with a copy of a random grouped row
    /// and append it to that row's bicluster.
    Replace,
    /// Delete each ungrouped row and renumber the survivors.
    Remove,
    /// Leave ungrouped rows untouched.
    #[default]
    Nothing,
}

impl UngroupedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UngroupedPolicy::Replace => "replace",
            UngroupedPolicy::Remove => "remove",
            UngroupedPolicy::Nothing => "nothing",
        }
    }
}

impl fmt::Display for UngroupedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UngroupedPolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(UngroupedPolicy::Replace),
            "remove" => Ok(UngroupedPolicy::Remove),
            "nothing" => Ok(UngroupedPolicy::Nothing),
            other => Err(PolicyError::Unsupported(other.to_string())),
        }
    }
}

/// Rejected policy selector. Caught at configuration time, before any
/// input file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    Unsupported(String),
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::Unsupported(got) => write!(
                f,
                "unsupported ungrouped-row policy '{}' (expected replace, remove or nothing)",
                got
            ),
        }
    }
}

impl Error for PolicyError {}

/// Overlap resolution could not find a usable donor or target row.
///
/// Fatal: the run aborts with the dataset left internally consistent for
/// the rows already processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The bicluster owns no row with membership exactly 1 to donate.
    NoDonor { bicluster: String, row: usize },
    /// No ungrouped row remains and the next bicluster in the overlap
    /// list has no exclusively-owned row to fall back on.
    NoTarget { row: usize, next_bicluster: String },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::NoDonor { bicluster, row } => write!(
                f,
                "cannot split overlapped row {}: bicluster '{}' has no exclusively-owned donor row",
                row, bicluster
            ),
            ResolutionError::NoTarget { row, next_bicluster } => write!(
                f,
                "cannot split overlapped row {}: no ungrouped row remains and bicluster '{}' has no exclusively-owned fallback row",
                row, next_bicluster
            ),
        }
    }
}

impl Error for ResolutionError {}

/// Counters produced by overlap resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverlapStats {
    /// Overlapped rows fully resolved.
    pub resolved_rows: usize,
    /// Physical row splits performed (one per extra membership).
    pub splits: usize,
    /// Splits whose target came from the next bicluster because the
    /// ungrouped pool was empty.
    pub fallback_targets: usize,
}

/// Counters produced by ungrouped-row resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UngroupedStats {
    pub policy: UngroupedPolicy,
    /// Rows replaced or removed; always 0 for the `nothing` policy.
    pub affected_rows: usize,
}

/// Run-level configuration for the reconciliation pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    pub policy: UngroupedPolicy,
    /// Seed for the donor/target generator; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

/// Umbrella error for the whole pipeline, boundary I/O included.
#[derive(Debug)]
pub enum ReconcileError {
    Spec(MalformedSpecError),
    Resolution(ResolutionError),
    Policy(PolicyError),
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::Spec(e) => write!(f, "malformed bicluster specification: {}", e),
            ReconcileError::Resolution(e) => write!(f, "overlap resolution failed: {}", e),
            ReconcileError::Policy(e) => write!(f, "bad configuration: {}", e),
            ReconcileError::Io(e) => write!(f, "i/o error: {}", e),
            ReconcileError::Csv(e) => write!(f, "csv error: {}", e),
            ReconcileError::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl Error for ReconcileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ReconcileError::Spec(e) => Some(e),
            ReconcileError::Resolution(e) => Some(e),
            ReconcileError::Policy(e) => Some(e),
            ReconcileError::Io(e) => Some(e),
            ReconcileError::Csv(e) => Some(e),
            ReconcileError::Json(e) => Some(e),
        }
    }
}

impl From<MalformedSpecError> for ReconcileError {
    fn from(e: MalformedSpecError) -> Self {
        ReconcileError::Spec(e)
    }
}

impl From<ResolutionError> for ReconcileError {
    fn from(e: ResolutionError) -> Self {
        ReconcileError::Resolution(e)
    }
}

impl From<PolicyError> for ReconcileError {
    fn from(e: PolicyError) -> Self {
        ReconcileError::Policy(e)
    }
}

impl From<std::io::Error> for ReconcileError {
    fn from(e: std::io::Error) -> Self {
        ReconcileError::Io(e)
    }
}

impl From<csv::Error> for ReconcileError {
    fn from(e: csv::Error) -> Self {
        ReconcileError::Csv(e)
    }
}

impl From<serde_json::Error> for ReconcileError {
    fn from(e: serde_json::Error) -> Self {
        ReconcileError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parses_all_supported_values() {
        assert_eq!("replace".parse(), Ok(UngroupedPolicy::Replace));
        assert_eq!("remove".parse(), Ok(UngroupedPolicy::Remove));
        assert_eq!("nothing".parse(), Ok(UngroupedPolicy::Nothing));
    }

    #[test]
    fn test_policy_rejects_unknown_value() {
        let err = "discard".parse::<UngroupedPolicy>().unwrap_err();
        assert_eq!(err, PolicyError::Unsupported("discard".to_string()));
        assert!(err.to_string().contains("discard"));
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [
            UngroupedPolicy::Replace,
            UngroupedPolicy::Remove,
            UngroupedPolicy::Nothing,
        ] {
            assert_eq!(policy.to_string().parse::<UngroupedPolicy>(), Ok(policy));
        }
    }

    #[test]
    fn test_resolution_error_display_names_the_bicluster() {
        let err = ResolutionError::NoDonor {
            bicluster: "bic3".to_string(),
            row: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("bic3"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_umbrella_error_wraps_and_exposes_source() {
        let err: ReconcileError = ResolutionError::NoTarget {
            row: 4,
            next_bicluster: "bic1".to_string(),
        }
        .into();
        assert!(matches!(err, ReconcileError::Resolution(_)));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("bic1"));
    }

    #[test]
    fn test_config_default_is_nothing_and_unseeded() {
        let config = ReconcileConfig::default();
        assert_eq!(config.policy, UngroupedPolicy::Nothing);
        assert_eq!(config.seed, None);
    }
}
