use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, FailureKind};

/// Why a pipeline stage handed back fallback data instead of the real thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Degradation {
    pub stage: String,
    pub kind: FailureKind,
    pub detail: String,
}

impl Degradation {
    pub fn new(stage: impl Into<String>, kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            kind,
            detail: detail.into(),
        }
    }

    pub fn from_error(stage: impl Into<String>, error: &Error) -> Self {
        Self::new(stage, error.kind(), error.to_string())
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:?}: {}", self.stage, self.kind, self.detail)
    }
}

/// Outcome of one pipeline stage.
///
/// Stages never return errors to the orchestrator. They either produce genuine
/// data, produce fallback data along with the reason, or fail outright when no
/// fallback exists at that level.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage<T> {
    Ok(T),
    Degraded(T, Degradation),
    Failed(Degradation),
}

impl<T> Stage<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Stage::Ok(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Stage::Degraded(..))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Stage::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Stage::Ok(v) | Stage::Degraded(v, _) => Some(v),
            Stage::Failed(_) => None,
        }
    }

    pub fn degradation(&self) -> Option<&Degradation> {
        match self {
            Stage::Ok(_) => None,
            Stage::Degraded(_, d) | Stage::Failed(d) => Some(d),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Stage<U> {
        match self {
            Stage::Ok(v) => Stage::Ok(f(v)),
            Stage::Degraded(v, d) => Stage::Degraded(f(v), d),
            Stage::Failed(d) => Stage::Failed(d),
        }
    }

    /// Splits the stage into its data and the reason it was degraded, if any.
    pub fn into_parts(self) -> (Option<T>, Option<Degradation>) {
        match self {
            Stage::Ok(v) => (Some(v), None),
            Stage::Degraded(v, d) => (Some(v), Some(d)),
            Stage::Failed(d) => (None, Some(d)),
        }
    }

    /// Keeps the data and pushes any degradation onto `log`.
    pub fn record(self, log: &mut Vec<Degradation>) -> Option<T> {
        let (value, degradation) = self.into_parts();
        if let Some(d) = degradation {
            log.push(d);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason() -> Degradation {
        Degradation::new("discover", FailureKind::NetworkFailure, "timed out")
    }

    #[test]
    fn test_stage_accessors() {
        let ok: Stage<u32> = Stage::Ok(1);
        assert!(ok.is_ok());
        assert_eq!(ok.value(), Some(&1));
        assert!(ok.degradation().is_none());

        let degraded = Stage::Degraded(2, reason());
        assert!(degraded.is_degraded());
        assert_eq!(degraded.value(), Some(&2));
        assert_eq!(degraded.degradation().map(|d| d.kind), Some(FailureKind::NetworkFailure));

        let failed: Stage<u32> = Stage::Failed(reason());
        assert!(failed.is_failed());
        assert!(failed.value().is_none());
    }

    #[test]
    fn test_record_collects_reasons() {
        let mut log = Vec::new();
        assert_eq!(Stage::Ok(1).record(&mut log), Some(1));
        assert_eq!(Stage::Degraded(2, reason()).map(|v| v * 10).record(&mut log), Some(20));
        assert_eq!(Stage::<u32>::Failed(reason()).record(&mut log), None);
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].to_string(), "[discover] NetworkFailure: timed out");
    }
}
