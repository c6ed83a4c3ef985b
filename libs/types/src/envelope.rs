//! The result envelope handed to the presentation layer

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::FetchError;
use crate::record::NormalizedRecord;

/// Diagnostic attached to an envelope that did not come from a clean
/// live response. It never prevents the envelope from being rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AcquireNotice {
    /// The live fetch failed and the sample dataset was used.
    Fallback { reason: FetchError },
    /// The live response succeeded but carried no `data` list.
    MissingDataField,
}

/// One pipeline invocation's output. Replaces the previous envelope
/// wholesale; there is no incremental merge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub records: Vec<NormalizedRecord>,
    /// True iff `records` came from the sample dataset.
    pub is_synthetic: bool,
    pub fetched_at: DateTime<Utc>,
    pub notice: Option<AcquireNotice>,
}

impl ResultEnvelope {
    pub fn live(records: Vec<NormalizedRecord>) -> Self {
        Self {
            records,
            is_synthetic: false,
            fetched_at: Utc::now(),
            notice: None,
        }
    }

    pub fn missing_data() -> Self {
        Self {
            records: Vec::new(),
            is_synthetic: false,
            fetched_at: Utc::now(),
            notice: Some(AcquireNotice::MissingDataField),
        }
    }

    pub fn synthetic(records: Vec<NormalizedRecord>, reason: FetchError) -> Self {
        Self {
            records,
            is_synthetic: true,
            fetched_at: Utc::now(),
            notice: Some(AcquireNotice::Fallback { reason }),
        }
    }

    /// Failure that caused the fallback, if any.
    pub fn fallback_reason(&self) -> Option<&FetchError> {
        match &self.notice {
            Some(AcquireNotice::Fallback { reason }) => Some(reason),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
