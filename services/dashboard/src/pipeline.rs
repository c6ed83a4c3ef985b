//! Fetch-and-normalize pipeline
//!
//! `acquire` always produces an envelope:
//! - live success with a `data` list: normalized live records
//! - live success without a `data` list: empty, non-synthetic, flagged
//!   with [`AcquireNotice::MissingDataField`]
//! - any fetch failure: the sample dataset run through the same sort and
//!   limit, normalized, flagged synthetic with the failure attached
//!
//! The pipeline holds no per-call state and never deduplicates calls.
//!
//! [`AcquireNotice::MissingDataField`]: sentiment_types::envelope::AcquireNotice

use sentiment_types::envelope::ResultEnvelope;
use sentiment_types::errors::FetchError;
use sentiment_types::query::QueryParams;
use sentiment_types::record::{normalize_records, RawRecord};
use tracing::{debug, error, info, warn};

use crate::sample::SampleDataset;
use crate::source::SentimentSource;

pub struct Pipeline<S> {
    source: S,
    sample: SampleDataset,
}

impl<S: SentimentSource> Pipeline<S> {
    /// Pipeline over `source` with the built-in sample dataset.
    pub fn new(source: S) -> Self {
        Self::with_sample(source, SampleDataset::canonical())
    }

    pub fn with_sample(source: S, sample: SampleDataset) -> Self {
        info!(
            source = source.name(),
            sample_records = sample.len(),
            "Pipeline initialized"
        );
        Self { source, sample }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sample(&self) -> &SampleDataset {
        &self.sample
    }

    /// Fetch, validate and normalize one ranked list.
    pub async fn acquire(&self, params: &QueryParams) -> ResultEnvelope {
        match self.source.fetch(params).await {
            Ok(payload) => match payload.data {
                Some(records) => {
                    let records = cap_live_records(records, params.limit);
                    debug!(
                        records = records.len(),
                        desc = params.sort_descending,
                        limit = params.limit,
                        "Live list received"
                    );
                    ResultEnvelope::live(normalize_records(records))
                }
                None => {
                    warn!(
                        source = self.source.name(),
                        "Live response has no data list; showing empty result"
                    );
                    ResultEnvelope::missing_data()
                }
            },
            Err(reason) => self.fallback(params, reason),
        }
    }

    fn fallback(&self, params: &QueryParams, reason: FetchError) -> ResultEnvelope {
        if reason.is_configuration() {
            error!(
                error = %reason,
                "Live source is misconfigured; serving sample data"
            );
        } else {
            warn!(
                error = %reason,
                kind = reason.label(),
                "Live fetch failed; serving sample data"
            );
        }

        let records = self.sample.emulate(params);
        ResultEnvelope::synthetic(normalize_records(records), reason)
    }
}

/// Keep a misbehaving upstream from exceeding a positive limit. Zero and
/// negative limits were already forwarded unmodified, so those responses
/// are left as received.
fn cap_live_records(mut records: Vec<RawRecord>, limit: i64) -> Vec<RawRecord> {
    if let Ok(limit) = usize::try_from(limit) {
        if limit > 0 && records.len() > limit {
            debug!(
                received = records.len(),
                limit, "Upstream returned more records than requested"
            );
            records.truncate(limit);
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sentiment_types::envelope::AcquireNotice;
    use rust_decimal::Decimal;
    use sentiment_types::record::resolve_rank;
    use sentiment_types::wire::UpstreamPayload;
    use serde_json::json;

    struct Fixed(Result<UpstreamPayload, FetchError>);

    #[async_trait]
    impl SentimentSource for Fixed {
        async fn fetch(&self, _params: &QueryParams) -> Result<UpstreamPayload, FetchError> {
            self.0.clone()
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn live(n: usize) -> Fixed {
        let records = (0..n)
            .map(|i| RawRecord::from_value(json!({ "id": i, "symbol": format!("C{}", i) })))
            .collect();
        Fixed(Ok(UpstreamPayload::from_records(records)))
    }

    #[tokio::test]
    async fn test_live_records_are_normalized() {
        let pipeline = Pipeline::new(live(3));
        let envelope = pipeline.acquire(&QueryParams::new(false, 10)).await;

        assert!(!envelope.is_synthetic);
        assert!(envelope.notice.is_none());
        assert_eq!(envelope.len(), 3);
        assert_eq!(envelope.records[2].symbol, "C2");
        assert_eq!(
            envelope.records[2].rank,
            resolve_rank(Decimal::ZERO, Decimal::ZERO, 2)
        );
    }

    #[tokio::test]
    async fn test_live_records_capped_to_positive_limit() {
        let pipeline = Pipeline::new(live(12));
        let envelope = pipeline.acquire(&QueryParams::new(false, 10)).await;
        assert_eq!(envelope.len(), 10);

        let envelope = pipeline.acquire(&QueryParams::new(false, 0)).await;
        assert_eq!(envelope.len(), 12);
    }

    #[tokio::test]
    async fn test_missing_data_is_empty_and_live() {
        let pipeline = Pipeline::new(Fixed(Ok(UpstreamPayload::from_value(json!({})))));
        let envelope = pipeline.acquire(&QueryParams::new(true, 10)).await;

        assert!(envelope.records.is_empty());
        assert!(!envelope.is_synthetic);
        assert_eq!(envelope.notice, Some(AcquireNotice::MissingDataField));
    }

    #[tokio::test]
    async fn test_failure_uses_sample() {
        let reason = FetchError::Transport("connection refused".to_string());
        let pipeline = Pipeline::new(Fixed(Err(reason.clone())));
        let envelope = pipeline.acquire(&QueryParams::new(true, 2)).await;

        assert!(envelope.is_synthetic);
        assert_eq!(envelope.fallback_reason(), Some(&reason));
        let symbols: Vec<&str> = envelope.records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH"]);
    }

    #[tokio::test]
    async fn test_configuration_failure_is_distinguishable() {
        let pipeline = Pipeline::new(Fixed(Err(FetchError::MissingCredential(
            "LUNARCRUSH_API_KEY is not configured".to_string(),
        ))));
        let envelope = pipeline.acquire(&QueryParams::default()).await;

        assert!(envelope.is_synthetic);
        assert!(envelope.fallback_reason().unwrap().is_configuration());
        assert_eq!(envelope.len(), 10);
    }

    #[tokio::test]
    async fn test_sample_records_are_repaired() {
        let pipeline = Pipeline::new(Fixed(Err(FetchError::Decode("eof".to_string()))));
        let envelope = pipeline.acquire(&QueryParams::new(false, 5)).await;

        // MATIC ships without a galaxy score and a zero market cap rank.
        let matic = &envelope.records[1];
        assert_eq!(matic.symbol, "MATIC");
        assert!(matic.galaxy_score.is_zero());
        assert_eq!(matic.rank, Decimal::from(388));

        // AVAX has no 24h change and no alt rank.
        let avax = &envelope.records[4];
        assert_eq!(avax.symbol, "AVAX");
        assert!(avax.percent_change_24h.is_zero());
        assert_eq!(avax.rank, Decimal::from(12));
    }
}
