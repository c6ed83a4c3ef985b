//! Static sample dataset used when the live source is unavailable
//!
//! The records are authored once in a fixed canonical order (ascending by
//! sentiment, the upstream's default sort). Emulating a query never sorts
//! by value: descending is a reversal of that order, then the sequence is
//! truncated to `limit`. A few records deliberately lack fields so the
//! fallback path exercises the same repair rules as live data.

use sentiment_types::query::QueryParams;
use sentiment_types::record::RawRecord;
use serde_json::{json, Value};

/// Hand-authored substitute records in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleDataset {
    records: Vec<RawRecord>,
}

impl SampleDataset {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// The built-in dataset.
    pub fn canonical() -> Self {
        Self::new(sample_records())
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Apply `params` to a fresh copy of the dataset.
    pub fn emulate(&self, params: &QueryParams) -> Vec<RawRecord> {
        emulate(&self.records, params)
    }
}

impl Default for SampleDataset {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Reverse when descending, then keep the first `limit` entries.
///
/// Works on a copy; `base` is never modified. A zero or negative limit
/// yields an empty sequence.
pub fn emulate(base: &[RawRecord], params: &QueryParams) -> Vec<RawRecord> {
    let limit = usize::try_from(params.limit).unwrap_or(0);
    if params.sort_descending {
        base.iter().rev().take(limit).cloned().collect()
    } else {
        base.iter().take(limit).cloned().collect()
    }
}

fn record(value: Value) -> RawRecord {
    RawRecord::from_value(value)
}

pub fn sample_records() -> Vec<RawRecord> {
    vec![
        record(json!({
            "id": 74,
            "symbol": "DOGE",
            "name": "Dogecoin",
            "price": 0.1587,
            "volume_24h": 1_284_000_000u64,
            "market_cap": 23_080_000_000u64,
            "sentiment": 58,
            "galaxy_score": 55.5,
            "percent_change_24h": -2.31,
            "percent_change_7d": -6.04,
            "market_cap_rank": 9,
            "alt_rank": 212
        })),
        record(json!({
            "id": 3890,
            "symbol": "MATIC",
            "name": "Polygon",
            "price": 0.5214,
            "volume_24h": 301_500_000u64,
            "market_cap": 4_850_000_000u64,
            "sentiment": 61,
            "galaxy_score": null,
            "percent_change_24h": 0.87,
            "percent_change_7d": -3.12,
            "market_cap_rank": 0,
            "alt_rank": 388
        })),
        record(json!({
            "id": 2010,
            "symbol": "ADA",
            "name": "Cardano",
            "price": 0.4471,
            "volume_24h": 412_900_000u64,
            "market_cap": 15_760_000_000u64,
            "sentiment": 64,
            "galaxy_score": 60.25,
            "percent_change_24h": 1.05,
            "percent_change_7d": 2.44,
            "market_cap_rank": 11,
            "alt_rank": 145
        })),
        record(json!({
            "id": 52,
            "symbol": "XRP",
            "name": "XRP",
            "price": 0.6123,
            "volume_24h": 1_731_000_000u64,
            "market_cap": 34_220_000_000u64,
            "sentiment": 67,
            "galaxy_score": 63,
            "percent_change_24h": 3.86,
            "percent_change_7d": 8.91,
            "market_cap_rank": 6,
            "alt_rank": 97
        })),
        record(json!({
            "id": 5805,
            "symbol": "AVAX",
            "name": "Avalanche",
            "price": 27.84,
            "volume_24h": 389_400_000u64,
            "market_cap": 11_020_000_000u64,
            "sentiment": 69,
            "galaxy_score": 64.75,
            "percent_change_7d": 5.37,
            "market_cap_rank": 12
        })),
        record(json!({
            "id": 1975,
            "symbol": "LINK",
            "name": "Chainlink",
            "price": 13.42,
            "volume_24h": 402_300_000u64,
            "market_cap": 7_880_000_000u64,
            "sentiment": 72,
            "galaxy_score": 66,
            "percent_change_24h": 2.17,
            "percent_change_7d": 11.2,
            "market_cap_rank": 15,
            "alt_rank": 41
        })),
        record(json!({
            "id": 1839,
            "symbol": "BNB",
            "name": "BNB",
            "price": 574.3,
            "volume_24h": 1_906_000_000u64,
            "market_cap": 83_790_000_000u64,
            "sentiment": 74,
            "galaxy_score": 67.5,
            "percent_change_24h": 0.42,
            "percent_change_7d": 1.88,
            "market_cap_rank": 4,
            "alt_rank": 73
        })),
        record(json!({
            "id": 5426,
            "symbol": "SOL",
            "name": "Solana",
            "price": 146.72,
            "volume_24h": 2_874_000_000u64,
            "market_cap": 68_150_000_000u64,
            "sentiment": 78,
            "galaxy_score": 70.25,
            "percent_change_24h": 4.63,
            "percent_change_7d": 12.58,
            "market_cap_rank": 5,
            "alt_rank": 12
        })),
        record(json!({
            "id": 1027,
            "symbol": "ETH",
            "name": "Ethereum",
            "price": 3281.55,
            "volume_24h": 14_620_000_000u64,
            "market_cap": 394_400_000_000u64,
            "sentiment": 80,
            "galaxy_score": 71,
            "percent_change_24h": -0.64,
            "percent_change_7d": 3.19,
            "market_cap_rank": 2,
            "alt_rank": 28
        })),
        record(json!({
            "id": 1,
            "symbol": "BTC",
            "name": "Bitcoin",
            "price": 64250.12,
            "volume_24h": 31_040_000_000u64,
            "market_cap": 1_266_000_000_000u64,
            "sentiment": 83,
            "galaxy_score": 72.5,
            "percent_change_24h": 1.25,
            "percent_change_7d": 4.8,
            "market_cap_rank": 1,
            "alt_rank": 6
        })),
    ]
}
