//! Raw upstream records and their normalized, display-safe form
//!
//! Upstream records are arbitrarily shaped JSON objects. Every field the
//! dashboard displays goes through an explicit repair table so a record
//! never reaches the presentation layer with a missing or null number.
//!
//! Rank resolution is a strict fallback chain evaluated per record:
//! `market_cap_rank` if non-zero, else `alt_rank` if non-zero, else the
//! record's position in the result sequence plus one. Rank inputs are kept
//! as decimals, so a fractional value such as `0.5` is non-zero and wins.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// How a display field is repaired when absent or unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole number, default `0`.
    Integer,
    /// Decimal number, default `0`.
    Decimal,
    /// Text, default empty string.
    Text,
}

/// Fields the dashboard reads from every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Symbol,
    Name,
    Price,
    Volume24h,
    MarketCap,
    Sentiment,
    GalaxyScore,
    PercentChange24h,
    PercentChange7d,
    MarketCapRank,
    AltRank,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Id,
        Field::Symbol,
        Field::Name,
        Field::Price,
        Field::Volume24h,
        Field::MarketCap,
        Field::Sentiment,
        Field::GalaxyScore,
        Field::PercentChange24h,
        Field::PercentChange7d,
        Field::MarketCapRank,
        Field::AltRank,
    ];

    /// JSON key used by the upstream list API.
    pub const fn key(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Symbol => "symbol",
            Field::Name => "name",
            Field::Price => "price",
            Field::Volume24h => "volume_24h",
            Field::MarketCap => "market_cap",
            Field::Sentiment => "sentiment",
            Field::GalaxyScore => "galaxy_score",
            Field::PercentChange24h => "percent_change_24h",
            Field::PercentChange7d => "percent_change_7d",
            Field::MarketCapRank => "market_cap_rank",
            Field::AltRank => "alt_rank",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Field::Id => FieldKind::Integer,
            Field::Symbol | Field::Name => FieldKind::Text,
            _ => FieldKind::Decimal,
        }
    }
}

/// An upstream record exactly as received.
///
/// Any field may be absent, null or of an unexpected type. Accessors never
/// fail; they apply the repair rules of [`FieldKind`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value. Non-object values yield an empty record so the
    /// entry keeps its position in the sequence.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn get(&self, field: Field) -> Option<&Value> {
        self.0.get(field.key())
    }

    pub fn set(&mut self, field: Field, value: Value) {
        self.0.insert(field.key().to_string(), value);
    }

    pub fn decimal(&self, field: Field) -> Decimal {
        repair_decimal(self.get(field))
    }

    pub fn integer(&self, field: Field) -> i64 {
        repair_integer(self.get(field))
    }

    pub fn text(&self, field: Field) -> String {
        repair_text(self.get(field))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A record with every display field present and typed, plus its rank.
///
/// Fields the dashboard does not know about are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub price: Decimal,
    pub volume_24h: Decimal,
    pub market_cap: Decimal,
    pub sentiment: Decimal,
    pub galaxy_score: Decimal,
    pub percent_change_24h: Decimal,
    pub percent_change_7d: Decimal,
    pub market_cap_rank: Decimal,
    pub alt_rank: Decimal,
    /// Resolved once from the fallback chain; never reconciled against
    /// other records.
    pub rank: Decimal,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedRecord {
    /// Normalize `raw`, which sits at `index` in the result sequence.
    pub fn from_raw(raw: RawRecord, index: usize) -> Self {
        let market_cap_rank = raw.decimal(Field::MarketCapRank);
        let alt_rank = raw.decimal(Field::AltRank);

        let mut record = Self {
            id: raw.integer(Field::Id),
            symbol: raw.text(Field::Symbol),
            name: raw.text(Field::Name),
            price: raw.decimal(Field::Price),
            volume_24h: raw.decimal(Field::Volume24h),
            market_cap: raw.decimal(Field::MarketCap),
            sentiment: raw.decimal(Field::Sentiment),
            galaxy_score: raw.decimal(Field::GalaxyScore),
            percent_change_24h: raw.decimal(Field::PercentChange24h),
            percent_change_7d: raw.decimal(Field::PercentChange7d),
            market_cap_rank,
            alt_rank,
            rank: resolve_rank(market_cap_rank, alt_rank, index),
            extra: Map::new(),
        };

        let mut extra = raw.into_map();
        for field in Field::ALL {
            extra.remove(field.key());
        }
        // `rank` is computed; an upstream value would shadow it on output.
        extra.remove("rank");
        record.extra = extra;
        record
    }
}

/// Rank fallback chain. Zero counts as absent.
pub fn resolve_rank(market_cap_rank: Decimal, alt_rank: Decimal, index: usize) -> Decimal {
    if !market_cap_rank.is_zero() {
        market_cap_rank
    } else if !alt_rank.is_zero() {
        alt_rank
    } else {
        Decimal::from(index) + Decimal::ONE
    }
}

/// Normalize a whole sequence, preserving order.
pub fn normalize_records(records: Vec<RawRecord>) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| NormalizedRecord::from_raw(raw, index))
        .collect()
}

/// Numbers convert exactly through their textual form; numeric strings are
/// parsed. Everything else, including out-of-range values, becomes zero.
pub fn repair_decimal(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => number_to_decimal(n),
        Some(Value::String(s)) => parse_decimal(s.trim()),
        _ => None,
    }
    .unwrap_or(Decimal::ZERO)
}

pub fn repair_integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .unwrap_or(0)
}

pub fn repair_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_to_decimal(n: &Number) -> Option<Decimal> {
    parse_decimal(&n.to_string()).or_else(|| n.as_f64().and_then(Decimal::from_f64))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}
