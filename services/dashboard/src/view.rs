//! Terminal presentation of a result envelope
//!
//! Two view modes over the same records: one card per coin, or a single
//! table. Synthetic envelopes always carry a visible sample-data banner.

use std::fmt::Write as _;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use sentiment_types::envelope::{AcquireNotice, ResultEnvelope};
use sentiment_types::record::NormalizedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    #[default]
    Cards,
    Table,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Cards => ViewMode::Table,
            ViewMode::Table => ViewMode::Cards,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Cards => "cards",
            ViewMode::Table => "table",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "card" | "grid" => Ok(ViewMode::Cards),
            "table" | "list" => Ok(ViewMode::Table),
            other => Err(format!("unknown view mode: {}", other)),
        }
    }
}

/// `$64,250.12` for prices of at least one dollar; sub-dollar prices keep
/// up to six decimals so small caps stay readable.
pub fn format_price(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    let abs = value.abs();
    if abs.is_zero() {
        return "$0.00".to_string();
    }
    if abs >= Decimal::ONE {
        let rounded = abs.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        return format!("{}${}", sign, group_thousands(&format!("{:.2}", rounded)));
    }
    let rounded = abs
        .round_dp_with_strategy(6, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return format!("{}<$0.000001", sign);
    }
    format!("{}${}", sign, rounded)
}

/// `$1.27T`, `$31.04B`, `$412.90M`, `$1.50K`, otherwise two decimals.
pub fn format_compact(value: Decimal) -> String {
    const UNITS: [(i64, &str); 4] = [
        (1_000_000_000_000, "T"),
        (1_000_000_000, "B"),
        (1_000_000, "M"),
        (1_000, "K"),
    ];

    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    let abs = value.abs();
    for (scale, suffix) in UNITS {
        let scale = Decimal::from(scale);
        if abs >= scale {
            let scaled = (abs / scale).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            return format!("{}${:.2}{}", sign, scaled, suffix);
        }
    }
    format!(
        "{}${:.2}",
        sign,
        abs.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Signed percentage with two decimals: `+4.80%`, `-0.64%`, `0.00%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        "0.00%".to_string()
    } else if rounded.is_sign_positive() {
        format!("+{:.2}%", rounded)
    } else {
        format!("{:.2}%", rounded)
    }
}

/// Scores print without trailing zeros: `72.5`, `81`.
pub fn format_score(value: Decimal) -> String {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Ranks print as received, without trailing zeros: `3`, `0.5`.
pub fn format_rank(value: Decimal) -> String {
    value.normalize().to_string()
}

fn group_thousands(number: &str) -> String {
    let (int_part, frac_part) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

fn display_name(record: &NormalizedRecord) -> String {
    match (record.name.is_empty(), record.symbol.is_empty()) {
        (false, false) => format!("{} ({})", record.name, record.symbol),
        (false, true) => record.name.clone(),
        (true, false) => record.symbol.clone(),
        (true, true) => "Unknown".to_string(),
    }
}

/// Banner lines for envelopes that did not come from a clean live fetch.
pub fn notice_lines(envelope: &ResultEnvelope) -> Vec<String> {
    match &envelope.notice {
        Some(AcquireNotice::Fallback { reason }) => {
            let mut lines = vec![
                "!! Showing sample data: the live sentiment feed is unavailable.".to_string(),
            ];
            if reason.is_configuration() {
                lines.push("!! The API key is not configured on the proxy.".to_string());
            }
            lines.push(format!("!! Reason: {}", reason));
            lines
        }
        Some(AcquireNotice::MissingDataField) => {
            vec!["!! The live feed answered without a coin list.".to_string()]
        }
        None => Vec::new(),
    }
}

fn render_cards(out: &mut String, records: &[NormalizedRecord]) {
    for record in records {
        let _ = writeln!(out, "#{} {}", format_rank(record.rank), display_name(record));
        let _ = writeln!(
            out,
            "    Price {}   24h {}   7d {}",
            format_price(record.price),
            format_percent(record.percent_change_24h),
            format_percent(record.percent_change_7d),
        );
        let _ = writeln!(
            out,
            "    Sentiment {}   Galaxy {}   Market cap {}   Volume {}",
            format_score(record.sentiment),
            format_score(record.galaxy_score),
            format_compact(record.market_cap),
            format_compact(record.volume_24h),
        );
        out.push('\n');
    }
}

fn render_table(out: &mut String, records: &[NormalizedRecord]) {
    let _ = writeln!(
        out,
        "{:>5}  {:<8} {:<18} {:>14} {:>9} {:>9} {:>9} {:>7} {:>11} {:>11}",
        "Rank", "Symbol", "Name", "Price", "24h", "7d", "Sentiment", "Galaxy", "Market cap", "Volume"
    );
    for record in records {
        let _ = writeln!(
            out,
            "{:>5}  {:<8} {:<18} {:>14} {:>9} {:>9} {:>9} {:>7} {:>11} {:>11}",
            format_rank(record.rank),
            truncate(&record.symbol, 8),
            truncate(&record.name, 18),
            format_price(record.price),
            format_percent(record.percent_change_24h),
            format_percent(record.percent_change_7d),
            format_score(record.sentiment),
            format_score(record.galaxy_score),
            format_compact(record.market_cap),
            format_compact(record.volume_24h),
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Render the whole envelope in `mode`.
pub fn render(envelope: &ResultEnvelope, mode: ViewMode) -> String {
    let mut out = String::new();

    for line in notice_lines(envelope) {
        out.push_str(&line);
        out.push('\n');
    }

    let source = if envelope.is_synthetic { "sample" } else { "live" };
    let _ = writeln!(
        out,
        "{} coins ({} data, updated {})",
        envelope.len(),
        source,
        envelope.fetched_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    out.push('\n');

    if envelope.is_empty() {
        out.push_str("No coins to display.\n");
        return out;
    }

    match mode {
        ViewMode::Cards => render_cards(&mut out, &envelope.records),
        ViewMode::Table => render_table(&mut out, &envelope.records),
    }
    out
}
