use chrono::{DateTime, Utc};
use uuid::Uuid;

pub const ORDER_NUMBER_PREFIX: &str = "FS";
pub const SELL_INQUIRY: &str = "sell_inquiry";

/// Split `shipping` across `lines` line items.
///
/// Every line gets the integer share and the last line also takes the
/// remainder, so the parts always add back up to `shipping`.
pub fn allocate_shipping(shipping: i64, lines: usize) -> Vec<i64> {
    if lines == 0 {
        return Vec::new();
    }
    let count = lines as i64;
    let share = shipping / count;
    let remainder = shipping % count;
    let mut parts = vec![share; lines];
    if let Some(last) = parts.last_mut() {
        *last += remainder;
    }
    parts
}

/// Submission-wide order number; all line-item tracking numbers start with it.
pub fn generate_order_number(now: DateTime<Utc>, salt: Uuid) -> String {
    let simple = salt.simple().to_string();
    format!(
        "{ORDER_NUMBER_PREFIX}-{}-{}",
        now.timestamp_millis(),
        &simple[..8]
    )
}

/// Tracking number of the `index`-th (0-based) line item.
pub fn line_tracking_number(order_number: &str, index: usize) -> String {
    format!("{order_number}-{}", index + 1)
}

/// `LIKE` pattern matching every line item of a submission and nothing else.
pub fn tracking_prefix_pattern(order_number: &str) -> String {
    let escaped = order_number
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("{escaped}-%")
}

/// Cart ids arrive either bare or with the storefront's `gen_` prefix.
pub fn parse_product_id(raw: &str) -> Option<Uuid> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix("gen_").unwrap_or(trimmed);
    Uuid::parse_str(bare).ok()
}

pub fn is_sell_inquiry(kind: Option<&str>) -> bool {
    kind == Some(SELL_INQUIRY)
}
