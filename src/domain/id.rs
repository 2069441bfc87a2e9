//! Identifier & timestamp assignment for new documents.
//!
//! Generated ids are time-ordered and collision-resistant, not guaranteed
//! unique: `[prefix-]<unix-millis>-<9 random base36 chars>`. The database's
//! unique constraint on `id` is the final arbiter.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Id generator parameterized by an optional resource prefix.
///
/// One generator scheme serves every resource; resources that historically
/// used prefixed keys (vouchers, notifications) configure a prefix instead of
/// carrying their own generation code.
pub struct IdGenerator {
    prefix: Option<String>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { prefix: None }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Produces a fresh id: current Unix time in milliseconds plus a random
    /// base36 suffix, with the configured prefix (if any) in front.
    pub fn generate(&self) -> String {
        let millis = Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();

        match &self.prefix {
            Some(prefix) => format!("{}-{}-{}", prefix, millis, suffix),
            None => format!("{}-{}", millis, suffix),
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time as an RFC 3339 UTC string with millisecond precision,
/// the format stored in `createdAt` fields.
pub fn created_at_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_base36(s: &str) -> bool {
        s.chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    }

    #[test]
    fn generates_millis_and_base36_suffix() {
        let id = IdGenerator::new().generate();
        let (millis, suffix) = id.split_once('-').expect("id must contain '-'");
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(suffix.len(), 9);
        assert!(is_base36(suffix));
    }

    #[test]
    fn prefixed_ids_keep_the_same_shape() {
        let id = IdGenerator::with_prefix("voucher").generate();
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some("voucher"));
        let millis = parts.next().unwrap();
        let suffix = parts.next().unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(suffix.len(), 9);
        assert!(is_base36(suffix));
    }

    #[test]
    fn consecutive_ids_differ() {
        let gen = IdGenerator::new();
        assert_ne!(gen.generate(), gen.generate());
    }

    #[test]
    fn created_at_is_rfc3339_utc() {
        let ts = created_at_now();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
