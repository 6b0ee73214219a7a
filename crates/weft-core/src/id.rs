use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const BASE62_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const LENGTH: usize = 26;
const TIME_DIGITS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Conversation,
    Message,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Conversation => "cnv",
            Prefix::Message => "msg",
        }
    }
}

static LAST_TIMESTAMP: AtomicU64 = AtomicU64::new(0);
static COUNTER: Mutex<u32> = Mutex::new(0);

fn random_base62(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut result = String::with_capacity(length);
    for _ in 0..length {
        let idx = rng.gen_range(0..62);
        result.push(BASE62_CHARS[idx] as char);
    }
    result
}

/// Bumps the per-millisecond counter, resetting it when the clock moved.
fn next_counter(current_timestamp: u64) -> u32 {
    let mut counter = COUNTER.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let last = LAST_TIMESTAMP.swap(current_timestamp, Ordering::Relaxed);
    if current_timestamp != last {
        *counter = 0;
    }
    *counter = counter.wrapping_add(1) & 0xfff;
    *counter
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Creates an id of the form `<prefix>_<16 hex time digits><10 base62 chars>`.
///
/// Ids created in the same process sort by creation time.
pub fn create(prefix: Prefix, timestamp: Option<u64>) -> String {
    let current_timestamp = timestamp.unwrap_or_else(now_millis);
    let counter_val = next_counter(current_timestamp);
    let now = current_timestamp * 0x1000 + u64::from(counter_val);

    let hex_time = hex::encode(now.to_be_bytes());
    let random_part = random_base62(LENGTH - TIME_DIGITS);

    format!("{}_{}{}", prefix.as_str(), hex_time, random_part)
}

pub fn message() -> String {
    create(Prefix::Message, None)
}

pub fn conversation() -> String {
    create(Prefix::Conversation, None)
}

/// Recovers the millisecond timestamp encoded in an id.
pub fn timestamp(id: &str) -> Option<u64> {
    let (_, rest) = id.split_once('_')?;
    let hex = rest.get(0..TIME_DIGITS)?;
    let encoded = u64::from_str_radix(hex, 16).ok()?;
    Some(encoded / 0x1000)
}

pub fn validate_prefix(id: &str, expected: Prefix) -> bool {
    id.split_once('_')
        .is_some_and(|(prefix, _)| prefix == expected.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_id() {
        let id = create(Prefix::Message, None);
        assert!(id.starts_with("msg_"));
        assert_eq!(id.len(), 30);
    }

    #[test]
    fn test_timestamp_extraction() {
        let ts = 1_700_000_000_000;
        let id = create(Prefix::Conversation, Some(ts));
        assert_eq!(timestamp(&id), Some(ts));
    }

    #[test]
    fn test_ids_sort_by_creation() {
        let first = create(Prefix::Message, Some(1_700_000_000_000));
        let second = create(Prefix::Message, Some(1_700_000_000_001));
        assert!(first < second);
    }

    #[test]
    fn test_validate_prefix() {
        let id = conversation();
        assert!(validate_prefix(&id, Prefix::Conversation));
        assert!(!validate_prefix(&id, Prefix::Message));
        assert!(!validate_prefix("cnvx_123", Prefix::Conversation));
    }
}
