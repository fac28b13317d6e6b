//! TSID Generation
//!
//! Time-sorted record identifiers encoded as 13-character Crockford
//! Base32 strings. Lexicographic order follows creation time, which
//! keeps listings sorted without a secondary index.

use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

// 22 low bits hold a per-process counter seeded randomly at startup,
// so ids generated within the same millisecond stay unique and ordered.
const COUNTER_BITS: u32 = 22;
const COUNTER_MASK: u64 = (1 << COUNTER_BITS) - 1;

static COUNTER: AtomicU64 = AtomicU64::new(0);
static COUNTER_SEEDED: AtomicU64 = AtomicU64::new(0);

pub struct TsidGenerator;

impl TsidGenerator {
    /// Generate a new 13-character TSID.
    pub fn generate() -> String {
        if COUNTER_SEEDED.swap(1, Ordering::Relaxed) == 0 {
            let seed: u64 = rand::thread_rng().gen_range(0..=COUNTER_MASK);
            COUNTER.store(seed, Ordering::Relaxed);
        }

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let seq = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        let value = (millis << COUNTER_BITS) | seq;

        Self::encode(value)
    }

    fn encode(mut value: u64) -> String {
        let mut buf = [b'0'; 13];
        for slot in buf.iter_mut().rev() {
            *slot = CROCKFORD[(value & 0x1F) as usize];
            value >>= 5;
        }
        // Safe: buf only ever holds Crockford alphabet bytes.
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tsid_format() {
        let id = TsidGenerator::generate();
        assert_eq!(id.len(), 13);
        assert!(id.chars().all(|c| {
            matches!(c, '0'..='9' | 'A'..='H' | 'J'..='K' | 'M'..='N' | 'P'..='T' | 'V'..='Z')
        }));
    }

    #[test]
    fn test_tsid_uniqueness() {
        let ids: HashSet<String> = (0..1000).map(|_| TsidGenerator::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_tsid_sortability() {
        let id1 = TsidGenerator::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = TsidGenerator::generate();
        assert!(id2 > id1, "id2 ({}) should sort after id1 ({})", id2, id1);
    }
}
