use std::sync::atomic::{AtomicI64, Ordering};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Time-based id source.
///
/// Ids are the current UTC millisecond, bumped past the previous id when two
/// are requested within the same millisecond, so they stay unique and
/// strictly increasing for the lifetime of the generator.
#[derive(Debug, Default)]
pub struct MillisIds {
    last: AtomicI64,
}

impl MillisIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        let now = now_millis();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let ids = MillisIds::new();
        let mut prev = 0;
        for _ in 0..1000 {
            let id = ids.next_id();
            assert!(id > prev);
            prev = id;
        }
    }

    #[test]
    fn test_ids_are_time_based() {
        let before = now_millis();
        let id = MillisIds::new().next_id();
        assert!(id >= before);
    }
}
