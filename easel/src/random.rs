use std::time::{SystemTime, UNIX_EPOCH};

/// Seedable uniform generator (splitmix64). The same seed always replays
/// the same sequence.
#[derive(Debug, Clone)]
pub struct Random {
    state: u64,
}

impl Random {
    pub fn new(seed: u64) -> Random {
        Random { state: seed }
    }

    /// Seeded from the wall clock.
    pub fn from_clock() -> Random {
        Random::new(clock_seed())
    }

    pub fn seed(&mut self, seed: u64) {
        self.state = seed;
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        // 24 random mantissa bits keep the result strictly below one
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Uniform in `[low, high)`; the bounds may be given in either order.
    pub fn range(&mut self, low: f32, high: f32) -> f32 {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        low + (high - low) * self.next_f32()
    }

    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }
}

pub(crate) fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Random::new(42);
        let mut b = Random::new(42);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let mut c = Random::new(43);
        assert_ne!(Random::new(42).next_u64(), c.next_u64());
    }

    #[test]
    fn values_in_range() {
        let mut rng = Random::new(7);
        for _ in 0..1000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v));
            let r = rng.range(10.0, 5.0);
            assert!((5.0..10.0).contains(&r));
        }
    }

    #[test]
    fn choose_from_slice() {
        let mut rng = Random::new(1);
        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
        let items = [1, 2, 3];
        for _ in 0..20 {
            assert!(items.contains(rng.choose(&items).unwrap()));
        }
    }
}
