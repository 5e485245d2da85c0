#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }

    /// Uniform integer in the inclusive range `[min, max]`.
    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        (min + (self.next_f32() * span).floor() as i32).min(max)
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, values: &mut [T]) {
        for i in (1..values.len()).rev() {
            let j = self.pick_index(i + 1);
            values.swap(i, j);
        }
    }

    /// Uniform sample of `count` items without replacement. Returns fewer items only when
    /// the pool is smaller than `count`.
    pub fn sample<T: Clone>(&mut self, pool: &[T], count: usize) -> Vec<T> {
        let mut scratch: Vec<T> = pool.to_vec();
        let take = count.min(scratch.len());
        for i in 0..take {
            let j = i + self.pick_index(scratch.len() - i);
            scratch.swap(i, j);
        }
        scratch.truncate(take);
        scratch
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::Rng;

    #[test]
    fn same_seed_yields_same_sequence() {
        let mut a = Rng::new(99);
        let mut b = Rng::new(99);
        for _ in 0..64 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn int_stays_within_inclusive_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..2_000 {
            let value = rng.int(1, 9);
            assert!((1..=9).contains(&value));
        }
        assert_eq!(rng.int(5, 5), 5);
        assert_eq!(rng.int(5, 2), 5);
    }

    #[test]
    fn sample_has_no_duplicates_and_requested_size() {
        let pool: Vec<u32> = (0..50).collect();
        for seed in 1..200u32 {
            let mut rng = Rng::new(seed);
            let picked = rng.sample(&pool, 20);
            assert_eq!(picked.len(), 20);
            let unique: HashSet<u32> = picked.iter().copied().collect();
            assert_eq!(unique.len(), 20);
        }
    }

    #[test]
    fn sample_caps_at_pool_size() {
        let mut rng = Rng::new(3);
        let picked = rng.sample(&[1, 2, 3], 10);
        assert_eq!(picked.len(), 3);
    }

    #[test]
    fn shuffle_keeps_every_element() {
        let mut rng = Rng::new(11);
        let mut values: Vec<u32> = (0..16).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..16).collect::<Vec<_>>());
    }
}
