//! Kaiming/He weight initialization (He et al., 2015) for `ReLU` layers.

use rand::rngs::StdRng;
use rand::Rng;

/// Kaiming uniform initialization.
///
/// Samples `n` values from U(-bound, bound) where bound = sqrt(6 / `fan_in`).
#[must_use]
pub fn kaiming_uniform(n: usize, fan_in: usize, rng: &mut StdRng) -> Vec<f32> {
    let bound = (6.0 / fan_in.max(1) as f32).sqrt();
    uniform(n, -bound, bound, rng)
}

fn uniform(n: usize, low: f32, high: f32, rng: &mut StdRng) -> Vec<f32> {
    (0..n).map(|_| rng.gen_range(low..high)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_kaiming_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let w = kaiming_uniform(1000, 4, &mut rng);
        let bound = (6.0_f32 / 4.0).sqrt();
        assert_eq!(w.len(), 1000);
        assert!(w.iter().all(|v| v.abs() <= bound));
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let a = kaiming_uniform(16, 8, &mut StdRng::seed_from_u64(1));
        let b = kaiming_uniform(16, 8, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }
}
