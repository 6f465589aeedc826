use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Source of the random jitter applied to forecasts.
pub trait NoiseSource {
    /// A sample from a zero-mean normal distribution with the given standard deviation.
    fn normal(&mut self, std_dev: f64) -> f64;

    /// A sample from the half-open interval `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// Jitter drawn from a real random number generator.
pub struct RandNoise<R: Rng = StdRng> {
    rng: R,
}

impl RandNoise<StdRng> {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible noise: the same seed yields the same sequence of samples.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandNoise<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NoiseSource for RandNoise<R> {
    fn normal(&mut self, std_dev: f64) -> f64 {
        let std_dev = std_dev.abs();
        if std_dev == 0.0 || !std_dev.is_finite() {
            return 0.0;
        }
        match Normal::new(0.0, std_dev) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => 0.0,
        }
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.rng.gen_range(low..high)
    }
}

/// No jitter at all: normals are 0 and uniforms sit at the middle of their range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn normal(&mut self, _std_dev: f64) -> f64 {
        0.0
    }

    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        (low + high) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = RandNoise::seeded(7);
        let mut b = RandNoise::seeded(7);

        for _ in 0..20 {
            assert_eq!(a.normal(5.0), b.normal(5.0));
            assert_eq!(a.uniform(-0.1, 0.1), b.uniform(-0.1, 0.1));
        }
    }

    #[test]
    fn test_uniform_stays_in_range() {
        let mut noise = RandNoise::seeded(42);
        for _ in 0..1000 {
            let u = noise.uniform(-0.1, 0.1);
            assert!((-0.1..0.1).contains(&u));
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut noise = RandNoise::seeded(1);
        assert_eq!(noise.normal(0.0), 0.0);
        assert_eq!(noise.normal(f64::NAN), 0.0);
        assert_eq!(noise.uniform(0.5, 0.5), 0.5);
    }

    #[test]
    fn test_zero_noise() {
        let mut noise = ZeroNoise;
        assert_eq!(noise.normal(100.0), 0.0);
        assert_eq!(noise.uniform(-0.1, 0.1), 0.0);
    }
}
