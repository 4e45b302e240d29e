//! Uniform load source
//!
//! Every server load is an independent U(0, 1) draw. This is the baseline
//! server-load model: the expected minimum of k such loads is 1 / (k + 1).

use super::sampling::uniform_unit;
use super::LoadSource;
use crate::error::SimResult;
use rand::Rng;

/// Loads drawn uniformly from [0, 1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformLoad;

impl LoadSource for UniformLoad {
    #[inline(always)]
    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> SimResult<f64> {
        Ok(uniform_unit(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::sampling::rng_from_seed;

    #[test]
    fn test_uniform_load_mean() {
        let mut rng = rng_from_seed(Some(42));
        let loads = UniformLoad.draw_loads(10000, &mut rng).unwrap();
        let mean = loads.iter().sum::<f64>() / loads.len() as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean {} too far from 0.5", mean);
    }

    #[test]
    fn test_uniform_load_empty() {
        let mut rng = rng_from_seed(Some(1));
        assert!(UniformLoad.draw_loads(0, &mut rng).unwrap().is_empty());
    }
}
