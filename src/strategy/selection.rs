//! Continuous least-loaded selection

use crate::distribution::sampling::sample_without_replacement;
use crate::error::{SimError, SimResult};
use rand::Rng;

/// Minimum load among `k` distinct servers chosen uniformly at random
///
/// Fails with `InvalidArgument` if `k` is zero or exceeds the number of
/// servers.
pub fn min_of_sampled<R: Rng + ?Sized>(loads: &[f64], k: usize, rng: &mut R) -> SimResult<f64> {
    if k == 0 {
        return Err(SimError::invalid_argument("selection width k must be at least 1"));
    }

    let picked = sample_without_replacement(rng, loads.len(), k)?;
    Ok(picked
        .into_iter()
        .map(|i| loads[i])
        .fold(f64::INFINITY, f64::min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::sampling::rng_from_seed;

    #[test]
    fn test_min_of_all_is_global_min() {
        let mut rng = rng_from_seed(Some(2));
        let loads = [0.7, 0.2, 0.9, 0.4];
        assert_eq!(min_of_sampled(&loads, 4, &mut rng).unwrap(), 0.2);
    }

    #[test]
    fn test_min_of_one_is_a_member() {
        let mut rng = rng_from_seed(Some(2));
        let loads = [0.7, 0.2, 0.9, 0.4];
        for _ in 0..20 {
            let x = min_of_sampled(&loads, 1, &mut rng).unwrap();
            assert!(loads.contains(&x));
        }
    }

    #[test]
    fn test_invalid_width() {
        let mut rng = rng_from_seed(Some(2));
        let loads = [0.5, 0.5];
        assert!(matches!(
            min_of_sampled(&loads, 0, &mut rng),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(
            min_of_sampled(&loads, 3, &mut rng),
            Err(SimError::InvalidArgument(_))
        ));
    }
}
