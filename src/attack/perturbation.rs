//! Ground-truth perturbation applied to attack victims.

use rand::Rng;

use crate::analysis::StateTriple;

/// Lower bound of the speed offset added to a victim's actual speed
pub const SPEED_OFFSET_MIN: f64 = 0.3;
/// Upper bound of the speed offset added to a victim's actual speed
pub const SPEED_OFFSET_MAX: f64 = 0.6;
/// Amount subtracted from a victim's actual centrality reading
pub const CENTRALITY_DROP: f64 = 0.3;

/// Derives a victim's actual state from its predicted state: speed raised by
/// a uniform offset, sensors failed, centrality lowered (floored at 0).
pub fn falsify<R: Rng + ?Sized>(predicted: &StateTriple, rng: &mut R) -> StateTriple {
    StateTriple {
        speed: predicted.speed + rng.gen_range(SPEED_OFFSET_MIN..=SPEED_OFFSET_MAX),
        sensor_ok: 0,
        centrality: (predicted.centrality - CENTRALITY_DROP).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_falsify_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let predicted = StateTriple { speed: 1.0, sensor_ok: 1, centrality: 0.75 };
        for _ in 0..200 {
            let actual = falsify(&predicted, &mut rng);
            let offset = actual.speed - predicted.speed;
            assert!((SPEED_OFFSET_MIN - 1e-12..=SPEED_OFFSET_MAX + 1e-12).contains(&offset));
            assert_eq!(actual.sensor_ok, 0);
            assert!((actual.centrality - 0.45).abs() < 1e-12);
        }
    }

    #[test]
    fn test_centrality_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let predicted = StateTriple { speed: 0.9, sensor_ok: 1, centrality: 0.125 };
        assert_eq!(falsify(&predicted, &mut rng).centrality, 0.0);
    }
}
