//! Collection of simple dynamical systems

use nalgebra::Vector3;

#[cfg(test)]
use nalgebra::Vector2;

/// Prandtl number.
pub const LORENZ_SIGMA: f64 = 10.0;
/// Rayleigh number, in the chaotic regime.
pub const LORENZ_RHO: f64 = 28.0;
/// Geometric factor.
pub const LORENZ_BETA: f64 = 8.0 / 3.0;

/**
 * Right-hand side of the Lorenz equations with the classic chaotic parameters:
 *
 *   x' = sigma * (y - x)
 *   y' = x * (rho - z) - y
 *   z' = x * y - beta * z
 *
 * The system is autonomous, so `_t` is ignored.
 */
pub fn lorenz_dynamics(_t: f64, state: Vector3<f64>) -> Vector3<f64> {
    let x = state[0];
    let y = state[1];
    let z = state[2];
    Vector3::new(
        LORENZ_SIGMA * (y - x),
        x * (LORENZ_RHO - z) - y,
        x * y - LORENZ_BETA * z,
    )
}

/// The three fixed points of the Lorenz system: the origin, then C+ and C-.
pub fn lorenz_equilibria() -> [Vector3<f64>; 3] {
    let r = (LORENZ_BETA * (LORENZ_RHO - 1.0)).sqrt();
    let z = LORENZ_RHO - 1.0;
    [
        Vector3::zeros(),
        Vector3::new(r, r, z),
        Vector3::new(-r, -r, z),
    ]
}

/// Undamped linear oscillator `q'' = -omega^2 q`, used to check the solvers
/// against a closed-form solution.
#[cfg(test)]
pub struct HarmonicOscillator {
    pub omega: f64,
}

#[cfg(test)]
impl HarmonicOscillator {
    /// State `[q, v]` at time `t`, starting from `x0` at `t = 0`.
    pub fn evaluate_solution(&self, t: f64, x0: &Vector2<f64>) -> Vector2<f64> {
        let w = self.omega;
        let (sin, cos) = (w * t).sin_cos();
        let q = x0[0] * cos + (x0[1] / w) * sin;
        let v = -x0[0] * w * sin + x0[1] * cos;
        Vector2::new(q, v)
    }

    pub fn system_dynamics(&self) -> impl Fn(f64, Vector2<f64>) -> Vector2<f64> {
        let w_sq = self.omega * self.omega;
        move |_, state: Vector2<f64>| Vector2::new(state[1], -w_sq * state[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lorenz_x_rate_vanishes_on_diagonal() {
        for &(v, z) in &[(0.0, 0.0), (1.5, -3.0), (-7.25, 40.0), (1e6, 1e-6)] {
            let rate = lorenz_dynamics(0.0, Vector3::new(v, v, z));
            assert_eq!(rate[0], 0.0);
        }
    }

    #[test]
    fn test_lorenz_origin_is_exact_fixed_point() {
        assert_eq!(lorenz_dynamics(12.0, Vector3::zeros()), Vector3::zeros());
    }

    #[test]
    fn test_lorenz_nontrivial_equilibria() {
        for equilibrium in lorenz_equilibria().iter() {
            let rate = lorenz_dynamics(0.0, *equilibrium);
            assert_relative_eq!(rate, Vector3::zeros(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lorenz_is_autonomous() {
        let state = Vector3::new(2.0, 3.0, -14.0);
        assert_eq!(lorenz_dynamics(0.0, state), lorenz_dynamics(35.0, state));
        assert_eq!(lorenz_dynamics(0.0, state), Vector3::new(10.0, 81.0, 6.0 + 14.0 * LORENZ_BETA));
    }

    #[test]
    fn test_harmonic_oscillator_energy_is_conserved() {
        let oscillator = HarmonicOscillator { omega: 2.0 };
        let x0 = Vector2::new(1.0, 0.5);
        let energy = |x: &Vector2<f64>| 4.0 * x[0] * x[0] + x[1] * x[1];
        for i in 0..10 {
            let x = oscillator.evaluate_solution(0.37 * (i as f64), &x0);
            assert_relative_eq!(energy(&x), energy(&x0), epsilon = 1e-12);
        }
    }
}
