//! Sensitivity of the Lorenz system to initial conditions, measured on an
//! ensemble of trajectories started from tiny Gaussian perturbations of a
//! common state.

use nalgebra::Vector3;

pub mod distance;
pub mod error;
pub mod export;
pub mod growth_fit;
pub mod integrator;
pub mod params;
pub mod pipeline;
pub mod statistics;

/// One member's state at every sample of the shared time grid.
pub type Trajectory = Vec<Vector3<f64>>;

/// `(3, sample_count)`: rows are the x, y, z components, columns the time samples.
pub fn trajectory_shape(trajectory: &Trajectory) -> (usize, usize) {
    (3, trajectory.len())
}

/// Time series of one state component (0 = x, 1 = y, 2 = z).
pub fn trajectory_component(trajectory: &Trajectory, component: usize) -> Vec<f64> {
    trajectory.iter().map(|state| state[component]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trajectory_accessors() {
        let trajectory = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)];
        assert_eq!(trajectory_shape(&trajectory), (3, 2));
        assert_eq!(trajectory_component(&trajectory, 1), vec![2.0, 5.0]);
    }
}
