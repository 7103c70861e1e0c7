pub mod dynamical_systems;
pub mod file_io;
pub mod ode_solvers;
pub mod regression;
pub mod sampling;
pub mod stopwatch;
