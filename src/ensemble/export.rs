//! Plain-text dumps of an analysis for external plotting tools. Every table is
//! whitespace delimited with a single `#` header line and one row per time sample.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::core::file_io::FilePrefix;

use super::{distance::pair_indices, pipeline::EnsembleAnalysis, Trajectory};

/// Scalar results of a run, written next to the tables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisSummary {
    pub seed: u64,
    pub member_count: usize,
    pub sample_count: usize,
    pub pair_count: usize,
    pub growth_fit_window: usize,
    pub growth_rate: f64,
    pub growth_intercept: f64,
}

impl AnalysisSummary {
    pub fn new(analysis: &EnsembleAnalysis, seed: u64) -> Self {
        AnalysisSummary {
            seed,
            member_count: analysis.ensemble.member_count(),
            sample_count: analysis.ensemble.time_grid.len(),
            pair_count: analysis.distances.len(),
            growth_fit_window: analysis.growth_fit.times.len(),
            growth_rate: analysis.growth_fit.slope,
            growth_intercept: analysis.growth_fit.intercept,
        }
    }
}

fn write_row<W: Write>(writer: &mut W, t: f64, values: impl Iterator<Item = f64>) -> io::Result<()> {
    write!(writer, "{:.10e}", t)?;
    for value in values {
        write!(writer, " {:.16e}", value)?;
    }
    writeln!(writer)
}

/// `t x_0 y_0 z_0 x_1 y_1 z_1 ...`
pub fn write_trajectories<W: Write>(
    writer: &mut W,
    time_grid: &[f64],
    trajectories: &[Trajectory],
) -> io::Result<()> {
    write!(writer, "# t")?;
    for member in 0..trajectories.len() {
        write!(writer, " x_{0} y_{0} z_{0}", member)?;
    }
    writeln!(writer)?;
    for (k, &t) in time_grid.iter().enumerate() {
        write_row(
            writer,
            t,
            trajectories
                .iter()
                .flat_map(|trajectory| trajectory[k].iter().copied()),
        )?;
    }
    Ok(())
}

pub fn write_state_statistics<W: Write>(writer: &mut W, analysis: &EnsembleAnalysis) -> io::Result<()> {
    writeln!(writer, "# t mean_x mean_y mean_z disp_x disp_y disp_z")?;
    let stats = &analysis.state_statistics;
    for (k, &t) in analysis.ensemble.time_grid.iter().enumerate() {
        write_row(
            writer,
            t,
            stats.mean[k].iter().chain(stats.dispersion[k].iter()).copied(),
        )?;
    }
    Ok(())
}

/// `t d_1_0 d_2_0 d_2_1 ... mean dispersion`
pub fn write_distances<W: Write>(writer: &mut W, analysis: &EnsembleAnalysis) -> io::Result<()> {
    write!(writer, "# t")?;
    for (i, j) in pair_indices(analysis.ensemble.member_count()) {
        write!(writer, " d_{}_{}", i, j)?;
    }
    writeln!(writer, " mean dispersion")?;
    let stats = &analysis.distance_statistics;
    for (k, &t) in analysis.ensemble.time_grid.iter().enumerate() {
        write_row(
            writer,
            t,
            analysis
                .distances
                .iter()
                .map(|series| series[k])
                .chain([stats.mean[k], stats.dispersion[k]].iter().copied()),
        )?;
    }
    Ok(())
}

pub fn write_growth_fit<W: Write>(writer: &mut W, analysis: &EnsembleAnalysis) -> io::Result<()> {
    writeln!(writer, "# t mean_distance fit")?;
    let fit = &analysis.growth_fit;
    for (k, (&t, &curve)) in fit.times.iter().zip(fit.curve.iter()).enumerate() {
        write_row(
            writer,
            t,
            [analysis.distance_statistics.mean[k], curve].iter().copied(),
        )?;
    }
    Ok(())
}

/// Every file the `analyze` command produces, except the parameter echo and
/// the diagnostics, which the caller writes.
pub fn export_analysis(
    analysis: &EnsembleAnalysis,
    seed: u64,
    displacement_count: usize,
    file_prefix: &FilePrefix,
) -> Result<(), Box<dyn std::error::Error>> {
    let time_grid = &analysis.ensemble.time_grid;

    let mut file = file_prefix.create_file_with_suffix("_trajectories.txt")?;
    write_trajectories(&mut file, time_grid, &analysis.ensemble.trajectories)?;
    file.flush()?;

    let mut file = file_prefix.create_file_with_suffix("_ensemble_stats.txt")?;
    write_state_statistics(&mut file, analysis)?;
    file.flush()?;

    let mut file = file_prefix.create_file_with_suffix("_distances.txt")?;
    write_distances(&mut file, analysis)?;
    file.flush()?;

    let mut file = file_prefix.create_file_with_suffix("_growth_fit.txt")?;
    write_growth_fit(&mut file, analysis)?;
    file.flush()?;

    let mut file = file_prefix.create_file_with_suffix("_displacements.txt")?;
    write_trajectories(&mut file, time_grid, &analysis.leading_displacements(displacement_count)?)?;
    file.flush()?;

    file_prefix.serialize_to_json_with_suffix("_summary.json", &AnalysisSummary::new(analysis, seed))?;
    Ok(())
}
