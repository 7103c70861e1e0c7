use std::{io::Write, path::PathBuf};

use rand::SeedableRng;

use crate::{
    core::{
        file_io::{
            build_output_path_with_date_time, deserialize_from_json_file, extract_base_name,
            maybe_date_time_string, FilePrefix,
        },
        stopwatch::Stopwatch,
    },
    ensemble::{export::export_analysis, params::EnsembleParams, pipeline::analyze_ensemble},
};

use super::args::ParameterFilePath;

/// Seed from the command line, then the parameter file, then fresh entropy.
fn resolve_seed(cli_seed: Option<u64>, params: &EnsembleParams) -> u64 {
    match cli_seed.or(params.seed) {
        Some(seed) => seed,
        None => {
            let seed = rand::random();
            tracing::warn!(seed, "no seed supplied; the run is reproducible only with this seed");
            seed
        }
    }
}

/**
 * Loads the parameter file, runs the ensemble analysis, and writes every
 * output table to `out/analyze/<params base name>/`. Returns that directory.
 */
pub fn analyze_from_params_file(
    args: &ParameterFilePath,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut stopwatch = Stopwatch::new("Ensemble Analysis Stopwatch");

    let mut params: EnsembleParams = deserialize_from_json_file(&args.params_path)?;
    let seed = resolve_seed(args.seed, &params);
    params.seed = Some(seed);
    params.validate()?;

    let file_prefix = FilePrefix {
        directory_path: build_output_path_with_date_time(
            &args.params_path,
            "analyze",
            maybe_date_time_string(args.date_time_out).as_deref(),
        )?,
        file_base: extract_base_name(&args.params_path)?.to_owned(),
    };
    file_prefix.serialize_to_json_with_suffix(".json", &params)?;
    tracing::info!(params = %args.params_path, seed, "loaded parameters");
    stopwatch.record_split("setup");

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let analysis = analyze_ensemble(&params, &mut rng, &mut stopwatch)?;

    export_analysis(
        &analysis,
        seed,
        params.displacement_export_count,
        &file_prefix,
    )?;
    stopwatch.record_split("write_output");

    let mut diagnostics = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    stopwatch.display(&mut diagnostics)?;
    diagnostics.flush()?;

    tracing::info!(
        directory = %file_prefix.directory_path.display(),
        "wrote analysis output"
    );
    Ok(file_prefix.directory_path)
}
