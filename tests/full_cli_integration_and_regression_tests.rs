use std::process::Command;

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};

fn compute_file_hash(file_path: &str) -> Result<String, io::Error> {
    let mut file = File::open(file_path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let mut hasher = Sha256::new();
    hasher.update(&buffer);
    Ok(format!("{:x}", hasher.finalize()))
}

fn run_analyzer(args: &[&str]) {
    let status = Command::new(env!("CARGO_BIN_EXE_ensemble-analyzer"))
        .args(args)
        .status()
        .expect("failed to execute process");
    assert!(status.success(), "ensemble-analyzer {:?} failed", args);
}

#[cfg(test)]
mod tests {
    use crate::{compute_file_hash, run_analyzer};
    use ensemble_analyzer::ensemble::export::AnalysisSummary;

    const OUT_DIR: &str = "out/analyze/lorenz_tiny";

    #[test]
    fn test_analyze_is_reproducible_for_a_fixed_seed() {
        let params = "./tests/param_files/lorenz_tiny.json";
        let output_files = [
            "lorenz_tiny_trajectories.txt",
            "lorenz_tiny_ensemble_stats.txt",
            "lorenz_tiny_distances.txt",
            "lorenz_tiny_growth_fit.txt",
            "lorenz_tiny_displacements.txt",
            "lorenz_tiny_summary.json",
        ];
        let hash_all = || -> Vec<String> {
            output_files
                .iter()
                .map(|name| compute_file_hash(&format!("{}/{}", OUT_DIR, name)).unwrap())
                .collect()
        };

        run_analyzer(&["analyze", params]);
        let first = hash_all();
        run_analyzer(&["analyze", params]);
        let second = hash_all();
        assert_eq!(first, second);

        let summary: AnalysisSummary = serde_json::from_str(
            &std::fs::read_to_string(format!("{}/lorenz_tiny_summary.json", OUT_DIR)).unwrap(),
        )
        .unwrap();
        assert_eq!(summary.seed, 12345);
        assert_eq!(summary.member_count, 3);
        assert_eq!(summary.sample_count, 120);
        assert_eq!(summary.pair_count, 3);
        assert_eq!(summary.growth_fit_window, 90);
        assert!(summary.growth_rate.is_finite());

        let distances =
            std::fs::read_to_string(format!("{}/lorenz_tiny_distances.txt", OUT_DIR)).unwrap();
        assert_eq!(
            distances.lines().next().unwrap(),
            "# t d_1_0 d_2_0 d_2_1 mean dispersion"
        );
        assert_eq!(distances.lines().count(), 121);
    }

    #[test]
    fn test_missing_params_file_fails() {
        let status = std::process::Command::new(env!("CARGO_BIN_EXE_ensemble-analyzer"))
            .args(["analyze", "./tests/param_files/does_not_exist.json"])
            .status()
            .expect("failed to execute process");
        assert!(!status.success());
    }
}
