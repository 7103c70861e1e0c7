use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct EnsembleAnalyzerArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,

    /// Log per-member solver statistics and stage timings.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Integrate a perturbed Lorenz ensemble and estimate its growth rate.
    Analyze(ParameterFilePath),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,

    /// Write into a time-stamped sub-directory of the output folder.
    #[clap(long, short)]
    pub date_time_out: bool,

    /// Overrides the `seed` in the parameter file.
    #[clap(long, short)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_command() {
        let args = EnsembleAnalyzerArgs::parse_from([
            "ensemble-analyzer",
            "analyze",
            "demos/lorenz_ensemble/lorenz_default.json",
            "--seed",
            "17",
            "-v",
        ]);
        assert!(args.verbose);
        match args.command {
            Some(CommandsEnum::Analyze(params)) => {
                assert_eq!(params.params_path, "demos/lorenz_ensemble/lorenz_default.json");
                assert_eq!(params.seed, Some(17));
                assert!(!params.date_time_out);
            }
            None => panic!("expected the analyze command"),
        }
    }

    #[test]
    fn test_no_command() {
        let args = EnsembleAnalyzerArgs::parse_from(["ensemble-analyzer"]);
        assert!(args.command.is_none());
        assert!(!args.verbose);
    }
}
