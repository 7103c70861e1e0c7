use clap::Parser;
use ensemble_analyzer::cli::{
    analyze::analyze_from_params_file,
    args::{CommandsEnum, EnsembleAnalyzerArgs},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: EnsembleAnalyzerArgs = EnsembleAnalyzerArgs::parse();

    let max_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .init();

    match &args.command {
        Some(CommandsEnum::Analyze(params)) => {
            analyze_from_params_file(params)?;
        }
        None => {
            println!("Default command (nothing specified!)");
        }
    }
    Ok(())
}
