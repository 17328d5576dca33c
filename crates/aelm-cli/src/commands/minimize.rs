use crate::cli::MinimizeArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use aelm::{
    core::io::{traits::TrajectoryFile, xyz::XyzFile},
    engine::progress::ProgressReporter,
    workflows,
};
use tracing::info;

pub fn run(args: MinimizeArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args)?;
    let config = &app_config.core_config;

    info!("Loading biased trajectory from {:?}", &app_config.input_path);
    let frames = XyzFile::read_all_from_path(&app_config.input_path).map_err(|e| {
        CliError::FileParsing {
            path: app_config.input_path.clone(),
            source: e.into(),
        }
    })?;
    info!("Read {} frame(s).", frames.len());

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Minimizing {} frame(s) with {}...",
        frames.len(),
        config.backend
    );
    let result = workflows::minimize::run(frames, config, &reporter)?;

    if let Some(path) = &app_config.energies_path {
        info!("Writing energy table to {:?}", path);
        result
            .energies
            .write_csv_to_path(path)
            .map_err(|e| CliError::FileWriting {
                path: path.clone(),
                source: e.into(),
            })?;
        println!("✓ Energies written to: {}", path.display());
    }
    if let Some(path) = &config.output_path {
        println!("✓ Relaxed trajectory written to: {}", path.display());
    }

    println!(
        "Workflow complete. {} frame(s) relaxed.",
        result.relaxed_frames.len()
    );
    Ok(())
}
