use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::MinimizeArgs;
use crate::error::{CliError, Result};
use aelm::core::models::cell::CellInfo;
use aelm::engine::config::{self as core_config, BackendKind, EnergyLayout};
use std::path::{Path, PathBuf};

pub fn build_config(args: &MinimizeArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let backend = match args.backend.as_deref().or(file_config.backend.as_deref()) {
        Some(name) => name
            .parse::<BackendKind>()
            .map_err(|e| CliError::Config(e.to_string()))?,
        None => defaults.backend,
    };
    let backend_defaults = defaults.for_backend(backend);

    let command = args
        .command
        .clone()
        .or(file_config.command.take())
        .unwrap_or_else(|| backend_defaults.command.to_string());

    let mut flags = std::mem::take(&mut file_config.flags);
    for kv_pair in &args.flags {
        let (key, value) = parse_key_value(kv_pair, "--flag")?;
        flags.insert(key.trim_start_matches('-').to_string(), value.to_string());
    }

    let cell = file_config.cell.take().ok_or_else(|| {
        CliError::Config(
            "A [cell] table with the box lengths is required in the config file or via -S cell.box=..."
                .to_string(),
        )
    })?;
    if cell.box_lengths.iter().any(|&length| length <= 0.0) {
        return Err(CliError::Config(format!(
            "Cell box lengths must be positive, got {:?}",
            cell.box_lengths
        )));
    }

    let energy_layout = if args.next_to_last || file_config.next_to_last.unwrap_or(false) {
        EnergyLayout::WithNextToLast
    } else {
        EnergyLayout::InitialFinal
    };
    let verbose = args.print_energies || file_config.verbose.unwrap_or(defaults.verbose);
    let remove_temporary_files = !args.keep_tmp
        && file_config
            .remove_temporary_files
            .unwrap_or(defaults.remove_temporary_files);

    let output_path = args
        .output
        .clone()
        .or(file_config.output.take())
        .map(|path| absolutize(&path))
        .transpose()?;
    let energies_path = args
        .energies
        .clone()
        .or(file_config.energies.take())
        .map(|path| absolutize(&path))
        .transpose()?;

    let core_config = core_config::MinimizationConfigBuilder::new()
        .backend(backend)
        .command(&command)
        .flags(flags)
        .work_dir(
            args.work_dir
                .clone()
                .or(file_config.work_dir.take())
                .unwrap_or_else(|| PathBuf::from(".")),
        )
        .input_path(
            file_config
                .input_file
                .take()
                .unwrap_or_else(|| PathBuf::from(backend_defaults.input_file)),
        )
        .log_path(
            file_config
                .log_file
                .take()
                .unwrap_or_else(|| PathBuf::from(backend_defaults.log_file)),
        )
        .trajectory_path(
            file_config
                .trajectory_file
                .take()
                .unwrap_or_else(|| PathBuf::from(backend_defaults.trajectory_file)),
        )
        .output_path(output_path)
        .cell(cell)
        .energy_layout(energy_layout)
        .verbose(verbose)
        .remove_temporary_files(remove_temporary_files)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        energies_path,
        core_config,
    })
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

fn parse_key_value<'a>(kv_pair: &'a str, option: &str) -> Result<(&'a str, &'a str)> {
    match kv_pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(CliError::Argument(format!(
            "Invalid {} format: '{}'. Expected KEY=VALUE.",
            option, kv_pair
        ))),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid boolean value for {}: {}", key, value)))
}

fn parse_box(key: &str, value: &str) -> Result<[f64; 3]> {
    let lengths = value
        .split(',')
        .map(|token| token.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|_| CliError::Config(format!("Invalid float value for {}: {}", key, value)))?;
    match lengths.as_slice() {
        [cubic] => Ok([*cubic; 3]),
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(CliError::Config(format!(
            "Expected one or three box lengths for {}, got '{}'",
            key, value
        ))),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value_str) = parse_key_value(kv_pair, "--set")?;

        match key {
            "backend" => config.backend = Some(value_str.to_string()),
            "command" => config.command = Some(value_str.to_string()),
            "work-dir" => config.work_dir = Some(PathBuf::from(value_str)),
            "input-file" => config.input_file = Some(PathBuf::from(value_str)),
            "log-file" => config.log_file = Some(PathBuf::from(value_str)),
            "trajectory-file" => config.trajectory_file = Some(PathBuf::from(value_str)),
            "output" => config.output = Some(PathBuf::from(value_str)),
            "energies" => config.energies = Some(PathBuf::from(value_str)),
            "next-to-last" => config.next_to_last = Some(parse_bool(key, value_str)?),
            "verbose" => config.verbose = Some(parse_bool(key, value_str)?),
            "remove-temporary-files" => {
                config.remove_temporary_files = Some(parse_bool(key, value_str)?)
            }
            "cell.box" => {
                let lengths = parse_box(key, value_str)?;
                config
                    .cell
                    .get_or_insert_with(|| CellInfo::new([0.0; 3]))
                    .box_lengths = lengths;
            }
            _ => {
                if let Some(element) = key.strip_prefix("cell.type.") {
                    let code = value_str.parse::<u32>().map_err(|_| {
                        CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                    })?;
                    config
                        .cell
                        .get_or_insert_with(|| CellInfo::new([0.0; 3]))
                        .types
                        .insert(element.to_string(), code);
                } else if let Some(flag) = key.strip_prefix("flags.") {
                    config.flags.insert(flag.to_string(), value_str.to_string());
                } else {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
    }
    Ok(config)
}
