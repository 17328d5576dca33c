use crate::core::models::frame::Frame;
use crate::engine::backends::{self, MinimizerBackend};
use crate::engine::config::{EnergyLayout, MinimizationConfig};
use crate::engine::energy::EnergyRecord;
use crate::engine::error::EngineError;
use crate::engine::preparer::prepare_frame;
use crate::engine::process::{ProcessRunner, SystemRunner};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::table::EnergyTable;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, instrument, warn};

const VERBOSE_HEADER: &str = "# minimization number, initial energy, final energy";
const VERBOSE_HEADER_WITH_NEXT_TO_LAST: &str =
    "# minimization number, initial energy, next_to_last energy, final energy";

#[derive(Debug, Clone)]
pub struct MinimizationResult {
    /// One row per input frame, in input order.
    pub energies: EnergyTable,
    /// The relaxed configuration of every input frame, in input order.
    pub relaxed_frames: Vec<Frame>,
}

/// Minimizes every frame with the configured external program.
///
/// Equivalent to [`run_with_cancel`] with a cancellation flag that is never raised.
///
/// # Errors
///
/// See [`run_with_runner`].
pub fn run<I>(
    frames: I,
    config: &MinimizationConfig,
    reporter: &ProgressReporter,
) -> Result<MinimizationResult, EngineError>
where
    I: IntoIterator<Item = Frame>,
{
    let never = AtomicBool::new(false);
    run_with_cancel(frames, config, reporter, &never)
}

/// Minimizes every frame, checking `cancel` before each one.
///
/// # Errors
///
/// See [`run_with_runner`].
pub fn run_with_cancel<I>(
    frames: I,
    config: &MinimizationConfig,
    reporter: &ProgressReporter,
    cancel: &AtomicBool,
) -> Result<MinimizationResult, EngineError>
where
    I: IntoIterator<Item = Frame>,
{
    run_with_runner(frames, config, &SystemRunner, reporter, cancel)
}

/// Runs the minimization loop with an explicit process runner.
///
/// Frames are handled strictly one after the other: prepare, write the input file,
/// invoke the minimizer, read its energies and relaxed frame, then remove the scratch
/// files. Output files left by an earlier frame or run are deleted before each
/// invocation. The relaxed trajectory is written once all frames are done, even when
/// there are none. The first failure aborts the run and no partial result is returned.
///
/// # Errors
///
/// - [`EngineError::Lookup`] if a frame holds an element the type mapping lacks.
/// - [`EngineError::Spawn`] if the minimizer cannot be started.
/// - [`EngineError::Extraction`] if the energies of a frame cannot be read.
/// - [`EngineError::Trajectory`] or [`EngineError::Io`] on file failures, including a
///   stale output file that cannot be deleted.
/// - [`EngineError::Cancelled`] if `cancel` is raised between two frames.
#[instrument(skip_all, name = "minimization_workflow", fields(backend = %config.backend))]
pub fn run_with_runner<I>(
    frames: I,
    config: &MinimizationConfig,
    runner: &dyn ProcessRunner,
    reporter: &ProgressReporter,
    cancel: &AtomicBool,
) -> Result<MinimizationResult, EngineError>
where
    I: IntoIterator<Item = Frame>,
{
    let backend = backends::for_kind(config.backend);
    let frames = frames.into_iter();

    let total_frames = match frames.size_hint() {
        (lower, Some(upper)) if lower == upper => Some(lower as u64),
        _ => None,
    };
    reporter.report(Progress::RunStart { total_frames });
    info!(
        command = %config.invocation().command_line(),
        "Starting minimization of {} frames.",
        total_frames.map_or_else(|| "an unknown number of".to_string(), |n| n.to_string())
    );
    if config.verbose {
        reporter.report(Progress::Message(
            verbose_header(config.energy_layout).to_string(),
        ));
    }

    let mut energies = EnergyTable::new(config.energy_layout);
    let mut relaxed_frames = Vec::new();

    for (index, mut frame) in frames.enumerate() {
        if cancel.load(Ordering::Relaxed) {
            info!(processed = index, "Minimization cancelled.");
            return Err(EngineError::Cancelled { processed: index });
        }
        reporter.report(Progress::FrameStart { index });

        let outcome = minimize_frame(backend.as_ref(), index, &mut frame, config, runner);
        if config.remove_temporary_files {
            remove_temporary_files(backend.temporary_files(config));
        }
        let (record, relaxed) = outcome?;
        energies.push(&record)?;
        relaxed_frames.push(relaxed);

        if config.verbose {
            reporter.report(Progress::Message(verbose_line(
                index,
                &record,
                config.energy_layout,
            )));
        }
        reporter.report(Progress::FrameFinish { index, record });
    }

    if relaxed_frames.is_empty() {
        warn!("The input trajectory contains no frames.");
    }

    if let Some(output) = &config.output_path {
        let path = config.resolve(output);
        info!(path = %path.display(), "Writing relaxed trajectory.");
        backend.write_trajectory(&relaxed_frames, &path)?;
    }

    reporter.report(Progress::RunFinish);
    info!("Minimization complete: {} frame(s) relaxed.", relaxed_frames.len());
    Ok(MinimizationResult {
        energies,
        relaxed_frames,
    })
}

fn minimize_frame(
    backend: &dyn MinimizerBackend,
    index: usize,
    frame: &mut Frame,
    config: &MinimizationConfig,
    runner: &dyn ProcessRunner,
) -> Result<(EnergyRecord, Frame), EngineError> {
    prepare_frame(frame, &config.cell, backend.preparation(&config.cell)).map_err(|err| {
        EngineError::Lookup {
            frame: index,
            element: err.element,
        }
    })?;
    backend.write_input(frame, config)?;

    clear_stale_outputs(backend.output_files(config))?;
    let output = backend.invoke(runner, config)?;
    let record = backend.extract_energies(index, &output, config)?;
    let relaxed = backend.retrieve_relaxed_frame(config)?;
    debug!(
        frame = index,
        initial = record.initial,
        final_energy = record.final_energy,
        "Frame minimized."
    );
    Ok((record, relaxed))
}

fn verbose_header(layout: EnergyLayout) -> &'static str {
    match layout {
        EnergyLayout::InitialFinal => VERBOSE_HEADER,
        EnergyLayout::WithNextToLast => VERBOSE_HEADER_WITH_NEXT_TO_LAST,
    }
}

fn verbose_line(index: usize, record: &EnergyRecord, layout: EnergyLayout) -> String {
    match (layout, record.next_to_last) {
        (EnergyLayout::WithNextToLast, Some(next_to_last)) => format!(
            "{} {} {} {}",
            index, record.initial, next_to_last, record.final_energy
        ),
        _ => format!("{} {} {}", index, record.initial, record.final_energy),
    }
}

fn clear_stale_outputs(paths: Vec<PathBuf>) -> Result<(), EngineError> {
    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed stale minimizer output."),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(EngineError::io(path, source)),
        }
    }
    Ok(())
}

fn remove_temporary_files(paths: Vec<PathBuf>) {
    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %path.display(), "Could not remove temporary file: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::traits::TrajectoryFile;
    use crate::core::io::xyz::XyzFile;
    use crate::core::io::lammpstrj::LammpstrjFile;
    use crate::core::models::cell::CellInfo;
    use crate::core::models::frame::Species;
    use crate::engine::config::{BackendKind, MinimizationConfigBuilder};
    use crate::engine::energy::ExtractionError;
    use crate::engine::process::{Invocation, ProcessOutput};
    use nalgebra::Point3;
    use std::cell::{Cell, RefCell};
    use std::io;
    use std::path::Path;
    use std::sync::Mutex;

    const ENERGIES: [[f64; 3]; 2] = [
        [-4426.57531107183, -4810.79048271336, -4810.79047946943],
        [-4401.12345678901, -4799.98765432109, -4799.98765000000],
    ];

    fn si_li_frames() -> Vec<Frame> {
        (0..2)
            .map(|k| {
                Frame::new(
                    vec![Species::Label("Si".into()), Species::Label("Li".into())],
                    vec![
                        Point3::new(0.1 * k as f64, 0.0, 0.0),
                        Point3::new(5.0, 5.0, 5.0 + k as f64),
                    ],
                )
            })
            .collect()
    }

    fn lammps_builder(dir: &Path) -> MinimizationConfigBuilder {
        MinimizationConfigBuilder::new()
            .backend(BackendKind::Lammps)
            .command("./lmp -in in.minimization")
            .work_dir(dir.to_path_buf())
            .input_path(PathBuf::from("in.frame"))
            .log_path(PathBuf::from("log.lammps"))
            .trajectory_path(PathBuf::from("dump.minimization.lammpstrj"))
            .cell(CellInfo::new([10.609; 3]).with_type("Si", 1).with_type("Li", 2))
    }

    fn gems_builder(dir: &Path) -> MinimizationConfigBuilder {
        MinimizationConfigBuilder::new()
            .backend(BackendKind::Gems)
            .command("./gems lbfgs.gms")
            .work_dir(dir.to_path_buf())
            .input_path(PathBuf::from("to_min.xyz"))
            .log_path(PathBuf::from("lbfgs.log"))
            .trajectory_path(PathBuf::from("traj.lbfgs.xyz"))
            .cell(CellInfo::new([10.566048; 3]))
    }

    fn lammps_stdout(energies: [f64; 3]) -> String {
        format!(
            "Minimization stats:\n  Energy initial, next-to-last, final = \n    {} {} {}\n",
            energies[0], energies[1], energies[2]
        )
    }

    /// Stands in for LAMMPS: checks the data file, writes a shuffled dump plus its log
    /// files and prints the energies of the current call.
    fn fake_lammps(
        calls: &Cell<usize>,
    ) -> impl Fn(&Invocation) -> io::Result<ProcessOutput> + '_ {
        move |invocation: &Invocation| -> io::Result<ProcessOutput> {
            let call = calls.get();
            calls.set(call + 1);
            let dir = &invocation.work_dir;
            let data = fs::read_to_string(dir.join("in.frame"))?;
            assert!(data.contains("Atoms # charge"));
            let dump = format!(
                "ITEM: TIMESTEP\n{}\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n\
                 0.0 10.609\n0.0 10.609\n0.0 10.609\nITEM: ATOMS id type x y z\n\
                 2 2 5.0 5.0 5.0\n1 1 {} 0.0 0.0\n",
                100 + call,
                call
            );
            fs::write(dir.join("dump.minimization.lammpstrj"), dump)?;
            fs::write(dir.join("log.lammps"), "log")?;
            fs::write(dir.join("log.cite"), "cite")?;
            Ok(ProcessOutput {
                success: true,
                exit_code: Some(0),
                stdout: lammps_stdout(ENERGIES[call % ENERGIES.len()]),
            })
        }
    }

    fn never_cancel() -> AtomicBool {
        AtomicBool::new(false)
    }

    #[test]
    fn lammps_run_collects_energies_and_relaxed_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .output_path(Some(PathBuf::from("relaxed.lammpstrj")))
            .build()
            .unwrap();
        let calls = Cell::new(0);
        let runner = fake_lammps(&calls);

        let result = run_with_runner(
            si_li_frames(),
            &config,
            &runner,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(result.energies.len(), 2);
        assert_eq!(result.energies.column_names(), &["initial", "final"]);
        assert_eq!(
            result.energies.initial(),
            &[ENERGIES[0][0] as f32, ENERGIES[1][0] as f32]
        );
        assert_eq!(result.energies.initial()[0], -4426.5753_f32);
        assert_eq!(result.energies.final_energies()[0], -4810.7905_f32);
        assert_eq!(
            result.energies.final_energies(),
            &[ENERGIES[0][2] as f32, ENERGIES[1][2] as f32]
        );

        assert_eq!(result.relaxed_frames.len(), 2);
        for (k, frame) in result.relaxed_frames.iter().enumerate() {
            assert_eq!(frame.indices, Some(vec![1, 2]));
            assert_eq!(frame.positions[0], Point3::new(k as f64, 0.0, 0.0));
            assert_eq!(frame.timestep, 100 + k as u64);
        }

        let written = LammpstrjFile::read_all_from_path(dir.path().join("relaxed.lammpstrj"))
            .unwrap();
        assert_eq!(written, result.relaxed_frames);
    }

    #[test]
    fn three_column_layout_keeps_next_to_last() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .energy_layout(EnergyLayout::WithNextToLast)
            .build()
            .unwrap();
        let calls = Cell::new(0);
        let result = run_with_runner(
            si_li_frames(),
            &config,
            &fake_lammps(&calls),
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();
        assert_eq!(
            result.energies.next_to_last(),
            Some(&[ENERGIES[0][1] as f32, ENERGIES[1][1] as f32][..])
        );
    }

    #[test]
    fn flags_are_passed_once_and_screen_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .flag("sf", "omp")
            .flag("screen", "none")
            .build()
            .unwrap();
        let calls = Cell::new(0);
        let lammps = fake_lammps(&calls);
        let seen = RefCell::new(Vec::new());
        let runner = |invocation: &Invocation| {
            seen.borrow_mut().push(invocation.args.clone());
            lammps(invocation)
        };

        run_with_runner(
            si_li_frames(),
            &config,
            &runner,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();

        for args in seen.borrow().iter() {
            assert_eq!(args, &vec!["-in", "in.minimization", "-sf", "omp"]);
        }
    }

    #[test]
    fn extraction_failure_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .output_path(Some(PathBuf::from("relaxed.lammpstrj")))
            .build()
            .unwrap();
        let calls = Cell::new(0);
        let lammps = fake_lammps(&calls);
        let runner = |invocation: &Invocation| -> io::Result<ProcessOutput> {
            let mut output = lammps(invocation)?;
            if calls.get() == 2 {
                output.stdout = "ERROR: Lost atoms\n".into();
                output.success = false;
                output.exit_code = Some(1);
            }
            Ok(output)
        };

        let err = run_with_runner(
            si_li_frames(),
            &config,
            &runner,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap_err();

        match err {
            EngineError::Extraction { frame, source } => {
                assert_eq!(frame, 1);
                assert!(matches!(source, ExtractionError::MarkerNotFound { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!dir.path().join("relaxed.lammpstrj").exists());
        assert!(!dir.path().join("dump.minimization.lammpstrj").exists());
        assert!(!dir.path().join("in.frame").exists());
    }

    #[test]
    fn stale_gems_outputs_are_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let config = gems_builder(dir.path())
            .remove_temporary_files(false)
            .build()
            .unwrap();
        fs::write(
            dir.path().join("lbfgs.log"),
            "# LBFGS 0 0 -1.0\n# LBFGS 1 0 -2.0\n# LBFGS 2 0 -3.0\n# LBFGS 3 0 -4.0\n",
        )
        .unwrap();
        fs::write(dir.path().join("traj.lbfgs.xyz"), "1\nstale\nSi 0 0 0\n").unwrap();
        let calls = Cell::new(0);
        let crashed = |_: &Invocation| -> io::Result<ProcessOutput> {
            calls.set(calls.get() + 1);
            Ok(ProcessOutput {
                success: false,
                exit_code: Some(1),
                stdout: String::new(),
            })
        };

        let err = run_with_runner(
            si_li_frames(),
            &config,
            &crashed,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Io { ref path, .. } if path.ends_with("lbfgs.log")));
        assert_eq!(calls.get(), 1);
        assert!(!dir.path().join("lbfgs.log").exists());
        assert!(!dir.path().join("traj.lbfgs.xyz").exists());
        assert!(dir.path().join("to_min.xyz").exists());
    }

    #[test]
    fn stale_lammps_dump_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .remove_temporary_files(false)
            .build()
            .unwrap();
        fs::write(
            dir.path().join("dump.minimization.lammpstrj"),
            "ITEM: TIMESTEP\n9\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n\
             0 1\n0 1\n0 1\nITEM: ATOMS id type x y z\n1 1 0 0 0\n2 2 0 0 0\n",
        )
        .unwrap();

        let no_dump = |_: &Invocation| -> io::Result<ProcessOutput> {
            Ok(ProcessOutput {
                success: true,
                exit_code: Some(0),
                stdout: lammps_stdout(ENERGIES[0]),
            })
        };
        let err = run_with_runner(
            si_li_frames(),
            &config,
            &no_dump,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap_err();

        assert!(
            matches!(err, EngineError::Trajectory { ref path, .. } if path.ends_with("dump.minimization.lammpstrj"))
        );
    }

    #[test]
    fn missing_element_fails_before_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path()).build().unwrap();
        let calls = Cell::new(0);
        let mut frames = si_li_frames();
        frames[0].species[1] = Species::Label("O".into());

        let err = run_with_runner(
            frames,
            &config,
            &fake_lammps(&calls),
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Lookup { frame: 0, ref element } if element == "O"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn spawn_failure_is_reported_with_command() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path()).build().unwrap();
        let runner = |_: &Invocation| -> io::Result<ProcessOutput> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        };
        let err = run_with_runner(
            si_li_frames(),
            &config,
            &runner,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap_err();
        assert!(
            matches!(err, EngineError::Spawn { ref command, .. } if command == "./lmp -in in.minimization")
        );
    }

    #[test]
    fn empty_input_gives_empty_table_and_trajectory() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .output_path(Some(PathBuf::from("relaxed.lammpstrj")))
            .build()
            .unwrap();
        let calls = Cell::new(0);
        let result = run_with_runner(
            Vec::new(),
            &config,
            &fake_lammps(&calls),
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();

        assert_eq!(calls.get(), 0);
        assert!(result.energies.is_empty());
        assert!(result.relaxed_frames.is_empty());
        let written = fs::read_to_string(dir.path().join("relaxed.lammpstrj")).unwrap();
        assert!(written.is_empty());
    }

    #[test]
    fn raised_cancel_flag_stops_between_frames() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path()).build().unwrap();
        let calls = Cell::new(0);
        let lammps = fake_lammps(&calls);
        let cancel = AtomicBool::new(false);
        let runner = |invocation: &Invocation| {
            cancel.store(true, Ordering::Relaxed);
            lammps(invocation)
        };

        let err = run_with_runner(
            si_li_frames(),
            &config,
            &runner,
            &ProgressReporter::new(),
            &cancel,
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Cancelled { processed: 1 }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn temporary_files_are_removed_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = [
            "in.frame",
            "dump.minimization.lammpstrj",
            "log.lammps",
            "log.cite",
        ];

        let config = lammps_builder(dir.path()).build().unwrap();
        let calls = Cell::new(0);
        run_with_runner(
            si_li_frames(),
            &config,
            &fake_lammps(&calls),
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();
        for name in scratch {
            assert!(!dir.path().join(name).exists(), "{name} should be removed");
        }

        let config = lammps_builder(dir.path())
            .remove_temporary_files(false)
            .build()
            .unwrap();
        run_with_runner(
            si_li_frames(),
            &config,
            &fake_lammps(&calls),
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();
        for name in scratch {
            assert!(dir.path().join(name).exists(), "{name} should be kept");
        }
    }

    #[test]
    fn verbose_run_reports_header_and_energy_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .energy_layout(EnergyLayout::WithNextToLast)
            .verbose(true)
            .build()
            .unwrap();
        let calls = Cell::new(0);
        let messages = Mutex::new(Vec::new());
        let finished = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| match event {
            Progress::Message(text) => messages.lock().unwrap().push(text),
            Progress::FrameFinish { index, .. } => finished.lock().unwrap().push(index),
            _ => {}
        }));

        run_with_runner(
            si_li_frames(),
            &config,
            &fake_lammps(&calls),
            &reporter,
            &never_cancel(),
        )
        .unwrap();
        drop(reporter);

        let messages = messages.into_inner().unwrap();
        assert_eq!(messages[0], VERBOSE_HEADER_WITH_NEXT_TO_LAST);
        assert_eq!(
            messages[1],
            "0 -4426.57531107183 -4810.79048271336 -4810.79047946943"
        );
        assert!(messages[2].starts_with("1 -4401.12345678901 "));
        assert_eq!(finished.into_inner().unwrap(), vec![0, 1]);
    }

    #[test]
    fn two_column_verbose_header_matches_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path()).verbose(true).build().unwrap();
        let calls = Cell::new(0);
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));

        run_with_runner(
            si_li_frames(),
            &config,
            &fake_lammps(&calls),
            &reporter,
            &never_cancel(),
        )
        .unwrap();
        drop(reporter);

        let messages = messages.into_inner().unwrap();
        assert_eq!(messages[0], VERBOSE_HEADER);
        assert_eq!(messages[1], "0 -4426.57531107183 -4810.79047946943");
        let header_columns = messages[0].trim_start_matches("# ").split(", ").count();
        assert_eq!(messages[1].split_whitespace().count(), header_columns);
    }

    #[test]
    fn single_frame_run_writes_reference_dump() {
        let dir = tempfile::tempdir().unwrap();
        let config = lammps_builder(dir.path())
            .output_path(Some(PathBuf::from("relaxed.lammpstrj")))
            .build()
            .unwrap();
        let frame = Frame::new(
            vec![Species::Label("Si".into()), Species::Label("Li".into())],
            vec![Point3::new(0.5, 0.5, 0.5), Point3::new(5.0, 5.0, 5.0)],
        );
        let runner = |invocation: &Invocation| -> io::Result<ProcessOutput> {
            fs::write(
                invocation.work_dir.join("dump.minimization.lammpstrj"),
                "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n\
                 0.0 10.609\n0.0 10.609\n0.0 10.609\nITEM: ATOMS id type q x y z\n\
                 1 1 0.0 0.5 0.5 0.5\n2 2 0.0 5.0 5.0 5.0\n\
                 ITEM: TIMESTEP\n1023\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n\
                 0.0 10.609\n0.0 10.609\n0.0 10.609\nITEM: ATOMS id type q x y z\n\
                 2 2 0.0 5.25 5.5 5.75\n1 1 0.0 0.125 0.25 0.375\n",
            )?;
            Ok(ProcessOutput {
                success: true,
                exit_code: Some(0),
                stdout: lammps_stdout(ENERGIES[0]),
            })
        };

        let result = run_with_runner(
            vec![frame],
            &config,
            &runner,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();

        assert_eq!(result.energies.len(), 1);
        assert_eq!(result.energies.column_names(), &["initial", "final"]);
        assert_eq!(result.energies.initial(), &[ENERGIES[0][0] as f32]);
        assert_eq!(result.energies.final_energies(), &[ENERGIES[0][2] as f32]);
        assert!((result.energies.initial()[0] + 4426.575311).abs() < 1e-3);

        let written = fs::read_to_string(dir.path().join("relaxed.lammpstrj")).unwrap();
        assert_eq!(
            written,
            "ITEM: TIMESTEP\n1023\nITEM: NUMBER OF ATOMS\n2\nITEM: BOX BOUNDS pp pp pp\n\
             0 10.609\n0 10.609\n0 10.609\nITEM: ATOMS id type q x y z\n\
             1 1 0 0.125 0.25 0.375\n2 2 0 5.25 5.5 5.75\n"
        );
    }

    #[test]
    fn gems_run_reads_log_and_xyz_trajectory() {
        let dir = tempfile::tempdir().unwrap();
        let config = gems_builder(dir.path())
            .output_path(Some(PathBuf::from("relaxed.xyz")))
            .build()
            .unwrap();
        let runner = |invocation: &Invocation| -> io::Result<ProcessOutput> {
            let dir = &invocation.work_dir;
            let input = XyzFile::read_last_from_path(dir.join("to_min.xyz"))
                .map_err(|err| io::Error::other(err.to_string()))?;
            let mut relaxed = input.clone();
            relaxed.comment = "relaxed".into();
            XyzFile::write_all_to_path(&[input, relaxed], dir.join("traj.lbfgs.xyz"))
                .map_err(|err| io::Error::other(err.to_string()))?;
            fs::write(
                dir.join("lbfgs.log"),
                "# LBFGS 0 0 -10.0\n# LBFGS 1 0 -11.0\n# LBFGS 2 0 -12.5\n# LBFGS 3 0 -13.25\n",
            )?;
            Ok(ProcessOutput {
                success: true,
                exit_code: Some(0),
                stdout: String::new(),
            })
        };

        let result = run_with_runner(
            si_li_frames(),
            &config,
            &runner,
            &ProgressReporter::new(),
            &never_cancel(),
        )
        .unwrap();

        assert_eq!(result.energies.initial(), &[-12.5_f32, -12.5]);
        assert_eq!(result.energies.final_energies(), &[-13.25_f32, -13.25]);
        assert_eq!(
            result.relaxed_frames[0].species,
            vec![Species::Label("Si".into()), Species::Label("Li".into())]
        );
        assert!(!dir.path().join("lbfgs.log").exists());

        let written = XyzFile::read_all_from_path(dir.path().join("relaxed.xyz")).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|frame| frame.comment == "relaxed"));
    }
}
