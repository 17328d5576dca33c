use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

/// A fully resolved command line for one minimization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: PathBuf,
}

impl Invocation {
    /// The command line as a single space-separated string, for logs and error messages.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What the driver keeps from a finished external process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
}

/// Runs an external program to completion.
///
/// The driver only talks to the minimizer through this trait, so tests can replace the
/// real executable with a scripted stand-in.
pub trait ProcessRunner {
    /// Runs the invocation and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process could not be started or waited on; a non-zero
    /// exit status is reported through [`ProcessOutput::success`].
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput>;
}

impl<F> ProcessRunner for F
where
    F: Fn(&Invocation) -> io::Result<ProcessOutput>,
{
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        self(invocation)
    }
}

/// Spawns the program as a child process of the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ProcessOutput> {
        debug!(command = %invocation.command_line(), work_dir = ?invocation.work_dir, "Spawning minimizer.");
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.work_dir)
            .stdin(Stdio::null())
            .output()?;

        if !output.stderr.is_empty() {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Minimizer wrote to standard error."
            );
        }
        Ok(ProcessOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
