use aelm::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::RunStart { total_frames } => {
                    pb_guard.reset();
                    match total_frames {
                        Some(total) => {
                            pb_guard.disable_steady_tick();
                            pb_guard.set_length(total);
                            pb_guard.set_style(Self::bar_style());
                        }
                        None => {
                            pb_guard.set_length(0);
                            pb_guard.set_style(Self::spinner_style());
                            pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                        }
                    }
                    pb_guard.set_position(0);
                    pb_guard.set_message("Minimizing");
                }
                Progress::FrameStart { index } => {
                    pb_guard.set_message(format!("Frame {}", index));
                }
                Progress::FrameFinish { record, .. } => {
                    pb_guard.inc(1);
                    pb_guard.set_message(format!("E = {:.4}", record.final_energy));
                }
                Progress::RunFinish => {
                    pb_guard.disable_steady_tick();
                    if let Some(length) = pb_guard.length() {
                        if pb_guard.position() < length {
                            pb_guard.set_position(length);
                        }
                    }
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(msg);
                    } else {
                        println!("{}", msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} ({pos} frames)")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
