use super::energy::EnergyRecord;

#[derive(Debug, Clone)]
pub enum Progress {
    /// `total_frames` is `None` when the frame source cannot report its length up front.
    RunStart { total_frames: Option<u64> },
    FrameStart { index: usize },
    FrameFinish { index: usize, record: EnergyRecord },
    RunFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
