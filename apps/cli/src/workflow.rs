//! Step workflow state machine.
//!
//! One explicit state object owns the per-step lifecycle states, the file
//! metadata, the parsed text, and the final report. All transitions go
//! through typed methods; a step whose predecessor is not done cannot be
//! started (`begin` is a no-op returning false).

use crate::client::AnalysisReport;

/// Lifecycle state of one pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepState {
    #[default]
    Idle,
    Running,
    Done,
    Error,
}

/// The three client-visible pipeline stages, in order.
/// Index-build is a sub-call of Parse, not a stage of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Upload,
    Parse,
    Analyze,
}

pub const STEPS: [Step; 3] = [Step::Upload, Step::Parse, Step::Analyze];

/// Metadata of the uploaded file, as reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMeta {
    pub path: String,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct Workflow {
    upload: StepState,
    parse: StepState,
    analyze: StepState,
    file: Option<FileMeta>,
    parsed_text: Option<String>,
    report: Option<AnalysisReport>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_state(&self, step: Step) -> StepState {
        match step {
            Step::Upload => self.upload,
            Step::Parse => self.parse,
            Step::Analyze => self.analyze,
        }
    }

    /// Whether `step` may be started: its predecessor must be done and the
    /// data that predecessor produced must be present.
    pub fn can_start(&self, step: Step) -> bool {
        if self.step_state(step) == StepState::Running {
            return false;
        }
        match step {
            Step::Upload => true,
            Step::Parse => self.upload == StepState::Done && self.file.is_some(),
            Step::Analyze => self.parse == StepState::Done && self.parsed_text.is_some(),
        }
    }

    /// Moves `step` to `running`. Returns false (and changes nothing) if the
    /// step is not currently startable.
    pub fn begin(&mut self, step: Step) -> bool {
        if !self.can_start(step) {
            return false;
        }
        self.set(step, StepState::Running);
        true
    }

    /// Upload succeeded: store the file metadata, reset the downstream steps,
    /// and clear previously parsed text and analysis.
    pub fn upload_succeeded(&mut self, meta: FileMeta) {
        self.upload = StepState::Done;
        self.parse = StepState::Idle;
        self.analyze = StepState::Idle;
        self.file = Some(meta);
        self.parsed_text = None;
        self.report = None;
    }

    /// Parse succeeded. Call only after BOTH the extraction call and the
    /// index-rebuild call have succeeded; parse is not done until the index
    /// is rebuilt.
    pub fn parse_succeeded(&mut self, text: String) {
        self.parse = StepState::Done;
        self.analyze = StepState::Idle;
        self.parsed_text = Some(text);
    }

    pub fn analyze_succeeded(&mut self, report: AnalysisReport) {
        self.analyze = StepState::Done;
        self.report = Some(report);
    }

    /// Marks `step` as failed. Data produced by earlier steps is unchanged.
    pub fn failed(&mut self, step: Step) {
        self.set(step, StepState::Error);
    }

    /// Percentage of steps in `done`, recomputed from scratch.
    pub fn progress_percent(&self) -> f32 {
        let done = STEPS
            .iter()
            .filter(|s| self.step_state(**s) == StepState::Done)
            .count();
        done as f32 / STEPS.len() as f32 * 100.0
    }

    pub fn file(&self) -> Option<&FileMeta> {
        self.file.as_ref()
    }

    pub fn parsed_text(&self) -> Option<&str> {
        self.parsed_text.as_deref()
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        self.report.as_ref()
    }

    fn set(&mut self, step: Step, state: StepState) {
        match step {
            Step::Upload => self.upload = state,
            Step::Parse => self.parse = state,
            Step::Analyze => self.analyze = state,
        }
    }
}
