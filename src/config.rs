use crate::types::AssistantTool;
use std::path::PathBuf;
use std::time::Duration;

/// The file uploaded for analysis, relative to the working directory.
pub const DEFAULT_INPUT_PATH: &str = "data/optima_sonoran.csv";

/// The purpose tag the service requires for files used by assistants.
pub const UPLOAD_PURPOSE: &str = "assistants";

const ANALYSIS_PROMPT: &str = "From the provided water bill csv file, create a data visualization, \
such as a graph, analyzing the total amount due for each csv data point, and also create a data \
point predicting the total amount due for the month of 2024 June";

const ASSISTANT_NAME: &str = "Utility Bill Analyst";

const ASSISTANT_INSTRUCTIONS: &str = "You are an expert data analyst. Your role is to analyze \
utility bill data from CSV files, answer questions about it, and create visualizations. When asked \
to create a plot or chart, generate the image and make it available for download.";

const ASSISTANT_MODEL: &str = "gpt-4o";

/// The fixed configuration used when a new assistant has to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantProfile {
    pub name: String,
    pub instructions: String,
    pub tools: Vec<AssistantTool>,
    pub model: String,
}

impl Default for AssistantProfile {
    fn default() -> Self {
        Self {
            name: ASSISTANT_NAME.to_string(),
            instructions: ASSISTANT_INSTRUCTIONS.to_string(),
            tools: vec![AssistantTool::CodeInterpreter, AssistantTool::FileSearch],
            model: ASSISTANT_MODEL.to_string(),
        }
    }
}

/// Everything the analysis run needs besides the API credentials.
///
/// The defaults are the values the tool ships with; tests override the
/// output directory and the poll interval.
#[derive(Debug, Clone)]
pub struct AnalystConfig {
    /// The CSV file to upload.
    pub input_path: PathBuf,
    /// The purpose tag sent with the upload.
    pub upload_purpose: String,
    /// The single user message posted to the thread.
    pub prompt: String,
    /// How long to sleep between run status checks.
    pub poll_interval: Duration,
    /// Where downloaded images are written.
    pub output_dir: PathBuf,
    pub image_prefix: String,
    pub image_extension: String,
    /// Used only when a new assistant is created.
    pub assistant: AssistantProfile,
}

impl Default for AnalystConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            upload_purpose: UPLOAD_PURPOSE.to_string(),
            prompt: ANALYSIS_PROMPT.to_string(),
            poll_interval: Duration::from_secs(2),
            output_dir: PathBuf::from("."),
            image_prefix: "viz_".to_string(),
            image_extension: "png".to_string(),
            assistant: AssistantProfile::default(),
        }
    }
}

impl AnalystConfig {
    /// The local path an image with the given file id is saved to.
    pub fn image_path(&self, image_id: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}.{}",
            self.image_prefix, image_id, self.image_extension
        ))
    }
}
