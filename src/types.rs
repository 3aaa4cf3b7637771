use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A file stored by the service, as returned by the upload endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileObject {
    /// The opaque identifier used to reference the file in later calls.
    pub id: String,
    /// The purpose tag the file was uploaded with, e.g. "assistants".
    pub purpose: String,
    /// The original file name, if the service echoes it back.
    #[serde(default)]
    pub filename: Option<String>,
    /// Size of the stored file in bytes.
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// A tool that can be enabled on an assistant.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantTool {
    /// Sandboxed code execution, used for the analysis and the charts.
    CodeInterpreter,
    /// Retrieval over attached vector stores.
    FileSearch,
    /// Any tool type this crate does not model (e.g. function tools).
    /// Only produced by deserialization; it is never sent back.
    #[serde(other, skip_serializing)]
    Other,
}

/// Files made available to the code interpreter tool.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CodeInterpreterResources {
    #[serde(default)]
    pub file_ids: Vec<String>,
}

/// Vector stores made available to the file search tool.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct FileSearchResources {
    #[serde(default)]
    pub vector_store_ids: Vec<String>,
}

/// Per-tool resources bound to an assistant.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ToolResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<CodeInterpreterResources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_search: Option<FileSearchResources>,
}

impl ToolResources {
    /// Resources that bind exactly the given files to the code interpreter.
    pub fn code_interpreter_files(file_ids: Vec<String>) -> Self {
        Self {
            code_interpreter: Some(CodeInterpreterResources { file_ids }),
            file_search: None,
        }
    }
}

/// A reusable assistant configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Assistant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    pub model: String,
    #[serde(default)]
    pub tools: Vec<AssistantTool>,
    #[serde(default)]
    pub tool_resources: Option<ToolResources>,
}

impl Assistant {
    /// The display name, or a placeholder for assistants created without one.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

/// Request body for `POST assistants`.
#[derive(Serialize, Debug)]
pub(crate) struct CreateAssistantRequest<'a> {
    pub(crate) name: &'a str,
    pub(crate) instructions: &'a str,
    pub(crate) tools: &'a [AssistantTool],
    pub(crate) tool_resources: ToolResources,
    pub(crate) model: &'a str,
}

/// Request body for `POST assistants/{id}`.
#[derive(Serialize, Debug)]
pub(crate) struct UpdateAssistantRequest {
    pub(crate) tool_resources: ToolResources,
}

/// A conversation context that groups messages.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Thread {
    pub id: String,
}

/// The author of a message.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Request body for `POST threads/{id}/messages`.
#[derive(Serialize, Debug)]
pub(crate) struct CreateMessageRequest<'a> {
    pub(crate) role: MessageRole,
    pub(crate) content: &'a str,
}

/// The text payload of a text content part.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MessageText {
    pub value: String,
}

/// A reference to an image file produced by the assistant.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ImageFileRef {
    pub file_id: String,
}

/// One part of a message's content.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: MessageText },
    ImageFile { image_file: ImageFileRef },
    /// Content types this crate does not handle, such as image URLs.
    #[serde(other)]
    Unsupported,
}

/// A role-tagged entry in a thread.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: MessageRole,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

/// Request body for `POST threads/{id}/runs`.
#[derive(Serialize, Debug)]
pub(crate) struct CreateRunRequest<'a> {
    pub(crate) assistant_id: &'a str,
}

/// The lifecycle state of a run.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    /// A status value added by the service after this crate was written,
    /// kept verbatim.
    Unknown(String),
}

impl RunStatus {
    /// Whether polling stops at this status.
    ///
    /// Only `completed`, `failed` and `cancelled` end the wait; every other
    /// value, including `expired` and unknown ones, keeps the poller going.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown(raw) => raw,
        }
    }
}

impl From<String> for RunStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "cancelled" => RunStatus::Cancelled,
            "failed" => RunStatus::Failed,
            "completed" => RunStatus::Completed,
            "incomplete" => RunStatus::Incomplete,
            "expired" => RunStatus::Expired,
            _ => RunStatus::Unknown(raw),
        }
    }
}

impl<'de> Deserialize<'de> for RunStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RunStatus::from)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An execution of an assistant against a thread.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Run {
    pub id: String,
    pub thread_id: String,
    pub assistant_id: String,
    pub status: RunStatus,
}

/// (Internal) The cursor-paginated envelope used by every list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub(crate) data: Vec<T>,
    #[serde(default)]
    pub(crate) last_id: Option<String>,
    #[serde(default)]
    pub(crate) has_more: bool,
}

/// (Internal) The error envelope returned on non-success responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}
