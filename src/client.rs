use crate::config::AssistantProfile;
use crate::error::AnalystError;
use crate::types::{
    Assistant, AssistantTool, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    ErrorResponse, FileObject, ListResponse, Message, MessageRole, Run, Thread, ToolResources,
    UpdateAssistantRequest,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::multipart;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::{debug, info};
use url::Url;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";

/// Page size requested from list endpoints; the service caps it at 100.
const PAGE_LIMIT: &str = "100";

/// The main client for the parts of the OpenAI Assistants API this tool uses.
///
/// It holds the shared `reqwest::Client`, with the bearer token and the
/// assistants beta header preset, and the base URL all paths are joined to.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl OpenAiClient {
    /// Creates a new `OpenAiClient`.
    ///
    /// The API key falls back to the `OPENAI_API_KEY` environment variable when
    /// `api_key` is `None`. The base URL is read from `OPENAI_BASE_URL` and
    /// defaults to the public endpoint.
    ///
    /// # Errors
    ///
    /// - `AnalystError::MissingApiKey` if no key is provided either way.
    /// - `AnalystError::InvalidApiKey` if the key cannot be sent as a header.
    /// - `AnalystError::UrlParseFailed` if `OPENAI_BASE_URL` is not a valid URL.
    pub fn new(api_key: Option<String>) -> Result<Self, AnalystError> {
        let api_key = api_key
            .or_else(|| env::var("OPENAI_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());
        let Some(key) = api_key else {
            return Err(AnalystError::MissingApiKey);
        };

        let base_url = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new_with_url(key, &base_url)
    }

    /// Creates a new `OpenAiClient` with a custom base URL.
    ///
    /// This is useful for testing against a mock server. A missing trailing
    /// slash is added so that relative paths join below the given prefix.
    pub fn new_with_url(api_key: String, base_url: &str) -> Result<Self, AnalystError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| AnalystError::InvalidApiKey)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            HeaderName::from_static("openai-beta"),
            HeaderValue::from_static("assistants=v2"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { client, base_url })
    }

    /// Uploads a local file to the service's file store.
    ///
    /// The file is streamed from disk as the `file` part of a multipart form.
    /// Its MIME type is guessed from the extension.
    ///
    /// # Arguments
    ///
    /// * `path` - The local file to upload.
    /// * `purpose` - The purpose tag, `"assistants"` for files used by assistants.
    ///
    /// # Returns
    ///
    /// The stored [`FileObject`], whose `id` references the file in later calls.
    pub async fn upload_file<P: AsRef<Path>>(
        &self,
        path: P,
        purpose: &str,
    ) -> Result<FileObject, AnalystError> {
        let path = path.as_ref();
        let url = self.base_url.join("files")?;

        let file = File::open(path).await?;
        let stream = FramedRead::new(file, BytesCodec::new());
        let file_body = reqwest::Body::wrap_stream(stream);

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AnalystError::IoError(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "Could not determine file name",
                ))
            })?
            .to_string();

        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        let file_part = multipart::Part::stream(file_body)
            .file_name(file_name)
            .mime_str(&mime_type)?;

        let form = multipart::Form::new()
            .text("purpose", purpose.to_string())
            .part("file", file_part);

        info!(path = %path.display(), purpose, "uploading file");
        let response = self.client.post(url).multipart(form).send().await?;
        let file: FileObject = Self::parse_response(response).await?;
        info!(file_id = %file.id, "file uploaded");
        Ok(file)
    }

    /// Lists every assistant visible to the API key, following pagination.
    pub async fn list_assistants(&self) -> Result<Vec<Assistant>, AnalystError> {
        self.list_all("assistants", None).await
    }

    /// Creates an assistant from a profile with the given tool resources.
    ///
    /// Tools the crate cannot describe (`AssistantTool::Other`) are left out
    /// of the request.
    pub async fn create_assistant(
        &self,
        profile: &AssistantProfile,
        tool_resources: ToolResources,
    ) -> Result<Assistant, AnalystError> {
        let url = self.base_url.join("assistants")?;
        let tools: Vec<AssistantTool> = profile
            .tools
            .iter()
            .copied()
            .filter(|tool| *tool != AssistantTool::Other)
            .collect();
        let request_body = CreateAssistantRequest {
            name: &profile.name,
            instructions: &profile.instructions,
            tools: &tools,
            tool_resources,
            model: &profile.model,
        };

        let response = self.client.post(url).json(&request_body).send().await?;
        Self::parse_response(response).await
    }

    /// Replaces an assistant's tool resources.
    ///
    /// The service overwrites the bindings of every tool named in
    /// `tool_resources`; files previously attached to that tool are dropped.
    pub async fn update_assistant(
        &self,
        assistant_id: &str,
        tool_resources: ToolResources,
    ) -> Result<Assistant, AnalystError> {
        let url = self
            .base_url
            .join(&format!("assistants/{}", assistant_id))?;
        let request_body = UpdateAssistantRequest { tool_resources };

        let response = self.client.post(url).json(&request_body).send().await?;
        Self::parse_response(response).await
    }

    /// Creates an empty conversation thread.
    pub async fn create_thread(&self) -> Result<Thread, AnalystError> {
        let url = self.base_url.join("threads")?;
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// Appends a message to a thread.
    pub async fn create_message(
        &self,
        thread_id: &str,
        role: MessageRole,
        content: &str,
    ) -> Result<Message, AnalystError> {
        let url = self
            .base_url
            .join(&format!("threads/{}/messages", thread_id))?;
        let request_body = CreateMessageRequest { role, content };

        let response = self.client.post(url).json(&request_body).send().await?;
        Self::parse_response(response).await
    }

    /// Starts a run of an assistant against a thread.
    pub async fn create_run(
        &self,
        thread_id: &str,
        assistant_id: &str,
    ) -> Result<Run, AnalystError> {
        let url = self
            .base_url
            .join(&format!("threads/{}/runs", thread_id))?;
        let request_body = CreateRunRequest { assistant_id };

        let response = self.client.post(url).json(&request_body).send().await?;
        let run: Run = Self::parse_response(response).await?;
        info!(run_id = %run.id, status = %run.status, "run created");
        Ok(run)
    }

    /// Retrieves the current state of a run.
    pub async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, AnalystError> {
        let url = self
            .base_url
            .join(&format!("threads/{}/runs/{}", thread_id, run_id))?;
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    /// Waits for a run to finish by polling its status.
    ///
    /// Starting from the run as last seen, this sleeps for `interval` and
    /// re-fetches the run for as long as its status is not terminal
    /// (see [`RunStatus::is_terminal`](crate::RunStatus::is_terminal)). A run
    /// that is already terminal is returned without any request. There is no
    /// upper bound on the number of polls.
    ///
    /// # Arguments
    ///
    /// * `run` - The run returned by [`create_run`](Self::create_run).
    /// * `interval` - The delay before each status check.
    /// * `out` - Receives a `Run status: …` line after every poll.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use bill_analyst::OpenAiClient;
    /// # use std::time::Duration;
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// # let client = OpenAiClient::new(Some("your_api_key".to_string()))?;
    /// let run = client.create_run("thread_abc", "asst_abc").await?;
    /// let finished = client
    ///     .wait_for_run(run, Duration::from_secs(2), &mut std::io::stdout())
    ///     .await?;
    /// println!("Run finished: {}", finished.status);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_run<W: Write>(
        &self,
        mut run: Run,
        interval: Duration,
        out: &mut W,
    ) -> Result<Run, AnalystError> {
        while !run.status.is_terminal() {
            sleep(interval).await;
            run = self.get_run(&run.thread_id, &run.id).await?;
            info!(run_id = %run.id, status = %run.status, "polled run");
            writeln!(out, "Run status: {}", run.status)?;
            out.flush()?;
        }
        Ok(run)
    }

    /// Lists every message in a thread, newest first.
    pub async fn list_messages(&self, thread_id: &str) -> Result<Vec<Message>, AnalystError> {
        self.list_all(&format!("threads/{}/messages", thread_id), Some("desc"))
            .await
    }

    /// Fetches the raw content of a stored file.
    pub async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, AnalystError> {
        let url = self
            .base_url
            .join(&format!("files/{}/content", file_id))?;
        let response = self.client.get(url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Downloads a stored file to `dest`, creating its parent directory if needed.
    ///
    /// # Returns
    ///
    /// The path the file was written to.
    pub async fn download_file<P: AsRef<Path>>(
        &self,
        file_id: &str,
        dest: P,
    ) -> Result<PathBuf, AnalystError> {
        let dest = dest.as_ref();
        let content = self.file_content(file_id).await?;

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = File::create(dest).await?;
        file.write_all(&content).await?;
        file.flush().await?;

        debug!(file_id, path = %dest.display(), bytes = content.len(), "file downloaded");
        Ok(dest.to_path_buf())
    }

    async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        order: Option<&str>,
    ) -> Result<Vec<T>, AnalystError> {
        let url = self.base_url.join(path)?;
        let mut items = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let mut request = self.client.get(url.clone()).query(&[("limit", PAGE_LIMIT)]);
            if let Some(order) = order {
                request = request.query(&[("order", order)]);
            }
            if let Some(cursor) = &after {
                request = request.query(&[("after", cursor.as_str())]);
            }

            let page: ListResponse<T> = Self::parse_response(request.send().await?).await?;
            debug!(path, count = page.data.len(), has_more = page.has_more, "fetched page");
            items.extend(page.data);

            match (page.has_more, page.last_id) {
                (true, Some(last_id)) => after = Some(last_id),
                _ => return Ok(items),
            }
        }
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, AnalystError> {
        let response = Self::check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn check_status(response: Response) -> Result<Response, AnalystError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        debug!(status = status.as_u16(), %message, "request failed");
        Err(AnalystError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}
