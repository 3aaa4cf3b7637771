#![allow(dead_code)]

use bill_analyst::{AnalystConfig, FileObject, OpenAiClient};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new_with_url("test_api_key".to_string(), &server.uri()).unwrap()
}

/// A config that writes into `output_dir` and polls without real delays.
pub fn test_config(output_dir: &Path) -> AnalystConfig {
    AnalystConfig {
        output_dir: output_dir.to_path_buf(),
        poll_interval: Duration::from_millis(10),
        ..Default::default()
    }
}

pub fn uploaded_file(id: &str) -> FileObject {
    FileObject {
        id: id.to_string(),
        purpose: "assistants".to_string(),
        filename: Some("optima_sonoran.csv".to_string()),
        bytes: Some(128),
    }
}

pub fn list_body(data: Vec<Value>) -> Value {
    json!({
        "object": "list",
        "data": data,
        "first_id": null,
        "last_id": null,
        "has_more": false
    })
}

pub fn assistant_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "object": "assistant",
        "name": name,
        "model": "gpt-4o",
        "instructions": null,
        "tools": [{ "type": "code_interpreter" }],
        "tool_resources": { "code_interpreter": { "file_ids": [] } }
    })
}

pub fn run_json(status: &str) -> Value {
    json!({
        "id": "run_1",
        "object": "thread.run",
        "thread_id": "thread_1",
        "assistant_id": "asst_1",
        "status": status
    })
}

pub fn text_part(value: &str) -> Value {
    json!({ "type": "text", "text": { "value": value, "annotations": [] } })
}

pub fn image_part(file_id: &str) -> Value {
    json!({ "type": "image_file", "image_file": { "file_id": file_id } })
}

pub fn message_json(id: &str, role: &str, content: Vec<Value>) -> Value {
    json!({
        "id": id,
        "object": "thread.message",
        "thread_id": "thread_1",
        "role": role,
        "content": content
    })
}

pub async fn mount_assistant_list(server: &MockServer, assistants: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path("/assistants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(assistants)))
        .mount(server)
        .await;
}

/// Answers successive requests with the given run statuses, repeating the last one.
pub struct RunSequence {
    statuses: Vec<&'static str>,
    calls: AtomicUsize,
}

impl RunSequence {
    pub fn new(statuses: Vec<&'static str>) -> Self {
        Self {
            statuses,
            calls: AtomicUsize::new(0),
        }
    }
}

impl wiremock::Respond for RunSequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let status = self.statuses[call.min(self.statuses.len() - 1)];
        ResponseTemplate::new(200).set_body_json(run_json(status))
    }
}
