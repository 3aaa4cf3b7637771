use crate::client::OpenAiClient;
use crate::error::AnalystError;
use crate::types::{MessageRole, Run};
use std::io::Write;
use tracing::debug;

/// Opens a new thread, posts `prompt` as the user, and starts a run of the assistant.
///
/// Returns the run as reported by the creation call; it is usually still
/// queued and should be handed to [`OpenAiClient::wait_for_run`].
pub async fn start_conversation<W: Write>(
    client: &OpenAiClient,
    assistant_id: &str,
    prompt: &str,
    out: &mut W,
) -> Result<Run, AnalystError> {
    let thread = client.create_thread().await?;
    debug!(thread_id = %thread.id, "thread created");

    let message = client
        .create_message(&thread.id, MessageRole::User, prompt)
        .await?;
    debug!(message_id = %message.id, "prompt posted");

    let run = client.create_run(&thread.id, assistant_id).await?;
    writeln!(out, "Starting run with assistant {}...", assistant_id)?;
    Ok(run)
}
