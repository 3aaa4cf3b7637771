use crate::assistant::{choose_assistant, LineSource};
use crate::client::OpenAiClient;
use crate::config::AnalystConfig;
use crate::conversation::start_conversation;
use crate::error::AnalystError;
use crate::harvest::{harvest_outputs, HarvestReport};
use crate::types::RunStatus;
use std::io::Write;

/// The ids and results of one complete analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub file_id: String,
    pub assistant_id: String,
    pub thread_id: String,
    pub run_id: String,
    /// The terminal status the run ended in.
    pub run_status: RunStatus,
    pub harvest: HarvestReport,
}

/// Runs the whole analysis: upload, choose an assistant, converse, wait, harvest.
///
/// `input` supplies the operator's answer at the assistant menu and `out`
/// receives all console output. Outputs are harvested whatever terminal
/// status the run ends in; a failed run simply yields no assistant replies.
pub async fn run_analysis<L: LineSource, W: Write>(
    client: &OpenAiClient,
    config: &AnalystConfig,
    input: &mut L,
    out: &mut W,
) -> Result<AnalysisReport, AnalystError> {
    writeln!(out, "Uploading file...")?;
    let file = client
        .upload_file(&config.input_path, &config.upload_purpose)
        .await?;
    writeln!(out, "File uploaded successfully.")?;

    let assistant = choose_assistant(client, &config.assistant, &file, input, out).await?;

    let run = start_conversation(client, &assistant.id, &config.prompt, out).await?;
    let run = client.wait_for_run(run, config.poll_interval, out).await?;
    writeln!(out, "Run finished: {}", run.status)?;

    let harvest = harvest_outputs(client, config, &run.thread_id, out).await?;

    Ok(AnalysisReport {
        file_id: file.id,
        assistant_id: assistant.id,
        thread_id: run.thread_id,
        run_id: run.id,
        run_status: run.status,
        harvest,
    })
}
