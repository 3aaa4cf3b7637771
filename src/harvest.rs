use crate::client::OpenAiClient;
use crate::config::AnalystConfig;
use crate::error::AnalystError;
use crate::types::{MessageContent, MessageRole};
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

/// What was collected from the assistant's replies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestReport {
    /// Every text part, in the order printed.
    pub texts: Vec<String>,
    /// Every image written to disk, in the order saved.
    pub images: Vec<PathBuf>,
}

/// Prints the assistant's text replies and saves the images it produced.
///
/// Messages are visited newest first and only assistant-authored ones are
/// considered. Each image part is downloaded to
/// [`AnalystConfig::image_path`] for its file id. Content types other than
/// text and image files are skipped.
pub async fn harvest_outputs<W: Write>(
    client: &OpenAiClient,
    config: &AnalystConfig,
    thread_id: &str,
    out: &mut W,
) -> Result<HarvestReport, AnalystError> {
    let messages = client.list_messages(thread_id).await?;
    let mut report = HarvestReport::default();

    for message in messages
        .into_iter()
        .filter(|m| m.role == MessageRole::Assistant)
    {
        for part in message.content {
            match part {
                MessageContent::Text { text } => {
                    writeln!(out, "\nAssistant says:\n {}", text.value)?;
                    report.texts.push(text.value);
                }
                MessageContent::ImageFile { image_file } => {
                    let dest = config.image_path(&image_file.file_id);
                    let saved = client.download_file(&image_file.file_id, &dest).await?;
                    writeln!(out, "Saved chart to {}", saved.display())?;
                    report.images.push(saved);
                }
                MessageContent::Unsupported => {
                    debug!(message_id = %message.id, "skipping unsupported content part");
                }
            }
        }
    }

    Ok(report)
}
