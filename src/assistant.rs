//! Choosing the assistant that will run the analysis.
//!
//! Existing assistants are offered in a numbered menu on the operator's
//! terminal. Picking one rebinds it to the freshly uploaded file; typing `n`,
//! or having no assistants at all, creates a new one from the configured
//! [`AssistantProfile`].

use crate::client::OpenAiClient;
use crate::config::AssistantProfile;
use crate::error::AnalystError;
use crate::types::{Assistant, FileObject, ToolResources};
use dialoguer::Input;
use std::io::{self, BufRead, Write};
use tracing::debug;

const MENU_PROMPT: &str = "Choose an assistant by number, or type 'n' to create a new one: ";

/// What the operator asked for at the assistant menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Create a new assistant.
    Create,
    /// Use the existing assistant at this zero-based position.
    Existing(usize),
}

/// Why a menu answer was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidChoice {
    NotANumber,
    OutOfRange,
}

/// Interprets one line typed at the menu, given how many assistants were listed.
///
/// `n` (either case) selects creation; otherwise the answer must be a
/// 1-based position in the list.
pub fn parse_choice(raw: &str, count: usize) -> Result<MenuChoice, InvalidChoice> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("n") {
        return Ok(MenuChoice::Create);
    }

    let number: i64 = raw.parse().map_err(|_| InvalidChoice::NotANumber)?;
    match usize::try_from(number) {
        Ok(n) if (1..=count).contains(&n) => Ok(MenuChoice::Existing(n - 1)),
        _ => Err(InvalidChoice::OutOfRange),
    }
}

/// Where the operator's answers at the menu come from.
pub trait LineSource {
    /// Shows `prompt` and returns the next answer, or `None` once input is exhausted.
    fn next_line<W: Write>(&mut self, prompt: &str, out: &mut W) -> io::Result<Option<String>>;
}

/// Plain line-oriented input, used for piped stdin and in tests.
impl<R: BufRead> LineSource for R {
    fn next_line<W: Write>(&mut self, prompt: &str, out: &mut W) -> io::Result<Option<String>> {
        write!(out, "{}", prompt)?;
        out.flush()?;

        let mut line = String::new();
        if self.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

/// Interactive input on a terminal, with line editing by `dialoguer`.
///
/// dialoguer renders the prompt itself as `"{prompt}: "`, so the trailing
/// separator is stripped before handing it over.
pub struct TerminalInput;

impl LineSource for TerminalInput {
    fn next_line<W: Write>(&mut self, prompt: &str, out: &mut W) -> io::Result<Option<String>> {
        out.flush()?;
        let answer = Input::<String>::new()
            .with_prompt(prompt.trim_end_matches(": "))
            .allow_empty(true)
            .interact_text()?;
        Ok(Some(answer))
    }
}

/// Prompts until the operator gives a valid answer.
///
/// Invalid answers are reported and the prompt is shown again, without limit.
///
/// # Errors
///
/// `AnalystError::InputClosed` if `input` reaches end of file first.
pub fn prompt_choice<L: LineSource, W: Write>(
    input: &mut L,
    out: &mut W,
    count: usize,
) -> Result<MenuChoice, AnalystError> {
    loop {
        let Some(line) = input.next_line(MENU_PROMPT, out)? else {
            return Err(AnalystError::InputClosed);
        };

        match parse_choice(&line, count) {
            Ok(choice) => return Ok(choice),
            Err(InvalidChoice::NotANumber) => {
                writeln!(out, "Invalid input. Please enter a number or 'n'.")?
            }
            Err(InvalidChoice::OutOfRange) => writeln!(out, "Invalid number. Please try again.")?,
        }
    }
}

/// Resolves the assistant for this run.
///
/// With no assistants on the account a new one is created without asking.
/// Otherwise the menu is shown; choosing an existing assistant replaces its
/// code interpreter files with `file`, so files bound by earlier runs are
/// detached.
pub async fn choose_assistant<L: LineSource, W: Write>(
    client: &OpenAiClient,
    profile: &AssistantProfile,
    file: &FileObject,
    input: &mut L,
    out: &mut W,
) -> Result<Assistant, AnalystError> {
    writeln!(out, "Fetching existing assistants...")?;
    let assistants = client.list_assistants().await?;
    debug!(count = assistants.len(), "listed assistants");

    if assistants.is_empty() {
        writeln!(out, "No existing assistants found.")?;
        return create_assistant(client, profile, file, out).await;
    }

    writeln!(out, "Existing Assistants:")?;
    for (i, assistant) in assistants.iter().enumerate() {
        writeln!(out, "{}. {} ({})", i + 1, assistant.display_name(), assistant.id)?;
    }

    match prompt_choice(input, out, assistants.len())? {
        MenuChoice::Create => create_assistant(client, profile, file, out).await,
        MenuChoice::Existing(index) => {
            let chosen = &assistants[index];
            writeln!(out, "Using assistant: {}", chosen.display_name())?;
            client
                .update_assistant(
                    &chosen.id,
                    ToolResources::code_interpreter_files(vec![file.id.clone()]),
                )
                .await
        }
    }
}

/// Creates a new assistant from `profile` with `file` bound to its code interpreter.
pub async fn create_assistant<W: Write>(
    client: &OpenAiClient,
    profile: &AssistantProfile,
    file: &FileObject,
    out: &mut W,
) -> Result<Assistant, AnalystError> {
    writeln!(out, "Creating a new assistant...")?;
    let assistant = client
        .create_assistant(
            profile,
            ToolResources::code_interpreter_files(vec![file.id.clone()]),
        )
        .await?;
    writeln!(
        out,
        "New assistant created: {} ({})",
        assistant.display_name(),
        assistant.id
    )?;
    Ok(assistant)
}
