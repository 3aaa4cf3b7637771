//! Utility-bill analysis on top of the OpenAI Assistants API.
//!
//! The crate uploads a CSV file, picks or creates an assistant with the code
//! interpreter enabled, asks it for a chart and a forecast, waits for the run
//! to finish, and saves whatever text and images come back.
//!
//! ## Features
//! - A typed async client for the endpoints the workflow needs.
//! - An interactive assistant menu that reads from any `BufRead`.
//! - Run polling on a fixed interval until a terminal status.
//! - Image outputs downloaded to deterministic local file names.
//!
//! The `bill-analyst` binary wires these together with [`run_analysis`].

pub mod assistant;
pub mod client;
pub mod config;
pub mod conversation;
pub mod error;
pub mod harvest;
pub mod pipeline;
pub mod types;

pub use client::OpenAiClient;
pub use config::{AnalystConfig, AssistantProfile};
pub use error::AnalystError;
pub use harvest::HarvestReport;
pub use pipeline::{run_analysis, AnalysisReport};
pub use types::*;
