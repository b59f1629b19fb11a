//! course-rag: answers questions about course material with a language model
//! that searches a content repository through a bounded tool loop.
//!
//! # Quick Start
//!
//! ```no_run
//! use course_rag::prelude::*;
//!
//! # async fn example() -> course_rag::error::Result<()> {
//! let config = RagConfig::from_env();
//! let assistant = CourseAssistant::from_config(&config)?;
//! let answer = assistant.query("What does lesson 5 of the MCP course cover?", None).await?;
//! println!("{}", answer.answer);
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod evidence;
pub mod models;
pub mod orchestrator;
pub mod prelude;
pub mod provider;
pub mod repository;
pub mod session;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub mod telemetry;
