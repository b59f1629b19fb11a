//! Subcommand handlers.

use std::io::Write;
use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::{AskArgs, ChatArgs};
use crate::config::RagConfig;
use crate::error::RagError;
use crate::evidence::Evidence;
use crate::session::CourseAssistant;

/// Numbered `Sources:` block, empty when there is no evidence.
pub fn format_sources(sources: &[Evidence]) -> String {
    if sources.is_empty() {
        return String::new();
    }
    let mut out = String::from("Sources:");
    for (i, source) in sources.iter().enumerate() {
        match &source.link {
            Some(link) => out.push_str(&format!("\n  {}. {} ({link})", i + 1, source.text)),
            None => out.push_str(&format!("\n  {}. {}", i + 1, source.text)),
        }
    }
    out
}

pub async fn handle_ask(config_path: Option<&Path>, args: AskArgs) -> Result<(), RagError> {
    let config = args.model.apply(RagConfig::load(config_path)?);
    let assistant = CourseAssistant::from_config(&config)?;

    let (answer, sources) = assistant.answer(&args.query, None).await?;
    println!("{answer}");
    let sources = format_sources(&sources);
    if !sources.is_empty() {
        println!("\n{sources}");
    }
    Ok(())
}

pub async fn handle_chat(config_path: Option<&Path>, args: ChatArgs) -> Result<(), RagError> {
    let config = args.model.apply(RagConfig::load(config_path)?);
    let assistant = CourseAssistant::from_config(&config)?;
    let session_id = assistant.sessions().create_session();

    eprintln!("Ask about the courses. Type 'exit' to quit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if matches!(query, "exit" | "quit") {
            break;
        }

        match assistant.query(query, Some(&session_id)).await {
            Ok(answer) => {
                println!("{}", answer.answer);
                let sources = format_sources(&answer.sources);
                if !sources.is_empty() {
                    println!("\n{sources}");
                }
                println!();
            }
            // A failed turn does not end the session.
            Err(e) => eprintln!("Error: {e}"),
        }
    }
    Ok(())
}

pub async fn handle_courses(config_path: Option<&Path>) -> Result<(), RagError> {
    let config = RagConfig::load(config_path)?;
    let assistant = CourseAssistant::from_config(&config)?;

    let analytics = assistant.course_analytics().await?;
    println!("{} course(s)", analytics.total_courses);
    for title in &analytics.course_titles {
        println!("  - {title}");
    }
    Ok(())
}
