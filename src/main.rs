//! course-rag CLI binary entry point.

use course_rag::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    course_rag::telemetry::init_telemetry_with_level(&cli.log_level);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Ask(args) => commands::handle_ask(config, args).await,
        Commands::Chat(args) => commands::handle_chat(config, args).await,
        Commands::Courses => commands::handle_courses(config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
