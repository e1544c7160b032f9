//! Conversation runner — make two Ollama models talk to each other.

use clap::Parser;

use confab::conversation::have_conversation;
use confab::inference::{OllamaClient, DEFAULT_BASE_URL};

#[derive(Parser)]
#[command(
    name = "confab",
    about = "Make two local Ollama models talk to each other"
)]
struct Cli {
    /// Initial prompt to start the conversation
    prompt: String,

    /// Name of the first model (speaks first)
    #[arg(long, default_value = "llama2")]
    model_a: String,

    /// Name of the second model
    #[arg(long, default_value = "llama2")]
    model_b: String,

    /// Number of turns in the conversation
    #[arg(long, default_value_t = 4)]
    turns: u32,

    /// Base URL of the Ollama server
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// Initialize the tracing subscriber — logs go to stderr so they never mix
/// with the conversation output on stdout.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "confab=debug" } else { "confab=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let client = OllamaClient::new(&cli.base_url)?;
    let history =
        have_conversation(&cli.model_a, &cli.model_b, &cli.prompt, cli.turns, &client).await?;

    for turn in &history {
        println!("{}: {}", turn.model, turn.text);
    }

    Ok(())
}
