use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PORT: u16 = 8000;

#[derive(Parser)]
#[command(name = "jobscout", about = "Multi-source job search assistant", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP chat API
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Ask one question from the terminal and print the answer
    Ask { message: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve { port: DEFAULT_PORT }) {
        Command::Serve { port } => {
            info!("Starting Multi-Source Job Search Assistant");
            job_search::start_web_server(port).await
        }
        Command::Ask { message } => {
            let agent = job_search::agent::shared_agent().await?;
            let reply = agent.respond(&message, &[]).await?;
            println!("{reply}");
            Ok(())
        }
    }
}
