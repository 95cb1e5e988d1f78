use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use project_plan::config::{StoreArgs, StoreConfig, DEFAULT_HOST, DEFAULT_PORT};
use project_plan::{api, mcp, Catalog};

#[derive(Parser)]
#[command(name = "pplan")]
#[command(about = "Project and todo tracking over MCP")]
struct Cli {
    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over streamable HTTP at /mcp
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port for HTTP
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Start MCP server via stdio
    Mcp,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the stdio MCP transport, so logs go to stderr.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "project_plan=debug,plan_core=debug,tower_http=debug".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = StoreConfig::from_args(&cli.store)?.open()?;
    let catalog = Catalog::new(store);

    match cli.command {
        Some(Commands::Serve { host, port }) => serve(catalog, &host, port).await?,
        Some(Commands::Mcp) => mcp::run_stdio_server(catalog).await?,
        None => serve(catalog, DEFAULT_HOST, DEFAULT_PORT).await?,
    }

    Ok(())
}

async fn serve(catalog: Catalog, host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting project plan server on port {}", port);

    let app = api::create_router(catalog);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    tracing::info!("MCP endpoint listening on http://{}:{}/mcp", host, port);

    axum::serve(listener, app).await?;
    Ok(())
}
