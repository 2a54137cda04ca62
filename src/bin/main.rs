use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "soundtracker-server")]
#[command(about = "Movie search with matching soundtrack albums", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "soundtracker.yaml")]
    config: String,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.debug {
        "soundtracker=debug,tower_http=debug"
    } else {
        "soundtracker=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = soundtracker::run(&args.config, args.debug).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
