use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "stockdash")]
#[command(about = "Market data service for Indian equities with provider fallback", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (default: STOCKDASH_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List index constituents with live quotes
    List {
        /// Index to list: nifty50 or nifty100
        #[arg(short, long, default_value = "nifty50")]
        index: String,

        /// Sort field: name, price, change, volume
        #[arg(short, long, default_value = "name")]
        sort: String,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// Use global mode (Finnhub) instead of Indian providers
        #[arg(short, long)]
        global: bool,
    },

    /// Fetch the latest quote for one symbol
    Quote {
        /// Symbol, with or without the NSE: prefix
        symbol: String,

        /// Use global mode (Finnhub) instead of Indian providers
        #[arg(short, long)]
        global: bool,
    },

    /// Fetch historical candles for one symbol
    History {
        /// Symbol, with or without the NSE: prefix
        symbol: String,

        /// Timeframe: daily, weekly, monthly
        #[arg(short, long, default_value = "daily")]
        timeframe: String,

        /// Show at most this many of the latest candles
        #[arg(short, long, default_value = "30")]
        limit: usize,

        /// Use global mode (Finnhub) instead of Indian providers
        #[arg(short, long)]
        global: bool,
    },
}

pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port),
        Commands::List {
            index,
            sort,
            desc,
            global,
        } => commands::list::run(&index, &sort, desc, global),
        Commands::Quote { symbol, global } => commands::quote::run(&symbol, global),
        Commands::History {
            symbol,
            timeframe,
            limit,
            global,
        } => commands::history::run(&symbol, &timeframe, limit, global),
    }
}
