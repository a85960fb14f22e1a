use clap::Parser;
use colored::*;
use deck2html::{Bundler, DEFAULT_OUTPUT};
use std::path::PathBuf;
use std::process;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "deck2html")]
#[command(about = "CLI utility to pack a multi-file HTML presentation into a single self-contained page")]
#[command(version = "0.1.0")]
struct Args {
    /// Presentation root directory (must contain main.html)
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Output filename
    #[arg(short = 'o', long = "output", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Embed images and videos as base64 data URIs (creates very large files)
    #[arg(long = "embed-media")]
    embed_media: bool,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::from_default_env()
        .add_directive("deck2html=info".parse().unwrap());

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let args = Args::parse();

    let bundler = Bundler::new(args.dir, args.output, args.embed_media);
    if let Err(e) = bundler.run().await {
        error!("{}", format!("Error: {}", e).red());
        process::exit(1);
    }
}
