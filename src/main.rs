use anyhow::Context;
use clap::Parser;
use claude_stream::cli::{run, Args};
use env_logger::Env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "error" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    run(args).await.context("Request to the Claude API failed")
}
