use colored::Colorize;
use log::debug;

use super::args::Args;
use crate::{
    core::{Config, LLMError, Presenter},
    providers::{
        claude::{
            types::Message, BuiltRequest, ClaudeClient, Prompt, ProtocolMode, RequestBuilder,
            RequestParams,
        },
        llm::LLMClient,
        AccumulatedResult,
    },
};
use std::io::{self, Write};

/// Applies command line overrides on top of the loaded config
fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(model) = &args.model {
        config.model.clone_from(model);
    }
    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }
    if args.temperature.is_some() {
        config.temperature = args.temperature;
    }
    if args.top_k.is_some() {
        config.top_k = args.top_k;
    }
    if args.top_p.is_some() {
        config.top_p = args.top_p;
    }
    if args.system.is_some() {
        config.system_prompt.clone_from(&args.system);
    }
    if !args.stop_sequences.is_empty() {
        config.stop_sequences = Some(args.stop_sequences.clone());
    }
    if args.thinking_budget.is_some() {
        config.thinking_budget = args.thinking_budget;
    }
    if args.show_thinking {
        config.show_thinking = true;
    }
    if args.no_stream {
        config.stream = false;
    }
}

/// Wraps the query in the prompt shape the model's protocol expects
fn prompt_for(model: &str, query: String) -> Prompt {
    match ProtocolMode::for_model(model) {
        ProtocolMode::Legacy => Prompt::Text(query),
        ProtocolMode::Messages => Prompt::Messages(vec![Message::user(query)]),
    }
}

pub async fn run(args: Args) -> Result<(), LLMError> {
    let _ = dotenv::dotenv();

    let query = args.query.join(" ");
    if query.trim().is_empty() {
        return Err(LLMError::ConfigError("Query must not be empty".to_string()));
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    apply_overrides(&mut config, &args);
    debug!(
        "[SETTINGS] model: {}, stream: {}, thinking_budget: {:?}",
        config.model, config.stream, config.thinking_budget
    );

    // Credentials and the prompt shape are checked before any network I/O
    let api_key = config.resolve_api_key(args.api_key.clone())?;
    let params = RequestParams::from_config(&config, prompt_for(&config.model, query));
    let request = RequestBuilder::build(params)?;
    for notice in &request.notices {
        eprintln!("{} {notice}", "Notice:".yellow().bold());
    }

    let client = ClaudeClient::with_base_url(api_key, config.base_url.clone());
    let mut stdout = io::stdout();

    if args.json {
        let result = collect_silently(&client, &request, config.stream).await?;
        let reply = result.into_reply(config.show_thinking);
        let json = serde_json::to_string_pretty(&reply)
            .map_err(|e| LLMError::ResponseFormat(format!("Failed to serialize reply: {e}")))?;
        writeln!(&mut stdout, "{json}")?;
        return Ok(());
    }

    let mut presenter = Presenter::new(&mut stdout, config.show_thinking);
    if config.stream {
        let stream = client.query_streaming(&request).await?;
        presenter.render_stream(stream).await?;
    } else {
        let result = client.query(&request).await?;
        presenter.write_result(&result)?;
    }

    // Ensure final newline
    writeln!(&mut stdout)?;
    Ok(())
}

async fn collect_silently(
    client: &dyn LLMClient,
    request: &BuiltRequest,
    stream: bool,
) -> Result<AccumulatedResult, LLMError> {
    if stream {
        let stream = client.query_streaming(request).await?;
        Presenter::new(io::sink(), false).render_stream(stream).await
    } else {
        client.query(request).await
    }
}
