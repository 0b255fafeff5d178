use super::browse::print_results;
use super::prompts::prompt_string;
use super::spinner::Spinner;
use super::{report_api_error, App};
use crate::output::Output;
use cinetime_client::CinetimeClient;
use cinetime_core::assistant::keyword_search;
use cinetime_core::{Conversation, Route};
use cinetime_models::{ChatMessage, MediaFilter};
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;
use std::sync::Arc;

const HELP: &str = "Commands: /pick <n> search one recommendation, /kind <all|movie|tv> filter results, /quit";

pub async fn chat(app: &App, message: Option<String>, kind: MediaFilter, output: &Output) -> Result<()> {
    if app.require(Route::AiSearch, output).is_none() {
        return Ok(());
    }
    let conversation = Conversation::new(Arc::clone(&app.client));
    conversation.set_filter(kind);

    if let Some(message) = message {
        send(&conversation, &message, output).await;
        return Ok(());
    }

    if let Some(greeting) = conversation.messages().first() {
        print_reply(greeting, output);
    }
    output.info(HELP);
    loop {
        let line = prompt_string("You", None)?;
        let line = line.trim();
        match line.split_once(' ').map(|(cmd, arg)| (cmd, arg.trim())).unwrap_or((line, "")) {
            ("/quit" | "/exit", _) => break,
            ("/help", _) => output.info(HELP),
            ("/kind", arg) => match arg.parse::<MediaFilter>() {
                Ok(filter) => {
                    conversation.set_filter(filter);
                    print_results(&conversation.filtered_results(), output);
                }
                Err(e) => output.error(e),
            },
            ("/pick", arg) => match arg.parse::<usize>() {
                Ok(n) if n > 0 => pick(&conversation, n - 1, output).await,
                _ => output.error("Usage: /pick <number>"),
            },
            _ => send(&conversation, line, output).await,
        }
    }
    Ok(())
}

async fn send(conversation: &Conversation<CinetimeClient>, message: &str, output: &Output) {
    let spinner = Spinner::start("Thinking...");
    let reply = conversation.send(message).await;
    spinner.finish();

    let Some(reply) = reply else {
        return;
    };
    let results = conversation.filtered_results();
    output.render(&json!({ "reply": reply, "results": results }), || {
        print_reply(&reply, output);
        if !results.is_empty() {
            print_results(&results, output);
        }
    });
}

async fn pick(conversation: &Conversation<CinetimeClient>, index: usize, output: &Output) {
    let spinner = Spinner::start("Searching...");
    let result = conversation.search_recommendation(index).await;
    spinner.finish();

    match result {
        Ok(results) => print_results(&results, output),
        Err(e) => output.error(e.to_string()),
    }
}

fn print_reply(message: &ChatMessage, output: &Output) {
    output.render(message, || {
        println!("{} {}", "Assistant:".cyan().bold(), message.content);
        for (i, rec) in message.recommendations.iter().enumerate() {
            let year = rec.year.as_deref().map(|y| format!(" ({})", y)).unwrap_or_default();
            println!("  {}. {}{} [{}]", i + 1, rec.title.bold(), year, rec.kind);
            if !rec.reason.is_empty() {
                println!("     {}", rec.reason.dimmed());
            }
        }
    });
}

pub async fn ai_search(app: &App, query: &str, kind: MediaFilter, output: &Output) -> Result<()> {
    if app.require(Route::AiSearch, output).is_none() {
        return Ok(());
    }
    let spinner = Spinner::start("Searching...");
    let result = keyword_search(app.client.as_ref(), query, kind).await;
    spinner.finish();

    match result {
        Ok(results) => print_results(&results, output),
        Err(e) => report_api_error(output, &e, "Search failed"),
    }
    Ok(())
}
