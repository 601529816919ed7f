//! Terminal REPL over the turn executor.
//!
//! Commands:
//!   /model <openai|gemini>   route the next turn to a specific provider
//!   /system <text>           set the system instruction (empty clears it)
//!   /save <path>             save the transcript as JSON
//!   /load <path>             load a previously saved transcript
//!   /history                 render the transcript
//!   /clear                   drop the transcript
//!   /info                    show both model descriptors
//!   /quit                    exit

use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use tandem_chat::prelude::*;

#[tokio::main]
async fn main() -> Result<(), LlmError> {
    // .env is optional; a missing file is not an error.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = Config::from_env()?;

    let openai = OpenAiClient::new(config.openai);
    let gemini = GeminiClient::new(config.gemini);

    // A missing key disables that provider only; the session still runs
    // against the other one. With both missing there is nothing to talk to.
    if let (Err(openai_err), Err(gemini_err)) = (&openai, &gemini) {
        eprintln!("error: openai unavailable: {openai_err}");
        eprintln!("error: gemini unavailable: {gemini_err}");
        return Err(LlmError::ConfigurationError(
            "no usable provider: set OPENAI_API_KEY and GOOGLE_API_KEY".to_string(),
        ));
    }

    let openai_ok = openai.is_ok();
    let openai: Box<dyn ChatModel> = match openai {
        Ok(client) => Box::new(client),
        Err(e) => {
            eprintln!("warning: openai unavailable: {e}");
            Box::new(UnavailableModel::from_error("OpenAI", e))
        }
    };
    let gemini: Box<dyn ChatModel> = match gemini {
        Ok(client) => Box::new(client),
        Err(e) => {
            eprintln!("warning: gemini unavailable: {e}");
            Box::new(UnavailableModel::from_error("Google", e))
        }
    };

    let executor = TurnExecutor::new(openai, gemini);
    let mut conversation = Conversation::new();
    if !openai_ok {
        // Start on the provider that can actually answer; /model can still
        // route a turn at the unavailable one to see its remediation error.
        conversation.set_active_provider(ProviderId::Gemini);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("tandem — alternating chat over OpenAI and Gemini. /quit to exit.");
    loop {
        let provider = conversation.active_provider;
        stdout
            .write_all(format!("[{provider}]> ").as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        if let Some(rest) = line.strip_prefix('/') {
            if handle_command(rest, &executor, &mut conversation)? {
                break;
            }
            continue;
        }

        match executor.execute_turn(&mut conversation, &line).await {
            Ok(Some(reply)) => println!("{reply}"),
            Ok(None) => {}
            // Transcript keeps the user message; the session carries on.
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

/// Dispatch a slash command. Returns `true` when the session should end.
fn handle_command(
    command: &str,
    executor: &TurnExecutor,
    conversation: &mut Conversation,
) -> Result<bool, LlmError> {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => return Ok(true),
        "model" => match ProviderId::from_str(arg) {
            Ok(provider) => {
                conversation.set_active_provider(provider);
                println!("next turn goes to {provider}");
            }
            Err(e) => eprintln!("error: {e}"),
        },
        "system" => {
            let instruction = (!arg.is_empty()).then(|| arg.to_string());
            let cleared = instruction.is_none();
            conversation.set_system_instruction(instruction);
            if cleared {
                println!("system instruction cleared");
            } else {
                println!("system instruction set");
            }
        }
        "save" if !arg.is_empty() => match save_history(conversation.messages(), arg) {
            Ok(()) => println!("saved {} messages to {arg}", conversation.messages().len()),
            Err(e) => eprintln!("error: {e}"),
        },
        "load" if !arg.is_empty() => match load_history(arg) {
            Some(messages) => {
                println!("loaded {} messages from {arg}", messages.len());
                print!("{}", format_transcript(&messages));
                conversation.replace_messages(messages);
            }
            None => eprintln!("error: could not load history from {arg}"),
        },
        "history" => print!("{}", format_transcript(conversation.messages())),
        "clear" => {
            conversation.clear();
            println!("transcript cleared");
        }
        "info" => {
            for provider in [ProviderId::OpenAi, ProviderId::Gemini] {
                let info = executor.model_info(provider);
                println!(
                    "{provider}: {} ({}), temperature {}, max tokens {}",
                    info.name, info.organization, info.default_temperature, info.max_output_tokens
                );
            }
        }
        other => eprintln!("unknown command: /{other}"),
    }

    Ok(false)
}
