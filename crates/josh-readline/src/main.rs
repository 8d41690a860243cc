use std::borrow::Cow::{self, Borrowed, Owned};
use std::env;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{debug, warn};

use josh_core::persona::{Persona, default_persona};
use josh_core::session::{ConversationMessage, MessageRole};
use josh_infrastructure::{JoshPaths, SecretStorage};
use josh_interaction::{ChatSession, InteractionResult};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec!["/key".to_string(), "/history".to_string()],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Resolves the OpenAI credential: secret.json first, environment second.
///
/// Returns the API key and an optional model name override.
fn resolve_credential() -> (Option<String>, Option<String>) {
    match SecretStorage::new() {
        Ok(storage) => match storage.load() {
            Ok(config) => {
                if let Some(openai) = config.openai {
                    if !openai.api_key.is_empty() {
                        debug!(path = %storage.path().display(), "loaded API key from secret file");
                        return (Some(openai.api_key), openai.model_name);
                    }
                }
            }
            Err(err) => debug!(error = %err, "no usable secret file"),
        },
        Err(err) => warn!(error = %err, "could not resolve config directory"),
    }

    let api_key = env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty());
    let model_name = env::var("OPENAI_MODEL_NAME").ok();
    (api_key, model_name)
}

fn print_turn(persona: &Persona, message: &ConversationMessage) {
    match message.role {
        MessageRole::Human => {
            println!("{}", format!("> {}", message.content).green());
        }
        MessageRole::Assistant => {
            println!("{}", format!("[{}]", persona.name).bright_magenta());
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            println!();
        }
    }
}

/// Renders the full transcript top-to-bottom.
async fn render_transcript(session: &ChatSession) {
    for message in session.turns().await {
        print_turn(session.persona(), &message);
    }
}

/// The main entry point for the J.O.S.H. readline REPL.
///
/// Each iteration reads one line, runs one blocking exchange against the
/// completion service, and prints the new assistant turn. There is no
/// background work: one interaction, one call.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let (mut api_key, model_name) = resolve_credential();

    let mut session = ChatSession::new_session(default_persona());
    if let Some(model_name) = model_name {
        session = session.with_model(model_name);
    }

    println!("{}", "=== J.O.S.H. ===".bright_magenta().bold());
    println!("{}", "A Jesus-Oriented Shepherd of Hearts.".bright_black());
    println!(
        "{}",
        "Type '/key' to paste an API key, '/history' to re-read the conversation, or 'quit' to exit."
            .bright_black()
    );
    println!();

    if api_key.is_none() {
        let mut hint = String::from(
            "No OpenAI API key found. Paste one with /key, or set OPENAI_API_KEY",
        );
        if let Ok(path) = JoshPaths::ensure_secret_file() {
            hint.push_str(&format!(", or fill in {}", path.display()));
        }
        hint.push('.');
        println!("{}", hint.yellow());
        println!();
    }

    render_transcript(&session).await;

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Go in peace, dear friend.".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if trimmed == "/history" {
                    render_transcript(&session).await;
                    continue;
                }

                if trimmed == "/key" {
                    match rpassword::prompt_password("OpenAI API key: ") {
                        Ok(key) if !key.trim().is_empty() => {
                            api_key = Some(key.trim().to_string());
                            println!("{}", "API key saved for this session.".bright_green());
                        }
                        Ok(_) => {
                            println!("{}", "Empty key ignored.".yellow());
                        }
                        Err(err) => {
                            eprintln!("{}", format!("Could not read key: {err}").red());
                        }
                    }
                    continue;
                }

                // Echo the user turn before the blocking completion call
                println!("{}", format!("> {trimmed}").green());

                match session.handle_input(trimmed, api_key.as_deref()).await {
                    InteractionResult::NewTurns(turns) => {
                        for turn in turns.iter().filter(|t| t.role == MessageRole::Assistant) {
                            print_turn(session.persona(), turn);
                        }
                    }
                    InteractionResult::MissingCredential(message) => {
                        println!("{}", message.yellow());
                        println!("{}", "You can also paste one with /key.".yellow());
                    }
                    InteractionResult::Failed(message) => {
                        eprintln!("{}", format!("Error: {message}").red());
                    }
                    InteractionResult::NoOp => {}
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}
