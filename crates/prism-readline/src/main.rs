use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use tokio::time::timeout;

use prism_application::{AskHistory, AskUseCase, SessionCoordinator};
use prism_core::identity::FederatedProvider;
use prism_core::profile::ProfileUpdate;
use prism_core::visualization::{VisualizationDescriptor, VisualizationRecord};
use prism_infrastructure::{
    DirVisualizationStore, InMemoryProfileStore, LocalIdentityProvider, SampleAnswerGenerator,
};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/signup".to_string(),
                "/signin".to_string(),
                "/signout".to_string(),
                "/oauth".to_string(),
                "/whoami".to_string(),
                "/profile".to_string(),
                "/username".to_string(),
                "/history".to_string(),
                "/show".to_string(),
            ],
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

fn descriptor_summary(descriptor: &VisualizationDescriptor) -> String {
    format!(
        "{} at [{:.1}, {:.1}, {:.1}], rotation [{:.0}, {:.0}, {:.0}], color {}",
        descriptor.geometry,
        descriptor.position[0],
        descriptor.position[1],
        descriptor.position[2],
        descriptor.rotation[0],
        descriptor.rotation[1],
        descriptor.rotation[2],
        descriptor.color.as_deref().unwrap_or("default"),
    )
}

fn print_record(record: &VisualizationRecord) {
    println!(
        "{}",
        format!("{}  {}", record.created_at, record.id).bright_black()
    );
    println!("  {}", record.question);
}

/// The main entry point for the Prism readline REPL.
///
/// Wires the local adapters under the session coordinator and the ask
/// pipeline, then reads commands in a loop:
/// - `/signup`, `/signin`, `/signout`, `/oauth` drive the identity lifecycle
/// - `/whoami`, `/profile`, `/username` inspect and edit the profile
/// - `/history`, `/show` browse past visualizations
/// - any other non-empty line is submitted as a question
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // ===== Backend Initialization =====
    let provider = Arc::new(LocalIdentityProvider::new());
    let profiles = Arc::new(InMemoryProfileStore::new());
    let data_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prism")
        .join("visualizations");
    let visualizations = DirVisualizationStore::new(&data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("failed to open visualization store: {}", e))?;

    let coordinator = SessionCoordinator::start(provider, profiles).await;
    let ask = AskUseCase::new(
        Arc::new(SampleAnswerGenerator::new()),
        Arc::new(visualizations),
    );

    // ===== REPL Setup =====
    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Prism REPL ===".bright_magenta().bold());
    println!(
        "{}",
        "Sign up with '/signup <email> <password> <username>', then type a question. 'quit' to exit."
            .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts.as_slice() {
                    ["/signup", email, password, username] => {
                        match coordinator.sign_up(email, password, username).await {
                            Ok(identity) => println!(
                                "{}",
                                format!("Signed up as {} ({})", identity.email, identity.id)
                                    .green()
                            ),
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    ["/signin", email, password] => {
                        match coordinator.sign_in(email, password).await {
                            Ok(identity) => {
                                println!("{}", format!("Welcome back, {}", identity.email).green())
                            }
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    ["/signout"] => match coordinator.sign_out().await {
                        Ok(()) => println!("{}", "Signed out".green()),
                        Err(e) => eprintln!("{}", e.to_string().red()),
                    },
                    ["/oauth", provider_name] => {
                        let federated = match *provider_name {
                            "google" => FederatedProvider::Google,
                            "github" => FederatedProvider::Github,
                            other => {
                                eprintln!(
                                    "{}",
                                    format!("Unknown provider '{}'", other).red()
                                );
                                continue;
                            }
                        };
                        match coordinator.sign_in_with_provider(federated).await {
                            Ok(handle) => {
                                println!("{}", format!("Continue at: {}", handle.url).green())
                            }
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    ["/whoami"] => match coordinator.current_session().await {
                        Some(session) => println!(
                            "{}",
                            format!("Signed in as {}", session.identity.email).green()
                        ),
                        None => println!("{}", "Not signed in".bright_black()),
                    },
                    ["/profile"] => {
                        let Some(identity) = coordinator.current_identity().await else {
                            println!("{}", "Not signed in".bright_black());
                            continue;
                        };
                        match coordinator.profile(&identity.id).await {
                            Ok(Some(profile)) => println!(
                                "{}",
                                format!("{} (since {})", profile.username, profile.created_at)
                                    .green()
                            ),
                            Ok(None) => println!("{}", "No profile yet".bright_black()),
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    ["/username", username] => {
                        let Some(identity) = coordinator.current_identity().await else {
                            println!("{}", "Not signed in".bright_black());
                            continue;
                        };
                        match coordinator
                            .update_profile(&identity.id, ProfileUpdate::username(*username))
                            .await
                        {
                            Ok(profile) => println!(
                                "{}",
                                format!("Username is now {}", profile.username).green()
                            ),
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    ["/history"] => {
                        let session = coordinator.current_session().await;
                        match ask.history(session.as_ref()).await {
                            Ok(records) if records.is_empty() => {
                                println!("{}", "No questions asked yet".bright_black())
                            }
                            Ok(records) => {
                                for record in &records {
                                    print_record(record);
                                }
                            }
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    ["/show", id] => {
                        let session = coordinator.current_session().await;
                        match ask.find_visualization(session.as_ref(), id).await {
                            Ok(Some(record)) => {
                                print_record(&record);
                                for line in record.answer.lines() {
                                    println!("{}", line.bright_blue());
                                }
                                println!("{}", descriptor_summary(&record.descriptor).cyan());
                            }
                            Ok(None) => println!("{}", "No such visualization".bright_black()),
                            Err(e) => eprintln!("{}", e.to_string().red()),
                        }
                    }
                    _ if trimmed.starts_with('/') => {
                        println!("{}", "Unknown command".bright_black());
                    }
                    _ => {
                        // Anything else is a question for the pipeline.
                        let session = coordinator.current_session().await;
                        let result =
                            timeout(Duration::from_secs(30), ask.ask(session.as_ref(), trimmed))
                                .await;

                        match result {
                            Ok(Ok(outcome)) => {
                                for line in outcome.answer.lines() {
                                    println!("{}", line.bright_blue());
                                }
                                println!("{}", descriptor_summary(&outcome.descriptor).cyan());
                                match &outcome.history {
                                    AskHistory::Refreshed(records) => println!(
                                        "{}",
                                        format!("{} question(s) in your history", records.len())
                                            .bright_black()
                                    ),
                                    AskHistory::RefreshFailed(e) => {
                                        println!("{}", e.to_string().yellow())
                                    }
                                }
                            }
                            Ok(Err(e)) => {
                                eprintln!("{}", e.to_string().red());
                                // The answer survives a failed save; show it anyway.
                                if let Some(unsaved) = &e.unsaved {
                                    for line in unsaved.answer.lines() {
                                        println!("{}", line.bright_blue());
                                    }
                                    println!(
                                        "{}",
                                        descriptor_summary(&unsaved.descriptor).cyan()
                                    );
                                }
                            }
                            Err(_) => {
                                eprintln!("{}", "Error: Request timed out.".red());
                            }
                        }
                    }
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
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    coordinator.shutdown();

    Ok(())
}
