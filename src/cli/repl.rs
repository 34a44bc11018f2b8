// src/cli/repl.rs

use crate::cli::helper::ReplHelper;
use crate::cli::ui;
use crate::config::Config;
use crate::context::{Action, ConversationContext, Mode};
use crate::error::Result;
use crate::llm::ollama::{self, FragmentStream};
use crate::prompt;
use reqwest::Client;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, error, info, warn};

const HISTORY_FILE: &str = "history.txt";
const PROMPT: &str = "❯ ";
const TITLE_MAX: usize = 50;

fn get_history_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("cmd-helper");
    std::fs::create_dir_all(&path).ok();
    path.push(HISTORY_FILE);
    path
}

// --- Main Session Loop ---

pub async fn run_interactive(config: &Config, client: &Client) -> Result<()> {
    info!("Starting interactive session");

    let helper = ReplHelper::new();
    let mut rl = Editor::<ReplHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(helper));
    let history_path = get_history_path();
    if let Err(e) = rl.load_history(&history_path) {
        debug!("No command history loaded from {:?}: {}", history_path, e);
    }

    ui::clear_screen();
    ui::print_welcome();

    let mut context = ConversationContext::new();

    loop {
        ui::print_context_bar(&context);

        match rl.readline(PROMPT) {
            Ok(line) => {
                let input = line.trim();
                if !input.is_empty() {
                    if let Err(e) = rl.add_history_entry(input) {
                        warn!("Failed to add line to history: {}", e);
                    }
                }

                match context.classify(input) {
                    Action::Ignore => continue,
                    Action::Quit => break,
                    Action::ShowWelcome => {
                        ui::clear_screen();
                        ui::print_welcome();
                    }
                    Action::MissingTopic => {
                        ui::print_info(
                            "Please specify a command or task. Try 'help' for examples.",
                        );
                    }
                    Action::UnknownMode { word } => {
                        ui::print_error(&format!(
                            "Unknown mode '{}'. Use 'tutorial', 'steps', or ask a follow-up question.",
                            word
                        ));
                    }
                    action @ (Action::Fresh { .. } | Action::Followup { .. }) => {
                        // Per-turn failures are reported and the session
                        // continues; only `quit` ends the loop.
                        if let Err(e) = run_turn(&mut context, action, config, client).await {
                            error!("Turn failed: {:?}", e);
                            ui::print_error(&format!("Error connecting to Ollama: {:#}", e));
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                ui::print_warning("Interrupted. Use 'quit' or 'exit' to leave");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                error!("Readline error: {:?}", err);
                ui::print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_path) {
        warn!("Failed to save command history to {:?}: {}", history_path, e);
    }

    println!();
    ui::print_success("Thanks for using Linux Command Helper! Happy learning!");
    info!("Exiting interactive session");
    Ok(())
}

// --- Turn Handling ---

async fn run_turn(
    context: &mut ConversationContext,
    action: Action,
    config: &Config,
    client: &Client,
) -> Result<()> {
    // A fresh command only commits its topic (and history reset) after a
    // successful response; a failed turn leaves the context untouched.
    let (prompt, title, query, new_topic) = match action {
        Action::Fresh { mode, topic } => {
            let prompt = match mode {
                Mode::Tutorial => prompt::tutorial_prompt(&topic, ""),
                Mode::Steps => prompt::steps_prompt(&topic, ""),
            };
            let title = format!("{}: {}", mode, topic);
            (prompt, title, topic.clone(), Some((mode, topic)))
        }
        Action::Followup { question } => {
            let prompt = prompt::followup_prompt(context.history(), &question);
            let title = truncate_title(&question);
            (prompt, title, question, None)
        }
        _ => unreachable!("run_turn only receives Fresh and Followup actions"),
    };

    println!();
    let spinner = ui::Spinner::start("Processing your request");
    let drained = match ollama::generate(client, config, &prompt).await {
        Ok(mut stream) => drain_response(&mut stream).await,
        Err(e) => Err(e),
    };
    spinner.stop().await;

    match drained? {
        None => {
            ui::print_warning("Interrupted. Use 'quit' or 'exit' to leave");
        }
        Some(response) if response.is_empty() => {
            ui::print_error("No response received from Ollama. Please try again.");
        }
        Some(response) => {
            ui::print_response_header(&title);
            render_markdown(&response);
            ui::print_response_footer();
            println!();

            if let Some((mode, topic)) = new_topic {
                context.start_topic(mode, topic);
            }
            context.record_exchange(&query, &response);
        }
    }

    Ok(())
}

/// Accumulate the fragment stream into the full response text. Returns
/// `None` when the user interrupts the wait; the in-flight request is
/// simply abandoned.
async fn drain_response(stream: &mut FragmentStream) -> Result<Option<String>> {
    let mut full = String::new();
    loop {
        tokio::select! {
            fragment = stream.next_fragment() => match fragment? {
                Some(text) => full.push_str(&text),
                None => return Ok(Some(full)),
            },
            _ = tokio::signal::ctrl_c() => return Ok(None),
        }
    }
}

fn truncate_title(question: &str) -> String {
    if question.chars().count() > TITLE_MAX {
        let short: String = question.chars().take(TITLE_MAX).collect();
        format!("{}...", short)
    } else {
        question.to_string()
    }
}

/// Render a markdown response through `glow` when it is installed, falling
/// back to plain text.
fn render_markdown(response: &str) {
    if let Ok(mut glow_process) = Command::new("glow")
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
    {
        if let Some(mut stdin) = glow_process.stdin.take() {
            if let Err(e) = stdin.write_all(response.as_bytes()) {
                warn!("Failed to write to glow's stdin: {}", e);
            }
        }
        if let Err(e) = glow_process.wait() {
            warn!("Failed to wait for glow: {}", e);
        }
    } else {
        println!("{}", response.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(truncate_title("what about -v?"), "what about -v?");
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        let long = "x".repeat(80);
        let title = truncate_title(&long);
        assert_eq!(title.chars().count(), TITLE_MAX + 3);
        assert!(title.ends_with("..."));
    }
}
