// src/cli/ui.rs
//
// Terminal presentation: welcome banner, command table, context bar,
// message panels and the busy spinner. Pure output, no session logic.

use crate::context::ConversationContext;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const PANEL_WIDTH: usize = 62;

pub fn clear_screen() {
    print!("\x1b[2J\x1b[1;1H");
    let _ = io::stdout().flush();
}

pub fn print_welcome() {
    let inner = PANEL_WIDTH - 2;
    println!();
    println!("{}", format!("╔{}╗", "═".repeat(inner)).cyan());
    println!(
        "{}{}{}",
        "║".cyan(),
        format!("{:^inner$}", "Linux Command Helper  -  Learn. Explore. Master.").bright_cyan(),
        "║".cyan()
    );
    println!("{}", format!("╚{}╝", "═".repeat(inner)).cyan());
    println!();
    println!(
        "{}",
        "Tip: start with 'tutorial <command>' or 'steps <task>', then ask follow-ups!".dimmed()
    );
    println!();
    print_command_table();
    println!();
}

fn print_command_table() {
    let rows: [(&str, &str, &str); 6] = [
        ("tutorial <cmd>", "Learn about a command", "tutorial grep"),
        ("steps <task>", "Get step-by-step guide", "steps setup nginx"),
        ("<question>", "Ask follow-up questions", "what about permissions?"),
        ("clear", "Clear the screen", "clear"),
        ("help", "Show this help", "help"),
        ("quit / exit", "Exit the program", "quit"),
    ];

    let widths = rows.iter().fold(
        ["Command".len(), "Description".len(), "Example".len()],
        |w, (c, d, e)| [w[0].max(c.len()), w[1].max(d.len()), w[2].max(e.len())],
    );

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{left}{}{mid}{}{mid}{}{right}",
            "─".repeat(widths[0] + 2),
            "─".repeat(widths[1] + 2),
            "─".repeat(widths[2] + 2)
        )
    };

    // Pad before coloring so the escape codes do not skew column widths.
    let pad = |text: &str, width: usize| format!("{:<width$}", text);

    println!("{}", rule("╭", "┬", "╮").cyan());
    println!(
        "{0} {1} {0} {2} {0} {3} {0}",
        "│".cyan(),
        pad("Command", widths[0]).cyan().bold(),
        pad("Description", widths[1]).cyan().bold(),
        pad("Example", widths[2]).cyan().bold(),
    );
    println!("{}", rule("├", "┼", "┤").cyan());
    for (command, description, example) in rows {
        println!(
            "{0} {1} {0} {2} {0} {3} {0}",
            "│".cyan(),
            pad(command, widths[0]).bright_cyan(),
            pad(description, widths[1]),
            pad(example, widths[2]).dimmed(),
        );
    }
    println!("{}", rule("╰", "┴", "╯").cyan());
}

/// One-line reminder of the active mode and topic, shown before each prompt.
pub fn print_context_bar(context: &ConversationContext) {
    if let Some(mode) = context.mode() {
        println!(
            "{} {}{} {} {}",
            "┃".cyan(),
            "Context: ".dimmed(),
            mode.to_string().bright_cyan().bold(),
            "→".dimmed(),
            context.topic().green()
        );
    }
}

/// Title rule printed above a rendered response.
pub fn print_response_header(title: &str) {
    let label = format!(" {} ", title);
    let fill = PANEL_WIDTH.saturating_sub(label.len() + 4);
    println!(
        "{}{}{}",
        "╭── ".green(),
        label.green().bold(),
        format!("{}╮", "─".repeat(fill)).green()
    );
}

pub fn print_response_footer() {
    println!("{}", format!("╰{}╯", "─".repeat(PANEL_WIDTH - 2)).green());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".cyan().bold(), message.cyan());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

// --- Busy Spinner ---

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Animated busy indicator on stderr. Runs as a background task so the
/// session loop can drain the response stream while it animates.
pub struct Spinner {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl Spinner {
    pub fn start(message: &str) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let message = message.to_string();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SPINNER_TICK);
            let mut frame = 0usize;
            while !flag.load(Ordering::Relaxed) {
                interval.tick().await;
                eprint!(
                    "\r{} {}...",
                    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()].cyan(),
                    message.cyan()
                );
                let _ = io::stderr().flush();
                frame += 1;
            }
        });
        Spinner { stop, handle }
    }

    pub async fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.await;
        // Erase the spinner line.
        eprint!("\r\x1b[2K");
        let _ = io::stderr().flush();
    }
}
