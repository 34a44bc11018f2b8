// src/cli/helper.rs
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result as RustylineResult};

// Keywords completed at the start of a line. Follow-up questions are free
// text, so nothing is completed past the first word.
const KEYWORDS: [&str; 8] = [
    "tutorial", "steps", "step", "help", "clear", "quit", "exit", "q",
];

#[derive(Helper)]
pub struct ReplHelper {}

impl ReplHelper {
    pub fn new() -> Self {
        Self {}
    }
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> RustylineResult<(usize, Vec<Self::Candidate>)> {
        // Only complete while still typing the first word.
        if line[..pos].contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }

        let prefix = &line[..pos];
        let completions = KEYWORDS
            .iter()
            .filter(|kw| kw.starts_with(prefix))
            .map(|kw| Pair {
                display: kw.to_string(),
                replacement: format!("{} ", kw),
            })
            .collect();
        Ok((0, completions))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Validator for ReplHelper {}

impl Highlighter for ReplHelper {}
