// src/context.rs
//
// Conversation state carried between turns, plus classification of raw
// input lines into session actions.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tutorial,
    Steps,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Tutorial => write!(f, "Tutorial"),
            Mode::Steps => write!(f, "Steps"),
        }
    }
}

/// What the session loop should do with one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Empty line, nothing to do.
    Ignore,
    /// `quit` / `exit` / `q`.
    Quit,
    /// `help` / `clear` — redisplay the welcome screen.
    ShowWelcome,
    /// `tutorial <topic>` or `steps <task>` — start a new topic.
    Fresh { mode: Mode, topic: String },
    /// Continuation question against the active topic. Carries the whole
    /// original input, not just the part after the first word.
    Followup { question: String },
    /// A bare mode-less word with no active topic to attach it to.
    MissingTopic,
    /// Unrecognized first word while no topic is active.
    UnknownMode { word: String },
}

/// In-memory conversation state. `mode` and `topic` are set together by
/// `start_topic` and never individually; follow-ups are possible only while
/// `mode` is set.
#[derive(Debug, Clone, Default)]
pub struct ConversationContext {
    mode: Option<Mode>,
    topic: String,
    history: String,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn history(&self) -> &str {
        &self.history
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    /// Classify one raw input line. Pure: the context is only consulted to
    /// decide whether mode-less input counts as a follow-up.
    pub fn classify(&self, input: &str) -> Action {
        let input = input.trim();
        if input.is_empty() {
            return Action::Ignore;
        }

        let lowered = input.to_lowercase();
        match lowered.as_str() {
            "quit" | "exit" | "q" => return Action::Quit,
            "help" | "clear" => return Action::ShowWelcome,
            _ => {}
        }

        let (first, rest) = match input.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim_start()),
            None => {
                // Single token: a follow-up when a topic is active, otherwise
                // there is nothing to ask about yet.
                return if self.is_active() {
                    Action::Followup {
                        question: input.to_string(),
                    }
                } else {
                    Action::MissingTopic
                };
            }
        };

        match first.to_lowercase().as_str() {
            "tutorial" => Action::Fresh {
                mode: Mode::Tutorial,
                topic: rest.to_string(),
            },
            "steps" | "step" => Action::Fresh {
                mode: Mode::Steps,
                topic: rest.to_string(),
            },
            _ => {
                // With an active topic, any unprefixed input is treated as a
                // follow-up in its entirety.
                if self.is_active() {
                    Action::Followup {
                        question: input.to_string(),
                    }
                } else {
                    Action::UnknownMode {
                        word: first.to_string(),
                    }
                }
            }
        }
    }

    /// Begin a new topic, discarding any prior history.
    pub fn start_topic(&mut self, mode: Mode, topic: String) {
        self.mode = Some(mode);
        self.topic = topic;
        self.history.clear();
    }

    /// Append one completed exchange. Called only after a successful
    /// response; a failed turn must leave the context untouched.
    pub fn record_exchange(&mut self, query: &str, response: &str) {
        if self.history.is_empty() {
            self.history = format!(
                "Topic: {}\nUser: {}\nAssistant: {}\n",
                self.topic, query, response
            );
        } else {
            self.history
                .push_str(&format!("\nUser: {}\nAssistant: {}\n", query, response));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_context() -> ConversationContext {
        let mut ctx = ConversationContext::new();
        ctx.start_topic(Mode::Tutorial, "grep".to_string());
        ctx.record_exchange("grep", "R1");
        ctx
    }

    #[test]
    fn empty_input_is_ignored() {
        let ctx = ConversationContext::new();
        assert_eq!(ctx.classify("   "), Action::Ignore);
    }

    #[test]
    fn exit_words_are_case_insensitive() {
        let ctx = ConversationContext::new();
        for word in ["quit", "EXIT", "q", "Q"] {
            assert_eq!(ctx.classify(word), Action::Quit);
        }
    }

    #[test]
    fn help_and_clear_redisplay_welcome() {
        let ctx = ConversationContext::new();
        assert_eq!(ctx.classify("help"), Action::ShowWelcome);
        assert_eq!(ctx.classify("clear"), Action::ShowWelcome);
    }

    #[test]
    fn fresh_command_parses_mode_and_topic() {
        let ctx = ConversationContext::new();
        assert_eq!(
            ctx.classify("tutorial grep"),
            Action::Fresh {
                mode: Mode::Tutorial,
                topic: "grep".to_string()
            }
        );
        assert_eq!(
            ctx.classify("STEPS setup nginx"),
            Action::Fresh {
                mode: Mode::Steps,
                topic: "setup nginx".to_string()
            }
        );
        // Singular alias.
        assert_eq!(
            ctx.classify("step mount a disk"),
            Action::Fresh {
                mode: Mode::Steps,
                topic: "mount a disk".to_string()
            }
        );
    }

    #[test]
    fn unprefixed_input_with_active_topic_is_a_followup() {
        let ctx = active_context();
        assert_eq!(
            ctx.classify("what about -v?"),
            Action::Followup {
                question: "what about -v?".to_string()
            }
        );
        // Topic untouched by classification.
        assert_eq!(ctx.topic(), "grep");
    }

    #[test]
    fn single_token_with_active_topic_is_a_followup() {
        let ctx = active_context();
        assert_eq!(
            ctx.classify("why?"),
            Action::Followup {
                question: "why?".to_string()
            }
        );
    }

    #[test]
    fn single_token_while_idle_asks_for_a_topic() {
        let ctx = ConversationContext::new();
        assert_eq!(ctx.classify("grep"), Action::MissingTopic);
    }

    #[test]
    fn unknown_mode_while_idle_is_an_error() {
        let ctx = ConversationContext::new();
        assert_eq!(
            ctx.classify("explain the ls command"),
            Action::UnknownMode {
                word: "explain".to_string()
            }
        );
    }

    #[test]
    fn fresh_command_resets_history() {
        let mut ctx = active_context();
        assert!(!ctx.history().is_empty());
        ctx.start_topic(Mode::Tutorial, "sed".to_string());
        assert_eq!(ctx.mode(), Some(Mode::Tutorial));
        assert_eq!(ctx.topic(), "sed");
        assert_eq!(ctx.history(), "");
    }

    #[test]
    fn history_is_seeded_then_appended() {
        let mut ctx = ConversationContext::new();
        ctx.start_topic(Mode::Tutorial, "grep".to_string());
        ctx.record_exchange("grep", "R1");
        assert_eq!(ctx.history(), "Topic: grep\nUser: grep\nAssistant: R1\n");

        ctx.record_exchange("Q2", "R2");
        assert_eq!(
            ctx.history(),
            "Topic: grep\nUser: grep\nAssistant: R1\n\nUser: Q2\nAssistant: R2\n"
        );
    }
}
