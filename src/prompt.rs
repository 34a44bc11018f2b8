// src/prompt.rs
//
// Prompt templates sent to the model. Pure string formatting, no I/O.

const FOLLOWUP_SUFFIX: &str =
    "Please answer the follow-up question above, maintaining context from the previous discussion.";

/// Tutorial request for a single Linux command. When `history` is non-empty
/// the previous conversation is appended so the model can answer in context.
pub fn tutorial_prompt(command: &str, history: &str) -> String {
    let mut prompt = format!(
        "Provide a concise, practical tutorial for the Linux command: {command}\n\
         \n\
         Include:\n\
         1. Brief description (1-2 sentences)\n\
         2. Basic syntax\n\
         3. 3-5 most useful examples with explanations\n\
         4. Common options/flags\n\
         5. One tip or warning\n\
         \n\
         Keep it practical and beginner-friendly. Use markdown formatting."
    );
    append_history(&mut prompt, history);
    prompt
}

/// Step-by-step instructions for a task.
pub fn steps_prompt(task: &str, history: &str) -> String {
    let mut prompt = format!(
        "Provide clear step-by-step instructions for: {task}\n\
         \n\
         Format as:\n\
         1. Step 1: [command] - explanation\n\
         2. Step 2: [command] - explanation\n\
         ...\n\
         \n\
         Include actual commands to run. Keep it concise and actionable. Use markdown formatting."
    );
    append_history(&mut prompt, history);
    prompt
}

/// Follow-up question against an existing conversation. Unlike the fresh
/// templates, the history block is always included.
pub fn followup_prompt(history: &str, question: &str) -> String {
    format!(
        "You are helping a user learn Linux commands. Maintain context from the previous \
         conversation and answer the follow-up question.\n\
         \n\
         Previous conversation:\n\
         {history}\n\
         \n\
         Follow-up question: {question}\n\
         \n\
         Provide a helpful, concise answer that builds on the previous context. \
         Use markdown formatting where appropriate."
    )
}

fn append_history(prompt: &mut String, history: &str) {
    if !history.is_empty() {
        prompt.push_str(&format!(
            "\n\nPrevious conversation:\n{history}\n\n{FOLLOWUP_SUFFIX}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tutorial_without_history_has_no_conversation_block() {
        let prompt = tutorial_prompt("grep", "");
        assert!(prompt.contains("grep"));
        assert!(!prompt.contains("Previous conversation"));
    }

    #[test]
    fn tutorial_with_history_includes_both() {
        let history = "Topic: grep\nUser: grep\nAssistant: ...\n";
        let prompt = tutorial_prompt("grep", history);
        assert!(prompt.contains("grep"));
        assert!(prompt.contains(history));
        assert!(prompt.contains("Previous conversation"));
    }

    #[test]
    fn steps_with_history_includes_both() {
        let history = "Topic: setup nginx\nUser: setup nginx\nAssistant: ...\n";
        let prompt = steps_prompt("setup nginx", history);
        assert!(prompt.contains("setup nginx"));
        assert!(prompt.contains(history));
    }

    #[test]
    fn followup_always_embeds_history() {
        let prompt = followup_prompt("Topic: tar\n", "what about -z?");
        assert!(prompt.contains("Previous conversation"));
        assert!(prompt.contains("Topic: tar"));
        assert!(prompt.contains("what about -z?"));
    }
}
