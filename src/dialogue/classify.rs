//! Reply normalisation and classification.
//!
//! A model reply is either a directive asking the user for more
//! information, a finished `title, description, reward` triple, or
//! something we cannot read. Directives are tried in a fixed priority
//! order before the triple parse.

use super::types::DialogueOutcome;

/// Result of classifying one normalised reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Outcome(DialogueOutcome),
    Unparseable(String),
}

type Constructor = fn(&str) -> DialogueOutcome;

/// Directive keywords in priority order, first match wins.
const DIRECTIVES: [(&str, Constructor); 4] = [
    ("endDialog", end_dialog),
    ("getText", get_text),
    ("getTrue", get_true),
    ("chooseOption", choose_option),
];

/// Clean a raw model reply down to the line we classify.
///
/// Surrounding dots and whitespace go, only the first line is kept, and
/// `AI:` labels and double quotes are removed.
pub fn normalize_reply(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let first_line = trimmed.lines().next().unwrap_or("");
    first_line.replace("AI:", "").replace('"', "").trim().to_string()
}

/// Classify a normalised reply.
pub fn classify(reply: &str) -> Classification {
    if reply.is_empty() {
        return Classification::Outcome(DialogueOutcome::Aborted { message: String::new() });
    }
    if let Some(outcome) = match_directive(reply) {
        return Classification::Outcome(outcome);
    }
    match parse_triple(reply) {
        Some(outcome) => Classification::Outcome(outcome),
        None => Classification::Unparseable(reply.to_string()),
    }
}

fn match_directive(reply: &str) -> Option<DialogueOutcome> {
    DIRECTIVES.iter().find_map(|(keyword, construct)| {
        let head = reply.get(..keyword.len())?;
        if head.eq_ignore_ascii_case(keyword) {
            Some(construct(&reply[keyword.len()..]))
        } else {
            None
        }
    })
}

fn end_dialog(rest: &str) -> DialogueOutcome {
    DialogueOutcome::Aborted { message: rest.trim().to_string() }
}

fn get_text(rest: &str) -> DialogueOutcome {
    DialogueOutcome::NeedsText { prompt: rest.trim().to_string() }
}

fn get_true(rest: &str) -> DialogueOutcome {
    DialogueOutcome::NeedsConfirmation { prompt: rest.trim().to_string() }
}

fn choose_option(rest: &str) -> DialogueOutcome {
    let Some((prompt, tail)) = rest.split_once('|') else {
        return get_text(rest);
    };
    let options: Vec<String> = tail
        .split('|')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if options.is_empty() {
        return get_text(prompt);
    }
    DialogueOutcome::NeedsChoice {
        prompt: prompt.trim().to_string(),
        options,
    }
}

fn parse_triple(reply: &str) -> Option<DialogueOutcome> {
    let clear = reply.trim().trim_matches('"');
    let fields: Vec<&str> = clear.split(',').map(str::trim).collect();
    let [title, description, reward] = fields.as_slice() else {
        return None;
    };
    if title.is_empty() {
        return None;
    }
    Some(DialogueOutcome::Completed {
        title: title.to_string(),
        description: description.to_string(),
        reward: reward.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(raw: &str) -> DialogueOutcome {
        match classify(&normalize_reply(raw)) {
            Classification::Outcome(o) => o,
            Classification::Unparseable(r) => panic!("unparseable: {r}"),
        }
    }

    #[test]
    fn test_choose_option() {
        assert_eq!(
            outcome(r#"chooseOption "Pick one" | Red | Green | Blue"#),
            DialogueOutcome::NeedsChoice {
                prompt: "Pick one".into(),
                options: vec!["Red".into(), "Green".into(), "Blue".into()],
            }
        );
    }

    #[test]
    fn test_completed_triple() {
        assert_eq!(
            outcome(r#""Homework, Finish my homework until 22:00, Good mark tomorrow""#),
            DialogueOutcome::Completed {
                title: "Homework".into(),
                description: "Finish my homework until 22:00".into(),
                reward: "Good mark tomorrow".into(),
            }
        );
    }

    #[test]
    fn test_empty_reply_aborts() {
        assert!(matches!(outcome(""), DialogueOutcome::Aborted { .. }));
        assert!(matches!(outcome(" .\n"), DialogueOutcome::Aborted { .. }));
    }

    #[test]
    fn test_end_dialog() {
        assert_eq!(
            outcome(r#"endDialog "Not enough information""#),
            DialogueOutcome::Aborted { message: "Not enough information".into() }
        );
    }

    #[test]
    fn test_get_text_and_get_true() {
        assert_eq!(
            outcome("AI: getText \"What is your project about?\""),
            DialogueOutcome::NeedsText { prompt: "What is your project about?".into() }
        );
        assert_eq!(
            outcome("GETTRUE \"Is it urgent?\""),
            DialogueOutcome::NeedsConfirmation { prompt: "Is it urgent?".into() }
        );
    }

    #[test]
    fn test_directive_priority() {
        // The remainder mentions another keyword; the earlier directive still wins.
        assert_eq!(
            outcome("endDialog chooseOption | a | b"),
            DialogueOutcome::Aborted { message: "chooseOption | a | b".into() }
        );
    }

    #[test]
    fn test_choose_option_without_options_asks_for_text() {
        assert_eq!(
            outcome("chooseOption \"Which one?\""),
            DialogueOutcome::NeedsText { prompt: "Which one?".into() }
        );
        assert_eq!(
            outcome("chooseOption Which one? | |"),
            DialogueOutcome::NeedsText { prompt: "Which one?".into() }
        );
    }

    #[test]
    fn test_only_first_line_is_used() {
        assert_eq!(
            outcome("Gym, Go to the gym, Protein shake\nAI: getText ignored"),
            DialogueOutcome::Completed {
                title: "Gym".into(),
                description: "Go to the gym".into(),
                reward: "Protein shake".into(),
            }
        );
    }

    #[test]
    fn test_unparseable() {
        let reply = normalize_reply("I am not sure what you mean");
        assert_eq!(classify(&reply), Classification::Unparseable("I am not sure what you mean".into()));
        assert!(matches!(classify("a, b"), Classification::Unparseable(_)));
        assert!(matches!(classify("a, b, c, d"), Classification::Unparseable(_)));
        assert!(matches!(classify(" , b, c"), Classification::Unparseable(_)));
    }
}
