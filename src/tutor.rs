// Canned tutor replies until a model backend exists

const KEYWORD: &str = "explain";

pub fn reply(message: &str) -> String {
    let lower = message.to_ascii_lowercase();

    if lower.contains(KEYWORD) {
        let concept = concept_after_explain(message, &lower);
        let concept = if concept.is_empty() { "a core concept" } else { concept };
        return format!("Here’s a beginner-friendly explanation of {concept}. (stub)");
    }

    if lower.contains("project") {
        return "Project ideas: 1) Landing page MVP, 2) File renamer CLI, 3) Dataset cleaner."
            .to_string();
    }

    "How can I help with AI + entrepreneurship today?".to_string()
}

// Text after the last "explain" that is followed by whitespace
fn concept_after_explain<'a>(message: &'a str, lower: &str) -> &'a str {
    lower
        .rmatch_indices(KEYWORD)
        .map(|(i, _)| i + KEYWORD.len())
        .find(|&end| message[end..].starts_with(char::is_whitespace))
        .map(|end| message[end..].trim())
        .unwrap_or_else(|| message.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explains_the_named_concept() {
        assert_eq!(
            reply("Can you Explain  product-market fit "),
            "Here’s a beginner-friendly explanation of product-market fit. (stub)"
        );
    }

    #[test]
    fn explain_without_topic_falls_back() {
        assert_eq!(
            reply("explain "),
            "Here’s a beginner-friendly explanation of a core concept. (stub)"
        );
    }

    #[test]
    fn project_ideas() {
        assert!(reply("any PROJECT ideas?").starts_with("Project ideas:"));
    }

    #[test]
    fn default_greeting() {
        assert_eq!(reply("hi"), "How can I help with AI + entrepreneurship today?");
    }
}
