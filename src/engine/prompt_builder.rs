use crate::model::endings::EndingCatalog;
use crate::model::joke_request::{legal_values, JokeRequest, Length, Role, Scenario, Tone};

/// Builds the full prompt sent to the generator.
/// Formatting only: no parsing, no networking.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(request: &JokeRequest, catalog: &EndingCatalog) -> String {
        let mut prompt = String::new();

        push_system_prompt(&mut prompt);
        push_legal_values(&mut prompt);
        push_request_section(&mut prompt, request);
        push_ending_catalog(&mut prompt, catalog);
        push_output_format(&mut prompt);
        push_tone_addendum(&mut prompt, request.tone);

        prompt
    }
}

fn push_system_prompt(prompt: &mut String) {
    prompt.push_str(
        "You are a stand-up comedian telling a short anecdote-style joke.\n\n\
Rules:\n\
- Write in English.\n\
- No insults towards real people, no slurs, no sexual content, no politics.\n\
- Do NOT deliver a classic punchline.\n\
- The teller interrupts themselves with one realization phrase from the ending list.\n\
- The ending must read as an abrupt interruption, not a natural continuation of the story.\n\
- Use the ending phrase exactly once, as the very last line of the joke, and nowhere else.\n\n"
    );
}

fn push_legal_values(prompt: &mut String) {
    prompt.push_str("LEGAL VALUES:\n");
    prompt.push_str(&format!("- scenario: {}\n", legal_values(Scenario::ALL)));
    prompt.push_str(&format!("- roles: {}\n", legal_values(Role::ALL)));
    prompt.push_str(&format!("- tone: {}\n", legal_values(Tone::ALL)));
    prompt.push_str(&format!("- length: {}\n\n", legal_values(Length::ALL)));
}

fn push_request_section(prompt: &mut String, request: &JokeRequest) {
    let roles = request
        .roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    prompt.push_str("REQUEST:\n");
    prompt.push_str(&format!("- scenario: {}\n", request.scenario));
    prompt.push_str(&format!("- roles: {}\n", roles));
    prompt.push_str(&format!("- tone: {}\n", request.tone));
    prompt.push_str(&format!(
        "- length: {} ({})\n\n",
        request.length,
        length_hint(request.length)
    ));
}

fn length_hint(length: Length) -> &'static str {
    match length {
        Length::Short => "two or three sentences",
        Length::Medium => "a short paragraph",
        Length::Long => "two or three paragraphs",
    }
}

fn push_ending_catalog(prompt: &mut String, catalog: &EndingCatalog) {
    prompt.push_str("ENDING LIST (copy exactly, character for character):\n");
    for (i, ending) in catalog.entries().iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, ending));
    }
    prompt.push('\n');
}

fn push_output_format(prompt: &mut String) {
    prompt.push_str(
        "Output Format:\n\
Respond with a single JSON object and nothing else. No markdown, no code fences, no explanations.\n\
{\n\
  \"joke\": \"<joke text ending with the chosen phrase>\",\n\
  \"scenario\": \"<scenario from the request>\",\n\
  \"roles\": [\"<role>\"],\n\
  \"tone\": \"<tone from the request>\",\n\
  \"length\": \"<length from the request>\",\n\
  \"ending_phrase\": \"<the chosen phrase, exactly as listed>\",\n\
  \"tags\": [\"<short label>\"]\n\
}\n\n"
    );
}

fn push_tone_addendum(prompt: &mut String, tone: Tone) {
    if let Some(addendum) = tone.rule().addendum {
        prompt.push_str(addendum);
        prompt.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::endings::ENDINGS;

    fn request(tone: Tone) -> JokeRequest {
        JokeRequest {
            scenario: Scenario::Queue,
            roles: vec![Role::Visitor, Role::Cashier],
            tone,
            length: Length::Short,
        }
    }

    #[test]
    fn embeds_request_values_and_full_catalog() {
        let prompt = PromptBuilder::build(&request(Tone::Dry), &EndingCatalog::default());
        assert!(prompt.contains("- scenario: Queue\n"));
        assert!(prompt.contains("- roles: Visitor, Cashier\n"));
        assert!(prompt.contains("- length: short ("));
        for ending in ENDINGS {
            assert!(prompt.contains(ending));
        }
        assert!(prompt.contains(&legal_values(Scenario::ALL)));
    }

    #[test]
    fn is_deterministic() {
        let catalog = EndingCatalog::default();
        assert_eq!(
            PromptBuilder::build(&request(Tone::Absurd), &catalog),
            PromptBuilder::build(&request(Tone::Absurd), &catalog)
        );
    }

    #[test]
    fn appends_tone_addendum_only_when_defined() {
        let catalog = EndingCatalog::default();
        let absurd = PromptBuilder::build(&request(Tone::Absurd), &catalog);
        let dry = PromptBuilder::build(&request(Tone::Dry), &catalog);

        let addendum = Tone::Absurd.rule().addendum.unwrap();
        assert!(absurd.contains(addendum));
        assert!(!dry.contains("TONE RULES"));
        assert!(absurd.starts_with(&dry.replace("- tone: Dry\n", "- tone: Absurd\n")));
    }
}
