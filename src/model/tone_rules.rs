use crate::model::joke_request::Tone;

/// Extra behaviour attached to a tone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ToneRule {
    /// Constraint block appended verbatim to the prompt.
    pub addendum: Option<&'static str>,
    /// Zero-based catalog index the joke must end with, whatever the generator chose.
    pub forced_ending: Option<usize>,
}

const ABSURD_RULES: &str = "ABSURD TONE RULES:\n\
- Escalate the situation one impossible step at a time; each step must follow the previous one with total confidence.\n\
- Nobody in the scene may notice that anything is strange.\n\
- The teller must break off right as the nonsense reaches its peak.\n\
- The joke MUST end with the first phrase of the ending list, exactly as written.\n";

const DARK_RULES: &str = "DARK TONE RULES:\n\
- The darkness must come from the situation (bad luck, bureaucracy, mortality), never from mocking a group of people.\n\
- No gore, no cruelty towards the participants.\n\
- Keep the delivery calm, as if nothing unusual was said.\n";

impl Tone {
    pub fn rule(self) -> ToneRule {
        match self {
            Tone::Absurd => ToneRule {
                addendum: Some(ABSURD_RULES),
                forced_ending: Some(0),
            },
            Tone::Dark => ToneRule {
                addendum: Some(DARK_RULES),
                forced_ending: None,
            },
            Tone::Dry | Tone::Wholesome | Tone::Sarcastic => ToneRule::default(),
        }
    }
}
