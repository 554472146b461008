use rand::seq::SliceRandom;
use rand::Rng;

/// The only phrases ever accepted as a joke's closing "realization" line.
/// Order matters: tone overrides refer to entries by position.
pub const ENDINGS: [&str; 6] = [
    "Shit! I was telling it the wrong way...",
    "Hmm... wait, wait, that's not the way.",
    "Oh no... I started from the end again.",
    "Hold on, hold on... I skipped the important part.",
    "Damn, I mixed up two jokes again...",
    "Wait... that's not how it goes. Let me start over.",
];

/// Read-only view over `ENDINGS`. Copyable and shared freely across requests.
#[derive(Clone, Copy, Debug)]
pub struct EndingCatalog {
    entries: &'static [&'static str],
}

impl Default for EndingCatalog {
    fn default() -> Self {
        Self { entries: &ENDINGS }
    }
}

impl EndingCatalog {
    pub fn entries(&self) -> &'static [&'static str] {
        self.entries
    }

    /// Entry at a zero-based position.
    pub fn get(&self, index: usize) -> Option<&'static str> {
        self.entries.get(index).copied()
    }

    /// Returns the catalog's own copy of `phrase` when it is an exact member.
    pub fn lookup(&self, phrase: &str) -> Option<&'static str> {
        self.entries.iter().copied().find(|e| *e == phrase)
    }

    /// The entry the text ends with, ignoring trailing whitespace.
    pub fn trailing_entry(&self, text: &str) -> Option<&'static str> {
        let text = text.trim_end();
        self.entries.iter().copied().find(|e| text.ends_with(e))
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        self.entries.choose(rng).copied().unwrap_or(ENDINGS[0])
    }

    /// Total count of catalog occurrences in `text`, across all entries.
    pub fn occurrences(&self, text: &str) -> usize {
        self.entries
            .iter()
            .map(|e| text.matches(e).count())
            .sum()
    }
}
