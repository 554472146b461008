use rand::Rng;
use tracing::debug;

use crate::model::endings::EndingCatalog;
use crate::model::joke_artifact::JokeArtifact;
use crate::model::joke_request::Tone;

const SEPARATOR_DASH: &str = " — ";
const CUT_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '-', '–', '—', '…'];

/// Makes a joke end with exactly one catalog phrase and contain no other.
#[derive(Clone, Copy, Debug, Default)]
pub struct EndingEnforcer {
    catalog: EndingCatalog,
}

impl EndingEnforcer {
    pub fn new(catalog: EndingCatalog) -> Self {
        Self { catalog }
    }

    /// Rewrite `artifact.joke` and `artifact.ending_phrase` in place.
    pub fn apply<R: Rng + ?Sized>(&self, artifact: &mut JokeArtifact, rng: &mut R) {
        let ending = self.select(&artifact.joke, &artifact.ending_phrase, artifact.tone, rng);
        artifact.joke = self.place(&artifact.joke, ending);
        artifact.ending_phrase = ending.to_string();
    }

    /// Choose which catalog phrase the joke will end with.
    pub fn select<R: Rng + ?Sized>(
        &self,
        joke: &str,
        claimed: &str,
        tone: Tone,
        rng: &mut R,
    ) -> &'static str {
        if let Some(forced) = tone.rule().forced_ending.and_then(|i| self.catalog.get(i)) {
            return forced;
        }
        if let Some(ending) = self.catalog.lookup(claimed) {
            return ending;
        }
        if let Some(ending) = self.catalog.trailing_entry(joke) {
            debug!(claimed, ending, "ending_phrase mislabeled, using trailing catalog entry");
            return ending;
        }
        let ending = self.catalog.pick(rng);
        debug!(claimed, ending, "no catalog ending found, picked one");
        ending
    }

    /// Cut the joke at the last occurrence of `ending` and reattach it as the only one.
    pub fn place(&self, joke: &str, ending: &str) -> String {
        let text = joke.trim_end();

        if text.ends_with(ending) && self.catalog.occurrences(text) == 1 {
            return text.to_string();
        }

        let head = match text.rfind(ending) {
            Some(index) => &text[..index],
            None => text,
        };
        let head = self.remove_entries(head);
        let head = head.trim_end_matches(|c: char| c.is_whitespace() || CUT_PUNCTUATION.contains(&c));

        if head.is_empty() {
            return ending.to_string();
        }

        let separator = if head.contains('\n') { "\n" } else { SEPARATOR_DASH };
        format!("{}{}{}", head, separator, ending)
    }

    /// Remove every catalog occurrence, closing the gap it leaves.
    fn remove_entries(&self, text: &str) -> String {
        let mut out = text.to_string();

        loop {
            let first = self
                .catalog
                .entries()
                .iter()
                .filter_map(|e| out.find(e).map(|i| (i, e.len())))
                .min_by_key(|(i, _)| *i);
            let Some((start, len)) = first else {
                break;
            };

            let left = &out[..start];
            let right = &out[start + len..];
            let left_kept = left.trim_end();
            let right_kept = right.trim_start();
            let gap_has_newline = left[left_kept.len()..].contains('\n')
                || right[..right.len() - right_kept.len()].contains('\n');

            let joiner = if left_kept.is_empty() || right_kept.is_empty() {
                ""
            } else if gap_has_newline {
                "\n"
            } else {
                " "
            };
            out = format!("{}{}{}", left_kept, joiner, right_kept);
        }

        out
    }
}
