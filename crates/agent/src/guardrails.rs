pub const OFFENSIVE_WORDS: [&str; 6] = ["idiot", "stupid", "hate", "kill", "damn", "shut up"];
pub const NEGATIVE_WORDS: [&str; 7] =
    ["angry", "upset", "unhappy", "not happy", "complain", "bad", "terrible"];

pub const OFFENSIVE_REPLY: &str =
    "I'm here to help, but I can't respond to offensive language. Could you rephrase your question?";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GuardrailVerdict {
    pub offensive: bool,
    pub negative: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Block { reason_code: &'static str, user_message: String },
}

/// Keyword screen applied to every utterance before routing.
///
/// Matching is a case-insensitive substring test with no word boundaries, so
/// "damnation" trips the same rule as "damn".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardrailFilter {
    offensive: Vec<String>,
    negative: Vec<String>,
}

impl Default for GuardrailFilter {
    fn default() -> Self {
        Self::new(OFFENSIVE_WORDS, NEGATIVE_WORDS)
    }
}

impl GuardrailFilter {
    pub fn new(
        offensive: impl IntoIterator<Item = impl Into<String>>,
        negative: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self { offensive: lowercase_all(offensive), negative: lowercase_all(negative) }
    }

    pub fn evaluate(&self, text: &str) -> GuardrailVerdict {
        let lowered = text.to_lowercase();
        GuardrailVerdict {
            offensive: self.offensive.iter().any(|word| lowered.contains(word.as_str())),
            negative: self.negative.iter().any(|word| lowered.contains(word.as_str())),
        }
    }

    pub fn gate(&self, text: &str) -> GuardrailDecision {
        if self.evaluate(text).offensive {
            GuardrailDecision::Block {
                reason_code: "offensive_language",
                user_message: OFFENSIVE_REPLY.to_string(),
            }
        } else {
            GuardrailDecision::Allow
        }
    }
}

fn lowercase_all(words: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    words.into_iter().map(|word| word.into().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::{GuardrailDecision, GuardrailFilter, GuardrailVerdict, OFFENSIVE_REPLY};

    #[test]
    fn offensive_match_is_case_insensitive_substring() {
        let filter = GuardrailFilter::default();

        assert!(filter.evaluate("You are an IDIOT").offensive);
        assert!(filter.evaluate("what damnation is this").offensive);
        assert!(filter.evaluate("please SHUT UP already").offensive);
        assert!(!filter.evaluate("where is my parcel").offensive);
    }

    #[test]
    fn negative_and_offensive_are_independent() {
        let filter = GuardrailFilter::default();

        assert_eq!(
            filter.evaluate("I am so angry about this"),
            GuardrailVerdict { offensive: false, negative: true }
        );
        assert_eq!(
            filter.evaluate("I hate this terrible service"),
            GuardrailVerdict { offensive: true, negative: true }
        );
        assert_eq!(filter.evaluate("hello"), GuardrailVerdict::default());
    }

    #[test]
    fn multi_word_negative_phrase_matches() {
        let filter = GuardrailFilter::default();
        assert!(filter.evaluate("I'm Not Happy with the delivery").negative);
    }

    #[test]
    fn gate_blocks_offensive_with_rephrase_prompt() {
        let filter = GuardrailFilter::default();

        assert_eq!(filter.gate("check order A100"), GuardrailDecision::Allow);
        assert_eq!(
            filter.gate("this is stupid"),
            GuardrailDecision::Block {
                reason_code: "offensive_language",
                user_message: OFFENSIVE_REPLY.to_string(),
            }
        );
    }

    #[test]
    fn negative_only_input_is_not_blocked() {
        let filter = GuardrailFilter::default();
        assert_eq!(filter.gate("I am upset"), GuardrailDecision::Allow);
    }

    #[test]
    fn custom_word_lists_are_lowercased() {
        let filter = GuardrailFilter::new(["Rude"], ["Sad"]);

        assert_eq!(
            filter.evaluate("so RUDE and sad"),
            GuardrailVerdict { offensive: true, negative: true }
        );
    }
}
