use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { question: question.into().to_lowercase(), answer: answer.into() }
    }
}

/// Canned answers keyed by a lower-case question fragment.
///
/// Entries are checked in insertion order and the first fragment contained in
/// the input wins, so overlapping fragments resolve deterministically.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaqMatcher {
    entries: Vec<FaqEntry>,
}

impl Default for FaqMatcher {
    fn default() -> Self {
        Self::new(vec![
            FaqEntry::new(
                "what is your return policy",
                "You can return items within 14 days of delivery for a full refund (item must be unused).",
            ),
            FaqEntry::new(
                "how to contact support",
                "You can contact support at support@example.com or call +1-800-555-1234.",
            ),
            FaqEntry::new(
                "do you ship internationally",
                "Yes, we ship to many countries. Shipping costs vary by destination.",
            ),
        ])
    }
}

impl FaqMatcher {
    pub fn new(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, text: &str) -> Option<&FaqEntry> {
        let normalized = text.trim().to_lowercase();
        self.entries.iter().find(|entry| normalized.contains(entry.question.as_str()))
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::{FaqEntry, FaqMatcher};

    #[test]
    fn matches_question_inside_longer_input() {
        let faqs = FaqMatcher::default();
        let entry = faqs.find("  Hi! What is your RETURN policy for shoes?").expect("faq hit");

        assert_eq!(entry.question, "what is your return policy");
        assert!(entry.answer.starts_with("You can return items within 14 days"));
    }

    #[test]
    fn no_match_returns_none() {
        assert!(FaqMatcher::default().find("tell me a joke").is_none());
    }

    #[test]
    fn first_entry_wins_on_overlap() {
        let faqs = FaqMatcher::new(vec![
            FaqEntry::new("shipping", "general shipping answer"),
            FaqEntry::new("shipping cost", "cost answer"),
        ]);

        let entry = faqs.find("what is the shipping cost").expect("faq hit");
        assert_eq!(entry.answer, "general shipping answer");
    }

    #[test]
    fn default_table_keeps_declared_order() {
        let faqs = FaqMatcher::default();
        let questions: Vec<&str> =
            faqs.entries().iter().map(|entry| entry.question.as_str()).collect();
        assert_eq!(
            questions,
            vec!["what is your return policy", "how to contact support", "do you ship internationally"]
        );
    }
}
