// Keyword classifier over the fixed complaint taxonomy.
//
// Score = number of distinct trigger keywords present. Highest score wins,
// ties go to the earlier-declared category. With no category hit the
// general-complaint triggers are checked, then the user-experience ones,
// then "Other". Pure and total.

use gripewatch_common::taxonomy::{GENERAL_COMPLAINT, OTHER, USER_EXPERIENCE};
use gripewatch_common::{normalize, Candidate, CategoryTaxonomy, ComplaintResult, SourceKind};

#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    taxonomy: &'a CategoryTaxonomy,
}

impl Classifier<'static> {
    /// Classifier over the process-wide taxonomy.
    pub fn standard() -> Self {
        Self::new(CategoryTaxonomy::standard())
    }
}

impl<'a> Classifier<'a> {
    pub fn new(taxonomy: &'a CategoryTaxonomy) -> Self {
        Self { taxonomy }
    }

    /// Distinct keyword hits per category, in declaration order.
    pub fn scores(&self, text: &str) -> Vec<(&'static str, usize)> {
        let folded = normalize(text).to_lowercase();
        self.taxonomy
            .rules()
            .iter()
            .map(|rule| {
                let hits = rule.keywords.iter().filter(|kw| folded.contains(*kw)).count();
                (rule.name, hits)
            })
            .collect()
    }

    pub fn classify(&self, text: &str) -> &'static str {
        if text.trim().is_empty() {
            return OTHER;
        }

        let mut best: Option<(&'static str, usize)> = None;
        for (name, score) in self.scores(text) {
            // Strictly greater: an equal later score never displaces an
            // earlier category.
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((name, score));
            }
        }
        if let Some((name, _)) = best {
            return name;
        }

        let folded = normalize(text).to_lowercase();
        if contains_any(&folded, self.taxonomy.general_triggers()) {
            GENERAL_COMPLAINT
        } else if contains_any(&folded, self.taxonomy.experience_triggers()) {
            USER_EXPERIENCE
        } else {
            OTHER
        }
    }

    /// Classify `title + " " + excerpt` and attach the label. Pipeline
    /// messages such as the no-results entry are always "Other".
    pub fn classify_candidate(&self, candidate: Candidate) -> ComplaintResult {
        let category = match candidate.source {
            SourceKind::System => OTHER,
            _ => self.classify(&candidate.classification_text()),
        };
        ComplaintResult::new(candidate, category)
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text.contains(kw))
}

/// Shorthand for `Classifier::standard().classify(text)`.
pub fn classify(text: &str) -> &'static str {
    Classifier::standard().classify(text)
}

#[cfg(test)]
mod tests {
    use gripewatch_common::{CategoryRule, Query};

    use super::*;

    #[test]
    fn empty_text_is_other() {
        assert_eq!(classify(""), "Other");
        assert_eq!(classify("   \n"), "Other");
    }

    #[test]
    fn highest_score_wins() {
        assert_eq!(classify("billing issue, was overcharged"), "Pricing & Billing");
    }

    #[test]
    fn repeated_keyword_counts_once() {
        // "crash crash crash" is one distinct hit for Bugs & Errors; two
        // distinct Delivery hits beat it.
        assert_eq!(classify("crash crash crash, shipping delay"), "Delivery Problems");
    }

    #[test]
    fn ties_go_to_earlier_category() {
        // One hit each: Customer Support ("support"), Pricing & Billing ("refund").
        let text = "asked support for a refund";
        let scores = Classifier::standard().scores(text);
        assert_eq!(scores[0], ("Customer Support", 1));
        assert_eq!(scores[1], ("Pricing & Billing", 1));
        for _ in 0..10 {
            assert_eq!(classify(text), "Customer Support");
        }
    }

    #[test]
    fn general_complaint_fallback() {
        assert_eq!(classify("worst company ever"), "General Complaint");
        assert_eq!(classify("a real PROBLEM"), "General Complaint");
    }

    #[test]
    fn user_experience_fallback() {
        assert_eq!(classify("terrible experience overall"), "User Experience");
        assert_eq!(classify("just leaving a review"), "User Experience");
    }

    #[test]
    fn general_beats_user_experience() {
        assert_eq!(classify("bad experience"), "General Complaint");
    }

    #[test]
    fn nothing_matches_is_other() {
        assert_eq!(classify("hello world"), "Other");
    }

    #[test]
    fn always_returns_a_taxonomy_member() {
        let taxonomy = CategoryTaxonomy::standard();
        for text in ["", "scam", "login failed", "x", "late fee refund scam support"] {
            assert!(taxonomy.contains(classify(text)));
        }
    }

    #[test]
    fn candidate_uses_title_and_excerpt() {
        let candidate = Candidate {
            title: "Acme".to_string(),
            excerpt: "they stole my card details".to_string(),
            url: "https://x/1".to_string(),
            source: SourceKind::Forum,
        };
        let result = Classifier::standard().classify_candidate(candidate.clone());
        assert_eq!(result.category, "Scam & Fraud");
        assert_eq!(result.candidate, candidate);
    }

    #[test]
    fn no_results_entry_is_other() {
        let sentinel = Candidate::no_results(&Query::parse("Acme").unwrap());
        assert_eq!(classify(&sentinel.classification_text()), "General Complaint");
        let result = Classifier::standard().classify_candidate(sentinel);
        assert_eq!(result.category, "Other");
    }

    #[test]
    fn custom_taxonomy() {
        static RULES: &[CategoryRule] = &[
            CategoryRule {
                name: "Hardware",
                keywords: &["battery", "screen"],
            },
            CategoryRule {
                name: "Software",
                keywords: &["update", "app"],
            },
        ];
        let taxonomy = CategoryTaxonomy::new(RULES.to_vec(), &["annoying"], &["thoughts"]);
        let classifier = Classifier::new(&taxonomy);

        assert_eq!(classifier.classify("the update drained my battery"), "Hardware");
        assert_eq!(classifier.classify("app update broke the app"), "Software");
        assert_eq!(classifier.classify("so annoying"), GENERAL_COMPLAINT);
        assert_eq!(classifier.classify("some thoughts"), USER_EXPERIENCE);
        assert_eq!(classifier.classify("refund please"), OTHER);
    }
}
