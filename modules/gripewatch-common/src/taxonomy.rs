// Fixed complaint taxonomy.
//
// Declaration order is significant: it breaks score ties in the classifier.

use std::sync::LazyLock;

pub const GENERAL_COMPLAINT: &str = "General Complaint";
pub const USER_EXPERIENCE: &str = "User Experience";
pub const OTHER: &str = "Other";

/// One category and its trigger keywords.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct CategoryTaxonomy {
    rules: Vec<CategoryRule>,
    general_triggers: &'static [&'static str],
    experience_triggers: &'static [&'static str],
}

static STANDARD: LazyLock<CategoryTaxonomy> = LazyLock::new(|| CategoryTaxonomy {
    rules: vec![
        CategoryRule {
            name: "Customer Support",
            keywords: &["support", "service", "agent", "help", "no response", "ignored"],
        },
        CategoryRule {
            name: "Pricing & Billing",
            keywords: &["price", "billing", "charge", "fee", "refund", "subscription", "invoice"],
        },
        CategoryRule {
            name: "Scam & Fraud",
            keywords: &["scam", "fraud", "stole", "fake", "phishing", "unauthorized"],
        },
        CategoryRule {
            name: "Quality Issues",
            keywords: &["broken", "defective", "poor", "quality", "stopped"],
        },
        CategoryRule {
            name: "Delivery Problems",
            keywords: &["delivery", "shipping", "late", "delay"],
        },
        CategoryRule {
            name: "Bugs & Errors",
            keywords: &["bug", "error", "crash", "glitch"],
        },
        CategoryRule {
            name: "Account & Access",
            keywords: &["login", "locked out", "password", "suspended", "banned"],
        },
    ],
    general_triggers: &["problem", "issue", "complaint", "bad", "worst"],
    experience_triggers: &["review", "experience", "feedback"],
});

impl CategoryTaxonomy {
    /// `rules` in declaration order; earlier rules win score ties.
    pub fn new(
        rules: Vec<CategoryRule>,
        general_triggers: &'static [&'static str],
        experience_triggers: &'static [&'static str],
    ) -> Self {
        Self {
            rules,
            general_triggers,
            experience_triggers,
        }
    }

    /// The process-wide taxonomy. Built on first use, never mutated.
    pub fn standard() -> &'static CategoryTaxonomy {
        &STANDARD
    }

    /// Category rules in declaration order.
    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn general_triggers(&self) -> &'static [&'static str] {
        self.general_triggers
    }

    pub fn experience_triggers(&self) -> &'static [&'static str] {
        self.experience_triggers
    }

    /// Every name `classify` can return, in declaration order followed by
    /// the fallbacks.
    pub fn category_names(&self) -> Vec<&'static str> {
        self.rules
            .iter()
            .map(|r| r.name)
            .chain([GENERAL_COMPLAINT, USER_EXPERIENCE, OTHER])
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.category_names().iter().any(|n| *n == name)
    }
}
