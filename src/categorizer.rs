//! Keyword-scored transaction categorization.
//!
//! Each category owns a static keyword list. A description is cleaned (lower-cased,
//! punctuation replaced by spaces, whitespace collapsed) and every keyword that occurs
//! in it adds to its category's score:
//!
//! - `+10` when the keyword is the entire cleaned description
//! - `+5` when it occurs as a whole word
//! - `+1` when it only occurs inside another word
//!
//! The highest score wins. Equal scores go to the category declared first, and a
//! description that matches nothing is [`Category::Other`].

use crate::error::Result;
use crate::schema::{CategorizationResult, Category};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const EXACT_MATCH_SCORE: u32 = 10;
const WORD_MATCH_SCORE: u32 = 5;
const PARTIAL_MATCH_SCORE: u32 = 1;

const MAX_CONFIDENCE: f64 = 95.0;
const UNLISTED_CATEGORY_CONFIDENCE: f64 = 50.0;

/// Declaration order is the tie-break order.
pub const KEYWORD_TABLE: &[(Category, &[&str])] = &[
    (
        Category::FoodAndDining,
        &[
            "restaurant", "food", "cafe", "dining", "bazaar", "grocery", "swiggy", "zomato",
            "dominos", "pizza", "burger", "coffee", "tea", "breakfast", "lunch", "dinner",
            "snacks", "bakery", "supermarket", "vegetables", "fruits", "meat", "dairy",
        ],
    ),
    (
        Category::Transportation,
        &[
            "petrol", "gas", "uber", "taxi", "transport", "bus", "train", "metro", "auto",
            "rickshaw", "ola", "fuel", "parking", "toll", "vehicle", "car", "bike", "scooter",
            "maintenance",
        ],
    ),
    (
        Category::Shopping,
        &[
            "amazon", "shopping", "mall", "store", "purchase", "flipkart", "myntra", "clothes",
            "shoes", "electronics", "mobile", "laptop", "accessories", "jewelry", "cosmetics",
            "books", "gifts",
        ],
    ),
    (
        Category::BillsAndUtilities,
        &[
            "bill", "electricity", "water", "internet", "phone", "utility", "mobile",
            "broadband", "wifi", "gas", "cylinder", "maintenance", "society", "rent", "emi",
            "loan", "insurance", "subscription",
        ],
    ),
    (
        Category::Entertainment,
        &[
            "movie", "netflix", "entertainment", "game", "music", "spotify", "youtube",
            "cinema", "theatre", "concert", "sports", "gym", "club", "party", "vacation",
            "travel", "hotel", "booking",
        ],
    ),
    (
        Category::Healthcare,
        &[
            "doctor", "hospital", "medicine", "pharmacy", "medical", "health", "clinic",
            "dentist", "checkup", "treatment", "surgery", "insurance", "ambulance", "lab",
            "test",
        ],
    ),
    (
        Category::Education,
        &[
            "school", "college", "university", "course", "tuition", "books", "education",
            "training", "certification", "exam", "fees", "library", "stationery", "uniform",
        ],
    ),
    (
        Category::Investment,
        &[
            "mutual", "fund", "sip", "stock", "share", "investment", "trading", "demat",
            "portfolio", "dividend", "bond", "fixed", "deposit", "savings", "ppf", "nsc",
        ],
    ),
];

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new<S: AsRef<str>>(category: Category, keywords: &[S]) -> Self {
        Self {
            category,
            keywords: keywords
                .iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        }
    }
}

pub fn default_rules() -> Vec<CategoryRule> {
    KEYWORD_TABLE
        .iter()
        .map(|(category, keywords)| CategoryRule::new(*category, *keywords))
        .collect()
}

struct Keyword {
    text: String,
    whole_word: Regex,
}

struct CompiledRule {
    category: Category,
    keywords: Vec<Keyword>,
}

pub struct Categorizer {
    rules: Vec<CompiledRule>,
    non_word: Regex,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Categorizer {
    /// Categorizer over the built-in keyword table.
    pub fn new() -> Self {
        // Keywords are passed through `regex::escape`, so the only patterns that can fail
        // are the fixed `[^\w\s]` and `\b..\b` wrappers; both are valid for any input.
        Self::from_rules(default_rules()).expect("built-in keyword table compiles")
    }

    /// Categorizer over a caller-supplied table; rule order is the tie-break order.
    pub fn from_rules(rules: Vec<CategoryRule>) -> Result<Self> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let mut keywords = Vec::with_capacity(rule.keywords.len());
            for text in rule.keywords {
                let whole_word = Regex::new(&format!(r"\b{}\b", regex::escape(&text)))?;
                keywords.push(Keyword { text, whole_word });
            }
            compiled.push(CompiledRule {
                category: rule.category,
                keywords,
            });
        }

        Ok(Self {
            rules: compiled,
            non_word: Regex::new(r"[^\w\s]")?,
        })
    }

    /// Lower-cases, replaces punctuation with spaces and collapses whitespace.
    pub fn clean(&self, description: &str) -> String {
        let lowered = description.to_lowercase();
        let spaced = self.non_word.replace_all(&lowered, " ");
        spaced.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Score of every rule, in declaration order.
    pub fn scores(&self, description: &str) -> Vec<(Category, u32)> {
        let cleaned = self.clean(description);
        self.rules
            .iter()
            .map(|rule| (rule.category, score_rule(rule, &cleaned)))
            .collect()
    }

    pub fn categorize(&self, description: &str) -> Category {
        let mut best = Category::Other;
        let mut best_score = 0;

        for (category, score) in self.scores(description) {
            if score > best_score {
                best = category;
                best_score = score;
            }
        }

        best
    }

    /// Share of the category's keywords found in the lower-cased description, as a
    /// percentage capped at 95. Categories without keywords score 50.
    pub fn confidence(&self, description: &str, category: Category) -> f64 {
        let keywords = match self.rules.iter().find(|r| r.category == category) {
            Some(rule) if !rule.keywords.is_empty() => &rule.keywords,
            _ => return UNLISTED_CATEGORY_CONFIDENCE,
        };

        let lowered = description.to_lowercase();
        let matches = keywords
            .iter()
            .filter(|k| lowered.contains(k.text.as_str()))
            .count();

        (matches as f64 / keywords.len() as f64 * 100.0).min(MAX_CONFIDENCE)
    }

    pub fn categorize_expense(&self, description: &str) -> CategorizationResult {
        let category = self.categorize(description);
        let confidence = self.confidence(description, category);
        debug!(
            "Categorized '{}' as {} ({:.1}% confidence)",
            description, category, confidence
        );

        CategorizationResult {
            category,
            confidence,
            is_ai_categorized: true,
        }
    }
}

fn score_rule(rule: &CompiledRule, cleaned: &str) -> u32 {
    rule.keywords
        .iter()
        .filter(|k| cleaned.contains(k.text.as_str()))
        .map(|k| {
            if k.text == cleaned {
                EXACT_MATCH_SCORE
            } else if k.whole_word.is_match(cleaned) {
                WORD_MATCH_SCORE
            } else {
                PARTIAL_MATCH_SCORE
            }
        })
        .sum()
}

fn shared() -> &'static Categorizer {
    static DEFAULT: OnceLock<Categorizer> = OnceLock::new();
    DEFAULT.get_or_init(Categorizer::new)
}

/// Categorizes with the built-in keyword table.
pub fn categorize(description: &str) -> Category {
    shared().categorize(description)
}

/// Category plus confidence, using the built-in keyword table.
pub fn categorize_expense(description: &str) -> CategorizationResult {
    shared().categorize_expense(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_and_escaped_rules_compile() {
        assert!(Categorizer::from_rules(default_rules()).is_ok());

        let odd = vec![CategoryRule::new(Category::Other, &["c++ (books)", "a.b*", "[x]"])];
        let categorizer = Categorizer::from_rules(odd).unwrap();
        assert_eq!(categorizer.categorize("a.b*"), Category::Other);
    }

    fn score_of(categorizer: &Categorizer, description: &str, category: Category) -> u32 {
        categorizer
            .scores(description)
            .into_iter()
            .find(|(c, _)| *c == category)
            .map(|(_, s)| s)
            .unwrap()
    }

    #[test]
    fn test_known_merchants() {
        assert_eq!(categorize("Swiggy order"), Category::FoodAndDining);
        assert_eq!(categorize("Uber ride to airport"), Category::Transportation);
        assert_eq!(categorize("Amazon Purchase"), Category::Shopping);
        assert_eq!(categorize("Electric Bill"), Category::BillsAndUtilities);
        assert_eq!(categorize("Netflix movie night"), Category::Entertainment);
        assert_eq!(categorize("Apollo Pharmacy"), Category::Healthcare);
        assert_eq!(categorize("College tuition fees"), Category::Education);
        assert_eq!(categorize("SIP - mutual fund"), Category::Investment);
    }

    #[test]
    fn test_no_match_is_other() {
        assert_eq!(categorize("xyz123"), Category::Other);
        assert_eq!(categorize(""), Category::Other);
        assert_eq!(categorize("!!!"), Category::Other);
    }

    #[test]
    fn test_exact_match_outscores_everything() {
        let categorizer = Categorizer::new();
        let food = score_of(&categorizer, "Zomato", Category::FoodAndDining);
        assert_eq!(food, EXACT_MATCH_SCORE);

        for (category, score) in categorizer.scores("Zomato") {
            if category != Category::FoodAndDining {
                assert!(score < food, "{} scored {}", category, score);
            }
        }
    }

    #[test]
    fn test_scoring_tiers() {
        let categorizer = Categorizer::new();

        // "tea" is an exact match.
        assert_eq!(score_of(&categorizer, "Tea", Category::FoodAndDining), 10);
        // "cafe" and "coffee" as whole words.
        assert_eq!(
            score_of(&categorizer, "Cafe Coffee Day", Category::FoodAndDining),
            10
        );
        // "pizza" inside "pizzahut" only counts as a partial hit.
        assert_eq!(score_of(&categorizer, "pizzahut", Category::FoodAndDining), 1);
    }

    #[test]
    fn test_punctuation_is_stripped_before_matching() {
        let categorizer = Categorizer::new();
        assert_eq!(categorizer.clean("  UBER*Trip,  Bangalore!! "), "uber trip bangalore");
        assert_eq!(categorizer.categorize("UBER*Trip"), Category::Transportation);
    }

    #[test]
    fn test_tie_goes_to_first_declared_category() {
        // "gas" is listed under both Transportation and Bills & Utilities.
        assert_eq!(categorize("gas"), Category::Transportation);
        // "mobile" under both Shopping and Bills & Utilities.
        assert_eq!(categorize("mobile"), Category::Shopping);
        // "insurance" under both Bills & Utilities and Healthcare.
        assert_eq!(categorize("insurance"), Category::BillsAndUtilities);
    }

    #[test]
    fn test_tie_break_follows_custom_rule_order() {
        let forward = Categorizer::from_rules(vec![
            CategoryRule::new(Category::Entertainment, &["ticket"]),
            CategoryRule::new(Category::Transportation, &["ticket"]),
        ])
        .unwrap();
        let reversed = Categorizer::from_rules(vec![
            CategoryRule::new(Category::Transportation, &["ticket"]),
            CategoryRule::new(Category::Entertainment, &["ticket"]),
        ])
        .unwrap();

        assert_eq!(forward.categorize("train ticket"), Category::Entertainment);
        assert_eq!(reversed.categorize("train ticket"), Category::Transportation);
    }

    #[test]
    fn test_higher_score_beats_declaration_order() {
        let categorizer = Categorizer::from_rules(vec![
            CategoryRule::new(Category::Shopping, &["store"]),
            CategoryRule::new(Category::FoodAndDining, &["grocery", "store"]),
        ])
        .unwrap();

        assert_eq!(categorizer.categorize("grocery store"), Category::FoodAndDining);
    }

    #[test]
    fn test_confidence() {
        let categorizer = Categorizer::new();

        // 2 of 23 food keywords.
        let confidence = categorizer.confidence("Cafe Coffee Day", Category::FoodAndDining);
        assert!((confidence - 2.0 / 23.0 * 100.0).abs() < 1e-9);

        assert_eq!(categorizer.confidence("xyz123", Category::Other), 50.0);
        assert_eq!(categorizer.confidence("anything", Category::FoodAndDining), 0.0);
    }

    #[test]
    fn test_confidence_is_capped() {
        let categorizer =
            Categorizer::from_rules(vec![CategoryRule::new(Category::Shopping, &["mall"])])
                .unwrap();
        assert_eq!(categorizer.confidence("Phoenix Mall", Category::Shopping), 95.0);
    }

    #[test]
    fn test_categorize_expense() {
        let result = categorize_expense("Swiggy order");
        assert_eq!(result.category, Category::FoodAndDining);
        assert!(result.is_ai_categorized);
        assert!(result.confidence > 0.0);

        let result = categorize_expense("xyz123");
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.confidence, 50.0);
    }

    #[test]
    fn test_categorization_is_deterministic() {
        let categorizer = Categorizer::new();
        for description in ["Big Bazaar", "Petrol Pump", "Gym membership", "random text"] {
            assert_eq!(
                categorizer.categorize(description),
                categorizer.categorize(description)
            );
        }
    }
}
