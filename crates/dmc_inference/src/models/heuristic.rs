use async_trait::async_trait;
use dmc_core::{InferenceModel, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Minimum length below which no summarization is attempted.
pub const MIN_SUMMARY_INPUT: usize = 50;

/// Length of the truncated fallback summary.
pub const FALLBACK_SUMMARY_CHARS: usize = 200;

/// Extracted names shorter than this many characters are treated as false
/// positives and dropped.
pub const MIN_NAME_CHARS: usize = 6;

lazy_static! {
    static ref HEBREW: Regex = Regex::new(r"[\u{0590}-\u{05FF}]").unwrap();
    static ref HEBREW_TITLE: Regex = Regex::new(
        r#"\b(ראש הממשלה|חברת הכנסת|חבר הכנסת|הח"כ|ח"כ|השרה|השר|שרת|שר|נשיאת|נשיא|סגנית|סגן|יו"ר|מזכ"ל|מנהיגת|מנהיג)\s+([א-ת][א-ת'"״׳-]*\s+[א-ת][א-ת'"״׳-]*)"#
    )
    .unwrap();
    static ref ENGLISH_TITLE: Regex = Regex::new(
        r"\b(President|Pres\.|Prime Minister|PM|Senator|Sen\.|Representative|Rep\.|Governor|Gov\.|Minister|Min\.|Secretary|Sec\.|Congressman|Congresswoman|Speaker)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,3})"
    )
    .unwrap();
    static ref POLITICAL_KEYWORDS: Regex = Regex::new(
        r#"ממשלה|כנסת|ח"כ|מפלג|בחירות|נשיא|אופוזיצי|קואליצי|\bשר\b|\bהשר\b"#
    )
    .unwrap();
}

// Hebrew function words that signal a captured phrase is not a name.
const STOP_WORDS: &[&str] = &[
    "את", "של", "עם", "על", "אבל", "כמו", "אחרי", "לפני", "בין", "כדי", "ואת", "אולי", "אומר",
    "אמר", "היום", "אתמול",
];

// Names commonly seen in coverage, matched verbatim. The full roster with
// party metadata lives in `roster`.
const KNOWN_NAMES: &[&str] = &[
    "בנימין נתניהו",
    "יריב לוין",
    "אלי כהן",
    "יואב גלנט",
    "אמיר אוחנה",
    "ניר ברקת",
    "מירי רגב",
    "אבי דיכטר",
    "ישראל כץ",
    "דני דנון",
    "יולי אדלשטיין",
    "גילה גמליאל",
    "יאיר לפיד",
    "מאיר כהן",
    "קרין אלהרר",
    "מירב כהן",
    "אלעזר שטרן",
    "מיקי לוי",
    "רם בן-ברק",
    "בצלאל סמוטריץ'",
    "איתמר בן גביר",
    "אורית סטרוק",
    "שמחה רוטמן",
    "אבי מעוז",
    "בני גנץ",
    "גדעון סער",
    "גדי איזנקוט",
    "זאב אלקין",
    "מתן כהנא",
    "אריה דרעי",
    "משה ארבל",
    "יצחק גולדקנופף",
    "משה גפני",
    "מאיר פרוש",
    "אביגדור ליברמן",
    "יצחק הרצוג",
    "נפתלי בנט",
    "מנסור עבאס",
    "יאיר גולן",
    "מרב מיכאלי",
    "אהוד ברק",
    "ציפי לבני",
];

pub fn has_hebrew(text: &str) -> bool {
    HEBREW.is_match(text)
}

/// Rule-based politician-name extraction, used when no LLM key is configured
/// and as the fallback when an LLM call fails.
pub fn extract_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |name: String| {
        if name.chars().count() >= MIN_NAME_CHARS && seen.insert(name.clone()) {
            names.push(name);
        }
    };

    if has_hebrew(text) {
        for known in KNOWN_NAMES {
            if text.contains(known) {
                push(known.to_string());
            }
        }
        for caps in HEBREW_TITLE.captures_iter(text) {
            let candidate = caps[2].trim().to_string();
            let has_stop_word = candidate
                .split_whitespace()
                .any(|word| STOP_WORDS.contains(&word));
            if !has_stop_word {
                push(candidate);
            }
        }
    } else {
        for caps in ENGLISH_TITLE.captures_iter(text) {
            push(caps[2].trim().to_string());
        }
    }

    names
}

/// Whether the text looks politically relevant: a recognized name, or one of
/// the keywords coverage of the Knesset and the government always carries.
pub fn is_political(text: &str) -> bool {
    POLITICAL_KEYWORDS.is_match(text) || !extract_names(text).is_empty()
}

/// Truncated slice of the original text, used whenever no LLM summary is
/// available.
pub fn truncate_summary(text: &str) -> String {
    if text.chars().count() > FALLBACK_SUMMARY_CHARS {
        let truncated: String = text.chars().take(FALLBACK_SUMMARY_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

/// Inference model used when no API key is configured. Summaries degrade to
/// truncation and extraction uses the rule-based matcher.
pub struct HeuristicModel;

impl HeuristicModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceModel for HeuristicModel {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn summarize(&self, text: &str) -> Result<String> {
        if text.chars().count() < MIN_SUMMARY_INPUT {
            return Ok(text.to_string());
        }
        Ok(truncate_summary(text))
    }

    async fn extract_politicians(&self, text: &str) -> Result<Vec<String>> {
        Ok(extract_names(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_input_is_returned_unchanged() {
        let model = HeuristicModel::new();
        let text = "כותרת קצרה";
        assert_eq!(model.summarize(text).await.unwrap(), text);
    }

    #[tokio::test]
    async fn test_long_input_is_truncated() {
        let model = HeuristicModel::new();
        let text = "א".repeat(500);
        let summary = model.summarize(&text).await.unwrap();
        assert_eq!(summary.chars().count(), FALLBACK_SUMMARY_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_known_name_scan() {
        let text = "ראש הממשלה בנימין נתניהו נפגש היום עם יאיר לפיד";
        let names = extract_names(text);
        assert!(names.contains(&"בנימין נתניהו".to_string()));
        assert!(names.contains(&"יאיר לפיד".to_string()));
    }

    #[test]
    fn test_title_pattern_extraction() {
        let text = "השר עמיחי שיקלי הודיע על תוכנית חדשה";
        let names = extract_names(text);
        assert!(names.contains(&"עמיחי שיקלי".to_string()));
    }

    #[test]
    fn test_english_title_pattern() {
        let text = "Senator Sarah Johnson met with Governor Maria Rodriguez today.";
        let names = extract_names(text);
        assert_eq!(names, vec!["Sarah Johnson", "Maria Rodriguez"]);
    }

    #[test]
    fn test_no_names_yields_empty_list() {
        assert!(extract_names("מזג האוויר נעים מאוד").is_empty());
        assert!(extract_names("The weather is very nice today.").is_empty());
    }

    #[test]
    fn test_duplicates_are_merged() {
        let text = "בני גנץ אמר כי בני גנץ יתמוך בהצעה";
        assert_eq!(extract_names(text).len(), 1);
    }

    #[test]
    fn test_short_matches_are_dropped() {
        let names = extract_names("PM Li Xu spoke at the summit.");
        assert!(names.is_empty());
    }

    #[test]
    fn test_stop_words_reject_candidates() {
        let names = extract_names("השר של הממשלה הגיע לדיון");
        assert!(names.is_empty());
    }

    #[test]
    fn test_is_political() {
        assert!(is_political("הכנסת אישרה את החוק החדש"));
        assert!(is_political("בנימין נתניהו נפגש עם שגרירים"));
        assert!(!is_political("מתכון חדש לעוגת גבינה"));
    }
}
