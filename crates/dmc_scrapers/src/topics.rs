use dmc_core::FetchedArticle;

/// Titles at least this similar are considered the same story told by two
/// sources.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Words shorter than this never participate in the topic key.
const KEY_WORD_MIN_CHARS: usize = 5;

/// Number of significant words that make up a topic key.
const KEY_WORDS: usize = 3;

/// Derives the grouping key for a title: the first three words longer than
/// four characters, lowercased, sorted alphabetically and joined by hyphens.
/// Articles sharing a key are treated as coverage of one story.
pub fn topic_key(title: &str) -> String {
    let lower = title.to_lowercase();
    let mut words: Vec<&str> = lower
        .split_whitespace()
        .filter(|w| w.chars().count() >= KEY_WORD_MIN_CHARS)
        .take(KEY_WORDS)
        .collect();
    words.sort_unstable();
    words.join("-")
}

/// Buckets articles by topic key, preserving first-seen order of buckets and
/// of articles within a bucket.
pub fn group_by_key(articles: Vec<FetchedArticle>) -> Vec<Vec<FetchedArticle>> {
    let mut keys: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<FetchedArticle>> = Vec::new();

    for article in articles {
        let key = topic_key(&article.title);
        match keys.iter().position(|k| *k == key) {
            Some(i) => groups[i].push(article),
            None => {
                keys.push(key);
                groups.push(vec![article]);
            }
        }
    }

    groups
}

/// Character-level Levenshtein distance.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut costs: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut last = i;
        costs[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let new = if ca == cb {
                last
            } else {
                1 + last.min(costs[j]).min(costs[j + 1])
            };
            last = costs[j + 1];
            costs[j + 1] = new;
        }
    }
    costs[b.len()]
}

/// Similarity in [0, 1] based on edit distance over the longer title.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let (longer, shorter) = if a.chars().count() >= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    let longer_len = longer.chars().count();
    if longer_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(&longer.to_lowercase(), &shorter.to_lowercase());
    (longer_len - distance.min(longer_len)) as f64 / longer_len as f64
}

/// Collapses near-duplicate coverage within one fetch batch: an article whose
/// title is close enough to an already accepted one is dropped in its favour.
pub fn collapse_duplicates(articles: Vec<FetchedArticle>) -> Vec<FetchedArticle> {
    let mut accepted: Vec<FetchedArticle> = Vec::new();
    for article in articles {
        let duplicate = accepted
            .iter()
            .any(|a| title_similarity(&a.title, &article.title) > SIMILARITY_THRESHOLD);
        if !duplicate {
            accepted.push(article);
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(title: &str, url: &str) -> FetchedArticle {
        FetchedArticle {
            title: title.to_string(),
            content: "תוכן".to_string(),
            summary: None,
            url: url.to_string(),
            image_url: None,
            source: "Ynet".to_string(),
            category: "politics".to_string(),
            published_at: Utc::now(),
        }
    }

    #[test]
    fn test_topic_key_takes_first_significant_words_sorted() {
        // Words of five or more characters, first three, sorted.
        assert_eq!(
            topic_key("Knesset approves budget increase for schools"),
            "approves-budget-knesset"
        );
    }

    #[test]
    fn test_topic_key_ignores_short_words() {
        assert_eq!(topic_key("PM met the press again today"), "again-press-today");
    }

    #[test]
    fn test_topic_key_hebrew() {
        let key = topic_key("הממשלה אישרה את התקציב");
        assert_eq!(key, "אישרה-הממשלה-התקציב");
    }

    #[test]
    fn test_topic_key_short_title_is_empty() {
        assert_eq!(topic_key("יום טוב"), "");
    }

    #[test]
    fn test_group_by_key_merges_same_story() {
        let groups = group_by_key(vec![
            article("הממשלה אישרה את התקציב", "http://a/1"),
            article("התקציב אישרה הממשלה סוף סוף", "http://a/2"),
            article("מכבי ניצחה את הפועל בדרבי", "http://a/3"),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn test_title_similarity() {
        assert_eq!(title_similarity("same title", "same title"), 1.0);
        assert!(title_similarity("הממשלה אישרה את התקציב", "הממשלה אישרה את התקציב החדש") > 0.7);
        assert!(title_similarity("הממשלה אישרה את התקציב", "מכבי ניצחה בדרבי") < 0.5);
    }

    #[test]
    fn test_collapse_duplicates_keeps_first() {
        let collapsed = collapse_duplicates(vec![
            article("הממשלה אישרה את התקציב החדש", "http://ynet/1"),
            article("הממשלה אישרה את התקציב החדש הערב", "http://walla/1"),
            article("מכבי ניצחה את הפועל", "http://ynet/2"),
        ]);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].url, "http://ynet/1");
    }
}
