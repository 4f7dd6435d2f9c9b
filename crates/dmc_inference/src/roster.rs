use std::path::Path;

use serde::Deserialize;

/// A tracked politician with the aliases coverage tends to use.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub name: String,
    pub party: String,
    pub position: String,
    pub image_url: Option<String>,
    pub aliases: Vec<String>,
}

#[derive(Deserialize)]
struct RosterFile {
    knesset_members: Vec<RosterFileEntry>,
    #[serde(default)]
    government_members: Vec<RosterFileEntry>,
}

#[derive(Deserialize)]
struct RosterFileEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Party")]
    party: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "ImageUrl", default)]
    image_url: Option<String>,
    #[serde(rename = "Aliases", default)]
    aliases: Vec<String>,
}

/// Fixed roster of Knesset and government members, used for direct
/// substring matching against article text.
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Loads the roster from a JSON file, falling back to the embedded list
    /// when the path is absent or unreadable.
    pub fn load(path: Option<&Path>) -> Self {
        if let Some(path) = path {
            match std::fs::read_to_string(path) {
                Ok(json) => match Self::from_json_str(&json) {
                    Ok(roster) => {
                        tracing::info!("loaded {} politicians from {}", roster.entries.len(), path.display());
                        return roster;
                    }
                    Err(e) => {
                        tracing::warn!("could not parse roster file {}: {}", path.display(), e)
                    }
                },
                Err(e) => tracing::warn!("could not read roster file {}: {}", path.display(), e),
            }
        }
        Self::embedded()
    }

    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        let file: RosterFile = serde_json::from_str(json)?;
        let entries = file
            .knesset_members
            .into_iter()
            .chain(file.government_members)
            .map(|e| RosterEntry {
                name: e.name,
                party: e.party,
                position: e.position,
                image_url: e.image_url,
                aliases: e.aliases,
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn embedded() -> Self {
        let entries = EMBEDDED_ROSTER
            .iter()
            .map(|(name, party, position, aliases)| RosterEntry {
                name: name.to_string(),
                party: party.to_string(),
                position: position.to_string(),
                image_url: None,
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Finds roster members mentioned in the text: containment of the
    /// canonical name short-circuits, otherwise any registered alias counts.
    /// Each member is reported at most once.
    pub fn detect<'a>(&'a self, text: &str) -> Vec<&'a RosterEntry> {
        if text.is_empty() {
            return Vec::new();
        }
        let lower = text.to_lowercase();
        let mut found = Vec::new();
        for entry in &self.entries {
            if lower.contains(&entry.name.to_lowercase()) {
                found.push(entry);
                continue;
            }
            if entry
                .aliases
                .iter()
                .any(|alias| !alias.is_empty() && lower.contains(&alias.to_lowercase()))
            {
                found.push(entry);
            }
        }
        found
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::embedded()
    }
}

// (name, party, position, aliases)
const EMBEDDED_ROSTER: &[(&str, &str, &str, &[&str])] = &[
    ("בנימין נתניהו", "הליכוד", "ראש הממשלה", &["ביבי", "נתניהו"]),
    ("יריב לוין", "הליכוד", "שר המשפטים", &["לוין"]),
    ("אמיר אוחנה", "הליכוד", "יו\"ר הכנסת", &["אוחנה"]),
    ("ישראל כץ", "הליכוד", "שר החוץ", &["כץ"]),
    ("יואב גלנט", "הליכוד", "שר הביטחון", &["גלנט"]),
    ("ניר ברקת", "הליכוד", "שר הכלכלה", &["ברקת"]),
    ("מירי רגב", "הליכוד", "שרת התחבורה", &["רגב"]),
    ("אבי דיכטר", "הליכוד", "שר החקלאות", &["דיכטר"]),
    ("אלי כהן", "הליכוד", "שר האנרגיה", &[]),
    ("יולי אדלשטיין", "הליכוד", "חבר הכנסת", &["אדלשטיין"]),
    ("גילה גמליאל", "הליכוד", "שרת המדע", &["גמליאל"]),
    ("בצלאל סמוטריץ'", "הציונות הדתית", "שר האוצר", &["סמוטריץ'"]),
    ("איתמר בן גביר", "עוצמה יהודית", "השר לביטחון לאומי", &["בן גביר"]),
    ("אורית סטרוק", "הציונות הדתית", "שרת ההתיישבות", &["סטרוק"]),
    ("יאיר לפיד", "יש עתיד", "ראש האופוזיציה", &["לפיד"]),
    ("מאיר כהן", "יש עתיד", "חבר הכנסת", &[]),
    ("קרין אלהרר", "יש עתיד", "חברת הכנסת", &["אלהרר"]),
    ("בני גנץ", "המחנה הממלכתי", "יו\"ר המחנה הממלכתי", &["גנץ"]),
    ("גדי איזנקוט", "המחנה הממלכתי", "חבר הכנסת", &["איזנקוט"]),
    ("גדעון סער", "תקווה חדשה", "חבר הכנסת", &["סער"]),
    ("אביגדור ליברמן", "ישראל ביתנו", "יו\"ר ישראל ביתנו", &["ליברמן", "איווט"]),
    ("אריה דרעי", "ש\"ס", "יו\"ר ש\"ס", &["דרעי"]),
    ("משה גפני", "יהדות התורה", "חבר הכנסת", &["גפני"]),
    ("יצחק גולדקנופף", "יהדות התורה", "שר הבינוי והשיכון", &["גולדקנופף"]),
    ("מנסור עבאס", "רע\"ם", "יו\"ר רע\"ם", &["עבאס"]),
    ("מרב מיכאלי", "העבודה", "יו\"ר העבודה", &["מיכאלי"]),
    ("יצחק הרצוג", "-", "נשיא המדינה", &["הרצוג", "בוז'י"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_canonical_name() {
        let roster = Roster::embedded();
        let found = roster.detect("בנימין נתניהו נאם הערב בכנסת");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "בנימין נתניהו");
    }

    #[test]
    fn test_detect_by_alias() {
        let roster = Roster::embedded();
        let found = roster.detect("ביבי הודיע על מסיבת עיתונאים");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "בנימין נתניהו");
    }

    #[test]
    fn test_detect_is_deduplicated_per_member() {
        let roster = Roster::embedded();
        // Canonical name and alias both present, one detection.
        let found = roster.detect("בנימין נתניהו, המכונה ביבי, הגיע לדיון");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let roster = Roster::embedded();
        assert!(roster.detect("מזג האוויר בתל אביב נעים").is_empty());
        assert!(roster.detect("").is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "knesset_members": [
                {"Name": "בנימין נתניהו", "Party": "הליכוד", "Position": "ראש הממשלה", "ImageUrl": "", "Aliases": ["ביבי"]}
            ],
            "government_members": [
                {"Name": "יריב לוין", "Party": "הליכוד", "Position": "שר המשפטים", "Aliases": []}
            ]
        }"#;
        let roster = Roster::from_json_str(json).unwrap();
        assert_eq!(roster.entries().len(), 2);
        assert_eq!(roster.entries()[1].position, "שר המשפטים");
    }

    #[test]
    fn test_load_missing_file_falls_back_to_embedded() {
        let roster = Roster::load(Some(Path::new("/nonexistent/politicians.json")));
        assert!(!roster.entries().is_empty());
    }
}
