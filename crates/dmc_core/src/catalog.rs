use crate::types::{Category, Source};

/// Hebrew news outlets the aggregator knows how to pull from.
pub fn default_sources() -> Vec<Source> {
    [
        ("ynet", "Ynet"),
        ("n12", "N12"),
        ("walla", "Walla News"),
        ("haaretz", "Haaretz"),
        ("maariv", "Maariv"),
        ("israelhayom", "Israel Hayom"),
        ("calcalist", "Calcalist"),
        ("globes", "Globes"),
    ]
    .iter()
    .map(|(id, name)| Source {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}

/// Content categories, with the Hebrew display names the clients render.
pub fn default_categories() -> Vec<Category> {
    [
        ("politics", "פוליטיקה", "account_balance", "#3b82f6"),
        ("business", "עסקים", "business", "#f97316"),
        ("technology", "טכנולוגיה", "devices", "#14b8a6"),
        ("entertainment", "בידור", "theaters", "#ec4899"),
        ("sports", "ספורט", "sports_soccer", "#22c55e"),
        ("health", "בריאות", "local_hospital", "#a855f7"),
        ("security", "ביטחון", "security", "#dc2626"),
    ]
    .iter()
    .map(|(id, name, icon, color)| Category {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
    })
    .collect()
}

pub fn category_ids() -> Vec<String> {
    default_categories().into_iter().map(|c| c.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogs_are_populated() {
        assert_eq!(default_sources().len(), 8);
        assert_eq!(default_categories().len(), 7);
        assert!(category_ids().contains(&"politics".to_string()));
    }
}
