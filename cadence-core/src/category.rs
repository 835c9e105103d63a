//! Task categories and the keyword classifier for imported calendar events.
//!
//! Classification is a static, ordered rule table: the lower-cased event
//! title is matched by substring and the first matching rule wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Learning,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Learning,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Learning => "learning",
            Category::Other => "other",
        }
    }

    /// Human-readable name for dashboards and CLI tables.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Health => "Health",
            Category::Learning => "Learning",
            Category::Other => "Other",
        }
    }

    /// Chart colour (hex RGB).
    pub fn color(&self) -> &'static str {
        match self {
            Category::Work => "#1976D2",
            Category::Personal => "#FFC107",
            Category::Health => "#4CAF50",
            Category::Learning => "#9C27B0",
            Category::Other => "#9E9E9E",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Ordered keyword rules. Order matters: "workout" also contains "work",
/// so it lands in `Work` before the health rule is consulted.
const RULES: &[(&[&str], Category)] = &[
    (&["work", "meeting"], Category::Work),
    (&["workout", "gym"], Category::Health),
    (&["study", "learn"], Category::Learning),
    (&["personal"], Category::Personal),
];

/// Categorize an imported event by its title.
pub fn categorize_event(title: &str) -> Category {
    let title = title.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}
