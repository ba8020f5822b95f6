// 🏷️ Category - closed set of spending classifications
//
// Categories are values, not records: the set is fixed, persisted by display
// name, and carries an icon + color used only by the presentation layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Food & Dining")]
    Food,
    #[serde(rename = "Transportation")]
    Transport,
    #[serde(rename = "Utilities & Bills")]
    Bills,
    #[serde(rename = "Healthcare")]
    Health,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// Every category, in form-selection order
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Health,
        Category::Entertainment,
        Category::Shopping,
        Category::Other,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Food => "Food & Dining",
            Category::Transport => "Transportation",
            Category::Bills => "Utilities & Bills",
            Category::Health => "Healthcare",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Other => "Other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Food => "🍽️",
            Category::Transport => "🚗",
            Category::Bills => "💡",
            Category::Health => "🩺",
            Category::Entertainment => "🎬",
            Category::Shopping => "🛍️",
            Category::Other => "📦",
        }
    }

    /// Display color as `#RRGGBB`
    pub fn color(&self) -> &'static str {
        match self {
            Category::Food => "#F97316",
            Category::Transport => "#3B82F6",
            Category::Bills => "#EAB308",
            Category::Health => "#EF4444",
            Category::Entertainment => "#A855F7",
            Category::Shopping => "#EC4899",
            Category::Other => "#6B7280",
        }
    }

    /// Color split into RGB components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.color()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }

    fn position(&self) -> usize {
        Category::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(0)
    }

    /// Next category in selection order (wraps around)
    pub fn next(&self) -> Self {
        Category::ALL[(self.position() + 1) % Category::ALL.len()]
    }

    /// Previous category in selection order (wraps around)
    pub fn previous(&self) -> Self {
        let len = Category::ALL.len();
        Category::ALL[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCategory(wanted.to_string()))
    }
}
