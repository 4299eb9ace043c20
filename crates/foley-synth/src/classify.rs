//! Prompt-to-category classification.
//!
//! A deterministic, total function: direct substring match on category
//! names first, then ordered keyword sets, then the default category.
//! Category declaration order breaks ties in both stages.

use crate::category::Category;

/// Maps a free-text prompt to a category. Never fails.
pub fn classify(prompt: &str) -> Category {
    let lowered = prompt.to_lowercase();

    for category in Category::ALL {
        if lowered.contains(category.name()) {
            return category;
        }
    }

    for category in Category::ALL {
        if category
            .keywords()
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            return category;
        }
    }

    Category::Ambient
}
