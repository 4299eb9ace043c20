//! The closed set of sound categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse synthesis-recipe label.
///
/// Declaration order is significant: the classifier resolves both its
/// substring and keyword stages in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Indoor tavern ambiance: low rumble, murmur, wood creaks.
    Tavern,
    /// Forest ambiance: wind through leaves, twig snaps.
    Forest,
    /// Crackling fire.
    Fire,
    /// Stream or rain texture with droplets.
    Water,
    /// Layered wind.
    Wind,
    /// Footstep impacts.
    Footsteps,
    /// Shimmering magical tones.
    Magic,
    /// Metal clashes over rough noise.
    Combat,
    /// Generic background bed; also the classifier default.
    Ambient,
}

impl Category {
    /// All categories in declaration (resolution) order.
    pub const ALL: [Category; 9] = [
        Category::Tavern,
        Category::Forest,
        Category::Fire,
        Category::Water,
        Category::Wind,
        Category::Footsteps,
        Category::Magic,
        Category::Combat,
        Category::Ambient,
    ];

    /// Lower-case name, used for substring matching and cache keys.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Tavern => "tavern",
            Category::Forest => "forest",
            Category::Fire => "fire",
            Category::Water => "water",
            Category::Wind => "wind",
            Category::Footsteps => "footsteps",
            Category::Magic => "magic",
            Category::Combat => "combat",
            Category::Ambient => "ambient",
        }
    }

    /// Parses a category from its lower-case name.
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Associated keyword set for the classifier's fallback stage.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Category::Tavern => &["cozy", "warm", "inn", "pub", "drinking"],
            Category::Forest => &["woods", "trees", "nature"],
            Category::Fire => &["flame", "crackling", "burning"],
            Category::Water => &["stream", "river", "rain"],
            Category::Wind => &["breeze", "gust"],
            Category::Footsteps => &["step", "walk", "walking"],
            Category::Magic => &["spell", "mystical", "arcane"],
            Category::Combat => &["sword", "metal", "clash", "battle", "fight"],
            Category::Ambient => &[],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
