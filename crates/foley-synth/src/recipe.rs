//! Declarative synthesis recipes.
//!
//! Each category is a data entry: a set of continuous base layers plus a
//! list of transient overlays with per-second densities. Adding a category
//! means adding a table entry here, not a new code branch.

use crate::category::Category;
use crate::transient::TransientShape;

/// One continuous layer of a recipe's bed.
#[derive(Debug, Clone, Copy)]
pub enum BaseLayer {
    /// Brown noise at the given gain.
    Brown { gain: f64 },
    /// Pink noise at the given gain.
    Pink { gain: f64 },
    /// White noise at the given gain.
    White { gain: f64 },
    /// One-pole low-pass filtered noise.
    Lowpass { cutoff: f64, gain: f64 },
    /// First-difference high-pass filtered noise.
    Highpass { gain: f64 },
    /// Decaying frequency-modulated sine voices (the magic shimmer).
    Shimmer { voices: usize, gain: f64 },
}

/// One transient overlay: shape, how often it lands, and mix level.
#[derive(Debug, Clone, Copy)]
pub struct TransientLayer {
    pub shape: TransientShape,
    /// Expected placements per second of output; total count scales
    /// linearly with duration.
    pub density_per_sec: f64,
    pub mix: f64,
}

/// A complete category recipe.
#[derive(Debug, Clone, Copy)]
pub struct Recipe {
    pub base: &'static [BaseLayer],
    pub transients: &'static [TransientLayer],
}

static TAVERN: Recipe = Recipe {
    base: &[
        BaseLayer::Brown { gain: 0.3 },
        BaseLayer::Lowpass {
            cutoff: 300.0,
            gain: 0.2,
        },
    ],
    transients: &[TransientLayer {
        shape: TransientShape::Creak,
        density_per_sec: 2.0,
        mix: 0.4,
    }],
};

static FOREST: Recipe = Recipe {
    base: &[
        BaseLayer::Lowpass {
            cutoff: 100.0,
            gain: 0.1,
        },
        BaseLayer::Lowpass {
            cutoff: 200.0,
            gain: 0.1,
        },
        BaseLayer::Lowpass {
            cutoff: 400.0,
            gain: 0.1,
        },
    ],
    transients: &[TransientLayer {
        shape: TransientShape::Snap,
        density_per_sec: 0.5,
        mix: 0.6,
    }],
};

static FIRE: Recipe = Recipe {
    base: &[BaseLayer::Pink { gain: 0.2 }],
    transients: &[TransientLayer {
        shape: TransientShape::Crackle,
        density_per_sec: 8.0,
        mix: 1.0,
    }],
};

static WATER: Recipe = Recipe {
    base: &[BaseLayer::Highpass { gain: 0.4 }],
    transients: &[TransientLayer {
        shape: TransientShape::Droplet,
        density_per_sec: 3.0,
        mix: 0.3,
    }],
};

static WIND: Recipe = Recipe {
    base: &[
        BaseLayer::Lowpass {
            cutoff: 100.0,
            gain: 0.167,
        },
        BaseLayer::Lowpass {
            cutoff: 200.0,
            gain: 0.167,
        },
        BaseLayer::Lowpass {
            cutoff: 400.0,
            gain: 0.167,
        },
    ],
    transients: &[],
};

static FOOTSTEPS: Recipe = Recipe {
    base: &[],
    transients: &[TransientLayer {
        shape: TransientShape::Impact,
        density_per_sec: 2.0,
        mix: 1.0,
    }],
};

static MAGIC: Recipe = Recipe {
    base: &[
        BaseLayer::Shimmer {
            voices: 5,
            gain: 0.3,
        },
        BaseLayer::Lowpass {
            cutoff: 1500.0,
            gain: 0.2,
        },
    ],
    transients: &[TransientLayer {
        shape: TransientShape::Sparkle,
        density_per_sec: 1.5,
        mix: 0.3,
    }],
};

static COMBAT: Recipe = Recipe {
    base: &[BaseLayer::White { gain: 0.2 }],
    transients: &[TransientLayer {
        shape: TransientShape::Clash,
        density_per_sec: 2.0,
        mix: 0.6,
    }],
};

static AMBIENT: Recipe = Recipe {
    base: &[
        BaseLayer::Brown { gain: 0.25 },
        BaseLayer::Lowpass {
            cutoff: 400.0,
            gain: 0.2,
        },
    ],
    transients: &[],
};

/// Looks up the recipe for a category.
pub fn recipe_for(category: Category) -> &'static Recipe {
    match category {
        Category::Tavern => &TAVERN,
        Category::Forest => &FOREST,
        Category::Fire => &FIRE,
        Category::Water => &WATER,
        Category::Wind => &WIND,
        Category::Footsteps => &FOOTSTEPS,
        Category::Magic => &MAGIC,
        Category::Combat => &COMBAT,
        Category::Ambient => &AMBIENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_has_a_recipe() {
        for category in Category::ALL {
            let recipe = recipe_for(category);
            assert!(
                !recipe.base.is_empty() || !recipe.transients.is_empty(),
                "{category} recipe is empty"
            );
        }
    }

    #[test]
    fn test_densities_and_mixes_are_sane() {
        for category in Category::ALL {
            for t in recipe_for(category).transients {
                assert!(t.density_per_sec > 0.0);
                assert!(t.mix > 0.0 && t.mix <= 1.0);
            }
        }
    }
}
