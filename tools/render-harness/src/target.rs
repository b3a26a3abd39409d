//! What a sketch should produce when it runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Render nothing.
    #[default]
    None,
    Image,
    Gif,
    Video,
    SpriteSheet,
    Montage,
}

impl Target {
    pub const ALL: [Target; 6] = [
        Target::None,
        Target::Image,
        Target::Gif,
        Target::Video,
        Target::SpriteSheet,
        Target::Montage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Target::None => "none",
            Target::Image => "image",
            Target::Gif => "gif",
            Target::Video => "video",
            Target::SpriteSheet => "sprite_sheet",
            Target::Montage => "montage",
        }
    }

    /// True for targets built from a frame sequence.
    pub fn needs_frames(&self) -> bool {
        matches!(self, Target::Gif | Target::Video | Target::Montage)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| format!("unknown target: {s}"))
    }
}
