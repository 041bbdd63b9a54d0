//! Sorting bins and their preset poses.

use cu_arm_ik::JointAngles;
use cu_arm_ik::config::{ConfigError, load_json, save_json};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Destination bin of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinCategory {
    Plastic,
    Paper,
    Metal,
    Unknown,
}

impl BinCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            BinCategory::Plastic => "plastic",
            BinCategory::Paper => "paper",
            BinCategory::Metal => "metal",
            BinCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BinCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords per bin, checked in order. The first hit wins.
const KEYWORDS: [(&[&str], BinCategory); 3] = [
    (&["plastic"], BinCategory::Plastic),
    (&["paper", "cardboard"], BinCategory::Paper),
    (&["can", "metal"], BinCategory::Metal),
];

/// Picks a bin from a free-text detector label.
///
/// Case-insensitive substring match, so "Aluminum Can" is metal. Note that
/// this also catches words that merely contain a keyword ("scanner").
pub fn classify(label: &str) -> BinCategory {
    let label = label.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|w| label.contains(*w)))
        .map_or(BinCategory::Unknown, |&(_, bin)| bin)
}

/// Fixed servo poses: one per bin plus a home pose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinPresets {
    pub home: JointAngles,
    pub plastic: JointAngles,
    pub paper: JointAngles,
    pub metal: JointAngles,
}

impl Default for BinPresets {
    fn default() -> Self {
        Self {
            home: JointAngles::new([90, 90, 90, 90, 90, 90]),
            plastic: JointAngles::new([45, 90, 90, 90, 90, 90]),
            paper: JointAngles::new([135, 90, 90, 90, 90, 90]),
            metal: JointAngles::new([90, 45, 90, 90, 90, 90]),
        }
    }
}

impl BinPresets {
    /// Pose for a bin. `Unknown` has no bin and no pose.
    pub fn preset_for(&self, bin: BinCategory) -> Option<JointAngles> {
        match bin {
            BinCategory::Plastic => Some(self.plastic),
            BinCategory::Paper => Some(self.paper),
            BinCategory::Metal => Some(self.metal),
            BinCategory::Unknown => None,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_json(self, path)
    }
}
