//! Motion sequence generation.

use crate::bins::{BinCategory, BinPresets};
use crate::detection::Detection;
use cu_arm_ik::JointAngles;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepAction {
    Home,
    MoveToBin,
}

/// One pose for the servo driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionStep {
    pub action: StepAction,
    pub angles: JointAngles,
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MotionStep {
    pub fn home(angles: JointAngles) -> Self {
        Self {
            action: StepAction::Home,
            angles,
            description: None,
        }
    }

    pub fn move_to_bin(bin: BinCategory, angles: JointAngles) -> Self {
        Self {
            action: StepAction::MoveToBin,
            angles,
            description: Some(format!("Move to {bin}")),
        }
    }
}

/// Builds motion sequences from a fixed preset table.
#[derive(Debug, Clone, Default)]
pub struct MotionSequencer {
    presets: BinPresets,
}

impl MotionSequencer {
    pub fn new(presets: BinPresets) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &BinPresets {
        &self.presets
    }

    /// Home first, then one bin move per sortable detection, in input order.
    ///
    /// Detections with an unknown bin are dropped. Scores are not consulted
    /// and nothing is merged or reordered, so the result holds between 1 and
    /// `detections.len() + 1` steps.
    pub fn build_sequence(&self, detections: &[Detection]) -> Vec<MotionStep> {
        let mut steps = Vec::with_capacity(detections.len() + 1);
        steps.push(MotionStep::home(self.presets.home));
        for detection in detections {
            let bin = detection.bin();
            match self.presets.preset_for(bin) {
                Some(angles) => steps.push(MotionStep::move_to_bin(bin, angles)),
                None => debug!("Skipping '{}': no bin", detection.label),
            }
        }
        debug!("Built {} motion steps from {} detections", steps.len(), detections.len());
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::BoundingBox;

    fn det(label: &str) -> Detection {
        Detection::new(label, 0.5, BoundingBox::default())
    }

    #[test]
    fn empty_input_still_goes_home() {
        let steps = MotionSequencer::default().build_sequence(&[]);
        assert_eq!(steps, vec![MotionStep::home(BinPresets::default().home)]);
    }

    #[test]
    fn unknown_labels_are_dropped() {
        let steps = MotionSequencer::default().build_sequence(&[det("plastic bottle"), det("banana")]);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].action, StepAction::Home);
        assert_eq!(steps[1].action, StepAction::MoveToBin);
        assert_eq!(steps[1].angles, BinPresets::default().plastic);
        assert_eq!(steps[1].description.as_deref(), Some("Move to plastic"));
    }

    #[test]
    fn order_and_duplicates_are_kept() {
        let steps = MotionSequencer::default().build_sequence(&[
            det("soda can"),
            det("newspaper"),
            det("soda can"),
        ]);
        let descriptions: Vec<_> = steps.iter().map(|s| s.description.as_deref()).collect();
        assert_eq!(
            descriptions,
            [None, Some("Move to metal"), Some("Move to paper"), Some("Move to metal")]
        );
    }

    #[test]
    fn uses_injected_presets() {
        let mut presets = BinPresets::default();
        presets.home = JointAngles::SAFE_HOME;
        presets.paper = JointAngles::new([10, 10, 10, 10, 10, 10]);
        let steps = MotionSequencer::new(presets.clone()).build_sequence(&[det("cardboard")]);
        assert_eq!(steps[0].angles, presets.home);
        assert_eq!(steps[1].angles, presets.paper);
    }

    #[test]
    fn step_json_shape() {
        let steps = MotionSequencer::default().build_sequence(&[det("metal lid")]);
        let json = serde_json::to_value(&steps).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"action": "home", "angles": [90, 90, 90, 90, 90, 90]},
                {"action": "move_to_bin", "angles": [90, 45, 90, 90, 90, 90], "description": "Move to metal"}
            ])
        );
    }

    #[test]
    fn accepts_the_short_description_key() {
        let step: MotionStep =
            serde_json::from_str(r#"{"action":"move_to_bin","angles":[45,90,90,90,90,90],"desc":"Move to plastic"}"#)
                .unwrap();
        assert_eq!(step.description.as_deref(), Some("Move to plastic"));
    }
}
