//! Blink events to sound and particle requests.

use blinkbeat_common::config::{EffectStyle, EffectsConfig, SoundConfig};
use blinkbeat_model::effect::{BlinkAction, EmitDirection, ParticleBurst, Rgb};
use blinkbeat_model::frame::{BlinkFrame, BlinkKind};

/// Stateless mapping from blink kinds to actions, fixed at construction.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    sounds: SoundConfig,
    effects: EffectsConfig,
}

impl EventDispatcher {
    pub fn new(sounds: &SoundConfig, effects: &EffectsConfig) -> Self {
        Self {
            sounds: sounds.clone(),
            effects: effects.clone(),
        }
    }

    /// Actions for every kind that fired in `frame`, in left/right/both order.
    pub fn dispatch(&self, frame: &BlinkFrame) -> Vec<BlinkAction> {
        frame
            .fired_kinds()
            .map(|kind| self.action_for(kind, frame))
            .collect()
    }

    /// Action for one kind, spawning at the frame's eye positions.
    pub fn action_for(&self, kind: BlinkKind, frame: &BlinkFrame) -> BlinkAction {
        let style = self.style(kind);
        let sound_key = self.sound_key(kind).to_string();
        let label = format!("{}!", sound_key.to_uppercase());

        BlinkAction {
            kind,
            burst: ParticleBurst {
                origin: frame.spawn_point(kind),
                color: Rgb(style.color),
                count: style.count,
                direction: EmitDirection::for_kind(kind),
            },
            sound_key,
            label,
        }
    }

    pub fn sound_key(&self, kind: BlinkKind) -> &str {
        match kind {
            BlinkKind::Left => &self.sounds.left,
            BlinkKind::Right => &self.sounds.right,
            BlinkKind::Both => &self.sounds.both,
        }
    }

    fn style(&self, kind: BlinkKind) -> &EffectStyle {
        match kind {
            BlinkKind::Left => &self.effects.left,
            BlinkKind::Right => &self.effects.right,
            BlinkKind::Both => &self.effects.both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blinkbeat_model::frame::CalibrationStatus;
    use blinkbeat_model::geometry::Point2D;

    fn frame(left: bool, right: bool, both: bool) -> BlinkFrame {
        BlinkFrame {
            timestamp_ns: 0,
            face_detected: true,
            left_blink: left,
            right_blink: right,
            both_blink: both,
            left_eye_center: Point2D::new(200.0, 200.0),
            right_eye_center: Point2D::new(400.0, 220.0),
            left_eye_box: None,
            right_eye_box: None,
            left_ratio: 0.35,
            right_ratio: 0.35,
            threshold: 0.2275,
            calibration: CalibrationStatus::Sealed { threshold: 0.2275 },
        }
    }

    fn dispatcher() -> EventDispatcher {
        EventDispatcher::new(&SoundConfig::default(), &EffectsConfig::default())
    }

    #[test]
    fn test_no_events_no_actions() {
        assert!(dispatcher().dispatch(&frame(false, false, false)).is_empty());
    }

    #[test]
    fn test_left_blink_maps_to_snare() {
        let actions = dispatcher().dispatch(&frame(true, false, false));
        assert_eq!(actions.len(), 1);
        let a = &actions[0];
        assert_eq!(a.kind, BlinkKind::Left);
        assert_eq!(a.sound_key, "snare");
        assert_eq!(a.label, "SNARE!");
        assert_eq!(a.burst.origin, Point2D::new(200.0, 200.0));
        assert_eq!(a.burst.color, Rgb([0, 100, 255]));
        assert_eq!(a.burst.count, 30);
        assert_eq!(a.burst.direction, EmitDirection::Leftward);
    }

    #[test]
    fn test_both_blink_spawns_at_midpoint_with_more_particles() {
        let actions = dispatcher().dispatch(&frame(false, false, true));
        let a = &actions[0];
        assert_eq!(a.sound_key, "cymbal");
        assert_eq!(a.burst.origin, Point2D::new(300.0, 210.0));
        assert!(a.burst.count > EffectsConfig::default().left.count);
        assert_eq!(a.burst.direction, EmitDirection::RadialBurst);
    }

    #[test]
    fn test_sound_mapping_is_configurable() {
        let sounds = SoundConfig {
            left: "kick".into(),
            right: "snare".into(),
            ..SoundConfig::default()
        };
        let d = EventDispatcher::new(&sounds, &EffectsConfig::default());
        let actions = d.dispatch(&frame(true, true, false));
        let keys: Vec<&str> = actions.iter().map(|a| a.sound_key.as_str()).collect();
        assert_eq!(keys, vec!["kick", "snare"]);
        assert_eq!(actions[1].burst.direction, EmitDirection::Rightward);
    }
}
