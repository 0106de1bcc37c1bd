//! Editor settings
//!
//! Built-in defaults, overridable from `settings.json` and then from the
//! command line. Every field has a default so partial files are fine.

use serde::{Deserialize, Serialize};

/// Arrow-key nudge distances in design units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NudgeSettings {
    pub default: f64,
    /// With shift held
    pub shift: f64,
    /// With cmd/ctrl held
    pub cmd: f64,
}

impl Default for NudgeSettings {
    fn default() -> Self {
        Self {
            default: 1.0,
            shift: 10.0,
            cmd: 100.0,
        }
    }
}

/// Hit-testing tolerances in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitSettings {
    pub point_radius: f64,
    pub segment_radius: f64,
    pub bounding_box_handle: f64,
    /// Width of the ring outside each corner that starts a rotation
    pub rotation_zone: f64,
}

impl Default for HitSettings {
    fn default() -> Self {
        Self {
            point_radius: 8.0,
            segment_radius: 6.0,
            bounding_box_handle: 6.0,
            rotation_zone: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenSettings {
    /// Screen pixels a press must travel before it pulls out handles
    pub drag_threshold: f64,
    /// Screen pixels around a contour's start point that close it
    pub close_radius: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self {
            drag_threshold: 3.0,
            close_radius: 8.0,
        }
    }
}

/// Rotation angle snapping, in degrees
///
/// The angle snaps once it comes within `engage` of a multiple of
/// `increment` and stays snapped until it drifts more than `release` away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    pub snap: bool,
    pub increment: f64,
    pub engage: f64,
    pub release: f64,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            snap: true,
            increment: 15.0,
            engage: 3.0,
            release: 6.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistorySettings {
    /// Oldest undo steps are dropped past this depth
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub snap: bool,
    pub size: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            snap: false,
            size: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardSettings {
    /// Offset applied per repeated paste of the same payload
    pub paste_offset: f64,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self { paste_offset: 10.0 }
    }
}

/// All editor settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub nudge: NudgeSettings,
    pub hit: HitSettings,
    pub pen: PenSettings,
    pub rotation: RotationSettings,
    pub history: HistorySettings,
    pub grid: GridSettings,
    pub clipboard: ClipboardSettings,
}

impl EditorSettings {
    /// Grid size to snap to, if snapping is on
    pub fn grid_snap(&self) -> Option<f64> {
        (self.grid.snap && self.grid.size > 0.0).then_some(self.grid.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nudge_amounts() {
        let settings = EditorSettings::default();
        assert!(settings.nudge.default > 0.0);
        assert!(settings.nudge.shift > settings.nudge.default);
        assert!(settings.nudge.cmd > settings.nudge.shift);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{"nudge": {"shift": 20.0}, "grid": {"snap": true}}"#).unwrap();
        assert_eq!(settings.nudge.shift, 20.0);
        assert_eq!(settings.nudge.default, 1.0);
        assert_eq!(settings.grid_snap(), Some(1.0));
        assert_eq!(settings.rotation, RotationSettings::default());
    }

    #[test]
    fn test_release_wider_than_engage() {
        let rotation = RotationSettings::default();
        assert!(rotation.release > rotation.engage);
    }
}
