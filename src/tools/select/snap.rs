//! Rotation angle snapping with hysteresis
//!
//! Snapping engages when the raw angle comes within `engage` degrees of a
//! multiple of `increment`, and only lets go once the angle is more than
//! `release` degrees away. With `release > engage` the angle does not
//! flicker in and out of a snap while the pointer hovers near its edge.

use crate::core::settings::RotationSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleSnapper {
    increment: f64,
    engage: f64,
    release: f64,
    snapped: Option<f64>,
}

impl AngleSnapper {
    pub fn new(settings: &RotationSettings) -> Self {
        Self {
            increment: settings.increment,
            engage: settings.engage,
            release: settings.release.max(settings.engage),
            snapped: None,
        }
    }

    /// The angle currently snapped to, if any
    pub fn snapped(&self) -> Option<f64> {
        self.snapped
    }

    /// Feed a raw angle in degrees; returns the updated snapper and the
    /// angle to use
    pub fn apply(mut self, angle: f64) -> (Self, f64) {
        if self.increment <= 0.0 {
            return (self, angle);
        }
        if let Some(target) = self.snapped {
            if (angle - target).abs() <= self.release {
                return (self, target);
            }
            self.snapped = None;
        }
        let nearest = (angle / self.increment).round() * self.increment;
        if (angle - nearest).abs() <= self.engage {
            self.snapped = Some(nearest);
            return (self, nearest);
        }
        (self, angle)
    }
}

/// Normalize degrees into `(-180, 180]`
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapper() -> AngleSnapper {
        AngleSnapper::new(&RotationSettings::default())
    }

    #[test]
    fn engages_near_increment() {
        let (s, angle) = snapper().apply(88.0);
        assert_eq!(angle, 90.0);
        assert_eq!(s.snapped(), Some(90.0));

        let (s, angle) = snapper().apply(83.0);
        assert_eq!(angle, 83.0);
        assert_eq!(s.snapped(), None);
    }

    #[test]
    fn holds_until_release() {
        let (s, _) = snapper().apply(90.0);
        // Outside engage, inside release: still snapped
        let (s, angle) = s.apply(95.0);
        assert_eq!(angle, 90.0);
        // Past release: free again
        let (s, angle) = s.apply(96.5);
        assert_eq!(angle, 96.5);
        assert_eq!(s.snapped(), None);
        // Coming back only re-engages inside the tighter window
        let (_, angle) = s.apply(94.0);
        assert_eq!(angle, 94.0);
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_degrees(270.0), -90.0);
        assert_eq!(normalize_degrees(-90.0), -90.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
    }
}
