//! Click vs. drag discrimination
//!
//! The same pointer stream drives both camera orbiting and sticker
//! placement. A press only counts as a placement click when it stays put,
//! ends quickly, and the orbit controls never reported an active orbit.
//!
//! ```text
//!   Idle ──down──▶ PotentialClick ──move past threshold / orbit_start──▶ Dragging
//!    ▲                  │                                                   │
//!    └──────up (click)──┘◀───────────────────up (suppressed)────────────────┘
//! ```

use crate::core::config::GestureConfig;
use crate::foundation::math::Vec2;

/// Where the current press stands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No button held
    Idle,
    /// Button held, still a click candidate
    PotentialClick {
        /// Pointer-down position (client pixels)
        start: Vec2,
        /// Last seen position
        last: Vec2,
        /// Pointer-down timestamp
        started_at_ms: f64,
        /// Cumulative path length so far
        travelled: f64,
    },
    /// Disqualified; the release will be ignored
    Dragging,
}

/// A press that qualified as a click
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Release position (client pixels)
    pub position: Vec2,
    /// Press duration
    pub duration_ms: f64,
}

/// Gesture state machine fed by pointer and orbit-control events
#[derive(Debug, Clone)]
pub struct ClickDetector {
    state: GestureState,
    orbiting: bool,
    drag_threshold_px: f64,
    max_click_ms: f64,
    pixel_ratio: f64,
}

impl ClickDetector {
    /// Create a detector for a display with the given (capped) pixel ratio
    pub fn new(config: &GestureConfig, pixel_ratio: f64) -> Self {
        Self {
            state: GestureState::Idle,
            orbiting: false,
            drag_threshold_px: config.drag_threshold_px,
            max_click_ms: config.max_click_ms,
            pixel_ratio,
        }
    }

    /// Current state
    pub fn state(&self) -> &GestureState {
        &self.state
    }

    /// Whether the orbit controls report an active orbit
    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    /// Update the pixel ratio (e.g. window moved to another display)
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = pixel_ratio;
    }

    /// Travel allowed before a press becomes a drag
    pub fn threshold(&self) -> f64 {
        self.drag_threshold_px * self.pixel_ratio
    }

    /// Button pressed
    pub fn pointer_down(&mut self, position: Vec2, time_ms: f64) {
        self.state = GestureState::PotentialClick {
            start: position,
            last: position,
            started_at_ms: time_ms,
            travelled: 0.0,
        };
    }

    /// Pointer moved (with or without a button held)
    pub fn pointer_move(&mut self, position: Vec2) {
        let threshold = self.threshold();
        if let GestureState::PotentialClick { last, travelled, .. } = &mut self.state {
            *travelled += (position - *last).norm();
            *last = position;
            if *travelled > threshold {
                log::trace!("Press became a drag after {:.1}px", travelled);
                self.state = GestureState::Dragging;
            }
        }
    }

    /// Button released; returns the click, if it was one
    pub fn pointer_up(&mut self, position: Vec2, time_ms: f64) -> Option<ClickEvent> {
        let state = std::mem::replace(&mut self.state, GestureState::Idle);
        let GestureState::PotentialClick { last, started_at_ms, travelled, .. } = state else {
            return None;
        };

        if self.orbiting {
            log::trace!("Release during orbit ignored");
            return None;
        }

        let travelled = travelled + (position - last).norm();
        if travelled > self.threshold() {
            log::trace!("Release ignored: moved {:.1}px", travelled);
            return None;
        }

        let duration_ms = time_ms - started_at_ms;
        if duration_ms > self.max_click_ms {
            log::trace!("Release ignored: press lasted {:.0}ms", duration_ms);
            return None;
        }

        Some(ClickEvent { position, duration_ms })
    }

    /// Orbit controls started moving the camera
    pub fn orbit_start(&mut self) {
        self.orbiting = true;
        if matches!(self.state, GestureState::PotentialClick { .. }) {
            self.state = GestureState::Dragging;
        }
    }

    /// Orbit controls stopped
    pub fn orbit_end(&mut self) {
        self.orbiting = false;
    }

    /// Pointer lost (capture released, window blurred)
    pub fn cancel(&mut self) {
        self.state = GestureState::Idle;
    }
}

impl Default for ClickDetector {
    fn default() -> Self {
        Self::new(&GestureConfig::default(), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn test_stationary_press_is_click() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(100.0, 100.0), 0.0);
        let click = detector.pointer_up(at(100.0, 100.0), 120.0).unwrap();
        assert_eq!(click.position, at(100.0, 100.0));
        assert_eq!(click.duration_ms, 120.0);
        assert_eq!(*detector.state(), GestureState::Idle);
    }

    #[test]
    fn test_eight_pixel_move_is_drag() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(100.0, 100.0), 0.0);
        detector.pointer_move(at(108.0, 100.0));
        assert_eq!(*detector.state(), GestureState::Dragging);
        assert!(detector.pointer_up(at(108.0, 100.0), 100.0).is_none());
    }

    #[test]
    fn test_threshold_scales_with_pixel_ratio() {
        let mut detector = ClickDetector::new(&GestureConfig::default(), 2.0);
        detector.pointer_down(at(100.0, 100.0), 0.0);
        detector.pointer_move(at(108.0, 100.0));
        assert!(detector.pointer_up(at(108.0, 100.0), 100.0).is_some());
    }

    #[test]
    fn test_displacement_is_cumulative() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(100.0, 100.0), 0.0);
        // Wiggle out and back: net zero, path length 8
        detector.pointer_move(at(104.0, 100.0));
        detector.pointer_move(at(100.0, 100.0));
        assert!(detector.pointer_up(at(100.0, 100.0), 50.0).is_none());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(0.0, 0.0), 0.0);
        detector.pointer_move(at(6.0, 0.0));
        assert!(detector.pointer_up(at(6.0, 0.0), 10.0).is_some());
    }

    #[test]
    fn test_release_jump_counts() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(0.0, 0.0), 0.0);
        assert!(detector.pointer_up(at(20.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_slow_press_is_not_click() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(50.0, 50.0), 1000.0);
        assert!(detector.pointer_up(at(50.0, 50.0), 1301.0).is_none());

        detector.pointer_down(at(50.0, 50.0), 2000.0);
        assert!(detector.pointer_up(at(50.0, 50.0), 2300.0).is_some());
    }

    #[test]
    fn test_orbit_suppresses_click() {
        let mut detector = ClickDetector::default();
        detector.pointer_down(at(10.0, 10.0), 0.0);
        detector.orbit_start();
        assert_eq!(*detector.state(), GestureState::Dragging);
        detector.orbit_end();
        assert!(detector.pointer_up(at(10.0, 10.0), 50.0).is_none());

        // Orbit still active from elsewhere (damping): no click either
        detector.orbit_start();
        detector.pointer_down(at(10.0, 10.0), 100.0);
        assert!(detector.pointer_up(at(10.0, 10.0), 150.0).is_none());
        detector.orbit_end();
    }

    #[test]
    fn test_up_without_down_and_cancel() {
        let mut detector = ClickDetector::default();
        assert!(detector.pointer_up(at(0.0, 0.0), 0.0).is_none());

        detector.pointer_down(at(0.0, 0.0), 0.0);
        detector.cancel();
        assert!(detector.pointer_up(at(0.0, 0.0), 10.0).is_none());
    }
}
