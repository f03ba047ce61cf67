//! Pointer/touch gesture state
//!
//! One modality is live per session. The platform layer forwards
//! start/move/end events here; the pit reads the result once per frame.

use serde::{Deserialize, Serialize};

/// A point in device pixels, relative to the viewport origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which pointing modality drives injection this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    Touch,
    Mouse,
}

impl InputMode {
    /// Pick the modality from the one-time device capability flag
    pub fn from_touch_primary(touch_primary: bool) -> Self {
        if touch_primary {
            InputMode::Touch
        } else {
            InputMode::Mouse
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Touch => "touch",
            InputMode::Mouse => "mouse",
        }
    }
}

/// True for phone/tablet user agents (`iPhone`, `iPad`, or `Android ... Mobile`)
pub fn is_touch_primary(user_agent: &str) -> bool {
    if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        return true;
    }
    const ANDROID: &str = "Android";
    user_agent.find(ANDROID).is_some_and(|i| {
        // At least one character between "Android" and "Mobile"
        let mut rest = user_agent[i + ANDROID.len()..].chars();
        rest.next().is_some() && rest.as_str().contains("Mobile")
    })
}

/// Current injection gesture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    active: bool,
    position: ScreenPoint,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gesture began (mouse down / first touch)
    pub fn start(&mut self, at: ScreenPoint) {
        self.active = true;
        self.position = at;
    }

    /// Pointer moved. Ignored unless a gesture is active.
    pub fn moved(&mut self, to: ScreenPoint) {
        if self.active {
            self.position = to;
        }
    }

    /// Gesture ended (mouse up / touch end)
    pub fn end(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last recorded position (kept after the gesture ends)
    pub fn position(&self) -> ScreenPoint {
        self.position
    }

    /// Position of the live gesture, if any
    pub fn active_position(&self) -> Option<ScreenPoint> {
        self.active.then_some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_lifecycle() {
        let mut p = PointerState::new();
        assert!(!p.is_active());
        assert_eq!(p.active_position(), None);

        p.start(ScreenPoint::new(10.0, 20.0));
        assert_eq!(p.active_position(), Some(ScreenPoint::new(10.0, 20.0)));

        p.moved(ScreenPoint::new(30.0, 40.0));
        assert_eq!(p.position(), ScreenPoint::new(30.0, 40.0));

        p.end();
        assert!(!p.is_active());
        assert_eq!(p.active_position(), None);
    }

    #[test]
    fn test_move_without_gesture_is_ignored() {
        let mut p = PointerState::new();
        p.moved(ScreenPoint::new(5.0, 5.0));
        assert_eq!(p.position(), ScreenPoint::default());

        p.start(ScreenPoint::new(1.0, 1.0));
        p.end();
        p.moved(ScreenPoint::new(9.0, 9.0));
        assert_eq!(p.position(), ScreenPoint::new(1.0, 1.0));
    }

    #[test]
    fn test_touch_primary_detection() {
        assert!(is_touch_primary(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)"
        ));
        assert!(is_touch_primary("Mozilla/5.0 (iPad; CPU OS 16_0)"));
        assert!(is_touch_primary(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) Mobile Safari/537.36"
        ));
        // Android tablets don't advertise "Mobile"
        assert!(!is_touch_primary("Mozilla/5.0 (Linux; Android 14; SM-X710)"));
        assert!(!is_touch_primary(
            "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/128.0"
        ));
        assert!(!is_touch_primary("AndroidMobile"));
        // A later "Mobile" still counts when the first one is adjacent
        assert!(is_touch_primary(
            "Mozilla/5.0 (Linux; AndroidMobile; Android 12) Mobile"
        ));
    }

    #[test]
    fn test_input_mode_from_flag() {
        assert_eq!(InputMode::from_touch_primary(true), InputMode::Touch);
        assert_eq!(InputMode::from_touch_primary(false), InputMode::Mouse);
    }
}
