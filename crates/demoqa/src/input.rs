//! Keyboard keys and pointer geometry.

use serde::{Deserialize, Serialize};

/// CDP modifier bit for Control
pub const MODIFIER_CONTROL: i64 = 2;

/// Keys the page objects press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// Tab
    Tab,
    /// Escape
    Escape,
    /// Control modifier
    Control,
    /// A printable ASCII character
    Char(char),
}

impl Key {
    /// DOM `key` value
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Enter => "Enter".into(),
            Self::Backspace => "Backspace".into(),
            Self::Delete => "Delete".into(),
            Self::ArrowLeft => "ArrowLeft".into(),
            Self::ArrowRight => "ArrowRight".into(),
            Self::Tab => "Tab".into(),
            Self::Escape => "Escape".into(),
            Self::Control => "Control".into(),
            Self::Char(c) => c.to_string(),
        }
    }

    /// DOM `code` value
    #[must_use]
    pub fn code(self) -> String {
        match self {
            Self::Control => "ControlLeft".into(),
            Self::Char(c) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
            Self::Char(c) if c.is_ascii_digit() => format!("Digit{c}"),
            Self::Char(' ') => "Space".into(),
            Self::Char(c) => c.to_string(),
            other => other.key(),
        }
    }

    /// Windows virtual key code
    #[must_use]
    pub fn virtual_key_code(self) -> i64 {
        match self {
            Self::Backspace => 8,
            Self::Tab => 9,
            Self::Enter => 13,
            Self::Control => 17,
            Self::Escape => 27,
            Self::ArrowLeft => 37,
            Self::ArrowRight => 39,
            Self::Delete => 46,
            Self::Char(c) => i64::from(u32::from(c.to_ascii_uppercase())),
        }
    }

    /// Text the key produces, if any
    #[must_use]
    pub fn text(self) -> Option<String> {
        match self {
            Self::Enter => Some("\r".into()),
            Self::Char(c) => Some(c.to_string()),
            _ => None,
        }
    }

    /// Whether this key is a modifier
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(self, Self::Control)
    }
}

impl std::str::FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enter" | "Return" => Ok(Self::Enter),
            "Backspace" => Ok(Self::Backspace),
            "Delete" => Ok(Self::Delete),
            "ArrowLeft" | "Left arrow" => Ok(Self::ArrowLeft),
            "ArrowRight" | "Right arrow" => Ok(Self::ArrowRight),
            "Tab" => Ok(Self::Tab),
            "Escape" => Ok(Self::Escape),
            "Control" | "Ctrl" => Ok(Self::Control),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii() => Ok(Self::Char(c)),
                    _ => Err(format!("unsupported key '{other}'")),
                }
            }
        }
    }
}

/// A point in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset by a delta
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Element size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

/// Element rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre point
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Top-left corner
    #[must_use]
    pub const fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height
    #[must_use]
    pub const fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Whether the rectangle has area
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Points visited when dragging from `from` to `to` in `steps` moves.
///
/// The start point is not included; the last point is always `to`.
#[must_use]
pub fn drag_path(from: Point, to: Point, steps: u32) -> Vec<Point> {
    let steps = steps.max(1);
    (1..=steps)
        .map(|i| {
            let t = f64::from(i) / f64::from(steps);
            Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod key_tests {
        use super::*;

        #[test]
        fn test_enter_metadata() {
            assert_eq!(Key::Enter.key(), "Enter");
            assert_eq!(Key::Enter.code(), "Enter");
            assert_eq!(Key::Enter.virtual_key_code(), 13);
            assert_eq!(Key::Enter.text().as_deref(), Some("\r"));
        }

        #[test]
        fn test_arrows_have_no_text() {
            assert_eq!(Key::ArrowRight.virtual_key_code(), 39);
            assert_eq!(Key::ArrowLeft.virtual_key_code(), 37);
            assert!(Key::ArrowRight.text().is_none());
        }

        #[test]
        fn test_char_key() {
            let a = Key::Char('a');
            assert_eq!(a.key(), "a");
            assert_eq!(a.code(), "KeyA");
            assert_eq!(a.virtual_key_code(), 65);
            assert_eq!(Key::Char('5').code(), "Digit5");
        }

        #[test]
        fn test_control_is_modifier() {
            assert!(Key::Control.is_modifier());
            assert!(!Key::Tab.is_modifier());
            assert_eq!(Key::Control.code(), "ControlLeft");
        }

        #[test]
        fn test_parse() {
            assert_eq!("Enter".parse::<Key>().unwrap(), Key::Enter);
            assert_eq!("Right arrow".parse::<Key>().unwrap(), Key::ArrowRight);
            assert_eq!("x".parse::<Key>().unwrap(), Key::Char('x'));
            assert!("F13".parse::<Key>().is_err());
        }
    }

    mod geometry_tests {
        use super::*;

        #[test]
        fn test_rect_center() {
            let r = Rect::new(10.0, 20.0, 100.0, 50.0);
            assert_eq!(r.center(), Point::new(60.0, 45.0));
            assert_eq!(r.location(), Point::new(10.0, 20.0));
            assert_eq!(r.size().width, 100.0);
        }

        #[test]
        fn test_zero_rect_not_visible() {
            assert!(!Rect::default().is_visible());
            assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_visible());
        }

        #[test]
        fn test_point_offset() {
            assert_eq!(Point::new(1.0, 2.0).offset(99.0, -2.0), Point::new(100.0, 0.0));
        }

        #[test]
        fn test_drag_path_ends_at_target() {
            let path = drag_path(Point::new(0.0, 0.0), Point::new(100.0, 50.0), 10);
            assert_eq!(path.len(), 10);
            assert_eq!(path[0], Point::new(10.0, 5.0));
            assert_eq!(*path.last().unwrap(), Point::new(100.0, 50.0));
        }

        #[test]
        fn test_drag_path_zero_steps_is_single_move() {
            let path = drag_path(Point::new(5.0, 5.0), Point::new(6.0, 7.0), 0);
            assert_eq!(path, vec![Point::new(6.0, 7.0)]);
        }
    }
}
