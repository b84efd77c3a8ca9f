//! Axial placement of components
//!
//! Every component declares a position mode plus an offset. The mode is
//! interpreted against an axial window supplied by the caller (usually the
//! parent tube's extent) and, for some modes, the component's own length.
//! Different component categories use different formula families, see
//! [`PositionFamily`].

use serde::{Deserialize, Serialize};

/// Declared position mode of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PositionMode {
    #[default]
    Top,
    Bottom,
    Middle,
    After,
    Absolute,
}

impl PositionMode {
    /// Parse the `type` attribute of a `<position>` element, ignoring case
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "middle" => Some(Self::Middle),
            "after" => Some(Self::After),
            "absolute" => Some(Self::Absolute),
            _ => None,
        }
    }
}

/// Position mode plus offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionSpec {
    pub mode: PositionMode,
    pub offset: f64,
}

impl PositionSpec {
    pub fn new(mode: PositionMode, offset: f64) -> Self {
        Self { mode, offset }
    }
}

/// Reference point for a fin tab along the fin root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TabPositionMode {
    #[default]
    Front,
    Center,
    End,
}

impl TabPositionMode {
    /// Parse the `relativeto` attribute of a `<tabposition>` element
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "front" => Some(Self::Front),
            "center" => Some(Self::Center),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

/// Tab reference point plus offset along the fin root
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TabPositionSpec {
    pub mode: TabPositionMode,
    pub offset: f64,
}

impl TabPositionSpec {
    pub fn new(mode: TabPositionMode, offset: f64) -> Self {
        Self { mode, offset }
    }
}

/// Axial extent `[start, end)` a component is positioned against
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxialWindow {
    pub start: f64,
    pub end: f64,
}

impl AxialWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window of `length` beginning at `start`
    pub fn from_start(start: f64, length: f64) -> Self {
        Self::new(start, start + length)
    }

    /// Window that only carries a stack length, as used for couplers
    pub fn stack(stack_length: f64) -> Self {
        Self::new(0.0, stack_length)
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Formula family used to turn a [`PositionSpec`] into an axial coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFamily {
    /// Body tubes, bulkheads, centering rings and fin sets
    Window,
    /// Inner tubes: like `Window`, but `After` aligns the aft ends
    InnerTube,
    /// Tube couplers, placed against the stack length (the window end)
    Stack,
}

/// Resolve the axial start of a component.
///
/// `local_length` is the component's own axial length (the root chord for fin
/// sets). The `Middle` rule of the window families uses the window length, not
/// its midpoint.
pub fn resolve(
    spec: PositionSpec,
    window: AxialWindow,
    local_length: f64,
    family: PositionFamily,
) -> f64 {
    let offset = spec.offset;

    match family {
        PositionFamily::Window | PositionFamily::InnerTube => match spec.mode {
            PositionMode::Top => window.start + offset,
            PositionMode::Bottom => window.end - local_length + offset,
            PositionMode::Middle => (window.end - window.start) / 2.0 + offset,
            PositionMode::After if family == PositionFamily::InnerTube => {
                window.end - local_length + offset
            }
            PositionMode::After => window.end + offset,
            PositionMode::Absolute => offset,
        },
        PositionFamily::Stack => {
            let stack_length = window.end;
            match spec.mode {
                PositionMode::Top => local_length + offset,
                PositionMode::Bottom => stack_length - local_length + offset,
                PositionMode::Middle => stack_length - local_length / 2.0 + offset,
                PositionMode::After => stack_length + local_length + offset,
                PositionMode::Absolute => offset,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const WINDOW: AxialWindow = AxialWindow {
        start: 100.0,
        end: 300.0,
    };

    fn at(mode: PositionMode, offset: f64, family: PositionFamily) -> f64 {
        resolve(PositionSpec::new(mode, offset), WINDOW, 20.0, family)
    }

    #[test]
    fn test_mode_tokens() {
        assert_eq!(PositionMode::from_token("TOP"), Some(PositionMode::Top));
        assert_eq!(PositionMode::from_token("after"), Some(PositionMode::After));
        assert_eq!(PositionMode::from_token(" Absolute "), Some(PositionMode::Absolute));
        assert_eq!(PositionMode::from_token("aft"), None);

        assert_eq!(TabPositionMode::from_token("Center"), Some(TabPositionMode::Center));
        assert_eq!(TabPositionMode::from_token("middle"), None);
    }

    #[test]
    fn test_window_family() {
        use PositionMode::*;
        let family = PositionFamily::Window;

        assert_relative_eq!(at(Top, 5.0, family), 105.0);
        assert_relative_eq!(at(Top, -5.0, family), 95.0);
        assert_relative_eq!(at(Bottom, 0.0, family), 280.0);
        assert_relative_eq!(at(Middle, 1.0, family), 101.0);
        assert_relative_eq!(at(After, 2.0, family), 302.0);
        assert_relative_eq!(at(Absolute, 7.0, family), 7.0);
    }

    #[test]
    fn test_inner_tube_family() {
        use PositionMode::*;
        let family = PositionFamily::InnerTube;

        assert_relative_eq!(at(Top, 5.0, family), 105.0);
        assert_relative_eq!(at(After, 2.0, family), 282.0);
        assert_relative_eq!(at(After, 2.0, family), at(Bottom, 2.0, family));
    }

    #[test]
    fn test_stack_family() {
        use PositionMode::*;
        let family = PositionFamily::Stack;

        // Only the window end (the stack length) matters
        assert_relative_eq!(at(Top, 1.0, family), 21.0);
        assert_relative_eq!(at(Bottom, 1.0, family), 281.0);
        assert_relative_eq!(at(Middle, 0.0, family), 290.0);
        assert_relative_eq!(at(After, 0.0, family), 320.0);
        assert_relative_eq!(at(Absolute, -3.0, family), -3.0);
    }

    #[test]
    fn test_top_is_start_plus_offset() {
        for (start, offset) in [(0.0, 0.0), (12.5, 3.0), (-4.0, 1.25), (1e3, -7.5)] {
            let window = AxialWindow::from_start(start, 80.0);
            let x = resolve(
                PositionSpec::new(PositionMode::Top, offset),
                window,
                10.0,
                PositionFamily::Window,
            );
            assert_relative_eq!(x, start + offset);
        }
    }

    #[test]
    fn test_window_helpers() {
        let window = AxialWindow::from_start(50.0, 200.0);
        assert_relative_eq!(window.end, 250.0);
        assert_relative_eq!(window.length(), 200.0);
        assert_relative_eq!(AxialWindow::stack(42.0).end, 42.0);
    }
}
