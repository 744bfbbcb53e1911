//! Rendering knobs, fixed once the kaleidoscope is constructed.

use std::fmt;
use std::str::FromStr;

/// Symmetry group used to tile the content texture over the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Mirrored square cells.
    Square,
    /// Six-fold triangular lattice.
    #[default]
    Triangle,
}

impl FromStr for Shape {
    type Err = std::convert::Infallible;

    /// Anything but `"square"` selects the triangular tiling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "square" => Shape::Square,
            _ => Shape::Triangle,
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Square => write!(f, "square"),
            Shape::Triangle => write!(f, "triangle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub num_particles: usize,
    /// `None` leaves the display transparent between tiles.
    pub bg_color: Option<String>,
    pub shape: Shape,
    /// Rotate the tiling grid itself with the drag angle.
    pub rot_screen: bool,
    /// Canvas `globalCompositeOperation` used for particle imprints.
    pub composite_operation: Option<String>,
    /// Fixed RNG seed for reproducible particle layouts.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            num_particles: 32,
            bg_color: Some("#000000".to_owned()),
            shape: Shape::Triangle,
            rot_screen: true,
            composite_operation: None,
            seed: None,
        }
    }
}

/// Optional host callbacks.
#[derive(Default)]
pub struct Hooks {
    /// Fired once, right after the first frame has been scheduled.
    pub post_init: Option<Box<dyn FnOnce()>>,
    /// Fired at the end of every frame with the frame timestamp (ms).
    pub on_render: Option<Box<dyn FnMut(f64)>>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("post_init", &self.post_init.is_some())
            .field("on_render", &self.on_render.is_some())
            .finish()
    }
}
