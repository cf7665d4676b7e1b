//! goban-render
//!
//! Renders a Go board position as SVG inside a host container and keeps it in
//! sync with a stream of positions by applying only what changed.
//!
//! # Features
//!
//! - **Incremental updates**: each snapshot is diffed against the one on
//!   screen; only changed stones are rewritten
//! - **Host-agnostic**: drawing goes through the [`host::Host`] trait;
//!   [`host::MemoryHost`] keeps markup in memory
//! - **Themes**: built-in or loaded from JSON
//!
//! # Example
//!
//! ```
//! use goban_render::{Display, DisplayConfig, Flattened, MemoryHost, StoneState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = MemoryHost::with_container("board", 400.0, 400.0);
//! let config = DisplayConfig {
//!     container_id: "board".to_string(),
//!     intersections: 9,
//!     ..Default::default()
//! };
//!
//! let mut display = Display::create(host, config)?;
//! let next = Flattened::builder(9).stone((2, 2), StoneState::Black).build()?;
//! let changes = display.update_board(next)?;
//! assert_eq!(changes.len(), 1);
//! assert!(display.host().content("board").is_some());
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod display;
pub mod error;
pub mod events;
pub mod flattened;
pub mod host;
pub mod intersections;
pub mod point;
pub mod rendering;
pub mod theme;

pub use diff::{diff, DiffEntry};
pub use display::{Display, DisplayState};
pub use error::{Error, Result};
pub use events::{Event, EventKind, EventRegistry, EventTarget};
pub use flattened::{
    flatten, FlattenOptions, Flattened, FlattenedBuilder, Intersection, Mark, Position, ShowVariations,
    StoneState,
};
pub use host::{Host, MemoryHost};
pub use intersections::{Intersections, StoneColor};
pub use point::{Point, Rotation};
pub use theme::Theme;

/// Smallest supported board
pub const MIN_INTERSECTIONS: u32 = 2;
/// Largest supported board
pub const MAX_INTERSECTIONS: u32 = 25;

/// Configuration for a board display
///
/// Everything a display needs besides its host. The defaults draw a plain
/// 19x19 board with the default theme into a container called `goban`.
///
/// # Examples
///
/// ```
/// let cfg = goban_render::DisplayConfig::default();
/// assert_eq!(cfg.intersections, 19);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    /// Id of the host container to draw into. Also prefixes every element id.
    pub container_id: String,
    /// Number of lines in each direction
    pub intersections: u32,
    /// Visual style
    pub theme: Theme,
    /// Rotation applied to every point before it is drawn
    pub rotation: Rotation,
    /// Whether to draw column and row labels around the board
    pub draw_board_coords: bool,
    /// When [`flatten`] labels next-move variations
    pub show_variations: ShowVariations,
    /// Whether [`flatten`] marks the last move
    pub mark_last_move: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            container_id: "goban".to_string(),
            intersections: 19,
            theme: Theme::default(),
            rotation: Rotation::None,
            draw_board_coords: false,
            show_variations: ShowVariations::MoreThanOne,
            mark_last_move: true,
        }
    }
}

impl DisplayConfig {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_INTERSECTIONS..=MAX_INTERSECTIONS).contains(&self.intersections) {
            return Err(Error::ConfigError(format!(
                "intersections must be between {} and {}, got {}",
                MIN_INTERSECTIONS, MAX_INTERSECTIONS, self.intersections
            )));
        }
        if self.container_id.is_empty() || self.container_id.contains(char::is_whitespace) {
            return Err(Error::ConfigError(format!(
                "invalid container id '{}'",
                self.container_id
            )));
        }
        self.theme.validate()
    }

    /// Options for turning a [`Position`] into a snapshot for this display
    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            show_variations: self.show_variations,
            mark_last_move: self.mark_last_move,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DisplayConfig::default();
        assert_eq!(config.intersections, 19);
        assert_eq!(config.rotation, Rotation::None);
        assert!(config.mark_last_move);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_board_size_bounds() {
        for (size, ok) in [(1, false), (2, true), (13, true), (25, true), (26, false)] {
            let config = DisplayConfig { intersections: size, ..Default::default() };
            assert_eq!(config.validate().is_ok(), ok, "size {}", size);
        }
    }

    #[test]
    fn test_container_id_is_checked() {
        let config = DisplayConfig { container_id: "my board".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_flatten_options_follow_config() {
        let config = DisplayConfig {
            show_variations: ShowVariations::Never,
            mark_last_move: false,
            ..Default::default()
        };
        let opts = config.flatten_options();
        assert_eq!(opts.show_variations, ShowVariations::Never);
        assert!(!opts.mark_last_move);
    }
}
