//! The board display.
//!
//! A [`Display`] draws the full board into its host container once, then
//! keeps it in sync with a stream of snapshots through [`Display::update_board`].
//! Each update diffs the new snapshot against the last one applied, touches
//! only the stones that changed and sends the resulting mutations to the
//! host.

use crate::diff::{diff, DiffEntry};
use crate::error::{Error, Result};
use crate::flattened::Flattened;
use crate::host::Host;
use crate::intersections::Intersections;
use crate::rendering::ids::IdGen;
use crate::rendering::paint;
use crate::rendering::svg::num;
use crate::rendering::{BoardPoints, BoundingBox, SvgTree};
use crate::DisplayConfig;
use log::{debug, trace};

/// Lifecycle of a display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// Constructed, nothing drawn yet
    Uninitialized,
    /// Drawn and accepting updates
    Initialized,
    /// Content removed; `draw` brings it back
    Destroyed,
}

pub struct Display<H: Host> {
    host: H,
    config: DisplayConfig,
    ids: IdGen,
    surface: Option<Intersections>,
    flattened: Flattened,
    state: DisplayState,
}

impl<H: Host> Display<H> {
    /// Validate the configuration and take ownership of the host. Nothing is
    /// drawn until [`Display::draw`].
    pub fn new(host: H, config: DisplayConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ids: IdGen::new(&config.container_id),
            flattened: Flattened::empty(config.intersections),
            host,
            config,
            surface: None,
            state: DisplayState::Uninitialized,
        })
    }

    /// Construct and draw in one step
    pub fn create(host: H, config: DisplayConfig) -> Result<Self> {
        let mut display = Self::new(host, config)?;
        display.draw()?;
        Ok(display)
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// The snapshot currently shown
    pub fn baseline(&self) -> &Flattened {
        &self.flattened
    }

    pub fn intersections(&self) -> Option<&Intersections> {
        self.surface.as_ref()
    }

    /// Mutable access to the render surface, e.g. for hover previews. Call
    /// [`Display::flush`] afterwards to push the changes to the host.
    pub fn intersections_mut(&mut self) -> Result<&mut Intersections> {
        match self.state {
            DisplayState::Uninitialized => Err(Error::NotDrawn),
            DisplayState::Destroyed => Err(Error::Destroyed),
            DisplayState::Initialized => self.surface.as_mut().ok_or(Error::NotDrawn),
        }
    }

    /// Build every layer of the board and attach it to the container.
    ///
    /// The container geometry is checked before anything is touched, so a
    /// failed draw leaves the container as it was. Any previous content is
    /// removed first.
    pub fn draw(&mut self) -> Result<&mut Self> {
        let id = self.config.container_id.clone();
        let bbox = self
            .host
            .container_bbox(&id)
            .ok_or_else(|| Error::UnknownContainer(id.clone()))?;
        if bbox.is_degenerate() {
            return Err(Error::InvalidContainer { id, width: bbox.width, height: bbox.height });
        }

        self.host.empty(&id)?;
        self.surface = None;

        let local = BoundingBox::from_size(bbox.width, bbox.height);
        let mut tree = SvgTree::new([
            ("id", self.ids.svg()),
            ("width", num(local.width)),
            ("height", num(local.height)),
            ("viewBox", format!("0 0 {} {}", num(local.width), num(local.height))),
        ]);
        let points = BoardPoints::new(local, self.config.intersections, self.config.draw_board_coords);
        let layers = paint::paint_board(&mut tree, &self.ids, &points, &self.config.theme);
        // The whole tree goes out with attach; nothing to patch.
        tree.take_mutations();
        debug!(
            "draw: {}x{} board in '{}' ({} elements)",
            self.config.intersections,
            self.config.intersections,
            id,
            tree.len()
        );

        self.host.attach(&id, &tree)?;
        self.surface = Some(Intersections::new(
            tree,
            layers,
            self.ids.clone(),
            points,
            self.config.theme.clone(),
            self.config.rotation,
        ));
        self.flattened = Flattened::empty(self.config.intersections);
        self.state = DisplayState::Initialized;
        Ok(self)
    }

    /// Bring the board in line with `next` and make it the new baseline.
    ///
    /// Stones are only touched where they changed. Marks are cleared and
    /// every mark of `next` is drawn again, so each update sends one
    /// `Remove` and one `Append` per mark even when no mark changed. An
    /// unchanged snapshot without marks sends nothing. Returns the points
    /// that differ from the previous baseline.
    ///
    /// If the host rejects the patch the baseline is kept and the error is
    /// returned. The surface already shows `next`; its pending mutations go
    /// out with the next flush, so retrying the same snapshot recovers.
    pub fn update_board(&mut self, next: Flattened) -> Result<Vec<DiffEntry>> {
        // Diff first: a size mismatch must fail before the surface is touched.
        let changes = diff(&self.flattened, &next)?;
        let surface = self.intersections_mut()?;
        surface.clear_marks();

        for entry in changes.iter().filter(|e| e.stone_changed()) {
            surface.set_stone_color(entry.point, entry.next.stone().into())?;
        }
        for (pt, mark, label) in next.marks() {
            surface.add_mark_pt(pt, mark, label)?;
        }

        trace!("update_board: {} changed points", changes.len());
        self.flush()?;
        self.flattened = next;
        Ok(changes)
    }

    /// Send pending tree mutations to the host. The journal is only drained
    /// once the host accepts the patch; after a failure the same mutations
    /// go out again with the next flush.
    pub fn flush(&mut self) -> Result<()> {
        let surface = self.surface.as_mut().ok_or(Error::NotDrawn)?;
        let pending = surface.tree().pending_mutations();
        if pending.is_empty() {
            return Ok(());
        }
        debug!("flush: {} mutations to '{}'", pending.len(), self.config.container_id);
        self.host.patch(&self.config.container_id, surface.tree(), pending)?;
        surface.tree_mut().take_mutations();
        Ok(())
    }

    /// Remove the board from its container and forget the baseline. Safe to
    /// call in any state, any number of times.
    pub fn destroy(&mut self) -> Result<()> {
        let id = &self.config.container_id;
        if self.host.container_bbox(id).is_some() {
            self.host.empty(id)?;
        }
        self.surface = None;
        self.flattened = Flattened::empty(self.config.intersections);
        if self.state != DisplayState::Destroyed {
            debug!("destroy: '{}'", id);
        }
        self.state = DisplayState::Destroyed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flattened::{Mark, StoneState};
    use crate::host::MemoryHost;
    use crate::point::Point;

    fn config(size: u32) -> DisplayConfig {
        DisplayConfig {
            container_id: "board".into(),
            intersections: size,
            ..Default::default()
        }
    }

    #[test]
    fn lifecycle_states() {
        let host = MemoryHost::with_container("board", 200.0, 200.0);
        let mut d = Display::new(host, config(9)).unwrap();
        assert_eq!(d.state(), DisplayState::Uninitialized);
        assert_eq!(d.update_board(Flattened::empty(9)), Err(Error::NotDrawn));

        d.draw().unwrap();
        assert_eq!(d.state(), DisplayState::Initialized);
        assert!(d.host().content("board").is_some());

        d.destroy().unwrap();
        d.destroy().unwrap();
        assert_eq!(d.state(), DisplayState::Destroyed);
        assert!(d.host().content("board").is_none());
        assert_eq!(d.update_board(Flattened::empty(9)), Err(Error::Destroyed));
    }

    #[test]
    fn size_mismatch_leaves_marks_alone() {
        let host = MemoryHost::with_container("board", 200.0, 200.0);
        let mut d = Display::create(host, config(9)).unwrap();
        let marked = Flattened::builder(9).mark((2, 2), Mark::Square).build().unwrap();
        d.update_board(marked).unwrap();

        let err = d.update_board(Flattened::empty(13)).unwrap_err();
        assert_eq!(err, Error::DimensionMismatch { previous: 9, next: 13 });
        let s = d.intersections().unwrap();
        assert_eq!(s.mark_at(Point::new(2, 2)).unwrap(), Some(Mark::Square));
    }

    #[test]
    fn unknown_container_fails_draw() {
        let mut d = Display::new(MemoryHost::new(), config(9)).unwrap();
        assert_eq!(d.draw().err(), Some(Error::UnknownContainer("board".into())));
        assert_eq!(d.state(), DisplayState::Uninitialized);
    }

    #[test]
    fn unchanged_stones_are_not_rewritten() {
        let host = MemoryHost::with_container("board", 200.0, 200.0);
        let mut d = Display::create(host, config(9)).unwrap();
        let first = Flattened::builder(9).stone((3, 3), StoneState::Black).build().unwrap();
        d.update_board(first).unwrap();

        let second = Flattened::builder(9)
            .stone((3, 3), StoneState::Black)
            .stone((5, 5), StoneState::White)
            .build()
            .unwrap();
        d.update_board(second).unwrap();

        let s = d.intersections().unwrap();
        let touched = s.stone_handle(Point::new(5, 5)).unwrap();
        let untouched = s.stone_handle(Point::new(3, 3)).unwrap();
        let patch = d.host().last_patch("board");
        assert!(!patch.is_empty());
        assert!(patch.iter().any(|m| m.target() == touched));
        assert!(patch.iter().all(|m| m.target() != untouched));
    }

    #[test]
    fn hover_preview_goes_through_flush() {
        let host = MemoryHost::with_container("board", 200.0, 200.0);
        let mut d = Display::create(host, config(9)).unwrap();
        d.intersections_mut()
            .unwrap()
            .set_stone_color(Point::new(0, 0), crate::intersections::StoneColor::BlackHover)
            .unwrap();
        assert_eq!(d.host().patch_count("board"), 0);
        d.flush().unwrap();
        assert_eq!(d.host().patch_count("board"), 1);
    }
}
