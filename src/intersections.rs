//! Render surface: one persistent stone, shadow and button element per
//! intersection, plus the marks currently drawn over them.
//!
//! Every operation takes logical board points. The configured rotation is
//! applied before the registry lookup, so callers never deal with display
//! coordinates.

use crate::error::{Error, Result};
use crate::flattened::{Mark, StoneState};
use crate::point::{Point, Rotation};
use crate::rendering::ids::IdGen;
use crate::rendering::paint::{self, Layers, MarkGlyph};
use crate::rendering::{BoardPoints, NodeId, SvgTree};
use crate::theme::Theme;
use log::trace;

/// Colour a stone element can show. The hover variants are set by event
/// handlers and never come from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoneColor {
    #[default]
    Empty,
    Black,
    White,
    BlackHover,
    WhiteHover,
}

impl StoneColor {
    /// A real stone, as opposed to an empty point or a hover preview
    pub fn is_placed(&self) -> bool {
        matches!(self, StoneColor::Black | StoneColor::White)
    }
}

impl From<StoneState> for StoneColor {
    fn from(s: StoneState) -> Self {
        match s {
            StoneState::Empty => StoneColor::Empty,
            StoneState::Black => StoneColor::Black,
            StoneState::White => StoneColor::White,
        }
    }
}

/// Elements owned by a single intersection
#[derive(Debug, Clone)]
struct PointHandles {
    stone: NodeId,
    shadow: Option<NodeId>,
    button: NodeId,
    marks: Vec<NodeId>,
    color: StoneColor,
    mark: Option<Mark>,
}

pub struct Intersections {
    tree: SvgTree,
    ids: IdGen,
    points: BoardPoints,
    theme: Theme,
    rotation: Rotation,
    mark_container: NodeId,
    registry: Vec<PointHandles>,
}

impl Intersections {
    /// Wrap a painted tree. `layers` must come from painting `tree` with the
    /// same geometry.
    pub fn new(
        tree: SvgTree,
        layers: Layers,
        ids: IdGen,
        points: BoardPoints,
        theme: Theme,
        rotation: Rotation,
    ) -> Self {
        let Layers { stones, shadows, mark_container, buttons } = layers;
        let registry = stones
            .into_iter()
            .zip(buttons)
            .enumerate()
            .map(|(i, (stone, button))| PointHandles {
                stone,
                shadow: shadows.as_ref().and_then(|s| s.get(i).copied()),
                button,
                marks: Vec::new(),
                color: StoneColor::Empty,
                mark: None,
            })
            .collect();
        Self { tree, ids, points, theme, rotation, mark_container, registry }
    }

    pub fn size(&self) -> u32 {
        self.points.size()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn tree(&self) -> &SvgTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SvgTree {
        &mut self.tree
    }

    /// Display point and registry index for a logical point
    fn resolve(&self, pt: Point) -> Result<(Point, usize)> {
        let size = self.size();
        if !pt.in_bounds(size) {
            return Err(Error::PointOutOfRange { point: pt, size });
        }
        let shown = pt.rotate(size, self.rotation);
        Ok((shown, shown.index(size)))
    }

    fn handles(&self, pt: Point) -> Result<&PointHandles> {
        let (_, i) = self.resolve(pt)?;
        Ok(&self.registry[i])
    }

    /// Show `color` at `pt`. The shadow is visible exactly when a real stone
    /// is placed.
    pub fn set_stone_color(&mut self, pt: Point, color: StoneColor) -> Result<()> {
        let (_, i) = self.resolve(pt)?;
        let (stone, shadow) = {
            let h = &mut self.registry[i];
            h.color = color;
            (h.stone, h.shadow)
        };
        trace!("stone {} -> {:?}", pt, color);
        for (k, v) in paint::stone_attrs(&self.theme, color) {
            self.tree.set_attr(stone, k, v);
        }
        if let (Some(shadow), Some(style)) = (shadow, &self.theme.shadows) {
            let opacity = if color.is_placed() { style.opacity } else { 0.0 };
            self.tree.set_attr(shadow, "opacity", crate::rendering::svg::num(opacity));
        }
        Ok(())
    }

    /// Draw `mark` at `pt`, replacing any mark already there. Label-bearing
    /// marks need `label`; the others must not have one.
    pub fn add_mark_pt(&mut self, pt: Point, mark: Mark, label: Option<&str>) -> Result<()> {
        match (mark.is_label(), label) {
            (true, None) => return Err(Error::MissingLabel(mark.to_string())),
            (false, Some(_)) => return Err(Error::UnexpectedLabel(mark.to_string())),
            _ => {}
        }
        let (shown, i) = self.resolve(pt)?;
        self.remove_marks_at(i);

        let color = self.registry[i].color;
        let backing = (mark.is_label() && !color.is_placed()).then_some(self.theme.board.fill.as_str());
        let glyph = MarkGlyph { mark, label, color: self.theme.mark_fill(mark, color), backing };
        let el = paint::mark_element(
            &mut self.tree,
            self.ids.mark(shown),
            pt,
            self.points.coord(shown),
            &self.points,
            &self.theme,
            glyph,
        );
        self.tree.append(self.mark_container, el);
        trace!("mark {} -> {}", pt, mark);

        let h = &mut self.registry[i];
        h.marks.push(el);
        h.mark = Some(mark);
        Ok(())
    }

    fn remove_marks_at(&mut self, i: usize) {
        let h = &mut self.registry[i];
        h.mark = None;
        for m in std::mem::take(&mut h.marks) {
            self.tree.remove(m);
        }
    }

    /// Remove every mark from the board
    pub fn clear_marks(&mut self) {
        self.tree.empty_children(self.mark_container);
        for h in &mut self.registry {
            h.marks.clear();
            h.mark = None;
        }
    }

    pub fn stone_color(&self, pt: Point) -> Result<StoneColor> {
        Ok(self.handles(pt)?.color)
    }

    /// Whether the shadow under `pt` is drawn. Always false without a
    /// shadow layer.
    pub fn shadow_visible(&self, pt: Point) -> Result<bool> {
        let h = self.handles(pt)?;
        Ok(h.shadow
            .and_then(|s| self.tree.attr(s, "opacity"))
            .is_some_and(|o| o != "0"))
    }

    pub fn has_shadows(&self) -> bool {
        self.registry.first().is_some_and(|h| h.shadow.is_some())
    }

    pub fn mark_at(&self, pt: Point) -> Result<Option<Mark>> {
        Ok(self.handles(pt)?.mark)
    }

    /// Mark elements currently registered at `pt`
    pub fn mark_handles(&self, pt: Point) -> Result<&[NodeId]> {
        Ok(self.handles(pt)?.marks.as_slice())
    }

    /// Total number of mark elements on the board
    pub fn mark_count(&self) -> usize {
        self.registry.iter().map(|h| h.marks.len()).sum()
    }

    pub fn stone_handle(&self, pt: Point) -> Result<NodeId> {
        Ok(self.handles(pt)?.stone)
    }

    /// Hit target for `pt`, the attachment point for pointer events
    pub fn button(&self, pt: Point) -> Result<NodeId> {
        Ok(self.handles(pt)?.button)
    }

    /// Logical point under a hit target, if `node` is one
    pub fn point_for_button(&self, node: NodeId) -> Option<Point> {
        let size = self.size();
        let i = self.registry.iter().position(|h| h.button == node)?;
        let shown = Point::new(i as u32 % size, i as u32 / size);
        Some(shown.rotate(size, self.rotation.inverse()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::all_points;
    use crate::rendering::BoundingBox;

    fn surface(theme: Theme, rotation: Rotation) -> Intersections {
        let ids = IdGen::new("s");
        let mut tree = SvgTree::new([("id", ids.svg())]);
        let points = BoardPoints::new(BoundingBox::from_size(180.0, 180.0), 9, false);
        let layers = paint::paint_board(&mut tree, &ids, &points, &theme);
        Intersections::new(tree, layers, ids, points, theme, rotation)
    }

    #[test]
    fn shadow_follows_placed_stones() {
        let mut s = surface(Theme::default(), Rotation::None);
        let pt = Point::new(3, 3);
        for color in [
            StoneColor::Black,
            StoneColor::Empty,
            StoneColor::White,
            StoneColor::BlackHover,
            StoneColor::WhiteHover,
        ] {
            s.set_stone_color(pt, color).unwrap();
            assert_eq!(s.shadow_visible(pt).unwrap(), color.is_placed());
            assert_eq!(s.stone_color(pt).unwrap(), color);
        }
    }

    #[test]
    fn add_mark_replaces_previous_mark() {
        let mut s = surface(Theme::default(), Rotation::None);
        let pt = Point::new(1, 1);
        s.add_mark_pt(pt, Mark::Triangle, None).unwrap();
        s.add_mark_pt(pt, Mark::Label, Some("A")).unwrap();
        assert_eq!(s.mark_handles(pt).unwrap().len(), 1);
        assert_eq!(s.mark_at(pt).unwrap(), Some(Mark::Label));
        assert_eq!(s.mark_count(), 1);
    }

    #[test]
    fn label_marks_need_text() {
        let mut s = surface(Theme::default(), Rotation::None);
        assert_eq!(
            s.add_mark_pt(Point::new(0, 0), Mark::VariationMarker, None),
            Err(Error::MissingLabel("variation_marker".into()))
        );
        assert_eq!(
            s.add_mark_pt(Point::new(0, 0), Mark::Circle, Some("1")),
            Err(Error::UnexpectedLabel("circle".into()))
        );
        assert_eq!(s.mark_count(), 0);
    }

    #[test]
    fn clear_marks_removes_everything() {
        let mut s = surface(Theme::default(), Rotation::None);
        for pt in all_points(9).step_by(7) {
            s.add_mark_pt(pt, Mark::Circle, None).unwrap();
        }
        assert!(s.mark_count() > 0);
        s.clear_marks();
        assert_eq!(s.mark_count(), 0);
        assert!(all_points(9).all(|p| s.mark_at(p).unwrap().is_none()));
        let container = s.tree().by_id("s_marks").unwrap();
        assert!(s.tree().children(container).is_empty());
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut s = surface(Theme::default(), Rotation::None);
        let err = s.set_stone_color(Point::new(9, 0), StoneColor::Black).unwrap_err();
        assert_eq!(err, Error::PointOutOfRange { point: Point::new(9, 0), size: 9 });
        assert!(s.add_mark_pt(Point::new(0, 12), Mark::Square, None).is_err());
    }

    #[test]
    fn rotation_moves_the_drawn_stone() {
        let mut s = surface(Theme::default(), Rotation::Clockwise90);
        let pt = Point::new(0, 0);
        s.set_stone_color(pt, StoneColor::Black).unwrap();
        let drawn = s.tree().by_id("s_stone_8_0").unwrap();
        assert_eq!(s.stone_handle(pt).unwrap(), drawn);
        assert_eq!(s.tree().attr(drawn, "opacity"), Some("1"));

        let button = s.button(pt).unwrap();
        assert_eq!(s.point_for_button(button), Some(pt));
    }

    #[test]
    fn no_shadow_layer_means_no_shadows() {
        let mut s = surface(Theme::textbook(), Rotation::None);
        s.set_stone_color(Point::new(2, 2), StoneColor::Black).unwrap();
        assert!(!s.has_shadows());
        assert!(!s.shadow_visible(Point::new(2, 2)).unwrap());
    }

    #[test]
    fn mark_colour_contrasts_with_stone() {
        let mut s = surface(Theme::default(), Rotation::None);
        let pt = Point::new(4, 4);
        s.set_stone_color(pt, StoneColor::Black).unwrap();
        s.add_mark_pt(pt, Mark::Circle, None).unwrap();
        let g = s.mark_handles(pt).unwrap()[0];
        let circle = s.tree().children(g)[0];
        assert_eq!(s.tree().attr(circle, "stroke"), Some("#ffffff"));
    }
}
