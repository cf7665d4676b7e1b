//! One-time construction of the board layers and the mark glyphs drawn on
//! top of them. Layer order, bottom to top: board base, coordinate labels,
//! lines, star points, shadows, stones, marks, hit-target buttons.

use super::ids::IdGen;
use super::layout::{BoardPoints, Coord};
use super::svg::{num, ElementKind, NodeId, SvgTree};
use crate::flattened::Mark;
use crate::intersections::StoneColor;
use crate::point::Point;
use crate::theme::Theme;
use std::fmt::Write as _;

/// Handles of the per-point layers, indexed by [`Point::index`]
#[derive(Debug, Clone)]
pub struct Layers {
    pub stones: Vec<NodeId>,
    pub shadows: Option<Vec<NodeId>>,
    pub mark_container: NodeId,
    pub buttons: Vec<NodeId>,
}

/// Paint every layer of the board under the tree root
pub fn paint_board(tree: &mut SvgTree, ids: &IdGen, points: &BoardPoints, theme: &Theme) -> Layers {
    let root = tree.root();
    board_base(tree, root, ids, points, theme);
    if theme.shadows.is_some() {
        blur_filter(tree, root, ids);
    }

    let grp = group(tree, root, ids.intersections());
    coord_labels(tree, grp, ids, points, theme);
    lines(tree, grp, ids, points, theme);
    star_points(tree, grp, ids, points, theme);
    let shadows = theme.shadows.as_ref().map(|_| shadows(tree, grp, ids, points, theme));
    let stones = stones(tree, grp, ids, points, theme);
    let mark_container = group(tree, grp, ids.mark_container());
    let buttons = buttons(tree, grp, ids, points);

    Layers { stones, shadows, mark_container, buttons }
}

fn group(tree: &mut SvgTree, parent: NodeId, id: String) -> NodeId {
    let g = tree.create_element(ElementKind::Group, [("id", id)]);
    tree.append(parent, g);
    g
}

fn board_base(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints, theme: &Theme) {
    let b = points.board_box();
    let rect = tree.create_element(
        ElementKind::Rect,
        [
            ("id", ids.board()),
            ("x", num(b.left)),
            ("y", num(b.top)),
            ("width", num(b.width)),
            ("height", num(b.height)),
            ("fill", theme.board.fill.clone()),
            ("stroke", theme.board.stroke.clone()),
            ("stroke-width", num(theme.board.stroke_width)),
        ],
    );
    tree.append(parent, rect);
}

fn blur_filter(tree: &mut SvgTree, parent: NodeId, ids: &IdGen) {
    let defs = tree.create_element(ElementKind::Defs, Vec::<(&str, String)>::new());
    let filter = tree.create_element(ElementKind::Filter, [("id", ids.blur_filter())]);
    let blur = tree.create_element(
        ElementKind::GaussianBlur,
        [("in", "SourceGraphic".to_string()), ("stdDeviation", "2".to_string())],
    );
    tree.append(parent, defs);
    tree.append(defs, filter);
    tree.append(filter, blur);
}

fn coord_labels(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints, theme: &Theme) {
    let labels = points.edge_labels();
    if labels.is_empty() {
        return;
    }
    let grp = group(tree, parent, ids.coord_labels());
    let font_size = num(points.spacing() * theme.coord_labels.size_fraction);
    for l in labels {
        let t = tree.create_element(
            ElementKind::Text,
            [
                ("x", num(l.at.x)),
                ("y", num(l.at.y)),
                ("fill", theme.coord_labels.fill.clone()),
                ("font-size", font_size.clone()),
                ("text-anchor", "middle".to_string()),
                ("dominant-baseline", "central".to_string()),
            ],
        );
        tree.set_text(t, l.text);
        tree.append(grp, t);
    }
}

fn lines(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints, theme: &Theme) {
    let mut d = String::new();
    for (a, b) in points.lines() {
        let _ = write!(d, "M{} {}L{} {}", num(a.x), num(a.y), num(b.x), num(b.y));
    }
    let path = tree.create_element(
        ElementKind::Path,
        [
            ("id", ids.lines()),
            ("d", d),
            ("stroke", theme.lines.stroke.clone()),
            ("stroke-width", num(theme.lines.stroke_width)),
            ("stroke-linecap", "square".to_string()),
        ],
    );
    tree.append(parent, path);
}

fn star_points(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints, theme: &Theme) {
    let grp = group(tree, parent, ids.star_points());
    let r = num(points.spacing() * theme.star_points.size_fraction);
    for pt in points.star_points() {
        let c = points.coord(pt);
        let dot = tree.create_element(
            ElementKind::Circle,
            [
                ("cx", num(c.x)),
                ("cy", num(c.y)),
                ("r", r.clone()),
                ("fill", theme.star_points.fill.clone()),
            ],
        );
        tree.append(grp, dot);
    }
}

/// Radius of a stone for the given geometry
pub fn stone_radius(points: &BoardPoints, theme: &Theme) -> f64 {
    points.spacing() * theme.stones.radius_fraction
}

/// Visual attributes of a stone of the given colour
pub fn stone_attrs(theme: &Theme, color: StoneColor) -> [(&'static str, String); 4] {
    let s = theme.stone(color);
    [
        ("fill", s.fill.clone()),
        ("stroke", s.stroke.clone()),
        ("stroke-width", num(s.stroke_width)),
        ("opacity", num(s.opacity)),
    ]
}

fn shadows(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints, theme: &Theme) -> Vec<NodeId> {
    let Some(style) = &theme.shadows else {
        return Vec::new();
    };
    let grp = group(tree, parent, ids.shadow_group());
    let r = stone_radius(points, theme);
    let offset = r * style.offset_fraction;
    points
        .points()
        .map(|(pt, c)| {
            let shadow = tree.create_element(
                ElementKind::Circle,
                [
                    ("id", ids.shadow(pt)),
                    ("cx", num(c.x + offset)),
                    ("cy", num(c.y + offset)),
                    ("r", num(r)),
                    ("fill", style.fill.clone()),
                    ("filter", format!("url(#{})", ids.blur_filter())),
                    ("opacity", "0".to_string()),
                ],
            );
            tree.append(grp, shadow);
            shadow
        })
        .collect()
}

fn stones(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints, theme: &Theme) -> Vec<NodeId> {
    let grp = group(tree, parent, ids.stone_group());
    let r = num(stone_radius(points, theme));
    points
        .points()
        .map(|(pt, c)| {
            let stone = tree.create_element(
                ElementKind::Circle,
                [("id", ids.stone(pt)), ("cx", num(c.x)), ("cy", num(c.y)), ("r", r.clone())],
            );
            for (k, v) in stone_attrs(theme, StoneColor::Empty) {
                tree.set_attr(stone, k, v);
            }
            tree.append(grp, stone);
            stone
        })
        .collect()
}

fn buttons(tree: &mut SvgTree, parent: NodeId, ids: &IdGen, points: &BoardPoints) -> Vec<NodeId> {
    let grp = group(tree, parent, ids.button_group());
    let s = points.spacing();
    points
        .points()
        .map(|(pt, c)| {
            let b = tree.create_element(
                ElementKind::Rect,
                [
                    ("id", ids.button(pt)),
                    ("x", num(c.x - s / 2.0)),
                    ("y", num(c.y - s / 2.0)),
                    ("width", num(s)),
                    ("height", num(s)),
                    ("fill", "#ffffff".to_string()),
                    ("opacity", "0".to_string()),
                    ("data-x", pt.x.to_string()),
                    ("data-y", pt.y.to_string()),
                ],
            );
            tree.append(grp, b);
            b
        })
        .collect()
}

/// What to draw for a single mark
#[derive(Debug, Clone, Copy)]
pub struct MarkGlyph<'a> {
    pub mark: Mark,
    pub label: Option<&'a str>,
    /// Stroke or text colour, already resolved against the stone underneath
    pub color: &'a str,
    /// Board colour used to hide the grid behind labels on empty points
    pub backing: Option<&'a str>,
}

/// Build the detached element group for a mark centred on `at`
pub fn mark_element(
    tree: &mut SvgTree,
    id: String,
    pt: Point,
    at: Coord,
    points: &BoardPoints,
    theme: &Theme,
    glyph: MarkGlyph<'_>,
) -> NodeId {
    let radius = stone_radius(points, theme);
    let s = radius * theme.marks.size_fraction;
    let h = s * 0.8;
    let (cx, cy) = (at.x, at.y);
    let stroke_width = num(theme.marks.stroke_width);
    let color = glyph.color.to_string();

    let g = tree.create_element(
        ElementKind::Group,
        [
            ("id", id),
            ("data-mark", glyph.mark.as_str().to_string()),
            ("data-x", pt.x.to_string()),
            ("data-y", pt.y.to_string()),
        ],
    );

    let outline = |d: String| -> Vec<(&'static str, String)> {
        vec![
            ("d", d),
            ("fill", "none".to_string()),
            ("stroke", color.clone()),
            ("stroke-width", stroke_width.clone()),
        ]
    };

    let children: Vec<NodeId> = match glyph.mark {
        Mark::Circle => vec![tree.create_element(
            ElementKind::Circle,
            [
                ("cx", num(cx)),
                ("cy", num(cy)),
                ("r", num(s)),
                ("fill", "none".to_string()),
                ("stroke", color.clone()),
                ("stroke-width", stroke_width.clone()),
            ],
        )],
        Mark::Square => vec![tree.create_element(
            ElementKind::Rect,
            [
                ("x", num(cx - h)),
                ("y", num(cy - h)),
                ("width", num(2.0 * h)),
                ("height", num(2.0 * h)),
                ("fill", "none".to_string()),
                ("stroke", color.clone()),
                ("stroke-width", stroke_width.clone()),
            ],
        )],
        Mark::Triangle => {
            let dx = s * 0.866;
            let d = format!(
                "M{} {}L{} {}L{} {}Z",
                num(cx),
                num(cy - s),
                num(cx + dx),
                num(cy + s / 2.0),
                num(cx - dx),
                num(cy + s / 2.0)
            );
            vec![tree.create_element(ElementKind::Path, outline(d))]
        }
        Mark::XMark => {
            let d = format!(
                "M{} {}L{} {}M{} {}L{} {}",
                num(cx - h),
                num(cy - h),
                num(cx + h),
                num(cy + h),
                num(cx + h),
                num(cy - h),
                num(cx - h),
                num(cy + h)
            );
            vec![tree.create_element(ElementKind::Path, outline(d))]
        }
        Mark::KoLocation => vec![tree.create_element(
            ElementKind::Rect,
            [
                ("x", num(cx - h)),
                ("y", num(cy - h)),
                ("width", num(2.0 * h)),
                ("height", num(2.0 * h)),
                ("fill", "none".to_string()),
                ("stroke", color.clone()),
                ("stroke-width", stroke_width.clone()),
                ("stroke-dasharray", "2,2".to_string()),
            ],
        )],
        Mark::StoneMarker | Mark::LastMove => vec![tree.create_element(
            ElementKind::Circle,
            [("cx", num(cx)), ("cy", num(cy)), ("r", num(s * 0.6)), ("fill", color.clone())],
        )],
        Mark::TerritoryBlack | Mark::TerritoryWhite => {
            let (fill, stroke) = if glyph.mark == Mark::TerritoryBlack {
                ("#000000", "none")
            } else {
                ("#ffffff", "#000000")
            };
            let t = h * 0.6;
            vec![tree.create_element(
                ElementKind::Rect,
                [
                    ("x", num(cx - t)),
                    ("y", num(cy - t)),
                    ("width", num(2.0 * t)),
                    ("height", num(2.0 * t)),
                    ("fill", fill.to_string()),
                    ("stroke", stroke.to_string()),
                ],
            )]
        }
        Mark::Label | Mark::VariationMarker | Mark::CorrectVariation => {
            let mut out = Vec::with_capacity(2);
            if let Some(board_fill) = glyph.backing {
                out.push(tree.create_element(
                    ElementKind::Circle,
                    [("cx", num(cx)), ("cy", num(cy)), ("r", num(radius)), ("fill", board_fill.to_string())],
                ));
            }
            let text = tree.create_element(
                ElementKind::Text,
                [
                    ("x", num(cx)),
                    ("y", num(cy)),
                    ("fill", color.clone()),
                    ("font-size", num(points.spacing() * theme.marks.label_size_fraction)),
                    ("font-family", theme.marks.font_family.clone()),
                    ("text-anchor", "middle".to_string()),
                    ("dominant-baseline", "central".to_string()),
                ],
            );
            tree.set_text(text, glyph.label.unwrap_or_default());
            out.push(text);
            out
        }
    };

    for c in children {
        tree.append(g, c);
    }
    g
}
