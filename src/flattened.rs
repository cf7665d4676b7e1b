//! Flattened board snapshots.
//!
//! A [`Flattened`] value is the immutable description of everything drawn on
//! the board at one instant: the stone at every intersection plus an optional
//! mark and text label. Snapshots are the only input the differ and the
//! display consume, so everything upstream (move trees, rules, SGF) stays out
//! of this crate. [`flatten`] is a small bridge from a [`Position`] for
//! callers that do not have their own snapshot builder.

use crate::error::{Error, Result};
use crate::point::{all_points, Point};
use crate::{MAX_INTERSECTIONS, MIN_INTERSECTIONS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stone occupying an intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoneState {
    #[default]
    Empty,
    Black,
    White,
}

impl StoneState {
    pub fn is_empty(&self) -> bool {
        matches!(self, StoneState::Empty)
    }
}

/// Annotation drawn on an intersection. Absence of a mark is `None` at the
/// use site, so there is no sentinel variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    Circle,
    Square,
    Triangle,
    #[serde(rename = "xmark")]
    XMark,
    StoneMarker,
    LastMove,
    KoLocation,
    TerritoryBlack,
    TerritoryWhite,
    Label,
    VariationMarker,
    CorrectVariation,
}

impl Mark {
    /// Marks that render a text label instead of a fixed glyph
    pub fn is_label(&self) -> bool {
        matches!(
            self,
            Mark::Label | Mark::VariationMarker | Mark::CorrectVariation
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::Circle => "circle",
            Mark::Square => "square",
            Mark::Triangle => "triangle",
            Mark::XMark => "xmark",
            Mark::StoneMarker => "stone_marker",
            Mark::LastMove => "last_move",
            Mark::KoLocation => "ko_location",
            Mark::TerritoryBlack => "territory_black",
            Mark::TerritoryWhite => "territory_white",
            Mark::Label => "label",
            Mark::VariationMarker => "variation_marker",
            Mark::CorrectVariation => "correct_variation",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of a single intersection.
///
/// A label is present exactly when the mark is label-bearing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Intersection {
    stone: StoneState,
    mark: Option<Mark>,
    label: Option<String>,
}

impl Intersection {
    pub fn new(stone: StoneState, mark: Option<Mark>, label: Option<String>) -> Result<Self> {
        match (mark, &label) {
            (Some(m), None) if m.is_label() => return Err(Error::MissingLabel(m.to_string())),
            (Some(m), Some(_)) if !m.is_label() => {
                return Err(Error::UnexpectedLabel(m.to_string()))
            }
            (None, Some(_)) => return Err(Error::UnexpectedLabel("none".into())),
            _ => {}
        }
        Ok(Self { stone, mark, label })
    }

    pub fn with_stone(stone: StoneState) -> Self {
        Self { stone, mark: None, label: None }
    }

    pub fn stone(&self) -> StoneState {
        self.stone
    }

    pub fn mark(&self) -> Option<Mark> {
        self.mark
    }

    pub fn text_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Same stone, no mark
    pub fn without_mark(&self) -> Self {
        Self::with_stone(self.stone)
    }
}

/// Immutable grid snapshot of a board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    size: u32,
    cells: Vec<Intersection>,
}

impl Flattened {
    /// An empty board of the given size
    pub fn empty(size: u32) -> Self {
        let side = size as usize;
        Self {
            size,
            cells: vec![Intersection::default(); side * side],
        }
    }

    pub fn builder(size: u32) -> FlattenedBuilder {
        FlattenedBuilder::new(size)
    }

    /// Number of intersections per side
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn get(&self, pt: Point) -> Option<&Intersection> {
        if pt.in_bounds(self.size) {
            self.cells.get(pt.index(self.size))
        } else {
            None
        }
    }

    /// Intersection at `pt`, or `PointOutOfRange`
    pub fn intersection(&self, pt: Point) -> Result<&Intersection> {
        self.get(pt).ok_or(Error::PointOutOfRange { point: pt, size: self.size })
    }

    pub fn stone(&self, pt: Point) -> Result<StoneState> {
        Ok(self.intersection(pt)?.stone())
    }

    pub fn mark(&self, pt: Point) -> Result<Option<Mark>> {
        Ok(self.intersection(pt)?.mark())
    }

    pub fn text_label(&self, pt: Point) -> Result<Option<&str>> {
        Ok(self.intersection(pt)?.text_label())
    }

    /// Every intersection in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Intersection)> + '_ {
        all_points(self.size).zip(self.cells.iter())
    }

    /// Points that carry a mark, with the mark and its label
    pub fn marks(&self) -> Vec<(Point, Mark, Option<&str>)> {
        self.iter()
            .filter_map(|(pt, i)| i.mark().map(|m| (pt, m, i.text_label())))
            .collect()
    }

    /// Copy of this snapshot with every mark removed
    pub fn without_marks(&self) -> Flattened {
        Flattened {
            size: self.size,
            cells: self.cells.iter().map(Intersection::without_mark).collect(),
        }
    }
}

/// Incremental builder for [`Flattened`]. Errors are collected and reported
/// by [`FlattenedBuilder::build`] so calls can be chained.
#[derive(Debug, Clone)]
pub struct FlattenedBuilder {
    board: Flattened,
    error: Option<Error>,
}

impl FlattenedBuilder {
    /// Start from an empty board. Sizes outside
    /// [`MIN_INTERSECTIONS`]..=[`MAX_INTERSECTIONS`] are reported by `build`.
    pub fn new(size: u32) -> Self {
        if !(MIN_INTERSECTIONS..=MAX_INTERSECTIONS).contains(&size) {
            return Self {
                board: Flattened::empty(0),
                error: Some(Error::ConfigError(format!(
                    "board size must be between {} and {}, got {}",
                    MIN_INTERSECTIONS, MAX_INTERSECTIONS, size
                ))),
            };
        }
        Self { board: Flattened::empty(size), error: None }
    }

    fn cell_mut(&mut self, pt: Point) -> Option<&mut Intersection> {
        let size = self.board.size;
        if !pt.in_bounds(size) {
            self.error.get_or_insert(Error::PointOutOfRange { point: pt, size });
            return None;
        }
        self.board.cells.get_mut(pt.index(size))
    }

    pub fn stone(mut self, pt: impl Into<Point>, stone: StoneState) -> Self {
        if let Some(cell) = self.cell_mut(pt.into()) {
            cell.stone = stone;
        }
        self
    }

    /// Set a glyph mark. Label-bearing marks must go through [`Self::label`].
    pub fn mark(self, pt: impl Into<Point>, mark: Mark) -> Self {
        self.set_mark(pt, mark, None)
    }

    pub fn label(self, pt: impl Into<Point>, mark: Mark, text: impl Into<String>) -> Self {
        self.set_mark(pt, mark, Some(text.into()))
    }

    pub fn set_mark(mut self, pt: impl Into<Point>, mark: Mark, label: Option<String>) -> Self {
        let pt = pt.into();
        let Some(stone) = self.cell_mut(pt).map(|c| c.stone) else {
            return self;
        };
        match Intersection::new(stone, Some(mark), label) {
            Ok(cell) => {
                if let Some(slot) = self.cell_mut(pt) {
                    *slot = cell;
                }
            }
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    pub fn has_mark(&self, pt: Point) -> bool {
        self.board.get(pt).and_then(|c| c.mark()).is_some()
    }

    pub fn build(self) -> Result<Flattened> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.board),
        }
    }
}

/// When next-move variations are labelled on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ShowVariations {
    Always,
    #[default]
    MoreThanOne,
    Never,
}

impl ShowVariations {
    fn applies(&self, next_moves: usize) -> bool {
        match self {
            ShowVariations::Always => next_moves > 0,
            ShowVariations::MoreThanOne => next_moves > 1,
            ShowVariations::Never => false,
        }
    }
}

/// Options that shape the generated marks in [`flatten`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlattenOptions {
    pub show_variations: ShowVariations,
    pub mark_last_move: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedStone {
    #[serde(flatten)]
    pub point: Point,
    pub color: StoneState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedMark {
    #[serde(flatten)]
    pub point: Point,
    pub kind: Mark,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A position as produced by a move tree: stones, explicit annotations and
/// the moves around the current node.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub size: u32,
    #[serde(default)]
    pub stones: Vec<PlacedStone>,
    #[serde(default)]
    pub marks: Vec<PlacedMark>,
    #[serde(default)]
    pub next_moves: Vec<PlacedStone>,
    #[serde(default)]
    pub correct_next: Vec<Point>,
    #[serde(default)]
    pub last_move: Option<PlacedStone>,
    #[serde(default)]
    pub ko: Option<Point>,
}

impl Position {
    pub fn from_json(data: &str) -> Result<Position> {
        serde_json::from_str(data).map_err(|e| Error::ConfigError(format!("bad position: {}", e)))
    }
}

/// Build a snapshot from a position.
///
/// Explicit marks always win; generated variation, last-move and ko marks
/// only fill points that are still unmarked.
pub fn flatten(position: &Position, options: FlattenOptions) -> Result<Flattened> {
    let mut b = Flattened::builder(position.size);
    for s in &position.stones {
        b = b.stone(s.point, s.color);
    }
    for m in &position.marks {
        b = b.set_mark(m.point, m.kind, m.label.clone());
    }

    if options.show_variations.applies(position.next_moves.len()) {
        for (i, mv) in position.next_moves.iter().enumerate() {
            if b.has_mark(mv.point) {
                continue;
            }
            let kind = if position.correct_next.contains(&mv.point) {
                Mark::CorrectVariation
            } else {
                Mark::VariationMarker
            };
            b = b.label(mv.point, kind, (i + 1).to_string());
        }
    }

    if options.mark_last_move {
        if let Some(last) = &position.last_move {
            if !b.has_mark(last.point) {
                b = b.mark(last.point, Mark::LastMove);
            }
        }
    }

    if let Some(ko) = position.ko {
        if !b.has_mark(ko) {
            b = b.mark(ko, Mark::KoLocation);
        }
    }

    b.build()
}
