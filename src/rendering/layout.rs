//! Board geometry: where each intersection lands inside the host container

use crate::point::{all_points, Point};

/// Axis-aligned box in host pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// A box with no drawable area
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Largest square centred inside this box
    pub fn centered_square(&self) -> BoundingBox {
        let side = self.width.min(self.height);
        BoundingBox {
            left: self.left + (self.width - side) / 2.0,
            top: self.top + (self.height - side) / 2.0,
            width: side,
            height: side,
        }
    }
}

/// Pixel position of an intersection centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

/// Text drawn around the board edge
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub at: Coord,
    pub text: String,
}

/// Intersection coordinates for a square board.
///
/// Without coordinate labels the board is `size` cells wide and the outer
/// lines sit half a cell in from the edge. With labels one extra cell is
/// reserved on every side for the letters and numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardPoints {
    size: u32,
    board_box: BoundingBox,
    spacing: f64,
    origin: Coord,
    draw_coords: bool,
}

const COLUMN_LETTERS: &str = "ABCDEFGHJKLMNOPQRSTUVWXYZ";

impl BoardPoints {
    pub fn new(container: BoundingBox, size: u32, draw_coords: bool) -> Self {
        let board_box = container.centered_square();
        let cells = size as f64 + if draw_coords { 2.0 } else { 0.0 };
        let spacing = board_box.width / cells;
        let inset = if draw_coords { 1.5 } else { 0.5 } * spacing;
        BoardPoints {
            size,
            board_box,
            spacing,
            origin: Coord { x: board_box.left + inset, y: board_box.top + inset },
            draw_coords,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Distance between adjacent intersections
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Square area covered by the board background
    pub fn board_box(&self) -> BoundingBox {
        self.board_box
    }

    pub fn coord(&self, pt: Point) -> Coord {
        Coord {
            x: self.origin.x + pt.x as f64 * self.spacing,
            y: self.origin.y + pt.y as f64 * self.spacing,
        }
    }

    pub fn points(&self) -> impl Iterator<Item = (Point, Coord)> + '_ {
        all_points(self.size).map(move |pt| (pt, self.coord(pt)))
    }

    /// Horizontal and vertical grid lines as `(start, end)` pairs
    pub fn lines(&self) -> Vec<(Coord, Coord)> {
        let last = self.size.saturating_sub(1);
        let mut out = Vec::with_capacity(self.size as usize * 2);
        for i in 0..self.size {
            out.push((self.coord(Point::new(0, i)), self.coord(Point::new(last, i))));
        }
        for i in 0..self.size {
            out.push((self.coord(Point::new(i, 0)), self.coord(Point::new(i, last))));
        }
        out
    }

    /// Traditional hoshi positions for the common board sizes
    pub fn star_points(&self) -> Vec<Point> {
        let (lines, full): (Vec<u32>, bool) = match self.size {
            19 => (vec![3, 9, 15], true),
            13 => (vec![3, 6, 9], false),
            9 => (vec![2, 4, 6], false),
            _ => (Vec::new(), false),
        };
        let mut out = Vec::new();
        for (i, &y) in lines.iter().enumerate() {
            for (j, &x) in lines.iter().enumerate() {
                let corner_or_centre = (i != 1 && j != 1) || (i == 1 && j == 1);
                if full || corner_or_centre {
                    out.push(Point::new(x, y));
                }
            }
        }
        out
    }

    /// Column letters along top and bottom, row numbers along both sides
    pub fn edge_labels(&self) -> Vec<EdgeLabel> {
        if !self.draw_coords {
            return Vec::new();
        }
        let mut out = Vec::new();
        let top = self.origin.y - self.spacing;
        let bottom = self.origin.y + self.size as f64 * self.spacing;
        let left = self.origin.x - self.spacing;
        let right = self.origin.x + self.size as f64 * self.spacing;
        for i in 0..self.size {
            let c = self.coord(Point::new(i, i));
            let letter = column_label(i);
            out.push(EdgeLabel { at: Coord { x: c.x, y: top }, text: letter.clone() });
            out.push(EdgeLabel { at: Coord { x: c.x, y: bottom }, text: letter });
            let row = (self.size - i).to_string();
            out.push(EdgeLabel { at: Coord { x: left, y: c.y }, text: row.clone() });
            out.push(EdgeLabel { at: Coord { x: right, y: c.y }, text: row });
        }
        out
    }
}

/// Go column letter; `I` is skipped by convention
pub fn column_label(x: u32) -> String {
    COLUMN_LETTERS
        .chars()
        .nth(x as usize)
        .map(|c| c.to_string())
        .unwrap_or_else(|| (x + 1).to_string())
}
