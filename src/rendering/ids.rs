//! Element id scheme, scoped by the host container id so several boards can
//! share one document without collisions.

use crate::point::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGen {
    prefix: String,
}

impl IdGen {
    pub fn new(container_id: &str) -> Self {
        Self { prefix: container_id.to_string() }
    }

    fn scoped(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }

    fn at(&self, name: &str, pt: Point) -> String {
        format!("{}_{}_{}_{}", self.prefix, name, pt.x, pt.y)
    }

    pub fn svg(&self) -> String {
        self.scoped("svgboard")
    }

    pub fn board(&self) -> String {
        self.scoped("board")
    }

    pub fn blur_filter(&self) -> String {
        self.scoped("svg_blur")
    }

    pub fn intersections(&self) -> String {
        self.scoped("intersections")
    }

    pub fn coord_labels(&self) -> String {
        self.scoped("coord_labels")
    }

    pub fn lines(&self) -> String {
        self.scoped("lines")
    }

    pub fn star_points(&self) -> String {
        self.scoped("starpoints")
    }

    pub fn shadow_group(&self) -> String {
        self.scoped("stone_shadows")
    }

    pub fn stone_group(&self) -> String {
        self.scoped("stones")
    }

    pub fn mark_container(&self) -> String {
        self.scoped("marks")
    }

    pub fn button_group(&self) -> String {
        self.scoped("buttons")
    }

    pub fn stone(&self, pt: Point) -> String {
        self.at("stone", pt)
    }

    pub fn shadow(&self, pt: Point) -> String {
        self.at("stone_shadow", pt)
    }

    pub fn mark(&self, pt: Point) -> String {
        self.at("mark", pt)
    }

    pub fn button(&self, pt: Point) -> String {
        self.at("button", pt)
    }
}
