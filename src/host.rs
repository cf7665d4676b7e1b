//! Host environment surface.
//!
//! The display never touches a page directly. It asks a [`Host`] for the
//! geometry of its container, hands over the full tree once on draw, then
//! sends only the journalled [`Mutation`]s on every later flush. A browser
//! binding would map these onto DOM calls; [`MemoryHost`] keeps the result
//! as markup so tests and the CLI can inspect it.

use crate::error::{Error, Result};
use crate::rendering::{BoundingBox, Mutation, SvgTree};
use std::collections::HashMap;

pub trait Host {
    /// Bounding box of a container, or `None` if it does not exist
    fn container_bbox(&self, container: &str) -> Option<BoundingBox>;

    /// Replace the container's content with the whole tree
    fn attach(&mut self, container: &str, tree: &SvgTree) -> Result<()>;

    /// Apply incremental changes to a previously attached tree. `tree` is
    /// already in its post-mutation state.
    fn patch(&mut self, container: &str, tree: &SvgTree, mutations: &[Mutation]) -> Result<()>;

    /// Remove everything under the container
    fn empty(&mut self, container: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct Container {
    bbox: Option<BoundingBox>,
    content: Option<String>,
    patches: usize,
    last_patch: Vec<Mutation>,
}

/// In-memory host that stores each container's markup
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    containers: HashMap<String, Container>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor with a single container
    pub fn with_container(id: &str, width: f64, height: f64) -> Self {
        let mut host = Self::new();
        host.add_container(id, BoundingBox::from_size(width, height));
        host
    }

    pub fn add_container(&mut self, id: &str, bbox: BoundingBox) {
        self.containers.entry(id.to_string()).or_default().bbox = Some(bbox);
    }

    /// Resize an existing container; takes effect on the next draw
    pub fn set_bbox(&mut self, id: &str, bbox: BoundingBox) -> Result<()> {
        let c = self.container_mut(id)?;
        c.bbox = Some(bbox);
        Ok(())
    }

    /// Current markup of a container, `None` if it is empty
    pub fn content(&self, id: &str) -> Option<&str> {
        self.containers.get(id).and_then(|c| c.content.as_deref())
    }

    /// Number of incremental patches applied since the last attach
    pub fn patch_count(&self, id: &str) -> usize {
        self.containers.get(id).map(|c| c.patches).unwrap_or(0)
    }

    /// Mutations carried by the most recent patch
    pub fn last_patch(&self, id: &str) -> &[Mutation] {
        self.containers.get(id).map(|c| c.last_patch.as_slice()).unwrap_or(&[])
    }

    fn container_mut(&mut self, id: &str) -> Result<&mut Container> {
        self.containers
            .get_mut(id)
            .ok_or_else(|| Error::UnknownContainer(id.to_string()))
    }
}

impl Host for MemoryHost {
    fn container_bbox(&self, container: &str) -> Option<BoundingBox> {
        self.containers.get(container).and_then(|c| c.bbox)
    }

    fn attach(&mut self, container: &str, tree: &SvgTree) -> Result<()> {
        let c = self.container_mut(container)?;
        c.content = Some(tree.render());
        c.patches = 0;
        c.last_patch.clear();
        Ok(())
    }

    fn patch(&mut self, container: &str, tree: &SvgTree, mutations: &[Mutation]) -> Result<()> {
        let c = self.container_mut(container)?;
        if c.content.is_none() {
            return Err(Error::HostError(format!(
                "patch on container '{}' with nothing attached",
                container
            )));
        }
        c.content = Some(tree.render());
        c.patches += 1;
        c.last_patch = mutations.to_vec();
        Ok(())
    }

    fn empty(&mut self, container: &str) -> Result<()> {
        let c = self.container_mut(container)?;
        c.content = None;
        c.patches = 0;
        c.last_patch.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_host_tracks_content() {
        let mut host = MemoryHost::with_container("b", 100.0, 80.0);
        assert_eq!(host.container_bbox("b"), Some(BoundingBox::from_size(100.0, 80.0)));
        assert!(host.content("b").is_none());

        let tree = SvgTree::new([("id", "x".to_string())]);
        host.attach("b", &tree).unwrap();
        assert!(host.content("b").unwrap().starts_with("<svg"));

        host.patch("b", &tree, &[]).unwrap();
        assert_eq!(host.patch_count("b"), 1);

        host.empty("b").unwrap();
        assert!(host.content("b").is_none());
        assert_eq!(host.patch_count("b"), 0);
    }

    #[test]
    fn unknown_container_is_an_error() {
        let mut host = MemoryHost::new();
        let tree = SvgTree::new(Vec::<(&str, String)>::new());
        assert_eq!(host.attach("nope", &tree), Err(Error::UnknownContainer("nope".into())));
        assert!(host.container_bbox("nope").is_none());
    }

    #[test]
    fn patch_requires_attached_tree() {
        let mut host = MemoryHost::with_container("b", 10.0, 10.0);
        let tree = SvgTree::new(Vec::<(&str, String)>::new());
        assert!(matches!(host.patch("b", &tree, &[]), Err(Error::HostError(_))));
    }
}
