//! Retained-mode SVG tree.
//!
//! Elements live in an arena and are addressed by [`NodeId`] handles that stay
//! valid until the element is removed. Every change to an element that is
//! reachable from the root is journalled as a [`Mutation`], so a host can
//! apply just the changes made since the last flush instead of reloading the
//! whole document.

use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

/// Handle to an element in an [`SvgTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Svg,
    Defs,
    Filter,
    GaussianBlur,
    Group,
    Rect,
    Circle,
    Line,
    Path,
    Text,
}

impl ElementKind {
    pub fn tag(&self) -> &'static str {
        match self {
            ElementKind::Svg => "svg",
            ElementKind::Defs => "defs",
            ElementKind::Filter => "filter",
            ElementKind::GaussianBlur => "feGaussianBlur",
            ElementKind::Group => "g",
            ElementKind::Rect => "rect",
            ElementKind::Circle => "circle",
            ElementKind::Line => "line",
            ElementKind::Path => "path",
            ElementKind::Text => "text",
        }
    }
}

/// A change to the attached part of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetAttr { node: NodeId, name: String, value: String },
    SetText { node: NodeId, text: String },
    Append { parent: NodeId, child: NodeId },
    Remove { node: NodeId },
}

impl Mutation {
    /// The element the mutation touches
    pub fn target(&self) -> NodeId {
        match self {
            Mutation::SetAttr { node, .. } => *node,
            Mutation::SetText { node, .. } => *node,
            Mutation::Append { child, .. } => *child,
            Mutation::Remove { node } => *node,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: ElementKind,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SvgTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    ids: HashMap<String, NodeId>,
    journal: Vec<Mutation>,
}

impl SvgTree {
    /// Create a tree whose root is an `<svg>` element with the given attributes
    pub fn new<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        let mut tree = SvgTree {
            nodes: Vec::new(),
            root: NodeId(0),
            ids: HashMap::new(),
            journal: Vec::new(),
        };
        let mut attrs: Vec<(String, String)> =
            attrs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        attrs.push(("xmlns".into(), "http://www.w3.org/2000/svg".into()));
        tree.root = tree.create_element(ElementKind::Svg, attrs);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element. It becomes visible once appended under
    /// an attached parent.
    pub fn create_element<I, K>(&mut self, kind: ElementKind, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, String)>,
        K: Into<String>,
    {
        let id = NodeId(self.nodes.len());
        let attrs: BTreeMap<String, String> =
            attrs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if let Some(dom_id) = attrs.get("id") {
            self.ids.insert(dom_id.clone(), id);
        }
        self.nodes.push(Some(Node { kind, attrs, text: None, children: Vec::new(), parent: None }));
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether the element is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == self.root {
                return true;
            }
            cur = self.node(c).and_then(|n| n.parent);
        }
        false
    }

    pub fn kind(&self, id: NodeId) -> Option<ElementKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attrs.get(name)).map(String::as_str)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|n| n.text.as_deref())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Look up an element by its `id` attribute
    pub fn by_id(&self, dom_id: &str) -> Option<NodeId> {
        self.ids.get(dom_id).copied()
    }

    /// Number of live elements, attached or not
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set an attribute. Writing the value it already has is a no-op and is
    /// not journalled.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let attached = self.is_attached(id);
        let Some(node) = self.node_mut(id) else {
            debug_assert!(false, "set_attr on removed node {:?}", id);
            return;
        };
        if node.attrs.get(name) == Some(&value) {
            return;
        }
        let previous = node.attrs.insert(name.to_string(), value.clone());
        if name == "id" {
            if let Some(old) = previous {
                self.ids.remove(&old);
            }
            self.ids.insert(value.clone(), id);
        }
        if attached {
            self.journal.push(Mutation::SetAttr { node: id, name: name.to_string(), value });
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        let text = text.into();
        let attached = self.is_attached(id);
        let Some(node) = self.node_mut(id) else {
            debug_assert!(false, "set_text on removed node {:?}", id);
            return;
        };
        if node.text.as_deref() == Some(text.as_str()) {
            return;
        }
        node.text = Some(text.clone());
        if attached {
            self.journal.push(Mutation::SetText { node: id, text });
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            debug_assert!(false, "append with invalid nodes {:?} <- {:?}", parent, child);
            return;
        }
        self.detach(child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
        if self.is_attached(parent) {
            self.journal.push(Mutation::Append { parent, child });
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).and_then(|n| n.parent) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
            if let Some(n) = self.node_mut(id) {
                n.parent = None;
            }
        }
    }

    /// Remove an element and its whole subtree. Handles into the subtree
    /// become invalid.
    pub fn remove(&mut self, id: NodeId) {
        if !self.contains(id) || id == self.root {
            return;
        }
        if self.is_attached(id) {
            self.journal.push(Mutation::Remove { node: id });
        }
        self.detach(id);
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(cur.0).and_then(Option::take) {
                if let Some(dom_id) = node.attrs.get("id") {
                    if self.ids.get(dom_id) == Some(&cur) {
                        self.ids.remove(dom_id);
                    }
                }
                stack.extend(node.children);
            }
        }
    }

    /// Remove every child of `id`
    pub fn empty_children(&mut self, id: NodeId) {
        let children = self.children(id).to_vec();
        for c in children {
            self.remove(c);
        }
    }

    /// Drain the mutations recorded since the last call
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.journal)
    }

    pub fn pending_mutations(&self) -> &[Mutation] {
        &self.journal
    }

    /// Serialize the attached tree to SVG markup. Attribute order is sorted
    /// so equal trees always produce identical bytes.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root, &mut out);
        out
    }

    /// Serialize the subtree rooted at `id`
    pub fn render_subtree(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.render_node(id, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        let tag = node.kind.tag();
        out.push('<');
        out.push_str(tag);
        for (k, v) in &node.attrs {
            let _ = write!(out, " {}=\"{}\"", k, escape(v));
        }
        if node.children.is_empty() && node.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(t) = &node.text {
            out.push_str(&escape(t));
        }
        for c in &node.children {
            self.render_node(*c, out);
        }
        let _ = write!(out, "</{}>", tag);
    }

    /// `data:` URI embedding the rendered document
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(self.render())
        )
    }

    /// Hex SHA-256 of the rendered document
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.render())
    }
}

/// Hex SHA-256 of a rendered document
pub fn fingerprint(markup: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(markup.as_bytes());
    hex::encode(hasher.finalize())
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Format a coordinate with at most two decimals and no trailing zeros
pub fn num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}
