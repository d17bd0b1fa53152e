//! Structural annotations (heading level, list type and depth, quote flag)
//! computed once per document and consumed read-only by the Markdown
//! converter.
//!
//! Readability extraction hands back a serialized copy of the chosen subtree,
//! so annotations cross that boundary as `data-*` attributes ([`StructureMap::stamp`]).
//! On the far side [`StructureMap::build`] reads them back with the same rule
//! that produced them, inferring from tag names wherever they are missing.

use std::collections::HashMap;

use kuchiki::NodeRef;

use crate::normalize::attribute;

pub const HEADING_LEVEL_ATTR: &str = "data-heading-level";
pub const LIST_TYPE_ATTR: &str = "data-list-type";
pub const NESTING_LEVEL_ATTR: &str = "data-nesting-level";
pub const IS_QUOTE_ATTR: &str = "data-is-quote";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Unordered => "unordered",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ordered" | "ol" => Some(Self::Ordered),
            "unordered" | "ul" => Some(Self::Unordered),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureAnnotation {
    Heading { level: u8 },
    List { kind: ListKind, nesting_level: usize },
    Blockquote { is_quote: bool },
}

/// Child-index chain from the document root to a node. Stable for as long
/// as the tree is not mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn of(node: &NodeRef) -> Self {
        let mut indices = Vec::new();
        let mut current = node.clone();
        while let Some(parent) = current.parent() {
            indices.push(current.preceding_siblings().count());
            current = parent;
        }
        indices.reverse();
        Self(indices)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructureMap {
    entries: HashMap<NodePath, StructureAnnotation>,
}

impl StructureMap {
    /// Walks the tree under `root` once and annotates every heading, list
    /// and blockquote.
    pub fn build(root: &NodeRef) -> Self {
        let entries = root
            .inclusive_descendants()
            .filter_map(|node| annotate(&node).map(|a| (NodePath::of(&node), a)))
            .collect();
        Self { entries }
    }

    pub fn get(&self, node: &NodeRef) -> Option<StructureAnnotation> {
        self.entries.get(&NodePath::of(node)).copied()
    }

    /// The stored annotation, or the one inferred from the node itself when
    /// the map has none.
    pub fn resolve(&self, node: &NodeRef) -> Option<StructureAnnotation> {
        self.get(node).or_else(|| annotate(node))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes every annotation onto its node as `data-*` attributes so it
    /// survives serialization. `root` must be the tree the map was built from.
    pub fn stamp(&self, root: &NodeRef) {
        for node in root.inclusive_descendants() {
            let Some(annotation) = self.get(&node) else {
                continue;
            };
            let Some(element) = node.as_element() else {
                continue;
            };
            let mut attributes = element.attributes.borrow_mut();
            match annotation {
                StructureAnnotation::Heading { level } => {
                    attributes.insert(HEADING_LEVEL_ATTR, level.to_string());
                }
                StructureAnnotation::List {
                    kind,
                    nesting_level,
                } => {
                    attributes.insert(LIST_TYPE_ATTR, kind.as_str().to_string());
                    attributes.insert(NESTING_LEVEL_ATTR, nesting_level.to_string());
                }
                StructureAnnotation::Blockquote { is_quote } => {
                    attributes.insert(IS_QUOTE_ATTR, is_quote.to_string());
                }
            }
        }
    }
}

/// Builds the map for a freshly normalized document and stamps it.
pub fn tag(document: &NodeRef) -> StructureMap {
    let map = StructureMap::build(document);
    map.stamp(document);
    map
}

fn annotate(node: &NodeRef) -> Option<StructureAnnotation> {
    let name = node.as_element()?.name.local.to_string();
    match name.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = attribute(node, HEADING_LEVEL_ATTR)
                .and_then(|v| v.trim().parse::<u8>().ok())
                .filter(|l| (1..=6).contains(l))
                .unwrap_or_else(|| name.as_bytes()[1] - b'0');
            Some(StructureAnnotation::Heading { level })
        }
        "ul" | "ol" => {
            let kind = attribute(node, LIST_TYPE_ATTR)
                .and_then(|v| ListKind::parse(&v))
                .unwrap_or(if name == "ol" {
                    ListKind::Ordered
                } else {
                    ListKind::Unordered
                });
            let nesting_level = attribute(node, NESTING_LEVEL_ATTR)
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or_else(|| list_ancestors(node));
            Some(StructureAnnotation::List {
                kind,
                nesting_level,
            })
        }
        "blockquote" => {
            let is_quote = attribute(node, IS_QUOTE_ATTR)
                .map(|v| v.trim() != "false")
                .unwrap_or(true);
            Some(StructureAnnotation::Blockquote { is_quote })
        }
        _ => None,
    }
}

fn list_ancestors(node: &NodeRef) -> usize {
    node.ancestors()
        .filter(|a| {
            a.as_element()
                .is_some_and(|e| matches!(&*e.name.local, "ul" | "ol"))
        })
        .count()
}
