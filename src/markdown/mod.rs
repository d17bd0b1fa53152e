//! HTML → Markdown conversion for extracted article fragments.
//!
//! Headings, lists and blockquotes take their level, type, depth and quote
//! flag from a [`StructureMap`]; everything else is rendered from the tag.

pub mod postprocess;
mod rules;

use kuchiki::NodeRef;

use crate::normalize::parse_document;
use crate::structure::StructureMap;

pub use postprocess::postprocess;

/// Converts an article fragment. The structure map is re-derived from the
/// fragment's `data-*` annotations, falling back to tag names.
pub fn convert(html: &str) -> String {
    let document = parse_document(html);
    let map = StructureMap::build(&document);
    render(&document, &map)
}

/// Renders `root` using annotations from `map`. Neither argument is
/// modified, so rendering the same pair twice yields the same text.
pub fn render(root: &NodeRef, map: &StructureMap) -> String {
    let mut renderer = rules::Renderer::new(map);
    let mut markdown = renderer.node(root);
    if let Some(references) = renderer.reference_block() {
        markdown.push_str("\n\n");
        markdown.push_str(&references);
    }
    postprocess(&markdown)
}
