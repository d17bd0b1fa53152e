use kuchiki::{NodeData, NodeRef};
use regex::Regex;
use std::sync::LazyLock;

use crate::normalize::{attribute, element_name, select_nodes};
use crate::structure::{ListKind, StructureAnnotation, StructureMap};

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static MARKDOWN_SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([\\*_`\[\]])").unwrap());

/// Text that would open a heading, quote, list, setext underline or fence
/// when it lands at the start of a line.
static LINE_START_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6} |>|-|\+ |=+|~~~)").unwrap());

static ORDERED_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\. ").unwrap());

/// Elements rendered as a block separated from its neighbours by a blank line.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "body", "dd", "details", "dialog", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "header", "hgroup", "li", "main", "nav",
    "section", "summary",
];

const SKIPPED_ELEMENTS: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "noscript", "template", "button", "input",
    "select", "textarea",
];

/// Walks a tree and renders Markdown. Link targets are collected as
/// numbered references and appended by the caller.
pub(crate) struct Renderer<'a> {
    map: &'a StructureMap,
    references: Vec<(String, Option<String>)>,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(map: &'a StructureMap) -> Self {
        Self {
            map,
            references: Vec::new(),
        }
    }

    pub(crate) fn reference_block(&self) -> Option<String> {
        if self.references.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .references
            .iter()
            .enumerate()
            .map(|(i, (href, title))| match title {
                Some(title) => format!("[{}]: {} \"{}\"", i + 1, href, title.replace('"', "\\\"")),
                None => format!("[{}]: {}", i + 1, href),
            })
            .collect();
        Some(lines.join("\n"))
    }

    pub(crate) fn node(&mut self, node: &NodeRef) -> String {
        match node.data() {
            NodeData::Text(text) => escape_text(&text.borrow()),
            NodeData::Document(_) | NodeData::DocumentFragment => self.children(node),
            NodeData::Element(_) => self.element(node),
            _ => String::new(),
        }
    }

    fn children(&mut self, node: &NodeRef) -> String {
        node.children().map(|child| self.node(&child)).collect()
    }

    fn element(&mut self, node: &NodeRef) -> String {
        let name = element_name(node).unwrap_or_default();
        match name.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => self.heading(node),
            "ul" | "ol" => self.list(node),
            "blockquote" => self.blockquote(node),
            "p" => {
                let content = self.children(node);
                block(&trim_line_starts(&content))
            }
            "br" => "  \n".to_string(),
            "hr" => block("---"),
            "pre" => code_block(node),
            "code" => inline_code(node),
            "strong" | "b" => wrap_inline(self.children(node), "**"),
            "em" | "i" => wrap_inline(self.children(node), "_"),
            "a" => self.link(node),
            "img" => image(node),
            "table" => self.table(node),
            n if SKIPPED_ELEMENTS.contains(&n) => String::new(),
            n if BLOCK_ELEMENTS.contains(&n) => {
                let content = self.children(node);
                block(&content)
            }
            _ => self.children(node),
        }
    }

    fn heading(&mut self, node: &NodeRef) -> String {
        let level = match self.map.resolve(node) {
            Some(StructureAnnotation::Heading { level }) => level,
            _ => 1,
        };
        let content = self.children(node);
        let content = WHITESPACE_RUN.replace_all(content.trim(), " ");
        if content.is_empty() {
            return String::new();
        }
        format!("\n\n{} {}\n\n", "#".repeat(level as usize), content)
    }

    fn list(&mut self, node: &NodeRef) -> String {
        let (kind, nesting_level) = match self.map.resolve(node) {
            Some(StructureAnnotation::List {
                kind,
                nesting_level,
            }) => (kind, nesting_level),
            _ => (ListKind::Unordered, 0),
        };
        let prefix = format!(
            "{}{}",
            "  ".repeat(nesting_level),
            match kind {
                ListKind::Ordered => "1. ",
                ListKind::Unordered => "- ",
            }
        );

        let mut lines = Vec::new();
        for child in node.children() {
            if is_list(&child) {
                // stray nested list directly under ul/ol
                push_nested(&mut lines, &self.list(&child));
            } else if element_name(&child).is_some() {
                self.list_item(&child, &prefix, &mut lines);
            } else {
                let loose = self.node(&child);
                prefix_lines(&mut lines, &loose, &prefix);
            }
        }

        if lines.is_empty() {
            return String::new();
        }
        // not `block`: the first line's indentation is significant
        format!("\n\n{}\n\n", lines.join("\n"))
    }

    fn list_item(&mut self, item: &NodeRef, prefix: &str, lines: &mut Vec<String>) {
        let mut content = String::new();
        let mut nested = Vec::new();
        for child in item.children() {
            if is_list(&child) {
                nested.push(self.list(&child));
            } else {
                content.push_str(&self.node(&child));
            }
        }
        prefix_lines(lines, &content, prefix);
        for list in nested {
            push_nested(lines, &list);
        }
    }

    fn blockquote(&mut self, node: &NodeRef) -> String {
        let is_quote = matches!(
            self.map.resolve(node),
            Some(StructureAnnotation::Blockquote { is_quote: true })
        );
        let content = self.children(node);
        let content = content.trim();
        if !is_quote {
            return block(content);
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| {
                if line.trim().is_empty() {
                    String::new()
                } else {
                    format!("> {line}")
                }
            })
            .collect();
        block(&quoted.join("\n"))
    }

    fn link(&mut self, node: &NodeRef) -> String {
        let text = self.children(node);
        let Some(href) = attribute(node, "href").filter(|h| !h.trim().is_empty()) else {
            return text;
        };
        if text.trim().is_empty() {
            return text;
        }
        let title = attribute(node, "title").filter(|t| !t.trim().is_empty());
        let target = (href.trim().to_string(), title);
        let index = match self.references.iter().position(|r| *r == target) {
            Some(i) => i + 1,
            None => {
                self.references.push(target);
                self.references.len()
            }
        };
        let leading = &text[..text.len() - text.trim_start().len()];
        let trailing = &text[text.trim_end().len()..];
        format!("{leading}[{}][{index}]{trailing}", text.trim())
    }

    fn table(&mut self, node: &NodeRef) -> String {
        let mut rows: Vec<Vec<String>> = Vec::new();
        for row in select_nodes(node, "tr") {
            let cells: Vec<String> = row
                .children()
                .filter(|c| matches!(element_name(c).as_deref(), Some("td" | "th")))
                .map(|cell| {
                    let content = self.children(&cell);
                    WHITESPACE_RUN
                        .replace_all(content.trim(), " ")
                        .replace('|', "\\|")
                })
                .collect();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        if rows.is_empty() {
            let content = self.children(node);
            return block(&content);
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let render_row = |cells: &[String]| {
            let mut padded: Vec<&str> = cells.iter().map(String::as_str).collect();
            padded.resize(width, "");
            format!("| {} |", padded.join(" | "))
        };

        let mut lines = vec![render_row(&rows[0])];
        lines.push(format!("|{}", " --- |".repeat(width)));
        lines.extend(rows[1..].iter().map(|r| render_row(r)));
        block(&lines.join("\n"))
    }
}

fn is_list(node: &NodeRef) -> bool {
    matches!(element_name(node).as_deref(), Some("ul" | "ol"))
}

/// Non-blank lines get the list prefix; blank lines pass through.
fn prefix_lines(lines: &mut Vec<String>, content: &str, prefix: &str) {
    for line in content.trim().lines() {
        if line.trim().is_empty() {
            lines.push(line.to_string());
        } else {
            lines.push(format!("{prefix}{}", line.trim()));
        }
    }
}

/// Nested lists carry their own absolute indentation.
fn push_nested(lines: &mut Vec<String>, rendered: &str) {
    lines.extend(
        rendered
            .trim_matches('\n')
            .lines()
            .map(str::to_string),
    );
}

fn block(content: &str) -> String {
    let content = content.trim_matches(|c: char| c == '\n' || c == ' ');
    if content.is_empty() {
        return String::new();
    }
    format!("\n\n{content}\n\n")
}

fn trim_line_starts(content: &str) -> String {
    content
        .trim()
        .lines()
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join("\n")
}

/// A text node may open a line (after a `br` or at the start of a block),
/// so block markers at its start are escaped as well.
fn escape_text(text: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    let escaped = MARKDOWN_SPECIAL.replace_all(&collapsed, r"\$1");
    let body = escaped.trim_start();
    let lead = &escaped[..escaped.len() - body.len()];
    let body = LINE_START_MARKER.replace(body, r"\$1");
    let body = ORDERED_MARKER.replace(&body, r"${1}\. ");
    format!("{lead}{body}")
}

fn wrap_inline(content: String, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content;
    }
    let leading = &content[..content.len() - content.trim_start().len()];
    let trailing = &content[content.trim_end().len()..];
    format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}

fn inline_code(node: &NodeRef) -> String {
    let code = node.text_contents().replace('\n', " ");
    if code.is_empty() {
        return String::new();
    }
    let fence = "`".repeat(longest_backtick_run(&code) + 1);
    let pad = if code.starts_with('`') || code.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{code}{pad}{fence}")
}

fn longest_backtick_run(code: &str) -> usize {
    code.split(|c: char| c != '`').map(str::len).max().unwrap_or(0)
}

fn code_block(node: &NodeRef) -> String {
    let code = node.text_contents();
    let code = code.strip_suffix('\n').unwrap_or(&code);
    if code.trim().is_empty() {
        return String::new();
    }
    let language = code_language(node).unwrap_or_default();
    let fence = "`".repeat(longest_backtick_run(code).max(2) + 1);
    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}

/// `language-*` / `lang-*` class on the `pre` or its first `code` child.
fn code_language(pre: &NodeRef) -> Option<String> {
    let from_class = |node: &NodeRef| {
        attribute(node, "class").and_then(|class| {
            class.split_whitespace().find_map(|token| {
                token
                    .strip_prefix("language-")
                    .or_else(|| token.strip_prefix("lang-"))
                    .map(str::to_string)
            })
        })
    };
    from_class(pre).or_else(|| {
        select_nodes(pre, "code")
            .first()
            .and_then(|code| from_class(code))
    })
}

fn image(node: &NodeRef) -> String {
    let Some(src) = attribute(node, "src").filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };
    let alt = attribute(node, "alt").unwrap_or_default();
    match attribute(node, "title").filter(|t| !t.trim().is_empty()) {
        Some(title) => format!("![{}]({} \"{}\")", alt.trim(), src.trim(), title.replace('"', "\\\"")),
        None => format!("![{}]({})", alt.trim(), src.trim()),
    }
}
