//! Path template compiler.
//!
//! # Template grammar
//! ```text
//! template    := item*
//! item        := literal | placeholder | optional
//! placeholder := '<' word+ '>'
//! optional    := '[' item* ']'
//! ```
//! A `<` that does not start a well-formed placeholder is a literal.
//!
//! # Capture order
//! Every placeholder and every optional group becomes one capturing group
//! in the match expression. `capture_order[i]` names capture group `i + 1`;
//! `None` marks an optional group, which carries no value of its own.
//! Requirement fragments are rewritten so that they never open a capturing
//! group themselves.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{RouteError, RouteResult};
use crate::routing::placeholder::PlaceholderTable;

/// Parsed template item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    Placeholder(String),
    Optional(Vec<Node>),
}

/// Parse a raw template into its item tree.
pub fn parse_template(template: &str) -> RouteResult<Vec<Node>> {
    // Each frame holds the items of one nesting level and where it opened.
    let mut stack: Vec<(usize, Vec<Node>)> = vec![(0, Vec::new())];
    let mut seen = HashSet::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '[' => {
                flush_literal(&mut literal, &mut stack);
                stack.push((pos, Vec::new()));
            }
            ']' => {
                flush_literal(&mut literal, &mut stack);
                if stack.len() == 1 {
                    return Err(RouteError::UnexpectedGroupClose {
                        template: template.to_string(),
                        position: pos,
                    });
                }
                if let Some((_, items)) = stack.pop() {
                    current(&mut stack).push(Node::Optional(items));
                }
            }
            '<' => match placeholder_name(&template[pos + 1..]) {
                Some(name) => {
                    flush_literal(&mut literal, &mut stack);
                    if !seen.insert(name.to_string()) {
                        return Err(RouteError::DuplicatePlaceholder {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                    // Skip the name and the closing '>'.
                    for _ in 0..=name.chars().count() {
                        chars.next();
                    }
                    current(&mut stack).push(Node::Placeholder(name.to_string()));
                }
                None => literal.push(c),
            },
            _ => literal.push(c),
        }
    }
    flush_literal(&mut literal, &mut stack);

    if stack.len() > 1 {
        let position = stack.last().map(|(pos, _)| *pos).unwrap_or_default();
        return Err(RouteError::UnclosedGroup {
            template: template.to_string(),
            position,
        });
    }

    Ok(stack.pop().map(|(_, items)| items).unwrap_or_default())
}

fn current(stack: &mut [(usize, Vec<Node>)]) -> &mut Vec<Node> {
    // The root frame is never popped, so the stack is never empty here.
    let last = stack.len() - 1;
    &mut stack[last].1
}

fn flush_literal(literal: &mut String, stack: &mut [(usize, Vec<Node>)]) {
    if !literal.is_empty() {
        current(stack).push(Node::Literal(std::mem::take(literal)));
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Name of the placeholder starting right after a `<`, if well formed.
fn placeholder_name(rest: &str) -> Option<&str> {
    let end = rest.find(|c: char| !is_word(c))?;
    if end == 0 || !rest[end..].starts_with('>') {
        return None;
    }
    Some(&rest[..end])
}

/// Rewrite every capturing group in a regex fragment to `(?:`.
///
/// Escapes and character classes are copied untouched. Named groups
/// (`(?P<x>` and `(?<x>`) lose their name and become non-capturing.
pub fn non_capturing(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len() + 8);
    let mut chars = fragment.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
                // A leading ']' (optionally after '^') is a literal member.
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            '(' if !in_class => {
                if chars.peek() != Some(&'?') {
                    out.push_str("(?:");
                    continue;
                }
                let lookahead: String = chars.clone().take(3).collect();
                let named = lookahead.starts_with("?P<")
                    || (lookahead.starts_with("?<") && !lookahead.starts_with("?<=") && !lookahead.starts_with("?<!"));
                if named {
                    // Drop everything up to and including the name's '>'.
                    for skipped in chars.by_ref() {
                        if skipped == '>' {
                            break;
                        }
                    }
                    out.push_str("(?:");
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// A template compiled to an anchored expression plus its capture order.
///
/// Built once per route and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    template: String,
    nodes: Vec<Node>,
    regex: Regex,
    capture_order: Vec<Option<String>>,
    required: Vec<String>,
}

impl CompiledPattern {
    /// Compile `template` using the requirements and defaults in `placeholders`.
    pub fn compile(template: &str, placeholders: &PlaceholderTable) -> RouteResult<Self> {
        let nodes = parse_template(template)?;

        let mut body = String::new();
        let mut capture_order = Vec::new();
        emit(&nodes, placeholders, &mut body, &mut capture_order)?;

        let expression = format!("^{}$", body);
        let regex = Regex::new(&expression).map_err(|source| RouteError::Pattern {
            template: template.to_string(),
            source,
        })?;
        if regex.captures_len() != capture_order.len() + 1 {
            return Err(RouteError::CaptureMismatch {
                template: template.to_string(),
                groups: regex.captures_len() - 1,
                entries: capture_order.len(),
            });
        }

        let required = nodes
            .iter()
            .filter_map(|node| match node {
                Node::Placeholder(name) => Some(name.clone()),
                _ => None,
            })
            .collect();

        tracing::trace!(template, expression = %regex.as_str(), "Compiled route template");

        Ok(Self {
            template: template.to_string(),
            nodes,
            regex,
            capture_order,
            required,
        })
    }

    /// The raw template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parsed template items.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The anchored match expression.
    pub fn expression(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Entry `i` names capture group `i + 1`; `None` is an optional group.
    pub fn capture_order(&self) -> &[Option<String>] {
        &self.capture_order
    }

    /// Placeholders that sit outside every optional group.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// All placeholder names in template order.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.capture_order.iter().filter_map(|name| name.as_deref())
    }
}

fn emit(
    nodes: &[Node],
    placeholders: &PlaceholderTable,
    out: &mut String,
    order: &mut Vec<Option<String>>,
) -> RouteResult<()> {
    for node in nodes {
        match node {
            Node::Literal(text) => out.push_str(&regex::escape(text)),
            Node::Placeholder(name) => {
                let placeholder = placeholders.get(name);
                let requirement = non_capturing(&placeholder.requirement);
                Regex::new(&requirement).map_err(|source| RouteError::InvalidRequirement {
                    name: name.clone(),
                    source,
                })?;

                order.push(Some(name.clone()));
                out.push('(');
                out.push_str(&requirement);
                out.push(')');
                if placeholder.has_default() {
                    out.push('?');
                }
            }
            Node::Optional(children) => {
                order.push(None);
                out.push('(');
                emit(children, placeholders, out, order)?;
                out.push_str(")?");
            }
        }
    }
    Ok(())
}
