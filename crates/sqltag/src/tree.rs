//! Arena-backed parse tree.
//!
//! Nodes live in a flat arena and refer to each other through [`NodeId`]
//! handles: children as ordered handle lists, parents as a single handle.
//! Slots of removed nodes are recycled, but each slot carries a generation
//! that is bumped on removal, so a stale handle is always detected instead
//! of silently aliasing a newer node.

use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::parser::{Element, Engine};
use crate::span::Span;
use crate::tag::TagKind;

/// Stable handle to a node of a [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Returns the arena slot of this handle. Slots are reused once their
    /// node is removed.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

/// Marker text of a tag node, as it appeared in the source (or the
/// canonical marker for nodes created by editing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagData {
    /// The tag kind.
    pub kind: &'static TagKind,
    /// Start marker text, e.g. `order by` or `(`.
    pub start_marker: String,
    /// Whitespace between a prefix keyword and its content.
    pub gap: String,
    /// End marker text; empty for prefix tags.
    pub end_marker: String,
}

impl TagData {
    fn new(kind: &'static TagKind) -> Self {
        let mut start_marker = String::new();
        let mut end_marker = String::new();
        kind.write_start(&mut start_marker);
        kind.write_end(&mut end_marker);
        Self {
            kind,
            start_marker,
            gap: String::new(),
            end_marker,
        }
    }

    /// Appends the start marker (and the gap after it) to `output`.
    pub fn write_start(&self, output: &mut String) {
        output.push_str(&self.start_marker);
        output.push_str(&self.gap);
    }

    /// Appends the end marker to `output`.
    pub fn write_end(&self, output: &mut String) {
        output.push_str(&self.end_marker);
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The synthetic container holding the top-level sequence.
    Root,
    /// A recognized tag.
    Tag(TagData),
    /// A literal text leaf.
    Text(String),
}

/// A node of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    span: Option<Span>,
}

impl Node {
    /// Returns the node payload.
    #[must_use]
    pub const fn data(&self) -> &NodeData {
        &self.data
    }

    /// Returns the parent handle; `None` for the root.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the child handles in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the location of this node in the parsed text.
    ///
    /// `None` for nodes created by editing, and for nodes whose content was
    /// edited since parsing.
    #[must_use]
    pub const fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns the tag kind, for tag nodes.
    #[must_use]
    pub const fn kind(&self) -> Option<&'static TagKind> {
        match &self.data {
            NodeData::Tag(tag) => Some(tag.kind),
            NodeData::Root | NodeData::Text(_) => None,
        }
    }

    fn is_whitespace_leaf(&self) -> bool {
        matches!(&self.data, NodeData::Text(text) if text.chars().all(char::is_whitespace))
    }
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An ordered tree of tag nodes and literal text leaves.
///
/// Tags nest at most [`MAX_DEPTH`](crate::MAX_DEPTH) deep; parsing and editing reject
/// anything deeper.
#[derive(Debug, Clone)]
pub struct ParseTree {
    slots: Vec<Slot>,
    vacant: Vec<usize>,
    root: NodeId,
}

impl ParseTree {
    pub(crate) fn from_elements(elements: Vec<Element>, span: Span) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        let root = tree.alloc(NodeData::Root, None, Some(span));
        tree.root = root;
        let children = tree.graft(root, elements, true);
        if let Ok(node) = tree.node_mut(root) {
            node.children = children;
        }
        tree
    }

    /// Returns the root handle.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the node behind `id`, or `None` if it was removed.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    /// Returns the node behind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the node was removed.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or_else(|| stale(id))
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    /// Returns true if the tree holds nothing but the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }

    /// Finds the top-level tag of the given kind.
    #[must_use]
    pub fn find_singleton(&self, kind: &TagKind) -> Option<NodeId> {
        self.top_level_tags()
            .find(|&id| self.get(id).and_then(Node::kind) == Some(kind))
    }

    /// Iterates over the tag nodes directly under the root.
    pub fn top_level_tags(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.get(self.root)
            .map(Node::children)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |&id| self.get(id).and_then(Node::kind).is_some())
    }

    /// Iterates over every node under `id` (excluded) in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `id` was removed.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id)?.children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.get(next) {
                stack.extend(node.children.iter().rev());
            }
        }
        Ok(out)
    }

    /// Reconstructs the content of a node, without its own markers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `id` was removed.
    pub fn text_of(&self, id: NodeId) -> Result<String> {
        let node = self.node(id)?;
        let mut output = String::new();
        match &node.data {
            NodeData::Text(text) => output.push_str(text),
            NodeData::Root | NodeData::Tag(_) => {
                for &child in &node.children {
                    self.write(child, &mut output);
                }
            }
        }
        Ok(output)
    }

    /// Appends the full text of a node, markers included, to `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `id` was removed.
    pub fn write_node(&self, id: NodeId, output: &mut String) -> Result<()> {
        self.node(id)?;
        self.write(id, output);
        Ok(())
    }

    /// Reconstructs the text of the whole tree.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        self.write(self.root, &mut output);
        output
    }

    /// Detaches a node from its parent. The node and its subtree are gone
    /// for good; their handles become invalid.
    ///
    /// When a tag is removed, the whitespace leaf separating it from its
    /// previous sibling (or from its next sibling, if it was first) goes with
    /// it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for the root or a removed node.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        let parent = node
            .parent
            .ok_or_else(|| Error::invalid_argument("the root node cannot be removed"))?;
        let is_tag = node.kind().is_some();

        let siblings = self.children_of(parent);
        let Some(index) = siblings.iter().position(|&child| child == id) else {
            return Err(stale(id));
        };

        let mut detached = vec![id];
        if is_tag {
            let separator = if index > 0 {
                Some(siblings[index - 1])
            } else {
                siblings.get(1).copied()
            };
            if let Some(separator) = separator
                .filter(|&sep| self.get(sep).is_some_and(Node::is_whitespace_leaf))
            {
                detached.push(separator);
            }
        }

        if let Ok(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|child| !detached.contains(child));
        }
        for id in detached {
            self.free(id);
        }
        self.invalidate_spans(parent);
        Ok(())
    }

    /// Replaces the content of a tag node with `text`, parsed with the given
    /// grammar. The node's own markers are kept.
    ///
    /// The text is parsed in the node's context: inside a parenthesis group,
    /// a clause body may not close that group. Parsing happens before the
    /// tree is touched, so on error the tree is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if `text` does not parse or nests
    /// past [`MAX_DEPTH`](crate::MAX_DEPTH), and [`Error::InvalidArgument`] if `id` is not a
    /// live tag node or `text` would end the tag early (a clause body holding
    /// a sibling clause, or a `)` closing the enclosing group).
    pub fn replace_contents<G: Grammar + ?Sized>(
        &mut self,
        id: NodeId,
        text: &str,
        grammar: &G,
    ) -> Result<()> {
        let kind = self
            .node(id)?
            .kind()
            .ok_or_else(|| Error::invalid_argument("only tag nodes have replaceable contents"))?;

        let (enclosing, depth) = self.scope_of(id);
        let elements = Engine::new(grammar, text)
            .parse_contents(kind, enclosing, depth)?
            .map_err(|position| {
                Error::invalid_argument(format!(
                    "{kind} content would end at position {position} of {text:?}"
                ))
            })?;

        let previous = std::mem::take(&mut self.node_mut(id)?.children);
        for child in previous {
            self.free(child);
        }
        let children = self.graft(id, elements, false);
        let node = self.node_mut(id)?;
        if let NodeData::Tag(tag) = &mut node.data {
            if kind.is_prefix() {
                if children.is_empty() {
                    tag.gap.clear();
                } else if tag.gap.is_empty() && !text.starts_with(char::is_whitespace) {
                    tag.gap.push(' ');
                }
            }
        }
        node.children = children;
        self.invalidate_spans(id);
        Ok(())
    }

    /// Creates an empty clause of `kind` directly under the root, at the
    /// position its rank dictates.
    ///
    /// The search starts after the clause `kind` requires (or at the first
    /// child); the new node goes before the first tag ranked after `kind`,
    /// or last (ahead of trailing whitespace) when there is none. Single
    /// spaces are added where the new clause would otherwise touch its
    /// neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralPrecondition`] if the required clause is
    /// absent, and [`Error::InvalidArgument`] if `kind` is not a prefix
    /// clause or is a singleton that already exists.
    pub fn insert_at_rank(&mut self, kind: &'static TagKind) -> Result<NodeId> {
        let rules = kind
            .clause
            .filter(|_| kind.is_prefix())
            .ok_or_else(|| Error::invalid_argument(format!("{kind} is not a clause")))?;
        if rules.singleton && self.find_singleton(kind).is_some() {
            return Err(Error::invalid_argument(format!("{kind} clause already present")));
        }

        let children = self.children_of(self.root);
        let search_from = match rules.requires {
            Some(required) => {
                let anchor = children
                    .iter()
                    .position(|&child| {
                        self.get(child)
                            .and_then(Node::kind)
                            .is_some_and(|k| k.name == required)
                    })
                    .ok_or(Error::StructuralPrecondition {
                        clause: kind.name,
                        required,
                    })?;
                anchor + 1
            }
            None => 0,
        };

        let index = children[search_from..]
            .iter()
            .position(|&child| {
                self.get(child)
                    .and_then(Node::kind)
                    .and_then(TagKind::rank)
                    .is_some_and(|rank| rank > rules.rank)
            })
            .map_or_else(
                || match children.last() {
                    Some(&last)
                        if children.len() > search_from
                            && self.get(last).is_some_and(Node::is_whitespace_leaf) =>
                    {
                        children.len() - 1
                    }
                    _ => children.len(),
                },
                |offset| search_from + offset,
            );

        let needs_before = index > 0 && !self.ends_with_whitespace(children[index - 1]);
        let needs_after = index < children.len() && !self.starts_with_whitespace(children[index]);

        let root = self.root;
        let id = self.alloc(NodeData::Tag(TagData::new(kind)), Some(root), None);
        let mut inserted = Vec::with_capacity(3);
        if needs_before {
            inserted.push(self.alloc(NodeData::Text(" ".to_string()), Some(root), None));
        }
        inserted.push(id);
        if needs_after {
            inserted.push(self.alloc(NodeData::Text(" ".to_string()), Some(root), None));
        }

        let root_node = self.node_mut(root)?;
        for (offset, child) in inserted.into_iter().enumerate() {
            root_node.children.insert(index + offset, child);
        }
        self.invalidate_spans(root);
        Ok(id)
    }

    fn write(&self, id: NodeId, output: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => output.push_str(text),
            NodeData::Root => {
                for &child in &node.children {
                    self.write(child, output);
                }
            }
            NodeData::Tag(tag) => {
                tag.write_start(output);
                for &child in &node.children {
                    self.write(child, output);
                }
                tag.write_end(output);
            }
        }
    }

    /// Returns the nearest delimited ancestor of `id` and the depth of `id`,
    /// counting top-level nodes as depth 1.
    fn scope_of(&self, id: NodeId) -> (Option<&'static TagKind>, usize) {
        let mut enclosing = None;
        let mut depth = 0;
        let mut current = self.get(id).and_then(Node::parent);
        while let Some(ancestor) = current {
            depth += 1;
            let node = self.get(ancestor);
            if enclosing.is_none() {
                enclosing = node.and_then(Node::kind).filter(|kind| kind.is_delimited());
            }
            current = node.and_then(Node::parent);
        }
        (enclosing, depth)
    }

    fn starts_with_whitespace(&self, id: NodeId) -> bool {
        let mut text = String::new();
        self.write(id, &mut text);
        text.starts_with(char::is_whitespace)
    }

    fn ends_with_whitespace(&self, id: NodeId) -> bool {
        let mut text = String::new();
        self.write(id, &mut text);
        text.ends_with(char::is_whitespace)
    }

    fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|node| node.children.clone()).unwrap_or_default()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| stale(id))
    }

    fn alloc(&mut self, data: NodeData, parent: Option<NodeId>, span: Option<Span>) -> NodeId {
        let node = Some(Node {
            data,
            parent,
            children: Vec::new(),
            span,
        });
        if let Some(index) = self.vacant.pop() {
            let slot = &mut self.slots[index];
            slot.node = node;
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            self.slots.push(Slot {
                generation: 0,
                node,
            });
            NodeId {
                index: self.slots.len() - 1,
                generation: 0,
            }
        }
    }

    /// Allocates `elements` as children of `parent` and returns their handles.
    fn graft(&mut self, parent: NodeId, elements: Vec<Element>, keep_spans: bool) -> Vec<NodeId> {
        elements
            .into_iter()
            .map(|element| {
                let span = keep_spans.then(|| element.span());
                match element {
                    Element::Text { text, .. } => self.alloc(NodeData::Text(text), Some(parent), span),
                    Element::Tag {
                        kind,
                        start_marker,
                        gap,
                        end_marker,
                        children,
                        ..
                    } => {
                        let data = NodeData::Tag(TagData {
                            kind,
                            start_marker,
                            gap,
                            end_marker,
                        });
                        let id = self.alloc(data, Some(parent), span);
                        let grafted = self.graft(id, children, keep_spans);
                        if let Ok(node) = self.node_mut(id) {
                            node.children = grafted;
                        }
                        id
                    }
                }
            })
            .collect()
    }

    /// Empties the slots of `id` and its subtree and bumps their generation.
    fn free(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(next.index)
                .filter(|slot| slot.generation == next.generation)
            else {
                continue;
            };
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.vacant.push(next.index);
                pending.extend(node.children);
            }
        }
    }

    /// Clears the span of `id` and its ancestors: their text no longer
    /// matches the parsed source.
    fn invalidate_spans(&mut self, id: NodeId) {
        let mut current = Some(id);
        while let Some(next) = current {
            current = self.node_mut(next).ok().and_then(|node| {
                node.span = None;
                node.parent
            });
        }
    }
}

fn stale(id: NodeId) -> Error {
    Error::invalid_argument(format!("node {} is not part of the tree", id.index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::SqlGrammar;
    use crate::parser::MAX_DEPTH;
    use crate::tag::catalog::{BRACES, FOR_UPDATE, FROM, ORDER_BY, SELECT, STRING_LITERAL, WHERE};

    fn tree(text: &str) -> ParseTree {
        let elements = Engine::new(&SqlGrammar::new(), text)
            .parse_statement()
            .unwrap_or_else(|e| panic!("Failed to parse: {text}\nError: {e}"));
        ParseTree::from_elements(elements, Span::new(0, text.len()))
    }

    #[test]
    fn test_to_text_round_trip() {
        let sql = "select a, (b + 'x''y') from t where c = \"Q\" /* note */ order  by a";
        assert_eq!(tree(sql).to_text(), sql);
    }

    #[test]
    fn test_text_of_excludes_markers() {
        let t = tree("SELECT a FROM t WHERE (x = 1)");
        let where_id = t.find_singleton(&WHERE).unwrap();
        assert_eq!(t.text_of(where_id).unwrap(), "(x = 1)");
        let braces = t.node(where_id).unwrap().children()[0];
        assert_eq!(t.text_of(braces).unwrap(), "x = 1");
    }

    #[test]
    fn test_spans_match_source() {
        let sql = "SELECT a FROM t";
        let t = tree(sql);
        let from = t.find_singleton(&FROM).unwrap();
        let span = t.node(from).unwrap().span().unwrap();
        assert_eq!(span.slice(sql), Some("FROM t"));
        assert_eq!(t.node(t.root()).unwrap().span(), Some(Span::new(0, sql.len())));
    }

    #[test]
    fn test_parent_links() {
        let t = tree("SELECT (1)");
        let select = t.top_level_tags().next().unwrap();
        let braces = t.node(select).unwrap().children()[0];
        assert_eq!(t.node(braces).unwrap().kind(), Some(&BRACES));
        assert_eq!(t.node(braces).unwrap().parent(), Some(select));
        assert_eq!(t.node(select).unwrap().parent(), Some(t.root()));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let t = tree("SELECT ('a')");
        let kinds: Vec<_> = t
            .descendants(t.root())
            .unwrap()
            .into_iter()
            .filter_map(|id| t.node(id).unwrap().kind().map(|k| k.name))
            .collect();
        assert_eq!(kinds, vec!["SELECT", "BRACES", "STRING_LITERAL"]);
    }

    #[test]
    fn test_remove_takes_separator() {
        let mut t = tree("SELECT a FROM t WHERE x = 1 ORDER BY a");
        let where_id = t.find_singleton(&WHERE).unwrap();
        t.remove(where_id).unwrap();
        assert_eq!(t.to_text(), "SELECT a FROM t ORDER BY a");
        assert!(t.get(where_id).is_none());
        assert!(matches!(t.text_of(where_id), Err(Error::InvalidArgument(_))));
        assert!(t.node(t.root()).unwrap().span().is_none());
    }

    #[test]
    fn test_remove_first_clause() {
        let mut t = tree("SELECT a FROM t");
        let select = t.top_level_tags().next().unwrap();
        t.remove(select).unwrap();
        assert_eq!(t.to_text(), "FROM t");
    }

    #[test]
    fn test_remove_root_rejected() {
        let mut t = tree("SELECT 1");
        let root = t.root();
        assert!(matches!(t.remove(root), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_remove_frees_subtree() {
        let mut t = tree("SELECT a FROM t WHERE ((x))");
        let before = t.len();
        let where_id = t.find_singleton(&WHERE).unwrap();
        t.remove(where_id).unwrap();
        // WHERE, two BRACES, the "x" leaf and the separator
        assert_eq!(t.len(), before - 5);
    }

    #[test]
    fn test_replace_contents() {
        let mut t = tree("SELECT a FROM t WHERE x = 1");
        let where_id = t.find_singleton(&WHERE).unwrap();
        t.replace_contents(where_id, "y IN ('a', 'b')", &SqlGrammar::new())
            .unwrap();
        assert_eq!(t.to_text(), "SELECT a FROM t WHERE y IN ('a', 'b')");
        assert!(t.node(where_id).unwrap().span().is_none());
        let from = t.find_singleton(&FROM).unwrap();
        assert!(t.node(from).unwrap().span().is_some());
    }

    #[test]
    fn test_replace_contents_failure_leaves_tree() {
        let mut t = tree("SELECT a FROM t WHERE x = 1");
        let where_id = t.find_singleton(&WHERE).unwrap();
        let grammar = SqlGrammar::new();
        assert!(matches!(
            t.replace_contents(where_id, "x = 'oops", &grammar),
            Err(Error::MalformedInput(_))
        ));
        assert!(matches!(
            t.replace_contents(where_id, "x = 1 ORDER BY y", &grammar),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(t.to_text(), "SELECT a FROM t WHERE x = 1");
    }

    #[test]
    fn test_replace_contents_cannot_close_enclosing_group() {
        let sql = "SELECT a FROM (SELECT b FROM c WHERE d = 1) x WHERE y = 2";
        let mut t = tree(sql);
        let from = t.find_singleton(&FROM).unwrap();
        let group = t.node(from).unwrap().children()[0];
        assert_eq!(t.node(group).unwrap().kind(), Some(&BRACES));
        let inner_where = t
            .node(group)
            .unwrap()
            .children()
            .iter()
            .copied()
            .find(|&id| t.node(id).unwrap().kind() == Some(&WHERE))
            .unwrap();

        let grammar = SqlGrammar::new();
        assert!(matches!(
            t.replace_contents(inner_where, "d = 1)", &grammar),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(t.to_text(), sql);

        t.replace_contents(inner_where, "d IN (1, 2)", &grammar).unwrap();
        assert_eq!(
            t.to_text(),
            "SELECT a FROM (SELECT b FROM c WHERE d IN (1, 2)) x WHERE y = 2"
        );
    }

    #[test]
    fn test_replace_contents_respects_nesting_limit() {
        let mut t = tree("SELECT a FROM t WHERE x = 1");
        let where_id = t.find_singleton(&WHERE).unwrap();
        let grammar = SqlGrammar::new();
        let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

        t.replace_contents(where_id, &nested(MAX_DEPTH - 1), &grammar)
            .unwrap();
        assert!(matches!(
            t.replace_contents(where_id, &nested(MAX_DEPTH), &grammar),
            Err(Error::MalformedInput(_))
        ));
        assert_eq!(t.text_of(where_id).unwrap(), nested(MAX_DEPTH - 1));
    }

    #[test]
    fn test_removed_slots_are_reused_with_new_generation() {
        let mut t = tree("SELECT a FROM t WHERE x = 1");
        let slots = t.len();
        let old = t.find_singleton(&WHERE).unwrap();
        t.remove(old).unwrap();
        let new = t.insert_at_rank(&WHERE).unwrap();
        t.replace_contents(new, "y = 2", &SqlGrammar::new()).unwrap();

        assert_eq!(t.to_text(), "SELECT a FROM t WHERE y = 2");
        assert!(t.get(old).is_none());
        assert_ne!(old, new);
        let ids = t.descendants(t.root()).unwrap();
        assert!(ids.iter().all(|id| id.index() < slots));
    }

    #[test]
    fn test_replace_contents_of_literal() {
        let mut t = tree("SELECT 'a'");
        let select = t.find_singleton(&SELECT).unwrap();
        let literal = t.node(select).unwrap().children()[0];
        assert_eq!(t.node(literal).unwrap().kind(), Some(&STRING_LITERAL));
        let grammar = SqlGrammar::new();
        t.replace_contents(literal, "it''s", &grammar).unwrap();
        assert_eq!(t.to_text(), "SELECT 'it''s'");
        assert!(t.replace_contents(literal, "it's", &grammar).is_err());
    }

    #[test]
    fn test_insert_where_after_from() {
        let mut t = tree("SELECT a FROM t ORDER BY a");
        let id = t.insert_at_rank(&WHERE).unwrap();
        t.replace_contents(id, "x = 1", &SqlGrammar::new()).unwrap();
        assert_eq!(t.to_text(), "SELECT a FROM t WHERE x = 1 ORDER BY a");
    }

    #[test]
    fn test_insert_requires_anchor() {
        let mut t = tree("SELECT 1");
        assert_eq!(
            t.insert_at_rank(&WHERE),
            Err(Error::StructuralPrecondition {
                clause: "WHERE",
                required: "FROM"
            })
        );
        assert_eq!(t.to_text(), "SELECT 1");
    }

    #[test]
    fn test_insert_before_for_update() {
        let mut t = tree("SELECT a FROM t FOR UPDATE");
        let id = t.insert_at_rank(&ORDER_BY).unwrap();
        t.replace_contents(id, "a", &SqlGrammar::new()).unwrap();
        assert_eq!(t.to_text(), "SELECT a FROM t ORDER BY a FOR UPDATE");
    }

    #[test]
    fn test_insert_ahead_of_trailing_whitespace() {
        let mut t = tree("SELECT a FROM t\n");
        let id = t.insert_at_rank(&FOR_UPDATE).unwrap();
        assert_eq!(t.text_of(id).unwrap(), "");
        assert_eq!(t.to_text(), "SELECT a FROM t FOR UPDATE\n");
    }

    #[test]
    fn test_insert_first_clause() {
        let mut t = tree("FROM t");
        let id = t.insert_at_rank(&SELECT).unwrap();
        t.replace_contents(id, "*", &SqlGrammar::new()).unwrap();
        assert_eq!(t.to_text(), "SELECT * FROM t");
    }

    #[test]
    fn test_insert_rejects_non_clause_and_duplicates() {
        let mut t = tree("SELECT a FROM t");
        assert!(matches!(t.insert_at_rank(&BRACES), Err(Error::InvalidArgument(_))));
        assert!(matches!(t.insert_at_rank(&FROM), Err(Error::InvalidArgument(_))));
    }
}
