//! Serializable view of a parse tree, for tooling and debugging.

use serde::Serialize;

use crate::document::Document;
use crate::error::Result;
use crate::grammar::Grammar;
use crate::span::Span;
use crate::tree::{NodeData, NodeId, ParseTree};

/// An owned copy of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Root {
        children: Vec<NodeSnapshot>,
    },
    Tag {
        name: &'static str,
        start: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        gap: String,
        #[serde(skip_serializing_if = "String::is_empty")]
        end: String,
        span: Option<Span>,
        children: Vec<NodeSnapshot>,
    },
    Text {
        text: String,
        span: Option<Span>,
    },
}

impl ParseTree {
    /// Copies the subtree rooted at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if `id` was removed.
    pub fn snapshot(&self, id: NodeId) -> Result<NodeSnapshot> {
        let node = self.node(id)?;
        let children = || {
            node.children()
                .iter()
                .map(|&child| self.snapshot(child))
                .collect::<Result<Vec<_>>>()
        };
        Ok(match node.data() {
            NodeData::Root => NodeSnapshot::Root {
                children: children()?,
            },
            NodeData::Tag(tag) => NodeSnapshot::Tag {
                name: tag.kind.name,
                start: tag.start_marker.clone(),
                gap: tag.gap.clone(),
                end: tag.end_marker.clone(),
                span: node.span(),
                children: children()?,
            },
            NodeData::Text(text) => NodeSnapshot::Text {
                text: text.clone(),
                span: node.span(),
            },
        })
    }
}

impl<G: Grammar> Document<G> {
    /// Copies the whole tree.
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        let tree = self.tree();
        tree.snapshot(tree.root())
            .unwrap_or(NodeSnapshot::Root { children: Vec::new() })
    }
}
