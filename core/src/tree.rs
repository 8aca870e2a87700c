#![deny(missing_docs)]

//! # Schema Path Tree
//!
//! An arena backed tree whose nodes mirror the traversal of an OpenAPI
//! document. Every node is addressable by the sequence of path elements
//! leading to it from the root, or by the slash joined form of that
//! sequence. Path elements may themselves contain slashes (content types
//! like `application/json`, path templates like `/pets/{petId}`), which the
//! element based form expresses unambiguously and the string based form
//! resolves by prefix matching.

use std::collections::BTreeMap;

use openapiv3::{
    Header, Parameter, ReferenceOr, RequestBody, Response, Schema, SecurityScheme,
};
use tracing::warn;

/// Identifies a node inside its owning [`SchemaTree`].
///
/// Ids are only meaningful for the tree that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// The OpenAPI object a tree node carries.
///
/// Container nodes which only give the tree its shape (`components`,
/// `paths`, an `allOf` keyword node) carry [`Payload::Structural`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A schema, either inline or a reference to one.
    Schema(ReferenceOr<Schema>),
    /// A parameter definition.
    Parameter(ReferenceOr<Parameter>),
    /// A request body template.
    RequestBody(ReferenceOr<RequestBody>),
    /// A response template.
    Response(ReferenceOr<Response>),
    /// A header definition.
    Header(ReferenceOr<Header>),
    /// A security scheme definition.
    SecurityScheme(ReferenceOr<SecurityScheme>),
    /// No payload; the node exists to shape the tree.
    Structural,
}

impl Payload {
    /// A short name for the payload kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Schema(_) => "schema",
            Payload::Parameter(_) => "parameter",
            Payload::RequestBody(_) => "requestBody",
            Payload::Response(_) => "response",
            Payload::Header(_) => "header",
            Payload::SecurityScheme(_) => "securityScheme",
            Payload::Structural => "structural",
        }
    }

    /// True when the node carries no specification object.
    pub fn is_structural(&self) -> bool {
        matches!(self, Payload::Structural)
    }

    /// The `$ref` target when the payload is an unresolved reference.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Payload::Schema(ReferenceOr::Reference { reference })
            | Payload::Parameter(ReferenceOr::Reference { reference })
            | Payload::RequestBody(ReferenceOr::Reference { reference })
            | Payload::Response(ReferenceOr::Reference { reference })
            | Payload::Header(ReferenceOr::Reference { reference })
            | Payload::SecurityScheme(ReferenceOr::Reference { reference }) => Some(reference),
            _ => None,
        }
    }
}

/// A single node in the schema path tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    /// One segment of the tree path, eg. "schemas" in `components/schemas`.
    /// May contain slashes for content types and path templates.
    pub path_element: String,
    /// Children keyed by their path element, iterated in sorted order.
    pub children: BTreeMap<String, NodeId>,
    /// The OpenAPI object at this position, if any.
    pub payload: Payload,
    /// Set when the payload is a `$ref`. Reference nodes are leaves; the
    /// definition they point at is described elsewhere in the tree.
    pub reference: Option<String>,
    /// The node that has this one as a child. `None` only for the root.
    pub parent: Option<NodeId>,
    /// Used to build type names when short names collide. Corresponds to
    /// the location in the document, eg. entries under `components/schemas`
    /// carry "Schema".
    pub element_name: Option<String>,
    /// The shortest unique alias for this node. Assigned by a dedicated
    /// pass once the whole tree is known, since collisions can only be
    /// detected globally.
    pub friendly_name: Option<String>,
}

impl PathNode {
    /// Creates an unattached node. The reference marker is derived from the
    /// payload so the two can never disagree.
    pub fn new(path_element: &str, payload: Payload) -> Self {
        let reference = payload.reference().map(str::to_owned);
        PathNode {
            path_element: path_element.to_string(),
            children: BTreeMap::new(),
            payload,
            reference,
            parent: None,
            element_name: None,
            friendly_name: None,
        }
    }

    /// Creates an unattached node with no payload.
    pub fn structural(path_element: &str) -> Self {
        PathNode::new(path_element, Payload::Structural)
    }
}

/// Arena holding every node of one document traversal.
///
/// The tree always contains a root node with an empty path element; all
/// other nodes are attached below it via [`SchemaTree::add_child`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTree {
    nodes: Vec<PathNode>,
}

impl Default for SchemaTree {
    fn default() -> Self {
        SchemaTree::new()
    }
}

impl SchemaTree {
    /// Creates a tree holding only the synthetic root.
    pub fn new() -> Self {
        SchemaTree {
            nodes: vec![PathNode::structural("")],
        }
    }

    /// The id of the root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Borrows a node. Ids from other trees are out of contract.
    pub fn node(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.0]
    }

    /// Mutably borrows a node.
    pub fn node_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True while nothing has been attached below the synthetic root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Attaches `node` under `parent` and returns its id.
    ///
    /// A second child with the same path element replaces the first. That
    /// means the document addressed two different objects with one tree
    /// path, so the collision is surfaced in the log before the newer
    /// definition wins.
    pub fn add_child(&mut self, parent: NodeId, mut node: PathNode) -> NodeId {
        node.parent = Some(parent);
        let element = node.path_element.clone();
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);

        if self.nodes[parent.0].children.contains_key(&element) {
            warn!(
                parent = %self.path_of(parent),
                element = %element,
                "duplicate path element, replacing earlier node"
            );
        }
        self.nodes[parent.0].children.insert(element, id);
        id
    }

    /// The slash joined path of a node, eg. `components/schemas/Pet`.
    /// The root contributes nothing, so its own path is empty.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut elements = Vec::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            elements.push(self.nodes[current.0].path_element.as_str());
            current = parent;
        }
        elements.reverse();
        elements.join("/")
    }

    /// Resolves a slash joined path starting at the root.
    pub fn node_by_path(&self, path: &str) -> Option<NodeId> {
        self.node_by_path_from(self.root(), path)
    }

    /// Resolves a slash joined path starting at `start`.
    ///
    /// A leading slash is ignored and an empty path resolves to `start`
    /// itself. At each level the children are prefix matched against the
    /// remaining path, which lets elements containing slashes resolve from
    /// a flat string. When several children prefix match (one path element
    /// being a prefix of a sibling), the longest match wins; there is no
    /// backtracking.
    pub fn node_by_path_from(&self, start: NodeId, path: &str) -> Option<NodeId> {
        let path = path.strip_prefix('/').unwrap_or(path);
        if path.is_empty() {
            return Some(start);
        }

        let mut best: Option<(&str, NodeId)> = None;
        for (element, child) in &self.nodes[start.0].children {
            match path.strip_prefix(element.as_str()) {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                    if best.map_or(true, |(b, _)| element.len() > b.len()) {
                        best = Some((element, *child));
                    }
                }
                _ => {}
            }
        }

        let (element, child) = best?;
        self.node_by_path_from(child, &path[element.len()..])
    }

    /// Resolves a node by exact path elements. An empty slice resolves to
    /// the root. Must agree with [`SchemaTree::node_by_path`] on the slash
    /// joined form of the same elements.
    pub fn node_by_elements(&self, elements: &[&str]) -> Option<NodeId> {
        let mut current = self.root();
        for element in elements {
            current = *self.nodes[current.0].children.get(*element)?;
        }
        Some(current)
    }
}
