use thiserror::Error;

use crate::model::NodeId;

#[derive(Debug, Error)]
/// Errors raised by the host document API.
///
/// Element behaviour never fails: malformed attributes coerce to defaults and operations on
/// unrendered elements are no-ops. These errors only describe misuse of the document itself.
pub enum ElementError {
    /// The node id does not exist in the document.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// The node is not a connected, upgraded element of the requested kind.
    #[error("node {node} is not an upgraded <{expected}> element")]
    WrongElement {
        /// Node that was looked up.
        node: NodeId,
        /// Tag the caller asked for.
        expected: &'static str,
    },
    /// The node cannot hold children (text nodes).
    #[error("node {0} cannot have children")]
    NotAContainer(NodeId),
    /// Inserting the node would create a cycle or move the document body.
    #[error("cannot insert node {child} under {parent}")]
    HierarchyRequest {
        /// Proposed parent.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
    /// The configuration payload could not be parsed.
    #[error("invalid element configuration: {0}")]
    Config(#[from] serde_json::Error),
}
