use thiserror::Error;

/// Why a builder operation left the tree untouched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    #[error("component not found: {0}")]
    ComponentNotFound(String),
    #[error("component id already in the tree: {0}")]
    DuplicateId(String),
    #[error("parent component not found: {0}")]
    ParentNotFound(String),
    #[error("component {0} cannot hold children")]
    LeafParent(String),
    #[error("cannot move {id} into its own subtree (target parent {target})")]
    MoveIntoOwnSubtree { id: String, target: String },
    #[error("component type \"{0}\" not found in catalog")]
    UnknownComponentType(String),
}
