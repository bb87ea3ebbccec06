use thiserror::Error;

use super::types::Node;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("malformed topology: {0}")]
    MalformedTopology(String),

    #[error("unknown routing policy {0:?}: expected nearest-exit, no-left-turn or unrestricted")]
    UnknownRoutingPolicy(String),

    #[error("segment {from} -> {to} is already at capacity")]
    CapacityExceeded { from: Node, to: Node },

    #[error("segment {from} -> {to} is not part of the network")]
    UnknownSegment { from: Node, to: Node },

    #[error("exit node {0} is not part of the network")]
    UnknownExitNode(Node),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("world file parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SimResult<T> = Result<T, SimError>;
