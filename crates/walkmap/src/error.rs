// error.rs - Error types for the walkmap core

use thiserror::Error;

use crate::region::RegionId;

/// Errors produced while validating input or carving the walkmap.
///
/// The `Invalid*` variants reject bad input before any carving starts.
/// Everything else is an internal consistency fault: the graph was left in a
/// state the carving rules should never produce.
#[derive(Debug, Error, PartialEq)]
pub enum WalkmapError {
    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("obstacle #{index} has invalid geometry: {reason}")]
    InvalidObstacle { index: usize, reason: String },

    #[error("region {0} was used after being destroyed")]
    DestroyedRegion(RegionId),

    #[error("adjacency between {from} and {to} is not symmetric")]
    AsymmetricAdjacency { from: RegionId, to: RegionId },

    #[error("region {from} is adjacent to {to}, which is not part of the walkmap")]
    DanglingAdjacency { from: RegionId, to: RegionId },

    #[error("walkmap region {region} has bad neighbour {neighbor}: {reason}")]
    InvalidAdjacency { region: usize, neighbor: usize, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, WalkmapError>;
