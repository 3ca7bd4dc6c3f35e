//! Error types for the physics layer

use crate::collider::VolumeId;
use thiserror::Error;

/// Physics layer errors
#[derive(Debug, Error)]
pub enum PhysicsError {
    /// Hit-volume not found
    #[error("Hit-volume not found: {0:?}")]
    VolumeNotFound(VolumeId),

    /// No hit-volumes are attached to this owner
    #[error("Owner {0} has no hit-volumes")]
    OwnerNotFound(u64),

    /// Shape creation failed
    #[error("Failed to create collision shape: {0}")]
    InvalidShape(String),

    /// Invalid configuration
    #[error("Invalid physics configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, PhysicsError>;
