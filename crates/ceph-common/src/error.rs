//! Error types for Ceph workload synthesis
//!
//! Manifest construction itself is infallible. Errors only surface from
//! reading the parent cluster resource, deriving a build context from it,
//! and the ownership-registration step.

use thiserror::Error;

/// Main error type for Ceph workload operations
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid parent resource or build input
    #[error("validation error for {resource}: {message}")]
    Validation {
        /// Name of the resource with invalid configuration
        resource: String,
        /// Description of what's invalid
        message: String,
    },

    /// An owner reference could not be attached to a manifest
    #[error("owner reference error for {resource}: {message}")]
    OwnerReference {
        /// Name of the manifest the reference was meant for
        resource: String,
        /// Description of what failed
        message: String,
    },

    /// Parent resource could not be parsed, or a manifest could not be encoded
    #[error("serialization error: {source}")]
    Serialization {
        /// The underlying serde_json error
        #[from]
        source: serde_json::Error,
    },
}

impl Error {
    /// Create a validation error for the named resource
    pub fn validation(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    /// Create an owner reference error for the named manifest
    pub fn owner_reference(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::OwnerReference {
            resource: resource.into(),
            message: msg.into(),
        }
    }
}
