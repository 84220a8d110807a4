// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Error types for dataset loading and view derivation
//!
//! Every [`DataError`] is fatal to the dataset being loaded: callers surface
//! a single failure state instead of rendering part of the views. Edges that
//! merely fail to resolve are not errors; the builders drop them and count them.

/// Malformed or inconsistent input data
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Weight is missing, non-numeric or negative
    #[error("invalid weight for {0}")]
    InvalidWeight(String),

    /// Position component is non-numeric or non-finite
    #[error("invalid position for concept {0}")]
    InvalidPosition(String),

    /// Concept references a theme absent from the theme collection
    #[error("concept {concept} references unknown theme {theme}")]
    UnknownTheme {
        /// Offending concept ID
        concept: String,
        /// Theme ID that could not be found
        theme: String,
    },

    /// Theme connectivity is not numeric
    #[error("invalid connectivity for theme {0}")]
    InvalidConnectivity(String),

    /// Two concepts share the same ID
    #[error("duplicate concept id {0}")]
    DuplicateConcept(String),

    /// Every node of the prominence edge list has a parent (or the list is empty)
    #[error("prominence edges have no root")]
    NoRoot,

    /// More than one parentless node in the prominence edge list
    #[error("prominence edges have multiple roots: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    /// A node was reached twice or lies on a cycle unreachable from the root
    #[error("cycle detected at prominence node {0}")]
    CycleDetected(String),
}

/// Crate-level error
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Well-formed document with inconsistent data
    #[error(transparent)]
    Data(#[from] DataError),

    /// Document is not valid JSON or lacks required fields
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Result alias for data transforms
pub type DataResult<T> = std::result::Result<T, DataError>;
