//! Error types for the fractanet core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::scaling::FitError;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by graph queries, box coverings, renormalisation and
/// classification.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FractalError {
    /// Box diameters must be at least 1.
    #[error("box diameter must be at least {minimum} (got {got})")]
    InvalidBoxDiameter {
        /// The rejected diameter.
        got: usize,
        /// Smallest diameter accepted by the operation.
        minimum: usize,
    },
    /// The operation requires at least one vertex.
    #[error("graph contains no vertices")]
    EmptyGraph,
    /// A vertex id was outside `0..vertex_count`.
    #[error("vertex {vertex} is out of bounds for a graph with {vertex_count} vertices")]
    InvalidVertex {
        /// The offending vertex id.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// A caller-supplied vertex order was not a permutation of the vertices.
    #[error("vertex order must be a permutation of {expected} vertices (got {got} entries)")]
    InvalidVertexOrder {
        /// Number of vertices the order must cover.
        expected: usize,
        /// Number of entries supplied.
        got: usize,
    },
    /// The operation requires a connected graph.
    #[error("graph is disconnected ({components} components)")]
    Disconnected {
        /// Number of connected components found.
        components: usize,
    },
    /// A vertex has no path to any centre, so its central distance is undefined.
    #[error("vertex {vertex} has no path to any centre")]
    NoPathToCentre {
        /// The unreachable vertex.
        vertex: usize,
    },
    /// The graph exceeds the vertex limit for all-pairs distance matrices.
    #[error("graph has {vertices} vertices but the distance matrix limit is {limit}")]
    GraphTooLarge {
        /// Number of vertices in the graph.
        vertices: usize,
        /// Configured vertex limit.
        limit: usize,
    },
    /// An internal invariant was violated, indicating a logic error.
    #[error("invariant violated: {invariant} (vertex {vertex})")]
    InvariantViolation {
        /// Name of the violated invariant.
        invariant: &'static str,
        /// Vertex being processed when the violation was detected.
        vertex: usize,
    },
    /// Renormalisation did not reduce the vertex count.
    #[error("renormalisation stalled at {vertices} vertices")]
    RenormalisationStalled {
        /// Vertex count that failed to shrink.
        vertices: usize,
    },
    /// Fitting a scaling model failed.
    #[error("curve fit failed: {source}")]
    Fit {
        /// Underlying fitting error.
        #[from]
        source: FitError,
    },
}

define_error_codes! {
    /// Stable codes describing [`FractalError`] variants.
    enum FractalErrorCode for FractalError {
        /// Box diameters must be at least 1.
        InvalidBoxDiameter => InvalidBoxDiameter { .. } => "FRACTANET_INVALID_BOX_DIAMETER",
        /// The operation requires at least one vertex.
        EmptyGraph => EmptyGraph => "FRACTANET_EMPTY_GRAPH",
        /// A vertex id was outside the graph.
        InvalidVertex => InvalidVertex { .. } => "FRACTANET_INVALID_VERTEX",
        /// A vertex order was not a permutation.
        InvalidVertexOrder => InvalidVertexOrder { .. } => "FRACTANET_INVALID_VERTEX_ORDER",
        /// The operation requires a connected graph.
        Disconnected => Disconnected { .. } => "FRACTANET_DISCONNECTED",
        /// A vertex has no path to any centre.
        NoPathToCentre => NoPathToCentre { .. } => "FRACTANET_NO_PATH_TO_CENTRE",
        /// The graph exceeds the distance matrix limit.
        GraphTooLarge => GraphTooLarge { .. } => "FRACTANET_GRAPH_TOO_LARGE",
        /// An internal invariant was violated.
        InvariantViolation => InvariantViolation { .. } => "FRACTANET_INVARIANT_VIOLATION",
        /// Renormalisation did not reduce the vertex count.
        RenormalisationStalled => RenormalisationStalled { .. } => "FRACTANET_RENORMALISATION_STALLED",
        /// Fitting a scaling model failed.
        FitFailure => Fit { .. } => "FRACTANET_FIT_FAILURE",
    }
}

impl FractalError {
    /// Retrieve the inner [`crate::FitErrorCode`] when the error originated in
    /// curve fitting.
    pub const fn fit_code(&self) -> Option<crate::FitErrorCode> {
        match self {
            Self::Fit { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, FractalError>;
