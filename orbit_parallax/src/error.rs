// Copyright 2026 the Orbit Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

use crate::participant::ParticipantId;

/// Why an element's geometry could not be sampled.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryError {
    /// The element is not attached to a renderable tree.
    #[error("element is not attached to the document")]
    Detached,
    /// The bounding box contains a NaN or infinite coordinate.
    #[error("element bounding box is not finite")]
    NonFinite,
    /// The bounding box has `y1 < y0`.
    #[error("element bounding box has negative height")]
    NegativeHeight,
}

/// Failure to register (or re-derive) a participant.
///
/// Nothing is added to, or changed in, the registry when one of these is
/// returned.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq)]
pub enum RegistrationError {
    /// Speed must be a finite number.
    #[error("parallax speed must be finite, got {0}")]
    InvalidSpeed(f64),
    /// The driver reported a viewport height that is not finite and positive.
    #[error("viewport height must be finite and positive, got {0}")]
    InvalidViewport(f64),
    /// Geometry sampling failed.
    #[error("geometry sampling failed: {0}")]
    Geometry(#[from] GeometryError),
    /// The handle does not refer to a registered participant.
    #[error("unknown participant {0:?}")]
    UnknownParticipant(ParticipantId),
}
