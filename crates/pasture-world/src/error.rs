//! Error types for the `pasture-world` crate.
//!
//! Grid queries never fail: out-of-range coordinates get safe defaults. The
//! only fallible step is deriving a layout from a viewport.

/// Errors that can occur while building the world grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The viewport, tile size or padding does not leave room for a grid.
    #[error("invalid world layout: {reason}")]
    InvalidLayout {
        /// What was wrong with the inputs.
        reason: &'static str,
    },
}
