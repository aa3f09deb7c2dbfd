// Video errors
//
// Two classes of failure exist: the host graphics API rejecting a request
// (fatal to the backend instance) and the caller breaking the lifecycle or
// frame-size contract (a programming error).

use super::quad::Lifecycle;
use thiserror::Error;

/// Failure reported by the host graphics context
///
/// Fatal to the backend instance. The host may fall back to a different
/// backend implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    /// The presentation surface could not be created or configured
    #[error("presentation surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// No graphics adapter is compatible with the surface
    #[error("no compatible graphics adapter: {0}")]
    AdapterUnavailable(String),

    /// The graphics device could not be opened
    #[error("graphics device request failed: {0}")]
    DeviceRequest(String),

    /// A texture name could not be generated
    #[error("texture creation rejected: {0}")]
    TextureCreation(String),

    /// Storage for a texture could not be allocated
    #[error("texture allocation of {width}x{height} rejected")]
    TextureAllocation {
        /// Requested width in texels
        width: u32,
        /// Requested height in texels
        height: u32,
    },

    /// The requested texture exceeds the device limit
    #[error("texture of {width}x{height} exceeds the device limit of {limit}")]
    TextureTooLarge {
        /// Requested width in texels
        width: u32,
        /// Requested height in texels
        height: u32,
        /// Maximum supported dimension
        limit: u32,
    },

    /// The handle does not name a live texture
    #[error("texture handle {0} is not alive")]
    UnknownTexture(u32),

    /// A texture operation was issued with nothing bound
    #[error("no texture bound")]
    NoTextureBound,

    /// A pixel upload was rejected
    #[error("texture upload rejected: {0}")]
    Upload(String),

    /// The frame could not be presented
    #[error("present failed: {0}")]
    Present(String),

    /// The context cannot apply the requested state
    #[error("not supported by this context: {0}")]
    Unsupported(&'static str),
}

/// Misuse of the backend by its caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// An operation was invoked in a lifecycle state that does not allow it
    #[error("`{operation}` is not valid while the backend is {state}")]
    OutOfOrder {
        /// Name of the rejected operation
        operation: &'static str,
        /// State the backend was in
        state: Lifecycle,
    },

    /// A posted frame does not hold exactly one frame of pixels
    #[error("frame buffer holds {actual} bytes, expected {expected}")]
    FrameSizeMismatch {
        /// bytes-per-pixel x width x height
        expected: usize,
        /// Length of the buffer that was posted
        actual: usize,
    },

    /// Logical dimensions must both be non-zero
    #[error("logical dimensions {width}x{height} must be non-zero")]
    ZeroDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Error returned by every backend operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoError {
    /// The host graphics context rejected a request
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// The caller broke the backend contract
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

impl VideoError {
    /// Whether this error is a caller contract violation
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, VideoError::Contract(_))
    }

    /// Whether this error came from the host graphics context
    pub fn is_resource_error(&self) -> bool {
        matches!(self, VideoError::Resource(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err: VideoError = ResourceError::NoTextureBound.into();
        assert!(err.is_resource_error());
        assert!(!err.is_contract_violation());

        let err: VideoError = ContractViolation::ZeroDimensions {
            width: 0,
            height: 160,
        }
        .into();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_error_messages() {
        let err = VideoError::from(ContractViolation::OutOfOrder {
            operation: "post_frame",
            state: Lifecycle::Initialized,
        });
        assert_eq!(
            err.to_string(),
            "`post_frame` is not valid while the backend is initialized"
        );

        let err = VideoError::from(ContractViolation::FrameSizeMismatch {
            expected: 76800,
            actual: 100,
        });
        assert_eq!(
            err.to_string(),
            "frame buffer holds 100 bytes, expected 76800"
        );
    }
}
