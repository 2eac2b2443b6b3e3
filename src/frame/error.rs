use crate::frame::FrameId;

/// Errors raised by frame-aware queries.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The frame isn't known by the frame transforms provider.
    #[error("the frame {0:?} is unknown")]
    UnknownFrame(FrameId),
    /// No transform relates the two frames.
    #[error("no transform relates the frame {from:?} to the frame {to:?}")]
    Disconnected {
        /// The frame the coordinates are expressed in.
        from: FrameId,
        /// The frame the coordinates should be expressed in.
        to: FrameId,
    },
}
