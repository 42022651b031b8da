//! Error types for the render pipeline.

use std::fmt;

use prism_test_utils::DeviceError;

/// Error returned by a pass hook. Any error type can be boxed into it.
pub type PassError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which hook of a pass failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    Begin,
    End,
}

impl fmt::Display for PassStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassStage::Begin => write!(f, "begin_render_pass"),
            PassStage::End => write!(f, "end_render_pass"),
        }
    }
}

/// Errors that abort a frame in [`RenderPipeline::render`](crate::RenderPipeline::render).
#[derive(Debug)]
pub enum PipelineError {
    /// Transient passes kept appending more passes past the drain limit.
    ExpansionLimitExceeded {
        /// The configured number of drain iterations.
        limit: usize,
    },

    /// An intermediate render target could not be allocated.
    TargetAllocation {
        /// Debug label of the target.
        label: String,
        /// The device failure.
        source: DeviceError,
    },

    /// The output configuration has a zero dimension.
    EmptyOutput { width: u32, height: u32 },

    /// A pass hook returned an error.
    PassFailed {
        /// Name of the failing pass.
        pass: String,
        stage: PassStage,
        source: PassError,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ExpansionLimitExceeded { limit } => write!(
                f,
                "Exceeded the number of append_render_pass iterations ({}). Ensure no render pass \
                 unconditionally calls append_render_pass while the frame is rendering",
                limit
            ),
            PipelineError::TargetAllocation { label, source } => {
                write!(f, "Failed to allocate render target '{}': {}", label, source)
            }
            PipelineError::EmptyOutput { width, height } => write!(
                f,
                "Cannot provision render targets for a {}x{} output",
                width, height
            ),
            PipelineError::PassFailed {
                pass,
                stage,
                source,
            } => write!(f, "Render pass '{}' failed in {}: {}", pass, stage, source),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::TargetAllocation { source, .. } => Some(source),
            PipelineError::PassFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Errors that can occur while creating a [`GraphicsContext`](crate::GraphicsContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// No adapter matched the requested options.
    NoAdapter(String),
    /// The adapter refused to create a device.
    DeviceRequest(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::NoAdapter(reason) => {
                write!(f, "Failed to find a suitable GPU adapter: {}", reason)
            }
            GraphicsError::DeviceRequest(reason) => {
                write!(f, "Failed to create device: {}", reason)
            }
        }
    }
}

impl std::error::Error for GraphicsError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_expansion_error_names_the_limit() {
        let err = PipelineError::ExpansionLimitExceeded { limit: 100 };
        let text = format!("{}", err);
        assert!(text.contains("100"));
        assert!(text.contains("append_render_pass"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_target_allocation_exposes_source() {
        let err = PipelineError::TargetAllocation {
            label: "Intermediate Primary".to_string(),
            source: DeviceError::OutOfMemory {
                label: "Intermediate Primary Color".to_string(),
            },
        };
        assert!(format!("{}", err).contains("Intermediate Primary"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_pass_failed_display() {
        let err = PipelineError::PassFailed {
            pass: "shadow".to_string(),
            stage: PassStage::End,
            source: "resolve failed".into(),
        };
        let text = format!("{}", err);
        assert!(text.contains("shadow"));
        assert!(text.contains("end_render_pass"));
        assert!(text.contains("resolve failed"));
    }
}
