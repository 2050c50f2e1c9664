//! Error types for glimmer.
//!
//! Selection errors are programmer errors (the index came from somewhere other
//! than the registry), initialization errors are recoverable and leave the
//! running session alone, and surface errors come from the software raster.

use std::fmt;

/// Errors raised by the simulation registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested index is outside the registry.
    InvalidSelection {
        /// Index that was asked for.
        index: usize,
        /// Number of registered simulations.
        len: usize,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::InvalidSelection { index, len } => write!(
                f,
                "Invalid simulation selection {} (registry holds {} simulations)",
                index, len
            ),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Errors that can occur while a simulation builds its initial state.
#[derive(Debug, Clone, PartialEq)]
pub enum InitError {
    /// The drawing surface has no area yet.
    DegenerateSurface {
        /// Reported width in pixels.
        width: f32,
        /// Reported height in pixels.
        height: f32,
    },
    /// A base configuration value cannot produce a valid layout.
    InvalidParam {
        /// Parameter name as listed by `Params::entries`.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::DegenerateSurface { width, height } => write!(
                f,
                "Surface has no drawable area ({}x{})",
                width, height
            ),
            InitError::InvalidParam { name, reason } => {
                write!(f, "Invalid parameter `{}`: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for InitError {}

/// Errors that can occur in the playback driver.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverError {
    /// Selection did not name a registered simulation.
    Registry(RegistryError),
    /// The new session could not be initialized; the previous one is intact.
    Initialization {
        /// Name of the simulation that failed.
        name: &'static str,
        /// Underlying failure.
        source: InitError,
    },
    /// The driver was stopped and accepts no further activations.
    Stopped,
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Registry(e) => write!(f, "Registry error: {}", e),
            DriverError::Initialization { name, source } => {
                write!(f, "Failed to initialize '{}': {}", name, source)
            }
            DriverError::Stopped => write!(f, "Playback driver has been stopped"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::Registry(e) => Some(e),
            DriverError::Initialization { source, .. } => Some(source),
            DriverError::Stopped => None,
        }
    }
}

impl From<RegistryError> for DriverError {
    fn from(e: RegistryError) -> Self {
        DriverError::Registry(e)
    }
}

/// Errors produced by the software raster surface.
#[derive(Debug)]
pub enum SurfaceError {
    /// Width or height was zero.
    ZeroSized,
    /// Failed to encode or write an image.
    Image(image::ImageError),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::ZeroSized => write!(f, "Pixel surface must have non-zero dimensions"),
            SurfaceError::Image(e) => write!(f, "Failed to write image: {}", e),
        }
    }
}

impl std::error::Error for SurfaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurfaceError::Image(e) => Some(e),
            SurfaceError::ZeroSized => None,
        }
    }
}

impl From<image::ImageError> for SurfaceError {
    fn from(e: image::ImageError) -> Self {
        SurfaceError::Image(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_invalid_selection_message() {
        let e = RegistryError::InvalidSelection { index: 30, len: 25 };
        assert_eq!(
            e.to_string(),
            "Invalid simulation selection 30 (registry holds 25 simulations)"
        );
    }

    #[test]
    fn test_driver_error_source_chain() {
        let e = DriverError::Initialization {
            name: "Wave Pool",
            source: InitError::DegenerateSurface { width: 0.0, height: 10.0 },
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("Wave Pool"));

        let from: DriverError = RegistryError::InvalidSelection { index: 1, len: 0 }.into();
        assert!(matches!(from, DriverError::Registry(_)));
    }
}
