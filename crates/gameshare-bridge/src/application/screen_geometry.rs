//! ScreenGeometryProvider: the cached size of the display being driven.
//!
//! The OS is queried through a [`DisplayMetrics`] implementation supplied by
//! the infrastructure layer.  The result is cached so that every click does
//! not pay for a system call; [`ScreenGeometryProvider::refresh`] re-queries
//! on demand.

use std::sync::{Arc, PoisonError, RwLock};

use gameshare_core::{GeometryError, ScreenGeometry};
use thiserror::Error;
use tracing::{info, warn};

/// Error type for display metric queries.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The platform API call failed.
    #[error("platform API error while querying display metrics: {0}")]
    Platform(String),

    /// The platform offers no display metrics to this process.
    #[error("display metrics are not available on {0}")]
    Unsupported(&'static str),

    /// The platform reported a size no screen can have.
    #[error(transparent)]
    InvalidDimensions(#[from] GeometryError),
}

/// Queries the pixel size of the primary display.
pub trait DisplayMetrics: Send + Sync {
    /// Returns `(width, height)` of the primary display in pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError`] if the OS query fails.
    fn primary_dimensions(&self) -> Result<(u32, u32), ScreenInfoError>;
}

/// Caches the target display's geometry between explicit refreshes.
pub struct ScreenGeometryProvider {
    metrics: Arc<dyn DisplayMetrics>,
    cached: RwLock<ScreenGeometry>,
}

impl ScreenGeometryProvider {
    /// Creates a provider holding `fallback` without querying the OS.
    pub fn new(metrics: Arc<dyn DisplayMetrics>, fallback: ScreenGeometry) -> Self {
        Self {
            metrics,
            cached: RwLock::new(fallback),
        }
    }

    /// Creates a provider and performs the startup refresh.
    ///
    /// A failed query is logged and the provider keeps `fallback`.
    pub fn initialize(metrics: Arc<dyn DisplayMetrics>, fallback: ScreenGeometry) -> Self {
        let provider = Self::new(metrics, fallback);
        match provider.refresh() {
            Ok(geometry) => info!(
                "target display is {}x{} pixels",
                geometry.width(),
                geometry.height()
            ),
            Err(e) => warn!(
                "{e}; assuming {}x{} until the next refresh",
                fallback.width(),
                fallback.height()
            ),
        }
        provider
    }

    /// Re-queries the display size and replaces the cached geometry.
    ///
    /// On failure the previously cached geometry is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError`] if the query fails or reports a zero
    /// dimension.
    pub fn refresh(&self) -> Result<ScreenGeometry, ScreenInfoError> {
        let (width, height) = self.metrics.primary_dimensions()?;
        let geometry = ScreenGeometry::new(width, height)?;
        *self
            .cached
            .write()
            .unwrap_or_else(PoisonError::into_inner) = geometry;
        Ok(geometry)
    }

    /// Returns a snapshot of the cached geometry.
    pub fn current(&self) -> ScreenGeometry {
        *self.cached.read().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
