//! Persisted representation of the pane layout.
//!
//! Each axis is stored under its own key (`layout.horizontal`,
//! `layout.vertical`) as a JSON array of percentages, next to whatever else
//! lives in the same store.

use crate::error::{ConfigError, LayoutLoadError, LayoutSaveError};
use crate::layout::{Axis, LayoutConfig};
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Reads and writes [`LayoutConfig`] through a [`KeyValueStore`].
#[derive(Debug)]
pub struct LayoutStore<S> {
    store: Arc<S>,
}

impl<S> Clone for LayoutStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> LayoutStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub fn inner(&self) -> &Arc<S> {
        &self.store
    }

    /// Read both axes.
    ///
    /// Fails when either key is absent, cannot be parsed as a list of
    /// numbers, or does not pass [`crate::layout::validate_axis`]. The
    /// returned layout is renormalized.
    pub async fn load(&self) -> Result<LayoutConfig, LayoutLoadError> {
        let horizontal = self.load_axis(Axis::Horizontal).await?;
        let vertical = self.load_axis(Axis::Vertical).await?;
        LayoutConfig::from_axes(&horizontal, &vertical)
    }

    async fn load_axis(&self, axis: Axis) -> Result<Vec<f32>, LayoutLoadError> {
        let key = axis.store_key();
        let value = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| ConfigError::Missing(key.to_string()))?;
        let sizes: Vec<f32> = serde_json::from_value(value)?;
        Ok(sizes)
    }

    /// Write both axes.
    pub async fn save(&self, layout: &LayoutConfig) -> Result<(), LayoutSaveError> {
        for axis in Axis::ALL {
            let value = serde_json::to_value(layout.sizes(axis))?;
            self.store.set(axis.store_key(), value).await?;
        }
        Ok(())
    }
}
