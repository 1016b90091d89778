//! Process-scoped owner of global shortcut registrations.
//!
//! UI mount cycles (and hot reload during development) can ask for the same
//! combo more than once without a matching release in between, while the
//! host rejects duplicate grabs. The registry therefore clears a combo before
//! binding it and treats "not registered" as success when releasing.

use crate::host::{ShortcutCallback, ShortcutError, ShortcutHost};
use crate::parser::{KeyCombo, parse_key_combo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// One combo owned by the registry.
#[derive(Clone)]
pub struct ShortcutBinding {
    pub combo: KeyCombo,
    pub handler: ShortcutCallback,
    /// Whether the host accepted the grab
    pub registered: bool,
}

impl std::fmt::Debug for ShortcutBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutBinding")
            .field("combo", &self.combo.to_string())
            .field("registered", &self.registered)
            .finish_non_exhaustive()
    }
}

/// Owns the host registrations for every configured global shortcut.
pub struct ShortcutRegistry<H> {
    host: Arc<H>,
    bindings: Mutex<HashMap<KeyCombo, ShortcutBinding>>,
    /// Bumped by every teardown so registrations that were in flight can
    /// notice they outlived their mount.
    epoch: AtomicU64,
}

impl<H> std::fmt::Debug for ShortcutRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShortcutRegistry")
            .field("bindings", &self.bindings.lock().len())
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl<H: ShortcutHost> ShortcutRegistry<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            bindings: Mutex::new(HashMap::new()),
            epoch: AtomicU64::new(0),
        }
    }

    /// The host this registry registers with.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Bind `combo` to `handler`.
    ///
    /// Any existing host registration for the combo is released first and a
    /// "not registered" answer is ignored, so calling this repeatedly for the
    /// same combo leaves exactly one grab. Returns the parsed combo.
    pub async fn register(
        &self,
        combo: &str,
        handler: ShortcutCallback,
    ) -> Result<KeyCombo, ShortcutError> {
        let parsed = parse_key_combo(combo).map_err(|source| ShortcutError::Parse {
            combo: combo.to_string(),
            source,
        })?;
        let epoch = self.epoch.load(Ordering::SeqCst);

        match self.host.unregister(&parsed).await {
            Ok(()) => log::debug!("Released previous registration of {}", parsed),
            Err(ShortcutError::NotRegistered(_)) => {}
            Err(e) => log::debug!("Ignoring failure releasing {}: {}", parsed, e),
        }

        let result = self.host.register(&parsed, Arc::clone(&handler)).await;

        if self.epoch.load(Ordering::SeqCst) != epoch {
            // Torn down while the host was answering; the grab must not survive
            if result.is_ok() {
                if let Err(e) = self.host.unregister(&parsed).await {
                    log::warn!("Failed to release {} after teardown: {}", parsed, e);
                }
            }
            log::debug!("Dropping registration of {} made during teardown", parsed);
            return Ok(parsed);
        }

        let registered = result.is_ok();
        self.bindings.lock().insert(
            parsed,
            ShortcutBinding {
                combo: parsed,
                handler,
                registered,
            },
        );

        match result {
            Ok(()) => {
                log::info!("Registered global shortcut {}", parsed);
                Ok(parsed)
            }
            Err(e) => {
                log::warn!("Global shortcut {} unavailable: {}", parsed, e);
                Err(e)
            }
        }
    }

    /// Release `combo`. Releasing a combo that is not registered is a no-op.
    pub async fn unregister(&self, combo: &KeyCombo) -> Result<(), ShortcutError> {
        self.bindings.lock().remove(combo);
        match self.host.unregister(combo).await {
            Ok(()) => {
                log::info!("Unregistered global shortcut {}", combo);
                Ok(())
            }
            Err(ShortcutError::NotRegistered(_)) => {
                log::debug!("Shortcut {} was not registered", combo);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Release every binding. Failures are logged, never returned.
    pub async fn teardown(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let combos: Vec<KeyCombo> = self.bindings.lock().keys().copied().collect();
        for combo in combos {
            if let Err(e) = self.unregister(&combo).await {
                log::warn!("Failed to unregister {}: {}", combo, e);
            }
        }
    }

    /// Whether `combo` is bound and the host accepted it.
    pub fn is_active(&self, combo: &KeyCombo) -> bool {
        self.bindings
            .lock()
            .get(combo)
            .is_some_and(|binding| binding.registered)
    }

    /// Number of bindings the host accepted.
    pub fn active_count(&self) -> usize {
        self.bindings
            .lock()
            .values()
            .filter(|binding| binding.registered)
            .count()
    }

    /// Snapshot of all bindings, including ones the host refused.
    pub fn bindings(&self) -> Vec<ShortcutBinding> {
        self.bindings.lock().values().cloned().collect()
    }
}

impl<H> Drop for ShortcutRegistry<H> {
    fn drop(&mut self) {
        let active = self
            .bindings
            .get_mut()
            .values()
            .filter(|binding| binding.registered)
            .count();
        if active > 0 {
            log::warn!(
                "Shortcut registry dropped with {} active registrations; call teardown() first",
                active
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InProcessHost;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, ShortcutCallback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&hits);
        (
            hits,
            Arc::new(move || {
                inner.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    #[tokio::test]
    async fn test_register_binds_handler() {
        let host = Arc::new(InProcessHost::new());
        let registry = ShortcutRegistry::new(Arc::clone(&host));
        let (hits, handler) = counter();

        let combo = registry.register("CmdOrCtrl+Shift+N", handler).await.unwrap();
        assert!(registry.is_active(&combo));
        assert!(host.trigger(&combo));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        registry.teardown().await;
    }

    #[tokio::test]
    async fn test_register_twice_leaves_one_binding() {
        let host = Arc::new(InProcessHost::new());
        let registry = ShortcutRegistry::new(Arc::clone(&host));
        let (hits, handler) = counter();

        registry
            .register("Ctrl+Shift+N", Arc::clone(&handler))
            .await
            .unwrap();
        let combo = registry.register("shift+ctrl+n", handler).await.unwrap();

        assert_eq!(host.registered_count(), 1);
        assert_eq!(registry.active_count(), 1);
        assert!(host.trigger(&combo));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        registry.teardown().await;
    }

    #[tokio::test]
    async fn test_unregister_when_not_registered_is_noop() {
        let registry = ShortcutRegistry::new(Arc::new(InProcessHost::new()));
        let combo = parse_key_combo("Ctrl+Q").unwrap();
        assert!(registry.unregister(&combo).await.is_ok());
    }

    #[tokio::test]
    async fn test_teardown_releases_everything() {
        let host = Arc::new(InProcessHost::new());
        let registry = ShortcutRegistry::new(Arc::clone(&host));
        let (_, handler) = counter();

        registry.register("Ctrl+1", Arc::clone(&handler)).await.unwrap();
        registry.register("Ctrl+2", handler).await.unwrap();
        assert_eq!(host.registered_count(), 2);

        registry.teardown().await;
        assert_eq!(host.registered_count(), 0);
        assert_eq!(registry.active_count(), 0);

        // A second teardown finds nothing to release
        registry.teardown().await;
    }

    #[tokio::test]
    async fn test_invalid_combo_is_parse_error() {
        let registry = ShortcutRegistry::new(Arc::new(InProcessHost::new()));
        let (_, handler) = counter();
        assert!(matches!(
            registry.register("Ctrl+", handler).await,
            Err(ShortcutError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_host_failure_is_recorded_inactive() {
        let host = Arc::new(InProcessHost::new());
        host.set_fail_registrations(true);
        let registry = ShortcutRegistry::new(Arc::clone(&host));
        let (_, handler) = counter();

        assert!(matches!(
            registry.register("Ctrl+H", Arc::clone(&handler)).await,
            Err(ShortcutError::Host(_))
        ));
        assert_eq!(registry.active_count(), 0);
        assert_eq!(registry.bindings().len(), 1);

        // Recovers once the host accepts grabs again
        host.set_fail_registrations(false);
        let combo = registry.register("Ctrl+H", handler).await.unwrap();
        assert!(registry.is_active(&combo));

        registry.teardown().await;
    }
}
