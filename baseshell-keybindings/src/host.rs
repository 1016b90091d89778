//! Global shortcut host collaborator.
//!
//! The host is the OS-level facility that owns key grabs. It rejects
//! duplicate registrations and reports unknown combos on unregister, which is
//! why [`crate::ShortcutRegistry`] always clears a combo before binding it.

use crate::parser::{KeyCombo, ParseError, ParsedKey};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;

/// Callback invoked by the host when a bound combo is pressed.
///
/// Hosts may call it from any thread.
pub type ShortcutCallback = Arc<dyn Fn() + Send + Sync>;

/// Errors reported by shortcut registration.
#[derive(Debug, Error)]
pub enum ShortcutError {
    /// The combo string could not be parsed.
    #[error("invalid shortcut '{combo}': {source}")]
    Parse {
        combo: String,
        #[source]
        source: ParseError,
    },

    /// The host already holds a registration for this combo.
    #[error("shortcut {0} is already registered")]
    AlreadyRegistered(KeyCombo),

    /// The host holds no registration for this combo.
    #[error("shortcut {0} is not registered")]
    NotRegistered(KeyCombo),

    /// The host cannot grab this combo.
    #[error("shortcut {0} is not supported by the host")]
    Unsupported(KeyCombo),

    /// Any other host failure.
    #[error("shortcut host failure: {0}")]
    Host(String),
}

/// OS-level global shortcut facility.
pub trait ShortcutHost: Send + Sync + 'static {
    /// Grab `combo` and call `callback` whenever it is pressed.
    fn register(
        &self,
        combo: &KeyCombo,
        callback: ShortcutCallback,
    ) -> impl Future<Output = Result<(), ShortcutError>> + Send;

    /// Release the grab on `combo`.
    fn unregister(&self, combo: &KeyCombo) -> impl Future<Output = Result<(), ShortcutError>> + Send;
}

/// Host that keeps grabs inside the process.
///
/// Behaves like a platform facility: duplicate registration and unregistering
/// an unknown combo are errors, and bare keys other than F1-F12 cannot be
/// grabbed globally. [`InProcessHost::trigger`] stands in for the OS
/// delivering a key press.
#[derive(Default)]
pub struct InProcessHost {
    grabs: Mutex<HashMap<KeyCombo, ShortcutCallback>>,
    register_calls: AtomicUsize,
    fail_registrations: AtomicBool,
}

impl std::fmt::Debug for InProcessHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InProcessHost")
            .field("grabs", &self.grabs.lock().len())
            .field("register_calls", &self.register_calls.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl InProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent registrations fail with a host error.
    pub fn set_fail_registrations(&self, fail: bool) {
        self.fail_registrations.store(fail, Ordering::SeqCst);
    }

    pub fn is_registered(&self, combo: &KeyCombo) -> bool {
        self.grabs.lock().contains_key(combo)
    }

    /// Number of combos currently grabbed.
    pub fn registered_count(&self) -> usize {
        self.grabs.lock().len()
    }

    /// Number of `register` calls received, successful or not.
    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    /// Simulate a key press. Returns false if nothing is bound to `combo`.
    pub fn trigger(&self, combo: &KeyCombo) -> bool {
        // Clone out of the lock so the callback may re-enter the host
        let callback = self.grabs.lock().get(combo).cloned();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    fn is_grabbable(combo: &KeyCombo) -> bool {
        combo.modifiers.any() || matches!(combo.key, ParsedKey::Named(n) if n.is_function_key())
    }
}

impl ShortcutHost for InProcessHost {
    fn register(
        &self,
        combo: &KeyCombo,
        callback: ShortcutCallback,
    ) -> impl Future<Output = Result<(), ShortcutError>> + Send {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        let result = if self.fail_registrations.load(Ordering::SeqCst) {
            Err(ShortcutError::Host(format!("cannot grab {}", combo)))
        } else if !Self::is_grabbable(combo) {
            Err(ShortcutError::Unsupported(*combo))
        } else {
            let mut grabs = self.grabs.lock();
            if grabs.contains_key(combo) {
                Err(ShortcutError::AlreadyRegistered(*combo))
            } else {
                grabs.insert(*combo, callback);
                Ok(())
            }
        };
        async move { result }
    }

    fn unregister(&self, combo: &KeyCombo) -> impl Future<Output = Result<(), ShortcutError>> + Send {
        let result = match self.grabs.lock().remove(combo) {
            Some(_) => Ok(()),
            None => Err(ShortcutError::NotRegistered(*combo)),
        };
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_key_combo;

    fn noop() -> ShortcutCallback {
        Arc::new(|| {})
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_error() {
        let host = InProcessHost::new();
        let combo = parse_key_combo("Ctrl+K").unwrap();

        host.register(&combo, noop()).await.unwrap();
        assert!(matches!(
            host.register(&combo, noop()).await,
            Err(ShortcutError::AlreadyRegistered(_))
        ));
        assert_eq!(host.registered_count(), 1);
    }

    #[tokio::test]
    async fn test_unregister_unknown_is_error() {
        let host = InProcessHost::new();
        let combo = parse_key_combo("Ctrl+K").unwrap();
        assert!(matches!(
            host.unregister(&combo).await,
            Err(ShortcutError::NotRegistered(_))
        ));
    }

    #[tokio::test]
    async fn test_bare_keys_unsupported() {
        let host = InProcessHost::new();
        let bare = parse_key_combo("K").unwrap();
        let function = parse_key_combo("F5").unwrap();

        assert!(matches!(
            host.register(&bare, noop()).await,
            Err(ShortcutError::Unsupported(_))
        ));
        assert!(host.register(&function, noop()).await.is_ok());
    }

    #[tokio::test]
    async fn test_trigger_invokes_callback() {
        let host = InProcessHost::new();
        let combo = parse_key_combo("Alt+Space").unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        host.register(
            &combo,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .await
        .unwrap();

        assert!(host.trigger(&combo));
        assert!(host.trigger(&combo));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(!host.trigger(&parse_key_combo("Alt+X").unwrap()));
    }
}
