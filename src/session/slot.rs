//! Ownership-tagged storage for the session's config.

use crate::config::{SessionConfig, SharedConfig};

/// Where the session's config lives.
///
/// An `Owned` config belongs to the session, which resets it on shutdown.
/// A `Borrowed` config belongs to whoever handed it over; the session reads
/// and updates it in place but never tears it down.
#[derive(Debug)]
pub(crate) enum ConfigSlot {
    Owned(SessionConfig),
    Borrowed(SharedConfig),
}

impl ConfigSlot {
    /// Copy of the current state. Borrowed configs are locked only for the
    /// duration of the copy.
    pub(crate) fn snapshot(&self) -> SessionConfig {
        match self {
            ConfigSlot::Owned(config) => *config,
            ConfigSlot::Borrowed(shared) => *shared.lock(),
        }
    }

    pub(crate) fn update<R>(&mut self, f: impl FnOnce(&mut SessionConfig) -> R) -> R {
        match self {
            ConfigSlot::Owned(config) => f(config),
            ConfigSlot::Borrowed(shared) => {
                let mut guard = shared.lock();
                f(&mut *guard)
            }
        }
    }

    pub(crate) fn is_borrowed(&self) -> bool {
        matches!(self, ConfigSlot::Borrowed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TransportHandle, level::NetLevel};

    #[test]
    fn borrowed_updates_are_visible_to_the_owner() {
        let shared = SessionConfig::default().into_shared();
        let mut slot = ConfigSlot::Borrowed(shared.clone());
        slot.update(|c| c.log_level = NetLevel::Debug);
        assert_eq!(shared.lock().log_level, NetLevel::Debug);
        assert!(slot.is_borrowed());
    }

    #[test]
    fn owned_snapshot_is_a_copy() {
        let mut slot = ConfigSlot::Owned(SessionConfig::default());
        let before = slot.snapshot();
        slot.update(|c| c.handle = TransportHandle::from_raw(7));
        assert_eq!(before.handle, TransportHandle::INVALID);
        assert_eq!(slot.snapshot().handle, TransportHandle::from_raw(7));
        assert!(!slot.is_borrowed());
    }
}
