//! Client-held state shared between pages through the two storage scopes.
//!
//! The key names are the only contract between pages: the login page writes
//! the session keys, the profile and home pages read them, the booking page
//! writes the pending booking and the confirmation page consumes it.

use crate::errors::StorageError;
use crate::models::{AppointmentSnapshot, PendingBooking, SessionRecord};
use crate::storage::{KeyValueStore, MemoryStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

pub const USER_EMAIL: &str = "userEmail";
pub const USER_ID: &str = "userId";
pub const IS_ADMIN: &str = "isAdmin";
pub const REGISTRATION_KEY: &str = "registrationKey";
pub const APPOINTMENT_DATA: &str = "appointmentData";

pub const SESSION_KEYS: [&str; 3] = [USER_EMAIL, USER_ID, IS_ADMIN];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    /// Survives a restart of the client.
    Durable,
    /// Cleared when the client goes away.
    Ephemeral,
}

impl StorageScope {
    /// "Remember me" picks the durable scope.
    pub fn for_remember(remember: bool) -> Self {
        if remember { Self::Durable } else { Self::Ephemeral }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Durable => Self::Ephemeral,
            Self::Ephemeral => Self::Durable,
        }
    }
}

#[derive(Clone)]
pub struct ClientState {
    durable: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
}

impl ClientState {
    pub fn new(durable: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, ephemeral }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()), Arc::new(MemoryStore::default()))
    }

    pub fn store(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Ephemeral => self.ephemeral.as_ref(),
        }
    }

    /// Reads `key` from the ephemeral scope, falling back to the durable one.
    /// Empty values count as absent.
    pub fn lookup(&self, key: &str) -> Option<String> {
        [StorageScope::Ephemeral, StorageScope::Durable]
            .into_iter()
            .filter_map(|scope| self.store(scope).get(key))
            .find(|value| !value.is_empty())
    }

    /// Writes the session into `scope` and drops any copy left in the other
    /// scope, so only one of them is ever authoritative.
    pub fn save_session(
        &self,
        scope: StorageScope,
        record: &SessionRecord,
    ) -> Result<(), StorageError> {
        let store = self.store(scope);
        store.set(USER_EMAIL, &record.user_email)?;
        store.set(USER_ID, &record.user_id)?;
        store.set(IS_ADMIN, if record.is_admin { "true" } else { "false" })?;

        let stale = self.store(scope.other());
        for key in SESSION_KEYS {
            stale.remove(key)?;
        }
        Ok(())
    }

    pub fn clear_session(&self) -> Result<(), StorageError> {
        for scope in [StorageScope::Ephemeral, StorageScope::Durable] {
            for key in SESSION_KEYS {
                self.store(scope).remove(key)?;
            }
        }
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        [StorageScope::Ephemeral, StorageScope::Durable]
            .into_iter()
            .any(|scope| self.store(scope).get(IS_ADMIN).as_deref() == Some("true"))
    }

    pub fn remembered_email(&self) -> Option<String> {
        self.durable.get(USER_EMAIL).filter(|email| !email.is_empty())
    }

    pub fn stash_pending_booking(
        &self,
        registration_key: &str,
        appointment: &AppointmentSnapshot,
    ) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(appointment)?;
        self.ephemeral.set(REGISTRATION_KEY, registration_key)?;
        self.ephemeral.set(APPOINTMENT_DATA, &encoded)?;
        Ok(())
    }

    pub fn pending_booking(&self) -> Option<PendingBooking> {
        let registration_key = self
            .ephemeral
            .get(REGISTRATION_KEY)
            .filter(|key| !key.is_empty())?;
        let raw = self.ephemeral.get(APPOINTMENT_DATA)?;
        match serde_json::from_str(&raw) {
            Ok(appointment) => Some(PendingBooking {
                registration_key,
                appointment,
            }),
            Err(err) => {
                warn!("discarding unreadable {APPOINTMENT_DATA}: {err}");
                None
            }
        }
    }

    pub fn clear_pending_booking(&self) -> Result<(), StorageError> {
        self.ephemeral.remove(REGISTRATION_KEY)?;
        self.ephemeral.remove(APPOINTMENT_DATA)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleType;

    fn record(is_admin: bool) -> SessionRecord {
        SessionRecord {
            user_email: "resident@example.com".into(),
            user_id: "12".into(),
            is_admin,
        }
    }

    #[test]
    fn save_session_keeps_a_single_scope() {
        let client = ClientState::in_memory();
        client.save_session(StorageScope::Ephemeral, &record(false)).unwrap();
        client.save_session(StorageScope::Durable, &record(true)).unwrap();

        for key in SESSION_KEYS {
            assert!(client.store(StorageScope::Durable).get(key).is_some());
            assert!(client.store(StorageScope::Ephemeral).get(key).is_none());
        }
        assert_eq!(
            client.store(StorageScope::Durable).get(IS_ADMIN).as_deref(),
            Some("true")
        );
        assert!(client.is_admin());
    }

    #[test]
    fn lookup_prefers_ephemeral_and_skips_empty() {
        let client = ClientState::in_memory();
        client.store(StorageScope::Durable).set(USER_ID, "durable").unwrap();
        assert_eq!(client.lookup(USER_ID).as_deref(), Some("durable"));

        client.store(StorageScope::Ephemeral).set(USER_ID, "").unwrap();
        assert_eq!(client.lookup(USER_ID).as_deref(), Some("durable"));

        client.store(StorageScope::Ephemeral).set(USER_ID, "ephemeral").unwrap();
        assert_eq!(client.lookup(USER_ID).as_deref(), Some("ephemeral"));
    }

    #[test]
    fn clear_session_empties_both_scopes() {
        let client = ClientState::in_memory();
        client.save_session(StorageScope::Durable, &record(false)).unwrap();
        client.store(StorageScope::Ephemeral).set(USER_EMAIL, "x@example.com").unwrap();
        client.clear_session().unwrap();
        for key in SESSION_KEYS {
            assert_eq!(client.lookup(key), None);
        }
    }

    #[test]
    fn pending_booking_requires_both_keys() {
        let client = ClientState::in_memory();
        let snapshot = AppointmentSnapshot {
            date: "2025-06-02".into(),
            time: "09:30".into(),
            registration_plate: "AB12CDE".into(),
            vehicle_type: VehicleType::Regular,
        };
        client.stash_pending_booking("K3Y5ABCD", &snapshot).unwrap();
        assert_eq!(
            client.pending_booking(),
            Some(PendingBooking {
                registration_key: "K3Y5ABCD".into(),
                appointment: snapshot,
            })
        );

        client.store(StorageScope::Ephemeral).remove(APPOINTMENT_DATA).unwrap();
        assert_eq!(client.pending_booking(), None);

        client.store(StorageScope::Ephemeral).set(APPOINTMENT_DATA, "{broken").unwrap();
        assert_eq!(client.pending_booking(), None);

        client.clear_pending_booking().unwrap();
        assert_eq!(client.store(StorageScope::Ephemeral).get(REGISTRATION_KEY), None);
    }
}
