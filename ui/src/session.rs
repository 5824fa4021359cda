use color_eyre::Result;
use keyring::Entry;

use types::domain::Session;

const SERVICE: &str = "authform";
const USER: &str = "session";

/// Durable home of the session flag. Pages other than the forms read it to
/// decide whether to show signed-in UI.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn record_login(&self, email: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Keeps the session as JSON in the OS keyring.
pub struct KeyringSessionStore {
    entry: Entry,
}

impl KeyringSessionStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            entry: Entry::new(SERVICE, USER)?,
        })
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        match self.entry.get_password() {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn record_login(&self, email: &str) -> Result<()> {
        let session = Session {
            logged_in: true,
            email: email.to_string(),
        };
        self.entry.set_password(&serde_json::to_string(&session)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub mod memory {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemorySessionStore {
        session: Mutex<Option<Session>>,
    }

    impl SessionStore for MemorySessionStore {
        fn load(&self) -> Result<Option<Session>> {
            Ok(self.session.lock().unwrap().clone())
        }

        fn record_login(&self, email: &str) -> Result<()> {
            *self.session.lock().unwrap() = Some(Session {
                logged_in: true,
                email: email.to_string(),
            });
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_store() -> KeyringSessionStore {
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringSessionStore::new().unwrap()
    }

    #[test]
    fn test_keyring_store_round_trip() -> Result<()> {
        let store = mock_store();
        assert_eq!(store.load()?, None);

        store.record_login("a@b.com")?;
        assert_eq!(
            store.load()?,
            Some(Session {
                logged_in: true,
                email: "a@b.com".to_string(),
            })
        );

        store.clear()?;
        assert_eq!(store.load()?, None);
        Ok(())
    }

    #[test]
    fn test_clearing_empty_store_is_ok() -> Result<()> {
        mock_store().clear()
    }
}
