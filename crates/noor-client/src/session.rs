use std::sync::Arc;

use tokio::sync::watch;
use uuid::Uuid;

use noor_types::api::SessionResponse;

/// The signed-in user as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub username: String,
    pub display_name: String,
    pub token: String,
}

impl From<SessionResponse> for Principal {
    fn from(res: SessionResponse) -> Self {
        Self {
            user_id: res.user_id,
            username: res.username,
            display_name: res.display_name,
            token: res.token,
        }
    }
}

/// Process-wide session cache. Sign-in and sign-out publish through it;
/// screens hold a [`SessionSubscription`] for as long as they are mounted.
#[derive(Clone)]
pub struct SessionProvider {
    tx: Arc<watch::Sender<Option<Principal>>>,
}

impl SessionProvider {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> Option<Principal> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub(crate) fn publish(&self, principal: Option<Principal>) {
        // send_replace stores the value even when nobody is subscribed
        self.tx.send_replace(principal);
    }
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// One consumer's view of the session. Dropping it unsubscribes.
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Principal>>,
}

impl SessionSubscription {
    /// Current session, marking it as seen.
    pub fn current(&mut self) -> Option<Principal> {
        self.rx.borrow_and_update().clone()
    }

    /// The session published since the last read, if it changed.
    pub fn take_change(&mut self) -> Option<Option<Principal>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.current()),
            _ => None,
        }
    }

    /// Wait for the next change. Returns `None` once the provider is gone.
    pub async fn changed(&mut self) -> Option<Option<Principal>> {
        self.rx.changed().await.ok()?;
        Some(self.current())
    }
}
