use tracing::error;

use noor_types::models::SavedDua;

use crate::client::NoorClient;
use crate::notice::Notice;
use crate::session::{Principal, SessionSubscription};

#[derive(Debug, PartialEq, Eq)]
pub enum SavedView<'a> {
    /// Session state not resolved yet.
    Loading,
    LoginRequired,
    List(&'a [SavedDua]),
}

/// Full list of the principal's saved duas.
pub struct SavedScreen {
    client: NoorClient,
    subscription: Option<SessionSubscription>,
    resolved: bool,
    principal: Option<Principal>,
    duas: Vec<SavedDua>,
    notices: Vec<Notice>,
}

impl SavedScreen {
    pub fn new(client: NoorClient) -> Self {
        Self {
            client,
            subscription: None,
            resolved: false,
            principal: None,
            duas: Vec::new(),
            notices: Vec::new(),
        }
    }

    pub async fn mount(&mut self) {
        let mut subscription = self.client.session().subscribe();
        let current = subscription.current();
        self.subscription = Some(subscription);
        self.apply_session(current).await;
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    pub async fn sync_session(&mut self) -> bool {
        let change = self.subscription.as_mut().and_then(|s| s.take_change());
        match change {
            Some(principal) => {
                self.apply_session(principal).await;
                true
            }
            None => false,
        }
    }

    async fn apply_session(&mut self, principal: Option<Principal>) {
        // Rows belong to whoever was signed in when they were loaded.
        let same_owner = matches!(
            (&self.principal, &principal),
            (Some(old), Some(new)) if old.user_id == new.user_id
        );
        if !same_owner {
            self.duas.clear();
        }
        self.principal = principal;

        if let Some(principal) = self.principal.as_ref() {
            match self.client.list_duas(principal).await {
                Ok(duas) => self.duas = duas,
                Err(e) => {
                    error!("Failed to load saved duas: {}", e);
                    self.notices.push(Notice::error("Failed to load saved duas."));
                }
            }
        }

        self.resolved = true;
    }

    /// Ends the session. The list stays as loaded; the view switches once
    /// the change is synced.
    pub fn sign_out(&mut self) {
        self.client.sign_out();
    }

    pub fn view(&self) -> SavedView<'_> {
        if !self.resolved {
            return SavedView::Loading;
        }
        match self.principal {
            Some(_) => SavedView::List(&self.duas),
            None => SavedView::LoginRequired,
        }
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
