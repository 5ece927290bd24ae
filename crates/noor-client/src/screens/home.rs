use tracing::{error, warn};
use uuid::Uuid;

use noor_types::models::SavedDua;

use crate::client::NoorClient;
use crate::emotions::Emotion;
use crate::notice::Notice;
use crate::session::{Principal, SessionSubscription};

/// Entries shown in the quick-access saved panel.
pub const QUICK_PANEL_LIMIT: usize = 3;

/// Home screen: pick a feeling, generate a dua, keep it.
///
/// The saved list is a local projection of the store. It is replaced by a
/// full query whenever a principal becomes present and patched in place by
/// save and delete.
pub struct HomeScreen {
    client: NoorClient,
    subscription: Option<SessionSubscription>,
    feeling: String,
    response: Option<String>,
    principal: Option<Principal>,
    saved: Vec<SavedDua>,
    show_saved: bool,
    notices: Vec<Notice>,
}

impl HomeScreen {
    pub fn new(client: NoorClient) -> Self {
        Self {
            client,
            subscription: None,
            feeling: String::new(),
            response: None,
            principal: None,
            saved: Vec::new(),
            show_saved: false,
            notices: Vec::new(),
        }
    }

    // -- Lifecycle --

    pub async fn mount(&mut self) {
        let mut subscription = self.client.session().subscribe();
        let current = subscription.current();
        self.subscription = Some(subscription);
        self.apply_session(current).await;
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Apply a session change that was published since the last look.
    /// Returns false when nothing changed or the screen is not mounted.
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

    /// Wait for the next session change and apply it.
    pub async fn next_session_change(&mut self) -> bool {
        let change = match self.subscription.as_mut() {
            Some(subscription) => subscription.changed().await,
            None => None,
        };
        match change {
            Some(principal) => {
                self.apply_session(principal).await;
                true
            }
            None => false,
        }
    }

    async fn apply_session(&mut self, principal: Option<Principal>) {
        let same_owner = matches!(
            (&self.principal, &principal),
            (Some(old), Some(new)) if old.user_id == new.user_id
        );
        if !same_owner {
            self.saved.clear();
        }
        self.principal = principal;

        let Some(principal) = self.principal.as_ref() else {
            return;
        };
        match self.client.list_duas(principal).await {
            Ok(duas) => self.saved = duas,
            Err(e) => {
                error!("Failed to load saved duas: {}", e);
                self.notices.push(Notice::error("Failed to load saved duas."));
            }
        }
    }

    // -- Actions --

    pub fn select_emotion(&mut self, emotion: Emotion) {
        self.feeling = emotion.label().to_string();
    }

    pub fn set_feeling(&mut self, text: impl Into<String>) {
        self.feeling = text.into();
    }

    pub async fn generate(&mut self) {
        if self.feeling.trim().is_empty() {
            self.notices.push(Notice::info("Please select or describe your feeling."));
            return;
        }

        match self.client.get_dua(&self.feeling).await {
            Ok(message) => self.response = Some(message),
            Err(e) => {
                error!("Failed to fetch dua: {}", e);
                self.notices.push(Notice::error("Failed to fetch dua."));
            }
        }
    }

    pub async fn save(&mut self) {
        let Some(principal) = self.principal.as_ref() else {
            self.notices.push(Notice::blocking("Please log in to save your dua."));
            return;
        };
        let Some(content) = self.response.as_deref().filter(|r| !r.is_empty()) else {
            self.notices.push(Notice::info("Generate a dua first."));
            return;
        };

        match self.client.save_dua(principal, content).await {
            Ok(dua) => {
                self.saved.insert(0, dua);
                self.notices.push(Notice::success("Dua saved successfully!"));
            }
            Err(e) => {
                error!("Failed to save dua: {}", e);
                self.notices.push(Notice::error("Failed to save the dua."));
            }
        }
    }

    /// Remove a saved dua. The local entry goes first and is not restored
    /// if the store rejects the delete.
    pub async fn delete(&mut self, id: Uuid) {
        let Some(principal) = self.principal.as_ref() else {
            self.notices.push(Notice::blocking("Please log in to manage your duas."));
            return;
        };

        self.saved.retain(|d| d.id != id);

        match self.client.delete_dua(principal, id).await {
            Ok(()) => self.notices.push(Notice::success("Dua deleted")),
            Err(e) => {
                warn!("Delete error for {}: {}", id, e);
                self.notices.push(Notice::error("Failed to delete"));
            }
        }
    }

    pub fn toggle_saved_panel(&mut self) {
        self.show_saved = !self.show_saved;
    }

    // -- View state --

    pub fn feeling(&self) -> &str {
        &self.feeling
    }

    pub fn selected_emotion(&self) -> Option<Emotion> {
        Emotion::ALL.into_iter().find(|e| e.label() == self.feeling)
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn saved(&self) -> &[SavedDua] {
        &self.saved
    }

    /// The saved panel only exists while someone is signed in.
    pub fn saved_panel_visible(&self) -> bool {
        self.principal.is_some() && self.show_saved
    }

    /// Most recent saved duas for the quick-access panel.
    pub fn quick_panel(&self) -> &[SavedDua] {
        if self.principal.is_none() {
            return &[];
        }
        &self.saved[..self.saved.len().min(QUICK_PANEL_LIMIT)]
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
