use tracing::error;

use crate::client::NoorClient;
use crate::notice::Notice;
use crate::session::{Principal, SessionSubscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginView {
    SignIn,
    Welcome { display_name: String },
}

pub struct LoginScreen {
    client: NoorClient,
    subscription: Option<SessionSubscription>,
    principal: Option<Principal>,
    notices: Vec<Notice>,
}

impl LoginScreen {
    pub fn new(client: NoorClient) -> Self {
        Self {
            client,
            subscription: None,
            principal: None,
            notices: Vec::new(),
        }
    }

    pub fn mount(&mut self) {
        let mut subscription = self.client.session().subscribe();
        self.principal = subscription.current();
        self.subscription = Some(subscription);
    }

    pub fn unmount(&mut self) {
        self.subscription = None;
    }

    pub fn sync_session(&mut self) -> bool {
        match self.subscription.as_mut().and_then(|s| s.take_change()) {
            Some(principal) => {
                self.principal = principal;
                true
            }
            None => false,
        }
    }

    pub async fn sign_in(&mut self, username: &str, password: &str) {
        match self.client.sign_in(username, password).await {
            Ok(principal) => self.principal = Some(principal),
            Err(e) => {
                error!("Login error: {}", e);
                self.notices.push(Notice::error("Sign in failed."));
            }
        }
    }

    pub async fn register(&mut self, username: &str, display_name: &str, password: &str) {
        match self.client.register(username, display_name, password).await {
            Ok(principal) => self.principal = Some(principal),
            Err(e) => {
                error!("Registration error: {}", e);
                let text = match e.status() {
                    Some(409) => "That username is taken.",
                    Some(400) => "Check your username, name and password.",
                    _ => "Registration failed.",
                };
                self.notices.push(Notice::error(text));
            }
        }
    }

    pub fn sign_out(&mut self) {
        self.client.sign_out();
        self.principal = None;
    }

    pub fn view(&self) -> LoginView {
        match &self.principal {
            Some(p) => LoginView::Welcome {
                display_name: p.display_name.clone(),
            },
            None => LoginView::SignIn,
        }
    }

    pub fn greeting(&self) -> Option<String> {
        self.principal
            .as_ref()
            .map(|p| format!("Welcome, {}", p.display_name))
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
