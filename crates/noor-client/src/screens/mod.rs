pub mod home;
pub mod login;
pub mod saved;

pub use home::HomeScreen;
pub use login::{LoginScreen, LoginView};
pub use saved::{SavedScreen, SavedView};
