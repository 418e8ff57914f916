//! UI screens.

mod app;
mod auth_screen;
mod home_screen;
mod principal_screen;

pub use app::{App, AppSettings};
pub use auth_screen::{AuthAction, AuthScreen};
pub use home_screen::{HomeAction, HomeScreen};
pub use principal_screen::{PrincipalAction, PrincipalScreen};
