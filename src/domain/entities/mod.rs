//! Domain entity definitions.

mod credentials;
pub mod product;
mod reminder;
mod session;

pub use credentials::Credentials;
pub use product::Product;
pub use reminder::{Reminder, ReminderId};
pub use session::{Session, SessionToken, UserRef};
