mod input;
mod snackbar;

pub use input::TextInput;
pub use snackbar::{Snackbar, SnackbarLevel};
