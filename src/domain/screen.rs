//! Named application screens.

use std::fmt;
use std::str::FromStr;

/// Navigation destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Login,
    Register,
    Recover,
    Principal,
}

impl Screen {
    /// Returns the stable route name.
    #[must_use]
    pub const fn route(self) -> &'static str {
        match self {
            Self::Home => "homeRoot",
            Self::Login => "login",
            Self::Register => "registrarse",
            Self::Recover => "recuperarContrasena",
            Self::Principal => "principal",
        }
    }

    /// Returns the screen title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Bakery APP",
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Recover => "Recover password",
            Self::Principal => "Principal",
        }
    }

    /// Returns whether the screen hosts an authentication form.
    #[must_use]
    pub const fn is_auth_form(self) -> bool {
        matches!(self, Self::Login | Self::Register | Self::Recover)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for Screen {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "homeRoot" => Ok(Self::Home),
            "login" => Ok(Self::Login),
            "registrarse" => Ok(Self::Register),
            "recuperarContrasena" => Ok(Self::Recover),
            "principal" => Ok(Self::Principal),
            other => Err(format!("unknown route: {other}")),
        }
    }
}
