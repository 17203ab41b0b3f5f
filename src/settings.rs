//! Application settings, read from the Rocket figment.
//!
//! Values come from `Rocket.toml` and can be overridden with `ROCKET_`
//! prefixed environment variables, e.g. `ROCKET_TWILIO_AUTH_TOKEN`.

use rocket::fairing::AdHoc;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Key the messaging provider signs webhook requests with.
    pub twilio_auth_token: Option<String>,
    /// Reject webhook requests whose signature does not verify.
    pub validate_signatures: bool,
    /// Externally visible base URL, e.g. `https://rsvp.example.com`.
    pub public_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            twilio_auth_token: None,
            validate_signatures: true,
            public_url: None,
        }
    }
}

impl Settings {
    pub fn check(&self) -> Result<(), String> {
        if self.validate_signatures && self.twilio_auth_token.is_none() {
            return Err("`validate_signatures` is on but no `twilio_auth_token` is set".to_string());
        }
        Ok(())
    }
}

/// Extracts, checks and manages [`Settings`].
pub fn fairing() -> AdHoc {
    AdHoc::try_on_ignite("Application settings", |rocket| async move {
        let settings = match rocket.figment().extract::<Settings>() {
            Ok(settings) => settings,
            Err(e) => {
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        if let Err(msg) = settings.check() {
            log::error!("invalid settings: {}", msg);
            return Err(rocket);
        }
        if !settings.validate_signatures {
            log::warn!("webhook signature validation is disabled");
        }
        Ok(rocket.manage(settings))
    })
}
