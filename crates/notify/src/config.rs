use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder values shipped in the sample configuration.
pub const PLACEHOLDER_SERVICE_ID: &str = "service_xxxxxxx";
pub const PLACEHOLDER_TEMPLATE_ID: &str = "template_xxxxxxx";
pub const PLACEHOLDER_PUBLIC_KEY: &str = "xxxxxxxxxxxxx";

pub const DEFAULT_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS account settings used for admin notifications and submitter confirmations.
///
/// # Example
/// ```
/// use notify::EmailConfig;
///
/// let cfg = EmailConfig {
///     service_id: "service_abc123".into(),
///     template_id: "template_suggestion".into(),
///     public_key: "pk_live_0123".into(),
///     ..Default::default()
/// };
/// assert!(cfg.is_configured());
/// assert!(!EmailConfig::default().is_configured());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EmailConfig {
    /// EmailJS service identifier.
    pub service_id: String,
    /// Template used for the administrator notification.
    pub template_id: String,
    /// Template used for the optional confirmation sent to the submitter.
    pub confirmation_template_id: String,
    /// EmailJS public key (a.k.a. user id).
    pub public_key: String,
    /// Recipient of admin notifications.
    pub admin_email: String,
    /// Send endpoint of the EmailJS REST API.
    pub api_url: String,
    /// Overall HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            service_id: PLACEHOLDER_SERVICE_ID.into(),
            template_id: PLACEHOLDER_TEMPLATE_ID.into(),
            confirmation_template_id: "template_confirmation".into(),
            public_key: PLACEHOLDER_PUBLIC_KEY.into(),
            admin_email: "votre-email@example.com".into(),
            api_url: DEFAULT_API_URL.into(),
            timeout_secs: 30,
        }
    }
}

impl EmailConfig {
    /// False while any credential is empty or still the sample placeholder.
    pub fn is_configured(&self) -> bool {
        is_set(&self.service_id, PLACEHOLDER_SERVICE_ID)
            && is_set(&self.template_id, PLACEHOLDER_TEMPLATE_ID)
            && is_set(&self.public_key, PLACEHOLDER_PUBLIC_KEY)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn is_set(value: &str, placeholder: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != placeholder
}
