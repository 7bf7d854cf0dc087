use tracing::Level;
use url::Url;

/// Identity stamped on every alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServiceIdentity {
    pub(crate) service_name: String,
    pub(crate) stage: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone)]
pub(crate) struct DiscordAlertSettings {
    pub(crate) webhook_url: Url,
    pub(crate) min_level: Level,
}

#[derive(Debug, Clone)]
pub(crate) struct AlertSettings {
    pub(crate) identity: ServiceIdentity,
    pub(crate) discord: Option<DiscordAlertSettings>,
    /// Held back until the subscriber is installed.
    pub(crate) warnings: Vec<String>,
}

impl AlertSettings {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(component: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let component = component.trim().to_string();

        let identity = ServiceIdentity {
            service_name: non_empty("SERVICE_NAME").unwrap_or_else(|| component.clone()),
            stage: non_empty("STAGE").unwrap_or_else(|| "unknown".to_string()),
            component,
        };

        let mut warnings = Vec::new();
        let enabled = non_empty("DISCORD_NOTIFY_ENABLED")
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(true);

        let webhook_url = match non_empty("DISCORD_WEBHOOK_URL") {
            Some(raw) if enabled => match Url::parse(&raw) {
                Ok(url) => Some(url),
                Err(err) => {
                    // The raw value carries the webhook token; never echo it.
                    warnings.push(format!(
                        "DISCORD_WEBHOOK_URL is invalid ({err}); Discord alerts disabled"
                    ));
                    None
                }
            },
            _ => None,
        };

        let discord = webhook_url.map(|webhook_url| {
            let min_level = match non_empty("DISCORD_NOTIFY_LEVEL") {
                None => Level::ERROR,
                Some(raw) => parse_level(&raw).unwrap_or_else(|| {
                    warnings.push(format!(
                        "DISCORD_NOTIFY_LEVEL={raw} is not a level; using ERROR"
                    ));
                    Level::ERROR
                }),
            };
            DiscordAlertSettings {
                webhook_url,
                min_level,
            }
        });

        Self {
            identity,
            discord,
            warnings,
        }
    }
}

pub(crate) fn parse_level(input: &str) -> Option<Level> {
    match input.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

fn parse_flag(input: &str) -> Option<bool> {
    match input.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AlertSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AlertSettings::from_lookup("reminder-worker", |key| vars.get(key).cloned())
    }

    #[test]
    fn identity_defaults_to_component_and_unknown_stage() {
        let settings = settings(&[]);
        assert_eq!(settings.identity.service_name, "reminder-worker");
        assert_eq!(settings.identity.stage, "unknown");
        assert!(settings.discord.is_none());
        assert!(settings.warnings.is_empty());
    }

    #[test]
    fn webhook_enables_discord_at_error_level() {
        let settings = settings(&[
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("STAGE", "production"),
        ]);
        let discord = settings.discord.unwrap();
        assert_eq!(discord.min_level, Level::ERROR);
        assert_eq!(settings.identity.stage, "production");
    }

    #[test]
    fn disabled_flag_wins_over_webhook() {
        let settings = settings(&[
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("DISCORD_NOTIFY_ENABLED", "off"),
        ]);
        assert!(settings.discord.is_none());
    }

    #[test]
    fn bad_values_become_warnings_without_leaking_the_url() {
        let settings = settings(&[("DISCORD_WEBHOOK_URL", "not a url/secret-token")]);
        assert!(settings.discord.is_none());
        assert_eq!(settings.warnings.len(), 1);
        assert!(!settings.warnings[0].contains("secret-token"));

        let settings = settings_with_level("loud");
        assert_eq!(settings.discord.unwrap().min_level, Level::ERROR);
        assert_eq!(settings.warnings.len(), 1);
    }

    fn settings_with_level(level: &str) -> AlertSettings {
        settings(&[
            ("DISCORD_WEBHOOK_URL", "https://discord.com/api/webhooks/1/abc"),
            ("DISCORD_NOTIFY_LEVEL", level),
        ])
    }

    #[test]
    fn level_names_are_case_insensitive() {
        assert_eq!(parse_level("WARNING"), Some(Level::WARN));
        assert_eq!(parse_level(" debug "), Some(Level::DEBUG));
        assert_eq!(parse_level("fatal"), None);
    }
}
