use anyhow::{Result, bail};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Local,
    Development,
    Production,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Stage::Local => "local",
            Stage::Development => "development",
            Stage::Production => "production",
        };
        write!(f, "{stage}")
    }
}

impl TryFrom<&str> for Stage {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Stage::Local),
            "development" | "dev" => Ok(Stage::Development),
            "production" | "prod" => Ok(Stage::Production),
            other => bail!("unknown stage: {other}"),
        }
    }
}

impl TryFrom<&String> for Stage {
    type Error = anyhow::Error;

    fn try_from(value: &String) -> Result<Self> {
        Stage::try_from(value.as_str())
    }
}
