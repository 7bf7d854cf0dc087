use std::{convert::Infallible, fmt::Display, str::FromStr};

use diesel::{deserialize::FromSqlRow, expression::AsExpression};
use serde::{Serialize, Serializer};

use crate::infra::db::postgres::schema::sql_types::FollowupMode as FollowupModeSql;

/// Notification channel of a follow-up.
///
/// Rows written by older clients may carry labels this service does not know;
/// those decode into `Unknown` so dispatch can report them instead of failing
/// the whole batch query.
#[derive(Debug, Clone, PartialEq, Eq, AsExpression, FromSqlRow)]
#[diesel(sql_type = FollowupModeSql)]
pub enum FollowupMode {
    Phone,
    Whatsapp,
    Email,
    Unknown(String),
}

impl FollowupMode {
    pub fn as_str(&self) -> &str {
        match self {
            FollowupMode::Phone => "phone",
            FollowupMode::Whatsapp => "whatsapp",
            FollowupMode::Email => "email",
            FollowupMode::Unknown(raw) => raw.as_str(),
        }
    }

    /// Strict parse used for configuration values.
    pub fn parse_known(value: &str) -> anyhow::Result<Self> {
        match value.parse::<FollowupMode>() {
            Ok(FollowupMode::Unknown(raw)) => Err(anyhow::anyhow!("unknown followup_mode: {raw}")),
            Ok(mode) => Ok(mode),
            Err(never) => match never {},
        }
    }
}

impl Display for FollowupMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowupMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "phone" => FollowupMode::Phone,
            "whatsapp" => FollowupMode::Whatsapp,
            "email" => FollowupMode::Email,
            other => FollowupMode::Unknown(other.to_string()),
        })
    }
}

impl Serialize for FollowupMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

pg_enum_codec!(FollowupMode, FollowupModeSql);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        let mode: FollowupMode = "sms".parse().unwrap();
        assert_eq!(mode, FollowupMode::Unknown("sms".to_string()));
        assert_eq!(mode.to_string(), "sms");
    }

    #[test]
    fn parse_known_rejects_unknown_labels() {
        assert_eq!(
            FollowupMode::parse_known("whatsapp").unwrap(),
            FollowupMode::Whatsapp
        );
        assert!(FollowupMode::parse_known("carrier_pigeon").is_err());
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_string(&FollowupMode::Email).unwrap();
        assert_eq!(json, "\"email\"");
    }
}
