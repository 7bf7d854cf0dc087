use std::{fmt::Display, str::FromStr};

use diesel::{deserialize::FromSqlRow, expression::AsExpression};
use serde::{Deserialize, Serialize};

use crate::infra::db::postgres::schema::sql_types::FollowupStatus as FollowupStatusSql;

#[derive(
    Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsExpression, FromSqlRow,
)]
#[serde(rename_all = "snake_case")]
#[diesel(sql_type = FollowupStatusSql)]
pub enum FollowupStatus {
    #[default]
    Pending,
    Completed,
    Scheduled,
}

impl FollowupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowupStatus::Pending => "pending",
            FollowupStatus::Completed => "completed",
            FollowupStatus::Scheduled => "scheduled",
        }
    }
}

impl Display for FollowupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowupStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FollowupStatus::Pending),
            "completed" => Ok(FollowupStatus::Completed),
            "scheduled" => Ok(FollowupStatus::Scheduled),
            other => Err(anyhow::anyhow!("unknown followup_status: {other}")),
        }
    }
}

pg_enum_codec!(FollowupStatus, FollowupStatusSql);
