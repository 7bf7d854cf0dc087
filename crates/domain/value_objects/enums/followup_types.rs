use std::{fmt::Display, str::FromStr};

use diesel::{deserialize::FromSqlRow, expression::AsExpression};
use serde::{Deserialize, Serialize};

use crate::infra::db::postgres::schema::sql_types::FollowupType as FollowupTypeSql;

#[derive(
    Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsExpression, FromSqlRow,
)]
#[serde(rename_all = "snake_case")]
#[diesel(sql_type = FollowupTypeSql)]
pub enum FollowupType {
    #[default]
    Manual,
    PaymentRenewal,
}

impl FollowupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowupType::Manual => "manual",
            FollowupType::PaymentRenewal => "payment_renewal",
        }
    }

    pub fn is_renewal(&self) -> bool {
        matches!(self, FollowupType::PaymentRenewal)
    }
}

impl Display for FollowupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowupType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(FollowupType::Manual),
            "payment_renewal" => Ok(FollowupType::PaymentRenewal),
            other => Err(anyhow::anyhow!("unknown followup_type: {other}")),
        }
    }
}

pg_enum_codec!(FollowupType, FollowupTypeSql);
