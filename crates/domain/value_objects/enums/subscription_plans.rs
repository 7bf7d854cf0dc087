use std::{fmt::Display, str::FromStr};

use diesel::deserialize::FromSqlRow;
use serde::{Deserialize, Serialize};

use crate::infra::db::postgres::schema::sql_types::SubscriptionPlan as SubscriptionPlanSql;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, FromSqlRow)]
pub enum SubscriptionPlan {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "3_month")]
    ThreeMonth,
    #[serde(rename = "6_month")]
    SixMonth,
    #[serde(rename = "yearly")]
    Yearly,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "monthly",
            SubscriptionPlan::ThreeMonth => "3_month",
            SubscriptionPlan::SixMonth => "6_month",
            SubscriptionPlan::Yearly => "yearly",
        }
    }
}

impl Display for SubscriptionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(SubscriptionPlan::Monthly),
            "3_month" => Ok(SubscriptionPlan::ThreeMonth),
            "6_month" => Ok(SubscriptionPlan::SixMonth),
            "yearly" => Ok(SubscriptionPlan::Yearly),
            other => Err(anyhow::anyhow!("unknown subscription_plan: {other}")),
        }
    }
}

pg_enum_codec!(SubscriptionPlan, SubscriptionPlanSql);
