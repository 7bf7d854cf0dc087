/// Postgres enums travel as their text labels in the binary protocol, so a
/// value object only needs `as_str` and `FromStr` to be readable and
/// writable through diesel.
macro_rules! pg_enum_codec {
    ($rust:ty, $sql:ty) => {
        impl diesel::serialize::ToSql<$sql, diesel::pg::Pg> for $rust {
            fn to_sql<'b>(
                &'b self,
                out: &mut diesel::serialize::Output<'b, '_, diesel::pg::Pg>,
            ) -> diesel::serialize::Result {
                use std::io::Write;
                out.write_all(self.as_str().as_bytes())?;
                Ok(diesel::serialize::IsNull::No)
            }
        }

        impl diesel::deserialize::FromSql<$sql, diesel::pg::Pg> for $rust {
            fn from_sql(value: diesel::pg::PgValue<'_>) -> diesel::deserialize::Result<Self> {
                let raw = std::str::from_utf8(value.as_bytes())?;
                raw.parse::<$rust>().map_err(Into::into)
            }
        }
    };
}

pub mod followup_modes;
pub mod followup_statuses;
pub mod followup_types;
pub mod subscription_plans;
