use diesel::prelude::*;

use crate::infra::db::postgres::schema::clients;

/// Recipient identity and addressing columns of a client row.
#[derive(Debug, Clone, Selectable, Queryable)]
#[diesel(table_name = clients)]
pub struct ClientContactEntity {
    pub name: String,
    pub contact_person_name: String,
    pub contact_number_1: String,
    pub email_id: Option<String>,
}
