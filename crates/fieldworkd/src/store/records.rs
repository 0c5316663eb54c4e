//! Row types mapped onto the store schema.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use super::StoreError;
use super::schema::{audit_entries, clients, images, positions, technicians, tickets};
use super::status::TicketStatus;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = technicians)]
#[diesel(check_for_backend(Sqlite))]
pub struct TechnicianRow {
    pub id: i32,
    pub login: String,
    pub credential_hash: String,
    pub display_name: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = technicians)]
pub struct NewTechnician<'a> {
    pub login: &'a str,
    pub credential_hash: &'a str,
    pub display_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(Sqlite))]
pub struct ClientRow {
    pub national_id: String,
    pub name: String,
    pub install_address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(Sqlite))]
pub struct TicketRow {
    pub id: i32,
    pub ticket_number: i32,
    pub status: String,
    pub reason: Option<String>,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub started_at: Option<NaiveDateTime>,
    pub closed_at: Option<NaiveDateTime>,
    pub edited_at: Option<NaiveDateTime>,
    pub technician_id: i32,
    pub client_id: Option<String>,
}

impl TicketRow {
    /// Parses the stored status text.
    pub fn status(&self) -> Result<TicketStatus, StoreError> {
        self.status
            .parse()
            .map_err(|_| StoreError::UnknownStatus {
                ticket_id: self.id,
                status: self.status.clone(),
            })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicket<'a> {
    pub ticket_number: i32,
    pub status: &'a str,
    pub created_at: NaiveDateTime,
    pub started_at: Option<NaiveDateTime>,
    pub technician_id: i32,
    pub client_id: Option<&'a str>,
}

/// Column updates applied by a guarded transition. `None` leaves a column untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = tickets)]
pub struct TicketChanges<'a> {
    pub status: Option<&'a str>,
    pub reason: Option<&'a str>,
    pub description: Option<&'a str>,
    pub closed_at: Option<NaiveDateTime>,
    pub edited_at: Option<NaiveDateTime>,
}

/// Image metadata without the payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = images)]
#[diesel(check_for_backend(Sqlite))]
pub struct ImageSummaryRow {
    pub id: i32,
    pub ticket_id: i32,
    pub filename: String,
    pub media_type: String,
    pub byte_size: i64,
    pub caption: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = images)]
#[diesel(check_for_backend(Sqlite))]
pub struct ImageRow {
    pub id: i32,
    pub ticket_id: i32,
    pub payload: Vec<u8>,
    pub filename: String,
    pub media_type: String,
    pub byte_size: i64,
    pub caption: Option<String>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = images)]
pub struct NewImage<'a> {
    pub ticket_id: i32,
    pub payload: &'a [u8],
    pub filename: &'a str,
    pub media_type: &'a str,
    pub byte_size: i64,
    pub caption: Option<&'a str>,
    pub uploaded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = positions)]
#[diesel(check_for_backend(Sqlite))]
pub struct PositionRow {
    pub id: i32,
    pub technician_id: i32,
    pub ticket_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = positions)]
pub struct NewPosition {
    pub technician_id: i32,
    pub ticket_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = audit_entries)]
#[diesel(check_for_backend(Sqlite))]
pub struct AuditRow {
    pub id: i32,
    pub ticket_id: i32,
    pub technician_id: i32,
    pub action: String,
    pub detail: String,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = audit_entries)]
pub struct NewAuditEntry<'a> {
    pub ticket_id: i32,
    pub technician_id: i32,
    pub action: &'a str,
    pub detail: &'a str,
    pub recorded_at: NaiveDateTime,
}
