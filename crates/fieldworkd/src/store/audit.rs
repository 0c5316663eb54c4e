use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::records::{AuditRow, NewAuditEntry};
use super::schema::audit_entries;

/// Action recorded when an incident is reported together with evidence.
pub const INCIDENT_RECORDED: &str = "INCIDENCIA_REGISTRADA";

pub fn insert(conn: &mut SqliteConnection, entry: &NewAuditEntry<'_>) -> QueryResult<usize> {
    diesel::insert_into(audit_entries::table)
        .values(entry)
        .execute(conn)
}

pub fn list_for_ticket(conn: &mut SqliteConnection, ticket_id: i32) -> QueryResult<Vec<AuditRow>> {
    audit_entries::table
        .filter(audit_entries::ticket_id.eq(ticket_id))
        .order(audit_entries::id.asc())
        .select(AuditRow::as_select())
        .load(conn)
}
