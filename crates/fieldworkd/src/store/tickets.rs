use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::records::{NewTicket, TicketChanges, TicketRow};
use super::schema::tickets;
use super::status::TicketStatus;

/// How a technician's request names a ticket.
///
/// Start, finish, and incident use the business ticket number; edit, delete,
/// and resume use the surrogate key returned by history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSelector {
    Number(i32),
    Id(i32),
}

pub fn find_owned(
    conn: &mut SqliteConnection,
    technician_id: i32,
    selector: TicketSelector,
) -> QueryResult<Option<TicketRow>> {
    let owned = tickets::table
        .filter(tickets::technician_id.eq(technician_id))
        .select(TicketRow::as_select());
    match selector {
        TicketSelector::Number(number) => owned
            .filter(tickets::ticket_number.eq(number))
            .first(conn)
            .optional(),
        TicketSelector::Id(id) => owned.filter(tickets::id.eq(id)).first(conn).optional(),
    }
}

pub fn insert(conn: &mut SqliteConnection, ticket: &NewTicket<'_>) -> QueryResult<TicketRow> {
    diesel::insert_into(tickets::table)
        .values(ticket)
        .execute(conn)?;
    tickets::table
        .filter(tickets::technician_id.eq(ticket.technician_id))
        .filter(tickets::ticket_number.eq(ticket.ticket_number))
        .select(TicketRow::as_select())
        .first(conn)
}

/// Applies `changes` only when the ticket is owned by `technician_id` and
/// currently in one of `allowed`. Returns the number of rows touched.
pub fn update_guarded(
    conn: &mut SqliteConnection,
    technician_id: i32,
    selector: TicketSelector,
    allowed: &[TicketStatus],
    changes: &TicketChanges<'_>,
) -> QueryResult<usize> {
    let allowed: Vec<&str> = allowed.iter().map(|status| status.as_str()).collect();
    let guarded = diesel::update(tickets::table)
        .filter(tickets::technician_id.eq(technician_id))
        .filter(tickets::status.eq_any(allowed));
    match selector {
        TicketSelector::Number(number) => guarded
            .filter(tickets::ticket_number.eq(number))
            .set(changes)
            .execute(conn),
        TicketSelector::Id(id) => guarded
            .filter(tickets::id.eq(id))
            .set(changes)
            .execute(conn),
    }
}

/// Tickets owned by a technician, newest first.
pub fn list_for_technician(
    conn: &mut SqliteConnection,
    technician_id: i32,
) -> QueryResult<Vec<TicketRow>> {
    tickets::table
        .filter(tickets::technician_id.eq(technician_id))
        .order((tickets::created_at.desc(), tickets::id.desc()))
        .select(TicketRow::as_select())
        .load(conn)
}

pub fn list_all(conn: &mut SqliteConnection) -> QueryResult<Vec<TicketRow>> {
    tickets::table
        .order((tickets::created_at.desc(), tickets::id.desc()))
        .select(TicketRow::as_select())
        .load(conn)
}

/// Removes a ticket and, through cascading keys, its images, positions, and
/// audit rows.
pub fn delete(conn: &mut SqliteConnection, ticket_id: i32) -> QueryResult<usize> {
    diesel::delete(tickets::table.filter(tickets::id.eq(ticket_id))).execute(conn)
}
