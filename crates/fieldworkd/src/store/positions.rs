use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::records::{NewPosition, PositionRow};
use super::schema::positions;

pub fn insert(conn: &mut SqliteConnection, position: &NewPosition) -> QueryResult<usize> {
    diesel::insert_into(positions::table)
        .values(position)
        .execute(conn)
}

pub fn list_for_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i32,
) -> QueryResult<Vec<PositionRow>> {
    positions::table
        .filter(positions::ticket_id.eq(ticket_id))
        .order(positions::id.asc())
        .select(PositionRow::as_select())
        .load(conn)
}
