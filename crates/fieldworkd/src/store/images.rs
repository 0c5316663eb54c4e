use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::records::{ImageRow, ImageSummaryRow, NewImage};
use super::schema::{images, tickets};

pub fn insert(conn: &mut SqliteConnection, image: &NewImage<'_>) -> QueryResult<usize> {
    diesel::insert_into(images::table)
        .values(image)
        .execute(conn)
}

/// Metadata for a ticket's images, newest first.
pub fn list_for_ticket(
    conn: &mut SqliteConnection,
    ticket_id: i32,
) -> QueryResult<Vec<ImageSummaryRow>> {
    images::table
        .filter(images::ticket_id.eq(ticket_id))
        .order((images::uploaded_at.desc(), images::id.desc()))
        .select(ImageSummaryRow::as_select())
        .load(conn)
}

/// Loads an image only if its ticket belongs to `technician_id`.
pub fn find_owned(
    conn: &mut SqliteConnection,
    technician_id: i32,
    image_id: i32,
) -> QueryResult<Option<ImageRow>> {
    images::table
        .inner_join(tickets::table)
        .filter(images::id.eq(image_id))
        .filter(tickets::technician_id.eq(technician_id))
        .select(ImageRow::as_select())
        .first(conn)
        .optional()
}

pub fn delete(conn: &mut SqliteConnection, image_id: i32) -> QueryResult<usize> {
    diesel::delete(images::table.filter(images::id.eq(image_id))).execute(conn)
}
