use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::records::ClientRow;
use super::schema::clients;

pub fn insert(conn: &mut SqliteConnection, client: &ClientRow) -> QueryResult<usize> {
    diesel::insert_into(clients::table)
        .values(client)
        .execute(conn)
}

pub fn list(conn: &mut SqliteConnection) -> QueryResult<Vec<ClientRow>> {
    clients::table
        .order(clients::national_id.asc())
        .select(ClientRow::as_select())
        .load(conn)
}
