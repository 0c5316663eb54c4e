use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::records::{NewTechnician, TechnicianRow};
use super::schema::technicians;

pub fn find_by_login(
    conn: &mut SqliteConnection,
    login: &str,
) -> QueryResult<Option<TechnicianRow>> {
    technicians::table
        .filter(technicians::login.eq(login))
        .select(TechnicianRow::as_select())
        .first(conn)
        .optional()
}

pub fn find_id_by_login(conn: &mut SqliteConnection, login: &str) -> QueryResult<Option<i32>> {
    technicians::table
        .filter(technicians::login.eq(login))
        .select(technicians::id)
        .first(conn)
        .optional()
}

pub fn insert(conn: &mut SqliteConnection, technician: &NewTechnician<'_>) -> QueryResult<usize> {
    diesel::insert_into(technicians::table)
        .values(technician)
        .execute(conn)
}

pub fn list(conn: &mut SqliteConnection) -> QueryResult<Vec<TechnicianRow>> {
    technicians::table
        .order(technicians::login.asc())
        .select(TechnicianRow::as_select())
        .load(conn)
}
