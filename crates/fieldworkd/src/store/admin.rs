//! Provisioning and maintenance operations for the operator CLI.

use diesel::sqlite::SqliteConnection;
use tracing::info;

use super::records::{ClientRow, NewTechnician, TechnicianRow, TicketRow};
use super::{STORE_TARGET, StoreError, StorePool, clients, images, technicians, tickets};

/// Client details supplied by an operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClient {
    pub national_id: String,
    pub name: String,
    pub install_address: String,
    pub phone: String,
}

/// Operator-side access to the store.
#[derive(Debug, Clone)]
pub struct Administration {
    pool: StorePool,
}

impl Administration {
    #[must_use]
    pub const fn new(pool: StorePool) -> Self {
        Self { pool }
    }

    /// Creates a technician with a bcrypt hash of `password` at the default cost.
    pub fn add_technician(
        &self,
        login: &str,
        password: &str,
        display_name: &str,
    ) -> Result<i32, StoreError> {
        self.add_technician_with_cost(login, password, display_name, bcrypt::DEFAULT_COST)
    }

    /// Creates a technician hashing `password` at an explicit bcrypt cost.
    pub fn add_technician_with_cost(
        &self,
        login: &str,
        password: &str,
        display_name: &str,
        cost: u32,
    ) -> Result<i32, StoreError> {
        let credential_hash = bcrypt::hash(password, cost)?;
        let mut conn = self.pool.connection()?;
        let id = conn.immediate_transaction(|conn: &mut SqliteConnection| {
            technicians::insert(
                conn,
                &NewTechnician {
                    login,
                    credential_hash: &credential_hash,
                    display_name,
                },
            )?;
            technicians::find_id_by_login(conn, login)?.ok_or(diesel::result::Error::NotFound)
        })?;
        info!(target: STORE_TARGET, login, technician_id = id, "technician provisioned");
        Ok(id)
    }

    pub fn add_client(&self, client: &NewClient) -> Result<(), StoreError> {
        let mut conn = self.pool.connection()?;
        clients::insert(
            &mut conn,
            &ClientRow {
                national_id: client.national_id.clone(),
                name: client.name.clone(),
                install_address: client.install_address.clone(),
                phone: client.phone.clone(),
            },
        )?;
        info!(target: STORE_TARGET, national_id = %client.national_id, "client registered");
        Ok(())
    }

    pub fn technicians(&self) -> Result<Vec<TechnicianRow>, StoreError> {
        let mut conn = self.pool.connection()?;
        Ok(technicians::list(&mut conn)?)
    }

    pub fn clients(&self) -> Result<Vec<ClientRow>, StoreError> {
        let mut conn = self.pool.connection()?;
        Ok(clients::list(&mut conn)?)
    }

    pub fn tickets(&self) -> Result<Vec<TicketRow>, StoreError> {
        let mut conn = self.pool.connection()?;
        Ok(tickets::list_all(&mut conn)?)
    }

    /// Physically removes a ticket and everything it owns. Returns whether a
    /// row existed.
    pub fn hard_delete_ticket(&self, ticket_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.connection()?;
        let removed = tickets::delete(&mut conn, ticket_id)?;
        info!(target: STORE_TARGET, ticket_id, removed, "ticket purged");
        Ok(removed == 1)
    }

    /// Removes a single image. Returns whether a row existed.
    pub fn delete_image(&self, image_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.connection()?;
        let removed = images::delete(&mut conn, image_id)?;
        info!(target: STORE_TARGET, image_id, removed, "image removed");
        Ok(removed == 1)
    }
}
