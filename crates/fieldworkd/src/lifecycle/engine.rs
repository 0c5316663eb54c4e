use chrono::{NaiveDateTime, SubsecRound, Utc};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info};

use crate::imaging::{CodecError, IncomingImage, MAX_IMAGES_PER_INCIDENT};
use crate::store::records::{NewAuditEntry, NewImage, NewPosition, NewTicket, TicketChanges};
use crate::store::{
    StoreError, StorePool, TicketSelector, TicketStatus, audit, images, positions, technicians,
    tickets,
};

use super::{
    DeleteOutcome, IncidentReason, IncidentReport, LIFECYCLE_TARGET, LifecycleError, StartOutcome,
    StartTicket, StoredImage, TicketDetail, TicketService, TicketSummary,
};

/// [`TicketService`] backed by the relational store.
#[derive(Debug, Clone)]
pub struct TicketEngine {
    pool: StorePool,
}

impl TicketEngine {
    #[must_use]
    pub const fn new(pool: StorePool) -> Self {
        Self { pool }
    }

    /// Runs `operation` in an immediate transaction; any error rolls it back.
    fn write<T>(
        &self,
        operation: impl FnOnce(&mut SqliteConnection) -> Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        let mut conn = self.pool.connection()?;
        conn.immediate_transaction(operation)
    }

    fn read<T>(
        &self,
        operation: impl FnOnce(&mut SqliteConnection) -> Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        let mut conn = self.pool.connection()?;
        operation(&mut *conn)
    }

    /// Moves an owned ticket to `target` if its current status allows it.
    fn transition(
        &self,
        login: &str,
        selector: TicketSelector,
        target: TicketStatus,
        changes: &TicketChanges<'_>,
    ) -> Result<bool, LifecycleError> {
        let allowed = TicketStatus::sources_of(target);
        let applied = self.write(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            let updated =
                tickets::update_guarded(conn, technician_id, selector, &allowed, changes)?;
            Ok(updated == 1)
        })?;
        debug!(
            target: LIFECYCLE_TARGET,
            login,
            ?selector,
            status = %target,
            applied,
            "ticket transition"
        );
        Ok(applied)
    }
}

/// Current UTC time at whole-second precision.
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

fn resolve_technician(conn: &mut SqliteConnection, login: &str) -> Result<i32, LifecycleError> {
    technicians::find_id_by_login(conn, login)?.ok_or_else(|| LifecycleError::UnknownTechnician {
        login: login.to_owned(),
    })
}

fn existing_outcome(status: TicketStatus) -> StartOutcome {
    if status == TicketStatus::Terminated {
        StartOutcome::AlreadyTerminated
    } else {
        StartOutcome::AlreadyExists
    }
}

impl TicketService for TicketEngine {
    fn login(&self, login: &str, credential: &str) -> Result<bool, LifecycleError> {
        let technician = self.read(|conn| Ok(technicians::find_by_login(conn, login)?))?;
        let accepted = match technician {
            Some(technician) => bcrypt::verify(credential, &technician.credential_hash)
                .map_err(StoreError::Credential)?,
            None => false,
        };
        info!(target: LIFECYCLE_TARGET, login, accepted, "login attempt");
        Ok(accepted)
    }

    fn start(&self, login: &str, request: &StartTicket) -> Result<StartOutcome, LifecycleError> {
        let selector = TicketSelector::Number(request.ticket_number);
        let outcome = self.write(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            if let Some(existing) = tickets::find_owned(conn, technician_id, selector)? {
                return Ok(existing_outcome(existing.status()?));
            }
            let ticket = tickets::insert(
                conn,
                &NewTicket {
                    ticket_number: request.ticket_number,
                    status: TicketStatus::Pending.as_str(),
                    created_at: now(),
                    started_at: Some(request.started_at),
                    technician_id,
                    client_id: None,
                },
            )?;
            positions::insert(
                conn,
                &NewPosition {
                    technician_id,
                    ticket_id: ticket.id,
                    latitude: request.latitude,
                    longitude: request.longitude,
                    recorded_at: now(),
                },
            )?;
            Ok(StartOutcome::Created {
                ticket_id: ticket.id,
            })
        });
        // A concurrent start for the same number loses on the unique key.
        let outcome = match outcome {
            Err(LifecycleError::Store(StoreError::Query(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _,
            )))) => Ok(StartOutcome::AlreadyExists),
            other => other,
        }?;
        info!(
            target: LIFECYCLE_TARGET,
            login,
            ticket_number = request.ticket_number,
            ?outcome,
            "ticket start"
        );
        Ok(outcome)
    }

    fn finish(
        &self,
        login: &str,
        ticket_number: i32,
        closed_at: NaiveDateTime,
    ) -> Result<bool, LifecycleError> {
        let target = TicketStatus::Terminated;
        self.transition(
            login,
            TicketSelector::Number(ticket_number),
            target,
            &TicketChanges {
                status: Some(target.as_str()),
                closed_at: Some(closed_at),
                ..TicketChanges::default()
            },
        )
    }

    fn report_incident(
        &self,
        login: &str,
        ticket_number: i32,
        report: &IncidentReport,
    ) -> Result<bool, LifecycleError> {
        let target = TicketStatus::Cancelled;
        info!(
            target: LIFECYCLE_TARGET,
            login,
            ticket_number,
            reason = %IncidentReason::classify(report.reason()),
            "incident reported"
        );
        self.transition(
            login,
            TicketSelector::Number(ticket_number),
            target,
            &TicketChanges {
                status: Some(target.as_str()),
                reason: Some(report.reason()),
                description: Some(report.note()),
                ..TicketChanges::default()
            },
        )
    }

    fn report_incident_with_images(
        &self,
        login: &str,
        ticket_number: i32,
        report: &IncidentReport,
        attachments: &[IncomingImage],
    ) -> Result<bool, LifecycleError> {
        if attachments.len() > MAX_IMAGES_PER_INCIDENT {
            return Err(CodecError::TooManyImages {
                count: attachments.len(),
                max: MAX_IMAGES_PER_INCIDENT,
            }
            .into());
        }
        let target = TicketStatus::Cancelled;
        let allowed = TicketStatus::sources_of(target);
        let selector = TicketSelector::Number(ticket_number);
        let detail = report.audit_detail();
        let committed = self.write(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            let ticket = tickets::find_owned(conn, technician_id, selector)?
                .ok_or(LifecycleError::TicketUnavailable { selector })?;
            let recorded_at = now();
            let updated = tickets::update_guarded(
                conn,
                technician_id,
                TicketSelector::Id(ticket.id),
                &allowed,
                &TicketChanges {
                    status: Some(target.as_str()),
                    reason: Some(report.reason()),
                    description: Some(report.note()),
                    ..TicketChanges::default()
                },
            )?;
            if updated != 1 {
                return Err(LifecycleError::TicketUnavailable { selector });
            }
            for (index, image) in attachments.iter().enumerate() {
                image
                    .validate()
                    .map_err(|source| LifecycleError::InvalidImage { index, source })?;
                let metadata = image.metadata();
                images::insert(
                    conn,
                    &NewImage {
                        ticket_id: ticket.id,
                        payload: image.payload(),
                        filename: metadata.filename(),
                        media_type: metadata.media_type(),
                        byte_size: i64::try_from(image.payload().len()).unwrap_or(i64::MAX),
                        caption: None,
                        uploaded_at: recorded_at,
                    },
                )?;
            }
            audit::insert(
                conn,
                &NewAuditEntry {
                    ticket_id: ticket.id,
                    technician_id,
                    action: audit::INCIDENT_RECORDED,
                    detail: &detail,
                    recorded_at,
                },
            )?;
            Ok(())
        });
        let committed = match committed {
            Ok(()) => true,
            Err(LifecycleError::TicketUnavailable { .. }) => false,
            Err(error) => return Err(error),
        };
        info!(
            target: LIFECYCLE_TARGET,
            login,
            ticket_number,
            images = attachments.len(),
            reason = %IncidentReason::classify(report.reason()),
            committed,
            "incident with evidence"
        );
        Ok(committed)
    }

    fn edit(
        &self,
        login: &str,
        ticket_id: i32,
        report: &IncidentReport,
    ) -> Result<bool, LifecycleError> {
        let allowed = TicketStatus::editable();
        let changes = TicketChanges {
            reason: Some(report.reason()),
            description: Some(report.note()),
            edited_at: Some(now()),
            ..TicketChanges::default()
        };
        self.write(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            let updated = tickets::update_guarded(
                conn,
                technician_id,
                TicketSelector::Id(ticket_id),
                &allowed,
                &changes,
            )?;
            Ok(updated == 1)
        })
    }

    fn delete(&self, login: &str, ticket_id: i32) -> Result<DeleteOutcome, LifecycleError> {
        let target = TicketStatus::Deleted;
        let selector = TicketSelector::Id(ticket_id);
        let allowed = TicketStatus::sources_of(target);
        let outcome = self.write(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            let Some(ticket) = tickets::find_owned(conn, technician_id, selector)? else {
                return Ok(DeleteOutcome::Rejected);
            };
            let status = ticket.status()?;
            if status == TicketStatus::Terminated {
                return Ok(DeleteOutcome::Terminated);
            }
            let updated = tickets::update_guarded(
                conn,
                technician_id,
                selector,
                &allowed,
                &TicketChanges {
                    status: Some(target.as_str()),
                    edited_at: Some(now()),
                    ..TicketChanges::default()
                },
            )?;
            Ok(if updated == 1 {
                DeleteOutcome::Deleted
            } else {
                DeleteOutcome::Rejected
            })
        })?;
        info!(target: LIFECYCLE_TARGET, login, ticket_id, ?outcome, "ticket delete");
        Ok(outcome)
    }

    fn resume(&self, login: &str, ticket_id: i32) -> Result<bool, LifecycleError> {
        let target = TicketStatus::Pending;
        self.transition(
            login,
            TicketSelector::Id(ticket_id),
            target,
            &TicketChanges {
                status: Some(target.as_str()),
                edited_at: Some(now()),
                ..TicketChanges::default()
            },
        )
    }

    fn history(&self, login: &str) -> Result<Vec<TicketSummary>, LifecycleError> {
        self.read(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            let rows = tickets::list_for_technician(conn, technician_id)?;
            Ok(rows
                .into_iter()
                .map(TicketSummary::try_from)
                .collect::<Result<Vec<_>, _>>()?)
        })
    }

    fn detail(&self, login: &str, ticket_id: i32) -> Result<Option<TicketDetail>, LifecycleError> {
        self.read(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            let Some(row) = tickets::find_owned(conn, technician_id, TicketSelector::Id(ticket_id))?
            else {
                return Ok(None);
            };
            let attached = images::list_for_ticket(conn, row.id)?;
            Ok(Some(TicketDetail::from_rows(row, attached)?))
        })
    }

    fn image(&self, login: &str, image_id: i32) -> Result<Option<StoredImage>, LifecycleError> {
        self.read(|conn| {
            let technician_id = resolve_technician(conn, login)?;
            Ok(images::find_owned(conn, technician_id, image_id)?.map(StoredImage::from_row))
        })
    }
}
