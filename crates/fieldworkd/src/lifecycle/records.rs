//! Value records returned by lifecycle queries and their JSON shapes.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::store::{ImageSummaryRow, StoreError, TicketRow, TicketStatus};

/// Timestamps go on the wire as `YYYY-MM-DDTHH:MM:SS`, without fractions.
mod wire_time {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub(super) fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub(super) fn serialize_option<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Parameters of a start request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartTicket {
    pub ticket_number: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub started_at: NaiveDateTime,
}

/// Free-text reason and note attached to an incident or an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentReport {
    reason: String,
    note: String,
}

impl IncidentReport {
    #[must_use]
    pub fn new(reason: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            note: note.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Audit detail line, `"<reason> - <note>"`.
    #[must_use]
    pub fn audit_detail(&self) -> String {
        format!("{} - {}", self.reason, self.note)
    }
}

/// One entry of a technician's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketSummary {
    id: i32,
    #[serde(rename = "numero_ticket")]
    ticket_number: i32,
    #[serde(rename = "estado")]
    status: TicketStatus,
    #[serde(rename = "motivo")]
    reason: Option<String>,
    #[serde(rename = "descripcion")]
    description: Option<String>,
    #[serde(rename = "fecha_creacion", serialize_with = "wire_time::serialize")]
    created_at: NaiveDateTime,
    #[serde(rename = "fecha_inicio", serialize_with = "wire_time::serialize_option")]
    started_at: Option<NaiveDateTime>,
    #[serde(rename = "fecha_cierre", serialize_with = "wire_time::serialize_option")]
    closed_at: Option<NaiveDateTime>,
}

impl TicketSummary {
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub const fn ticket_number(&self) -> i32 {
        self.ticket_number
    }

    #[must_use]
    pub const fn status(&self) -> TicketStatus {
        self.status
    }

    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn closed_at(&self) -> Option<NaiveDateTime> {
        self.closed_at
    }
}

impl TryFrom<TicketRow> for TicketSummary {
    type Error = StoreError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let status = row.status()?;
        Ok(Self {
            id: row.id,
            ticket_number: row.ticket_number,
            status,
            reason: row.reason,
            description: row.description,
            created_at: row.created_at,
            started_at: row.started_at,
            closed_at: row.closed_at,
        })
    }
}

/// Image metadata listed in a ticket detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSummary {
    id: i32,
    #[serde(rename = "nombre")]
    filename: String,
    #[serde(rename = "tipo")]
    media_type: String,
    #[serde(rename = "tamaño")]
    byte_size: i64,
    #[serde(rename = "descripcion")]
    caption: Option<String>,
    #[serde(rename = "fecha", serialize_with = "wire_time::serialize")]
    uploaded_at: NaiveDateTime,
}

impl ImageSummary {
    #[must_use]
    pub const fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }
}

impl From<ImageSummaryRow> for ImageSummary {
    fn from(row: ImageSummaryRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename,
            media_type: row.media_type,
            byte_size: row.byte_size,
            caption: row.caption.filter(|caption| !caption.is_empty()),
            uploaded_at: row.uploaded_at,
        }
    }
}

/// A ticket with its last edit time and image metadata, newest image first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    summary: TicketSummary,
    #[serde(
        rename = "fecha_ultima_edicion",
        serialize_with = "wire_time::serialize_option"
    )]
    edited_at: Option<NaiveDateTime>,
    #[serde(rename = "imagenes")]
    images: Vec<ImageSummary>,
}

impl TicketDetail {
    pub(crate) fn from_rows(row: TicketRow, images: Vec<ImageSummaryRow>) -> Result<Self, StoreError> {
        let edited_at = row.edited_at;
        Ok(Self {
            summary: TicketSummary::try_from(row)?,
            edited_at,
            images: images.into_iter().map(ImageSummary::from).collect(),
        })
    }

    #[must_use]
    pub const fn summary(&self) -> &TicketSummary {
        &self.summary
    }

    #[must_use]
    pub const fn edited_at(&self) -> Option<NaiveDateTime> {
        self.edited_at
    }

    #[must_use]
    pub fn images(&self) -> &[ImageSummary] {
        &self.images
    }
}

/// Metadata line sent ahead of an image download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    #[serde(rename = "id_ticket")]
    ticket_id: i32,
    #[serde(flatten)]
    summary: ImageSummary,
}

impl ImageRecord {
    #[must_use]
    pub const fn ticket_id(&self) -> i32 {
        self.ticket_id
    }

    #[must_use]
    pub const fn summary(&self) -> &ImageSummary {
        &self.summary
    }
}

/// A stored image with its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    record: ImageRecord,
    payload: Vec<u8>,
}

impl StoredImage {
    pub(crate) fn from_row(row: crate::store::records::ImageRow) -> Self {
        let summary = ImageSummary {
            id: row.id,
            filename: row.filename,
            media_type: row.media_type,
            byte_size: row.byte_size,
            caption: row.caption.filter(|caption| !caption.is_empty()),
            uploaded_at: row.uploaded_at,
        };
        Self {
            record: ImageRecord {
                ticket_id: row.ticket_id,
                summary,
            },
            payload: row.payload,
        }
    }

    #[cfg(test)]
    pub(crate) fn new(record: ImageRecord, payload: Vec<u8>) -> Self {
        Self { record, payload }
    }

    #[must_use]
    pub const fn record(&self) -> &ImageRecord {
        &self.record
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}
