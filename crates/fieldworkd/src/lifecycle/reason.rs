use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Incident reasons offered to technicians on their devices.
///
/// The reason is stored verbatim; this catalogue only classifies it for
/// reporting. Text that matches no entry is treated as [`IncidentReason::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, IntoStaticStr)]
pub enum IncidentReason {
    #[strum(serialize = "Cliente Ausente")]
    ClientAbsent,
    #[strum(serialize = "Instalación Rota")]
    BrokenInstallation,
    #[strum(serialize = "Falta Material")]
    MissingMaterial,
    #[strum(serialize = "Sin Acceso")]
    NoAccess,
    #[strum(serialize = "Perro Suelto")]
    LooseDog,
    #[strum(serialize = "Otros")]
    Other,
}

impl IncidentReason {
    /// Matches `text` against the catalogue, ignoring case and surrounding
    /// whitespace.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let text = text.trim();
        Self::iter()
            .find(|reason| {
                let label: &'static str = (*reason).into();
                label.to_lowercase() == text.to_lowercase()
            })
            .unwrap_or(Self::Other)
    }
}
