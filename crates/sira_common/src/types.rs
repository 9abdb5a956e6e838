//! Wire data model for the Sira tracking backend.
//!
//! Every struct mirrors one backend payload. The backend names its fields in
//! Spanish; serde renames/aliases keep that at this boundary. All list and
//! scalar fields the backend may omit are `Option` or defaulted, so a partial
//! payload always decodes.

use serde::{Deserialize, Serialize};

/// Severity of a backend alert.
///
/// Unknown wire values decode to `Unknown`, which renders with the same
/// neutral styling as `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Info,
    Success,
    #[serde(other)]
    Unknown,
}

impl Default for AlertKind {
    fn default() -> Self {
        Self::Info
    }
}

/// One active alert, created server-side and fetched read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    #[serde(alias = "alerta_id")]
    pub id: u64,

    #[serde(rename = "tipo", alias = "tipo_alerta", default)]
    pub kind: AlertKind,

    #[serde(rename = "titulo")]
    pub title: Option<String>,

    #[serde(rename = "descripcion", alias = "mensaje")]
    pub description: Option<String>,

    /// RFC 3339 timestamp; kept as the wire string and parsed at render time.
    #[serde(rename = "fecha_creacion")]
    pub created_at: Option<String>,
}

/// Headline counters from `/api/dashboard/stats`.
///
/// Every field is optional: the backend sends only what it has, and the
/// renderer merges present fields onto the last displayed values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralStats {
    #[serde(rename = "instrumentos_registrados")]
    pub registered_instruments: Option<u64>,

    #[serde(rename = "identificaciones_exitosas")]
    pub successful_identifications: Option<u64>,

    /// Pre-formatted display string, e.g. "18.3s".
    #[serde(rename = "tiempo_promedio")]
    pub avg_time: Option<String>,

    /// Pre-formatted display string, e.g. "96.7%".
    #[serde(rename = "precision")]
    pub accuracy: Option<String>,

    #[serde(rename = "identificaciones_hoy")]
    pub identifications_today: Option<u64>,

    #[serde(rename = "tiempo_promedio_hoy")]
    pub avg_time_today: Option<String>,

    #[serde(rename = "precision_hoy")]
    pub accuracy_today: Option<String>,

    #[serde(rename = "usuarios_activos")]
    pub active_users: Option<u64>,
}

impl GeneralStats {
    /// Constant stand-in shown when the stats resource is unreachable.
    pub fn fallback() -> Self {
        Self {
            registered_instruments: Some(248),
            successful_identifications: Some(2247),
            avg_time: Some("18.3s".to_string()),
            accuracy: Some("96.7%".to_string()),
            identifications_today: Some(42),
            avg_time_today: Some("2.1s".to_string()),
            accuracy_today: Some("95.3%".to_string()),
            active_users: Some(7),
        }
    }
}

/// One instrument category with its registered count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "nombre", default)]
    pub name: String,

    #[serde(rename = "cantidad", default)]
    pub count: u64,
}

/// Instrument statistics from `/api/instrumentos/estadisticas`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentStats {
    #[serde(default)]
    pub total: u64,

    #[serde(rename = "categorias", default)]
    pub categories: Vec<CategoryCount>,
}

/// Procedure counters from `/api/procedimientos/estadisticas`.
///
/// The backend does not guarantee `active + completed == total` and neither
/// do we.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcedureStats {
    #[serde(default)]
    pub total: u64,

    #[serde(rename = "activos", default)]
    pub active: u64,

    #[serde(rename = "completados", default)]
    pub completed: u64,
}

/// State of an instrument count audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountStatus {
    Pendiente,
    EnProgreso,
    Completado,
    Verificado,
    Error,
    #[serde(other)]
    Unknown,
}

impl Default for CountStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl CountStatus {
    /// English display label for the wire status.
    pub fn label(&self) -> &'static str {
        match self {
            CountStatus::Pendiente => "pending",
            CountStatus::EnProgreso => "in progress",
            CountStatus::Completado => "completed",
            CountStatus::Verificado => "verified",
            CountStatus::Error => "error",
            CountStatus::Unknown => "unknown",
        }
    }
}

/// One recent count event from `/api/conteos/recientes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentCount {
    #[serde(rename = "procedimiento_nombre")]
    pub procedure_name: Option<String>,

    #[serde(rename = "fecha_creacion")]
    pub created_at: Option<String>,

    #[serde(rename = "estado", default)]
    pub status: CountStatus,

    #[serde(rename = "total_instrumentos")]
    pub total_instruments: Option<u64>,
}

/// One surgical instrument set from `/api/sets/activos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSet {
    #[serde(rename = "nombre", default)]
    pub name: String,

    #[serde(rename = "categoria")]
    pub category: Option<String>,

    #[serde(rename = "activo", default)]
    pub active: bool,

    #[serde(rename = "total_instrumentos")]
    pub total_instruments: Option<u64>,
}

/// One refresh cycle's aggregate result.
///
/// A `None` field means the backend did not report that resource this cycle;
/// the renderer leaves the corresponding section as it was. Both aggregation
/// paths (combined endpoint, individual fan-out) produce this same shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub general: Option<GeneralStats>,
    pub alerts: Option<Vec<Alert>>,
    pub instruments: Option<InstrumentStats>,
    pub procedures: Option<ProcedureStats>,
    pub recent_counts: Option<Vec<RecentCount>>,
    pub instrument_sets: Option<Vec<InstrumentSet>>,
}

/// Envelope the combined endpoint wraps alerts in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertsEnvelope {
    #[serde(rename = "alertas_recientes")]
    pub recent: Option<Vec<Alert>>,
}

/// Body of `GET /api/dashboard/completo`. All keys optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombinedPayload {
    pub stats_generales: Option<GeneralStats>,
    pub alertas: Option<AlertsEnvelope>,
    pub instrumentos: Option<InstrumentStats>,
    pub procedimientos: Option<ProcedureStats>,
    pub conteos_recientes: Option<Vec<RecentCount>>,
    pub sets_quirurgicos: Option<Vec<InstrumentSet>>,
}

impl CombinedPayload {
    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            general: self.stats_generales,
            alerts: self.alertas.and_then(|a| a.recent),
            instruments: self.instrumentos,
            procedures: self.procedimientos,
            recent_counts: self.conteos_recientes,
            instrument_sets: self.sets_quirurgicos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_decodes_spanish_fields() {
        let json = r#"{
            "id": 12,
            "tipo": "warning",
            "titulo": "Set incompleto",
            "descripcion": "Faltan 2 instrumentos",
            "fecha_creacion": "2025-06-01T10:30:00Z"
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.id, 12);
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(alert.title.as_deref(), Some("Set incompleto"));
    }

    #[test]
    fn alert_accepts_aliases() {
        let json = r#"{"alerta_id": 3, "tipo_alerta": "error", "mensaje": "fallo"}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.id, 3);
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.description.as_deref(), Some("fallo"));
    }

    #[test]
    fn unknown_alert_kind_is_tolerated() {
        let json = r#"{"id": 1, "tipo": "catastrophic"}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.kind, AlertKind::Unknown);
    }

    #[test]
    fn missing_alert_kind_defaults_to_info() {
        let json = r#"{"id": 1}"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.kind, AlertKind::Info);
    }

    #[test]
    fn general_stats_partial_payload() {
        let json = r#"{"identificaciones_hoy": 10}"#;
        let stats: GeneralStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.identifications_today, Some(10));
        assert!(stats.registered_instruments.is_none());
        assert!(stats.accuracy.is_none());
    }

    #[test]
    fn count_status_decodes_wire_values() {
        for (wire, status) in [
            ("\"pendiente\"", CountStatus::Pendiente),
            ("\"en_progreso\"", CountStatus::EnProgreso),
            ("\"completado\"", CountStatus::Completado),
            ("\"verificado\"", CountStatus::Verificado),
            ("\"error\"", CountStatus::Error),
            ("\"whatever\"", CountStatus::Unknown),
        ] {
            let parsed: CountStatus = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn combined_payload_into_snapshot() {
        let json = r#"{
            "stats_generales": {"usuarios_activos": 4},
            "alertas": {"alertas_recientes": [{"id": 1, "tipo": "info"}]},
            "procedimientos": {"total": 9, "activos": 2, "completados": 7},
            "sets_quirurgicos": [
                {"nombre": "Set Laparoscopia", "activo": true, "total_instrumentos": 24}
            ]
        }"#;
        let payload: CombinedPayload = serde_json::from_str(json).unwrap();
        let snapshot = payload.into_snapshot();

        assert_eq!(snapshot.general.unwrap().active_users, Some(4));
        assert_eq!(snapshot.alerts.unwrap().len(), 1);
        assert!(snapshot.instruments.is_none());
        assert_eq!(snapshot.procedures.unwrap().completed, 7);
        assert!(snapshot.recent_counts.is_none());
        let sets = snapshot.instrument_sets.unwrap();
        assert!(sets[0].active);
        assert_eq!(sets[0].total_instruments, Some(24));
    }

    #[test]
    fn empty_combined_payload_yields_empty_snapshot() {
        let payload: CombinedPayload = serde_json::from_str("{}").unwrap();
        let snapshot = payload.into_snapshot();
        assert!(snapshot.general.is_none());
        assert!(snapshot.alerts.is_none());
        assert!(snapshot.instrument_sets.is_none());
    }

    #[test]
    fn fallback_stats_are_fully_populated() {
        let stats = GeneralStats::fallback();
        assert_eq!(stats.registered_instruments, Some(248));
        assert_eq!(stats.successful_identifications, Some(2247));
        assert_eq!(stats.avg_time.as_deref(), Some("18.3s"));
        assert_eq!(stats.accuracy.as_deref(), Some("96.7%"));
        assert_eq!(stats.active_users, Some(7));
    }
}
