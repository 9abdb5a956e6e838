//! Snapshot aggregation.
//!
//! Primary path: one combined request. If that fails for any reason, a single
//! fan-out of six concurrent individual fetches is made, each degrading to
//! its documented fallback, so both paths hand the renderer the same
//! `Snapshot` shape. Only when every individual resource fell back does the
//! aggregate itself report failure; the caller then shows the constant
//! default stats and warns the user.

use crate::client::{ClientError, SiraClient};
use sira_common::{GeneralStats, Snapshot};
use std::future::Future;
use tracing::warn;

async fn guard<T, F>(resource: &'static str, fallback: T, fut: F) -> (T, bool)
where
    F: Future<Output = Result<T, ClientError>>,
{
    match fut.await {
        Ok(value) => (value, true),
        Err(error) => {
            warn!(resource, %error, "resource fetch failed, using fallback");
            (fallback, false)
        }
    }
}

impl SiraClient {
    /// Fetch one aggregate snapshot for a refresh cycle.
    pub async fn snapshot(&self) -> Result<Snapshot, ClientError> {
        match self.combined().await {
            Ok(payload) => Ok(payload.into_snapshot()),
            Err(error) => {
                warn!(%error, "combined dashboard fetch failed, trying individual resources");
                self.snapshot_from_parts().await
            }
        }
    }

    /// Secondary path: six concurrent guarded fetches, one join point.
    async fn snapshot_from_parts(&self) -> Result<Snapshot, ClientError> {
        let (general, alerts, instruments, procedures, counts, sets) = tokio::join!(
            guard("general_stats", GeneralStats::fallback(), self.general_stats()),
            guard("alerts", Vec::new(), self.active_alerts()),
            guard("instruments", Default::default(), self.instrument_stats()),
            guard("procedures", Default::default(), self.procedure_stats()),
            guard("recent_counts", Vec::new(), self.recent_counts()),
            guard("instrument_sets", Vec::new(), self.active_sets()),
        );

        let fetched = [general.1, alerts.1, instruments.1, procedures.1, counts.1, sets.1];
        if !fetched.contains(&true) {
            return Err(ClientError::AllResourcesDown);
        }

        Ok(Snapshot {
            general: Some(general.0),
            alerts: Some(alerts.0),
            instruments: Some(instruments.0),
            procedures: Some(procedures.0),
            recent_counts: Some(counts.0),
            instrument_sets: Some(sets.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::client::{ClientError, SiraClient};
    use sira_common::DashboardConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> SiraClient {
        let config = DashboardConfig {
            base_url: server.uri(),
            timeout_secs: 5,
            ..DashboardConfig::default()
        };
        SiraClient::new(&config).unwrap()
    }

    async fn mount_individual_endpoints(server: &MockServer, status: u16) {
        let endpoints: [(&str, serde_json::Value); 6] = [
            ("/api/dashboard/stats", serde_json::json!({"usuarios_activos": 2})),
            ("/api/alertas/activas", serde_json::json!([{"id": 1, "tipo": "warning"}])),
            ("/api/instrumentos/estadisticas", serde_json::json!({"total": 30, "categorias": []})),
            ("/api/procedimientos/estadisticas", serde_json::json!({"total": 5, "activos": 2, "completados": 3})),
            ("/api/conteos/recientes", serde_json::json!([])),
            ("/api/sets/activos", serde_json::json!([])),
        ];
        for (endpoint, body) in endpoints {
            Mock::given(method("GET"))
                .and(path(endpoint))
                .respond_with(ResponseTemplate::new(status).set_body_json(body))
                .expect(1)
                .mount(server)
                .await;
        }
    }

    #[tokio::test]
    async fn combined_path_is_preferred() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/completo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "stats_generales": {"identificaciones_hoy": 11},
                "conteos_recientes": [{"procedimiento_nombre": "Apendicectomia", "estado": "completado"}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        // Individual endpoints must not be touched when the combined call works.
        Mock::given(method("GET"))
            .and(path("/api/dashboard/stats"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let snapshot = test_client(&server).snapshot().await.unwrap();
        assert_eq!(snapshot.general.unwrap().identifications_today, Some(11));
        assert_eq!(snapshot.recent_counts.unwrap().len(), 1);
        assert!(snapshot.alerts.is_none());
    }

    #[tokio::test]
    async fn combined_failure_falls_back_to_one_individual_round() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/completo"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        mount_individual_endpoints(&server, 200).await;

        let snapshot = test_client(&server).snapshot().await.unwrap();
        assert_eq!(snapshot.general.unwrap().active_users, Some(2));
        assert_eq!(snapshot.alerts.unwrap().len(), 1);
        assert_eq!(snapshot.instruments.unwrap().total, 30);
        assert_eq!(snapshot.procedures.unwrap().active, 2);
        assert_eq!(snapshot.recent_counts.unwrap().len(), 0);
        assert_eq!(snapshot.instrument_sets.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn partial_individual_failures_keep_snapshot_shape() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/completo"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/alertas/activas"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        // Everything else stays unmocked and 404s.

        let snapshot = test_client(&server).snapshot().await.unwrap();
        // Failed resources carry their documented fallbacks, same shape as success.
        assert_eq!(
            snapshot.general.unwrap().registered_instruments,
            Some(248),
            "stats fallback is the constant default object"
        );
        assert_eq!(snapshot.alerts.unwrap().len(), 0);
        assert_eq!(snapshot.instruments.unwrap().total, 0);
        assert_eq!(snapshot.procedures.unwrap().total, 0);
        assert!(snapshot.recent_counts.unwrap().is_empty());
        assert!(snapshot.instrument_sets.unwrap().is_empty());
    }

    #[tokio::test]
    async fn exhausted_fallback_path_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/dashboard/completo"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
        // All six individual endpoints fail; each must still be tried exactly once.
        mount_individual_endpoints(&server, 500).await;

        let err = test_client(&server).snapshot().await.unwrap_err();
        assert!(matches!(err, ClientError::AllResourcesDown));
    }
}
