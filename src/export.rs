//! One-way export of an assembled dashboard.

use anyhow::{Context, Result};

use crate::assembler::DashboardView;
use crate::models::ClientId;

pub trait ViewExporter: Send + Sync {
    /// Render the view as a standalone document.
    fn export(&self, client: ClientId, view: &DashboardView) -> Result<Vec<u8>>;

    /// Suggested file extension, without the dot.
    fn extension(&self) -> &'static str;
}

#[derive(Debug, Clone, Default)]
pub struct JsonExporter;

impl ViewExporter for JsonExporter {
    fn export(&self, client: ClientId, view: &DashboardView) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(view)
            .with_context(|| format!("Failed to serialize dashboard for client {client}"))?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

/// File name for an exported view, e.g. `raiox-1002-2024-07-15.json`.
pub fn export_file_name(exporter: &dyn ViewExporter, view: &DashboardView) -> String {
    format!(
        "raiox-{}-{}.{}",
        view.client,
        view.generated_at.format("%Y-%m-%d"),
        exporter.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::DashboardAssembler;
    use crate::backend::MemoryBackend;
    use crate::clock::FixedClock;
    use crate::defaults::DefaultDataSet;
    use chrono::NaiveDate;
    use std::sync::Arc;

    async fn view() -> DashboardView {
        let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        DashboardAssembler::new(
            Arc::new(MemoryBackend::new()),
            Arc::new(DefaultDataSet::demo(today)),
        )
        .with_clock(Arc::new(FixedClock::on(today)))
        .assemble(ClientId::new(1002))
        .await
        .view
    }

    #[tokio::test]
    async fn json_export_parses_back() {
        let view = view().await;
        let bytes = JsonExporter.export(view.client, &view).unwrap();
        let parsed: DashboardView = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.client, view.client);
        assert_eq!(
            parsed.financial.portfolio.data_source,
            view.financial.portfolio.data_source
        );
    }

    #[tokio::test]
    async fn file_name_includes_client_and_date() {
        let view = view().await;
        assert_eq!(
            export_file_name(&JsonExporter, &view),
            "raiox-1002-2024-07-15.json"
        );
    }
}
