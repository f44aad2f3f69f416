//! Internal sales ledger endpoints.

use inventory::sale::build_sale_payload;
use inventory::{SaleDraft, VentasFilter};
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::PageInfo;

/// One recorded sale. Only the identifiers are typed; totals and line
/// details ride along as the backend shapes them.
#[derive(Debug, Clone, Deserialize)]
pub struct Venta {
    pub id: i64,
    #[serde(default)]
    pub notas: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Aggregates over the filtered sales list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VentasSummary {
    #[serde(default)]
    pub total_venta: f64,
    #[serde(default)]
    pub total_costo: f64,
    #[serde(default)]
    pub ganancia_estimada: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VentasPage {
    #[serde(default)]
    pub items: Vec<Venta>,
    #[serde(default)]
    pub page: PageInfo,
    #[serde(default)]
    pub summary: VentasSummary,
}

impl ApiClient {
    pub async fn ventas_list(&self, filter: &VentasFilter) -> Result<VentasPage, ApiError> {
        self.get("/api/materiales/ventas/", Some(&filter.params()))
            .await
    }

    /// Record a sale. The draft is validated first; an all-empty sale never
    /// reaches the backend.
    pub async fn venta_create(&self, draft: &SaleDraft) -> Result<Value, ApiError> {
        let payload = build_sale_payload(draft)?;
        self.post("/api/materiales/ventas/crear/", &payload).await
    }
}
