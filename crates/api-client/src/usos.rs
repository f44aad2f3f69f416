//! Checkout ("uso") endpoints.

use inventory::usage::{build_return_payload, build_usage_payload, ReturnRow, UsageDraft};
use inventory::{Uso, UsoEstado, UsosFilter};
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::PageInfo;

/// One row of the usages list.
#[derive(Debug, Clone, Deserialize)]
pub struct UsoSummary {
    pub id: i64,
    pub estado: UsoEstado,
    #[serde(default)]
    pub responsable: String,
    #[serde(default)]
    pub destino: String,
    #[serde(default)]
    pub items_count: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsosPage {
    #[serde(default)]
    pub items: Vec<UsoSummary>,
    #[serde(default)]
    pub page: PageInfo,
}

impl ApiClient {
    pub async fn usos_list(&self, filter: &UsosFilter) -> Result<UsosPage, ApiError> {
        self.get("/api/materiales/usos/", Some(&filter.params()))
            .await
    }

    pub async fn uso_detail(&self, id: i64) -> Result<Uso, ApiError> {
        self.get(&format!("/api/materiales/usos/{id}/"), None).await
    }

    /// Register a checkout. The draft is validated first; a draft with no
    /// positive quantity never reaches the backend.
    pub async fn uso_create(&self, draft: &UsageDraft) -> Result<Uso, ApiError> {
        let payload = build_usage_payload(draft)?;
        self.post("/api/materiales/usos/crear/", &payload).await
    }

    /// Submit a partial or full reconciliation for an open checkout. Rows
    /// are validated against the pending amounts before any network call.
    pub async fn uso_return(
        &self,
        id: i64,
        rows: &[ReturnRow],
        nota: &str,
    ) -> Result<Value, ApiError> {
        let payload = build_return_payload(rows, nota)?;
        self.post(&format!("/api/materiales/usos/{id}/devolver/"), &payload)
            .await
    }
}
