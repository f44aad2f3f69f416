//! Stock-movement history endpoints.

use inventory::MovimientosFilter;
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::PageInfo;

/// One movement entry (checkout, return, sale, manual adjustment). The
/// backend owns the detail shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Movimiento {
    pub id: i64,
    #[serde(default)]
    pub tipo: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovimientosPage {
    #[serde(default)]
    pub items: Vec<Movimiento>,
    #[serde(default)]
    pub page: PageInfo,
}

impl ApiClient {
    pub async fn movimientos_list(
        &self,
        filter: &MovimientosFilter,
    ) -> Result<MovimientosPage, ApiError> {
        self.get("/api/materiales/movimientos/", Some(&filter.params()))
            .await
    }
}
