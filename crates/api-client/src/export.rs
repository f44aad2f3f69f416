//! CSV exports.
//!
//! Each export mirrors its list endpoint: the default scope reproduces the
//! current filters, `scope=all` ignores them (keeping only sort/order). The
//! query assembly itself lives in [`inventory::export`] where it is unit
//! tested; these methods just fetch the bytes.

use inventory::export::{
    material_export_params, movimientos_export_params, usos_export_params, ventas_export_params,
};
use inventory::{ExportScope, MaterialFilter, MovimientosFilter, UsosFilter, VentasFilter};

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    pub async fn export_materiales_csv(
        &self,
        filter: &MaterialFilter,
        scope: ExportScope,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            "/api/materiales/export.csv",
            &material_export_params(filter, scope),
        )
        .await
    }

    pub async fn export_usos_csv(
        &self,
        filter: &UsosFilter,
        scope: ExportScope,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            "/api/materiales/usos/export.csv",
            &usos_export_params(filter, scope),
        )
        .await
    }

    pub async fn export_ventas_csv(
        &self,
        filter: &VentasFilter,
        scope: ExportScope,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            "/api/materiales/ventas/export.csv",
            &ventas_export_params(filter, scope),
        )
        .await
    }

    pub async fn export_movimientos_csv(
        &self,
        filter: &MovimientosFilter,
        scope: ExportScope,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(
            "/api/materiales/movimientos/export.csv",
            &movimientos_export_params(filter, scope),
        )
        .await
    }
}
