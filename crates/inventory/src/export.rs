//! CSV export query scoping.
//!
//! Exports accept the same filters as their list endpoint plus a `scope`
//! switch: `all` ignores every active filter (only sort/order survive so the
//! file keeps the on-screen ordering), while the default filtered scope
//! reproduces exactly what the user is looking at.

use crate::filter::{MaterialFilter, MovimientosFilter, UsosFilter, VentasFilter};

/// Whether an export covers everything or only the filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportScope {
    All,
    #[default]
    Filtered,
}

/// Query pairs for the materials CSV export.
pub fn material_export_params(
    filter: &MaterialFilter,
    scope: ExportScope,
) -> Vec<(&'static str, String)> {
    let mut params = match scope {
        ExportScope::All => vec![("scope", "all".to_string())],
        ExportScope::Filtered => filter.filter_params(),
    };
    params.extend(filter.sort_params());
    params
}

/// Query pairs for the usages CSV export.
pub fn usos_export_params(filter: &UsosFilter, scope: ExportScope) -> Vec<(&'static str, String)> {
    match scope {
        ExportScope::All => vec![("scope", "all".to_string())],
        ExportScope::Filtered => filter.filter_params(),
    }
}

/// Query pairs for the sales CSV export.
pub fn ventas_export_params(
    filter: &VentasFilter,
    scope: ExportScope,
) -> Vec<(&'static str, String)> {
    match scope {
        ExportScope::All => vec![("scope", "all".to_string())],
        ExportScope::Filtered => filter.filter_params(),
    }
}

/// Query pairs for the stock-movement CSV export.
pub fn movimientos_export_params(
    filter: &MovimientosFilter,
    scope: ExportScope,
) -> Vec<(&'static str, String)> {
    match scope {
        ExportScope::All => vec![("scope", "all".to_string())],
        ExportScope::Filtered => filter.filter_params(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterLogic, SortOrder};

    fn busy_filter() -> MaterialFilter {
        MaterialFilter {
            q: "taladro".into(),
            logic: FilterLogic::Or,
            tipo: "herramienta".into(),
            ubicacion: "estante A".into(),
            propio: Some(true),
            vendible: Some(false),
            low_stock: true,
            cantidad_gte: Some(1.0),
            cantidad_lte: Some(50.0),
            sort: "nombre".into(),
            order: SortOrder::Asc,
            page: 3,
            page_size: 25,
            ..MaterialFilter::default()
        }
    }

    #[test]
    fn scope_all_drops_every_filter_but_keeps_ordering() {
        let params = material_export_params(&busy_filter(), ExportScope::All);
        assert_eq!(
            params,
            vec![
                ("scope", "all".to_string()),
                ("sort", "nombre".to_string()),
                ("order", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn filtered_scope_carries_every_active_filter_without_paging() {
        let params = material_export_params(&busy_filter(), ExportScope::Filtered);

        for name in [
            "q",
            "logic",
            "tipo",
            "ubicacion",
            "propio",
            "vendible",
            "low_stock",
            "cantidad_gte",
            "cantidad_lte",
            "sort",
            "order",
        ] {
            assert!(
                params.iter().any(|(n, _)| *n == name),
                "missing param {name}"
            );
        }
        assert!(!params.iter().any(|(n, _)| *n == "page" || *n == "page_size"));
        assert!(!params.iter().any(|(n, _)| *n == "scope"));
    }

    #[test]
    fn usos_export_scopes() {
        let filter = UsosFilter {
            estado: "abierto".into(),
            q: "obra".into(),
            page: 2,
            page_size: 25,
        };

        assert_eq!(
            usos_export_params(&filter, ExportScope::All),
            vec![("scope", "all".to_string())]
        );
        assert_eq!(
            usos_export_params(&filter, ExportScope::Filtered),
            vec![
                ("estado", "abierto".to_string()),
                ("q", "obra".to_string()),
            ]
        );
    }
}
