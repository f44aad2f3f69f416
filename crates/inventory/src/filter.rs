//! List filters and their query-parameter encodings.
//!
//! Every filter renders to `(name, value)` pairs with empty values omitted,
//! matching how the backend treats absent parameters. Paging is kept out of
//! the filter pairs so CSV export can reuse them (see [`crate::export`]).

/// Combine mode for the general search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterLogic {
    #[default]
    And,
    Or,
}

impl FilterLogic {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterLogic::And => "and",
            FilterLogic::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters for the materials list.
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    pub q: String,
    pub logic: FilterLogic,
    pub tipo: String,
    pub ubicacion: String,
    pub propio: Option<bool>,
    pub vendible: Option<bool>,
    pub low_stock: bool,
    pub cantidad_gte: Option<f64>,
    pub cantidad_lte: Option<f64>,
    pub minimo_gte: Option<f64>,
    pub minimo_lte: Option<f64>,
    pub en_uso_gte: Option<f64>,
    pub en_uso_lte: Option<f64>,
    pub sort: String,
    pub order: SortOrder,
    pub page: u32,
    pub page_size: u32,
}

impl MaterialFilter {
    /// The active filter pairs, without sort or paging.
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_str(&mut params, "q", &self.q);
        if !self.q.trim().is_empty() {
            params.push(("logic", self.logic.as_str().to_string()));
        }
        push_str(&mut params, "tipo", &self.tipo);
        push_str(&mut params, "ubicacion", &self.ubicacion);
        if let Some(propio) = self.propio {
            params.push(("propio", flag(propio)));
        }
        if let Some(vendible) = self.vendible {
            params.push(("vendible", flag(vendible)));
        }
        if self.low_stock {
            params.push(("low_stock", "1".to_string()));
        }
        push_num(&mut params, "cantidad_gte", self.cantidad_gte);
        push_num(&mut params, "cantidad_lte", self.cantidad_lte);
        push_num(&mut params, "minimo_gte", self.minimo_gte);
        push_num(&mut params, "minimo_lte", self.minimo_lte);
        push_num(&mut params, "en_uso_gte", self.en_uso_gte);
        push_num(&mut params, "en_uso_lte", self.en_uso_lte);
        params
    }

    /// Sort pairs, present only when a sort key is set.
    pub fn sort_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.sort.trim().is_empty() {
            params.push(("sort", self.sort.trim().to_string()));
            params.push(("order", self.order.as_str().to_string()));
        }
        params
    }

    /// Everything the list endpoint takes: filters, sort and paging.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter_params();
        params.extend(self.sort_params());
        if self.page > 0 {
            params.push(("page", self.page.to_string()));
        }
        if self.page_size > 0 {
            params.push(("page_size", self.page_size.to_string()));
        }
        params
    }
}

/// Filters for the usages list.
#[derive(Debug, Clone, Default)]
pub struct UsosFilter {
    pub estado: String,
    pub q: String,
    pub page: u32,
    pub page_size: u32,
}

impl UsosFilter {
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_str(&mut params, "estado", &self.estado);
        push_str(&mut params, "q", &self.q);
        params
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter_params();
        push_paging(&mut params, self.page, self.page_size);
        params
    }
}

/// Filters for the sales list.
#[derive(Debug, Clone, Default)]
pub struct VentasFilter {
    pub q: String,
    pub page: u32,
    pub page_size: u32,
}

impl VentasFilter {
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_str(&mut params, "q", &self.q);
        params
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter_params();
        push_paging(&mut params, self.page, self.page_size);
        params
    }
}

/// Filters for the stock-movement history.
#[derive(Debug, Clone, Default)]
pub struct MovimientosFilter {
    pub tipo: String,
    pub q: String,
    pub page: u32,
    pub page_size: u32,
}

impl MovimientosFilter {
    pub fn filter_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_str(&mut params, "tipo", &self.tipo);
        push_str(&mut params, "q", &self.q);
        params
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.filter_params();
        push_paging(&mut params, self.page, self.page_size);
        params
    }
}

fn push_str(params: &mut Vec<(&'static str, String)>, name: &'static str, value: &str) {
    let trimmed = value.trim();
    if !trimmed.is_empty() {
        params.push((name, trimmed.to_string()));
    }
}

fn push_num(params: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<f64>) {
    if let Some(n) = value {
        if n.is_finite() {
            params.push((name, format_num(n)));
        }
    }
}

fn push_paging(params: &mut Vec<(&'static str, String)>, page: u32, page_size: u32) {
    if page > 0 {
        params.push(("page", page.to_string()));
    }
    if page_size > 0 {
        params.push(("page_size", page_size.to_string()));
    }
}

fn flag(b: bool) -> String {
    if b { "1" } else { "0" }.to_string()
}

/// Render a numeric bound without a trailing `.0` for whole values.
fn format_num(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_renders_no_pairs() {
        let filter = MaterialFilter::default();
        assert!(filter.filter_params().is_empty());
        assert!(filter.params().is_empty());
    }

    #[test]
    fn logic_only_accompanies_a_search_term() {
        let mut filter = MaterialFilter {
            logic: FilterLogic::Or,
            ..MaterialFilter::default()
        };
        assert!(filter.filter_params().is_empty());

        filter.q = "cemento".into();
        let params = filter.filter_params();
        assert!(params.contains(&("q", "cemento".to_string())));
        assert!(params.contains(&("logic", "or".to_string())));
    }

    #[test]
    fn flags_and_bounds_render_as_the_backend_expects() {
        let filter = MaterialFilter {
            propio: Some(false),
            vendible: Some(true),
            low_stock: true,
            cantidad_gte: Some(5.0),
            cantidad_lte: Some(7.5),
            ..MaterialFilter::default()
        };
        let params = filter.filter_params();
        assert!(params.contains(&("propio", "0".to_string())));
        assert!(params.contains(&("vendible", "1".to_string())));
        assert!(params.contains(&("low_stock", "1".to_string())));
        assert!(params.contains(&("cantidad_gte", "5".to_string())));
        assert!(params.contains(&("cantidad_lte", "7.5".to_string())));
    }

    #[test]
    fn params_append_sort_and_paging() {
        let filter = MaterialFilter {
            sort: "nombre".into(),
            order: SortOrder::Desc,
            page: 2,
            page_size: 25,
            ..MaterialFilter::default()
        };
        assert_eq!(
            filter.params(),
            vec![
                ("sort", "nombre".to_string()),
                ("order", "desc".to_string()),
                ("page", "2".to_string()),
                ("page_size", "25".to_string()),
            ]
        );
    }

    #[test]
    fn usos_filter_keeps_estado_and_query() {
        let filter = UsosFilter {
            estado: "abierto".into(),
            q: " pala ".into(),
            page: 1,
            page_size: 25,
        };
        assert_eq!(
            filter.filter_params(),
            vec![
                ("estado", "abierto".to_string()),
                ("q", "pala".to_string()),
            ]
        );
    }
}
