//! Materials CRUD and listing.

use inventory::{Material, MaterialDraft, MaterialFilter};
use serde::Deserialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::PageInfo;

/// `GET /api/materiales/` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialsPage {
    #[serde(default)]
    pub materiales: Vec<Material>,
    /// Distinct types across the whole inventory, for filter suggestions.
    #[serde(default)]
    pub tipos: Vec<String>,
    #[serde(default)]
    pub page: PageInfo,
}

/// Datalist suggestions derived from one page of results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    pub tipos: Vec<String>,
    pub unidades: Vec<String>,
    pub ubicaciones: Vec<String>,
}

impl MaterialsPage {
    /// Distinct, trimmed, case-insensitively sorted suggestion lists for
    /// the type/unit/location form fields.
    pub fn suggestions(&self) -> Suggestions {
        Suggestions {
            tipos: distinct_sorted(self.tipos.iter().map(String::as_str)),
            unidades: distinct_sorted(self.materiales.iter().map(|m| m.unidad.as_str())),
            ubicaciones: distinct_sorted(self.materiales.iter().map(|m| m.ubicacion.as_str())),
        }
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() || out.iter().any(|v| v == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }
    out.sort_by_key(|v| v.to_lowercase());
    out
}

impl ApiClient {
    pub async fn materiales_list(&self, filter: &MaterialFilter) -> Result<MaterialsPage, ApiError> {
        self.get("/api/materiales/", Some(&filter.params())).await
    }

    /// Create a material. The draft is normalized first, so a non-company
    /// item can never reach the backend marked sellable.
    pub async fn materiales_create(&self, draft: MaterialDraft) -> Result<Material, ApiError> {
        let draft = draft.normalized();
        self.post("/api/materiales/crear/", &draft).await
    }

    /// Update a material; same normalization as creation.
    pub async fn materiales_update(
        &self,
        id: i64,
        draft: MaterialDraft,
    ) -> Result<Material, ApiError> {
        let draft = draft.normalized();
        self.patch(&format!("/api/materiales/{id}/"), &draft).await
    }

    pub async fn materiales_delete(&self, id: i64) -> Result<Value, ApiError> {
        self.delete(&format!("/api/materiales/{id}/eliminar/")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggestions_are_distinct_trimmed_and_sorted() {
        let page: MaterialsPage = serde_json::from_str(
            r#"{
                "tipos": [" herramienta", "EPP", "herramienta ", ""],
                "materiales": [
                    {"id":1,"nombre":"a","unidad":"kg","ubicacion":"Bodega"},
                    {"id":2,"nombre":"b","unidad":" kg ","ubicacion":"almacén"},
                    {"id":3,"nombre":"c","unidad":"bolsa","ubicacion":""}
                ]
            }"#,
        )
        .unwrap();

        let s = page.suggestions();
        assert_eq!(s.tipos, vec!["EPP".to_string(), "herramienta".to_string()]);
        assert_eq!(s.unidades, vec!["bolsa".to_string(), "kg".to_string()]);
        assert_eq!(
            s.ubicaciones,
            vec!["almacén".to_string(), "Bodega".to_string()]
        );
    }
}
