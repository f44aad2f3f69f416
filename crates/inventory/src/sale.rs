//! Internal sales ledger workflow.
//!
//! Sales are a control record, not a point of sale: the client offers only
//! company-owned sellable materials, previews totals on screen, and submits
//! quantities. Whatever the backend persists is authoritative.

use serde::Serialize;

use crate::error::WorkflowError;
use crate::material::{finite_or_zero, Material};

/// Keep only materials eligible for the sales ledger.
pub fn sellable(materials: &[Material]) -> Vec<&Material> {
    materials.iter().filter(|m| m.propio && m.vendible).collect()
}

/// One line of the sale form.
#[derive(Debug, Clone)]
pub struct SaleLine {
    pub material: Material,
    pub cantidad: f64,
    /// Overrides the material's reference sale price when set.
    pub precio_venta_unitario: Option<f64>,
}

impl SaleLine {
    fn unit_price(&self) -> f64 {
        finite_or_zero(self.precio_venta_unitario.unwrap_or(self.material.precio_venta))
    }
}

/// What the user assembled before submitting.
#[derive(Debug, Clone, Default)]
pub struct SaleDraft {
    pub notas: String,
    pub lines: Vec<SaleLine>,
}

/// On-screen preview totals. Cost uses each material's current unit cost as
/// a snapshot; profit is sale minus cost. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SaleTotals {
    pub total_venta: f64,
    pub total_costo: f64,
    pub ganancia: f64,
}

/// Compute preview totals over the lines with a positive quantity.
pub fn preview(draft: &SaleDraft) -> SaleTotals {
    let mut total_venta = 0.0;
    let mut total_costo = 0.0;

    for line in &draft.lines {
        let qty = finite_or_zero(line.cantidad);
        if qty <= 0.0 {
            continue;
        }
        total_venta += qty * line.unit_price();
        total_costo += qty * finite_or_zero(line.material.precio);
    }

    SaleTotals {
        total_venta,
        total_costo,
        ganancia: total_venta - total_costo,
    }
}

/// Validated sale submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalePayload {
    pub notas: String,
    pub items: Vec<SaleItemPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleItemPayload {
    pub material_id: i64,
    pub cantidad: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_venta_unitario: Option<f64>,
}

/// Build the sale payload, keeping strictly-positive finite quantities.
pub fn build_sale_payload(draft: &SaleDraft) -> Result<SalePayload, WorkflowError> {
    let items: Vec<SaleItemPayload> = draft
        .lines
        .iter()
        .filter(|l| l.cantidad.is_finite() && l.cantidad > 0.0)
        .map(|l| SaleItemPayload {
            material_id: l.material.id,
            cantidad: l.cantidad,
            precio_venta_unitario: l.precio_venta_unitario,
        })
        .collect();

    if items.is_empty() {
        return Err(WorkflowError::NoValidItems);
    }

    Ok(SalePayload {
        notas: draft.notas.trim().to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: i64, propio: bool, vendible: bool, precio: f64, precio_venta: f64) -> Material {
        Material {
            id,
            nombre: format!("mat-{id}"),
            tipo: String::new(),
            unidad: "unidad".into(),
            precio,
            vendible,
            precio_venta,
            ubicacion: String::new(),
            cantidad: 100.0,
            minimo: 0.0,
            en_uso: 0.0,
            propio,
        }
    }

    #[test]
    fn only_company_owned_sellable_materials_are_offered() {
        let mats = vec![
            material(1, true, true, 1.0, 2.0),
            material(2, true, false, 1.0, 2.0),
            material(3, false, true, 1.0, 2.0),
            material(4, false, false, 1.0, 2.0),
        ];
        let offered = sellable(&mats);
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0].id, 1);
    }

    #[test]
    fn preview_totals_use_override_price_and_cost_snapshot() {
        let draft = SaleDraft {
            notas: String::new(),
            lines: vec![
                SaleLine {
                    material: material(1, true, true, 10.0, 15.0),
                    cantidad: 2.0,
                    precio_venta_unitario: Some(20.0),
                },
                SaleLine {
                    material: material(2, true, true, 5.0, 8.0),
                    cantidad: 1.0,
                    precio_venta_unitario: None,
                },
                SaleLine {
                    material: material(3, true, true, 5.0, 8.0),
                    cantidad: 0.0,
                    precio_venta_unitario: Some(99.0),
                },
            ],
        };

        let totals = preview(&draft);
        assert_eq!(totals.total_venta, 2.0 * 20.0 + 8.0);
        assert_eq!(totals.total_costo, 2.0 * 10.0 + 5.0);
        assert_eq!(totals.ganancia, totals.total_venta - totals.total_costo);
    }

    #[test]
    fn empty_sale_is_refused() {
        let draft = SaleDraft {
            notas: "venta semanal".into(),
            lines: vec![SaleLine {
                material: material(1, true, true, 1.0, 2.0),
                cantidad: 0.0,
                precio_venta_unitario: None,
            }],
        };
        assert_eq!(build_sale_payload(&draft), Err(WorkflowError::NoValidItems));
    }
}
