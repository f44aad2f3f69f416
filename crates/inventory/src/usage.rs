//! Checkout ("uso") creation and return reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::WorkflowError;
use crate::material::finite_or_zero;

/// Lifecycle of a checkout record. The server closes a usage once every
/// item is fully accounted for; the client only submits deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsoEstado {
    Abierto,
    Cerrado,
    Cancelado,
}

/// A material reference embedded in a usage line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsoMaterial {
    pub id: i64,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub unidad: String,
}

/// One line of a checkout: what went out and how it has been accounted for
/// so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsoItem {
    pub material: UsoMaterial,
    #[serde(default)]
    pub cantidad_salida: f64,
    #[serde(default)]
    pub cantidad_devuelta: f64,
    #[serde(default)]
    pub cantidad_consumida: f64,
    #[serde(default)]
    pub cantidad_rota: f64,
    #[serde(default)]
    pub cantidad_perdida: f64,
}

impl UsoItem {
    /// Quantity already accounted for across all four buckets.
    pub fn accounted(&self) -> f64 {
        self.cantidad_devuelta + self.cantidad_consumida + self.cantidad_rota + self.cantidad_perdida
    }

    /// Quantity still out, never negative.
    pub fn pending(&self) -> f64 {
        (self.cantidad_salida - self.accounted()).max(0.0)
    }
}

/// A checkout record as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Uso {
    pub id: i64,
    pub estado: UsoEstado,
    #[serde(default)]
    pub responsable: String,
    #[serde(default)]
    pub destino: String,
    #[serde(default)]
    pub notas: String,
    #[serde(default)]
    pub items: Vec<UsoItem>,
}

/// What the user typed into the checkout form.
#[derive(Debug, Clone, Default)]
pub struct UsageDraft {
    pub responsable: String,
    pub destino: String,
    pub notas: String,
    /// `(material_id, requested quantity)` as entered, unfiltered.
    pub items: Vec<(i64, f64)>,
}

/// Validated checkout submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsagePayload {
    pub responsable: String,
    pub destino: String,
    pub notas: String,
    pub items: Vec<UsageItemPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageItemPayload {
    pub material_id: i64,
    pub cantidad: f64,
}

/// Build a checkout payload, keeping only strictly-positive finite
/// quantities. An empty result is a validation error raised before any
/// network call.
pub fn build_usage_payload(draft: &UsageDraft) -> Result<UsagePayload, WorkflowError> {
    let items: Vec<UsageItemPayload> = draft
        .items
        .iter()
        .filter(|(_, qty)| qty.is_finite() && *qty > 0.0)
        .map(|(material_id, cantidad)| UsageItemPayload {
            material_id: *material_id,
            cantidad: *cantidad,
        })
        .collect();

    if items.is_empty() {
        return Err(WorkflowError::NoValidItems);
    }

    Ok(UsagePayload {
        responsable: draft.responsable.trim().to_string(),
        destino: draft.destino.trim().to_string(),
        notas: draft.notas.trim().to_string(),
        items,
    })
}

/// The reconciliation buckets a pending quantity can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Devuelto,
    Consumido,
    Roto,
    Perdido,
}

/// One editable row of the return form, derived from an open usage line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnRow {
    pub material_id: i64,
    pub nombre: String,
    pub unidad: String,
    /// Quantity originally checked out.
    pub salida: f64,
    /// Quantity already accounted for in earlier reconciliations.
    pub ya: f64,
    pub devuelto: f64,
    pub consumido: f64,
    pub roto: f64,
    pub perdido: f64,
}

impl ReturnRow {
    pub fn from_item(item: &UsoItem) -> Self {
        Self {
            material_id: item.material.id,
            nombre: item.material.nombre.clone(),
            unidad: item.material.unidad.clone(),
            salida: item.cantidad_salida,
            ya: item.accounted(),
            devuelto: 0.0,
            consumido: 0.0,
            roto: 0.0,
            perdido: 0.0,
        }
    }

    /// Quantity still unaccounted for, never negative.
    pub fn pending(&self) -> f64 {
        (self.salida - self.ya).max(0.0)
    }

    fn entered(&self) -> f64 {
        finite_or_zero(self.devuelto)
            + finite_or_zero(self.consumido)
            + finite_or_zero(self.roto)
            + finite_or_zero(self.perdido)
    }
}

/// Bulk-assign each row's full pending amount to one bucket, clearing the
/// other three. Rows with nothing pending are untouched.
pub fn fill_all_pending(rows: &mut [ReturnRow], bucket: Bucket) {
    for row in rows.iter_mut() {
        let pending = row.pending();
        if pending <= 0.0 {
            continue;
        }
        row.devuelto = 0.0;
        row.consumido = 0.0;
        row.roto = 0.0;
        row.perdido = 0.0;
        match bucket {
            Bucket::Devuelto => row.devuelto = pending,
            Bucket::Consumido => row.consumido = pending,
            Bucket::Roto => row.roto = pending,
            Bucket::Perdido => row.perdido = pending,
        }
    }
}

/// Validated return submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnPayload {
    pub nota: String,
    pub items: Vec<ReturnItemPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnItemPayload {
    pub material_id: i64,
    pub devuelto: f64,
    pub consumido: f64,
    pub roto: f64,
    pub perdido: f64,
}

/// Build a return payload from the edited rows.
///
/// Rows whose four buckets sum to zero are dropped; if nothing remains the
/// submission is refused. A row whose buckets exceed its pending amount is
/// refused outright — `devuelto + consumido + roto + perdido` can never pass
/// `cantidad_salida` minus what was already accounted for. Both checks run
/// before any network call.
pub fn build_return_payload(rows: &[ReturnRow], nota: &str) -> Result<ReturnPayload, WorkflowError> {
    let mut items = Vec::new();

    for row in rows {
        let entered = row.entered();
        if entered <= 0.0 {
            continue;
        }
        if entered > row.pending() {
            return Err(WorkflowError::ExceedsPending {
                material_id: row.material_id,
            });
        }
        items.push(ReturnItemPayload {
            material_id: row.material_id,
            devuelto: finite_or_zero(row.devuelto),
            consumido: finite_or_zero(row.consumido),
            roto: finite_or_zero(row.roto),
            perdido: finite_or_zero(row.perdido),
        });
    }

    if items.is_empty() {
        return Err(WorkflowError::NoValidItems);
    }

    Ok(ReturnPayload {
        nota: nota.trim().to_string(),
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, salida: f64, devuelta: f64, consumida: f64) -> UsoItem {
        UsoItem {
            material: UsoMaterial {
                id,
                nombre: format!("mat-{id}"),
                unidad: "unidad".into(),
            },
            cantidad_salida: salida,
            cantidad_devuelta: devuelta,
            cantidad_consumida: consumida,
            cantidad_rota: 0.0,
            cantidad_perdida: 0.0,
        }
    }

    #[test]
    fn checkout_filters_to_positive_finite_quantities() {
        let draft = UsageDraft {
            responsable: " Ana ".into(),
            destino: "Obra 3".into(),
            notas: String::new(),
            items: vec![(1, 5.0), (2, 0.0), (3, -2.0), (4, f64::NAN), (5, 1.5)],
        };

        let payload = build_usage_payload(&draft).unwrap();
        assert_eq!(payload.responsable, "Ana");
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.items[0].material_id, 1);
        assert_eq!(payload.items[1].material_id, 5);
    }

    #[test]
    fn checkout_with_no_valid_items_is_refused() {
        let draft = UsageDraft {
            items: vec![(1, 0.0), (2, -1.0)],
            ..UsageDraft::default()
        };
        assert_eq!(build_usage_payload(&draft), Err(WorkflowError::NoValidItems));
    }

    #[test]
    fn pending_accounts_for_all_buckets() {
        let it = item(1, 10.0, 3.0, 2.0);
        assert_eq!(it.accounted(), 5.0);
        assert_eq!(it.pending(), 5.0);

        let row = ReturnRow::from_item(&it);
        assert_eq!(row.pending(), 5.0);
    }

    #[test]
    fn fill_all_assigns_pending_to_one_bucket() {
        let mut rows = vec![
            ReturnRow::from_item(&item(1, 10.0, 4.0, 0.0)),
            ReturnRow::from_item(&item(2, 3.0, 3.0, 0.0)),
        ];
        rows[0].roto = 1.0;

        fill_all_pending(&mut rows, Bucket::Consumido);

        assert_eq!(rows[0].consumido, 6.0);
        assert_eq!(rows[0].roto, 0.0);
        // Fully accounted row stays untouched.
        assert_eq!(rows[1].consumido, 0.0);
    }

    #[test]
    fn return_rows_summing_to_zero_are_dropped_and_empty_is_refused() {
        let rows = vec![ReturnRow::from_item(&item(1, 10.0, 0.0, 0.0))];
        assert_eq!(
            build_return_payload(&rows, "nada"),
            Err(WorkflowError::NoValidItems)
        );
    }

    #[test]
    fn return_over_pending_is_refused() {
        let mut row = ReturnRow::from_item(&item(7, 10.0, 6.0, 0.0));
        row.devuelto = 3.0;
        row.perdido = 2.0; // 5 > pending 4

        assert_eq!(
            build_return_payload(&[row], ""),
            Err(WorkflowError::ExceedsPending { material_id: 7 })
        );
    }

    #[test]
    fn valid_return_keeps_only_entered_rows() {
        let mut rows = vec![
            ReturnRow::from_item(&item(1, 10.0, 0.0, 0.0)),
            ReturnRow::from_item(&item(2, 4.0, 1.0, 0.0)),
        ];
        rows[1].devuelto = 2.0;
        rows[1].consumido = 1.0;

        let payload = build_return_payload(&rows, " cierre parcial ").unwrap();
        assert_eq!(payload.nota, "cierre parcial");
        assert_eq!(payload.items.len(), 1);
        let it = &payload.items[0];
        assert_eq!(it.material_id, 2);
        assert!(it.devuelto + it.consumido + it.roto + it.perdido <= 4.0);
    }
}
