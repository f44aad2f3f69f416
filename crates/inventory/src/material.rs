//! Inventory items.

use serde::{Deserialize, Serialize};

/// One inventory item as the backend reports it.
///
/// `cantidad` is stock on hand, `en_uso` is stock checked out, `minimo` the
/// low-stock alert threshold. `propio` distinguishes company-owned stock
/// from third-party stock managed on a client's behalf; only company-owned
/// items may be `vendible`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub tipo: String,
    #[serde(default)]
    pub unidad: String,
    #[serde(default)]
    pub precio: f64,
    #[serde(default)]
    pub vendible: bool,
    #[serde(default)]
    pub precio_venta: f64,
    #[serde(default)]
    pub ubicacion: String,
    #[serde(default)]
    pub cantidad: f64,
    #[serde(default)]
    pub minimo: f64,
    #[serde(default)]
    pub en_uso: f64,
    #[serde(default)]
    pub propio: bool,
}

impl Material {
    /// Low-stock alert: a threshold is set and available stock is at or
    /// below it.
    pub fn is_low_stock(&self) -> bool {
        self.minimo > 0.0 && self.cantidad <= self.minimo
    }
}

/// Create/update payload for a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MaterialDraft {
    pub nombre: String,
    pub tipo: String,
    pub unidad: String,
    pub precio: f64,
    pub vendible: bool,
    pub precio_venta: f64,
    pub ubicacion: String,
    pub cantidad: f64,
    pub minimo: f64,
    pub propio: bool,
}

impl MaterialDraft {
    /// Normalize the draft before submission.
    ///
    /// Third-party stock can never be sellable: `propio = false` forces
    /// `vendible = false` and zeroes the sale price. Blank units default to
    /// `"unidad"`, and non-finite numbers collapse to zero so a half-typed
    /// form never reaches the wire. The backend is expected to enforce the
    /// sellable constraint on its side as well.
    pub fn normalized(mut self) -> Self {
        if !self.propio {
            self.vendible = false;
            self.precio_venta = 0.0;
        }
        self.unidad = {
            let trimmed = self.unidad.trim();
            if trimmed.is_empty() {
                "unidad".to_string()
            } else {
                trimmed.to_string()
            }
        };
        self.precio = finite_or_zero(self.precio);
        self.precio_venta = finite_or_zero(self.precio_venta);
        self.cantidad = finite_or_zero(self.cantidad);
        self.minimo = finite_or_zero(self.minimo);
        self
    }
}

pub(crate) fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_party_stock_cannot_be_sellable() {
        let draft = MaterialDraft {
            nombre: "Casco".into(),
            propio: false,
            vendible: true,
            precio_venta: 12.5,
            ..MaterialDraft::default()
        }
        .normalized();

        assert!(!draft.vendible);
        assert_eq!(draft.precio_venta, 0.0);
    }

    #[test]
    fn company_stock_keeps_its_sale_flag() {
        let draft = MaterialDraft {
            nombre: "Cemento".into(),
            propio: true,
            vendible: true,
            precio_venta: 30.0,
            ..MaterialDraft::default()
        }
        .normalized();

        assert!(draft.vendible);
        assert_eq!(draft.precio_venta, 30.0);
    }

    #[test]
    fn blank_unit_defaults_and_nan_collapses() {
        let draft = MaterialDraft {
            unidad: "  ".into(),
            cantidad: f64::NAN,
            ..MaterialDraft::default()
        }
        .normalized();

        assert_eq!(draft.unidad, "unidad");
        assert_eq!(draft.cantidad, 0.0);
    }

    #[test]
    fn low_stock_requires_a_threshold() {
        let mut m = Material {
            id: 1,
            nombre: "Guantes".into(),
            tipo: String::new(),
            unidad: "par".into(),
            precio: 0.0,
            vendible: false,
            precio_venta: 0.0,
            ubicacion: String::new(),
            cantidad: 0.0,
            minimo: 0.0,
            en_uso: 0.0,
            propio: true,
        };
        assert!(!m.is_low_stock());

        m.minimo = 5.0;
        m.cantidad = 5.0;
        assert!(m.is_low_stock());

        m.cantidad = 6.0;
        assert!(!m.is_low_stock());
    }
}
