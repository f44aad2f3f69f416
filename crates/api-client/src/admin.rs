//! Admin panel endpoints.
//!
//! Every state-changing admin action re-sends the admin's own password as a
//! confirmation parameter (`admin_password`); the helpers here inject it so
//! no call site can forget.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::PageInfo;

/// A user row in the admin lists (active users and pending requests).
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    #[serde(default)]
    pub usuario: String,
    #[serde(default = "non_admin")]
    pub nivel: i64,
    #[serde(default)]
    pub estado: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn non_admin() -> i64 {
    1
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUsersPage {
    #[serde(default)]
    pub items: Vec<AdminUser>,
    #[serde(default)]
    pub page: PageInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditPage {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub page: PageInfo,
}

/// Search and paging for the admin lists.
#[derive(Debug, Clone, Default)]
pub struct AdminListFilter {
    pub q: String,
    pub page: u32,
    pub page_size: u32,
}

impl AdminListFilter {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !self.q.trim().is_empty() {
            params.push(("q", self.q.trim().to_string()));
        }
        if self.page > 0 {
            params.push(("page", self.page.to_string()));
        }
        if self.page_size > 0 {
            params.push(("page_size", self.page_size.to_string()));
        }
        params
    }
}

/// Merge `admin_password` into a JSON object payload.
fn with_admin_password(payload: &Value, admin_password: &str) -> Value {
    let mut map = match payload {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("payload".to_string(), other.clone());
            map
        }
    };
    map.insert(
        "admin_password".to_string(),
        Value::String(admin_password.to_string()),
    );
    Value::Object(map)
}

impl ApiClient {
    pub async fn admin_solicitudes(
        &self,
        filter: &AdminListFilter,
    ) -> Result<AdminUsersPage, ApiError> {
        self.get("/api/admin/solicitudes/", Some(&filter.params()))
            .await
    }

    pub async fn admin_aprobar_solicitud(
        &self,
        user_id: i64,
        admin_password: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            &format!("/api/admin/solicitudes/{user_id}/aprobar/"),
            &with_admin_password(&Value::Null, admin_password),
        )
        .await
    }

    pub async fn admin_rechazar_solicitud(
        &self,
        user_id: i64,
        admin_password: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            &format!("/api/admin/solicitudes/{user_id}/rechazar/"),
            &with_admin_password(&Value::Null, admin_password),
        )
        .await
    }

    pub async fn admin_usuarios(
        &self,
        filter: &AdminListFilter,
    ) -> Result<AdminUsersPage, ApiError> {
        self.get("/api/admin/usuarios/", Some(&filter.params()))
            .await
    }

    pub async fn admin_usuario_crear(
        &self,
        payload: &Value,
        admin_password: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            "/api/admin/usuarios/crear/",
            &with_admin_password(payload, admin_password),
        )
        .await
    }

    pub async fn admin_usuario_actualizar(
        &self,
        user_id: i64,
        patch: &Value,
        admin_password: &str,
    ) -> Result<Value, ApiError> {
        self.patch(
            &format!("/api/admin/usuarios/{user_id}/"),
            &with_admin_password(patch, admin_password),
        )
        .await
    }

    pub async fn admin_usuario_eliminar(
        &self,
        user_id: i64,
        admin_password: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            &format!("/api/admin/usuarios/{user_id}/eliminar/"),
            &with_admin_password(&Value::Null, admin_password),
        )
        .await
    }

    /// Issue a fresh random password for a user.
    pub async fn admin_usuario_generar_clave(
        &self,
        user_id: i64,
        admin_password: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            &format!("/api/admin/usuarios/{user_id}/generar_clave/"),
            &with_admin_password(&Value::Null, admin_password),
        )
        .await
    }

    pub async fn admin_auditoria(&self, filter: &AdminListFilter) -> Result<AuditPage, ApiError> {
        self.get("/api/admin/auditoria/", Some(&filter.params()))
            .await
    }

    pub async fn admin_ips(&self) -> Result<Value, ApiError> {
        self.get("/api/admin/ip/", None).await
    }

    pub async fn admin_ip_ban(&self, ip: &str, admin_password: &str) -> Result<Value, ApiError> {
        self.post(
            "/api/admin/ip/ban/",
            &with_admin_password(&serde_json::json!({ "ip": ip }), admin_password),
        )
        .await
    }

    pub async fn admin_ip_unban(&self, ip: &str, admin_password: &str) -> Result<Value, ApiError> {
        self.post(
            "/api/admin/ip/unban/",
            &with_admin_password(&serde_json::json!({ "ip": ip }), admin_password),
        )
        .await
    }
}
