//! Authentication, profile and password-recovery endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use session::SessionUpdate;

use crate::client::ApiClient;
use crate::error::ApiError;

/// `POST /api/auth/login/` response. Field names vary slightly across
/// backend versions, so everything is optional and leniently typed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub usuario: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nivel: Value,
    #[serde(default)]
    pub estado: String,
}

/// One step of the forgot-password flow: either a `step` advisory with the
/// next security question, or a terminal `token`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForgotStep {
    #[serde(default)]
    pub step: Option<u32>,
    #[serde(default)]
    pub q1: Option<String>,
    #[serde(default)]
    pub q2: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// `"auth_limited"` marks a token that logs the user straight in.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub usuario: Option<String>,
    #[serde(default)]
    pub nivel: Value,
}

impl ForgotStep {
    pub fn is_terminal(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// The authenticated user's profile. Only the fields the client reasons
/// about are typed; the rest ride along in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub usuario: String,
    #[serde(default = "non_admin")]
    pub nivel: i64,
    #[serde(default)]
    pub estado: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

fn non_admin() -> i64 {
    1
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ChangePasswordRequest<'a> {
    actual_clave: &'a str,
    nueva_clave: &'a str,
}

/// Security-question update for account recovery.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityUpdate {
    pub sec_q1: String,
    pub sec_a1: String,
    pub sec_q2: String,
    pub sec_a2: String,
}

impl ApiClient {
    /// Backend liveness probe; never authenticated.
    pub async fn health(&self) -> Result<Value, ApiError> {
        self.get_noauth("/api/health/").await
    }

    /// Log in and store the session when the backend returns a token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let data: LoginResponse = self
            .post_noauth("/api/auth/login/", &LoginRequest { username, password })
            .await?;

        if !data.token.is_empty() {
            let usuario = if data.usuario.is_empty() {
                data.username.clone()
            } else {
                data.usuario.clone()
            };
            self.session().set_session(SessionUpdate {
                token: data.token.clone(),
                usuario,
                nivel: lenient_nivel(&data.nivel),
                estado: data.estado.clone(),
            });
        }
        Ok(data)
    }

    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get("/api/auth/me/", None).await
    }

    /// Patch profile fields; the backend decides which are editable.
    pub async fn me_update(&self, patch: &Value) -> Result<Value, ApiError> {
        self.patch("/api/auth/me/update/", patch).await
    }

    pub async fn me_change_password(
        &self,
        actual_clave: &str,
        nueva_clave: &str,
    ) -> Result<Value, ApiError> {
        self.post(
            "/api/auth/me/change_password/",
            &ChangePasswordRequest {
                actual_clave,
                nueva_clave,
            },
        )
        .await
    }

    pub async fn me_update_security(&self, update: &SecurityUpdate) -> Result<Value, ApiError> {
        self.post("/api/auth/me/security/", update).await
    }

    /// Delete the caller's own account; requires their password.
    pub async fn me_delete_account(&self, password: &str) -> Result<Value, ApiError> {
        self.post(
            "/api/auth/me/delete/",
            &serde_json::json!({ "password": password }),
        )
        .await
    }

    /// File an access request for manual approval.
    pub async fn register_request(&self, payload: &Value) -> Result<Value, ApiError> {
        self.post_noauth("/api/auth/register_request/", payload).await
    }

    pub async fn forgot_start(&self, usuario: &str) -> Result<ForgotStep, ApiError> {
        self.post_noauth(
            "/api/auth/forgot/start/",
            &serde_json::json!({ "usuario": usuario }),
        )
        .await
    }

    pub async fn forgot_answer1(&self, usuario: &str, a1: &str) -> Result<ForgotStep, ApiError> {
        self.post_noauth(
            "/api/auth/forgot/answer1/",
            &serde_json::json!({ "usuario": usuario, "a1": a1 }),
        )
        .await
    }

    /// Second security answer. A terminal `auth_limited` token also logs the
    /// user in with whatever level the backend granted.
    pub async fn forgot_answer2(&self, usuario: &str, a2: &str) -> Result<ForgotStep, ApiError> {
        let step: ForgotStep = self
            .post_noauth(
                "/api/auth/forgot/answer2/",
                &serde_json::json!({ "usuario": usuario, "a2": a2 }),
            )
            .await?;

        if step.kind.as_deref() == Some("auth_limited") {
            if let Some(token) = step.token.as_deref().filter(|t| !t.is_empty()) {
                self.session().set_session(SessionUpdate {
                    token: token.to_string(),
                    usuario: step
                        .usuario
                        .clone()
                        .unwrap_or_else(|| usuario.to_string()),
                    nivel: lenient_nivel(&step.nivel),
                    estado: String::new(),
                });
            }
        }
        Ok(step)
    }

    pub async fn forgot_reset(&self, token: &str, nueva_clave: &str) -> Result<Value, ApiError> {
        self.post_noauth(
            "/api/auth/forgot/reset/",
            &serde_json::json!({ "token": token, "nueva_clave": nueva_clave }),
        )
        .await
    }
}

/// Parse a level that may arrive as a number, numeric string, or garbage;
/// anything unparseable is non-admin.
pub(crate) fn lenient_nivel(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or(1),
        Value::String(s) => s.trim().parse().unwrap_or(1),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nivel_parses_leniently() {
        assert_eq!(lenient_nivel(&serde_json::json!(0)), 0);
        assert_eq!(lenient_nivel(&serde_json::json!("2")), 2);
        assert_eq!(lenient_nivel(&serde_json::json!("jefe")), 1);
        assert_eq!(lenient_nivel(&Value::Null), 1);
    }

    #[test]
    fn forgot_step_is_terminal_only_with_a_real_token() {
        let step: ForgotStep = serde_json::from_str(r#"{"step":2,"q2":"¿color?"}"#).unwrap();
        assert!(!step.is_terminal());

        let step: ForgotStep = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert!(!step.is_terminal());

        let step: ForgotStep = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        assert!(step.is_terminal());
    }

    #[test]
    fn login_response_tolerates_alternate_username_field() {
        let data: LoginResponse =
            serde_json::from_str(r#"{"token":"t","username":"ana","nivel":"0"}"#).unwrap();
        assert_eq!(data.username, "ana");
        assert!(data.usuario.is_empty());
        assert_eq!(lenient_nivel(&data.nivel), 0);
    }
}
