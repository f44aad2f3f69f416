//! Error taxonomy and backend error-envelope parsing.
//!
//! Every failure a caller can see falls into one of four families: no
//! response at all (unreachable or timed out, both `status() == 0`), an HTTP
//! error with a parsed body, a malformed success body, or a client-side
//! workflow rejection that never reached the wire. The backend's error
//! envelope is `{detail?|message?|error?, code?|error_code?}` plus optional
//! field-level validation maps.

use inventory::WorkflowError;
use serde_json::Value;
use thiserror::Error;

/// A failed API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure; no HTTP response arrived.
    #[error("API no disponible (backend desconectado)")]
    Unreachable(#[source] reqwest::Error),

    /// The 15-second client timeout elapsed without a response.
    #[error("Tiempo de espera agotado (backend no responde)")]
    Timeout,

    /// The backend answered with a non-2xx status.
    #[error("{}", http_display(.status, .detail))]
    Http {
        status: u16,
        /// Best-effort machine code from `code`/`error_code`/`error`.
        code: Option<String>,
        /// Best-effort human text from `detail`/`message`/`error`.
        detail: Option<String>,
        /// The parsed body, for caller-specific mapping.
        body: Option<Value>,
    },

    /// A 2xx response whose body did not parse as expected.
    #[error("Respuesta inválida del backend: {0}")]
    Decode(String),

    /// The submission was rejected client-side before any network call.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The client itself could not be built.
    #[error("Configuración inválida: {0}")]
    Config(String),
}

fn http_display(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(d) if !d.is_empty() => d.clone(),
        _ => format!("HTTP {status}"),
    }
}

impl ApiError {
    /// Build the error for a non-2xx response from its raw body text.
    pub fn from_response(status: u16, text: &str) -> Self {
        let body = parse_body(text);
        let code = body.as_ref().and_then(extract_code);
        let detail = body.as_ref().and_then(extract_detail);
        ApiError::Http {
            status,
            code,
            detail,
            body,
        }
    }

    /// HTTP status, `0` when no response arrived (or none applies).
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. } => *status,
            _ => 0,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// 401: the session token was rejected and the store has been cleared.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }

    /// 403/500: a polling loop must stop instead of retrying.
    pub fn is_hard_stop(&self) -> bool {
        matches!(self.status(), 403 | 500)
    }

    /// Backend asked the client to back off.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == 429 || self.code() == Some("RATE_LIMIT")
    }

    /// Field-level validation messages as `"campo: mensaje"` lines, falling
    /// back to the single detail when the body has no field map.
    pub fn detail_lines(&self) -> Vec<String> {
        let ApiError::Http { body, detail, .. } = self else {
            return vec![self.to_string()];
        };

        let mut lines = Vec::new();
        if let Some(Value::Object(map)) = body {
            for (field, value) in map {
                if matches!(field.as_str(), "code" | "error_code" | "detail" | "message") {
                    continue;
                }
                match value {
                    Value::String(msg) => lines.push(format!("{field}: {msg}")),
                    Value::Array(items) => {
                        for item in items {
                            if let Value::String(msg) = item {
                                lines.push(format!("{field}: {msg}"));
                            }
                        }
                    }
                    _ => {}
                }
            }
        }

        if lines.is_empty() {
            match detail {
                Some(d) => vec![d.clone()],
                None => vec![self.to_string()],
            }
        } else {
            lines
        }
    }

    /// User-facing login failure text: the backend's own detail wins,
    /// otherwise a fixed table maps the known account codes, otherwise a
    /// generic fallback.
    pub fn login_message(&self) -> String {
        if let ApiError::Http {
            detail: Some(d), ..
        } = self
        {
            if !d.is_empty() {
                return d.clone();
            }
        }
        if let ApiError::Unreachable(_) | ApiError::Timeout = self {
            return self.to_string();
        }

        match self.code() {
            Some("faltan_credenciales") => "Ingresa usuario y clave.".to_string(),
            Some("credenciales_invalidas") => {
                "El usuario o la clave no son correctos.".to_string()
            }
            Some("cuenta_pendiente") => "Tu cuenta está pendiente de aprobación.".to_string(),
            Some("cuenta_rechazada") => {
                "Tu cuenta fue rechazada. Si crees que es un error, contacta a un administrador."
                    .to_string()
            }
            Some("cuenta_baneada") => {
                "Tu cuenta fue bloqueada. Contacta a un administrador.".to_string()
            }
            Some("cuenta_inactiva") => {
                "Tu cuenta está inactiva. Contacta a un administrador.".to_string()
            }
            _ => "No se pudo iniciar sesión. Intenta de nuevo.".to_string(),
        }
    }
}

/// Parse an error body: JSON when possible, the raw text otherwise.
fn parse_body(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(trimmed.to_string())),
    }
}

fn extract_code(body: &Value) -> Option<String> {
    for key in ["code", "error_code", "error"] {
        if let Some(Value::String(s)) = body.get(key) {
            if !s.is_empty() {
                return Some(s.clone());
            }
        }
    }
    None
}

fn extract_detail(body: &Value) -> Option<String> {
    for key in ["detail", "message", "error"] {
        if let Some(Value::String(s)) = body.get(key) {
            if !s.is_empty() {
                return Some(s.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_fields_are_extracted_in_order() {
        let err = ApiError::from_response(400, r#"{"detail":"campo requerido","code":"invalid"}"#);
        assert_eq!(err.status(), 400);
        assert_eq!(err.code(), Some("invalid"));
        assert_eq!(err.to_string(), "campo requerido");
    }

    #[test]
    fn string_error_field_serves_as_both_code_and_detail() {
        let err = ApiError::from_response(409, r#"{"error":"duplicado"}"#);
        assert_eq!(err.code(), Some("duplicado"));
        assert_eq!(err.to_string(), "duplicado");
    }

    #[test]
    fn non_json_body_is_kept_verbatim() {
        let err = ApiError::from_response(502, "Bad Gateway");
        assert_eq!(err.code(), None);
        assert_eq!(err.to_string(), "HTTP 502");
        match err {
            ApiError::Http { body, .. } => {
                assert_eq!(body, Some(Value::String("Bad Gateway".into())));
            }
            _ => panic!("expected Http"),
        }
    }

    #[test]
    fn field_level_bodies_become_labelled_lines() {
        let err = ApiError::from_response(
            400,
            r#"{"nombre":["obligatorio"],"precio":"debe ser positivo","code":"invalid"}"#,
        );
        let lines = err.detail_lines();
        assert!(lines.contains(&"nombre: obligatorio".to_string()));
        assert!(lines.contains(&"precio: debe ser positivo".to_string()));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn status_zero_means_no_response() {
        assert_eq!(ApiError::Timeout.status(), 0);
        assert!(!ApiError::Timeout.is_hard_stop());
    }

    #[test]
    fn hard_stop_statuses_match_the_poll_policy() {
        assert!(ApiError::from_response(403, "{}").is_hard_stop());
        assert!(ApiError::from_response(500, "{}").is_hard_stop());
        assert!(!ApiError::from_response(404, "{}").is_hard_stop());
    }

    #[test]
    fn login_table_maps_known_codes() {
        let err = ApiError::from_response(403, r#"{"code":"cuenta_pendiente"}"#);
        assert_eq!(err.login_message(), "Tu cuenta está pendiente de aprobación.");

        let err = ApiError::from_response(401, r#"{"code":"credenciales_invalidas"}"#);
        assert_eq!(
            err.login_message(),
            "El usuario o la clave no son correctos."
        );

        let err = ApiError::from_response(418, r#"{"code":"tetera"}"#);
        assert_eq!(err.login_message(), "No se pudo iniciar sesión. Intenta de nuevo.");
    }

    #[test]
    fn backend_detail_beats_the_login_table() {
        let err =
            ApiError::from_response(403, r#"{"code":"cuenta_baneada","detail":"hasta el lunes"}"#);
        assert_eq!(err.login_message(), "hasta el lunes");
    }

    #[test]
    fn rate_limit_by_status_or_code() {
        assert!(ApiError::from_response(429, "{}").is_rate_limited());
        assert!(ApiError::from_response(403, r#"{"code":"RATE_LIMIT"}"#).is_rate_limited());
        assert!(!ApiError::from_response(403, "{}").is_rate_limited());
    }
}
