use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Error bodies are always this single-field object.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Success body for mutation-only endpoints.
#[derive(Debug, Serialize)]
pub struct ResultBody {
    pub result: &'static str,
}

impl ResultBody {
    #[must_use]
    pub const fn success() -> Self {
        Self { result: "success" }
    }
}

/// Inbound user body for create/update/delete.
///
/// `password` is plaintext and optional; it only exists long enough for the
/// handler to run it through the hasher. Both `isadmin` and `isAdmin` are
/// accepted on input; responses always use `isadmin`.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub id: Option<Uuid>,

    pub name: String,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(rename = "isadmin", alias = "isAdmin", default)]
    pub is_admin: bool,
}

/// Login form fields.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub login: String,

    pub password: String,
}
