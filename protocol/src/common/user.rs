//! User account types

use serde::{Deserialize, Serialize};

/// User account as embedded in login responses (`UsuarioResponseDTO`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub nome: String,
    pub email: String,
    pub tipo_usuario: String,
    #[serde(default = "default_active")]
    pub ativo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_criacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_atualizacao: Option<String>,
}

fn default_active() -> bool {
    true
}
