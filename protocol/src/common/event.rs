//! Event listing and event detail types
//!
//! Covers the event itself plus the per-event tabs that are plain lookups:
//! categories, timeline, attachments and registrations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================================================
// Events
// ============================================================================

/// Event as returned by GET /eventos and GET /eventos/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub data_inicio_do_evento: Option<String>,
    #[serde(default)]
    pub data_fim_do_evento: Option<String>,
    pub status: String,
    #[serde(default)]
    pub descricao_status: Option<String>,
    #[serde(default)]
    pub nome_organizador: Option<String>,
    /// Identity used by the ownership check on the results screen
    #[serde(default)]
    pub organizador_email: Option<String>,
    #[serde(default)]
    pub total_categorias: i64,
    #[serde(default)]
    pub inscricoes_ativas: i64,
    #[serde(default)]
    pub pode_receber_inscricoes: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub endereco: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub imagem_url: Option<String>,
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub evento_id: Option<i64>,
    #[serde(default)]
    pub nome_evento: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub tipo_participacao: Option<String>,
    #[serde(default)]
    pub valor_inscricao: Option<f64>,
    #[serde(default = "default_true")]
    pub ativa: bool,
}

// ============================================================================
// Timeline
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub id: i64,
    pub evento_id: i64,
    #[serde(default)]
    pub nome_evento: Option<String>,
    #[serde(default)]
    pub descricao_dia_um: Option<String>,
    #[serde(default)]
    pub descricao_dia_dois: Option<String>,
    #[serde(default)]
    pub descricao_dia_tres: Option<String>,
    #[serde(default)]
    pub descricao_dia_quatro: Option<String>,
    #[serde(default)]
    pub total_dias_com_descricao: i64,
    #[serde(default)]
    pub vazia: bool,
}

// ============================================================================
// Attachments
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i64,
    pub nome_arquivo: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub extensao: Option<String>,
    #[serde(default)]
    pub tamanho_formatado: Option<String>,
    #[serde(default = "default_true")]
    pub ativo: bool,
    #[serde(default)]
    pub tipo_mime: Option<String>,
}

// ============================================================================
// Registrations
// ============================================================================

/// Participant listed under a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: i64,
    pub nome: String,
    #[serde(default)]
    pub nome_equipe: Option<String>,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(default)]
    pub status_inscricao: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    #[serde(default)]
    pub evento_id: Option<i64>,
    #[serde(default)]
    pub categoria_id: Option<i64>,
    #[serde(default)]
    pub equipe_id: Option<i64>,
    #[serde(default)]
    pub atleta_id: Option<i64>,
    #[serde(default)]
    pub tipo_participacao: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub data_inscricao: Option<String>,
}

fn default_true() -> bool {
    true
}
