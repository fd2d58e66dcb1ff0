//! Workout result DTOs
//!
//! Request bodies for the organizer results screen.

use serde::{Deserialize, Serialize};

/// Record a result for one participant in a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResultCreate {
    pub categoria_id: i64,
    pub participante_id: i64,
    pub is_equipe: bool,
    /// Reps, weight or time depending on the workout type
    pub resultado_valor: serde_json::Value,
    #[serde(default)]
    pub finalizado: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

/// Update an existing result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResultUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resultado_valor: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalizado: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

/// Response of the "are results initialized" check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsInitialized {
    pub tem_resultados: bool,
}
