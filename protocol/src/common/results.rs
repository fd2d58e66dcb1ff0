//! Workouts, leaderboards and per-workout results

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: i64,
    pub nome: String,
    /// REPS, PESO or TEMPO
    pub tipo: String,
    #[serde(default = "default_true")]
    pub ativo: bool,
    #[serde(default)]
    pub quantidade_categorias: i64,
    #[serde(default)]
    pub nomes_categorias: Option<String>,
    #[serde(default)]
    pub nome_evento: Option<String>,
    #[serde(default)]
    pub unidade_medida: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: i64,
    pub evento_id: i64,
    pub categoria_id: i64,
    #[serde(default)]
    pub atleta_id: Option<i64>,
    #[serde(default)]
    pub equipe_id: Option<i64>,
    pub nome: String,
    pub posicao: i64,
    pub pontuacao: f64,
    #[serde(default)]
    pub tempo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    #[serde(default)]
    pub entries: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub total_participantes: i64,
}

/// Overall category ranking row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub posicao: i64,
    pub nome_participante: String,
    #[serde(default)]
    pub pontuacao_total: i64,
    #[serde(default)]
    pub is_equipe: bool,
    #[serde(default)]
    pub participante_id: Option<i64>,
    #[serde(default)]
    pub nome_categoria: Option<String>,
    #[serde(default)]
    pub workouts_completados: i64,
    #[serde(default)]
    pub is_podio: bool,
    #[serde(default)]
    pub medalha: Option<String>,
}

/// One participant's result in one workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResult {
    pub id: i64,
    #[serde(default)]
    pub posicao_workout: Option<i64>,
    pub nome_participante: String,
    #[serde(default)]
    pub nome_workout: Option<String>,
    #[serde(default)]
    pub nome_categoria: Option<String>,
    #[serde(default)]
    pub resultado_formatado: Option<String>,
    #[serde(default)]
    pub finalizado: bool,
    #[serde(default)]
    pub is_podio_workout: bool,
    #[serde(default)]
    pub medalha_workout: Option<String>,
    #[serde(default)]
    pub is_categoria_equipe: bool,
}

/// Completion status of a workout within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResultStatus {
    pub workout_id: i64,
    #[serde(default)]
    pub nome_workout: Option<String>,
    pub categoria_id: i64,
    #[serde(default)]
    pub nome_categoria: Option<String>,
    #[serde(default)]
    pub total_participantes: i64,
    #[serde(default)]
    pub participantes_finalizados: i64,
    #[serde(default)]
    pub porcentagem_finalizados: f64,
    #[serde(default)]
    pub workout_finalizado: bool,
    #[serde(default)]
    pub participantes_pendentes: Vec<String>,
}

fn default_true() -> bool {
    true
}
