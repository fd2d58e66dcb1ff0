use tracing::error;

use eventsports_protocol::common::{Leaderboard, RankingEntry};

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct LeaderboardService {
    api: ApiClient,
}

impl LeaderboardService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_event_and_category(
        &self,
        event_id: i64,
        category_id: i64,
    ) -> Result<Leaderboard> {
        self.api
            .get(&Endpoints::leaderboard(event_id, category_id))
            .await
            .inspect_err(|e| {
                error!(event_id, category_id, error = %e, "failed to fetch leaderboard")
            })
    }

    /// Full category ranking, one row per participant
    pub async fn ranking(&self, event_id: i64, category_id: i64) -> Result<Vec<RankingEntry>> {
        let mut rows: Vec<RankingEntry> = self
            .api
            .get(&Endpoints::ranking(event_id, category_id))
            .await
            .inspect_err(|e| error!(event_id, category_id, error = %e, "failed to fetch ranking"))?;
        rows.sort_by_key(|row| row.posicao);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::{MockReply, TestHarness};
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_ranking_is_ordered_by_position() {
        let harness = TestHarness::signed_out();
        harness.transport.on(
            Method::GET,
            "/leaderboards/evento/1/categoria/2/ranking",
            MockReply::json(
                200,
                json!([
                    { "posicao": 2, "nomeParticipante": "Equipe B", "pontuacaoTotal": 180 },
                    { "posicao": 1, "nomeParticipante": "Equipe A", "pontuacaoTotal": 200, "isPodio": true }
                ]),
            ),
        );

        let service = LeaderboardService::new(harness.api.clone());
        let ranking = service.ranking(1, 2).await.unwrap();
        assert_eq!(ranking[0].nome_participante, "Equipe A");
        assert!(ranking[0].is_podio);
    }

    #[tokio::test]
    async fn test_leaderboard_by_category() {
        let harness = TestHarness::signed_out();
        harness.transport.on(
            Method::GET,
            "/leaderboard/evento/1/categoria/2",
            MockReply::json(200, json!({ "entries": [], "categoria": "RX", "totalParticipantes": 0 })),
        );

        let service = LeaderboardService::new(harness.api.clone());
        let board = service.by_event_and_category(1, 2).await.unwrap();
        assert_eq!(board.categoria.as_deref(), Some("RX"));
        assert!(board.entries.is_empty());
    }
}
