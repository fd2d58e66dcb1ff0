use eventsports_protocol::common::Timeline;

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct TimelineService {
    api: ApiClient,
}

impl TimelineService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_event(&self, event_id: i64) -> Result<Timeline> {
        self.api.get(&Endpoints::timeline_by_event(event_id)).await
    }
}

/// Day descriptions in order, skipping empty days
pub fn day_descriptions(timeline: &Timeline) -> Vec<(u8, &str)> {
    [
        &timeline.descricao_dia_um,
        &timeline.descricao_dia_dois,
        &timeline.descricao_dia_tres,
        &timeline.descricao_dia_quatro,
    ]
    .into_iter()
    .zip(1u8..)
    .filter_map(|(text, day)| {
        text.as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(|t| (day, t))
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::{MockReply, TestHarness};
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_timeline_days() {
        let harness = TestHarness::signed_out();
        harness.transport.on(
            Method::GET,
            "/timeline/evento/5",
            MockReply::json(
                200,
                json!({
                    "id": 1,
                    "eventoId": 5,
                    "descricaoDiaUm": "Abertura",
                    "descricaoDiaDois": " ",
                    "descricaoDiaTres": "Finais"
                }),
            ),
        );

        let timeline = TimelineService::new(harness.api.clone())
            .by_event(5)
            .await
            .unwrap();
        assert_eq!(day_descriptions(&timeline), vec![(1, "Abertura"), (3, "Finais")]);
    }
}
