use async_trait::async_trait;
use tracing::error;

use eventsports_protocol::common::Event;

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;
use crate::guard::EventLookup;

/// Status of an event accepting registrations
pub const STATUS_OPEN: &str = "ABERTO";

#[derive(Debug, Clone)]
pub struct EventService {
    api: ApiClient,
}

impl EventService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// All events, newest first. Events without a creation date sort last.
    pub async fn list(&self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .api
            .get(Endpoints::EVENTS)
            .await
            .inspect_err(|e| error!(error = %e, "failed to list events"))?;
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    pub async fn get(&self, id: i64) -> Result<Event> {
        self.api
            .get(&Endpoints::event(id))
            .await
            .inspect_err(|e| error!(event_id = id, error = %e, "failed to fetch event"))
    }

    pub async fn list_by_status(&self, status: &str) -> Result<Vec<Event>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|event| event.status == status)
            .collect())
    }

    pub fn is_open(event: &Event) -> bool {
        event.status == STATUS_OPEN && event.pode_receber_inscricoes
    }
}

#[async_trait]
impl EventLookup for EventService {
    async fn fetch_event(&self, id: i64) -> Result<Event> {
        self.get(id).await
    }
}
