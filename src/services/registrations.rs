use eventsports_protocol::common::{Participant, Registration};

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct RegistrationService {
    api: ApiClient,
}

impl RegistrationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Confirmed athletes or teams of a category
    pub async fn participants(&self, event_id: i64, category_id: i64) -> Result<Vec<Participant>> {
        self.api
            .get(&Endpoints::participants_by_category(event_id, category_id))
            .await
    }

    pub async fn by_category(&self, category_id: i64) -> Result<Vec<Registration>> {
        self.api
            .get(&Endpoints::registrations_by_category(category_id))
            .await
    }

    pub async fn by_event(&self, event_id: i64) -> Result<Vec<Registration>> {
        self.api.get(&Endpoints::registrations_by_event(event_id)).await
    }
}
