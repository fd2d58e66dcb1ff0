use std::collections::HashMap;

use tracing::error;

use eventsports_protocol::common::Category;

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_by_event(&self, event_id: i64) -> Result<Vec<Category>> {
        self.api
            .get(&Endpoints::categories_by_event(event_id))
            .await
            .inspect_err(|e| error!(event_id, error = %e, "failed to list categories"))
    }

    pub async fn get(&self, id: i64) -> Result<Category> {
        self.api
            .get(&Endpoints::category(id))
            .await
            .inspect_err(|e| error!(category_id = id, error = %e, "failed to fetch category"))
    }

    pub fn active_only(categories: Vec<Category>) -> Vec<Category> {
        categories.into_iter().filter(|c| c.ativa).collect()
    }

    /// Active with a non-negative fee; a missing fee counts as free
    pub fn can_register(category: &Category) -> bool {
        category.ativa && category.valor_inscricao.unwrap_or(0.0) >= 0.0
    }

    /// Sum of fee times quantity over the selected categories
    pub fn total_fee(categories: &[Category], quantities: &HashMap<i64, u32>) -> f64 {
        categories
            .iter()
            .map(|c| {
                let quantity = quantities.get(&c.id).copied().unwrap_or(0);
                c.valor_inscricao.unwrap_or(0.0) * f64::from(quantity)
            })
            .sum()
    }
}
