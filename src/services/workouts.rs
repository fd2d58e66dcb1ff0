//! Workouts of an event and the organizer's per-workout results

use tracing::{error, info};

use eventsports_protocol::api::{ResultsInitialized, WorkoutResultCreate, WorkoutResultUpdate};
use eventsports_protocol::common::{Workout, WorkoutResult, WorkoutResultStatus};

use crate::client::ApiClient;
use crate::config::Endpoints;
use crate::error::Result;

/// Who a result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Competitor {
    Team(i64),
    Athlete(i64),
}

impl Competitor {
    fn endpoint(&self, workout_id: i64) -> String {
        match self {
            Competitor::Team(id) => Endpoints::team_result(workout_id, *id),
            Competitor::Athlete(id) => Endpoints::athlete_result(workout_id, *id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkoutService {
    api: ApiClient,
}

impl WorkoutService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn by_event(&self, event_id: i64) -> Result<Vec<Workout>> {
        self.api
            .get(&Endpoints::workouts_by_event(event_id))
            .await
            .inspect_err(|e| error!(event_id, error = %e, "failed to list workouts"))
    }

    pub async fn results(&self, workout_id: i64, category_id: i64) -> Result<Vec<WorkoutResult>> {
        self.api
            .get(&Endpoints::workout_results(workout_id, category_id))
            .await
            .inspect_err(|e| error!(workout_id, category_id, error = %e, "failed to list results"))
    }

    pub async fn add_result(
        &self,
        workout_id: i64,
        result: &WorkoutResultCreate,
    ) -> Result<WorkoutResult> {
        let created: WorkoutResult = self
            .api
            .post(&Endpoints::workout_result_create(workout_id), result)
            .await?;
        info!(workout_id, participant = result.participante_id, "result recorded");
        Ok(created)
    }

    pub async fn update_result(
        &self,
        workout_id: i64,
        competitor: Competitor,
        update: &WorkoutResultUpdate,
    ) -> Result<WorkoutResult> {
        self.api
            .put(&competitor.endpoint(workout_id), update)
            .await
            .inspect_err(|e| error!(workout_id, ?competitor, error = %e, "failed to update result"))
    }

    pub async fn delete_result(&self, workout_id: i64, competitor: Competitor) -> Result<()> {
        self.api.delete(&competitor.endpoint(workout_id)).await?;
        info!(workout_id, ?competitor, "result removed");
        Ok(())
    }

    pub async fn status(&self, workout_id: i64, category_id: i64) -> Result<WorkoutResultStatus> {
        self.api
            .get(&Endpoints::workout_status(workout_id, category_id))
            .await
    }

    /// Whether results were already created for this workout and category
    pub async fn results_initialized(&self, workout_id: i64, category_id: i64) -> Result<bool> {
        let initialized: ResultsInitialized = self
            .api
            .get(&Endpoints::results_initialized(workout_id, category_id))
            .await?;
        Ok(initialized.tem_resultados)
    }
}
