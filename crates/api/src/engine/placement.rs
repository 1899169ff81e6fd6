//! Placement test generation and scoring.
//!
//! A user gets exactly one placement test. The generated item set is stored
//! in `placement_sessions` so repeated requests before submission return the
//! same items, and the scored result is stored once in `placement_results`.

use std::collections::HashMap;

use serde::Serialize;
use skilldrill_core::catalog::{CatalogItem, DifficultyBand};
use skilldrill_core::error::CoreError;
use skilldrill_core::placement::{self, PlacementResponse, ScoredAnswer};
use skilldrill_core::types::DbId;
use skilldrill_db::models::placement::{CreatePlacementResult, PlacementResult};
use skilldrill_db::models::practice_item::PracticeItem;
use skilldrill_db::repositories::{PlacementRepo, PracticeItemRepo, SkillRatingRepo};
use skilldrill_db::RepoError;
use sqlx::PgPool;

/// What `GET /placement` returns: either the stored result or the items to
/// answer.
#[derive(Debug, Serialize)]
pub struct PlacementTest {
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PlacementResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<PracticeItem>>,
}

impl PlacementTest {
    fn completed(result: PlacementResult) -> Self {
        Self {
            completed: true,
            result: Some(result),
            items: None,
        }
    }

    fn pending(items: Vec<PracticeItem>) -> Self {
        Self {
            completed: false,
            result: None,
            items: Some(items),
        }
    }
}

/// Outcome of a submission.
#[derive(Debug)]
pub struct PlacementSubmission {
    pub result: PlacementResult,
    /// `false` when an earlier submission had already been stored and this
    /// call returned it unchanged.
    pub created: bool,
}

pub struct PlacementEngine {
    pool: PgPool,
}

impl PlacementEngine {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the stored result, or the user's test (generating it on first
    /// request).
    pub async fn get_or_create_test(&self, user_id: DbId) -> Result<PlacementTest, RepoError> {
        if let Some(result) = PlacementRepo::find_result(&self.pool, user_id).await? {
            return Ok(PlacementTest::completed(result));
        }

        let session = match PlacementRepo::find_session(&self.pool, user_id).await? {
            Some(session) => session,
            None => {
                let item_ids = self.select_items().await?;
                let session = PlacementRepo::create_session(&self.pool, user_id, &item_ids).await?;
                tracing::info!(user_id, items = session.item_ids.len(), "Placement test generated");
                session
            }
        };

        let items = self.items_in_order(&session.item_ids).await?;
        Ok(PlacementTest::pending(items))
    }

    /// Score a submission, seed ratings and store the result.
    ///
    /// A second submission returns the stored result without touching
    /// ratings. Ratings are only seeded while the user has no recorded
    /// practice; otherwise the result is stored with `ratings_seeded = false`.
    pub async fn submit(
        &self,
        user_id: DbId,
        responses: Vec<PlacementResponse>,
    ) -> Result<PlacementSubmission, RepoError> {
        let mut tx = self.pool.begin().await?;

        let session = PlacementRepo::lock_session(&mut *tx, user_id).await?;
        if let Some(result) = PlacementRepo::find_result_tx(&mut *tx, user_id).await? {
            tx.commit().await?;
            tracing::debug!(user_id, "Placement already submitted, returning stored result");
            return Ok(PlacementSubmission {
                result,
                created: false,
            });
        }
        let session = session.ok_or(CoreError::NotFound {
            entity: "PlacementTest",
            id: user_id,
        })?;

        placement::validate_submission(&session.item_ids, &responses)?;

        let items = PracticeItemRepo::find_many(&self.pool, &session.item_ids).await?;
        let catalog: HashMap<DbId, CatalogItem> = items
            .iter()
            .map(|item| item.to_catalog_item().map(|c| (c.id, c)))
            .collect::<Result<_, _>>()?;

        let answers: Vec<ScoredAnswer> = responses
            .iter()
            .map(|r| ScoredAnswer {
                skills: catalog
                    .get(&r.item_id)
                    .map(|c| c.skills.clone())
                    .unwrap_or_default(),
                correct: r.correct,
            })
            .collect();

        let initial_ratings = placement::score_placement(&answers);
        let track = placement::recommend_track(&initial_ratings);

        let ratings_seeded = match SkillRatingRepo::seed_tx(&mut *tx, user_id, &initial_ratings)
            .await
        {
            Ok(()) => true,
            Err(RepoError::Core(CoreError::Conflict(reason))) => {
                tracing::warn!(user_id, %reason, "Placement ratings not seeded");
                false
            }
            Err(e) => return Err(e),
        };

        let input = CreatePlacementResult {
            user_id,
            responses,
            initial_ratings,
            recommended_track: track.as_str().to_string(),
            ratings_seeded,
        };
        let result = PlacementRepo::insert_result_tx(&mut *tx, &input).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            recommended_track = %result.recommended_track,
            ratings_seeded,
            "Placement test submitted",
        );
        Ok(PlacementSubmission {
            result,
            created: true,
        })
    }

    async fn select_items(&self) -> Result<Vec<DbId>, RepoError> {
        let rows = PracticeItemRepo::list_live_by_band(&self.pool, DifficultyBand::Foundation).await?;
        let pool: Vec<CatalogItem> = rows
            .iter()
            .map(PracticeItem::to_catalog_item)
            .collect::<Result<_, _>>()?;

        let mut rng = rand::rng();
        Ok(placement::select_placement_items(&pool, &mut rng)?)
    }

    /// Load items keeping the session's order.
    async fn items_in_order(&self, ids: &[DbId]) -> Result<Vec<PracticeItem>, RepoError> {
        let mut by_id: HashMap<DbId, PracticeItem> = PracticeItemRepo::find_many(&self.pool, ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }
}
