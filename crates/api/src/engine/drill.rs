//! Daily drill assembly and item completion.

use serde::Serialize;
use skilldrill_core::catalog::CatalogItem;
use skilldrill_core::config::PracticeConfig;
use skilldrill_core::drill::{self, DRILL_MAX_REVIEW_ITEMS, DRILL_TARGET_SKILLS};
use skilldrill_core::error::CoreError;
use skilldrill_core::review::ReviewSchedule;
use skilldrill_core::types::{CalendarDay, DbId, Timestamp};
use skilldrill_db::models::drill::{CreateDrillItemAttempt, DailyDrill};
use skilldrill_db::models::practice_item::PracticeItem;
use skilldrill_db::models::skill_rating::RatingChange;
use skilldrill_db::models::streak::StreakRecord;
use skilldrill_db::repositories::{
    DrillRepo, PracticeItemRepo, ReviewDeckRepo, SkillRatingRepo, StreakRepo,
};
use skilldrill_db::RepoError;
use sqlx::PgPool;

/// One answered drill item as reported by the client.
#[derive(Debug, Clone)]
pub struct ItemAnswer {
    pub response: Option<String>,
    pub correct: bool,
    pub time_ms: i64,
}

/// Result of completing one drill item.
#[derive(Debug, Serialize)]
pub struct ItemCompletion {
    pub drill_completed: bool,
    pub drill: DailyDrill,
    pub rating_changes: Vec<RatingChange>,
    /// Present only when this completion finished the drill.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streak: Option<StreakRecord>,
}

/// Builds each user's drill for the day and applies item completions.
pub struct DrillScheduler {
    pool: PgPool,
    config: PracticeConfig,
    schedule: ReviewSchedule,
}

impl DrillScheduler {
    pub fn new(pool: PgPool, config: PracticeConfig) -> Self {
        let schedule = ReviewSchedule::new(config.review_intervals_days.clone());
        Self {
            pool,
            config,
            schedule,
        }
    }

    pub async fn get_todays_drill(
        &self,
        user_id: DbId,
        today: CalendarDay,
    ) -> Result<Option<DailyDrill>, RepoError> {
        Ok(DrillRepo::find_for_day(&self.pool, user_id, today).await?)
    }

    /// Return the drill for `today`, assembling it if none exists.
    ///
    /// The boolean is `true` when this call created the drill.
    pub async fn get_or_create_drill(
        &self,
        user_id: DbId,
        today: CalendarDay,
        now: Timestamp,
    ) -> Result<(DailyDrill, bool), RepoError> {
        if let Some(existing) = DrillRepo::find_for_day(&self.pool, user_id, today).await? {
            return Ok((existing, false));
        }

        let due = ReviewDeckRepo::due_items(
            &self.pool,
            user_id,
            now,
            DRILL_MAX_REVIEW_ITEMS as i64,
        )
        .await?;
        let ratings = SkillRatingRepo::ratings_map(&self.pool, user_id).await?;
        let weakest = drill::weakest_skills(&ratings, DRILL_TARGET_SKILLS);

        let live: Vec<CatalogItem> = PracticeItemRepo::list_live(&self.pool)
            .await?
            .iter()
            .map(PracticeItem::to_catalog_item)
            .collect::<Result<_, _>>()?;

        let plan = {
            let mut rng = rand::rng();
            drill::plan_drill(&due, &weakest, &live, &mut rng)?
        };

        let (drill, created) =
            DrillRepo::create_if_absent(&self.pool, user_id, today, &plan.item_ids).await?;
        if created {
            tracing::info!(
                user_id,
                drill_id = drill.id,
                items = drill.item_ids.len(),
                review_items = plan.review_count,
                target_skills = ?plan.target_skills,
                "Daily drill created",
            );
        }
        Ok((drill, created))
    }

    /// Record one answered item.
    ///
    /// Ratings for every skill the item exercises, the review deck entry,
    /// drill progress, the attempt log and (when this finishes the drill)
    /// the streak are written in one transaction.
    pub async fn complete_item(
        &self,
        user_id: DbId,
        drill_id: DbId,
        item_id: DbId,
        answer: ItemAnswer,
        today: CalendarDay,
        now: Timestamp,
    ) -> Result<ItemCompletion, RepoError> {
        drill::validate_item_time(answer.time_ms)?;

        let item = PracticeItemRepo::find_by_id(&self.pool, item_id).await?;

        let mut tx = self.pool.begin().await?;
        let current = DrillRepo::lock(&mut *tx, user_id, drill_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "DailyDrill",
                id: drill_id,
            })?;

        let current_status = current.status()?;
        let finishes = drill::check_item_completion(
            current_status,
            &current.item_ids,
            &current.completed_item_ids,
            item_id,
        )?;
        let item = item
            .ok_or(CoreError::NotFound {
                entity: "PracticeItem",
                id: item_id,
            })?
            .to_catalog_item()?;

        let mut rating_changes = Vec::with_capacity(item.skills.len());
        for skill in &item.skills {
            let change = SkillRatingRepo::apply_attempt_tx(
                &mut *tx,
                user_id,
                *skill,
                item.difficulty,
                answer.correct,
                self.config.k_factor,
            )
            .await?;
            rating_changes.push(change);
        }

        ReviewDeckRepo::record_attempt_tx(
            &mut *tx,
            user_id,
            item_id,
            answer.correct,
            now,
            &self.schedule,
        )
        .await?;

        let status = current_status
            .advance(current.completed_item_ids.len() + 1, current.item_ids.len())?;
        let drill =
            DrillRepo::mark_item_completed(&mut *tx, drill_id, item_id, answer.time_ms, status, now)
                .await?;

        DrillRepo::insert_attempt(
            &mut *tx,
            &CreateDrillItemAttempt {
                drill_id,
                user_id,
                item_id,
                response: answer.response,
                correct: answer.correct,
                time_ms: answer.time_ms,
                rating_changes: rating_changes.clone(),
            },
        )
        .await?;

        let streak = if finishes {
            let (record, outcome) =
                StreakRepo::record_completion_tx(&mut *tx, user_id, today, &self.config).await?;
            tracing::info!(user_id, drill_id, ?outcome, "Daily drill completed");
            Some(record)
        } else {
            None
        };

        tx.commit().await?;

        tracing::debug!(
            user_id,
            drill_id,
            item_id,
            correct = answer.correct,
            status = %status,
            "Drill item completed",
        );
        Ok(ItemCompletion {
            drill_completed: finishes,
            drill,
            rating_changes,
            streak,
        })
    }

    pub async fn history(&self, user_id: DbId, limit: i64) -> Result<Vec<DailyDrill>, RepoError> {
        Ok(DrillRepo::list_history(&self.pool, user_id, limit).await?)
    }
}
