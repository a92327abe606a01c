//! Create and delete favorites, cart items and subscriptions.

use uuid::Uuid;

use foodgram_domain::pagination::{PageRequest, Paginated};

use crate::domain::repository::RelationRepository;
use crate::domain::types::{Relation, RelationView, SubscribedAuthor};
use crate::error::FoodgramError;

fn target_not_found(relation: Relation) -> FoodgramError {
    match relation {
        Relation::Favorite { .. } | Relation::CartItem { .. } => FoodgramError::RecipeNotFound,
        Relation::Subscription { .. } => FoodgramError::UserNotFound,
    }
}

// ── CreateRelation ───────────────────────────────────────────────────────────

pub struct CreateRelationUseCase<R: RelationRepository> {
    pub repo: R,
}

impl<R: RelationRepository> CreateRelationUseCase<R> {
    /// Link `user_id` to the relation target.
    ///
    /// Creating an existing pair is an error, never a silent success.
    pub async fn execute(
        &self,
        user_id: Uuid,
        relation: Relation,
        recipes_limit: Option<u64>,
    ) -> Result<RelationView, FoodgramError> {
        if relation == (Relation::Subscription { author_id: user_id }) {
            return Err(FoodgramError::SelfSubscription);
        }
        if !self.repo.target_exists(relation).await? {
            return Err(target_not_found(relation));
        }
        if !self.repo.insert(user_id, relation).await? {
            return Err(FoodgramError::AlreadyExists);
        }
        tracing::debug!(%user_id, kind = %relation.kind(), "relation created");
        self.repo.view(user_id, relation, recipes_limit).await
    }
}

// ── DeleteRelation ───────────────────────────────────────────────────────────

pub struct DeleteRelationUseCase<R: RelationRepository> {
    pub repo: R,
}

impl<R: RelationRepository> DeleteRelationUseCase<R> {
    /// Remove the `(user_id, target)` row. Only the acting user's own row matches.
    pub async fn execute(&self, user_id: Uuid, relation: Relation) -> Result<(), FoodgramError> {
        if !self.repo.delete(user_id, relation).await? {
            return Err(FoodgramError::RelationMissing(relation.kind()));
        }
        tracing::debug!(%user_id, kind = %relation.kind(), "relation deleted");
        Ok(())
    }
}

// ── ListSubscriptions ────────────────────────────────────────────────────────

pub struct ListSubscriptionsUseCase<R: RelationRepository> {
    pub repo: R,
}

impl<R: RelationRepository> ListSubscriptionsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Paginated<SubscribedAuthor>, FoodgramError> {
        self.repo
            .list_subscriptions(user_id, page.clamped(), recipes_limit)
            .await
    }
}
