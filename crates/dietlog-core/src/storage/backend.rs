use uuid::Uuid;

use crate::error::Result;
use crate::model::{Meal, MealUpdate, User};

/// Abstract storage backend for sessions and meals.
///
/// Every meal operation takes the owning session's token and folds it
/// into the storage predicate itself: a meal that exists under another
/// session is indistinguishable from one that does not exist at all.
pub trait StorageBackend: Send + Sync {
    // -- Sessions --

    fn create_user(&self, user: &User) -> impl std::future::Future<Output = Result<()>> + Send;

    fn session_exists(
        &self,
        session_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    // -- Meals --

    fn insert_meal(&self, meal: &Meal) -> impl std::future::Future<Output = Result<()>> + Send;

    /// All meals owned by the session, in insertion order.
    fn list_meals(
        &self,
        session_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Meal>>> + Send;

    fn get_meal(
        &self,
        session_id: Uuid,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Meal>> + Send;

    /// Apply a partial update and stamp `updated_at`. `NotFound` when no
    /// row matches the (id, session) predicate.
    fn update_meal(
        &self,
        session_id: Uuid,
        id: Uuid,
        update: &MealUpdate,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn delete_meal(
        &self,
        session_id: Uuid,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
