//! Meal service — orchestrates session resolution, the meal repository,
//! and the streak analyzer for each public operation.
//!
//! Every meal operation resolves the caller's session first and
//! short-circuits with `Unauthorized`; validation happens before any
//! storage call, so malformed input never reaches the repository.

use uuid::Uuid;

use crate::error::{DietlogError, Result};
use crate::model::{validate_meal_name, validate_username, Meal, MealUpdate, NewMeal, User};
use crate::session::{self, IssuedToken, SessionId};
use crate::storage::StorageBackend;
use crate::streak::{self, MealSummary};

pub struct MealService<S> {
    storage: S,
}

impl<S: StorageBackend> MealService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Register a username, reusing a presented session token or minting
    /// a fresh one. Returns the token the boundary must hand back to the
    /// caller when it is new.
    pub async fn register(&self, presented: Option<Uuid>, username: &str) -> Result<IssuedToken> {
        validate_username(username)?;

        let issued = session::issue_or_reuse(presented);
        self.storage
            .create_user(&User::new(issued.token, username.to_string()))
            .await?;

        Ok(issued)
    }

    /// Resolve the caller's session without touching any meal data.
    ///
    /// The boundary layer calls this before it inspects a request body,
    /// so an unauthorized caller is turned away before payload
    /// validation runs.
    pub async fn authorize(&self, presented: Option<Uuid>) -> Result<SessionId> {
        session::resolve(&self.storage, presented).await
    }

    pub async fn list_meals(&self, presented: Option<Uuid>) -> Result<Vec<Meal>> {
        let identity = session::resolve(&self.storage, presented).await?;
        self.storage.list_meals(identity.0).await
    }

    pub async fn create_meal(&self, presented: Option<Uuid>, input: NewMeal) -> Result<Meal> {
        let identity = session::resolve(&self.storage, presented).await?;
        validate_meal_name(&input.name)?;

        let meal = Meal::new(identity.0, input);
        self.storage.insert_meal(&meal).await?;
        Ok(meal)
    }

    pub async fn get_meal(&self, presented: Option<Uuid>, id: Uuid) -> Result<Meal> {
        let identity = session::resolve(&self.storage, presented).await?;
        self.storage.get_meal(identity.0, id).await
    }

    pub async fn update_meal(
        &self,
        presented: Option<Uuid>,
        id: Uuid,
        update: MealUpdate,
    ) -> Result<()> {
        let identity = session::resolve(&self.storage, presented).await?;

        if update.is_empty() {
            return Err(DietlogError::InvalidInput(
                "update must include at least one field".into(),
            ));
        }
        if let Some(ref name) = update.name {
            validate_meal_name(name)?;
        }

        self.storage.update_meal(identity.0, id, &update).await
    }

    pub async fn delete_meal(&self, presented: Option<Uuid>, id: Uuid) -> Result<()> {
        let identity = session::resolve(&self.storage, presented).await?;
        self.storage.delete_meal(identity.0, id).await
    }

    /// Diet-adherence summary over the session's meals in recorded order.
    pub async fn summary(&self, presented: Option<Uuid>) -> Result<MealSummary> {
        let meals = self.list_meals(presented).await?;
        Ok(streak::summarize(&meals))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::storage::SqliteStorage;

    fn service() -> MealService<SqliteStorage> {
        MealService::new(SqliteStorage::open_in_memory().unwrap())
    }

    fn lunch() -> NewMeal {
        NewMeal {
            name: "Lunch".to_string(),
            description: Some("Rice and beans".to_string()),
            date_time: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            is_on_diet: true,
        }
    }

    #[tokio::test]
    async fn register_then_create_then_list() {
        let service = service();

        let issued = service.register(None, "alice").await.unwrap();
        assert!(issued.is_new);

        let token = Some(issued.token);
        service.create_meal(token, lunch()).await.unwrap();

        let meals = service.list_meals(token).await.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].name, "Lunch");
        assert!(meals[0].is_on_diet);
    }

    #[tokio::test]
    async fn register_validates_username_length() {
        let service = service();
        let err = service.register(None, "al").await.unwrap_err();
        assert!(matches!(err, DietlogError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn register_reuses_a_presented_token() {
        let service = service();
        let token = Uuid::new_v4();

        let issued = service.register(Some(token), "alice").await.unwrap();
        assert_eq!(issued.token, token);
        assert!(!issued.is_new);

        // The reused token now authorizes meal operations.
        service.create_meal(Some(token), lunch()).await.unwrap();
    }

    #[tokio::test]
    async fn authorize_checks_the_token_alone() {
        let service = service();

        let err = service.authorize(None).await.unwrap_err();
        assert!(matches!(err, DietlogError::Unauthorized(_)));

        let err = service.authorize(Some(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, DietlogError::Unauthorized(_)));

        let issued = service.register(None, "alice").await.unwrap();
        let session = service.authorize(Some(issued.token)).await.unwrap();
        assert_eq!(session.0, issued.token);
    }

    #[tokio::test]
    async fn meal_operations_require_a_session() {
        let service = service();

        let err = service.list_meals(None).await.unwrap_err();
        assert!(matches!(err, DietlogError::Unauthorized(_)));

        let err = service
            .create_meal(Some(Uuid::new_v4()), lunch())
            .await
            .unwrap_err();
        assert!(matches!(err, DietlogError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn get_with_unknown_id_is_not_found() {
        let service = service();
        let issued = service.register(None, "alice").await.unwrap();

        let err = service
            .get_meal(Some(issued.token), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DietlogError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_update_is_invalid_input() {
        let service = service();
        let issued = service.register(None, "alice").await.unwrap();
        let meal = service.create_meal(Some(issued.token), lunch()).await.unwrap();

        let err = service
            .update_meal(Some(issued.token), meal.id, MealUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DietlogError::InvalidInput(_)));

        // The meal is untouched.
        let fetched = service.get_meal(Some(issued.token), meal.id).await.unwrap();
        assert_eq!(fetched, meal);
    }

    #[tokio::test]
    async fn summary_over_recorded_order() {
        let service = service();
        let issued = service.register(None, "alice").await.unwrap();
        let token = Some(issued.token);

        for on_diet in [true, true, false, true, true, true, false] {
            service
                .create_meal(
                    token,
                    NewMeal {
                        name: "meal".to_string(),
                        description: None,
                        date_time: Utc::now(),
                        is_on_diet: on_diet,
                    },
                )
                .await
                .unwrap();
        }

        let summary = service.summary(token).await.unwrap();
        assert_eq!(summary.total_meals, 7);
        assert_eq!(summary.meals_on_diet, 5);
        assert_eq!(summary.meals_not_on_diet, 2);
        assert_eq!(summary.best_sequence_on_diet, 3);
    }

    #[tokio::test]
    async fn summary_of_empty_session_is_all_zero() {
        let service = service();
        let issued = service.register(None, "alice").await.unwrap();

        let summary = service.summary(Some(issued.token)).await.unwrap();
        assert_eq!(summary, MealSummary::default());
    }

    #[tokio::test]
    async fn sessions_are_isolated_end_to_end() {
        let service = service();
        let alice = service.register(None, "alice").await.unwrap().token;
        let bob = service.register(None, "bob").await.unwrap().token;

        let meal = service.create_meal(Some(alice), lunch()).await.unwrap();

        assert!(service.list_meals(Some(bob)).await.unwrap().is_empty());
        assert!(matches!(
            service.get_meal(Some(bob), meal.id).await.unwrap_err(),
            DietlogError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_meal(Some(bob), meal.id).await.unwrap_err(),
            DietlogError::NotFound(_)
        ));
    }
}
