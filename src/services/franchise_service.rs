use crate::error::AppResult;
use crate::models::{CreateFranchise, FranchisePage, FranchiseQuery, FranchiseView, Store};
use crate::policy::{Capability, Principal};
use crate::repositories::FranchiseRepository;
use crate::utils::password::unusable_password_hash;

/// Franchise and store management. Authorization is checked here and handed
/// to the repository as a grant.
#[derive(Clone)]
pub struct FranchiseService {
    repo: FranchiseRepository,
}

impl FranchiseService {
    pub fn new(repo: FranchiseRepository) -> Self {
        Self { repo }
    }

    /// Lists franchises. Platform Admins get the detailed view.
    pub async fn list(&self, caller: Option<&Principal>, query: FranchiseQuery) -> AppResult<FranchisePage> {
        let detailed = caller.is_some_and(Principal::is_admin);
        let (franchises, more) = self.repo.list(&query, detailed).await?;
        Ok(FranchisePage {
            franchises,
            page: query.page.max(1),
            more,
        })
    }

    /// Franchises administered by `user_id`. Callers other than that user or
    /// a platform Admin get an empty list.
    pub async fn list_for_user(&self, caller: &Principal, user_id: i32) -> AppResult<Vec<FranchiseView>> {
        if !caller.can(Capability::IsSelf(user_id)) {
            return Ok(Vec::new());
        }
        self.repo.list_for_admin(user_id).await
    }

    pub async fn create(&self, caller: &Principal, input: CreateFranchise) -> AppResult<FranchiseView> {
        let grant = caller.authorize_admin()?;
        let placeholder = tokio::task::spawn_blocking(unusable_password_hash).await??;
        self.repo.create(&grant, input, placeholder).await
    }

    pub async fn delete(&self, caller: &Principal, franchise_id: i32) -> AppResult<()> {
        let grant = caller.authorize_admin()?;
        self.repo.delete(&grant, franchise_id).await
    }

    pub async fn create_store(&self, caller: &Principal, franchise_id: i32, name: String) -> AppResult<Store> {
        let grant = caller.authorize_franchise(franchise_id)?;
        let store = self.repo.create_store(&grant, name).await?;
        tracing::info!(store_id = store.id, franchise_id, "Store created");
        Ok(store)
    }

    pub async fn delete_store(&self, caller: &Principal, franchise_id: i32, store_id: i32) -> AppResult<()> {
        let grant = caller.authorize_franchise(franchise_id)?;
        self.repo.delete_store(&grant, store_id).await?;
        tracing::info!(store_id, franchise_id, "Store deleted");
        Ok(())
    }
}
