use crate::error::{AppError, AppResult};
use crate::models::{MenuItem, NewMenuItem, price::check_price};
use crate::policy::Principal;
use crate::repositories::MenuRepository;

#[derive(Clone)]
pub struct MenuService {
    repo: MenuRepository,
}

impl MenuService {
    pub fn new(repo: MenuRepository) -> Self {
        Self { repo }
    }

    pub async fn menu(&self) -> AppResult<Vec<MenuItem>> {
        self.repo.list().await
    }

    /// Appends an item (platform Admin only) and returns the updated menu.
    pub async fn add_item(&self, caller: &Principal, item: NewMenuItem) -> AppResult<Vec<MenuItem>> {
        let grant = caller.authorize_admin()?;
        check_price(&item.price).map_err(|reason| AppError::validation("price", reason))?;
        self.repo.add(&grant, item).await?;
        self.repo.list().await
    }
}
