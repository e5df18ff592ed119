//! Paging query parameters.

use serde::Deserialize;
use utoipa::IntoParams;

/// `?page=` for listings with a fixed page size of 10.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-based); 0 or absent reads as 1
    #[param(minimum = 1, example = 1)]
    pub page: Option<u32>,
}

impl PageParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// `?page=&name=&admin=` for the franchise listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FranchiseListParams {
    #[param(minimum = 1, example = 1)]
    pub page: Option<u32>,
    /// Case-insensitive name pattern; `*` matches any run of characters
    #[param(example = "pizza*")]
    pub name: Option<String>,
    /// Only franchises this user administers
    #[param(example = 3)]
    pub admin: Option<i32>,
}
