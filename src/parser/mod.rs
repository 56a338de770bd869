pub mod filter_input;
pub mod pagination;

use std::collections::HashMap;

use crate::error::{AppError, AppResult};

pub use filter_input::{FilterEntry, FilterInput};
pub use pagination::Pagination;

/// Everything a list endpoint reads from its query string.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: FilterInput,
    pub page: Pagination,
}

impl ListQuery {
    pub fn from_query(params: &HashMap<String, String>) -> AppResult<Self> {
        let filter = FilterInput::from_query(params);
        let page = Pagination::from_query(params);

        match (filter, page) {
            (Ok(filter), Ok(page)) => Ok(Self { filter, page }),
            (Err(AppError::Validation(mut a)), Err(AppError::Validation(b))) => {
                a.extend(b);
                Err(AppError::Validation(a))
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }
}
