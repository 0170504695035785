use crate::db::{DbConnection, DbPool};
use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::jewelry::{JewelryItem, NewJewelryItem, UpdateJewelryItem};
use crate::domain::types::{CategoryId, CategoryName, JewelryId};

pub mod category;
pub mod errors;
pub mod jewelry;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` is cheap to clone, allowing the repository to
/// be passed around freely between handlers and blocking tasks.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Ordering of list results by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CreatedOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Query parameters used when listing jewelry items.
#[derive(Debug, Clone, Default)]
pub struct JewelryListQuery {
    /// Filter by referenced category.
    pub category_id: Option<CategoryId>,
    /// Filter by the category name snapshot stored on the item.
    pub category_name: Option<CategoryName>,
    pub order: CreatedOrder,
}

impl JewelryListQuery {
    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }
    pub fn category_name(mut self, name: CategoryName) -> Self {
        self.category_name = Some(name);
        self
    }
    pub fn order(mut self, order: CreatedOrder) -> Self {
        self.order = order;
        self
    }
}

/// Read-only operations for category entities.
pub trait CategoryReader {
    /// List all categories in the requested creation order.
    fn list_categories(&self, order: CreatedOrder) -> RepositoryResult<Vec<Category>>;
    /// Retrieve a category by its identifier.
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Write operations for category entities.
pub trait CategoryWriter {
    /// Persist a new category and return the stored record.
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category>;
    /// Apply a partial update. Returns `None` when the category does not exist.
    fn update_category(
        &self,
        id: CategoryId,
        update: &UpdateCategory,
    ) -> RepositoryResult<Option<Category>>;
    /// Delete a category, returning its state before deletion.
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
}

/// Read-only operations for jewelry items.
pub trait JewelryReader {
    /// List items matching the supplied query parameters.
    fn list_jewelry(&self, query: JewelryListQuery) -> RepositoryResult<Vec<JewelryItem>>;
    /// Retrieve an item by its identifier.
    fn get_jewelry_by_id(&self, id: JewelryId) -> RepositoryResult<Option<JewelryItem>>;
}

/// Write operations for jewelry items.
pub trait JewelryWriter {
    /// Persist a new item with its gallery and return the stored record.
    fn create_jewelry(&self, item: &NewJewelryItem) -> RepositoryResult<JewelryItem>;
    /// Apply a partial update. Returns `None` when the item does not exist.
    fn update_jewelry(
        &self,
        id: JewelryId,
        update: &UpdateJewelryItem,
    ) -> RepositoryResult<Option<JewelryItem>>;
    /// Delete an item and its gallery rows, returning its state before deletion.
    fn delete_jewelry(&self, id: JewelryId) -> RepositoryResult<Option<JewelryItem>>;
}
