use diesel::prelude::*;

use crate::domain::category::{Category, NewCategory, UpdateCategory};
use crate::domain::types::CategoryId;
use crate::models::category::{
    Category as DbCategory, CategoryChangeset, NewCategory as DbNewCategory,
};
use crate::repository::{
    CategoryReader, CategoryWriter, CreatedOrder, DieselRepository, RepositoryError,
    RepositoryResult,
};

impl CategoryReader for DieselRepository {
    fn list_categories(&self, order: CreatedOrder) -> RepositoryResult<Vec<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let items = categories::table.into_boxed::<diesel::sqlite::Sqlite>();
        let items = match order {
            CreatedOrder::NewestFirst => items
                .order(categories::created_at.desc())
                .then_order_by(categories::id.desc()),
            CreatedOrder::OldestFirst => items
                .order(categories::created_at.asc())
                .then_order_by(categories::id.asc()),
        };

        let items = items
            .load::<DbCategory>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<Category>, _>>()?;

        Ok(items)
    }

    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        let category = categories::table
            .find(id.get())
            .first::<DbCategory>(&mut conn)
            .optional()?;

        let category = category.map(TryInto::try_into).transpose()?;
        Ok(category)
    }
}

impl CategoryWriter for DieselRepository {
    fn create_category(&self, category: &NewCategory) -> RepositoryResult<Category> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let db_category: DbNewCategory = category.clone().into();

        let created = diesel::insert_into(categories::table)
            .values(&db_category)
            .get_result::<DbCategory>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_category(
        &self,
        id: CategoryId,
        update: &UpdateCategory,
    ) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;
        let changeset: CategoryChangeset = update.clone().into();

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(categories::table.find(id.get()))
                .set(&changeset)
                .get_result::<DbCategory>(conn)
                .optional()?;

            Ok(updated.map(TryInto::try_into).transpose()?)
        })
    }

    fn delete_category(&self, id: CategoryId) -> RepositoryResult<Option<Category>> {
        use crate::schema::categories;

        let mut conn = self.conn()?;

        // Converted before deleting so a row that no longer validates is kept.
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing: Option<Category> = categories::table
                .find(id.get())
                .first::<DbCategory>(conn)
                .optional()?
                .map(TryInto::try_into)
                .transpose()?;

            if existing.is_some() {
                diesel::delete(categories::table.find(id.get())).execute(conn)?;
            }

            Ok(existing)
        })
    }
}
