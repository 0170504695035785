use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::domain::jewelry::{JewelryItem, NewJewelryItem, UpdateJewelryItem};
use crate::domain::types::{JewelryId, validate_additional_images};
use crate::models::jewelry::{
    JewelryChangeset, JewelryItem as DbJewelryItem, NewJewelryItem as DbNewJewelryItem,
};
use crate::models::jewelry_image::{JewelryImage, NewJewelryImage};
use crate::repository::{
    CreatedOrder, DieselRepository, JewelryListQuery, JewelryReader, JewelryWriter,
    RepositoryError, RepositoryResult,
};

/// Attach gallery rows to their parent items, preserving the item order.
fn with_images(
    conn: &mut SqliteConnection,
    items: Vec<DbJewelryItem>,
) -> QueryResult<Vec<(DbJewelryItem, Vec<JewelryImage>)>> {
    let images = JewelryImage::belonging_to(&items)
        .load::<JewelryImage>(conn)?
        .grouped_by(&items);

    Ok(items.into_iter().zip(images).collect())
}

fn into_domain(rows: Vec<(DbJewelryItem, Vec<JewelryImage>)>) -> RepositoryResult<Vec<JewelryItem>> {
    Ok(rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<JewelryItem>, _>>()?)
}

fn single(rows: Vec<(DbJewelryItem, Vec<JewelryImage>)>) -> RepositoryResult<Option<JewelryItem>> {
    Ok(into_domain(rows)?.into_iter().next())
}

impl JewelryReader for DieselRepository {
    fn list_jewelry(&self, query: JewelryListQuery) -> RepositoryResult<Vec<JewelryItem>> {
        use crate::schema::jewelry_items;

        let mut conn = self.conn()?;

        let mut items = jewelry_items::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(category_id) = query.category_id {
            items = items.filter(jewelry_items::category_id.eq(category_id.get()));
        }

        if let Some(category_name) = &query.category_name {
            items = items.filter(jewelry_items::category_name.eq(category_name.as_str()));
        }

        items = match query.order {
            CreatedOrder::NewestFirst => items
                .order(jewelry_items::created_at.desc())
                .then_order_by(jewelry_items::id.desc()),
            CreatedOrder::OldestFirst => items
                .order(jewelry_items::created_at.asc())
                .then_order_by(jewelry_items::id.asc()),
        };

        let items = items.load::<DbJewelryItem>(&mut conn)?;
        let rows = with_images(&mut conn, items)?;

        into_domain(rows)
    }

    fn get_jewelry_by_id(&self, id: JewelryId) -> RepositoryResult<Option<JewelryItem>> {
        use crate::schema::jewelry_items;

        let mut conn = self.conn()?;

        let items = jewelry_items::table
            .find(id.get())
            .load::<DbJewelryItem>(&mut conn)?;
        let rows = with_images(&mut conn, items)?;

        single(rows)
    }
}

impl JewelryWriter for DieselRepository {
    fn create_jewelry(&self, item: &NewJewelryItem) -> RepositoryResult<JewelryItem> {
        use crate::schema::{jewelry_images, jewelry_items};

        let gallery = validate_additional_images(item.additional_images.clone())?;
        let db_item: DbNewJewelryItem = item.into();

        let mut conn = self.conn()?;

        let rows = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let created = diesel::insert_into(jewelry_items::table)
                .values(&db_item)
                .get_result::<DbJewelryItem>(conn)?;

            let images = gallery
                .iter()
                .zip(0..)
                .map(|(url, position)| NewJewelryImage {
                    jewelry_id: created.id,
                    position,
                    url: url.to_string(),
                })
                .collect::<Vec<_>>();

            if !images.is_empty() {
                diesel::insert_into(jewelry_images::table)
                    .values(&images)
                    .execute(conn)?;
            }

            with_images(conn, vec![created])
        })?;

        single(rows)?.ok_or_else(|| diesel::result::Error::NotFound.into())
    }

    fn update_jewelry(
        &self,
        id: JewelryId,
        update: &UpdateJewelryItem,
    ) -> RepositoryResult<Option<JewelryItem>> {
        use crate::schema::jewelry_items;

        let changeset: JewelryChangeset = update.into();

        let mut conn = self.conn()?;

        conn.transaction::<_, RepositoryError, _>(|conn| {
            let updated = diesel::update(jewelry_items::table.find(id.get()))
                .set(&changeset)
                .get_result::<DbJewelryItem>(conn)
                .optional()?;

            match updated {
                Some(item) => single(with_images(conn, vec![item])?),
                None => Ok(None),
            }
        })
    }

    fn delete_jewelry(&self, id: JewelryId) -> RepositoryResult<Option<JewelryItem>> {
        use crate::schema::{jewelry_images, jewelry_items};

        let mut conn = self.conn()?;

        // Converted before deleting so a row that no longer validates is kept.
        conn.transaction::<_, RepositoryError, _>(|conn| {
            let existing = jewelry_items::table
                .find(id.get())
                .load::<DbJewelryItem>(conn)?;
            let item = single(with_images(conn, existing)?)?;

            if item.is_some() {
                diesel::delete(jewelry_images::table.filter(jewelry_images::jewelry_id.eq(id.get())))
                    .execute(conn)?;
                diesel::delete(jewelry_items::table.find(id.get())).execute(conn)?;
            }

            Ok(item)
        })
    }
}
