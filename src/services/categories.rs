use crate::domain::types::{CategoryId, MediaPath};
use crate::dto::categories::CategoryDto;
use crate::forms::categories::{AddCategoryFormPayload, UpdateCategoryFormPayload};
use crate::media::MediaPipeline;
use crate::repository::{CategoryReader, CategoryWriter, CreatedOrder};

use super::{ServiceError, ServiceResult, StagedMedia, superseded};

pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<CategoryDto>>
where
    R: CategoryReader,
{
    match repo.list_categories(CreatedOrder::NewestFirst) {
        Ok(categories) => Ok(categories.into_iter().map(CategoryDto::from).collect()),
        Err(e) => {
            log::error!("Failed to list categories: {e}");
            Err(e.into())
        }
    }
}

pub fn get_category<R>(category_id: i32, repo: &R) -> ServiceResult<CategoryDto>
where
    R: CategoryReader,
{
    let category_id = CategoryId::new(category_id)?;

    match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => Ok(category.into()),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get category: {e}");
            Err(e.into())
        }
    }
}

/// Create a category referencing the staged image, if any.
///
/// The image is converted to WebP when possible. Nothing staged survives a
/// failed insert.
pub fn create_category<R>(
    payload: AddCategoryFormPayload,
    image: Option<MediaPath>,
    repo: &R,
    media: &MediaPipeline,
) -> ServiceResult<CategoryDto>
where
    R: CategoryWriter,
{
    let image = image.and_then(|image| StagedMedia::image(image).select(media));
    let category = payload.into_new_category(image.clone());

    match repo.create_category(&category) {
        Ok(category) => {
            log::info!("Created category {} ({})", category.id, category.name);
            Ok(category.into())
        }
        Err(e) => {
            log::error!("Failed to create category: {e}");
            media.purge(&image.into_iter().collect::<Vec<_>>());
            Err(e.into())
        }
    }
}

/// Apply a partial update; a staged image replaces the stored one, which is
/// then deleted.
pub fn update_category<R>(
    category_id: i32,
    payload: UpdateCategoryFormPayload,
    image: Option<MediaPath>,
    repo: &R,
    media: &MediaPipeline,
) -> ServiceResult<CategoryDto>
where
    R: CategoryReader + CategoryWriter,
{
    let staged: Vec<MediaPath> = image.iter().cloned().collect();

    let category_id = match CategoryId::new(category_id) {
        Ok(id) => id,
        Err(e) => {
            media.purge(&staged);
            return Err(e.into());
        }
    };

    let existing = match repo.get_category_by_id(category_id) {
        Ok(Some(category)) => category,
        Ok(None) => {
            media.purge(&staged);
            return Err(ServiceError::NotFound);
        }
        Err(e) => {
            log::error!("Failed to get category: {e}");
            media.purge(&staged);
            return Err(e.into());
        }
    };

    let image = image.and_then(|image| StagedMedia::image(image).select(media));
    let update = payload.into_update(image.clone());
    let fresh: Vec<MediaPath> = image.into_iter().collect();

    match repo.update_category(category_id, &update) {
        Ok(Some(category)) => {
            media.purge(&superseded(existing.media_paths(), &category.media_paths()));
            Ok(category.into())
        }
        Ok(None) => {
            media.purge(&fresh);
            Err(ServiceError::NotFound)
        }
        Err(e) => {
            log::error!("Failed to update category: {e}");
            media.purge(&fresh);
            Err(e.into())
        }
    }
}

/// Delete a category and its image. Items referencing it are left alone.
pub fn delete_category<R>(category_id: i32, repo: &R, media: &MediaPipeline) -> ServiceResult<()>
where
    R: CategoryWriter,
{
    let category_id = CategoryId::new(category_id)?;

    match repo.delete_category(category_id) {
        Ok(Some(category)) => {
            media.purge(&category.media_paths());
            log::info!("Deleted category {} ({})", category.id, category.name);
            Ok(())
        }
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to delete category: {e}");
            Err(e.into())
        }
    }
}
