use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::category::{NewCategory, UpdateCategory};
use crate::domain::types::{
    CategoryDescription, CategoryName, MediaKind, MediaPath, TypeConstraintError,
};
use crate::forms::{UploadError, UploadedFile, non_blank};

/// Multipart body of the create/update category endpoints.
#[derive(MultipartForm)]
#[multipart(deny_unknown_fields)]
pub struct CategoryUploadForm {
    pub name: Option<Text<String>>,
    pub description: Option<Text<String>>,
    #[multipart(limit = "50MiB")]
    pub image: Option<TempFile>,
}

impl CategoryUploadForm {
    /// Split the multipart body into text fields and the checked image.
    pub fn into_parts(self) -> Result<(CategoryForm, Option<UploadedFile>), CategoryFormError> {
        let image = match self.image {
            Some(file) => UploadedFile::accept(file, MediaKind::Image)?,
            None => None,
        };
        let form = CategoryForm {
            name: self.name.map(Text::into_inner),
            description: self.description.map(Text::into_inner),
        };
        Ok((form, image))
    }
}

/// Text fields of a category submission.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CategoryForm {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCategoryFormPayload {
    pub name: CategoryName,
    pub description: Option<CategoryDescription>,
}

impl AddCategoryFormPayload {
    pub fn into_new_category(self, image_url: Option<MediaPath>) -> NewCategory {
        let now = Utc::now().naive_utc();
        NewCategory {
            name: self.name,
            image_url,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCategoryFormPayload {
    pub name: Option<CategoryName>,
    pub description: Option<CategoryDescription>,
}

impl UpdateCategoryFormPayload {
    pub fn into_update(self, image_url: Option<MediaPath>) -> UpdateCategory {
        UpdateCategory {
            name: self.name,
            image_url,
            description: self.description,
            updated_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CategoryFormError {
    #[error("Category form validation failed: {0}")]
    Validation(String),
    #[error("Category form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Category name is required")]
    MissingName,
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl From<ValidationErrors> for CategoryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for CategoryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<CategoryForm> for AddCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let name = non_blank(value.name).ok_or(CategoryFormError::MissingName)?;

        Ok(Self {
            name: CategoryName::new(name)?,
            description: non_blank(value.description)
                .map(CategoryDescription::new)
                .transpose()?,
        })
    }
}

impl TryFrom<CategoryForm> for UpdateCategoryFormPayload {
    type Error = CategoryFormError;

    fn try_from(value: CategoryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: non_blank(value.name).map(CategoryName::new).transpose()?,
            description: non_blank(value.description)
                .map(CategoryDescription::new)
                .transpose()?,
        })
    }
}
