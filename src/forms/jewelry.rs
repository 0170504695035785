use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{
    CategoryId, JewelryName, JewelryPrice, JewelrySku, MediaKind, TypeConstraintError,
};
use crate::forms::{UploadError, UploadedFile, non_blank};

/// Multipart body of the create/update jewelry endpoints.
#[derive(MultipartForm)]
#[multipart(deny_unknown_fields)]
pub struct JewelryUploadForm {
    pub name: Option<Text<String>>,
    /// Identifier of the referenced category.
    pub category: Option<Text<String>>,
    pub sku: Option<Text<String>>,
    pub price: Option<Text<String>>,
    #[multipart(limit = "50MiB")]
    pub image: Option<TempFile>,
    #[multipart(limit = "50MiB")]
    pub video: Option<TempFile>,
}

/// Files attached to a jewelry submission, already checked against the
/// MIME allow-list of their field.
#[derive(Debug, Default)]
pub struct JewelryUploads {
    pub image: Option<UploadedFile>,
    pub video: Option<UploadedFile>,
}

impl JewelryUploadForm {
    /// Split the multipart body into text fields and checked uploads.
    pub fn into_parts(self) -> Result<(JewelryForm, JewelryUploads), JewelryFormError> {
        let image = match self.image {
            Some(file) => UploadedFile::accept(file, MediaKind::Image)?,
            None => None,
        };
        let video = match self.video {
            Some(file) => UploadedFile::accept(file, MediaKind::Video)?,
            None => None,
        };
        let form = JewelryForm {
            name: self.name.map(Text::into_inner),
            category: self.category.map(Text::into_inner),
            sku: self.sku.map(Text::into_inner),
            price: self.price.map(Text::into_inner),
        };
        Ok((form, JewelryUploads { image, video }))
    }
}

/// Text fields of a jewelry submission.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct JewelryForm {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    pub category: Option<String>,
    #[validate(length(max = 64))]
    pub sku: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddJewelryFormPayload {
    pub name: JewelryName,
    pub category_id: Option<CategoryId>,
    pub sku: Option<JewelrySku>,
    pub price: Option<JewelryPrice>,
}

/// Fields of an update; `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateJewelryFormPayload {
    pub name: Option<JewelryName>,
    pub category_id: Option<CategoryId>,
    pub sku: Option<JewelrySku>,
    pub price: Option<JewelryPrice>,
}

#[derive(Debug, Error)]
pub enum JewelryFormError {
    #[error("Jewelry form validation failed: {0}")]
    Validation(String),
    #[error("Jewelry form contains invalid data: {0}")]
    TypeConstraint(String),
    #[error("Jewelry name is required")]
    MissingName,
    #[error("Invalid number for {0}")]
    InvalidNumber(&'static str),
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl From<ValidationErrors> for JewelryFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for JewelryFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

fn parse_category(value: Option<String>) -> Result<Option<CategoryId>, JewelryFormError> {
    non_blank(value)
        .map(|raw| -> Result<_, JewelryFormError> {
            let id = raw
                .parse::<i32>()
                .map_err(|_| JewelryFormError::InvalidNumber("category"))?;
            Ok(CategoryId::new(id)?)
        })
        .transpose()
}

fn parse_price(value: Option<String>) -> Result<Option<JewelryPrice>, JewelryFormError> {
    non_blank(value)
        .map(|raw| -> Result<_, JewelryFormError> {
            let price = raw
                .parse::<f64>()
                .map_err(|_| JewelryFormError::InvalidNumber("price"))?;
            Ok(JewelryPrice::new(price)?)
        })
        .transpose()
}

impl TryFrom<JewelryForm> for AddJewelryFormPayload {
    type Error = JewelryFormError;

    fn try_from(value: JewelryForm) -> Result<Self, Self::Error> {
        value.validate()?;
        let name = non_blank(value.name).ok_or(JewelryFormError::MissingName)?;

        Ok(Self {
            name: JewelryName::new(name)?,
            category_id: parse_category(value.category)?,
            sku: non_blank(value.sku).map(JewelrySku::new).transpose()?,
            price: parse_price(value.price)?,
        })
    }
}

impl TryFrom<JewelryForm> for UpdateJewelryFormPayload {
    type Error = JewelryFormError;

    fn try_from(value: JewelryForm) -> Result<Self, Self::Error> {
        value.validate()?;

        Ok(Self {
            name: non_blank(value.name).map(JewelryName::new).transpose()?,
            category_id: parse_category(value.category)?,
            sku: non_blank(value.sku).map(JewelrySku::new).transpose()?,
            price: parse_price(value.price)?,
        })
    }
}
