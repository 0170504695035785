//! Strongly-typed value objects used by catalog entities.
//!
//! Entities carry these wrappers instead of raw primitives so identifiers,
//! names, prices and media paths are validated once at the boundary and can
//! be trusted everywhere else.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// An identifier was zero or negative.
    #[error("{0} must be greater than zero")]
    NonPositiveId(&'static str),
    /// A numeric value required to be non-negative was negative or not finite.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// A media path did not follow the `/images/<file>` or `/videos/<file>` layout.
    #[error("invalid media path: {0}")]
    InvalidMediaPath(String),
    /// More additional images than an item can hold.
    #[error("at most {0} additional images are allowed")]
    TooManyImages(usize),
    /// Catch-all for custom validation failures.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(
            Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId($field))
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<i32> for $name {
            fn eq(&self, other: &i32) -> bool {
                self.0 == *other
            }
        }
    };
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

id_newtype!(
    CategoryId,
    "Unique identifier for a category.",
    "category_id"
);
id_newtype!(
    JewelryId,
    "Unique identifier for a jewelry item.",
    "jewelry_id"
);

non_empty_string_newtype!(
    CategoryName,
    "Category name enforcing non-empty values.",
    "category name"
);
non_empty_string_newtype!(
    CategoryDescription,
    "Free-form category description enforcing non-empty values.",
    "description"
);
non_empty_string_newtype!(
    JewelryName,
    "Jewelry item name enforcing non-empty values.",
    "name"
);
non_empty_string_newtype!(
    JewelrySku,
    "Stock keeping unit enforcing non-empty values.",
    "sku"
);

/// Non-negative, finite price in standard currency units.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct JewelryPrice(f64);

impl JewelryPrice {
    /// Constructs a finite price that is zero or greater.
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::NegativeNumber("price"))
        }
    }

    /// Returns the raw `f64` value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Display for JewelryPrice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for JewelryPrice {
    type Error = TypeConstraintError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Kind of uploaded asset; decides the public URL prefix and the directory
/// under the media root.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Directory name under the media root and first URL segment.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "videos",
        }
    }

    /// Whether a MIME essence such as `image/png` is acceptable for this kind.
    pub fn accepts_mime(self, essence: &str) -> bool {
        let prefix = match self {
            Self::Image => "image/",
            Self::Video => "video/",
        };
        essence.starts_with(prefix)
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Video => "video",
        })
    }
}

/// Logical, URL-style path of a stored media file, e.g. `/images/ring.webp`.
///
/// The path is what records store and what the static file server exposes.
/// It never contains directory traversal: the file part is a single segment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct MediaPath {
    kind: MediaKind,
    value: String,
}

impl MediaPath {
    /// Parses and validates a logical media path.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = trim_and_require_non_empty(value, "media path")?;

        let (kind, file_name) = if let Some(rest) = value.strip_prefix("/images/") {
            (MediaKind::Image, rest)
        } else if let Some(rest) = value.strip_prefix("/videos/") {
            (MediaKind::Video, rest)
        } else {
            return Err(TypeConstraintError::InvalidMediaPath(value));
        };

        if !is_plain_file_name(file_name) {
            return Err(TypeConstraintError::InvalidMediaPath(value));
        }

        Ok(Self { kind, value })
    }

    /// Builds the logical path for a file name inside the kind's directory.
    pub fn from_file_name(kind: MediaKind, file_name: &str) -> Result<Self, TypeConstraintError> {
        Self::new(format!("/{}/{}", kind.dir_name(), file_name))
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// File name part after the kind prefix.
    pub fn file_name(&self) -> &str {
        // Prefix is `/` + dir + `/`, validated in `new`.
        &self.value[self.kind.dir_name().len() + 2..]
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.chars().any(char::is_control)
}

impl Display for MediaPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for MediaPath {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for MediaPath {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MediaPath> for String {
    fn from(value: MediaPath) -> Self {
        value.value
    }
}

impl PartialEq<&str> for MediaPath {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

/// The single primary media file of a jewelry item.
///
/// An item shows either a photo or a video, never both; persistence splits
/// this into the `image_url` / `video_url` columns.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMedia {
    Image(MediaPath),
    Video(MediaPath),
}

impl PrimaryMedia {
    /// Wraps a path into the variant matching its kind.
    pub fn from_path(path: MediaPath) -> Self {
        match path.kind() {
            MediaKind::Image => Self::Image(path),
            MediaKind::Video => Self::Video(path),
        }
    }

    /// Rebuilds the value from the two nullable columns.
    pub fn from_columns(
        image_url: Option<String>,
        video_url: Option<String>,
    ) -> Result<Option<Self>, TypeConstraintError> {
        match (non_blank(image_url), non_blank(video_url)) {
            (None, None) => Ok(None),
            (Some(image), None) => Ok(Some(Self::Image(MediaPath::new(image)?))),
            (None, Some(video)) => Ok(Some(Self::Video(MediaPath::new(video)?))),
            (Some(_), Some(_)) => Err(TypeConstraintError::InvalidValue(
                "item has both an image and a video".to_string(),
            )),
        }
    }

    pub fn path(&self) -> &MediaPath {
        match self {
            Self::Image(path) | Self::Video(path) => path,
        }
    }

    pub fn image(&self) -> Option<&MediaPath> {
        match self {
            Self::Image(path) => Some(path),
            Self::Video(_) => None,
        }
    }

    pub fn video(&self) -> Option<&MediaPath> {
        match self {
            Self::Video(path) => Some(path),
            Self::Image(_) => None,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Maximum number of additional gallery images per item.
pub const MAX_ADDITIONAL_IMAGES: usize = 4;

/// Validates a gallery list: image paths only, at most [`MAX_ADDITIONAL_IMAGES`].
pub fn validate_additional_images(
    images: Vec<MediaPath>,
) -> Result<Vec<MediaPath>, TypeConstraintError> {
    if images.len() > MAX_ADDITIONAL_IMAGES {
        return Err(TypeConstraintError::TooManyImages(MAX_ADDITIONAL_IMAGES));
    }
    if let Some(video) = images.iter().find(|p| p.kind() != MediaKind::Image) {
        return Err(TypeConstraintError::InvalidMediaPath(video.to_string()));
    }
    Ok(images)
}
