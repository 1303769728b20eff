//! Field changes applied to guarded resources once the access pipeline has
//! admitted the caller.

use serde::Serialize;

use super::ResourceKind;

/// Validation errors raised by [`ResourceUpdate`] constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceValidationError {
    #[error("{field} can't be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
}

impl ResourceValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } | Self::Negative { field } => field,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyField { .. } => "empty_field",
            Self::Negative { .. } => "negative_value",
        }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ResourceValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ResourceValidationError::EmptyField { field });
    }
    Ok(trimmed.to_owned())
}

/// Validated replacement values for one resource.
///
/// Serialises to the changed fields only, e.g. `{"status":true}` for
/// [`ResourceUpdate::TaskStatus`], so adapters can merge it into a stored
/// row.
///
/// # Examples
/// ```
/// use access_pipeline::domain::{ResourceKind, ResourceUpdate};
///
/// let update = ResourceUpdate::comment(" lovely ").unwrap();
/// assert_eq!(update.kind(), ResourceKind::Comment);
/// assert_eq!(serde_json::to_value(&update).unwrap(), serde_json::json!({"message": "lovely"}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceUpdate {
    Photo {
        title: String,
        caption: String,
        photo_url: String,
    },
    Comment {
        message: String,
    },
    SocialMedia {
        name: String,
        social_media_url: String,
    },
    Task {
        title: String,
        description: String,
    },
    TaskStatus {
        status: bool,
    },
    Category {
        #[serde(rename = "type")]
        category_type: String,
    },
    Product {
        title: String,
        price: i64,
    },
}

impl ResourceUpdate {
    /// Title and URL are required; the caption may be blank.
    pub fn photo(
        title: &str,
        caption: &str,
        photo_url: &str,
    ) -> Result<Self, ResourceValidationError> {
        Ok(Self::Photo {
            title: required("title", title)?,
            caption: caption.trim().to_owned(),
            photo_url: required("photo_url", photo_url)?,
        })
    }

    pub fn comment(message: &str) -> Result<Self, ResourceValidationError> {
        Ok(Self::Comment {
            message: required("message", message)?,
        })
    }

    pub fn social_media(
        name: &str,
        social_media_url: &str,
    ) -> Result<Self, ResourceValidationError> {
        Ok(Self::SocialMedia {
            name: required("name", name)?,
            social_media_url: required("social_media_url", social_media_url)?,
        })
    }

    pub fn task(title: &str, description: &str) -> Result<Self, ResourceValidationError> {
        Ok(Self::Task {
            title: required("title", title)?,
            description: required("description", description)?,
        })
    }

    pub fn task_status(status: bool) -> Self {
        Self::TaskStatus { status }
    }

    pub fn category(category_type: &str) -> Result<Self, ResourceValidationError> {
        Ok(Self::Category {
            category_type: required("type", category_type)?,
        })
    }

    pub fn product(title: &str, price: i64) -> Result<Self, ResourceValidationError> {
        if price < 0 {
            return Err(ResourceValidationError::Negative { field: "price" });
        }
        Ok(Self::Product {
            title: required("title", title)?,
            price,
        })
    }

    /// Kind of resource the update applies to.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Photo { .. } => ResourceKind::Photo,
            Self::Comment { .. } => ResourceKind::Comment,
            Self::SocialMedia { .. } => ResourceKind::SocialMedia,
            Self::Task { .. } | Self::TaskStatus { .. } => ResourceKind::Task,
            Self::Category { .. } => ResourceKind::Category,
            Self::Product { .. } => ResourceKind::Product,
        }
    }
}
