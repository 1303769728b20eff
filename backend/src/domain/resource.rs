//! Resource kinds guarded by the ownership check.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AccountId;

/// Kinds of resource whose mutations are restricted to their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Photo,
    Comment,
    SocialMedia,
    Task,
    Category,
    Product,
}

impl ResourceKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Photo,
        Self::Comment,
        Self::SocialMedia,
        Self::Task,
        Self::Category,
        Self::Product,
    ];

    /// Human-readable label used in caller-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::Comment => "comment",
            Self::SocialMedia => "social media",
            Self::Task => "task",
            Self::Category => "category",
            Self::Product => "product",
        }
    }

    /// Name of the path segment carrying the resource id.
    pub fn path_param(self) -> &'static str {
        match self {
            Self::Photo => "photoId",
            Self::Comment => "commentId",
            Self::SocialMedia => "socialMediaId",
            Self::Task => "taskId",
            Self::Category => "categoryId",
            Self::Product => "productId",
        }
    }

    /// Message returned when the resource does not exist.
    pub fn not_found_message(self) -> String {
        format!("{} not found", self.label())
    }

    /// Message returned when the caller does not own the resource.
    pub fn not_owner_message(self) -> String {
        format!("you are not authorized to modify the {}", self.label())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of a resource instance as read from the request path.
///
/// Unlike [`AccountId`] this is not validated: an unparsable path segment
/// becomes id `0`, which is expected to miss in the subsequent lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(i64);

impl ResourceId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Parse a path segment, treating absence or garbage as id `0`.
    ///
    /// # Examples
    /// ```
    /// use access_pipeline::domain::ResourceId;
    ///
    /// assert_eq!(ResourceId::from_path_segment(Some("42")).get(), 42);
    /// assert_eq!(ResourceId::from_path_segment(Some("forty-two")).get(), 0);
    /// assert_eq!(ResourceId::from_path_segment(None).get(), 0);
    /// ```
    pub fn from_path_segment(segment: Option<&str>) -> Self {
        Self(segment.and_then(|raw| raw.trim().parse().ok()).unwrap_or(0))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owner of a resource instance, derived per request and then discarded.
///
/// ## Invariants
/// - A resource has exactly one owner for its whole lifetime; nothing in this
///   crate reassigns `owner_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceOwnership {
    resource_id: ResourceId,
    owner_id: AccountId,
}

impl ResourceOwnership {
    pub fn new(resource_id: ResourceId, owner_id: AccountId) -> Self {
        Self {
            resource_id,
            owner_id,
        }
    }

    pub fn resource_id(&self) -> ResourceId {
        self.resource_id
    }

    pub fn owner_id(&self) -> AccountId {
        self.owner_id
    }

    /// Whether `account` is the owner.
    pub fn is_owned_by(&self, account: AccountId) -> bool {
        self.owner_id == account
    }
}
