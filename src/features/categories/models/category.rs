use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, FromRow, Row};
use uuid::Uuid;

/// Lifecycle of a category: `Active` ⇄ `Trashed` → `Erased`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryState {
    Active,
    Trashed { deleted_at: DateTime<Utc> },
    /// Terminal; the row no longer exists
    Erased,
}

impl CategoryState {
    /// Decode the persisted `deleted` / `deleted_at` pair; `None` if only one is set
    pub fn from_columns(deleted: bool, deleted_at: Option<DateTime<Utc>>) -> Option<Self> {
        match (deleted, deleted_at) {
            (false, None) => Some(Self::Active),
            (true, Some(deleted_at)) => Some(Self::Trashed { deleted_at }),
            _ => None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        !matches!(self, Self::Active)
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Trashed { deleted_at } => Some(*deleted_at),
            _ => None,
        }
    }

    pub fn trash(self, at: DateTime<Utc>) -> Option<Self> {
        match self {
            Self::Active => Some(Self::Trashed { deleted_at: at }),
            _ => None,
        }
    }

    pub fn restore(self) -> Option<Self> {
        match self {
            Self::Trashed { .. } => Some(Self::Active),
            _ => None,
        }
    }

    pub fn erase(self) -> Option<Self> {
        match self {
            Self::Trashed { .. } => Some(Self::Erased),
            _ => None,
        }
    }
}

/// Database model for category
#[derive(Debug, Clone)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub state: CategoryState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Category {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let deleted: bool = row.try_get("deleted")?;
        let deleted_at: Option<DateTime<Utc>> = row.try_get("deleted_at")?;
        let state = CategoryState::from_columns(deleted, deleted_at).ok_or_else(|| {
            sqlx::Error::ColumnDecode {
                index: "deleted_at".to_string(),
                source: "deleted and deleted_at must be set together".into(),
            }
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            parent_id: row.try_get("parent_id")?,
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            description: row.try_get("description")?,
            icon: row.try_get("icon")?,
            image_url: row.try_get("image_url")?,
            sort_order: row.try_get("sort_order")?,
            is_active: row.try_get("is_active")?,
            state,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Fields for a category that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

/// Minimal projection used to walk parent chains
#[derive(Debug, Clone, FromRow)]
pub struct ParentLink {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
}

impl From<&Category> for ParentLink {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name.clone(),
        }
    }
}

/// Which side of the trash a listing reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletedScope {
    Live,
    Trashed,
    Any,
}

/// Row filter for category listings.
///
/// `Live` and `Any` listings are ordered by `sort_order`, then insertion order;
/// `Trashed` listings by `deleted_at`, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    pub scope: DeletedScope,
    pub active_only: bool,
}

impl CategoryFilter {
    pub fn new(include_deleted: bool, active_only: bool) -> Self {
        Self {
            scope: if include_deleted {
                DeletedScope::Any
            } else {
                DeletedScope::Live
            },
            active_only,
        }
    }

    pub fn live() -> Self {
        Self::new(false, false)
    }

    pub fn public() -> Self {
        Self::new(false, true)
    }

    pub fn trash() -> Self {
        Self {
            scope: DeletedScope::Trashed,
            active_only: false,
        }
    }

    #[cfg(test)]
    pub fn matches(&self, category: &Category) -> bool {
        let scope_ok = match self.scope {
            DeletedScope::Live => !category.state.is_deleted(),
            DeletedScope::Trashed => category.state.is_deleted(),
            DeletedScope::Any => true,
        };
        scope_ok && (!self.active_only || category.is_active)
    }
}
