/// Filter predicates shared by app counts and app listings
///
/// Counting and listing render their `WHERE` clause from the same
/// [`AppFilter`], so the `total_count` of a page always describes exactly the
/// population the page was cut from.
///
/// | Visibility | Predicate |
/// |------------|-----------|
/// | `Public`   | not archived, `is_public` |
/// | `Member`   | not archived, user holds an `active` membership |
/// | `Owner`    | not archived, user holds the `owner` role (any status) |
///
/// An optional search adds a case-insensitive substring match on the name.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::membership::{AppRole, MembershipStatus};

/// Which apps a listing may show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Member { user_id: Uuid },
    Owner { user_id: Uuid },
}

/// The relation a user must have to an app for it to appear in their listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipScope {
    /// Active membership, any role
    Member,

    /// Owner role, any status
    Owner,
}

impl MembershipScope {
    pub fn visibility(self, user_id: Uuid) -> Visibility {
        match self {
            MembershipScope::Member => Visibility::Member { user_id },
            MembershipScope::Owner => Visibility::Owner { user_id },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipScope::Member => "member",
            MembershipScope::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppFilter {
    pub visibility: Visibility,

    /// Search text as given; never empty
    search: Option<String>,
}

impl AppFilter {
    pub fn new(visibility: Visibility, search: Option<&str>) -> Self {
        let search = search.filter(|s| !s.is_empty()).map(str::to_string);

        Self { visibility, search }
    }

    pub fn public(search: Option<&str>) -> Self {
        Self::new(Visibility::Public, search)
    }

    pub fn for_user(user_id: Uuid, scope: MembershipScope, search: Option<&str>) -> Self {
        Self::new(scope.visibility(user_id), search)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// `ILIKE` pattern for the search text, wildcards in the text escaped
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(|s| format!("%{}%", escape_like(s)))
    }

    /// Appends ` WHERE ...` for an `apps` table aliased as `alias`
    pub fn push_where<'args>(&self, builder: &mut QueryBuilder<'args, Postgres>, alias: &str) {
        builder.push(format!(" WHERE {alias}.is_archived = false"));

        match self.visibility {
            Visibility::Public => {
                builder.push(format!(" AND {alias}.is_public = true"));
            }
            Visibility::Member { user_id } => {
                builder.push(format!(
                    " AND EXISTS (SELECT 1 FROM app_memberships m WHERE m.app_id = {alias}.id AND m.user_id = "
                ));
                builder.push_bind(user_id);
                builder.push(" AND m.status = ");
                builder.push_bind(MembershipStatus::Active);
                builder.push(")");
            }
            Visibility::Owner { user_id } => {
                builder.push(format!(
                    " AND EXISTS (SELECT 1 FROM app_memberships m WHERE m.app_id = {alias}.id AND m.user_id = "
                ));
                builder.push_bind(user_id);
                builder.push(" AND m.role = ");
                builder.push_bind(AppRole::Owner);
                builder.push(")");
            }
        }

        if let Some(pattern) = self.search_pattern() {
            builder.push(format!(" AND {alias}.name ILIKE "));
            builder.push_bind(pattern);
            builder.push(" ESCAPE '\\'");
        }
    }
}

/// Escapes `LIKE` metacharacters so the text matches literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
