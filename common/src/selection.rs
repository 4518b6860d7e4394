//! Read-only query shapes over applications, shared by the API and the
//! browsing pages. A `Selection` contributes an optional filter and an
//! ordering; `by_category` is expressed as `ApplicationQuery::category_id`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Newest `last_updated` first, then newest `created_at`.
    #[default]
    Recent,
    /// Most downloads first.
    Popular,
    /// Rated applications only, highest rating first.
    TopRated,
}

impl Selection {
    /// SQL `WHERE` fragment over the `applications` table, if any.
    pub fn filter_sql(&self) -> Option<&'static str> {
        match self {
            Selection::TopRated => Some("applications.rating IS NOT NULL"),
            _ => None,
        }
    }

    /// SQL `ORDER BY` terms. The trailing id term keeps pages stable.
    pub fn order_sql(&self) -> &'static str {
        match self {
            Selection::Recent => {
                "applications.last_updated DESC, applications.created_at DESC, applications.id DESC"
            }
            Selection::Popular => "applications.downloads DESC, applications.id ASC",
            Selection::TopRated => "applications.rating DESC, applications.id ASC",
        }
    }
}

impl FromStr for Selection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Selection::Recent),
            "popular" => Ok(Selection::Popular),
            "top_rated" => Ok(Selection::TopRated),
            other => Err(format!("unknown selection '{}'", other)),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Selection::Recent => "recent",
            Selection::Popular => "popular",
            Selection::TopRated => "top_rated",
        };
        f.write_str(name)
    }
}

/// A composed application query: optional category filter plus a selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    pub category_id: Option<i64>,
    pub selection: Selection,
}

impl ApplicationQuery {
    pub fn by_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }
}
