//! Public JSON shapes of the catalog.
//!
//! These are pure read-side projections: building a view never touches
//! persisted state. Derived values (icon, download URL, file size,
//! screenshots) come from the `DownloadResolver`.

use crate::model::application::Application;
use crate::model::category::Category;
use crate::resolver::DownloadResolver;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// Minimal category nested inside an application. `slug` is only present in
/// the detail shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationView {
    pub id: i64,
    pub name: String,
    pub package_name: String,
    pub version: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub download_url: String,
    pub file_size: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub developer: Option<String>,
    pub rating: Option<f64>,
    pub downloads: i64,
    pub last_updated: Option<NaiveDate>,
    pub min_android_version: Option<String>,
    pub permissions_array: Vec<String>,
    pub features_array: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationDetailView {
    #[serde(flatten)]
    pub application: ApplicationView,
    pub screenshots: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application summary nested in the category listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationBrief {
    pub id: i64,
    pub name: String,
    pub package_name: String,
    pub version: Option<String>,
    pub icon: Option<String>,
    pub download_url: String,
    pub file_size: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub rating: Option<f64>,
    pub downloads: i64,
}

/// A category with its applications, either as `ApplicationBrief`
/// (listing) or `ApplicationView` (detail).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryView<A> {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub display_order: i64,
    pub applications: Vec<A>,
}

pub struct CatalogSerializer<'a> {
    resolver: DownloadResolver<'a>,
}

impl<'a> CatalogSerializer<'a> {
    pub fn new(resolver: DownloadResolver<'a>) -> Self {
        Self { resolver }
    }

    /// List shape of one application, with the minimal `{id, name, icon}`
    /// category when one is given.
    pub fn application(&self, app: &Application, category: Option<&Category>) -> ApplicationView {
        ApplicationView {
            id: app.id,
            name: app.name.clone(),
            package_name: app.package_name.clone(),
            version: app.version.clone(),
            description: app.description.clone(),
            icon: self.resolver.icon(app),
            download_url: self.resolver.download_url(app),
            file_size: self.resolver.file_size(app),
            file_size_bytes: app.file_size_bytes,
            developer: app.developer.clone(),
            rating: app.rating,
            downloads: app.downloads,
            last_updated: app.last_updated,
            min_android_version: app.min_android_version.clone(),
            permissions_array: app.permissions_array(),
            features_array: app.features_array(),
            category: category.map(|c| CategoryRef {
                id: c.id,
                name: c.name.clone(),
                slug: None,
                icon: c.icon.clone(),
            }),
        }
    }

    /// List shape for many applications, keeping their order. Categories are
    /// matched by id; an application whose category is not given is emitted
    /// without one.
    pub fn applications(&self, apps: &[Application], categories: &[Category]) -> Vec<ApplicationView> {
        let by_id: HashMap<i64, &Category> = categories.iter().map(|c| (c.id, c)).collect();
        apps.iter()
            .map(|app| self.application(app, by_id.get(&app.category_id).copied()))
            .collect()
    }

    pub fn application_detail(&self, app: &Application, category: &Category) -> ApplicationDetailView {
        let mut application = self.application(app, Some(category));
        if let Some(c) = application.category.as_mut() {
            c.slug = Some(category.slug.clone());
        }
        ApplicationDetailView {
            application,
            screenshots: self.resolver.screenshots(app),
            created_at: app.created_at,
            updated_at: app.updated_at,
        }
    }

    pub fn category(&self, category: &Category, apps: &[Application]) -> CategoryView<ApplicationBrief> {
        let applications = apps.iter().map(|app| self.brief(app)).collect();
        category_view(category, applications)
    }

    pub fn category_detail(&self, category: &Category, apps: &[Application]) -> CategoryView<ApplicationView> {
        let applications = apps.iter().map(|app| self.application(app, None)).collect();
        category_view(category, applications)
    }

    /// Category listing, always in `display_order` then `name` order
    /// whatever order the entries arrive in.
    pub fn categories(&self, mut entries: Vec<(Category, Vec<Application>)>) -> Vec<CategoryView<ApplicationBrief>> {
        entries.sort_by(|(a, _), (b, _)| Category::listing_order(a, b));
        entries
            .iter()
            .map(|(category, apps)| self.category(category, apps))
            .collect()
    }

    fn brief(&self, app: &Application) -> ApplicationBrief {
        ApplicationBrief {
            id: app.id,
            name: app.name.clone(),
            package_name: app.package_name.clone(),
            version: app.version.clone(),
            icon: self.resolver.icon(app),
            download_url: self.resolver.download_url(app),
            file_size: self.resolver.file_size(app),
            file_size_bytes: app.file_size_bytes,
            rating: app.rating,
            downloads: app.downloads,
        }
    }
}

fn category_view<A>(category: &Category, applications: Vec<A>) -> CategoryView<A> {
    CategoryView {
        id: category.id,
        name: category.name.clone(),
        slug: category.slug.clone(),
        icon: category.icon.clone(),
        description: category.description.clone(),
        display_order: category.display_order,
        applications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::tests::{FakeStore, attachment};
    use crate::url::UrlContext;
    use serde_json::json;

    fn category(id: i64, name: &str, display_order: i64) -> Category {
        Category {
            id,
            name: name.to_string(),
            slug: name.to_lowercase(),
            icon: Some("🎮".to_string()),
            description: Some("games".to_string()),
            display_order,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn app(id: i64, category_id: i64) -> Application {
        let mut app = Application::new(category_id);
        app.id = id;
        app.name = format!("App {}", id);
        app.package_name = format!("com.example.app{}", id);
        app.icon = Some("🐝".to_string());
        app.download_url = Some("https://example.com/app.apk".to_string());
        app.permissions = Some("[\"network\",\"storage\"]".to_string());
        app.features = Some("not json".to_string());
        app.rating = Some(4.5);
        app.downloads = 1250;
        app
    }

    #[test]
    fn list_view_has_minimal_category_and_decoded_lists() {
        let store = FakeStore { cdn: None };
        let serializer = CatalogSerializer::new(DownloadResolver::new(&store, None));
        let games = category(1, "Games", 1);
        let value = serde_json::to_value(serializer.application(&app(5, 1), Some(&games))).unwrap();

        assert_eq!(value["category"], json!({"id": 1, "name": "Games", "icon": "🎮"}));
        assert_eq!(value["permissions_array"], json!(["network", "storage"]));
        assert_eq!(value["features_array"], json!([]));
        assert_eq!(value["download_url"], "https://example.com/app.apk");
        assert!(value.get("screenshots").is_none());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn detail_view_adds_slug_screenshots_and_timestamps() {
        let store = FakeStore { cdn: None };
        let ctx = UrlContext::new("https", "glasses.example", None);
        let serializer = CatalogSerializer::new(DownloadResolver::new(&store, Some(&ctx)));
        let games = category(1, "Games", 1);
        let mut app = app(5, 1);
        app.icon_attachment = Some(attachment("ic", "icon.png"));
        app.screenshots = vec![attachment("s1", "one.png")];
        app.bind_package(attachment("pk", "app.apk"));

        let value = serde_json::to_value(serializer.application_detail(&app, &games)).unwrap();
        assert_eq!(value["category"]["slug"], "games");
        assert_eq!(value["icon"], "/blobs/ic/icon.png");
        assert_eq!(value["screenshots"], json!(["/blobs/s1/one.png"]));
        assert_eq!(value["download_url"], "https://glasses.example/blobs/pk/app.apk");
        assert_eq!(value["file_size"], "1.5 KB");
        assert!(value["created_at"].is_string());
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn category_listing_nests_briefs_in_listing_order() {
        let store = FakeStore { cdn: None };
        let serializer = CatalogSerializer::new(DownloadResolver::new(&store, None));
        let entries = vec![
            (category(2, "Video", 2), vec![]),
            (category(3, "Tools", 1), vec![app(9, 3)]),
            (category(1, "Reading", 1), vec![]),
        ];
        let value = serde_json::to_value(serializer.categories(entries)).unwrap();
        let names: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Reading", "Tools", "Video"]);

        let brief = &value[1]["applications"][0];
        assert_eq!(brief["package_name"], "com.example.app9");
        assert!(brief.get("permissions_array").is_none());
        assert!(brief.get("description").is_none());
    }

    #[test]
    fn category_detail_nests_full_applications_without_category() {
        let store = FakeStore { cdn: None };
        let serializer = CatalogSerializer::new(DownloadResolver::new(&store, None));
        let games = category(1, "Games", 1);
        let value = serde_json::to_value(serializer.category_detail(&games, &[app(1, 1), app(2, 1)])).unwrap();
        let apps = value["applications"].as_array().unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0]["id"], 1);
        assert!(apps[0].get("category").is_none());
        assert_eq!(apps[0]["permissions_array"], json!(["network", "storage"]));
        assert_eq!(value["display_order"], 1);
    }

    #[test]
    fn applications_match_categories_by_id() {
        let store = FakeStore { cdn: None };
        let serializer = CatalogSerializer::new(DownloadResolver::new(&store, None));
        let cats = [category(1, "Games", 1), category(2, "Video", 2)];
        let views = serializer.applications(&[app(1, 2), app(2, 1), app(3, 99)], &cats);
        assert_eq!(views[0].category.as_ref().unwrap().name, "Video");
        assert_eq!(views[1].category.as_ref().unwrap().name, "Games");
        assert!(views[2].category.is_none());
    }
}
