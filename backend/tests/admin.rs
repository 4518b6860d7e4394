mod support;

use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use catalog_server::configure;
use catalog_server::db::applications;
use serde_json::{json, Value};
use support::{md5_key, MultipartBody, TestCatalog};

#[actix_web::test]
async fn category_create_rename_and_delete() {
    let catalog = TestCatalog::new();
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/admin/categories")
        .set_json(json!({ "name": "Video Apps", "icon": "🎬", "display_order": 2, "admin": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["slug"], "video-apps");
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/admin/categories/{id}"))
        .set_json(json!({ "display_order": 5 }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["slug"], "video-apps");
    assert_eq!(body["display_order"], 5);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/categories/{id}"))
        .set_json(json!({ "name": "Movies" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["slug"], "movies");

    catalog.application(id, "com.example.player", |_| {});
    let req = test::TestRequest::delete()
        .uri(&format!("/admin/categories/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let conn = catalog.state.db.connect().unwrap();
    assert_eq!(applications::count(&conn).unwrap(), 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/categories/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_categories_are_rejected() {
    let catalog = TestCatalog::new();
    catalog.category("Games", 1);
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let req = test::TestRequest::post()
        .uri("/admin/categories")
        .set_json(json!({ "name": "Games", "display_order": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "name");

    let req = test::TestRequest::post()
        .uri("/admin/categories")
        .set_json(json!({ "name": "Tools", "display_order": -1 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn admin_category_listing_is_paged() {
    let catalog = TestCatalog::new();
    for i in 0..12 {
        catalog.category(&format!("Category {i}"), i);
    }
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let req = test::TestRequest::get().uri("/admin/categories?page=2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 12);
    assert_eq!(body["page"], 2);
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn application_upload_binds_package_and_recomputes_size() {
    let catalog = TestCatalog::with_host("store.test");
    let games = catalog.category("Games", 1);
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let package = vec![7u8; 1536];
    let shot_a = b"first screenshot".to_vec();
    let shot_b = b"second screenshot".to_vec();
    let (content_type, body) = MultipartBody::new()
        .json(&json!({
            "name": "Bee Game",
            "package_name": "com.example.bee",
            "file_size": "999 MB",
            "permissions": ["network", "storage"],
            "category_id": games.id,
            "downloads_override": 5
        }))
        .file("package", "bee game.apk", "application/vnd.android.package-archive", &package)
        .file("screenshots[]", "a.png", "image/png", &shot_a)
        .file("screenshots[]", "b.png", "image/png", &shot_b)
        .finish();
    let req = test::TestRequest::post()
        .uri("/admin/applications")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;

    assert_eq!(created["file_size"], "1.5 KB");
    assert_eq!(created["file_size_bytes"], 1536);
    assert_eq!(created["downloads"], 0);
    assert_eq!(created["permissions_array"], json!(["network", "storage"]));
    assert_eq!(
        created["download_url"],
        format!("http://store.test/blobs/{}/bee_game.apk", md5_key(&package))
    );
    assert_eq!(
        created["screenshots"],
        json!([
            format!("/blobs/{}/a.png", md5_key(&shot_a)),
            format!("/blobs/{}/b.png", md5_key(&shot_b)),
        ])
    );

    let req = test::TestRequest::get()
        .uri(&format!("/blobs/{}/a.png", md5_key(&shot_a)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
    let bytes = test::read_body(resp).await;
    assert_eq!(bytes.as_ref(), shot_a.as_slice());
}

#[actix_web::test]
async fn package_links_stay_relative_without_a_host() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    let bee = catalog.application(games.id, "com.example.bee", |_| {});
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let package = vec![1u8; 2048];
    let (content_type, body) = MultipartBody::new()
        .file("package", "bee.apk", "application/octet-stream", &package)
        .finish();
    let req = test::TestRequest::post()
        .uri(&format!("/admin/applications/{}/package", bee.id))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["file_size"], "2 KB");
    assert_eq!(body["download_url"], format!("/blobs/{}/bee.apk", md5_key(&package)));
}

#[actix_web::test]
async fn application_without_download_source_is_rejected() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let (content_type, body) = MultipartBody::new()
        .json(&json!({ "name": "Bee", "package_name": "com.example.bee", "category_id": games.id }))
        .finish();
    let req = test::TestRequest::post()
        .uri("/admin/applications")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "base");

    let conn = catalog.state.db.connect().unwrap();
    assert_eq!(applications::count(&conn).unwrap(), 0);
}

#[actix_web::test]
async fn duplicate_package_names_and_bad_packages_are_rejected() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    catalog.application(games.id, "com.example.bee", |_| {});
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let (content_type, body) = MultipartBody::new()
        .json(&json!({
            "name": "Other Bee",
            "package_name": "com.example.bee",
            "download_url": "https://example.com/other.apk",
            "category_id": games.id
        }))
        .finish();
    let req = test::TestRequest::post()
        .uri("/admin/applications")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "package_name");

    let (content_type, body) = MultipartBody::new()
        .json(&json!({ "name": "Readme", "package_name": "com.example.readme", "category_id": games.id }))
        .file("package", "readme.txt", "text/plain", b"hello")
        .finish();
    let req = test::TestRequest::post()
        .uri("/admin/applications")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn application_update_and_delete() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    let tools = catalog.category("Tools", 2);
    let bee = catalog.application(games.id, "com.example.bee", |_| {});
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let (content_type, body) = MultipartBody::new()
        .json(&json!({ "version": "2.0.0", "rating": 4.2, "category_id": tools.id }))
        .finish();
    let req = test::TestRequest::put()
        .uri(&format!("/admin/applications/{}", bee.id))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["version"], "2.0.0");
    assert_eq!(body["rating"], 4.2);
    assert_eq!(body["category"]["name"], "Tools");

    let (content_type, body) = MultipartBody::new().json(&json!({ "rating": 7 })).finish();
    let req = test::TestRequest::put()
        .uri(&format!("/admin/applications/{}", bee.id))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/applications/{}", bee.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/applications/{}", bee.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn oversized_uploads_are_refused() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    let bee = catalog.application(games.id, "com.example.bee", |_| {});
    let state = catalog.state.clone().with_upload_limit(1024);
    let app = test::init_service(App::new().configure(configure(state))).await;

    let (content_type, body) = MultipartBody::new()
        .file("package", "bee.apk", "application/octet-stream", &vec![0u8; 4096])
        .finish();
    let req = test::TestRequest::post()
        .uri(&format!("/admin/applications/{}/package", bee.id))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[actix_web::test]
async fn null_clears_rating_and_drops_the_app_from_top_rated() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    let bee = catalog.application(games.id, "com.example.bee", |app| {
        app.rating = Some(4.0);
        app.file_size_bytes = Some(10);
        app.last_updated = chrono::NaiveDate::from_ymd_opt(2025, 1, 1);
    });
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/applications?sort=top_rated")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (content_type, body) = MultipartBody::new()
        .json(&json!({ "rating": null, "file_size_bytes": null, "last_updated": null }))
        .finish();
    let req = test::TestRequest::put()
        .uri(&format!("/admin/applications/{}", bee.id))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["rating"].is_null());
    assert!(body["file_size_bytes"].is_null());
    assert!(body["last_updated"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/v1/applications?sort=top_rated")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn submitted_byte_count_recomputes_the_size_string() {
    let catalog = TestCatalog::new();
    let games = catalog.category("Games", 1);
    let bee = catalog.application(games.id, "com.example.bee", |app| {
        app.file_size = Some("999 MB".to_string());
    });
    let app = test::init_service(App::new().configure(configure(catalog.state.clone()))).await;

    let (content_type, body) = MultipartBody::new()
        .json(&json!({ "file_size_bytes": 13_631_488 }))
        .finish();
    let req = test::TestRequest::put()
        .uri(&format!("/admin/applications/{}", bee.id))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["file_size"], "13 MB");
    assert_eq!(body["file_size_bytes"], 13_631_488);
}
