//! Image API integration tests over in-memory repositories.
//!
//! Run with: `cargo test -p imagehub-api --test images_test`

mod helpers;

use axum::body::Bytes;
use axum_test::multipart::{MultipartForm, Part};
use helpers::auth::{create_test_admin, register_test_user, TestUser};
use helpers::{fixtures, setup_test_app, TestApp};
use imagehub_api::handlers::images::DeleteAllResponse;
use imagehub_core::models::{Category, Image};
use serde_json::Value;

fn image_form(file_name: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type("image/png");
    MultipartForm::new().add_part("image", part)
}

async fn upload(app: &TestApp, user: &TestUser, form: MultipartForm) -> Image {
    let response = app
        .client()
        .post("/api/user/images")
        .add_header("Authorization", user.bearer())
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.json::<Image>()
}

#[tokio::test]
async fn test_upload_stores_files_row_and_categories() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;

    let form = image_form("sunset.png", fixtures::png(600, 300))
        .add_text("description", "Sunset over the bay")
        .add_text("categories", "Nature")
        .add_text("categories", "Unknown");
    let image = upload(&app, &user, form).await;

    assert_eq!(image.owner_id, user.id);
    assert_eq!(image.file_name, "sunset.png");
    assert_eq!(image.description, "Sunset over the bay");
    assert_eq!(image.file_path, format!("{}/sunset.png", user.id));
    assert_eq!(image.thumbnail_path, format!("{}/thumbnails/sunset.png", user.id));
    assert!(app.upload_root().join(&image.file_path).exists());
    assert!(app.upload_root().join(&image.thumbnail_path).exists());

    let response = app
        .client()
        .get(&format!("/api/user/images/{}/categories", image.id))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let categories = response.json::<Vec<Category>>();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Nature");
}

#[tokio::test]
async fn test_upload_rejects_missing_or_bad_files() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;

    // no image field
    let response = app
        .client()
        .post("/api/user/images")
        .add_header("Authorization", user.bearer())
        .multipart(MultipartForm::new().add_text("description", "nothing"))
        .await;
    assert_eq!(response.status_code(), 400);

    // empty file
    let response = app
        .client()
        .post("/api/user/images")
        .add_header("Authorization", user.bearer())
        .multipart(image_form("empty.png", Vec::new()))
        .await;
    assert_eq!(response.status_code(), 400);

    // not an image
    let response = app
        .client()
        .post("/api/user/images")
        .add_header("Authorization", user.bearer())
        .multipart(image_form("notes.png", b"plain text".to_vec()))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "IMAGE_DECODE_ERROR");
    assert_eq!(app.db.image_count(), 0);
}

#[tokio::test]
async fn test_thumbnail_is_bounded_jpeg() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;
    let image = upload(&app, &user, image_form("wide.png", fixtures::png(600, 300))).await;

    let response = app
        .client()
        .get(&format!("/api/user/images/{}/thumbnail", image.id))
        .add_header("Authorization", user.bearer())
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/jpeg");
    let thumbnail = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((thumbnail.width(), thumbnail.height()), (150, 75));
}

#[tokio::test]
async fn test_other_users_image_is_forbidden() {
    let app = setup_test_app().await;
    let owner = register_test_user(app.client(), "owner@example.com").await;
    let other = register_test_user(app.client(), "other@example.com").await;
    let image = upload(&app, &owner, image_form("a.png", fixtures::png(20, 20))).await;

    for path in [
        format!("/api/user/images/{}", image.id),
        format!("/api/user/images/{}/thumbnail", image.id),
        format!("/api/user/images/{}/categories", image.id),
    ] {
        let response = app
            .client()
            .get(&path)
            .add_header("Authorization", other.bearer())
            .await;
        assert_eq!(response.status_code(), 403, "{}", path);
    }

    let response = app
        .client()
        .delete(&format!("/api/user/images/{}", image.id))
        .add_header("Authorization", other.bearer())
        .await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(app.db.image_count(), 1);

    let response = app
        .client()
        .get("/api/user/images")
        .add_header("Authorization", other.bearer())
        .await;
    assert!(response.json::<Vec<Image>>().is_empty());
}

#[tokio::test]
async fn test_delete_single_image() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;
    let image = upload(&app, &user, image_form("a.png", fixtures::png(20, 20))).await;

    let response = app
        .client()
        .delete(&format!("/api/user/images/{}", image.id))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 204);
    assert!(!app.upload_root().join(&image.file_path).exists());
    assert!(!app.upload_root().join(&image.thumbnail_path).exists());

    let response = app
        .client()
        .get(&format!("/api/user/images/{}", image.id))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_all_own_images() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;
    let other = register_test_user(app.client(), "other@example.com").await;
    for name in ["a.png", "b.png", "c.png"] {
        upload(&app, &user, image_form(name, fixtures::png(20, 20))).await;
    }
    let kept = upload(&app, &other, image_form("keep.png", fixtures::png(20, 20))).await;

    let response = app
        .client()
        .delete("/api/user/images")
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    let body = response.json::<DeleteAllResponse>();
    assert_eq!(body.deleted, 3);
    assert_eq!(body.owner_id, user.id);

    assert_eq!(app.db.image_count(), 1);
    assert!(app.upload_root().join(&kept.file_path).exists());
    assert!(!app
        .upload_root()
        .join(format!("{}/a.png", user.id))
        .exists());

    // nothing left to delete
    let response = app
        .client()
        .delete("/api/user/images")
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.json::<DeleteAllResponse>().deleted, 0);
}

#[tokio::test]
async fn test_admin_acts_on_behalf_of_user() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;
    let admin = create_test_admin(app.client(), &app.db, "root@example.com").await;

    let response = app
        .client()
        .post(&format!("/api/admin/users/{}/images", user.id))
        .add_header("Authorization", admin.bearer())
        .multipart(image_form("by-admin.png", fixtures::png(40, 40)))
        .await;
    assert_eq!(response.status_code(), 201);
    let image = response.json::<Image>();
    assert_eq!(image.owner_id, user.id);

    // the owner sees it
    let response = app
        .client()
        .get(&format!("/api/user/images/{}", image.id))
        .add_header("Authorization", user.bearer())
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .get(&format!("/api/admin/users/{}/images", user.id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(response.json::<Vec<Image>>().len(), 1);

    let response = app
        .client()
        .get(&format!("/api/admin/images/{}", image.id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(response.status_code(), 200);

    let response = app
        .client()
        .delete(&format!("/api/admin/users/{}/images", user.id))
        .add_header("Authorization", admin.bearer())
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<DeleteAllResponse>().deleted, 1);
    assert_eq!(app.db.image_count(), 0);
}

#[tokio::test]
async fn test_admin_upload_for_missing_account_is_not_found() {
    let app = setup_test_app().await;
    let admin = create_test_admin(app.client(), &app.db, "root@example.com").await;

    let response = app
        .client()
        .post("/api/admin/users/999/images")
        .add_header("Authorization", admin.bearer())
        .multipart(image_form("a.png", fixtures::png(20, 20)))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = setup_test_app().await;
    let user = register_test_user(app.client(), "jane@example.com").await;

    // test config allows 1 MiB
    let response = app
        .client()
        .post("/api/user/images")
        .add_header("Authorization", user.bearer())
        .multipart(image_form("big.png", vec![7u8; 2 * 1024 * 1024]))
        .await;
    assert_eq!(response.status_code(), 413);
    assert_eq!(app.db.image_count(), 0);
}
