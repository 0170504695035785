use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, CONTENT_TYPE,
    ORIGIN,
};
use actix_web::{App, test, web};
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use jewelry_catalog::domain::types::{MediaKind, MediaPath};
use jewelry_catalog::media::{ImageNormalizer, MediaPipeline, MediaStore};
use jewelry_catalog::models::config::ServerConfig;
use jewelry_catalog::repository::DieselRepository;
use jewelry_catalog::routes;
use serde_json::Value;

mod common;

const BOUNDARY: &str = "catalog-test-boundary";

struct Harness {
    _db: common::TestDb,
    _media_dir: tempfile::TempDir,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
    config: web::Data<ServerConfig>,
}

impl Harness {
    fn new() -> Self {
        let db = common::TestDb::new();
        let media_dir = tempfile::tempdir().expect("should create media dir");
        let store = MediaStore::new(media_dir.path());
        store.ensure_layout().expect("should create media layout");

        let config = ServerConfig {
            database_url: String::new(),
            address: "127.0.0.1".to_string(),
            port: 0,
            media_root: PathBuf::from(media_dir.path()),
            api_token: "secret".to_string(),
            image_quality: 85.0,
            image_effort: 4,
        };

        Harness {
            repo: web::Data::new(DieselRepository::new(db.pool())),
            media: web::Data::new(MediaPipeline::new(store, ImageNormalizer::default())),
            config: web::Data::new(config),
            _db: db,
            _media_dir: media_dir,
        }
    }
}

impl Harness {
    fn stored(&self, url: &str) -> bool {
        self.media
            .store
            .exists(&MediaPath::new(url).expect("valid media path"))
    }

    fn files(&self, kind: MediaKind) -> Vec<String> {
        std::fs::read_dir(self.media.store.directory(kind))
            .expect("media dir exists")
            .map(|entry| {
                entry
                    .expect("readable entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }
}

fn png() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::RgbImage::from_pixel(8, 8, image::Rgb([180, 40, 60]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("should encode png");
    bytes
}

fn image_part<'a>(file_name: &'a str, bytes: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "image",
        file_name,
        content_type: "image/png",
        bytes,
    }
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

fn multipart(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: test::TestRequest, uri: &str, parts: &[Part<'_>]) -> test::TestRequest {
    method
        .uri(uri)
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart(parts))
}

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data($harness.repo.clone())
                .app_data($harness.media.clone())
                .app_data($harness.config.clone())
                .configure(routes::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn index_reports_liveness() {
    let harness = Harness::new();
    let app = app!(harness);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, "Jewelry Diary API is running");
}

#[actix_web::test]
async fn mutations_require_a_valid_token() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/categories",
        &[Part::Text("name", "Rings")],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::delete()
        .uri("/api/categories/1")
        .insert_header((AUTHORIZATION, "Bearer wrong"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn category_lifecycle_over_http() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/categories",
        &[Part::Text("name", "Rings"), Part::Text("description", "Gold")],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["name"], "Rings");
    assert_eq!(created["imageUrl"], Value::Null);
    assert!(created["createdAt"].is_string());
    let id = created["id"].as_i64().expect("numeric id");

    let req = test::TestRequest::get()
        .uri(&format!("/api/categories/{id}"))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["description"], "Gold");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/categories/{id}"))
        .insert_header((AUTHORIZATION, "Bearer secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!("/api/categories/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn rejects_uploads_with_the_wrong_mime_type() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/jewelry",
        &[
            Part::Text("name", "Ring"),
            Part::File {
                name: "video",
                file_name: "notes.txt",
                content_type: "text/plain",
                bytes: b"hello",
            },
        ],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let store = &harness.media.store;
    let stored = std::fs::read_dir(store.directory(MediaKind::Video))
        .expect("videos dir exists")
        .count();
    assert_eq!(stored, 0);
}

#[actix_web::test]
async fn creates_jewelry_with_a_video_and_lists_it_by_snapshot() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/categories",
        &[Part::Text("name", "Necklaces")],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let category: Value = test::call_and_read_body_json(&app, req).await;
    let category_id = category["id"].as_i64().expect("numeric id").to_string();

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/jewelry",
        &[
            Part::Text("name", "Pearl strand"),
            Part::Text("category", &category_id),
            Part::Text("price", "420.5"),
            Part::File {
                name: "video",
                file_name: "Pearl.MP4",
                content_type: "video/mp4",
                bytes: b"not really a video",
            },
        ],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["categoryNameSnapshot"], "Necklaces");
    assert_eq!(created["imageUrl"], Value::Null);
    let video_url = created["videoUrl"].as_str().expect("video url");
    assert!(video_url.starts_with("/videos/") && video_url.ends_with(".mp4"));

    let req = test::TestRequest::get()
        .uri("/api/jewelry/category-name/Necklaces")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["category"]["name"], "Necklaces");
    assert_eq!(listed[0]["price"], 420.5);
}

#[actix_web::test]
async fn bad_and_missing_ids() {
    let harness = Harness::new();
    let app = app!(harness);

    let req = test::TestRequest::get().uri("/api/jewelry/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/jewelry/0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/jewelry/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Not found");
}

#[actix_web::test]
async fn image_upload_wins_over_video_and_delete_removes_it() {
    let harness = Harness::new();
    let app = app!(harness);
    let png = png();

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/jewelry",
        &[
            Part::Text("name", "Ruby ring"),
            Part::File {
                name: "image",
                file_name: "ruby.PNG",
                content_type: "image/png",
                bytes: &png,
            },
            Part::File {
                name: "video",
                file_name: "ruby.mp4",
                content_type: "video/mp4",
                bytes: b"not really a video",
            },
        ],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;

    let image_url = created["imageUrl"].as_str().expect("image url").to_string();
    assert!(image_url.starts_with("/images/") && image_url.ends_with(".webp"));
    assert_eq!(created["videoUrl"], Value::Null);
    assert!(harness.stored(&image_url));
    assert_eq!(harness.files(MediaKind::Image).len(), 1);
    assert!(harness.files(MediaKind::Video).is_empty());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/jewelry/{}", created["id"]))
        .insert_header((AUTHORIZATION, "Bearer secret"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!harness.stored(&image_url));
    assert!(harness.files(MediaKind::Image).is_empty());
}

#[actix_web::test]
async fn failed_video_staging_discards_the_staged_image() {
    let harness = Harness::new();
    let app = app!(harness);
    let png = png();

    // A plain file where the videos directory should be makes staging fail.
    let videos = harness.media.store.directory(MediaKind::Video);
    std::fs::remove_dir(&videos).expect("should remove videos dir");
    std::fs::write(&videos, b"").expect("should block videos dir");

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/jewelry",
        &[
            Part::Text("name", "Opal pendant"),
            Part::File {
                name: "image",
                file_name: "opal.png",
                content_type: "image/png",
                bytes: &png,
            },
            Part::File {
                name: "video",
                file_name: "opal.mp4",
                content_type: "video/mp4",
                bytes: b"not really a video",
            },
        ],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(harness.files(MediaKind::Image).is_empty());

    let req = test::TestRequest::get().uri("/api/jewelry").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);
}

#[actix_web::test]
async fn updates_delete_superseded_media() {
    let harness = Harness::new();
    let app = app!(harness);
    let png = png();

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/categories",
        &[Part::Text("name", "Earrings"), image_part("first.png", &png)],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let first = created["imageUrl"].as_str().expect("image url").to_string();
    assert!(harness.stored(&first));

    let req = multipart_request(
        test::TestRequest::put(),
        &format!("/api/categories/{}", created["id"]),
        &[image_part("second.png", &png)],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    let second = updated["imageUrl"].as_str().expect("image url").to_string();

    assert_ne!(first, second);
    assert_eq!(updated["name"], "Earrings");
    assert!(!harness.stored(&first));
    assert!(harness.stored(&second));

    let req = multipart_request(
        test::TestRequest::post(),
        "/api/jewelry",
        &[Part::Text("name", "Hoops"), image_part("hoops.png", &png)],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let item: Value = test::call_and_read_body_json(&app, req).await;
    let item_image = item["imageUrl"].as_str().expect("image url").to_string();

    let req = multipart_request(
        test::TestRequest::put(),
        &format!("/api/jewelry/{}", item["id"]),
        &[Part::File {
            name: "video",
            file_name: "hoops.mp4",
            content_type: "video/mp4",
            bytes: b"not really a video",
        }],
    )
    .insert_header((AUTHORIZATION, "Bearer secret"))
    .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    let video = updated["videoUrl"].as_str().expect("video url");

    assert_eq!(updated["imageUrl"], Value::Null);
    assert!(harness.stored(video));
    assert!(!harness.stored(&item_image));
    assert_eq!(harness.files(MediaKind::Image), vec![second.trim_start_matches("/images/")]);
}

#[actix_web::test]
async fn rejects_unknown_multipart_fields() {
    let harness = Harness::new();
    let app = app!(harness);

    for uri in ["/api/categories", "/api/jewelry"] {
        let req = multipart_request(
            test::TestRequest::post(),
            uri,
            &[Part::Text("name", "Rings"), Part::Text("colour", "gold")],
        )
        .insert_header((AUTHORIZATION, "Bearer secret"))
        .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().expect("array").len(), 0);
}

#[actix_web::test]
async fn answers_cross_origin_requests() {
    let harness = Harness::new();
    let app = test::init_service(
        App::new()
            .wrap(routes::cors())
            .app_data(harness.repo.clone())
            .app_data(harness.media.clone())
            .app_data(harness.config.clone())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/categories")
        .insert_header((ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).expect("allow-origin header"),
        "http://localhost:3000"
    );

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/jewelry/1")
        .insert_header((ORIGIN, "http://localhost:3000"))
        .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "DELETE"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[actix_web::test]
async fn reports_an_unreachable_database_as_unavailable() {
    let harness = Harness::new();
    let pool = Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_millis(100))
        .build(ConnectionManager::<SqliteConnection>::new(":memory:"))
        .expect("should build pool");
    let _held = pool.get().expect("should take the only connection");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DieselRepository::new(pool.clone())))
            .app_data(harness.media.clone())
            .app_data(harness.config.clone())
            .configure(routes::configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/categories").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Database not connected");
}
