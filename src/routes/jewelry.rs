use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::Authorized;
use crate::forms::jewelry::{
    AddJewelryFormPayload, JewelryUploadForm, JewelryUploads, UpdateJewelryFormPayload,
};
use crate::media::MediaPipeline;
use crate::repository::DieselRepository;
use crate::routes::{MessageBody, respond, stage_upload};
use crate::services::jewelry::{
    JewelryFilter, create_jewelry as create_jewelry_service,
    delete_jewelry as delete_jewelry_service, get_jewelry as get_jewelry_service,
    list_jewelry as list_jewelry_service, update_jewelry as update_jewelry_service,
};
use crate::services::{ServiceResult, StagedMedia};

/// Stage both uploads; a failure on the second removes the first.
fn stage_uploads(uploads: JewelryUploads, media: &MediaPipeline) -> ServiceResult<StagedMedia> {
    let image = stage_upload(uploads.image, &media.store)?;
    let video = match stage_upload(uploads.video, &media.store) {
        Ok(video) => video,
        Err(e) => {
            media.purge(&image.into_iter().collect::<Vec<_>>());
            return Err(e);
        }
    };
    Ok(StagedMedia { image, video })
}

async fn list(filter: JewelryFilter, repo: web::Data<DieselRepository>) -> HttpResponse {
    let result = web::block(move || list_jewelry_service(filter, repo.get_ref())).await;
    respond(result, StatusCode::OK, "list jewelry")
}

#[get("/api/jewelry")]
pub async fn list_jewelry(repo: web::Data<DieselRepository>) -> impl Responder {
    list(JewelryFilter::All, repo).await
}

#[get("/api/jewelry/category/{category_id}")]
pub async fn list_jewelry_by_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    list(JewelryFilter::CategoryId(category_id.into_inner()), repo).await
}

#[get("/api/jewelry/category-name/{name}")]
pub async fn list_jewelry_by_category_name(
    name: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    list(JewelryFilter::CategoryName(name.into_inner()), repo).await
}

#[get("/api/jewelry/{jewelry_id}")]
pub async fn get_jewelry(
    jewelry_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let jewelry_id = jewelry_id.into_inner();
    let result = web::block(move || get_jewelry_service(jewelry_id, repo.get_ref())).await;
    respond(result, StatusCode::OK, "get jewelry item")
}

#[post("/api/jewelry")]
pub async fn create_jewelry(
    _auth: Authorized,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
    MultipartForm(form): MultipartForm<JewelryUploadForm>,
) -> impl Responder {
    let result = web::block(move || -> ServiceResult<_> {
        let (form, uploads) = form.into_parts()?;
        let payload = AddJewelryFormPayload::try_from(form)?;
        let staged = stage_uploads(uploads, &media)?;
        create_jewelry_service(payload, staged, repo.get_ref(), &media)
    })
    .await;
    respond(result, StatusCode::CREATED, "create jewelry item")
}

#[put("/api/jewelry/{jewelry_id}")]
pub async fn update_jewelry(
    _auth: Authorized,
    jewelry_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
    MultipartForm(form): MultipartForm<JewelryUploadForm>,
) -> impl Responder {
    let jewelry_id = jewelry_id.into_inner();
    let result = web::block(move || -> ServiceResult<_> {
        let (form, uploads) = form.into_parts()?;
        let payload = UpdateJewelryFormPayload::try_from(form)?;
        let staged = stage_uploads(uploads, &media)?;
        update_jewelry_service(jewelry_id, payload, staged, repo.get_ref(), &media)
    })
    .await;
    respond(result, StatusCode::OK, "update jewelry item")
}

#[delete("/api/jewelry/{jewelry_id}")]
pub async fn delete_jewelry(
    _auth: Authorized,
    jewelry_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
) -> impl Responder {
    let jewelry_id = jewelry_id.into_inner();
    let result =
        web::block(move || delete_jewelry_service(jewelry_id, repo.get_ref(), &media)).await;

    match result {
        Ok(Ok(())) => HttpResponse::Ok().json(MessageBody::new("Jewelry item deleted successfully")),
        other => respond(other, StatusCode::OK, "delete jewelry item"),
    }
}
