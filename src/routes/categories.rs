use actix_multipart::form::MultipartForm;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::auth::Authorized;
use crate::forms::categories::{
    AddCategoryFormPayload, CategoryUploadForm, UpdateCategoryFormPayload,
};
use crate::media::MediaPipeline;
use crate::repository::DieselRepository;
use crate::routes::{MessageBody, respond, stage_upload};
use crate::services::ServiceResult;
use crate::services::categories::{
    create_category as create_category_service, delete_category as delete_category_service,
    get_category as get_category_service, list_categories as list_categories_service,
    update_category as update_category_service,
};

#[get("/api/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    let result = web::block(move || list_categories_service(repo.get_ref())).await;
    respond(result, StatusCode::OK, "list categories")
}

#[get("/api/categories/{category_id}")]
pub async fn get_category(
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    let result = web::block(move || get_category_service(category_id, repo.get_ref())).await;
    respond(result, StatusCode::OK, "get category")
}

#[post("/api/categories")]
pub async fn create_category(
    _auth: Authorized,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
    MultipartForm(form): MultipartForm<CategoryUploadForm>,
) -> impl Responder {
    let result = web::block(move || -> ServiceResult<_> {
        let (form, image) = form.into_parts()?;
        let payload = AddCategoryFormPayload::try_from(form)?;
        let image = stage_upload(image, &media.store)?;
        create_category_service(payload, image, repo.get_ref(), &media)
    })
    .await;
    respond(result, StatusCode::CREATED, "create category")
}

#[put("/api/categories/{category_id}")]
pub async fn update_category(
    _auth: Authorized,
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
    MultipartForm(form): MultipartForm<CategoryUploadForm>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    let result = web::block(move || -> ServiceResult<_> {
        let (form, image) = form.into_parts()?;
        let payload = UpdateCategoryFormPayload::try_from(form)?;
        let image = stage_upload(image, &media.store)?;
        update_category_service(category_id, payload, image, repo.get_ref(), &media)
    })
    .await;
    respond(result, StatusCode::OK, "update category")
}

#[delete("/api/categories/{category_id}")]
pub async fn delete_category(
    _auth: Authorized,
    category_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    media: web::Data<MediaPipeline>,
) -> impl Responder {
    let category_id = category_id.into_inner();
    let result: Result<ServiceResult<()>, _> =
        web::block(move || delete_category_service(category_id, repo.get_ref(), &media)).await;

    match result {
        Ok(Ok(())) => HttpResponse::Ok().json(MessageBody::new("Category deleted successfully")),
        other => respond(other, StatusCode::OK, "delete category"),
    }
}
