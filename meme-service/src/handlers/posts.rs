/// Post handlers - HTTP endpoints for meme post operations
use crate::error::Result;
use crate::models::{Post, PostDraft, PostUpdate};
use crate::services::PostService;
use actix_web::{web, HttpResponse};
use serde::Serialize;
use std::sync::Arc;

/// Shared handler state.
pub struct AppState {
    pub service: Arc<PostService>,
}

/// Wire shape for a post. The posting date is stored but not exposed.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub caption: String,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            name: post.name,
            url: post.url,
            caption: post.caption,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub id: i64,
}

/// List the 100 most recent posts, newest first
pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.service.list_recent_posts().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(PostResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// Get a post by id
pub async fn get_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let post = state.service.get_post(*post_id).await?;

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

/// Create a new post
pub async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<PostDraft>,
) -> Result<HttpResponse> {
    let id = state.service.create_post(req.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreatePostResponse { id }))
}

/// Partially update a post's url and caption
pub async fn update_post(
    state: web::Data<AppState>,
    post_id: web::Path<i64>,
    req: web::Json<PostUpdate>,
) -> Result<HttpResponse> {
    state.service.update_post(*post_id, req.into_inner()).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Configure routes for meme service
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/memes")
            .service(
                web::resource("")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/{post_id}")
                    .route(web::get().to(get_post))
                    .route(web::patch().to(update_post)),
            ),
    );
}
