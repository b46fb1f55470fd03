use crate::application::auth_service::AuthService;
use crate::application::follow_service::FollowService;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::forms::{CommentForm, FormErrors, PostForm};
use crate::domain::post::PostFilter;
use crate::infrastructure::cache::PageCache;
use crate::presentation::dto::{
    BoundForm, GroupContext, IndexContext, PageQuery, PostDetailContext, PostFormContext,
    PostUpload, ProfileContext,
};
use crate::presentation::utils::{
    AuthenticatedUser, is_owner, post_url, profile_url, redirect, request_id,
};
use actix_multipart::form::MultipartForm;
use actix_web::http::header::ContentType;
use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;
use uuid::Uuid;

pub const INDEX_TITLE: &str = "Latest updates on the site";

fn json_page(body: Bytes) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(body)
}

#[get("/")]
pub async fn index(
    req: HttpRequest,
    posts: web::Data<PostService>,
    cache: web::Data<PageCache>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let key = req.uri().to_string();
    if let Some(body) = cache.get(&key).await {
        return Ok(json_page(body));
    }

    let page_obj = posts
        .feed_page(PostFilter::All, query.page.as_deref())
        .await?;
    let context = IndexContext {
        title: INDEX_TITLE.to_string(),
        page_obj,
    };
    let body = serde_json::to_vec(&context).map_err(|e| DomainError::Internal(e.to_string()))?;
    let body = Bytes::from(body);
    cache.insert(key, body.clone()).await;

    Ok(json_page(body))
}

#[get("/group/{slug}/")]
pub async fn group_posts(
    posts: web::Data<PostService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let group = posts.group_by_slug(&path.into_inner()).await?;
    let page_obj = posts
        .feed_page(PostFilter::Group(group.id), query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(GroupContext {
        title: format!("Posts of the {} community", group.title),
        group,
        page_obj,
    }))
}

#[get("/profile/{username}/")]
pub async fn profile(
    viewer: Option<AuthenticatedUser>,
    auth: web::Data<AuthService>,
    posts: web::Data<PostService>,
    follows: web::Data<FollowService>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, DomainError> {
    let author = auth.get_by_username(&path.into_inner()).await?;
    let page_obj = posts
        .feed_page(PostFilter::Author(author.id), query.page.as_deref())
        .await?;
    let following = match &viewer {
        Some(viewer) => follows.is_following(viewer.id, author.id).await?,
        None => false,
    };
    let author_posts_count = page_obj.count;

    Ok(HttpResponse::Ok().json(ProfileContext {
        title: format!("All posts of user {}", author.username),
        author,
        page_obj,
        author_posts_count,
        following,
    }))
}

async fn detail_context(
    posts: &PostService,
    post_id: Uuid,
    form: BoundForm<CommentForm>,
) -> Result<PostDetailContext, DomainError> {
    let post = posts.get_post_details(post_id).await?;
    let author_posts_count = posts.author_post_count(post.author_id).await?;
    let comments = posts.comments(post_id).await?;
    Ok(PostDetailContext {
        post,
        author_posts_count,
        comments,
        form,
    })
}

#[get("/posts/{id}/")]
pub async fn post_detail(
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let context = detail_context(
        &posts,
        path.into_inner(),
        BoundForm::blank(CommentForm::default()),
    )
    .await?;
    Ok(HttpResponse::Ok().json(context))
}

async fn post_form_response(
    posts: &PostService,
    form: BoundForm<PostForm>,
    post_id: Option<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let status = if form.errors.is_empty() {
        actix_web::http::StatusCode::OK
    } else {
        actix_web::http::StatusCode::BAD_REQUEST
    };
    let group_choices = posts.groups().await?;
    Ok(HttpResponse::build(status).json(PostFormContext {
        form,
        group_choices,
        is_edit: post_id.is_some(),
        post_id,
    }))
}

#[get("/create/")]
pub async fn post_create_form(
    _user: AuthenticatedUser,
    posts: web::Data<PostService>,
) -> Result<HttpResponse, DomainError> {
    post_form_response(&posts, BoundForm::blank(PostForm::default()), None).await
}

#[post("/create/")]
pub async fn post_create(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    MultipartForm(upload): MultipartForm<PostUpload>,
) -> Result<HttpResponse, DomainError> {
    let (form, _image_file) = upload.into_form();
    match posts.create_post(user.id, &form).await {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %post.id,
                "post created"
            );
            Ok(redirect(profile_url(&user.username)))
        }
        Err(DomainError::Validation(errors)) => {
            post_form_response(&posts, bound(form, errors), None).await
        }
        Err(e) => Err(e),
    }
}

fn bound(data: PostForm, errors: FormErrors) -> BoundForm<PostForm> {
    BoundForm { data, errors }
}

#[get("/posts/{id}/edit/")]
pub async fn post_edit_form(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.get_post(post_id).await?;
    if !is_owner(&post.author_id, &user.id) {
        return Ok(redirect(post_url(&post_id)));
    }

    let form = PostForm {
        text: post.text,
        group: post.group_id.map(|id| id.to_string()),
        image: None,
    };
    post_form_response(&posts, BoundForm::blank(form), Some(post_id)).await
}

#[post("/posts/{id}/edit/")]
pub async fn post_edit(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    MultipartForm(upload): MultipartForm<PostUpload>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let post = posts.get_post(post_id).await?;
    if !is_owner(&post.author_id, &user.id) {
        info!(
            request_id = %request_id(&req),
            username = %user.username,
            post_id = %post_id,
            "edit by non-author ignored"
        );
        return Ok(redirect(post_url(&post_id)));
    }

    let (form, _image_file) = upload.into_form();
    match posts.update_post(post_id, &form).await {
        Ok(_) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                post_id = %post_id,
                "post updated"
            );
            Ok(redirect(post_url(&post_id)))
        }
        Err(DomainError::Validation(errors)) => {
            post_form_response(&posts, bound(form, errors), Some(post_id)).await
        }
        Err(e) => Err(e),
    }
}

#[post("/posts/{id}/comment/")]
pub async fn add_comment(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let form = form.into_inner();
    match posts.add_comment(post_id, user.id, &form).await {
        Ok(comment) => {
            info!(
                request_id = %request_id(&req),
                username = %user.username,
                comment_id = %comment.id,
                "comment added"
            );
            Ok(redirect(post_url(&post_id)))
        }
        Err(DomainError::Validation(errors)) => {
            let context = detail_context(&posts, post_id, BoundForm { data: form, errors }).await?;
            Ok(HttpResponse::BadRequest().json(context))
        }
        Err(e) => Err(e),
    }
}
