mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test;
use serde_json::Value;

use common::{SMALL_GIF, bearer, context, multipart_body, multipart_header};
use yatube_server::create_app;
use yatube_server::domain::forms::{COMMENT_TEXT_REQUIRED, INVALID_IMAGE, POST_TEXT_REQUIRED};
use yatube_server::domain::post::PostFilter;

#[actix_web::test]
async fn create_post_saves_text_group_and_image() {
    let ctx = context();
    let (author, token) = ctx.user("Nameless").await;
    let group = ctx.group("Test group", "t-group").await;
    ctx.post(&author, "Existing", None).await;
    let before = ctx.post_count().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let group_id = group.id.to_string();
    let body = multipart_body(
        &[("text", "Test text"), ("group", &group_id)],
        Some(("image", "small.gif", "image/gif", SMALL_GIF)),
    );
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(bearer(&token))
            .insert_header(multipart_header())
            .set_payload(body)
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/profile/Nameless/");
    assert_eq!(ctx.post_count().await, before + 1);

    let newest = ctx
        .state
        .store
        .posts
        .list(PostFilter::All, 1, 0)
        .await
        .unwrap()
        .remove(0);
    assert_eq!(newest.text, "Test text");
    assert_eq!(newest.author_id, author.id);
    assert_eq!(newest.group_id, Some(group.id));

    let image = newest.image.expect("image stored");
    assert!(image.starts_with("posts/") && image.ends_with(".gif"));
    assert_eq!(std::fs::read(ctx.media.path().join(&image)).unwrap(), SMALL_GIF);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/media/{image}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/gif");
    assert_eq!(test::read_body(resp).await.as_ref(), SMALL_GIF);
}

#[actix_web::test]
async fn blank_post_is_rejected_with_field_errors() {
    let ctx = context();
    let (_, token) = ctx.user("Nameless").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/create/")
            .insert_header(bearer(&token))
            .insert_header(multipart_header())
            .set_payload(multipart_body(
                &[("text", "   ")],
                Some(("image", "notes.txt", "text/plain", b"hello")),
            ))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let context: Value = test::read_body_json(resp).await;
    assert_eq!(context["form"]["errors"]["text"][0], POST_TEXT_REQUIRED);
    assert_eq!(context["form"]["errors"]["image"][0], INVALID_IMAGE);
    assert_eq!(context["is_edit"], false);
    assert_eq!(ctx.post_count().await, 0);
}

#[actix_web::test]
async fn author_can_edit_post() {
    let ctx = context();
    let (author, token) = ctx.user("Nameless").await;
    let post = ctx.post(&author, "Old text", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(bearer(&token))
            .insert_header(multipart_header())
            .set_payload(multipart_body(&[("text", "New text")], None))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap().to_str().unwrap(),
        format!("/posts/{}/", post.id)
    );
    let stored = ctx.state.posts.get_post(post.id).await.unwrap();
    assert_eq!(stored.text, "New text");
}

#[actix_web::test]
async fn non_author_edit_changes_nothing() {
    let ctx = context();
    let (author, _) = ctx.user("Nameless").await;
    let (_, intruder_token) = ctx.user("intruder").await;
    let post = ctx.post(&author, "Old text", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(bearer(&intruder_token))
            .insert_header(multipart_header())
            .set_payload(multipart_body(&[("text", "Hijacked")], None))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap().to_str().unwrap(),
        format!("/posts/{}/", post.id)
    );
    let stored = ctx.state.posts.get_post(post.id).await.unwrap();
    assert_eq!(stored.text, "Old text");
}

#[actix_web::test]
async fn invalid_edit_rerenders_form() {
    let ctx = context();
    let (author, token) = ctx.user("Nameless").await;
    let post = ctx.post(&author, "Old text", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit/", post.id))
            .insert_header(bearer(&token))
            .insert_header(multipart_header())
            .set_payload(multipart_body(&[("text", "")], None))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let context: Value = test::read_body_json(resp).await;
    assert_eq!(context["is_edit"], true);
    assert_eq!(context["post_id"], post.id.to_string());
    assert_eq!(ctx.state.posts.get_post(post.id).await.unwrap().text, "Old text");
}

#[actix_web::test]
async fn guest_comment_is_not_added() {
    let ctx = context();
    let (author, _) = ctx.user("Nameless").await;
    let post = ctx.post(&author, "Post", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .set_form([("text", "Nice post")])
            .to_request(),
    )
    .await;

    assert_eq!(ctx.comment_count(post.id).await, 0);
}

#[actix_web::test]
async fn member_comment_is_added() {
    let ctx = context();
    let (author, _) = ctx.user("Nameless").await;
    let (reader, token) = ctx.user("reader").await;
    let post = ctx.post(&author, "Post", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .insert_header(bearer(&token))
            .set_form([("text", "Nice post")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(LOCATION).unwrap().to_str().unwrap(),
        format!("/posts/{}/", post.id)
    );
    let comments = ctx.state.posts.comments(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author, reader.username);
    assert_eq!(comments[0].text, "Nice post");
}

#[actix_web::test]
async fn blank_comment_returns_bound_form() {
    let ctx = context();
    let (author, token) = ctx.user("Nameless").await;
    let post = ctx.post(&author, "Post", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", post.id))
            .insert_header(bearer(&token))
            .set_form([("text", "  ")])
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let context: Value = test::read_body_json(resp).await;
    assert_eq!(context["form"]["errors"]["text"][0], COMMENT_TEXT_REQUIRED);
    assert_eq!(context["post"]["id"], post.id.to_string());
    assert_eq!(ctx.comment_count(post.id).await, 0);
}

#[actix_web::test]
async fn comment_on_missing_post_is_not_found() {
    let ctx = context();
    let (_, token) = ctx.user("Nameless").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/comment/", uuid::Uuid::new_v4()))
            .insert_header(bearer(&token))
            .set_form([("text", "hello")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
