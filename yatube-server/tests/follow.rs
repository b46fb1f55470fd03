mod common;

use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::test;
use serde_json::Value;

use common::{bearer, context};
use yatube_server::create_app;

fn feed_texts(body: &Value) -> Vec<String> {
    body["page_obj"]["object_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["text"].as_str().unwrap().to_string())
        .collect()
}

#[actix_web::test]
async fn follow_and_unfollow_toggle_the_edge() {
    let ctx = context();
    let (author, _) = ctx.user("author").await;
    let (reader, token) = ctx.user("reader").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/author/follow/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/profile/author/");
    assert!(ctx.state.follows.is_following(reader.id, author.id).await.unwrap());

    // a second follow is a no-op
    test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/author/follow/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/author/unfollow/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(!ctx.state.follows.is_following(reader.id, author.id).await.unwrap());
}

#[actix_web::test]
async fn self_follow_is_ignored() {
    let ctx = context();
    let (author, token) = ctx.user("author").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/author/follow/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(LOCATION).unwrap(), "/profile/author/");
    assert!(!ctx.state.follows.is_following(author.id, author.id).await.unwrap());
}

#[actix_web::test]
async fn following_unknown_user_is_not_found() {
    let ctx = context();
    let (_, token) = ctx.user("reader").await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/ghost/follow/")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn feed_shows_only_followed_authors() {
    let ctx = context();
    let (author, _) = ctx.user("author").await;
    let (_, follower_token) = ctx.user("follower").await;
    let (_, stranger_token) = ctx.user("stranger").await;
    ctx.post(&author, "Fresh post", None).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/author/follow/")
            .insert_header(bearer(&follower_token))
            .to_request(),
    )
    .await;

    let follower_feed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(bearer(&follower_token))
            .to_request(),
    )
    .await;
    assert_eq!(feed_texts(&follower_feed), vec!["Fresh post".to_string()]);

    let stranger_feed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(bearer(&stranger_token))
            .to_request(),
    )
    .await;
    assert!(feed_texts(&stranger_feed).is_empty());

    test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/profile/author/unfollow/")
            .insert_header(bearer(&follower_token))
            .to_request(),
    )
    .await;
    let after: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/follow/")
            .insert_header(bearer(&follower_token))
            .to_request(),
    )
    .await;
    assert!(feed_texts(&after).is_empty());
}
