mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::{Value, json};

use blog_core::domain::{Post, PostFields, PostQuery, User};
use common::{TestContext, bearer};

async fn seed_post(ctx: &TestContext, author: &User, title: &str) -> Post {
    ctx.state
        .posts
        .create(
            author.as_author(),
            PostFields {
                title: title.to_string(),
                content: format!("{title} body"),
            },
        )
        .await
        .expect("seed post")
}

#[actix_web::test]
async fn author_lifecycle() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let (_, bob) = ctx.user("bob").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    // Create
    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "First", "content": "Hello"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["title"], "First");
    assert_eq!(created["author"], "alice");
    let id = created["id"].as_i64().unwrap();

    // Anyone can read
    let req = test::TestRequest::get().uri("/posts").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Someone else cannot edit
    let req = test::TestRequest::put()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&bob))
        .set_json(json!({"title": "Mine now", "content": "Hello"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The author can
    let req = test::TestRequest::put()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "First, edited", "content": "Hello again"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["title"], "First, edited");
    assert_eq!(updated["author"], "alice");
    assert_eq!(updated["created_at"], created["created_at"]);

    // Anonymous delete is rejected
    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Author delete
    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{id}"))
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_requires_authentication() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    // Checked before the body is even parsed.
    let req = test::TestRequest::post()
        .uri("/posts")
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.state.posts.list(&PostQuery::all()).await.unwrap().len(), 0);
}

#[actix_web::test]
async fn invalid_token_is_rejected_even_on_public_reads() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get()
        .uri("/posts")
        .insert_header(bearer("garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn foreign_auth_scheme_is_anonymous() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;
    let basic = ("Authorization", "Basic YWxpY2U6cHc=");

    let req = test::TestRequest::get()
        .uri("/homepage")
        .insert_header(basic)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/posts")
        .insert_header(basic)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // Still anonymous, so writes are refused.
    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(basic)
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_validates_fields() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"content": "No title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"title": ["This field is required."]}));

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "x".repeat(256), "content": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body.get("title").is_some());
    assert_eq!(body["content"], json!(["This field may not be blank."]));

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&alice))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(ctx.state.posts.list(&PostQuery::all()).await.unwrap().is_empty());
}

#[actix_web::test]
async fn create_ignores_supplied_author() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let (bob, _) = ctx.user("bob").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "T", "content": "C", "author": bob.id}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(created["author"], "alice");
}

#[actix_web::test]
async fn update_checks_permission_before_payload() {
    let ctx = TestContext::new();
    let (alice_user, alice) = ctx.user("alice").await;
    let (_, bob) = ctx.user("bob").await;
    let post = seed_post(&ctx, &alice_user, "Original").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(bearer(&bob))
        .set_json(json!({"title": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "Only a title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["content"], json!(["This field is required."]));

    let stored = ctx.state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Original");
}

#[actix_web::test]
async fn non_author_cannot_delete() {
    let ctx = TestContext::new();
    let (alice_user, _) = ctx.user("alice").await;
    let (_, bob) = ctx.user("bob").await;
    let post = seed_post(&ctx, &alice_user, "Keep me").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let stored = ctx.state.posts.find_by_id(post.id).await.unwrap();
    assert_eq!(stored.map(|p| p.title), Some("Keep me".to_string()));
}

#[actix_web::test]
async fn repeated_reads_are_identical() {
    let ctx = TestContext::new();
    let (alice_user, _) = ctx.user("alice").await;
    let post = seed_post(&ctx, &alice_user, "Stable").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let uri = format!("/posts/{}", post.id);
    let first = test::call_and_read_body(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    let second = test::call_and_read_body(&app, test::TestRequest::get().uri(&uri).to_request()).await;

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[actix_web::test]
async fn missing_posts_are_not_found() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/posts/999").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/posts/abc").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/posts/999")
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri("/posts/999")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(test::read_body(resp).await.is_empty());
}

#[actix_web::test]
async fn deleted_ids_are_not_reused() {
    let ctx = TestContext::new();
    let (alice_user, alice) = ctx.user("alice").await;
    let first = seed_post(&ctx, &alice_user, "One").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", first.id))
        .insert_header(bearer(&alice))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(bearer(&alice))
        .set_json(json!({"title": "Two", "content": "C"}))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    assert!(created["id"].as_i64().unwrap() > first.id);
}

#[actix_web::test]
async fn listing_is_unpaginated_by_default() {
    let ctx = TestContext::new();
    let (alice, _) = ctx.user("alice").await;
    for title in ["A", "B", "C", "D"] {
        seed_post(&ctx, &alice, title).await;
    }
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["A", "B", "C", "D"]);
}

#[actix_web::test]
async fn listing_pages_on_request() {
    let ctx = TestContext::new();
    let (alice, _) = ctx.user("alice").await;
    for title in ["A", "B", "C", "D"] {
        seed_post(&ctx, &alice, title).await;
    }
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/posts?page=1").to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["count"], 4);
    assert_eq!(first["results"].as_array().unwrap().len(), 3);
    assert!(first["next"].as_str().unwrap().ends_with("/posts?page=2"));
    assert!(first["previous"].is_null());

    let req = test::TestRequest::get().uri("/posts?page=last").to_request();
    let last: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(last["results"][0]["title"], "D");
    assert!(last["next"].is_null());
    assert!(last["previous"].as_str().unwrap().ends_with("/posts?page=1"));

    let req = test::TestRequest::get()
        .uri("/posts?page=2&page_size=2")
        .to_request();
    let sized: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(sized["results"][0]["title"], "C");
    assert!(sized["previous"].as_str().unwrap().ends_with("/posts?page=1&page_size=2"));

    for uri in ["/posts?page=3", "/posts?page=0", "/posts?page=abc"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Invalid page.");
    }
}

#[actix_web::test]
async fn list_post_filters_by_username() {
    let ctx = TestContext::new();
    let (alice_user, alice) = ctx.user("alice").await;
    let (bob_user, _) = ctx.user("bob").await;
    seed_post(&ctx, &alice_user, "A1").await;
    seed_post(&ctx, &bob_user, "B1").await;
    seed_post(&ctx, &alice_user, "A2").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get()
        .uri("/list_post/?username=alice")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/list_post/?username=alice")
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let posts = body.as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p["author"] == "alice"));

    let req = test::TestRequest::get()
        .uri("/list_post/")
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/list_post/?username=nobody")
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn current_user_links_own_posts() {
    let ctx = TestContext::new();
    let (alice_user, alice) = ctx.user("alice").await;
    let (bob_user, _) = ctx.user("bob").await;
    let mine = seed_post(&ctx, &alice_user, "Mine").await;
    seed_post(&ctx, &bob_user, "Theirs").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/current_user/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/current_user/")
        .insert_header(bearer(&alice))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], alice_user.id);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["email"], "alice@example.com");
    let links = body["posts"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    let link = links[0].as_str().unwrap();
    assert!(link.starts_with("http"));
    assert!(link.ends_with(&format!("/posts/{}", mine.id)));
}

#[actix_web::test]
async fn homepage_greets_everyone() {
    let ctx = TestContext::new();
    let (_, alice) = ctx.user("alice").await;
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/homepage").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"message": "Hello, World!"}));

    let req = test::TestRequest::get()
        .uri("/homepage")
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn health_reports_storage() {
    let ctx = TestContext::new();
    let app = test::init_service(App::new().configure(ctx.configure())).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
