
use reqwest::StatusCode;
use serde_json::{json, Value};
use test_utils::{form_with, valid_form, TestApp, ADMIN_TOKEN};

async fn app_with_two_submissions() -> TestApp {
    let app = TestApp::spawn().await;

    app.submit(&valid_form(), "203.0.113.60", None).await;
    app.advance(10);
    app.submit(&form_with("name", "Grace Hopper"), "203.0.113.61", None).await;

    app
}

#[tokio::test]
async fn reviewer_api_requires_the_admin_token() {
    let app = app_with_two_submissions().await;
    let url = format!("{}/api/admin/submissions", app.address);

    let response = app.client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.client.get(&url).bearer_auth("not-the-token").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn submissions_are_listed_newest_first() {
    let app = app_with_two_submissions().await;

    let response = app.admin_get("").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 20);
    assert_eq!(body["submissions"][0]["name"], "Grace Hopper");
    assert_eq!(body["submissions"][1]["name"], "Ada Lovelace");
}

#[tokio::test]
async fn listing_supports_search_and_paging() {
    let app = app_with_two_submissions().await;

    let body: Value = app.admin_get("?search=grace").await.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"][0]["name"], "Grace Hopper");

    let body: Value = app.admin_get("?page=2&per_page=1").await.json().await.unwrap();
    assert_eq!(body["total"], 2);
    assert_eq!(body["submissions"].as_array().unwrap().len(), 1);
    assert_eq!(body["submissions"][0]["name"], "Ada Lovelace");
}

#[tokio::test]
async fn status_flags_can_be_updated_and_filtered() {
    let app = app_with_two_submissions().await;
    let id = app.submissions.snapshot()[0].id;

    let response = app.client
        .patch(format!("{}/api/admin/submissions/{}", app.address, id))
        .bearer_auth(ADMIN_TOKEN)
        .json(&json!({ "read": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["read"], true);
    assert_eq!(body["replied"], false);

    let body: Value = app.admin_get("?read=true").await.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["submissions"][0]["id"], id.to_string());

    let body: Value = app.admin_get("?read=false").await.json().await.unwrap();
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn single_submission_can_be_fetched_and_deleted() {
    let app = app_with_two_submissions().await;
    let id = app.submissions.snapshot()[0].id;

    let response = app.admin_get(&format!("/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["email"], "ada@example.com");

    let response = app.client
        .delete(format!("{}/api/admin/submissions/{}", app.address, id))
        .bearer_auth(ADMIN_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.admin_get(&format!("/{}", id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.submissions.len(), 1);
}

#[tokio::test]
async fn malformed_ids_are_not_found() {
    let app = TestApp::spawn().await;

    let response = app.admin_get("/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
