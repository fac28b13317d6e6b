//! Router-level tests over the HTTP surface.
//!
//! These drive the assembled axum router with in-memory storage and
//! assert on the wire-visible behavior: status codes, redirect
//! targets with their query markers, and cookie handling.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use eventhub::api::{self, AppState};
use eventhub::domain::{Event, EventDetails, Role, TicketType, User};
use eventhub::repository::memory::{
    InMemoryEventRepository, InMemoryRegistrationRepository, InMemorySessionRepository,
    InMemoryUserRepository,
};
use eventhub::repository::UserRepository;
use eventhub::service::{
    AdminService, AuthService, EventService, NoopImageStore, RegistrationService,
};

struct TestApp {
    router: Router,
    state: AppState,
    users: Arc<dyn UserRepository>,
}

fn test_app() -> TestApp {
    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let events = Arc::new(InMemoryEventRepository::new());
    let registrations = Arc::new(InMemoryRegistrationRepository::new());
    let sessions = Arc::new(InMemorySessionRepository::new());

    let state = AppState {
        auth: Arc::new(AuthService::new(users.clone(), sessions.clone())),
        events: Arc::new(EventService::new(
            events.clone(),
            registrations.clone(),
            Arc::new(NoopImageStore),
        )),
        registrations: Arc::new(RegistrationService::new(
            events.clone(),
            registrations.clone(),
        )),
        admin: Arc::new(AdminService::new(users.clone(), events, registrations)),
    };

    TestApp {
        router: api::router(state.clone()),
        state,
        users,
    }
}

/// Seed an approved event owned by a fresh organiser.
async fn seed_approved_event(app: &TestApp) -> Event {
    let mut organiser = User::new("Olive", "olive@example.com", "not-a-real-hash");
    organiser.role = Role::Organiser;
    app.users.insert(&organiser).await.unwrap();

    let event = app
        .state
        .events
        .create(
            &organiser,
            EventDetails {
                title: "Open Night".to_string(),
                description: "An evening of talks".to_string(),
                location: "Main Hall".to_string(),
                hosted_by: "The Committee".to_string(),
                start_date: Utc::now() + Duration::days(7),
                end_date: None,
                capacity: 10,
                ticket_type: TicketType::Free,
                price: 0.0,
                image: None,
            },
        )
        .await
        .unwrap();
    app.state.admin.approve_event(&event.id).await.unwrap();
    event
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

/// Log a fresh member in through the router, returning the session
/// cookie in `name=value` form.
async fn login_member(app: &TestApp, email: &str) -> String {
    app.state
        .auth
        .signup("Alex", email, "hunter2secret")
        .await
        .unwrap();

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/auth/login",
            &format!("email={email}&password=hunter2secret"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set the session cookie")
        .to_str()
        .unwrap();
    set_cookie
        .split(';')
        .next()
        .unwrap()
        .trim()
        .to_string()
}

#[tokio::test]
async fn guest_registration_redirects_with_success_then_already() {
    let app = test_app();
    let event = seed_approved_event(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            &format!("/events/{}/register", event.id),
            "name=Gia&email=gia%40example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/events/{}?success=1", event.slug)
    );

    // Same guest email again: no new row, distinct marker.
    let response = app
        .router
        .clone()
        .oneshot(form_post(
            &format!("/events/{}/register", event.id),
            "name=Gia&email=gia%40example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/events/{}?already=1", event.slug)
    );
}

#[tokio::test]
async fn member_repeat_registration_redirects_with_registered_marker() {
    let app = test_app();
    let event = seed_approved_event(&app).await;
    let cookie = login_member(&app, "alex@example.com").await;

    let register = || {
        let mut request = form_post(&format!("/events/{}/register", event.id), "");
        request
            .headers_mut()
            .insert(header::COOKIE, cookie.parse().unwrap());
        request
    };

    let response = app.router.clone().oneshot(register()).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/events/{}?success=1", event.slug)
    );

    let response = app.router.clone().oneshot(register()).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/events/{}?registered=1", event.slug)
    );
}

#[tokio::test]
async fn guest_registration_without_details_is_rejected() {
    let app = test_app();
    let event = seed_approved_event(&app).await;

    let response = app
        .router
        .clone()
        .oneshot(form_post(&format!("/events/{}/register", event.id), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_against_missing_event_is_not_found() {
    let app = test_app();

    let response = app
        .router
        .clone()
        .oneshot(form_post(
            "/events/0000000000000/register",
            "name=Gia&email=gia%40example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn logout_expires_the_cookie_on_the_login_path() {
    let app = test_app();
    let cookie = login_member(&app, "alex@example.com").await;

    let mut request = Request::builder()
        .method("GET")
        .uri("/auth/logout")
        .body(Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    // The removal cookie must match the Path=/ set at login or the
    // browser keeps the stale copy.
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("logout should clear the session cookie")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("session="));
    assert!(set_cookie.contains("Path=/"));
}
