mod helper;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use helper::{outer_next, request, Respond};
use http::Method;
use junction::{Next, Route, Router};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn bound_methods_reach_their_handlers() {
    let mut router = Router::new();
    router
        .route("/foo")
        .unwrap()
        .get(Respond("get"))
        .unwrap()
        .post(Respond("post"))
        .unwrap()
        .put(Respond("put"))
        .unwrap();

    for (method, body) in [
        (Method::GET, "get"),
        (Method::POST, "post"),
        (Method::PUT, "put"),
    ] {
        let out = router
            .dispatch(request(method, "/foo"), Next::end())
            .await
            .unwrap();
        assert_eq!(out.body.as_deref(), Some(body));
    }
}

#[tokio::test]
async fn unbound_method_falls_through() {
    let mut router = Router::new();
    router
        .route("/foo")
        .unwrap()
        .get(Respond("get"))
        .unwrap()
        .post(Respond("post"))
        .unwrap()
        .put(Respond("put"))
        .unwrap();

    let reached = Arc::new(AtomicBool::new(false));
    let out = router
        .dispatch(request(Method::DELETE, "/foo"), outer_next(reached.clone()))
        .await
        .unwrap();
    assert_eq!(reached.load(Ordering::SeqCst), true);
    assert_eq!(out.body, None);
}

#[tokio::test]
async fn del_is_an_alias_of_delete() {
    let mut router = Router::new();
    router.del("/item", Respond("deleted")).unwrap();
    let out = router
        .dispatch(request(Method::DELETE, "/item"), Next::end())
        .await
        .unwrap();
    assert_eq!(out.body.as_deref(), Some("deleted"));
}

#[tokio::test]
async fn all_matches_every_method() {
    let mut router = Router::new();
    router.all("/any", Respond("any")).unwrap();
    for method in [Method::GET, Method::POST, Method::PATCH] {
        let out = router
            .dispatch(request(method, "/any"), Next::end())
            .await
            .unwrap();
        assert_eq!(out.body.as_deref(), Some("any"));
    }
}

#[tokio::test]
async fn routes_match_the_whole_remaining_path() {
    let mut router = Router::new();
    router.get("/foo", Respond("foo")).unwrap();
    let reached = Arc::new(AtomicBool::new(false));
    let out = router
        .dispatch(request(Method::GET, "/foo/bar"), outer_next(reached.clone()))
        .await
        .unwrap();
    assert_eq!(reached.load(Ordering::SeqCst), true);
    assert_eq!(out.body, None);
}

#[tokio::test]
async fn empty_registration_is_rejected_without_mutating_the_stack() {
    let mut router = Router::new();
    let before = router.stack().len();
    assert_eq!(router.middleware(()).is_err(), true);
    assert_eq!(router.mount("/x", ()).is_err(), true);
    assert_eq!(router.stack().len(), before);
}

#[tokio::test]
async fn malformed_mount_patterns_are_rejected() {
    let mut router = Router::new();
    let before = router.stack().len();
    assert_eq!(router.mount("nope", Respond("x")).is_err(), true);
    assert_eq!(router.get("/x/:", Respond("x")).is_err(), true);
    assert_eq!(router.stack().len(), before);
}

#[tokio::test]
async fn standalone_route_dispatches_by_method() {
    let mut route = Route::new("/foo");
    route.get(Respond("method")).unwrap();
    assert_eq!(route.handles_method(&Method::GET), true);
    assert_eq!(route.handles_method(&Method::DELETE), false);

    let reached = Arc::new(AtomicBool::new(false));
    let out = route
        .dispatch(request(Method::DELETE, "/foo"), outer_next(reached.clone()))
        .await
        .unwrap();
    assert_eq!(reached.load(Ordering::SeqCst), true);
    assert_eq!(out.body, None);

    let out = route
        .dispatch(request(Method::GET, "/foo"), Next::end())
        .await
        .unwrap();
    assert_eq!(out.body.as_deref(), Some("method"));
}
