use pretty_assertions::assert_eq;
use wayfinder_router::prelude::*;

fn without_params() -> RouteRegistry<&'static str> {
    build(&[
        Route::new("/", "/"),
        Route::new("/page1", "/page1"),
        Route::new("/page1/page1-1", "/page1/page1-1"),
        Route::new("/page1/page1-2", "/page1/page1-2"),
        Route::new("/page2/page2-1", "/page2/page2-1"),
    ])
}

fn with_params() -> RouteRegistry<&'static str> {
    build(&[
        Route::new("/", "/"),
        Route::new("/page1", "/page1"),
        Route::new("/page1/page1-1", "/page1/page1-1"),
        Route::new("/page2/:pages2-1", "/page2/:pages2-1"),
        Route::new("/:pages1/page1-1", "/:pages1/page1-1"),
        Route::new("/:pages1/page1-2", "/:pages1/page1-2"),
        Route::new("/:pages2/page2-1", "/:pages2/page2-1"),
    ])
}

fn named() -> RouteRegistry<&'static str> {
    build(&[
        Route::new("/", "/"),
        Route::new("/page1", "/page1"),
        Route::new("/page2", "/page2").with_name("page2"),
        Route::new("/page3", "/page3").with_name("page3"),
        Route::named("page4", "page4"),
        Route::named("page5", "page5"),
    ])
}

fn with_segments() -> RouteRegistry<&'static str> {
    build(&[
        Route::new("/", "/"),
        Route::new("/page1", "/page1/**").as_segment(),
        Route::new("/page1/page1-1", "/page1/page1-1"),
        Route::new("/:pages", "/:pages/**").as_segment(),
        Route::new("/:pages/pages-1", "/:pages/pages-1"),
    ])
}

fn build(routes: &[Route<&'static str>]) -> RouteRegistry<&'static str> {
    let mut registry = RouteRegistry::new();
    for route in routes {
        registry.add(route.clone()).unwrap();
    }
    registry
}

fn body(registry: &RouteRegistry<&'static str>, key: impl Into<RouteKey>) -> Option<&'static str> {
    registry.get(key).map(|resolved| *resolved.body())
}

fn param(resolved: &ResolvedRoute<'_, &'static str>, name: &str) -> Option<Vec<String>> {
    resolved.params.get(name).map(|value| value.values().to_vec())
}

#[test]
fn get_by_path() {
    let registry = without_params();
    for path in ["/", "/page1", "/page1/page1-1", "/page1/page1-2", "/page2/page2-1"] {
        let resolved = registry.get(path).unwrap();
        assert_eq!(resolved.path(), Some(path));
        assert_eq!(resolved.search, Search::Path);
    }
    assert!(registry.get("/page2").is_none());
}

#[test]
fn get_by_name() {
    let registry = named();
    for name in ["page2", "page3", "page4", "page5"] {
        let resolved = registry.get(RouteKey::name(name)).unwrap();
        assert_eq!(resolved.name(), Some(name));
        assert_eq!(resolved.search, Search::Name);
    }
    assert!(registry.get(RouteKey::name("page6")).is_none());
}

#[test]
fn parameters_match_when_literals_dead_end() {
    let registry = with_params();

    assert_eq!(body(&registry, "/page1/page1-1"), Some("/page1/page1-1"));

    let resolved = registry.get("/page1/page1-2").unwrap();
    assert_eq!(*resolved.body(), "/:pages1/page1-2");
    assert_eq!(resolved.params.get("pages1"), Some(&ParamValue::from("page1")));

    let resolved = registry.get("/page2/page2-1").unwrap();
    assert_eq!(*resolved.body(), "/page2/:pages2-1");
    assert_eq!(resolved.params.get("pages2-1"), Some(&ParamValue::from("page2-1")));

    let resolved = registry.get("/page3/page2-1").unwrap();
    assert_eq!(*resolved.body(), "/:pages2/page2-1");
    assert_eq!(resolved.params.get("pages2"), Some(&ParamValue::from("page3")));

    assert!(registry.get("/page3/page2-2").is_none());
}

#[test]
fn recurring_parameters_become_lists() {
    let registry = build(&[Route::new("/:pages/:pages/:pages", "")]);
    let resolved = registry.get("/page1/page1-1/page1-1-1").unwrap();
    assert_eq!(
        resolved.params.get("pages"),
        Some(&ParamValue::from(vec!["page1", "page1-1", "page1-1-1"]))
    );

    let registry = build(&[Route::new("/:a", "")]);
    assert_eq!(
        registry.get("/x").unwrap().params.get("a"),
        Some(&ParamValue::One("x".to_string()))
    );
}

#[test]
fn segment_routes_match_prefixes() {
    let registry = with_segments();

    let resolved = registry.get("/page1/page1-1").unwrap();
    assert_eq!(*resolved.body(), "/page1/page1-1");
    assert_eq!(resolved.rest, None);

    let resolved = registry.get("/page1/page1-2").unwrap();
    assert_eq!(*resolved.body(), "/page1/**");
    assert_eq!(resolved.rest.as_deref(), Some("page1-2"));

    for path in ["/page1", "/page1/"] {
        let resolved = registry.get(path).unwrap();
        assert_eq!(*resolved.body(), "/page1/**");
        assert_eq!(resolved.rest.as_deref(), Some(""));
    }

    let resolved = registry.get("/page2/pages-1").unwrap();
    assert_eq!(*resolved.body(), "/:pages/pages-1");
    assert_eq!(param(&resolved, "pages"), Some(vec!["page2".to_string()]));

    let resolved = registry.get("/page2/pages-2").unwrap();
    assert_eq!(*resolved.body(), "/:pages/**");
    assert_eq!(param(&resolved, "pages"), Some(vec!["page2".to_string()]));
    assert_eq!(resolved.rest.as_deref(), Some("pages-2"));

    for path in ["/page2", "/page2/"] {
        let resolved = registry.get(path).unwrap();
        assert_eq!(*resolved.body(), "/:pages/**");
        assert_eq!(param(&resolved, "pages"), Some(vec!["page2".to_string()]));
        assert_eq!(resolved.rest.as_deref(), Some(""));
    }
}

#[test]
fn segment_rest_keeps_deeper_tokens() {
    let registry = build(&[Route::new("/app", "app").as_segment()]);
    let resolved = registry.get("/app/a/b/c").unwrap();
    assert_eq!(resolved.rest.as_deref(), Some("a/b/c"));
}

#[test]
fn exhausted_input_falls_back_to_pending_candidates() {
    // `/a/b` exists only as an inner node, so `/a/b` ends on the segment route `/a`
    let registry = build(&[
        Route::new("/a", "a").as_segment(),
        Route::new("/a/b/c", "c"),
    ]);
    let resolved = registry.get("/a/b").unwrap();
    assert_eq!(*resolved.body(), "a");
    assert_eq!(resolved.rest.as_deref(), Some("b"));
}

#[test]
fn empty_tokens_are_ignored() {
    let mut registry = with_params();
    assert!(registry.get("/page3///page3-1").is_none());

    registry.add(Route::new("/page3///page3-1", "")).unwrap();
    assert_eq!(registry.get("/page3///page3-1").unwrap().path(), Some("/page3///page3-1"));
    assert_eq!(registry.get("/page3/page3-1").unwrap().path(), Some("/page3///page3-1"));
}

#[test]
fn add_overwrites_in_place() {
    let mut registry = with_params();
    let id = registry.find("/:pages1/page1-2").unwrap();

    let stored = registry
        .add(Route::new("/:pages1/page1-2", "overwritten"))
        .unwrap();
    assert_eq!(stored, id);
    assert_eq!(body(&registry, "/page1/page1-2"), Some("overwritten"));
    assert_eq!(registry.len(), 7);
}

#[test]
fn path_only_overwrite_detaches_the_name() {
    let mut registry = named();
    registry.add(Route::new("/page2", "again")).unwrap();

    assert_eq!(body(&registry, "/page2"), Some("again"));
    assert!(registry.get(RouteKey::name("page2")).is_none());
}

#[test]
fn name_only_overwrite_detaches_the_path() {
    let mut registry = named();
    registry.add(Route::named("page4", "again")).unwrap();
    assert_eq!(body(&registry, RouteKey::name("page4")), Some("again"));

    registry.add(Route::named("page2", "again")).unwrap();
    assert_eq!(body(&registry, RouteKey::name("page2")), Some("again"));
    assert!(registry.get("/page2").is_none());
}

#[test]
fn adding_a_path_to_a_named_route() {
    let mut registry = named();
    let id = registry.find(RouteKey::name("page4")).unwrap();

    let stored = registry
        .add(Route::new("/page4", "again").with_name("page4"))
        .unwrap();
    assert_eq!(stored, id);
    assert_eq!(body(&registry, RouteKey::name("page4")), Some("again"));
    assert_eq!(body(&registry, "/page4"), Some("again"));
}

#[test]
fn conflicting_path_and_name_evict_the_other_owner() {
    let mut registry = named();
    registry
        .add(Route::new("/page2", "merged").with_name("page3"))
        .unwrap();

    assert_eq!(body(&registry, "/page2"), Some("merged"));
    assert_eq!(body(&registry, RouteKey::name("page3")), Some("merged"));
    assert!(registry.get("/page3").is_none());
    assert!(registry.get(RouteKey::name("page2")).is_none());
    assert_eq!(registry.len(), 5);
}

#[test]
fn name_and_path_lookups_agree() {
    let mut registry = named();
    let by_name = registry.get(RouteKey::name("page3")).unwrap().id;
    let by_path = registry.get("/page3").unwrap().id;
    assert_eq!(by_name, by_path);

    registry
        .replace(Some(RouteKey::name("page3")), Some(RouteUpdate::Path("/moved".into())))
        .unwrap();
    let by_name = registry.get(RouteKey::name("page3")).unwrap();
    let by_path = registry.get("/moved").unwrap();
    assert_eq!(by_name.id, by_path.id);
    assert_eq!(by_name.path(), Some("/moved"));
    assert!(registry.get("/page3").is_none());
}

#[test]
fn remove_by_path() {
    let mut registry = without_params();
    let removed = registry.remove("/page1/page1-1").unwrap();
    assert_eq!(removed.path.as_deref(), Some("/page1/page1-1"));
    assert!(registry.get("/page1/page1-1").is_none());

    let err = registry.remove("/page1/page1-1").unwrap_err();
    assert!(matches!(err, RouteError::NotFound(key) if key == RouteKey::path("/page1/page1-1")));
}

#[test]
fn remove_parameter_route_uncovers_the_next_match() {
    let mut registry = with_params();
    assert_eq!(body(&registry, "/page2/page2-1"), Some("/page2/:pages2-1"));

    let removed = registry.remove("/page2/:pages2-1").unwrap();
    assert_eq!(removed.body, "/page2/:pages2-1");
    assert_eq!(body(&registry, "/page2/page2-1"), Some("/:pages2/page2-1"));
}

#[test]
fn remove_unindexes_both_keys() {
    let mut registry = named();
    registry.remove("/page2").unwrap();
    assert!(registry.get(RouteKey::name("page2")).is_none());

    registry.remove(RouteKey::name("page3")).unwrap();
    assert!(registry.get("/page3").is_none());

    let removed = registry.remove(RouteKey::name("page4")).unwrap();
    assert_eq!(removed.name.as_deref(), Some("page4"));
    assert!(matches!(
        registry.remove(RouteKey::name("page4")),
        Err(RouteError::NotFound(_))
    ));
}

#[test]
fn remove_with_inconsistent_key_removes_both_routes() {
    let mut registry = named();
    let removed = registry.remove(RouteKey::new("/page2", "page3")).unwrap();
    assert_eq!(removed.body, "/page3");

    assert!(registry.get("/page2").is_none());
    assert!(registry.get("/page3").is_none());
    assert!(registry.get(RouteKey::name("page2")).is_none());
    assert!(registry.get(RouteKey::name("page3")).is_none());
}

#[test]
fn replace_moves_a_route() {
    let mut registry = without_params();
    let id = registry.find("/page1/page1-1").unwrap();

    let replaced = registry
        .replace(Some("/page1/page1-1".into()), Some(RouteUpdate::Path("/path3".into())))
        .unwrap();
    assert!(matches!(replaced, Replaced::Stored(stored) if stored == id));
    assert_eq!(body(&registry, "/path3"), Some("/page1/page1-1"));
    assert!(registry.get("/page1/page1-1").is_none());
}

#[test]
fn replace_without_arguments() {
    let mut registry = without_params();
    assert!(matches!(registry.replace(None, None), Ok(Replaced::Nothing)));

    let err = registry
        .replace(None, Some(RouteUpdate::Path("/123456".into())))
        .unwrap_err();
    assert!(matches!(err, RouteError::InvalidReplacement { .. }));
}

#[test]
fn removed_handles_never_resolve_again() {
    let mut registry = without_params();
    let id = registry.find("/page1").unwrap();
    registry.remove("/page1").unwrap();
    assert!(registry.route(id).is_none());

    registry.add(Route::new("/page1", "back")).unwrap();
    assert!(registry.route(id).is_none());
}

#[test]
fn entry_edits_reindex() {
    let mut registry = without_params();
    let id = registry.find("/page1/page1-1").unwrap();

    let mut entry = registry.entry_mut(id).unwrap();
    entry.set_path("/page2");
    *entry.body_mut() = "edited";

    assert!(registry.get("/page1/page1-1").is_none());
    assert_eq!(body(&registry, "/page2"), Some("edited"));

    let mut entry = registry.entry_mut(id).unwrap();
    entry.set_name("second");
    assert_eq!(registry.get(RouteKey::name("second")).unwrap().id, id);
}

#[test]
fn entry_path_write_evicts_the_owner() {
    let mut registry = without_params();
    let id = registry.find("/page1/page1-1").unwrap();
    registry.entry_mut(id).unwrap().set_path("/page1/page1-2");

    assert_eq!(registry.len(), 4);
    assert_eq!(registry.get("/page1/page1-2").unwrap().id, id);
}

#[test]
fn clearing_the_last_key_destroys_the_route() {
    let mut registry = named();
    let id = registry.find("/page2").unwrap();

    let entry = registry.entry_mut(id).unwrap().clear_path().unwrap();
    assert_eq!(entry.name(), Some("page2"));
    assert!(entry.clear_name().is_none());

    assert!(registry.route(id).is_none());
    assert!(registry.get(RouteKey::name("page2")).is_none());
}

#[test]
fn iteration_visits_every_route() {
    let registry = named();
    let mut seen = Vec::new();
    registry.for_each(|_, route| seen.push(route.body));
    assert_eq!(seen, vec!["/", "/page1", "/page2", "/page3", "page4", "page5"]);
    assert_eq!(registry.iter().count(), registry.len());
}

#[test]
fn replacing_with_a_route_keeps_unset_keys() {
    let mut registry = named();
    let id = registry.find("/page3").unwrap();

    let replaced = registry
        .replace(Some("/page3".into()), Some(Route::new("/page3b", "renamed").into()))
        .unwrap();
    assert!(matches!(replaced, Replaced::Stored(stored) if stored == id));
    let resolved = registry.get(RouteKey::name("page3")).unwrap();
    assert_eq!(resolved.id, id);
    assert_eq!(resolved.path(), Some("/page3b"));
    assert_eq!(*resolved.body(), "renamed");
    assert!(registry.get("/page3").is_none());

    registry
        .replace(
            Some(RouteKey::name("page3")),
            Some(Route::named("page3c", "again").into()),
        )
        .unwrap();
    let route = registry.route(id).unwrap();
    assert_eq!(route.path.as_deref(), Some("/page3b"));
    assert_eq!(route.name.as_deref(), Some("page3c"));
    assert!(registry.get(RouteKey::name("page3")).is_none());
}
