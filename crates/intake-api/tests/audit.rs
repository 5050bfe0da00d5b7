use intake_api::middleware::audit::resource_of;

#[test]
fn request_paths_resolve_to_their_resource() {
    let id = "5f0c6f7e-3b7a-4c1e-9d2a-0d8e6b1f4a21";
    assert_eq!(
        resource_of(&format!("/sessions/{id}/fields/full_name")),
        Some(("session", id))
    );
    assert_eq!(resource_of(&format!("/forms/{id}/notify")), Some(("form", id)));
    assert_eq!(resource_of(&format!("/forms/{id}")), Some(("form", id)));
}

#[test]
fn collection_routes_have_no_resource() {
    assert_eq!(resource_of("/forms"), None);
    assert_eq!(resource_of("/forms/export"), None);
    assert_eq!(resource_of("/sessions"), None);
    assert_eq!(resource_of("/health"), None);
    assert_eq!(resource_of("/instruments/epworth"), None);
}
