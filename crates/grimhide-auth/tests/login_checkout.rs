//! Login gating checkout, with cart and session in the same origin.

use grimhide_auth::{AuthConfig, LoginForm, SessionStore};
use grimhide_commerce::prelude::*;
use grimhide_storage::MemoryOrigin;

#[test]
fn test_anonymous_shopper_is_sent_to_login_then_through() {
    let origin = MemoryOrigin::new();
    let catalog = StaticCatalog::grimhide();
    let config = StorefrontConfig::default();

    let mut cart = CartStore::from_config(origin.open_tab(), &config);
    add_product(&mut cart, &catalog, &ProductId::new("p2"), &Variant::new(), 1).unwrap();

    let sessions = SessionStore::new(origin.open_tab());
    let decision = proceed_to_checkout(&cart, sessions.is_logged_in(), &config.checkout).unwrap();
    assert_eq!(decision.redirect(), Redirect::Login);

    // Login page in another tab.
    let login_tab = SessionStore::new(origin.open_tab());
    login_tab
        .login(&LoginForm::new("shopper@store.com", "pw", true))
        .unwrap();

    let decision = proceed_to_checkout(&cart, sessions.is_logged_in(), &config.checkout).unwrap();
    assert_eq!(decision.redirect(), Redirect::Checkout);

    // Session and cart live under separate keys.
    assert_eq!(cart.item_count(), 1);
    assert!(origin.peek("grimhide_session_v1").is_some());
    assert!(origin.peek(DEFAULT_CART_KEY).is_some());
}

#[test]
fn test_logout_keeps_cart_and_remembered_email() {
    let origin = MemoryOrigin::new();
    let catalog = StaticCatalog::grimhide();
    let mut cart = CartStore::open(origin.open_tab());
    let sessions = SessionStore::new(origin.open_tab());

    sessions
        .login(&LoginForm::new("shopper@store.com", "pw", true))
        .unwrap();
    add_product(&mut cart, &catalog, &ProductId::new("p1"), &Variant::new(), 2).unwrap();
    sessions.logout().unwrap();

    assert!(!sessions.is_logged_in());
    assert_eq!(sessions.remembered_email().as_deref(), Some("shopper@store.com"));
    assert_eq!(CartStore::open(origin.open_tab()).item_count(), 2);
}

#[test]
fn test_custom_keys_and_admins() {
    let origin = MemoryOrigin::new();
    let config = AuthConfig {
        session_key: "staging_session".to_string(),
        admin_emails: vec!["ops@grimhide.com".to_string()],
        ..AuthConfig::default()
    };
    let sessions = SessionStore::with_config(origin.open_tab(), config);

    let session = sessions
        .login(&LoginForm::new("OPS@grimhide.com", "pw", false))
        .unwrap();
    assert!(session.is_admin());
    assert!(origin.peek("staging_session").is_some());
    assert!(origin.peek("grimhide_session_v1").is_none());

    // The old default admin is just a customer here.
    let session = sessions
        .login(&LoginForm::new("admin@store.com", "admin123", false))
        .unwrap();
    assert!(!session.is_admin());
}
