//! A shopper's path through the storefront pages.

use grimhide_commerce::browse::ALL_CATEGORIES;
use grimhide_commerce::checkout::clamp_stepper;
use grimhide_commerce::prelude::*;
use grimhide_storage::MemoryOrigin;

#[test]
fn test_browse_add_and_check_out() {
    let origin = MemoryOrigin::new();
    let catalog = StaticCatalog::grimhide();
    let config = StorefrontConfig::default();

    // Listing page: search and sort.
    let hits = BrowseQuery::new()
        .with_category(ALL_CATEGORIES)
        .with_term("armor")
        .with_sort(SortOption::from_select_value("lh"))
        .run(&catalog);
    let cheapest = hits[0].product.id.clone();
    assert_eq!(cheapest.as_str(), "p2");

    // Product page: quantity field, then add.
    let mut detail = CartStore::from_config(origin.open_tab(), &config);
    let qty = parse_quantity_input("2").unwrap();
    add_product(&mut detail, &catalog, &cheapest, &Variant::color_size("Brown", "L"), qty).unwrap();
    let stepped = clamp_stepper(i64::from(qty) + 20);
    add_product(&mut detail, &catalog, &ProductId::new("p1"), &Variant::new(), stepped).unwrap();

    // Cart page opens later and reads the same cart.
    let mut cart_page = CartStore::from_config(origin.open_tab(), &config);
    assert_eq!(cart_page.unique_item_count(), 2);
    assert_eq!(cart_page.item_count(), 12);

    let pricing = cart_page.pricing();
    assert_eq!(pricing.subtotal.display(), "$3548.00");
    assert_eq!(pricing.tax.display(), "$283.84");
    assert!(pricing.ships_free());

    assert_eq!(
        proceed_to_checkout(&cart_page, false, &config.checkout)
            .unwrap()
            .redirect(),
        Redirect::Login
    );
    let decision = proceed_to_checkout(&cart_page, true, &config.checkout).unwrap();
    assert_eq!(decision.redirect(), Redirect::Checkout);

    let receipt = complete_checkout(&mut cart_page, &config.checkout).unwrap();
    assert_eq!(receipt.pricing.total.display(), "$3831.84");
    assert!(CartStore::open(origin.open_tab()).is_empty());
}

#[test]
fn test_small_order_pays_shipping() {
    let origin = MemoryOrigin::new();
    let mut config = StorefrontConfig::default();
    config.pricing.free_shipping_threshold_cents = 50_000;

    let mut store = CartStore::from_config(origin.open_tab(), &config);
    let catalog = StaticCatalog::grimhide();
    add_product(&mut store, &catalog, &ProductId::new("p3"), &Variant::new(), 1).unwrap();

    let pricing = store.pricing();
    assert_eq!(pricing.shipping.display(), "$15.00");
    assert_eq!(pricing.tax.display(), "$27.92");
    assert_eq!(pricing.total.display(), "$391.92");
}

#[test]
fn test_buy_now_skips_the_cart() {
    let origin = MemoryOrigin::new();
    let catalog = StaticCatalog::grimhide();
    let mut store = CartStore::open(origin.open_tab());
    add_product(&mut store, &catalog, &ProductId::new("p1"), &Variant::new(), 3).unwrap();

    let qty = parse_quantity_input("").unwrap();
    let redirect = buy_now(&mut store, &catalog, &ProductId::new("p5"), &Variant::new(), qty).unwrap();

    assert_eq!(redirect.path(), "checkout.html");
    assert_eq!(store.item_count(), 1);
    assert_eq!(store.subtotal().display(), "$369.00");
}

#[test]
fn test_bad_quantity_text_never_reaches_the_cart() {
    let origin = MemoryOrigin::new();
    let store = CartStore::open(origin.open_tab());

    let err = parse_quantity_input("two").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    assert!(store.is_empty());
    assert_eq!(origin.peek(DEFAULT_CART_KEY), None);
}
