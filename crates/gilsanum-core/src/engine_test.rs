use chrono::NaiveDate;

use super::*;
use crate::criteria::{DatePreset, PriceRange};
use crate::products::{Location, Shop};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn product(id: &str, name: &str, price: i64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        price: dec(price),
        image: format!("/images/{id}.png"),
        shop: None,
    }
}

fn at_shop(mut p: Product, shop: &str, lat: f64, lng: f64, address: &str) -> Product {
    p.shop = Some(Shop {
        name: shop.to_string(),
        location: Location {
            lat,
            lng,
            address: address.to_string(),
        },
    });
    p
}

fn ids(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.id.as_str()).collect()
}

fn criteria() -> FilterCriteria {
    FilterCriteria::with_price_ceiling(dec(10_000))
}

#[test]
fn empty_term_matches_everything() {
    assert!(matches_search(&product("a", "Speaker", 10), ""));
}

#[test]
fn search_matches_name_ignoring_case() {
    let watch = product("w", "Smartwatch", 199);
    assert!(matches_search(&watch, "smart"));
    assert!(matches_search(&watch, "SMART"));
    assert!(matches_search(&watch, "Watch"));
    assert!(!matches_search(&watch, "phone"));
}

#[test]
fn search_matches_description() {
    let mut drone = product("d", "Drone", 800);
    drone.description = Some("4K camera with Gimbal".to_string());
    assert!(matches_search(&drone, "gimbal"));
    assert!(!matches_search(&product("d", "Drone", 800), "gimbal"));
}

#[test]
fn amount_buckets_use_documented_bounds() {
    let cases = [
        (99, AmountFilter::Under100, true),
        (100, AmountFilter::Under100, false),
        (100, AmountFilter::From100To500, true),
        (500, AmountFilter::From100To500, true),
        (501, AmountFilter::From100To500, false),
        (500, AmountFilter::Over500, false),
        (501, AmountFilter::Over500, true),
        (0, AmountFilter::LowToHigh, true),
        (9_999, AmountFilter::HighToLow, true),
    ];
    for (price, amount, expected) in cases {
        assert_eq!(
            matches_amount_bucket(&product("x", "X", price), amount),
            expected,
            "price {price} with {amount}"
        );
    }
}

#[test]
fn fractional_prices_respect_bucket_edges() {
    let mut p = product("x", "X", 0);
    p.price = Decimal::new(9999, 2);
    assert!(matches_amount_bucket(&p, AmountFilter::Under100));
    p.price = Decimal::new(50001, 2);
    assert!(matches_amount_bucket(&p, AmountFilter::Over500));
}

#[test]
fn default_sort_follows_low_to_high() {
    let products = vec![
        product("a", "A", 300),
        product("b", "B", 100),
        product("c", "C", 200),
    ];
    let result = filter_and_sort(&products, &criteria());
    assert_eq!(ids(&result), ["b", "c", "a"]);
}

#[test]
fn default_sort_follows_high_to_low() {
    let products = vec![
        product("a", "A", 300),
        product("b", "B", 100),
        product("c", "C", 200),
    ];
    let mut c = criteria();
    c.amount_filter = AmountFilter::HighToLow;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["a", "c", "b"]);
}

#[test]
fn default_sort_with_bucket_keeps_input_order() {
    let products = vec![
        product("a", "A", 450),
        product("b", "B", 120),
        product("c", "C", 50),
        product("d", "D", 300),
    ];
    let mut c = criteria();
    c.amount_filter = AmountFilter::From100To500;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["a", "b", "d"]);
}

#[test]
fn explicit_sort_overrides_amount_ordering() {
    let products = vec![
        product("a", "A", 100),
        product("b", "B", 300),
        product("c", "C", 200),
    ];
    let mut c = criteria();
    c.amount_filter = AmountFilter::LowToHigh;
    c.sort_by = SortBy::PriceHigh;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["b", "c", "a"]);
}

#[test]
fn name_sort_ignores_case() {
    let products = vec![
        product("1", "speaker", 1),
        product("2", "Charger", 1),
        product("3", "drone", 1),
        product("4", "Adapter", 1),
    ];
    let mut c = criteria();
    c.sort_by = SortBy::Name;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["4", "2", "3", "1"]);
}

#[test]
fn locale_cmp_puts_lowercase_first_on_case_ties() {
    assert_eq!(locale_cmp("apple", "Apple"), Ordering::Less);
    assert_eq!(locale_cmp("Apple", "apple"), Ordering::Greater);
    assert_eq!(locale_cmp("apple", "apple"), Ordering::Equal);
    assert_eq!(locale_cmp("Banana", "apple"), Ordering::Greater);
}

#[test]
fn name_sort_places_accented_names_among_their_base_letters() {
    let products = vec![
        product("z", "Zebra", 1),
        product("e", "\u{c9}clair", 1),
        product("a", "apple", 1),
    ];
    let mut c = criteria();
    c.sort_by = SortBy::Name;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["a", "e", "z"]);
}

#[test]
fn locale_cmp_orders_accents_after_plain_letters() {
    assert_eq!(locale_cmp("eclair", "\u{e9}clair"), Ordering::Less);
    assert_eq!(locale_cmp("\u{e9}clair", "fig"), Ordering::Less);
    assert_eq!(locale_cmp("\u{e9}clair", "\u{c9}clair"), Ordering::Less);
    assert_eq!(locale_cmp("Zo\u{eb}", "zoe"), Ordering::Greater);
}

#[test]
fn price_sort_is_stable() {
    let products = vec![
        product("x", "X", 200),
        product("p", "P", 100),
        product("y", "Y", 200),
        product("q", "Q", 100),
    ];
    let mut c = criteria();
    c.sort_by = SortBy::PriceLow;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["p", "q", "x", "y"]);
    c.sort_by = SortBy::PriceHigh;
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["x", "y", "p", "q"]);
}

#[test]
fn bucket_excludes_regardless_of_price_range() {
    let products = vec![product("a", "A", 150), product("b", "B", 40)];
    let mut c = criteria();
    c.amount_filter = AmountFilter::Under100;
    c.price_range = PriceRange::new(dec(0), dec(1_000));
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["b"]);
}

#[test]
fn price_range_is_inclusive() {
    let products = vec![
        product("a", "A", 99),
        product("b", "B", 100),
        product("c", "C", 200),
        product("d", "D", 201),
    ];
    let mut c = criteria();
    c.price_range = PriceRange::new(dec(100), dec(200));
    assert_eq!(ids(&filter_and_sort(&products, &c)), ["b", "c"]);
}

#[test]
fn inverted_price_range_matches_nothing() {
    let products = vec![product("a", "A", 150)];
    let mut c = criteria();
    c.price_range = PriceRange::new(dec(500), dec(100));
    assert!(filter_and_sort(&products, &c).is_empty());
}

#[test]
fn filter_and_sort_leaves_input_untouched() {
    let products = vec![product("b", "B", 300), product("a", "A", 100)];
    let before = products.clone();
    let _ = filter_and_sort(&products, &criteria());
    assert_eq!(products, before);
}

#[test]
fn empty_list_yields_empty_outputs() {
    let products: Vec<Product> = Vec::new();
    assert!(filter_and_sort(&products, &criteria()).is_empty());
    assert!(group_by_shop(&products).is_empty());
    assert!(search_filter_groups(&[], "x").is_empty());
}

#[test]
fn grouping_keeps_first_seen_location() {
    let products = vec![
        at_shop(product("a", "Speaker", 900), "S1", 1.0, 1.0, "X"),
        at_shop(product("b", "Drone", 800), "S1", 2.0, 2.0, "Y"),
        product("c", "Charger", 50),
    ];
    let groups = group_by_shop(&products);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "S1");
    assert_eq!(groups[0].location.address, "X");
    assert_eq!(ids(&groups[0].products), ["a", "b"]);
}

#[test]
fn grouping_is_case_sensitive() {
    let products = vec![
        at_shop(product("a", "A", 1), "Acme", 0.0, 0.0, "1"),
        at_shop(product("b", "B", 1), "acme", 0.0, 0.0, "2"),
    ];
    let groups = group_by_shop(&products);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Acme", "acme"]);
}

#[test]
fn group_order_is_first_appearance() {
    let products = vec![
        at_shop(product("a", "A", 1), "North", 0.0, 0.0, "n"),
        at_shop(product("b", "B", 1), "South", 0.0, 0.0, "s"),
        at_shop(product("c", "C", 1), "North", 0.0, 0.0, "n"),
        at_shop(product("d", "D", 1), "East", 0.0, 0.0, "e"),
    ];
    let groups = group_by_shop(&products);
    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["North", "South", "East"]);
    assert_eq!(ids(&groups[0].products), ["a", "c"]);
    assert_eq!(group_by_shop(&products), groups);
}

#[test]
fn search_groups_by_shop_or_product_name() {
    let products = vec![
        at_shop(product("a", "Speaker", 1), "Sound Hub", 0.0, 0.0, "1"),
        at_shop(product("b", "Drone", 1), "Sky Store", 0.0, 0.0, "2"),
        at_shop(product("c", "Charger", 1), "Power Point", 0.0, 0.0, "3"),
    ];
    let groups = group_by_shop(&products);

    let by_shop = search_filter_groups(&groups, "SKY");
    assert_eq!(by_shop.len(), 1);
    assert_eq!(by_shop[0].name, "Sky Store");

    let by_product = search_filter_groups(&groups, "charg");
    assert_eq!(by_product.len(), 1);
    assert_eq!(by_product[0].name, "Power Point");

    assert_eq!(search_filter_groups(&groups, "").len(), 3);
    assert!(search_filter_groups(&groups, "tablet").is_empty());
}

#[test]
fn focus_group_only_for_non_empty_term() {
    let products = vec![
        at_shop(product("a", "Speaker", 1), "Sound Hub", 5.0, 6.0, "1"),
        at_shop(product("b", "Drone", 1), "Sky Store", 7.0, 8.0, "2"),
    ];
    let groups = group_by_shop(&products);
    assert!(focus_group(&groups, "").is_none());

    let hits = search_filter_groups(&groups, "s");
    let focus = focus_group(&hits, "s").expect("a focus group");
    assert_eq!(focus.name, "Sound Hub");

    assert!(focus_group(&[], "s").is_none());
}

#[test]
fn total_value_sums_prices() {
    let products = vec![
        at_shop(product("a", "A", 900), "S1", 0.0, 0.0, "x"),
        at_shop(product("b", "B", 800), "S1", 0.0, 0.0, "x"),
    ];
    let groups = group_by_shop(&products);
    assert_eq!(shop_total_value(&groups[0]), dec(1_700));
}

#[test]
fn price_ceiling_uses_max_or_default() {
    assert_eq!(price_ceiling(&[]), dec(1_000));
    let products = vec![product("a", "A", 40), product("b", "B", 1_250)];
    assert_eq!(price_ceiling(&products), dec(1_250));
}

#[test]
fn active_filter_count_counts_each_section_once() {
    let ceiling = dec(900);
    let mut c = FilterCriteria::with_price_ceiling(ceiling);
    assert_eq!(active_filter_count(&c, ceiling), 0);

    c.search_term = "drone".to_string();
    c.sort_by = SortBy::Name;
    assert_eq!(active_filter_count(&c, ceiling), 0);

    c.amount_filter = AmountFilter::Over500;
    assert_eq!(active_filter_count(&c, ceiling), 1);

    c.price_range.set_lower(dec(10));
    c.price_range.set_upper(dec(20));
    assert_eq!(active_filter_count(&c, ceiling), 2);

    c.apply_date_preset(
        DatePreset::Week,
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap(),
    );
    assert_eq!(active_filter_count(&c, ceiling), 3);

    c.reset_all(ceiling);
    assert_eq!(active_filter_count(&c, ceiling), 0);
}

#[test]
fn stale_price_ceiling_counts_as_active() {
    let c = FilterCriteria::with_price_ceiling(dec(900));
    assert_eq!(active_filter_count(&c, dec(1_200)), 1);
}

#[test]
fn top_n_slices_after_sorting() {
    let products = vec![
        product("a", "A", 5),
        product("b", "B", 1),
        product("c", "C", 3),
    ];
    let sorted = filter_and_sort(&products, &criteria());
    assert_eq!(ids(top_n(&sorted, 2)), ["b", "c"]);
    assert_eq!(top_n(&sorted, 10).len(), 3);
    assert!(top_n(&sorted, 0).is_empty());
}

#[test]
fn results_window_caps_at_page_size() {
    assert_eq!(ResultsWindow::new(12, 8).to_string(), "1 - 8 of 12 Results");
    assert_eq!(ResultsWindow::new(3, 8).to_string(), "1 - 3 of 3 Results");
    assert_eq!(ResultsWindow::new(0, 8).shown, 0);
}

#[test]
fn catalog_view_groups_only_filtered_products() {
    let products = vec![
        at_shop(product("a", "Speaker", 900), "S1", 1.0, 1.0, "X"),
        at_shop(product("b", "Drone", 80), "S2", 2.0, 2.0, "Y"),
        product("c", "Charger", 50),
    ];
    let mut c = FilterCriteria::for_products(&products);
    c.amount_filter = AmountFilter::Over500;

    let view = CatalogView::compute(&products, &c);
    assert_eq!(ids(&view.products), ["a"]);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].name, "S1");
    assert_eq!(view.window, ResultsWindow { shown: 1, total: 1 });
    assert_eq!(view.active_filters, 1);
    assert!(view.focus(&c.search_term).is_none());
}

#[test]
fn catalog_view_search_narrows_products_before_grouping() {
    let products = vec![
        at_shop(product("a", "Speaker", 900), "Harbor Audio", 1.0, 1.0, "X"),
        at_shop(product("b", "Harbor Lamp", 80), "S2", 2.0, 2.0, "Y"),
    ];
    let mut c = FilterCriteria::for_products(&products);
    c.search_term = "harbor".to_string();

    let view = CatalogView::compute(&products, &c);
    assert_eq!(ids(&view.products), ["b"]);
    assert_eq!(view.groups.len(), 1);
    assert_eq!(view.groups[0].name, "S2");

    let by_shop = search_filter_groups(&group_by_shop(&products), &c.search_term);
    assert_eq!(by_shop.len(), 2);
    assert_eq!(by_shop[0].name, "Harbor Audio");
}
