use crate::classify::*;
use crate::config::ScanOptions;

fn classify_first(body: &str) -> Category {
    let tree = super::load(body);
    classify(&tree, super::first_group(&tree), &ScanOptions::default())
}

fn floor_path() -> String {
    let steps: Vec<String> = (0..40).map(|i| format!("L{},{}", 1000 + i * 10, i)).collect();
    format!("M0,0 {} Z", steps.join(" "))
}

#[test]
fn server_racks_are_recognized_by_color_and_composition() {
    assert_eq!(
        classify_first(r#"<g fill="rgb(230,0,0)"><line/><path d="M0,0 L1,1"/></g>"#),
        Category::ServerRack
    );

    let tree = super::load(r#"<g stroke="rgb(110, 110, 110)"><path d="M0,0"/><line/></g>"#);
    assert_eq!(
        server_rack_color(&tree, super::first_group(&tree)),
        Some(RackColor::Gray)
    );

    // Color alone is not enough.
    assert_eq!(
        classify_first(r#"<g fill="rgb(230,0,0)"><path d="M0,0 L1,1"/></g>"#),
        Category::Other
    );
}

#[test]
fn red_wins_over_gray() {
    let tree = super::load(
        r#"<g fill="rgb(110,110,110)" stroke="rgb(230,0,0)"><line/><path d="M0,0"/></g>"#,
    );
    assert_eq!(
        server_rack_color(&tree, super::first_group(&tree)),
        Some(RackColor::Red)
    );
}

#[test]
fn cooling_units_and_pdus_need_line_and_path_children() {
    assert_eq!(
        classify_first(r#"<g fill="rgb(171,211,241)"><line/><path d="M0,0"/></g>"#),
        Category::CoolingUnit
    );
    assert_eq!(
        classify_first(r#"<g style="stroke: rgb(62,153,223)"><line/><path d="M0,0"/></g>"#),
        Category::CoolingUnit
    );
    assert_eq!(
        classify_first(r#"<g stroke="rgb(103,203,51)"><line/><path d="M0,0"/></g>"#),
        Category::PduPpc
    );
    assert_eq!(
        classify_first(r#"<g fill="rgb(189,232,167)"><path d="M0,0"/></g>"#),
        Category::Other
    );
}

#[test]
fn cooling_tiles_follow_the_configured_window() {
    let tree = super::load(&format!(r#"<g><path d="{}"/></g>"#, super::tile_path(9)));
    let g = super::first_group(&tree);
    assert_eq!(classify(&tree, g, &ScanOptions::wide()), Category::CoolingTile);
    assert_eq!(classify(&tree, g, &ScanOptions::narrow()), Category::CoolingTile);

    let tree = super::load(&format!(r#"<g><path d="{}"/></g>"#, super::tile_path(11)));
    let g = super::first_group(&tree);
    assert_eq!(classify(&tree, g, &ScanOptions::wide()), Category::CoolingTile);
    assert_eq!(classify(&tree, g, &ScanOptions::narrow()), Category::Other);
}

#[test]
fn columns_need_a_closed_path_or_few_paths() {
    assert_eq!(
        classify_first(r#"<g fill="rgb(145,145,145)"><path d="M0,0 L5,0 L5,5"/></g>"#),
        Category::Column
    );
    assert_eq!(
        classify_first(
            r#"<g stroke="rgb(230,230,230)"><path d="M0,0"/><path d="M1,1"/><path d="M2,2 Z"/></g>"#
        ),
        Category::Column
    );
    assert_eq!(
        classify_first(
            r#"<g fill="rgb(230,230,230)"><path d="M0,0"/><path d="M1,1"/><path d="M2,2"/></g>"#
        ),
        Category::Other
    );
}

#[test]
fn walls_are_unfilled_line_paths_without_signature_fill() {
    assert_eq!(
        classify_first(r#"<g stroke="black"><path fill="none" d="M0,0 L100,0"/></g>"#),
        Category::Wall
    );
    assert_eq!(
        classify_first(r#"<g fill="rgb(224,224,215)"><path fill="none" d="M0,0 L100,0"/></g>"#),
        Category::Other
    );
    assert_eq!(
        classify_first(r#"<g><path fill="none" d="M0,0 C1,1 2,2 3,3"/></g>"#),
        Category::Other
    );
}

#[test]
fn wrapper_groups_do_not_inherit_nested_walls() {
    let tree = super::load(r#"<g><g><path fill="none" d="M0,0 L9,9"/></g></g>"#);
    let gs = super::groups(&tree);
    let opts = ScanOptions::default();
    assert_eq!(classify(&tree, gs[0], &opts), Category::Other);
    assert_eq!(classify(&tree, gs[1], &opts), Category::Wall);
}

#[test]
fn doors_need_black_translucent_fill_and_an_arc() {
    let door = r#"<g fill="rgb(0,0,0)" fill-opacity="0.6"><path d="M0,0 L10,0 A10,10 0 0,1 0,10 Z"/></g>"#;
    assert_eq!(classify_first(door), Category::Door);
    let named = r#"<g fill="Black" fill-opacity=".5"><path d="M0,0 a5,5 0 0 1 5,5"/></g>"#;
    assert_eq!(classify_first(named), Category::Door);
    let dark = r#"<g fill="rgb(0,0,0)" fill-opacity="0.9"><path d="M0,0 A1,1 0 0,1 1,1"/></g>"#;
    assert_eq!(classify_first(dark), Category::Other);
    assert_eq!(
        classify_first(r#"<g fill="rgb(0,0,0)"><path d="M0,0 A1,1 0 0,1 1,1"/></g>"#),
        Category::Other
    );
}

#[test]
fn rows_are_tall_translucent_beige_boxes() {
    let tall = r#"<g fill="rgb(224,224,215)" fill-opacity="0.4"><path d="M0,0 L10,0 L10,50 L0,50 Z"/></g>"#;
    assert_eq!(classify_first(tall), Category::Row);

    let wide = r#"<g fill="rgb(224,224,215)" fill-opacity="0.4"><path d="M0,0 L50,0 L50,10 L0,10 Z"/></g>"#;
    assert_eq!(classify_first(wide), Category::Other);

    let opaque = r#"<g fill="rgb(224,224,215)"><path d="M0,0 L10,0 L10,50 L0,50 Z"/></g>"#;
    assert_eq!(classify_first(opaque), Category::Other);
}

#[test]
fn floor_needs_silver_fill_and_a_large_long_path() {
    let body = format!(r#"<g fill="silver"><path d="{}"/></g>"#, floor_path());
    assert_eq!(classify_first(&body), Category::Floor);

    let short = r#"<g fill="silver"><path d="M0,0 L2000,0 L2000,2000 Z"/></g>"#;
    assert_eq!(classify_first(short), Category::Other);
}

#[test]
fn floor_accepts_coordinates_beyond_u64() {
    let steps: Vec<String> = (0..60).map(|i| format!("L{i},{i}")).collect();
    let d = format!("M0,0 {} L123456789012345678901234,0 Z", steps.join(" "));
    let body = format!(r#"<g fill="silver"><path d="{d}"/></g>"#);
    assert_eq!(classify_first(&body), Category::Floor);
}

#[test]
fn precedence_resolves_overlapping_signatures() {
    let tree = super::load(
        r#"<g fill="rgb(62,153,223)" stroke="rgb(230,0,0)"><line/><path d="M0,0"/></g>"#,
    );
    let g = super::first_group(&tree);
    let opts = ScanOptions::default();
    assert_eq!(
        matching_categories(&tree, g, &opts),
        vec![Category::ServerRack, Category::CoolingUnit]
    );
    assert_eq!(classify(&tree, g, &opts), Category::ServerRack);

    let tree = super::load(&format!(
        r#"<g fill="rgb(230,0,0)"><line/><path d="{}"/></g>"#,
        super::tile_path(9)
    ));
    assert_eq!(
        classify(&tree, super::first_group(&tree), &opts),
        Category::ServerRack
    );
}

#[test]
fn non_groups_are_never_classified() {
    let tree = super::load(r#"<path fill="none" d="M0,0 L1,1"/>"#);
    let path = tree.descendants(tree.root()).next().unwrap();
    assert_eq!(classify(&tree, path, &ScanOptions::default()), Category::Other);
}

#[test]
fn identifiers_are_stable() {
    assert_eq!(Category::ServerRack.slug(), "server-rack");
    assert_eq!(Category::PduPpc.layer(), "pdus-ppcs");
    assert_eq!(RackColor::Gray.as_str(), "gray");
}
