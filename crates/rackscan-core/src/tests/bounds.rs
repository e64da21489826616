use crate::bounds::*;
use crate::geom::{BoundingBox, point};

#[test]
fn rect_bounds_are_exact() {
    let tree = super::load(r#"<g><rect x="0" y="0" width="10" height="20"/></g>"#);
    let b = bounds(&tree, super::first_group(&tree));
    assert_eq!(
        b,
        BoundingBox {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 20.0
        }
    );
}

#[test]
fn empty_group_yields_the_empty_sentinel() {
    let tree = super::load(r#"<g><g/></g>"#);
    let b = bounds(&tree, super::first_group(&tree));
    assert!(b.is_empty());
    assert_eq!(b, BoundingBox::EMPTY);
    assert_eq!(b.width(), 0.0);
    assert_eq!(b.height(), 0.0);
    assert!(!b.min_x.is_nan() && !b.max_y.is_nan());
    assert_eq!(b.min(), None);
}

#[test]
fn every_primitive_kind_contributes() {
    let tree = super::load(
        r#"<g>
            <line x1="-5" y1="2" x2="3" y2="4"/>
            <circle cx="50" cy="50" r="5"/>
            <ellipse cx="0" cy="100" rx="4" ry="8"/>
            <path d="M20,20 C25,-10 30,30 35,35"/>
          </g>"#,
    );
    let b = bounds(&tree, super::first_group(&tree));
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-5.0, -10.0, 55.0, 108.0));
}

#[test]
fn text_width_is_estimated_from_glyphs() {
    let tree = super::load(r#"<g><text x="10" y="20" font-size="10">ABCD</text></g>"#);
    let b = bounds(&tree, super::first_group(&tree));
    assert_eq!((b.min_x, b.min_y), (10.0, 10.0));
    assert!((b.max_x - 34.0).abs() < 1e-9);
    assert_eq!(b.max_y, 20.0);

    // Default font size.
    let tree = super::load(r#"<g><text x="0" y="12">AB</text></g>"#);
    let b = bounds(&tree, super::first_group(&tree));
    assert_eq!(b.min_y, 0.0);
    assert!((b.width() - 14.4).abs() < 1e-9);
}

#[test]
fn malformed_numbers_default_to_zero() {
    let tree = super::load(r#"<g><rect x="oops" y="2px" width="10" height="n/a"/></g>"#);
    let b = bounds(&tree, super::first_group(&tree));
    assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 2.0, 10.0, 2.0));
}

#[test]
fn nested_content_is_measured_in_raw_coordinates() {
    let tree = super::load(
        r#"<g><g transform="translate(100,100)"><rect x="1" y="1" width="2" height="2"/></g></g>"#,
    );
    let b = bounds(&tree, super::first_group(&tree));
    assert_eq!((b.min_x, b.max_x), (1.0, 3.0));
}

#[test]
fn anchor_prefers_the_first_path_move() {
    let tree = super::load(
        r#"<g><rect x="1" y="1" width="2" height="2"/><path d="L0,0"/><path d="M 5 7 L9,9"/></g>"#,
    );
    assert_eq!(anchor(&tree, super::first_group(&tree)), Some(point(5.0, 7.0)));

    let tree = super::load(r#"<g><rect x="1" y="1" width="2" height="2"/></g>"#);
    assert_eq!(anchor(&tree, super::first_group(&tree)), None);

    // Only direct children are considered.
    let tree = super::load(r#"<g><g><path d="M3,3"/></g></g>"#);
    assert_eq!(anchor(&tree, super::first_group(&tree)), None);
}
