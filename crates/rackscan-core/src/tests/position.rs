use crate::geom::point;
use crate::position::*;

#[test]
fn nested_translates_compose_outward() {
    let tree = super::load(
        r#"<g transform="translate(10,10)">
             <g transform="translate(0,1)">
               <g transform="translate(1,0)"><path d="M0,0 L1,1"/></g>
             </g>
           </g>"#,
    );
    let inner = super::groups(&tree)[2];
    assert_eq!(resolve_position(&tree, inner, tree.root()), point(11.0, 11.0));
}

#[test]
fn ancestors_without_transform_are_identity() {
    let tree = super::load(
        r#"<g><g transform=""><g transform="translate(2,3)"><g><path d="M1,1"/></g></g></g></g>"#,
    );
    let leaf = super::groups(&tree)[3];
    assert_eq!(resolve_position(&tree, leaf, tree.root()), point(3.0, 4.0));
}

#[test]
fn each_level_applies_scale_then_translate() {
    let tree = super::load(
        r#"<g transform="scale(2)"><g transform="translate(5,5)"><path d="M1,1"/></g></g>"#,
    );
    let inner = super::groups(&tree)[1];
    assert_eq!(resolve_position(&tree, inner, tree.root()), point(12.0, 12.0));
}

#[test]
fn the_root_transform_is_excluded() {
    let tree = crate::ShapeTree::parse(
        r#"<svg xmlns="http://www.w3.org/2000/svg" transform="translate(100,100)"><g transform="translate(1,1)"><path d="M0,0"/></g></svg>"#,
    )
    .unwrap();
    let g = super::first_group(&tree);
    assert_eq!(resolve_position(&tree, g, tree.root()), point(1.0, 1.0));
}

#[test]
fn falls_back_to_bounds_corner_then_origin() {
    let tree = super::load(
        r#"<g transform="translate(10,0)"><rect x="3" y="4" width="1" height="1"/></g><g transform="translate(10,0)"/>"#,
    );
    let gs = super::groups(&tree);
    assert_eq!(local_point(&tree, gs[0]), point(3.0, 4.0));
    assert_eq!(resolve_position(&tree, gs[0], tree.root()), point(13.0, 4.0));
    assert_eq!(local_point(&tree, gs[1]), point(0.0, 0.0));
    assert_eq!(resolve_position(&tree, gs[1], tree.root()), point(10.0, 0.0));
}
