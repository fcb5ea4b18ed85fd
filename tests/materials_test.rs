use portal_scene::{
    data_structures::scene_graph::{SceneGraph, SceneNode},
    materials::{MaterialKind, assign_materials, classify},
};

use crate::common::test_utils::portal_model;

mod common;

fn material_of(graph: &SceneGraph, name: &str) -> Option<MaterialKind> {
    graph.child(name).unwrap().material
}

#[test]
fn should_classify_node_names() {
    assert_eq!(classify("baked"), Some(MaterialKind::Baked));
    assert_eq!(classify("poleLight"), Some(MaterialKind::PoleLight));
    assert_eq!(classify("poleLightA"), Some(MaterialKind::PoleLight));
    assert_eq!(classify("leftpoleLight001"), Some(MaterialKind::PoleLight));
    assert_eq!(classify("portalLight"), Some(MaterialKind::PortalLight));
}

#[test]
fn should_match_case_sensitively_and_exactly_where_required() {
    assert_eq!(classify("Baked"), None);
    assert_eq!(classify("baked001"), None);
    assert_eq!(classify("PoleLightA"), None);
    assert_eq!(classify("portalLight2"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn should_assign_the_shared_materials_to_matching_children() {
    let mut graph = portal_model();

    let assigned = assign_materials(&mut graph);

    assert_eq!(assigned, 4);
    assert_eq!(material_of(&graph, "baked"), Some(MaterialKind::Baked));
    assert_eq!(material_of(&graph, "poleLightA"), Some(MaterialKind::PoleLight));
    assert_eq!(material_of(&graph, "poleLightB"), Some(MaterialKind::PoleLight));
    assert_eq!(material_of(&graph, "portalLight"), Some(MaterialKind::PortalLight));
}

#[test]
fn should_leave_unmatched_children_with_their_own_material() {
    let mut graph = portal_model();
    let rock_color = [0.2, 0.3, 0.4, 1.0];
    graph.children[4].original_color = rock_color;

    assign_materials(&mut graph);

    let rock = graph.child("rock").unwrap();
    assert_eq!(rock.material, None);
    assert_eq!(rock.original_color, rock_color);
}

#[test]
fn should_not_depend_on_child_order() {
    let mut forward = portal_model();
    let mut reversed = portal_model();
    reversed.children.reverse();

    assign_materials(&mut forward);
    assign_materials(&mut reversed);

    for child in &forward.children {
        assert_eq!(material_of(&reversed, &child.name), child.material);
    }
}

#[test]
fn should_be_idempotent() {
    let mut graph = portal_model();
    assign_materials(&mut graph);
    let first: Vec<_> = graph.children.iter().map(|c| c.material).collect();

    let assigned = assign_materials(&mut graph);
    let second: Vec<_> = graph.children.iter().map(|c| c.material).collect();

    assert_eq!(assigned, 4);
    assert_eq!(first, second);
}

#[test]
fn should_only_inspect_top_level_children() {
    let mut graph = SceneGraph::new(vec![
        SceneNode::new("group").with_child(SceneNode::new("baked")),
    ]);

    let assigned = assign_materials(&mut graph);

    assert_eq!(assigned, 0);
    assert_eq!(graph.children[0].material, None);
    assert_eq!(graph.children[0].children[0].material, None);
}

#[test]
fn should_do_nothing_for_an_empty_model() {
    let mut graph = SceneGraph::default();

    assert_eq!(assign_materials(&mut graph), 0);
}
