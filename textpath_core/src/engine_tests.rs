// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate std;

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;

use textpath_text::{TextMeasurer, TextMetrics, TextStyle};

use crate::{
    AffineProjection, Alignment, CLICKABLE_CLASS, ElementKind, LINE_STEP, LabelEvent, LabelText,
    LatLng, Layer, LayerGroup, LayerId, LineOffset, NodeId, Polyline, Surface, SvgSurface,
    TextOptions, TextPolyline, ThemeContext,
};

/// Fixed widths for the strings the tests lay out; 10px per char otherwise.
#[derive(Clone, Copy, Debug)]
struct TableMeasurer;

impl TextMeasurer for TableMeasurer {
    fn measure(&self, text: &str, _style: &TextStyle) -> TextMetrics {
        let advance_width = match text {
            "AB" => 40.0,
            "C" => 20.0,
            _ => 10.0 * text.chars().count() as f64,
        };
        TextMetrics {
            advance_width,
            ..TextMetrics::EMPTY
        }
    }
}

fn surface() -> SvgSurface<TableMeasurer> {
    SvgSurface::new(TableMeasurer, AffineProjection::default())
}

/// A horizontal road whose bounds are centered on lat 20, lng 10.
fn road() -> TextPolyline<NodeId> {
    TextPolyline::new(Polyline::new(
        LayerId(1),
        [LatLng::new(20.0, 0.0), LatLng::new(20.0, 20.0)],
    ))
}

fn added_road(surface: &mut SvgSurface<TableMeasurer>) -> TextPolyline<NodeId> {
    let mut road = road();
    road.on_add(surface);
    road
}

fn set(
    road: &mut TextPolyline<NodeId>,
    surface: &mut SvgSurface<TableMeasurer>,
    text: impl Into<LabelText>,
) {
    road.set_text(surface, text, TextOptions::default(), &ThemeContext::light());
}

fn line_handles(road: &TextPolyline<NodeId>) -> Vec<NodeId> {
    road.label().line_nodes().iter().map(|l| *l.node()).collect()
}

fn text_path(surface: &SvgSurface<TableMeasurer>, road: &TextPolyline<NodeId>) -> NodeId {
    let text = *road.label().text_node().expect("label is built");
    surface.children(text)[0]
}

fn close(a: LatLng, b: LatLng) -> bool {
    (a.lat - b.lat).abs() < 1e-9 && (a.lng - b.lng).abs() < 1e-9
}

fn text_elements(surface: &SvgSurface<TableMeasurer>) -> usize {
    surface
        .root()
        .iter()
        .filter(|n| surface.kind(**n) == Some(ElementKind::Text))
        .count()
}

#[test]
fn two_line_label_end_to_end() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB\nC");

    let label = road.label();
    assert!(label.is_built());
    let anchor = label.anchor().expect("anchor");
    assert!(close(anchor, LatLng::new(20.0, 10.0)));
    let [a, b] = label.endpoints().expect("endpoints");
    assert!(close(a, LatLng::new(20.0, -10.0)));
    assert!(close(b, LatLng::new(20.0, 30.0)));

    let offsets: Vec<LineOffset> = label.line_nodes().iter().map(|l| l.offset()).collect();
    assert_eq!(
        offsets,
        vec![
            LineOffset { dx: 0.0, dy: 0.0 },
            LineOffset {
                dx: -40.0,
                dy: LINE_STEP
            },
        ]
    );

    let path = *road.polyline().node().expect("path node");
    assert_eq!(
        surface.path_points(path),
        &[kurbo::Point::new(-10.0, 20.0), kurbo::Point::new(30.0, 20.0)]
    );
    assert_eq!(surface.attribute(&path, "id").as_deref(), Some("pathdef-1"));
    assert_eq!(surface.attribute(&path, "stroke").as_deref(), Some("none"));

    let tp = text_path(&surface, &road);
    assert_eq!(surface.attribute(&tp, "href").as_deref(), Some("#pathdef-1"));
    let tspans = surface.children(tp);
    assert_eq!(tspans.len(), 2);
    assert_eq!(surface.text(tspans[0]), Some("AB"));
    assert_eq!(surface.attribute(&tspans[1], "dx").as_deref(), Some("-40"));
    assert_eq!(surface.attribute(&tspans[1], "dy").as_deref(), Some("20"));

    // Path and stacked text are both 40px wide.
    assert_eq!(label.center_shift(), Some(0.0));
    // No measurement probe outlives the pass.
    assert_eq!(text_elements(&surface), 1);
}

#[test]
fn line_breaks_yield_one_node_per_line() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "a\nb c\n\nd");
    let tp = text_path(&surface, &road);
    let tspans = surface.children(tp).to_vec();
    assert_eq!(tspans.len(), 4);
    assert_eq!(surface.text(tspans[1]), Some("b\u{a0}c"));
    assert_eq!(surface.text(tspans[2]), Some(" "));
}

#[test]
fn explicit_lines_are_split_too() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(
        &mut road,
        &mut surface,
        vec!["one".to_string(), "two\nthree".to_string()],
    );
    let texts: Vec<&str> = road.label().line_nodes().iter().map(|l| l.text()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[test]
fn repeated_set_text_is_idempotent() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB\nC");
    let before = surface.to_svg_string();
    let handles = line_handles(&road);
    let endpoints = road.label().endpoints();

    set(&mut road, &mut surface, "AB\nC");
    assert_eq!(surface.to_svg_string(), before);
    assert_eq!(line_handles(&road), handles);
    assert_eq!(road.label().endpoints(), endpoints);
}

#[test]
fn reconcile_reuses_shared_lines() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "a\nb\nc");
    let text = *road.label().text_node().expect("built");
    let first = line_handles(&road);
    assert_eq!(first.len(), 3);

    set(&mut road, &mut surface, "x\ny");
    let shrunk = line_handles(&road);
    assert_eq!(shrunk, first[..2].to_vec());
    assert_eq!(surface.kind(first[2]), None);
    assert_eq!(surface.text(shrunk[0]), Some("x"));
    assert_eq!(road.label().text_node(), Some(&text));

    set(&mut road, &mut surface, "p\nq\nr\ns");
    let grown = line_handles(&road);
    assert_eq!(grown.len(), 4);
    assert_eq!(grown[..2], first[..2]);
    let tp = text_path(&surface, &road);
    assert_eq!(surface.children(tp), grown.as_slice());
}

#[test]
fn clearing_twice_is_a_no_op() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    assert_eq!(surface.element_count(), 4);

    set(&mut road, &mut surface, "");
    assert!(!road.label().is_built());
    assert_eq!(surface.element_count(), 1);
    set(&mut road, &mut surface, LabelText::Empty);
    assert_eq!(surface.element_count(), 1);
    assert_eq!(surface.root().len(), 1);
}

#[test]
fn four_rotations_restore_the_layout() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB\nC");
    let endpoints = road.label().endpoints().expect("endpoints");
    let handles = line_handles(&road);

    road.rotate_right(&mut surface);
    assert_eq!(road.label().alignment(), Alignment::Deg90);
    let [a, b] = road.label().endpoints().expect("endpoints");
    assert!(close(a, LatLng::new(40.0, 10.0)));
    assert!(close(b, LatLng::new(0.0, 10.0)));
    assert_eq!(line_handles(&road), handles);

    for _ in 0..3 {
        road.rotate_right(&mut surface);
    }
    assert_eq!(road.label().alignment(), Alignment::Deg0);
    let [a, b] = road.label().endpoints().expect("endpoints");
    assert!(close(a, endpoints[0]) && close(b, endpoints[1]));
    assert_eq!(line_handles(&road), handles);
}

#[test]
fn rotation_needs_a_built_label() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    road.rotate_right(&mut surface);
    assert_eq!(road.label().alignment(), Alignment::Deg0);
    assert!(road.label().endpoints().is_none());
}

#[test]
fn vertical_label_is_centered_on_a_zero_width_path() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB\nC");
    road.rotate_right(&mut surface);
    // Rebuilding measures centering against the now vertical path.
    road.bring_to_front(&mut surface);
    assert_eq!(road.label().alignment(), Alignment::Deg90);
    assert_eq!(road.label().center_shift(), Some(-20.0));
    let text = *road.label().text_node().expect("built");
    assert_eq!(surface.attribute(&text, "dx").as_deref(), Some("-20"));
}

#[test]
fn centering_can_be_disabled() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    road.set_text(
        &mut surface,
        "AB",
        TextOptions::new().with_center(false),
        &ThemeContext::light(),
    );
    let text = *road.label().text_node().expect("built");
    assert_eq!(road.label().center_shift(), None);
    assert_eq!(surface.attribute(&text, "dx"), None);
}

#[test]
fn text_set_before_attach_is_replayed() {
    let mut surface = surface();
    let mut road = road();
    set(&mut road, &mut surface, "AB");
    assert!(!road.label().is_built());
    assert_eq!(surface.element_count(), 0);

    road.on_add(&mut surface);
    assert!(road.label().is_built());
    assert_eq!(road.label().line_nodes()[0].text(), "AB");
}

#[test]
fn reattach_resets_alignment() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    road.rotate_right(&mut surface);
    road.on_remove(&mut surface);
    assert_eq!(surface.element_count(), 0);
    road.on_remove(&mut surface);
    assert_eq!(surface.element_count(), 0);

    road.on_add(&mut surface);
    assert_eq!(road.label().alignment(), Alignment::Deg0);
    assert!(road.label().is_built());
}

#[test]
fn surfaces_without_vector_text_get_no_label() {
    let mut surface = surface().with_vector_text(false);
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    assert!(!road.label().is_built());
    assert_eq!(surface.element_count(), 1);
}

#[test]
fn dy_defaults_to_stroke_width() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    let text = *road.label().text_node().expect("built");
    assert_eq!(surface.attribute(&text, "dy").as_deref(), Some("5"));

    road.set_text(
        &mut surface,
        "AB",
        TextOptions::new().with_offset(3.0),
        &ThemeContext::light(),
    );
    road.redraw(&mut surface);
    let text = *road.label().text_node().expect("built");
    assert_eq!(surface.attribute(&text, "dy").as_deref(), Some("3"));
}

#[test]
fn theme_and_overrides_style_the_label() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    road.set_text(&mut surface, "AB", TextOptions::new(), &ThemeContext::dark());
    let text = *road.label().text_node().expect("built");
    assert_eq!(surface.attribute(&text, "fill").as_deref(), Some("#ffffff"));

    road.set_text(
        &mut surface,
        "AB",
        TextOptions::new().with_attribute("fill", "orange"),
        &ThemeContext::dark(),
    );
    road.redraw(&mut surface);
    let text = *road.label().text_node().expect("built");
    assert_eq!(surface.attribute(&text, "fill").as_deref(), Some("orange"));
}

#[test]
fn below_inserts_under_existing_content() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    road.set_text(
        &mut surface,
        "AB",
        TextOptions::new().with_below(true),
        &ThemeContext::light(),
    );
    let text = *road.label().text_node().expect("built");
    assert_eq!(surface.root().first(), Some(&text));

    let mut other = added_road(&mut surface);
    set(&mut other, &mut surface, "C");
    let text = *other.label().text_node().expect("built");
    assert_eq!(surface.root().last(), Some(&text));
}

#[test]
fn clickable_labels_forward_events_to_the_path() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    road.set_text(
        &mut surface,
        "AB\nC",
        TextOptions::new().with_clickable(true),
        &ThemeContext::light(),
    );
    let path = *road.polyline().node().expect("path");
    let tp = text_path(&surface, &road);
    assert!(surface.classes(tp).iter().any(|c| c == CLICKABLE_CLASS));
    let tspan = road.label().line_nodes()[1].node();
    for event in LabelEvent::ALL {
        assert_eq!(surface.dispatch(*tspan, event), vec![path]);
    }
}

#[test]
fn labels_are_not_clickable_by_default() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    let tp = text_path(&surface, &road);
    assert!(!surface.classes(tp).iter().any(|c| c == CLICKABLE_CLASS));
    assert!(surface.dispatch(tp, LabelEvent::Click).is_empty());
}

#[test]
fn bring_to_front_rebuilds_above_the_path() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    let mut other = added_road(&mut surface);
    set(&mut other, &mut surface, "C");

    road.bring_to_front(&mut surface);
    let path = *road.polyline().node().expect("path");
    let text = *road.label().text_node().expect("built");
    let root = surface.root();
    assert_eq!(root[root.len() - 2..], [path, text]);
    assert_eq!(text_elements(&surface), 2);
}

#[test]
fn structural_redraw_replaces_the_tree() {
    let mut surface = surface();
    let mut road = added_road(&mut surface);
    set(&mut road, &mut surface, "AB");
    let before = *road.label().text_node().expect("built");
    road.redraw(&mut surface);
    let after = *road.label().text_node().expect("built");
    assert_ne!(before, after);
    assert_eq!(surface.kind(before), None);
    assert_eq!(text_elements(&surface), 1);
}

#[test]
fn group_broadcast_skips_plain_layers() {
    let mut surface = surface();
    let mut group: LayerGroup<SvgSurface<TableMeasurer>> = LayerGroup::new();
    group
        .add_layer(road())
        .add_layer(Polyline::new(
            LayerId(2),
            [LatLng::new(0.0, 0.0), LatLng::new(5.0, 5.0)],
        ));
    assert_eq!(group.len(), 2);
    group.on_add(&mut surface);
    group.set_text(
        &mut surface,
        "AB",
        TextOptions::default(),
        &ThemeContext::light(),
    );
    assert_eq!(text_elements(&surface), 1);

    let plain = surface
        .root()
        .iter()
        .copied()
        .find(|n| {
            surface.kind(*n) == Some(ElementKind::Path) && surface.attribute(n, "id").is_none()
        })
        .expect("plain path");
    assert_eq!(surface.attribute(&plain, "stroke").as_deref(), Some("#0033ff"));
    assert_eq!(surface.path_points(plain).len(), 2);

    group.on_remove(&mut surface);
    assert_eq!(surface.element_count(), 0);
}

#[test]
fn nested_groups_receive_broadcasts() {
    let mut surface = surface();
    let mut inner: LayerGroup<SvgSurface<TableMeasurer>> = LayerGroup::new();
    inner.add_layer(road());
    let mut outer: LayerGroup<SvgSurface<TableMeasurer>> = LayerGroup::new();
    outer.add_layer(inner);
    outer.on_add(&mut surface);
    outer.set_text(&mut surface, "C", TextOptions::default(), &ThemeContext::light());
    assert_eq!(text_elements(&surface), 1);
}
