// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Labeled-road demo for `textpath_core`.
//!
//! Writes `textpath_demo.svg`. Set `RUST_LOG=textpath_core=debug` to follow
//! the layout passes.

use peniko::color::palette::css;
use textpath_core::{
    AffineProjection, LabelEvent, LatLng, Layer, LayerGroup, LayerId, NodeId, PathOptions,
    Polyline, SvgSurface, TextOptions, TextPolyline, ThemeContext,
};
use textpath_text::TextMeasurer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

const DARK_BASEMAPS: &[&str] = &["dark_matter", "satellite"];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let basemap = std::env::args().nth(1).unwrap_or_else(|| "positron".into());
    let theme = ThemeContext::from_basemap(&basemap, DARK_BASEMAPS);
    info!(basemap = theme.basemap(), dark = theme.is_dark(), "rendering");

    let svg = render(demo_measurer(), &theme);
    std::fs::write("textpath_demo.svg", svg).expect("write textpath_demo.svg");
    println!("wrote textpath_demo.svg");
}

#[cfg(feature = "parley")]
fn demo_measurer() -> textpath_text_parley::ParleyTextMeasurer {
    textpath_text_parley::ParleyTextMeasurer::new()
}

#[cfg(not(feature = "parley"))]
fn demo_measurer() -> textpath_text::HeuristicTextMeasurer {
    textpath_text::HeuristicTextMeasurer
}

fn render<M: TextMeasurer>(measurer: M, theme: &ThemeContext) -> String {
    let projection = AffineProjection::equirectangular(LatLng::new(51.51, -0.13), 4000.0);
    let mut surface = SvgSurface::new(measurer, projection);

    // A plain route, drawn with its stroke.
    let mut route = Polyline::new(
        LayerId(1),
        [
            LatLng::new(51.500, -0.150),
            LatLng::new(51.505, -0.135),
            LatLng::new(51.502, -0.120),
        ],
    )
    .with_options(
        PathOptions::default()
            .with_stroke_width(3.0)
            .with_color(css::STEEL_BLUE),
    );
    route.on_add(&mut surface);

    // Street names share one style and are set through the group.
    let mut streets: LayerGroup<SvgSurface<M>> = LayerGroup::new();
    streets
        .add_layer(street(2, (51.515, -0.145), (51.515, -0.125)))
        .add_layer(street(3, (51.520, -0.140), (51.518, -0.128)));
    streets.on_add(&mut surface);
    streets.set_text(
        &mut surface,
        "Oxford Street",
        TextOptions::new().with_attribute("font-size", "14"),
        theme,
    );

    // A clickable two-line label, turned to read bottom to top.
    let mut park = TextPolyline::new(Polyline::new(
        LayerId(4),
        [LatLng::new(51.505, -0.165), LatLng::new(51.510, -0.160)],
    ));
    park.on_add(&mut surface);
    park.set_text(
        &mut surface,
        "Hyde Park\nWest Carriage Drive",
        TextOptions::new()
            .with_attribute("font-size", "12")
            .with_attribute("font-style", "italic")
            .with_clickable(true),
        theme,
    );
    park.rotate_right(&mut surface);
    park.redraw(&mut surface);

    if let (Some(text), Some(path)) = (park.label().text_node(), park.polyline().node()) {
        let forwarded = surface.dispatch(*text, LabelEvent::Click);
        info!(
            forwarded = forwarded.contains(path),
            "park label click reaches its path"
        );
    }

    surface.to_svg_string()
}

fn street(id: u64, from: (f64, f64), to: (f64, f64)) -> TextPolyline<NodeId> {
    TextPolyline::new(Polyline::new(LayerId(id), [from.into(), to.into()]))
}
