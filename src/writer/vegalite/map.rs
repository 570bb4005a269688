//! Marker and choropleth map specs on a mercator projection.

use crate::naming;
use crate::present::{ChoroplethMap, MapFrame, MarkerMap};
use serde_json::{json, Value};

/// Pixels spanned by the world at zoom 0 in web map tiles.
const TILE_SIZE: f64 = 256.0;

const MARKER_COLOR: &str = "#1f4e79";
const CLUSTER_COLOR: &str = "#3186cc";

/// Mercator projection matching a web map at `frame.zoom`. Without a zoom
/// there is no `scale`, and Vega-Lite fits the projection to the data.
fn projection(frame: &MapFrame) -> Value {
    let mut projection = json!({ "type": "mercator" });
    if let Some(zoom) = frame.zoom {
        projection["scale"] =
            json!(TILE_SIZE * 2f64.powi(i32::from(zoom)) / (2.0 * std::f64::consts::PI));
    }
    if let Some(center) = frame.center {
        projection["center"] = json!([center.lon, center.lat]);
    }
    projection
}

pub(super) fn marker_spec(schema: &str, map: &MarkerMap) -> Value {
    let clusters: Vec<Value> = map
        .clusters
        .iter()
        .map(|c| {
            json!({
                "lat": c.center.lat,
                "lon": c.center.lon,
                "count": c.members.len(),
            })
        })
        .collect();
    let markers: Vec<Value> = map
        .markers
        .iter()
        .map(|m| {
            json!({
                "lat": m.position.lat,
                "lon": m.position.lon,
                "label": m.label,
            })
        })
        .collect();

    json!({
        "$schema": schema,
        "width": "container",
        "height": 400,
        "projection": projection(&map.frame),
        "layer": [
            {
                "data": { "values": clusters },
                "mark": { "type": "circle", "color": CLUSTER_COLOR, "opacity": 0.4 },
                "encoding": {
                    "longitude": { "field": "lon", "type": "quantitative" },
                    "latitude": { "field": "lat", "type": "quantitative" },
                    "size": {
                        "field": "count",
                        "type": "quantitative",
                        "title": "Sales",
                        "scale": { "range": [200, 2000] },
                    },
                    "tooltip": [{ "field": "count", "type": "quantitative", "title": "Sales" }],
                },
            },
            {
                "data": { "values": markers },
                "mark": { "type": "circle", "color": MARKER_COLOR, "size": 40, "opacity": 1 },
                "encoding": {
                    "longitude": { "field": "lon", "type": "quantitative" },
                    "latitude": { "field": "lat", "type": "quantitative" },
                    "tooltip": [{ "field": "label", "type": "nominal", "title": "Sale" }],
                },
            },
        ],
    })
}

pub(super) fn choropleth_spec(schema: &str, map: &ChoroplethMap) -> Value {
    let features: Vec<Value> = map
        .regions
        .iter()
        .map(|r| {
            json!({
                "type": "Feature",
                "geometry": r.geometry,
                "properties": {
                    (naming::LABEL_ZIP): r.zip,
                    (naming::LABEL_PRICE): r.value,
                    "fill": r.fill,
                },
            })
        })
        .collect();

    let price_field = format!("properties.{}", naming::LABEL_PRICE);
    let legend = json!({ "title": map.legend });
    let fill = match map.classes.as_slice() {
        [] => json!({ "field": price_field, "type": "quantitative", "legend": legend }),
        [class] => json!({
            "field": price_field,
            "type": "quantitative",
            "scale": {
                "domain": [class.lower, class.upper],
                "range": [class.color, class.color],
            },
            "legend": legend,
        }),
        classes => {
            // Same class boundaries as the precomputed fills
            let domain: Vec<f64> = classes[..classes.len() - 1].iter().map(|c| c.upper).collect();
            let range: Vec<&str> = classes.iter().map(|c| c.color.as_str()).collect();
            json!({
                "field": price_field,
                "type": "quantitative",
                "scale": { "type": "threshold", "domain": domain, "range": range },
                "legend": legend,
            })
        }
    };

    json!({
        "$schema": schema,
        "width": "container",
        "height": 400,
        "projection": projection(&map.frame),
        "data": { "values": features },
        "mark": {
            "type": "geoshape",
            "fillOpacity": map.fill_opacity,
            "stroke": "#000000",
            "strokeOpacity": map.line_opacity,
        },
        "encoding": {
            "fill": fill,
            "tooltip": [
                { "field": format!("properties.{}", naming::LABEL_ZIP), "type": "nominal", "title": naming::LABEL_ZIP },
                { "field": price_field, "type": "quantitative", "title": map.legend, "format": ",.0f" },
            ],
        },
    })
}
