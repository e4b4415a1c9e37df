// src/flowchart.rs

//! Flowchart rendering: a directed graph laid out with a force-directed
//! simulation and rasterized as circles, arrows and labels.

use crate::canvas::{ArtifactImage, Canvas, MarkAlign, TextMark};
use crate::color::Color;
use crate::error::ArtifactError;
use crate::scheme::ColorPalette;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::Rng;
use std::collections::HashMap;

/// Width of the placed flowchart box on the page, in points.
pub const FLOWCHART_WIDTH_PT: f32 = 420.0;
pub const FLOWCHART_HEIGHT_PT: f32 = 315.0;

const PX_W: u32 = 1500;
const PX_H: u32 = 1125;

// Area the node centers are mapped into, leaving room for the circles
// themselves and the title line.
const NODE_LEFT: f32 = 170.0;
const NODE_RIGHT: f32 = 1330.0;
const NODE_TOP: f32 = 240.0;
const NODE_BOTTOM: f32 = 975.0;

const NODE_RADIUS: f32 = 90.0;

#[derive(Debug, Clone)]
pub struct FlowchartSpec {
    pub title: String,
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl FlowchartSpec {
    pub fn new(title: String, nodes: Vec<String>, edges: Vec<(String, String)>) -> Self {
        Self { title, nodes, edges }
    }
}

/// Render a flowchart spec into an embeddable raster.
///
/// The graph is built from the edge list alone; identifiers that appear only
/// in `nodes` do not create vertices. When the display label list matches the
/// vertex count, labels replace identifiers in registration order.
pub fn render_flowchart(
    spec: &FlowchartSpec,
    palette: &ColorPalette,
) -> Result<ArtifactImage, ArtifactError> {
    let graph = build_graph(&spec.edges);
    if graph.node_count() == 0 {
        return Err(ArtifactError::EmptyGraph);
    }

    let positions = spring_layout(&graph);
    let centers: Vec<(f32, f32)> = positions
        .iter()
        .map(|&(x, y)| {
            (
                NODE_LEFT + x * (NODE_RIGHT - NODE_LEFT),
                NODE_TOP + y * (NODE_BOTTOM - NODE_TOP),
            )
        })
        .collect();

    let mut canvas = Canvas::new(PX_W, PX_H, Color::WHITE);

    canvas.text(TextMark {
        x: PX_W as f32 / 2.0,
        y: 100.0,
        text: spec.title.clone(),
        size: 16.0,
        color: palette.text,
        bold: true,
        align: MarkAlign::Center,
        rotated: false,
    });

    for edge in graph.edge_references() {
        let (sx, sy) = centers[edge.source().index()];
        let (tx, ty) = centers[edge.target().index()];
        draw_arrow(&mut canvas, sx, sy, tx, ty, palette.primary);
    }

    let relabel = spec.nodes.len() == graph.node_count();
    for (i, identifier) in graph.node_weights().enumerate() {
        let (cx, cy) = centers[i];
        canvas.fill_circle(cx, cy, NODE_RADIUS, palette.accent);
        canvas.stroke_circle(cx, cy, NODE_RADIUS, 5.0, palette.primary);

        let label = if relabel { &spec.nodes[i] } else { identifier };
        canvas.text(TextMark {
            x: cx,
            y: cy + 3.0,
            text: label.clone(),
            size: 9.0,
            color: Color::WHITE,
            bold: true,
            align: MarkAlign::Center,
            rotated: false,
        });
    }

    Ok(canvas.finish())
}

fn build_graph(edges: &[(String, String)]) -> DiGraph<String, ()> {
    let mut graph = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for (from, to) in edges {
        let a = *index
            .entry(from.as_str())
            .or_insert_with(|| graph.add_node(from.clone()));
        let b = *index
            .entry(to.as_str())
            .or_insert_with(|| graph.add_node(to.clone()));
        graph.add_edge(a, b, ());
    }
    graph
}

/// Fruchterman-Reingold layout over the unit square.
fn spring_layout(graph: &DiGraph<String, ()>) -> Vec<(f32, f32)> {
    let n = graph.node_count();
    if n == 1 {
        return vec![(0.5, 0.5)];
    }

    const K: f32 = 3.0;
    const ITERATIONS: usize = 50;

    let mut rng = rand::rng();
    let mut pos: Vec<(f32, f32)> = (0..n)
        .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
        .collect();

    let mut temperature = 0.1_f32;
    let cooling = temperature / (ITERATIONS as f32 + 1.0);

    for _ in 0..ITERATIONS {
        let mut disp = vec![(0.0_f32, 0.0_f32); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = K * K / dist;
                let (ux, uy) = (dx / dist, dy / dist);
                disp[i].0 += ux * force;
                disp[i].1 += uy * force;
                disp[j].0 -= ux * force;
                disp[j].1 -= uy * force;
            }
        }

        for edge in graph.edge_references() {
            let (i, j) = (edge.source().index(), edge.target().index());
            let dx = pos[i].0 - pos[j].0;
            let dy = pos[i].1 - pos[j].1;
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = dist * dist / K;
            let (ux, uy) = (dx / dist, dy / dist);
            disp[i].0 -= ux * force;
            disp[i].1 -= uy * force;
            disp[j].0 += ux * force;
            disp[j].1 += uy * force;
        }

        for i in 0..n {
            let (dx, dy) = disp[i];
            let len = (dx * dx + dy * dy).sqrt().max(0.01);
            let step = len.min(temperature);
            pos[i].0 += dx / len * step;
            pos[i].1 += dy / len * step;
        }
        temperature -= cooling;
    }

    rescale_unit(&mut pos);
    pos
}

/// Min-max rescale positions per axis into [0, 1].
fn rescale_unit(pos: &mut [(f32, f32)]) {
    let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
    let (mut min_y, mut max_y) = (f32::MAX, f32::MIN);
    for &(x, y) in pos.iter() {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let span_x = (max_x - min_x).max(0.01);
    let span_y = (max_y - min_y).max(0.01);
    for p in pos.iter_mut() {
        p.0 = (p.0 - min_x) / span_x;
        p.1 = (p.1 - min_y) / span_y;
    }
}

fn draw_arrow(canvas: &mut Canvas, sx: f32, sy: f32, tx: f32, ty: f32, color: Color) {
    let dx = tx - sx;
    let dy = ty - sy;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 1.0 {
        return;
    }
    let (ux, uy) = (dx / dist, dy / dist);

    // trim the segment to the circle edges, arrowhead tip at the target rim
    let x0 = sx + ux * NODE_RADIUS;
    let y0 = sy + uy * NODE_RADIUS;
    let tip_x = tx - ux * NODE_RADIUS;
    let tip_y = ty - uy * NODE_RADIUS;

    const ARROW_LEN: f32 = 32.0;
    const ARROW_HALF: f32 = 16.0;
    let base_x = tip_x - ux * ARROW_LEN;
    let base_y = tip_y - uy * ARROW_LEN;

    canvas.draw_line(x0, y0, base_x, base_y, 6.0, color);
    canvas.fill_triangle(
        [
            (tip_x, tip_y),
            (base_x - uy * ARROW_HALF, base_y + ux * ARROW_HALF),
            (base_x + uy * ARROW_HALF, base_y - ux * ARROW_HALF),
        ],
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::resolve_scheme;

    fn edges(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn graph_vertices_come_from_edges_only() {
        let g = build_graph(&edges(&[("start", "check"), ("check", "end"), ("check", "start")]));
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn vertices_register_in_first_seen_order() {
        let g = build_graph(&edges(&[("b", "a"), ("a", "c")]));
        let names: Vec<&str> = g.node_weights().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn empty_edge_list_is_rejected() {
        let palette = resolve_scheme("professional").unwrap();
        let spec = FlowchartSpec::new("Flow".into(), vec!["start".into()], vec![]);
        assert!(matches!(
            render_flowchart(&spec, palette),
            Err(ArtifactError::EmptyGraph)
        ));
    }

    #[test]
    fn labels_replace_identifiers_when_counts_match() {
        let palette = resolve_scheme("professional").unwrap();
        let spec = FlowchartSpec::new(
            "Flow".into(),
            vec!["Start".into(), "End".into()],
            edges(&[("s", "e")]),
        );
        let img = render_flowchart(&spec, palette).unwrap();
        let texts: Vec<&str> = img.marks.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&"Start"));
        assert!(texts.contains(&"End"));
        assert!(!texts.contains(&"s"));
    }

    #[test]
    fn identifiers_are_kept_when_label_count_differs() {
        let palette = resolve_scheme("professional").unwrap();
        let spec = FlowchartSpec::new(
            "Flow".into(),
            vec!["Only one".into()],
            edges(&[("alpha", "beta")]),
        );
        let img = render_flowchart(&spec, palette).unwrap();
        let texts: Vec<&str> = img.marks.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&"alpha"));
        assert!(texts.contains(&"beta"));
    }

    #[test]
    fn layout_positions_stay_in_unit_square() {
        let g = build_graph(&edges(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "a")]));
        let pos = spring_layout(&g);
        assert_eq!(pos.len(), 4);
        for (x, y) in pos {
            assert!((0.0..=1.0).contains(&x));
            assert!((0.0..=1.0).contains(&y));
        }
    }

    #[test]
    fn single_vertex_sits_at_center() {
        let g = build_graph(&edges(&[("a", "a")]));
        assert_eq!(spring_layout(&g), vec![(0.5, 0.5)]);
    }
}
