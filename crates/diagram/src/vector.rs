use crate::scene::{DiagramScene, ElementKind, SceneElement};
use log::{debug, warn};
use svg::Document;
use svg::node::Text as SvgText;
use svg::node::element::{self as svg_element, Group};

const LINE_HEIGHT_FACTOR: f32 = 1.25;
const ARROWHEAD_LENGTH: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgExportOptions {
    /// Paint the scene's view background behind the elements.
    pub background: bool,
    /// Space added around the union of element bounds, in scene units.
    pub padding: f32,
}

impl Default for SvgExportOptions {
    fn default() -> Self {
        Self {
            background: false,
            padding: 10.0,
        }
    }
}

/// Bounding box of every visible element, padded. Origin is at the top left.
/// A scene with nothing to draw yields a padding-only box around the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

pub fn scene_view_box(scene: &DiagramScene, padding: f32) -> ViewBox {
    let (min_x, min_y, max_x, max_y) = scene
        .visible_elements()
        .filter(|el| el.kind() != ElementKind::Other)
        .map(SceneElement::bounds)
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
        .unwrap_or((0.0, 0.0, 0.0, 0.0));

    ViewBox {
        x: min_x - padding,
        y: min_y - padding,
        width: (max_x - min_x) + 2.0 * padding,
        height: (max_y - min_y) + 2.0 * padding,
    }
}

/// Renders the visible elements of `scene` as a standalone SVG document.
pub fn export_to_svg(scene: &DiagramScene, options: &SvgExportOptions) -> String {
    let view = scene_view_box(scene, options.padding);

    let mut doc = Document::new()
        .set("viewBox", (view.x, view.y, view.width, view.height))
        .set("width", view.width)
        .set("height", view.height);

    if options.background {
        doc = doc.add(
            svg_element::Rectangle::new()
                .set("x", view.x)
                .set("y", view.y)
                .set("width", view.width)
                .set("height", view.height)
                .set("fill", scene.app_state.view_background_color.as_str()),
        );
    }

    let mut drawn = 0usize;
    for element in scene.visible_elements() {
        if let Some(group) = render_element(scene, element) {
            doc = doc.add(group);
            drawn += 1;
        }
    }
    debug!(
        "Exported {drawn} scene elements to a {:.1}x{:.1} SVG",
        view.width, view.height
    );

    doc.to_string()
}

fn render_element(scene: &DiagramScene, el: &SceneElement) -> Option<Group> {
    let mut group = Group::new().set("opacity", (el.opacity / 100.0).clamp(0.0, 1.0));
    if el.angle != 0.0 {
        let (cx, cy) = (el.x + el.width / 2.0, el.y + el.height / 2.0);
        group = group.set(
            "transform",
            format!("rotate({} {} {})", el.angle.to_degrees(), cx, cy),
        );
    }

    let group = match el.kind() {
        ElementKind::Rectangle => {
            let mut rect = svg_element::Rectangle::new()
                .set("x", el.x)
                .set("y", el.y)
                .set("width", el.width)
                .set("height", el.height);
            if el.is_rounded() {
                let radius = (el.width.min(el.height) * 0.25).min(32.0);
                rect = rect.set("rx", radius).set("ry", radius);
            }
            group.add(apply_stroke(rect, el, true))
        }
        ElementKind::Ellipse => {
            let ellipse = svg_element::Ellipse::new()
                .set("cx", el.x + el.width / 2.0)
                .set("cy", el.y + el.height / 2.0)
                .set("rx", el.width / 2.0)
                .set("ry", el.height / 2.0);
            group.add(apply_stroke(ellipse, el, true))
        }
        ElementKind::Diamond => {
            let (x, y, w, h) = (el.x, el.y, el.width, el.height);
            let points = format!(
                "{},{} {},{} {},{} {},{}",
                x + w / 2.0,
                y,
                x + w,
                y + h / 2.0,
                x + w / 2.0,
                y + h,
                x,
                y + h / 2.0
            );
            group.add(apply_stroke(svg_element::Polygon::new().set("points", points), el, true))
        }
        ElementKind::Line | ElementKind::Arrow | ElementKind::Freedraw => {
            if el.points.len() < 2 {
                return None;
            }
            let path = svg_element::Path::new()
                .set("d", polyline_data(el))
                .set("stroke-linecap", "round")
                .set("stroke-linejoin", "round");
            let closed = el.kind() == ElementKind::Line && is_closed(&el.points);
            let mut group = group.add(apply_stroke(path, el, closed));
            if el.kind() == ElementKind::Arrow {
                if let Some(head) = el.end_arrowhead.as_deref() {
                    let n = el.points.len();
                    group = group.add(arrowhead(el, head, el.points[n - 2], el.points[n - 1]));
                }
                if let Some(head) = el.start_arrowhead.as_deref() {
                    group = group.add(arrowhead(el, head, el.points[1], el.points[0]));
                }
            }
            group
        }
        ElementKind::Text => group.add(render_text(el)),
        ElementKind::Image => {
            let file_id = el.file_id.as_deref()?;
            let Some(file) = scene.files.get(file_id) else {
                warn!("Image element '{}' references missing file '{file_id}'", el.id);
                return None;
            };
            group.add(
                svg_element::Image::new()
                    .set("x", el.x)
                    .set("y", el.y)
                    .set("width", el.width)
                    .set("height", el.height)
                    .set("preserveAspectRatio", "none")
                    .set("href", file.data_url.as_str()),
            )
        }
        ElementKind::Other => {
            debug!("Skipping unsupported scene element '{}' ({})", el.id, el.kind);
            return None;
        }
    };
    Some(group)
}

fn apply_stroke<T>(node: T, el: &SceneElement, fillable: bool) -> T
where
    T: StrokeAttrs,
{
    let fill = if fillable && el.background_color != "transparent" {
        el.background_color.as_str()
    } else {
        "none"
    };
    let mut node = node
        .with("fill", fill)
        .with("stroke", el.stroke_color.as_str())
        .with("stroke-width", el.stroke_width);
    if let Some(dash) = dash_array(&el.stroke_style, el.stroke_width) {
        node = node.with("stroke-dasharray", dash);
    }
    node
}

/// Uniform `set` over the element types drawn with a stroke.
trait StrokeAttrs: Sized {
    fn with<V: Into<svg::node::Value>>(self, name: &str, value: V) -> Self;
}

macro_rules! impl_stroke_attrs {
    ($($ty:ty),*) => {
        $(impl StrokeAttrs for $ty {
            fn with<V: Into<svg::node::Value>>(self, name: &str, value: V) -> Self {
                self.set(name, value)
            }
        })*
    };
}

impl_stroke_attrs!(
    svg_element::Rectangle,
    svg_element::Ellipse,
    svg_element::Polygon,
    svg_element::Path
);

fn dash_array(style: &str, stroke_width: f32) -> Option<String> {
    match style {
        "dashed" => Some(format!("{},{}", 8.0, 8.0 + stroke_width)),
        "dotted" => Some(format!("{},{}", 1.5, 6.0 + stroke_width)),
        _ => None,
    }
}

fn polyline_data(el: &SceneElement) -> String {
    el.points
        .iter()
        .enumerate()
        .map(|(i, [px, py])| {
            let cmd = if i == 0 { 'M' } else { 'L' };
            format!("{cmd} {} {}", el.x + px, el.y + py)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_closed(points: &[[f32; 2]]) -> bool {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) if points.len() > 2 => (a[0] - b[0]).abs() < 1e-3 && (a[1] - b[1]).abs() < 1e-3,
        _ => false,
    }
}

/// Draws an arrowhead at `tip`, pointing away from `from`.
fn arrowhead(el: &SceneElement, style: &str, from: [f32; 2], tip: [f32; 2]) -> Group {
    let (tx, ty) = (el.x + tip[0], el.y + tip[1]);
    let (dx, dy) = (tip[0] - from[0], tip[1] - from[1]);
    let len = (dx * dx + dy * dy).sqrt();
    let group = Group::new();
    if len == 0.0 {
        return group;
    }
    let (ux, uy) = (dx / len, dy / len);
    let size = ARROWHEAD_LENGTH.min(len / 2.0).max(el.stroke_width * 2.0);

    // Wings sit 30 degrees off the shaft.
    let (sin, cos) = (0.5f32, 0.866_025_4f32);
    let wing = |sign: f32| {
        let rx = ux * cos - sign * uy * sin;
        let ry = sign * ux * sin + uy * cos;
        (tx - rx * size, ty - ry * size)
    };
    let (l, r) = (wing(1.0), wing(-1.0));

    match style {
        "triangle" => group.add(
            svg_element::Polygon::new()
                .set("points", format!("{},{} {},{} {},{}", tx, ty, l.0, l.1, r.0, r.1))
                .set("fill", el.stroke_color.as_str())
                .set("stroke", el.stroke_color.as_str())
                .set("stroke-width", el.stroke_width),
        ),
        "dot" | "circle" => group.add(
            svg_element::Circle::new()
                .set("cx", tx)
                .set("cy", ty)
                .set("r", size / 3.0)
                .set("fill", el.stroke_color.as_str()),
        ),
        "bar" => {
            let half = size / 2.0;
            group.add(
                svg_element::Line::new()
                    .set("x1", tx - uy * half)
                    .set("y1", ty + ux * half)
                    .set("x2", tx + uy * half)
                    .set("y2", ty - ux * half)
                    .set("stroke", el.stroke_color.as_str())
                    .set("stroke-width", el.stroke_width),
            )
        }
        _ => group.add(
            svg_element::Path::new()
                .set("d", format!("M {} {} L {} {} L {} {}", l.0, l.1, tx, ty, r.0, r.1))
                .set("fill", "none")
                .set("stroke", el.stroke_color.as_str())
                .set("stroke-width", el.stroke_width)
                .set("stroke-linecap", "round")
                .set("stroke-linejoin", "round"),
        ),
    }
}

fn render_text(el: &SceneElement) -> svg_element::Text {
    let (anchor, x) = match el.text_align.as_str() {
        "center" => ("middle", el.x + el.width / 2.0),
        "right" => ("end", el.x + el.width),
        _ => ("start", el.x),
    };
    let family = match el.font_family {
        3 => "Cascadia, monospace",
        _ => "Helvetica, Arial, sans-serif",
    };
    let line_height = el.font_size * LINE_HEIGHT_FACTOR;

    let mut text = svg_element::Text::new("")
        .set("x", x)
        .set("y", el.y)
        .set("text-anchor", anchor)
        .set("font-family", family)
        .set("font-size", el.font_size)
        .set("fill", el.stroke_color.as_str());

    for (i, line) in el.text.lines().enumerate() {
        let baseline = el.y + el.font_size + i as f32 * line_height;
        text = text.add(
            svg_element::TSpan::new("")
                .set("x", x)
                .set("y", baseline)
                .add(SvgText::new(line)),
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{BinaryFile, DiagramScene};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> SceneElement {
        SceneElement {
            id: "r".into(),
            kind: "rectangle".into(),
            x,
            y,
            width: w,
            height: h,
            stroke_width: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn empty_scene_exports_padding_only() {
        let padding_only = ViewBox {
            x: -10.0,
            y: -10.0,
            width: 20.0,
            height: 20.0,
        };
        assert_eq!(scene_view_box(&DiagramScene::default(), 10.0), padding_only);

        let mut deleted = rect(0.0, 0.0, 10.0, 10.0);
        deleted.is_deleted = true;
        let scene = DiagramScene {
            elements: vec![deleted],
            ..Default::default()
        };
        assert_eq!(scene_view_box(&scene, 10.0), padding_only);

        let svg = export_to_svg(&scene, &SvgExportOptions::default());
        assert!(svg.contains(r#"viewBox="-10 -10 20 20""#));
    }

    #[test]
    fn view_box_is_union_of_bounds_plus_padding() {
        let scene = DiagramScene {
            elements: vec![rect(0.0, 0.0, 100.0, 50.0), rect(150.0, 80.0, 50.0, 20.0)],
            ..Default::default()
        };
        let view = scene_view_box(&scene, 10.0);
        assert_eq!(
            view,
            ViewBox {
                x: -10.0,
                y: -10.0,
                width: 220.0,
                height: 120.0
            }
        );
    }

    #[test]
    fn background_is_painted_only_when_requested() {
        let mut scene = DiagramScene {
            elements: vec![rect(0.0, 0.0, 10.0, 10.0)],
            ..Default::default()
        };
        scene.app_state.view_background_color = "#abcdef".into();

        let without = export_to_svg(&scene, &SvgExportOptions::default());
        assert!(!without.contains("#abcdef"));

        let with = export_to_svg(
            &scene,
            &SvgExportOptions {
                background: true,
                padding: 10.0,
            },
        );
        assert!(with.contains("#abcdef"));
    }

    #[test]
    fn shapes_text_and_images_are_emitted() {
        let mut files = std::collections::BTreeMap::new();
        files.insert(
            "f1".to_string(),
            BinaryFile {
                id: "f1".into(),
                mime_type: "image/png".into(),
                data_url: "data:image/png;base64,AAAA".into(),
            },
        );
        let scene = DiagramScene {
            elements: vec![
                rect(0.0, 0.0, 10.0, 10.0),
                SceneElement {
                    kind: "arrow".into(),
                    x: 20.0,
                    points: vec![[0.0, 0.0], [40.0, 0.0]],
                    end_arrowhead: Some("arrow".into()),
                    ..Default::default()
                },
                SceneElement {
                    kind: "text".into(),
                    text: "Start & <end>\nsecond".into(),
                    width: 80.0,
                    height: 50.0,
                    ..Default::default()
                },
                SceneElement {
                    kind: "image".into(),
                    width: 30.0,
                    height: 30.0,
                    file_id: Some("f1".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };

        let svg = export_to_svg(&scene, &SvgExportOptions::default());
        assert!(svg.contains("<rect"));
        assert!(svg.contains("<path"));
        assert!(svg.contains("<tspan"));
        assert!(svg.contains("second"));
        assert!(!svg.contains("<end>"));
        assert!(svg.contains("data:image/png;base64,AAAA"));
    }

    #[test]
    fn dashed_strokes_get_a_dash_array() {
        assert_eq!(dash_array("dashed", 2.0).as_deref(), Some("8,10"));
        assert!(dash_array("solid", 2.0).is_none());
    }
}
