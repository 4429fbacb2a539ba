//! Snapshot of a drawing surface: elements, view state and embedded files.
//!
//! The shape follows the Excalidraw scene JSON (`elements`, `appState`,
//! `files`); unknown fields are ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagramScene {
    pub elements: Vec<SceneElement>,
    pub app_state: AppState,
    pub files: BTreeMap<String, BinaryFile>,
}

impl DiagramScene {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Elements that are drawn, in z-order.
    pub fn visible_elements(&self) -> impl Iterator<Item = &SceneElement> {
        self.elements.iter().filter(|el| !el.is_deleted)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub view_background_color: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view_background_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BinaryFile {
    pub id: String,
    pub mime_type: String,
    #[serde(rename = "dataURL")]
    pub data_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Rectangle,
    Ellipse,
    Diamond,
    Line,
    Arrow,
    Freedraw,
    Text,
    Image,
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneElement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Clockwise rotation around the element centre, in radians.
    pub angle: f32,
    pub stroke_color: String,
    pub background_color: String,
    pub stroke_width: f32,
    pub stroke_style: String,
    /// 0 to 100.
    pub opacity: f32,
    pub roundness: Option<serde_json::Value>,
    pub is_deleted: bool,
    /// Vertices relative to (`x`, `y`) for lines, arrows and freedraw.
    pub points: Vec<[f32; 2]>,
    pub start_arrowhead: Option<String>,
    pub end_arrowhead: Option<String>,
    pub text: String,
    pub font_size: f32,
    pub font_family: u8,
    pub text_align: String,
    pub file_id: Option<String>,
}

impl Default for SceneElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            angle: 0.0,
            stroke_color: "#1e1e1e".to_string(),
            background_color: "transparent".to_string(),
            stroke_width: 1.0,
            stroke_style: "solid".to_string(),
            opacity: 100.0,
            roundness: None,
            is_deleted: false,
            points: Vec::new(),
            start_arrowhead: None,
            end_arrowhead: None,
            text: String::new(),
            font_size: 20.0,
            font_family: 1,
            text_align: "left".to_string(),
            file_id: None,
        }
    }
}

impl SceneElement {
    pub fn kind(&self) -> ElementKind {
        match self.kind.as_str() {
            "rectangle" => ElementKind::Rectangle,
            "ellipse" => ElementKind::Ellipse,
            "diamond" => ElementKind::Diamond,
            "line" => ElementKind::Line,
            "arrow" => ElementKind::Arrow,
            "freedraw" => ElementKind::Freedraw,
            "text" => ElementKind::Text,
            "image" => ElementKind::Image,
            _ => ElementKind::Other,
        }
    }

    pub fn is_rounded(&self) -> bool {
        self.roundness.as_ref().is_some_and(|r| !r.is_null())
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`, rotation included.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let (mut min_x, mut min_y, mut max_x, mut max_y) = if self.points.is_empty() {
            (self.x, self.y, self.x + self.width, self.y + self.height)
        } else {
            self.points.iter().fold(
                (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
                |(x0, y0, x1, y1), [px, py]| {
                    let (px, py) = (self.x + px, self.y + py);
                    (x0.min(px), y0.min(py), x1.max(px), y1.max(py))
                },
            )
        };

        if self.angle != 0.0 {
            let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
            let (sin, cos) = self.angle.sin_cos();
            let corners = [(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)];
            let rotated = corners.map(|(x, y)| {
                let (dx, dy) = (x - cx, y - cy);
                (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
            });
            min_x = rotated.iter().map(|p| p.0).fold(f32::MAX, f32::min);
            min_y = rotated.iter().map(|p| p.1).fold(f32::MAX, f32::min);
            max_x = rotated.iter().map(|p| p.0).fold(f32::MIN, f32::max);
            max_y = rotated.iter().map(|p| p.1).fold(f32::MIN, f32::max);
        }

        // Strokes are centred on the outline.
        let half_stroke = self.stroke_width / 2.0;
        (
            min_x - half_stroke,
            min_y - half_stroke,
            max_x + half_stroke,
            max_y + half_stroke,
        )
    }
}
