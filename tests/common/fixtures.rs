use folio::diagram::DiagramScene;
use folio::{Block, Document, StyledRun};
use serde_json::{Value, json};

pub fn paragraph(text: &str) -> Block {
    Block::Paragraph {
        runs: vec![StyledRun::normal(text)],
    }
}

pub fn header(text: &str) -> Block {
    Block::Header {
        text: text.to_string(),
    }
}

pub fn list(items: &[&str]) -> Block {
    Block::ListBlock {
        items: items.iter().map(|s| s.to_string()).collect(),
    }
}

/// A paragraph of `words` distinct short words.
pub fn long_paragraph(words: usize) -> Block {
    let text = (0..words)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    paragraph(&text)
}

pub fn document(blocks: Vec<Block>) -> Document {
    Document::new(blocks)
}

/// Saved editor output with one block of each kind.
pub fn editor_json() -> Value {
    json!({
        "time": 1_700_000_000_000u64,
        "version": "2.28.2",
        "blocks": [
            {"id": "h1", "type": "header", "data": {"text": "Release plan", "level": 2}},
            {"id": "p1", "type": "paragraph", "data": {"text": "Ship <b>Friday</b> after <i>review</i>"}},
            {"id": "l1", "type": "list", "data": {"style": "unordered", "items": ["build", "test"]}},
            {"id": "q1", "type": "quote", "data": {"text": "Measure twice", "caption": ""}}
        ]
    })
}

/// Two connected boxes.
pub fn scene_json() -> Value {
    json!({
        "type": "excalidraw",
        "version": 2,
        "elements": [
            {"id": "a", "type": "rectangle", "x": 0, "y": 0, "width": 160, "height": 80,
             "strokeColor": "#1e1e1e", "backgroundColor": "#a5d8ff", "strokeWidth": 2,
             "roundness": {"type": 3}},
            {"id": "b", "type": "ellipse", "x": 240, "y": 0, "width": 160, "height": 80,
             "strokeColor": "#1e1e1e", "backgroundColor": "transparent", "strokeWidth": 2},
            {"id": "c", "type": "arrow", "x": 160, "y": 40, "width": 80, "height": 0,
             "points": [[0, 0], [80, 0]], "endArrowhead": "arrow", "strokeWidth": 2},
            {"id": "d", "type": "rectangle", "x": 0, "y": 0, "width": 5000, "height": 5000,
             "isDeleted": true}
        ],
        "appState": {"viewBackgroundColor": "#ffffff"},
        "files": {}
    })
}

pub fn scene() -> DiagramScene {
    DiagramScene::from_json(&scene_json().to_string()).expect("fixture scene is valid")
}
