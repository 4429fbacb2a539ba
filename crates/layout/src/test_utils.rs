use crate::{LayoutEngine, LineSink, PageSet, PageState, PositionedElement};
use folio_types::{Block, PageGeometry, RunStyle, StyledRun};

/// Records every call the engine makes on its sink.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub page_starts: Vec<usize>,
    pub writes: Vec<(usize, PositionedElement)>,
    current_page: usize,
}

impl LineSink for RecordingSink {
    fn start_page(&mut self, index: usize) {
        self.page_starts.push(index);
        self.current_page = index;
    }

    fn push(&mut self, element: PositionedElement) {
        self.writes.push((self.current_page, element));
    }
}

pub fn create_test_engine() -> LayoutEngine {
    LayoutEngine::new(PageGeometry::default()).unwrap()
}

/// Lays out `blocks` on fresh A4 pages.
pub fn paginate_blocks(blocks: &[Block]) -> (PageSet, PageState) {
    let engine = create_test_engine();
    let mut pages = PageSet::new(*engine.geometry());
    let mut state = PageState::new(engine.geometry());
    engine.layout_blocks(blocks, &mut state, &mut pages);
    (pages, state)
}

pub fn paragraph(text: &str) -> Block {
    Block::Paragraph {
        runs: vec![StyledRun::new(text, RunStyle::Normal)],
    }
}

/// A paragraph that wraps into many lines at body size.
pub fn long_paragraph(sentences: usize) -> Block {
    let text = (0..sentences)
        .map(|i| format!("Sentence number {i} keeps the paragraph growing across the page."))
        .collect::<Vec<_>>()
        .join(" ");
    paragraph(&text)
}
