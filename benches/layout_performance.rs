//! Layout and export micro-benchmarks
//!
//! Measures text wrapping and pagination for growing documents, and the full
//! compose-and-emit path with a fixed-size diagram raster.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use folio::diagram::{DiagramError, DiagramScene, Rasterizer};
use folio::layout::{LayoutEngine, PageSet, PageState};
use folio::types::RasterImage;
use folio::{Block, Document, ExportPipelineBuilder, PageGeometry, StyledRun};
use std::hint::black_box;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
struct BlankRasterizer;

impl Rasterizer for BlankRasterizer {
    async fn rasterize(&self, _scene: &DiagramScene) -> Result<RasterImage, DiagramError> {
        RasterImage::from_rgba(800, 400, vec![255; 800 * 400 * 4]).ok_or(DiagramError::Allocation(800, 400))
    }
}

/// `count` paragraphs of mixed-style prose.
fn prose(count: usize) -> Document {
    (0..count)
        .map(|i| Block::Paragraph {
            runs: vec![
                StyledRun::normal(format!("Paragraph {i} opens with a plain sentence that is long enough to wrap once or twice across the content width. ")),
                StyledRun::new("Bold emphasis follows", folio::RunStyle::Bold),
                StyledRun::normal(" and the paragraph ends."),
            ],
        })
        .collect()
}

fn benchmark_layout_paragraphs(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_paragraphs");
    let engine = LayoutEngine::new(PageGeometry::default()).expect("default geometry is valid");

    for count in [10, 100, 1000] {
        let doc = prose(count);
        group.bench_with_input(BenchmarkId::new("blocks", count), &count, |b, _| {
            b.iter(|| {
                let geometry = *engine.geometry();
                let mut pages = PageSet::new(geometry);
                let mut state = PageState::new(&geometry);
                engine.layout_blocks(black_box(&doc.blocks), &mut state, &mut pages);
                pages
            });
        });
    }

    group.finish();
}

fn benchmark_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_with_diagram");
    let rt = Runtime::new().expect("Failed to create Tokio runtime");
    let pipeline = ExportPipelineBuilder::new()
        .build_with_rasterizer(BlankRasterizer)
        .expect("Failed to build pipeline");
    let scene = DiagramScene::default();

    for count in [10, 100] {
        let doc = prose(count);
        group.bench_with_input(BenchmarkId::new("blocks", count), &count, |b, _| {
            b.iter(|| {
                rt.block_on(async {
                    pipeline
                        .export_document(black_box(&doc), Some(&scene))
                        .await
                        .expect("Failed to export")
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_layout_paragraphs, benchmark_export);
criterion_main!(benches);
