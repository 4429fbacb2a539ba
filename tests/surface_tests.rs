mod common;

use common::fixtures::*;
use common::{GeneratedPdf, TestResult, fixed_pipeline};
use folio::pipeline::save_to_dir;
use folio::{ExportError, ExportPipelineBuilder, JsonDiagramSurface, JsonEditorSurface};
use std::fs;

#[tokio::test]
async fn test_exports_saved_editor_and_scene_files() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir()?;
    let editor_path = dir.path().join("editor.json");
    let scene_path = dir.path().join("flow.excalidraw");
    fs::write(&editor_path, editor_json().to_string())?;
    fs::write(&scene_path, scene_json().to_string())?;

    let pdf = fixed_pipeline(400, 100)
        .export(
            &JsonEditorSurface::new(&editor_path),
            &JsonDiagramSurface::new(&scene_path),
        )
        .await?;
    let path = save_to_dir(&pdf, dir.path().join("out")).await?;
    assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("document.pdf"));

    let pdf = GeneratedPdf::from_bytes(fs::read(&path)?)?;
    assert_eq!(
        pdf.text_lines()?,
        vec![vec![
            "Release plan".to_string(),
            "Ship".to_string(),
            "Friday".to_string(),
            "after".to_string(),
            "review".to_string(),
            "• build".to_string(),
            "• test".to_string(),
            "Measure twice".to_string(),
            "Flowchart".to_string(),
        ]]
    );
    Ok(())
}

#[tokio::test]
async fn test_malformed_editor_file_is_source_unavailable() -> TestResult {
    let dir = tempfile::tempdir()?;
    let editor_path = dir.path().join("editor.json");
    fs::write(&editor_path, "{\"blocks\": [")?;

    let err = fixed_pipeline(10, 10)
        .export(
            &JsonEditorSurface::new(&editor_path),
            &JsonDiagramSurface::new(dir.path().join("missing.excalidraw")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ExportError::SourceUnavailable(_)));
    Ok(())
}

#[tokio::test]
async fn test_config_file_controls_name_and_geometry() -> TestResult {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("folio.json");
    fs::write(
        &config_path,
        r#"{"geometry": {"pageWidth": 148, "pageHeight": 210}, "fileName": "notes.pdf", "compress": false}"#,
    )?;

    let pipeline = ExportPipelineBuilder::new()
        .with_config_file(&config_path)?
        .build_with_rasterizer(common::FixedRasterizer { width: 10, height: 10 })?;
    let emitted = pipeline
        .export_document(&document(vec![paragraph("small page")]), None)
        .await?;
    assert_eq!(emitted.file_name, "notes.pdf");

    let pdf = GeneratedPdf::from_emitted(emitted)?;
    let (_, page_id) = pdf.doc.get_pages().into_iter().next().expect("one page");
    let media_box = pdf.doc.get_dictionary(page_id)?.get(b"MediaBox")?.as_array()?.clone();
    let width = media_box[2].as_float()?;
    assert!((width - 148.0 * 72.0 / 25.4).abs() < 0.01);
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected_at_build() {
    let result = ExportPipelineBuilder::new()
        .with_file_name("")
        .build_with_rasterizer(common::FixedRasterizer { width: 1, height: 1 });
    assert!(matches!(result, Err(ExportError::Config(_))));
}
