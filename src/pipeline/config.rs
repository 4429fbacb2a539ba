use crate::error::ExportError;
use folio_diagram::RasterConfig;
use folio_types::PageGeometry;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FILE_NAME: &str = "document.pdf";
pub const DEFAULT_DIAGRAM_HEADING: &str = "Flowchart";

/// Settings for one export pipeline, loadable from camelCase JSON.
///
/// ```json
/// { "geometry": { "margin": 15 }, "raster": { "pixelRatio": 2 }, "fileName": "notes.pdf" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub geometry: PageGeometry,
    pub raster: RasterConfig,
    pub diagram_heading: String,
    pub file_name: String,
    /// Flate-compress page content streams.
    pub compress: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            raster: RasterConfig::default(),
            diagram_heading: DEFAULT_DIAGRAM_HEADING.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            compress: true,
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!("Failed to read config from '{}': {}", path.display(), e))
        })?;
        Self::from_json(&source)
    }

    pub fn validate(&self) -> Result<(), ExportError> {
        self.geometry.validate().map_err(ExportError::Config)?;
        self.raster.validate().map_err(ExportError::Config)?;
        if self.file_name.trim().is_empty() {
            return Err(ExportError::Config("file name must not be empty".to_string()));
        }
        if self.file_name.contains(['/', '\\']) {
            return Err(ExportError::Config(format!(
                "file name must not contain a path separator: '{}'",
                self.file_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ExportConfig::from_json(
            r#"{"geometry": {"margin": 15}, "raster": {"pixelRatio": 2}, "fileName": "notes.pdf"}"#,
        )
        .unwrap();
        assert_eq!(config.geometry.margin, 15.0);
        assert_eq!(config.geometry.page_width, 210.0);
        assert_eq!(config.raster.pixel_ratio, 2.0);
        assert_eq!(config.raster.timeout_ms, 10_000);
        assert_eq!(config.diagram_heading, "Flowchart");
        assert_eq!(config.file_name, "notes.pdf");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_values_are_config_errors() {
        let mut config = ExportConfig::default();
        config.geometry.margin = 200.0;
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));

        let config = ExportConfig {
            file_name: "../escape.pdf".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));
    }
}
