use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height. Zero when the height is zero.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0.0 {
            0.0
        } else {
            self.width / self.height
        }
    }
}

/// Fixed page metrics shared by layout and rendering.
///
/// Lengths (`page_width`, `page_height`, `margin`, `line_height`) are in
/// millimetres; font sizes are in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub line_height: f32,
    pub header_font_size: f32,
    pub body_font_size: f32,
}

impl Default for PageGeometry {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 10.0,
            line_height: 10.0,
            header_font_size: 16.0,
            body_font_size: 12.0,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.page_height - 2.0 * self.margin
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.page_width, self.page_height)
    }

    /// Page size converted to PDF points.
    pub fn page_size_pt(&self) -> Size {
        Size::new(self.page_width * MM_TO_PT, self.page_height * MM_TO_PT)
    }

    /// Returns a description of the first non-positive dimension, if any.
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            ("pageWidth", self.page_width),
            ("pageHeight", self.page_height),
            ("lineHeight", self.line_height),
            ("headerFontSize", self.header_font_size),
            ("bodyFontSize", self.body_font_size),
            ("contentWidth", self.content_width()),
            ("contentHeight", self.content_height()),
        ];
        for (name, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if self.margin < 0.0 {
            return Err(format!("margin must not be negative, got {}", self.margin));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_content_area() {
        let geometry = PageGeometry::default();
        assert_eq!(geometry.content_width(), 190.0);
        assert_eq!(geometry.content_height(), 277.0);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn margins_wider_than_page_are_rejected() {
        let geometry = PageGeometry {
            margin: 120.0,
            ..PageGeometry::default()
        };
        let err = geometry.validate().unwrap_err();
        assert!(err.contains("contentWidth"), "{err}");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let geometry: PageGeometry = serde_json::from_str(r#"{"margin": 15}"#).unwrap();
        assert_eq!(geometry.margin, 15.0);
        assert_eq!(geometry.page_width, 210.0);
    }
}
