//! Viewport presets for the live preview.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePreview {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl DevicePreview {
    pub const ALL: [DevicePreview; 3] = [
        DevicePreview::Desktop,
        DevicePreview::Tablet,
        DevicePreview::Mobile,
    ];

    /// Nominal viewport width in CSS pixels. Desktop is unconstrained.
    pub fn viewport_width(self) -> Option<u32> {
        match self {
            DevicePreview::Desktop => None,
            DevicePreview::Tablet => Some(768),
            DevicePreview::Mobile => Some(375),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DevicePreview::Desktop => "desktop",
            DevicePreview::Tablet => "tablet",
            DevicePreview::Mobile => "mobile",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase();
        DevicePreview::ALL
            .into_iter()
            .find(|device| device.as_str() == normalized)
    }
}

impl fmt::Display for DevicePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
