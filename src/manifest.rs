//! Fixed-content manifests written next to each theme's icons.
//!
//! Both files only reference catalog file names, which are the same for every
//! flavor and theme, so their contents never change.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::TILE_IMAGE;
use crate::error::Result;

pub const WEB_MANIFEST: &str = "site.webmanifest";
pub const BROWSER_CONFIG: &str = "browserconfig.xml";

// ============================================================================
// Web manifest
// ============================================================================

/// One entry of the manifest's `icons` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub purpose: String,
}

impl ManifestIcon {
    fn png(src: &str, edge: u32, purpose: &str) -> Self {
        Self {
            src: src.to_owned(),
            sizes: format!("{edge}x{edge}"),
            mime_type: "image/png".to_owned(),
            purpose: purpose.to_owned(),
        }
    }
}

/// The web app manifest.
///
/// # JSON Format
///
/// ```json
/// {
///   "icons": [
///     { "src": "android-chrome-192x192.png", "sizes": "192x192", "type": "image/png", "purpose": "any" }
///   ],
///   "display": "standalone"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WebManifest {
    pub icons: Vec<ManifestIcon>,
    pub display: String,
}

impl Default for WebManifest {
    fn default() -> Self {
        Self {
            icons: vec![
                ManifestIcon::png("android-chrome-192x192.png", 192, "any"),
                ManifestIcon::png("android-chrome-512x512.png", 512, "any"),
                ManifestIcon::png("maskable-icon-512x512.png", 512, "maskable"),
            ],
            display: "standalone".to_owned(),
        }
    }
}

impl WebManifest {
    /// Serializes the manifest to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// ============================================================================
// Browser config
// ============================================================================

/// Renders `browserconfig.xml`.
pub fn browser_config() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<browserconfig>
  <msapplication>
    <tile>
      <square150x150logo src="{TILE_IMAGE}"/>
    </tile>
  </msapplication>
</browserconfig>
"#
    )
}

/// Writes both manifests into `dir`.
pub fn write_manifests(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let mut json = WebManifest::default().to_json_pretty()?;
    json.push('\n');
    fs::write(dir.join(WEB_MANIFEST), json)?;
    fs::write(dir.join(BROWSER_CONFIG), browser_config())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::asset;

    #[test]
    fn manifest_lists_three_catalog_icons() {
        let manifest = WebManifest::default();
        assert_eq!(manifest.icons.len(), 3);
        for icon in &manifest.icons {
            let spec = asset(&icon.src).expect("manifest icon must be in the catalog");
            assert_eq!(icon.sizes, spec.size.to_string());
        }
        let purposes: Vec<_> = manifest.icons.iter().map(|i| i.purpose.as_str()).collect();
        assert_eq!(purposes, ["any", "any", "maskable"]);
    }

    #[test]
    fn manifest_uses_type_key() {
        let json = WebManifest::default().to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"image/png\""));
        assert!(!json.contains("mime_type"));

        let restored = WebManifest::from_json(&json).unwrap();
        assert_eq!(restored, WebManifest::default());
    }

    #[test]
    fn browser_config_names_the_tile() {
        let xml = browser_config();
        assert!(xml.contains(r#"<square150x150logo src="mstile-150x150.png"/>"#));
        assert!(asset(TILE_IMAGE).is_some());
    }

    #[test]
    fn manifests_are_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path()).unwrap();

        let json = fs::read_to_string(dir.path().join(WEB_MANIFEST)).unwrap();
        assert_eq!(WebManifest::from_json(&json).unwrap(), WebManifest::default());
        assert_eq!(
            fs::read_to_string(dir.path().join(BROWSER_CONFIG)).unwrap(),
            browser_config()
        );
    }
}
