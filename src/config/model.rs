//! Typed values and domain structures stored in the configuration document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single setting value, tagged with its declared semantic type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<String>),
    Stashes(Vec<StashPath>),
    StashBoxes(Vec<StashBox>),
    PackageSources(Vec<PackageSource>),
    Json(serde_json::Value),
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<StashPath>> for SettingValue {
    fn from(value: Vec<StashPath>) -> Self {
        Self::Stashes(value)
    }
}

impl From<Vec<StashBox>> for SettingValue {
    fn from(value: Vec<StashBox>) -> Self {
        Self::StashBoxes(value)
    }
}

impl From<Vec<PackageSource>> for SettingValue {
    fn from(value: Vec<PackageSource>) -> Self {
        Self::PackageSources(value)
    }
}

impl From<serde_json::Value> for SettingValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// A library root scanned for media.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashPath {
    /// Directory containing media files.
    pub path: PathBuf,

    /// Skip video files under this root.
    #[serde(default, rename = "excludevideo")]
    pub exclude_video: bool,

    /// Skip image files under this root.
    #[serde(default, rename = "excludeimage")]
    pub exclude_image: bool,
}

/// A remote metadata server used for identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashBox {
    /// GraphQL endpoint of the server.
    pub endpoint: String,

    /// API key presented to the server.
    pub api_key: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Request budget per minute, 0 for the server default.
    #[serde(default)]
    pub max_requests_per_minute: u32,
}

/// A remote index of installable scraper or plugin packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,

    /// Index URL.
    pub url: String,

    /// Directory packages from this source are installed into.
    pub local_path: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $id:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $id)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the identifier stored in the document.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }

            /// Parses a stored identifier.
            pub fn parse(value: &str) -> Option<Self> {
                Self::ALL.iter().find(|v| v.as_str() == value).copied()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Hash used to name generated files.
    HashAlgorithm {
        /// Full-file MD5 digest; requires MD5 calculation during scans.
        Md5 => "MD5",
        /// OpenSubtitles-style sampled hash.
        Oshash => "OSHASH",
    }
}

string_enum! {
    /// Where binary blobs (images, covers) are stored.
    BlobStorageType {
        /// Inside the database.
        Database => "DATABASE",
        /// As files under the blobs path.
        Filesystem => "FILESYSTEM",
    }
}

string_enum! {
    /// Encoder preset used when generating previews.
    PreviewPreset {
        Ultrafast => "ultrafast",
        Veryfast => "veryfast",
        Fast => "fast",
        Medium => "medium",
        Slow => "slow",
        Slower => "slower",
        Veryslow => "veryslow",
    }
}

string_enum! {
    /// Maximum output resolution for transcodes.
    StreamingResolution {
        Low => "LOW",
        Standard => "STANDARD",
        StandardHd => "STANDARD_HD",
        FullHd => "FULL_HD",
        FourK => "FOUR_K",
        Original => "ORIGINAL",
    }
}

string_enum! {
    /// How the image lightbox fits images on screen.
    LightboxDisplayMode {
        Original => "ORIGINAL",
        FitXy => "FIT_XY",
        FitX => "FIT_X",
    }
}

string_enum! {
    /// What scrolling does inside the image lightbox.
    LightboxScrollMode {
        Zoom => "ZOOM",
        PanY => "PAN_Y",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_enums_round_trip_identifiers() {
        assert_eq!(HashAlgorithm::parse("MD5"), Some(HashAlgorithm::Md5));
        assert_eq!(StreamingResolution::FourK.as_str(), "FOUR_K");
        assert_eq!(PreviewPreset::parse("placebo"), None);
    }

    #[test]
    fn setting_value_serializes_untagged() {
        let value = SettingValue::List(vec!["mp4".into(), "mkv".into()]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            serde_json::json!(["mp4", "mkv"])
        );

        let stashes = SettingValue::Stashes(vec![StashPath {
            path: PathBuf::from("/media"),
            exclude_video: false,
            exclude_image: true,
        }]);
        assert_eq!(
            serde_json::to_value(&stashes).unwrap(),
            serde_json::json!([{"path": "/media", "excludevideo": false, "excludeimage": true}])
        );
    }
}
