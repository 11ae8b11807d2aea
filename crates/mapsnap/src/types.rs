use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapSnapError;

/// Declares a closed set of variants that each serialize to one fixed string.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// The exact value sent to the snapshot service.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = MapSnapError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok(Self::$variant),)+
                    other => Err(MapSnapError::Configuration(format!(
                        "unknown {} '{other}'",
                        stringify!($name)
                    ))),
                }
            }
        }
    };
}

string_enum! {
    /// Base map rendering, sent as `t`.
    MapType {
        Standard => "standard",
        Hybrid => "hybrid",
        Satellite => "satellite",
        MutedStandard => "mutedStandard",
    }
}

string_enum! {
    ColorScheme {
        Light => "light",
        Dark => "dark",
    }
}

string_enum! {
    /// Shape of an annotation marker.
    MarkerStyle {
        Dot => "dot",
        Balloon => "balloon",
        Large => "large",
        Img => "img",
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::Balloon
    }
}

/// Where the map is centered: a free-form address or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Center {
    Address(String),
    Coordinate { latitude: f64, longitude: f64 },
}

impl Center {
    pub fn address(address: impl Into<String>) -> Self {
        Self::Address(address.into())
    }

    pub fn coordinate(latitude: f64, longitude: f64) -> Self {
        Self::Coordinate { latitude, longitude }
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        match self {
            Self::Address(address) if address.trim().is_empty() => Err(
                MapSnapError::Configuration("center address is empty".into()),
            ),
            Self::Address(_) => Ok(()),
            Self::Coordinate { latitude, longitude } => {
                if !latitude.is_finite() || !(-90.0..=90.0).contains(latitude) {
                    return Err(MapSnapError::Configuration(format!(
                        "center latitude {latitude} is out of range"
                    )));
                }
                if !longitude.is_finite() || !(-180.0..=180.0).contains(longitude) {
                    return Err(MapSnapError::Configuration(format!(
                        "center longitude {longitude} is out of range"
                    )));
                }
                Ok(())
            }
        }
    }
}

impl From<&str> for Center {
    fn from(address: &str) -> Self {
        Self::Address(address.to_string())
    }
}

impl From<String> for Center {
    fn from(address: String) -> Self {
        Self::Address(address)
    }
}

impl From<(f64, f64)> for Center {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::Coordinate { latitude, longitude }
    }
}

/// Visible region around the center, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Span {
    pub fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self {
            latitude_delta,
            longitude_delta,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude_delta, self.longitude_delta)
    }
}

/// Image size in points, rendered as `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = MapSnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MapSnapError::Configuration(format!("size '{s}' is not WIDTHxHEIGHT"));
        let (width, height) = s.split_once('x').ok_or_else(invalid)?;
        Ok(Self {
            width: width.trim().parse().map_err(|_| invalid())?,
            height: height.trim().parse().map_err(|_| invalid())?,
        })
    }
}

/// Pixel offset of an annotation from its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A polyline drawn over the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// Path vertices, each `"latitude,longitude"` or an address.
    pub points: Vec<String>,
    pub stroke_color: String,
    pub line_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_dash: Option<Vec<u32>>,
}

/// Custom marker image, referenced from annotations by index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub height: u32,
    pub url: String,
    pub width: u32,
}
