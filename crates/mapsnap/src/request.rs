use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde_json::Value;
use zeroize::Zeroize;

use crate::annotation::Annotation;
use crate::encoding::ParamValue;
use crate::error::{MapSnapError, Result};
use crate::types::{Center, ColorScheme, Image, MapType, Overlay, Size, Span};

pub const DEFAULT_SCALE: u8 = 2;
pub const DEFAULT_LANG: &str = "en-US";

/// Everything that goes into one snapshot URL, apart from the signing key.
///
/// `team_id` and `key_id` are wiped when the request is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct MapRequest {
    pub team_id: String,
    pub key_id: String,
    pub center: Center,
    pub zoom: Option<f64>,
    pub span: Option<Span>,
    pub size: Option<Size>,
    pub scale: Option<u8>,
    pub map_type: Option<MapType>,
    pub color_scheme: Option<ColorScheme>,
    pub poi: Option<bool>,
    pub lang: Option<String>,
    pub annotations: Option<Vec<Annotation>>,
    pub overlay: Option<Overlay>,
    pub referer: Option<String>,
    /// Unix timestamp after which the URL stops working.
    pub expires: Option<i64>,
    pub images: Option<Vec<Image>>,
}

impl MapRequest {
    pub fn new(
        team_id: impl Into<String>,
        key_id: impl Into<String>,
        center: impl Into<Center>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            key_id: key_id.into(),
            center: center.into(),
            zoom: None,
            span: None,
            size: None,
            scale: Some(DEFAULT_SCALE),
            map_type: None,
            color_scheme: None,
            poi: None,
            lang: Some(DEFAULT_LANG.to_string()),
            annotations: None,
            overlay: None,
            referer: None,
            expires: None,
            images: None,
        }
    }

    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Pass `None` to leave the scale to the service.
    pub fn scale(mut self, scale: Option<u8>) -> Self {
        self.scale = scale;
        self
    }

    pub fn map_type(mut self, map_type: MapType) -> Self {
        self.map_type = Some(map_type);
        self
    }

    pub fn color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = Some(color_scheme);
        self
    }

    pub fn poi(mut self, poi: bool) -> Self {
        self.poi = Some(poi);
        self
    }

    /// Pass `None` to leave the language to the service.
    pub fn lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    pub fn annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.get_or_insert_with(Vec::new).push(annotation);
        self
    }

    /// Sets the annotation list, even when `annotations` is empty.
    pub fn annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        self.annotations
            .get_or_insert_with(Vec::new)
            .extend(annotations);
        self
    }

    pub fn overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    pub fn expires(mut self, timestamp: i64) -> Self {
        self.expires = Some(timestamp);
        self
    }

    pub fn expires_at(self, at: DateTime<Utc>) -> Self {
        self.expires(at.timestamp())
    }

    pub fn images(mut self, images: Vec<Image>) -> Self {
        self.images = Some(images);
        self
    }

    /// Checks the mandatory fields and cross-references before signing.
    pub fn validate(&self) -> Result<()> {
        if self.team_id.trim().is_empty() {
            return Err(MapSnapError::Configuration("teamId is empty".into()));
        }
        if self.key_id.trim().is_empty() {
            return Err(MapSnapError::Configuration("keyId is empty".into()));
        }
        self.center.validate()?;

        let image_count = self.images.as_ref().map_or(0, Vec::len);
        for (position, annotation) in self.annotations.iter().flatten().enumerate() {
            if let Some(idx) = annotation.img_idx {
                if idx >= image_count {
                    return Err(MapSnapError::Configuration(format!(
                        "annotation {position} references image {idx} but only {image_count} images are set"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Field table in the order the fields are sent. The signing key is not
    /// part of the request and can never appear here.
    pub fn fields(&self) -> Result<[(&'static str, Option<ParamValue<'_>>); 16]> {
        let center = match &self.center {
            Center::Address(address) => ParamValue::Text(Cow::Borrowed(address)),
            Center::Coordinate { latitude, longitude } => {
                ParamValue::List(vec![latitude.to_string(), longitude.to_string()])
            }
        };
        let annotations = self.annotations.as_deref().map(ParamValue::Annotations);
        let overlays = match &self.overlay {
            Some(overlay) => Some(ParamValue::Json(Value::Array(vec![
                serde_json::to_value(overlay)?,
            ]))),
            None => None,
        };
        let images = match &self.images {
            Some(images) => Some(ParamValue::Json(serde_json::to_value(images)?)),
            None => None,
        };

        Ok([
            ("teamId", Some(ParamValue::Text(Cow::Borrowed(&self.team_id)))),
            ("keyId", Some(ParamValue::Text(Cow::Borrowed(&self.key_id)))),
            ("center", Some(center)),
            ("z", self.zoom.map(ParamValue::Number)),
            ("spn", self.span.map(ParamValue::text)),
            ("size", self.size.map(ParamValue::text)),
            ("scale", self.scale.map(|s| ParamValue::Integer(s.into()))),
            ("t", self.map_type.map(|t| ParamValue::Variant(t.as_str()))),
            (
                "colorScheme",
                self.color_scheme.map(|c| ParamValue::Variant(c.as_str())),
            ),
            ("poi", self.poi.map(ParamValue::Flag)),
            ("lang", self.lang.as_deref().map(|l| ParamValue::Text(Cow::Borrowed(l)))),
            ("annotations", annotations),
            ("overlays", overlays),
            (
                "referer",
                self.referer.as_deref().map(|r| ParamValue::Text(Cow::Borrowed(r))),
            ),
            ("expires", self.expires.map(ParamValue::Integer)),
            ("imgs", images),
        ])
    }
}

impl Drop for MapRequest {
    fn drop(&mut self) {
        self.team_id.zeroize();
        self.key_id.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MapRequest {
        MapRequest::new("TEAM123456", "KEY7890123", (40.7128, -74.006))
    }

    #[test]
    fn new_applies_service_defaults() {
        let request = request();
        assert_eq!(request.scale, Some(2));
        assert_eq!(request.lang.as_deref(), Some("en-US"));
        assert!(request.annotations.is_none());
    }

    #[test]
    fn validate_rejects_missing_identifiers() {
        let err = MapRequest::new("", "KEY", "Paris").validate().unwrap_err();
        assert!(matches!(err, MapSnapError::Configuration(ref msg) if msg.contains("teamId")));

        let err = MapRequest::new("TEAM", " ", "Paris").validate().unwrap_err();
        assert!(matches!(err, MapSnapError::Configuration(ref msg) if msg.contains("keyId")));
    }

    #[test]
    fn validate_rejects_bad_center() {
        let err = MapRequest::new("TEAM", "KEY", "").validate().unwrap_err();
        assert!(matches!(err, MapSnapError::Configuration(_)));
    }

    #[test]
    fn validate_rejects_dangling_image_index() {
        let request = request().annotation(Annotation::new().image(0));
        assert!(request.validate().is_err());

        let request = request.images(vec![Image {
            height: 32,
            url: "https://example.com/pin.png".into(),
            width: 32,
        }]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn annotations_setter_marks_list_present_even_when_empty() {
        let request = request().annotations(Vec::new());
        assert_eq!(request.annotations, Some(Vec::new()));

        let request = request.annotation(Annotation::new()).annotation(Annotation::new());
        assert_eq!(request.annotations.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn expires_at_uses_unix_seconds() {
        let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(request().expires_at(at).expires, Some(1_700_000_000));
    }

    #[test]
    fn field_table_is_in_wire_order() {
        let request = request();
        let names: Vec<_> = request.fields().unwrap().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "teamId", "keyId", "center", "z", "spn", "size", "scale", "t", "colorScheme",
                "poi", "lang", "annotations", "overlays", "referer", "expires", "imgs",
            ]
        );
    }
}
