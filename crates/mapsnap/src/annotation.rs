use std::borrow::Cow;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::encoding::ParamValue;
use crate::error::Result;
use crate::types::{MarkerStyle, Offset};

fn default_point() -> String {
    "center".to_string()
}

/// A marker placed on the map.
///
/// Deserializes from the same camelCase field names it is sent under, so
/// annotation lists can be read straight from JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub glyph_text: Option<String>,
    #[serde(default)]
    pub marker_style: MarkerStyle,
    /// Anchor: `"center"`, `"latitude,longitude"` or an address.
    #[serde(default = "default_point")]
    pub point: String,
    /// Index into the request's image list, for `MarkerStyle::Img`.
    #[serde(default)]
    pub img_idx: Option<usize>,
    #[serde(default)]
    pub offset: Option<Offset>,
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            color: None,
            glyph_text: None,
            marker_style: MarkerStyle::default(),
            point: default_point(),
            img_idx: None,
            offset: None,
        }
    }
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(point: impl Into<String>) -> Self {
        Self {
            point: point.into(),
            ..Self::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn glyph_text(mut self, text: impl Into<String>) -> Self {
        self.glyph_text = Some(text.into());
        self
    }

    pub fn marker_style(mut self, style: MarkerStyle) -> Self {
        self.marker_style = style;
        self
    }

    pub fn image(mut self, index: usize) -> Self {
        self.marker_style = MarkerStyle::Img;
        self.img_idx = Some(index);
        self
    }

    pub fn offset(mut self, offset: Offset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Field table in the order the fields are sent.
    pub fn fields(&self) -> [(&'static str, Option<ParamValue<'_>>); 6] {
        [
            ("color", self.color.as_deref().map(|c| ParamValue::Text(Cow::Borrowed(c)))),
            (
                "glyphText",
                self.glyph_text.as_deref().map(|t| ParamValue::Text(Cow::Borrowed(t))),
            ),
            ("markerStyle", Some(ParamValue::Variant(self.marker_style.as_str()))),
            ("point", Some(ParamValue::Text(Cow::Borrowed(&self.point)))),
            ("imgIdx", self.img_idx.map(|idx| ParamValue::Integer(idx as i64))),
            (
                "offset",
                self.offset
                    .map(|o| ParamValue::List(vec![o.x.to_string(), o.y.to_string()])),
            ),
        ]
    }

    /// The JSON object for this annotation, containing only present fields.
    pub fn to_json(&self) -> Result<Map<String, Value>> {
        let mut object = Map::new();
        for (name, value) in self.fields() {
            if let Some(value) = value {
                object.insert(name.to_string(), value.to_json()?);
            }
        }
        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_service_defaults() {
        let annotation = Annotation::new();
        assert_eq!(annotation.marker_style, MarkerStyle::Balloon);
        assert_eq!(annotation.point, "center");
        assert_eq!(
            Value::Object(annotation.to_json().unwrap()),
            json!({"markerStyle": "balloon", "point": "center"})
        );
    }

    #[test]
    fn absent_fields_are_skipped() {
        let annotation = Annotation::new().color("red").marker_style(MarkerStyle::Dot);
        let json = serde_json::to_string(&annotation.to_json().unwrap()).unwrap();
        assert_eq!(json, r#"{"color":"red","markerStyle":"dot","point":"center"}"#);
    }

    #[test]
    fn all_fields_encode_in_declaration_order() {
        let annotation = Annotation::at("37.3349,-122.009")
            .color("00ff00")
            .glyph_text("A")
            .image(1)
            .offset(Offset::new(0, -12));
        let json = serde_json::to_string(&annotation.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            r#"{"color":"00ff00","glyphText":"A","markerStyle":"img","point":"37.3349,-122.009","imgIdx":1,"offset":"0,-12"}"#
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let annotation = Annotation::new().color("blue").glyph_text("B");
        assert_eq!(annotation.to_json().unwrap(), annotation.to_json().unwrap());
    }

    #[test]
    fn deserializes_with_defaults() {
        let annotation: Annotation = serde_json::from_str(r#"{"color":"red"}"#).unwrap();
        assert_eq!(annotation, Annotation::new().color("red"));
    }
}
