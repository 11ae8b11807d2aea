use tracing::debug;
use url::form_urlencoded;

use crate::error::Result;
use crate::request::MapRequest;

/// Serializes a request into the canonical form-encoded query string.
///
/// Absent fields are left out entirely. The output is byte-for-byte what
/// gets signed, so the same request always yields the same string.
pub fn encode_query(request: &MapRequest) -> Result<String> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in request.fields()? {
        if let Some(value) = value {
            serializer.append_pair(name, &value.render()?);
        }
    }
    let query = serializer.finish();
    debug!(len = query.len(), "encoded snapshot query");
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;
    use crate::error::MapSnapError;
    use crate::types::{ColorScheme, Image, MapType, MarkerStyle, Overlay, Size, Span};

    fn base() -> MapRequest {
        MapRequest::new("TEAM", "KEY", "40.7128,-74.0060")
            .zoom(14.0)
            .map_type(MapType::Standard)
    }

    fn params(query: &str) -> Vec<(String, String)> {
        form_urlencoded::parse(query.as_bytes()).into_owned().collect()
    }

    #[test]
    fn encodes_worked_example() {
        let query = encode_query(&base()).unwrap();
        assert_eq!(
            query,
            "teamId=TEAM&keyId=KEY&center=40.7128%2C-74.0060&z=14&scale=2&t=standard&lang=en-US"
        );
        assert!(!query.contains("annotations"));
    }

    #[test]
    fn absent_fields_are_omitted() {
        let request = MapRequest::new("TEAM", "KEY", "Paris")
            .scale(None)
            .lang(None);
        assert_eq!(encode_query(&request).unwrap(), "teamId=TEAM&keyId=KEY&center=Paris");
    }

    #[test]
    fn coordinate_center_is_comma_joined() {
        let request = MapRequest::new("TEAM", "KEY", (37.3349, -122.009)).scale(None).lang(None);
        assert_eq!(
            encode_query(&request).unwrap(),
            "teamId=TEAM&keyId=KEY&center=37.3349%2C-122.009"
        );
    }

    #[test]
    fn spaces_encode_as_plus() {
        let request = MapRequest::new("TEAM", "KEY", "1 Infinite Loop, Cupertino");
        let query = encode_query(&request).unwrap();
        assert!(query.contains("center=1+Infinite+Loop%2C+Cupertino"));
    }

    #[test]
    fn every_field_type_encodes() {
        let request = base()
            .span(Span::new(0.05, 0.05))
            .size(Size::new(600, 400))
            .color_scheme(ColorScheme::Dark)
            .poi(false)
            .referer("https://example.com")
            .expires(1_700_000_000)
            .overlay(Overlay {
                points: vec!["40.71,-74.00".into(), "40.72,-74.01".into()],
                stroke_color: "ff0000".into(),
                line_width: 3,
                line_dash: Some(vec![10, 5]),
            })
            .images(vec![Image {
                height: 20,
                url: "https://example.com/pin.png".into(),
                width: 10,
            }])
            .annotation(Annotation::new().image(0));

        let params = params(&encode_query(&request).unwrap());
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };
        assert_eq!(get("spn"), "0.05,0.05");
        assert_eq!(get("size"), "600x400");
        assert_eq!(get("colorScheme"), "dark");
        assert_eq!(get("poi"), "0");
        assert_eq!(get("expires"), "1700000000");
        assert_eq!(
            get("overlays"),
            r#"[{"points":["40.71,-74.00","40.72,-74.01"],"strokeColor":"ff0000","lineWidth":3,"lineDash":[10,5]}]"#
        );
        assert_eq!(get("imgs"), r#"[{"height":20,"url":"https://example.com/pin.png","width":10}]"#);
        assert_eq!(
            get("annotations"),
            r#"[{"markerStyle":"img","point":"center","imgIdx":0}]"#
        );
    }

    #[test]
    fn annotations_embed_as_json_array() {
        let request = base()
            .annotation(Annotation::new().color("red").marker_style(MarkerStyle::Dot));
        let query = encode_query(&request).unwrap();
        assert!(query.contains(
            "annotations=%5B%7B%22color%22%3A%22red%22%2C%22markerStyle%22%3A%22dot%22%2C%22point%22%3A%22center%22%7D%5D"
        ));

        let params = params(&query);
        let (_, annotations) = params.iter().find(|(k, _)| k == "annotations").unwrap();
        assert_eq!(annotations, r#"[{"color":"red","markerStyle":"dot","point":"center"}]"#);
    }

    #[test]
    fn empty_annotation_list_is_sent_as_empty_array() {
        let request = MapRequest::new("T", "K", "Paris")
            .scale(None)
            .lang(None)
            .annotations(Vec::new())
            .images(vec![]);
        assert_eq!(
            encode_query(&request).unwrap(),
            "teamId=T&keyId=K&center=Paris&annotations=%5B%5D&imgs=%5B%5D"
        );
    }

    #[test]
    fn non_finite_zoom_is_a_serialization_error() {
        let request = base().zoom(f64::NAN);
        assert!(matches!(
            encode_query(&request),
            Err(MapSnapError::Serialization(_))
        ));
    }

    #[test]
    fn encoding_is_deterministic() {
        let request = base().annotation(Annotation::new().glyph_text("Z"));
        assert_eq!(encode_query(&request).unwrap(), encode_query(&request).unwrap());
    }
}
