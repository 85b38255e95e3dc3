//! Request documents.
//!
//! The top level must be valid JSON; individual slides are validated one at a
//! time so that a bad slide only costs that slide.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A parsed request before per-unit validation.
#[derive(Debug, Clone, Default)]
pub struct DocumentRequest {
    cover: Option<Value>,
    slides: Vec<Value>,
}

/// A validated cover slide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverSlide {
    /// Template component name.
    pub template: String,
    /// Headline, auto-fitted.
    pub headline: Option<String>,
    /// Section label, uppercased.
    pub section: Option<String>,
    /// Image for the `Dom media` layer.
    pub cover_image_url: Option<String>,
    /// Author name.
    pub name: Option<String>,
    /// Author position.
    pub position: Option<String>,
}

/// A validated content slide.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentSlide {
    /// Template component name.
    pub template: String,
    /// Texts for header then quote slots.
    pub texts: Vec<String>,
    /// Speaker name.
    pub speaker: Option<String>,
    /// Speaker position.
    pub position: Option<String>,
    /// Image for the `Background image` layer.
    pub background_image_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCover {
    template: Option<String>,
    headline: Option<String>,
    section: Option<String>,
    cover_image_url: Option<String>,
    name: Option<String>,
    position: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSlide {
    template: Option<String>,
    texts: Option<Value>,
    speaker: Option<String>,
    position: Option<String>,
    background_image_url: Option<String>,
}

/// Treat empty strings as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl DocumentRequest {
    /// Parse a request document.
    ///
    /// Only unparsable JSON is an error. A `slides` value that is not an
    /// array, or a top level that is not an object, yields no units.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|e| Error::MalformedInput(e.to_string()))?;
        let cover = value.get("coverSlide").filter(|v| !v.is_null()).cloned();
        let slides = value
            .get("slides")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        Ok(Self { cover, slides })
    }

    /// The cover, validated.
    pub fn cover(&self) -> Option<Result<CoverSlide>> {
        self.cover.as_ref().map(|v| CoverSlide::from_value(v.clone()))
    }

    /// Content slides in input order, each validated with its 1-based index.
    pub fn slides(&self) -> impl Iterator<Item = (usize, Result<ContentSlide>)> + '_ {
        self.slides
            .iter()
            .enumerate()
            .map(|(i, v)| (i + 1, ContentSlide::from_value(i + 1, v.clone())))
    }
}

impl CoverSlide {
    fn from_value(value: Value) -> Result<Self> {
        let raw: RawCover = serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("Cover slide is invalid: {e}")))?;
        let template = present(raw.template)
            .ok_or_else(|| Error::Validation("Cover slide missing \"template\" field".to_string()))?;
        Ok(Self {
            template,
            headline: present(raw.headline),
            section: present(raw.section),
            cover_image_url: present(raw.cover_image_url),
            name: present(raw.name),
            position: present(raw.position),
        })
    }
}

impl ContentSlide {
    fn from_value(index: usize, value: Value) -> Result<Self> {
        let raw: RawSlide = serde_json::from_value(value)
            .map_err(|e| Error::Validation(format!("Slide {index} is invalid: {e}")))?;
        let template = present(raw.template)
            .ok_or_else(|| Error::Validation(format!("Slide {index} missing \"template\" field")))?;
        let missing_texts = || Error::Validation(format!("Slide {index} missing \"texts\" array"));
        let texts = match raw.texts {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(Error::Validation(format!("Slide {index} has a non-string text: {other}"))),
                })
                .collect::<Result<Vec<_>>>()?,
            _ => return Err(missing_texts()),
        };
        Ok(Self {
            template,
            texts,
            speaker: present(raw.speaker),
            position: present(raw.position),
            background_image_url: present(raw.background_image_url),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn malformed_json_is_fatal() {
        let err = DocumentRequest::from_json("{slides:").unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn parses_cover_and_slides() {
        let req = DocumentRequest::from_json(
            r#"{
                "coverSlide": { "template": "News cover 1", "headline": "Big news",
                                "section": "news", "coverImageUrl": "https://x/c.jpg" },
                "slides": [
                    { "template": "Two chunk quote", "texts": ["a", "**b**"],
                      "speaker": "Ada", "position": "", "backgroundImageUrl": "https://x/b.png" }
                ]
            }"#,
        )
        .unwrap();

        let cover = req.cover().unwrap().unwrap();
        assert_eq!(cover.template, "News cover 1");
        assert_eq!(cover.section.as_deref(), Some("news"));
        assert_eq!(cover.name, None);

        let slides: Vec<_> = req.slides().collect();
        assert_eq!(slides.len(), 1);
        let (index, slide) = &slides[0];
        let slide = slide.as_ref().unwrap();
        assert_eq!(*index, 1);
        assert_eq!(slide.texts, vec!["a", "**b**"]);
        assert_eq!(slide.speaker.as_deref(), Some("Ada"));
        assert_eq!(slide.position, None);
    }

    #[test]
    fn missing_template_names_the_slide() {
        let req = DocumentRequest::from_json(r#"{"slides":[{"template":"T","texts":[]},{"texts":["x"]}]}"#).unwrap();
        let results: Vec<_> = req.slides().collect();
        assert!(results[0].1.is_ok());
        let err = results[1].1.as_ref().unwrap_err().to_string();
        assert_eq!(err, "Slide 2 missing \"template\" field");
    }

    #[test]
    fn texts_must_be_an_array() {
        for body in [r#"{"template":"T"}"#, r#"{"template":"T","texts":"x"}"#] {
            let req = DocumentRequest::from_json(&format!(r#"{{"slides":[{body}]}}"#)).unwrap();
            let (_, result) = req.slides().next().unwrap();
            assert_eq!(result.unwrap_err().to_string(), "Slide 1 missing \"texts\" array");
        }
    }

    #[test]
    fn non_array_slides_and_null_cover_yield_nothing() {
        let req = DocumentRequest::from_json(r#"{"coverSlide": null, "slides": "nope"}"#).unwrap();
        assert!(req.cover().is_none());
        assert_eq!(req.slides().count(), 0);

        let req = DocumentRequest::from_json("[1, 2]").unwrap();
        assert!(req.cover().is_none());
        assert_eq!(req.slides().count(), 0);
    }

    #[test]
    fn cover_without_template_is_invalid() {
        let req = DocumentRequest::from_json(r#"{"coverSlide": {"headline": "x"}}"#).unwrap();
        let err = req.cover().unwrap().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
