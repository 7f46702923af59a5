//! Contract with the external image-analysis service.
//!
//! The service itself lives outside this crate. What lives here is the
//! request it receives, the parsing of its free-text model reply into a
//! [`Palette`], and the re-insertion of locked colors into whatever it
//! returns. The call is a single async boundary; timeouts and retries belong
//! to the [`PaletteSource`] implementor or its caller.

use crate::color::Rgb;
use crate::error::SwatchError;
use crate::locks::{LockedColorSet, PinnedColor};
use crate::palette::{Palette, PALETTE_SIZE};
use regex::Regex;
use serde::Deserialize;
use std::future::Future;
use std::sync::OnceLock;
use tracing::debug;

/// Image payload plus the slots the user wants kept.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    image: Vec<u8>,
    mime_type: String,
    locked: Vec<PinnedColor>,
}

impl AnalysisRequest {
    /// Requires a non-empty payload with an `image/*` MIME type.
    pub fn new(
        image: Vec<u8>,
        mime_type: &str,
        locked: Vec<PinnedColor>,
    ) -> Result<Self, SwatchError> {
        if image.is_empty() {
            return Err(SwatchError::InvalidImage("image payload is empty".into()));
        }
        if !mime_type.starts_with("image/") {
            return Err(SwatchError::InvalidImage(format!(
                "expected an image/* content type, got '{mime_type}'"
            )));
        }
        Ok(Self {
            image,
            mime_type: mime_type.to_string(),
            locked,
        })
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn locked(&self) -> &[PinnedColor] {
        &self.locked
    }

    /// Locked pins as the JSON array sent alongside the image.
    pub fn locked_json(&self) -> Result<String, SwatchError> {
        Ok(serde_json::to_string(&self.locked)?)
    }
}

/// Anything that can turn an image into a palette.
pub trait PaletteSource {
    fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> impl Future<Output = Result<Palette, SwatchError>> + Send;
}

#[derive(Deserialize)]
struct ModelReply {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    colors: Vec<ModelColor>,
}

#[derive(Deserialize)]
struct ModelColor {
    hex: String,
}

fn fenced_json() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fenced-json pattern is valid")
    })
}

/// Parses the first JSON value starting at `text`, ignoring whatever follows it.
fn leading_reply(text: &str) -> serde_json::Result<ModelReply> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<ModelReply>()
        .next()
        .unwrap_or_else(|| serde_json::from_str(text))
}

/// Extracts the JSON palette from a model's reply text.
///
/// A ```` ```json ```` fenced block is tried first. Failing that, each `{` in
/// the reply is tried in turn as the start of a palette object, so prose or
/// other code blocks before the JSON are skipped. The reply must name exactly
/// five valid hex colors.
pub fn parse_model_response(text: &str) -> Result<Palette, SwatchError> {
    let fenced = fenced_json()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    let candidates = fenced
        .into_iter()
        .chain(text.match_indices('{').map(|(i, _)| &text[i..]));

    let mut last_error = None;
    let mut found = None;
    for candidate in candidates {
        match leading_reply(candidate) {
            Ok(reply) => {
                found = Some(reply);
                break;
            }
            Err(e) => last_error = Some(e),
        }
    }
    let reply = found.ok_or_else(|| match last_error {
        Some(e) => SwatchError::AnalysisResponse(format!("could not parse palette data: {e}")),
        None => SwatchError::AnalysisResponse("no JSON found in reply".into()),
    })?;

    if reply.colors.len() != PALETTE_SIZE {
        return Err(SwatchError::AnalysisResponse(format!(
            "expected {PALETTE_SIZE} colors, got {}",
            reply.colors.len()
        )));
    }

    let colors = reply
        .colors
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Rgb::from_hex(&c.hex)
                .map_err(|e| SwatchError::AnalysisResponse(format!("color {i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let name = match reply.name.trim() {
        "" => "Untitled Palette",
        n => n,
    };
    debug!(palette = name, "parsed palette from model reply");
    Ok(Palette::new(name, colors)?.with_description(reply.description.as_deref()))
}

/// Puts every locked color back at its pinned slot, overriding the service.
pub fn reconcile_locks(palette: &Palette, locks: &LockedColorSet) -> Palette {
    locks.apply_to(palette)
}

/// Asks `source` for a fresh palette and re-inserts the locked colors.
pub async fn regenerate<S: PaletteSource>(
    source: &S,
    request: &AnalysisRequest,
    locks: &LockedColorSet,
) -> Result<Palette, SwatchError> {
    let palette = source.analyze(request).await?;
    Ok(reconcile_locks(&palette, locks))
}
