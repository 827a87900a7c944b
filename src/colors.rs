//! Client for the third-party image color-recognition service.
//!
//! The project view attaches a color palette when a project has a cover
//! image. The call is strictly best-effort: an unconfigured client, a
//! network failure, or an unexpected response shape all degrade to "no
//! palette" — never a failed request.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{ColorApiConfig, Config};

/// One recognized color and its share of the image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorShare {
    pub color: String,
    pub percentage: f64,
}

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    #[serde(default)]
    outputs: Vec<RecognitionOutput>,
}

#[derive(Debug, Deserialize)]
struct RecognitionOutput {
    data: OutputData,
}

#[derive(Debug, Deserialize)]
struct OutputData {
    #[serde(default)]
    colors: Vec<RawColor>,
}

#[derive(Debug, Deserialize)]
struct RawColor {
    #[serde(default)]
    w3c: Option<W3cColor>,
    #[serde(default)]
    raw_hex: Option<String>,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct W3cColor {
    name: Option<String>,
    hex: Option<String>,
}

impl RawColor {
    fn display_name(self) -> Option<ColorShare> {
        let color = self
            .w3c
            .and_then(|w3c| w3c.name.or(w3c.hex))
            .or(self.raw_hex)?;
        Some(ColorShare {
            color,
            percentage: self.value,
        })
    }
}

/// HTTP client for the recognition model, constructed from [`Config`].
pub struct ColorClient {
    http: reqwest::Client,
    settings: Option<ColorApiConfig>,
}

impl ColorClient {
    pub fn new(config: &Config) -> Self {
        ColorClient {
            http: reqwest::Client::new(),
            settings: config.color_api.clone(),
        }
    }

    /// A client that never calls out; used when the feature is off.
    pub fn disabled() -> Self {
        ColorClient {
            http: reqwest::Client::new(),
            settings: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.is_some()
    }

    /// Recognize the dominant colors of the image at `image_url`.
    ///
    /// Returns `None` on any failure; the caller omits the palette field.
    pub async fn palette(&self, image_url: &str) -> Option<Vec<ColorShare>> {
        let settings = self.settings.as_ref()?;

        let url = format!(
            "{}/v2/models/{}/versions/{}/outputs",
            settings.base_url, settings.model_id, settings.model_version
        );
        let body = json!({
            "user_app_id": {
                "user_id": settings.user_id,
                "app_id": settings.app_id,
            },
            "inputs": [
                { "data": { "image": { "url": image_url } } }
            ],
        });

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Key {}", settings.api_key))
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("color recognition call failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "color recognition rejected the request");
            return None;
        }

        let parsed: RecognitionResponse = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("color recognition returned an unexpected shape: {}", e);
                return None;
            }
        };

        let colors: Vec<ColorShare> = parsed
            .outputs
            .into_iter()
            .next()?
            .data
            .colors
            .into_iter()
            .filter_map(RawColor::display_name)
            .collect();

        if colors.is_empty() {
            None
        } else {
            Some(colors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_client_yields_no_palette() {
        let client = ColorClient::disabled();
        assert!(!client.is_enabled());
        assert_eq!(client.palette("https://img.example/a.png").await, None);
    }

    #[test]
    fn raw_colors_prefer_the_w3c_name() {
        let raw: RawColor = serde_json::from_value(json!({
            "w3c": { "name": "Teal", "hex": "#008080" },
            "raw_hex": "#017f80",
            "value": 0.42,
        }))
        .unwrap();
        let share = raw.display_name().unwrap();
        assert_eq!(share.color, "Teal");
        assert_eq!(share.percentage, 0.42);

        let nameless: RawColor = serde_json::from_value(json!({
            "raw_hex": "#017f80",
            "value": 0.1,
        }))
        .unwrap();
        assert_eq!(nameless.display_name().unwrap().color, "#017f80");
    }
}
