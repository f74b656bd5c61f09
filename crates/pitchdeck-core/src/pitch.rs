//! Pitch request and the prompt template.
//!
//! A [`PitchForm`] holds the raw form input exactly as submitted. Validating
//! it yields a [`PitchRequest`], which is consumed once by [`build_prompt`]
//! to produce the single string sent to the generation API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Voice the generated kit should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Professional,
    Exciting,
    Controversial,
}

impl Tone {
    /// Every tone, in the order the form offers them.
    pub const ALL: [Self; 3] = [Self::Professional, Self::Exciting, Self::Controversial];

    /// Label shown in the form and interpolated into the prompt.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Professional => "Professional & Corporate",
            Self::Exciting => "Exciting & Startup-y",
            Self::Controversial => "Controversial & Bold",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tone| tone.label() == s)
            .ok_or_else(|| FormError::UnknownTone {
                label: s.to_owned(),
            })
    }
}

/// Raw tool-form input, as posted by the browser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitchForm {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub key_features: String,
    #[serde(default)]
    pub tone: String,
}

impl PitchForm {
    /// Check required fields and resolve the tone.
    ///
    /// Whitespace-only product names and key features count as empty, and
    /// every field is trimmed before it reaches the prompt. This is stricter
    /// than a plain non-empty check on purpose.
    ///
    /// A blank tone falls back to the default; any other unrecognised label
    /// is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when the product name or key features are empty
    /// (after trimming) or the tone is not one of [`Tone::ALL`].
    pub fn validate(&self) -> Result<PitchRequest, FormError> {
        if self.product_name.trim().is_empty() {
            return Err(FormError::MissingProductName);
        }
        if self.key_features.trim().is_empty() {
            return Err(FormError::MissingKeyFeatures);
        }
        let tone = if self.tone.trim().is_empty() {
            Tone::default()
        } else {
            self.tone.parse()?
        };

        Ok(PitchRequest {
            product_name: self.product_name.trim().to_owned(),
            target_audience: self.target_audience.trim().to_owned(),
            key_features: self.key_features.trim().to_owned(),
            tone,
        })
    }
}

/// A validated pitch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchRequest {
    pub product_name: String,
    /// May be empty.
    pub target_audience: String,
    pub key_features: String,
    pub tone: Tone,
}

/// Build the generation prompt for a request.
///
/// Deterministic: the same request always yields the same prompt.
#[must_use]
pub fn build_prompt(req: &PitchRequest) -> String {
    let mut prompt = String::with_capacity(768 + req.key_features.len());
    prompt.push_str("Act as a world-class PR Specialist.\n");
    prompt.push_str("I need two things for a product launch.\n\n");

    prompt.push_str("Product Name: ");
    prompt.push_str(&req.product_name);
    prompt.push_str("\nTarget Audience: ");
    prompt.push_str(&req.target_audience);
    prompt.push_str("\nKey Features: ");
    prompt.push_str(&req.key_features);
    prompt.push_str("\nTone: ");
    prompt.push_str(req.tone.label());
    prompt.push_str("\n\n");

    prompt.push_str(
        "OUTPUT 1: A formal, formatted PRESS RELEASE. Include a catchy headline, \
         dateline, body, and 'About' section.\n",
    );
    prompt.push_str(
        "OUTPUT 2: A short, punchy COLD EMAIL to a journalist. Subject line should be \
         clickbait (in a good way). Body under 150 words.\n",
    );
    prompt
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn supatask() -> PitchForm {
        PitchForm {
            product_name: "SupaTask".to_owned(),
            target_audience: "Remote PMs".to_owned(),
            key_features: "AI scheduling".to_owned(),
            tone: "Exciting & Startup-y".to_owned(),
        }
    }

    #[test]
    fn tone_labels_round_trip() {
        for tone in Tone::ALL {
            assert_eq!(tone.label().parse::<Tone>().unwrap(), tone);
        }
    }

    #[test]
    fn unknown_tone_is_rejected() {
        let err = "Sarcastic".parse::<Tone>().unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownTone {
                label: "Sarcastic".to_owned()
            }
        );
    }

    #[test]
    fn empty_product_name_rejected() {
        let form = PitchForm {
            product_name: String::new(),
            ..supatask()
        };
        assert_eq!(form.validate().unwrap_err(), FormError::MissingProductName);
    }

    #[test]
    fn whitespace_key_features_rejected() {
        let form = PitchForm {
            key_features: " \n\t".to_owned(),
            ..supatask()
        };
        assert_eq!(form.validate().unwrap_err(), FormError::MissingKeyFeatures);
    }

    #[test]
    fn fields_are_trimmed_before_prompting() {
        let form = PitchForm {
            product_name: "  SupaTask \n".to_owned(),
            key_features: "\n- AI scheduling\n".to_owned(),
            ..supatask()
        };
        let req = form.validate().unwrap();
        assert_eq!(req.product_name, "SupaTask");
        assert_eq!(req.key_features, "- AI scheduling");
    }

    #[test]
    fn target_audience_is_optional() {
        let form = PitchForm {
            target_audience: String::new(),
            ..supatask()
        };
        let req = form.validate().unwrap();
        assert_eq!(req.target_audience, "");
        assert_eq!(req.tone, Tone::Exciting);
    }

    #[test]
    fn blank_tone_uses_default() {
        let form = PitchForm {
            tone: String::new(),
            ..supatask()
        };
        assert_eq!(form.validate().unwrap().tone, Tone::Professional);
    }

    #[test]
    fn prompt_interpolates_every_field() {
        let prompt = build_prompt(&supatask().validate().unwrap());
        assert!(prompt.contains("Product Name: SupaTask\n"));
        assert!(prompt.contains("Target Audience: Remote PMs\n"));
        assert!(prompt.contains("Key Features: AI scheduling\n"));
        assert!(prompt.contains("Tone: Exciting & Startup-y\n"));
        assert!(prompt.contains("PRESS RELEASE"));
        assert!(prompt.contains("dateline"));
        assert!(prompt.contains("'About' section"));
        assert!(prompt.contains("COLD EMAIL"));
        assert!(prompt.contains("under 150 words"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let req = supatask().validate().unwrap();
        assert_eq!(build_prompt(&req), build_prompt(&req));
    }

    #[test]
    fn multiline_features_kept_intact() {
        let form = PitchForm {
            key_features: "- AI auto-scheduling\n- Slack integration\n- Dark mode".to_owned(),
            ..supatask()
        };
        let prompt = build_prompt(&form.validate().unwrap());
        assert!(prompt.contains("Key Features: - AI auto-scheduling\n- Slack integration\n- Dark mode\n"));
    }
}
