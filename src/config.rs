//! Runtime effect selection.
//!
//! [`EffectConfig`] names one effect together with its parameters and builds
//! the validated effect. Front ends (command lines, job files, bindings) map
//! their input onto this enum instead of dispatching on loose arguments.
//!
//! With the `serde` feature the enum is internally tagged:
//!
//! ```json
//! {"effect": "oil", "filter_size": 5, "levels": 30}
//! ```

use log::debug;

use crate::effect::Effect;
use crate::error::Result;
use crate::filters::blur::GaussianBlur;
use crate::filters::cartoon::{Cartoon, CartoonConfig};
use crate::filters::color_adjust::Brightness;
use crate::filters::edge::Sobel;
use crate::filters::sketch::PencilSketch;
use crate::filters::stylize::{OilPainting, Pixelate};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum EffectConfig {
    Brightness { offset: i32 },
    Pixelate { block_size: usize },
    Gaussian { kernel_size: usize, sigma: f32 },
    Sobel { threshold: u32, invert: bool },
    Oil { filter_size: usize, levels: usize },
    Pencil { blur_factor: usize },
    Cartoon(CartoonConfig),
}

impl EffectConfig {
    /// Names accepted for each variant, in declaration order.
    pub const NAMES: [&'static str; 7] = [
        "brightness",
        "pixelate",
        "gaussian",
        "sobel",
        "oil",
        "pencil",
        "cartoon",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EffectConfig::Brightness { .. } => "brightness",
            EffectConfig::Pixelate { .. } => "pixelate",
            EffectConfig::Gaussian { .. } => "gaussian",
            EffectConfig::Sobel { .. } => "sobel",
            EffectConfig::Oil { .. } => "oil",
            EffectConfig::Pencil { .. } => "pencil",
            EffectConfig::Cartoon(_) => "cartoon",
        }
    }

    /// Validate the parameters and construct the effect.
    pub fn build(&self) -> Result<Box<dyn Effect>> {
        debug!("EffectConfig::build {:?}", self);
        Ok(match *self {
            EffectConfig::Brightness { offset } => Box::new(Brightness::new(offset)),
            EffectConfig::Pixelate { block_size } => Box::new(Pixelate::new(block_size)?),
            EffectConfig::Gaussian { kernel_size, sigma } => {
                Box::new(GaussianBlur::new(kernel_size, sigma)?)
            }
            EffectConfig::Sobel { threshold, invert } => Box::new(Sobel::new(threshold, invert)),
            EffectConfig::Oil {
                filter_size,
                levels,
            } => Box::new(OilPainting::new(filter_size, levels)?),
            EffectConfig::Pencil { blur_factor } => Box::new(PencilSketch::new(blur_factor)?),
            EffectConfig::Cartoon(config) => Box::new(Cartoon::new(config)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::effect::ChannelSelector;

    fn all_configs() -> Vec<EffectConfig> {
        vec![
            EffectConfig::Brightness { offset: 200 },
            EffectConfig::Pixelate { block_size: 12 },
            EffectConfig::Gaussian {
                kernel_size: 9,
                sigma: 1.0,
            },
            EffectConfig::Sobel {
                threshold: 100,
                invert: false,
            },
            EffectConfig::Oil {
                filter_size: 5,
                levels: 30,
            },
            EffectConfig::Pencil { blur_factor: 2 },
            EffectConfig::Cartoon(CartoonConfig::default()),
        ]
    }

    #[test]
    fn test_build_names_match() {
        let configs = all_configs();
        for (config, expected) in configs.iter().zip(EffectConfig::NAMES) {
            let effect = config.build().unwrap();
            assert_eq!(config.name(), expected);
            assert_eq!(effect.name(), expected);
        }
    }

    #[test]
    fn test_build_validates() {
        let bad = [
            EffectConfig::Pixelate { block_size: 0 },
            EffectConfig::Gaussian {
                kernel_size: 8,
                sigma: 1.0,
            },
            EffectConfig::Gaussian {
                kernel_size: 9,
                sigma: 0.0,
            },
            EffectConfig::Oil {
                filter_size: 3,
                levels: 30,
            },
            EffectConfig::Oil {
                filter_size: 5,
                levels: 0,
            },
            EffectConfig::Pencil { blur_factor: 0 },
            EffectConfig::Cartoon(CartoonConfig {
                blur_kernel_size: 0,
                ..CartoonConfig::default()
            }),
        ];
        for config in bad {
            let err = config.build().err().expect("config should be rejected");
            assert!(err.is_invalid_parameter(), "{config:?} -> {err}");
        }
    }

    #[test]
    fn test_built_effects_preserve_dimensions() {
        let img = PixelBuffer::from_fn(20, 17, 4, |x, y, c| ((x * 13 + y * 7 + c * 29) % 256) as u8).unwrap();
        for config in all_configs() {
            let out = config.build().unwrap().apply(&img, ChannelSelector::All).unwrap();
            assert_eq!((out.width(), out.height()), (20, 17), "{}", config.name());
            assert_eq!(out.channels(), 4);
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_tagged_form() {
        let config: EffectConfig =
            serde_json::from_str(r#"{"effect": "oil", "filter_size": 5, "levels": 30}"#).unwrap();
        assert_eq!(
            config,
            EffectConfig::Oil {
                filter_size: 5,
                levels: 30
            }
        );

        let cartoon: EffectConfig =
            serde_json::from_str(r#"{"effect": "cartoon", "edge_threshold": 55}"#).unwrap();
        assert_eq!(
            cartoon,
            EffectConfig::Cartoon(CartoonConfig {
                edge_threshold: 55,
                ..CartoonConfig::default()
            })
        );

        let json = serde_json::to_value(EffectConfig::Sobel {
            threshold: 100,
            invert: true,
        })
        .unwrap();
        assert_eq!(json["effect"], "sobel");
        assert_eq!(json["invert"], true);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_negative_sizes() {
        let parsed: std::result::Result<EffectConfig, _> =
            serde_json::from_str(r#"{"effect": "pixelate", "block_size": -2}"#);
        assert!(parsed.is_err());
    }
}
