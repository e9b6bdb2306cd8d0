//! The uniform effect contract.
//!
//! Every transformation implements [`Effect`]: it borrows an input buffer and
//! returns a freshly allocated result. Effects hold only their validated
//! configuration, so one instance can be applied any number of times, from any
//! thread, and composed behind `Box<dyn Effect>` (see the cartoon pipeline).

use std::ops::Range;

use crate::buffer::PixelBuffer;
use crate::error::{EffectError, Result};

/// Which channel(s) an effect operates on.
///
/// The numeric form used by the bindings is `0` for [`ChannelSelector::All`]
/// and `i + 1` for [`ChannelSelector::Only(i)`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelSelector {
    /// Every channel the effect naturally processes.
    #[default]
    All,
    /// Zero-based channel index.
    Only(usize),
}

impl ChannelSelector {
    /// Decode the numeric selector form.
    pub fn from_index(selector: usize) -> Self {
        match selector {
            0 => ChannelSelector::All,
            n => ChannelSelector::Only(n - 1),
        }
    }

    pub fn index(self) -> usize {
        match self {
            ChannelSelector::All => 0,
            ChannelSelector::Only(c) => c + 1,
        }
    }

    /// Check that an explicit channel exists in `image`.
    pub fn validate(self, image: &PixelBuffer) -> Result<()> {
        match self {
            ChannelSelector::Only(c) if c >= image.channels() => {
                Err(EffectError::processing(format!(
                    "channel {c} selected but the image has {} channel(s)",
                    image.channels()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Channel range to process. `include_alpha` decides whether `All` covers a
    /// trailing alpha channel.
    pub fn targets(self, image: &PixelBuffer, include_alpha: bool) -> Result<Range<usize>> {
        self.validate(image)?;
        Ok(match self {
            ChannelSelector::All if include_alpha => 0..image.channels(),
            ChannelSelector::All => 0..image.color_channels(),
            ChannelSelector::Only(c) => c..c + 1,
        })
    }
}

impl From<usize> for ChannelSelector {
    fn from(selector: usize) -> Self {
        ChannelSelector::from_index(selector)
    }
}

/// A pure transformation from one pixel buffer to another.
pub trait Effect: Send + Sync {
    /// Short lowercase identifier, e.g. `"gaussian"`.
    fn name(&self) -> &'static str;

    /// Apply the effect. The input is never modified; the output has the
    /// input's dimensions and bounds.
    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer>;
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, image: &PixelBuffer, channel: ChannelSelector) -> Result<PixelBuffer> {
        (**self).apply(image, channel)
    }
}
