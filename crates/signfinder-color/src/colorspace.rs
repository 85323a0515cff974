//! Color space conversion
//!
//! Each supported color space fixes a pair of channels of interest and
//! their value ranges; a [`ColorSample`] is the pair of channel values
//! a pixel contributes to a [`crate::JointHistogram`]. Conversion from
//! RGB is always explicit via [`ColorSpace::sample`].
//!
//! The 8-bit channel conventions follow the usual computer-vision
//! encodings: YCrCb chroma is offset by 128, HSV hue is halved into
//! [0, 180), and CIE Lab is offset/scaled into [0, 255].

use image::Rgb;

/// A pixel's two channel-of-interest values in the chosen color space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    /// First channel of interest
    pub c0: f32,
    /// Second channel of interest
    pub c1: f32,
}

impl ColorSample {
    /// Create a new sample
    pub fn new(c0: f32, c1: f32) -> Self {
        Self { c0, c1 }
    }
}

/// Value range of one histogram axis, half-open: `[min, max)`
///
/// A value exactly at `max` is clamped into the last bin rather than
/// treated as out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub min: f32,
    pub max: f32,
}

impl ChannelRange {
    /// Create a new range
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Width of the range
    pub fn span(&self) -> f32 {
        self.max - self.min
    }
}

/// Color space used for histogram training and classification
///
/// Each variant fixes which two channels feed the joint histogram:
///
/// | Space | Channels | Ranges |
/// |---|---|---|
/// | `YCrCb` | Cr, Cb | [0, 256), [0, 256) |
/// | `Hsv` | H, S | [0, 180), [0, 256) |
/// | `NormRgb` | r, g | [0, 1], [0, 1] |
/// | `CieLab` | a, b | [0, 256), [0, 256) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    /// Luma / red-difference / blue-difference; chroma pair retained
    #[default]
    YCrCb,
    /// Hue-saturation-value; hue and saturation retained
    Hsv,
    /// Intensity-normalized RGB; normalized red and green retained
    NormRgb,
    /// CIE L*a*b*; the two chroma axes retained
    CieLab,
}

impl ColorSpace {
    /// Value ranges of the two channels of interest
    pub fn ranges(self) -> [ChannelRange; 2] {
        match self {
            ColorSpace::YCrCb | ColorSpace::CieLab => {
                [ChannelRange::new(0.0, 256.0), ChannelRange::new(0.0, 256.0)]
            }
            ColorSpace::Hsv => [ChannelRange::new(0.0, 180.0), ChannelRange::new(0.0, 256.0)],
            ColorSpace::NormRgb => [ChannelRange::new(0.0, 1.0), ChannelRange::new(0.0, 1.0)],
        }
    }

    /// Short name used in persisted model files
    pub fn name(self) -> &'static str {
        match self {
            ColorSpace::YCrCb => "ycrcb",
            ColorSpace::Hsv => "hsv",
            ColorSpace::NormRgb => "nrgb",
            ColorSpace::CieLab => "cielab",
        }
    }

    /// Parse a name produced by [`ColorSpace::name`]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ycrcb" => Some(ColorSpace::YCrCb),
            "hsv" => Some(ColorSpace::Hsv),
            "nrgb" => Some(ColorSpace::NormRgb),
            "cielab" => Some(ColorSpace::CieLab),
            _ => None,
        }
    }

    /// Convert a pixel into its two channel-of-interest values
    pub fn sample(self, rgb: Rgb<u8>) -> ColorSample {
        let [r, g, b] = rgb.0;
        match self {
            ColorSpace::YCrCb => {
                let (cr, cb) = rgb_to_crcb(r, g, b);
                ColorSample::new(cr, cb)
            }
            ColorSpace::Hsv => {
                let (h, s) = rgb_to_hs(r, g, b);
                ColorSample::new(h, s)
            }
            ColorSpace::NormRgb => {
                let (rn, gn) = rgb_to_norm_rg(r, g, b);
                ColorSample::new(rn, gn)
            }
            ColorSpace::CieLab => {
                let (a, bb) = rgb_to_ab(r, g, b);
                ColorSample::new(a, bb)
            }
        }
    }
}

/// Cr and Cb chroma components (BT.601, 128-offset 8-bit encoding)
fn rgb_to_crcb(r: u8, g: u8, b: u8) -> (f32, f32) {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;
    (cr.clamp(0.0, 255.0), cb.clamp(0.0, 255.0))
}

/// Hue in [0, 180) and saturation in [0, 255]
fn rgb_to_hs(r: u8, g: u8, b: u8) -> (f32, f32) {
    let (rf, gf, bf) = (r as f32, g as f32, b as f32);
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    let s = if max > 0.0 { delta / max * 255.0 } else { 0.0 };

    let mut h = if delta == 0.0 {
        0.0
    } else if max == rf {
        60.0 * (gf - bf) / delta
    } else if max == gf {
        120.0 + 60.0 * (bf - rf) / delta
    } else {
        240.0 + 60.0 * (rf - gf) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }
    // Halved so hue fits an 8-bit channel.
    (h / 2.0, s.clamp(0.0, 255.0))
}

/// Intensity-normalized red and green, each in [0, 1]
///
/// Black maps to (0, 0).
fn rgb_to_norm_rg(r: u8, g: u8, b: u8) -> (f32, f32) {
    let sum = r as f32 + g as f32 + b as f32;
    if sum == 0.0 {
        return (0.0, 0.0);
    }
    (r as f32 / sum, g as f32 / sum)
}

/// CIE a* and b* in the 128-offset 8-bit encoding
///
/// sRGB with D65 white point; gamma expansion applied before the
/// XYZ step.
fn rgb_to_ab(r: u8, g: u8, b: u8) -> (f32, f32) {
    fn srgb_expand(c: u8) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    fn lab_f(t: f32) -> f32 {
        if t > 0.008856 {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    }

    let (rl, gl, bl) = (srgb_expand(r), srgb_expand(g), srgb_expand(b));
    let x = 0.412453 * rl + 0.357580 * gl + 0.180423 * bl;
    let y = 0.212671 * rl + 0.715160 * gl + 0.072169 * bl;
    let z = 0.019334 * rl + 0.119193 * gl + 0.950227 * bl;

    // D65 reference white
    let fx = lab_f(x / 0.950456);
    let fy = lab_f(y);
    let fz = lab_f(z / 1.088754);

    let a = 500.0 * (fx - fy) + 128.0;
    let b = 200.0 * (fy - fz) + 128.0;
    (a.clamp(0.0, 255.0), b.clamp(0.0, 255.0))
}
