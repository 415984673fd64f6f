// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Packed RGB values and their HSV form.
//!
//! Devices report their RGB color as a single integer `0xRRGGBB`. The
//! conversion keeps full floating point precision; rounding for the wire or
//! for normalization happens at the call site.

use std::fmt;

/// RGB color as the device packs it into one 24-bit integer.
///
/// # Examples
///
/// ```
/// use yeelight_lib::types::PackedRgb;
///
/// let orange = PackedRgb::new(0xFF8000);
/// assert_eq!(orange.channels(), (255, 128, 0));
///
/// let hsv = orange.to_hsv();
/// assert_eq!(hsv.hue().round(), 30.0);
/// assert_eq!(hsv.saturation(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedRgb(u32);

impl PackedRgb {
    /// Creates a packed color. Bits above the low 24 are ignored.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    /// Returns the packed integer.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Splits the value into `(red, green, blue)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn channels(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// Converts to HSV.
    #[must_use]
    pub fn to_hsv(&self) -> Hsv {
        let (r, g, b) = self.channels();
        rgb_to_hsv(r, g, b)
    }
}

impl fmt::Display for PackedRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

/// HSV color with hue in degrees `[0, 360)` and saturation/value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    hue: f64,
    saturation: f64,
    value: f64,
}

impl Hsv {
    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> f64 {
        self.hue
    }

    /// Returns the saturation in `[0, 1]`.
    #[must_use]
    pub const fn saturation(&self) -> f64 {
        self.saturation
    }

    /// Returns the value (brightness) in `[0, 1]`.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

#[allow(clippy::many_single_char_names)]
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    let hue = if delta < f64::EPSILON {
        0.0
    } else if (max - r).abs() < f64::EPSILON {
        let h = 60.0 * (((g - b) / delta) % 6.0);
        if h < 0.0 { h + 360.0 } else { h }
    } else if (max - g).abs() < f64::EPSILON {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    Hsv {
        hue,
        saturation,
        value: max,
    }
}
