use gm_core::{Error, Rgba8};

/// Exponent of the power curve used to encode colour channels.
///
/// Decoding to linear light is `v.powf(gamma)`, encoding is
/// `v.powf(1.0 / gamma)`, with `v` normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamma(f64);

impl Gamma {
    pub const DEFAULT: Self = Self(2.2);

    pub fn new(exponent: f64) -> Result<Self, Error> {
        if !exponent.is_finite() || exponent <= 0.0 {
            return Err(Error::InvalidGamma(exponent));
        }
        Ok(Self(exponent))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    #[inline]
    fn decode(self, v: u8) -> f64 {
        (v as f64 / 255.0).powf(self.0)
    }

    #[inline]
    fn encode(self, linear: f64) -> u8 {
        let encoded = linear.powf(1.0 / self.0);
        // `as` truncates toward zero and maps NaN to 0.
        (255.0 * encoded).clamp(0.0, 255.0) as u8
    }
}

impl Default for Gamma {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Averages four gamma-encoded channel values in linear light.
pub fn average_channel_gamma(i: u8, j: u8, k: u8, l: u8, gamma: Gamma) -> u8 {
    let sum = gamma.decode(i) + gamma.decode(j) + gamma.decode(k) + gamma.decode(l);
    gamma.encode(sum / 4.0)
}

/// Averages four linear channel values with truncating integer division.
pub fn average_channel_linear(i: u8, j: u8, k: u8, l: u8) -> u8 {
    let sum = i as u32 + j as u32 + k as u32 + l as u32;
    (sum / 4).min(255) as u8
}

/// Averages four pixels: colour in linear light, alpha directly.
pub fn average_color(c0: Rgba8, c1: Rgba8, c2: Rgba8, c3: Rgba8, gamma: Gamma) -> Rgba8 {
    Rgba8 {
        r: average_channel_gamma(c0.r, c1.r, c2.r, c3.r, gamma),
        g: average_channel_gamma(c0.g, c1.g, c2.g, c3.g, gamma),
        b: average_channel_gamma(c0.b, c1.b, c2.b, c3.b, gamma),
        a: average_channel_linear(c0.a, c1.a, c2.a, c3.a),
    }
}

/// `average_color` with the decode step served from a 256-entry table.
///
/// Table entries are produced by the same expression the free functions use,
/// so results are bit-identical.
#[derive(Debug, Clone)]
pub struct Averager {
    gamma: Gamma,
    to_linear: [f64; 256],
}

impl Averager {
    pub fn new(gamma: Gamma) -> Self {
        let mut to_linear = [0.0f64; 256];
        for (v, slot) in to_linear.iter_mut().enumerate() {
            *slot = gamma.decode(v as u8);
        }
        Self { gamma, to_linear }
    }

    pub fn gamma(&self) -> Gamma {
        self.gamma
    }

    #[inline]
    pub fn average_channel_gamma(&self, i: u8, j: u8, k: u8, l: u8) -> u8 {
        let t = &self.to_linear;
        let sum = t[i as usize] + t[j as usize] + t[k as usize] + t[l as usize];
        self.gamma.encode(sum / 4.0)
    }

    #[inline]
    pub fn average_color(&self, c0: Rgba8, c1: Rgba8, c2: Rgba8, c3: Rgba8) -> Rgba8 {
        Rgba8 {
            r: self.average_channel_gamma(c0.r, c1.r, c2.r, c3.r),
            g: self.average_channel_gamma(c0.g, c1.g, c2.g, c3.g),
            b: self.average_channel_gamma(c0.b, c1.b, c2.b, c3.b),
            a: average_channel_linear(c0.a, c1.a, c2.a, c3.a),
        }
    }
}

impl Default for Averager {
    fn default() -> Self {
        Self::new(Gamma::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use gm_core::{Error, Rgba8};

    use super::{Averager, Gamma, average_channel_gamma, average_channel_linear, average_color};

    const G: Gamma = Gamma::DEFAULT;

    #[test]
    fn identical_inputs_survive_the_round_trip() {
        assert_eq!(average_channel_gamma(0, 0, 0, 0, G), 0);
        assert_eq!(average_channel_gamma(255, 255, 255, 255, G), 255);

        for v in 0..=255u8 {
            let out = average_channel_gamma(v, v, v, v, G);
            assert!(
                (out as i16 - v as i16).abs() <= 1,
                "v={v} averaged to {out}"
            );
        }
    }

    #[test]
    fn linear_average_is_floor_of_mean() {
        for (i, j, k, l) in [
            (0u8, 0u8, 0u8, 1u8),
            (1, 2, 3, 4),
            (255, 255, 255, 254),
            (255, 255, 255, 255),
            (10, 0, 0, 0),
            (7, 7, 7, 8),
        ] {
            let expected = (i as u32 + j as u32 + k as u32 + l as u32) / 4;
            assert_eq!(average_channel_linear(i, j, k, l) as u32, expected);
        }
        assert_eq!(average_channel_linear(255, 255, 0, 0), 127);
    }

    #[test]
    fn bright_dark_pair_is_brighter_than_flat_average() {
        let gamma_avg = average_channel_gamma(255, 255, 0, 0, G);
        let flat_avg = average_channel_linear(255, 255, 0, 0);
        assert!(gamma_avg > 128, "got {gamma_avg}");
        assert!(gamma_avg > flat_avg);
        // 0.5^(1/2.2) * 255 = 186.08
        assert_eq!(gamma_avg, 186);
    }

    #[test]
    fn average_is_order_independent() {
        assert_eq!(
            average_channel_gamma(0, 255, 0, 255, G),
            average_channel_gamma(255, 255, 0, 0, G)
        );
    }

    #[test]
    fn alpha_is_averaged_without_gamma() {
        let out = average_color(
            Rgba8::new(255, 0, 0, 255),
            Rgba8::new(255, 0, 0, 0),
            Rgba8::new(255, 0, 0, 255),
            Rgba8::new(255, 0, 0, 0),
            G,
        );
        assert_eq!(out, Rgba8::new(255, 0, 0, 127));
    }

    #[test]
    fn channels_are_averaged_independently() {
        let out = average_color(
            Rgba8::new(255, 0, 10, 200),
            Rgba8::new(0, 0, 10, 200),
            Rgba8::new(255, 0, 10, 200),
            Rgba8::new(0, 0, 10, 200),
            G,
        );
        assert_eq!(out.r, 186);
        assert_eq!(out.g, 0);
        assert!((out.b as i16 - 10).abs() <= 1);
        assert_eq!(out.a, 200);
    }

    #[test]
    fn gamma_one_degenerates_to_plain_mean() {
        let g = Gamma::new(1.0).expect("valid gamma");
        assert_eq!(average_channel_gamma(255, 255, 0, 0, g), 127);
        assert_eq!(
            average_channel_gamma(255, 255, 0, 0, g),
            average_channel_linear(255, 255, 0, 0)
        );
    }

    #[test]
    fn invalid_gamma_is_rejected() {
        assert_eq!(Gamma::new(0.0), Err(Error::InvalidGamma(0.0)));
        assert_eq!(Gamma::new(-2.2), Err(Error::InvalidGamma(-2.2)));
        assert!(Gamma::new(f64::NAN).is_err());
        assert!(Gamma::new(f64::INFINITY).is_err());
        assert_eq!(Gamma::default().value(), 2.2);
    }

    #[test]
    fn table_averager_matches_direct_formula() {
        let averager = Averager::new(G);
        for a in (0..=255u8).step_by(5) {
            for b in (0..=255u8).step_by(17) {
                assert_eq!(
                    averager.average_channel_gamma(a, b, 255 - a, b / 2),
                    average_channel_gamma(a, b, 255 - a, b / 2, G),
                    "a={a} b={b}"
                );
            }
        }

        let px = [
            Rgba8::new(12, 200, 90, 255),
            Rgba8::new(250, 3, 60, 128),
            Rgba8::new(77, 77, 77, 0),
            Rgba8::new(0, 255, 140, 64),
        ];
        assert_eq!(
            averager.average_color(px[0], px[1], px[2], px[3]),
            average_color(px[0], px[1], px[2], px[3], G)
        );
    }
}
