//! CIEDE2000 delta-E in Lab space.
//!
//! Implements the full formula including the hue rotation term, with the
//! published branch rules for mean-hue interpolation. The alpha channel is
//! not part of CIEDE2000; its weighted difference is added in quadrature
//! after the Lab computation.

use std::f64::consts::PI;

use crate::color::point::clamp_channel;
use crate::color::{rgb2lab, Lab};
use crate::distance::WhitePoint;

const K_ALPHA: f64 = 0.25 * 100.0 / 255.0;

const DEG_360: f64 = 2.0 * PI;
const DEG_275: f64 = 275.0 * PI / 180.0;
const DEG_63: f64 = 63.0 * PI / 180.0;
const DEG_30: f64 = 30.0 * PI / 180.0;
const DEG_25: f64 = 25.0 * PI / 180.0;
const DEG_6: f64 = 6.0 * PI / 180.0;

fn pow25_to_7() -> f64 {
    25f64.powi(7)
}

fn hue_angle(b: f64, ap: f64) -> f64 {
    let hp = b.atan2(ap);
    if hp >= 0.0 {
        hp
    } else {
        hp + DEG_360
    }
}

fn rotation_term(ahp: f64, acp: f64) -> f64 {
    let acp7 = acp.powi(7);
    let rc = 2.0 * (acp7 / (acp7 + pow25_to_7())).sqrt();
    let delta_theta = DEG_30 * (-((ahp - DEG_275) / DEG_25).powi(2)).exp();
    -(2.0 * delta_theta).sin() * rc
}

fn hue_weight(ahp: f64) -> f64 {
    1.0 - 0.17 * (ahp - DEG_30).cos()
        + 0.24 * (2.0 * ahp).cos()
        + 0.32 * (3.0 * ahp + DEG_6).cos()
        - 0.2 * (4.0 * ahp - DEG_63).cos()
}

fn mean_hue(c1p_c2p: f64, h_bar: f64, h1p: f64, h2p: f64) -> f64 {
    let sum = h1p + h2p;
    if c1p_c2p == 0.0 {
        return sum;
    }
    if h_bar <= PI {
        return sum / 2.0;
    }
    if sum < DEG_360 {
        (sum + DEG_360) / 2.0
    } else {
        (sum - DEG_360) / 2.0
    }
}

fn hue_difference(c1p_c2p: f64, h_bar: f64, h1p: f64, h2p: f64) -> f64 {
    let dhp = if c1p_c2p == 0.0 {
        0.0
    } else if h_bar <= PI {
        h2p - h1p
    } else if h2p <= h1p {
        h2p - h1p + DEG_360
    } else {
        h2p - h1p - DEG_360
    };
    2.0 * c1p_c2p.sqrt() * (dhp / 2.0).sin()
}

/// Squared CIEDE2000 difference between two Lab colors.
pub(crate) fn delta_e_squared_lab(lab1: Lab, lab2: Lab) -> f64 {
    let c1 = (lab1.a * lab1.a + lab1.b * lab1.b).sqrt();
    let c2 = (lab2.a * lab2.a + lab2.b * lab2.b).sqrt();

    let mean_c7 = ((c1 + c2) / 2.0).powi(7);
    let g = 0.5 * (1.0 - (mean_c7 / (mean_c7 + pow25_to_7())).sqrt());

    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;
    let c1p = (a1p * a1p + lab1.b * lab1.b).sqrt();
    let c2p = (a2p * a2p + lab2.b * lab2.b).sqrt();
    let c1p_c2p = c1p * c2p;

    let h1p = hue_angle(lab1.b, a1p);
    let h2p = hue_angle(lab2.b, a2p);
    let h_bar = (h1p - h2p).abs();

    let dlp = lab2.l - lab1.l;
    let dcp = c2p - c1p;
    let dhp = hue_difference(c1p_c2p, h_bar, h1p, h2p);

    let ahp = mean_hue(c1p_c2p, h_bar, h1p, h2p);
    let t = hue_weight(ahp);
    let acp = (c1p + c2p) / 2.0;

    let mean_l_minus_50_sq = ((lab1.l + lab2.l) / 2.0 - 50.0).powi(2);
    let sl = 1.0 + 0.015 * mean_l_minus_50_sq / (20.0 + mean_l_minus_50_sq).sqrt();
    let sc = 1.0 + 0.045 * acp;
    let sh = 1.0 + 0.015 * t * acp;
    let rt = rotation_term(ahp, acp);

    let dl = dlp / sl;
    let dc = dcp / sc;
    let dh = dhp / sh;

    dl * dl + dc * dc + dh * dh + rt * dc * dh
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn distance(
    white: &WhitePoint,
    r1: f64,
    g1: f64,
    b1: f64,
    a1: f64,
    r2: f64,
    g2: f64,
    b2: f64,
    a2: f64,
) -> f64 {
    let lab1 = rgb2lab(
        clamp_channel(r1 * white.r),
        clamp_channel(g1 * white.g),
        clamp_channel(b1 * white.b),
    );
    let lab2 = rgb2lab(
        clamp_channel(r2 * white.r),
        clamp_channel(g2 * white.g),
        clamp_channel(b2 * white.b),
    );
    let da = (a2 - a1) * white.a * K_ALPHA;
    (delta_e_squared_lab(lab1, lab2) + da * da).sqrt()
}
