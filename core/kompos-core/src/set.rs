//! Fuzzy set shapes and membership evaluation.
//!
//! A fuzzy set maps a raw observation value to a degree of truth in [0, 1]
//! for one linguistic label. The two historical parameterizations of the
//! surrounding system (plain control-point tuples and coefficient-list
//! tuples) are unified here behind a single tagged shape enum with every
//! coefficient explicit, so a set's behavior is fully determined by its
//! variant and fields rather than by tuple length.

use serde::{Deserialize, Serialize};

use crate::{KomposError, Result};

/// Decimal places every membership degree is rounded to, matching the
/// precision of the recorded fixtures.
pub const MEMBERSHIP_DECIMALS: u32 = 3;

/// Rounds a value to the given number of decimal places.
pub fn round_dp(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Membership function shape for a fuzzy set.
///
/// Numeric shapes are evaluated with [`SetShape::membership`]; the
/// `Categorical` shape matches string observations via
/// [`SetShape::membership_text`]. Both shoulder families exist because the
/// deployments disagree on shoulder semantics: `Shoulder*` is a hard step,
/// `Ramp*` decays linearly between its plateau and its foot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetShape {
    /// Hard low shoulder: `height` at and below `threshold`, 0 above.
    ShoulderLow { threshold: f64, height: f64 },
    /// Hard high shoulder: `height` at and above `threshold`, 0 below.
    ShoulderHigh { threshold: f64, height: f64 },
    /// Low shoulder with a falling edge: 1.0 at and below `shoulder`,
    /// falling linearly to 0 at `foot`.
    RampLow { shoulder: f64, foot: f64 },
    /// High shoulder with a rising edge: 0 at and below `foot`, rising
    /// linearly to 1.0 at `shoulder` and staying there.
    RampHigh { foot: f64, shoulder: f64 },
    /// Triangular membership: 1.0 at `peak`, open boundaries (exactly 0 at
    /// `left` and `right`).
    Triangle { left: f64, peak: f64, right: f64 },
    /// Trapezoidal membership with an explicit plateau coefficient over
    /// [`plateau_left`, `plateau_right`]. The plateau is closed on both
    /// ends, so a hard-edged set with `plateau_right == right` keeps the
    /// plateau value at the edge; the outer boundaries are open.
    Trapezoid {
        left: f64,
        plateau_left: f64,
        plateau_right: f64,
        right: f64,
        plateau: f64,
    },
    /// Exact string match for linguistic observations.
    Categorical { value: String },
}

impl SetShape {
    /// Evaluates the degree of membership of a numeric value.
    ///
    /// The result is clamped to [0, 1] and rounded to
    /// [`MEMBERSHIP_DECIMALS`] places. `Categorical` shapes yield 0 for
    /// numeric values.
    pub fn membership(&self, x: f64) -> f64 {
        let raw = match self {
            SetShape::ShoulderLow { threshold, height } => {
                if x <= *threshold {
                    *height
                } else {
                    0.0
                }
            }
            SetShape::ShoulderHigh { threshold, height } => {
                if x >= *threshold {
                    *height
                } else {
                    0.0
                }
            }
            SetShape::RampLow { shoulder, foot } => {
                if x <= *shoulder {
                    1.0
                } else if x >= *foot {
                    0.0
                } else {
                    (foot - x) / (foot - shoulder)
                }
            }
            SetShape::RampHigh { foot, shoulder } => {
                if x >= *shoulder {
                    1.0
                } else if x <= *foot {
                    0.0
                } else {
                    (x - foot) / (shoulder - foot)
                }
            }
            SetShape::Triangle { left, peak, right } => {
                if x <= *left || x >= *right {
                    0.0
                } else if x == *peak {
                    1.0
                } else if x < *peak {
                    (x - left) / (peak - left)
                } else {
                    (right - x) / (right - peak)
                }
            }
            SetShape::Trapezoid {
                left,
                plateau_left,
                plateau_right,
                right,
                plateau,
            } => {
                // Plateau first: hard-edged sets (plateau_right == right)
                // keep the plateau value at the edge point.
                if x >= *plateau_left && x <= *plateau_right {
                    *plateau
                } else if x <= *left || x >= *right {
                    0.0
                } else if x < *plateau_left {
                    plateau * (x - left) / (plateau_left - left)
                } else {
                    plateau * (right - x) / (right - plateau_right)
                }
            }
            SetShape::Categorical { .. } => 0.0,
        };
        round_dp(raw.clamp(0.0, 1.0), MEMBERSHIP_DECIMALS)
    }

    /// Evaluates the degree of membership of a string value: 1.0 on exact
    /// match for `Categorical` shapes, 0 otherwise.
    pub fn membership_text(&self, value: &str) -> f64 {
        match self {
            SetShape::Categorical { value: expected } => {
                if value == expected {
                    1.0
                } else {
                    0.0
                }
            }
            _ => 0.0,
        }
    }

    /// True for shapes evaluated over a numeric universe.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, SetShape::Categorical { .. })
    }

    /// Checks the shape's control points, naming `variable` and `label` in
    /// any error.
    pub(crate) fn validate(&self, variable: &str, label: &str) -> Result<()> {
        let fail = |reason: String| {
            Err(KomposError::InvalidSet {
                variable: variable.to_string(),
                label: label.to_string(),
                reason,
            })
        };
        match self {
            SetShape::ShoulderLow { threshold, height }
            | SetShape::ShoulderHigh { threshold, height } => {
                if !threshold.is_finite() {
                    return fail(format!("threshold {threshold} is not finite"));
                }
                if !(*height > 0.0 && *height <= 1.0) {
                    return fail(format!("height {height} must be in (0, 1]"));
                }
            }
            SetShape::RampLow { shoulder, foot } => {
                if !shoulder.is_finite() || !foot.is_finite() || shoulder >= foot {
                    return fail(format!(
                        "requires shoulder < foot, got shoulder {shoulder}, foot {foot}"
                    ));
                }
            }
            SetShape::RampHigh { foot, shoulder } => {
                if !shoulder.is_finite() || !foot.is_finite() || foot >= shoulder {
                    return fail(format!(
                        "requires foot < shoulder, got foot {foot}, shoulder {shoulder}"
                    ));
                }
            }
            SetShape::Triangle { left, peak, right } => {
                let finite = left.is_finite() && peak.is_finite() && right.is_finite();
                if !finite || !(left < peak && peak < right) {
                    return fail(format!(
                        "requires left < peak < right, got {left}, {peak}, {right}"
                    ));
                }
            }
            SetShape::Trapezoid {
                left,
                plateau_left,
                plateau_right,
                right,
                plateau,
            } => {
                let points = [*left, *plateau_left, *plateau_right, *right];
                if points.iter().any(|p| !p.is_finite()) {
                    return fail("control points must be finite".to_string());
                }
                let ordered =
                    left <= plateau_left && plateau_left <= plateau_right && plateau_right <= right;
                if !ordered || left >= right {
                    return fail(format!(
                        "control points must be non-decreasing with left < right, \
                         got {left}, {plateau_left}, {plateau_right}, {right}"
                    ));
                }
                if !(*plateau > 0.0 && *plateau <= 1.0) {
                    return fail(format!("plateau {plateau} must be in (0, 1]"));
                }
            }
            SetShape::Categorical { value } => {
                if value.is_empty() {
                    return fail("match value must not be empty".to_string());
                }
            }
        }
        Ok(())
    }
}

/// A named fuzzy set: a linguistic label plus its membership shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySet {
    pub label: String,
    pub shape: SetShape,
}

impl FuzzySet {
    pub fn new(label: impl Into<String>, shape: SetShape) -> Self {
        Self {
            label: label.into(),
            shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_open_boundaries_and_peak() {
        let tri = SetShape::Triangle {
            left: 30.0,
            peak: 45.0,
            right: 55.0,
        };
        assert_eq!(tri.membership(30.0), 0.0);
        assert_eq!(tri.membership(45.0), 1.0);
        assert_eq!(tri.membership(55.0), 0.0);
        assert_eq!(tri.membership(20.0), 0.0);
        assert_eq!(tri.membership(60.0), 0.0);
    }

    #[test]
    fn triangle_is_piecewise_linear() {
        let tri = SetShape::Triangle {
            left: 0.0,
            peak: 10.0,
            right: 30.0,
        };
        assert_eq!(tri.membership(5.0), 0.5);
        assert_eq!(tri.membership(2.5), 0.25);
        assert_eq!(tri.membership(20.0), 0.5);
        assert_eq!(tri.membership(25.0), 0.25);
    }

    #[test]
    fn trapezoid_plateau_holds_coefficient() {
        let trap = SetShape::Trapezoid {
            left: 25.0,
            plateau_left: 35.0,
            plateau_right: 45.0,
            right: 50.0,
            plateau: 0.8,
        };
        assert_eq!(trap.membership(35.0), 0.8);
        assert_eq!(trap.membership(40.0), 0.8);
        assert_eq!(trap.membership(45.0), 0.8);
        // Rise and fall scale toward the plateau coefficient.
        assert_eq!(trap.membership(30.0), 0.4);
        assert_eq!(trap.membership(47.5), 0.4);
        assert_eq!(trap.membership(25.0), 0.0);
        assert_eq!(trap.membership(50.0), 0.0);
    }

    #[test]
    fn trapezoid_hard_edge_keeps_plateau_at_boundary() {
        // plateau_right == right: the drop happens after the edge point.
        let trap = SetShape::Trapezoid {
            left: 7.0,
            plateau_left: 14.0,
            plateau_right: 21.0,
            right: 21.0,
            plateau: 1.0,
        };
        assert_eq!(trap.membership(21.0), 1.0);
        assert_eq!(trap.membership(21.1), 0.0);
        assert_eq!(trap.membership(7.0), 0.0);
        assert_eq!(trap.membership(10.5), 0.5);
    }

    #[test]
    fn shoulders_step_at_threshold() {
        let low = SetShape::ShoulderLow {
            threshold: 25.0,
            height: 1.0,
        };
        assert_eq!(low.membership(20.0), 1.0);
        assert_eq!(low.membership(25.0), 1.0);
        assert_eq!(low.membership(25.1), 0.0);

        let high = SetShape::ShoulderHigh {
            threshold: 65.0,
            height: 1.0,
        };
        assert_eq!(high.membership(64.9), 0.0);
        assert_eq!(high.membership(65.0), 1.0);
        assert_eq!(high.membership(80.0), 1.0);
    }

    #[test]
    fn ramps_interpolate_between_shoulder_and_foot() {
        let low = SetShape::RampLow {
            shoulder: 28.0,
            foot: 35.0,
        };
        assert_eq!(low.membership(0.0), 1.0);
        assert_eq!(low.membership(28.0), 1.0);
        assert_eq!(low.membership(31.5), 0.5);
        assert_eq!(low.membership(35.0), 0.0);

        let high = SetShape::RampHigh {
            foot: 6.0,
            shoulder: 8.0,
        };
        assert_eq!(high.membership(6.0), 0.0);
        assert_eq!(high.membership(7.0), 0.5);
        assert_eq!(high.membership(8.0), 1.0);
        assert_eq!(high.membership(10.0), 1.0);
    }

    #[test]
    fn degrees_are_rounded_to_three_places() {
        let tri = SetShape::Triangle {
            left: 5.0,
            peak: 7.0,
            right: 9.0,
        };
        // (5.82 - 5) / 2 = 0.41 exactly after rounding.
        assert_eq!(tri.membership(5.82), 0.41);
        let ramp = SetShape::RampLow {
            shoulder: 0.0,
            foot: 3.0,
        };
        // 2/3 would recur; the stored degree is the 3-place rounding.
        assert_eq!(ramp.membership(1.0), 0.667);
    }

    #[test]
    fn categorical_matches_exactly() {
        let set = SetShape::Categorical {
            value: "Bau Busuk".to_string(),
        };
        assert_eq!(set.membership_text("Bau Busuk"), 1.0);
        assert_eq!(set.membership_text("bau busuk"), 0.0);
        assert_eq!(set.membership_text(""), 0.0);
        assert_eq!(set.membership(9.0), 0.0);
    }

    #[test]
    fn numeric_shapes_ignore_text() {
        let tri = SetShape::Triangle {
            left: 0.0,
            peak: 1.0,
            right: 2.0,
        };
        assert_eq!(tri.membership_text("1.0"), 0.0);
    }

    #[test]
    fn validation_rejects_bad_control_points() {
        let degenerate = SetShape::Triangle {
            left: 5.0,
            peak: 5.0,
            right: 9.0,
        };
        assert!(degenerate.validate("ph", "netral").is_err());

        let backwards = SetShape::RampLow {
            shoulder: 40.0,
            foot: 30.0,
        };
        assert!(backwards.validate("kelembapan", "kering").is_err());

        let bad_plateau = SetShape::Trapezoid {
            left: 0.0,
            plateau_left: 1.0,
            plateau_right: 2.0,
            right: 3.0,
            plateau: 0.0,
        };
        assert!(bad_plateau.validate("x", "y").is_err());

        let unordered = SetShape::Trapezoid {
            left: 0.0,
            plateau_left: 5.0,
            plateau_right: 4.0,
            right: 6.0,
            plateau: 1.0,
        };
        assert!(unordered.validate("x", "y").is_err());

        let nan = SetShape::ShoulderLow {
            threshold: f64::NAN,
            height: 1.0,
        };
        assert!(nan.validate("x", "y").is_err());
    }

    #[test]
    fn validation_accepts_source_shapes() {
        let shapes = [
            SetShape::RampLow {
                shoulder: 28.0,
                foot: 35.0,
            },
            SetShape::Triangle {
                left: 30.0,
                peak: 45.0,
                right: 55.0,
            },
            SetShape::Trapezoid {
                left: 25.0,
                plateau_left: 35.0,
                plateau_right: 45.0,
                right: 45.0,
                plateau: 1.0,
            },
            SetShape::ShoulderHigh {
                threshold: 65.0,
                height: 1.0,
            },
        ];
        for shape in &shapes {
            assert!(shape.validate("suhu", "s").is_ok());
        }
    }

    #[test]
    fn round_dp_behaves_decimally() {
        assert_eq!(round_dp(0.40999999999999, 3), 0.41);
        assert_eq!(round_dp(0.66666666, 3), 0.667);
        assert_eq!(round_dp(0.93407, 4), 0.9341);
        assert_eq!(round_dp(0.93403, 4), 0.934);
        assert_eq!(round_dp(1.0, 3), 1.0);
    }
}
