//! Mamdani fuzzy controller for CRAC output power.
//!
//! Two inputs, one output, eleven rules:
//!
//! ```text
//!                  error_rate
//!              │  N    Z    P
//!         ─────┼───────────────
//!          NG  │  P0   P0   P0
//!          NP  │  P1   P2   P3
//!  error   ZE  │  P3   P4   P5
//!          PP  │  P5   P6   P7
//!          PG  │  P8   P8   P8
//! ```
//!
//! The membership functions and the rule table are plain `const` data.
//! [`infer`] clips its inputs, fires every rule with `min` conjunction,
//! keeps the strongest activation per output set, aggregates the clipped
//! output curves with `max` and defuzzifies by centroid over the integer
//! grid `0..=100`.

use crate::error::InferenceError;

// ---------------------------------------------------------------------------
// Membership functions
// ---------------------------------------------------------------------------

/// Piecewise-linear membership shape.
///
/// A triangle whose peak coincides with a foot (`a == b` or `b == c`) is a
/// shoulder and evaluates to 1 at the peak.  A trapezoid is 1 on its closed
/// plateau `[b, c]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Triangle { a: f32, b: f32, c: f32 },
    Trapezoid { a: f32, b: f32, c: f32, d: f32 },
}

impl Shape {
    /// Degree of membership of `x`, in `[0, 1]`.  Non-finite input maps to 0.
    pub fn degree(&self, x: f32) -> f32 {
        match *self {
            Self::Triangle { a, b, c } => {
                if x == b {
                    1.0
                } else if a < x && x < b {
                    (x - a) / (b - a)
                } else if b < x && x < c {
                    (c - x) / (c - b)
                } else {
                    0.0
                }
            }
            Self::Trapezoid { a, b, c, d } => {
                if b <= x && x <= c {
                    1.0
                } else if a < x && x < b {
                    (x - a) / (b - a)
                } else if c < x && x < d {
                    (d - x) / (d - c)
                } else {
                    0.0
                }
            }
        }
    }
}

/// A named fuzzy set over one linguistic variable.
#[derive(Debug, Clone, Copy)]
pub struct FuzzySet {
    pub label: &'static str,
    pub shape: Shape,
}

const fn tri(label: &'static str, a: f32, b: f32, c: f32) -> FuzzySet {
    FuzzySet {
        label,
        shape: Shape::Triangle { a, b, c },
    }
}

const fn trap(label: &'static str, a: f32, b: f32, c: f32, d: f32) -> FuzzySet {
    FuzzySet {
        label,
        shape: Shape::Trapezoid { a, b, c, d },
    }
}

/// A named scalar domain partitioned into fuzzy sets.
#[derive(Debug, Clone, Copy)]
pub struct LinguisticVariable<const N: usize> {
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub sets: [FuzzySet; N],
}

impl<const N: usize> LinguisticVariable<N> {
    /// Clamp `x` into the variable's domain.  NaN passes through unchanged.
    pub fn clip(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// Membership degree of `x` in every set, in table order.
    pub fn fuzzify(&self, x: f32) -> [f32; N] {
        let mut out = [0.0; N];
        for (slot, set) in out.iter_mut().zip(self.sets.iter()) {
            *slot = set.shape.degree(x);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Linguistic variables
// ---------------------------------------------------------------------------

/// Temperature error (°C above setpoint).
pub const ERROR: LinguisticVariable<5> = LinguisticVariable {
    name: "error",
    min: -10.0,
    max: 10.0,
    sets: [
        trap("NG", -10.0, -10.0, -3.0, -1.5),
        tri("NP", -2.0, -1.0, 0.0),
        tri("ZE", -0.5, 0.0, 0.5),
        tri("PP", 0.0, 1.0, 2.0),
        trap("PG", 1.5, 3.0, 10.0, 10.0),
    ],
};

/// Change of error since the previous tick (°C/min).
pub const ERROR_RATE: LinguisticVariable<3> = LinguisticVariable {
    name: "error_rate",
    min: -2.0,
    max: 2.0,
    sets: [
        trap("N", -2.0, -2.0, -0.5, 0.0),
        tri("Z", -0.1, 0.0, 0.1),
        trap("P", 0.0, 0.5, 2.0, 2.0),
    ],
};

/// CRAC output power (%).
pub const POWER: LinguisticVariable<9> = LinguisticVariable {
    name: "power",
    min: 0.0,
    max: 100.0,
    sets: [
        tri("P0", 0.0, 0.0, 10.0),
        tri("P1", 5.0, 15.0, 25.0),
        tri("P2", 20.0, 30.0, 40.0),
        tri("P3", 35.0, 42.0, 50.0),
        tri("P4", 45.0, 50.0, 55.0),
        tri("P5", 50.0, 58.0, 65.0),
        tri("P6", 60.0, 70.0, 80.0),
        tri("P7", 75.0, 85.0, 95.0),
        tri("P8", 90.0, 100.0, 100.0),
    ],
};

/// Index into [`ERROR`]'s sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum ErrorTerm {
    Ng = 0,
    Np = 1,
    Ze = 2,
    Pp = 3,
    Pg = 4,
}

/// Index into [`ERROR_RATE`]'s sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum RateTerm {
    N = 0,
    Z = 1,
    P = 2,
}

/// Index into [`POWER`]'s sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum PowerTerm {
    P0 = 0,
    P1 = 1,
    P2 = 2,
    P3 = 3,
    P4 = 4,
    P5 = 5,
    P6 = 6,
    P7 = 7,
    P8 = 8,
}

// ---------------------------------------------------------------------------
// Rule base
// ---------------------------------------------------------------------------

/// `IF error IS <error> [AND error_rate IS <rate>] THEN power IS <power>`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub error: ErrorTerm,
    /// `None` means the rule ignores the error rate.
    pub rate: Option<RateTerm>,
    pub power: PowerTerm,
}

const fn rule(error: ErrorTerm, rate: Option<RateTerm>, power: PowerTerm) -> Rule {
    Rule { error, rate, power }
}

pub const RULES: [Rule; 11] = [
    rule(ErrorTerm::Ze, Some(RateTerm::Z), PowerTerm::P4),
    rule(ErrorTerm::Ze, Some(RateTerm::P), PowerTerm::P5),
    rule(ErrorTerm::Ze, Some(RateTerm::N), PowerTerm::P3),
    rule(ErrorTerm::Pp, Some(RateTerm::Z), PowerTerm::P6),
    rule(ErrorTerm::Pp, Some(RateTerm::P), PowerTerm::P7),
    rule(ErrorTerm::Pp, Some(RateTerm::N), PowerTerm::P5),
    rule(ErrorTerm::Np, Some(RateTerm::Z), PowerTerm::P2),
    rule(ErrorTerm::Np, Some(RateTerm::P), PowerTerm::P3),
    rule(ErrorTerm::Np, Some(RateTerm::N), PowerTerm::P1),
    rule(ErrorTerm::Pg, None, PowerTerm::P8),
    rule(ErrorTerm::Ng, None, PowerTerm::P0),
];

impl Rule {
    /// Firing strength given fuzzified inputs.
    pub fn strength(&self, error: &[f32; 5], rate: &[f32; 3]) -> f32 {
        let e = error[self.error as usize];
        match self.rate {
            Some(r) => e.min(rate[r as usize]),
            None => e,
        }
    }
}

// ---------------------------------------------------------------------------
// Inference
// ---------------------------------------------------------------------------

/// Number of samples on the output grid (`0, 1, …, 100`).
pub const OUTPUT_SAMPLES: usize = 101;

/// Clamp an error value into `[-10, 10]`.
pub fn clip_error(error: f32) -> f32 {
    ERROR.clip(error)
}

/// Clamp an error-rate value into `[-2, 2]`.
pub fn clip_error_rate(error_rate: f32) -> f32 {
    ERROR_RATE.clip(error_rate)
}

/// Strongest firing strength per output set, indexed by [`PowerTerm`].
pub fn evaluate_rules(error: f32, error_rate: f32) -> [f32; 9] {
    let mu_e = ERROR.fuzzify(clip_error(error));
    let mu_r = ERROR_RATE.fuzzify(clip_error_rate(error_rate));

    let mut activation = [0.0_f32; 9];
    for r in &RULES {
        let slot = &mut activation[r.power as usize];
        *slot = slot.max(r.strength(&mu_e, &mu_r));
    }
    activation
}

/// Crisp CRAC power for the given error and error rate.
///
/// Returns [`InferenceError::NoRuleFired`] when the aggregated output has
/// zero area.  The sets cover both input domains without gaps, so this only
/// happens for non-finite inputs.
pub fn infer(error: f32, error_rate: f32) -> Result<f32, InferenceError> {
    let activation = evaluate_rules(error, error_rate);
    if !activation.iter().any(|&a| a > 0.0) {
        return Err(InferenceError::NoRuleFired);
    }
    centroid(&aggregate(&activation)).ok_or(InferenceError::NoRuleFired)
}

fn sample_x(i: usize) -> f32 {
    POWER.min + i as f32
}

/// Max-aggregate every output set clipped at its activation.
fn aggregate(activation: &[f32; 9]) -> [f32; OUTPUT_SAMPLES] {
    let mut curve = [0.0_f32; OUTPUT_SAMPLES];
    for (i, y) in curve.iter_mut().enumerate() {
        let x = sample_x(i);
        for (set, &level) in POWER.sets.iter().zip(activation.iter()) {
            if level > 0.0 {
                *y = y.max(set.shape.degree(x).min(level));
            }
        }
    }
    curve
}

/// Area-weighted centroid, treating consecutive samples as linear segments.
fn centroid(curve: &[f32; OUTPUT_SAMPLES]) -> Option<f32> {
    let mut moment = 0.0_f32;
    let mut area = 0.0_f32;

    for i in 1..OUTPUT_SAMPLES {
        let (x1, x2) = (sample_x(i - 1), sample_x(i));
        let (y1, y2) = (curve[i - 1], curve[i]);
        if y1 == 0.0 && y2 == 0.0 {
            continue;
        }
        let w = x2 - x1;
        let (cx, a) = if y1 == y2 {
            (0.5 * (x1 + x2), w * y1)
        } else if y1 == 0.0 {
            (x1 + 2.0 / 3.0 * w, 0.5 * w * y2)
        } else if y2 == 0.0 {
            (x1 + w / 3.0, 0.5 * w * y1)
        } else {
            (
                x1 + w * (y1 + 2.0 * y2) / (3.0 * (y1 + y2)),
                0.5 * w * (y1 + y2),
            )
        };
        moment += cx * a;
        area += a;
    }

    (area > 0.0).then(|| moment / area)
}
