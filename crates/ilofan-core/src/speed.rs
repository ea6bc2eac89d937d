// ── Speed translation and validation ──
//
// Operators speak percent (10-100); the controller speaks PWM duty cycle
// (0-255). Translation is exact integer arithmetic with round-half-away-
// from-zero, so `(p * 255 + 50) / 100` for the non-negative inputs here.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::CoreError;

/// Lowest percentage an operator may request.
pub const MIN_PERCENT: u8 = 10;
/// Highest percentage an operator may request.
pub const MAX_PERCENT: u8 = 100;
/// Full-scale native duty cycle.
pub const NATIVE_MAX: u8 = 255;

/// Translate a percentage into the controller's 0-255 duty cycle.
///
/// Rounds half away from zero: 10 % is 25.5 and becomes 26. Values above
/// 100 saturate at 255. The 10 % floor is enforced by [`SpeedRequest`]
/// before anything reaches this function.
pub fn to_native_speed(percent: u8) -> u8 {
    let percent = u16::from(percent.min(MAX_PERCENT));
    let native = (percent * u16::from(NATIVE_MAX) + 50) / 100;
    u8::try_from(native).unwrap_or(NATIVE_MAX)
}

/// One problem with a speed request. Validation collects all of them.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("fans: field is required")]
    Missing,

    #[error("fans: expected a list of percentages")]
    NotAList,

    #[error("fans: at least one speed is required")]
    Empty,

    #[error("fans[{index}]: {value} is not an integer")]
    NotAnInteger { index: usize, value: String },

    #[error("fans[{index}]: {value} is outside 10-100")]
    /// Widened so any JSON integer is reported as written.
    OutOfRange { index: usize, value: i128 },

    #[error("fans: controller reports {expected} fans but {actual} speeds were given")]
    LengthMismatch { expected: usize, actual: usize },
}

/// A validated, non-empty list of per-fan percentages in `[10, 100]`.
///
/// Position `i` addresses fan `i` of the most recent telemetry snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeedRequest {
    percentages: Vec<u8>,
}

impl SpeedRequest {
    /// Validate a list of percentages, reporting every offending position.
    pub fn from_percentages<I>(values: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = i64>,
    {
        Self::collect(values.into_iter().map(|v| Ok(i128::from(v))))
    }

    /// Validate a raw `{ "fans": [..] }` body.
    ///
    /// Unknown fields are ignored. Non-integer and out-of-range entries are
    /// all reported together.
    pub fn from_json(body: &Value) -> Result<Self, CoreError> {
        let Some(fans) = body.get("fans") else {
            return Err(CoreError::Validation {
                violations: vec![Violation::Missing],
            });
        };
        let Some(items) = fans.as_array() else {
            return Err(CoreError::Validation {
                violations: vec![Violation::NotAList],
            });
        };

        Self::collect(
            items
                .iter()
                .map(|item| {
                    item.as_i64()
                        .map(i128::from)
                        .or_else(|| item.as_u64().map(i128::from))
                        .ok_or_else(|| item.to_string())
                }),
        )
    }

    /// `Err(raw)` entries are non-integers, kept as their JSON text.
    fn collect<I>(entries: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = Result<i128, String>>,
    {
        let mut violations = Vec::new();
        let mut percentages = Vec::new();
        let mut seen = 0_usize;

        for (index, entry) in entries.into_iter().enumerate() {
            seen += 1;
            match entry {
                Ok(value) => match u8::try_from(value) {
                    Ok(p) if (MIN_PERCENT..=MAX_PERCENT).contains(&p) => percentages.push(p),
                    _ => violations.push(Violation::OutOfRange { index, value }),
                },
                Err(value) => violations.push(Violation::NotAnInteger { index, value }),
            }
        }

        if seen == 0 {
            violations.push(Violation::Empty);
        }

        if violations.is_empty() {
            Ok(Self { percentages })
        } else {
            Err(CoreError::Validation { violations })
        }
    }

    /// Same percentage for `count` fans. Fan-out is a caller convenience;
    /// the result is validated like any other request.
    pub fn uniform(percent: i64, count: usize) -> Result<Self, CoreError> {
        Self::from_percentages(std::iter::repeat_n(percent, count))
    }

    /// Reject a request whose length differs from the controller's fan count.
    pub fn check_fan_count(&self, fan_count: usize) -> Result<(), CoreError> {
        if self.percentages.len() == fan_count {
            Ok(())
        } else {
            Err(CoreError::Validation {
                violations: vec![Violation::LengthMismatch {
                    expected: fan_count,
                    actual: self.percentages.len(),
                }],
            })
        }
    }

    pub fn percentages(&self) -> &[u8] {
        &self.percentages
    }

    pub fn len(&self) -> usize {
        self.percentages.len()
    }

    /// Always `false`: validation rejects empty requests.
    pub fn is_empty(&self) -> bool {
        self.percentages.is_empty()
    }

    /// `(fan index, native duty cycle)` pairs in position order.
    pub fn native_speeds(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.percentages
            .iter()
            .enumerate()
            .map(|(index, &p)| (index, to_native_speed(p)))
    }
}
