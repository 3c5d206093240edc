//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]. A JSON document may override any subset
//! of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning document is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning value `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_size: f32,
    pub object_size: f32,
    pub player_speed: f32,
    pub player_bottom_margin: f32,
    pub initial_object_speed: f64,
    pub speed_growth: f64,
    pub initial_spawn_interval_ms: f64,
    pub spawn_interval_decay: f64,
    pub ratchet_period_ms: f64,
    pub coin_probability: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: PLAYER_SIZE,
            object_size: OBJECT_SIZE,
            player_speed: PLAYER_SPEED,
            player_bottom_margin: PLAYER_BOTTOM_MARGIN,
            initial_object_speed: INITIAL_OBJECT_SPEED,
            speed_growth: SPEED_GROWTH,
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            ratchet_period_ms: RATCHET_PERIOD_MS,
            coin_probability: COIN_PROBABILITY,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_size", self.player_size as f64),
            ("object_size", self.object_size as f64),
            ("player_speed", self.player_speed as f64),
            ("initial_object_speed", self.initial_object_speed),
            ("initial_spawn_interval_ms", self.initial_spawn_interval_ms),
            ("ratchet_period_ms", self.ratchet_period_ms),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }

        // Speed may only ramp up, the spawn interval may only ramp down
        if !(self.speed_growth.is_finite() && self.speed_growth >= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "speed_growth",
                value: self.speed_growth,
            });
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "spawn_interval_decay",
                value: self.spawn_interval_decay,
            });
        }
        if !(0.0..=1.0).contains(&self.coin_probability) {
            return Err(TuningError::OutOfRange {
                field: "coin_probability",
                value: self.coin_probability,
            });
        }
        if !(self.player_bottom_margin.is_finite() && self.player_bottom_margin >= 0.0) {
            return Err(TuningError::OutOfRange {
                field: "player_bottom_margin",
                value: self.player_bottom_margin as f64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "player_speed": 9.0 }"#).unwrap();
        assert_eq!(tuning.player_speed, 9.0);
        assert_eq!(tuning.object_size, OBJECT_SIZE);
        assert_eq!(tuning.initial_spawn_interval_ms, INITIAL_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_rejects_shrinking_speed() {
        let err = Tuning::from_json(r#"{ "speed_growth": 0.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "speed_growth",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_probability_and_json() {
        assert!(Tuning::from_json(r#"{ "coin_probability": 1.5 }"#).is_err());
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Json(_))
        ));
    }
}
