// src/services/derive.rs

//! Derived views over one fetched event sequence.

use crate::error::{AppError, Result};
use crate::models::Earthquake;

/// Most recent event: the first one in feed order.
pub fn latest(events: Vec<Earthquake>) -> Result<Earthquake> {
    events.into_iter().next().ok_or(AppError::NoData)
}

/// Event with the largest magnitude. The earliest in feed order wins ties.
pub fn biggest(events: Vec<Earthquake>) -> Result<Earthquake> {
    events
        .into_iter()
        .reduce(|best, next| {
            if next.magnitude > best.magnitude {
                next
            } else {
                best
            }
        })
        .ok_or(AppError::NoData)
}

/// Events strictly above `threshold`, in feed order.
pub fn bigger_than(events: Vec<Earthquake>, threshold: f64) -> Vec<Earthquake> {
    events
        .into_iter()
        .filter(|quake| quake.magnitude > threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn quake(location: &str, magnitude: f64) -> Earthquake {
        Earthquake {
            location: location.to_string(),
            magnitude,
            occurred_at: "2026-10-18 00:00:00".to_string(),
        }
    }

    fn sample() -> Vec<Earthquake> {
        vec![quake("Tokyo", 3.2), quake("Lima", 5.8), quake("Fiji", 4.0)]
    }

    #[test]
    fn latest_is_first_in_feed_order() {
        assert_eq!(latest(sample()).unwrap().location, "Tokyo");
    }

    #[test]
    fn biggest_picks_max_magnitude() {
        assert_eq!(biggest(sample()).unwrap().location, "Lima");
    }

    #[test]
    fn biggest_tie_goes_to_first() {
        let events = vec![quake("A", 1.0), quake("B", 4.5), quake("C", 4.5)];
        assert_eq!(biggest(events).unwrap().location, "B");
    }

    #[test]
    fn bigger_than_is_strict() {
        let result = bigger_than(sample(), 4.0);
        assert_eq!(result, vec![quake("Lima", 5.8)]);
        assert!(bigger_than(sample(), 6.0).is_empty());
    }

    #[test]
    fn bigger_than_accepts_negative_threshold() {
        let events = vec![quake("A", -1.5), quake("B", -0.2), quake("C", 0.0)];
        let result = bigger_than(events, -1.0);
        assert_eq!(result, vec![quake("B", -0.2), quake("C", 0.0)]);
    }

    #[test]
    fn empty_feed() {
        assert!(matches!(latest(Vec::new()), Err(AppError::NoData)));
        assert!(matches!(biggest(Vec::new()), Err(AppError::NoData)));
        assert!(bigger_than(Vec::new(), 1.0).is_empty());
    }

    fn arb_events() -> impl Strategy<Value = Vec<Earthquake>> {
        prop::collection::vec((-2.0f64..10.0, "[a-z]{1,8}"), 0..32).prop_map(|items| {
            items
                .into_iter()
                .map(|(magnitude, location)| quake(&location, magnitude))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn biggest_dominates_every_event(events in arb_events()) {
            prop_assume!(!events.is_empty());
            let top = biggest(events.clone()).unwrap();
            for event in &events {
                prop_assert!(top.magnitude >= event.magnitude);
            }
        }

        #[test]
        fn bigger_than_is_sound_and_complete(events in arb_events(), threshold in -3.0f64..11.0) {
            let result = bigger_than(events.clone(), threshold);
            prop_assert!(result.iter().all(|e| e.magnitude > threshold));

            let expected: Vec<Earthquake> = events
                .iter()
                .filter(|e| e.magnitude > threshold)
                .cloned()
                .collect();
            prop_assert_eq!(result, expected);
        }
    }
}
