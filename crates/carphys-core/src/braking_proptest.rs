#[cfg(test)]
mod proptest_braking {
    use crate::braking::*;
    use crate::surface::SurfaceCondition;
    use proptest::prelude::*;

    fn surface() -> impl Strategy<Value = SurfaceCondition> {
        prop_oneof![Just(SurfaceCondition::Dry), Just(SurfaceCondition::Wet)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(5000))]

        // Property: total is exactly the sum of its parts, and each rounded
        // field stays within half a tenth of the raw value
        #[test]
        fn total_is_reaction_plus_braking(
            speed in 0.0f64..=400.0,
            condition in surface(),
        ) {
            let res = BrakingModel::compute(speed, condition).unwrap();
            prop_assert_eq!(
                res.total_distance_m,
                res.reaction_distance_m + res.braking_distance_m
            );

            let r = res.readout();
            prop_assert!((r.total_m - res.total_distance_m).abs() <= 0.05 + 1e-9);
            prop_assert!((r.reaction_m - res.reaction_distance_m).abs() <= 0.05 + 1e-9);
            prop_assert!((r.braking_m - res.braking_distance_m).abs() <= 0.05 + 1e-9);
        }

        // Property: faster always means a longer stopping distance
        #[test]
        fn stopping_distance_grows_with_speed(
            s1 in 0.0f64..=300.0,
            delta in 0.001f64..=100.0,
            condition in surface(),
        ) {
            let slow = BrakingModel::compute(s1, condition).unwrap();
            let fast = BrakingModel::compute(s1 + delta, condition).unwrap();
            prop_assert!(
                slow.total_distance_m < fast.total_distance_m,
                "s1={}, s2={}, slow={:?}, fast={:?}", s1, s1 + delta, slow, fast
            );
        }

        // Property: a wet road never brakes shorter than a dry one
        #[test]
        fn wet_brakes_longer_than_dry(speed in 0.001f64..=400.0) {
            let dry = BrakingModel::compute(speed, SurfaceCondition::Dry).unwrap();
            let wet = BrakingModel::compute(speed, SurfaceCondition::Wet).unwrap();
            prop_assert!(wet.braking_distance_m > dry.braking_distance_m);
            prop_assert_eq!(wet.reaction_distance_m, dry.reaction_distance_m);
        }

        // Property: every negative speed is refused
        #[test]
        fn negative_speed_always_rejected(speed in -1000.0f64..-0.000001) {
            let is_invalid = matches!(
                BrakingModel::compute(speed, SurfaceCondition::Dry),
                Err(BrakingError::InvalidSpeed { .. })
            );
            prop_assert!(is_invalid);
        }
    }
}
