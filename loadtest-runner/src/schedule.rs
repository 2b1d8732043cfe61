//! Ramping VU schedule

use loadtest_config::Stage;
use std::time::Duration;

/// Number of VUs that should be active `elapsed` into the profile.
///
/// Each stage ramps linearly from the previous stage's target (0 for the
/// first stage) to its own target. Fractional counts are truncated. Past the
/// end of the last stage the target is 0.
pub fn target_vus_at(stages: &[Stage], elapsed: Duration) -> u32 {
    let mut stage_start = Duration::ZERO;
    let mut previous = 0u32;

    for stage in stages {
        let stage_end = stage_start + stage.duration;
        if elapsed < stage_end {
            let progress = (elapsed - stage_start).as_secs_f64() / stage.duration.as_secs_f64();
            let diff = f64::from(stage.target) - f64::from(previous);
            return (f64::from(previous) + diff * progress) as u32;
        }
        stage_start = stage_end;
        previous = stage.target;
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadtest_config::LoadProfile;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_default_profile_ramp() {
        let stages = LoadProfile::default().stages;

        assert_eq!(target_vus_at(&stages, secs(0.0)), 0);
        assert_eq!(target_vus_at(&stages, secs(30.0)), 25);
        assert_eq!(target_vus_at(&stages, secs(59.9)), 49);
        assert_eq!(target_vus_at(&stages, secs(60.0)), 50);
        assert_eq!(target_vus_at(&stages, secs(90.0)), 75);
        assert_eq!(target_vus_at(&stages, secs(120.0)), 100);
        assert_eq!(target_vus_at(&stages, secs(150.0)), 50);
        assert_eq!(target_vus_at(&stages, secs(179.0)), 1);
        assert_eq!(target_vus_at(&stages, secs(180.0)), 0);
        assert_eq!(target_vus_at(&stages, secs(500.0)), 0);
    }

    #[test]
    fn test_flat_stage_holds_target() {
        let stages = vec![
            Stage::new(secs(10.0), 10),
            Stage::new(secs(10.0), 10),
        ];
        assert_eq!(target_vus_at(&stages, secs(10.0)), 10);
        assert_eq!(target_vus_at(&stages, secs(15.0)), 10);
        assert_eq!(target_vus_at(&stages, secs(19.99)), 10);
    }

    #[test]
    fn test_empty_profile() {
        assert_eq!(target_vus_at(&[], secs(1.0)), 0);
    }
}
