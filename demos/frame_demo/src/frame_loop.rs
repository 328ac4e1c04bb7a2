//! Fixed-rate frame loop driving an [`EntityManager`].

use std::time::{Duration, Instant};

use anyhow::Context;
use ecs_runtime::EntityManager;
use tracing::{debug, info, warn};

/// Frame data handed to every system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// 1-based frame counter.
    pub frame: u64,
    /// Seconds simulated by this frame.
    pub dt: f64,
}

/// Configuration for the frame loop.
#[derive(Debug, Clone)]
pub struct FrameLoopConfig {
    /// Target frames per second.
    pub frame_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
}

impl FrameLoopConfig {
    /// Wall-clock budget of one frame.
    ///
    /// # Errors
    ///
    /// Fails when `frame_rate` does not give a finite positive duration
    /// (zero, negative, NaN, or so small that its reciprocal overflows).
    pub fn frame_duration(&self) -> anyhow::Result<Duration> {
        anyhow::ensure!(self.frame_rate > 0.0, "frame rate {} is not positive", self.frame_rate);
        Duration::try_from_secs_f64(1.0 / self.frame_rate)
            .with_context(|| format!("frame rate {} gives no usable frame duration", self.frame_rate))
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            max_frames: 0,
        }
    }
}

/// Run frames until `max_frames` is reached or a system fails.
///
/// Returns the number of frames completed.
///
/// # Errors
///
/// Fails before the first frame if the frame rate is unusable. Otherwise
/// returns the first frame error as an
/// [`EcsError`](ecs_runtime::EcsError); the loop stops there.
pub fn run(ecs: &mut EntityManager<FrameTime>, config: &FrameLoopConfig) -> anyhow::Result<u64> {
    let frame_duration = config.frame_duration()?;
    let dt = frame_duration.as_secs_f64();
    let mut frames = 0u64;

    info!(
        frame_rate = config.frame_rate,
        max_frames = config.max_frames,
        "starting frame loop"
    );

    loop {
        let start = Instant::now();

        let time = FrameTime {
            frame: ecs.frame() + 1,
            dt,
        };
        ecs.do_frame(&time)?;
        frames += 1;

        if config.max_frames > 0 && frames >= config.max_frames {
            info!(frames, "frame loop complete");
            return Ok(frames);
        }

        let elapsed = start.elapsed();
        if elapsed < frame_duration {
            std::thread::sleep(frame_duration - elapsed);
        } else {
            warn!(
                frame = time.frame,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = frame_duration.as_millis() as u64,
                "frame exceeded time budget"
            );
        }
        debug!(frame = time.frame, "frame done");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use ecs_runtime::{EcsError, FnSystem, World, handle};

    use super::*;

    #[test]
    fn test_run_limited_frames() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_in_system = Rc::clone(&seen);
        let mut ecs: EntityManager<FrameTime> = EntityManager::new();
        ecs.add_system(
            handle(FnSystem::new(
                "record",
                move |_world: &mut World, time: &FrameTime| -> anyhow::Result<()> {
                    seen_in_system.borrow_mut().push(time.frame);
                    Ok(())
                },
            )),
            0,
        )
        .unwrap();

        let config = FrameLoopConfig {
            frame_rate: 1000.0,
            max_frames: 5,
        };
        assert_eq!(run(&mut ecs, &config).unwrap(), 5);
        assert_eq!(ecs.frame(), 5);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_run_stops_on_failure() {
        let mut ecs: EntityManager<FrameTime> = EntityManager::new();
        ecs.add_system(
            handle(FnSystem::new(
                "fail_on_third",
                |_world: &mut World, time: &FrameTime| -> anyhow::Result<()> {
                    anyhow::ensure!(time.frame < 3, "frame {} rejected", time.frame);
                    Ok(())
                },
            )),
            0,
        )
        .unwrap();

        let config = FrameLoopConfig {
            frame_rate: 1000.0,
            max_frames: 10,
        };
        let err = run(&mut ecs, &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EcsError>(),
            Some(EcsError::SystemFailed { .. })
        ));
        assert_eq!(ecs.frame(), 3);
    }

    #[test]
    fn test_unusable_frame_rate_rejected_before_first_frame() {
        let mut ecs: EntityManager<FrameTime> = EntityManager::new();
        for frame_rate in [0.0, -30.0, f64::NAN, 1e-320] {
            let config = FrameLoopConfig {
                frame_rate,
                max_frames: 1,
            };
            assert!(config.frame_duration().is_err(), "{frame_rate}");
            assert!(run(&mut ecs, &config).is_err(), "{frame_rate}");
        }
        assert_eq!(ecs.frame(), 0);
        assert_eq!(
            FrameLoopConfig::default().frame_duration().unwrap(),
            Duration::from_secs_f64(1.0 / 60.0)
        );
    }
}
