//! Simulated temperature sensor.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{Periodic, Pipeline, SENSOR_TASK, Sample};
use crate::config::PipelineConfig;
use crate::fault::Fault;
use crate::profiling::monitor::TaskProbe;
use crate::random::RandomWalk;

/// Produces one random-walk sample per period.
pub struct SensorStage {
    walk: RandomWalk,
}

impl SensorStage {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            walk: RandomWalk::new(config.seed, config.initial_temperature),
        }
    }

    /// Take the next reading.
    #[inline]
    pub fn step(&mut self) -> Sample { self.walk.step() }
}

/// Sample every period and push onto the sensor queue.
///
/// A full queue blocks the sensor until the filter catches up; no sample is
/// dropped.
pub async fn run_sensor<M, P, T>(
    pipeline: &Pipeline<M>,
    probe: &P,
    ticker: &mut T,
    stage: &mut SensorStage,
) -> Fault
where
    M: RawMutex,
    P: TaskProbe,
    T: Periodic,
{
    let mut ctx = match pipeline.start(probe, SENSOR_TASK) {
        Ok(ctx) => ctx,
        Err(fault) => return fault,
    };
    let sender = pipeline.sensor_queue().sender();

    loop {
        ticker.next().await;

        let started = ctx.begin_work();
        let sample = stage.step();
        ctx.end_work(started);

        sender.send(sample).await;

        if let Err(fault) = pipeline.check_stack(&mut ctx) {
            return fault;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;
    use crate::config::QUEUE_SIZE;
    use crate::profiling::monitor::tests::FakeProbe;
    use crate::tasks::tests::{Immediate, SAMPLES};

    #[test]
    fn test_stage_replays_reference_walk() {
        let mut stage = SensorStage::new(&PipelineConfig::default());
        let samples: Vec<Sample> = (0..SAMPLES.len()).map(|_| stage.step()).collect();
        assert_eq!(samples, SAMPLES);
    }

    #[test]
    fn test_samples_queued_in_order() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        // Initial check plus one per sample that fits in the queue
        let probe = FakeProbe::failing_after(QUEUE_SIZE as u32);
        let mut stage = SensorStage::new(&PipelineConfig::default());

        let fault = block_on(run_sensor(&pipeline, &probe, &mut Immediate, &mut stage));
        assert_eq!(fault, Fault::StackMargin);

        let receiver = pipeline.sensor_queue().receiver();
        for expected in &SAMPLES[..QUEUE_SIZE] {
            assert_eq!(receiver.try_receive(), Ok(*expected));
        }
        assert!(receiver.try_receive().is_err());
    }

    #[test]
    fn test_work_time_charged_to_sensor() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        let probe = FakeProbe::failing_after(3);
        let mut stage = SensorStage::new(&PipelineConfig::default());

        block_on(run_sensor(&pipeline, &probe, &mut Immediate, &mut stage));
        // One tick per begin/end pair with the default probe step
        let stat = pipeline.monitor().snapshot()[0];
        assert_eq!(stat.name, SENSOR_TASK);
        assert_eq!(stat.run_time, 3);
        assert_eq!(stat.min_free_stack, 0);
    }
}
