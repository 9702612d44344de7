//! Moving-average filter stage.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{AVERAGE_TASK, Pipeline, Sample};
use crate::config::{FILTER_CAPACITY, PipelineConfig};
use crate::fault::Fault;
use crate::profiling::monitor::TaskProbe;
use crate::window::MovingWindow;

/// Keeps the last `FILTER_CAPACITY` raw samples and averages the newest
/// `window` of them.
pub struct AverageStage {
    samples: MovingWindow<FILTER_CAPACITY>,
    window: usize,
}

impl AverageStage {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            samples: MovingWindow::new(),
            window: config.average_window,
        }
    }

    /// Record `sample` and return the updated average.
    pub fn process(
        &mut self,
        sample: Sample,
    ) -> Sample {
        self.samples.push(sample);
        self.samples.average(self.window)
    }

    #[inline]
    pub fn samples(&self) -> &MovingWindow<FILTER_CAPACITY> { &self.samples }
}

/// Average every raw sample and forward the result to the display queue.
pub async fn run_average<M, P>(
    pipeline: &Pipeline<M>,
    probe: &P,
    stage: &mut AverageStage,
) -> Fault
where
    M: RawMutex,
    P: TaskProbe,
{
    let mut ctx = match pipeline.start(probe, AVERAGE_TASK) {
        Ok(ctx) => ctx,
        Err(fault) => return fault,
    };
    let receiver = pipeline.sensor_queue().receiver();
    let sender = pipeline.average_queue().sender();

    loop {
        let sample = receiver.receive().await;

        let started = ctx.begin_work();
        let average = stage.process(sample);
        ctx.end_work(started);

        sender.send(average).await;

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
    use embassy_futures::select::{Either, select};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    use super::*;
    use crate::profiling::monitor::tests::FakeProbe;
    use crate::tasks::tests::{AVERAGES, SAMPLES};

    #[test]
    fn test_reference_averages() {
        let mut stage = AverageStage::new(&PipelineConfig::default());
        let averages: Vec<Sample> = SAMPLES.iter().map(|&s| stage.process(s)).collect();
        assert_eq!(averages, AVERAGES);
    }

    #[test]
    fn test_window_clamped_to_capacity() {
        let config = PipelineConfig::new().with_average_window(100);
        let mut stage = AverageStage::new(&config);
        for _ in 0..FILTER_CAPACITY {
            stage.process(10);
        }
        assert_eq!(stage.process(30), (10 * 19 + 30) / 20);
    }

    #[test]
    fn test_zero_window_averages_latest() {
        let config = PipelineConfig::new().with_average_window(0);
        let mut stage = AverageStage::new(&config);
        stage.process(8);
        assert_eq!(stage.process(21), 21);
        assert_eq!(stage.samples().latest(), 21);
    }

    #[test]
    fn test_forwards_between_queues() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        let probe = FakeProbe::failing_after(3);
        let mut stage = AverageStage::new(&PipelineConfig::default());

        let input = pipeline.sensor_queue().sender();
        for &sample in &SAMPLES[..3] {
            input.try_send(sample).unwrap();
        }

        let fault = block_on(run_average(&pipeline, &probe, &mut stage));
        assert_eq!(fault, Fault::StackMargin);

        let output = pipeline.average_queue().receiver();
        for expected in &AVERAGES[..3] {
            assert_eq!(output.try_receive(), Ok(*expected));
        }
    }

    #[test]
    fn test_waits_for_input() {
        let pipeline: Pipeline<NoopRawMutex> = Pipeline::new();
        let probe = FakeProbe::new();
        let mut stage = AverageStage::new(&PipelineConfig::default());

        // Nothing queued: the filter stays suspended on receive
        let result = block_on(select(run_average(&pipeline, &probe, &mut stage), async {}));
        assert!(matches!(result, Either::Second(())));
        assert!(pipeline.average_queue().is_empty());
    }
}
