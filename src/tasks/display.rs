//! Scrolling graph display stage.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::DrawTarget;

use super::{DISPLAY_TASK, Pipeline, Sample};
use crate::config::GRAPH_COLUMNS;
use crate::fault::Fault;
use crate::profiling::monitor::TaskProbe;
use crate::render::{BitmapSurface, draw_fault_banner, draw_graph};
use crate::window::MovingWindow;

/// One averaged value per graph column, oldest on the left.
pub struct DisplayStage {
    history: MovingWindow<GRAPH_COLUMNS>,
}

impl DisplayStage {
    pub fn new() -> Self {
        Self {
            history: MovingWindow::new(),
        }
    }

    /// Scroll `value` in from the right and redraw the whole graph.
    pub fn update<S: BitmapSurface>(
        &mut self,
        value: Sample,
        surface: &mut S,
    ) {
        self.history.push(value);
        draw_graph(surface, &self.history);
    }

    #[inline]
    pub fn history(&self) -> &MovingWindow<GRAPH_COLUMNS> { &self.history }
}

impl Default for DisplayStage {
    fn default() -> Self { Self::new() }
}

/// Redraw the graph for every averaged value.
///
/// On a fault the graph is replaced with a banner naming the fault before the
/// loop returns.
pub async fn run_display<M, P, S>(
    pipeline: &Pipeline<M>,
    probe: &P,
    stage: &mut DisplayStage,
    surface: &mut S,
) -> Fault
where
    M: RawMutex,
    P: TaskProbe,
    S: BitmapSurface + DrawTarget<Color = BinaryColor>,
{
    let mut ctx = match pipeline.start(probe, DISPLAY_TASK) {
        Ok(ctx) => ctx,
        Err(fault) => {
            show_fault(surface, fault);
            return fault;
        }
    };
    let receiver = pipeline.average_queue().receiver();

    loop {
        let value = receiver.receive().await;

        let started = ctx.begin_work();
        stage.update(value, surface);
        ctx.end_work(started);

        if let Err(fault) = pipeline.check_stack(&mut ctx) {
            show_fault(surface, fault);
            return fault;
        }
    }
}

fn show_fault<S>(
    surface: &mut S,
    fault: Fault,
) where
    S: BitmapSurface + DrawTarget<Color = BinaryColor>,
{
    draw_fault_banner(surface, DISPLAY_TASK, fault);
    surface.flush();
}

// =============================================================================
// Tests
// =============================================================================
