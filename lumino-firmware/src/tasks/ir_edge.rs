//! IR edge capture task
//!
//! Runs at interrupt priority. Each falling edge of the receiver output
//! laps the pulse timer and feeds the interval to the capture. Once a
//! frame is complete, the timer is halted and no edges are listened for
//! until the controller has taken the frame.

use embassy_rp::gpio::Input;
use lumino_core::ir::{CaptureEvent, IrProducer};
use lumino_hal::PulseTimer;
use lumino_hal_rp2040::InstantTimer;

#[embassy_executor::task]
pub async fn ir_edge_task(
    mut pin: Input<'static>,
    mut timer: InstantTimer,
    mut producer: IrProducer<'static>,
) {
    loop {
        pin.wait_for_falling_edge().await;
        let ticks = timer.lap();

        if producer.on_interval(ticks) == CaptureEvent::Complete {
            timer.halt();
            producer.wait_released().await;
            timer.resume();
        }
    }
}
