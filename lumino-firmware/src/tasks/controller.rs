//! Controller task
//!
//! The cooperative main loop. Every tick it:
//! 1. Takes a completed IR frame, if any, and applies it
//! 2. Drains the display receive queue through the frame parser
//! 3. Applies every display update that arrived

use defmt::*;
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Delay, Duration, Ticker, Timer};

use lumino_core::config::LoopTiming;
use lumino_core::controller::{Controller, IrOutcome};
use lumino_core::ir::IrConsumer;
use lumino_drivers::display::{DwinDisplay, DwinReceiver};
use lumino_drivers::pwm::LutDimmer;
use lumino_hal_rp2040::{BlockingTx, QueuedRx};
use lumino_protocol::FrameError;

/// Controller bound to the board's dimmer and display
pub type FixtureController =
    Controller<LutDimmer<PwmOutput<'static>, PwmOutput<'static>>, DwinDisplay<BlockingTx, Delay>>;

/// Display receive half
pub type DisplayReceiver = DwinReceiver<QueuedRx>;

#[embassy_executor::task]
pub async fn controller_task(
    mut controller: FixtureController,
    mut receiver: DisplayReceiver,
    mut ir: IrConsumer<'static>,
    timing: LoopTiming,
) {
    info!("Controller task started");

    let mut ticker = Ticker::every(Duration::from_micros(timing.period_us.into()));
    let mut read_errors = receiver.read_errors();
    let mut frame_errors = receiver.stats().errors;

    loop {
        if let Some(frame) = ir.take() {
            let nec = frame.decode(ir.timing());
            match controller.handle_ir(nec) {
                Ok(IrOutcome::Applied(key)) => debug!("IR key {:?} applied", key),
                Ok(IrOutcome::Ignored(key)) => debug!("IR key {:?} ignored while off", key),
                Ok(IrOutcome::Unchanged(key)) => debug!("IR key {:?} at limit", key),
                Ok(IrOutcome::Unknown(code)) => debug!("IR code {=u8:#x} not mapped", code),
                Ok(IrOutcome::Rejected) => {
                    warn!("IR frame rejected: {:?}, {:?}", nec, controller.stats())
                }
                Err(e) => warn!("IR key not fully applied: {:?}", e),
            }
            Timer::after_micros(timing.ir_debounce_us.into()).await;
        }

        let consumed = receiver.poll(|result| match result {
            Ok(update) => match controller.handle_vp(update) {
                Ok(true) => debug!("VP {=u16:#x} = {}", update.address, update.value),
                Ok(false) => trace!("VP {=u16:#x} = {} (no change)", update.address, update.value),
                Err(e) => warn!("VP {=u16:#x} not fully applied: {:?}", update.address, e),
            },
            Err(FrameError::Stalled) => warn!("Display frame stalled, parser reset"),
            Err(e) => warn!("Display frame error: {:?}", e),
        });
        if consumed > 0 {
            trace!("RX: {} bytes", consumed);
        }

        if receiver.stats().errors != frame_errors {
            frame_errors = receiver.stats().errors;
            debug!("Display link: {:?}", receiver.stats());
        }

        if receiver.read_errors() != read_errors {
            read_errors = receiver.read_errors();
            warn!("UART receive errors: {}", read_errors);
        }

        ticker.next().await;
    }
}
