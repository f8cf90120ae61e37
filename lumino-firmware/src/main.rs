//! Lumino - Examination Light Controller Firmware
//!
//! Main firmware binary for RP2040-based fixture boards. An NEC remote and
//! a serial touch display both control a two-channel LED dimmer; the
//! display is kept in sync with whatever the remote changes.
//!
//! Pin assignments:
//! - GPIO0/1: UART0 TX/RX to the display
//! - GPIO2: IR receiver output (active low)
//! - GPIO4: buzzer
//! - GPIO14/15: PWM7 A/B, white and warm channels

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use lumino_core::controller::Controller;
use lumino_core::ir::IrSlot;
use lumino_core::state::Vp;
use lumino_drivers::buzzer::Buzzer;
use lumino_drivers::display::{DwinDisplay, DwinReceiver};
use lumino_drivers::pwm::{LutDimmer, PWM_PERIOD};
use lumino_hal_rp2040::{BlockingTx, InstantTimer, QueuedRx};

mod config;
mod tasks;

/// PWM clock divider: 125 MHz / 45 / 1111 gives roughly 2.5 kHz
const PWM_DIVIDER: u8 = 45;

/// Display baud rate
const DISPLAY_BAUD: u32 = 115_200;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

static IR_SLOT: StaticCell<IrSlot> = StaticCell::new();

/// Executor for the IR edge task, above thread mode
static EXECUTOR_IR: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_IR.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lumino firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let fixture = config::load();

    // Boot beep
    let mut buzzer = match Buzzer::new(Output::new(p.PIN_4, Level::Low)) {
        Ok(buzzer) => buzzer,
        Err(e) => match e {},
    };
    if let Err(e) = buzzer.beep(&mut Delay, fixture.buzzer.beep_us) {
        match e {}
    }

    // Setup UART for display communication
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = DISPLAY_BAUD;

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for display communication");

    // Setup PWM slice 7 for the two LED channels
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = PWM_PERIOD;
    pwm_config.divider = PWM_DIVIDER.into();
    let pwm = Pwm::new_output_ab(p.PWM_SLICE7, p.PIN_14, p.PIN_15, pwm_config);
    let (Some(white), Some(warm)) = pwm.split() else {
        defmt::panic!("PWM slice 7 has no A/B outputs");
    };
    let dimmer = match LutDimmer::new(white, warm) {
        Ok(dimmer) => dimmer,
        Err(e) => defmt::panic!("PWM setup failed: {:?}", e),
    };

    info!("PWM initialized");

    let display = DwinDisplay::new(BlockingTx::new(tx), Delay, fixture.display);
    let mut receiver = DwinReceiver::new(QueuedRx::new(rx), fixture.display.stall_polls);
    let mut controller = Controller::new(fixture.lighting, dimmer, display);

    if let Err(e) = controller.start() {
        warn!("Start-up sequence incomplete: {:?}", e);
    }

    match controller.display_mut().read_vp(
        &mut receiver,
        Vp::Power.address(),
        fixture.display.probe_timeout_ms,
    ) {
        Ok(value) => info!("Display answered, power VP = {}", value),
        Err(e) => warn!("Display probe failed: {:?}", e),
    }

    // IR capture at interrupt priority
    let slot = IR_SLOT.init(IrSlot::new());
    let (producer, consumer) = slot.split(fixture.ir);
    let ir_pin = Input::new(p.PIN_2, Pull::Up);

    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let ir_spawner = EXECUTOR_IR.start(interrupt::SWI_IRQ_1);
    ir_spawner
        .spawn(tasks::ir_edge_task(ir_pin, InstantTimer::new(), producer))
        .unwrap();

    spawner
        .spawn(tasks::controller_task(
            controller,
            receiver,
            consumer,
            fixture.timing,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");
}
