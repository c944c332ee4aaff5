//! USB HID composite device - keyboard + mouse + consumer control.
//!
//! Initialises the Embassy USB stack on the RP2040 USB peripheral and
//! exposes three HID endpoints.

use crate::config;
use crate::hid::consumer::CONSUMER_REPORT_DESCRIPTOR;
use crate::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use crate::hid::mouse::MOUSE_REPORT_DESCRIPTOR;
use crate::hid::HidReport;
use defmt::{info, warn};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

bind_interrupts!(pub struct Irqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

/// Depth of the report queue between the control loop and USB.
pub const REPORT_QUEUE_DEPTH: usize = 16;

/// Reports produced by the control loop, drained by [`hid_writer_task`].
pub static REPORTS: Channel<CriticalSectionRawMutex, HidReport, REPORT_QUEUE_DEPTH> = Channel::new();

pub type UsbDriver = Driver<'static, USB>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static MOUSE_STATE: StaticCell<State> = StaticCell::new();
static CONSUMER_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static USB_STATE_HANDLER: StaticCell<UsbStateHandler> = StaticCell::new();

struct UsbStateHandler;

impl embassy_usb::Handler for UsbStateHandler {
    fn configured(&mut self, configured: bool) {
        info!("USB configured: {}", configured);
    }

    fn suspended(&mut self, suspended: bool) {
        info!("USB suspended: {}", suspended);
    }
}

/// Build result containing the USB device runner and the three HID writers.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: HidWriter<'static, UsbDriver, 8>,
    pub mouse_writer: HidWriter<'static, UsbDriver, 8>,
    pub consumer_writer: HidWriter<'static, UsbDriver, 8>,
}

fn hid_config(report_descriptor: &'static [u8]) -> HidConfig<'static> {
    HidConfig {
        report_descriptor,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    }
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once, on the core that will run the USB tasks.
pub fn init(usb: USB) -> UsbHidDevice {
    let driver = Driver::new(usb, Irqs);

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 64]),
    );
    builder.handler(USB_STATE_HANDLER.init(UsbStateHandler));

    let keyboard_writer = HidWriter::new(
        &mut builder,
        KB_STATE.init(State::new()),
        hid_config(KEYBOARD_REPORT_DESCRIPTOR),
    );
    let mouse_writer = HidWriter::new(
        &mut builder,
        MOUSE_STATE.init(State::new()),
        hid_config(MOUSE_REPORT_DESCRIPTOR),
    );
    let consumer_writer = HidWriter::new(
        &mut builder,
        CONSUMER_STATE.init(State::new()),
        hid_config(CONSUMER_REPORT_DESCRIPTOR),
    );

    let device = builder.build();

    info!("USB HID composite device initialised (keyboard + mouse + consumer)");

    UsbHidDevice {
        device,
        keyboard_writer,
        mouse_writer,
        consumer_writer,
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Forward reports from [`REPORTS`] to the matching HID endpoint.
pub async fn hid_writer_task(
    mut keyboard: HidWriter<'static, UsbDriver, 8>,
    mut mouse: HidWriter<'static, UsbDriver, 8>,
    mut consumer: HidWriter<'static, UsbDriver, 8>,
) -> ! {
    info!("HID writer task started - waiting for reports");

    loop {
        let report = REPORTS.receive().await;
        let bytes = report.encode();
        let written = match report {
            HidReport::Keyboard(_) => keyboard.write(&bytes).await,
            HidReport::Mouse(_) => mouse.write(&bytes).await,
            HidReport::Consumer(_) => consumer.write(&bytes).await,
        };
        if written.is_err() {
            warn!("USB report write failed");
        }
    }
}
