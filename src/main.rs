//! hotkeypad - RP2040 firmware entry point.
//!
//! Core 0 owns the control loop: it loads the catalog, boots the dispatcher
//! and never returns. Core 1 runs an Embassy executor with the USB device
//! and the HID writer; the two meet at the report channel in
//! [`hotkeypad::usb::hid_device`].

#![no_std]
#![no_main]

extern crate alloc;

use core::mem::MaybeUninit;

use defmt::{error, info, unwrap};
use embassy_executor::Executor;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::multicore::{spawn_core1, Stack};
use embassy_rp::peripherals::{PIO0, USB};
use embassy_rp::pio::{self, Pio};
use embassy_rp::pio_programs::ws2812::{PioWs2812, PioWs2812Program};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hotkeypad::board::{BoardClock, BoardControls, KeyPixels, Speaker, UsbOutput};
use hotkeypad::catalog::{self, builtin, Catalog};
use hotkeypad::dispatcher::{self, Dispatcher, Parts};
use hotkeypad::hid::ReportActuator;
use hotkeypad::storage::FlashBackend;
use hotkeypad::ui::display::{init_oled, Panel};
use hotkeypad::usb::hid_device;
use hotkeypad::Config;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => pio::InterruptHandler<PIO0>;
});

const FLASH_SIZE: usize = 2 * 1024 * 1024;
const HEAP_SIZE: usize = 64 * 1024;

#[global_allocator]
static HEAP: Heap = Heap::empty();

static mut CORE1_STACK: Stack<8192> = Stack::new();
static EXECUTOR1: StaticCell<Executor> = StaticCell::new();
static CATALOG: StaticCell<Catalog> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    {
        static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
        unsafe { HEAP.init(core::ptr::addr_of_mut!(HEAP_MEM) as usize, HEAP_SIZE) }
    }

    let p = embassy_rp::init(Default::default());
    info!("hotkeypad starting");

    // ── Core 1: USB ─────────────────────────────────────────────────────
    let usb = p.USB;
    spawn_core1(
        p.CORE1,
        unsafe { &mut *core::ptr::addr_of_mut!(CORE1_STACK) },
        move || {
            let executor1 = EXECUTOR1.init(Executor::new());
            executor1.run(|spawner| unwrap!(spawner.spawn(usb_task(usb))));
        },
    );

    // ── Core 0: control loop ────────────────────────────────────────────
    let keys = [
        Input::new(p.PIN_1, Pull::Up),
        Input::new(p.PIN_2, Pull::Up),
        Input::new(p.PIN_3, Pull::Up),
        Input::new(p.PIN_4, Pull::Up),
        Input::new(p.PIN_5, Pull::Up),
        Input::new(p.PIN_6, Pull::Up),
        Input::new(p.PIN_7, Pull::Up),
        Input::new(p.PIN_8, Pull::Up),
        Input::new(p.PIN_9, Pull::Up),
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
    ];
    let controls = BoardControls::new(
        keys,
        Input::new(p.PIN_0, Pull::Up),
        Input::new(p.PIN_17, Pull::Up),
        Input::new(p.PIN_18, Pull::Up),
    );

    let i2c = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c::Config::default());
    let Pio {
        mut common, sm0, ..
    } = Pio::new(p.PIO0, Irqs);
    let program = PioWs2812Program::new(&mut common);
    let ws2812 = PioWs2812::new(&mut common, sm0, p.DMA_CH0, p.PIN_19, &program);
    let display = Panel::new(init_oled(i2c), KeyPixels::new(ws2812));

    let _amp_enable = Output::new(p.PIN_14, Level::High);
    let speaker = Speaker::new(Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, PwmConfig::default()));
    let actuator = ReportActuator::new(UsbOutput::new(speaker));

    let flash = Flash::<_, Async, FLASH_SIZE>::new(p.FLASH, p.DMA_CH1);

    let catalog: &'static Catalog = match catalog::load(&builtin::StaticSource, builtin::ROOT) {
        Ok(catalog) => CATALOG.init(catalog),
        Err(e) => {
            error!("catalog: {}", e);
            CATALOG.init(Catalog::default())
        }
    };

    let parts = Parts {
        display,
        actuator,
        controls,
        clock: BoardClock,
        favorites: FlashBackend::new(flash),
    };
    match Dispatcher::boot(catalog, parts, Config::default()) {
        Ok(mut dispatcher) => dispatcher.run(),
        Err(e) => {
            error!("boot failed: {}", e);
            dispatcher::halt()
        }
    }
}

#[embassy_executor::task]
async fn usb_task(usb: USB) {
    let hid_device::UsbHidDevice {
        device,
        keyboard_writer,
        mouse_writer,
        consumer_writer,
    } = hid_device::init(usb);

    embassy_futures::join::join(
        hid_device::run_usb_device(device),
        hid_device::hid_writer_task(keyboard_writer, mouse_writer, consumer_writer),
    )
    .await;
}
