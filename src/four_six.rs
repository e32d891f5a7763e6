#![no_std]
#![no_main]

mod hardware;

use hardware::{
    flash::FlashStore,
    gpios::GpiosMatrix,
    led::Led,
    serial::serial_write_values,
};
#[cfg(feature = "trackball")]
use hardware::trackball::Trackball;

use rusty_orbit::layouts::four_six::{LAYERS, NB_KEYS};
use rusty_orbit::options::{SERIAL_ON, TIMER_SCAN_LOOP, TIMER_USB_LOOP};
#[cfg(feature = "trackball")]
use rusty_orbit::options::TIMER_POINTER_LOOP;
use rusty_orbit::software::{
    indicator::LedColor,
    keys::{BuffCase, Buffer},
    orbit::Orbit,
};

use usbd_serial::SerialPort;

use waveshare_rp2040_zero as bsp;

use bsp::hal::{
    clocks::{init_clocks_and_plls, Clock},
    entry, pac,
    pio::PIOExt,
    timer::Timer,
    usb,
    watchdog::Watchdog,
    Sio,
};
use cortex_m::prelude::*;
use defmt_rtt as _;

use fugit::ExtU32;
#[cfg(feature = "trackball")]
use fugit::RateExtU32;
use panic_probe as _;
use ws2812_pio::Ws2812;

use usb_device::class_prelude::*;
use usb_device::prelude::*;
use usbd_human_interface_device::device::keyboard::NKROBootKeyboard;
use usbd_human_interface_device::device::mouse::{WheelMouse, WheelMouseReport};
use usbd_human_interface_device::prelude::*;

// Electrical matrix, 8 columns x 7 rows snaking through the 56 keys.
// The layout indexes are in layouts/four_six.rs.
const MATRIX_INDEXES: [[Option<u8>; 7]; 8] = [
    [Some(0), Some(1), Some(2), Some(3), Some(4), Some(5), Some(6)],
    [Some(7), Some(8), Some(9), Some(10), Some(11), Some(12), Some(13)],
    [Some(14), Some(15), Some(16), Some(17), Some(18), Some(19), Some(20)],
    [Some(21), Some(22), Some(23), Some(24), Some(25), Some(26), Some(27)],
    [Some(28), Some(29), Some(30), Some(31), Some(32), Some(33), Some(34)],
    [Some(35), Some(36), Some(37), Some(38), Some(39), Some(40), Some(41)],
    [Some(42), Some(43), Some(44), Some(45), Some(46), Some(47), Some(48)],
    [Some(49), Some(50), Some(51), Some(52), Some(53), Some(54), Some(55)],
];

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();

    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let clocks = init_clocks_and_plls(
        bsp::XOSC_CRYSTAL_FREQ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    #[cfg(feature = "trackball")]
    let mut sensor_delay = timer;
    let core = pac::CorePeripherals::take().unwrap();
    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    let sio = Sio::new(pac.SIO);
    let pins = bsp::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let (mut pio, sm0, _, _, _) = pac.PIO0.split(&mut pac.RESETS);

    // USB --
    let usb_bus = UsbBusAllocator::new(usb::UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    ));

    let mut serial = SerialPort::new(&usb_bus);
    let mut orbit_hid = UsbHidClassBuilder::new()
        .add_device(
            usbd_human_interface_device::device::keyboard::NKROBootKeyboardConfig::default(),
        )
        .add_device(usbd_human_interface_device::device::mouse::WheelMouseConfig::default())
        .build(&usb_bus);

    let mut usb_dev = UsbDeviceBuilder::new(&usb_bus, UsbVidPid(0x1209, 0x6F72))
        .strings(&[StringDescriptors::default()
            .manufacturer("rusty_orbit")
            .product("Rusty Orbit 4x6")
            .serial_number("46")])
        .unwrap()
        .build();

    // GPIO --
    let mut gpios = GpiosMatrix {
        rows: [
            pins.gp8.into_pull_down_input().into_dyn_pin(),
            pins.gp9.into_pull_down_input().into_dyn_pin(),
            pins.gp10.into_pull_down_input().into_dyn_pin(),
            pins.gp11.into_pull_down_input().into_dyn_pin(),
            pins.gp12.into_pull_down_input().into_dyn_pin(),
            pins.gp13.into_pull_down_input().into_dyn_pin(),
            pins.gp14.into_pull_down_input().into_dyn_pin(),
        ],

        columns: [
            pins.gp0.into_push_pull_output().into_dyn_pin(),
            pins.gp1.into_push_pull_output().into_dyn_pin(),
            pins.gp2.into_push_pull_output().into_dyn_pin(),
            pins.gp3.into_push_pull_output().into_dyn_pin(),
            pins.gp4.into_push_pull_output().into_dyn_pin(),
            pins.gp5.into_push_pull_output().into_dyn_pin(),
            pins.gp6.into_push_pull_output().into_dyn_pin(),
            pins.gp7.into_push_pull_output().into_dyn_pin(),
        ],

        indexes: &MATRIX_INDEXES,
    };

    // Led --
    let mut neopixel = Ws2812::new(
        // The onboard NeoPixel is attached to GPIO pin #16 on the Waveshare RP2040-Zero.
        pins.neopixel.into_function(),
        &mut pio,
        sm0,
        clocks.peripheral_clock.freq(),
        timer.count_down(),
    );
    let mut led = Led::new(&mut neopixel, NB_KEYS);

    // Trackball --
    #[cfg(feature = "trackball")]
    let mut trackball = {
        use bsp::hal::gpio::FunctionSpi;
        use bsp::hal::spi::Spi;

        let sck = pins.gp26.into_function::<FunctionSpi>();
        let mosi = pins.gp27.into_function::<FunctionSpi>();
        let miso = pins.gp28.into_function::<FunctionSpi>();
        let spi = Spi::<_, _, _, 8>::new(pac.SPI1, (mosi, miso, sck)).init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            1.MHz(),
            embedded_hal::spi::MODE_3,
        );

        let mut sensor = Trackball::new(spi, pins.gp29.into_push_pull_output());
        if sensor.init(&mut sensor_delay).is_err() {
            led.show(LedColor::Red);
        }
        sensor
    };

    // Timers --
    let mut tick_count_down = timer.count_down();
    tick_count_down.start(1.millis());

    let mut scan_count_down = timer.count_down();
    scan_count_down.start(TIMER_SCAN_LOOP.millis());

    let mut usb_count_down = timer.count_down();
    usb_count_down.start(TIMER_USB_LOOP.millis());

    #[cfg(feature = "trackball")]
    let mut pointer_count_down = timer.count_down();
    #[cfg(feature = "trackball")]
    pointer_count_down.start(TIMER_POINTER_LOOP.millis());

    // --
    let mut ticks: u32 = 0;
    let mut store = FlashStore::new();
    let mut orbit = Orbit::new(&LAYERS, &mut store, ticks);
    let mut led_color;

    let mut key_buffer = Buffer::new();
    let mut last_printed_key: BuffCase = BuffCase::default();
    let mut key_buffer_tempo = 0;

    let mut mouse_report = WheelMouseReport::default();
    let mut last_mouse_buttons = 0;

    loop {
        if SERIAL_ON && !usb_dev.poll(&mut [&mut serial]) {
            continue;
        }

        if scan_count_down.wait().is_ok() {
            let active_indexes = gpios.get_active_indexes(&mut delay);
            serial_write_values(&mut serial, "Indexes: ", &active_indexes, "\r\n");

            orbit.update_matrix(active_indexes, ticks);
            (key_buffer, mouse_report, led_color) =
                orbit.run(&mut store, key_buffer, mouse_report, ticks);

            led.show(led_color);

            if orbit.boot_requested() {
                led.show(LedColor::Red);
                bsp::hal::rom_data::reset_to_usb_boot(0, 0);
            }
        }

        // Trackball ----------------------------------------------------------------
        #[cfg(feature = "trackball")]
        if pointer_count_down.wait().is_ok() {
            if let Ok(Some((x, y))) = trackball.motion(&mut sensor_delay) {
                orbit.pointer_motion(x, y, &mut mouse_report, ticks);
            }
        }

        // Mouse report -------------------------------------------------------------
        // Keyboard has its own timer to allow combinations
        if mouse_report.buttons != last_mouse_buttons
            || mouse_report.x != 0
            || mouse_report.y != 0
            || mouse_report.vertical_wheel != 0
            || mouse_report.horizontal_wheel != 0
        {
            let mouse = orbit_hid.device::<WheelMouse<'_, _>, _>();
            match mouse.write_report(&mouse_report) {
                Err(UsbHidError::WouldBlock) => {
                    led.show(LedColor::Red);
                }
                Ok(_) => {
                    last_mouse_buttons = mouse_report.buttons;
                    mouse_report = WheelMouseReport::default();
                }
                Err(e) => {
                    core::panic!("Failed to write mouse report: {:?}", e)
                }
            };
        }

        // USB ----------------------------------------------------------------------
        if usb_count_down.wait().is_ok() && key_buffer_tempo <= ticks {
            if let Some(popped_key) = key_buffer.keys.pop_front() {
                if popped_key != last_printed_key {
                    let keyboard = orbit_hid.device::<NKROBootKeyboard<'_, _>, _>();
                    match keyboard.write_report(popped_key.key_code.clone()) {
                        Err(UsbHidError::WouldBlock) => {
                            led.show(LedColor::Red);
                            key_buffer.keys.push_front(popped_key).ok();
                        }
                        Err(UsbHidError::Duplicate) => {}
                        Ok(_) => {
                            key_buffer_tempo = ticks.wrapping_add(popped_key.tempo);
                            last_printed_key = popped_key;
                        }
                        Err(e) => {
                            core::panic!("Failed to write keyboard report: {:?}", e)
                        }
                    }
                }
            }
        }

        // Tick once per ms ---------------------------------------------------------
        if tick_count_down.wait().is_ok() {
            ticks = ticks.wrapping_add(1);
            match orbit_hid.tick() {
                Err(UsbHidError::WouldBlock) => {}
                Ok(_) => {}
                Err(e) => core::panic!("Failed to process keyboard tick: {:?}", e),
            };
        }

        if !SERIAL_ON && usb_dev.poll(&mut [&mut orbit_hid]) {
            match orbit_hid
                .device::<NKROBootKeyboard<'_, _>, _>()
                .read_report()
            {
                Err(UsbError::WouldBlock) => {}
                Err(e) => {
                    core::panic!("Failed to read keyboard report: {:?}", e)
                }
                Ok(_leds) => {}
            }
        }
    }
}
