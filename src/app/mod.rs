mod actuators;
mod clock;
mod config;
mod lis2dw;
mod serial;
mod store;
mod types;

use embassy_time::{Duration, Ticker};
use esp_hal::{
    gpio::{Level, Output, OutputConfig},
    i2c::master::{Config as I2cConfig, I2c, SoftwareTimeout},
    time::{Duration as HalDuration, Rate},
    timer::timg::TimerGroup,
    uart::{Config as UartConfig, Uart},
};
use wavewatch::face::{FaceEvent, WatchFace, WaveFace};

use self::{
    actuators::BoardFeedback,
    clock::UptimeClock,
    config::{I2C_TIMEOUT_MS, UART_BAUD},
    lis2dw::Lis2dw12,
    store::FlashDailyCountStore,
};

type BoardFace =
    WaveFace<Lis2dw12<'static>, UptimeClock, BoardFeedback, FlashDailyCountStore<'static>>;

pub(crate) fn run() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);
    esp_println::logger::init_logger(log::LevelFilter::Info);

    let uart_cfg = UartConfig::default().with_baudrate(UART_BAUD);
    let Ok(uart) = Uart::new(peripherals.UART0, uart_cfg) else {
        halt_forever();
    };
    let uart = uart
        .with_rx(peripherals.GPIO3)
        .with_tx(peripherals.GPIO1)
        .into_async();

    let i2c_cfg = I2cConfig::default()
        .with_frequency(Rate::from_khz(100))
        .with_software_timeout(SoftwareTimeout::Transaction(HalDuration::from_millis(
            I2C_TIMEOUT_MS,
        )));
    let Ok(i2c) = I2c::new(peripherals.I2C0, i2c_cfg) else {
        halt_forever();
    };
    let i2c = i2c.with_sda(peripherals.GPIO21).with_scl(peripherals.GPIO22);

    let led = Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default());
    let buzzer = Output::new(peripherals.GPIO25, Level::Low, OutputConfig::default());

    let face = WaveFace::with_store(
        *wavewatch::event_engine::active_config(),
        Lis2dw12::new(i2c),
        UptimeClock::new(),
        BoardFeedback::new(led),
        FlashDailyCountStore::new(peripherals.FLASH),
    );

    let mut executor = esp_rtos::embassy::Executor::new();
    let executor = unsafe { make_static(&mut executor) };
    executor.run(move |spawner| {
        spawner.must_spawn(actuators::buzzer_task(buzzer));
        spawner.must_spawn(serial::time_sync_task(uart));
        spawner.must_spawn(face_task(face));
    });
}

#[embassy_executor::task]
async fn face_task(mut face: BoardFace) {
    face.setup();
    face.activate();

    let tick_hz = face.tick_hz().max(1);
    let mut ticker = Ticker::every(Duration::from_millis(1_000 / u64::from(tick_hz)));
    let mut subsecond = 0u8;

    loop {
        ticker.next().await;
        if face.tick(FaceEvent::tick(subsecond)) {
            let status = face.status();
            log::debug!(
                "face: {:?} hits={} today={:?}",
                status.detection,
                status.hit_digit(),
                status.today_count
            );
        }
        subsecond = (subsecond + 1) % tick_hz;
    }
}

unsafe fn make_static<T>(value: &mut T) -> &'static mut T {
    unsafe { core::mem::transmute(value) }
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
