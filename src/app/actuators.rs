use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::Output;
use wavewatch::face::FeedbackSink;

use super::{config::TONE_REQUESTS, types::ToneRequest};

/// Feedback for the face. The LED is driven inline; tones are handed to
/// `buzzer_task` so a face tick never waits on the buzzer.
pub(crate) struct BoardFeedback {
    led: Output<'static>,
}

impl BoardFeedback {
    pub(crate) fn new(led: Output<'static>) -> Self {
        Self { led }
    }
}

impl FeedbackSink for BoardFeedback {
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u16) {
        let request = ToneRequest {
            frequency_hz,
            duration_ms,
        };
        if TONE_REQUESTS.try_send(request).is_err() {
            log::debug!("buzzer busy, dropped {} Hz tone", frequency_hz);
        }
    }

    fn set_indicator(&mut self, on: bool) {
        if on {
            self.led.set_high();
        } else {
            self.led.set_low();
        }
    }
}

#[embassy_executor::task]
pub(crate) async fn buzzer_task(mut buzzer: Output<'static>) {
    loop {
        let request = TONE_REQUESTS.receive().await;
        if request.frequency_hz == 0 || request.duration_ms == 0 {
            continue;
        }

        let half_period = Duration::from_micros(500_000 / u64::from(request.frequency_hz));
        let deadline = Instant::now() + Duration::from_millis(u64::from(request.duration_ms));
        while Instant::now() < deadline {
            buzzer.toggle();
            Timer::after(half_period).await;
        }
        buzzer.set_low();
    }
}
