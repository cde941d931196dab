use crate::audio::AudioStreamHandle;
use crate::messages::PulseCommand;
use crate::pulse::{PulseController, PulseDisplay};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};

/// One display refresh opportunity per `next_frame`
#[async_trait(?Send)]
pub trait FrameClock {
    async fn next_frame(&mut self);
}

/// Frame clock at a fixed refresh rate
pub struct RefreshClock {
    interval: Interval,
}

impl RefreshClock {
    pub fn new(refresh_rate_hz: u32) -> Self {
        let period = Duration::from_secs_f64(1.0 / f64::from(refresh_rate_hz.max(1)));
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait(?Send)]
impl FrameClock for RefreshClock {
    async fn next_frame(&mut self) {
        self.interval.tick().await;
    }
}

/// Drives a pulse controller on the local event loop
///
/// Commands are handled before frame ticks, and the tick branch is only
/// enabled while the controller is attached: once detached nothing more is
/// scheduled until the next attach.
///
/// Note: stream handles are !Send, so this service must be spawned on a
/// LocalSet using tokio::task::spawn_local.
pub struct PulseService<D: PulseDisplay, C: FrameClock> {
    controller: PulseController<D>,
    clock: C,
    cmd_rx: mpsc::Receiver<PulseCommand>,
}

impl<D: PulseDisplay, C: FrameClock> PulseService<D, C> {
    pub fn new(controller: PulseController<D>, clock: C, cmd_rx: mpsc::Receiver<PulseCommand>) -> Self {
        Self {
            controller,
            clock,
            cmd_rx,
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;

                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },

                _ = self.clock.next_frame(), if self.controller.is_attached() => {
                    self.controller.tick();
                }
            }
        }

        self.controller.detach();
        tracing::debug!("Pulse service stopped ({:?})", self.controller.state());
    }

    fn handle_command(&mut self, cmd: PulseCommand) {
        match cmd {
            PulseCommand::Attach(handle, ack) => {
                self.controller.attach(handle);
                let _ = ack.send(());
            }
            PulseCommand::Detach(ack) => {
                self.controller.detach();
                let _ = ack.send(());
            }
        }
    }
}

/// Handle for communicating with the PulseService
#[derive(Clone)]
pub struct PulseHandle {
    tx: mpsc::Sender<PulseCommand>,
}

impl PulseHandle {
    pub fn new(tx: mpsc::Sender<PulseCommand>) -> Self {
        Self { tx }
    }

    pub async fn attach(&self, handle: AudioStreamHandle) -> Result<()> {
        let (ack, rx) = oneshot::channel();
        self.tx
            .send(PulseCommand::Attach(handle, ack))
            .await
            .map_err(|_| anyhow::anyhow!("Failed to send attach command: pulse service is gone"))?;

        rx.await
            .map_err(|e| anyhow::anyhow!("Failed to receive attach acknowledgement: {}", e))
    }

    /// Resolves once the controller is idle
    pub async fn detach(&self) -> Result<()> {
        let (ack, rx) = oneshot::channel();
        self.tx
            .send(PulseCommand::Detach(ack))
            .await
            .map_err(|_| anyhow::anyhow!("Failed to send detach command: pulse service is gone"))?;

        rx.await
            .map_err(|e| anyhow::anyhow!("Failed to receive detach acknowledgement: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FrameFormat;
    use crate::playback::PlaybackGate;
    use crate::playback::tests::{FakeBackend, Script};
    use crate::pulse::tests::RecordingDisplay;
    use tokio::task::LocalSet;

    /// Advances one frame per message
    struct ManualClock {
        frames: mpsc::UnboundedReceiver<()>,
    }

    #[async_trait(?Send)]
    impl FrameClock for ManualClock {
        async fn next_frame(&mut self) {
            if self.frames.recv().await.is_none() {
                std::future::pending::<()>().await;
            }
        }
    }

    struct Harness {
        gate: PlaybackGate<FakeBackend>,
        script: Script,
        display: RecordingDisplay,
        pulse: PulseHandle,
        frames: mpsc::UnboundedSender<()>,
    }

    impl Harness {
        fn spawn() -> Self {
            let backend = FakeBackend::default();
            let script = backend.script.clone();
            let display = RecordingDisplay::default();
            let controller = PulseController::new(display.clone(), 150.0, FrameFormat { frame_len: 4 });

            let (frames, frame_rx) = mpsc::unbounded_channel();
            let (cmd_tx, cmd_rx) = mpsc::channel(10);
            let service = PulseService::new(controller, ManualClock { frames: frame_rx }, cmd_rx);
            tokio::task::spawn_local(service.run());

            Self {
                gate: PlaybackGate::new(backend),
                script,
                display,
                pulse: PulseHandle::new(cmd_tx),
                frames,
            }
        }

        /// Offer `n` frames and let the service run them
        async fn advance(&self, n: usize) {
            for _ in 0..n {
                self.frames.send(()).unwrap();
                settle().await;
            }
        }
    }

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_end_to_end_pulse_lifecycle() {
        LocalSet::new()
            .run_until(async {
                let mut h = Harness::spawn();

                let handle = h.gate.start().unwrap();
                h.pulse.attach(handle).await.unwrap();

                h.script.push_loudness(200.0);
                h.advance(1).await;
                assert_eq!(h.display.emitted(), vec![true]);

                h.script.push_loudness(50.0);
                h.advance(1).await;
                assert_eq!(h.display.emitted(), vec![true, false]);

                h.gate.stop();
                h.pulse.detach().await.unwrap();
                // Already idle, nothing more to emit
                assert_eq!(h.display.emitted(), vec![true, false]);

                let reads = h.script.reads();
                h.script.push_loudness(200.0);
                h.advance(5).await;
                assert_eq!(h.script.reads(), reads);
                assert_eq!(h.display.emitted(), vec![true, false]);
            })
            .await;
    }

    #[tokio::test]
    async fn test_stop_while_pulsing_forces_idle() {
        LocalSet::new()
            .run_until(async {
                let mut h = Harness::spawn();
                h.pulse.attach(h.gate.start().unwrap()).await.unwrap();

                h.script.push_loudness(200.0);
                h.advance(1).await;
                assert_eq!(h.display.emitted(), vec![true]);

                h.gate.stop();
                h.pulse.detach().await.unwrap();
                assert_eq!(h.display.emitted(), vec![true, false]);
            })
            .await;
    }

    #[tokio::test]
    async fn test_stale_tick_after_stop_self_detaches() {
        LocalSet::new()
            .run_until(async {
                let mut h = Harness::spawn();
                h.pulse.attach(h.gate.start().unwrap()).await.unwrap();
                h.script.push_loudness(200.0);
                h.advance(1).await;

                // No detach command: the invalidated handle stops the loop
                h.gate.stop();
                h.script.push_loudness(200.0);
                h.advance(3).await;

                assert_eq!(h.display.emitted(), vec![true, false]);
                assert_eq!(h.script.reads(), 1);
            })
            .await;
    }

    #[tokio::test]
    async fn test_reattach_runs_a_single_loop() {
        LocalSet::new()
            .run_until(async {
                let mut h = Harness::spawn();
                h.pulse.attach(h.gate.start().unwrap()).await.unwrap();
                h.pulse.detach().await.unwrap();
                h.gate.stop();
                h.pulse.attach(h.gate.start().unwrap()).await.unwrap();

                for _ in 0..3 {
                    h.script.push_loudness(200.0);
                }
                h.advance(1).await;

                assert_eq!(h.script.reads(), 1);
                assert_eq!(h.display.emitted(), vec![true]);
            })
            .await;
    }

    #[tokio::test]
    async fn test_frames_while_detached_are_not_ticked() {
        LocalSet::new()
            .run_until(async {
                let h = Harness::spawn();
                h.script.push_loudness(200.0);
                h.advance(3).await;

                assert_eq!(h.script.reads(), 0);
                assert!(h.display.emitted().is_empty());
            })
            .await;
    }

    #[tokio::test]
    async fn test_failed_start_never_pulses() {
        LocalSet::new()
            .run_until(async {
                let mut h = Harness::spawn();
                h.gate = PlaybackGate::new(FakeBackend {
                    script: h.script.clone(),
                    fail: true,
                    ..Default::default()
                });

                assert!(h.gate.start().is_err());
                h.pulse.detach().await.unwrap();
                h.script.push_loudness(200.0);
                h.advance(2).await;

                assert!(h.display.emitted().is_empty());
            })
            .await;
    }
}
