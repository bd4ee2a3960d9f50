//! The flame-test simulator: one frame in, one composited frame out.

use std::fmt;
use std::time::{Duration, Instant};

use flamelab_core::{
    FrameSource, HandDetector, HandObservation, KeySource, LabEvent, LabState, Settings,
    finger_position, validate_settings,
};
use flamelab_render::{BeakerRenderer, FlameRenderer, ParticleSystem, TextRenderer, UiRenderer};
use image::RgbImage;
use tokio::sync::mpsc;

use crate::error::RuntimeError;
use crate::fps::FpsCounter;
use crate::monitor::SystemMonitor;
use crate::sink::FrameSink;

const ESCAPE: char = '\u{1b}';

/// Control keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Reset,
    Help,
}

/// Where a run takes its timestamps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameClock {
    /// Elapsed wall-clock time since the run started.
    #[default]
    Realtime,
    /// Frame `n` happens at `n / fps` seconds. Replays are reproducible.
    Fixed { fps: u32 },
}

impl FrameClock {
    fn at(self, started: Instant, frame_index: u64) -> Duration {
        match self {
            Self::Realtime => started.elapsed(),
            Self::Fixed { fps } => {
                Duration::from_secs_f64(frame_index as f64 / f64::from(fps.max(1)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop after this many frames.
    pub max_frames: Option<u64>,
    pub clock: FrameClock,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    SourceExhausted,
    Quit,
    MaxFrames,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SourceExhausted => "source exhausted",
            Self::Quit => "quit requested",
            Self::MaxFrames => "frame limit reached",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub events: u64,
    pub stop: StopReason,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Frames per second of wall-clock time.
    #[must_use]
    pub fn average_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 { self.frames as f64 / secs } else { 0.0 }
    }
}

/// Control summary shown by `h` and at startup.
#[must_use]
pub fn help_text() -> &'static str {
    "AR Chemistry Flame Test Simulator controls:\n\
     \n\
     - Hover a fingertip over a beaker to dip it in the chemical\n\
     - Touch the ignition area to light a coated fingertip\n\
     - Touch the H2O beaker (top centre) to wash a fingertip\n\
     - Bring two flames together to mix them\n\
     - Touch a flame with a coated fingertip to pass the flame on\n\
     - Press 'q' or ESC to quit\n\
     - Press 'r' to reset all fingers\n\
     - Press 'h' to show this help\n\
     \n\
     Chemicals on the bench: Na, K, Li, Cu, Ca"
}

/// Composes the lab state machine with the renderers.
///
/// Every [`LabEvent`] produced is also sent on the channel returned by
/// [`new`](Self::new).
pub struct FlameTestSimulator {
    settings: Settings,
    lab: LabState,
    particles: ParticleSystem,
    beakers: BeakerRenderer,
    flames: FlameRenderer,
    ui: UiRenderer,
    fps: FpsCounter,
    monitor: Option<SystemMonitor>,
    frame_count: u64,
    event_tx: mpsc::UnboundedSender<LabEvent>,
}

impl fmt::Debug for FlameTestSimulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlameTestSimulator")
            .field("frame_count", &self.frame_count)
            .field("particles", &self.particles.len())
            .finish_non_exhaustive()
    }
}

impl FlameTestSimulator {
    /// Validate `settings` and build the simulator.
    pub fn new(
        settings: Settings,
        text: TextRenderer,
    ) -> Result<(Self, mpsc::UnboundedReceiver<LabEvent>), RuntimeError> {
        validate_settings(&settings)?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let simulator = Self {
            lab: LabState::new(settings.lab.clone()),
            particles: ParticleSystem::new(&settings.particles),
            beakers: BeakerRenderer::new(text.clone()),
            flames: FlameRenderer::new(),
            ui: UiRenderer::new(&settings.ui, text),
            fps: FpsCounter::new(),
            monitor: settings.ui.show_system_stats.then(SystemMonitor::new),
            frame_count: 0,
            event_tx,
            settings,
        };
        Ok((simulator, event_rx))
    }

    /// Build with the font named in `settings.ui.font_path`, if any.
    pub fn from_settings(
        settings: Settings,
    ) -> Result<(Self, mpsc::UnboundedReceiver<LabEvent>), RuntimeError> {
        let text = TextRenderer::from_settings(&settings.ui)?;
        Self::new(settings, text)
    }

    #[must_use]
    pub const fn lab(&self) -> &LabState {
        &self.lab
    }

    #[must_use]
    pub const fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Frames processed so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn emit(&self, event: LabEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Lab event dropped; no subscriber");
        }
    }

    /// Advance the lab with `hands` and draw everything onto `frame`.
    ///
    /// `now` is the elapsed run time. Returns the events this frame caused.
    pub fn process_frame(
        &mut self,
        frame: &mut RgbImage,
        hands: &[HandObservation],
        now: Duration,
    ) -> Vec<LabEvent> {
        self.frame_count += 1;
        let (width, height) = frame.dimensions();

        let events = self.lab.update(hands, width, height, now);
        for event in &events {
            self.spawn_effects(event);
            tracing::debug!(kind = event.kind(), at = ?event.position(), "Lab event");
            self.emit(event.clone());
        }

        self.beakers.render(frame, self.lab.settings());

        for (id, state) in self.lab.fingers() {
            if !state.has_flame {
                continue;
            }
            let (Some(element), Some(pos)) = (state.chemical, finger_position(hands, id)) else {
                continue;
            };
            let chemical = element.chemical();
            self.flames
                .render(frame, pos, chemical, state.flame_intensity, self.frame_count);
            self.particles.add_flame_particles(pos, chemical);
        }

        self.particles.update();
        self.particles.render(frame);

        self.ui.render_sidebar(frame, &self.lab, now);
        self.ui.render_finger_labels(frame, &self.lab, hands);
        self.ui.render_interactions(frame, self.lab.settings(), hands);
        self.ui.render_safety_popup(frame, &self.lab, now);

        let fps = self.fps.tick(now).unwrap_or_else(|| self.fps.fps());
        let stats = self.monitor.as_mut().map(|m| m.sample().summary());
        self.ui.render_fps(frame, fps.round() as u32, stats.as_deref());

        events
    }

    fn spawn_effects(&mut self, event: &LabEvent) {
        match *event {
            LabEvent::Dipped { element, at, .. } => {
                self.particles
                    .add_interaction_particles(at, element.chemical().color);
            }
            LabEvent::Cleaned { at, .. } => self.particles.add_cleaning_particles(at),
            LabEvent::Ignited { element, at, .. } => {
                let chemical = element.chemical();
                self.particles
                    .add_explosion(at, chemical.color, chemical.intensity);
            }
            LabEvent::Mixed {
                midpoint, color, ..
            } => self.particles.add_mixing_particles(midpoint, color),
            LabEvent::Reset => self.particles.clear(),
        }
    }

    /// Apply a key press. Unbound keys return `None`.
    pub fn handle_key(&mut self, key: char) -> Option<KeyAction> {
        let action = match key.to_ascii_lowercase() {
            'q' | ESCAPE => KeyAction::Quit,
            'r' => KeyAction::Reset,
            'h' => KeyAction::Help,
            _ => return None,
        };

        match action {
            KeyAction::Quit => tracing::info!("Quit requested"),
            KeyAction::Reset => {
                self.lab.reset_all();
                self.spawn_effects(&LabEvent::Reset);
                self.emit(LabEvent::Reset);
                tracing::info!("All fingers reset");
            }
            KeyAction::Help => tracing::info!("\n{}", help_text()),
        }
        Some(action)
    }

    /// Drive the simulator until the source runs dry, `q` is pressed or
    /// `options.max_frames` is reached.
    pub fn run(
        &mut self,
        source: &mut dyn FrameSource,
        detector: &mut dyn HandDetector,
        keys: &mut dyn KeySource,
        sink: &mut dyn FrameSink,
        options: &RunOptions,
    ) -> Result<RunSummary, RuntimeError> {
        let started = Instant::now();
        let mut frames = 0u64;
        let mut events = 0u64;

        tracing::info!(
            source = source.name(),
            size = ?source.frame_size(),
            max_frames = ?options.max_frames,
            clock = ?options.clock,
            "Simulation started"
        );

        let stop = loop {
            if options.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::MaxFrames;
            }
            let Some(mut frame) = source.next_frame()? else {
                break StopReason::SourceExhausted;
            };

            let (width, height) = frame.dimensions();
            let hands = detector.detect(frames, width, height)?;
            let now = options.clock.at(started, frames);
            events += self.process_frame(&mut frame, &hands, now).len() as u64;
            sink.write(&frame)?;

            let quit = keys
                .keys_for(frames)
                .into_iter()
                .filter_map(|key| self.handle_key(key))
                .fold(false, |quit, action| quit || action == KeyAction::Quit);
            frames += 1;
            if quit {
                break StopReason::Quit;
            }
        };

        sink.finish()?;
        let summary = RunSummary {
            frames,
            events,
            stop,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            frames,
            events,
            stop = %stop,
            fps = summary.average_fps(),
            "Simulation finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flamelab_core::{Element, Finger, FingerId, Handedness, Point};

    fn simulator() -> (FlameTestSimulator, mpsc::UnboundedReceiver<LabEvent>) {
        let mut settings = Settings::default();
        settings.particles.seed = Some(1);
        FlameTestSimulator::new(settings, TextRenderer::disabled()).unwrap()
    }

    fn left_index(at: Point) -> Vec<HandObservation> {
        vec![HandObservation::new(Handedness::Left, 0.9).with_tip(Finger::Index, at)]
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut settings = Settings::default();
        settings.camera.width = 10;
        assert!(matches!(
            FlameTestSimulator::new(settings, TextRenderer::disabled()),
            Err(RuntimeError::Settings(_))
        ));
    }

    #[test]
    fn dip_spawns_particles_and_broadcasts() {
        let (mut sim, mut rx) = simulator();
        let mut frame = RgbImage::new(1280, 720);
        let events = sim.process_frame(&mut frame, &left_index(Point::new(102, 580)), Duration::ZERO);
        assert_eq!(events.len(), 1);
        assert!(!sim.particles().is_empty());
        assert!(matches!(
            tokio_test::block_on(rx.recv()).unwrap(),
            LabEvent::Dipped {
                element: Element::Na,
                ..
            }
        ));
        assert_eq!(sim.frame_count(), 1);
    }

    #[test]
    fn burning_finger_gets_a_flame() {
        let (mut sim, _rx) = simulator();
        let mut frame = RgbImage::new(1280, 720);
        sim.process_frame(&mut frame, &left_index(Point::new(102, 580)), Duration::ZERO);
        let tip = Point::new(150, 250);
        sim.process_frame(&mut frame, &left_index(tip), Duration::from_millis(100));

        let mut next = RgbImage::new(1280, 720);
        sim.process_frame(&mut next, &left_index(tip), Duration::from_millis(200));
        let id = FingerId::new(Handedness::Left, Finger::Index);
        assert!(sim.lab().finger(id).has_flame);
        let lit = (140..160)
            .flat_map(|x| (230..250).map(move |y| (x, y)))
            .filter(|&(x, y)| next.get_pixel(x, y).0 != [0, 0, 0])
            .count();
        assert!(lit > 300, "{lit}");
    }

    #[test]
    fn keys_map_to_actions() {
        let (mut sim, mut rx) = simulator();
        let mut frame = RgbImage::new(1280, 720);
        sim.process_frame(&mut frame, &left_index(Point::new(102, 580)), Duration::ZERO);
        let _ = rx.try_recv();

        assert_eq!(sim.handle_key('x'), None);
        assert_eq!(sim.handle_key('h'), Some(KeyAction::Help));
        assert_eq!(sim.handle_key('Q'), Some(KeyAction::Quit));
        assert_eq!(sim.handle_key(ESCAPE), Some(KeyAction::Quit));
        assert_eq!(sim.handle_key('r'), Some(KeyAction::Reset));

        assert!(sim.lab().active_chemicals().is_empty());
        assert!(sim.particles().is_empty());
        assert_eq!(rx.try_recv().unwrap(), LabEvent::Reset);
    }

    #[test]
    fn fixed_clock_is_frame_based() {
        let started = Instant::now();
        let clock = FrameClock::Fixed { fps: 50 };
        assert_eq!(clock.at(started, 0), Duration::ZERO);
        assert_eq!(clock.at(started, 25), Duration::from_millis(500));
    }

    #[test]
    fn help_lists_every_control() {
        let help = help_text();
        for key in ["'q'", "'r'", "'h'"] {
            assert!(help.contains(key));
        }
    }
}
