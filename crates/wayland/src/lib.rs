//! Wayland layer-shell surface for `dial`.
//!
//! Owns the Iced application loop and wires together:
//! - the sampler registry (CPU and network workers on a dedicated runtime)
//! - a redraw timer at `update_delay_ms`
//! - the config file watcher (live theme and gauge reload)
//! - Ctrl-C (graceful shutdown)

use chrono::{DateTime, Local};
use dial_config::{default_path, load as load_config, ConfigWatcher, DialConfig, WindowConfig};
use dial_core::{event::Message as AppMessage, DialError, Result};
use dial_renderer::IcedCanvas;
use dial_system::MetricsRegistry;
use dial_theme::Theme;
use dial_widgets::{clock_labels, Dashboard};
use futures::channel::mpsc::Sender;
use iced::{
    font,
    mouse,
    widget::canvas::{self, Cache, Canvas, Geometry},
    Element, Font, Length, Rectangle, Renderer, Subscription, Task,
};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, KeyboardInteractivity, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use std::time::Duration;
use tracing::{info, warn};

/// Clock labels are drawn in bold monospace.
const LABEL_FONT: Font = Font {
    weight: font::Weight::Bold,
    ..Font::MONOSPACE
};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the sampler and the overlay.  Returns once the surface closes,
/// after every sampler worker has stopped.
pub fn run(config: DialConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("dial-sampler")
        .enable_all()
        .build()?;

    let registry = {
        let _guard = runtime.enter();
        MetricsRegistry::start(&config.sampler)?
    };
    info!(workers = registry.running_workers(), "sampler started");

    let layer_settings = layer_settings(&config.window);
    let boot_registry = registry.clone();
    let result = application(
        move || Overlay::new(config.clone(), boot_registry.clone()),
        Overlay::namespace,
        Overlay::update,
        Overlay::view,
    )
    .subscription(Overlay::subscription)
    .style(Overlay::style)
    .settings(Settings {
        layer_settings,
        ..Default::default()
    })
    .run();

    runtime.block_on(registry.shutdown());
    info!("dial stopped");

    result.map_err(|e| DialError::Wayland(e.to_string()))
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants; those are
/// handled by the backend and never reach `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    App(AppMessage),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Overlay {
    config:    DialConfig,
    theme:     Theme,
    dashboard: Dashboard,
    /// Gauge geometry for the current tick.  Histories only advance when
    /// this is cleared, not on every repaint.
    cache:     Cache,
    now:       DateTime<Local>,
}

impl Overlay {
    fn new(config: DialConfig, registry: MetricsRegistry) -> (Self, Task<Message>) {
        let overlay = Self {
            theme: Theme::from_config(&config.theme),
            dashboard: Dashboard::new(registry, config.gauges.clone()),
            cache: Cache::new(),
            now: Local::now(),
            config,
        };
        (overlay, Task::none())
    }

    fn namespace() -> String {
        String::from("dial")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(AppMessage::Tick) => {
                self.now = Local::now();
                self.cache.clear();
                Task::none()
            }
            Message::App(AppMessage::ConfigReloaded) => {
                self.reload();
                Task::none()
            }
            Message::App(AppMessage::Shutdown) => iced::exit(),
            _ => Task::none(),
        }
    }

    fn reload(&mut self) {
        let cfg = match load_config(default_path()) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return;
            }
        };

        for section in restart_required(&self.config, &cfg) {
            warn!("[{section}] changed on disk; restart dial to apply it");
        }

        info!("Config reloaded");
        self.theme = Theme::from_config(&cfg.theme);
        self.dashboard.set_gauges(cfg.gauges.clone());
        // The surface and the sampler keep running on their startup settings.
        self.config.theme = cfg.theme;
        self.config.gauges = cfg.gauges;
        self.cache.clear();
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        Canvas::new(Gauges { overlay: self })
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        let delay = Duration::from_millis(self.config.window.update_delay_ms.max(1));
        let tick = iced::time::every(delay).map(|_| Message::App(AppMessage::Tick));

        Subscription::batch([
            tick,
            Subscription::run(config_stream),
            Subscription::run(signal_stream),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: iced::Color::TRANSPARENT,
            text_color: self.theme.text[0].to_iced(),
        }
    }
}

// ── Canvas program ────────────────────────────────────────────────────────────

struct Gauges<'a> {
    overlay: &'a Overlay,
}

impl canvas::Program<Message> for Gauges<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &(),
        renderer: &Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let overlay = self.overlay;
        let geometry = overlay.cache.draw(renderer, bounds.size(), |frame| {
            {
                let mut gauges = IcedCanvas::new(frame);
                overlay.dashboard.draw(
                    &mut gauges,
                    f64::from(bounds.width),
                    f64::from(bounds.height),
                    &overlay.theme,
                );
            }

            for label in clock_labels(&overlay.now, bounds.width, bounds.height, &overlay.theme) {
                frame.fill_text(canvas::Text {
                    content: label.text,
                    position: iced::Point::new(label.x, label.y),
                    color: label.color.to_iced(),
                    size: label.size.into(),
                    font: LABEL_FONT,
                    ..canvas::Text::default()
                });
            }
        });
        vec![geometry]
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.

/// Watches the config file for writes and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = ConfigWatcher::spawn(default_path());

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::App(AppMessage::ConfigReloaded));
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Turns Ctrl-C into a graceful `Shutdown`.
fn signal_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received; shutting down");
                let _ = sender.try_send(Message::App(AppMessage::Shutdown));
            }
            Err(e) => warn!("Cannot listen for Ctrl-C: {e}"),
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Surface placement: `x`/`y` offset from the top-left corner, and a zero
/// dimension stretches to the matching output edge.
fn layer_settings(window: &WindowConfig) -> LayerShellSettings {
    LayerShellSettings {
        size: Some((window.width, window.height)),
        exclusive_zone: 0,
        anchor: anchor_for(window),
        layer: match window.layer {
            dial_config::SurfaceLayer::Background => Layer::Background,
            dial_config::SurfaceLayer::Bottom => Layer::Bottom,
        },
        margin: (window.y, 0, 0, window.x),
        keyboard_interactivity: KeyboardInteractivity::None,
        ..Default::default()
    }
}

fn anchor_for(window: &WindowConfig) -> Anchor {
    let mut anchor = Anchor::Top | Anchor::Left;
    if window.width == 0 {
        anchor |= Anchor::Right;
    }
    if window.height == 0 {
        anchor |= Anchor::Bottom;
    }
    anchor
}

/// Config sections that only take effect at startup and differ between
/// `running` and `on_disk`.
fn restart_required(running: &DialConfig, on_disk: &DialConfig) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if running.window != on_disk.window {
        sections.push("window");
    }
    if running.sampler != on_disk.sampler {
        sections.push("sampler");
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_stretches_below_its_offset() {
        let window = WindowConfig::default();
        assert_eq!(anchor_for(&window), Anchor::Top | Anchor::Left | Anchor::Right | Anchor::Bottom);

        let settings = layer_settings(&window);
        assert_eq!(settings.margin, (550, 0, 0, 0));
        assert_eq!(settings.exclusive_zone, 0);
    }

    #[test]
    fn fixed_size_only_anchors_the_offset_corner() {
        let window = WindowConfig {
            x: 40,
            y: 20,
            width: 800,
            height: 300,
            ..WindowConfig::default()
        };
        assert_eq!(anchor_for(&window), Anchor::Top | Anchor::Left);
        assert_eq!(layer_settings(&window).size, Some((800, 300)));
    }

    #[test]
    fn only_startup_sections_need_a_restart() {
        let running = DialConfig::default();

        let mut on_disk = running.clone();
        on_disk.theme.font_size = 40.0;
        on_disk.gauges.battery = "BAT0".into();
        assert!(restart_required(&running, &on_disk).is_empty());

        on_disk.sampler.net_interface = "eth0".into();
        on_disk.window.update_delay_ms = 500;
        assert_eq!(restart_required(&running, &on_disk), ["window", "sampler"]);
    }
}
