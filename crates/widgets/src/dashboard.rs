use crate::faults::FaultLog;
use dial_config::GaugeConfig;
use dial_core::Result;
use dial_renderer::{radians, ArcSpec, BatteryArc, Canvas, LineWidthGuard, PercentArc, Point, RadialGraph};
use dial_system::{MetricKind, MetricsRegistry};
use dial_theme::Theme;

/// Thickness of the translucent tracks behind each gauge.
const TRACK_WIDTH: f64 = 50.0;
/// Thickness of the plain percentage arcs.
const GAUGE_WIDTH: f64 = 25.0;
/// Thickness of the optional brightness ring.
const BRIGHTNESS_WIDTH: f64 = 10.0;

/// The overlay's gauge layout, hugging the bottom edge of the surface.
///
/// Left to right: CPU quarter arc in the corner, network upload graph,
/// battery, temperature, network download graph, RAM quarter arc in the
/// other corner.  With a backlight configured, a thin brightness ring sits
/// inside the CPU arc.  Every gauge is drawn independently; one that fails is
/// skipped for that frame and reported through the [`FaultLog`].
#[derive(Debug)]
pub struct Dashboard {
    registry: MetricsRegistry,
    graphs:   RadialGraph,
    gauges:   GaugeConfig,
    faults:   FaultLog,
}

impl Dashboard {
    pub fn new(registry: MetricsRegistry, gauges: GaugeConfig) -> Self {
        Self {
            registry,
            graphs: RadialGraph::new(),
            gauges,
            faults: FaultLog::default(),
        }
    }

    /// Swap hardware names after a config reload; graph histories are kept.
    pub fn set_gauges(&mut self, gauges: GaugeConfig) {
        self.gauges = gauges;
    }

    pub fn faults(&self) -> &FaultLog {
        &self.faults
    }

    pub fn graphs(&self) -> &RadialGraph {
        &self.graphs
    }

    /// Paint every gauge onto `canvas`, sized `width` × `height`.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, width: f64, height: f64, theme: &Theme) {
        let mut canvas = LineWidthGuard::new(canvas);
        let canvas = &mut *canvas;
        let layout = Layout::new(width, height);

        canvas.set_line_width(TRACK_WIDTH);
        canvas.set_color(theme.background);
        for (center, radius, start, end) in layout.tracks() {
            canvas.arc(center, radius, radians(start), radians(end));
            canvas.stroke();
        }

        canvas.set_line_width(GAUGE_WIDTH);
        let fg = theme.foreground;

        canvas.set_color(fg[0]);
        let cpu = self.registry.source(MetricKind::Cpu);
        self.record("cpu", layout.cpu.draw_from(canvas, &cpu).map(drop));

        canvas.set_color(fg[1]);
        let up = self.registry.source(MetricKind::NetUp);
        self.record("net_up", self.graphs.draw("net_up", canvas, &layout.net_up, &up).map(drop));

        canvas.set_color(fg[2]);
        self.record("battery", self.draw_battery(canvas, &layout.battery));

        canvas.set_color(fg[3]);
        self.record("temperature", self.draw_temperature(canvas, &layout.temperature));

        canvas.set_color(fg[4]);
        let down = self.registry.source(MetricKind::NetDown);
        self.record("net_down", self.graphs.draw("net_down", canvas, &layout.net_down, &down).map(drop));

        canvas.set_color(fg[5]);
        let ram = self.registry.source(MetricKind::Ram);
        self.record("ram", layout.ram.draw_from(canvas, &ram).map(drop));

        if let Some(backlight) = &self.gauges.backlight {
            canvas.set_color(theme.text[1]);
            canvas.set_line_width(BRIGHTNESS_WIDTH);
            let level = self.registry.source(MetricKind::Brightness(backlight.clone()));
            self.record("brightness", layout.brightness.draw_from(canvas, &level).map(drop));
        }
    }

    fn draw_battery<C: Canvas + ?Sized>(&self, canvas: &mut C, arc: &BatteryArc) -> Result<()> {
        let charge = self.registry.battery(&self.gauges.battery)?;
        arc.draw(canvas, charge.health(), charge.percent());
        Ok(())
    }

    fn draw_temperature<C: Canvas + ?Sized>(&self, canvas: &mut C, arc: &PercentArc) -> Result<()> {
        // No sensor: leave the track empty rather than report a fault.
        if let Some(celsius) = self.registry.temperature()? {
            arc.draw(canvas, celsius);
        }
        Ok(())
    }

    fn record(&self, gauge: &str, result: Result<()>) {
        match result {
            Ok(()) => self.faults.clear(gauge),
            Err(e) => self.faults.report(gauge, &e),
        }
    }
}

/// Gauge geometry for one surface size.
struct Layout {
    width:       f64,
    height:      f64,
    cpu:         PercentArc,
    net_up:      ArcSpec,
    battery:     BatteryArc,
    temperature: PercentArc,
    net_down:    ArcSpec,
    ram:         PercentArc,
    brightness:  PercentArc,
}

impl Layout {
    fn new(width: f64, height: f64) -> Self {
        let at = |x: f64| Point::new(x, height);
        Self {
            width,
            height,
            cpu: PercentArc::new(at(0.0), 150.0, 270.0, 90.0),
            net_up: ArcSpec::new(at(320.0), 100.0, 50.0, 180.0, 0.0).border(false),
            battery: BatteryArc {
                track:        PercentArc::new(at(570.0), 80.0, 180.0, 180.0),
                wear_width:   35.0,
                charge_width: GAUGE_WIDTH,
            },
            temperature: PercentArc::new(at(width - 570.0), 80.0, 360.0, -180.0),
            net_down: ArcSpec::new(at(width - 320.0), 100.0, 50.0, 180.0, 360.0)
                .negative(true)
                .border(false),
            ram: PercentArc::new(at(width), 150.0, 270.0, -90.0),
            brightness: PercentArc::new(at(0.0), 110.0, 270.0, 90.0),
        }
    }

    /// Background tracks as `(center, radius, start°, end°)`.
    fn tracks(&self) -> [(Point, f64, f64, f64); 6] {
        let (w, h) = (self.width, self.height);
        [
            (Point::new(0.0, h), 150.0, 270.0, 0.0),
            (Point::new(320.0, h), 100.0, 180.0, 0.0),
            (Point::new(570.0, h), 80.0, 180.0, 0.0),
            (Point::new(w - 570.0, h), 80.0, 180.0, 0.0),
            (Point::new(w - 320.0, h), 100.0, 180.0, 0.0),
            (Point::new(w, h), 150.0, 0.0, 270.0),
        ]
    }
}
