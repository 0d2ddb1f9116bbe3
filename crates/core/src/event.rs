/// Messages flowing through the overlay's event loop.
///
/// Sources:
/// - Redraw timer        → `Tick`
/// - Config watcher task → `ConfigReloaded`
#[derive(Debug, Clone)]
pub enum Message {
    /// Redraw timer fired — repaint every gauge from current sampler state.
    Tick,
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}
