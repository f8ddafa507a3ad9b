use tracing::info;

/// A stage of the per-frame pipeline that can be switched on and off at runtime
pub trait FrameProcessor {
    fn name(&self) -> &'static str;
    fn is_enabled(&self) -> bool;
    fn set_enabled(&mut self, enabled: bool);
    fn toggle(&mut self) {
        let enabled = !self.is_enabled();
        self.set_enabled(enabled);
        info!("Processor '{}' is {}", self.name(), if enabled { "enabled" } else { "disabled" });
    }
}
