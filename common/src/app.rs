use crate::clock::FrameTime;
use crate::context::ContextError;

///
/// Lifecycle callbacks driven by [`crate::window::run`].
///
/// `on_load` runs once with the GL context current, before the first frame. `on_unload` runs
/// once when the event loop is torn down.
///
pub trait Application {
    fn on_load(&mut self) -> Result<(), ContextError>;

    fn on_resize(&mut self, width: u32, height: u32);

    fn on_update(&mut self, frame: FrameTime) {
        let _ = frame;
    }

    fn on_render(&mut self, frame: FrameTime);

    fn on_unload(&mut self);
}
