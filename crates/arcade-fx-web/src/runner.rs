use std::cell::RefCell;
use std::rc::Rc;

use arcade_fx::{Callback, DrawList, EffectsCompositor, FxConfig, GameState};
#[cfg(feature = "vectors")]
use arcade_fx::VectorSurface;

/// Owns the compositor and the per-frame output buffers the host reads.
///
/// Completion callbacks fire inside `EffectsCompositor::update`; they only
/// queue their payload here so the host is called back after the runner is
/// no longer borrowed.
pub struct FxRunner<F: 'static> {
    fx: EffectsCompositor,
    draw_list: DrawList,
    #[cfg(feature = "vectors")]
    vectors: VectorSurface,
    /// Flat `[layer, start, end]` triples for the vector buffer.
    #[cfg(feature = "vectors")]
    layer_batches: Vec<u32>,
    state: GameState,
    ready: Rc<RefCell<Vec<F>>>,
}

impl<F: 'static> FxRunner<F> {
    pub fn new(config: FxConfig) -> Self {
        let (w, h) = (config.width, config.height);
        Self {
            fx: EffectsCompositor::new(config),
            draw_list: DrawList::new(w, h),
            #[cfg(feature = "vectors")]
            vectors: VectorSurface::new(w, h),
            #[cfg(feature = "vectors")]
            layer_batches: Vec::new(),
            state: GameState::default(),
            ready: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn fx(&mut self) -> &mut EffectsCompositor {
        &mut self.fx
    }

    /// Wrap a host callback so completion only queues it.
    pub fn defer(&self, payload: Option<F>) -> Option<Callback> {
        let payload = payload?;
        let ready = Rc::clone(&self.ready);
        Some(Box::new(move || ready.borrow_mut().push(payload)))
    }

    /// Callbacks whose transitions finished since the last call.
    pub fn take_ready(&mut self) -> Vec<F> {
        std::mem::take(&mut *self.ready.borrow_mut())
    }

    pub fn set_state(&mut self, state: GameState) {
        self.state = state;
    }

    /// Advance one frame and rebuild the draw outputs.
    pub fn tick(&mut self, dt: f32) {
        self.fx.update(dt, &self.state);

        self.draw_list.clear();
        self.fx.draw(&mut self.draw_list);

        #[cfg(feature = "vectors")]
        {
            self.vectors.clear();
            self.fx.draw(&mut self.vectors);
            self.layer_batches.clear();
            for b in self.vectors.layer_batches() {
                self.layer_batches.extend_from_slice(&[b.layer.as_u8() as u32, b.start, b.end]);
            }
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.fx.resize(width, height);
        self.draw_list.resize(width, height);
        #[cfg(feature = "vectors")]
        self.vectors.resize(width, height);
    }

    pub fn draw_list_json(&self) -> String {
        match self.draw_list.to_json() {
            Ok(json) => json,
            Err(err) => {
                log::warn!("draw list serialization failed: {err}");
                String::from("[]")
            }
        }
    }

    pub fn command_count(&self) -> u32 {
        self.draw_list.len() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertices_ptr(&self) -> *const f32 {
        self.vectors.buffer_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn vector_vertex_count(&self) -> u32 {
        self.vectors.vertex_count() as u32
    }

    #[cfg(feature = "vectors")]
    pub fn layer_batches_ptr(&self) -> *const u32 {
        self.layer_batches.as_ptr()
    }

    #[cfg(feature = "vectors")]
    pub fn layer_batch_count(&self) -> u32 {
        (self.layer_batches.len() / 3) as u32
    }

    /// Text the vector path leaves to the host, tagged with its layer.
    #[cfg(feature = "vectors")]
    pub fn text_runs_json(&self) -> String {
        match serde_json::to_string(self.vectors.text_runs()) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("text run serialization failed: {err}");
                String::from("[]")
            }
        }
    }

    pub fn particle_count(&self) -> u32 {
        self.fx.particles.particle_count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_fx::TransitionKind;

    #[test]
    fn deferred_callbacks_queue_until_taken() {
        let mut runner: FxRunner<&'static str> = FxRunner::new(FxConfig::default());
        let cb = runner.defer(Some("level-start"));
        runner.fx().level_start(1, cb);
        assert!(runner.take_ready().is_empty());
        runner.tick(1000.0);
        assert_eq!(runner.take_ready(), vec!["level-start"]);
        assert!(runner.take_ready().is_empty());
        assert!(runner.defer(None).is_none());
    }

    #[test]
    fn tick_rebuilds_draw_outputs() {
        let mut runner: FxRunner<()> = FxRunner::new(FxConfig::new(320.0, 240.0));
        runner.fx().transitions.start(TransitionKind::Curtain, 500.0, None);
        runner.tick(16.0);
        let first = runner.command_count();
        assert!(first > 0);
        runner.tick(16.0);
        assert!(runner.draw_list_json().starts_with('['));
        #[cfg(feature = "vectors")]
        assert!(runner.layer_batch_count() >= 7);
    }

    #[cfg(feature = "vectors")]
    #[test]
    fn text_runs_reach_the_host_with_layers() {
        let mut runner: FxRunner<()> = FxRunner::new(FxConfig::default());
        runner.fx().level_up(4);
        runner.tick(16.0);
        let json = runner.text_runs_json();
        assert!(json.contains("\"text\":\"LEVEL UP!\""));
        assert!(json.contains("\"layer\":\"notifications\""));
    }
}
