//! The per-frame animation loop.
//!
//! The host's redraw scheduling drives the loop: every `RedrawRequested` calls
//! [`AnimationLoop::tick`], renders when it returns `Some`, and asks for the
//! next redraw. Stopping the loop is the only way out of the running state.

use crate::{clock::Clock, scene::SceneState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct AnimationLoop<C: Clock> {
    clock: C,
    state: LoopState,
    frames: u64,
}

impl<C: Clock> AnimationLoop<C> {
    /// The loop starts running right away; the clock's zero is the scene's start.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Running,
            frames: 0,
        }
    }

    /// Advance one frame. Returns the elapsed seconds written into the uniforms,
    /// or `None` once the loop has been stopped.
    pub fn tick(&mut self, scene: &mut SceneState) -> Option<f32> {
        if self.state == LoopState::Stopped {
            return None;
        }
        let elapsed = self.clock.elapsed().as_secs_f32();
        scene.set_time(elapsed);
        scene.update_controls();
        self.frames += 1;
        Some(elapsed)
    }

    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::info!("animation loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
