//! Rendering adapters. The core never touches a UI toolkit; it hands UI
//! effects to a `Renderer`.

use tracing::info;

use crate::effects::Effect;

pub trait Renderer {
    fn apply(&mut self, effect: &Effect);
}

/// Headless adapter: every UI effect becomes a log line.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    applied: usize,
}

impl TracingRenderer {
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Renderer for TracingRenderer {
    fn apply(&mut self, effect: &Effect) {
        self.applied += 1;
        match effect {
            Effect::Alert(message) => info!(target: "ui", "alert: {message}"),
            Effect::ShowSection { index, total } => {
                info!(target: "ui", "section {}/{}", index + 1, total)
            }
            Effect::Progress { percent } => info!(target: "ui", "progress {percent:.1}%"),
            Effect::Focus(field) => info!(target: "ui", "focus {field}"),
            Effect::Confirmed => info!(target: "ui", "confirmation page"),
            other => info!(target: "ui", "{other:?}"),
        }
    }
}

/// Collects effects; useful for tests and for inspecting a scripted run.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub effects: Vec<Effect>,
}

impl RecordingRenderer {
    pub fn alerts(&self) -> Vec<&str> {
        self.effects
            .iter()
            .filter_map(|e| match e {
                Effect::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn apply(&mut self, effect: &Effect) {
        self.effects.push(effect.clone());
    }
}
