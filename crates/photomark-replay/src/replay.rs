//! Drive an engine through a script and write its outputs.

use crate::error::ReplayError;
use crate::script::Script;
use kurbo::Size;
use photomark_core::{AnnotationEngine, AnnotationObserver, EngineConfig, Shape, ToolKind};
use photomark_render::{RenderConfig, SkiaRenderer};
use std::path::{Path, PathBuf};

/// What to read and where to write.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub script: PathBuf,
    pub config: Option<PathBuf>,
    pub font: Option<PathBuf>,
    pub out_png: Option<PathBuf>,
    pub out_json: Option<PathBuf>,
}

/// Final state after a replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayReport {
    pub events: usize,
    pub objects: usize,
    pub history_len: usize,
    pub tool: ToolKind,
    pub active: bool,
}

/// Logs every annotation and tool change.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl AnnotationObserver for LoggingObserver {
    fn on_annotations_change(&mut self, objects: &[Shape]) {
        let kinds: Vec<&str> = objects.iter().map(Shape::kind_name).collect();
        log::info!("Annotations changed: {} objects {:?}", objects.len(), kinds);
    }

    fn on_tool_change(&mut self, tool: ToolKind) {
        log::info!("Engine requested tool {tool}");
    }
}

/// Build an engine for `script`, sized to its surface if given.
pub fn engine_for(mut config: EngineConfig, script: &Script) -> Result<AnnotationEngine, ReplayError> {
    if let Some(surface) = script.surface {
        config.surface_size = Size::new(surface.w, surface.h);
    }
    Ok(AnnotationEngine::new(config)?.with_observer(Box::new(LoggingObserver)))
}

/// Apply every event in order.
pub fn replay(engine: &mut AnnotationEngine, script: &Script) -> ReplayReport {
    for (i, event) in script.events.iter().enumerate() {
        log::debug!("Event {i}: {event:?}");
        event.apply(engine);
    }
    ReplayReport {
        events: script.events.len(),
        objects: engine.objects().len(),
        history_len: engine.history_len(),
        tool: engine.tool(),
        active: engine.is_active(),
    }
}

/// Load, replay and write the requested outputs.
pub fn run(options: &ReplayOptions) -> Result<ReplayReport, ReplayError> {
    let script = Script::load(&options.script)?;
    let config = match &options.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let mut engine = engine_for(config, &script)?;
    let report = replay(&mut engine, &script);
    log::info!(
        "Replayed {} events: {} objects, {} history entries",
        report.events,
        report.objects,
        report.history_len
    );

    if let Some(path) = &options.out_json {
        write_file(path, engine.annotations_json()?.as_bytes())?;
    }
    if let Some(path) = &options.out_png {
        let mut render_config = RenderConfig::new();
        if let Some(font) = &options.font {
            render_config = render_config.with_font(std::fs::read(font).map_err(|e| ReplayError::io(font, e))?);
        }
        let mut renderer = SkiaRenderer::new(render_config)?;
        let png = engine.rendered_snapshot(&mut renderer)?;
        write_file(path, &png)?;
    }
    Ok(report)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ReplayError> {
    std::fs::write(path, bytes).map_err(|e| ReplayError::io(path, e))?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Event, SurfaceSize};
    use photomark_core::Modifiers;

    fn arrow_script() -> Script {
        Script {
            surface: Some(SurfaceSize { w: 320.0, h: 240.0 }),
            events: vec![
                Event::Activate,
                Event::Tool { name: "arrow".into() },
                Event::Down {
                    x: 10.0,
                    y: 10.0,
                    modifiers: Modifiers::NONE,
                },
                Event::Move { x: 80.0, y: 40.0 },
                Event::Up,
            ],
        }
    }

    #[test]
    fn test_surface_size_overrides_config() {
        let script = arrow_script();
        let mut engine = engine_for(EngineConfig::default(), &script).unwrap();
        replay(&mut engine, &script);
        assert_eq!(engine.surface().unwrap().size(), Size::new(320.0, 240.0));
    }

    #[test]
    fn test_replay_report() {
        let script = arrow_script();
        let mut engine = engine_for(EngineConfig::default(), &script).unwrap();
        let report = replay(&mut engine, &script);
        assert_eq!(
            report,
            ReplayReport {
                events: 5,
                objects: 1,
                history_len: 2,
                tool: ToolKind::Arrow,
                active: true,
            }
        );
    }

    #[test]
    fn test_bad_color_is_skipped() {
        let mut script = arrow_script();
        script.events.insert(1, Event::Color { value: "nope".into() });
        let mut engine = engine_for(EngineConfig::default(), &script).unwrap();
        replay(&mut engine, &script);
        assert_eq!(engine.color().to_css(), "#DC2626");
    }
}
