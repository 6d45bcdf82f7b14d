//! Scoped ownership of a drawing surface for one plan view.
//!
//! A [`PlanView`] holds its surface from `mount` to `unmount`. Every render
//! starts with a clear, and a plan whose fingerprint and surface size match
//! the last successful render is not drawn again.

use blake3::Hash;
use serde_json::json;

use crate::config::EngineConfig;
use crate::error::RenderError;
use crate::logging::{LogFields, LogLevel, Logger, emit, json_kv, json_str};
use crate::plan::FloorPlan;
use crate::render::{PlanRenderer, Surface, SurfaceSize};

const LOG_TARGET: &str = "floorplan::view";

/// What a call to [`PlanView::show`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewUpdate {
    Rendered { ops: usize },
    Unchanged,
}

pub struct PlanView<S: Surface> {
    surface: S,
    renderer: PlanRenderer,
    size: SurfaceSize,
    shown: Option<Hash>,
    logger: Option<Logger>,
}

impl<S: Surface> PlanView<S> {
    pub fn mount(surface: S, renderer: PlanRenderer, size: SurfaceSize) -> Self {
        Self::mount_with_logger(surface, renderer, size, None)
    }

    pub fn mount_with_config(surface: S, config: &EngineConfig, size: SurfaceSize) -> Self {
        Self::mount_with_logger(
            surface,
            PlanRenderer::from_config(config),
            size,
            config.logger.clone(),
        )
    }

    fn mount_with_logger(
        surface: S,
        renderer: PlanRenderer,
        size: SurfaceSize,
        logger: Option<Logger>,
    ) -> Self {
        emit(
            logger.as_ref(),
            LogLevel::Debug,
            LOG_TARGET,
            "view_mounted",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Self {
            surface,
            renderer,
            size,
            shown: None,
            logger,
        }
    }

    /// Draw `plan` unless it is already on the surface.
    ///
    /// On error the surface keeps whatever the previous render left.
    pub fn show(&mut self, plan: &FloorPlan) -> Result<ViewUpdate, RenderError> {
        let fingerprint = plan.fingerprint();
        if self.shown == Some(fingerprint) {
            emit(
                self.logger.as_ref(),
                LogLevel::Trace,
                LOG_TARGET,
                "render_skipped",
                [json_str("fingerprint", fingerprint.to_hex().to_string())],
            );
            return Ok(ViewUpdate::Unchanged);
        }

        let ops = self.renderer.render_into(plan, self.size, &mut self.surface)?;
        self.shown = Some(fingerprint);
        Ok(ViewUpdate::Rendered { ops })
    }

    /// Change the surface size; the next `show` redraws.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size != self.size {
            self.size = size;
            self.shown = None;
        }
    }

    /// Force the next `show` to redraw.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Clear the surface and hand it back.
    pub fn unmount(mut self) -> S {
        self.surface.clear(self.size.width, self.size.height);
        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            LOG_TARGET,
            "view_unmounted",
            LogFields::new(),
        );
        self.surface
    }
}
