use super::{GraphicsPipelineBuilder, StageBuilder, ViewportState};
use crate::{PipelineError, PipelineResult};
use ash::vk;

/// Viewports and scissors of the session, with the entry being edited of each.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewportStage {
    viewports: Vec<vk::Viewport>,
    scissors: Vec<vk::Rect2D>,
    pending_viewport: Option<vk::Viewport>,
    pending_scissor: Option<vk::Rect2D>,
}

fn default_viewport() -> vk::Viewport {
    vk::Viewport {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

fn viewport_is_ready(viewport: &vk::Viewport) -> bool {
    viewport.width > 0.0 && viewport.height > 0.0 && viewport.min_depth != viewport.max_depth
}

fn scissor_is_ready(scissor: &vk::Rect2D) -> bool {
    scissor.extent.width > 0 && scissor.extent.height > 0
}

impl ViewportStage {
    /// Commit the pending viewport and scissor if they are complete.
    ///
    /// Incomplete entries stay pending.
    pub(crate) fn checkpoint(&mut self) {
        if let Some(viewport) = self.pending_viewport.filter(viewport_is_ready) {
            log::trace!("Committing viewport {:?}", viewport);
            self.viewports.push(viewport);
            self.pending_viewport = None;
        }
        if let Some(scissor) = self.pending_scissor.filter(scissor_is_ready) {
            log::trace!("Committing scissor {:?}", scissor);
            self.scissors.push(scissor);
            self.pending_scissor = None;
        }
    }

    fn pending_viewport(&mut self) -> &mut vk::Viewport {
        self.pending_viewport.get_or_insert_with(default_viewport)
    }

    fn pending_scissor(&mut self) -> &mut vk::Rect2D {
        self.pending_scissor.get_or_insert_with(vk::Rect2D::default)
    }

    fn add_viewport(&mut self) -> PipelineResult<()> {
        let viewport = self.pending_viewport.unwrap_or_else(default_viewport);
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(PipelineError::InvalidViewportDimensions {
                width: viewport.width,
                height: viewport.height,
            });
        }
        log::trace!("Adding viewport {:?}", viewport);
        self.viewports.push(viewport);
        self.pending_viewport = None;
        Ok(())
    }

    fn add_scissor(&mut self) -> PipelineResult<()> {
        let scissor = self.pending_scissor.unwrap_or_default();
        if scissor.extent.width == 0 || scissor.extent.height == 0 {
            return Err(PipelineError::InvalidScissorExtent {
                width: scissor.extent.width,
                height: scissor.extent.height,
            });
        }
        log::trace!("Adding scissor {:?}", scissor);
        self.scissors.push(scissor);
        self.pending_scissor = None;
        Ok(())
    }

    pub(crate) fn build_viewport_state(&self) -> PipelineResult<ViewportState> {
        if self.pending_viewport.is_some() {
            log::warn!("Ignoring incomplete viewport {:?}", self.pending_viewport);
        }
        if self.pending_scissor.is_some() {
            log::warn!("Ignoring incomplete scissor {:?}", self.pending_scissor);
        }
        if self.viewports.is_empty() {
            return Err(PipelineError::NoViewports);
        }
        if self.scissors.is_empty() {
            return Err(PipelineError::NoScissors);
        }
        Ok(ViewportState {
            viewports: self.viewports.clone(),
            scissors: self.scissors.clone(),
        })
    }
}

/// Gives access to the viewport and scissor builders.
pub struct ViewportStateBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> ViewportStateBuilder<'a, 'd> {
    pub(crate) fn new(root: &'a mut GraphicsPipelineBuilder<'d>) -> Self {
        root.session().viewport();
        Self { root }
    }

    pub fn viewport(self) -> ViewportBuilder<'a, 'd> {
        self.root.session().checkpoint();
        ViewportBuilder { root: self.root }
    }

    pub fn scissor(self) -> ScissorBuilder<'a, 'd> {
        self.root.session().checkpoint();
        ScissorBuilder { root: self.root }
    }

    /// Remove every viewport and scissor, committed or pending.
    pub fn clear(self) -> Self {
        *self.root.session().viewport() = ViewportStage::default();
        self
    }

    /// Check that there is at least one viewport and one scissor and return them.
    pub fn build_viewport_state(&self) -> PipelineResult<ViewportState> {
        self.root
            .session
            .viewport
            .as_ref()
            .ok_or(PipelineError::NoViewports)?
            .build_viewport_state()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for ViewportStateBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}

/// Edits one viewport.
///
/// The viewport is committed by [`add`], or when navigating away once its width and height
/// are positive and its depth range is not empty.
///
/// [`add`]: #method.add
pub struct ViewportBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> ViewportBuilder<'a, 'd> {
    fn pending(&mut self) -> &mut vk::Viewport {
        self.root.session().viewport().pending_viewport()
    }

    pub fn origin(mut self, x: f32, y: f32) -> Self {
        let viewport = self.pending();
        viewport.x = x;
        viewport.y = y;
        self
    }

    pub fn dimension(mut self, width: f32, height: f32) -> Self {
        let viewport = self.pending();
        viewport.width = width;
        viewport.height = height;
        self
    }

    pub fn extent(self, extent: vk::Extent2D) -> Self {
        self.dimension(extent.width as f32, extent.height as f32)
    }

    pub fn min_depth(mut self, min_depth: f32) -> Self {
        self.pending().min_depth = min_depth;
        self
    }

    pub fn max_depth(mut self, max_depth: f32) -> Self {
        self.pending().max_depth = max_depth;
        self
    }

    pub fn depth_range(self, min_depth: f32, max_depth: f32) -> Self {
        self.min_depth(min_depth).max_depth(max_depth)
    }

    /// Commit the viewport and start a new one.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If the width or height is not positive.
    ///
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn add(self) -> PipelineResult<Self> {
        self.root.session().viewport().add_viewport()?;
        Ok(self)
    }

    /// Commit the viewport if it is complete and start a new one.
    pub fn viewport(self) -> ViewportBuilder<'a, 'd> {
        ViewportStateBuilder::new(self.root).viewport()
    }

    /// Commit the viewport if it is complete and edit a scissor.
    pub fn scissor(self) -> ScissorBuilder<'a, 'd> {
        ViewportStateBuilder::new(self.root).scissor()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for ViewportBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}

/// Edits one scissor rectangle.
///
/// The scissor is committed by [`add`], or when navigating away once its extent is positive.
///
/// [`add`]: #method.add
pub struct ScissorBuilder<'a, 'd> {
    root: &'a mut GraphicsPipelineBuilder<'d>,
}

impl<'a, 'd> ScissorBuilder<'a, 'd> {
    fn pending(&mut self) -> &mut vk::Rect2D {
        self.root.session().viewport().pending_scissor()
    }

    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.pending().offset = vk::Offset2D { x, y };
        self
    }

    pub fn extent(mut self, width: u32, height: u32) -> Self {
        self.pending().extent = vk::Extent2D { width, height };
        self
    }

    pub fn rect(mut self, rect: vk::Rect2D) -> Self {
        *self.pending() = rect;
        self
    }

    /// Commit the scissor and start a new one.
    ///
    /// # Errors
    ///
    /// * [`PipelineError`] - If the extent is empty.
    ///
    /// [`PipelineError`]: enum.PipelineError.html
    pub fn add(self) -> PipelineResult<Self> {
        self.root.session().viewport().add_scissor()?;
        Ok(self)
    }

    /// Commit the scissor if it is complete and edit a viewport.
    pub fn viewport(self) -> ViewportBuilder<'a, 'd> {
        ViewportStateBuilder::new(self.root).viewport()
    }

    /// Commit the scissor if it is complete and start a new one.
    pub fn scissor(self) -> ScissorBuilder<'a, 'd> {
        ViewportStateBuilder::new(self.root).scissor()
    }
}

impl<'a, 'd: 'a> StageBuilder<'a, 'd> for ScissorBuilder<'a, 'd> {
    fn root(self) -> &'a mut GraphicsPipelineBuilder<'d> {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_viewport() -> vk::Viewport {
        vk::Viewport {
            width: 800.0,
            height: 600.0,
            ..default_viewport()
        }
    }

    #[test]
    fn checkpoint_commits_ready_entries() {
        let mut stage = ViewportStage::default();
        *stage.pending_viewport() = ready_viewport();
        stage.pending_scissor().extent = vk::Extent2D {
            width: 800,
            height: 600,
        };

        stage.checkpoint();
        stage.checkpoint();

        assert_eq!(stage.viewports.len(), 1);
        assert_eq!(stage.scissors.len(), 1);
        assert!(stage.pending_viewport.is_none());
        assert!(stage.pending_scissor.is_none());
    }

    #[test]
    fn checkpoint_keeps_incomplete_entries_pending() {
        let mut stage = ViewportStage::default();
        stage.pending_viewport().width = 800.0;
        stage.pending_scissor().extent.width = 800;

        stage.checkpoint();
        assert!(stage.viewports.is_empty());
        assert!(stage.scissors.is_empty());

        stage.pending_viewport().height = 600.0;
        stage.checkpoint();
        assert_eq!(stage.viewports.len(), 1);
        assert!(stage.pending_scissor.is_some());
    }

    #[test]
    fn empty_depth_range_is_not_ready() {
        let mut stage = ViewportStage::default();
        *stage.pending_viewport() = vk::Viewport {
            max_depth: 0.0,
            ..ready_viewport()
        };
        stage.checkpoint();
        assert!(stage.viewports.is_empty());

        stage.add_viewport().unwrap();
        assert_eq!(stage.viewports.len(), 1);
    }

    #[test]
    fn explicit_add_validates_dimensions() {
        let mut stage = ViewportStage::default();
        stage.pending_viewport().width = 800.0;
        assert!(matches!(
            stage.add_viewport(),
            Err(PipelineError::InvalidViewportDimensions { height, .. }) if height == 0.0
        ));
        assert!(matches!(
            stage.add_scissor(),
            Err(PipelineError::InvalidScissorExtent {
                width: 0,
                height: 0
            })
        ));
    }

    #[test]
    fn state_needs_viewports_and_scissors() {
        let mut stage = ViewportStage::default();
        assert!(matches!(
            stage.build_viewport_state(),
            Err(PipelineError::NoViewports)
        ));

        *stage.pending_viewport() = ready_viewport();
        stage.add_viewport().unwrap();
        assert!(matches!(
            stage.build_viewport_state(),
            Err(PipelineError::NoScissors)
        ));
    }
}
