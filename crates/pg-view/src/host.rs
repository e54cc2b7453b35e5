// ABOUTME: Measurement and mutation seam between layout passes and the display.
// ABOUTME: Hosts report container widths and receive computed sizes back.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u64);

/// The display surface a view lays panels out in
pub trait LayoutHost {
    /// Current rendered content width of the container, in pixels
    fn container_width(&self, container: ContainerId) -> f32;

    fn write_container_height(&mut self, container: ContainerId, height: f32);

    /// Width the laid-out content occupies, for hosts that center it
    fn write_content_width(&mut self, _container: ContainerId, _width: f32) {}
}

/// Host backed by plain maps, for headless layout and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    widths: HashMap<ContainerId, f32>,
    heights: HashMap<ContainerId, f32>,
    content_widths: HashMap<ContainerId, f32>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(container: ContainerId, width: f32) -> Self {
        let mut host = Self::new();
        host.set_width(container, width);
        host
    }

    pub fn set_width(&mut self, container: ContainerId, width: f32) {
        self.widths.insert(container, width);
    }

    pub fn height(&self, container: ContainerId) -> Option<f32> {
        self.heights.get(&container).copied()
    }

    pub fn content_width(&self, container: ContainerId) -> Option<f32> {
        self.content_widths.get(&container).copied()
    }
}

impl LayoutHost for MemoryHost {
    /// Unknown containers measure as zero width
    fn container_width(&self, container: ContainerId) -> f32 {
        self.widths.get(&container).copied().unwrap_or(0.0)
    }

    fn write_container_height(&mut self, container: ContainerId, height: f32) {
        self.heights.insert(container, height);
    }

    fn write_content_width(&mut self, container: ContainerId, width: f32) {
        self.content_widths.insert(container, width);
    }
}
