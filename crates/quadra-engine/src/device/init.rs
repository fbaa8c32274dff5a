/// How many frames the presentation engine may queue before `begin_frame` blocks.
///
/// `Frames0` disables vsync waiting entirely.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum VsyncWait {
    Frames0,
    #[default]
    Frames1,
    Frames2,
    Frames3,
    Frames4,
}

impl VsyncWait {
    /// Number of buffered frames (0–4).
    pub fn frames(self) -> u32 {
        match self {
            VsyncWait::Frames0 => 0,
            VsyncWait::Frames1 => 1,
            VsyncWait::Frames2 => 2,
            VsyncWait::Frames3 => 3,
            VsyncWait::Frames4 => 4,
        }
    }

    /// Builds from a frame count; values above 4 are rejected.
    pub fn from_frames(frames: u32) -> Option<Self> {
        Some(match frames {
            0 => VsyncWait::Frames0,
            1 => VsyncWait::Frames1,
            2 => VsyncWait::Frames2,
            3 => VsyncWait::Frames3,
            4 => VsyncWait::Frames4,
            _ => return None,
        })
    }

    pub fn present_mode(self) -> wgpu::PresentMode {
        match self {
            VsyncWait::Frames0 => wgpu::PresentMode::AutoNoVsync,
            _ => wgpu::PresentMode::Fifo,
        }
    }

    /// Surface latency hint. wgpu has no zero-latency setting, so `Frames0` asks for 1.
    pub fn frame_latency(self) -> u32 {
        self.frames().max(1)
    }
}

/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Vsync wait policy; selects present mode and frame latency.
    pub vsync: VsyncWait,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            vsync: VsyncWait::default(),
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── VsyncWait ─────────────────────────────────────────────────────────

    #[test]
    fn zero_frames_disables_vsync() {
        assert_eq!(VsyncWait::Frames0.present_mode(), wgpu::PresentMode::AutoNoVsync);
        assert_eq!(VsyncWait::Frames0.frame_latency(), 1);
    }

    #[test]
    fn buffered_frames_use_fifo_with_matching_latency() {
        for n in 1..=4 {
            let v = VsyncWait::from_frames(n).unwrap();
            assert_eq!(v.present_mode(), wgpu::PresentMode::Fifo);
            assert_eq!(v.frame_latency(), n);
            assert_eq!(v.frames(), n);
        }
    }

    #[test]
    fn more_than_four_frames_is_rejected() {
        assert_eq!(VsyncWait::from_frames(5), None);
    }

    // ── GpuInit ───────────────────────────────────────────────────────────

    #[test]
    fn default_waits_one_frame() {
        let init = GpuInit::default();
        assert_eq!(init.vsync, VsyncWait::Frames1);
        assert!(init.prefer_srgb);
    }
}
