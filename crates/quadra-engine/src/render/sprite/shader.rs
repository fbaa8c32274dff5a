use std::borrow::Cow;

use anyhow::{ensure, Result};

/// Programmable stages used by the sprite pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    #[inline]
    const fn slot(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::Fragment => 1,
        }
    }

    /// Entry point name used by the built-in shader.
    #[inline]
    pub const fn default_entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }

    #[inline]
    pub fn wgpu_stages(self) -> wgpu::ShaderStages {
        match self {
            ShaderStage::Vertex => wgpu::ShaderStages::VERTEX,
            ShaderStage::Fragment => wgpu::ShaderStages::FRAGMENT,
        }
    }
}

/// WGSL source for the sprite pipeline plus its per-stage entry points.
///
/// The source must declare the bindings and instance layout of the built-in
/// `shaders/sprite.wgsl`; replacing it changes how sprites are shaded, not how they
/// are batched.
#[derive(Debug, Clone)]
pub struct SpriteShader {
    pub label: Cow<'static, str>,
    pub source: Cow<'static, str>,
    entry_points: [Cow<'static, str>; 2],
}

impl SpriteShader {
    /// Shader shipped with the engine.
    pub fn builtin() -> Self {
        Self::from_wgsl("quadra sprite shader", include_str!("shaders/sprite.wgsl"))
    }

    /// Custom WGSL using the default entry point names.
    pub fn from_wgsl(
        label: impl Into<Cow<'static, str>>,
        source: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            label: label.into(),
            source: source.into(),
            entry_points: ShaderStage::ALL.map(|s| Cow::Borrowed(s.default_entry_point())),
        }
    }

    pub fn with_entry_point(mut self, stage: ShaderStage, name: impl Into<Cow<'static, str>>) -> Self {
        self.entry_points[stage.slot()] = name.into();
        self
    }

    #[inline]
    pub fn entry_point(&self, stage: ShaderStage) -> &str {
        &self.entry_points[stage.slot()]
    }

    /// Cheap sanity check before handing the source to the driver: every stage's entry
    /// point must be declared. Real validation happens at pipeline creation.
    pub fn validate(&self) -> Result<()> {
        for stage in ShaderStage::ALL {
            let name = self.entry_point(stage);
            ensure!(
                self.source.contains(&format!("fn {name}(")),
                "{}: no {stage:?} entry point `{name}`",
                self.label
            );
        }
        Ok(())
    }
}

impl Default for SpriteShader {
    fn default() -> Self {
        Self::builtin()
    }
}
