use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Arrangement policy used by the atlas builder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Binary-tree packer sized by the bin search.
    #[default]
    Compact,
    /// Left-to-right rows wrapping at `max_width`.
    Horizontal,
    /// Top-to-bottom columns wrapping at `max_height`.
    Vertical,
    /// One row per group, then a trailing row of ungrouped sprites.
    #[serde(alias = "by-animation", alias = "by_group")]
    ByGroup,
}

impl FromStr for Layout {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            "by-group" | "by_group" | "by-animation" | "bygroup" => Ok(Self::ByGroup),
            _ => Err(()),
        }
    }
}

/// Quick option presets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// No spacing, trim whitespace, power-of-two.
    Tight,
    /// 2px spacing, power-of-two.
    Standard,
    /// 4px spacing, flexible size.
    Loose,
    /// Keep original dimensions, one row per group.
    Preserve,
}

impl FromStr for Preset {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tight" => Ok(Self::Tight),
            "standard" => Ok(Self::Standard),
            "loose" => Ok(Self::Loose),
            "preserve" => Ok(Self::Preserve),
            _ => Err(()),
        }
    }
}

impl Preset {
    /// Overwrites the preset-controlled fields of `options`. Max dimensions,
    /// padding and image name are left alone.
    pub fn apply(self, mut options: PackingOptions) -> PackingOptions {
        let (spacing, trim, pow2, layout) = match self {
            Preset::Tight => (0, true, true, Layout::Compact),
            Preset::Standard => (2, false, true, Layout::Compact),
            Preset::Loose => (4, false, false, Layout::Compact),
            Preset::Preserve => (0, false, false, Layout::ByGroup),
        };
        options.spacing = spacing;
        options.trim_whitespace = trim;
        options.force_power_of_two = pow2;
        options.allow_rotation = false;
        options.layout = layout;
        options
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackingOptions {
    /// Upper bound for the canvas width.
    pub max_width: u32,
    /// Upper bound for the canvas height.
    pub max_height: u32,
    /// Pixels reserved to the right of and below every sprite.
    pub spacing: u32,
    /// Crop sprites to their opaque bounds.
    pub trim_whitespace: bool,
    /// With trimming: pixels kept around the opaque bounds.
    /// Without trimming: transparent border added on every side.
    #[serde(default)]
    pub padding: u32,
    /// Round canvas dimensions up to powers of two.
    pub force_power_of_two: bool,
    /// Accepted for compatibility; sprites are never rotated.
    #[serde(default)]
    pub allow_rotation: bool,
    #[serde(default)]
    pub layout: Layout,
    /// Value written to `meta.image`.
    #[serde(default = "default_image_name")]
    pub image_name: String,
}

impl Default for PackingOptions {
    fn default() -> Self {
        Self {
            max_width: 2048,
            max_height: 2048,
            spacing: 2,
            trim_whitespace: false,
            padding: 0,
            force_power_of_two: true,
            allow_rotation: false,
            layout: Layout::Compact,
            image_name: default_image_name(),
        }
    }
}

fn default_image_name() -> String {
    "spritesheet.png".into()
}

impl PackingOptions {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - Dimensions are zero
    /// - Spacing alone would fill the canvas
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpritePackerError;

        if self.max_width == 0 || self.max_height == 0 {
            return Err(SpritePackerError::InvalidDimensions {
                width: self.max_width,
                height: self.max_height,
            });
        }

        if self.spacing >= self.max_width || self.spacing >= self.max_height {
            return Err(SpritePackerError::InvalidConfig(format!(
                "spacing ({}) leaves no usable space in {}x{}",
                self.spacing, self.max_width, self.max_height
            )));
        }

        Ok(())
    }

    /// Create a fluent builder for `PackingOptions`.
    pub fn builder() -> PackingOptionsBuilder {
        PackingOptionsBuilder::new()
    }
}

/// Builder for `PackingOptions` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackingOptionsBuilder {
    options: PackingOptions,
}

impl PackingOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: PackingOptions::default(),
        }
    }
    pub fn preset(mut self, preset: Preset) -> Self {
        self.options = preset.apply(self.options);
        self
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.options.max_width = w;
        self.options.max_height = h;
        self
    }
    pub fn spacing(mut self, v: u32) -> Self {
        self.options.spacing = v;
        self
    }
    pub fn trim(mut self, v: bool) -> Self {
        self.options.trim_whitespace = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.options.padding = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.options.force_power_of_two = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.options.allow_rotation = v;
        self
    }
    pub fn layout(mut self, v: Layout) -> Self {
        self.options.layout = v;
        self
    }
    pub fn image_name(mut self, v: impl Into<String>) -> Self {
        self.options.image_name = v.into();
        self
    }
    pub fn build(self) -> PackingOptions {
        self.options
    }
}
