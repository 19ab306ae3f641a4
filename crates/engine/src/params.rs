//! Embroidery parameters.
//!
//! Regions carry their options in millimeters ([`RegionOptions`]); the
//! engines work in device pixels. Resolution multiplies by `pixels_per_mm`,
//! fills in the derived defaults and rejects degenerate values.
//!
//! [`PARAM_TABLE`] enumerates every option with its unit, type, group and
//! default. The engine itself only reads the explicit records; the table
//! exists so an external UI layer can present the options without reflecting
//! over the engine.

use std::f64::consts::FRAC_PI_2;

/// On-screen pixels per millimeter when the caller does not say otherwise.
pub const DEFAULT_PIXELS_PER_MM: f64 = 10.0;

/// Per-region options, in millimeters and degrees.
///
/// Serde defaults make a partially specified JSON region usable as-is.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegionOptions {
    /// Angle of the fill grating in degrees.
    pub angle_deg: f64,
    /// Spacing between grating rows.
    pub row_spacing_mm: f64,
    /// Maximum fill stitch length.
    pub max_stitch_length_mm: f64,
    /// Stagger rows this many times before the pattern repeats.
    pub staggers: u32,
    /// Start fill rows right-to-left.
    pub flip: bool,
    /// Running stitch length (strokes and traversal between fill sections).
    pub running_stitch_length_mm: f64,
    /// Peak-to-peak zig-zag spacing (satin columns and wide strokes).
    pub zigzag_spacing_mm: f64,
    /// Stroke repeat count.
    pub repeats: u32,
    /// Extra satin width per side to counteract thread pull.
    pub pull_compensation_mm: f64,

    pub fill_underlay: bool,
    /// Underlay grating angle; defaults to the fill angle plus 90 degrees.
    pub fill_underlay_angle_deg: Option<f64>,
    /// Underlay row spacing; defaults to three times the fill row spacing.
    pub fill_underlay_row_spacing_mm: Option<f64>,
    /// Underlay stitch length; defaults to the fill max stitch length.
    pub fill_underlay_max_stitch_length_mm: Option<f64>,

    pub contour_underlay: bool,
    /// Defaults to the running stitch length.
    pub contour_underlay_stitch_length_mm: Option<f64>,
    /// How far inside the column edge the contour underlay sits.
    pub contour_underlay_inset_mm: f64,

    pub center_walk_underlay: bool,
    /// Defaults to the running stitch length.
    pub center_walk_underlay_stitch_length_mm: Option<f64>,

    pub zigzag_underlay: bool,
    pub zigzag_underlay_spacing_mm: f64,
    /// Defaults to half the contour underlay inset, so zig-zag points land
    /// between the contour underlay and the column edge.
    pub zigzag_underlay_inset_mm: Option<f64>,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            row_spacing_mm: 0.4,
            max_stitch_length_mm: 3.0,
            staggers: 4,
            flip: false,
            running_stitch_length_mm: 3.0,
            zigzag_spacing_mm: 1.0,
            repeats: 1,
            pull_compensation_mm: 0.0,
            fill_underlay: false,
            fill_underlay_angle_deg: None,
            fill_underlay_row_spacing_mm: None,
            fill_underlay_max_stitch_length_mm: None,
            contour_underlay: false,
            contour_underlay_stitch_length_mm: None,
            contour_underlay_inset_mm: 0.4,
            center_walk_underlay: false,
            center_walk_underlay_stitch_length_mm: None,
            zigzag_underlay: false,
            zigzag_underlay_spacing_mm: 1.0,
            zigzag_underlay_inset_mm: None,
        }
    }
}

/// Resolved fill parameters, in pixels and radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillParams {
    pub angle: f64,
    pub row_spacing: f64,
    pub max_stitch_length: f64,
    pub staggers: u32,
    pub flip: bool,
    pub pixels_per_mm: f64,
}

/// Resolved auto-fill parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoFillParams {
    pub fill: FillParams,
    pub running_stitch_length: f64,
    /// Grating parameters for the underlay pass, when enabled.
    pub underlay: Option<FillParams>,
}

/// Resolved satin column parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SatinParams {
    pub zigzag_spacing: f64,
    pub pull_compensation: f64,
    pub contour_underlay: bool,
    pub contour_underlay_stitch_length: f64,
    pub contour_underlay_inset: f64,
    pub center_walk_underlay: bool,
    pub center_walk_underlay_stitch_length: f64,
    pub zigzag_underlay: bool,
    pub zigzag_underlay_spacing: f64,
    pub zigzag_underlay_inset: f64,
}

/// Resolved stroke parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeParams {
    pub running_stitch_length: f64,
    pub zigzag_spacing: f64,
    pub repeats: u32,
    /// Stroke width in pixels, taken from the region style.
    pub stroke_width: f64,
    pub dashed: bool,
}

impl RegionOptions {
    /// Resolve fill parameters. The error string names the offending value;
    /// callers attach the region name.
    pub fn fill_params(&self, pixels_per_mm: f64) -> Result<FillParams, String> {
        if self.row_spacing_mm <= 0.0 {
            return Err(format!("row spacing must be positive (got {})", self.row_spacing_mm));
        }
        if self.max_stitch_length_mm <= 0.0 {
            return Err(format!(
                "max stitch length must be positive (got {})",
                self.max_stitch_length_mm
            ));
        }
        if self.staggers == 0 {
            return Err("staggers must be at least 1".to_string());
        }

        Ok(FillParams {
            angle: self.angle_deg.to_radians(),
            row_spacing: self.row_spacing_mm * pixels_per_mm,
            max_stitch_length: self.max_stitch_length_mm * pixels_per_mm,
            staggers: self.staggers,
            flip: self.flip,
            pixels_per_mm,
        })
    }

    /// Resolve auto-fill parameters, including the derived underlay pass.
    pub fn auto_fill_params(&self, pixels_per_mm: f64) -> Result<AutoFillParams, String> {
        // auto-fill always routes top-to-bottom; flip is a manual-fill knob
        let fill = FillParams {
            flip: false,
            ..self.fill_params(pixels_per_mm)?
        };

        if self.running_stitch_length_mm <= 0.0 {
            return Err(format!(
                "running stitch length must be positive (got {})",
                self.running_stitch_length_mm
            ));
        }

        let underlay = if self.fill_underlay {
            let angle = match self.fill_underlay_angle_deg {
                Some(deg) => deg.to_radians(),
                None => fill.angle + FRAC_PI_2,
            };
            let row_spacing = match self.fill_underlay_row_spacing_mm {
                Some(mm) if mm <= 0.0 => {
                    return Err(format!("underlay row spacing must be positive (got {mm})"));
                }
                Some(mm) => mm * pixels_per_mm,
                None => fill.row_spacing * 3.0,
            };
            let max_stitch_length = match self.fill_underlay_max_stitch_length_mm {
                Some(mm) if mm <= 0.0 => {
                    return Err(format!("underlay stitch length must be positive (got {mm})"));
                }
                Some(mm) => mm * pixels_per_mm,
                None => fill.max_stitch_length,
            };

            Some(FillParams {
                angle,
                row_spacing,
                max_stitch_length,
                ..fill
            })
        } else {
            None
        };

        Ok(AutoFillParams {
            fill,
            running_stitch_length: self.running_stitch_length_mm * pixels_per_mm,
            underlay,
        })
    }

    /// Resolve satin column parameters.
    pub fn satin_params(&self, pixels_per_mm: f64) -> Result<SatinParams, String> {
        if self.zigzag_spacing_mm <= 0.0 {
            return Err(format!(
                "zigzag spacing must be positive (got {})",
                self.zigzag_spacing_mm
            ));
        }
        if self.zigzag_underlay && self.zigzag_underlay_spacing_mm <= 0.0 {
            return Err(format!(
                "zigzag underlay spacing must be positive (got {})",
                self.zigzag_underlay_spacing_mm
            ));
        }

        let running = self.running_stitch_length_mm;
        let contour_stitch_length =
            self.contour_underlay_stitch_length_mm.unwrap_or(running);
        let center_stitch_length =
            self.center_walk_underlay_stitch_length_mm.unwrap_or(running);
        if (self.contour_underlay && contour_stitch_length <= 0.0)
            || (self.center_walk_underlay && center_stitch_length <= 0.0)
        {
            return Err("underlay stitch length must be positive".to_string());
        }

        let zigzag_inset = self
            .zigzag_underlay_inset_mm
            .unwrap_or(self.contour_underlay_inset_mm / 2.0);

        Ok(SatinParams {
            zigzag_spacing: self.zigzag_spacing_mm * pixels_per_mm,
            pull_compensation: self.pull_compensation_mm * pixels_per_mm,
            contour_underlay: self.contour_underlay,
            contour_underlay_stitch_length: contour_stitch_length * pixels_per_mm,
            contour_underlay_inset: self.contour_underlay_inset_mm * pixels_per_mm,
            center_walk_underlay: self.center_walk_underlay,
            center_walk_underlay_stitch_length: center_stitch_length * pixels_per_mm,
            zigzag_underlay: self.zigzag_underlay,
            zigzag_underlay_spacing: self.zigzag_underlay_spacing_mm * pixels_per_mm,
            zigzag_underlay_inset: zigzag_inset * pixels_per_mm,
        })
    }

    /// Resolve stroke parameters. `stroke_width` is in pixels and comes from
    /// the region's style rather than its option map.
    pub fn stroke_params(
        &self,
        pixels_per_mm: f64,
        stroke_width: f64,
        dashed: bool,
    ) -> Result<StrokeParams, String> {
        if self.running_stitch_length_mm <= 0.0 {
            return Err(format!(
                "running stitch length must be positive (got {})",
                self.running_stitch_length_mm
            ));
        }
        if self.zigzag_spacing_mm <= 0.0 {
            return Err(format!(
                "zigzag spacing must be positive (got {})",
                self.zigzag_spacing_mm
            ));
        }
        if self.repeats == 0 {
            return Err("repeats must be at least 1".to_string());
        }

        Ok(StrokeParams {
            running_stitch_length: self.running_stitch_length_mm * pixels_per_mm,
            zigzag_spacing: self.zigzag_spacing_mm * pixels_per_mm,
            repeats: self.repeats,
            stroke_width,
            dashed,
        })
    }
}

/// Value type of a registered parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParamKind {
    Float,
    Int,
    Boolean,
    Toggle,
}

/// One entry of the option registration table.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub unit: Option<&'static str>,
    pub kind: ParamKind,
    pub group: Option<&'static str>,
    pub default: Option<&'static str>,
}

/// Every option the engine understands, for consumption by a UI layer.
pub const PARAM_TABLE: &[ParamSpec] = &[
    ParamSpec {
        name: "auto_fill",
        description: "Automatically routed fill stitching",
        unit: None,
        kind: ParamKind::Toggle,
        group: None,
        default: Some("true"),
    },
    ParamSpec {
        name: "angle_deg",
        description: "Angle of lines of stitches",
        unit: Some("deg"),
        kind: ParamKind::Float,
        group: None,
        default: Some("0"),
    },
    ParamSpec {
        name: "flip",
        description: "Flip fill (start right-to-left)",
        unit: None,
        kind: ParamKind::Boolean,
        group: None,
        default: Some("false"),
    },
    ParamSpec {
        name: "row_spacing_mm",
        description: "Spacing between rows",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: None,
        default: Some("0.4"),
    },
    ParamSpec {
        name: "max_stitch_length_mm",
        description: "Maximum fill stitch length",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: None,
        default: Some("3.0"),
    },
    ParamSpec {
        name: "staggers",
        description: "Stagger rows this many times before repeating",
        unit: None,
        kind: ParamKind::Int,
        group: None,
        default: Some("4"),
    },
    ParamSpec {
        name: "running_stitch_length_mm",
        description: "Running stitch length (traversal between sections)",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: None,
        default: Some("3.0"),
    },
    ParamSpec {
        name: "fill_underlay",
        description: "Underlay",
        unit: None,
        kind: ParamKind::Toggle,
        group: Some("AutoFill Underlay"),
        default: Some("false"),
    },
    ParamSpec {
        name: "fill_underlay_angle_deg",
        description: "Fill angle (default: fill angle + 90 deg)",
        unit: Some("deg"),
        kind: ParamKind::Float,
        group: Some("AutoFill Underlay"),
        default: None,
    },
    ParamSpec {
        name: "fill_underlay_row_spacing_mm",
        description: "Row spacing (default: 3x fill row spacing)",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("AutoFill Underlay"),
        default: None,
    },
    ParamSpec {
        name: "fill_underlay_max_stitch_length_mm",
        description: "Max stitch length",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("AutoFill Underlay"),
        default: None,
    },
    ParamSpec {
        name: "satin_column",
        description: "Custom satin column",
        unit: None,
        kind: ParamKind::Toggle,
        group: None,
        default: Some("false"),
    },
    ParamSpec {
        name: "zigzag_spacing_mm",
        description: "Zig-zag spacing (peak-to-peak)",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: None,
        default: Some("1.0"),
    },
    ParamSpec {
        name: "pull_compensation_mm",
        description: "Pull compensation",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: None,
        default: Some("0"),
    },
    ParamSpec {
        name: "contour_underlay",
        description: "Contour underlay",
        unit: None,
        kind: ParamKind::Toggle,
        group: Some("Contour Underlay"),
        default: Some("false"),
    },
    ParamSpec {
        name: "contour_underlay_stitch_length_mm",
        description: "Stitch length",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("Contour Underlay"),
        default: None,
    },
    ParamSpec {
        name: "contour_underlay_inset_mm",
        description: "Contour underlay inset amount",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("Contour Underlay"),
        default: Some("0.4"),
    },
    ParamSpec {
        name: "center_walk_underlay",
        description: "Center-walk underlay",
        unit: None,
        kind: ParamKind::Toggle,
        group: Some("Center-Walk Underlay"),
        default: Some("false"),
    },
    ParamSpec {
        name: "center_walk_underlay_stitch_length_mm",
        description: "Stitch length",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("Center-Walk Underlay"),
        default: None,
    },
    ParamSpec {
        name: "zigzag_underlay",
        description: "Zig-zag underlay",
        unit: None,
        kind: ParamKind::Toggle,
        group: Some("Zig-zag Underlay"),
        default: Some("false"),
    },
    ParamSpec {
        name: "zigzag_underlay_spacing_mm",
        description: "Zig-zag spacing (peak-to-peak)",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("Zig-zag Underlay"),
        default: Some("1.0"),
    },
    ParamSpec {
        name: "zigzag_underlay_inset_mm",
        description: "Inset amount (default: half of contour underlay inset)",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: Some("Zig-zag Underlay"),
        default: None,
    },
    ParamSpec {
        name: "repeats",
        description: "Repeats",
        unit: None,
        kind: ParamKind::Int,
        group: None,
        default: Some("1"),
    },
    ParamSpec {
        name: "stroke_first",
        description: "Stitch the stroke before the fill",
        unit: None,
        kind: ParamKind::Boolean,
        group: None,
        default: Some("false"),
    },
    ParamSpec {
        name: "collapse_length_mm",
        description: "Maximum jump length to collapse into a normal stitch",
        unit: Some("mm"),
        kind: ParamKind::Float,
        group: None,
        default: Some("0"),
    },
    ParamSpec {
        name: "flatness",
        description: "Minimum flatness of the subdivided curves",
        unit: Some("px"),
        kind: ParamKind::Float,
        group: None,
        default: Some("0.1"),
    },
    ParamSpec {
        name: "pixels_per_mm",
        description: "Number of on-screen pixels per millimeter",
        unit: None,
        kind: ParamKind::Float,
        group: None,
        default: Some("10"),
    },
];

/// Look up a parameter spec by name.
pub fn param_spec(name: &str) -> Option<&'static ParamSpec> {
    PARAM_TABLE.iter().find(|spec| spec.name == name)
}
