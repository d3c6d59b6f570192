use std::borrow::Cow;

use crate::effects::blur::{blur_radius_for_sigma, blur_texture_padded};
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{PassError, PassResult};
use crate::pass::contents::{Contents, Snapshot};
use crate::render::texture::Texture;

/// Image-space filter a pass can apply to its offscreen result, or to its backdrop.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageFilter {
    /// Gaussian blur. `sigma` is in the pass's local units and scales with the effect transform.
    Blur {
        /// Standard deviation.
        sigma: f32,
    },
    /// 4x5 row-major color matrix over straight-alpha channels normalized to `[0, 1]`.
    ///
    /// The fifth column is an additive offset in the same normalized units.
    ColorMatrix {
        /// Matrix coefficients.
        matrix: [f32; 20],
    },
}

impl ImageFilter {
    /// Identity color matrix.
    pub const IDENTITY_MATRIX: [f32; 20] = [
        1.0, 0.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0, //
    ];

    /// Reject non-finite or negative parameters.
    pub fn validate(&self) -> PassResult<()> {
        match self {
            ImageFilter::Blur { sigma } => {
                if !sigma.is_finite() || *sigma < 0.0 {
                    return Err(PassError::validation("blur sigma must be finite and >= 0"));
                }
            }
            ImageFilter::ColorMatrix { matrix } => {
                if matrix.iter().any(|v| !v.is_finite()) {
                    return Err(PassError::validation(
                        "color matrix coefficients must be finite",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Output bounds produced from input bounds `input`.
    pub fn coverage(&self, input: Rect, effect_transform: Affine) -> Rect {
        match self {
            ImageFilter::Blur { sigma } => {
                let r = f64::from(blur_radius_for_sigma(scaled_sigma(*sigma, effect_transform)));
                input.inflate(r, r)
            }
            // Color filters are treated as coverage preserving.
            ImageFilter::ColorMatrix { .. } => input,
        }
    }

    /// Input bounds that can influence output bounds `output`.
    pub fn source_coverage(&self, output: Rect, effect_transform: Affine) -> Rect {
        self.coverage(output, effect_transform)
    }

    /// Filter `src`. Returns the result and its top-left offset relative to `src`.
    pub fn apply(&self, src: &Texture, effect_transform: Affine) -> PassResult<(Texture, i32)> {
        match self {
            ImageFilter::Blur { sigma } => {
                let (out, pad) =
                    blur_texture_padded(src, scaled_sigma(*sigma, effect_transform))?;
                Ok((out, -(pad as i32)))
            }
            ImageFilter::ColorMatrix { matrix } => Ok((apply_color_matrix(src, matrix), 0)),
        }
    }
}

/// Uniform scale of `effect_transform`, applied to a sigma given in local units.
fn scaled_sigma(sigma: f32, effect_transform: Affine) -> f32 {
    let scale = effect_transform.determinant().abs().sqrt();
    if !scale.is_finite() {
        return sigma;
    }
    (f64::from(sigma) * scale) as f32
}

fn apply_color_matrix(src: &Texture, m: &[f32; 20]) -> Texture {
    let mut out = src.clone();
    for px in out.data_mut().chunks_exact_mut(4) {
        let a = f32::from(px[3]) / 255.0;
        let straight = if a > 0.0 {
            [
                f32::from(px[0]) / 255.0 / a,
                f32::from(px[1]) / 255.0 / a,
                f32::from(px[2]) / 255.0 / a,
                a,
            ]
        } else {
            [0.0, 0.0, 0.0, 0.0]
        };
        let mut res = [0.0f32; 4];
        for (row, r) in res.iter_mut().enumerate() {
            let k = &m[row * 5..row * 5 + 5];
            *r = (k[0] * straight[0]
                + k[1] * straight[1]
                + k[2] * straight[2]
                + k[3] * straight[3]
                + k[4])
                .clamp(0.0, 1.0);
        }
        let out_a = res[3];
        px[0] = (res[0] * out_a * 255.0).round() as u8;
        px[1] = (res[1] * out_a * 255.0).round() as u8;
        px[2] = (res[2] * out_a * 255.0).round() as u8;
        px[3] = (out_a * 255.0).round() as u8;
    }
    out
}

/// What a filter wrapper reads from.
#[derive(Clone, Copy, Debug)]
pub enum FilterInput<'a> {
    /// Rendered offscreen content.
    Contents(&'a dyn Contents),
    /// A region only; used to ask how a filter changes coverage.
    Coverage(Rect),
}

impl FilterInput<'_> {
    /// Bounds of the input.
    pub fn coverage(&self) -> Rect {
        match self {
            FilterInput::Contents(c) => c.coverage(),
            FilterInput::Coverage(r) => *r,
        }
    }
}

/// Filter wrapper: borrows its input and yields filtered pixels on demand.
#[derive(Debug)]
pub struct FilterContents<'a> {
    input: FilterInput<'a>,
    filter: ImageFilter,
    effect_transform: Affine,
}

impl<'a> FilterContents<'a> {
    /// Wrap `input` with `filter` evaluated under `effect_transform`.
    pub fn new(input: FilterInput<'a>, filter: ImageFilter, effect_transform: Affine) -> Self {
        Self {
            input,
            filter,
            effect_transform,
        }
    }

    /// The wrapped input.
    pub fn input(&self) -> FilterInput<'a> {
        self.input
    }

    /// The filter applied to the input.
    pub fn filter(&self) -> &ImageFilter {
        &self.filter
    }

    /// Transform the filter is evaluated under.
    pub fn effect_transform(&self) -> Affine {
        self.effect_transform
    }

    /// Input bounds that can influence `output`.
    pub fn source_coverage(&self, output: Rect) -> Rect {
        self.filter.source_coverage(output, self.effect_transform)
    }
}

impl Contents for FilterContents<'_> {
    fn coverage(&self) -> Rect {
        self.filter
            .coverage(self.input.coverage(), self.effect_transform)
    }

    fn snapshot(&self) -> PassResult<Snapshot<'_>> {
        let FilterInput::Contents(input) = self.input else {
            return Err(PassError::render(
                "filter input is a coverage region and has no pixels",
            ));
        };
        let src = input.snapshot()?;
        let (filtered, offset) = self.filter.apply(&src.texture, self.effect_transform)?;
        Ok(Snapshot {
            texture: Cow::Owned(filtered),
            offset: (src.offset.0 + offset, src.offset.1 + offset),
            opacity: src.opacity,
            blend_mode: src.blend_mode,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
