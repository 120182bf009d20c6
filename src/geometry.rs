use std::fmt;

/// Pixel spacing in millimeters (row, column)
///
/// Order matches the DICOM PixelSpacing attribute: distance between rows
/// first, distance between columns second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelSpacing {
    pub row: f64,
    pub col: f64,
}

/// Voxel geometry of a single DICOM slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub slice_thickness: f64,
    pub pixel_spacing: PixelSpacing,
}

impl Geometry {
    pub fn new(slice_thickness: f64, pixel_spacing: PixelSpacing) -> Self {
        Self {
            slice_thickness,
            pixel_spacing,
        }
    }

    /// Physical volume of one voxel in mm³.
    pub fn voxel_volume(&self) -> f64 {
        self.slice_thickness * self.pixel_spacing.row * self.pixel_spacing.col
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} x {} mm",
            self.slice_thickness, self.pixel_spacing.row, self.pixel_spacing.col
        )
    }
}
