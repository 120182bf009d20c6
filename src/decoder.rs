use crate::geometry::{Geometry, PixelSpacing};

use dicom::{
    core::Tag,
    object::{FileDicomObject, InMemDicomObject, from_reader},
    pixeldata::PixelDecoder,
};
use dicom_dictionary_std::tags;
use ndarray::{Array2, s};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read DICOM stream: {0}")]
    Read(#[from] dicom::object::ReadError),

    #[error("failed to decode pixel data: {0}")]
    PixelData(#[from] dicom::pixeldata::Error),

    #[error("missing attribute {0}")]
    MissingAttribute(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidAttribute { name: &'static str, reason: String },
}

/// A decoded single-frame DICOM image: pixel samples plus voxel geometry.
#[derive(Debug)]
pub struct DecodedImage {
    pub pixels: Array2<f32>,
    pub geometry: Geometry,
}

pub struct SliceDecoder;

impl SliceDecoder {
    /// Decode an in-memory DICOM stream into pixels and geometry
    ///
    /// Accepts streams with or without the 128-byte preamble. The first
    /// frame of the pixel data is decoded into a 2D floating-point array.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not parseable DICOM, the pixel
    /// data cannot be decoded, or SliceThickness/PixelSpacing are missing
    /// or non-numeric.
    pub fn decode(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let object = from_reader(Self::strip_preamble(bytes))?;
        let pixels = Self::decode_pixels(&object)?;
        let geometry = Self::extract_geometry(&object)?;

        Ok(DecodedImage { pixels, geometry })
    }

    fn strip_preamble(bytes: &[u8]) -> &[u8] {
        const PREAMBLE_LEN: usize = 128;
        match bytes.get(PREAMBLE_LEN..PREAMBLE_LEN + 4) {
            Some(magic) if magic == b"DICM" => &bytes[PREAMBLE_LEN..],
            _ => bytes,
        }
    }

    fn decode_pixels(
        object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Array2<f32>, DecodeError> {
        let pixel_data = object.decode_pixel_data()?;
        let array = pixel_data.to_ndarray::<f32>()?;
        // Frame 0, sample plane 0
        Ok(array.slice_move(s![0, .., .., 0]))
    }

    fn extract_geometry(
        object: &FileDicomObject<InMemDicomObject>,
    ) -> Result<Geometry, DecodeError> {
        let slice_thickness =
            Self::float_attribute(object, tags::SLICE_THICKNESS, "SliceThickness")?;
        let spacing = Self::multi_float_attribute(object, tags::PIXEL_SPACING, "PixelSpacing")?;
        let (row, col) = match spacing.as_slice() {
            [row, col, ..] => (*row, *col),
            _ => {
                return Err(DecodeError::InvalidAttribute {
                    name: "PixelSpacing",
                    reason: format!("expected two values, found {}", spacing.len()),
                });
            }
        };

        Ok(Geometry::new(slice_thickness, PixelSpacing { row, col }))
    }

    fn float_attribute(
        object: &FileDicomObject<InMemDicomObject>,
        tag: Tag,
        name: &'static str,
    ) -> Result<f64, DecodeError> {
        object
            .element(tag)
            .map_err(|_| DecodeError::MissingAttribute(name))?
            .to_float64()
            .map_err(|e| DecodeError::InvalidAttribute {
                name,
                reason: e.to_string(),
            })
    }

    fn multi_float_attribute(
        object: &FileDicomObject<InMemDicomObject>,
        tag: Tag,
        name: &'static str,
    ) -> Result<Vec<f64>, DecodeError> {
        object
            .element(tag)
            .map_err(|_| DecodeError::MissingAttribute(name))?
            .to_multi_float64()
            .map_err(|e| DecodeError::InvalidAttribute {
                name,
                reason: e.to_string(),
            })
    }
}
