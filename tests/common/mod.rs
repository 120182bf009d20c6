//! In-memory DICOM fixtures for the decoder and API tests.

use dicom::core::{DataElement, PrimitiveValue, VR, dicom_value};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};
use dicom_dictionary_std::tags;

const TRANSFER_SYNTAX: &str = "1.2.840.10008.1.2.1";
const SOP_CLASS: &str = "1.2.840.10008.5.1.4.1.1.7";
const SOP_INSTANCE: &str = "2.25.111286646478212878849109703756852795064";

/// A monochrome 16-bit single-frame DICOM file, built in memory.
pub struct DicomFixture {
    pub rows: u16,
    pub cols: u16,
    pub pixels: Vec<u16>,
    pub slice_thickness: Option<&'static str>,
    pub pixel_spacing: Option<Vec<&'static str>>,
}

impl DicomFixture {
    pub fn new(rows: u16, cols: u16, pixels: Vec<u16>) -> Self {
        assert_eq!(pixels.len(), usize::from(rows) * usize::from(cols));
        Self {
            rows,
            cols,
            pixels,
            slice_thickness: Some("1.0"),
            pixel_spacing: Some(vec!["1.0", "1.0"]),
        }
    }

    /// A 4x4 image with a 2x2 block of 10s surrounded by 0s.
    pub fn center_block() -> Self {
        #[rustfmt::skip]
        let pixels = vec![
            0, 0, 0, 0,
            0, 10, 10, 0,
            0, 10, 10, 0,
            0, 0, 0, 0,
        ];
        Self::new(4, 4, pixels)
    }

    pub fn without_slice_thickness(mut self) -> Self {
        self.slice_thickness = None;
        self
    }

    pub fn with_geometry(
        mut self,
        slice_thickness: &'static str,
        pixel_spacing: Vec<&'static str>,
    ) -> Self {
        self.slice_thickness = Some(slice_thickness);
        self.pixel_spacing = Some(pixel_spacing);
        self
    }

    /// Encode as a DICOM file stream (explicit VR little endian).
    pub fn encode(&self) -> Vec<u8> {
        let mut object = InMemDicomObject::new_empty();
        object.put(DataElement::new(
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            dicom_value!(Str, "MONOCHROME2"),
        ));
        object.put(DataElement::new(
            tags::SAMPLES_PER_PIXEL,
            VR::US,
            dicom_value!(U16, [1]),
        ));
        object.put(DataElement::new(
            tags::ROWS,
            VR::US,
            dicom_value!(U16, [self.rows]),
        ));
        object.put(DataElement::new(
            tags::COLUMNS,
            VR::US,
            dicom_value!(U16, [self.cols]),
        ));
        object.put(DataElement::new(
            tags::BITS_ALLOCATED,
            VR::US,
            dicom_value!(U16, [16]),
        ));
        object.put(DataElement::new(
            tags::BITS_STORED,
            VR::US,
            dicom_value!(U16, [16]),
        ));
        object.put(DataElement::new(
            tags::HIGH_BIT,
            VR::US,
            dicom_value!(U16, [15]),
        ));
        object.put(DataElement::new(
            tags::PIXEL_REPRESENTATION,
            VR::US,
            dicom_value!(U16, [0]),
        ));
        if let Some(thickness) = self.slice_thickness {
            object.put(DataElement::new(
                tags::SLICE_THICKNESS,
                VR::DS,
                dicom_value!(Str, thickness),
            ));
        }
        if let Some(spacing) = &self.pixel_spacing {
            let values: Vec<String> = spacing.iter().map(|s| (*s).to_string()).collect();
            object.put(DataElement::new(
                tags::PIXEL_SPACING,
                VR::DS,
                PrimitiveValue::Strs(values.into()),
            ));
        }
        object.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(self.pixels.clone().into()),
        ));

        let file = object
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(TRANSFER_SYNTAX)
                    .media_storage_sop_class_uid(SOP_CLASS)
                    .media_storage_sop_instance_uid(SOP_INSTANCE),
            )
            .expect("file meta should build");

        let mut encoded = Vec::new();
        file.write_all(&mut encoded)
            .expect("in-memory write should succeed");
        encoded
    }
}
