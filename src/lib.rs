//! # DICOM-volumetry service
//!
//! This crate estimates the physical volume (in mm³) of the image region
//! whose normalized intensity exceeds a caller-supplied threshold, for a
//! single DICOM image uploaded over HTTP.

//!
//! The pipeline is part of the dicom-rs ecosystem and leverages its
//! components to decode pixel data into an [`ndarray`] array. Intensities
//! are min-max normalized into [0, 1], binarized against the threshold,
//! and segmented into 4-connected components. The resulting label map,
//! weighted by the voxel volume derived from the SliceThickness and
//! PixelSpacing attributes, yields the reported volume.
//!
//! A thin axum boundary exposes the pipeline as `POST /process` and maps
//! every pipeline failure to a JSON error response; it never surfaces
//! internal error representations. Requests are independent and share no
//! mutable state beyond the configuration fixed at startup.
//!
//! # Examples
//!
//! ## Estimating a region volume from a file
//!
//! ```no_run
//! # use dicom_volumetry::pipeline;
//! let bytes = std::fs::read("slice.dcm").expect("should have read the file");
//! let estimate = pipeline::process(&bytes, 0.5).expect("should have processed the image");
//! println!(
//!     "{} mm³ across {} regions",
//!     estimate.volume_mm3, estimate.component_count
//! );
//! ```

pub mod config;
pub mod decoder;
pub mod estimator;
pub mod geometry;
pub mod pipeline;
pub mod server;
