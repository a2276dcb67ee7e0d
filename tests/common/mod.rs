#![allow(dead_code)]

use docsearch::core::config::Config;
use docsearch::core::types::{ObjectKind, RawDocument, RawObject};
use docsearch::mvcc::snapshot::Snapshot;
use docsearch::writer::index_builder::IndexBuilder;

/// Two-page corpus used by the ranking scenarios
pub fn lens_camera_corpus() -> Vec<RawDocument> {
    vec![
        RawDocument::new("Lens", "/lens", "calibration of lens distortion"),
        RawDocument::new("Camera", "/camera", "camera crop factor"),
    ]
}

/// API reference pages with objects, sections and enum members
pub fn api_corpus() -> Vec<RawDocument> {
    vec![
        RawDocument::new("Camera class", "api/lensfunpy.Camera", "A camera body with a sensor and a mount.")
            .add_object(RawObject::new("lensfunpy.Camera", ObjectKind::Class))
            .add_object(RawObject::new("lensfunpy.Camera.crop_factor", ObjectKind::Attribute)
                .with_description("Crop factor of the sensor"))
            .add_object(RawObject::new("lensfunpy.Camera.maker", ObjectKind::Attribute)),
        RawDocument::new("Lens class", "api/lensfunpy.Lens", "Optical lens with calibration data.")
            .add_section("Interpolation", "interpolation")
            .add_object(RawObject::new("lensfunpy.Lens", ObjectKind::Class))
            .add_object(RawObject::new("lensfunpy.Lens.interpolate_distortion", ObjectKind::Method)
                .with_description("Interpolate distortion parameters for a focal length"))
            .add_object(RawObject::new("lensfunpy.Lens.crop_factor", ObjectKind::Attribute)),
        RawDocument::new("Enumerations", "api/enums", "Model enumerations used by calibration data.")
            .add_object(RawObject::new("lensfunpy.DistortionModel", ObjectKind::Enum))
            .add_object(RawObject::new("lensfunpy.DistortionModel.POLY3", ObjectKind::EnumMember))
            .add_object(RawObject::new("lensfunpy.DistortionModel.PTLENS", ObjectKind::EnumMember)),
        RawDocument::new("util module", "api/lensfunpy.util", "Remapping helpers for images.")
            .add_object(RawObject::new("lensfunpy.util", ObjectKind::Module))
            .add_object(RawObject::new("lensfunpy.util.remap", ObjectKind::Function)
                .with_description("Remap an image with undistorted coordinates")),
    ]
}

pub fn build(corpus: &[RawDocument]) -> Snapshot {
    IndexBuilder::new(&Config::default())
        .build(corpus)
        .expect("corpus should build")
}
