// src/prompt/defaults.rs
use super::*;

pub fn default_meta() -> Meta {
    Meta {
        image_quality: ImageQuality::High,
        image_type: "Mixed Media (Photography combined with Digital Illustration/Collage)"
            .to_string(),
        resolution_estimation: "High resolution, sharp edges".to_string(),
        file_characteristics: FileCharacteristics {
            compression_artifacts: Intensity::Low,
            noise_level: Intensity::None,
            lens_type_estimation: "Standard (approx 50mm)".to_string(),
        },
    }
}

pub fn default_lighting() -> Lighting {
    Lighting {
        source: "Artificial Studio Lighting".to_string(),
        direction: "Front-right dominant".to_string(),
        quality: "Soft, Diffused".to_string(),
        color_temperature: "Neutral white".to_string(),
    }
}

pub fn default_color_palette() -> ColorPalette {
    ColorPalette {
        dominant_hex_estimates: vec![
            "#4CA7E8".to_string(),
            "#0044CC".to_string(),
            "#FFFFFF".to_string(),
        ],
        accent_colors: vec!["#FFFFFF".to_string()],
        contrast_level: ContrastLevel::High,
    }
}

pub fn default_global_context() -> GlobalContext {
    GlobalContext {
        scene_description: String::new(),
        environment_type: "Studio/Graphic Design Composition".to_string(),
        time_of_day: "Indiscernible (Studio Lighting)".to_string(),
        weather_atmosphere: "Energetic, Artistic, Urban, Cool".to_string(),
        lighting: default_lighting(),
        color_palette: default_color_palette(),
    }
}

pub fn default_composition() -> Composition {
    Composition {
        camera_angle: "Eye-level".to_string(),
        framing: "Full Shot (Head to Toe)".to_string(),
        depth_of_field: "Deep (Everything in focus)".to_string(),
        focal_point: "Subject's face".to_string(),
        symmetry_type: "Asymmetrical balance".to_string(),
        rule_of_thirds_alignment: "Subject centered".to_string(),
    }
}

/// The document a fresh session starts from.
pub fn create_default() -> ImagePrompt {
    ImagePrompt {
        meta: default_meta(),
        global_context: default_global_context(),
        composition: default_composition(),
        objects: Vec::new(),
    }
}

pub fn default_bounding_box() -> BoundingBox {
    BoundingBox {
        x: 0.3,
        y: 0.1,
        width: 0.4,
        height: 0.8,
    }
}

/// A blank object entry carrying `id`.
pub fn create_default_object(id: &str) -> PromptObject {
    PromptObject {
        id: id.to_string(),
        label: String::new(),
        category: ObjectCategory::Other,
        location: ObjectLocation {
            relative_position: "Center".to_string(),
            bounding_box_percentage: default_bounding_box(),
        },
        dimensions_relative: RelativeSize::Medium,
        distance_from_camera: CameraDistance::Mid,
        pose_orientation: String::new(),
        material: String::new(),
        surface_properties: SurfaceProperties {
            texture: String::new(),
            reflectivity: Intensity::Low,
            micro_details: String::new(),
            wear_state: Some("New".to_string()),
        },
        color_details: ColorDetails {
            base_color_hex: "#FFFFFF".to_string(),
            secondary_colors: Vec::new(),
            gradient_or_pattern: "Solid".to_string(),
        },
        interaction_with_light: None,
        text_content: None,
        relationships: None,
        reference_image: None,
    }
}
