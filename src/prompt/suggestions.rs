// src/prompt/suggestions.rs
//! Curated values offered by the editor's dropdowns. The schema accepts any
//! string for these fields.
use super::*;
use serde_json::{Value, json};

pub const IMAGE_TYPES: &[&str] = &[
    "Photography",
    "Digital Illustration",
    "Mixed Media (Photography combined with Digital Illustration/Collage)",
    "3D Render",
    "Vector Art",
    "Painting Style",
    "Anime/Manga Style",
];

pub const CAMERA_ANGLES: &[&str] = &[
    "Eye-level",
    "Low-angle (looking up at subject)",
    "High-angle (looking down at subject)",
    "Bird's eye view",
    "Worm's eye view",
    "Dutch angle",
    "Over-the-shoulder",
];

pub const FRAMING_OPTIONS: &[&str] = &[
    "Extreme Close-up",
    "Close-up (Face)",
    "Medium Close-up (Head and Shoulders)",
    "Medium Shot (Waist up)",
    "Medium Full Shot (Knees up)",
    "Full Shot (Head to Toe)",
    "Wide Shot",
    "Extreme Wide Shot",
];

pub const LIGHTING_SOURCES: &[&str] = &[
    "Natural Sunlight",
    "Artificial Studio Lighting",
    "Mixed (Natural + Artificial)",
    "Window Light",
    "Neon/Colored Lighting",
    "Ambient/Soft Lighting",
    "Dramatic/High Contrast",
];

pub const LIGHTING_QUALITIES: &[&str] = &[
    "Soft, Diffused",
    "Hard, Directional",
    "Rim/Backlit",
    "Flat",
    "Dramatic",
    "Natural",
];

pub const LIGHTING_DIRECTIONS: &[&str] = &[
    "Front",
    "Back (Backlit)",
    "Left Side",
    "Right Side",
    "Top (Overhead)",
    "Bottom (Underlit)",
    "45° Key Light",
    "Rim Light",
    "Split (Half/Half)",
];

pub const COLOR_TEMPERATURES: &[&str] = &[
    "Warm (2700K - Golden Hour)",
    "Neutral (4000K - Daylight)",
    "Cool (5500K - Overcast)",
    "Cold (6500K+ - Blue Hour)",
    "Mixed (Warm & Cool)",
    "Candlelight (1800K)",
    "Tungsten (3200K)",
];

pub const ENVIRONMENT_TYPES: &[&str] = &[
    "Studio/Graphic Design Composition",
    "Indoor/Interior",
    "Outdoor/Exterior",
    "Urban/City",
    "Nature/Landscape",
    "Abstract/Undefined",
];

pub const ATMOSPHERE_OPTIONS: &[&str] = &[
    "Energetic, Artistic, Urban, Cool",
    "Calm, Peaceful, Serene",
    "Dark, Moody, Mysterious",
    "Bright, Cheerful, Optimistic",
    "Professional, Corporate, Clean",
    "Romantic, Soft, Dreamy",
    "Futuristic, Sci-fi, Tech",
];

pub const RESOLUTION_OPTIONS: &[&str] = &[
    "4K (3840×2160)",
    "2K (2560×1440)",
    "Full HD (1920×1080)",
    "HD (1280×720)",
    "Square 1:1 (1024×1024)",
    "Portrait 3:4 (768×1024)",
    "Landscape 16:9 (1920×1080)",
];

pub const LENS_TYPES: &[&str] = &[
    "Wide Angle (14-35mm)",
    "Standard (35-50mm)",
    "Portrait (50-85mm)",
    "Telephoto (85-200mm)",
    "Macro",
    "Fisheye",
    "Tilt-Shift",
];

pub const FOCAL_POINT_OPTIONS: &[&str] = &[
    "Subject's Face",
    "Subject's Eyes",
    "Center of Frame",
    "Foreground Object",
    "Background Element",
    "Product/Item",
    "Text/Logo",
    "Leading Lines Intersection",
];

pub const RULE_OF_THIRDS_OPTIONS: &[&str] = &[
    "Subject Center",
    "Subject Left Third",
    "Subject Right Third",
    "Subject Upper Third",
    "Subject Lower Third",
    "Upper-Left Intersection",
    "Upper-Right Intersection",
    "Lower-Left Intersection",
    "Lower-Right Intersection",
];

/// Suggestion lists plus the closed value sets, in one payload for the editor.
pub fn catalog() -> Value {
    json!({
        "suggestions": {
            "image_type": IMAGE_TYPES,
            "camera_angle": CAMERA_ANGLES,
            "framing": FRAMING_OPTIONS,
            "lighting_source": LIGHTING_SOURCES,
            "lighting_quality": LIGHTING_QUALITIES,
            "lighting_direction": LIGHTING_DIRECTIONS,
            "color_temperature": COLOR_TEMPERATURES,
            "environment_type": ENVIRONMENT_TYPES,
            "weather_atmosphere": ATMOSPHERE_OPTIONS,
            "resolution_estimation": RESOLUTION_OPTIONS,
            "lens_type_estimation": LENS_TYPES,
            "focal_point": FOCAL_POINT_OPTIONS,
            "rule_of_thirds_alignment": RULE_OF_THIRDS_OPTIONS,
        },
        "enums": {
            "image_quality": ImageQuality::VARIANTS,
            "intensity": Intensity::VARIANTS,
            "contrast_level": ContrastLevel::VARIANTS,
            "category": ObjectCategory::VARIANTS,
            "dimensions_relative": RelativeSize::VARIANTS,
            "distance_from_camera": CameraDistance::VARIANTS,
            "relationship_type": RelationshipKind::VARIANTS,
        }
    })
}
