// src/prompt/mod.rs
//! The structured image prompt document and the operations over it.
//!
//! An [`ImagePrompt`] is the single document the wizard edits. It is built by
//! [`defaults`], mutated through [`store::PromptStore`], checked by [`schema`],
//! and turned into generation input by [`flatten`] and [`references`].
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod defaults;
pub mod flatten;
pub mod patch;
pub mod references;
pub mod schema;
pub mod store;
pub mod suggestions;

pub use defaults::{create_default, create_default_object};
pub use flatten::flatten;
pub use patch::{
    ColorPalettePatch, CompositionPatch, GlobalContextPatch, LightingPatch, MetaPatch,
    PromptObjectPatch,
};
pub use references::{ReferenceImageInput, extract_reference_images, strip_reference_images};
pub use schema::{ValidationError, ValidationErrors, validate, validate_document, validate_str};
pub use store::PromptStore;

/// Declares a closed set of string values with its wire spelling.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted spelling, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[$($text),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(ImageQuality {
    Low => "Low",
    Medium => "Medium",
    High => "High",
    Ultra => "Ultra",
});

string_enum!(
    /// Shared scale for compression artifacts, noise and reflectivity.
    Intensity {
        None => "None",
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
);

string_enum!(ContrastLevel {
    Low => "Low",
    Medium => "Medium",
    High => "High",
});

string_enum!(ObjectCategory {
    Person => "Person",
    Apparel => "Apparel",
    Footwear => "Footwear",
    Accessory => "Accessory",
    IllustrationOverlay => "Illustration/Overlay",
    IllustrationBackground => "Illustration/Background Element",
    DigitalVector => "Digital Vector",
    Prop => "Prop",
    Environment => "Environment",
    Other => "Other",
});

string_enum!(RelativeSize {
    Small => "Small",
    Medium => "Medium",
    Large => "Large",
});

string_enum!(CameraDistance {
    Close => "Close",
    Mid => "Mid",
    Far => "Far",
    ZeroOverlay => "Zero (Overlay)",
    BehindSubject => "Behind Subject",
});

string_enum!(RelationshipKind {
    Wearing => "wearing",
    InteractingWith => "interacting_with",
    StandingOn => "standing_on",
    OriginatingFrom => "originating_from",
    Emitting => "emitting",
    Near => "near",
    Behind => "behind",
    InFrontOf => "in_front_of",
});

/// Root document describing a target image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePrompt {
    pub meta: Meta,
    pub global_context: GlobalContext,
    pub composition: Composition,
    pub objects: Vec<PromptObject>,
}

impl ImagePrompt {
    pub fn object(&self, id: &str) -> Option<&PromptObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    pub fn contains_object(&self, id: &str) -> bool {
        self.object(id).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub image_quality: ImageQuality,
    pub image_type: String,
    pub resolution_estimation: String,
    pub file_characteristics: FileCharacteristics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCharacteristics {
    pub compression_artifacts: Intensity,
    pub noise_level: Intensity,
    pub lens_type_estimation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalContext {
    pub scene_description: String,
    pub environment_type: String,
    pub time_of_day: String,
    pub weather_atmosphere: String,
    pub lighting: Lighting,
    pub color_palette: ColorPalette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub source: String,
    pub direction: String,
    pub quality: String,
    pub color_temperature: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub dominant_hex_estimates: Vec<String>,
    pub accent_colors: Vec<String>,
    pub contrast_level: ContrastLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub camera_angle: String,
    pub framing: String,
    pub depth_of_field: String,
    pub focal_point: String,
    pub symmetry_type: String,
    pub rule_of_thirds_alignment: String,
}

/// One depicted entity within the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptObject {
    pub id: String,
    pub label: String,
    pub category: ObjectCategory,
    pub location: ObjectLocation,
    pub dimensions_relative: RelativeSize,
    pub distance_from_camera: CameraDistance,
    pub pose_orientation: String,
    pub material: String,
    pub surface_properties: SurfaceProperties,
    pub color_details: ColorDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_with_light: Option<InteractionWithLight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<TextContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<ObjectRelationship>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<ReferenceImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectLocation {
    pub relative_position: String,
    pub bounding_box_percentage: BoundingBox,
}

/// Fractional placement relative to the image; every field lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceProperties {
    pub texture: String,
    pub reflectivity: Intensity,
    pub micro_details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wear_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDetails {
    pub base_color_hex: String,
    pub secondary_colors: Vec<String>,
    pub gradient_or_pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionWithLight {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_casting: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_zones: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translucency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub raw_text: String,
    pub font_style: String,
    pub font_weight: String,
    pub text_case: String,
    pub alignment: String,
    pub color_hex: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRelationship {
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    pub target_object_id: String,
}

/// User-supplied visual guidance attached to a single object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceImage {
    /// Base64 payload without a data-URI prefix.
    pub data: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub name: String,
}
