// src/prompt/patch.rs
//! Partial updates for the sections of an [`ImagePrompt`].
//!
//! Every field is optional; an absent field leaves the target untouched.
//! Optional document members use a double `Option` so a patch can tell
//! "leave alone" (absent) apart from "remove" (`null`).
use super::*;
use serde::Deserializer;

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Overwrites each listed field of `$target` whose patch value is present.
macro_rules! merge_fields {
    ($patch:ident => $target:ident { $($field:ident),+ $(,)? }) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetaPatch {
    pub image_quality: Option<ImageQuality>,
    pub image_type: Option<String>,
    pub resolution_estimation: Option<String>,
    pub file_characteristics: Option<FileCharacteristics>,
}

impl MetaPatch {
    pub fn apply_to(self, meta: &mut Meta) {
        let patch = self;
        merge_fields!(patch => meta {
            image_quality,
            image_type,
            resolution_estimation,
            file_characteristics,
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalContextPatch {
    pub scene_description: Option<String>,
    pub environment_type: Option<String>,
    pub time_of_day: Option<String>,
    pub weather_atmosphere: Option<String>,
    pub lighting: Option<Lighting>,
    pub color_palette: Option<ColorPalette>,
}

impl GlobalContextPatch {
    pub fn apply_to(self, context: &mut GlobalContext) {
        let patch = self;
        merge_fields!(patch => context {
            scene_description,
            environment_type,
            time_of_day,
            weather_atmosphere,
            lighting,
            color_palette,
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightingPatch {
    pub source: Option<String>,
    pub direction: Option<String>,
    pub quality: Option<String>,
    pub color_temperature: Option<String>,
}

impl LightingPatch {
    pub fn apply_to(self, lighting: &mut Lighting) {
        let patch = self;
        merge_fields!(patch => lighting {
            source,
            direction,
            quality,
            color_temperature,
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorPalettePatch {
    pub dominant_hex_estimates: Option<Vec<String>>,
    pub accent_colors: Option<Vec<String>>,
    pub contrast_level: Option<ContrastLevel>,
}

impl ColorPalettePatch {
    pub fn apply_to(self, palette: &mut ColorPalette) {
        let patch = self;
        merge_fields!(patch => palette {
            dominant_hex_estimates,
            accent_colors,
            contrast_level,
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositionPatch {
    pub camera_angle: Option<String>,
    pub framing: Option<String>,
    pub depth_of_field: Option<String>,
    pub focal_point: Option<String>,
    pub symmetry_type: Option<String>,
    pub rule_of_thirds_alignment: Option<String>,
}

impl CompositionPatch {
    pub fn apply_to(self, composition: &mut Composition) {
        let patch = self;
        merge_fields!(patch => composition {
            camera_angle,
            framing,
            depth_of_field,
            focal_point,
            symmetry_type,
            rule_of_thirds_alignment,
        });
    }
}

/// Shallow update of a [`PromptObject`]. The object id is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PromptObjectPatch {
    pub label: Option<String>,
    pub category: Option<ObjectCategory>,
    pub location: Option<ObjectLocation>,
    pub dimensions_relative: Option<RelativeSize>,
    pub distance_from_camera: Option<CameraDistance>,
    pub pose_orientation: Option<String>,
    pub material: Option<String>,
    pub surface_properties: Option<SurfaceProperties>,
    pub color_details: Option<ColorDetails>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub interaction_with_light: Option<Option<InteractionWithLight>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub text_content: Option<Option<TextContent>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub relationships: Option<Option<Vec<ObjectRelationship>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub reference_image: Option<Option<ReferenceImage>>,
}

impl PromptObjectPatch {
    pub fn apply_to(self, object: &mut PromptObject) {
        let patch = self;
        merge_fields!(patch => object {
            label,
            category,
            location,
            dimensions_relative,
            distance_from_camera,
            pose_orientation,
            material,
            surface_properties,
            color_details,
            interaction_with_light,
            text_content,
            relationships,
            reference_image,
        });
    }
}
