// src/prompt/schema.rs
//! Structural validation of candidate prompt documents.
//!
//! Candidates arrive as untyped JSON (hand-edited imports, model output). The
//! walker visits the whole tree and records every violation it finds, so a
//! user sees all problems at once. Only an accepted candidate is converted
//! into a typed [`ImagePrompt`].
use super::*;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex colour pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dotted location of the offending value, e.g. `objects[0].category`.
    pub path: String,
    pub reason: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

/// Non-empty list of violations for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{} violation(s): {}", self.0.len(), joined)
    }
}

/// Checks `candidate` and converts it into a typed document.
pub fn validate(candidate: &Value) -> Result<ImagePrompt, ValidationErrors> {
    let mut walker = Walker::default();
    walker.image_prompt(candidate);
    if !walker.errors.is_empty() {
        return Err(ValidationErrors(walker.errors));
    }

    serde_json::from_value(candidate.clone()).map_err(|e| {
        ValidationErrors(vec![ValidationError {
            path: String::new(),
            reason: e.to_string(),
        }])
    })
}

/// Parses JSON text, then validates it. Parse failures are reported separately
/// from schema violations.
pub fn validate_str(
    text: &str,
) -> Result<Result<ImagePrompt, ValidationErrors>, serde_json::Error> {
    let value: Value = serde_json::from_str(text)?;
    Ok(validate(&value))
}

/// Re-checks an already typed document for the constraints the type system
/// cannot carry (hex colours, bounding-box ranges).
pub fn validate_document(prompt: &ImagePrompt) -> Result<(), ValidationErrors> {
    let value = serde_json::to_value(prompt).map_err(|e| {
        ValidationErrors(vec![ValidationError {
            path: String::new(),
            reason: e.to_string(),
        }])
    })?;
    validate(&value).map(|_| ())
}

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Default)]
struct Walker {
    errors: Vec<ValidationError>,
}

impl Walker {
    fn fail(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.into(),
            reason: reason.into(),
        });
    }

    fn as_object<'a>(&mut self, value: &'a Value, path: &str) -> Option<&'a Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.fail(path, format!("expected object, found {}", type_name(other)));
                None
            }
        }
    }

    /// Looks up a required key, recording its absence.
    fn required<'a>(
        &mut self,
        map: &'a Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'a Value> {
        match map.get(key) {
            Some(value) => Some(value),
            None => {
                self.fail(join(parent, key), "is required");
                None
            }
        }
    }

    /// Optional keys may be absent; an explicit `null` counts as absent too.
    fn optional<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
        map.get(key).filter(|v| !v.is_null())
    }

    fn object_field<'a>(
        &mut self,
        map: &'a Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        let value = self.required(map, parent, key)?;
        self.as_object(value, &join(parent, key))
    }

    fn check_string(&mut self, value: &Value, path: &str) {
        if !value.is_string() {
            self.fail(path, format!("expected string, found {}", type_name(value)));
        }
    }

    fn string(&mut self, map: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(value) = self.required(map, parent, key) {
            self.check_string(value, &join(parent, key));
        }
    }

    fn optional_string(&mut self, map: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(value) = Self::optional(map, key) {
            self.check_string(value, &join(parent, key));
        }
    }

    fn strings(&mut self, map: &Map<String, Value>, parent: &str, key: &str) {
        let Some(value) = self.required(map, parent, key) else {
            return;
        };
        let path = join(parent, key);
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.check_string(item, &format!("{path}[{index}]"));
                }
            }
            other => self.fail(path, format!("expected array, found {}", type_name(other))),
        }
    }

    fn one_of(&mut self, map: &Map<String, Value>, parent: &str, key: &str, allowed: &[&str]) {
        let Some(value) = self.required(map, parent, key) else {
            return;
        };
        let path = join(parent, key);
        match value.as_str() {
            Some(text) if allowed.contains(&text) => {}
            Some(text) => self.fail(
                path,
                format!("\"{text}\" is not one of: {}", allowed.join(", ")),
            ),
            None => self.fail(path, format!("expected string, found {}", type_name(value))),
        }
    }

    fn hex_color(&mut self, map: &Map<String, Value>, parent: &str, key: &str) {
        let Some(value) = self.required(map, parent, key) else {
            return;
        };
        let path = join(parent, key);
        match value.as_str() {
            Some(text) if HEX_COLOR.is_match(text) => {}
            Some(text) => self.fail(path, format!("\"{text}\" is not a #RRGGBB colour")),
            None => self.fail(path, format!("expected string, found {}", type_name(value))),
        }
    }

    fn unit_number(&mut self, map: &Map<String, Value>, parent: &str, key: &str) {
        let Some(value) = self.required(map, parent, key) else {
            return;
        };
        let path = join(parent, key);
        match value.as_f64() {
            Some(n) if (0.0..=1.0).contains(&n) => {}
            Some(n) => self.fail(path, format!("{n} is outside [0, 1]")),
            None => self.fail(path, format!("expected number, found {}", type_name(value))),
        }
    }

    fn image_prompt(&mut self, value: &Value) {
        let Some(root) = self.as_object(value, "") else {
            return;
        };
        if let Some(meta) = self.object_field(root, "", "meta") {
            self.meta(meta, "meta");
        }
        if let Some(context) = self.object_field(root, "", "global_context") {
            self.global_context(context, "global_context");
        }
        if let Some(composition) = self.object_field(root, "", "composition") {
            for key in [
                "camera_angle",
                "framing",
                "depth_of_field",
                "focal_point",
                "symmetry_type",
                "rule_of_thirds_alignment",
            ] {
                self.string(composition, "composition", key);
            }
        }
        if let Some(objects) = self.required(root, "", "objects") {
            match objects {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        self.prompt_object(item, &format!("objects[{index}]"));
                    }
                }
                other => self.fail(
                    "objects",
                    format!("expected array, found {}", type_name(other)),
                ),
            }
        }
    }

    fn meta(&mut self, meta: &Map<String, Value>, path: &str) {
        self.one_of(meta, path, "image_quality", ImageQuality::VARIANTS);
        self.string(meta, path, "image_type");
        self.string(meta, path, "resolution_estimation");

        let fc_path = join(path, "file_characteristics");
        if let Some(fc) = self.object_field(meta, path, "file_characteristics") {
            self.one_of(fc, &fc_path, "compression_artifacts", Intensity::VARIANTS);
            self.one_of(fc, &fc_path, "noise_level", Intensity::VARIANTS);
            self.string(fc, &fc_path, "lens_type_estimation");
        }
    }

    fn global_context(&mut self, context: &Map<String, Value>, path: &str) {
        for key in [
            "scene_description",
            "environment_type",
            "time_of_day",
            "weather_atmosphere",
        ] {
            self.string(context, path, key);
        }

        let lighting_path = join(path, "lighting");
        if let Some(lighting) = self.object_field(context, path, "lighting") {
            for key in ["source", "direction", "quality", "color_temperature"] {
                self.string(lighting, &lighting_path, key);
            }
        }

        let palette_path = join(path, "color_palette");
        if let Some(palette) = self.object_field(context, path, "color_palette") {
            self.strings(palette, &palette_path, "dominant_hex_estimates");
            self.strings(palette, &palette_path, "accent_colors");
            self.one_of(palette, &palette_path, "contrast_level", ContrastLevel::VARIANTS);
        }
    }

    fn prompt_object(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.as_object(value, path) else {
            return;
        };

        self.string(obj, path, "id");
        self.string(obj, path, "label");
        self.one_of(obj, path, "category", ObjectCategory::VARIANTS);
        self.one_of(obj, path, "dimensions_relative", RelativeSize::VARIANTS);
        self.one_of(obj, path, "distance_from_camera", CameraDistance::VARIANTS);
        self.string(obj, path, "pose_orientation");
        self.string(obj, path, "material");

        let location_path = join(path, "location");
        if let Some(location) = self.object_field(obj, path, "location") {
            self.string(location, &location_path, "relative_position");
            let bbox_path = join(&location_path, "bounding_box_percentage");
            let bbox = self.object_field(location, &location_path, "bounding_box_percentage");
            if let Some(bbox) = bbox {
                for key in ["x", "y", "width", "height"] {
                    self.unit_number(bbox, &bbox_path, key);
                }
            }
        }

        let surface_path = join(path, "surface_properties");
        if let Some(surface) = self.object_field(obj, path, "surface_properties") {
            self.string(surface, &surface_path, "texture");
            self.one_of(surface, &surface_path, "reflectivity", Intensity::VARIANTS);
            self.string(surface, &surface_path, "micro_details");
            self.optional_string(surface, &surface_path, "wear_state");
        }

        let color_path = join(path, "color_details");
        if let Some(color) = self.object_field(obj, path, "color_details") {
            self.hex_color(color, &color_path, "base_color_hex");
            self.strings(color, &color_path, "secondary_colors");
            self.string(color, &color_path, "gradient_or_pattern");
        }

        if let Some(value) = Self::optional(obj, "interaction_with_light") {
            let light_path = join(path, "interaction_with_light");
            if let Some(light) = self.as_object(value, &light_path) {
                for key in ["shadow_casting", "highlight_zones", "translucency"] {
                    self.optional_string(light, &light_path, key);
                }
            }
        }

        if let Some(value) = Self::optional(obj, "text_content") {
            let text_path = join(path, "text_content");
            if let Some(text) = self.as_object(value, &text_path) {
                for key in [
                    "raw_text",
                    "font_style",
                    "font_weight",
                    "text_case",
                    "alignment",
                    "color_hex",
                ] {
                    self.string(text, &text_path, key);
                }
            }
        }

        if let Some(value) = Self::optional(obj, "relationships") {
            let rel_path = join(path, "relationships");
            match value {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{rel_path}[{index}]");
                        if let Some(rel) = self.as_object(item, &item_path) {
                            self.one_of(rel, &item_path, "type", RelationshipKind::VARIANTS);
                            self.string(rel, &item_path, "target_object_id");
                        }
                    }
                }
                other => self.fail(rel_path, format!("expected array, found {}", type_name(other))),
            }
        }

        if let Some(value) = Self::optional(obj, "reference_image") {
            let ref_path = join(path, "reference_image");
            if let Some(reference) = self.as_object(value, &ref_path) {
                for key in ["data", "mimeType", "name"] {
                    self.string(reference, &ref_path, key);
                }
            }
        }
    }
}
