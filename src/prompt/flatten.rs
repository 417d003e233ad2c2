// src/prompt/flatten.rs
use super::*;

fn labelled(label: &str, value: &str) -> Option<String> {
    (!value.is_empty()).then(|| format!("{label}: {value}"))
}

fn joined(label: &str, values: &[&str]) -> Option<String> {
    let present: Vec<&str> = values.iter().copied().filter(|v| !v.is_empty()).collect();
    (!present.is_empty()).then(|| format!("{label}: {}", present.join(", ")))
}

/// The category is always present, so every object yields a sentence.
fn describe_object(obj: &PromptObject) -> String {
    let mut fragments = Vec::new();
    if !obj.label.is_empty() {
        fragments.push(obj.label.clone());
    }
    fragments.push(format!("({})", obj.category));
    if !obj.material.is_empty() {
        fragments.push(format!("made of {}", obj.material));
    }
    if !obj.pose_orientation.is_empty() {
        fragments.push(obj.pose_orientation.clone());
    }
    if !obj.location.relative_position.is_empty() {
        fragments.push(format!("positioned {}", obj.location.relative_position));
    }
    fragments.join(" ")
}

/// Renders the document as the natural-language instruction sent to the
/// generation model.
///
/// Clause order is fixed: style and quality, scene, environment, atmosphere,
/// lighting, composition, focal point, then one sentence per object in
/// sequence order. Clauses with an empty source are skipped. Clauses are
/// joined by `". "` and the result ends with a single `"."`.
pub fn flatten(prompt: &ImagePrompt) -> String {
    let meta = &prompt.meta;
    let context = &prompt.global_context;
    let lighting = &context.lighting;
    let composition = &prompt.composition;

    let mut clauses: Vec<String> = [
        labelled("Style", &meta.image_type),
        labelled("Quality", meta.image_quality.as_str()),
        (!context.scene_description.is_empty()).then(|| context.scene_description.clone()),
        labelled("Environment", &context.environment_type),
        labelled("Atmosphere", &context.weather_atmosphere),
        joined(
            "Lighting",
            &[
                lighting.source.as_str(),
                lighting.quality.as_str(),
                lighting.direction.as_str(),
            ],
        ),
        joined(
            "Composition",
            &[
                composition.camera_angle.as_str(),
                composition.framing.as_str(),
                composition.depth_of_field.as_str(),
            ],
        ),
        labelled("Focal point", &composition.focal_point),
    ]
    .into_iter()
    .flatten()
    .collect();

    clauses.extend(prompt.objects.iter().map(describe_object));

    format!("{}.", clauses.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::defaults::{create_default, create_default_object};

    /// Document with every optional clause source cleared.
    fn bare_prompt() -> ImagePrompt {
        let mut prompt = create_default();
        prompt.meta.image_type.clear();
        prompt.global_context.environment_type.clear();
        prompt.global_context.weather_atmosphere.clear();
        prompt.global_context.lighting = Lighting {
            source: String::new(),
            direction: String::new(),
            quality: String::new(),
            color_temperature: String::new(),
        };
        prompt.composition = Composition {
            camera_angle: String::new(),
            framing: String::new(),
            depth_of_field: String::new(),
            focal_point: String::new(),
            symmetry_type: String::new(),
            rule_of_thirds_alignment: String::new(),
        };
        prompt
    }

    #[test]
    fn flattens_jacket_scenario() {
        let mut prompt = bare_prompt();
        prompt.meta.image_type = "Photography".to_string();
        prompt.composition.camera_angle = "Eye-level".to_string();

        let mut jacket = create_default_object("obj_001");
        jacket.label = "Jacket".to_string();
        jacket.category = ObjectCategory::Apparel;
        jacket.material = "Leather".to_string();
        jacket.location.relative_position = "Center".to_string();
        prompt.objects.push(jacket);

        assert_eq!(
            flatten(&prompt),
            "Style: Photography. Quality: High. Composition: Eye-level. \
             Jacket (Apparel) made of Leather positioned Center."
        );
    }

    #[test]
    fn flattens_default_document() {
        assert_eq!(
            flatten(&create_default()),
            "Style: Mixed Media (Photography combined with Digital Illustration/Collage). \
             Quality: High. \
             Environment: Studio/Graphic Design Composition. \
             Atmosphere: Energetic, Artistic, Urban, Cool. \
             Lighting: Artificial Studio Lighting, Soft, Diffused, Front-right dominant. \
             Composition: Eye-level, Full Shot (Head to Toe), Deep (Everything in focus). \
             Focal point: Subject's face."
        );
    }

    #[test]
    fn scene_description_is_emitted_verbatim() {
        let mut prompt = bare_prompt();
        prompt.global_context.scene_description = "A rooftop at dusk".to_string();
        prompt.global_context.lighting.direction = "Back (Backlit)".to_string();
        assert_eq!(
            flatten(&prompt),
            "Quality: High. A rooftop at dusk. Lighting: Back (Backlit)."
        );
    }

    #[test]
    fn object_order_changes_output() {
        let mut prompt = bare_prompt();
        let mut hat = create_default_object("obj_001");
        hat.label = "Hat".to_string();
        let mut boot = create_default_object("obj_002");
        boot.label = "Boot".to_string();
        prompt.objects = vec![hat.clone(), boot.clone()];
        let forward = flatten(&prompt);
        prompt.objects = vec![boot, hat];
        assert_ne!(forward, flatten(&prompt));
        assert!(
            forward.ends_with("Hat (Other) positioned Center. Boot (Other) positioned Center.")
        );
    }

    #[test]
    fn unused_optional_fields_do_not_affect_output() {
        let mut prompt = create_default();
        prompt.objects.push(create_default_object("obj_001"));
        let before = flatten(&prompt);

        let obj = &mut prompt.objects[0];
        obj.reference_image = Some(ReferenceImage {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/png".to_string(),
            name: "ref.png".to_string(),
        });
        obj.interaction_with_light = Some(InteractionWithLight::default());
        obj.surface_properties.wear_state = None;
        prompt.global_context.time_of_day = "Noon".to_string();

        assert_eq!(before, flatten(&prompt));
    }

    #[test]
    fn unlabeled_object_keeps_category_and_position() {
        let mut prompt = bare_prompt();
        prompt.objects.push(create_default_object("obj_001"));
        assert_eq!(flatten(&prompt), "Quality: High. (Other) positioned Center.");
    }
}
