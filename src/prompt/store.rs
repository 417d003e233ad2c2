// src/prompt/store.rs
use super::*;
use crate::errors::PaintError;
use log::debug;

/// Owns the live document for one editing session.
///
/// Every operation is named after the edit it performs instead of exposing a
/// generic set-at-path. The store holds the only copy of its document, so
/// in-place edits are indistinguishable from replacing it with a new value.
/// Operations never fail on well-typed input. Unknown object ids are a no-op,
/// reported through the `bool` return. Rejected operations leave the document
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptStore {
    prompt: ImagePrompt,
}

impl Default for PromptStore {
    fn default() -> Self {
        Self::new(create_default())
    }
}

impl PromptStore {
    pub fn new(initial: ImagePrompt) -> Self {
        Self { prompt: initial }
    }

    pub fn prompt(&self) -> &ImagePrompt {
        &self.prompt
    }

    pub fn into_prompt(self) -> ImagePrompt {
        self.prompt
    }

    pub fn update_meta(&mut self, patch: MetaPatch) {
        patch.apply_to(&mut self.prompt.meta);
    }

    pub fn update_global_context(&mut self, patch: GlobalContextPatch) {
        patch.apply_to(&mut self.prompt.global_context);
    }

    pub fn update_lighting(&mut self, patch: LightingPatch) {
        patch.apply_to(&mut self.prompt.global_context.lighting);
    }

    pub fn update_color_palette(&mut self, patch: ColorPalettePatch) {
        patch.apply_to(&mut self.prompt.global_context.color_palette);
    }

    pub fn update_composition(&mut self, patch: CompositionPatch) {
        patch.apply_to(&mut self.prompt.composition);
    }

    /// `obj_` plus the object count + 1, zero-padded to three digits. Existing
    /// ids are not consulted, so an id can repeat after a removal.
    fn next_object_id(&self) -> String {
        format!("obj_{:03}", self.prompt.objects.len() + 1)
    }

    fn object_mut(&mut self, id: &str) -> Option<&mut PromptObject> {
        self.prompt.objects.iter_mut().find(|obj| obj.id == id)
    }

    /// Appends a default object and returns its id.
    pub fn add_object(&mut self) -> String {
        let id = self.next_object_id();
        self.prompt.objects.push(create_default_object(&id));
        id
    }

    pub fn update_object(&mut self, id: &str, patch: PromptObjectPatch) -> bool {
        match self.object_mut(id) {
            Some(obj) => {
                patch.apply_to(obj);
                true
            }
            None => false,
        }
    }

    pub fn remove_object(&mut self, id: &str) -> bool {
        let before = self.prompt.objects.len();
        self.prompt.objects.retain(|obj| obj.id != id);
        self.prompt.objects.len() != before
    }

    /// Appends a deep copy of `id` labelled `"<label> (copy)"` and returns the
    /// copy's id.
    pub fn duplicate_object(&mut self, id: &str) -> Option<String> {
        let mut copy = self.prompt.object(id)?.clone();
        let new_id = self.next_object_id();
        copy.id = new_id.clone();
        copy.label = format!("{} (copy)", copy.label);
        self.prompt.objects.push(copy);
        Some(new_id)
    }

    /// Moves the object at `from` so it ends up at `to`.
    pub fn reorder_objects(&mut self, from: usize, to: usize) -> Result<(), PaintError> {
        let len = self.prompt.objects.len();
        for index in [from, to] {
            if index >= len {
                debug!("Rejected reorder {from} -> {to} on {len} objects");
                return Err(PaintError::IndexOutOfRange { index, len });
            }
        }
        let moved = self.prompt.objects.remove(from);
        self.prompt.objects.insert(to, moved);
        Ok(())
    }

    pub fn set_reference_image(&mut self, id: &str, image: ReferenceImage) -> bool {
        match self.object_mut(id) {
            Some(obj) => {
                obj.reference_image = Some(image);
                true
            }
            None => false,
        }
    }

    pub fn clear_reference_image(&mut self, id: &str) -> bool {
        match self.object_mut(id) {
            Some(obj) => {
                obj.reference_image = None;
                true
            }
            None => false,
        }
    }

    pub fn reset_prompt(&mut self) {
        self.prompt = create_default();
    }

    /// Replaces the document wholesale. Callers holding untrusted JSON should
    /// go through [`PromptStore::import_json`] instead.
    pub fn load_prompt(&mut self, prompt: ImagePrompt) {
        self.prompt = prompt;
    }

    /// Pretty JSON with two-space indentation.
    pub fn export_json(&self) -> Result<String, PaintError> {
        serde_json::to_string_pretty(&self.prompt)
            .map_err(|e| PaintError::Serialization(e.to_string()))
    }

    /// Parses, validates and loads `text`. Nothing changes unless every step succeeds.
    pub fn import_json(&mut self, text: &str) -> Result<(), PaintError> {
        let prompt = validate_str(text)
            .map_err(|e| PaintError::Parse(e.to_string()))?
            .map_err(PaintError::Validation)?;
        debug!("Imported prompt with {} object(s)", prompt.objects.len());
        self.load_prompt(prompt);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn reference(name: &str) -> ReferenceImage {
        ReferenceImage {
            data: "R0lGODlhAQABAAAAACw=".to_string(),
            mime_type: "image/gif".to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn update_meta_overwrites_exactly_the_patched_keys() {
        let mut store = PromptStore::default();
        let before = store.prompt().clone();

        store.update_meta(MetaPatch {
            image_quality: Some(ImageQuality::Ultra),
            image_type: Some("3D Render".to_string()),
            ..Default::default()
        });

        let mut expected = before;
        expected.meta.image_quality = ImageQuality::Ultra;
        expected.meta.image_type = "3D Render".to_string();
        assert_eq!(store.prompt(), &expected);
    }

    #[test]
    fn nested_section_updates_keep_siblings() {
        let mut store = PromptStore::default();
        let before = store.prompt().clone();

        store.update_lighting(LightingPatch {
            direction: Some("Rim Light".to_string()),
            ..Default::default()
        });
        store.update_color_palette(ColorPalettePatch {
            contrast_level: Some(ContrastLevel::Low),
            ..Default::default()
        });
        store.update_global_context(GlobalContextPatch {
            scene_description: Some("Model on a rooftop".to_string()),
            ..Default::default()
        });
        store.update_composition(CompositionPatch {
            framing: Some("Wide Shot".to_string()),
            ..Default::default()
        });

        let ctx = &store.prompt().global_context;
        assert_eq!(ctx.lighting.direction, "Rim Light");
        assert_eq!(ctx.lighting.source, before.global_context.lighting.source);
        assert_eq!(ctx.color_palette.contrast_level, ContrastLevel::Low);
        assert_eq!(
            ctx.color_palette.dominant_hex_estimates,
            before.global_context.color_palette.dominant_hex_estimates
        );
        assert_eq!(ctx.scene_description, "Model on a rooftop");
        assert_eq!(ctx.environment_type, before.global_context.environment_type);
        assert_eq!(store.prompt().composition.framing, "Wide Shot");
        assert_eq!(
            store.prompt().composition.camera_angle,
            before.composition.camera_angle
        );
        assert_eq!(store.prompt().meta, before.meta);
    }

    #[test]
    fn add_object_numbers_from_current_count() {
        let mut prompt = create_default();
        prompt.objects.push(create_default_object("hat"));
        prompt.objects.push(create_default_object("boot"));
        let mut store = PromptStore::new(prompt);

        assert_eq!(store.add_object(), "obj_003");
        assert_eq!(store.add_object(), "obj_004");
        assert_eq!(store.prompt().objects.len(), 4);
        assert_eq!(store.prompt().objects[3], create_default_object("obj_004"));
    }

    #[test]
    fn add_object_after_removal_uses_count_not_existing_ids() {
        let mut store = PromptStore::default();
        for _ in 0..3 {
            store.add_object();
        }

        assert!(store.remove_object("obj_001"));
        assert_eq!(store.add_object(), "obj_003");

        let ids: Vec<&str> = store.prompt().objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["obj_002", "obj_003", "obj_003"]);
    }

    #[test]
    fn update_object_merges_and_ignores_unknown_ids() {
        let mut store = PromptStore::default();
        let id = store.add_object();

        assert!(store.update_object(
            &id,
            PromptObjectPatch {
                label: Some("Jacket".to_string()),
                category: Some(ObjectCategory::Apparel),
                ..Default::default()
            }
        ));
        let obj = store.prompt().object(&id).unwrap();
        assert_eq!(obj.label, "Jacket");
        assert_eq!(obj.category, ObjectCategory::Apparel);
        assert_eq!(obj.material, "");

        let before = store.prompt().clone();
        assert!(!store.update_object("obj_404", PromptObjectPatch::default()));
        assert!(!store.remove_object("obj_404"));
        assert_eq!(store.prompt(), &before);
    }

    #[test]
    fn duplicate_deep_copies_and_relabels() {
        let mut store = PromptStore::default();
        let id = store.add_object();
        store.update_object(
            &id,
            PromptObjectPatch {
                label: Some("Hat".to_string()),
                ..Default::default()
            },
        );
        store.set_reference_image(&id, reference("hat.gif"));

        let copy_id = store.duplicate_object(&id).unwrap();
        assert_eq!(copy_id, "obj_002");

        if let Some(obj) = store.object_mut(&copy_id) {
            if let Some(image) = obj.reference_image.as_mut() {
                image.data.push_str("AAAA");
            }
        }

        let original = store.prompt().object(&id).unwrap();
        let copy = store.prompt().object(&copy_id).unwrap();
        assert_eq!(copy.label, "Hat (copy)");
        assert_eq!(original.reference_image, Some(reference("hat.gif")));
        assert_ne!(copy.reference_image, original.reference_image);
        assert_eq!(copy.location, original.location);
    }

    #[test]
    fn duplicate_of_unknown_id_is_noop() {
        let mut store = PromptStore::default();
        store.add_object();
        let before = store.prompt().clone();
        assert_eq!(store.duplicate_object("obj_999"), None);
        assert_eq!(store.prompt(), &before);
    }

    #[test]
    fn reorder_moves_one_object() {
        let mut store = PromptStore::default();
        for _ in 0..4 {
            store.add_object();
        }
        store.reorder_objects(0, 2).unwrap();
        let ids: Vec<&str> = store.prompt().objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["obj_002", "obj_003", "obj_001", "obj_004"]);

        store.reorder_objects(3, 0).unwrap();
        let ids: Vec<&str> = store.prompt().objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["obj_004", "obj_002", "obj_003", "obj_001"]);
    }

    #[test]
    fn reorder_rejects_out_of_range() {
        let mut store = PromptStore::default();
        store.add_object();
        store.add_object();
        let before = store.prompt().clone();

        assert_matches!(
            store.reorder_objects(0, 2),
            Err(PaintError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_matches!(
            store.reorder_objects(5, 0),
            Err(PaintError::IndexOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(store.prompt(), &before);
    }

    #[test]
    fn reset_and_load_replace_wholesale() {
        let mut store = PromptStore::default();
        store.add_object();
        store.reset_prompt();
        assert_eq!(store.prompt(), &create_default());

        let mut other = create_default();
        other.meta.image_type = "Vector Art".to_string();
        store.load_prompt(other.clone());
        assert_eq!(store.into_prompt(), other);
    }

    #[test]
    fn export_then_import_round_trips() {
        let mut store = PromptStore::default();
        let id = store.add_object();
        store.set_reference_image(&id, reference("ref.gif"));
        store.update_object(
            &id,
            PromptObjectPatch {
                relationships: Some(Some(vec![ObjectRelationship {
                    kind: RelationshipKind::Near,
                    target_object_id: "obj_002".to_string(),
                }])),
                ..Default::default()
            },
        );

        let json = store.export_json().unwrap();
        assert!(json.starts_with("{\n  \"meta\": {\n    \"image_quality\""));

        let mut restored = PromptStore::default();
        restored.import_json(&json).unwrap();
        assert_eq!(restored, store);
    }

    #[test]
    fn failed_import_leaves_document_untouched() {
        let mut store = PromptStore::default();
        store.add_object();
        let before = store.prompt().clone();

        assert_matches!(store.import_json("{ not json"), Err(PaintError::Parse(_)));

        let mut value = serde_json::to_value(&before).unwrap();
        value["meta"]["image_quality"] = serde_json::json!("Extreme");
        assert_matches!(
            store.import_json(&value.to_string()),
            Err(PaintError::Validation(errors)) if errors.paths() == vec!["meta.image_quality"]
        );
        assert_eq!(store.prompt(), &before);
    }

    #[test]
    fn reference_image_attach_and_clear() {
        let mut store = PromptStore::default();
        let id = store.add_object();
        assert!(store.set_reference_image(&id, reference("a.gif")));
        assert!(store.prompt().object(&id).unwrap().reference_image.is_some());
        assert!(store.clear_reference_image(&id));
        assert!(store.prompt().object(&id).unwrap().reference_image.is_none());
        assert!(!store.set_reference_image("obj_404", reference("b.gif")));
    }
}
