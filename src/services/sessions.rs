// src/services/sessions.rs
use crate::errors::PaintError;
use crate::prompt::{self, ImagePrompt, PromptStore};
use log::info;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One [`PromptStore`] per editing session.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, PromptStore>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session on the default document.
    pub async fn create(&self) -> (Uuid, ImagePrompt) {
        let id = Uuid::new_v4();
        let store = PromptStore::default();
        let prompt = store.prompt().clone();
        self.sessions.write().await.insert(id, store);
        info!("Opened prompt session {}", id);
        (id, prompt)
    }

    pub async fn list(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.sessions.read().await.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Runs a read-only query against the session's store.
    pub async fn read<T, F>(&self, id: Uuid, query: F) -> Result<T, PaintError>
    where
        F: FnOnce(&PromptStore) -> T,
    {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(query)
            .ok_or(PaintError::SessionNotFound(id))
    }

    pub async fn get(&self, id: Uuid) -> Result<ImagePrompt, PaintError> {
        self.read(id, |store| store.prompt().clone()).await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), PaintError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Closed prompt session {}", id);
                Ok(())
            }
            None => Err(PaintError::SessionNotFound(id)),
        }
    }

    /// Runs `edit` against a copy of the session's store and commits the copy
    /// only if the edit succeeds and the resulting document still validates.
    pub async fn edit<T, F>(&self, id: Uuid, edit: F) -> Result<(T, ImagePrompt), PaintError>
    where
        F: FnOnce(&mut PromptStore) -> Result<T, PaintError>,
    {
        let mut sessions = self.sessions.write().await;
        let current = sessions.get_mut(&id).ok_or(PaintError::SessionNotFound(id))?;

        let mut next = current.clone();
        let outcome = edit(&mut next)?;
        prompt::validate_document(next.prompt()).map_err(PaintError::Validation)?;

        let snapshot = next.prompt().clone();
        *current = next;
        Ok((outcome, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{ColorDetails, PromptObjectPatch};
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn create_get_list_remove() {
        let registry = SessionRegistry::new();
        let (id, prompt) = registry.create().await;
        assert_eq!(prompt, prompt::create_default());
        assert_eq!(registry.list().await, vec![id]);
        assert_eq!(registry.get(id).await.unwrap(), prompt);

        registry.remove(id).await.unwrap();
        assert_matches!(
            registry.get(id).await,
            Err(PaintError::SessionNotFound(missing)) if missing == id
        );
        assert_matches!(registry.remove(id).await, Err(PaintError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn edit_commits_valid_changes() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create().await;

        let (obj_id, prompt) = registry.edit(id, |store| Ok(store.add_object())).await.unwrap();
        assert_eq!(obj_id, "obj_001");
        assert_eq!(prompt.objects.len(), 1);
        assert_eq!(registry.get(id).await.unwrap(), prompt);
    }

    #[tokio::test]
    async fn edit_rolls_back_invalid_documents() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create().await;
        registry.edit(id, |store| Ok(store.add_object())).await.unwrap();
        let before = registry.get(id).await.unwrap();

        let result = registry
            .edit(id, |store| {
                store.update_object(
                    "obj_001",
                    PromptObjectPatch {
                        color_details: Some(ColorDetails {
                            base_color_hex: "red".to_string(),
                            secondary_colors: Vec::new(),
                            gradient_or_pattern: "Solid".to_string(),
                        }),
                        ..Default::default()
                    },
                );
                Ok(())
            })
            .await;

        assert_matches!(result, Err(PaintError::Validation(errors))
            if errors.paths() == vec!["objects[0].color_details.base_color_hex"]);
        assert_eq!(registry.get(id).await.unwrap(), before);
    }

    #[tokio::test]
    async fn edit_propagates_operation_errors() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.create().await;
        let result = registry.edit(id, |store| store.reorder_objects(0, 1)).await;
        assert_matches!(result, Err(PaintError::IndexOutOfRange { index: 0, len: 0 }));
    }
}
