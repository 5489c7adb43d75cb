//! The session orchestrator.
//!
//! Owns the state container and the two collaborators: the gateway client
//! and the persistence bridge. Each driver method runs one gateway call
//! end-to-end (issue the transition, await the call, apply the result) and
//! mirrors durable-collection changes to storage.
//!
//! Embedders that schedule gateway calls themselves (e.g. to let a rescan
//! race an in-flight identify) can drive [`Workflow`] directly; the
//! stale-response guard lives there, not here.

use uuid::Uuid;

use crate::ai::{
    generate_styled_recipe, identify_ingredients, search_popular_recipes, AiClient, ImageData,
};
use crate::collections::RecipeCollections;
use crate::storage::PersistenceBridge;
use crate::workflow::{GenerationKind, Workflow};

pub struct Session {
    client: Box<dyn AiClient>,
    bridge: PersistenceBridge,
    workflow: Workflow,
}

impl Session {
    /// Start a session: restore history and favorites from storage (fail
    /// open) and build the workflow around them.
    pub async fn start(client: Box<dyn AiClient>, bridge: PersistenceBridge) -> Self {
        let (history, favorites) = bridge.load().await;
        let workflow = Workflow::with_collections(RecipeCollections::restore(history, favorites));
        Self {
            client,
            bridge,
            workflow,
        }
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn workflow_mut(&mut self) -> &mut Workflow {
        &mut self.workflow
    }

    /// A new image was selected: identify its ingredients.
    pub async fn upload_image(&mut self, image: ImageData) {
        let token = self.workflow.begin_identify(image.clone());
        let result =
            identify_ingredients(self.client.as_ref(), &image, self.workflow.language()).await;
        self.workflow.apply_identify_result(token, result);
    }

    /// Re-run identification on the stored image. No-op without one.
    pub async fn rescan(&mut self) {
        let Some(image) = self.workflow.image().cloned() else {
            return;
        };
        let Some(token) = self.workflow.begin_rescan() else {
            return;
        };
        let result =
            identify_ingredients(self.client.as_ref(), &image, self.workflow.language()).await;
        self.workflow.apply_identify_result(token, result);
    }

    /// The user confirmed the ingredient selection: run the generation path
    /// the current chef mode dictates. Failures land the workflow in its
    /// error state rather than propagating.
    pub async fn confirm_ingredients(&mut self) {
        let image = self.workflow.image().cloned();
        let Some((token, kind)) = self.workflow.begin_confirm() else {
            return;
        };
        let selected = self.workflow.selected_ingredients().to_vec();
        let language = self.workflow.language();

        let changed = match kind {
            GenerationKind::Styled => {
                // begin_confirm only picks the styled path with an image captured.
                let Some(image) = image else {
                    return;
                };
                let result = generate_styled_recipe(
                    self.client.as_ref(),
                    &image,
                    &selected,
                    self.workflow.mode(),
                    language,
                )
                .await;
                self.workflow.apply_generate_result(token, result)
            }
            GenerationKind::PopularSearch => {
                let result =
                    search_popular_recipes(self.client.as_ref(), &selected, language).await;
                self.workflow.apply_search_result(token, result)
            }
        };

        if changed {
            self.save().await;
        }
    }

    // --- mutations, written through to storage on change ---

    pub async fn toggle_favorite(&mut self, id: Uuid) {
        if self.workflow.toggle_favorite(id) {
            self.save().await;
        }
    }

    pub async fn add_comment(&mut self, id: Uuid, text: &str) {
        if self.workflow.add_comment(id, text) {
            self.save().await;
        }
    }

    pub async fn rate(&mut self, id: Uuid, rating: u8) {
        if self.workflow.rate(id, rating) {
            self.save().await;
        }
    }

    pub async fn add_tag(&mut self, id: Uuid, tag: &str) {
        if self.workflow.add_tag(id, tag) {
            self.save().await;
        }
    }

    pub async fn remove_tag(&mut self, id: Uuid, tag: &str) {
        if self.workflow.remove_tag(id, tag) {
            self.save().await;
        }
    }

    async fn save(&mut self) {
        let collections = self.workflow.collections();
        let history = collections.history().to_vec();
        let favorites = collections.favorites().to_vec();
        self.bridge.save(&history, &favorites).await;
    }
}
