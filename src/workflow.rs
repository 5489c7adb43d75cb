//! The workflow state machine.
//!
//! Drives the ingredient-identification → selection → recipe-generation
//! lifecycle. All pipeline state is process-local; only the history and
//! favorites collections are durable (see [`crate::storage`]).
//!
//! Gateway calls are issued in two phases: `begin_*` transitions the machine
//! and returns a [`RequestToken`], and `apply_*_result` accepts the token
//! together with the gateway outcome. A superseded call is never cancelled;
//! its response simply fails the token check on application and is discarded.
//! [`crate::session::Session`] runs both phases for embedders that do not
//! schedule gateway calls themselves.

use uuid::Uuid;

use crate::ai::ImageData;
use crate::collections::RecipeCollections;
use crate::error::GatewayError;
use crate::types::{ChefMode, DetectedIngredient, Language, Recipe, RecipeDraft};

/// Pipeline status. The current [`View`] is an orthogonal selector, not part
/// of this machine; switching view does not reset the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    AnalyzingImage,
    SelectingIngredients,
    Cooking,
    Success,
    Error,
}

/// Top-level view selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    History,
    Favorites,
}

/// Identifies one issued gateway call. Responses presented with a token that
/// no longer matches the workflow's current sequence are stale and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Which generation path a confirmed selection must take, decided by the
/// chef mode at the moment of confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    /// One styled recipe from the image and selection (persona modes).
    Styled,
    /// A batch of popular recipes from the selection alone.
    PopularSearch,
}

/// The state container for the whole lifecycle: pipeline fields, detected
/// ingredients and the user's selection, the current view, and the three
/// recipe collections.
#[derive(Debug)]
pub struct Workflow {
    /// The captured image encoding. Rescans reuse it without re-upload; it
    /// also serves as the preview the selection UI displays.
    image: Option<ImageData>,
    mode: ChefMode,
    language: Language,
    status: Status,
    detected: Vec<DetectedIngredient>,
    /// Names the user currently has selected, insertion-ordered, no
    /// duplicates. Defaults to all detected names on identify success.
    selected: Vec<String>,
    /// Index of the opened recipe in the result set; -1 means list view.
    selected_index: isize,
    error: Option<String>,
    view: View,
    collections: RecipeCollections,
    /// Sequence number of the most recently issued gateway call.
    request_seq: u64,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self::with_collections(RecipeCollections::new())
    }

    /// Create a workflow around collections restored from storage.
    pub fn with_collections(collections: RecipeCollections) -> Self {
        Self {
            image: None,
            mode: ChefMode::Michelin,
            language: Language::En,
            status: Status::Idle,
            detected: Vec::new(),
            selected: Vec::new(),
            selected_index: -1,
            error: None,
            view: View::Home,
            collections,
            request_seq: 0,
        }
    }

    // --- accessors ---

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn mode(&self) -> ChefMode {
        self.mode
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    pub fn detected_ingredients(&self) -> &[DetectedIngredient] {
        &self.detected
    }

    pub fn selected_ingredients(&self) -> &[String] {
        &self.selected
    }

    pub fn recipes(&self) -> &[Recipe] {
        self.collections.results()
    }

    /// The opened recipe, or None in list view.
    pub fn selected_recipe(&self) -> Option<&Recipe> {
        usize::try_from(self.selected_index)
            .ok()
            .and_then(|i| self.collections.results().get(i))
    }

    pub fn selected_index(&self) -> isize {
        self.selected_index
    }

    pub fn collections(&self) -> &RecipeCollections {
        &self.collections
    }

    // --- mode / language / view ---

    pub fn set_mode(&mut self, mode: ChefMode) {
        self.mode = mode;
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn toggle_language(&mut self) {
        self.language = self.language.toggled();
    }

    /// Switch the top-level view. Does not touch the pipeline: returning to
    /// home resumes whatever state the pipeline is in, and the history and
    /// favorites views always show their full collections.
    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    // --- identification ---

    fn next_token(&mut self) -> RequestToken {
        self.request_seq += 1;
        RequestToken(self.request_seq)
    }

    /// A new image was selected. Stores the encoding and enters
    /// `AnalyzingImage`; the returned token must accompany the identify
    /// result. A fresh selection always starts a fresh call, superseding any
    /// in-flight one.
    pub fn begin_identify(&mut self, image: ImageData) -> RequestToken {
        self.image = Some(image);
        self.status = Status::AnalyzingImage;
        self.error = None;
        self.next_token()
    }

    /// Re-run identification on the stored image without re-upload. Allowed
    /// from the selection screen and while a previous scan is still in
    /// flight (rapid rescans race; the token guard picks the winner).
    /// Returns None when no image has been captured.
    pub fn begin_rescan(&mut self) -> Option<RequestToken> {
        let rescannable = matches!(
            self.status,
            Status::SelectingIngredients | Status::AnalyzingImage
        );
        if self.image.is_none() || !rescannable {
            return None;
        }
        self.status = Status::AnalyzingImage;
        self.error = None;
        Some(self.next_token())
    }

    /// Apply the outcome of an identify call.
    ///
    /// Stale responses (superseded token, or the pipeline has left
    /// `AnalyzingImage`) are discarded. On success the detected set is stored
    /// and the selection defaults to every detected name.
    pub fn apply_identify_result(
        &mut self,
        token: RequestToken,
        result: Result<Vec<DetectedIngredient>, GatewayError>,
    ) {
        if !self.accepts(token, Status::AnalyzingImage) {
            tracing::warn!(token = token.0, "discarding stale identify response");
            return;
        }
        match result {
            Ok(ingredients) => {
                self.selected = dedup_names(&ingredients);
                self.detected = ingredients;
                self.status = Status::SelectingIngredients;
            }
            Err(e) => self.fail(e),
        }
    }

    // --- ingredient selection ---

    /// Toggle one ingredient in or out of the selection.
    pub fn toggle_ingredient(&mut self, name: &str) {
        if self.status != Status::SelectingIngredients {
            return;
        }
        if let Some(pos) = self.selected.iter().position(|n| n == name) {
            self.selected.remove(pos);
        } else if self.detected.iter().any(|i| i.name == name) {
            self.selected.push(name.to_string());
        }
    }

    /// Select every detected ingredient.
    pub fn select_all(&mut self) {
        if self.status == Status::SelectingIngredients {
            self.selected = dedup_names(&self.detected);
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        if self.status == Status::SelectingIngredients {
            self.selected.clear();
        }
    }

    // --- generation ---

    /// The user confirmed the selection. The chef mode at this moment decides
    /// the path: popular mode short-circuits into search no matter which
    /// confirm control fired; the persona modes run a styled generation.
    ///
    /// Returns None (no transition) when the pipeline is not in
    /// `SelectingIngredients`, nothing is selected, or a styled generation
    /// has no image to work from.
    pub fn begin_confirm(&mut self) -> Option<(RequestToken, GenerationKind)> {
        if self.status != Status::SelectingIngredients || self.selected.is_empty() {
            return None;
        }
        let kind = if self.mode == ChefMode::Popular {
            GenerationKind::PopularSearch
        } else {
            GenerationKind::Styled
        };
        if kind == GenerationKind::Styled && self.image.is_none() {
            return None;
        }

        self.status = Status::Cooking;
        self.error = None;
        self.collections.clear_results();
        self.selected_index = match kind {
            GenerationKind::Styled => 0,
            GenerationKind::PopularSearch => -1,
        };
        Some((self.next_token(), kind))
    }

    /// Apply the outcome of a styled generation. Exactly one recipe; the
    /// result auto-opens (index 0) and is prepended to history.
    pub fn apply_generate_result(
        &mut self,
        token: RequestToken,
        result: Result<RecipeDraft, GatewayError>,
    ) -> bool {
        if !self.accepts(token, Status::Cooking) {
            tracing::warn!(token = token.0, "discarding stale generate response");
            return false;
        }
        match result {
            Ok(draft) => {
                let recipe = Recipe::from_draft(draft);
                self.collections.add_to_history(std::slice::from_ref(&recipe));
                self.collections.set_results(vec![recipe]);
                self.status = Status::Success;
                self.selected_index = 0;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Apply the outcome of a popular-recipe search. All returned recipes
    /// are prepended to history (batch order preserved) and shown as a list
    /// (index -1).
    pub fn apply_search_result(
        &mut self,
        token: RequestToken,
        result: Result<Vec<RecipeDraft>, GatewayError>,
    ) -> bool {
        if !self.accepts(token, Status::Cooking) {
            tracing::warn!(token = token.0, "discarding stale search response");
            return false;
        }
        match result {
            Ok(drafts) => {
                let recipes: Vec<Recipe> = drafts.into_iter().map(Recipe::from_draft).collect();
                self.collections.add_to_history(&recipes);
                self.collections.set_results(recipes);
                self.status = Status::Success;
                self.selected_index = -1;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    // --- navigation ---

    /// Open one recipe from the result list without leaving `Success`.
    pub fn open_recipe(&mut self, index: usize) {
        if self.status == Status::Success && index < self.collections.results().len() {
            self.selected_index = index as isize;
        }
    }

    /// Back out of an opened recipe: with more than one result, return to
    /// the list; with a single result there is no list, so reset fully.
    pub fn back_from_recipe(&mut self) {
        if self.collections.results().len() > 1 {
            self.selected_index = -1;
        } else {
            self.reset();
        }
    }

    /// Open a recipe from history or favorites as the single current result
    /// on the home view. The stored image preview does not belong to this
    /// recipe, so it is cleared.
    pub fn open_from_collection(&mut self, id: Uuid) {
        let Some(recipe) = self.collections.find(id).cloned() else {
            return;
        };
        self.image = None;
        self.collections.set_results(vec![recipe]);
        self.status = Status::Success;
        self.selected_index = 0;
        self.view = View::Home;
    }

    /// Full pipeline reset: cancel from selection, try-again from error, and
    /// back from a single-result success all land here. Clears the image,
    /// detections, selection, results, and error; history and favorites are
    /// untouched.
    pub fn reset(&mut self) {
        self.image = None;
        self.status = Status::Idle;
        self.detected.clear();
        self.selected.clear();
        self.collections.clear_results();
        self.selected_index = -1;
        self.error = None;
        self.view = View::Home;
    }

    // --- mutations (delegated to the collection model) ---

    /// Each returns `true` when a durable collection changed and should be
    /// written through the persistence bridge.
    pub fn toggle_favorite(&mut self, id: Uuid) -> bool {
        self.collections.toggle_favorite(id)
    }

    pub fn add_comment(&mut self, id: Uuid, text: &str) -> bool {
        self.collections.add_comment(id, text)
    }

    pub fn rate(&mut self, id: Uuid, rating: u8) -> bool {
        self.collections.rate(id, rating)
    }

    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> bool {
        self.collections.add_tag(id, tag)
    }

    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> bool {
        self.collections.remove_tag(id, tag)
    }

    // --- internals ---

    /// A response is applied only when its token is the most recently issued
    /// one AND the pipeline is still in the state that issued it. Either
    /// check alone is insufficient: a newer call bumps the sequence, and a
    /// cancel changes the state without bumping it.
    fn accepts(&self, token: RequestToken, expected: Status) -> bool {
        token.0 == self.request_seq && self.status == expected
    }

    fn fail(&mut self, error: GatewayError) {
        tracing::debug!(error = %error, "gateway call failed");
        self.status = Status::Error;
        self.error = Some(self.language.gateway_error_message().to_string());
    }
}

fn dedup_names(ingredients: &[DetectedIngredient]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        if !names.iter().any(|n| n == &ingredient.name) {
            names.push(ingredient.name.clone());
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> ImageData {
        ImageData::from_data_url("data:image/jpeg;base64,AAAA")
    }

    fn detected(names: &[&str]) -> Vec<DetectedIngredient> {
        names
            .iter()
            .map(|n| DetectedIngredient {
                name: n.to_string(),
                box_2d: None,
            })
            .collect()
    }

    fn draft(title: &str) -> RecipeDraft {
        RecipeDraft {
            title: title.to_string(),
            description: String::new(),
            ingredients_detected: vec!["egg".to_string()],
            steps: vec!["Cook.".to_string()],
            cooking_time: "5 minutes".to_string(),
            difficulty: "Easy".to_string(),
            chef_comment: String::new(),
            tags: Vec::new(),
        }
    }

    /// Drive the machine to `SelectingIngredients` with the given detections.
    fn workflow_selecting(names: &[&str]) -> Workflow {
        let mut wf = Workflow::new();
        let token = wf.begin_identify(image());
        wf.apply_identify_result(token, Ok(detected(names)));
        wf
    }

    #[test]
    fn test_identify_success_preselects_all() {
        let wf = workflow_selecting(&["egg", "tomato"]);
        assert_eq!(wf.status(), Status::SelectingIngredients);
        assert_eq!(wf.selected_ingredients(), ["egg", "tomato"]);
    }

    #[test]
    fn test_identify_failure_sets_localized_error() {
        let mut wf = Workflow::new();
        wf.set_language(Language::Zh);
        let token = wf.begin_identify(image());
        wf.apply_identify_result(token, Err(GatewayError::EmptyResponse));

        assert_eq!(wf.status(), Status::Error);
        assert_eq!(wf.error(), Some(Language::Zh.gateway_error_message()));
    }

    #[test]
    fn test_stale_identify_response_discarded_after_new_image() {
        let mut wf = Workflow::new();
        let first = wf.begin_identify(image());
        let _second = wf.begin_identify(image());

        wf.apply_identify_result(first, Ok(detected(&["stale"])));
        assert_eq!(wf.status(), Status::AnalyzingImage);
        assert!(wf.detected_ingredients().is_empty());
    }

    #[test]
    fn test_stale_identify_response_discarded_after_reset() {
        let mut wf = Workflow::new();
        let token = wf.begin_identify(image());
        wf.reset();

        // The token still matches the sequence, but the pipeline left
        // AnalyzingImage; the late response must not repopulate state.
        wf.apply_identify_result(token, Ok(detected(&["stale"])));
        assert_eq!(wf.status(), Status::Idle);
        assert!(wf.detected_ingredients().is_empty());
    }

    #[test]
    fn test_rescan_reuses_stored_image() {
        let mut wf = workflow_selecting(&["egg"]);
        let token = wf.begin_rescan().expect("image is stored");
        assert_eq!(wf.status(), Status::AnalyzingImage);

        wf.apply_identify_result(token, Ok(detected(&["egg", "basil"])));
        assert_eq!(wf.selected_ingredients(), ["egg", "basil"]);
    }

    #[test]
    fn test_rescan_without_image_is_noop() {
        let mut wf = Workflow::new();
        assert!(wf.begin_rescan().is_none());
        assert_eq!(wf.status(), Status::Idle);
    }

    #[test]
    fn test_rescan_supersedes_inflight_identify() {
        let mut wf = Workflow::new();
        let first = wf.begin_identify(image());
        let second = wf.begin_rescan().expect("image is stored");

        wf.apply_identify_result(first, Ok(detected(&["stale"])));
        wf.apply_identify_result(second, Ok(detected(&["fresh"])));
        assert_eq!(wf.selected_ingredients(), ["fresh"]);
    }

    #[test]
    fn test_toggle_and_select_all() {
        let mut wf = workflow_selecting(&["egg", "tomato"]);

        wf.toggle_ingredient("egg");
        assert_eq!(wf.selected_ingredients(), ["tomato"]);

        wf.toggle_ingredient("egg");
        assert_eq!(wf.selected_ingredients(), ["tomato", "egg"]);

        // Unknown names are not selectable.
        wf.toggle_ingredient("truffle");
        assert_eq!(wf.selected_ingredients().len(), 2);

        wf.clear_selection();
        assert!(wf.selected_ingredients().is_empty());
        wf.select_all();
        assert_eq!(wf.selected_ingredients(), ["egg", "tomato"]);
    }

    #[test]
    fn test_confirm_styled_success_auto_opens() {
        let mut wf = workflow_selecting(&["egg", "tomato"]);
        let (token, kind) = wf.begin_confirm().expect("confirm allowed");
        assert_eq!(kind, GenerationKind::Styled);
        assert_eq!(wf.status(), Status::Cooking);

        wf.apply_generate_result(token, Ok(draft("Omelette")));
        assert_eq!(wf.status(), Status::Success);
        assert_eq!(wf.recipes().len(), 1);
        assert_eq!(wf.selected_index(), 0);
        assert_eq!(wf.selected_recipe().unwrap().title, "Omelette");
        assert_eq!(wf.collections().history().len(), 1);
    }

    #[test]
    fn test_confirm_popular_shows_list() {
        let mut wf = workflow_selecting(&["egg", "tomato"]);
        wf.set_mode(ChefMode::Popular);

        let (token, kind) = wf.begin_confirm().expect("confirm allowed");
        assert_eq!(kind, GenerationKind::PopularSearch);

        let drafts = vec![draft("A"), draft("B"), draft("C"), draft("D")];
        wf.apply_search_result(token, Ok(drafts));

        assert_eq!(wf.status(), Status::Success);
        assert_eq!(wf.recipes().len(), 4);
        assert_eq!(wf.selected_index(), -1);
        assert!(wf.selected_recipe().is_none());
        // Batch lands in history most-recent-first, order preserved.
        let titles: Vec<&str> = wf
            .collections()
            .history()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_confirm_with_empty_selection_is_rejected() {
        let mut wf = workflow_selecting(&["egg"]);
        wf.clear_selection();
        assert!(wf.begin_confirm().is_none());
        assert_eq!(wf.status(), Status::SelectingIngredients);
    }

    #[test]
    fn test_generate_failure_enters_error_then_try_again_resets() {
        let mut wf = workflow_selecting(&["egg"]);
        let (token, _) = wf.begin_confirm().unwrap();
        wf.apply_generate_result(token, Err(GatewayError::EmptyResponse));
        assert_eq!(wf.status(), Status::Error);
        assert!(wf.error().is_some());

        wf.reset();
        assert_eq!(wf.status(), Status::Idle);
        assert!(wf.image().is_none());
        assert!(wf.detected_ingredients().is_empty());
        assert!(wf.recipes().is_empty());
        assert!(wf.error().is_none());
    }

    #[test]
    fn test_stale_generate_after_cancel_is_discarded() {
        let mut wf = workflow_selecting(&["egg"]);
        let (token, _) = wf.begin_confirm().unwrap();
        wf.reset();

        assert!(!wf.apply_generate_result(token, Ok(draft("Late"))));
        assert_eq!(wf.status(), Status::Idle);
        assert!(wf.collections().history().is_empty());
    }

    #[test]
    fn test_open_and_back_with_multiple_results() {
        let mut wf = workflow_selecting(&["egg"]);
        wf.set_mode(ChefMode::Popular);
        let (token, _) = wf.begin_confirm().unwrap();
        wf.apply_search_result(token, Ok(vec![draft("A"), draft("B")]));

        wf.open_recipe(1);
        assert_eq!(wf.selected_recipe().unwrap().title, "B");

        wf.back_from_recipe();
        assert_eq!(wf.status(), Status::Success);
        assert_eq!(wf.selected_index(), -1);
    }

    #[test]
    fn test_back_with_single_result_resets() {
        let mut wf = workflow_selecting(&["egg"]);
        let (token, _) = wf.begin_confirm().unwrap();
        wf.apply_generate_result(token, Ok(draft("Solo")));

        wf.back_from_recipe();
        assert_eq!(wf.status(), Status::Idle);
        assert!(wf.recipes().is_empty());
    }

    #[test]
    fn test_view_switch_preserves_pipeline() {
        let mut wf = workflow_selecting(&["egg"]);
        wf.set_view(View::History);
        wf.set_view(View::Home);
        assert_eq!(wf.status(), Status::SelectingIngredients);
        assert_eq!(wf.selected_ingredients(), ["egg"]);
    }

    #[test]
    fn test_open_from_collection_clears_preview() {
        let mut wf = workflow_selecting(&["egg"]);
        let (token, _) = wf.begin_confirm().unwrap();
        wf.apply_generate_result(token, Ok(draft("Kept")));
        let id = wf.collections().history()[0].id;

        wf.set_view(View::History);
        wf.open_from_collection(id);

        assert_eq!(wf.view(), View::Home);
        assert_eq!(wf.status(), Status::Success);
        assert_eq!(wf.selected_recipe().unwrap().id, id);
        assert!(wf.image().is_none());
    }

    #[test]
    fn test_mode_fixed_at_confirm_time() {
        let mut wf = workflow_selecting(&["egg"]);
        wf.set_mode(ChefMode::Popular);
        let (_, kind) = wf.begin_confirm().unwrap();
        assert_eq!(kind, GenerationKind::PopularSearch);
    }
}
