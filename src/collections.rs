//! Recipe collections and the mutation engine.
//!
//! A recipe may exist in up to three collections at once: the current result
//! set, history, and favorites. Each collection holds a full copy keyed by id,
//! so every mutation must be applied to every copy or the collections silently
//! diverge. All mutations go through [`RecipeCollections`] to uphold that.

use uuid::Uuid;

use crate::types::{Comment, Recipe};

/// Maximum number of history entries; the oldest are evicted on overflow.
pub const HISTORY_LIMIT: usize = 50;

/// The three overlapping recipe collections plus all mutation operations.
///
/// `history` and `favorites` are durable (see [`crate::storage`]); `results`
/// is transient pipeline state. Mutation methods return `true` when any copy
/// was modified, which is exactly when the durable collections need saving.
#[derive(Debug, Clone, Default)]
pub struct RecipeCollections {
    /// Recipes produced by the most recent generation or search.
    results: Vec<Recipe>,
    /// Most-recent-first log of all generated recipes, bounded to
    /// [`HISTORY_LIMIT`].
    history: Vec<Recipe>,
    /// Most-recently-favorited-first; entries are added and removed on
    /// toggle, not merely flagged.
    favorites: Vec<Recipe>,
}

impl RecipeCollections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the durable collections from storage at startup.
    pub fn restore(history: Vec<Recipe>, favorites: Vec<Recipe>) -> Self {
        Self {
            results: Vec::new(),
            history,
            favorites,
        }
    }

    pub fn results(&self) -> &[Recipe] {
        &self.results
    }

    pub fn history(&self) -> &[Recipe] {
        &self.history
    }

    pub fn favorites(&self) -> &[Recipe] {
        &self.favorites
    }

    /// Replace the current result set.
    pub fn set_results(&mut self, recipes: Vec<Recipe>) {
        self.results = recipes;
    }

    /// Prepend a generation batch to history, preserving the batch order,
    /// and evict the oldest entries beyond [`HISTORY_LIMIT`].
    pub fn add_to_history(&mut self, recipes: &[Recipe]) {
        let mut new_history = Vec::with_capacity(recipes.len() + self.history.len());
        new_history.extend_from_slice(recipes);
        new_history.append(&mut self.history);
        new_history.truncate(HISTORY_LIMIT);
        self.history = new_history;
    }

    /// Find a recipe by id across results, history, and favorites.
    pub fn find(&self, id: Uuid) -> Option<&Recipe> {
        self.results
            .iter()
            .chain(self.history.iter())
            .chain(self.favorites.iter())
            .find(|r| r.id == id)
    }

    fn update_everywhere(&mut self, id: Uuid, f: impl Fn(&mut Recipe)) -> bool {
        let mut changed = false;
        for recipe in self
            .results
            .iter_mut()
            .chain(self.history.iter_mut())
            .chain(self.favorites.iter_mut())
            .filter(|r| r.id == id)
        {
            f(recipe);
            changed = true;
        }
        changed
    }

    /// Flip favorite membership for the recipe with the given id.
    ///
    /// Adds a full copy (with `is_favorite` set) to the front of favorites,
    /// or removes the favorites entry, and updates the flag on every copy in
    /// every collection. No-op if no collection holds the id. Toggling twice
    /// restores the original state.
    pub fn toggle_favorite(&mut self, id: Uuid) -> bool {
        let Some(target) = self.find(id).cloned() else {
            return false;
        };

        let currently_fav = self.favorites.iter().any(|r| r.id == id);
        if currently_fav {
            self.favorites.retain(|r| r.id != id);
        } else {
            let mut copy = target;
            copy.is_favorite = true;
            self.favorites.insert(0, copy);
        }

        let new_value = !currently_fav;
        self.update_everywhere(id, |r| r.is_favorite = new_value);
        true
    }

    /// Prepend a new comment to the recipe's comment list in every copy.
    /// No-op if the text trims to empty.
    pub fn add_comment(&mut self, id: Uuid, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let comment = Comment::new(text);
        self.update_everywhere(id, |r| r.comments.insert(0, comment.clone()))
    }

    /// Set the rating on every copy. Last write wins.
    pub fn rate(&mut self, id: Uuid, rating: u8) -> bool {
        self.update_everywhere(id, |r| r.rating = Some(rating))
    }

    /// Append a tag to every copy. Case-sensitive; no-op if already present
    /// or if the tag trims to empty.
    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return false;
        }
        match self.find(id) {
            Some(recipe) if !recipe.tags.iter().any(|t| t == tag) => {
                self.update_everywhere(id, |r| {
                    if !r.tags.iter().any(|t| t == tag) {
                        r.tags.push(tag.to_string());
                    }
                })
            }
            _ => false,
        }
    }

    /// Remove an exact-match tag from every copy. No-op if absent.
    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> bool {
        match self.find(id) {
            Some(recipe) if recipe.tags.iter().any(|t| t == tag) => {
                self.update_everywhere(id, |r| r.tags.retain(|t| t != tag))
            }
            _ => false,
        }
    }

    /// Clear the transient result set.
    pub fn clear_results(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecipeDraft;

    fn recipe(title: &str) -> Recipe {
        Recipe::from_draft(RecipeDraft {
            title: title.to_string(),
            description: String::new(),
            ingredients_detected: vec!["egg".to_string()],
            steps: vec!["Cook.".to_string()],
            cooking_time: "5 minutes".to_string(),
            difficulty: "Easy".to_string(),
            chef_comment: String::new(),
            tags: Vec::new(),
        })
    }

    fn collections_with(recipes: Vec<Recipe>) -> RecipeCollections {
        let mut c = RecipeCollections::new();
        c.add_to_history(&recipes);
        c.set_results(recipes);
        c
    }

    #[test]
    fn test_double_toggle_restores_original_state() {
        let r = recipe("Omelette");
        let id = r.id;
        let mut c = collections_with(vec![r]);

        assert!(c.toggle_favorite(id));
        assert_eq!(c.favorites().len(), 1);
        assert!(c.favorites()[0].is_favorite);
        assert!(c.history()[0].is_favorite);

        assert!(c.toggle_favorite(id));
        assert!(c.favorites().is_empty());
        assert!(!c.history()[0].is_favorite);
        assert!(!c.results()[0].is_favorite);
    }

    #[test]
    fn test_toggle_favorite_unknown_id_is_noop() {
        let mut c = collections_with(vec![recipe("Omelette")]);
        assert!(!c.toggle_favorite(Uuid::new_v4()));
        assert!(c.favorites().is_empty());
    }

    #[test]
    fn test_mutations_keep_copies_identical() {
        let r = recipe("Omelette");
        let id = r.id;
        let mut c = collections_with(vec![r]);
        c.toggle_favorite(id);

        c.add_comment(id, "Delicious");
        c.rate(id, 5);
        c.add_tag(id, "quick");

        let history_copy = c.history().iter().find(|r| r.id == id).unwrap();
        let favorites_copy = c.favorites().iter().find(|r| r.id == id).unwrap();
        let results_copy = c.results().iter().find(|r| r.id == id).unwrap();

        assert_eq!(history_copy, favorites_copy);
        assert_eq!(history_copy, results_copy);
        assert_eq!(history_copy.comments.len(), 1);
        assert_eq!(history_copy.rating, Some(5));
        assert_eq!(history_copy.tags, vec!["quick"]);
    }

    #[test]
    fn test_history_bounded_to_limit() {
        let mut c = RecipeCollections::new();
        for i in 0..HISTORY_LIMIT {
            c.add_to_history(&[recipe(&format!("Dish {i}"))]);
        }
        assert_eq!(c.history().len(), HISTORY_LIMIT);
        let oldest = c.history().last().unwrap().title.clone();
        assert_eq!(oldest, "Dish 0");

        c.add_to_history(&[recipe("Dish 50")]);
        assert_eq!(c.history().len(), HISTORY_LIMIT);
        assert_eq!(c.history()[0].title, "Dish 50");
        // The oldest entry was evicted.
        assert_eq!(c.history().last().unwrap().title, "Dish 1");
    }

    #[test]
    fn test_history_batch_order_preserved() {
        let mut c = RecipeCollections::new();
        c.add_to_history(&[recipe("Old")]);
        c.add_to_history(&[recipe("A"), recipe("B"), recipe("C")]);

        let titles: Vec<&str> = c.history().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "Old"]);
    }

    #[test]
    fn test_add_tag_duplicate_is_noop() {
        let r = recipe("Omelette");
        let id = r.id;
        let mut c = collections_with(vec![r]);

        assert!(c.add_tag(id, "quick"));
        assert!(!c.add_tag(id, "quick"));
        assert_eq!(c.history()[0].tags, vec!["quick"]);

        // Tags are case-sensitive: a different casing is a different tag.
        assert!(c.add_tag(id, "Quick"));
        assert_eq!(c.history()[0].tags, vec!["quick", "Quick"]);
    }

    #[test]
    fn test_remove_absent_tag_is_noop() {
        let r = recipe("Omelette");
        let other = recipe("Rice");
        let id = r.id;
        let other_snapshot = other.clone();
        let mut c = collections_with(vec![r, other]);

        assert!(!c.remove_tag(id, "missing"));
        // Non-target recipes are structurally unchanged.
        assert_eq!(
            c.history().iter().find(|r| r.id == other_snapshot.id),
            Some(&other_snapshot)
        );
    }

    #[test]
    fn test_add_comment_empty_is_noop() {
        let r = recipe("Omelette");
        let id = r.id;
        let mut c = collections_with(vec![r]);

        assert!(!c.add_comment(id, "   "));
        assert!(c.history()[0].comments.is_empty());
    }

    #[test]
    fn test_comments_newest_first() {
        let r = recipe("Omelette");
        let id = r.id;
        let mut c = collections_with(vec![r]);

        c.add_comment(id, "first");
        c.add_comment(id, "second");

        let comments = &c.history()[0].comments;
        assert_eq!(comments[0].text, "second");
        assert_eq!(comments[1].text, "first");
    }

    #[test]
    fn test_rating_last_write_wins() {
        let r = recipe("Omelette");
        let id = r.id;
        let mut c = collections_with(vec![r]);

        c.rate(id, 3);
        c.rate(id, 5);
        assert_eq!(c.history()[0].rating, Some(5));
    }
}
