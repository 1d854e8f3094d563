//! Scene and role catalog
//!
//! The catalog of role-play scenes offered to learners. It is built once at
//! startup, shared read-only through [`crate::state::AppState`], and served
//! verbatim by `GET /api/scenes`.

use serde::{Deserialize, Serialize};

/// Paired conversational roles for one scene.
///
/// Index `i` in the `user` list pairs with index `i` in the `ai` list: when
/// the learner takes `user[i]`, the assistant plays `ai[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRoles {
    pub user: Vec<String>,
    pub ai: Vec<String>,
}

/// One role-play context (e.g. "restaurant") with its paired roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub roles: SceneRoles,
}

/// Static, read-only catalog of all scenes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneCatalog {
    pub scenes: Vec<Scene>,
}

impl SceneCatalog {
    /// The built-in catalog shipped with the gateway.
    pub fn builtin() -> Self {
        SceneCatalog {
            scenes: vec![
                scene(
                    "restaurant",
                    "Restaurant",
                    "🍽️",
                    &["customer", "waiter"],
                    &["waiter", "customer"],
                ),
                scene(
                    "hotel",
                    "Hotel",
                    "🏨",
                    &["guest", "receptionist"],
                    &["receptionist", "guest"],
                ),
                scene(
                    "airport",
                    "Airport",
                    "✈️",
                    &["passenger", "staff"],
                    &["staff", "passenger"],
                ),
                scene(
                    "shopping",
                    "Shopping",
                    "🛍️",
                    &["customer", "clerk"],
                    &["clerk", "customer"],
                ),
            ],
        }
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

fn scene(id: &str, name: &str, icon: &str, user_roles: &[&str], ai_roles: &[&str]) -> Scene {
    Scene {
        id: id.to_string(),
        name: name.to_string(),
        icon: icon.to_string(),
        roles: SceneRoles {
            user: user_roles.iter().map(|role| role.to_string()).collect(),
            ai: ai_roles.iter().map(|role| role.to_string()).collect(),
        },
    }
}
