//! Screen registry
//!
//! Maps step names to screen constructors. Step names double as the
//! values persisted in the state table, so a registered step can be
//! rebuilt for a user after a restart.

use std::collections::HashMap;
use std::sync::Arc;

use crate::flow::screen::FlowScreen;

type ScreenFactory = Arc<dyn Fn(&str) -> Box<dyn FlowScreen> + Send + Sync>;

/// Registry of flow screens keyed by step name
#[derive(Clone, Default)]
pub struct ScreenRegistry {
    screens: HashMap<String, ScreenFactory>,
}

impl ScreenRegistry {
    pub fn new() -> Self {
        Self {
            screens: HashMap::new(),
        }
    }

    /// Register a screen constructor for a step name
    ///
    /// The factory receives the user id the screen is built for.
    /// Registering the same step twice replaces the earlier constructor.
    pub fn register<S, F>(&mut self, step: impl Into<String>, factory: F)
    where
        S: FlowScreen + 'static,
        F: Fn(&str) -> S + Send + Sync + 'static,
    {
        self.screens
            .insert(step.into(), Arc::new(move |user_id| Box::new(factory(user_id))));
    }

    /// Build the screen registered for a step
    pub fn build(&self, step: &str, user_id: &str) -> Option<Box<dyn FlowScreen>> {
        self.screens.get(step).map(|factory| factory(user_id))
    }

    /// Check whether a step is registered
    pub fn contains(&self, step: &str) -> bool {
        self.screens.contains_key(step)
    }

    /// All registered step names
    pub fn steps(&self) -> Vec<&str> {
        self.screens.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}

impl std::fmt::Debug for ScreenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenRegistry")
            .field("steps", &self.steps())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::screen::FlowButton;

    struct NamedScreen {
        step: &'static str,
        user_id: String,
    }

    impl FlowScreen for NamedScreen {
        fn step(&self) -> &str {
            self.step
        }

        fn text(&self) -> String {
            format!("screen {} for {}", self.step, self.user_id)
        }

        fn buttons(&self) -> Vec<FlowButton> {
            vec![]
        }
    }

    fn registry_with(steps: &[&'static str]) -> ScreenRegistry {
        let mut registry = ScreenRegistry::new();
        for step in steps {
            let step = *step;
            registry.register(step, move |user_id: &str| NamedScreen {
                step,
                user_id: user_id.to_string(),
            });
        }
        registry
    }

    #[test]
    fn test_register_and_build() {
        let registry = registry_with(&["start", "confirmation"]);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("start"));
        assert!(!registry.contains("welcome"));

        let screen = registry.build("start", "123").unwrap();
        assert_eq!(screen.step(), "start");
        assert_eq!(screen.text(), "screen start for 123");

        assert!(registry.build("welcome", "123").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = registry_with(&["start"]);
        registry.register("start", |user_id: &str| NamedScreen {
            step: "replacement",
            user_id: user_id.to_string(),
        });

        assert_eq!(registry.len(), 1);
        let screen = registry.build("start", "123").unwrap();
        assert_eq!(screen.step(), "replacement");
    }

    #[test]
    fn test_steps_listing() {
        let registry = registry_with(&["start", "confirmation"]);
        let mut steps = registry.steps();
        steps.sort_unstable();
        assert_eq!(steps, vec!["confirmation", "start"]);
    }
}
