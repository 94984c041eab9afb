//! Duck templates and weighted template selection

use crate::components::{Color, Images, Sprite, Target};
use gallery_engine::config::ConfigError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template name of regular ducks
pub const DUCK_REGULAR: &str = "duck_regular";
/// Template name of boss ducks
pub const DUCK_BOSS: &str = "duck_boss";

/// Tolerance on the sum of spawn weights
const WEIGHT_TOLERANCE: f32 = 0.01;

/// Blueprint for a spawned duck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTemplate {
    /// Sprite box and color
    pub sprite: Sprite,
    /// Facing images, first one used at spawn
    pub images: Vec<String>,
    /// Flight speed in pixels per second
    pub speed: f32,
    /// Preferred flight height
    pub flight_level: f32,
    /// Points for a hit
    pub points: u32,
    /// `"regular"` or `"boss"`
    pub target_type: String,
}

impl TargetTemplate {
    /// Target component for a fresh duck
    pub fn target(&self) -> Target {
        Target::new(self.points, self.target_type.clone())
    }

    /// Images component for a fresh duck, or `None` if the template has none
    pub fn images(&self) -> Option<Images> {
        if self.images.is_empty() {
            None
        } else {
            Some(Images::new(self.images.iter().cloned()))
        }
    }
}

impl Default for TargetTemplate {
    fn default() -> Self {
        Self {
            sprite: Sprite::new(50.0, 50.0, Color::rgb(139, 69, 19)),
            images: Vec::new(),
            speed: 200.0,
            flight_level: 300.0,
            points: 10,
            target_type: Target::REGULAR.to_string(),
        }
    }
}

/// Named templates plus the weights used to pick one per spawn
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, TargetTemplate>,
    weights: Vec<(String, f32)>,
}

impl TemplateLibrary {
    /// Build and validate a library
    ///
    /// Every weighted name must have a template, weights must be
    /// non-negative and sum to 1 (within 0.01).
    pub fn new(
        templates: BTreeMap<String, TargetTemplate>,
        weights: BTreeMap<String, f32>,
    ) -> Result<Self, ConfigError> {
        let library = Self {
            templates,
            weights: weights.into_iter().collect(),
        };
        library.validate()?;
        Ok(library)
    }

    /// Check the weights against the templates
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weights.is_empty() {
            return Err(ConfigError::Invalid("no spawn weights".to_string()));
        }
        for (name, weight) in &self.weights {
            if !self.templates.contains_key(name) {
                return Err(ConfigError::Invalid(format!(
                    "spawn weight for unknown template '{name}'"
                )));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "spawn weight for '{name}' must be non-negative, got {weight}"
                )));
            }
        }
        let total: f32 = self.weights.iter().map(|(_, weight)| weight).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "spawn weights must sum to 1.0, got {total}"
            )));
        }
        Ok(())
    }

    /// Template by name
    pub fn get(&self, name: &str) -> Option<&TargetTemplate> {
        self.templates.get(name)
    }

    /// Template names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether there are no templates
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Name picked for a roll in [0, 1)
    ///
    /// Walks the cumulative weights; rounding leftovers fall to the last name.
    pub fn pick_with(&self, roll: f32) -> Option<&str> {
        let mut cumulative = 0.0;
        for (name, weight) in &self.weights {
            cumulative += weight;
            if roll < cumulative {
                return Some(name);
            }
        }
        self.weights.last().map(|(name, _)| name.as_str())
    }

    /// Weighted random pick
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Option<(&str, &TargetTemplate)> {
        let name = self.pick_with(rng.gen::<f32>())?;
        self.templates.get_key_value(name).map(|(name, template)| (name.as_str(), template))
    }
}

impl Default for TemplateLibrary {
    /// Regular (weight 0.9) and boss (weight 0.1) ducks
    fn default() -> Self {
        let regular = TargetTemplate {
            images: vec!["duck_left".to_string(), "duck_right".to_string()],
            ..TargetTemplate::default()
        };
        let boss = TargetTemplate {
            sprite: Sprite::new(70.0, 70.0, Color::rgb(178, 34, 34)),
            images: vec!["boss_left".to_string(), "boss_right".to_string()],
            speed: 100.0,
            flight_level: 150.0,
            points: 50,
            target_type: Target::BOSS.to_string(),
        };
        Self {
            templates: BTreeMap::from([
                (DUCK_BOSS.to_string(), boss),
                (DUCK_REGULAR.to_string(), regular),
            ]),
            weights: vec![(DUCK_REGULAR.to_string(), 0.9), (DUCK_BOSS.to_string(), 0.1)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_default_library_is_valid() {
        let library = TemplateLibrary::default();
        assert!(library.validate().is_ok());
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(DUCK_BOSS).unwrap().points, 50);
    }

    #[test]
    fn test_pick_follows_cumulative_weights() {
        let library = TemplateLibrary::default();
        assert_eq!(library.pick_with(0.0), Some(DUCK_REGULAR));
        assert_eq!(library.pick_with(0.89), Some(DUCK_REGULAR));
        assert_eq!(library.pick_with(0.95), Some(DUCK_BOSS));
        assert_eq!(library.pick_with(1.0), Some(DUCK_BOSS));
    }

    #[test]
    fn test_seeded_pick_is_deterministic() {
        let library = TemplateLibrary::default();
        let picks = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| library.pick(&mut rng).map(|(name, _)| name.to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(7), picks(7));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let templates = BTreeMap::from([(DUCK_REGULAR.to_string(), TargetTemplate::default())]);
        let weights = BTreeMap::from([(DUCK_REGULAR.to_string(), 0.5)]);
        assert!(matches!(
            TemplateLibrary::new(templates, weights),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_weights_must_name_templates() {
        let weights = BTreeMap::from([("duck_gold".to_string(), 1.0)]);
        assert!(TemplateLibrary::new(BTreeMap::new(), weights).is_err());
    }
}
