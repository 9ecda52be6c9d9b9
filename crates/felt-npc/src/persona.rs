use super::Style;
use serde::Deserialize;
use serde::Serialize;

/// A loadable NPC identity: display name, style tags for the lobby UI, the
/// [`Style`] scalars its [`RuleBrain`](super::RuleBrain) is seeded with, and
/// an optional story-mode tier for chapter-gated opponents.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Persona {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub style: Style,
    #[serde(default)]
    pub story_tier: Option<u32>,
    /// How long this persona's brain sits on a decision before submitting
    /// it, simulating a human-paced opponent rather than an instant bot.
    #[serde(default = "Persona::default_think_delay_ms")]
    pub think_delay_ms: u64,
}

impl Persona {
    fn default_think_delay_ms() -> u64 {
        900
    }
    pub fn think_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.think_delay_ms)
    }
}

/// The personas bundled with the binary, loaded unless `PERSONA_DATA_PATH`
/// points somewhere else.
const BUNDLED_PERSONAS: &str = include_str!("../assets/personas.json");

impl Persona {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, style: Style) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            tags: Vec::new(),
            style,
            story_tier: None,
            think_delay_ms: Self::default_think_delay_ms(),
        }
    }
}

/// In-memory registry of loaded personas, keyed by persona id.
#[derive(Debug, Clone, Default)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    /// Parses a JSON array of persona entries, the shape loaded from a data
    /// file at startup.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let personas: Vec<Persona> = serde_json::from_str(json)?;
        Ok(Self { personas })
    }
    /// Loads from `PERSONA_DATA_PATH` if set, otherwise from the bundled
    /// default data file.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var("PERSONA_DATA_PATH") {
            Ok(path) => Self::parse(&std::fs::read_to_string(path)?),
            Err(_) => Self::parse(BUNDLED_PERSONAS),
        }
    }
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }
    pub fn all(&self) -> &[Persona] {
        &self.personas
    }
    /// Chooses `n` distinct personas with a caller-supplied rng, for
    /// lobby auto-fill.
    pub fn sample(&self, n: usize, rng: &mut impl rand::Rng) -> Vec<&Persona> {
        use rand::seq::SliceRandom;
        let mut indices: Vec<usize> = (0..self.personas.len()).collect();
        indices.shuffle(rng);
        indices
            .into_iter()
            .take(n)
            .map(|i| &self.personas[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"id": "shark", "display_name": "The Shark", "tags": ["aggressive"],
         "style": {"aggression": 0.9, "looseness": 0.3, "bluff": 0.4, "patience": 0.2, "sizing": 0.8}},
        {"id": "rock", "display_name": "The Rock", "tags": ["tight"],
         "style": {"aggression": 0.1, "looseness": 0.1, "bluff": 0.0, "patience": 0.9, "sizing": 0.2}}
    ]"#;

    #[test]
    fn parses_persona_registry_json() {
        let registry = PersonaRegistry::parse(SAMPLE).unwrap();
        assert_eq!(registry.all().len(), 2);
        assert_eq!(registry.get("shark").unwrap().display_name, "The Shark");
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn loads_bundled_default_without_env() {
        let registry = PersonaRegistry::load().unwrap();
        assert!(!registry.all().is_empty());
    }

    #[test]
    fn sample_returns_distinct_personas() {
        let registry = PersonaRegistry::parse(SAMPLE).unwrap();
        let mut rng = rand::rng();
        let sampled = registry.sample(2, &mut rng);
        assert_eq!(sampled.len(), 2);
        assert_ne!(sampled[0].id, sampled[1].id);
    }
}
