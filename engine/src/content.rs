use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".yaml") || lower.ends_with(".yml") {
            Format::Yaml
        } else {
            Format::Json
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Embedded {
    pub format: Format,
    pub text: &'static str,
}

const fn json(text: &'static str) -> Embedded {
    Embedded { format: Format::Json, text }
}

const fn yaml(text: &'static str) -> Embedded {
    Embedded { format: Format::Yaml, text }
}

pub fn builtin_tools() -> IndexMap<&'static str, Embedded> {
    IndexMap::from([
        ("injector", json(include_str!("../content/tools/injector.json"))),
        (
            "masterwork_injector",
            json(include_str!("../content/tools/masterwork_injector.json")),
        ),
    ])
}

pub fn builtin_combatants() -> IndexMap<&'static str, Embedded> {
    IndexMap::from([
        ("medic", json(include_str!("../content/combatants/medic.json"))),
        ("snapjaw", json(include_str!("../content/combatants/snapjaw.json"))),
        ("glowfish", json(include_str!("../content/combatants/glowfish.json"))),
    ])
}

pub fn builtin_matchups() -> IndexMap<&'static str, Embedded> {
    IndexMap::from([
        (
            "medic_vs_snapjaw",
            json(include_str!("../content/matchups/medic_vs_snapjaw.json")),
        ),
        (
            "crowded_glowfish",
            yaml(include_str!("../content/matchups/crowded_glowfish.yaml")),
        ),
    ])
}
