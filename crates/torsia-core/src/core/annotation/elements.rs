use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Helix,
    Bulge,
    InternalLoop,
    Junction,
    Loop,
    NonLoop,
}

static ELEMENT_KIND_LABELS: Map<&'static str, ElementKind> = phf_map! {
    "helix" => ElementKind::Helix, "h" => ElementKind::Helix,
    "bulge" => ElementKind::Bulge, "b" => ElementKind::Bulge,
    "internal-loop" => ElementKind::InternalLoop, "internal_loop" => ElementKind::InternalLoop,
    "iloop" => ElementKind::InternalLoop, "i" => ElementKind::InternalLoop,
    "junction" => ElementKind::Junction, "j" => ElementKind::Junction,
    "loop" => ElementKind::Loop, "l" => ElementKind::Loop,
    "non-loop" => ElementKind::NonLoop, "nonloop" => ElementKind::NonLoop,
    "non_loop" => ElementKind::NonLoop, "n" => ElementKind::NonLoop,
};

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Helix,
        ElementKind::Bulge,
        ElementKind::InternalLoop,
        ElementKind::Junction,
        ElementKind::Loop,
        ElementKind::NonLoop,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ElementKind::Helix => "helix",
            ElementKind::Bulge => "bulge",
            ElementKind::InternalLoop => "internal-loop",
            ElementKind::Junction => "junction",
            ElementKind::Loop => "loop",
            ElementKind::NonLoop => "non-loop",
        }
    }

    /// Single-letter prefix used in generated element names (`H1`, `B2`, ...).
    pub fn prefix(self) -> char {
        match self {
            ElementKind::Helix => 'H',
            ElementKind::Bulge => 'B',
            ElementKind::InternalLoop => 'I',
            ElementKind::Junction => 'J',
            ElementKind::Loop => 'L',
            ElementKind::NonLoop => 'N',
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown structure element kind: '{0}'")]
pub struct ParseElementKindError(pub String);

impl FromStr for ElementKind {
    type Err = ParseElementKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ELEMENT_KIND_LABELS
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| ParseElementKindError(s.to_string()))
    }
}

/// A named group of residues (helix, loop, junction, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureElement {
    kind: ElementKind,
    name: String,
    global_index: usize,
    local_index: usize,
    residues: Vec<usize>,
}

impl StructureElement {
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position among all elements created by the same indexer.
    pub fn global_index(&self) -> usize {
        self.global_index
    }

    /// Position among elements of the same kind created by the same indexer.
    pub fn local_index(&self) -> usize {
        self.local_index
    }

    pub fn residues(&self) -> &[usize] {
        &self.residues
    }

    pub fn contains_residue(&self, residue: usize) -> bool {
        self.residues.contains(&residue)
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Hands out global and per-kind element indices.
///
/// Each annotation pass owns its own indexer, so independent passes number their elements
/// independently.
#[derive(Debug, Default, Clone)]
pub struct ElementIndexer {
    total: usize,
    per_kind: [usize; ElementKind::ALL.len()],
}

impl ElementIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an element named `<prefix><local index + 1>`.
    pub fn create(&mut self, kind: ElementKind, residues: Vec<usize>) -> StructureElement {
        let local_index = self.per_kind[kind.slot()];
        let name = format!("{}{}", kind.prefix(), local_index + 1);
        self.create_named(kind, name, residues)
    }

    pub fn create_named(
        &mut self,
        kind: ElementKind,
        name: impl Into<String>,
        residues: Vec<usize>,
    ) -> StructureElement {
        let element = StructureElement {
            kind,
            name: name.into(),
            global_index: self.total,
            local_index: self.per_kind[kind.slot()],
            residues,
        };
        self.total += 1;
        self.per_kind[kind.slot()] += 1;
        element
    }

    pub fn count(&self, kind: ElementKind) -> usize {
        self.per_kind[kind.slot()]
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
