// Character template registry
//
// Templates are validated once, when they are registered. Every registered
// template defines all eight moves and every move has an effect, so nothing
// about template data can go wrong once a match is running.

use super::character::{CharacterRig, SaveRecord};
use super::stats::{CharacterStats, PIXELS_PER_UNIT};
use crate::engine::assets::AssetLoader;
use crate::game::moves::{AnimationClip, MoveSet, MoveSlot, MoveTemplate};
use crate::game::ConfigurationError;
use std::sync::Arc;

/// How a move's sprite sheet is laid out on disk
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub frame_width: u32,
    pub frame_height: u32,
    pub fps: f32,
    pub looping: bool,
}

impl SheetLayout {
    /// Square cells of `size` pixels
    pub fn square(size: u32, fps: f32, looping: bool) -> Self {
        Self {
            frame_width: size,
            frame_height: size,
            fps,
            looping,
        }
    }
}

/// Unvalidated character data, assembled move by move
#[derive(Debug, Clone)]
pub struct CharacterTemplate {
    name: String,
    stats: CharacterStats,
    moves: [Option<Arc<MoveTemplate>>; MoveSlot::COUNT],
}

impl CharacterTemplate {
    pub fn new(name: &str, stats: CharacterStats) -> Self {
        Self {
            name: name.to_string(),
            stats,
            moves: Default::default(),
        }
    }

    /// Set the move for the template's own slot, replacing any earlier one
    pub fn with_move(mut self, template: MoveTemplate) -> Self {
        let slot = template.slot();
        self.moves[slot.index()] = Some(Arc::new(template));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load one move's sheet named `<character>_<move>.png` and its
    /// `<character>_<move>*` sound variants
    pub fn load_move(
        loader: &AssetLoader,
        character: &str,
        slot: MoveSlot,
        layout: SheetLayout,
    ) -> anyhow::Result<MoveTemplate> {
        let stem = format!("{}_{}", character, slot.name());
        let sheet = loader.load_sprite_sheet(
            &format!("{}.png", stem),
            layout.frame_width,
            layout.frame_height,
            None,
        )?;
        let sounds = loader.sound_variants(&stem)?;

        let clip = AnimationClip::new(sheet, layout.fps, layout.looping, PIXELS_PER_UNIT);
        Ok(MoveTemplate::new(character, slot, clip, 1.0 / PIXELS_PER_UNIT).with_sounds(sounds))
    }

    /// Check the template and build its unbound prototype rig
    pub fn build(self) -> Result<CharacterRig, ConfigurationError> {
        let mut checked = Vec::with_capacity(MoveSlot::COUNT);
        for (slot, template) in MoveSlot::ALL.into_iter().zip(self.moves) {
            let template = template.ok_or_else(|| ConfigurationError::MissingMove {
                template: self.name.clone(),
                slot,
            })?;
            if !template.has_effect() {
                return Err(ConfigurationError::MissingEffect {
                    template: self.name.clone(),
                    slot,
                });
            }
            checked.push(template);
        }

        let moves = std::array::from_fn(|i| Arc::clone(&checked[i]));
        Ok(CharacterRig::new(&self.name, self.stats, MoveSet::new(moves)))
    }
}

/// Registry of playable characters
#[derive(Debug, Default)]
pub struct Roster {
    /// Prototype rigs in registration order
    prototypes: Vec<CharacterRig>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster holding the built-in characters
    pub fn with_builtins() -> anyhow::Result<Self> {
        let mut roster = Self::new();
        for template in super::builtin::templates()? {
            roster.register(template)?;
        }
        Ok(roster)
    }

    /// Validate and add a template
    pub fn register(&mut self, template: CharacterTemplate) -> Result<(), ConfigurationError> {
        if self.contains(template.name()) {
            return Err(ConfigurationError::DuplicateTemplate(template.name().to_string()));
        }

        let rig = template.build()?;
        log::info!("Registered character '{}'", rig.name());
        self.prototypes.push(rig);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prototypes.iter().any(|rig| rig.name() == name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prototypes.iter().map(CharacterRig::name)
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// A new unbound rig for `name`
    pub fn instantiate(&self, name: &str) -> Result<CharacterRig, ConfigurationError> {
        self.prototypes
            .iter()
            .find(|rig| rig.name() == name)
            .map(CharacterRig::clone_unbound)
            .ok_or_else(|| ConfigurationError::UnknownTemplate(name.to_string()))
    }

    /// Rebuild the rig described by a save record (still unbound)
    pub fn instantiate_record(
        &self,
        record: &SaveRecord,
    ) -> Result<CharacterRig, ConfigurationError> {
        self.instantiate(&record.template)
    }
}
