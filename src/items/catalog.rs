//! Item catalog
//!
//! Item templates loaded from a RON file, with hardcoded defaults as a
//! fallback. Templates turn into concrete items at a level, rarity and quality.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::{
    AttributeModifiers, CombatStats, Item, ItemCategory, ItemEffect, ItemType, Quality, Rarity,
    Requirements, Restoration,
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("duplicate template key `{0}`")]
    DuplicateKey(String),
    #[error("catalog contains no templates")]
    Empty,
}

fn default_weight() -> u32 {
    10
}

/// Blueprint for a family of items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTemplate {
    /// Stack identity shared by every item built from this template
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub item_type: ItemType,
    /// Overrides the type's default stack size
    #[serde(default)]
    pub stack_size: Option<u32>,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default)]
    pub modifiers: AttributeModifiers,
    #[serde(default)]
    pub combat: CombatStats,
    #[serde(default)]
    pub restore: Restoration,
    #[serde(default)]
    pub effects: Vec<ItemEffect>,
    /// Relative drop weight within its category
    #[serde(default = "default_weight")]
    pub weight: u32,
}

impl ItemTemplate {
    pub fn new(key: &str, name: &str, item_type: ItemType) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            description: String::new(),
            item_type,
            stack_size: None,
            requirements: Requirements::default(),
            modifiers: AttributeModifiers::default(),
            combat: CombatStats::default(),
            restore: Restoration::default(),
            effects: Vec::new(),
            weight: default_weight(),
        }
    }

    pub fn category(&self) -> ItemCategory {
        self.item_type.category()
    }

    /// Build a concrete item. Combat stats scale with rarity and level.
    pub fn instantiate(&self, level: u32, rarity: Rarity, quality: Quality) -> Item {
        let mut item = Item::new(self.key.as_str(), self.quality_name(quality), self.item_type, level)
            .with_rarity(rarity)
            .with_quality(quality)
            .with_description(self.description.clone());

        if let Some(size) = self.stack_size {
            item.stack_size = size.max(1);
        }

        let scale = (1.0 + 0.25 * rarity.ordinal() as f32) * (1.0 + (item.level - 1) as f32 * 0.1);
        item.combat = self.combat.scaled(scale);
        item.modifiers = self.modifiers;
        item.restore = self.restore;
        item.effects = self.effects.clone();
        item.requirements = Requirements {
            level: self.requirements.level.max(item.level),
            ..self.requirements
        };
        item
    }

    fn quality_name(&self, quality: Quality) -> String {
        match quality {
            Quality::Poor => format!("Worn {}", self.name),
            Quality::Excellent => format!("Fine {}", self.name),
            Quality::Perfect => format!("Masterwork {}", self.name),
            Quality::Normal | Quality::Good => self.name.clone(),
        }
    }
}

/// All known item templates
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    templates: Vec<ItemTemplate>,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self { templates: default_templates() }
    }
}

impl ItemCatalog {
    /// Build a catalog, rejecting duplicate keys
    pub fn from_templates(templates: Vec<ItemTemplate>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for template in &templates {
            if !seen.insert(template.key.as_str()) {
                return Err(CatalogError::DuplicateKey(template.key.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// Parse a catalog from RON text
    pub fn from_ron(text: &str) -> Result<Self, CatalogError> {
        let templates: Vec<ItemTemplate> = ron::from_str(text)?;
        Self::from_templates(templates)
    }

    /// Load a catalog from a RON file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text)
    }

    /// Load from a file, falling back to the built-in templates
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load item catalog: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Serialize the catalog back to RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(&self.templates, ron::ser::PrettyConfig::default())
    }

    pub fn get(&self, key: &str) -> Option<&ItemTemplate> {
        self.templates.iter().find(|t| t.key == key)
    }

    pub fn templates(&self) -> &[ItemTemplate] {
        &self.templates
    }

    pub fn by_category(&self, category: ItemCategory) -> Vec<&ItemTemplate> {
        self.templates.iter().filter(|t| t.category() == category).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Built-in templates
pub fn default_templates() -> Vec<ItemTemplate> {
    let mut templates = Vec::new();

    let mut sword = ItemTemplate::new("iron_sword", "Iron Sword", ItemType::Weapon);
    sword.description = "A sturdy iron blade.".to_string();
    sword.combat.physical_damage = 8;
    sword.requirements.strength = 5;
    templates.push(sword);

    let mut dagger = ItemTemplate::new("rusty_dagger", "Rusty Dagger", ItemType::Weapon);
    dagger.description = "A worn dagger, still sharp enough.".to_string();
    dagger.combat.physical_damage = 4;
    dagger.requirements.dexterity = 4;
    dagger.weight = 14;
    templates.push(dagger);

    let mut axe = ItemTemplate::new("battle_axe", "Battle Axe", ItemType::Weapon);
    axe.description = "A heavy two-handed axe.".to_string();
    axe.combat.physical_damage = 12;
    axe.requirements.strength = 10;
    axe.weight = 6;
    templates.push(axe);

    let mut staff = ItemTemplate::new("ember_staff", "Ember Staff", ItemType::Weapon);
    staff.description = "Warm to the touch.".to_string();
    staff.combat.physical_damage = 3;
    staff.combat.fire_damage = 6;
    staff.requirements.intelligence = 8;
    staff.weight = 6;
    templates.push(staff);

    let mut chest = ItemTemplate::new("leather_armor", "Leather Armor", ItemType::Chest);
    chest.description = "Supple leather armor.".to_string();
    chest.combat.armor = 6;
    templates.push(chest);

    let mut helm = ItemTemplate::new("chain_helm", "Chain Helm", ItemType::Helmet);
    helm.description = "A chain mail helmet.".to_string();
    helm.combat.armor = 5;
    templates.push(helm);

    let mut greaves = ItemTemplate::new("chain_greaves", "Chain Greaves", ItemType::Legs);
    greaves.combat.armor = 4;
    templates.push(greaves);

    let mut gloves = ItemTemplate::new("leather_gloves", "Leather Gloves", ItemType::Gloves);
    gloves.description = "Basic leather gloves.".to_string();
    gloves.combat.armor = 2;
    templates.push(gloves);

    let mut boots = ItemTemplate::new("leather_boots", "Leather Boots", ItemType::Boots);
    boots.description = "Simple leather boots.".to_string();
    boots.combat.armor = 3;
    templates.push(boots);

    let mut shield = ItemTemplate::new("wooden_shield", "Wooden Shield", ItemType::Shield);
    shield.description = "A simple wooden shield.".to_string();
    shield.combat.armor = 3;
    shield.combat.fire_resist = -2;
    templates.push(shield);

    let mut ring = ItemTemplate::new("bone_ring", "Bone Ring", ItemType::Ring);
    ring.description = "A ring carved from ancient bone.".to_string();
    ring.modifiers.vitality = 2;
    ring.combat.poison_resist = 5;
    ring.weight = 4;
    templates.push(ring);

    let mut amulet = ItemTemplate::new("copper_amulet", "Copper Amulet", ItemType::Amulet);
    amulet.description = "A tarnished copper amulet.".to_string();
    amulet.modifiers.mana = 10;
    amulet.effects.push(ItemEffect::permanent("Static Charge", 1));
    amulet.weight = 4;
    templates.push(amulet);

    let mut health = ItemTemplate::new("health_potion", "Health Potion", ItemType::Consumable);
    health.description = "Restores 30 HP.".to_string();
    health.restore.health = 30;
    health.weight = 20;
    templates.push(health);

    let mut mana = ItemTemplate::new("mana_potion", "Mana Potion", ItemType::Consumable);
    mana.description = "Restores 25 MP.".to_string();
    mana.restore.mana = 25;
    mana.weight = 12;
    templates.push(mana);

    let mut tonic = ItemTemplate::new("iron_tonic", "Iron Tonic", ItemType::Consumable);
    tonic.description = "Skin like bark for a minute.".to_string();
    tonic.effects.push(ItemEffect::timed("Ironskin", 10, 60.0));
    tonic.stack_size = Some(5);
    tonic.weight = 5;
    templates.push(tonic);

    let mut ore = ItemTemplate::new("iron_ore", "Iron Ore", ItemType::Material);
    ore.description = "Smelts into something useful.".to_string();
    ore.weight = 15;
    templates.push(ore);

    let mut pelt = ItemTemplate::new("wolf_pelt", "Wolf Pelt", ItemType::Material);
    pelt.stack_size = Some(20);
    templates.push(pelt);

    let mut letter = ItemTemplate::new("sealed_letter", "Sealed Letter", ItemType::Quest);
    letter.description = "The wax seal bears an unfamiliar crest.".to_string();
    letter.weight = 1;
    templates.push(letter);

    templates
}
