//! Built-in catalogs: expense categories and avatars

use serde::{Deserialize, Serialize};

/// Category of an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Accommodation,
    Entertainment,
    Shopping,
    Utilities,
    Groceries,
    Medical,
    Other,
}

impl ExpenseCategory {
    /// All categories in display order
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Accommodation,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Shopping,
        ExpenseCategory::Utilities,
        ExpenseCategory::Groceries,
        ExpenseCategory::Medical,
        ExpenseCategory::Other,
    ];

    /// Code stored in the database
    pub fn code(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transport => "TRANSPORT",
            ExpenseCategory::Accommodation => "ACCOMMODATION",
            ExpenseCategory::Entertainment => "ENTERTAINMENT",
            ExpenseCategory::Shopping => "SHOPPING",
            ExpenseCategory::Utilities => "UTILITIES",
            ExpenseCategory::Groceries => "GROCERIES",
            ExpenseCategory::Medical => "MEDICAL",
            ExpenseCategory::Other => "OTHER",
        }
    }

    /// Parse a stored code; unknown codes read as `Other`
    pub fn from_code(code: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .unwrap_or(ExpenseCategory::Other)
    }

    /// Localization key for the display name
    pub fn label_key(&self) -> String {
        format!("category_{}", self.code().to_lowercase())
    }
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        ExpenseCategory::Other
    }
}

/// Avatar artwork family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvatarType {
    Male,
    Female,
    Cat,
    Dog,
}

impl AvatarType {
    fn prefix(&self) -> &'static str {
        match self {
            AvatarType::Male => "male",
            AvatarType::Female => "female",
            AvatarType::Cat => "cat",
            AvatarType::Dog => "dog",
        }
    }
}

/// Built-in avatar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Avatar ID, e.g. `cat_03`
    pub id: String,
    pub avatar_type: AvatarType,
    /// Resource name of the image, e.g. `avatar_cat_03`
    pub resource_name: String,
    /// Index within its type, starting at 1
    pub index: u8,
}

impl Avatar {
    /// Localization key for the display name (takes the index as `{n}`)
    pub fn label_key(&self) -> String {
        format!("avatar_{}", self.avatar_type.prefix())
    }
}

/// Number of avatars of each type
pub const AVATARS_PER_TYPE: u8 = 5;

/// Avatar types in catalog order
pub const AVATAR_TYPES: [AvatarType; 4] = [
    AvatarType::Male,
    AvatarType::Female,
    AvatarType::Cat,
    AvatarType::Dog,
];

/// All built-in avatars
pub fn avatars() -> Vec<Avatar> {
    AVATAR_TYPES
        .iter()
        .flat_map(|t| (1..=AVATARS_PER_TYPE).map(move |i| make_avatar(*t, i)))
        .collect()
}

/// Avatars of one type
pub fn avatars_by_type(avatar_type: AvatarType) -> Vec<Avatar> {
    (1..=AVATARS_PER_TYPE).map(|i| make_avatar(avatar_type, i)).collect()
}

/// Look up an avatar by ID
pub fn avatar_by_id(id: &str) -> Option<Avatar> {
    avatars().into_iter().find(|a| a.id == id)
}

/// The default avatar (first in the catalog)
pub fn default_avatar() -> Avatar {
    make_avatar(AvatarType::Male, 1)
}

fn make_avatar(avatar_type: AvatarType, index: u8) -> Avatar {
    let id = format!("{}_{:02}", avatar_type.prefix(), index);
    Avatar {
        resource_name: format!("avatar_{}", id),
        id,
        avatar_type,
        index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        for category in ExpenseCategory::ALL {
            assert_eq!(ExpenseCategory::from_code(category.code()), category);
        }
        assert_eq!(ExpenseCategory::from_code("PETS"), ExpenseCategory::Other);
        assert_eq!(ExpenseCategory::Food.label_key(), "category_food");
    }

    #[test]
    fn test_avatar_catalog() {
        let all = avatars();
        assert_eq!(all.len(), 20);
        assert_eq!(all[0].id, "male_01");
        assert_eq!(all[19].id, "dog_05");
        assert_eq!(all[10].resource_name, "avatar_cat_01");
    }

    #[test]
    fn test_avatars_by_type() {
        let cats = avatars_by_type(AvatarType::Cat);
        assert_eq!(cats.len(), 5);
        assert!(cats.iter().all(|a| a.avatar_type == AvatarType::Cat));
    }

    #[test]
    fn test_avatar_lookup() {
        let avatar = avatar_by_id("female_03").unwrap();
        assert_eq!(avatar.avatar_type, AvatarType::Female);
        assert_eq!(avatar.index, 3);
        assert!(avatar_by_id("dragon_01").is_none());
        assert_eq!(default_avatar().id, "male_01");
    }
}
