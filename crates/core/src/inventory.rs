use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_YEAR_EXCLUSIVE: i32 = 1991;
pub const DEFAULT_MAKES: [&str; 4] = ["Ford", "Honda", "Chevrolet", "Dodge"];
pub const DEFAULT_MODELS: [&str; 4] = ["Explorer", "Civic", "Malibu", "Dakota"];

/// Accepted values for one slot category, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    entries: Vec<String>,
}

impl AllowList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { entries: entries.into_iter().map(Into::into).collect() }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, value: &str) -> bool {
        let needle = value.to_lowercase();
        self.entries.iter().any(|entry| entry.to_lowercase() == needle)
    }

    /// `"A, B, C, or D"`.
    pub fn suggestion(&self) -> String {
        match self.entries.as_slice() {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => format!("{first} or {second}"),
            [head @ .., last] => format!("{}, or {last}", head.join(", ")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryCatalog {
    pub min_year_exclusive: i32,
    pub makes: AllowList,
    pub models: AllowList,
}

impl Default for InventoryCatalog {
    fn default() -> Self {
        Self {
            min_year_exclusive: DEFAULT_MIN_YEAR_EXCLUSIVE,
            makes: AllowList::new(DEFAULT_MAKES),
            models: AllowList::new(DEFAULT_MODELS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AllowList, InventoryCatalog};

    #[test]
    fn matching_ignores_case() {
        let catalog = InventoryCatalog::default();
        assert!(catalog.makes.contains("FORD"));
        assert!(catalog.makes.contains("ford"));
        assert!(catalog.models.contains("cIvIc"));
        assert!(!catalog.makes.contains("Tesla"));
        assert!(!catalog.makes.contains("for"));
    }

    #[test]
    fn suggestion_lists_entries_in_declared_order() {
        assert_eq!(
            InventoryCatalog::default().makes.suggestion(),
            "Ford, Honda, Chevrolet, or Dodge"
        );
        assert_eq!(AllowList::new(["Ford", "Honda"]).suggestion(), "Ford or Honda");
        assert_eq!(AllowList::new(["Ford"]).suggestion(), "Ford");
        assert_eq!(AllowList::new(Vec::<String>::new()).suggestion(), "");
    }
}
